//! Resolve-once cell backing the lazy fields of a license.

use crate::error::LicenseResult;
use std::future::Future;
use tokio::sync::RwLock;

#[derive(Debug)]
enum Slot<T> {
    Unresolved,
    Resolved(T),
}

/// A slot that moves once from unresolved to resolved and never back.
///
/// The lock is not held while resolving, so two callers racing on an
/// unresolved cell may both run their resolver. The first value stored wins
/// and every caller observes it.
#[derive(Debug)]
pub(crate) struct ResolveOnce<T> {
    slot: RwLock<Slot<T>>,
}

impl<T: Clone> ResolveOnce<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: RwLock::new(Slot::Unresolved),
        }
    }

    /// Returns the resolved value, if any.
    pub(crate) async fn get(&self) -> Option<T> {
        match &*self.slot.read().await {
            Slot::Resolved(value) => Some(value.clone()),
            Slot::Unresolved => None,
        }
    }

    /// Returns the resolved value, running `resolve` first if needed.
    /// A failed resolution leaves the cell unresolved.
    pub(crate) async fn get_or_resolve<F, Fut>(&self, resolve: F) -> LicenseResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LicenseResult<T>>,
    {
        if let Some(value) = self.get().await {
            return Ok(value);
        }

        let value = resolve().await?;

        let mut slot = self.slot.write().await;
        match &*slot {
            Slot::Resolved(existing) => Ok(existing.clone()),
            Slot::Unresolved => {
                *slot = Slot::Resolved(value.clone());
                Ok(value)
            }
        }
    }
}
