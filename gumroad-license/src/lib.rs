//! License verification and subscription resolution over the Gumroad API.
//!
//! This crate handles:
//! - Verifying license keys against a product
//! - Resolving a license to its subscription and charge history, lazily and
//!   at most once per [`License`]
//! - Subscriber lookups and purchase search
//! - Webhook ("resource subscription") management
//!
//! # Authentication
//!
//! Gumroad has two endpoint families. The public API takes an access token;
//! the application host (charge history, purchase search) only accepts a
//! browser session cookie. Both are supplied through [`Credentials`].
//!
//! # Example
//!
//! ```no_run
//! use gumroad_license::{ClientConfig, Credentials, GumroadClient};
//!
//! # async fn run() -> gumroad_license::LicenseResult<()> {
//! let credentials = Credentials::new("access-token").with_session_cookie("_gumroad_app_session=...");
//! let config = ClientConfig::default().with_product_id("BTMt");
//! let client = GumroadClient::new(credentials, config)?;
//!
//! let license = client.get_license("C1234A-4SSSS2E-B312342-D1324E1", None).await?;
//! license.is_valid(None).await?;
//! println!("revenue: {}", license.total_revenue().await?);
//! # Ok(())
//! # }
//! ```

mod cell;
mod client;
mod config;
mod error;
pub mod http;
mod license;
mod transport;

pub use client::GumroadClient;
pub use config::{ClientConfig, Credentials, DEFAULT_API_BASE_URL, DEFAULT_APP_BASE_URL};
pub use error::{LicenseError, LicenseResult};
pub use license::{InvalidCases, License};
pub use transport::Transport;

pub use gumroad_types as types;
