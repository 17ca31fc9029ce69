//! Argument parsing and command execution for the `gumroad` binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gumroad_license::types::ResourceName;
use gumroad_license::{
    ClientConfig, Credentials, DEFAULT_API_BASE_URL, DEFAULT_APP_BASE_URL, GumroadClient,
};
use serde_json::{json, Value};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "gumroad")]
#[command(about = "Inspect Gumroad licenses, subscribers and webhooks")]
pub struct Cli {
    /// API access token
    #[arg(long, env = "GR_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Default product id or permalink
    #[arg(long, env = "GR_PRODUCT_ID")]
    pub product_id: Option<String>,

    /// Browser session cookie for charge history and purchase search
    #[arg(long, env = "GR_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    #[arg(long, default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    #[arg(long, default_value = DEFAULT_APP_BASE_URL)]
    pub app_base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Verify a license key and report its subscription status
    Verify {
        license_key: String,
        #[arg(long)]
        product_id: Option<String>,
        /// Also sum the subscription's charges (needs a session cookie)
        #[arg(long)]
        revenue: bool,
    },
    /// Check whether an email is subscribed to a product
    Subscriber {
        email: String,
        #[arg(long)]
        product_id: Option<String>,
    },
    /// Fetch one subscriber record
    Subscription { subscription_id: String },
    /// Search purchases by email or free text (needs a session cookie)
    Search { query: String },
    /// List the charges of a subscription (needs a session cookie)
    Charges { subscription_id: String },
    /// Manage webhook registrations
    #[command(subcommand)]
    Webhooks(WebhookCommand),
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum WebhookCommand {
    /// List registrations, optionally for one event kind
    List {
        #[arg(long, value_parser = parse_resource_name)]
        resource: Option<ResourceName>,
    },
    /// Register unless an identical registration exists
    Ensure {
        #[arg(value_parser = parse_resource_name)]
        resource: ResourceName,
        post_url: String,
    },
    /// Register unconditionally
    Create {
        #[arg(value_parser = parse_resource_name)]
        resource: ResourceName,
        post_url: String,
    },
    /// Remove a registration
    Delete { id: String },
}

fn parse_resource_name(s: &str) -> std::result::Result<ResourceName, String> {
    s.parse().map_err(|e| format!("{e}"))
}

impl Cli {
    /// Client settings derived from the flags and environment.
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig {
            api_base_url: self.api_base_url.clone(),
            app_base_url: self.app_base_url.clone(),
            timeout_secs: self.timeout,
            ..Default::default()
        };
        match &self.product_id {
            Some(id) => config.with_product_id(id.clone()),
            None => config,
        }
    }

    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(self.access_token.clone());
        match &self.cookie {
            Some(cookie) => credentials.with_session_cookie(cookie.clone()),
            None => credentials,
        }
    }

    pub fn build_client(&self) -> Result<GumroadClient> {
        GumroadClient::new(self.credentials(), self.client_config())
            .context("failed to build Gumroad client")
    }
}

/// Runs one command and returns its JSON report.
pub async fn execute(client: &GumroadClient, command: Command) -> Result<Value> {
    debug!(?command, "executing");
    match command {
        Command::Verify {
            license_key,
            product_id,
            revenue,
        } => verify(client, &license_key, product_id.as_deref(), revenue).await,
        Command::Subscriber { email, product_id } => {
            let subscribed = client
                .email_is_subscriber(&email, product_id.as_deref())
                .await
                .context("subscriber lookup failed")?;
            Ok(json!({ "email": email, "subscriber": subscribed }))
        }
        Command::Subscription { subscription_id } => {
            let subscription = client
                .get_subscription(&subscription_id)
                .await
                .with_context(|| format!("failed to fetch subscription {subscription_id}"))?;
            Ok(serde_json::to_value(subscription)?)
        }
        Command::Search { query } => {
            let purchases = client
                .search_purchases(&query)
                .await
                .context("purchase search failed")?;
            Ok(serde_json::to_value(purchases)?)
        }
        Command::Charges { subscription_id } => {
            let charges = client
                .get_subscription_charges(&subscription_id)
                .await
                .with_context(|| format!("failed to fetch charges of {subscription_id}"))?;
            Ok(serde_json::to_value(charges)?)
        }
        Command::Webhooks(command) => webhooks(client, command).await,
    }
}

async fn verify(
    client: &GumroadClient,
    license_key: &str,
    product_id: Option<&str>,
    revenue: bool,
) -> Result<Value> {
    let license = client
        .get_license(license_key, product_id)
        .await
        .context("license verification failed")?;

    let mut report = json!({
        "license_key": license.key(),
        "uses": license.uses(),
        "product_id": license.purchase().product_id,
        "email": license.purchase().email,
        "subscription_id": Value::Null,
    });

    let Ok(subscription_id) = license.subscription_id() else {
        report["valid"] = json!(true);
        return Ok(report);
    };
    report["subscription_id"] = json!(subscription_id);

    let status = license.status().await.context("subscription lookup failed")?;
    report["status"] = json!(status);
    report["valid"] = json!(license.is_valid(None).await.is_ok());

    if revenue {
        let total = license
            .total_revenue()
            .await
            .context("failed to fetch charge history")?;
        report["total_revenue"] = json!(total);
    }

    Ok(report)
}

async fn webhooks(client: &GumroadClient, command: WebhookCommand) -> Result<Value> {
    match command {
        WebhookCommand::List { resource } => {
            let subs = client.get_resource_subscriptions(resource).await?;
            Ok(serde_json::to_value(subs)?)
        }
        WebhookCommand::Ensure { resource, post_url } => {
            let sub = client
                .ensure_resource_subscription(resource, &post_url)
                .await?;
            Ok(serde_json::to_value(sub)?)
        }
        WebhookCommand::Create { resource, post_url } => {
            let sub = client
                .create_resource_subscription(resource, &post_url)
                .await?;
            Ok(serde_json::to_value(sub)?)
        }
        WebhookCommand::Delete { id } => {
            client.delete_resource_subscription(&id).await?;
            Ok(json!({ "deleted": id }))
        }
    }
}
