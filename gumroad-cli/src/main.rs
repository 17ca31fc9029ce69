//! Gumroad license and subscription CLI.
//!
//! Usage:
//!   gumroad verify <LICENSE_KEY> --revenue
//!   gumroad webhooks ensure sale https://example.com/hooks/sale
//!
//! Credentials come from `GR_ACCESS_TOKEN`, `GR_PRODUCT_ID` and `GR_COOKIE`
//! or the matching flags. Reports are printed to stdout as JSON; logs go to
//! stderr.

use anyhow::Result;
use clap::Parser;
use gumroad_cli::{execute, Cli};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let client = cli.build_client()?;
    info!(product_id = ?client.default_product_id(), "gumroad client ready");

    let report = execute(&client, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
