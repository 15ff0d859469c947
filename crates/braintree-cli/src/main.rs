//! Command-line access to dispute and payment method nonce lookups.
//!
//! Credentials come from `BRAINTREE_*` environment variables (a `.env` file
//! is honoured). Results are printed to stdout as JSON; logs go to stderr.
//!
//! ```text
//! braintree dispute find <dispute_id>
//! braintree dispute accept <dispute_id>
//! braintree dispute finalize <dispute_id>
//! braintree dispute search-status <status>...
//! braintree nonce find <nonce>
//! ```

use braintree::{
    BraintreeError, BraintreeGateway, Configuration, DisputeSearch, DisputeStatus, GatewayResult,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage:
  braintree dispute find <dispute_id>
  braintree dispute accept <dispute_id>
  braintree dispute finalize <dispute_id>
  braintree dispute search-status <status>...
  braintree nonce find <nonce>";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    if let Err(e) = run(&args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: &[&str]) -> Result<(), BraintreeError> {
    let (resource, command, rest) = match args {
        [resource, command, rest @ ..] => (*resource, *command, rest),
        _ => usage(),
    };

    let config = Configuration::from_env()?;
    tracing::info!(environment = ?config.environment, merchant_id = %config.merchant_id, "braintree cli");
    let gateway = BraintreeGateway::new(config)?;

    match (resource, command, rest) {
        ("dispute", "find", [id]) => {
            let dispute = gateway.dispute().find(id).await?;
            print_json(&serde_json::to_value(dispute)?);
        }
        ("dispute", "accept", [id]) => {
            let result = gateway.dispute().accept(id).await?;
            print_json(&outcome(result));
        }
        ("dispute", "finalize", [id]) => {
            let result = gateway.dispute().finalize(id).await?;
            print_json(&outcome(result));
        }
        ("dispute", "search-status", statuses) if !statuses.is_empty() => {
            let statuses = statuses
                .iter()
                .map(|s| parse_status(s))
                .collect::<Result<Vec<_>, _>>()?;

            let Some(collection) = gateway
                .dispute()
                .search([DisputeSearch::status().in_list(statuses)])?
                .success()
            else {
                return Ok(());
            };

            let mut count = 0usize;
            let mut disputes = std::pin::pin!(collection.items());
            while let Some(dispute) = disputes.next().await {
                println!("{}", serde_json::to_string(&dispute?)?);
                count += 1;
            }
            tracing::info!(count, "search complete");
        }
        ("nonce", "find", [nonce]) => {
            let nonce = gateway.payment_method_nonce().find(nonce).await?;
            print_json(&serde_json::to_value(nonce)?);
        }
        _ => usage(),
    }

    Ok(())
}

fn parse_status(raw: &str) -> Result<DisputeStatus, BraintreeError> {
    match serde_json::from_value::<DisputeStatus>(Value::String(raw.to_ascii_lowercase()))? {
        DisputeStatus::Unrecognized => Err(BraintreeError::InvalidArgument(format!(
            "unknown dispute status: {raw}"
        ))),
        status => Ok(status),
    }
}

fn outcome(result: GatewayResult<()>) -> Value {
    match result {
        GatewayResult::Success(()) => json!({ "success": true }),
        GatewayResult::Error(e) => json!({
            "success": false,
            "message": e.message,
            "errors": e.errors.deep_errors(),
        }),
    }
}

fn print_json(value: &Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_default()
    );
}

fn usage() -> ! {
    eprintln!("{USAGE}");
    std::process::exit(2);
}
