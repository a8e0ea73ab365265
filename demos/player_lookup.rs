//! Looks up a player and prints the raw responses of a few endpoints.
//!
//! Run with: `cargo run --example player_lookup -- Tenz NA1 na`

use std::time::Duration;
use valorant_api::{logger::TracingLogger, Error, RetryPolicy, ValorantApi};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter("valorant_api=debug,player_lookup=info")
        .init();

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "Tenz".to_string());
    let tag = args.next().unwrap_or_else(|| "NA1".to_string());
    let region = args.next().unwrap_or_else(|| "na".to_string());

    let api = ValorantApi::builder()
        .timeout(Duration::from_secs(15))
        .retry_policy(
            RetryPolicy::builder()
                .max_attempts(3)
                .initial_delay(Duration::from_millis(500))
                .retry_predicate(valorant_api::retry::RetryOnTransportError)
                .on_retry(|remaining, error: &Error, delay| {
                    tracing::warn!(%error, remaining, ?delay, "retrying");
                })
                .build()?,
        )
        .logger(TracingLogger)
        .build()?;

    println!("=== Account ===");
    match api.account(&name, &tag).await? {
        Some(response) => println!("{}: {}", response.status, response.raw_body),
        None => println!("rejected"),
    }

    println!("=== MMR history ({region}) ===");
    match api.mmr_history(&region, &name, &tag).await? {
        Some(response) => println!("{}: {}", response.status, response.raw_body),
        None => println!("rejected, see log for the reason"),
    }

    println!("=== Server status ({region}) ===");
    if let Some(response) = api.server_status(&region).await? {
        let body: serde_json::Value = response.json()?;
        println!("{:#}", body);
    }

    Ok(())
}
