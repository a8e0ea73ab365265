//! # valorant-api - client for the unofficial Valorant API
//!
//! A thin, retry-aware wrapper around the REST API at `api.henrikdev.xyz`:
//! accounts, MMR, match history, leaderboard, server status, website articles,
//! in-game content and store data. It validates arguments that have a closed
//! domain, builds request paths, retries transport failures with exponential
//! backoff and hands back the raw response. Payloads are never parsed for you.
//!
//! ## Quick Start
//!
//! ```no_run
//! use valorant_api::{logger::TracingLogger, ValorantApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), valorant_api::Error> {
//!     let api = ValorantApi::builder().logger(TracingLogger).build()?;
//!
//!     if let Some(response) = api.account("Tenz", "NA1").await? {
//!         println!("{} in {:?}", response.status, response.latency);
//!         println!("{}", response.raw_body);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Invalid input
//!
//! Methods with validated arguments return `Ok(None)` instead of sending a
//! request when an argument is outside its domain (unknown region, malformed
//! puuid, ...). The reason goes to the configured [`logger::Logger`].
//!
//! ```no_run
//! # async fn example() -> Result<(), valorant_api::Error> {
//! let api = valorant_api::ValorantApi::builder().build()?;
//! assert!(api.server_status("us").await?.is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Retries
//!
//! Every request runs under a [`RetryPolicy`]: by default 3 attempts, 1 second
//! before the first retry, doubling afterwards, retrying network errors and
//! timeouts only. HTTP status codes never trigger a retry.
//!
//! ```no_run
//! use valorant_api::{RetryPolicy, ValorantApi};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), valorant_api::Error> {
//! let api = ValorantApi::builder()
//!     .timeout(Duration::from_secs(5))
//!     .retry_policy(
//!         RetryPolicy::builder()
//!             .max_attempts(5)
//!             .initial_delay(Duration::from_millis(200))
//!             .backoff_multiplier(3.0)
//!             .retry_predicate(valorant_api::retry::RetryOnTransportError)
//!             .on_retry(|remaining, error: &valorant_api::Error, delay| {
//!                 eprintln!("{error}; {remaining} attempts left, waiting {delay:?}");
//!             })
//!             .build()?,
//!     )
//!     .build()?;
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
pub mod endpoint;
mod error;
pub mod logger;
pub mod metadata;
mod response;
pub mod retry;
pub mod validate;

pub use api::{ValorantApi, ValorantApiBuilder};
pub use client::{Client, ClientBuilder, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use error::{Error, InvalidInput, Result};
pub use response::Response;
pub use retry::{RetryPolicy, RetryPolicyBuilder, RetryPredicate};
pub use validate::{Act, ArticleFilter, CountryCode, Region};
