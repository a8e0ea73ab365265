//! Error types for API calls.
//!
//! Two kinds of failure exist in this crate. [`Error`] is returned to the caller:
//! transport failures that survived every retry, plus local configuration and
//! (de)serialization problems. [`InvalidInput`] describes a rejected argument;
//! the facade logs it and returns `Ok(None)` instead of propagating it.

use http::StatusCode;

/// The main error type for API calls.
///
/// Non-2xx responses are *not* errors: they come back as an ordinary
/// [`Response`](crate::Response) for the caller to inspect.
///
/// # Examples
///
/// ```no_run
/// use valorant_api::{Error, ValorantApi};
///
/// # async fn example() -> Result<(), Error> {
/// let api = ValorantApi::builder().build()?;
///
/// match api.server_status("eu").await {
///     Ok(Some(response)) => println!("status {}: {}", response.status, response.raw_body),
///     Ok(None) => eprintln!("rejected before sending"),
///     Err(Error::Timeout) => eprintln!("timed out on every attempt"),
///     Err(e) => eprintln!("request failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection refused, DNS failure, reset, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request timed out.
    ///
    /// Only produced when a timeout was configured on the client.
    #[error("Request timed out")]
    Timeout,

    /// Invalid configuration was provided to one of the builders.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Failed to serialize a POST body to JSON.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// [`Response::json`](crate::Response::json) could not decode the body.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// An invalid URL was provided or produced.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` for transport-level failures.
    ///
    /// Network errors and timeouts are retryable; everything else is a local
    /// problem that another attempt would not fix.
    ///
    /// # Examples
    ///
    /// ```
    /// use valorant_api::Error;
    ///
    /// assert!(Error::Timeout.is_retryable());
    /// assert!(!Error::ConfigurationError("bad".to_string()).is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) | Error::Timeout => true,
            Error::ConfigurationError(_)
            | Error::SerializationFailed(_)
            | Error::DeserializationFailed { .. }
            | Error::InvalidUrl(_) => false,
        }
    }
}

/// A caller-supplied argument outside its closed domain.
///
/// The `Display` output is the message written to the configured
/// [`Logger`](crate::logger::Logger).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("Provided country_code \"{0}\" is not valid.")]
    CountryCode(String),

    #[error("Provided filter \"{0}\" is not valid.")]
    Filter(String),

    #[error("Provided puuid \"{0}\" is not valid.")]
    Puuid(String),

    #[error("Provided region \"{0}\" is not valid.")]
    Region(String),
}

/// A specialized `Result` type for API calls.
pub type Result<T> = std::result::Result<T, Error>;
