//! Raw HTTP response returned by every call.
//!
//! The crate never interprets the payload: status codes, headers and the body
//! are handed back as received, together with the final URL and the latency of
//! the attempt that produced them.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// A response as received from the API, whatever its status.
///
/// # Examples
///
/// ```no_run
/// use valorant_api::ValorantApi;
///
/// # async fn example() -> Result<(), valorant_api::Error> {
/// let api = ValorantApi::builder().build()?;
///
/// if let Some(response) = api.account("Tenz", "NA1").await? {
///     if response.is_success() {
///         let body: serde_json::Value = response.json()?;
///         println!("puuid: {}", body["data"]["puuid"]);
///     } else {
///         eprintln!("{} from {}: {}", response.status, response.url, response.raw_body);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The response body as text.
    pub raw_body: String,

    /// The URL the request was sent to, including the query string.
    pub url: Url,

    /// Time from sending the successful attempt to reading its body.
    pub latency: Duration,
}

impl Response {
    /// Creates a new `Response`.
    pub fn new(
        status: StatusCode,
        headers: HeaderMap,
        raw_body: String,
        url: Url,
        latency: Duration,
    ) -> Self {
        Self {
            status,
            headers,
            raw_body,
            url,
            latency,
        }
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Returns a header value by name, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Returns the body text.
    pub fn text(&self) -> &str {
        &self.raw_body
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeserializationFailed`] with the raw body if the
    /// payload does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.raw_body).map_err(|e| Error::DeserializationFailed {
            raw_response: self.raw_body.clone(),
            serde_error: e.to_string(),
            status: self.status,
        })
    }
}
