//! HTTP session with retry-wrapped GET and POST primitives.
//!
//! [`Client`] owns the connection pool, base URL, default headers and retry
//! policy. Every request it sends goes through [`RetryPolicy::execute`], one
//! network call per attempt. Use [`ClientBuilder`] to configure one.

use crate::{metadata::RequestMetadata, retry::RetryPolicy, Error, Response, Result};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Base URL of the unofficial Valorant API.
pub const DEFAULT_BASE_URL: &str = "https://api.henrikdev.xyz";

/// User agent sent with every request unless overridden.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// An HTTP client whose requests are retried on transport failures.
///
/// The client is cheap to clone and meant to be reused; clones share the same
/// connection pool and configuration. It never inspects status codes: any
/// response that arrives is returned as-is.
///
/// # Examples
///
/// ```no_run
/// use valorant_api::{Client, RetryPolicy};
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), valorant_api::Error> {
/// let client = Client::builder()
///     .timeout(Duration::from_secs(10))
///     .retry_policy(
///         RetryPolicy::builder()
///             .max_attempts(5)
///             .initial_delay(Duration::from_millis(250))
///             .retry_predicate(valorant_api::retry::RetryOnTransportError)
///             .build()?,
///     )
///     .build()?;
///
/// let response = client
///     .get_with_query("/valorant/v1/leaderboard/eu", [("name", "Tenz"), ("tag", "NA1")])
///     .await?;
/// println!("{}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: Url,
    default_headers: HeaderMap,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The base URL every path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The retry policy wrapped around every request.
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.inner.retry_policy
    }

    /// Sends a request described by `metadata`, with an optional JSON body.
    ///
    /// The body is serialized once, before the first attempt; a serialization
    /// failure is returned without sending anything.
    pub async fn call<Req>(&self, metadata: RequestMetadata, body: Option<&Req>) -> Result<Response>
    where
        Req: Serialize + ?Sized,
    {
        let body = body
            .map(|b| serde_json::to_vec(b))
            .transpose()
            .map_err(|e| Error::SerializationFailed(e.to_string()))?;

        let url = self.build_url(&metadata);
        let metadata = &metadata;
        let url = &url;
        let body = body.as_deref();

        self.inner
            .retry_policy
            .execute(move || self.execute_request(metadata, url, body))
            .await
    }

    /// Appends the request path to the base URL's path and adds the query
    /// string.
    pub(crate) fn build_url(&self, metadata: &RequestMetadata) -> Url {
        let mut url = self.inner.base_url.clone();
        let path = format!(
            "{}/{}",
            url.path().trim_end_matches('/'),
            metadata.path.trim_start_matches('/')
        );
        url.set_path(&path);

        for (key, value) in &metadata.query_params {
            url.query_pairs_mut().append_pair(key, value);
        }

        url
    }

    /// Executes a single attempt.
    async fn execute_request(
        &self,
        metadata: &RequestMetadata,
        url: &Url,
        body: Option<&[u8]>,
    ) -> Result<Response> {
        tracing::info!("{}: {}", metadata.method, url);

        let start = Instant::now();
        let mut request = self
            .inner
            .http_client
            .request(metadata.method.clone(), url.clone());

        for (name, value) in &self.inner.default_headers {
            request = request.header(name, value);
        }

        for (name, value) in &metadata.headers {
            request = request.header(name, value);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.to_vec());
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let headers = response.headers().clone();
        let final_url = response.url().clone();
        let raw_body = response.text().await.map_err(transport_error)?;
        let latency = start.elapsed();

        tracing::debug!(
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            url = %final_url,
            "Received HTTP response"
        );

        Ok(Response::new(status, headers, raw_body, final_url, latency))
    }

    /// Makes a GET request to the given path.
    pub async fn get(&self, path: impl Into<String>) -> Result<Response> {
        let metadata = RequestMetadata::new(Method::GET, path);
        self.call::<()>(metadata, None).await
    }

    /// Makes a GET request with query parameters.
    pub async fn get_with_query<K, V>(
        &self,
        path: impl Into<String>,
        query: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Response>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let metadata = RequestMetadata::new(Method::GET, path).with_query_params(query);
        self.call::<()>(metadata, None).await
    }

    /// Makes a POST request with a JSON body.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use valorant_api::Client;
    /// use serde_json::json;
    ///
    /// # async fn example() -> Result<(), valorant_api::Error> {
    /// let client = Client::builder().build()?;
    /// let response = client
    ///     .post("/valorant/v1/raw", &json!({ "type": "matchdetails", "value": "abc" }))
    ///     .await?;
    /// println!("{}", response.raw_body);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn post<Req>(&self, path: impl Into<String>, body: &Req) -> Result<Response>
    where
        Req: Serialize + ?Sized,
    {
        let metadata = RequestMetadata::new(Method::POST, path);
        self.call(metadata, Some(body)).await
    }
}

fn transport_error(error: reqwest::Error) -> Error {
    if error.is_timeout() {
        Error::Timeout
    } else {
        Error::Network(error)
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// Defaults: base URL [`DEFAULT_BASE_URL`], `User-Agent: Mozilla/5.0`, no
/// timeout, [`RetryPolicy::default`].
pub struct ClientBuilder {
    base_url: Option<Url>,
    default_headers: HeaderMap,
    retry_policy: RetryPolicy,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(DEFAULT_USER_AGENT),
        );

        Self {
            base_url: None,
            default_headers,
            retry_policy: RetryPolicy::default(),
            timeout: None,
        }
    }

    /// Sets the base URL for all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or cannot carry a path.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = Url::parse(url.as_ref())?;
        if url.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "Base URL cannot carry a path: {}",
                url
            )));
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Replaces the `User-Agent` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid header value.
    pub fn user_agent(self, user_agent: impl AsRef<str>) -> Result<Self> {
        self.default_header(header::USER_AGENT.as_str(), user_agent)
    }

    /// Sets the retry policy for every request.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Sets a per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url,
                default_headers: self.default_headers,
                retry_policy: self.retry_policy,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = Client::builder().build().unwrap();

        assert_eq!(client.base_url().as_str(), "https://api.henrikdev.xyz/");
        assert_eq!(client.retry_policy().max_attempts(), 3);
        assert_eq!(
            client.inner.default_headers.get(header::USER_AGENT).unwrap(),
            "Mozilla/5.0"
        );
    }

    #[test]
    fn test_build_url() {
        let client = Client::builder()
            .base_url("http://localhost:8080")
            .unwrap()
            .build()
            .unwrap();

        let metadata = RequestMetadata::new(Method::GET, "/valorant/v1/leaderboard/eu")
            .with_query_param("name", "Tenz Fan")
            .with_query_param("tag", "NA1");

        assert_eq!(
            client.build_url(&metadata).as_str(),
            "http://localhost:8080/valorant/v1/leaderboard/eu?name=Tenz+Fan&tag=NA1"
        );

        let bare = RequestMetadata::new(Method::GET, "/valorant/v1/content");
        assert_eq!(
            client.build_url(&bare).as_str(),
            "http://localhost:8080/valorant/v1/content"
        );
    }

    #[test]
    fn test_build_url_keeps_base_path() {
        let metadata = RequestMetadata::new(Method::GET, "/valorant/v1/content");

        for base in ["http://localhost:8080/mirror", "http://localhost:8080/mirror/"] {
            let client = Client::builder().base_url(base).unwrap().build().unwrap();
            assert_eq!(
                client.build_url(&metadata).as_str(),
                "http://localhost:8080/mirror/valorant/v1/content"
            );
        }

        let client = Client::builder()
            .base_url("http://localhost:8080/mirror")
            .unwrap()
            .build()
            .unwrap();
        let relative = RequestMetadata::new(Method::GET, "valorant/v1/content");
        assert_eq!(
            client.build_url(&relative).as_str(),
            "http://localhost:8080/mirror/valorant/v1/content"
        );
    }

    #[test]
    fn test_rejects_bad_base_url() {
        assert!(matches!(
            Client::builder().base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
        assert!(matches!(
            Client::builder().base_url("mailto:someone@example.com"),
            Err(Error::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_user_agent_override() {
        let client = Client::builder()
            .user_agent("valorant-api-tests")
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(
            client.inner.default_headers.get(header::USER_AGENT).unwrap(),
            "valorant-api-tests"
        );
    }
}
