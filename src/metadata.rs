//! Request metadata.

use http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Everything needed to dispatch one request, minus the body.
///
/// Built fresh for every call and dropped when the call returns.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path, already percent-encoded, relative to the base URL.
    pub path: String,

    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Query parameters, in the order they are appended to the URL.
    pub query_params: Vec<(String, String)>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query_params: Vec::new(),
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Appends a query parameter.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Appends several query parameters.
    pub fn with_query_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query_params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_keep_insertion_order() {
        let metadata = RequestMetadata::new(Method::GET, "/valorant/v1/leaderboard/eu")
            .with_query_param("name", "Tenz")
            .with_query_params([("tag", "NA1")]);

        assert_eq!(
            metadata.query_params,
            vec![
                ("name".to_string(), "Tenz".to_string()),
                ("tag".to_string(), "NA1".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_header_is_configuration_error() {
        let result = RequestMetadata::new(Method::GET, "/").with_header("bad header", "x");
        assert!(matches!(result, Err(crate::Error::ConfigurationError(_))));
    }
}
