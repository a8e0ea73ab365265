//! The API facade: one method per remote endpoint.
//!
//! Every method validates its closed-domain arguments first. A rejected
//! argument is reported through the configured [`Logger`] and the method
//! returns `Ok(None)` without touching the network. Otherwise the path and
//! query are assembled, the request line is logged at INFO and the request
//! goes out through the retry-wrapped GET of the underlying [`Client`]; the
//! response comes back untouched as `Ok(Some(response))`.

use crate::{
    client::{Client, ClientBuilder},
    endpoint::{self, encode_segment, Endpoint},
    error::InvalidInput,
    logger::{Logger, NoOpLogger},
    metadata::RequestMetadata,
    retry::RetryPolicy,
    validate::{is_valid_act_filter, is_valid_country_code, is_valid_puuid, is_valid_region, ArticleFilter},
    Response, Result,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

/// Client for the unofficial Valorant API.
///
/// Methods return `Result<Option<Response>>`:
///
/// - `Ok(None)`: an argument was rejected and nothing was sent,
/// - `Ok(Some(response))`: the API answered, with whatever status,
/// - `Err(e)`: the request failed on every attempt.
///
/// # Examples
///
/// ```no_run
/// use valorant_api::{logger::TracingLogger, ValorantApi};
///
/// # async fn example() -> Result<(), valorant_api::Error> {
/// let api = ValorantApi::builder().logger(TracingLogger).build()?;
///
/// match api.mmr_history("eu", "Tenz", "NA1").await? {
///     Some(response) => println!("{}: {}", response.status, response.raw_body),
///     None => eprintln!("invalid region"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ValorantApi {
    client: Client,
    logger: Arc<dyn Logger>,
}

impl ValorantApi {
    /// Creates a builder with the default base URL, headers, retry policy
    /// and a [`NoOpLogger`].
    pub fn builder() -> ValorantApiBuilder {
        ValorantApiBuilder::new()
    }

    /// Wraps an already configured [`Client`].
    pub fn from_client(client: Client, logger: impl Logger + 'static) -> Self {
        Self {
            client,
            logger: Arc::new(logger),
        }
    }

    /// The underlying HTTP client, for the POST primitive or endpoints this
    /// facade does not cover.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// General account data such as puuid and account level.
    pub async fn account(&self, name: &str, tag: &str) -> Result<Option<Response>> {
        let name = encode_segment(name);
        let tag = encode_segment(tag);
        self.send(&endpoint::ACCOUNT, &[("name", name.as_str()), ("tag", tag.as_str())], Vec::new())
            .await
    }

    /// Current tier and last MMR change of a player.
    pub async fn mmr(&self, name: &str, tag: &str) -> Result<Option<Response>> {
        let name = encode_segment(name);
        let tag = encode_segment(tag);
        self.send(&endpoint::MMR, &[("name", name.as_str()), ("tag", tag.as_str())], Vec::new())
            .await
    }

    /// Current tier and last MMR change of a player, by puuid, optionally
    /// restricted to one act.
    pub async fn mmr_by_puuid(
        &self,
        region: &str,
        puuid: &str,
        filter: Option<&str>,
    ) -> Result<Option<Response>> {
        if !self.check_region(region) || !self.check_puuid(puuid) {
            return Ok(None);
        }

        if !is_valid_act_filter(filter) {
            self.reject(Level::WARN, InvalidInput::Filter(filter.unwrap_or_default().to_string()));
            return Ok(None);
        }

        let query = filter.map(|f| ("filter", f.to_string())).into_iter().collect();
        self.send(
            &endpoint::MMR_BY_PUUID,
            &[("region", region), ("puuid", puuid)],
            query,
        )
        .await
    }

    /// MMR history over the last competitive matches.
    pub async fn mmr_history(&self, region: &str, name: &str, tag: &str) -> Result<Option<Response>> {
        if !self.check_region(region) {
            return Ok(None);
        }

        let name = encode_segment(name);
        let tag = encode_segment(tag);
        self.send(
            &endpoint::MMR_HISTORY,
            &[("region", region), ("name", name.as_str()), ("tag", tag.as_str())],
            Vec::new(),
        )
        .await
    }

    /// MMR history over the last competitive matches, by puuid.
    pub async fn mmr_history_by_puuid(&self, region: &str, puuid: &str) -> Result<Option<Response>> {
        if !self.check_region(region) || !self.check_puuid(puuid) {
            return Ok(None);
        }

        self.send(
            &endpoint::MMR_HISTORY_BY_PUUID,
            &[("region", region), ("puuid", puuid)],
            Vec::new(),
        )
        .await
    }

    /// The last matches played by a player.
    pub async fn match_history(&self, region: &str, name: &str, tag: &str) -> Result<Option<Response>> {
        if !self.check_region(region) {
            return Ok(None);
        }

        let name = encode_segment(name);
        let tag = encode_segment(tag);
        self.send(
            &endpoint::MATCH_HISTORY,
            &[("region", region), ("name", name.as_str()), ("tag", tag.as_str())],
            Vec::new(),
        )
        .await
    }

    /// The last matches played by a player, by puuid.
    pub async fn match_history_by_puuid(&self, region: &str, puuid: &str) -> Result<Option<Response>> {
        if !self.check_region(region) || !self.check_puuid(puuid) {
            return Ok(None);
        }

        self.send(
            &endpoint::MATCH_HISTORY_BY_PUUID,
            &[("region", region), ("puuid", puuid)],
            Vec::new(),
        )
        .await
    }

    /// Full data of a single match.
    pub async fn match_data(&self, match_id: &str) -> Result<Option<Response>> {
        let match_id = encode_segment(match_id);
        self.send(&endpoint::MATCH, &[("match_id", match_id.as_str())], Vec::new())
            .await
    }

    /// Website articles for a locale.
    ///
    /// An unknown `filter` is not fatal: it is logged as a warning and the
    /// articles are fetched unfiltered.
    pub async fn website_articles(
        &self,
        country_code: &str,
        filter: Option<&str>,
    ) -> Result<Option<Response>> {
        if !is_valid_country_code(country_code) {
            self.reject(Level::ERROR, InvalidInput::CountryCode(country_code.to_string()));
            return Ok(None);
        }

        let mut query = Vec::new();
        if let Some(filter) = filter {
            match filter.parse::<ArticleFilter>() {
                Ok(filter) => query.push(("filter", filter.as_str().to_string())),
                Err(_) => self.reject(Level::WARN, InvalidInput::Filter(filter.to_string())),
            }
        }

        self.send(
            &endpoint::WEBSITE_ARTICLES,
            &[("country_code", country_code)],
            query,
        )
        .await
    }

    /// Competitive leaderboard of a region.
    ///
    /// `name` and `tag` narrow the result to one player; they are only sent
    /// when both are given.
    pub async fn leaderboard(
        &self,
        region: &str,
        name: Option<&str>,
        tag: Option<&str>,
    ) -> Result<Option<Response>> {
        if !self.check_region(region) {
            return Ok(None);
        }

        let query = match (name, tag) {
            (Some(name), Some(tag)) => vec![("name", name.to_string()), ("tag", tag.to_string())],
            _ => Vec::new(),
        };

        self.send(&endpoint::LEADERBOARD, &[("region", region)], query)
            .await
    }

    /// Maintenance and incident status of a region's servers.
    pub async fn server_status(&self, region: &str) -> Result<Option<Response>> {
        if !self.check_region(region) {
            return Ok(None);
        }

        self.send(&endpoint::SERVER_STATUS, &[("region", region)], Vec::new())
            .await
    }

    /// In-game content: characters, maps, skins, and so on.
    pub async fn content(&self) -> Result<Option<Response>> {
        self.send(&endpoint::CONTENT, &[], Vec::new()).await
    }

    /// All store offers.
    pub async fn store_offers(&self) -> Result<Option<Response>> {
        self.send(&endpoint::STORE_OFFERS, &[], Vec::new()).await
    }

    /// The featured in-game shop bundle.
    pub async fn store_featured(&self) -> Result<Option<Response>> {
        self.send(&endpoint::STORE_FEATURED, &[], Vec::new()).await
    }

    fn check_region(&self, region: &str) -> bool {
        if is_valid_region(region) {
            return true;
        }
        self.reject(Level::ERROR, InvalidInput::Region(region.to_string()));
        false
    }

    fn check_puuid(&self, puuid: &str) -> bool {
        if is_valid_puuid(puuid) {
            return true;
        }
        self.reject(Level::ERROR, InvalidInput::Puuid(puuid.to_string()));
        false
    }

    fn reject(&self, level: Level, invalid: InvalidInput) {
        self.logger.log(level, &invalid.to_string());
    }

    async fn send(
        &self,
        endpoint: &Endpoint,
        segments: &[(&str, &str)],
        query: Vec<(&'static str, String)>,
    ) -> Result<Option<Response>> {
        let path = endpoint.render(segments);
        let metadata = RequestMetadata::new(endpoint.method.clone(), path).with_query_params(query);

        let url = self.client.build_url(&metadata);
        self.logger.info(&format!("{}: {}", metadata.method, url));

        self.client.call::<()>(metadata, None).await.map(Some)
    }
}

impl std::fmt::Debug for ValorantApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValorantApi")
            .field("base_url", &self.client.base_url().as_str())
            .finish_non_exhaustive()
    }
}

/// Builder for a [`ValorantApi`].
///
/// Session settings are forwarded to a [`ClientBuilder`]; the logger is the
/// only facade-level setting.
pub struct ValorantApiBuilder {
    client: ClientBuilder,
    logger: Arc<dyn Logger>,
}

impl ValorantApiBuilder {
    /// Creates a builder with default session settings and a [`NoOpLogger`].
    pub fn new() -> Self {
        Self {
            client: ClientBuilder::new(),
            logger: Arc::new(NoOpLogger),
        }
    }

    /// Points the client at another host, e.g. a mirror or a test server.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.client = self.client.base_url(url)?;
        Ok(self)
    }

    /// Replaces the `User-Agent` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid header value.
    pub fn user_agent(mut self, user_agent: impl AsRef<str>) -> Result<Self> {
        self.client = self.client.user_agent(user_agent)?;
        Ok(self)
    }

    /// Adds a header sent with every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        self.client = self.client.default_header(name, value)?;
        Ok(self)
    }

    /// Sets a per-attempt request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.timeout(timeout);
        self
    }

    /// Sets the retry policy wrapped around every request.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.client = self.client.retry_policy(policy);
        self
    }

    /// Sets where request lines and rejected arguments are reported.
    pub fn logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Arc::new(logger);
        self
    }

    /// Builds the configured `ValorantApi`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn build(self) -> Result<ValorantApi> {
        Ok(ValorantApi {
            client: self.client.build()?,
            logger: self.logger,
        })
    }
}

impl Default for ValorantApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}
