//! Endpoint descriptors and path segment encoding.

use http::Method;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left as-is in free-text path segments (player names, tags,
/// match ids). Everything else is percent-encoded as UTF-8.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'@')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'!')
    .remove(b'+')
    .remove(b'=')
    .remove(b':')
    .remove(b';')
    .remove(b',')
    .remove(b'?')
    .remove(b'/')
    .remove(b'\'');

/// Percent-encodes a free-text path segment.
///
/// # Examples
///
/// ```
/// use valorant_api::endpoint::encode_segment;
///
/// assert_eq!(encode_segment("Tenz"), "Tenz");
/// assert_eq!(encode_segment("Sen Tenz"), "Sen%20Tenz");
/// assert_eq!(encode_segment("ÆON"), "%C3%86ON");
/// ```
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// A remote endpoint: HTTP method plus a path template with `{name}`
/// placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: Method,
    pub template: &'static str,
}

impl Endpoint {
    const fn get(template: &'static str) -> Self {
        Self {
            method: Method::GET,
            template,
        }
    }

    /// Substitutes each `{key}` in the template with its value.
    ///
    /// Values are inserted verbatim; encode free text with [`encode_segment`]
    /// first.
    ///
    /// # Examples
    ///
    /// ```
    /// use valorant_api::endpoint::SERVER_STATUS;
    ///
    /// assert_eq!(SERVER_STATUS.render(&[("region", "eu")]), "/valorant/v1/status/eu");
    /// ```
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        values
            .iter()
            .fold(self.template.to_string(), |path, (key, value)| {
                path.replace(&format!("{{{}}}", key), value)
            })
    }
}

pub const ACCOUNT: Endpoint = Endpoint::get("/valorant/v1/account/{name}/{tag}");
pub const MMR: Endpoint = Endpoint::get("/valorant/v2/mmr/{name}/{tag}");
pub const MMR_BY_PUUID: Endpoint = Endpoint::get("/valorant/v2/by-puuid/mmr/{region}/{puuid}");
pub const MMR_HISTORY: Endpoint = Endpoint::get("/valorant/v1/mmr-history/{region}/{name}/{tag}");
pub const MMR_HISTORY_BY_PUUID: Endpoint =
    Endpoint::get("/valorant/v1/by-puuid/mmr-history/{region}/{puuid}");
pub const MATCH_HISTORY: Endpoint = Endpoint::get("/valorant/v3/matches/{region}/{name}/{tag}");
pub const MATCH_HISTORY_BY_PUUID: Endpoint =
    Endpoint::get("/valorant/v3/by-puuid/matches/{region}/{puuid}");
pub const MATCH: Endpoint = Endpoint::get("/valorant/v2/match/{match_id}");
pub const WEBSITE_ARTICLES: Endpoint = Endpoint::get("/valorant/v1/website/{country_code}");
pub const LEADERBOARD: Endpoint = Endpoint::get("/valorant/v1/leaderboard/{region}");
pub const SERVER_STATUS: Endpoint = Endpoint::get("/valorant/v1/status/{region}");
pub const CONTENT: Endpoint = Endpoint::get("/valorant/v1/content");
pub const STORE_OFFERS: Endpoint = Endpoint::get("/valorant/v1/store-offers");
pub const STORE_FEATURED: Endpoint = Endpoint::get("/valorant/v1/store-featured");
