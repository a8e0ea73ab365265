//! Integration tests using wiremock to simulate the API.

use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::Level;
use valorant_api::logger::Logger;
use valorant_api::retry::RetryOnTransportError;
use valorant_api::{Error, RetryPolicy, ValorantApi};
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PUUID: &str = "550e8400-e29b-41d4-a716-446655440000";

#[derive(Clone, Default)]
struct RecordingLogger(Arc<Mutex<Vec<(Level, String)>>>);

impl RecordingLogger {
    fn entries(&self) -> Vec<(Level, String)> {
        self.0.lock().unwrap().clone()
    }
}

impl Logger for RecordingLogger {
    fn log(&self, level: Level, message: &str) {
        self.0.lock().unwrap().push((level, message.to_string()));
    }
}

fn fast_retries(max_attempts: usize) -> RetryPolicy {
    RetryPolicy::builder()
        .max_attempts(max_attempts)
        .initial_delay(Duration::from_millis(10))
        .backoff_multiplier(2.0)
        .retry_predicate(RetryOnTransportError)
        .build()
        .unwrap()
}

fn api_for(server: &MockServer, logger: RecordingLogger) -> ValorantApi {
    ValorantApi::builder()
        .base_url(server.uri())
        .unwrap()
        .retry_policy(fast_retries(3))
        .logger(logger)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_account_issues_single_get() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v1/account/Tenz/NA1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 200})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, RecordingLogger::default());
    let response = api.account("Tenz", "NA1").await.unwrap().unwrap();

    assert_eq!(response.status.as_u16(), 200);
    assert_eq!(response.raw_body, r#"{"status":200}"#);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
    assert_eq!(requests[0].headers.get("user-agent").unwrap(), "Mozilla/5.0");
}

#[tokio::test]
async fn test_name_and_tag_are_percent_encoded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v3/matches/eu/Sen%20Tenz/%3C3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, RecordingLogger::default());
    let response = api.match_history("eu", "Sen Tenz", "<3").await.unwrap();

    assert!(response.is_some());
}

#[tokio::test]
async fn test_query_and_fragment_characters_are_escaped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v1/account/a%3Fb%23c/t/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, RecordingLogger::default());
    assert!(api.account("a?b#c", "t/1").await.unwrap().is_some());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
    assert_eq!(requests[0].url.fragment(), None);
}

#[tokio::test]
async fn test_base_url_path_is_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mirror/valorant/v1/content"))
        .respond_with(ResponseTemplate::new(200).set_body_string("mirrored"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = ValorantApi::builder()
        .base_url(format!("{}/mirror", mock_server.uri()))
        .unwrap()
        .build()
        .unwrap();

    let response = api.content().await.unwrap().unwrap();
    assert_eq!(response.raw_body, "mirrored");
}

#[tokio::test]
async fn test_request_line_reaches_logger() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v1/content"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let logger = RecordingLogger::default();
    let api = api_for(&mock_server, logger.clone());
    api.content().await.unwrap().unwrap();

    assert_eq!(
        logger.entries(),
        vec![(Level::INFO, format!("GET: {}/valorant/v1/content", mock_server.uri()))]
    );
}

#[tokio::test]
async fn test_invalid_region_makes_no_call() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let logger = RecordingLogger::default();
    let api = api_for(&mock_server, logger.clone());

    assert!(api.server_status("us").await.unwrap().is_none());
    assert!(api.leaderboard("NA", Some("Tenz"), Some("NA1")).await.unwrap().is_none());

    assert!(mock_server.received_requests().await.unwrap().is_empty());
    assert_eq!(
        logger.entries(),
        vec![
            (Level::ERROR, "Provided region \"us\" is not valid.".to_string()),
            (Level::ERROR, "Provided region \"NA\" is not valid.".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_invalid_puuid_and_act_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let logger = RecordingLogger::default();
    let api = api_for(&mock_server, logger.clone());

    let bad_version = "550e8400-e29b-61d4-a716-446655440000";
    assert!(api.mmr_history_by_puuid("na", bad_version).await.unwrap().is_none());
    assert!(api.mmr_by_puuid("na", PUUID, Some("e7a3")).await.unwrap().is_none());

    assert_eq!(
        logger.entries(),
        vec![
            (Level::ERROR, format!("Provided puuid \"{bad_version}\" is not valid.")),
            (Level::WARN, "Provided filter \"e7a3\" is not valid.".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_mmr_by_puuid_sends_act_filter() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/valorant/v2/by-puuid/mmr/ap/{PUUID}")))
        .and(query_param("filter", "e2a3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, RecordingLogger::default());
    let response = api.mmr_by_puuid("ap", PUUID, Some("e2a3")).await.unwrap();

    assert!(response.is_some());
}

#[tokio::test]
async fn test_mmr_by_puuid_without_filter_has_no_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/valorant/v2/by-puuid/mmr/kr/{PUUID}")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, RecordingLogger::default());
    api.mmr_by_puuid("kr", PUUID, None).await.unwrap().unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_unknown_article_filter_degrades_to_unfiltered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v1/website/en-us"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let logger = RecordingLogger::default();
    let api = api_for(&mock_server, logger.clone());

    api.website_articles("en-us", Some("patch_notes")).await.unwrap().unwrap();
    api.website_articles("en-us", Some("esports")).await.unwrap().unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
    assert_eq!(requests[1].url.query(), Some("filter=esports"));
    let uri = mock_server.uri();
    assert_eq!(
        logger.entries(),
        vec![
            (Level::WARN, "Provided filter \"patch_notes\" is not valid.".to_string()),
            (Level::INFO, format!("GET: {uri}/valorant/v1/website/en-us")),
            (Level::INFO, format!("GET: {uri}/valorant/v1/website/en-us?filter=esports")),
        ]
    );
}

#[tokio::test]
async fn test_invalid_country_code() {
    let mock_server = MockServer::start().await;
    let logger = RecordingLogger::default();
    let api = api_for(&mock_server, logger.clone());

    assert!(api.website_articles("en-au", None).await.unwrap().is_none());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
    assert_eq!(
        logger.entries(),
        vec![(Level::ERROR, "Provided country_code \"en-au\" is not valid.".to_string())]
    );
}

#[tokio::test]
async fn test_leaderboard_query_needs_name_and_tag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v1/leaderboard/eu"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, RecordingLogger::default());

    api.leaderboard("eu", Some("Tenz"), None).await.unwrap().unwrap();
    api.leaderboard("eu", Some("Sen Tenz"), Some("NA1")).await.unwrap().unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
    assert_eq!(requests[1].url.query(), Some("name=Sen+Tenz&tag=NA1"));
}

#[tokio::test]
async fn test_static_endpoints() {
    let mock_server = MockServer::start().await;

    for endpoint in [
        "/valorant/v1/content",
        "/valorant/v1/store-offers",
        "/valorant/v1/store-featured",
        "/valorant/v1/status/na",
        "/valorant/v2/match/0a1b2c3d-0000-4000-8000-000000000000",
        "/valorant/v2/mmr/Tenz/NA1",
    ] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_string(endpoint))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let api = api_for(&mock_server, RecordingLogger::default());

    assert_eq!(api.content().await.unwrap().unwrap().raw_body, "/valorant/v1/content");
    assert_eq!(
        api.store_offers().await.unwrap().unwrap().raw_body,
        "/valorant/v1/store-offers"
    );
    assert_eq!(
        api.store_featured().await.unwrap().unwrap().raw_body,
        "/valorant/v1/store-featured"
    );
    assert_eq!(
        api.server_status("na").await.unwrap().unwrap().raw_body,
        "/valorant/v1/status/na"
    );
    assert!(api
        .match_data("0a1b2c3d-0000-4000-8000-000000000000")
        .await
        .unwrap()
        .is_some());
    assert!(api.mmr("Tenz", "NA1").await.unwrap().is_some());
}

#[tokio::test]
async fn test_http_errors_are_returned_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v1/status/eu"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, RecordingLogger::default());
    let response = api.server_status("eu").await.unwrap().unwrap();

    assert_eq!(response.status.as_u16(), 503);
    assert_eq!(response.raw_body, "Service unavailable");
    assert!(!response.is_success());
}

#[tokio::test]
async fn test_connection_failure_is_retried_then_surfaced() {
    // Reserve a port, then free it so nothing is listening there.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let retries = Arc::new(AtomicUsize::new(0));
    let retries_clone = retries.clone();
    let policy = RetryPolicy::builder()
        .max_attempts(3)
        .initial_delay(Duration::from_millis(5))
        .retry_predicate(RetryOnTransportError)
        .on_retry(move |_, _: &Error, _| {
            retries_clone.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let api = ValorantApi::builder()
        .base_url(format!("http://127.0.0.1:{port}"))
        .unwrap()
        .retry_policy(policy)
        .build()
        .unwrap();

    let result = api.content().await;

    assert!(matches!(result, Err(Error::Network(_))), "got {:?}", result);
    assert_eq!(retries.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_timeouts_are_retried() {
    let mock_server = MockServer::start().await;
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    // First two requests hang past the client timeout, third answers at once
    Mock::given(method("GET"))
        .and(path("/valorant/v1/content"))
        .respond_with(move |_req: &wiremock::Request| {
            let count = attempt_count_clone.fetch_add(1, Ordering::SeqCst);
            if count < 2 {
                ResponseTemplate::new(200).set_delay(Duration::from_secs(2))
            } else {
                ResponseTemplate::new(200).set_body_string("content")
            }
        })
        .mount(&mock_server)
        .await;

    let api = ValorantApi::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .timeout(Duration::from_millis(200))
        .retry_policy(fast_retries(3))
        .build()
        .unwrap();

    let response = api.content().await.unwrap().unwrap();

    assert_eq!(response.raw_body, "content");
    assert_eq!(attempt_count.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_timeout_exhaustion_surfaces_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v1/content"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let api = ValorantApi::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .timeout(Duration::from_millis(100))
        .retry_policy(fast_retries(2))
        .build()
        .unwrap();

    let result = api.content().await;

    assert!(matches!(result, Err(Error::Timeout)), "got {:?}", result);
}

#[tokio::test]
async fn test_post_sends_json_body() {
    let mock_server = MockServer::start().await;
    let body = json!({"type": "matchdetails", "value": "abc"});

    Mock::given(method("POST"))
        .and(path("/valorant/v1/raw"))
        .and(header("content-type", "application/json"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = api_for(&mock_server, RecordingLogger::default());
    let response = api.client().post("/valorant/v1/raw", &body).await.unwrap();

    assert_eq!(response.status.as_u16(), 201);
    assert_eq!(response.raw_body, "created");
}

#[tokio::test]
async fn test_post_retries_connection_failure() {
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let retries = Arc::new(AtomicUsize::new(0));
    let retries_clone = retries.clone();
    let policy = RetryPolicy::builder()
        .max_attempts(4)
        .initial_delay(Duration::from_millis(5))
        .retry_predicate(RetryOnTransportError)
        .on_retry(move |_, _: &Error, _| {
            retries_clone.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    let api = ValorantApi::builder()
        .base_url(format!("http://127.0.0.1:{port}"))
        .unwrap()
        .retry_policy(policy)
        .build()
        .unwrap();

    let result = api
        .client()
        .post("/valorant/v1/raw", &json!({"type": "matchdetails"}))
        .await;

    assert!(matches!(result, Err(Error::Network(_))), "got {:?}", result);
    assert_eq!(retries.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_custom_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/valorant/v1/content"))
        .and(header("user-agent", "valorant-api-tests"))
        .and(header("x-client", "integration"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let api = ValorantApi::builder()
        .base_url(mock_server.uri())
        .unwrap()
        .user_agent("valorant-api-tests")
        .unwrap()
        .default_header("x-client", "integration")
        .unwrap()
        .build()
        .unwrap();

    assert!(api.content().await.unwrap().is_some());
}
