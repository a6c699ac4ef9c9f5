//! Integration tests for `TwitterClient` recent search.

use opine_pipeline::{build_http_client, DocumentKind, PipelineError, TweetSource, TwitterClient};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TwitterClient {
    let client = build_http_client(5, "opine-test/0.1").expect("failed to build test client");
    TwitterClient::new(client, base_url, "bearer-token")
}

#[tokio::test]
async fn search_recent_returns_tweet_documents() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("query", "work-life balance"))
        .and(query_param("max_results", "50"))
        .and(header("authorization", "Bearer bearer-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "101", "text": "Flexible hours changed my life." },
                { "id": "102", "text": "Burnout is real." }
            ],
            "meta": { "result_count": 2 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let docs = test_client(&server.uri())
        .search_recent("work-life balance", 50)
        .await
        .expect("search should succeed");

    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].text, "Flexible hours changed my life.");
    assert_eq!(docs[0].source, "https://x.com/i/web/status/101");
    assert!(docs.iter().all(|d| d.kind == DocumentKind::Tweet));
}

#[tokio::test]
async fn search_recent_clamps_max_results_to_api_bounds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .and(query_param("max_results", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "meta": { "result_count": 0 } })))
        .expect(1)
        .mount(&server)
        .await;

    let docs = test_client(&server.uri())
        .search_recent("remote work", 3)
        .await
        .unwrap();
    assert!(docs.is_empty());
}

#[tokio::test]
async fn search_recent_maps_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/search/recent"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search_recent("remote work", 50)
        .await
        .unwrap_err();
    assert!(
        matches!(err, PipelineError::Twitter(ref m) if m.contains("429")),
        "got: {err:?}"
    );
}
