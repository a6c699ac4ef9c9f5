//! Integration tests for `ArticleFetcher` against a wiremock server.

use opine_pipeline::{build_http_client, ArticleFetcher, Fetcher, PipelineError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_fetcher() -> ArticleFetcher {
    let client = build_http_client(5, "opine-test/0.1").expect("failed to build test client");
    ArticleFetcher::new(client)
}

#[tokio::test]
async fn fetch_returns_paragraph_text_joined_by_newlines() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string("<p>X</p><p>Y</p>"),
        )
        .mount(&server)
        .await;

    let text = test_fetcher()
        .fetch(&format!("{}/article", server.uri()))
        .await
        .expect("fetch should succeed");

    assert_eq!(text, "X\nY");
}

#[tokio::test]
async fn fetch_ignores_markup_outside_paragraphs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><nav>Menu</nav><p>This is a test article.</p></body></html>",
        ))
        .mount(&server)
        .await;

    let text = test_fetcher()
        .fetch(&format!("{}/article", server.uri()))
        .await
        .unwrap();

    assert!(text.contains("This is a test article."));
    assert!(!text.contains("Menu"));
}

#[tokio::test]
async fn fetch_keeps_unclosed_paragraphs_and_decodes_entities() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/article"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><p>Caf&eacute; culture.<p>Hours &ndash; fewer.</body></html>",
        ))
        .mount(&server)
        .await;

    let text = test_fetcher()
        .fetch(&format!("{}/article", server.uri()))
        .await
        .unwrap();

    assert_eq!(text, "Café culture.\nHours \u{2013} fewer.");
}

#[tokio::test]
async fn fetch_maps_non_success_status_to_fetch_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/missing", server.uri());
    let err = test_fetcher().fetch(&url).await.unwrap_err();

    assert!(
        matches!(err, PipelineError::FetchStatus { status: 404, url: ref u } if *u == url),
        "expected FetchStatus(404), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_maps_connection_failure_to_fetch() {
    // Port 9 (discard) is not listening on test hosts.
    let err = test_fetcher()
        .fetch("http://127.0.0.1:9/article")
        .await
        .unwrap_err();

    assert!(
        matches!(err, PipelineError::Fetch { .. }),
        "expected Fetch, got: {err:?}"
    );
}
