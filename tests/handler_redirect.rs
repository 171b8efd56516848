mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use shorty::api::handlers::redirect_handler;
use shorty::state::{AppState, SiteSettings};

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{code}", get(redirect_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_redirect_success() {
    let (state, _store, mut rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/target").await;
    let server = server(state);

    let response = server
        .get(&format!("/{}", link.id))
        .add_header("Referer", "https://News.Example.org/post/1")
        .await;

    assert_eq!(response.status_code(), 301);
    assert_eq!(response.header("location"), "https://example.com/target");

    let event = rx.try_recv().expect("hit should be queued");
    assert_eq!(event.code(), link.id);
    assert_eq!(event.request.source_key(), "news.example.org");
}

#[tokio::test]
async fn test_redirect_classifies_country() {
    let (state, _store, mut rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/").await;
    let server = server(state);

    server
        .get(&format!("/{}", link.id))
        .add_header("CF-IPCountry", "de")
        .await;

    let event = rx.try_recv().unwrap();
    assert_eq!(event.request.source_key(), "DE");
}

#[tokio::test]
async fn test_redirect_not_found() {
    let (state, _store, mut rx) = common::create_test_state();
    let server = server(state);

    let response = server.get("/nope1").await;

    response.assert_status_not_found();
    assert!(response.text().contains("No URL was found"));
    assert!(rx.try_recv().is_err(), "unknown codes are not counted");
}

#[tokio::test]
async fn test_redirect_malformed_code_not_found() {
    let (state, _store, mut rx) = common::create_test_state();
    let server = server(state);

    for path in ["/ab", "/abcdefghijklmnop", "/ab%2Ede"] {
        let response = server.get(path).await;
        response.assert_status_not_found();
        assert!(response.text().contains("No URL was found"));
    }
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_redirect_not_found_uses_redirect_404() {
    let (state, _store, _rx) = common::create_test_state_with(SiteSettings {
        redirect_404: Some("https://example.com/missing?u=$gosURL".to_string()),
        base_url: Some("http://sho.rt".to_string()),
        ..SiteSettings::default()
    });
    let server = server(state);

    let response = server.get("/nope1").await;

    assert_eq!(response.status_code(), 307);
    assert_eq!(
        response.header("location"),
        "https://example.com/missing?u=http%3A%2F%2Fsho.rt%2Fnope1"
    );
}

#[tokio::test]
async fn test_stats_page() {
    let (state, store, mut rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/page").await;
    common::record_hits(&store, &link, 3, Some("google.com"), chrono::Utc::now()).await;
    let server = server(state);

    let response = server.get(&format!("/{}+", link.id)).await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("example.com"));
    assert!(body.contains("just now"));
    assert!(body.contains("3 hits"));
    assert!(body.contains("google.com"));
    assert!(rx.try_recv().is_err(), "viewing stats is not a hit");
}

#[tokio::test]
async fn test_stats_page_not_found() {
    let (state, _store, _rx) = common::create_test_state();
    let server = server(state);

    server.get("/nope1+").await.assert_status_not_found();
}
