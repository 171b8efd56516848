mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use chrono::{Duration, Utc};
use shorty::api::handlers::stats_handler;
use shorty::state::AppState;

fn server(state: AppState) -> TestServer {
    let app = Router::new()
        .route("/{code}/{what}", get(stats_handler))
        .with_state(state);

    TestServer::new(app).unwrap()
}

#[tokio::test]
async fn test_window_counts() {
    let (state, store, _rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/").await;
    let now = Utc::now();
    common::record_hits(&store, &link, 4, None, now).await;
    common::record_hits(&store, &link, 2, None, now - Duration::days(400)).await;
    let server = server(state);

    let all = server.get(&format!("/{}+/all", link.id)).await;
    all.assert_status_ok();
    let json = all.json::<serde_json::Value>();
    assert_eq!(json["code"], link.id.as_str());
    assert_eq!(json["granularity"], "all");
    assert_eq!(json["count"], 6);

    let year = server.get(&format!("/{}+/year", link.id)).await;
    assert_eq!(year.json::<serde_json::Value>()["count"], 4);

    let hour = server.get(&format!("/{}+/hour", link.id)).await;
    let count = hour.json::<serde_json::Value>()["count"].as_i64().unwrap();
    // The clock may have crossed an hour boundary since recording.
    assert!(count == 4 || count == 0);
}

#[tokio::test]
async fn test_unused_link_reads_zero() {
    let (state, _store, _rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/").await;
    let server = server(state);

    for what in ["hour", "day", "week", "month", "year", "all"] {
        let response = server.get(&format!("/{}+/{}", link.id, what)).await;
        response.assert_status_ok();
        assert_eq!(response.json::<serde_json::Value>()["count"], 0, "{}", what);
    }
}

#[tokio::test]
async fn test_invalid_granularity() {
    let (state, _store, _rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/").await;
    let server = server(state);

    let response = server.get(&format!("/{}+/minute", link.id)).await;

    response.assert_status_bad_request();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"]["code"], "invalid_granularity");
}

#[tokio::test]
async fn test_sources_sorted_by_count() {
    let (state, store, _rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/").await;
    let now = Utc::now();
    common::record_hits(&store, &link, 1, Some("b.com"), now).await;
    common::record_hits(&store, &link, 3, Some("a.com"), now).await;
    common::record_hits(&store, &link, 1, Some("c.com"), now).await;
    common::record_hits(&store, &link, 2, None, now).await;
    let server = server(state);

    let response = server.get(&format!("/{}+/sources", link.id)).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["top_only"], false);
    let sources: Vec<(String, i64)> = json["sources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| {
            (
                s["source"].as_str().unwrap().to_string(),
                s["count"].as_i64().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        sources,
        vec![
            ("a.com".to_string(), 3),
            ("direct".to_string(), 2),
            ("b.com".to_string(), 1),
            ("c.com".to_string(), 1),
        ]
    );
}

#[tokio::test]
async fn test_top_sources_truncated() {
    let (state, store, _rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/").await;
    let now = Utc::now();
    for i in 0..15 {
        let referrer = format!("site{:02}.com", i);
        common::record_hits(&store, &link, i + 1, Some(&referrer), now).await;
    }
    let server = server(state);

    let response = server.get(&format!("/{}+/top", link.id)).await;

    let json = response.json::<serde_json::Value>();
    let sources = json["sources"].as_array().unwrap();
    assert_eq!(json["top_only"], true);
    assert_eq!(sources.len(), 10);
    assert_eq!(sources[0]["source"], "site14.com");
    assert_eq!(sources[0]["count"], 15);
}

#[tokio::test]
async fn test_stats_not_found() {
    let (state, _store, _rx) = common::create_test_state();
    let link = common::create_test_link(&state, "https://example.com/").await;
    let server = server(state);

    server.get("/nope1+/all").await.assert_status_not_found();
    // Without the `+` marker the path is not a stats path.
    server
        .get(&format!("/{}/all", link.id))
        .await
        .assert_status_not_found();
}
