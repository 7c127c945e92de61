//! Catalog API integration tests over mock sources.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;

use armory_core::testing::MockSource;
use armory_core::{Config, SourceConfig, SourcesConfig};
use common::{fixtures, TestFixture};

fn two_game_fixture() -> TestFixture {
    let valorant = Arc::new(
        MockSource::new("valorant")
            .with_batch(
                "Agent",
                vec![
                    fixtures::record("jett", "Jett"),
                    fixtures::record("sova", "Sova"),
                ],
            )
            .with_batch("Map", vec![fixtures::record("ascent", "Ascent")]),
    );
    let apex = Arc::new(MockSource::new("apex").with_batch(
        "Legend",
        vec![fixtures::record("wraith", "Wraith")],
    ));
    TestFixture::with_sources(vec![valorant, apex])
}

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = two_game_fixture();
    let response = fixture.get("/api/v1/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
}

#[tokio::test]
async fn test_catalog_empty_before_first_refresh() {
    let fixture = two_game_fixture();

    let response = fixture.get("/api/v1/catalog").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["total"], 0);

    let status = fixture.get("/api/v1/catalog/status").await;
    assert_eq!(status.body["phase"], "idle");
}

#[tokio::test]
async fn test_refresh_then_query_catalog() {
    let fixture = two_game_fixture();

    let refresh = fixture.post("/api/v1/catalog/refresh").await;
    assert_eq!(refresh.status, StatusCode::OK);
    assert_eq!(refresh.body["complete"], true);
    assert_eq!(refresh.body["total_items"], 4);

    // One fetch per source per pass.
    for source in &fixture.sources {
        assert_eq!(source.fetch_count(), 1);
    }

    let response = fixture.get("/api/v1/catalog").await;
    assert_eq!(response.body["total"], 4);
    // Stable case-insensitive name ordering.
    let names: Vec<&str> = response.body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ascent", "Jett", "Sova", "Wraith"]);

    let status = fixture.get("/api/v1/catalog/status").await;
    assert_eq!(status.body["phase"], "settled");
    assert_eq!(status.body["total_items"], 4);
}

#[tokio::test]
async fn test_catalog_category_and_search_filters() {
    let fixture = two_game_fixture();
    fixture.post("/api/v1/catalog/refresh").await;

    let agents = fixture.get("/api/v1/catalog?category=Agent").await;
    assert_eq!(agents.body["total"], 2);

    let hits = fixture.get("/api/v1/catalog?category=Agent&search=je").await;
    assert_eq!(hits.body["total"], 1);
    assert_eq!(hits.body["items"][0]["name"], "Jett");

    let none = fixture.get("/api/v1/catalog?search=zzz").await;
    assert_eq!(none.body["total"], 0);
}

#[tokio::test]
async fn test_categories_endpoint() {
    let fixture = two_game_fixture();
    fixture.post("/api/v1/catalog/refresh").await;

    let response = fixture.get("/api/v1/catalog/categories").await;
    let categories: Vec<&str> = response.body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap())
        .collect();
    assert_eq!(categories, vec!["All", "Agent", "Legend", "Map"]);
}

#[tokio::test]
async fn test_item_lookup_and_missing_item() {
    let fixture = two_game_fixture();
    fixture.post("/api/v1/catalog/refresh").await;

    let found = fixture.get("/api/v1/catalog/Agent/jett").await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["name"], "Jett");
    assert_eq!(found.body["source_id"], "valorant");

    let missing = fixture.get("/api/v1/catalog/Agent/nobody").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(missing.body["error"].as_str().unwrap().contains("nobody"));
}

#[tokio::test]
async fn test_partial_failure_reported_in_outcome() {
    let ok = Arc::new(MockSource::new("valorant").with_batch(
        "Agent",
        vec![fixtures::record("jett", "Jett")],
    ));
    let broken = Arc::new(MockSource::new("pubg").with_persistent_failure("connection refused"));
    let fixture = TestFixture::with_sources(vec![ok, broken]);

    let refresh = fixture.post("/api/v1/catalog/refresh").await;
    assert_eq!(refresh.status, StatusCode::OK);
    assert_eq!(refresh.body["complete"], false);
    assert_eq!(refresh.body["total_items"], 1);
    assert!(refresh.body["sources_failed"]["pubg"]
        .as_str()
        .unwrap()
        .contains("connection refused"));
}

#[tokio::test]
async fn test_total_failure_returns_bad_gateway_and_keeps_snapshot() {
    let source = Arc::new(MockSource::new("valorant").with_batch(
        "Agent",
        vec![fixtures::record("jett", "Jett")],
    ));
    let fixture = TestFixture::with_sources(vec![Arc::clone(&source)]);

    fixture.post("/api/v1/catalog/refresh").await;
    source.set_always_fail(Some("upstream down".to_string())).await;

    let refresh = fixture.post("/api/v1/catalog/refresh").await;
    assert_eq!(refresh.status, StatusCode::BAD_GATEWAY);
    assert!(refresh.body["sources_failed"]["valorant"]
        .as_str()
        .unwrap()
        .contains("upstream down"));

    // Previous snapshot still served.
    let catalog = fixture.get("/api/v1/catalog").await;
    assert_eq!(catalog.body["total"], 1);
}

#[tokio::test]
async fn test_reentrant_refresh_conflicts() {
    let slow = Arc::new(MockSource::new("valorant").with_batch(
        "Agent",
        vec![fixtures::record("jett", "Jett")],
    ));
    slow.set_delay(Duration::from_millis(200)).await;
    let fixture = TestFixture::with_sources(vec![Arc::clone(&slow)]);

    let router = fixture.router.clone();
    let background = tokio::spawn(async move {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;
        router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/catalog/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    });

    tokio::time::sleep(Duration::from_millis(50)).await;

    let second = fixture.post("/api/v1/catalog/refresh").await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    let first = background.await.unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(slow.fetch_count(), 1);
}

#[tokio::test]
async fn test_config_endpoint_redacts_api_key() {
    let config = Config {
        sources: SourcesConfig {
            rivals: Some(SourceConfig {
                api_key: Some("super-secret".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };
    let fixture = TestFixture::with_config_and_sources(config, vec![]);

    let response = fixture.get("/api/v1/config").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["sources"][0]["name"], "rivals");
    assert_eq!(response.body["sources"][0]["api_key_configured"], true);
    assert!(!response.body.to_string().contains("super-secret"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = two_game_fixture();
    fixture.post("/api/v1/catalog/refresh").await;

    let (status, body) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("armory_catalog_items"));
    assert!(body.contains("armory_refresh_passes_total"));
    assert!(body.contains("# HELP"));
}
