mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use school_outcomes::dashboard::{dashboard_router, DashboardState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn router() -> Router {
    dashboard_router(DashboardState::new(Arc::new(common::prepared()), 3))
}

async fn get(uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
    let response = router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("router responds");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads")
        .to_vec();
    (status, content_type, body)
}

async fn get_json(uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = get(uri).await;
    (status, serde_json::from_slice(&body).expect("json body"))
}

fn regions(entries: &Value) -> Vec<String> {
    entries
        .as_array()
        .expect("array")
        .iter()
        .map(|entry| entry["region"].as_str().expect("region").to_string())
        .collect()
}

#[tokio::test]
async fn ranking_defaults_to_top_high_schools_with_configured_limit() {
    let (status, body) = get_json("/api/v1/ranking").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataset"], "high_school");
    assert_eq!(body["direction"], "top");
    assert_eq!(body["limit"], 3);
    assert_eq!(regions(&body["entries"]), ["東京都", "大阪府", "北海道"]);

    let ranks: Vec<u64> = body["entries"]
        .as_array()
        .expect("entries")
        .iter()
        .map(|entry| entry["rank"].as_u64().expect("rank"))
        .collect();
    assert_eq!(ranks, [1, 2, 3]);
    assert_eq!(body["entries"][0]["highlighted"], true);
    assert_eq!(body["entries"][1]["highlighted"], false);
}

#[tokio::test]
async fn bottom_ranking_ascends_by_rate() {
    let (status, body) =
        get_json("/api/v1/ranking?dataset=high_school&direction=bottom&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(regions(&body["entries"]), ["沖縄県", "青森"]);
}

#[tokio::test]
async fn zero_limit_is_rejected() {
    let (status, body) = get_json("/api/v1/ranking?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().expect("message").contains("limit"));
}

#[tokio::test]
async fn dataset_endpoint_returns_inner_joined_rows() {
    let (status, body) = get_json("/api/v1/datasets/university").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "Universities");
    assert_eq!(regions(&body["rows"]), ["北海道", "東京都", "大阪府"]);

    let (status, _) = get_json("/api/v1/datasets/college").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn charts_are_served_as_svg() {
    for uri in [
        "/charts/scatter.svg?dataset=university",
        "/charts/ranking.svg?dataset=high_school&direction=top&limit=5",
    ] {
        let (status, content_type, body) = get(uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(content_type.expect("content type").starts_with("image/svg+xml"));
        assert!(String::from_utf8(body).expect("utf-8").contains("<svg"));
    }
}

#[tokio::test]
async fn page_renders_form_charts_and_optional_previews() {
    let (status, _, body) = get("/?dataset=university&direction=bottom&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).expect("utf-8");
    assert!(html.contains("<option value=\"university\" selected>"));
    assert!(html.contains(
        "/charts/ranking.svg?dataset=university&amp;direction=bottom&amp;limit=2"
    ));
    assert!(html.contains("<td>北海道</td>"));
    assert!(!html.contains("Source previews"));

    let (_, _, body) = get("/?previews=true").await;
    let html = String::from_utf8(body).expect("utf-8");
    assert!(html.contains("Source previews"));
    assert!(html.contains("national.csv"));
}

#[tokio::test]
async fn previews_expose_first_rows_of_every_source() {
    let (status, body) = get_json("/api/v1/previews").await;
    assert_eq!(status, StatusCode::OK);
    let previews = body.as_array().expect("array");
    assert_eq!(previews.len(), 5);
    assert_eq!(previews[0]["headers"][0], "区分");
    assert_eq!(previews[1]["total_rows"], 4);
}

#[tokio::test]
async fn query_parameters_accept_the_same_aliases_as_the_cli() {
    let (status, body) = get_json("/api/v1/ranking?dataset=uni&direction=desc&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataset"], "university");
    assert_eq!(body["direction"], "top");
    assert_eq!(regions(&body["entries"]), ["東京都"]);

    let (status, body) = get_json("/api/v1/ranking?dataset=high-school&direction=lowest").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dataset"], "high_school");
    assert_eq!(regions(&body["entries"]), ["沖縄県", "青森", "北海道"]);
}

#[tokio::test]
async fn malformed_query_parameters_get_json_errors() {
    for uri in [
        "/api/v1/ranking?dataset=college",
        "/api/v1/ranking?direction=sideways",
        "/api/v1/ranking?limit=many",
        "/charts/scatter.svg?dataset=college",
        "/?previews=maybe",
    ] {
        let (status, content_type, body) = get(uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        let content_type = content_type.expect("content type");
        assert!(content_type.starts_with("application/json"), "{uri}");
        let body: Value = serde_json::from_slice(&body).expect("json body");
        assert!(body["error"].as_str().expect("message").starts_with("invalid request"));
    }

    let (_, body) = get_json("/api/v1/ranking?dataset=college").await;
    assert!(body["error"].as_str().expect("message").contains("college"));
}

#[tokio::test]
async fn cleared_limit_falls_back_to_the_default() {
    let (status, _, body) = get("/?dataset=high_school&direction=top&limit=").await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).expect("utf-8");
    assert!(html.contains("limit=3"));

    let (status, body) = get_json("/api/v1/ranking?limit=").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], 3);
}
