use super::markers::MarkerItem;
use super::providers::ProviderItem;
use super::*;
use crate::middleware::REQUEST_ID_HEADER;
use crate::store::ProviderSnapshot;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request};
use std::time::Duration;
use kapper_core::{ProviderRecord, RawCoordinate};
use tower::ServiceExt;

fn record(id: &str, name: &str, lat: f64, lng: f64, price: Option<&str>) -> ProviderRecord {
    ProviderRecord {
        id: id.to_string(),
        name: name.to_string(),
        latitude: Some(RawCoordinate::Number(lat)),
        longitude: Some(RawCoordinate::Number(lng)),
        price_range: price.map(ToOwned::to_owned),
        rating: None,
        city: None,
    }
}

fn netherlands_state() -> AppState {
    let records = vec![
        record("ams-1", "Studio Sharp", 52.3676, 4.9041, Some("€€")),
        record("ams-2", "Fade Factory", 52.3680, 4.9050, Some("€€€")),
        record("rtm", "Kapper Noord", 51.9225, 4.4792, Some("€")),
        ProviderRecord {
            latitude: None,
            ..record("ghost", "No Coordinates", 0.0, 0.0, None)
        },
    ];
    AppState {
        store: ProviderStore::from_snapshot(ProviderSnapshot::from_records(&records)),
        layer: Arc::new(MarkerLayer::default()),
    }
}

fn empty_state() -> AppState {
    AppState {
        store: ProviderStore::from_snapshot(ProviderSnapshot::from_records(&[])),
        layer: Arc::new(MarkerLayer::default()),
    }
}

fn open_app(state: AppState) -> Router {
    build_app(state, RequestBudget::per_minute(1_000))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[test]
fn api_error_validation_maps_to_bad_request() {
    let response = ApiError::validation("req-1".into(), "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(header::RETRY_AFTER).is_none());
}

#[test]
fn rate_limited_error_rounds_retry_after_up() {
    let response =
        ApiError::rate_limited("req-1".into(), Duration::from_millis(1_500)).into_response();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()[header::RETRY_AFTER], "2");

    let response = ApiError::rate_limited("req-2".into(), Duration::ZERO).into_response();
    assert_eq!(response.headers()[header::RETRY_AFTER], "1");
}

#[test]
fn marker_item_serializes_with_type_tag() {
    let item = MarkerItem::Point(ProviderItem {
        id: "b-1".to_string(),
        name: "Studio Sharp".to_string(),
        latitude: 52.3676,
        longitude: 4.9041,
        price_range: Some("€€".to_string()),
        rating: Some(4.8),
    });
    let json = serde_json::to_value(&item).expect("serialize MarkerItem");
    assert_eq!(json["type"], "point");
    assert_eq!(json["id"], "b-1");

    let cluster = MarkerItem::Cluster {
        latitude: 52.0,
        longitude: 5.0,
        count: 3,
        members: vec!["a".into(), "b".into(), "c".into()],
    };
    let json = serde_json::to_value(&cluster).expect("serialize cluster");
    assert_eq!(json["type"], "cluster");
    assert_eq!(json["count"], 3);
}

#[tokio::test]
async fn health_reports_provider_counts() {
    let (status, json) = get_json(open_app(netherlands_state()), "/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["providers"], 3);
    assert_eq!(json["data"]["skipped"], 1);
}

#[tokio::test]
async fn markers_collapse_at_low_zoom() {
    let (status, json) = get_json(open_app(netherlands_state()), "/api/v1/markers?zoom=6").await;
    assert_eq!(status, StatusCode::OK);
    let items = json["data"]["items"].as_array().expect("items array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["type"], "cluster");
    assert_eq!(items[0]["count"], 3);
    assert_eq!(json["data"]["band"], "whole country");
}

#[tokio::test]
async fn markers_at_zoom_ten_keep_pair_cluster() {
    let (_, json) = get_json(open_app(netherlands_state()), "/api/v1/markers?zoom=10").await;
    let items = json["data"]["items"].as_array().expect("items array");
    let counts: Vec<i64> = items
        .iter()
        .map(|i| i["count"].as_i64().expect("cluster count"))
        .collect();
    assert_eq!(counts, vec![2, 1]);
    assert_eq!(items[0]["members"][1], "ams-2");
}

#[tokio::test]
async fn markers_split_at_zoom_thirteen() {
    let (_, json) = get_json(open_app(netherlands_state()), "/api/v1/markers?zoom=13").await;
    let items = json["data"]["items"].as_array().expect("items array");
    let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["ams-1", "ams-2", "rtm"]);
    assert!(items.iter().all(|i| i["type"] == "point"));
}

#[tokio::test]
async fn markers_apply_filter_before_clustering() {
    let (_, json) = get_json(
        open_app(netherlands_state()),
        "/api/v1/markers?zoom=6&price_range=%E2%82%AC",
    )
    .await;
    assert_eq!(json["data"]["total_points"], 1);
    assert_eq!(json["data"]["items"][0]["count"], 1);
}

#[tokio::test]
async fn markers_require_zoom() {
    let (status, json) = get_json(open_app(netherlands_state()), "/api/v1/markers").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn markers_reject_non_finite_zoom() {
    let (status, _) = get_json(open_app(netherlands_state()), "/api/v1/markers?zoom=NaN").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn nearest_returns_exact_match_with_zero_distance() {
    let (status, json) = get_json(
        open_app(netherlands_state()),
        "/api/v1/providers/nearest?lat=52.3676&lng=4.9041",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["provider"]["id"], "ams-1");
    assert_eq!(json["data"]["distance_m"], 0);
}

#[tokio::test]
async fn nearest_on_empty_set_is_null() {
    let (status, json) = get_json(
        open_app(empty_state()),
        "/api/v1/providers/nearest?lat=52.0&lng=5.0",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn nearest_rejects_out_of_range_reference() {
    let (status, json) = get_json(
        open_app(netherlands_state()),
        "/api/v1/providers/nearest?lat=95&lng=5",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn providers_list_filters_by_name() {
    let (_, json) = get_json(
        open_app(netherlands_state()),
        "/api/v1/providers?name=kapper",
    )
    .await;
    let data = json["data"].as_array().expect("data array");
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], "rtm");
}

#[tokio::test]
async fn zoom_table_exposes_default_bands() {
    let (_, json) = get_json(open_app(netherlands_state()), "/api/v1/zoom-table").await;
    assert_eq!(json["data"]["single_cluster_below"], 7.0);
    assert_eq!(json["data"]["identity_from"], 14.0);
    assert_eq!(json["data"]["split_from_zoom"], 12.0);
    assert_eq!(json["data"]["steps"].as_array().map(Vec::len), Some(7));
}

#[tokio::test]
async fn request_id_is_echoed_in_header_and_meta() {
    let response = open_app(netherlands_state())
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header(REQUEST_ID_HEADER, "trace-42")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "trace-42");
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["meta"]["request_id"], "trace-42");
}

#[tokio::test]
async fn request_id_is_generated_when_absent() {
    let response = open_app(netherlands_state())
        .oneshot(
            Request::builder()
                .uri("/api/v1/zoom-table")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let id = response.headers()[REQUEST_ID_HEADER]
        .to_str()
        .expect("ascii id");
    assert!(uuid::Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn data_routes_share_budget_and_report_retry_after() {
    let app = build_app(netherlands_state(), RequestBudget::per_minute(2));

    let (first, _) = get_json(app.clone(), "/api/v1/markers?zoom=10").await;
    let (second, _) = get_json(app.clone(), "/api/v1/providers").await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/providers/nearest?lat=52.0&lng=5.0")
                .header(REQUEST_ID_HEADER, "over-budget")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = response.headers()[header::RETRY_AFTER]
        .to_str()
        .expect("ascii header")
        .parse()
        .expect("whole seconds");
    assert!((1..=60).contains(&retry_after));
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json body");
    assert_eq!(json["error"]["code"], "rate_limited");
    assert_eq!(json["meta"]["request_id"], "over-budget");

    let (health, _) = get_json(app.clone(), "/api/v1/health").await;
    let (table, _) = get_json(app, "/api/v1/zoom-table").await;
    assert_eq!(health, StatusCode::OK);
    assert_eq!(table, StatusCode::OK);
}
