mod markers;
mod providers;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use kapper_cluster::MarkerLayer;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_budget, request_id, RequestBudget, RequestId, REQUEST_ID_HEADER};
use crate::store::ProviderStore;

#[derive(Clone)]
pub struct AppState {
    pub store: ProviderStore,
    pub layer: Arc<MarkerLayer>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Every error the API reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    ValidationError,
    RateLimited,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
    #[serde(skip)]
    retry_after: Option<Duration>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    providers: usize,
    skipped: usize,
    loaded_at: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    fn new(request_id: String, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id),
            retry_after: None,
        }
    }

    pub fn validation(request_id: String, message: impl Into<String>) -> Self {
        Self::new(request_id, ErrorCode::ValidationError, message)
    }

    pub fn rate_limited(request_id: String, retry_after: Duration) -> Self {
        Self {
            retry_after: Some(retry_after),
            ..Self::new(request_id, ErrorCode::RateLimited, "request budget exhausted")
        }
    }
}

/// Whole seconds, rounded up, never zero.
fn retry_after_secs(wait: Duration) -> u64 {
    (wait.as_secs() + u64::from(wait.subsec_nanos() > 0)).max(1)
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.error.code.status();
        let retry_after = self.retry_after.map(retry_after_secs);
        let mut response = (status, Json(self)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .expose_headers([
            HeaderName::from_static(REQUEST_ID_HEADER),
            header::RETRY_AFTER,
        ])
}

/// Routes that read the provider set and share the request budget.
fn budgeted_router(budget: RequestBudget) -> Router<AppState> {
    Router::new()
        .route("/api/v1/providers", get(providers::list_providers))
        .route(
            "/api/v1/providers/nearest",
            get(providers::nearest_provider),
        )
        .route("/api/v1/markers", get(markers::list_markers))
        .route_layer(axum::middleware::from_fn_with_state(budget, enforce_budget))
}

pub fn build_app(state: AppState, budget: RequestBudget) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/zoom-table", get(markers::get_zoom_table))
        .merge(budgeted_router(budget))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let snapshot = state.store.snapshot().await;

    Json(ApiResponse {
        data: HealthData {
            status: "ok",
            providers: snapshot.points.len(),
            skipped: snapshot.skipped.len(),
            loaded_at: snapshot.loaded_at,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
