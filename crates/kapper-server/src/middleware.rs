//! Request ids for every route and a shared request budget for the data routes.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ApiError;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Caller-supplied ids longer than this are replaced.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Request id stored as a request extension and echoed in `meta.request_id`.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Reuse the caller's `x-request-id` when it is usable, otherwise mint a
/// `UUIDv4`. The id is echoed back on the response header.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN)
        .map_or_else(|| Uuid::new_v4().to_string(), ToOwned::to_owned);

    req.extensions_mut().insert(RequestId(id.clone()));
    let mut response = next.run(req).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

#[derive(Debug)]
struct Window {
    opened: Instant,
    used: usize,
}

impl Window {
    /// Spend one request at `now`, or report how long until the window resets.
    fn take(&mut self, limit: usize, span: Duration, now: Instant) -> Result<(), Duration> {
        if now.saturating_duration_since(self.opened) >= span {
            self.opened = now;
            self.used = 0;
        }
        if self.used < limit {
            self.used += 1;
            return Ok(());
        }
        Err(span.saturating_sub(now.saturating_duration_since(self.opened)))
    }
}

/// Requests per window shared by every marker, provider and nearest query.
///
/// Each of those requests may cluster the full provider set, so the budget
/// bounds the clustering work the service does per minute.
#[derive(Debug, Clone)]
pub struct RequestBudget {
    limit: usize,
    span: Duration,
    window: Arc<Mutex<Window>>,
}

impl RequestBudget {
    #[must_use]
    pub fn new(limit: usize, span: Duration) -> Self {
        Self {
            limit,
            span,
            window: Arc::new(Mutex::new(Window {
                opened: Instant::now(),
                used: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(limit: usize) -> Self {
        Self::new(limit, Duration::from_secs(60))
    }

    async fn acquire(&self) -> Result<(), Duration> {
        self.window
            .lock()
            .await
            .take(self.limit, self.span, Instant::now())
    }
}

pub async fn enforce_budget(
    State(budget): State<RequestBudget>,
    req: Request,
    next: Next,
) -> Response {
    match budget.acquire().await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            let id = req
                .extensions()
                .get::<RequestId>()
                .map(|r| r.0.clone())
                .unwrap_or_default();
            tracing::warn!(
                request_id = %id,
                path = %req.uri().path(),
                limit = budget.limit,
                retry_after_secs = retry_after.as_secs(),
                "request budget exhausted"
            );
            ApiError::rate_limited(id, retry_after).into_response()
        }
    }
}
