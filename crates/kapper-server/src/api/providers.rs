use axum::{
    extract::{Query, State},
    Extension, Json,
};
use kapper_core::{Coordinate, Point, ProviderFilter};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ProviderItem {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub price_range: Option<String>,
    pub rating: Option<f64>,
}

impl From<&Point> for ProviderItem {
    fn from(point: &Point) -> Self {
        Self {
            id: point.id().to_string(),
            name: point.name().to_string(),
            latitude: point.lat(),
            longitude: point.lng(),
            price_range: point.price_range().map(ToOwned::to_owned),
            rating: point.rating(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct NearestItem {
    pub provider: ProviderItem,
    pub distance_m: u64,
}

#[derive(Debug, Deserialize)]
pub(super) struct NearestQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

pub(super) async fn list_providers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(filter): Query<ProviderFilter>,
) -> Json<ApiResponse<Vec<ProviderItem>>> {
    let snapshot = state.store.snapshot().await;

    let data = filter
        .apply(&snapshot.points)
        .into_iter()
        .map(ProviderItem::from)
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn nearest_provider(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<ApiResponse<Option<NearestItem>>>, ApiError> {
    let (Some(lat), Some(lng)) = (query.lat, query.lng) else {
        return Err(ApiError::validation(req_id.0, "lat and lng are required"));
    };
    let reference = Coordinate::new(lat, lng);
    if !reference.is_valid() {
        return Err(ApiError::validation(
            req_id.0,
            "lat must be within [-90, 90] and lng within [-180, 180]",
        ));
    }

    let snapshot = state.store.snapshot().await;
    let data = kapper_cluster::nearest(reference, &snapshot.points).map(|hit| NearestItem {
        provider: ProviderItem::from(hit.point),
        distance_m: hit.rounded_meters(),
    });

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
