use axum::{
    extract::{Query, State},
    Extension, Json,
};
use kapper_cluster::{RenderItem, ZoomStep};
use kapper_core::ProviderFilter;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::providers::ProviderItem;
use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(super) enum MarkerItem {
    Cluster {
        latitude: f64,
        longitude: f64,
        count: usize,
        members: Vec<String>,
    },
    Point(ProviderItem),
}

impl From<&RenderItem<'_>> for MarkerItem {
    fn from(item: &RenderItem<'_>) -> Self {
        match item {
            RenderItem::Cluster(cluster) => {
                let centroid = cluster.centroid();
                MarkerItem::Cluster {
                    latitude: centroid.lat,
                    longitude: centroid.lng,
                    count: cluster.count(),
                    members: cluster
                        .members()
                        .iter()
                        .map(|p| p.id().to_string())
                        .collect(),
                }
            }
            RenderItem::Point(point) => MarkerItem::Point(ProviderItem::from(*point)),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct MarkersData {
    pub zoom: f64,
    pub band: String,
    pub total_points: usize,
    pub items: Vec<MarkerItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct ZoomTableData {
    pub single_cluster_below: f64,
    pub identity_from: f64,
    pub split_from_zoom: f64,
    pub max_exploded_size: usize,
    pub steps: Vec<ZoomStep>,
}

#[derive(Debug, Deserialize)]
pub(super) struct MarkersQuery {
    pub zoom: Option<f64>,
    pub name: Option<String>,
    pub price_range: Option<String>,
}

pub(super) async fn list_markers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<MarkersQuery>,
) -> Result<Json<ApiResponse<MarkersData>>, ApiError> {
    let Some(zoom) = query.zoom.filter(|z| z.is_finite()) else {
        return Err(ApiError::validation(req_id.0, "zoom must be a finite number"));
    };

    let filter = ProviderFilter {
        name: query.name,
        price_range: query.price_range,
    };

    let snapshot = state.store.snapshot().await;
    let points = filter.apply(&snapshot.points);
    let total_points = points.len();

    let rendered = state.layer.render(points, zoom);
    let items: Vec<MarkerItem> = rendered.iter().map(MarkerItem::from).collect();

    tracing::debug!(
        zoom,
        total_points,
        markers = items.len(),
        "marker layer rendered"
    );

    Ok(Json(ApiResponse {
        data: MarkersData {
            zoom,
            band: state.layer.table().describe(zoom).to_string(),
            total_points,
            items,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_zoom_table(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ZoomTableData>> {
    let table = state.layer.table();
    let splitter = state.layer.splitter();

    Json(ApiResponse {
        data: ZoomTableData {
            single_cluster_below: table.single_cluster_below(),
            identity_from: table.identity_from(),
            split_from_zoom: splitter.split_from_zoom(),
            max_exploded_size: splitter.max_exploded_size(),
            steps: table.steps().to_vec(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
