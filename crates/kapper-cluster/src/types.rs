use kapper_core::{Coordinate, Point};

use crate::diff::MarkerKey;

/// A group of points drawn as one badge.
///
/// The centroid is always derived from the current members; there is no
/// stored centroid that could go stale.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<'a> {
    members: Vec<&'a Point>,
    sum_lat: f64,
    sum_lng: f64,
}

impl<'a> Cluster<'a> {
    #[must_use]
    pub fn singleton(point: &'a Point) -> Self {
        Self {
            members: vec![point],
            sum_lat: point.lat(),
            sum_lng: point.lng(),
        }
    }

    /// Build a cluster from members in order. `None` for an empty input.
    #[must_use]
    pub fn from_members(members: Vec<&'a Point>) -> Option<Self> {
        if members.is_empty() {
            return None;
        }
        let (sum_lat, sum_lng) = members
            .iter()
            .fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat(), lng + p.lng()));
        Some(Self {
            members,
            sum_lat,
            sum_lng,
        })
    }

    pub(crate) fn push(&mut self, point: &'a Point) {
        self.members.push(point);
        self.sum_lat += point.lat();
        self.sum_lng += point.lng();
    }

    /// Arithmetic mean of the member coordinates.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centroid(&self) -> Coordinate {
        let n = self.members.len() as f64;
        Coordinate::new(self.sum_lat / n, self.sum_lng / n)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn members(&self) -> &[&'a Point] {
        &self.members
    }

    #[must_use]
    pub fn into_members(self) -> Vec<&'a Point> {
        self.members
    }
}

/// One marker handed to the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderItem<'a> {
    Cluster(Cluster<'a>),
    Point(&'a Point),
}

impl RenderItem<'_> {
    /// Where the marker is drawn.
    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        match self {
            RenderItem::Cluster(cluster) => cluster.centroid(),
            RenderItem::Point(point) => point.coordinate(),
        }
    }

    /// Number of input points this marker stands for.
    #[must_use]
    pub fn point_count(&self) -> usize {
        match self {
            RenderItem::Cluster(cluster) => cluster.count(),
            RenderItem::Point(_) => 1,
        }
    }

    #[must_use]
    pub fn is_cluster(&self) -> bool {
        matches!(self, RenderItem::Cluster(_))
    }

    #[must_use]
    pub fn key(&self) -> MarkerKey {
        match self {
            RenderItem::Cluster(cluster) => MarkerKey::Cluster {
                members: cluster.members().iter().map(|p| p.id().to_string()).collect(),
            },
            RenderItem::Point(point) => MarkerKey::Point {
                id: point.id().to_string(),
            },
        }
    }
}
