use kapper_core::Point;

use crate::greedy::GreedyClusterer;
use crate::split::ClusterSplitter;
use crate::types::{Cluster, RenderItem};
use crate::zoom::{RadiusPolicy, ZoomThresholdTable};

/// The full zoom → markers transform.
///
/// Holds only configuration. Each [`MarkerLayer::render`] call starts from
/// scratch, so one layer can serve concurrent callers by shared reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayer {
    table: ZoomThresholdTable,
    splitter: ClusterSplitter,
}

impl MarkerLayer {
    #[must_use]
    pub fn new(table: ZoomThresholdTable, splitter: ClusterSplitter) -> Self {
        Self { table, splitter }
    }

    #[must_use]
    pub fn table(&self) -> &ZoomThresholdTable {
        &self.table
    }

    #[must_use]
    pub fn splitter(&self) -> &ClusterSplitter {
        &self.splitter
    }

    /// Partition `points` into markers for `zoom`.
    ///
    /// Points must carry finite, in-range coordinates. Output order follows
    /// cluster creation order; standalone points keep input order.
    pub fn render<'a, I>(&self, points: I, zoom: f64) -> Vec<RenderItem<'a>>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        match self.table.radius(zoom) {
            RadiusPolicy::SingleCluster => {
                Cluster::from_members(points.into_iter().collect())
                    .map(RenderItem::Cluster)
                    .into_iter()
                    .collect()
            }
            RadiusPolicy::Identity => points.into_iter().map(RenderItem::Point).collect(),
            RadiusPolicy::Radius(radius) => {
                let clusters = match GreedyClusterer::new(radius) {
                    Ok(clusterer) => clusterer.cluster(points),
                    // Unreachable with a validated table; fall back to no clustering.
                    Err(_) => return points.into_iter().map(RenderItem::Point).collect(),
                };
                let items = clusters.into_iter().map(RenderItem::Cluster).collect();
                self.splitter.refine(items, zoom)
            }
        }
    }
}
