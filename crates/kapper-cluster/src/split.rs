use crate::types::RenderItem;

const DEFAULT_SPLIT_FROM_ZOOM: f64 = 12.0;
const DEFAULT_MAX_EXPLODED_SIZE: usize = 2;

/// Post-filter that turns tiny clusters back into individual markers.
///
/// Above `split_from_zoom` a badge reading "2" looks worse than two pins,
/// so any cluster with at most `max_exploded_size` members is replaced by
/// its members, in member order, at the cluster's position. Never merges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterSplitter {
    split_from_zoom: f64,
    max_exploded_size: usize,
}

impl Default for ClusterSplitter {
    fn default() -> Self {
        Self {
            split_from_zoom: DEFAULT_SPLIT_FROM_ZOOM,
            max_exploded_size: DEFAULT_MAX_EXPLODED_SIZE,
        }
    }
}

impl ClusterSplitter {
    #[must_use]
    pub fn new(split_from_zoom: f64, max_exploded_size: usize) -> Self {
        Self {
            split_from_zoom,
            max_exploded_size,
        }
    }

    #[must_use]
    pub fn split_from_zoom(&self) -> f64 {
        self.split_from_zoom
    }

    #[must_use]
    pub fn max_exploded_size(&self) -> usize {
        self.max_exploded_size
    }

    #[must_use]
    pub fn is_active(&self, zoom: f64) -> bool {
        zoom >= self.split_from_zoom
    }

    #[must_use]
    pub fn refine<'a>(&self, items: Vec<RenderItem<'a>>, zoom: f64) -> Vec<RenderItem<'a>> {
        if !self.is_active(zoom) {
            return items;
        }

        let mut out = Vec::with_capacity(items.len());
        for item in items {
            match item {
                RenderItem::Cluster(cluster) if cluster.count() <= self.max_exploded_size => {
                    out.extend(cluster.into_members().into_iter().map(RenderItem::Point));
                }
                other => out.push(other),
            }
        }
        out
    }
}
