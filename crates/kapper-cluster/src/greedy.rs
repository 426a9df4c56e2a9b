//! Single-pass, first-fit clustering.
//!
//! Points are taken in input order. Each point joins the first existing
//! cluster (in creation order) whose centroid is strictly closer than the
//! radius, otherwise it opens a new cluster. Centroids move as members
//! join, so the result depends on input order and is not globally optimal.
//! Cost is O(n·k) for k clusters.

use kapper_core::Point;

use crate::error::{ClusterError, Result};
use crate::types::Cluster;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreedyClusterer {
    radius: f64,
}

impl GreedyClusterer {
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidRadius`] unless `radius` is finite and positive.
    pub fn new(radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(ClusterError::InvalidRadius(radius));
        }
        Ok(Self { radius })
    }

    /// Partition `points` into clusters, returned in creation order.
    ///
    /// Every input point lands in exactly one cluster. Singletons are kept;
    /// dropping or exploding them is the splitter's job.
    pub fn cluster<'a, I>(&self, points: I) -> Vec<Cluster<'a>>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        points.into_iter().fold(Vec::new(), |mut clusters, point| {
            let target = point.coordinate();
            match clusters
                .iter()
                .position(|c: &Cluster<'a>| c.centroid().planar_distance(&target) < self.radius)
            {
                Some(idx) => clusters[idx].push(point),
                None => clusters.push(Cluster::singleton(point)),
            }
            clusters
        })
    }
}
