//! Zoom-adaptive marker clustering for the provider map.
//!
//! Every call is a full, stateless re-partition of its input:
//!
//! 1. [`ZoomThresholdTable`] resolves the zoom level to a [`RadiusPolicy`].
//! 2. [`GreedyClusterer`] folds the points into clusters for `Radius(d)`.
//! 3. [`ClusterSplitter`] explodes undersized clusters at high zoom.
//!
//! [`MarkerLayer`] chains the three. [`nearest`] answers "closest provider"
//! queries independently of the layer.
//!
//! ```rust
//! use kapper_cluster::{MarkerLayer, RenderItem};
//! use kapper_core::{Coordinate, Point};
//!
//! let points = vec![
//!     Point::new("1", "A", Coordinate::new(52.3676, 4.9041)),
//!     Point::new("2", "B", Coordinate::new(52.3680, 4.9050)),
//!     Point::new("3", "C", Coordinate::new(51.9225, 4.4792)),
//! ];
//!
//! let items = MarkerLayer::default().render(&points, 6.0);
//! assert_eq!(items.len(), 1);
//! assert!(matches!(&items[0], RenderItem::Cluster(c) if c.count() == 3));
//! ```

#![forbid(unsafe_code)]

pub mod diff;
pub mod error;
pub mod greedy;
pub mod layer;
pub mod proximity;
pub mod split;
pub mod types;
pub mod zoom;

pub use diff::{diff_layers, LayerDiff, MarkerKey};
pub use error::{ClusterError, Result};
pub use greedy::GreedyClusterer;
pub use layer::MarkerLayer;
pub use proximity::{nearest, Nearest, METERS_PER_DEGREE};
pub use split::ClusterSplitter;
pub use types::{Cluster, RenderItem};
pub use zoom::{RadiusPolicy, ZoomStep, ZoomThresholdTable};
