//! Zoom level to clustering radius lookup.
//!
//! The table is a step function held as ordered data: each [`ZoomStep`]
//! covers `[min_zoom, next.min_zoom)` and the last step runs up to
//! `identity_from`. Below the first step everything collapses into one
//! cluster; from `identity_from` on every point stands alone.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

const SINGLE_CLUSTER_LABEL: &str = "whole country";
const IDENTITY_LABEL: &str = "individual markers";

/// Resolved clustering behaviour for one zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusPolicy {
    /// Collapse every point into one cluster.
    SingleCluster,
    /// No clustering; each point is its own marker.
    Identity,
    /// Greedy clustering with this planar radius in degrees.
    Radius(f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomStep {
    pub min_zoom: f64,
    /// Degrees.
    pub radius: f64,
    #[serde(default)]
    pub label: String,
}

impl ZoomStep {
    #[must_use]
    pub fn new(min_zoom: f64, radius: f64, label: impl Into<String>) -> Self {
        Self {
            min_zoom,
            radius,
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoomThresholdTable {
    steps: Vec<ZoomStep>,
    identity_from: f64,
}

#[derive(Debug, Deserialize)]
struct ZoomTableFile {
    identity_from: f64,
    steps: Vec<ZoomStep>,
}

impl Default for ZoomThresholdTable {
    fn default() -> Self {
        Self {
            steps: vec![
                ZoomStep::new(7.0, 1.0, "large regions"),
                ZoomStep::new(8.0, 0.8, "multiple clusters"),
                ZoomStep::new(9.0, 0.6, "regional overview"),
                ZoomStep::new(10.0, 0.4, "city level"),
                ZoomStep::new(11.0, 0.3, "district level"),
                ZoomStep::new(12.0, 0.2, "neighbourhood level"),
                ZoomStep::new(13.0, 0.15, "small clusters"),
            ],
            identity_from: 14.0,
        }
    }
}

impl ZoomThresholdTable {
    /// Build a table from ordered steps.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::InvalidZoomTable`] when the steps are empty,
    /// out of order, overlap the identity cutoff, or the radius grows with zoom.
    pub fn new(steps: Vec<ZoomStep>, identity_from: f64) -> Result<Self> {
        validate(&steps, identity_from)?;
        Ok(Self {
            steps,
            identity_from,
        })
    }

    /// Parse a table from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::ZoomTableParse`] for malformed YAML and
    /// [`ClusterError::InvalidZoomTable`] when validation fails.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: ZoomTableFile =
            serde_yaml::from_str(content).map_err(ClusterError::ZoomTableParse)?;
        Self::new(file.steps, file.identity_from)
    }

    /// Load a table from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ClusterError::ZoomTableIo`] if the file cannot be read, plus
    /// everything [`Self::from_yaml_str`] can return.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ClusterError::ZoomTableIo {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_yaml_str(&content)
    }

    #[must_use]
    pub fn steps(&self) -> &[ZoomStep] {
        &self.steps
    }

    /// Zoom below which everything is one cluster.
    #[must_use]
    pub fn single_cluster_below(&self) -> f64 {
        self.steps[0].min_zoom
    }

    #[must_use]
    pub fn identity_from(&self) -> f64 {
        self.identity_from
    }

    /// Resolve the clustering policy for `zoom`.
    ///
    /// A non-finite zoom resolves to [`RadiusPolicy::Identity`].
    #[must_use]
    pub fn radius(&self, zoom: f64) -> RadiusPolicy {
        match self.step_for(zoom) {
            Band::SingleCluster => RadiusPolicy::SingleCluster,
            Band::Identity => RadiusPolicy::Identity,
            Band::Step(step) => RadiusPolicy::Radius(step.radius),
        }
    }

    /// Short human label for the band `zoom` falls into.
    #[must_use]
    pub fn describe(&self, zoom: f64) -> &str {
        match self.step_for(zoom) {
            Band::SingleCluster => SINGLE_CLUSTER_LABEL,
            Band::Identity => IDENTITY_LABEL,
            Band::Step(step) => &step.label,
        }
    }

    fn step_for(&self, zoom: f64) -> Band<'_> {
        if !zoom.is_finite() || zoom >= self.identity_from {
            return Band::Identity;
        }
        self.steps
            .iter()
            .rev()
            .find(|step| zoom >= step.min_zoom)
            .map_or(Band::SingleCluster, Band::Step)
    }
}

enum Band<'a> {
    SingleCluster,
    Identity,
    Step(&'a ZoomStep),
}

fn validate(steps: &[ZoomStep], identity_from: f64) -> Result<()> {
    let invalid = |msg: String| Err(ClusterError::InvalidZoomTable(msg));

    let Some(last) = steps.last() else {
        return invalid("at least one step is required".to_string());
    };

    if !identity_from.is_finite() {
        return invalid(format!("identity_from {identity_from} is not finite"));
    }

    for step in steps {
        if !step.min_zoom.is_finite() {
            return invalid(format!("step min_zoom {} is not finite", step.min_zoom));
        }
        if !step.radius.is_finite() || step.radius <= 0.0 {
            return invalid(format!(
                "step at zoom {} has radius {}; must be finite and > 0",
                step.min_zoom, step.radius
            ));
        }
    }

    for pair in steps.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if upper.min_zoom <= lower.min_zoom {
            return invalid(format!(
                "step bounds must ascend strictly: {} then {}",
                lower.min_zoom, upper.min_zoom
            ));
        }
        if upper.radius > lower.radius {
            return invalid(format!(
                "radius grows from {} to {} between zoom {} and {}",
                lower.radius, upper.radius, lower.min_zoom, upper.min_zoom
            ));
        }
    }

    if last.min_zoom >= identity_from {
        return invalid(format!(
            "last step at zoom {} is not below identity_from {identity_from}",
            last.min_zoom
        ));
    }

    Ok(())
}
