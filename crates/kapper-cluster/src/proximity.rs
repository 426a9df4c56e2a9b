//! Nearest-provider lookup by linear scan.

use kapper_core::{Coordinate, Point};

/// Flat-earth scale: roughly one degree of latitude, in meters.
///
/// Only meaningful at single-country scale.
pub const METERS_PER_DEGREE: f64 = 111_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest<'a> {
    pub point: &'a Point,
    /// Planar degree distance scaled by [`METERS_PER_DEGREE`].
    pub distance_m: f64,
}

impl Nearest<'_> {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn rounded_meters(&self) -> u64 {
        self.distance_m.round() as u64
    }
}

/// Closest point to `reference`, first occurrence winning ties.
///
/// Returns `None` for an empty input.
pub fn nearest<'a, I>(reference: Coordinate, points: I) -> Option<Nearest<'a>>
where
    I: IntoIterator<Item = &'a Point>,
{
    points
        .into_iter()
        .map(|point| Nearest {
            point,
            distance_m: point.coordinate().planar_distance(&reference) * METERS_PER_DEGREE,
        })
        .fold(None, |best: Option<Nearest<'a>>, candidate| match best {
            Some(b) if b.distance_m <= candidate.distance_m => Some(b),
            _ => Some(candidate),
        })
}
