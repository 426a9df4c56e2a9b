use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Euclidean distance on raw degree deltas. Not geodesic.
    #[must_use]
    pub fn planar_distance(&self, other: &Coordinate) -> f64 {
        (self.lat - other.lat).hypot(self.lng - other.lng)
    }

    /// True when both components are finite and inside the geographic range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// A service provider with a validated map position.
///
/// Fields are private so a `Point` cannot change after construction; the
/// coordinate is assumed valid (see [`crate::into_points`]).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    id: String,
    name: String,
    coordinate: Coordinate,
    price_range: Option<String>,
    rating: Option<f64>,
}

impl Point {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            coordinate,
            price_range: None,
            rating: None,
        }
    }

    #[must_use]
    pub fn with_price_range(mut self, price_range: impl Into<String>) -> Self {
        self.price_range = Some(price_range.into());
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.coordinate.lat
    }

    #[must_use]
    pub fn lng(&self) -> f64 {
        self.coordinate.lng
    }

    #[must_use]
    pub fn price_range(&self) -> Option<&str> {
        self.price_range.as_deref()
    }

    #[must_use]
    pub fn rating(&self) -> Option<f64> {
        self.rating
    }
}
