use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::geo::{Coordinate, Point};
use crate::ConfigError;

/// A coordinate field as it arrives from the record store.
///
/// Stores hand back numbers, numeric strings, or nothing at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    fn to_f64(&self) -> Result<f64, SkipReason> {
        match self {
            RawCoordinate::Number(n) => Ok(*n),
            RawCoordinate::Text(s) => s.trim().parse::<f64>().map_err(|_| SkipReason::NotNumeric),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRecord {
    pub id: String,
    pub name: String,
    pub latitude: Option<RawCoordinate>,
    pub longitude: Option<RawCoordinate>,
    pub price_range: Option<String>,
    pub rating: Option<f64>,
    pub city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProvidersFile {
    pub providers: Vec<ProviderRecord>,
}

/// Why a record was kept off the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    Missing,
    NotNumeric,
    NonFinite,
    OutOfRange,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "missing coordinate"),
            SkipReason::NotNumeric => write!(f, "non-numeric coordinate"),
            SkipReason::NonFinite => write!(f, "non-finite coordinate"),
            SkipReason::OutOfRange => write!(f, "coordinate out of range"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub id: String,
    pub reason: SkipReason,
}

/// Records split into map-ready points and rejects, input order preserved.
#[derive(Debug, Clone, Default)]
pub struct PointBatch {
    pub points: Vec<Point>,
    pub skipped: Vec<SkippedRecord>,
}

/// Load and validate the providers file (YAML; JSON also parses).
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_providers(path: &Path) -> Result<ProvidersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProvidersFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_providers(&content)
}

/// Parse and validate providers from an in-memory document.
///
/// # Errors
///
/// Returns `ConfigError` if the document cannot be parsed or fails validation.
pub fn parse_providers(content: &str) -> Result<ProvidersFile, ConfigError> {
    let file: ProvidersFile =
        serde_yaml::from_str(content).map_err(ConfigError::ProvidersFileParse)?;

    validate_providers(&file)?;

    Ok(file)
}

fn validate_providers(file: &ProvidersFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for record in &file.providers {
        if record.id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "provider '{}' has an empty id",
                record.name
            )));
        }

        if record.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "provider '{}' has an empty name",
                record.id
            )));
        }

        if !seen_ids.insert(record.id.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate provider id: '{}'",
                record.id
            )));
        }
    }

    Ok(())
}

fn resolve_coordinate(record: &ProviderRecord) -> Result<Coordinate, SkipReason> {
    let (Some(lat), Some(lng)) = (&record.latitude, &record.longitude) else {
        return Err(SkipReason::Missing);
    };

    let coordinate = Coordinate::new(lat.to_f64()?, lng.to_f64()?);
    if !coordinate.lat.is_finite() || !coordinate.lng.is_finite() {
        return Err(SkipReason::NonFinite);
    }
    if !coordinate.is_valid() {
        return Err(SkipReason::OutOfRange);
    }
    Ok(coordinate)
}

/// Turn raw records into points, dropping any without a usable coordinate.
///
/// This is the only place coordinates are validated; the clustering code
/// downstream takes the resulting points as trusted.
#[must_use]
pub fn into_points(records: &[ProviderRecord]) -> PointBatch {
    let mut batch = PointBatch::default();

    for record in records {
        match resolve_coordinate(record) {
            Ok(coordinate) => {
                let mut point = Point::new(record.id.clone(), record.name.clone(), coordinate);
                if let Some(price_range) = &record.price_range {
                    point = point.with_price_range(price_range.clone());
                }
                if let Some(rating) = record.rating {
                    point = point.with_rating(rating);
                }
                batch.points.push(point);
            }
            Err(reason) => batch.skipped.push(SkippedRecord {
                id: record.id.clone(),
                reason,
            }),
        }
    }

    batch
}

/// Optional narrowing applied before clustering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProviderFilter {
    pub name: Option<String>,
    pub price_range: Option<String>,
}

impl ProviderFilter {
    #[must_use]
    pub fn matches(&self, point: &Point) -> bool {
        let name_ok = match self.name.as_deref() {
            None | Some("") => true,
            Some(needle) => point
                .name()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
        };
        let price_ok = match self.price_range.as_deref() {
            None | Some("") => true,
            Some(price) => point.price_range() == Some(price),
        };
        name_ok && price_ok
    }

    /// Borrowing filter; keeps input order.
    #[must_use]
    pub fn apply<'a>(&self, points: &'a [Point]) -> Vec<&'a Point> {
        points.iter().filter(|p| self.matches(p)).collect()
    }
}

#[cfg(test)]
#[path = "providers_test.rs"]
mod tests;
