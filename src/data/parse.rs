//! GeoJSON feed parsing.
//!
//! Only `features[].properties.{mag, place, time, url}` are read. A single
//! malformed feature aborts the whole response: callers get every record or none.

use serde::Deserialize;

use crate::domain::EarthquakeRecord;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Properties {
    mag: f64,
    place: String,
    time: i64,
    url: String,
}

impl From<Properties> for EarthquakeRecord {
    fn from(p: Properties) -> Self {
        EarthquakeRecord::new(p.mag, p.place, p.time, p.url)
    }
}

/// Parse a feed response, keeping the reason on failure.
///
/// Empty input is not an error: it yields no records.
pub fn try_parse(raw: &str) -> Result<Vec<EarthquakeRecord>, AppError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }

    let body: FeatureCollection = serde_json::from_str(raw)
        .map_err(|e| AppError::upstream(format!("Invalid earthquake JSON: {e}")))?;
    tracing::debug!("Size of data: {}", body.features.len());

    Ok(body
        .features
        .into_iter()
        .map(|f| EarthquakeRecord::from(f.properties))
        .collect())
}

/// Parse a feed response, collapsing any failure to an empty list.
pub fn parse(raw: &str) -> Vec<EarthquakeRecord> {
    try_parse(raw).unwrap_or_else(|err| {
        tracing::warn!("{err}");
        Vec::new()
    })
}

/// `parse` for callers that may have no response text at all.
pub fn parse_opt(raw: Option<&str>) -> Vec<EarthquakeRecord> {
    raw.map(parse).unwrap_or_default()
}
