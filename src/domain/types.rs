//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - handed across the fetch worker boundary
//! - printed as JSON by the CLI
//! - compared directly in tests

use clap::ValueEnum;
use serde::Serialize;

use crate::error::{AppError, EXIT_USAGE};

/// Lowest minimum magnitude a query may ask for.
pub const MAGNITUDE_FLOOR: i32 = 0;
/// Highest maximum magnitude a query may ask for.
pub const MAGNITUDE_CEILING: i32 = 10;
/// Number of events requested per query.
pub const DEFAULT_LIMIT: u32 = 300;

/// One seismic event as reported by the upstream feed.
///
/// All four fields are always present: the parser never builds a partial record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EarthquakeRecord {
    magnitude: f64,
    location: String,
    /// Milliseconds since the Unix epoch (UTC).
    occurred_at_ms: i64,
    details_url: String,
}

impl EarthquakeRecord {
    pub fn new(
        magnitude: f64,
        location: impl Into<String>,
        occurred_at_ms: i64,
        details_url: impl Into<String>,
    ) -> Self {
        Self {
            magnitude,
            location: location.into(),
            occurred_at_ms,
            details_url: details_url.into(),
        }
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn occurred_at_ms(&self) -> i64 {
        self.occurred_at_ms
    }

    pub fn details_url(&self) -> &str {
        &self.details_url
    }
}

/// Sort order understood by the upstream `orderby` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ValueEnum)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "time")]
    #[value(name = "time")]
    TimeDescending,
    #[serde(rename = "time-asc")]
    #[value(name = "time-asc")]
    TimeAscending,
    #[serde(rename = "magnitude")]
    #[value(name = "magnitude")]
    MagnitudeDescending,
    #[serde(rename = "magnitude-asc")]
    #[value(name = "magnitude-asc")]
    MagnitudeAscending,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        SortOrder::TimeDescending,
        SortOrder::TimeAscending,
        SortOrder::MagnitudeDescending,
        SortOrder::MagnitudeAscending,
    ];

    /// Token sent as the `orderby` query value.
    pub fn query_token(self) -> &'static str {
        match self {
            SortOrder::TimeDescending => "time",
            SortOrder::TimeAscending => "time-asc",
            SortOrder::MagnitudeDescending => "magnitude",
            SortOrder::MagnitudeAscending => "magnitude-asc",
        }
    }

    /// Human label, as stored by the settings screen.
    pub fn display_name(self) -> &'static str {
        match self {
            SortOrder::TimeDescending => "Descending Time",
            SortOrder::TimeAscending => "Ascending Time",
            SortOrder::MagnitudeDescending => "Descending Magnitude",
            SortOrder::MagnitudeAscending => "Ascending Magnitude",
        }
    }

    pub fn from_query_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|o| o.query_token() == token)
    }

    /// Unknown labels fall back to the default order.
    pub fn from_display_name(label: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|o| o.display_name() == label)
            .unwrap_or_default()
    }

    /// Accepts either a query token or a display label.
    pub fn parse_setting(raw: &str) -> Self {
        let raw = raw.trim();
        Self::from_query_token(raw).unwrap_or_else(|| Self::from_display_name(raw))
    }
}

/// Filter parameters for a single feed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    pub min_magnitude: i32,
    pub max_magnitude: i32,
    pub order: SortOrder,
    pub limit: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            min_magnitude: MAGNITUDE_FLOOR,
            max_magnitude: MAGNITUDE_CEILING,
            order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
        }
    }
}

impl QueryParams {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.min_magnitude < MAGNITUDE_FLOOR {
            return Err(AppError::new(
                EXIT_USAGE,
                format!("Minimum magnitude must be at least {MAGNITUDE_FLOOR}."),
            ));
        }
        if self.max_magnitude > MAGNITUDE_CEILING {
            return Err(AppError::new(
                EXIT_USAGE,
                format!("Maximum magnitude must be at most {MAGNITUDE_CEILING}."),
            ));
        }
        if self.min_magnitude > self.max_magnitude {
            return Err(AppError::new(
                EXIT_USAGE,
                format!(
                    "Minimum magnitude ({}) exceeds maximum magnitude ({}).",
                    self.min_magnitude, self.max_magnitude
                ),
            ));
        }
        if self.limit == 0 {
            return Err(AppError::new(EXIT_USAGE, "Limit must be positive."));
        }
        Ok(())
    }

    // Step adjustments mirror the settings stepper: a refused step leaves the value as-is.

    pub fn increment_min(&mut self) -> Result<(), AppError> {
        if self.min_magnitude >= self.max_magnitude {
            return Err(AppError::new(EXIT_USAGE, "Cannot go above maximum magnitude"));
        }
        self.min_magnitude += 1;
        Ok(())
    }

    pub fn decrement_min(&mut self) -> Result<(), AppError> {
        if self.min_magnitude <= MAGNITUDE_FLOOR {
            return Err(AppError::new(EXIT_USAGE, "Cannot go below 0"));
        }
        self.min_magnitude -= 1;
        Ok(())
    }

    pub fn increment_max(&mut self) -> Result<(), AppError> {
        if self.max_magnitude >= MAGNITUDE_CEILING {
            return Err(AppError::new(EXIT_USAGE, "Cannot go beyond 10"));
        }
        self.max_magnitude += 1;
        Ok(())
    }

    pub fn decrement_max(&mut self) -> Result<(), AppError> {
        if self.max_magnitude <= self.min_magnitude {
            return Err(AppError::new(EXIT_USAGE, "Cannot go below minimum magnitude"));
        }
        self.max_magnitude -= 1;
        Ok(())
    }
}
