//! Runtime settings.
//!
//! Settings are read from the process environment (after loading `.env` via
//! `dotenvy`) and then overridden by CLI flags in `app`. Missing keys fall back
//! to the defaults of the settings screen: min 0, max 10, newest first.

use std::time::Duration;

use crate::data::usgs::{CONNECT_TIMEOUT, DEFAULT_ENDPOINT, READ_TIMEOUT};
use crate::domain::{QueryParams, SortOrder};
use crate::error::{AppError, EXIT_USAGE};

pub const ENV_MIN_MAGNITUDE: &str = "QUAKE_MIN_MAGNITUDE";
pub const ENV_MAX_MAGNITUDE: &str = "QUAKE_MAX_MAGNITUDE";
pub const ENV_ORDER_BY: &str = "QUAKE_ORDER_BY";
pub const ENV_LIMIT: &str = "QUAKE_LIMIT";
pub const ENV_ENDPOINT: &str = "QUAKE_ENDPOINT";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub params: QueryParams,
    pub endpoint: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            params: QueryParams::default(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            connect_timeout: CONNECT_TIMEOUT,
            read_timeout: READ_TIMEOUT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(raw) = lookup(ENV_MIN_MAGNITUDE) {
            settings.params.min_magnitude = parse_number(ENV_MIN_MAGNITUDE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_MAGNITUDE) {
            settings.params.max_magnitude = parse_number(ENV_MAX_MAGNITUDE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ORDER_BY) {
            settings.params.order = SortOrder::parse_setting(&raw);
        }
        if let Some(raw) = lookup(ENV_LIMIT) {
            settings.params.limit = parse_number(ENV_LIMIT, &raw)?;
        }
        if let Some(raw) = lookup(ENV_ENDPOINT) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                settings.endpoint = trimmed.to_string();
            }
        }

        Ok(settings)
    }

    /// Upper bound on how long one fetch-then-parse can take.
    pub fn request_budget(&self) -> Duration {
        self.connect_timeout + self.read_timeout + Duration::from_secs(5)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| AppError::new(EXIT_USAGE, format!("Invalid {key} value '{raw}'.")))
}
