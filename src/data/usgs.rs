//! USGS FDSN event API client.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::config::Settings;
use crate::data::Fetch;
use crate::domain::QueryParams;
use crate::error::{AppError, EXIT_USAGE};

pub const DEFAULT_ENDPOINT: &str = "https://earthquake.usgs.gov/fdsnws/event/1/query";
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

pub struct UsgsClient {
    client: Client,
    endpoint: String,
}

impl UsgsClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Self::with_options(
            settings.endpoint.clone(),
            settings.connect_timeout,
            settings.read_timeout,
        )
    }

    /// Build a client against `endpoint`.
    ///
    /// The blocking client has no separate read timeout, so the whole-request
    /// budget is `connect + read`; connecting alone is still capped at `connect`.
    pub fn with_options(
        endpoint: impl Into<String>,
        connect: Duration,
        read: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(connect)
            .timeout(connect + read)
            .build()
            .map_err(|e| AppError::new(EXIT_USAGE, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn query_url(&self, params: &QueryParams) -> String {
        build_query_url(&self.endpoint, params)
    }
}

impl Fetch for UsgsClient {
    fn try_fetch(&self, params: &QueryParams) -> Result<String, AppError> {
        let url = self.query_url(params);
        tracing::debug!("GET {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| AppError::upstream(format!("USGS request failed: {e}")))?;

        if resp.status() != StatusCode::OK {
            return Err(AppError::upstream(format!(
                "USGS request failed with status {}.",
                resp.status()
            )));
        }

        resp.text()
            .map_err(|e| AppError::upstream(format!("Failed to read USGS response: {e}")))
    }
}

/// Embed the filter parameters as query values against `endpoint`.
///
/// Values are integers or fixed enum tokens, so no escaping is needed.
pub fn build_query_url(endpoint: &str, params: &QueryParams) -> String {
    format!(
        "{endpoint}?format=geojson&minmagnitude={}&maxmagnitude={}&limit={}&orderby={}",
        params.min_magnitude,
        params.max_magnitude,
        params.limit,
        params.order.query_token()
    )
}
