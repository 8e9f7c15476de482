//! Upstream data access: the USGS event query client and its response parser.

#[cfg(test)]
pub(crate) mod fixtures;
pub mod parse;
pub mod usgs;

pub use parse::{parse, parse_opt, try_parse};
pub use usgs::{UsgsClient, build_query_url};

use crate::domain::QueryParams;
use crate::error::AppError;

/// A source of raw feed text for a set of query parameters.
///
/// `try_fetch` keeps the failure reason; `fetch` collapses every failure to an
/// empty string so callers only ever see "text" or "no text".
pub trait Fetch: Send + Sync {
    fn try_fetch(&self, params: &QueryParams) -> Result<String, AppError>;

    fn fetch(&self, params: &QueryParams) -> String {
        match self.try_fetch(params) {
            Ok(body) => body,
            Err(err) => {
                tracing::warn!("Earthquake fetch failed: {err}");
                String::new()
            }
        }
    }
}
