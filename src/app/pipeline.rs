//! Shared "feed pipeline" logic used by the CLI and the background coordinator.
//!
//! parameters -> URL -> HTTP GET -> raw text -> parsed records
//!
//! The default path is fail-soft: transport and parse failures both come back
//! as an empty list. `run_feed_detailed` keeps the distinction for callers that
//! need to tell "nothing matched" apart from "could not fetch".

use crate::data::{Fetch, parse, try_parse};
use crate::domain::{EarthquakeRecord, QueryParams};

/// Tagged result of one feed request.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedOutcome {
    Records(Vec<EarthquakeRecord>),
    /// The upstream answered and nothing matched the filters.
    Empty,
    Failed(String),
}

impl FeedOutcome {
    /// Collapse to the fail-soft view.
    pub fn into_records(self) -> Vec<EarthquakeRecord> {
        match self {
            FeedOutcome::Records(records) => records,
            FeedOutcome::Empty | FeedOutcome::Failed(_) => Vec::new(),
        }
    }
}

/// Fetch then parse; every failure yields an empty list.
pub fn run_feed(fetcher: &dyn Fetch, params: &QueryParams) -> Vec<EarthquakeRecord> {
    let raw = fetcher.fetch(params);
    parse(&raw)
}

/// Fetch then parse, keeping the failure reason.
pub fn run_feed_detailed(fetcher: &dyn Fetch, params: &QueryParams) -> FeedOutcome {
    let raw = match fetcher.try_fetch(params) {
        Ok(raw) => raw,
        Err(err) => return FeedOutcome::Failed(err.to_string()),
    };
    match try_parse(&raw) {
        Ok(records) if records.is_empty() => FeedOutcome::Empty,
        Ok(records) => FeedOutcome::Records(records),
        Err(err) => FeedOutcome::Failed(err.to_string()),
    }
}
