//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the parsed event record (`EarthquakeRecord`)
//! - query configuration (`QueryParams`, `SortOrder`)

pub mod types;

pub use types::*;
