//! `quake-feed` library crate.
//!
//! The binary (`quake`) is a thin wrapper around this library so that:
//!
//! - the fetch/parse pipeline is testable without spawning processes
//! - another front-end can reuse the coordinator and formatting helpers

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod report;
