//! Command-line parsing for the earthquake feed.
//!
//! Argument parsing stays separate from fetching and formatting; `app` turns
//! the parsed flags into `Settings` and runs the pipeline.

use clap::{Args, Parser, Subcommand};

use crate::domain::SortOrder;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "quake", version, about = "Recent earthquakes from the USGS event feed")]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. `warn`, `quake_feed=debug`).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and print the earthquake list.
    List(ListArgs),
    /// Print the query URL for the current settings without fetching.
    Url(FilterArgs),
}

/// Filter overrides; anything unset comes from the environment or defaults.
#[derive(Debug, Args, Clone, Default)]
pub struct FilterArgs {
    /// Minimum magnitude (0-10).
    #[arg(long = "min", value_name = "MAG")]
    pub min_magnitude: Option<i32>,

    /// Maximum magnitude (0-10).
    #[arg(long = "max", value_name = "MAG")]
    pub max_magnitude: Option<i32>,

    /// Sort order.
    #[arg(short = 'o', long, value_enum)]
    pub order: Option<SortOrder>,

    /// Maximum number of events to request.
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Override the USGS query endpoint.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,
}

#[derive(Debug, Args, Clone, Default)]
pub struct ListArgs {
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Print records as a JSON array instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Exit non-zero when the fetch fails instead of showing an empty list.
    #[arg(long)]
    pub strict: bool,

    /// Re-issue the request every SECS seconds until interrupted.
    #[arg(long, value_name = "SECS", conflicts_with = "strict")]
    pub watch: Option<u64>,

    /// Disable colored magnitudes.
    #[arg(long)]
    pub no_color: bool,

    /// Show times in UTC instead of the local time zone.
    #[arg(long)]
    pub utc: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_list_flags() {
        let cli = Cli::parse_from([
            "quake", "list", "--min", "2", "--max", "7", "-o", "magnitude-asc", "--json",
        ]);
        let Command::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.filters.min_magnitude, Some(2));
        assert_eq!(args.filters.max_magnitude, Some(7));
        assert_eq!(args.filters.order, Some(SortOrder::MagnitudeAscending));
        assert!(args.json);
        assert!(!args.strict);
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn strict_and_watch_conflict() {
        let res = Cli::try_parse_from(["quake", "list", "--strict", "--watch", "30"]);
        assert!(res.is_err());
    }

    #[test]
    fn url_accepts_order_tokens() {
        let cli = Cli::parse_from(["quake", "url", "--order", "time-asc"]);
        let Command::Url(args) = cli.command else {
            panic!("expected url");
        };
        assert_eq!(args.order, Some(SortOrder::TimeAscending));
    }
}
