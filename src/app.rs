//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the log subscriber
//! - merges environment settings with flag overrides
//! - runs the feed pipeline and prints the result

use std::io::IsTerminal;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{Local, Utc};
use clap::Parser;

use crate::cli::{Command, FilterArgs, ListArgs};
use crate::config::Settings;
use crate::data::{UsgsClient, build_query_url};
use crate::domain::EarthquakeRecord;
use crate::error::{AppError, EXIT_UPSTREAM};

pub mod coordinator;
pub mod pipeline;

use coordinator::RequestCoordinator;
use pipeline::FeedOutcome;

/// Entry point for the `quake` binary.
pub fn run() -> Result<(), AppError> {
    // `quake` and `quake --min 4` behave like `quake list ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_tracing(&cli.log_level);

    match cli.command {
        Command::List(args) => handle_list(args),
        Command::Url(args) => handle_url(args),
    }
}

fn init_tracing(fallback: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Environment settings with flag overrides applied, validated.
pub fn settings_from_args(args: &FilterArgs) -> Result<Settings, AppError> {
    let settings = Settings::from_env()?;
    apply_overrides(settings, args)
}

fn apply_overrides(mut settings: Settings, args: &FilterArgs) -> Result<Settings, AppError> {
    if let Some(min) = args.min_magnitude {
        settings.params.min_magnitude = min;
    }
    if let Some(max) = args.max_magnitude {
        settings.params.max_magnitude = max;
    }
    if let Some(order) = args.order {
        settings.params.order = order;
    }
    if let Some(limit) = args.limit {
        settings.params.limit = limit;
    }
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    settings.params.validate()?;
    Ok(settings)
}

fn handle_url(args: FilterArgs) -> Result<(), AppError> {
    let settings = settings_from_args(&args)?;
    println!("{}", build_query_url(&settings.endpoint, &settings.params));
    Ok(())
}

fn handle_list(args: ListArgs) -> Result<(), AppError> {
    let settings = settings_from_args(&args.filters)?;
    let client = Arc::new(UsgsClient::from_settings(&settings)?);

    if args.strict {
        return match pipeline::run_feed_detailed(client.as_ref(), &settings.params) {
            FeedOutcome::Failed(reason) => Err(AppError::upstream(reason)),
            outcome => print_records(&outcome.into_records(), &settings, &args),
        };
    }

    let coordinator = RequestCoordinator::new(client);
    loop {
        // Fresh slot per round so a late reply from an earlier round is never shown.
        coordinator.reset();
        coordinator.submit(settings.params)?;

        let records = match coordinator.wait(settings.request_budget()) {
            Some(delivery) => delivery.records,
            None => {
                tracing::warn!("No reply within {:?}", settings.request_budget());
                Vec::new()
            }
        };
        print_records(&records, &settings, &args)?;

        let Some(secs) = args.watch else {
            return Ok(());
        };
        thread::sleep(Duration::from_secs(secs.max(1)));
    }
}

fn print_records(records: &[EarthquakeRecord], settings: &Settings, args: &ListArgs) -> Result<(), AppError> {
    if args.json {
        let text = serde_json::to_string_pretty(records)
            .map_err(|e| AppError::new(EXIT_UPSTREAM, format!("Failed to encode records as JSON: {e}")))?;
        println!("{text}");
        return Ok(());
    }

    let colored = !args.no_color && std::io::stdout().is_terminal();
    println!("{}", crate::report::format_query_summary(&settings.params));
    let table = if args.utc {
        crate::report::format_feed(records, &Utc, colored)
    } else {
        crate::report::format_feed(records, &Local, colored)
    };
    println!("{table}");
    Ok(())
}

/// Rewrite argv so `quake` defaults to `quake list`.
///
/// Rules:
/// - `quake`                      -> `quake list`
/// - `quake --min 4 ...`          -> `quake list --min 4 ...`
/// - `quake --help/--version/-h`  -> unchanged
/// - any argv already naming a subcommand -> unchanged
///
/// Values of flags (`--endpoint url`) are never mistaken for subcommands.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("list".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let names_subcommand = matches!(first_positional(&argv), Some("list" | "url" | "help"));
    if names_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "list".to_string());
    }
    argv
}

/// Flags whose next token is their value rather than a subcommand.
const FLAGS_WITH_VALUE: [&str; 9] = [
    "--log-level",
    "--min",
    "--max",
    "-o",
    "--order",
    "-n",
    "--limit",
    "--endpoint",
    "--watch",
];

/// First argument after the program name that is neither a flag nor a flag's value.
fn first_positional(argv: &[String]) -> Option<&str> {
    let mut args = argv.iter().skip(1);
    while let Some(arg) = args.next() {
        if FLAGS_WITH_VALUE.contains(&arg.as_str()) {
            args.next();
        } else if !arg.starts_with('-') {
            return Some(arg.as_str());
        }
    }
    None
}
