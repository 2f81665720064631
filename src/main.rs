//! Command-line entry point.
//!
//! ```text
//! apron_monitor <movements.csv> [report.json]
//! ```
//!
//! Settings come from `apron.toml` (or the file named by `APRON_CONFIG`).
//! `APRON_LOG_LEVEL` and `APRON_LOG_FILE` control logging; all three may be
//! set in a `.env` file.

use std::env;
use std::fs;
use std::process::ExitCode;

use apron_monitor::config::{AnalysisConfig, DEFAULT_CONFIG_FILE};
use apron_monitor::ingest::table::RawTable;
use apron_monitor::logging::{self, Component, LogLevel};
use apron_monitor::report::run_analysis;

fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let level = env::var("APRON_LOG_LEVEL")
        .ok()
        .and_then(|l| LogLevel::from_name(&l))
        .unwrap_or(LogLevel::Info);
    let log_file = env::var("APRON_LOG_FILE").ok();
    logging::init_logger(level, log_file.as_deref(), log_file.is_some());

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            logging::error(Component::System, None, &e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(input) = args.first() else {
        return Err("usage: apron_monitor <movements.csv> [report.json]".into());
    };

    let config_path = env::var("APRON_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let config = AnalysisConfig::load_or_default(&config_path)?;
    logging::info(
        Component::Config,
        Some(&config_path),
        &format!(
            "window {} min, min group {}/{}, PAX {} {}/{}",
            config.window_minutes,
            config.min_consecutive,
            config.min_combined,
            config.threshold_comparison.symbol(),
            config.pax_threshold_consecutive,
            config.pax_threshold_combined
        ),
    );

    let table = RawTable::from_csv_path(input, config.delimiter_byte())?;
    let report = run_analysis(&table, &config)?;
    let json = report.to_json()?;

    match args.get(1) {
        Some(output) => {
            fs::write(output, json)?;
            logging::info(Component::System, Some(output), "report written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
