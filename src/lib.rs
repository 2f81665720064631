//! Apron capacity analysis over airport movement logs.
//!
//! Finds clusters of landings and takeoffs that fall within a fixed time
//! window, classifies them by arrival/departure mix, totals their passengers
//! and seats, and tracks apron occupancy through each day.
//!
//! Typical use:
//!
//! ```no_run
//! use apron_monitor::config::AnalysisConfig;
//! use apron_monitor::ingest::table::RawTable;
//! use apron_monitor::report::run_analysis;
//!
//! let config = AnalysisConfig::load_or_default("apron.toml")?;
//! let table = RawTable::from_csv_path("rima.csv", config.delimiter_byte())?;
//! let report = run_analysis(&table, &config)?;
//! println!("{}", report.to_json()?);
//! # Ok::<(), apron_monitor::model::AnalysisError>(())
//! ```

pub mod alert;
pub mod analysis;
pub mod config;
pub mod fleet;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
