//! Full analysis run and its serializable report.
//!
//! `run_analysis` normalizes the input once and hands the resulting
//! read-only sequence to every scan. The scans share nothing mutable, so
//! they run side by side with `rayon::join`; the report is identical to a
//! sequential run.

use chrono::{NaiveDateTime, Utc};
use serde::Serialize;

use crate::analysis::groups::{GroupScan, ScanParams, scan_combined, scan_consecutive};
use crate::analysis::kpi::{self, KpiFilter, KpiSummary};
use crate::analysis::occupancy::{OccupancyScan, OvernightStay, overnight_stays, scan_occupancy};
use crate::analysis::window::WindowAnchor;
use crate::config::AnalysisConfig;
use crate::ingest::normalize::{NormalizationReport, normalize};
use crate::ingest::table::RawTable;
use crate::logging::{self, Component};
use crate::model::{AnalysisError, DiscardedRow, Direction, EventSequence};

// ============================================================================
// Report Structures
// ============================================================================

/// Parameters in force for a run, echoed into the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportParameters {
    pub window_minutes: u32,
    pub window_anchor: WindowAnchor,
    pub min_consecutive: usize,
    pub min_combined: usize,
    pub pax_threshold_consecutive: u32,
    pub pax_threshold_combined: u32,
    /// `">="` or `">"`.
    pub threshold_comparison: String,
    pub only_over_threshold: bool,
    pub occupancy_threshold: i32,
    pub kpi_include_connecting: bool,
    pub home_operator: String,
}

impl ReportParameters {
    fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            window_minutes: config.window_minutes,
            window_anchor: config.window_anchor,
            min_consecutive: config.min_consecutive,
            min_combined: config.min_combined,
            pax_threshold_consecutive: config.pax_threshold_consecutive,
            pax_threshold_combined: config.pax_threshold_combined,
            threshold_comparison: config.threshold_comparison.symbol().to_string(),
            only_over_threshold: config.only_over_threshold,
            occupancy_threshold: config.occupancy_threshold,
            kpi_include_connecting: config.kpi_include_connecting,
            home_operator: config.home_operator.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub generated_at: NaiveDateTime,
    pub parameters: ReportParameters,
    pub data_health: NormalizationReport,
    pub discarded: Vec<DiscardedRow>,
    pub arrivals: GroupScan,
    pub departures: GroupScan,
    pub combined: GroupScan,
    pub occupancy: OccupancyScan,
    pub overnight: Vec<OvernightStay>,
    pub kpis: KpiSummary,
}

/// Results of every scan over one sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResults {
    pub arrivals: GroupScan,
    pub departures: GroupScan,
    pub combined: GroupScan,
    pub occupancy: OccupancyScan,
    pub overnight: Vec<OvernightStay>,
    pub kpis: KpiSummary,
}

// ============================================================================
// Runs
// ============================================================================

/// Runs every scan over an already normalized sequence.
pub fn run_scans(sequence: &EventSequence, config: &AnalysisConfig) -> ScanResults {
    let consecutive_params = ScanParams::consecutive(config);
    let combined_params = ScanParams::combined(config);
    let kpi_filter = KpiFilter {
        include_connecting: config.kpi_include_connecting,
        ..KpiFilter::default()
    };

    let ((arrivals, departures), (combined, (occupancy, (overnight, kpis)))) = rayon::join(
        || {
            rayon::join(
                || {
                    scan_consecutive(
                        sequence,
                        Direction::Arrival,
                        &consecutive_params,
                        &config.labels,
                    )
                },
                || {
                    scan_consecutive(
                        sequence,
                        Direction::Departure,
                        &consecutive_params,
                        &config.labels,
                    )
                },
            )
        },
        || {
            rayon::join(
                || scan_combined(sequence, &combined_params, &config.labels),
                || {
                    rayon::join(
                        || scan_occupancy(sequence, config.occupancy_threshold),
                        || {
                            (
                                overnight_stays(sequence),
                                kpi::summarize(sequence, &kpi_filter),
                            )
                        },
                    )
                },
            )
        },
    );

    for (name, scan) in [
        ("consecutive arrivals", &arrivals),
        ("consecutive departures", &departures),
        ("combined operations", &combined),
    ] {
        logging::log_scan_summary(Component::Scanner, name, scan.qualifying, scan.flagged);
    }
    logging::info(
        Component::Occupancy,
        None,
        &format!(
            "{} arrivals at or above {} occupied positions, {} overnight days",
            occupancy.events.len(),
            config.occupancy_threshold,
            overnight.len()
        ),
    );

    ScanResults {
        arrivals,
        departures,
        combined,
        occupancy,
        overnight,
        kpis,
    }
}

/// Validates the configuration, normalizes the table, and runs every scan.
///
/// Fails before scanning on configuration or schema errors. Empty results
/// are not errors.
pub fn run_analysis(
    table: &RawTable,
    config: &AnalysisConfig,
) -> Result<AnalysisReport, AnalysisError> {
    config.validate()?;
    let normalized = normalize(table, config)?;
    let results = run_scans(&normalized.sequence, config);

    Ok(AnalysisReport {
        generated_at: Utc::now().naive_utc(),
        parameters: ReportParameters::from_config(config),
        data_health: normalized.report,
        discarded: normalized.discarded,
        arrivals: results.arrivals,
        departures: results.departures,
        combined: results.combined,
        occupancy: results.occupancy,
        overnight: results.overnight,
        kpis: results.kpis,
    })
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(self).map_err(|e| AnalysisError::Parse(e.to_string()))
    }
}
