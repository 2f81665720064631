/// Analysis parameters and their TOML configuration file.
///
/// Every knob the scanners, classifier, aggregator and normalizer read lives
/// in `AnalysisConfig`. Missing keys fall back to the defaults the airport
/// operations team has been using, so an empty file is a valid configuration.
///
/// ```toml
/// window_minutes = 45
/// min_consecutive = 3
/// min_combined = 4
/// threshold_comparison = "at_least"
///
/// [seat_overrides]
/// CRJ9 = 90
/// ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::alert::thresholds::ThresholdComparison;
use crate::analysis::classify::LabelVocabulary;
use crate::analysis::window::WindowAnchor;
use crate::fleet::{DEFAULT_HOME_OPERATOR, SeatTable};
use crate::model::AnalysisError;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "apron.toml";

// ---------------------------------------------------------------------------
// Input column names
// ---------------------------------------------------------------------------

/// Header names of the input table, per logical field.
///
/// Defaults follow the RIMA movement report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub operator: String,
    pub direction: String,
    pub date: String,
    pub time: String,
    pub flight_number: String,
    pub aircraft_type: String,
    pub service_type: String,
    pub local_pax: String,
    pub connecting_pax: String,
    pub apron_position: String,
    pub runway_threshold: String,
    pub origin_destination: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            operator: "AERONAVE_OPERADOR".to_string(),
            direction: "MOVIMENTO_TIPO".to_string(),
            date: "CALCO_DATA".to_string(),
            time: "CALCO_HORARIO".to_string(),
            flight_number: "VOO_NUMERO".to_string(),
            aircraft_type: "AERONAVE_TIPO".to_string(),
            service_type: "SERVICE_TYPE".to_string(),
            local_pax: "PAX_LOCAL".to_string(),
            connecting_pax: "PAX_CONEXAO_DOMESTICO".to_string(),
            apron_position: "BOX".to_string(),
            runway_threshold: "CABECEIRA".to_string(),
            origin_destination: "AEROPORTO_ORIGEM_DESTINO".to_string(),
        }
    }
}

impl ColumnNames {
    /// Columns that must be present for the run to start.
    pub fn required(&self) -> [&str; 8] {
        [
            self.operator.as_str(),
            self.direction.as_str(),
            self.date.as_str(),
            self.time.as_str(),
            self.flight_number.as_str(),
            self.aircraft_type.as_str(),
            self.service_type.as_str(),
            self.local_pax.as_str(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Analysis configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Window duration W, in minutes. Boundaries are inclusive.
    pub window_minutes: u32,
    /// Minimum size of a single-direction group.
    pub min_consecutive: usize,
    /// Minimum size of a mixed arrival/departure group.
    pub min_combined: usize,
    /// Local passenger alert level for single-direction groups.
    pub pax_threshold_consecutive: u32,
    /// Local passenger alert level for mixed groups.
    pub pax_threshold_combined: u32,
    pub threshold_comparison: ThresholdComparison,
    /// Drop groups that do not exceed their passenger threshold.
    pub only_over_threshold: bool,
    /// Apron occupancy at or above which an arrival is reported.
    pub occupancy_threshold: i32,
    /// Count connecting passengers in the KPI passenger totals.
    pub kpi_include_connecting: bool,
    pub home_operator: String,
    pub excluded_service_types: Vec<String>,
    pub excluded_operators: Vec<String>,
    pub window_anchor: WindowAnchor,
    pub labels: LabelVocabulary,
    pub columns: ColumnNames,
    pub seat_overrides: HashMap<String, u32>,
    /// Field separator of CSV input.
    pub csv_delimiter: char,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_minutes: 45,
            min_consecutive: 3,
            min_combined: 4,
            pax_threshold_consecutive: 484,
            pax_threshold_combined: 580,
            threshold_comparison: ThresholdComparison::AtLeast,
            only_over_threshold: false,
            occupancy_threshold: 4,
            kpi_include_connecting: true,
            home_operator: DEFAULT_HOME_OPERATOR.to_string(),
            excluded_service_types: vec!["P".to_string()],
            excluded_operators: vec![
                "GERAL".to_string(),
                "GENERAL".to_string(),
                "AVIAÇÃO GERAL".to_string(),
                "AVIACAO GERAL".to_string(),
            ],
            window_anchor: WindowAnchor::Forward,
            labels: LabelVocabulary::default(),
            columns: ColumnNames::default(),
            seat_overrides: HashMap::new(),
            csv_delimiter: ',',
        }
    }
}

impl AnalysisConfig {
    /// Parses a configuration from TOML text and validates it.
    pub fn from_toml_str(text: &str) -> Result<Self, AnalysisError> {
        let config: AnalysisConfig =
            toml::from_str(text).map_err(|e| AnalysisError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| AnalysisError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.min_consecutive == 0 {
            return Err(AnalysisError::InvalidConfig(
                "min_consecutive must be at least 1".to_string(),
            ));
        }
        if self.min_combined < 2 {
            return Err(AnalysisError::InvalidConfig(
                "min_combined must be at least 2 (one arrival and one departure)".to_string(),
            ));
        }
        if self.home_operator.trim().is_empty() {
            return Err(AnalysisError::InvalidConfig(
                "home_operator must not be empty".to_string(),
            ));
        }
        if !self.csv_delimiter.is_ascii() {
            return Err(AnalysisError::InvalidConfig(format!(
                "csv_delimiter must be a single ASCII character, got {:?}",
                self.csv_delimiter
            )));
        }
        let required = self.columns.required();
        if let Some(empty) = required.iter().find(|c| c.trim().is_empty()) {
            return Err(AnalysisError::InvalidConfig(format!(
                "required column name is empty ({:?})",
                empty
            )));
        }
        Ok(())
    }

    pub fn delimiter_byte(&self) -> u8 {
        self.csv_delimiter as u8
    }

    pub fn window(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.window_minutes))
    }

    pub fn seat_table(&self) -> SeatTable {
        SeatTable::new(&self.home_operator).with_overrides(&self.seat_overrides)
    }

    pub fn is_excluded_operator(&self, operator: &str) -> bool {
        let op = operator.trim().to_uppercase();
        self.excluded_operators
            .iter()
            .any(|x| x.trim().to_uppercase() == op)
    }

    pub fn is_excluded_service_type(&self, service_type: &str) -> bool {
        let st = service_type.trim().to_uppercase();
        self.excluded_service_types
            .iter()
            .any(|x| x.trim().to_uppercase() == st)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
