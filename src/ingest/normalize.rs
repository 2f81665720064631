/// Record normalizer: raw table rows to typed flight events.
///
/// Schema problems are fatal and reported before any row is looked at.
/// Row problems never are: a row with an unreadable date, time or movement
/// code is set aside as a `DiscardedRow` with every reason that applies, and
/// the rest of the file carries on. Rows outside the analysis scope (general
/// aviation operators, excluded service types) are dropped silently and only
/// counted.
///
/// Passenger counts are lenient: anything that does not read as a
/// non-negative number counts as zero.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::config::{AnalysisConfig, ColumnNames};
use crate::ingest::table::RawTable;
use crate::logging::{self, Component};
use crate::model::{AnalysisError, DiscardedRow, Direction, EventSequence, FlightEvent};

/// Date layouts accepted in the date column, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d", "%d-%m-%Y"];

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Data-health counts for one normalization pass.
///
/// `total_rows == filtered_out + valid + discarded`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationReport {
    pub total_rows: usize,
    pub filtered_out: usize,
    pub valid: usize,
    pub discarded: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub sequence: EventSequence,
    pub discarded: Vec<DiscardedRow>,
    pub report: NormalizationReport,
}

// ---------------------------------------------------------------------------
// Column resolution
// ---------------------------------------------------------------------------

struct ColumnIndex {
    operator: usize,
    direction: usize,
    date: usize,
    time: usize,
    flight_number: usize,
    aircraft_type: usize,
    service_type: usize,
    local_pax: usize,
    connecting_pax: Option<usize>,
    apron_position: Option<usize>,
    runway_threshold: Option<usize>,
    origin_destination: Option<usize>,
}

impl ColumnIndex {
    fn resolve(table: &RawTable, names: &ColumnNames) -> Result<Self, AnalysisError> {
        let missing: Vec<String> = names
            .required()
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(AnalysisError::MissingColumns(missing));
        }

        // Every required name was found above.
        let idx = |name: &str| table.column_index(name).unwrap_or_default();
        Ok(Self {
            operator: idx(&names.operator),
            direction: idx(&names.direction),
            date: idx(&names.date),
            time: idx(&names.time),
            flight_number: idx(&names.flight_number),
            aircraft_type: idx(&names.aircraft_type),
            service_type: idx(&names.service_type),
            local_pax: idx(&names.local_pax),
            connecting_pax: table.column_index(&names.connecting_pax),
            apron_position: table.column_index(&names.apron_position),
            runway_threshold: table.column_index(&names.runway_threshold),
            origin_destination: table.column_index(&names.origin_destination),
        })
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(|c| c.trim()).unwrap_or("")
}

fn optional_cell(row: &[String], idx: Option<usize>) -> Option<String> {
    idx.map(|i| cell(row, i))
        .filter(|c| !c.is_empty())
        .map(String::from)
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Turns a raw table into the sorted event sequence plus the discard list.
///
/// Fails only when required columns are missing.
pub fn normalize(table: &RawTable, config: &AnalysisConfig) -> Result<Normalized, AnalysisError> {
    let cols = ColumnIndex::resolve(table, &config.columns)?;
    let seats = config.seat_table();

    let mut report = NormalizationReport {
        total_rows: table.len(),
        ..NormalizationReport::default()
    };
    let mut events = Vec::with_capacity(table.len());
    let mut discarded = Vec::new();

    for (i, row) in table.rows().iter().enumerate() {
        let row_number = i + 1;
        let operator = cell(row, cols.operator).to_uppercase();
        let service_type = cell(row, cols.service_type);

        if config.is_excluded_operator(&operator) || config.is_excluded_service_type(service_type) {
            report.filtered_out += 1;
            continue;
        }

        let raw_date = cell(row, cols.date);
        let raw_time = cell(row, cols.time);
        let raw_direction = cell(row, cols.direction);

        let mut reasons = Vec::new();
        let date = parse_date(raw_date);
        if date.is_none() {
            reasons.push(format!("invalid date {:?}", raw_date));
        }
        let time = parse_time(raw_time);
        if time.is_none() {
            reasons.push(format!("invalid time {:?}", raw_time));
        }
        let direction = Direction::from_code(raw_direction);
        if direction.is_none() {
            reasons.push(format!("invalid movement type {:?}", raw_direction));
        }

        let (Some(date), Some(time), Some(direction)) = (date, time, direction) else {
            let reason = reasons.join("; ");
            logging::log_discard(row_number, &reason);
            discarded.push(DiscardedRow {
                row_number,
                operator,
                flight_number: cell(row, cols.flight_number).to_string(),
                date: raw_date.to_string(),
                time: raw_time.to_string(),
                reason,
            });
            continue;
        };

        let aircraft_type = cell(row, cols.aircraft_type).to_string();
        let seats_offered = seats.seats(&operator, &aircraft_type);
        if seats_offered == 0 {
            logging::debug(
                Component::Normalizer,
                Some(&format!("row {}", row_number)),
                &format!("unknown aircraft type {:?}, counting 0 seats", aircraft_type),
            );
        }

        events.push(FlightEvent {
            timestamp: NaiveDateTime::new(date, time),
            direction,
            flight_number: cell(row, cols.flight_number).to_string(),
            aircraft_type,
            local_pax: parse_count(cell(row, cols.local_pax)),
            connecting_pax: cols
                .connecting_pax
                .map(|i| parse_count(cell(row, i)))
                .unwrap_or(0),
            seats_offered,
            origin_destination: optional_cell(row, cols.origin_destination),
            apron_position: optional_cell(row, cols.apron_position),
            runway_threshold: optional_cell(row, cols.runway_threshold),
            operator,
        });
    }

    report.valid = events.len();
    report.discarded = discarded.len();
    logging::log_normalization_summary(
        report.total_rows,
        report.valid,
        report.filtered_out,
        report.discarded,
    );

    Ok(Normalized {
        sequence: EventSequence::new(events),
        discarded,
        report,
    })
}

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

/// Parses the date column. A trailing time part (`2024-03-01 00:00:00`,
/// `2024-03-01T00:00:00`) is ignored.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split([' ', 'T']).next().unwrap_or("");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Extracts the first `H:MM[:SS[.ffffff]]` token from the time column.
/// Fractional seconds are dropped. Only the first token is considered, so
/// `25:00` is invalid rather than read as `5:00`.
pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let bytes = raw.as_bytes();
    let (hour, minute, second) = (0..bytes.len()).find_map(|start| match_time_at(bytes, start))?;
    NaiveTime::from_hms_opt(hour, minute, second)
}

fn match_time_at(bytes: &[u8], start: usize) -> Option<(u32, u32, u32)> {
    // One- or two-digit hour; prefer the longer match.
    [2, 1].iter().find_map(|&hour_len| {
        let hour = digits(bytes, start, hour_len)?;
        let mut pos = start + hour_len;
        if bytes.get(pos) != Some(&b':') {
            return None;
        }
        pos += 1;
        let minute = digits(bytes, pos, 2)?;
        pos += 2;

        let second = if bytes.get(pos) == Some(&b':') {
            digits(bytes, pos + 1, 2).unwrap_or(0)
        } else {
            0
        };
        Some((hour, minute, second))
    })
}

fn digits(bytes: &[u8], start: usize, len: usize) -> Option<u32> {
    let slice = bytes.get(start..start + len)?;
    if !slice.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(slice.iter().fold(0, |acc, b| acc * 10 + u32::from(b - b'0')))
}

/// Lenient passenger count: empty, non-numeric or negative values read as 0,
/// decimals are truncated.
pub fn parse_count(raw: &str) -> u32 {
    let raw = raw.trim();
    if let Ok(n) = raw.parse::<i64>() {
        return u32::try_from(n.max(0)).unwrap_or(u32::MAX);
    }
    match raw.parse::<f64>() {
        Ok(x) if x.is_finite() && x > 0.0 => x.trunc().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
