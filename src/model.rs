/// Core data types for the apron capacity analysis service.
///
/// This module defines the shared domain model imported by all other modules:
/// the typed flight movement record, the time-ordered sequence the scanners
/// walk over, the discard record for rows that never make it into the
/// sequence, and the crate-wide error type.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Whether a movement lands at or leaves the airport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Direction {
    Arrival,
    Departure,
}

impl Direction {
    /// Parses a RIMA movement code.
    ///
    /// RIMA marks landings with `P` (pouso); `A` is accepted as well since
    /// several exports already translate the code. Departures are `D`.
    pub fn from_code(code: &str) -> Option<Direction> {
        match code.trim().to_ascii_uppercase().as_str() {
            "P" | "A" => Some(Direction::Arrival),
            "D" => Some(Direction::Departure),
            _ => None,
        }
    }

    /// Single-letter tag used in flight labels: `A` or `D`.
    pub fn tag(&self) -> char {
        match self {
            Direction::Arrival => 'A',
            Direction::Departure => 'D',
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Arrival => write!(f, "Arrival"),
            Direction::Departure => write!(f, "Departure"),
        }
    }
}

// ---------------------------------------------------------------------------
// Flight events
// ---------------------------------------------------------------------------

/// One validated movement from the log.
///
/// The timestamp is the combination of the separate date and time columns of
/// the source row, in airport local time. `seats_offered` is resolved once at
/// normalization time from the aircraft type and operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightEvent {
    pub timestamp: NaiveDateTime,
    pub direction: Direction,
    pub operator: String,
    pub flight_number: String,
    pub aircraft_type: String,
    pub local_pax: u32,
    pub connecting_pax: u32,
    pub seats_offered: u32,
    pub origin_destination: Option<String>,
    pub apron_position: Option<String>,
    pub runway_threshold: Option<String>,
}

impl FlightEvent {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.timestamp.time()
    }

    pub fn is_arrival(&self) -> bool {
        self.direction == Direction::Arrival
    }

    /// `"<OP> <FLT>"`, e.g. `"AZU 4021"`.
    pub fn flight_id(&self) -> String {
        format!("{} {}", self.operator, self.flight_number)
    }

    /// `"<OP> <FLT> - <TYPE>"`, optionally with an `(A)`/`(D)` marker after the
    /// flight number for mixed-direction listings.
    pub fn label(&self, with_direction: bool) -> String {
        if with_direction {
            format!(
                "{} {} ({}) - {}",
                self.operator,
                self.flight_number,
                self.direction.tag(),
                self.aircraft_type
            )
        } else {
            format!("{} {} - {}", self.operator, self.flight_number, self.aircraft_type)
        }
    }
}

// ---------------------------------------------------------------------------
// Event sequence
// ---------------------------------------------------------------------------

/// Flight events ordered ascending by timestamp.
///
/// Construction sorts stably, so events sharing a timestamp keep their input
/// order. Duplicates are retained. The sequence is read-only once built and
/// is shared by every analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventSequence {
    events: Vec<FlightEvent>,
}

impl EventSequence {
    pub fn new(mut events: Vec<FlightEvent>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self { events }
    }

    pub fn events(&self) -> &[FlightEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlightEvent> {
        self.events.iter()
    }

    /// Returns the sub-sequence of one direction, still in timestamp order.
    pub fn only(&self, direction: Direction) -> EventSequence {
        EventSequence {
            events: self
                .events
                .iter()
                .filter(|e| e.direction == direction)
                .cloned()
                .collect(),
        }
    }

    /// Splits the sequence into calendar days in ascending date order.
    pub fn days(&self) -> Vec<(NaiveDate, &[FlightEvent])> {
        let mut out = Vec::new();
        let mut start = 0;
        for i in 1..=self.events.len() {
            if i == self.events.len() || self.events[i].date() != self.events[start].date() {
                out.push((self.events[start].date(), &self.events[start..i]));
                start = i;
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a EventSequence {
    type Item = &'a FlightEvent;
    type IntoIter = std::slice::Iter<'a, FlightEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

// ---------------------------------------------------------------------------
// Discarded rows
// ---------------------------------------------------------------------------

/// A source row excluded from analysis, kept with its raw cells for the
/// data-health listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscardedRow {
    /// 1-based data row number (the header is row 0).
    pub row_number: usize,
    pub operator: String,
    pub flight_number: String,
    pub date: String,
    pub time: String,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort an analysis run.
///
/// Malformed rows are not errors; they end up as `DiscardedRow`s.
#[derive(Debug, PartialEq)]
pub enum AnalysisError {
    /// The input table lacks required columns. Lists every missing header.
    MissingColumns(Vec<String>),
    /// A configuration value is out of range or inconsistent.
    InvalidConfig(String),
    /// The input or configuration file could not be read.
    Io(String),
    /// The input or configuration file could not be parsed.
    Parse(String),
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::MissingColumns(cols) => {
                write!(f, "Missing required columns: {}", cols.join(", "))
            }
            AnalysisError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            AnalysisError::Io(msg) => write!(f, "I/O error: {}", msg),
            AnalysisError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for AnalysisError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn event(ts: &str, direction: Direction, flight: &str) -> FlightEvent {
        FlightEvent {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M").unwrap(),
            direction,
            operator: "AZU".to_string(),
            flight_number: flight.to_string(),
            aircraft_type: "E195".to_string(),
            local_pax: 100,
            connecting_pax: 0,
            seats_offered: 118,
            origin_destination: None,
            apron_position: None,
            runway_threshold: None,
        }
    }

    #[test]
    fn test_direction_codes() {
        assert_eq!(Direction::from_code("P"), Some(Direction::Arrival));
        assert_eq!(Direction::from_code(" a "), Some(Direction::Arrival));
        assert_eq!(Direction::from_code("d"), Some(Direction::Departure));
        assert_eq!(Direction::from_code("X"), None);
        assert_eq!(Direction::from_code(""), None);
    }

    #[test]
    fn test_sequence_sorts_stably_and_keeps_duplicates() {
        let seq = EventSequence::new(vec![
            event("2024-03-01 10:20", Direction::Arrival, "2"),
            event("2024-03-01 10:00", Direction::Arrival, "1"),
            event("2024-03-01 10:20", Direction::Arrival, "3"),
            event("2024-03-01 10:00", Direction::Arrival, "1"),
        ]);
        let flights: Vec<_> = seq.iter().map(|e| e.flight_number.as_str()).collect();
        assert_eq!(flights, vec!["1", "1", "2", "3"]);
    }

    #[test]
    fn test_only_filters_direction() {
        let seq = EventSequence::new(vec![
            event("2024-03-01 10:00", Direction::Arrival, "1"),
            event("2024-03-01 10:05", Direction::Departure, "2"),
            event("2024-03-01 10:10", Direction::Arrival, "3"),
        ]);
        assert_eq!(seq.only(Direction::Arrival).len(), 2);
        assert_eq!(seq.only(Direction::Departure).len(), 1);
    }

    #[test]
    fn test_days_split_in_date_order() {
        let seq = EventSequence::new(vec![
            event("2024-03-02 01:00", Direction::Arrival, "3"),
            event("2024-03-01 23:50", Direction::Arrival, "1"),
            event("2024-03-01 23:55", Direction::Departure, "2"),
        ]);
        let days = seq.days();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].0, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(days[0].1.len(), 2);
        assert_eq!(days[1].1.len(), 1);
    }

    #[test]
    fn test_days_of_empty_sequence() {
        assert!(EventSequence::default().days().is_empty());
    }

    #[test]
    fn test_labels() {
        let e = event("2024-03-01 10:00", Direction::Departure, "4021");
        assert_eq!(e.flight_id(), "AZU 4021");
        assert_eq!(e.label(false), "AZU 4021 - E195");
        assert_eq!(e.label(true), "AZU 4021 (D) - E195");
    }

    #[test]
    fn test_missing_columns_message_names_columns() {
        let err = AnalysisError::MissingColumns(vec!["PAX_LOCAL".into(), "VOO_NUMERO".into()]);
        assert_eq!(err.to_string(), "Missing required columns: PAX_LOCAL, VOO_NUMERO");
    }
}
