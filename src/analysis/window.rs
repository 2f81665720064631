//! Sliding time-window scanner.
//!
//! Given flight events sorted by timestamp and a window duration W, the
//! scanner produces one candidate window per event:
//!
//! - `Forward` anchors the window at each event and extends it over every
//!   following event no more than W after the anchor. A cluster of k events
//!   is therefore reported once per anchor inside it, with decreasing size.
//!   Report totals depend on that cardinality.
//! - `Trailing` ends the window at each event and reaches back over every
//!   earlier event no more than W before it.
//!
//! Both forms are a monotonic two-pointer walk: neither pointer ever moves
//! backwards, so a full scan is O(n). Boundaries are inclusive, an event
//! exactly W after the anchor belongs to the window.

use std::ops::Range;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::analysis::classify::Combination;
use crate::model::{Direction, FlightEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowAnchor {
    /// One window starting at each event.
    #[default]
    Forward,
    /// One window ending at each event.
    Trailing,
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowScanner {
    window: Duration,
    anchor: WindowAnchor,
}

impl WindowScanner {
    /// A negative `window` is treated as zero.
    pub fn new(window: Duration, anchor: WindowAnchor) -> Self {
        Self {
            window: window.max(Duration::zero()),
            anchor,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Index ranges of every candidate window, one per event, in event order.
    ///
    /// `events` must be sorted ascending by timestamp.
    pub fn windows(&self, events: &[FlightEvent]) -> Vec<Range<usize>> {
        debug_assert!(
            events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp),
            "window scan requires timestamp-ordered events"
        );
        match self.anchor {
            WindowAnchor::Forward => self.forward(events),
            WindowAnchor::Trailing => self.trailing(events),
        }
    }

    /// Materialises every candidate window as a `Group`.
    pub fn groups(&self, events: &[FlightEvent]) -> Vec<Group> {
        self.windows(events)
            .into_iter()
            .map(|range| Group::new(range.start, &events[range]))
            .collect()
    }

    fn forward(&self, events: &[FlightEvent]) -> Vec<Range<usize>> {
        let mut out = Vec::with_capacity(events.len());
        let mut end = 0;
        for start in 0..events.len() {
            end = end.max(start + 1);
            while end < events.len()
                && events[end].timestamp - events[start].timestamp <= self.window
            {
                end += 1;
            }
            out.push(start..end);
        }
        out
    }

    fn trailing(&self, events: &[FlightEvent]) -> Vec<Range<usize>> {
        let mut out = Vec::with_capacity(events.len());
        let mut start = 0;
        for end in 0..events.len() {
            while events[end].timestamp - events[start].timestamp > self.window {
                start += 1;
            }
            out.push(start..end + 1);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// A contiguous run of events produced by the scanner.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Index of the first event in the scanned sequence.
    pub start_index: usize,
    pub events: Vec<FlightEvent>,
    pub arrivals: usize,
    pub departures: usize,
}

impl Group {
    pub fn new(start_index: usize, events: &[FlightEvent]) -> Self {
        let arrivals = events
            .iter()
            .filter(|e| e.direction == Direction::Arrival)
            .count();
        Self {
            start_index,
            events: events.to_vec(),
            arrivals,
            departures: events.len() - arrivals,
        }
    }

    pub fn size(&self) -> usize {
        self.events.len()
    }

    pub fn combination(&self) -> Combination {
        Combination::new(self.arrivals, self.departures)
    }

    /// Time between the first and last event.
    pub fn span(&self) -> Duration {
        match (self.events.first(), self.events.last()) {
            (Some(first), Some(last)) => last.timestamp - first.timestamp,
            _ => Duration::zero(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(hhmm: &str, direction: Direction) -> FlightEvent {
        FlightEvent {
            timestamp: NaiveDateTime::parse_from_str(
                &format!("2024-03-01 {}", hhmm),
                "%Y-%m-%d %H:%M",
            )
            .unwrap(),
            direction,
            operator: "GLO".to_string(),
            flight_number: hhmm.replace(':', ""),
            aircraft_type: "B738".to_string(),
            local_pax: 150,
            connecting_pax: 0,
            seats_offered: 186,
            origin_destination: None,
            apron_position: None,
            runway_threshold: None,
        }
    }

    fn arrivals(times: &[&str]) -> Vec<FlightEvent> {
        times.iter().map(|t| at(t, Direction::Arrival)).collect()
    }

    fn forward(minutes: i64) -> WindowScanner {
        WindowScanner::new(Duration::minutes(minutes), WindowAnchor::Forward)
    }

    // --- Forward anchoring ---------------------------------------------------

    #[test]
    fn test_three_events_within_window() {
        let events = arrivals(&["10:00", "10:20", "10:40"]);
        let windows = forward(45).windows(&events);
        assert_eq!(windows, vec![0..3, 1..3, 2..3]);
    }

    #[test]
    fn test_gap_longer_than_window_splits() {
        // 10:20 -> 11:06 is a 46-minute gap.
        let events = arrivals(&["10:00", "10:20", "11:06"]);
        let windows = forward(45).windows(&events);
        assert_eq!(windows, vec![0..2, 1..2, 2..3]);
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let events = arrivals(&["10:00", "10:45", "10:46"]);
        let windows = forward(45).windows(&events);
        assert_eq!(windows[0], 0..2, "event exactly W after the anchor is included");
        assert_eq!(windows[1], 1..3);
    }

    #[test]
    fn test_run_of_five_reports_once_per_anchor() {
        let events = arrivals(&["08:00", "08:05", "08:10", "08:15", "08:20"]);
        let sizes: Vec<_> = forward(45)
            .windows(&events)
            .iter()
            .map(|r| r.len())
            .collect();
        assert_eq!(sizes, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_zero_window_groups_identical_timestamps() {
        let events = arrivals(&["09:00", "09:00", "09:01"]);
        let windows = forward(0).windows(&events);
        assert_eq!(windows, vec![0..2, 1..2, 2..3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(forward(45).windows(&[]).is_empty());
        assert!(forward(45).groups(&[]).is_empty());
    }

    // --- Trailing anchoring -------------------------------------------------

    #[test]
    fn test_trailing_windows_end_at_each_event() {
        let events = arrivals(&["10:00", "10:20", "10:40", "11:30"]);
        let scanner = WindowScanner::new(Duration::minutes(45), WindowAnchor::Trailing);
        assert_eq!(scanner.windows(&events), vec![0..1, 0..2, 0..3, 3..4]);
    }

    #[test]
    fn test_negative_window_behaves_as_zero() {
        let events = arrivals(&["10:00", "10:00", "10:05"]);
        for anchor in [WindowAnchor::Forward, WindowAnchor::Trailing] {
            let negative = WindowScanner::new(Duration::minutes(-1), anchor);
            let zero = WindowScanner::new(Duration::zero(), anchor);
            assert_eq!(negative.window(), Duration::zero());
            assert_eq!(negative.windows(&events), zero.windows(&events));
        }
        let scanner = WindowScanner::new(Duration::minutes(-1), WindowAnchor::Trailing);
        assert_eq!(scanner.windows(&events[2..]), vec![0..1]);
    }

    // --- Window property ----------------------------------------------------

    #[test]
    fn test_every_window_spans_at_most_w() {
        let events = arrivals(&[
            "06:00", "06:10", "06:44", "06:45", "07:31", "07:31", "08:00", "08:59", "09:00",
        ]);
        for minutes in [0, 1, 15, 30, 45, 90, 600] {
            for anchor in [WindowAnchor::Forward, WindowAnchor::Trailing] {
                let scanner = WindowScanner::new(Duration::minutes(minutes), anchor);
                for group in scanner.groups(&events) {
                    assert!(
                        group.span() <= Duration::minutes(minutes),
                        "group at {} spans {:?} > {} min",
                        group.start_index,
                        group.span(),
                        minutes
                    );
                }
            }
        }
    }

    #[test]
    fn test_forward_windows_are_maximal() {
        let events = arrivals(&["06:00", "06:10", "06:44", "06:46", "07:31"]);
        let window = Duration::minutes(45);
        for range in forward(45).windows(&events) {
            if range.end < events.len() {
                assert!(
                    events[range.end].timestamp - events[range.start].timestamp > window,
                    "window starting at {} stopped early",
                    range.start
                );
            }
        }
    }

    // --- Groups -------------------------------------------------------------

    #[test]
    fn test_group_counts_directions() {
        let events = vec![
            at("10:00", Direction::Arrival),
            at("10:05", Direction::Departure),
            at("10:10", Direction::Arrival),
        ];
        let group = Group::new(0, &events);
        assert_eq!(group.size(), 3);
        assert_eq!(group.arrivals, 2);
        assert_eq!(group.departures, 1);
        assert_eq!(group.span(), Duration::minutes(10));
    }
}
