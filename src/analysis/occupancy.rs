//! Apron occupancy and overnight-stay detection.
//!
//! Occupancy is inferred from the arrival/departure balance since the start
//! of each calendar day. Days are processed independently: the counter
//! starts at zero every morning, so an aircraft parked overnight shows up as
//! a negative count when it departs before anything lands. That is expected
//! and never clamped.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::model::{Direction, EventSequence, FlightEvent};

// ---------------------------------------------------------------------------
// Tracker
// ---------------------------------------------------------------------------

/// An arrival that left the apron at or above the occupancy threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyEvent {
    pub date: NaiveDate,
    pub time: NaiveTime,
    /// `"<OP> <FLT>"` of the arrival.
    pub flight: String,
    pub apron_position: Option<String>,
    pub occupied: i32,
}

/// Running apron counter for one day.
///
/// Arrivals increment and may report; departures decrement and never report.
#[derive(Debug, Clone)]
pub struct OccupancyTracker {
    threshold: i32,
    occupied: i32,
}

impl OccupancyTracker {
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold,
            occupied: 0,
        }
    }

    pub fn occupied(&self) -> i32 {
        self.occupied
    }

    /// Start of a new day.
    pub fn reset(&mut self) {
        self.occupied = 0;
    }

    pub fn on_event(&mut self, event: &FlightEvent) -> Option<OccupancyEvent> {
        match event.direction {
            Direction::Arrival => {
                self.occupied += 1;
                (self.occupied >= self.threshold).then(|| OccupancyEvent {
                    date: event.date(),
                    time: event.time(),
                    flight: event.flight_id(),
                    apron_position: event.apron_position.clone(),
                    occupied: self.occupied,
                })
            }
            Direction::Departure => {
                self.occupied -= 1;
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyCount {
    pub occupied: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyScan {
    pub threshold: i32,
    pub events: Vec<OccupancyEvent>,
    /// Reported occupancy levels, ascending.
    pub frequency: Vec<OccupancyCount>,
}

impl OccupancyScan {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Runs the tracker over every day of the sequence in date order.
pub fn scan_occupancy(sequence: &EventSequence, threshold: i32) -> OccupancyScan {
    let mut tracker = OccupancyTracker::new(threshold);
    let mut events = Vec::new();

    for (_, day) in sequence.days() {
        tracker.reset();
        events.extend(day.iter().filter_map(|e| tracker.on_event(e)));
    }

    let mut levels: BTreeMap<i32, usize> = BTreeMap::new();
    for e in &events {
        *levels.entry(e.occupied).or_default() += 1;
    }

    OccupancyScan {
        threshold,
        events,
        frequency: levels
            .into_iter()
            .map(|(occupied, count)| OccupancyCount { occupied, count })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Overnight stays
// ---------------------------------------------------------------------------

/// A day on which more aircraft landed than left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OvernightStay {
    pub date: NaiveDate,
    pub arrivals: usize,
    pub departures: usize,
    /// `arrivals - departures`: aircraft still on the apron at day end.
    pub parked: usize,
}

pub fn overnight_stays(sequence: &EventSequence) -> Vec<OvernightStay> {
    sequence
        .days()
        .into_iter()
        .filter_map(|(date, day)| {
            let arrivals = day.iter().filter(|e| e.is_arrival()).count();
            let departures = day.len() - arrivals;
            (arrivals > departures).then(|| OvernightStay {
                date,
                arrivals,
                departures,
                parked: arrivals - departures,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
