//! Passenger and seat totals per qualifying group.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::alert::thresholds::PaxThreshold;
use crate::analysis::window::Group;
use crate::model::FlightEvent;

/// Summed metrics of a set of events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupTotals {
    pub local_pax: u64,
    pub connecting_pax: u64,
    pub seats_offered: u64,
}

impl GroupTotals {
    pub fn of(events: &[FlightEvent]) -> Self {
        events.iter().fold(GroupTotals::default(), |mut acc, e| {
            acc.local_pax += u64::from(e.local_pax);
            acc.connecting_pax += u64::from(e.connecting_pax);
            acc.seats_offered += u64::from(e.seats_offered);
            acc
        })
    }
}

/// One position of a reported group: when, and which flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSlot {
    pub timestamp: NaiveDateTime,
    pub flight: String,
}

/// A qualifying group ready for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedGroup {
    pub start_index: usize,
    pub size: usize,
    pub arrivals: usize,
    pub departures: usize,
    pub slots: Vec<GroupSlot>,
    /// Set for mixed groups only.
    pub combination_label: Option<String>,
    pub totals: GroupTotals,
    pub exceeds_threshold: bool,
}

/// Totals a group and tags it against `threshold`.
///
/// Mixed groups pass their combination label, which also switches the slot
/// labels to include the `(A)`/`(D)` marker.
pub fn aggregate(
    group: &Group,
    threshold: &PaxThreshold,
    combination_label: Option<String>,
) -> AggregatedGroup {
    let with_direction = combination_label.is_some();
    let totals = GroupTotals::of(&group.events);
    AggregatedGroup {
        start_index: group.start_index,
        size: group.size(),
        arrivals: group.arrivals,
        departures: group.departures,
        slots: group
            .events
            .iter()
            .map(|e| GroupSlot {
                timestamp: e.timestamp,
                flight: e.label(with_direction),
            })
            .collect(),
        combination_label,
        totals,
        exceeds_threshold: threshold.is_exceeded_by(totals.local_pax),
    }
}
