//! Single-direction and combined group scans.
//!
//! Each scan runs the window scanner over the sequence, keeps the windows the
//! classifier accepts, aggregates them, and counts them in a frequency table.
//! Frequencies are counted over every qualifying group before the
//! `only_over_threshold` filter trims the group list.

use std::collections::BTreeMap;

use chrono::Duration;
use serde::Serialize;

use crate::alert::thresholds::PaxThreshold;
use crate::analysis::aggregate::{AggregatedGroup, aggregate};
use crate::analysis::classify::{Combination, GroupRule, LabelVocabulary};
use crate::analysis::window::{WindowAnchor, WindowScanner};
use crate::config::AnalysisConfig;
use crate::model::{Direction, EventSequence};

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanParams {
    pub window: Duration,
    pub anchor: WindowAnchor,
    pub min_size: usize,
    pub threshold: PaxThreshold,
    pub only_over_threshold: bool,
}

impl ScanParams {
    pub fn consecutive(config: &AnalysisConfig) -> Self {
        Self {
            window: config.window(),
            anchor: config.window_anchor,
            min_size: config.min_consecutive,
            threshold: PaxThreshold::new(
                config.pax_threshold_consecutive,
                config.threshold_comparison,
            ),
            only_over_threshold: config.only_over_threshold,
        }
    }

    pub fn combined(config: &AnalysisConfig) -> Self {
        Self {
            window: config.window(),
            anchor: config.window_anchor,
            min_size: config.min_combined,
            threshold: PaxThreshold::new(
                config.pax_threshold_combined,
                config.threshold_comparison,
            ),
            only_over_threshold: config.only_over_threshold,
        }
    }

    fn scanner(&self) -> WindowScanner {
        WindowScanner::new(self.window, self.anchor)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyKey {
    Size(usize),
    Combination(Combination),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub key: FrequencyKey,
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupScan {
    /// `Some` for single-direction scans, `None` for combined scans.
    pub direction: Option<Direction>,
    pub groups: Vec<AggregatedGroup>,
    pub frequency: Vec<FrequencyEntry>,
    /// Qualifying groups before the threshold filter.
    pub qualifying: usize,
    /// Qualifying groups exceeding the passenger threshold.
    pub flagged: usize,
}

impl GroupScan {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn count_for(&self, key: &FrequencyKey) -> usize {
        self.frequency
            .iter()
            .find(|f| &f.key == key)
            .map(|f| f.count)
            .unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Scans
// ---------------------------------------------------------------------------

/// Groups of consecutive arrivals (or departures) within the window.
///
/// The frequency table maps group size to the number of anchors producing
/// that size, largest size first.
pub fn scan_consecutive(
    sequence: &EventSequence,
    direction: Direction,
    params: &ScanParams,
    labels: &LabelVocabulary,
) -> GroupScan {
    let stream = sequence.only(direction);
    let rule = GroupRule::SingleDirection {
        min_size: params.min_size,
    };

    let mut sizes: BTreeMap<usize, usize> = BTreeMap::new();
    let mut groups = Vec::new();
    for group in params.scanner().groups(stream.events()) {
        if !rule.qualifies(&group) {
            continue;
        }
        *sizes.entry(group.size()).or_default() += 1;
        groups.push(aggregate(&group, &params.threshold, None));
    }

    let frequency = sizes
        .into_iter()
        .rev()
        .map(|(size, count)| FrequencyEntry {
            key: FrequencyKey::Size(size),
            label: labels.run_label(direction, size),
            count,
        })
        .collect();

    finish(Some(direction), groups, frequency, params)
}

/// Windows over the mixed stream holding both arrivals and departures.
///
/// The frequency table has one bucket per distinct arrival/departure mix,
/// ordered by arrival count then departure count.
pub fn scan_combined(
    sequence: &EventSequence,
    params: &ScanParams,
    labels: &LabelVocabulary,
) -> GroupScan {
    let rule = GroupRule::Mixed {
        min_size: params.min_size,
    };

    let mut combos: BTreeMap<Combination, usize> = BTreeMap::new();
    let mut groups = Vec::new();
    for group in params.scanner().groups(sequence.events()) {
        if !rule.qualifies(&group) {
            continue;
        }
        let combination = group.combination();
        *combos.entry(combination).or_default() += 1;
        groups.push(aggregate(
            &group,
            &params.threshold,
            Some(labels.label(combination)),
        ));
    }

    let frequency = combos
        .into_iter()
        .map(|(combination, count)| FrequencyEntry {
            key: FrequencyKey::Combination(combination),
            label: labels.label(combination),
            count,
        })
        .collect();

    finish(None, groups, frequency, params)
}

fn finish(
    direction: Option<Direction>,
    mut groups: Vec<AggregatedGroup>,
    frequency: Vec<FrequencyEntry>,
    params: &ScanParams,
) -> GroupScan {
    let qualifying = groups.len();
    let flagged = groups.iter().filter(|g| g.exceeds_threshold).count();
    if params.only_over_threshold {
        groups.retain(|g| g.exceeds_threshold);
    }
    GroupScan {
        direction,
        groups,
        frequency,
        qualifying,
        flagged,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::thresholds::ThresholdComparison;
    use crate::model::FlightEvent;
    use chrono::NaiveDateTime;

    fn ev(hhmm: &str, direction: Direction, pax: u32) -> FlightEvent {
        FlightEvent {
            timestamp: NaiveDateTime::parse_from_str(
                &format!("2024-03-01 {}", hhmm),
                "%Y-%m-%d %H:%M",
            )
            .unwrap(),
            direction,
            operator: "AZU".to_string(),
            flight_number: hhmm.replace(':', ""),
            aircraft_type: "E195".to_string(),
            local_pax: pax,
            connecting_pax: 0,
            seats_offered: 118,
            origin_destination: None,
            apron_position: None,
            runway_threshold: None,
        }
    }

    fn params(min_size: usize, threshold: u32) -> ScanParams {
        ScanParams {
            window: Duration::minutes(45),
            anchor: WindowAnchor::Forward,
            min_size,
            threshold: PaxThreshold::new(threshold, ThresholdComparison::AtLeast),
            only_over_threshold: false,
        }
    }

    fn consecutive(seq: &EventSequence, direction: Direction, p: &ScanParams) -> GroupScan {
        scan_consecutive(seq, direction, p, &LabelVocabulary::default())
    }

    use Direction::{Arrival as A, Departure as D};

    // --- Consecutive --------------------------------------------------------

    #[test]
    fn test_three_arrivals_form_one_group() {
        let seq = EventSequence::new(vec![
            ev("10:00", A, 100),
            ev("10:20", A, 120),
            ev("10:40", A, 140),
        ]);
        let scan = consecutive(&seq, A, &params(3, 484));
        assert_eq!(scan.groups.len(), 1);
        assert_eq!(scan.groups[0].size, 3);
        assert_eq!(scan.groups[0].totals.local_pax, 360);
        assert_eq!(scan.groups[0].totals.seats_offered, 354);
        assert_eq!(scan.count_for(&FrequencyKey::Size(3)), 1);
    }

    #[test]
    fn test_46_minute_gap_breaks_group() {
        let seq = EventSequence::new(vec![
            ev("10:00", A, 100),
            ev("10:20", A, 120),
            ev("11:06", A, 140),
        ]);
        let scan = consecutive(&seq, A, &params(3, 484));
        assert!(scan.is_empty());
        assert!(scan.frequency.is_empty());
    }

    #[test]
    fn test_departures_are_ignored_by_arrival_scan() {
        let seq = EventSequence::new(vec![
            ev("10:00", A, 100),
            ev("10:05", D, 100),
            ev("10:10", A, 100),
            ev("10:15", D, 100),
        ]);
        assert!(consecutive(&seq, A, &params(3, 484)).is_empty());
        assert!(consecutive(&seq, D, &params(3, 484)).is_empty());
    }

    #[test]
    fn test_run_of_five_yields_overlapping_groups() {
        let seq = EventSequence::new(vec![
            ev("08:00", D, 50),
            ev("08:05", D, 50),
            ev("08:10", D, 50),
            ev("08:15", D, 50),
            ev("08:20", D, 50),
        ]);
        let scan = consecutive(&seq, D, &params(3, 484));
        let sizes: Vec<_> = scan.groups.iter().map(|g| g.size).collect();
        assert_eq!(sizes, vec![5, 4, 3]);
        let keys: Vec<_> = scan.frequency.iter().map(|f| f.key.clone()).collect();
        assert_eq!(
            keys,
            vec![FrequencyKey::Size(5), FrequencyKey::Size(4), FrequencyKey::Size(3)]
        );
        assert_eq!(scan.frequency[0].label, "05 consecutive departures");
    }

    #[test]
    fn test_run_labels_follow_vocabulary() {
        let seq = EventSequence::new(vec![
            ev("08:00", A, 50),
            ev("08:05", A, 50),
            ev("08:10", A, 50),
        ]);
        let labels = LabelVocabulary {
            consecutive_arrivals: "pousos consecutivos".to_string(),
            ..LabelVocabulary::default()
        };
        let scan = scan_consecutive(&seq, A, &params(3, 484), &labels);
        assert_eq!(scan.frequency[0].label, "03 pousos consecutivos");
    }

    #[test]
    fn test_only_over_threshold_keeps_frequencies() {
        let seq = EventSequence::new(vec![
            ev("10:00", A, 200),
            ev("10:10", A, 200),
            ev("10:20", A, 200),
            ev("10:30", A, 10),
        ]);
        let mut p = params(3, 484);
        p.only_over_threshold = true;
        let scan = consecutive(&seq, A, &p);
        // Anchors: 10:00 (610 pax, 4 events), 10:10 (410 pax, 3 events).
        assert_eq!(scan.qualifying, 2);
        assert_eq!(scan.flagged, 1);
        assert_eq!(scan.groups.len(), 1);
        assert_eq!(scan.groups[0].totals.local_pax, 610);
        assert_eq!(scan.count_for(&FrequencyKey::Size(3)), 1);
        assert_eq!(scan.count_for(&FrequencyKey::Size(4)), 1);
    }

    // --- Combined -----------------------------------------------------------

    #[test]
    fn test_combined_labels_and_counts() {
        let seq = EventSequence::new(vec![
            ev("10:00", A, 120),
            ev("10:10", D, 120),
            ev("10:20", A, 120),
            ev("10:30", D, 120),
            ev("10:40", A, 120),
        ]);
        let scan = scan_combined(&seq, &params(4, 580), &LabelVocabulary::default());
        // Anchor 10:00 -> 5 events (3A 2D, 600 pax), anchor 10:10 -> 4 events (2A 2D, 480 pax).
        assert_eq!(scan.groups.len(), 2);
        assert_eq!(
            scan.groups[0].combination_label.as_deref(),
            Some("3 Arrivals and 2 Departures")
        );
        assert_eq!(
            scan.groups[1].combination_label.as_deref(),
            Some("2 Arrivals and 2 Departures")
        );
        assert_eq!(
            scan.count_for(&FrequencyKey::Combination(Combination::new(2, 2))),
            1
        );
        assert_eq!(scan.frequency[0].label, "2 Arrivals and 2 Departures");
        assert!(scan.groups[0].exceeds_threshold);
        assert!(!scan.groups[1].exceeds_threshold);
        assert!(scan.direction.is_none());
    }

    #[test]
    fn test_combined_rejects_single_direction_clusters() {
        let seq = EventSequence::new(vec![
            ev("10:00", A, 100),
            ev("10:10", A, 100),
            ev("10:20", A, 100),
            ev("10:30", A, 100),
        ]);
        let scan = scan_combined(&seq, &params(4, 580), &LabelVocabulary::default());
        assert!(scan.is_empty());
        assert_eq!(scan.qualifying, 0);
    }

    #[test]
    fn test_empty_sequence_yields_empty_scans() {
        let seq = EventSequence::default();
        assert!(consecutive(&seq, A, &params(3, 484)).is_empty());
        assert!(scan_combined(&seq, &params(4, 580), &LabelVocabulary::default()).is_empty());
    }

    #[test]
    fn test_rescanning_is_idempotent() {
        let seq = EventSequence::new(vec![
            ev("10:00", A, 100),
            ev("10:10", D, 90),
            ev("10:20", A, 80),
            ev("10:30", D, 70),
            ev("10:40", A, 60),
            ev("10:45", A, 50),
        ]);
        let p = params(3, 200);
        assert_eq!(consecutive(&seq, A, &p), consecutive(&seq, A, &p));
        let labels = LabelVocabulary::default();
        assert_eq!(scan_combined(&seq, &p, &labels), scan_combined(&seq, &p, &labels));
    }
}
