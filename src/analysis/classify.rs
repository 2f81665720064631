//! Group qualification and arrival/departure composition labels.
//!
//! Single-direction groups qualify on size alone. Mixed groups must also
//! contain at least one arrival and one departure; an all-arrival window
//! never qualifies as a combined operation however large it is.

use serde::{Deserialize, Serialize};

use crate::analysis::window::Group;
use crate::model::Direction;

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Arrival/departure mix of a group. Every distinct pair is its own
/// frequency bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Combination {
    pub arrivals: usize,
    pub departures: usize,
}

impl Combination {
    pub fn new(arrivals: usize, departures: usize) -> Self {
        Self {
            arrivals,
            departures,
        }
    }

    pub fn is_mixed(&self) -> bool {
        self.arrivals > 0 && self.departures > 0
    }
}

/// Words used to render combination labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelVocabulary {
    pub arrival_singular: String,
    pub arrival_plural: String,
    pub departure_singular: String,
    pub departure_plural: String,
    pub conjunction: String,
    /// Frequency wording for arrivals-only groups, after the size.
    pub consecutive_arrivals: String,
    /// Frequency wording for departures-only groups, after the size.
    pub consecutive_departures: String,
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self {
            arrival_singular: "Arrival".to_string(),
            arrival_plural: "Arrivals".to_string(),
            departure_singular: "Departure".to_string(),
            departure_plural: "Departures".to_string(),
            conjunction: "and".to_string(),
            consecutive_arrivals: "consecutive arrivals".to_string(),
            consecutive_departures: "consecutive departures".to_string(),
        }
    }
}

impl LabelVocabulary {
    /// `"<a> Arrivals and <d> Departures"`, singular nouns for counts of one.
    pub fn label(&self, combination: Combination) -> String {
        let arr = if combination.arrivals == 1 {
            &self.arrival_singular
        } else {
            &self.arrival_plural
        };
        let dep = if combination.departures == 1 {
            &self.departure_singular
        } else {
            &self.departure_plural
        };
        format!(
            "{} {} {} {} {}",
            combination.arrivals, arr, self.conjunction, combination.departures, dep
        )
    }

    /// `"05 consecutive arrivals"`: zero-padded size, then the run wording.
    pub fn run_label(&self, direction: Direction, size: usize) -> String {
        let words = match direction {
            Direction::Arrival => &self.consecutive_arrivals,
            Direction::Departure => &self.consecutive_departures,
        };
        format!("{:02} {}", size, words)
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRule {
    /// Arrivals-only or departures-only stream.
    SingleDirection { min_size: usize },
    /// Both directions in one stream.
    Mixed { min_size: usize },
}

impl GroupRule {
    pub fn min_size(&self) -> usize {
        match self {
            GroupRule::SingleDirection { min_size } | GroupRule::Mixed { min_size } => *min_size,
        }
    }

    pub fn qualifies(&self, group: &Group) -> bool {
        match self {
            GroupRule::SingleDirection { min_size } => group.size() >= *min_size,
            GroupRule::Mixed { min_size } => {
                group.size() >= *min_size && group.combination().is_mixed()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
