//! Passenger alert thresholds.
//!
//! A group "exceeds" its threshold when its local passenger sum compares
//! against the configured value with the active operator. Single-direction
//! and mixed groups carry independent thresholds.

use serde::{Deserialize, Serialize};

/// How an aggregated passenger sum is compared against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdComparison {
    /// `sum >= threshold`
    #[default]
    AtLeast,
    /// `sum > threshold`
    Above,
}

impl ThresholdComparison {
    pub fn exceeds(&self, value: u64, threshold: u64) -> bool {
        match self {
            ThresholdComparison::AtLeast => value >= threshold,
            ThresholdComparison::Above => value > threshold,
        }
    }

    /// Operator symbol for reports.
    pub fn symbol(&self) -> &'static str {
        match self {
            ThresholdComparison::AtLeast => ">=",
            ThresholdComparison::Above => ">",
        }
    }
}

/// A threshold value paired with its comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaxThreshold {
    pub value: u32,
    pub comparison: ThresholdComparison,
}

impl PaxThreshold {
    pub fn new(value: u32, comparison: ThresholdComparison) -> Self {
        Self { value, comparison }
    }

    pub fn is_exceeded_by(&self, pax: u64) -> bool {
        self.comparison.exceeds(pax, u64::from(self.value))
    }
}

impl std::fmt::Display for PaxThreshold {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PAX {} {}", self.comparison.symbol(), self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_least_includes_equal() {
        let t = PaxThreshold::new(484, ThresholdComparison::AtLeast);
        assert!(t.is_exceeded_by(484));
        assert!(t.is_exceeded_by(500));
        assert!(!t.is_exceeded_by(483));
    }

    #[test]
    fn test_above_excludes_equal() {
        let t = PaxThreshold::new(580, ThresholdComparison::Above);
        assert!(!t.is_exceeded_by(580));
        assert!(t.is_exceeded_by(581));
    }

    #[test]
    fn test_default_is_at_least() {
        assert_eq!(ThresholdComparison::default(), ThresholdComparison::AtLeast);
    }

    #[test]
    fn test_display() {
        let t = PaxThreshold::new(484, ThresholdComparison::AtLeast);
        assert_eq!(t.to_string(), "PAX >= 484");
    }
}
