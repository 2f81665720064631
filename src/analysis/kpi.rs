//! Movement KPIs: operation and passenger totals per operator and month.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::{Direction, EventSequence, FlightEvent};

/// Which movements a KPI summary covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KpiFilter {
    /// `None` covers both directions.
    pub direction: Option<Direction>,
    /// `None` covers every operator.
    pub operators: Option<BTreeSet<String>>,
    /// Add connecting passengers to the per-operator passenger totals.
    pub include_connecting: bool,
}

impl KpiFilter {
    fn accepts(&self, event: &FlightEvent) -> bool {
        self.direction.is_none_or(|d| d == event.direction)
            && self
                .operators
                .as_ref()
                .is_none_or(|ops| ops.contains(&event.operator))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyOperatorRow {
    /// `YYYY-MM`
    pub month: String,
    pub operator: String,
    pub operations: usize,
    pub local_pax: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorTotal {
    pub operator: String,
    pub operations: usize,
    pub passengers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KpiSummary {
    pub total_operations: usize,
    pub total_local_pax: u64,
    pub active_operators: usize,
    pub monthly: Vec<MonthlyOperatorRow>,
    /// Sorted by operations, busiest first.
    pub by_operator: Vec<OperatorTotal>,
    pub total_passengers: u64,
}

pub fn summarize(sequence: &EventSequence, filter: &KpiFilter) -> KpiSummary {
    let mut monthly: BTreeMap<(String, String), (usize, u64)> = BTreeMap::new();
    let mut operators: BTreeMap<String, (usize, u64)> = BTreeMap::new();
    let mut summary = KpiSummary::default();

    for event in sequence.iter().filter(|e| filter.accepts(e)) {
        let local = u64::from(event.local_pax);
        let passengers = if filter.include_connecting {
            local + u64::from(event.connecting_pax)
        } else {
            local
        };

        summary.total_operations += 1;
        summary.total_local_pax += local;
        summary.total_passengers += passengers;

        let month = event.timestamp.format("%Y-%m").to_string();
        let m = monthly
            .entry((month, event.operator.clone()))
            .or_default();
        m.0 += 1;
        m.1 += local;

        let o = operators.entry(event.operator.clone()).or_default();
        o.0 += 1;
        o.1 += passengers;
    }

    summary.active_operators = operators.len();
    summary.monthly = monthly
        .into_iter()
        .map(|((month, operator), (operations, local_pax))| MonthlyOperatorRow {
            month,
            operator,
            operations,
            local_pax,
        })
        .collect();

    let mut by_operator: Vec<_> = operators
        .into_iter()
        .map(|(operator, (operations, passengers))| OperatorTotal {
            operator,
            operations,
            passengers,
        })
        .collect();
    // Stable sort keeps operators with equal counts alphabetical.
    by_operator.sort_by(|a, b| b.operations.cmp(&a.operations));
    summary.by_operator = by_operator;

    summary
}
