/// Clustering and occupancy analysis over a normalized movement sequence.
///
/// Every analysis is a pure function of the sequence and its parameters;
/// none of them keep state between runs.
///
/// Submodules:
/// - `window`    — sliding time-window scanner and the `Group` it produces.
/// - `classify`  — group qualification rules and combination labels.
/// - `aggregate` — passenger/seat totals and threshold tagging per group.
/// - `groups`    — single-direction and combined scans with frequency tables.
/// - `occupancy` — running apron occupancy and overnight stays per day.
/// - `kpi`       — operation and passenger totals per operator and month.

pub mod aggregate;
pub mod classify;
pub mod groups;
pub mod kpi;
pub mod occupancy;
pub mod window;
