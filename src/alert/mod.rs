/// Alert evaluation for analysis results.
///
/// Submodules:
/// - `thresholds` — passenger thresholds and the comparison operator in force.

pub mod thresholds;
