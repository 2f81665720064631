/// Input handling: from loader output to the normalized event sequence.
///
/// Submodules:
/// - `table`     — raw header + text-cell table, and the CSV loader.
/// - `normalize` — typed, validated, time-sorted flight events plus discards.

pub mod normalize;
pub mod table;
