/// Seat capacity registry for aircraft types operating at the airport.
///
/// Maps an ICAO aircraft type designator to the nominal number of seats the
/// flight offers. This is the single source of truth for seat counts; all
/// other modules resolve seats through `SeatTable` rather than hardcoding
/// them.
///
/// The A320 family is configured differently per airline: the home carrier
/// flies a denser or lighter cabin than everybody else, so those types resolve
/// to one of two values depending on the operator.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Static registry
// ---------------------------------------------------------------------------

/// Nominal seat counts by aircraft type.
///
/// Types listed in `HOME_CONFIGURED_TYPES` are not in here, they depend on
/// the operator.
pub static SEAT_REGISTRY: &[(&str, u32)] = &[
    ("C208", 9), // Cessna Caravan, regional feeder
    ("738W", 186),
    ("A319", 140),
    ("AT45", 47),
    ("AT75", 70),
    ("AT76", 70),
    ("B38M", 186),
    ("B737", 138),
    ("B738", 186),
    ("E195", 118),
    ("E295", 136),
    ("A21N", 220),
    ("A321", 220),
];

/// Types whose seat count depends on whether the home operator flies them.
pub static HOME_CONFIGURED_TYPES: &[&str] = &["A20N", "A320"];

/// Seats for `HOME_CONFIGURED_TYPES` when operated by the home carrier.
pub const HOME_CONFIG_SEATS: u32 = 174;

/// Seats for `HOME_CONFIGURED_TYPES` when operated by anyone else.
pub const STANDARD_CONFIG_SEATS: u32 = 176;

/// Default home operator code.
pub const DEFAULT_HOME_OPERATOR: &str = "AZU";

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Seat-capacity resolver with the home operator and optional per-type
/// overrides taken from configuration.
#[derive(Debug, Clone)]
pub struct SeatTable {
    home_operator: String,
    overrides: HashMap<String, u32>,
}

impl Default for SeatTable {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_OPERATOR)
    }
}

impl SeatTable {
    pub fn new(home_operator: &str) -> Self {
        Self {
            home_operator: normalize_code(home_operator),
            overrides: HashMap::new(),
        }
    }

    /// Adds per-type overrides. They win over both the static registry and
    /// the operator-conditional family.
    pub fn with_overrides(mut self, overrides: &HashMap<String, u32>) -> Self {
        for (typ, seats) in overrides {
            self.overrides.insert(normalize_code(typ), *seats);
        }
        self
    }

    pub fn home_operator(&self) -> &str {
        &self.home_operator
    }

    /// Seats offered by `aircraft_type` when flown by `operator`.
    ///
    /// Unknown types resolve to 0.
    pub fn seats(&self, operator: &str, aircraft_type: &str) -> u32 {
        let typ = normalize_code(aircraft_type);

        if let Some(seats) = self.overrides.get(&typ) {
            return *seats;
        }

        if HOME_CONFIGURED_TYPES.contains(&typ.as_str()) {
            return if normalize_code(operator) == self.home_operator {
                HOME_CONFIG_SEATS
            } else {
                STANDARD_CONFIG_SEATS
            };
        }

        find_seats(&typ).unwrap_or(0)
    }
}

/// Looks up a type in the static registry. Returns `None` if not listed.
pub fn find_seats(aircraft_type: &str) -> Option<u32> {
    SEAT_REGISTRY
        .iter()
        .find(|(typ, _)| *typ == aircraft_type)
        .map(|(_, seats)| *seats)
}

/// Resolves seats with the default home operator and no overrides.
pub fn seats(operator: &str, aircraft_type: &str) -> u32 {
    SeatTable::default().seats(operator, aircraft_type)
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a320_depends_on_operator() {
        assert_eq!(seats("AZU", "A320"), 174);
        assert_eq!(seats("GLO", "A320"), 176);
        assert_eq!(seats("AZU", "A20N"), 174);
        assert_eq!(seats("TAM", "A20N"), 176);
    }

    #[test]
    fn test_static_types() {
        assert_eq!(seats("AZU", "C208"), 9);
        assert_eq!(seats("ACN", "C208"), 9);
        assert_eq!(seats("GLO", "B38M"), 186);
        assert_eq!(seats("AZU", "E195"), 118);
    }

    #[test]
    fn test_unknown_type_is_zero() {
        assert_eq!(seats("ANY", "ZZZZ"), 0);
        assert_eq!(seats("AZU", ""), 0);
    }

    #[test]
    fn test_lookup_trims_and_ignores_case() {
        assert_eq!(seats(" azu ", " a320 "), 174);
        assert_eq!(seats("glo", "b738"), 186);
    }

    #[test]
    fn test_home_operator_is_configurable() {
        let table = SeatTable::new("GLO");
        assert_eq!(table.seats("GLO", "A320"), 174);
        assert_eq!(table.seats("AZU", "A320"), 176);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut overrides = HashMap::new();
        overrides.insert("e195".to_string(), 120);
        overrides.insert("A320".to_string(), 180);
        overrides.insert("CRJ9".to_string(), 90);
        let table = SeatTable::default().with_overrides(&overrides);
        assert_eq!(table.seats("AZU", "E195"), 120);
        assert_eq!(table.seats("AZU", "A320"), 180);
        assert_eq!(table.seats("XYZ", "CRJ9"), 90);
        assert_eq!(table.seats("AZU", "A319"), 140);
    }

    #[test]
    fn test_no_duplicate_registry_entries() {
        let mut seen = std::collections::HashSet::new();
        for (typ, _) in SEAT_REGISTRY {
            assert!(seen.insert(*typ), "duplicate type '{}' in SEAT_REGISTRY", typ);
            assert!(
                !HOME_CONFIGURED_TYPES.contains(typ),
                "'{}' is operator-configured and must not be in SEAT_REGISTRY",
                typ
            );
        }
    }
}
