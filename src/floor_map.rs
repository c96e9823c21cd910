//! ## Floor Mapping Module
//!
//! Bidirectional mapping between the building's human floor labels and the
//! dense ordinal scale the scheduling core works in. The basement, lobby and
//! mezzanine labels interleave before the numbered floors, so the mapping is
//! an explicit table rather than a parse-and-offset rule.
//!
//! The table is static: loaded once into [FLOOR_MAP] at first use and never
//! mutated at runtime.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::LiftError;

/// Floor labels in building order, bottom to top. Ordinals are assigned
/// from this order starting at 1.
static FLOOR_LABELS: &[&str] = &[
    "B2", "B1", "LG", "G", "UG", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12",
];

/// The building's floor table, initialized once for the whole process.
pub static FLOOR_MAP: Lazy<FloorMap> = Lazy::new(FloorMap::building_default);

/// Label ↔ ordinal table for one building.
///
/// Lookups are O(1); misses surface typed errors, never a silent default.
pub struct FloorMap {
    labels: Vec<&'static str>,
    ordinals: HashMap<&'static str, u8>,
}

impl FloorMap {
    /// Builds the table for the default building layout ([FLOOR_LABELS]).
    fn building_default() -> Self {
        let labels: Vec<&'static str> = FLOOR_LABELS.to_vec();
        let ordinals = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (*label, (i + 1) as u8))
            .collect();
        FloorMap { labels, ordinals }
    }

    /// Resolves a floor label to its ordinal.
    ///
    /// ## Returns
    /// - `Ok(ordinal)` for a known label.
    /// - `Err(LiftError::InvalidFloorLabel)` for anything else.
    ///
    /// # Example
    /// ```
    /// use liftpro::floor_map::FLOOR_MAP;
    ///
    /// assert_eq!(FLOOR_MAP.ordinal_of("G").unwrap(), 4);
    /// assert!(FLOOR_MAP.ordinal_of("penthouse").is_err());
    /// ```
    pub fn ordinal_of(&self, label: &str) -> Result<u8, LiftError> {
        self.ordinals
            .get(label)
            .copied()
            .ok_or_else(|| LiftError::InvalidFloorLabel(label.to_string()))
    }

    /// Resolves an ordinal back to the display label.
    ///
    /// ## Returns
    /// - `Ok(label)` for an ordinal inside the building range.
    /// - `Err(LiftError::FloorOutOfRange)` otherwise.
    pub fn label_of(&self, ordinal: u8) -> Result<&'static str, LiftError> {
        if ordinal < self.min_ordinal() || ordinal > self.max_ordinal() {
            return Err(LiftError::FloorOutOfRange(ordinal.to_string()));
        }
        Ok(self.labels[(ordinal - 1) as usize])
    }

    /// Lowest ordinal in the building.
    pub fn min_ordinal(&self) -> u8 {
        1
    }

    /// Highest ordinal in the building.
    pub fn max_ordinal(&self) -> u8 {
        self.labels.len() as u8
    }

    /// `true` when `ordinal` lies within the building range.
    pub fn in_range(&self, ordinal: u8) -> bool {
        ordinal >= self.min_ordinal() && ordinal <= self.max_ordinal()
    }

    /// All labels in building order, bottom to top.
    pub fn all_labels(&self) -> &[&'static str] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_endpoints_match_the_building() {
        assert_eq!(FLOOR_MAP.ordinal_of("B2").unwrap(), 1);
        assert_eq!(FLOOR_MAP.ordinal_of("UG").unwrap(), 5);
        assert_eq!(FLOOR_MAP.ordinal_of("1").unwrap(), 6);
        assert_eq!(FLOOR_MAP.ordinal_of("12").unwrap(), 17);
        assert_eq!(FLOOR_MAP.min_ordinal(), 1);
        assert_eq!(FLOOR_MAP.max_ordinal(), 17);
    }

    #[test]
    fn labels_round_trip_through_ordinals() {
        for label in FLOOR_MAP.all_labels() {
            let ordinal = FLOOR_MAP.ordinal_of(label).unwrap();
            assert_eq!(FLOOR_MAP.label_of(ordinal).unwrap(), *label);
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = FLOOR_MAP.ordinal_of("B3").unwrap_err();
        assert!(matches!(err, LiftError::InvalidFloorLabel(label) if label == "B3"));
    }

    #[test]
    fn ordinal_outside_the_building_is_rejected() {
        assert!(matches!(
            FLOOR_MAP.label_of(0),
            Err(LiftError::FloorOutOfRange(_))
        ));
        assert!(matches!(
            FLOOR_MAP.label_of(18),
            Err(LiftError::FloorOutOfRange(_))
        ));
    }

    #[test]
    fn labels_keep_building_order() {
        let labels = FLOOR_MAP.all_labels();
        assert_eq!(labels.first().copied(), Some("B2"));
        assert_eq!(labels[3], "G");
        assert_eq!(labels.last().copied(), Some("12"));
        assert_eq!(labels.len(), 17);
    }

    #[test]
    fn in_range_tracks_the_table_bounds() {
        assert!(!FLOOR_MAP.in_range(0));
        assert!(FLOOR_MAP.in_range(1));
        assert!(FLOOR_MAP.in_range(17));
        assert!(!FLOOR_MAP.in_range(18));
    }
}
