//! Mood states and their fixed display table.
//!
//! A day's overall feeling is an integer on the scale -3..=3. Each value has
//! a fixed name, a short pie-chart label and a color.

use egui::Color32;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FeelvizError, Result};

/// Display entry for a single mood state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodInfo {
    pub name: &'static str,
    pub short: &'static str,
    pub color: Color32,
}

/// Table indexed by `value + 3`
const MOOD_TABLE: [MoodInfo; 7] = [
    MoodInfo {
        name: "Very Unpleasant",
        short: "VU",
        color: Color32::from_rgb(0x3B, 0x35, 0xA2),
    },
    MoodInfo {
        name: "Unpleasant",
        short: "U",
        color: Color32::from_rgb(0x35, 0x7D, 0xD2),
    },
    MoodInfo {
        name: "Slightly Unpleasant",
        short: "SU",
        color: Color32::from_rgb(0x78, 0x99, 0xC5),
    },
    MoodInfo {
        name: "Neutral",
        short: "N",
        color: Color32::from_rgb(0x79, 0xBB, 0xCB),
    },
    MoodInfo {
        name: "Slightly Pleasant",
        short: "SP",
        color: Color32::from_rgb(0x8E, 0xD4, 0x33),
    },
    MoodInfo {
        name: "Pleasant",
        short: "P",
        color: Color32::from_rgb(0xF2, 0xC7, 0x24),
    },
    MoodInfo {
        name: "Very Pleasant",
        short: "VP",
        color: Color32::from_rgb(0xEB, 0x8F, 0x31),
    },
];

/// A validated mood state in -3..=3.
///
/// Ordering follows the numeric value, so maps keyed by `MoodState` iterate
/// from -3 up to 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub struct MoodState(i8);

impl MoodState {
    pub const MIN: i8 = -3;
    pub const MAX: i8 = 3;
    pub const LOWEST: MoodState = MoodState(Self::MIN);

    pub fn new(value: i64) -> Result<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as i8))
        } else {
            Err(FeelvizError::InvalidMoodState(value))
        }
    }

    /// All seven states in ascending order
    pub fn all() -> impl Iterator<Item = MoodState> {
        (Self::MIN..=Self::MAX).map(MoodState)
    }

    pub fn value(self) -> i8 {
        self.0
    }

    pub fn info(self) -> &'static MoodInfo {
        &MOOD_TABLE[(self.0 - Self::MIN) as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn short_label(self) -> &'static str {
        self.info().short
    }

    pub fn color(self) -> Color32 {
        self.info().color
    }
}

impl TryFrom<i8> for MoodState {
    type Error = FeelvizError;

    fn try_from(value: i8) -> Result<Self> {
        MoodState::new(value as i64)
    }
}

impl From<MoodState> for i8 {
    fn from(state: MoodState) -> i8 {
        state.0
    }
}

impl fmt::Display for MoodState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_values_outside_scale() {
        assert!(MoodState::new(-4).is_err());
        assert!(MoodState::new(4).is_err());
        assert_eq!(MoodState::new(-3).unwrap().value(), -3);
    }

    #[test]
    fn table_lookup_matches_scale() {
        let neutral = MoodState::new(0).unwrap();
        assert_eq!(neutral.name(), "Neutral");
        assert_eq!(neutral.short_label(), "N");
        assert_eq!(MoodState::new(1).unwrap().color(), Color32::from_rgb(142, 212, 51));
        assert_eq!(MoodState::new(3).unwrap().name(), "Very Pleasant");
    }

    #[test]
    fn ordering_is_numeric() {
        let states: Vec<i8> = MoodState::all().map(MoodState::value).collect();
        assert_eq!(states, vec![-3, -2, -1, 0, 1, 2, 3]);
        assert!(MoodState::new(-2).unwrap() < MoodState::new(1).unwrap());
    }

    #[test]
    fn serializes_as_integer() {
        let json = serde_json::to_string(&MoodState::new(-1).unwrap()).unwrap();
        assert_eq!(json, "-1");
        assert!(serde_json::from_str::<MoodState>("5").is_err());
    }
}
