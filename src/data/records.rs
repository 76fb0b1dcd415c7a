//! Typed day records handed to the stores.

use chrono::NaiveDate;
use std::str::FromStr;

use crate::mood::MoodState;

/// Opaque item identifier, stable across the dataset
pub type ItemId = String;

/// Kind of journal item. Decides the node shape in the graph view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    Association,
    Context,
    Description,
}

impl ItemType {
    pub fn label(&self) -> &'static str {
        match self {
            ItemType::Association => "association",
            ItemType::Context => "context",
            ItemType::Description => "description",
        }
    }
}

impl FromStr for ItemType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "association" => Ok(ItemType::Association),
            "context" => Ok(ItemType::Context),
            "description" => Ok(ItemType::Description),
            _ => Err(()),
        }
    }
}

/// One item tagged on one day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub item: ItemId,
    pub item_type: ItemType,
}

impl DayRecord {
    pub fn new(date: NaiveDate, item: impl Into<ItemId>, item_type: ItemType) -> Self {
        Self {
            date,
            item: item.into(),
            item_type,
        }
    }
}

/// Mood and sleep scalars for one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayStats {
    pub date: NaiveDate,
    pub mood_state: MoodState,
    pub sleep_hours: f64,
}
