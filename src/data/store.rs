//! Immutable stores populated once at startup.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

use super::records::{DayRecord, DayStats, ItemId, ItemType};
use crate::error::{FeelvizError, Result};

/// Per-day item records, unfiltered.
///
/// Items are kept as recorded, duplicates included; the graph builder
/// de-duplicates within a day.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    by_date: BTreeMap<NaiveDate, Vec<ItemId>>,
    kinds: HashMap<ItemId, ItemType>,
    record_count: usize,
}

impl DatasetStore {
    pub fn from_records(records: impl IntoIterator<Item = DayRecord>) -> Self {
        let mut store = Self::default();
        for record in records {
            // Last record seen decides the kind
            store.kinds.insert(record.item.clone(), record.item_type);
            store.by_date.entry(record.date).or_default().push(record.item);
            store.record_count += 1;
        }
        store
    }

    /// Days in ascending order with their raw item lists
    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &[ItemId])> + '_ {
        self.by_date.iter().map(|(d, items)| (*d, items.as_slice()))
    }

    pub fn kind(&self, item: &str) -> Option<ItemType> {
        self.kinds.get(item).copied()
    }

    pub fn day_count(&self) -> usize {
        self.by_date.len()
    }

    pub fn record_count(&self) -> usize {
        self.record_count
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        self.by_date.keys().next().copied()
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.by_date.keys().next_back().copied()
    }
}

/// Per-day mood and sleep values, at most one entry per day
#[derive(Debug, Clone, Default)]
pub struct DayStatsStore {
    by_date: BTreeMap<NaiveDate, DayStats>,
}

impl DayStatsStore {
    pub fn from_stats(stats: impl IntoIterator<Item = DayStats>) -> Self {
        let mut store = Self::default();
        for entry in stats {
            if store.by_date.insert(entry.date, entry).is_some() {
                tracing::warn!("Duplicate day statistics for {}, keeping the later row", entry.date);
            }
        }
        store
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayStats> {
        self.by_date.get(&date)
    }

    /// Lookup for dates that must have statistics
    pub fn require(&self, date: NaiveDate) -> Result<&DayStats> {
        self.by_date
            .get(&date)
            .ok_or(FeelvizError::DataIntegrity { date })
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Record days that have no statistics entry
    pub fn missing_for(&self, dataset: &DatasetStore) -> Vec<NaiveDate> {
        dataset
            .days()
            .map(|(d, _)| d)
            .filter(|d| !self.by_date.contains_key(d))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::MoodState;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn dataset_groups_by_day_and_keeps_duplicates() {
        let store = DatasetStore::from_records(vec![
            DayRecord::new(day("2024-10-19"), "A", ItemType::Context),
            DayRecord::new(day("2024-10-18"), "A", ItemType::Context),
            DayRecord::new(day("2024-10-18"), "A", ItemType::Association),
        ]);

        assert_eq!(store.day_count(), 2);
        assert_eq!(store.record_count(), 3);
        let (first, items) = store.days().next().unwrap();
        assert_eq!(first, day("2024-10-18"));
        assert_eq!(items.len(), 2);
        assert_eq!(store.first_day(), Some(day("2024-10-18")));
        assert_eq!(store.last_day(), Some(day("2024-10-19")));
        assert_eq!(store.kind("A"), Some(ItemType::Association));
        assert!(!store.is_empty());
        assert!(DatasetStore::default().is_empty());
    }

    #[test]
    fn require_reports_missing_day() {
        let stats = DayStatsStore::from_stats(vec![DayStats {
            date: day("2024-10-18"),
            mood_state: MoodState::new(1).unwrap(),
            sleep_hours: 7.5,
        }]);

        assert!(stats.require(day("2024-10-18")).is_ok());
        match stats.require(day("2024-10-19")) {
            Err(FeelvizError::DataIntegrity { date }) => assert_eq!(date, day("2024-10-19")),
            other => panic!("expected integrity error, got {:?}", other),
        }
    }

    #[test]
    fn missing_for_lists_record_days_without_stats() {
        let dataset = DatasetStore::from_records(vec![
            DayRecord::new(day("2024-10-18"), "A", ItemType::Context),
            DayRecord::new(day("2024-10-20"), "B", ItemType::Context),
        ]);
        let stats = DayStatsStore::from_stats(vec![DayStats {
            date: day("2024-10-18"),
            mood_state: MoodState::new(0).unwrap(),
            sleep_hours: 8.0,
        }]);

        assert_eq!(stats.missing_for(&dataset), vec![day("2024-10-20")]);
    }
}
