//! Date range and mood filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::DayStatsStore;
use crate::error::{FeelvizError, Result};
use crate::mood::MoodState;

/// Absolute inclusive bounds a selected range must stay within
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateBounds {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min <= date && date <= self.max
    }

    /// Number of selectable days
    pub fn len_days(&self) -> i64 {
        (self.max - self.min).num_days() + 1
    }
}

/// Current filter: an inclusive date range plus an optional mood state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    start: NaiveDate,
    end: NaiveDate,
    mood_state: Option<MoodState>,
}

impl FilterState {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(FeelvizError::InvalidRange { start, end });
        }
        Ok(Self {
            start,
            end,
            mood_state: None,
        })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn mood_state(&self) -> Option<MoodState> {
        self.mood_state
    }

    /// Replace the date range. Rejects reversed ranges and ranges leaving `bounds`.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate, bounds: &DateBounds) -> Result<()> {
        if start > end || !bounds.contains(start) || !bounds.contains(end) {
            return Err(FeelvizError::InvalidRange { start, end });
        }
        self.start = start;
        self.end = end;
        Ok(())
    }

    pub fn set_mood_filter(&mut self, state: Option<MoodState>) {
        self.mood_state = state;
    }

    /// Date-range part of the predicate only
    pub fn in_range(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Full predicate. A day without statistics never satisfies a mood filter.
    pub fn matches(&self, date: NaiveDate, stats: &DayStatsStore) -> bool {
        if !self.in_range(date) {
            return false;
        }
        match self.mood_state {
            None => true,
            Some(wanted) => stats.get(date).is_some_and(|s| s.mood_state == wanted),
        }
    }

    /// Whole days between start and end
    pub fn day_span(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
