//! Draggable date-range selector state.
//!
//! Handles snap to whole days. While a drag is in progress only the local
//! range changes; the engine sees the range once the drag ends.

use chrono::{Duration, NaiveDate};

use crate::filter::{DateBounds, FilterState};

/// Which end of the range a drag moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Start,
    End,
}

#[derive(Debug, Clone)]
pub struct RangeSelector {
    bounds: DateBounds,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Handle currently being dragged
    pub dragging: Option<Handle>,
}

impl RangeSelector {
    pub fn new(bounds: DateBounds, filter: &FilterState) -> Self {
        Self {
            bounds,
            start: filter.start(),
            end: filter.end(),
            dragging: None,
        }
    }

    pub fn bounds(&self) -> &DateBounds {
        &self.bounds
    }

    fn span_days(&self) -> i64 {
        (self.bounds.max - self.bounds.min).num_days()
    }

    /// Position of a day along the track (0.0 - 1.0)
    pub fn position_of(&self, day: NaiveDate) -> f32 {
        let span = self.span_days();
        if span <= 0 {
            return 0.0;
        }
        ((day - self.bounds.min).num_days() as f32 / span as f32).clamp(0.0, 1.0)
    }

    /// Nearest day to a track position
    pub fn day_at(&self, pos: f32) -> NaiveDate {
        let span = self.span_days().max(0);
        let offset = (pos.clamp(0.0, 1.0) * span as f32).round() as i64;
        self.bounds.min + Duration::days(offset.min(span))
    }

    /// Every selectable day, for drawing notches
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bounds.min.iter_days().take(self.bounds.len_days().max(0) as usize)
    }

    /// Closer handle to `pos`, if within `tolerance` (in track units)
    pub fn pick_handle(&self, pos: f32, tolerance: f32) -> Option<Handle> {
        let to_start = (pos - self.position_of(self.start)).abs();
        let to_end = (pos - self.position_of(self.end)).abs();
        let (handle, dist) = if to_start < to_end {
            (Handle::Start, to_start)
        } else {
            (Handle::End, to_end)
        };
        (dist <= tolerance).then_some(handle)
    }

    /// Move `handle` to the day nearest `pos`. The start must stay before the end.
    pub fn drag(&mut self, handle: Handle, pos: f32) -> bool {
        let snapped = self.day_at(pos);
        self.dragging = Some(handle);
        match handle {
            Handle::Start if snapped < self.end => {
                self.start = snapped;
                true
            }
            Handle::End if snapped > self.start => {
                self.end = snapped;
                true
            }
            _ => false,
        }
    }

    /// End the drag, returning the range to apply
    pub fn finish_drag(&mut self) -> Option<(NaiveDate, NaiveDate)> {
        self.dragging.take().map(|_| (self.start, self.end))
    }

    /// Reset to the engine's committed range
    pub fn sync(&mut self, filter: &FilterState) {
        self.start = filter.start();
        self.end = filter.end();
        self.dragging = None;
    }

    /// Whole days between the handles
    pub fn day_span(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}
