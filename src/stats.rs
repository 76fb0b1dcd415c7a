//! Chart datasets: sleep durations and mood-state counts.
//!
//! Without a node selection both projections cover every record day in the
//! date range, whatever the mood filter. With a node selected they cover the
//! node's occurrence days, which already passed the full filter.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::data::{DatasetStore, DayStatsStore};
use crate::error::Result;
use crate::filter::FilterState;
use crate::graph::FilteredGraph;
use crate::mood::MoodState;

/// Mood value -> number of days, ascending by mood value, zero counts absent
pub type MoodCounts = BTreeMap<MoodState, usize>;

/// Days a projection covers, in ascending order
fn projected_days(
    dataset: &DatasetStore,
    filter: &FilterState,
    graph: &FilteredGraph,
    node: Option<&str>,
) -> Vec<NaiveDate> {
    match node {
        Some(n) => graph
            .occurrences
            .get(n)
            .map(|days| days.iter().copied().collect())
            .unwrap_or_default(),
        None => dataset
            .days()
            .map(|(date, _)| date)
            .filter(|date| filter.in_range(*date))
            .collect(),
    }
}

/// One sleep value per projected day, in date order
pub fn sleep_durations(
    dataset: &DatasetStore,
    stats: &DayStatsStore,
    filter: &FilterState,
    graph: &FilteredGraph,
    selected_node: Option<&str>,
) -> Result<Vec<f64>> {
    projected_days(dataset, filter, graph, selected_node)
        .into_iter()
        .map(|date| stats.require(date).map(|s| s.sleep_hours))
        .collect()
}

/// Days per mood state over the projected days.
///
/// Without a node selection, days lacking statistics are skipped; for a
/// selected node every occurrence day must have them.
pub fn mood_state_counts(
    dataset: &DatasetStore,
    stats: &DayStatsStore,
    filter: &FilterState,
    graph: &FilteredGraph,
    selected_node: Option<&str>,
) -> Result<MoodCounts> {
    let mut counts = MoodCounts::new();
    for date in projected_days(dataset, filter, graph, selected_node) {
        let entry = match selected_node {
            Some(_) => stats.require(date)?,
            None => match stats.get(date) {
                Some(entry) => entry,
                None => continue,
            },
        };
        *counts.entry(entry.mood_state).or_insert(0) += 1;
    }
    Ok(counts)
}

/// Pie slice for one present mood state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieSlice {
    pub mood: MoodState,
    pub count: usize,
    pub fraction: f32,
}

/// Slices in ascending mood order
pub fn pie_slices(counts: &MoodCounts) -> Vec<PieSlice> {
    let total: usize = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .map(|(&mood, &count)| PieSlice {
            mood,
            count,
            fraction: count as f32 / total as f32,
        })
        .collect()
}

/// One histogram bin. Half-open `[lo, hi)` except the last bin, which is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lo: f64,
    pub hi: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SleepHistogram {
    pub bins: Vec<HistogramBin>,
}

/// Padding added on both sides of the value domain
const DOMAIN_PADDING: f64 = 0.3;

impl SleepHistogram {
    /// Bin `values` on round thresholds aiming at about `target_bins` bins
    pub fn from_values(values: &[f64], target_bins: usize) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Self::default();
        }

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min) - DOMAIN_PADDING;
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max) + DOMAIN_PADDING;

        let mut edges = vec![min];
        edges.extend(nice_ticks(min, max, target_bins.max(1)).into_iter().filter(|t| *t > min && *t < max));
        edges.push(max);

        let mut bins: Vec<HistogramBin> = edges
            .windows(2)
            .map(|w| HistogramBin {
                lo: w[0],
                hi: w[1],
                count: 0,
            })
            .collect();

        let last = bins.len() - 1;
        for v in finite {
            let idx = bins
                .iter()
                .position(|b| v >= b.lo && v < b.hi)
                .unwrap_or(last);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }
}

/// Round tick positions (1, 2 or 5 times a power of ten) covering `[start, stop]`
pub fn nice_ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if !(stop > start) || count == 0 {
        return Vec::new();
    }
    let raw_step = (stop - start) / count as f64;
    let power = raw_step.log10().floor();
    let base = 10f64.powf(power);
    let error = raw_step / base;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    let step = factor * base;

    let first = (start / step).ceil() as i64;
    let last = (stop / step).floor() as i64;
    (first..=last).map(|i| i as f64 * step).collect()
}
