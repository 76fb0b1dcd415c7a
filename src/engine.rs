//! The engine: owns the stores and the only mutable state.
//!
//! Every mutation rebuilds a complete candidate [`Snapshot`] (graph, colors,
//! selection, statistics) from the stores and commits it only if every step
//! succeeds. A failed mutation leaves the previous snapshot in place, so a
//! half-updated state is never observable.

use chrono::NaiveDate;

use crate::data::{DatasetStore, DayStatsStore, LoadedData};
use crate::error::{FeelvizError, Result};
use crate::filter::{DateBounds, FilterState};
use crate::graph::{coloring, FilteredGraph, ItemPair};
use crate::mood::MoodState;
use crate::selection::SelectionState;
use crate::stats::{self, MoodCounts, SleepHistogram};
use crate::summary::Summary;

/// Target number of histogram bins
const HISTOGRAM_BINS: usize = 10;

/// Static configuration the engine starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub bounds: DateBounds,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
}

/// Immutable result of one rebuild, read by the views
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub filter: FilterState,
    pub selection: SelectionState,
    pub graph: FilteredGraph,
    pub highlighted_links: Vec<ItemPair>,
    pub sleep_durations: Vec<f64>,
    pub histogram: SleepHistogram,
    pub mood_counts: MoodCounts,
    pub summary: Summary,
}

impl Snapshot {
    pub fn is_highlighted(&self, pair: &ItemPair) -> bool {
        self.highlighted_links.contains(pair)
    }
}

pub struct Engine {
    dataset: DatasetStore,
    day_stats: DayStatsStore,
    bounds: DateBounds,
    snapshot: Snapshot,
}

impl Engine {
    pub fn new(dataset: DatasetStore, day_stats: DayStatsStore, config: EngineConfig) -> Result<Self> {
        let mut filter = FilterState::new(config.bounds.min, config.bounds.max)?;
        filter.set_date_range(config.default_start, config.default_end, &config.bounds)?;

        let snapshot = rebuild(&dataset, &day_stats, filter, SelectionState::default())?;
        tracing::info!(
            "Engine ready: {} nodes in {} .. {}",
            snapshot.graph.nodes.len(),
            filter.start(),
            filter.end()
        );

        Ok(Self {
            dataset,
            day_stats,
            bounds: config.bounds,
            snapshot,
        })
    }

    pub fn from_loaded(loaded: LoadedData, config: EngineConfig) -> Result<Self> {
        Self::new(loaded.dataset, loaded.day_stats, config)
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn filter(&self) -> &FilterState {
        &self.snapshot.filter
    }

    pub fn selection(&self) -> &SelectionState {
        &self.snapshot.selection
    }

    pub fn bounds(&self) -> &DateBounds {
        &self.bounds
    }

    pub fn dataset(&self) -> &DatasetStore {
        &self.dataset
    }

    /// Apply a new date range (range-drag completion)
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) -> Result<&Snapshot> {
        let mut filter = self.snapshot.filter;
        filter.set_date_range(start, end, &self.bounds)?;
        self.commit(filter, self.snapshot.selection.clone())
    }

    /// Set or clear the mood filter; the mood selection axis follows it
    pub fn set_mood_filter(&mut self, state: Option<MoodState>) -> Result<&Snapshot> {
        let mut filter = self.snapshot.filter;
        filter.set_mood_filter(state);
        let mut selection = self.snapshot.selection.clone();
        selection.set_mood(state);
        self.commit(filter, selection)
    }

    /// Toggle the node axis. Only nodes in the current graph can be selected.
    pub fn click_node(&mut self, id: &str) -> Result<&Snapshot> {
        let mut selection = self.snapshot.selection.clone();
        if selection.selected_node() != Some(id) && !self.snapshot.graph.contains(id) {
            return Err(FeelvizError::UnknownItem(id.to_string()));
        }
        selection.toggle_node(id);
        self.commit(self.snapshot.filter, selection)
    }

    /// Toggle the mood axis (pie slice click); the mood filter follows it
    pub fn click_mood_slice(&mut self, state: MoodState) -> Result<&Snapshot> {
        let mut selection = self.snapshot.selection.clone();
        selection.toggle_mood(state);
        let mut filter = self.snapshot.filter;
        filter.set_mood_filter(selection.selected_mood());
        self.commit(filter, selection)
    }

    fn commit(&mut self, filter: FilterState, selection: SelectionState) -> Result<&Snapshot> {
        let snapshot = rebuild(&self.dataset, &self.day_stats, filter, selection)?;
        self.snapshot = snapshot;
        Ok(&self.snapshot)
    }
}

/// Graph, then colors, then statistics
fn rebuild(
    dataset: &DatasetStore,
    day_stats: &DayStatsStore,
    filter: FilterState,
    mut selection: SelectionState,
) -> Result<Snapshot> {
    let mut graph = FilteredGraph::build(dataset, day_stats, &filter);
    coloring::apply(&mut graph, dataset, day_stats, &filter)?;

    selection.reconcile(&graph);
    let node = selection.selected_node();

    let sleep_durations = stats::sleep_durations(dataset, day_stats, &filter, &graph, node)?;
    let mood_counts = stats::mood_state_counts(dataset, day_stats, &filter, &graph, node)?;
    let histogram = SleepHistogram::from_values(&sleep_durations, HISTOGRAM_BINS);
    let highlighted_links = selection.highlighted_links(&graph);
    let summary = Summary::build(&filter, &selection, &graph);

    Ok(Snapshot {
        filter,
        selection,
        graph,
        highlighted_links,
        sleep_durations,
        histogram,
        mood_counts,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DayRecord, DayStats, ItemType};

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn mood(v: i64) -> MoodState {
        MoodState::new(v).unwrap()
    }

    fn config(start: &str, end: &str) -> EngineConfig {
        EngineConfig {
            bounds: DateBounds {
                min: day("2024-10-07"),
                max: day("2024-12-23"),
            },
            default_start: day(start),
            default_end: day(end),
        }
    }

    fn engine() -> Engine {
        let dataset = DatasetStore::from_records(vec![
            DayRecord::new(day("2024-10-18"), "A", ItemType::Association),
            DayRecord::new(day("2024-10-18"), "B", ItemType::Context),
            DayRecord::new(day("2024-10-19"), "A", ItemType::Association),
            DayRecord::new(day("2024-10-19"), "C", ItemType::Description),
            DayRecord::new(day("2024-10-25"), "D", ItemType::Context),
        ]);
        let stats = DayStatsStore::from_stats(vec![
            DayStats {
                date: day("2024-10-18"),
                mood_state: mood(1),
                sleep_hours: 7.5,
            },
            DayStats {
                date: day("2024-10-19"),
                mood_state: mood(1),
                sleep_hours: 6.0,
            },
            DayStats {
                date: day("2024-10-25"),
                mood_state: mood(-2),
                sleep_hours: 5.0,
            },
        ]);
        Engine::new(dataset, stats, config("2024-10-18", "2024-10-19")).unwrap()
    }

    #[test]
    fn initial_snapshot_matches_two_day_scenario() {
        let engine = engine();
        let snap = engine.snapshot();

        assert_eq!(snap.graph.nodes.len(), 3);
        assert_eq!(snap.graph.multiplicity("A", "B").unwrap(), 1);
        assert_eq!(snap.graph.multiplicity("A", "C").unwrap(), 1);
        assert!(snap.graph.multiplicity("B", "C").is_err());
        assert_eq!(snap.mood_counts.get(&mood(1)), Some(&2));
        assert_eq!(snap.mood_counts.len(), 1);
        assert_eq!(snap.graph.mood_of("A"), Some(mood(1)));
        assert!(snap.highlighted_links.is_empty());
    }

    #[test]
    fn selecting_a_node_narrows_statistics() {
        let mut engine = engine();
        let snap = engine.click_node("A").unwrap();

        assert_eq!(
            snap.highlighted_links,
            vec![ItemPair::new("A", "B").unwrap(), ItemPair::new("A", "C").unwrap()]
        );
        assert_eq!(snap.sleep_durations, vec![7.5, 6.0]);
        assert!(snap.summary.node_text.contains("Node count: 2 out of 1 days"));

        let snap = engine.click_node("A").unwrap();
        assert_eq!(snap.selection.selected_node(), None);
        assert!(snap.highlighted_links.is_empty());
    }

    #[test]
    fn clicking_unknown_node_is_rejected() {
        let mut engine = engine();
        let err = engine.click_node("D").err().unwrap();
        assert!(matches!(err, FeelvizError::UnknownItem(_)));
        assert!(err.is_recoverable());
        assert_eq!(engine.selection().selected_node(), None);
    }

    #[test]
    fn invalid_range_leaves_state_intact() {
        let mut engine = engine();
        engine.click_node("B").unwrap();

        let err = engine.set_date_range(day("2024-10-20"), day("2024-10-18")).err();
        assert!(matches!(err, Some(FeelvizError::InvalidRange { .. })));
        assert_eq!(engine.filter().start(), day("2024-10-18"));
        assert_eq!(engine.selection().selected_node(), Some("B"));
        assert_eq!(engine.snapshot().graph.nodes.len(), 3);
    }

    #[test]
    fn range_change_deselects_vanished_node() {
        let mut engine = engine();
        engine.click_node("B").unwrap();

        let snap = engine.set_date_range(day("2024-10-19"), day("2024-10-25")).unwrap();
        assert_eq!(snap.selection.selected_node(), None);
        assert!(snap.graph.contains("D"));
        assert!(!snap.graph.contains("B"));
    }

    #[test]
    fn range_change_keeps_surviving_node() {
        let mut engine = engine();
        engine.click_node("A").unwrap();
        let snap = engine.set_date_range(day("2024-10-19"), day("2024-10-25")).unwrap();
        assert_eq!(snap.selection.selected_node(), Some("A"));
        assert_eq!(snap.sleep_durations, vec![6.0]);
    }

    #[test]
    fn empty_range_yields_empty_snapshot() {
        let mut engine = engine();
        let snap = engine.set_date_range(day("2024-11-01"), day("2024-11-10")).unwrap();
        assert!(snap.graph.is_empty());
        assert!(snap.graph.edges.is_empty());
        assert!(snap.sleep_durations.is_empty());
        assert!(snap.histogram.is_empty());
    }

    #[test]
    fn mood_slice_toggles_filter() {
        let mut engine = engine();
        engine.set_date_range(day("2024-10-18"), day("2024-10-25")).unwrap();

        let snap = engine.click_mood_slice(mood(-2)).unwrap();
        assert_eq!(snap.filter.mood_state(), Some(mood(-2)));
        assert_eq!(snap.graph.nodes.len(), 1);
        assert!(snap.graph.contains("D"));
        // Statistics ignore the mood filter
        assert_eq!(snap.sleep_durations.len(), 3);

        let snap = engine.click_mood_slice(mood(-2)).unwrap();
        assert_eq!(snap.filter.mood_state(), None);
        assert_eq!(snap.selection.selected_mood(), None);
        assert_eq!(snap.graph.nodes.len(), 4);
    }

    #[test]
    fn mood_filter_deselects_node_outside_mood() {
        let mut engine = engine();
        engine.click_node("A").unwrap();
        let snap = engine.set_mood_filter(Some(mood(3))).unwrap();
        assert!(snap.graph.is_empty());
        assert_eq!(snap.selection.selected_node(), None);
        assert_eq!(snap.selection.selected_mood(), Some(mood(3)));
    }

    #[test]
    fn selected_node_statistics_follow_mood_filter() {
        let dataset = DatasetStore::from_records(vec![
            DayRecord::new(day("2024-10-18"), "A", ItemType::Context),
            DayRecord::new(day("2024-10-19"), "A", ItemType::Context),
            DayRecord::new(day("2024-10-20"), "A", ItemType::Context),
        ]);
        let stats = DayStatsStore::from_stats(vec![
            DayStats {
                date: day("2024-10-18"),
                mood_state: mood(1),
                sleep_hours: 7.5,
            },
            DayStats {
                date: day("2024-10-19"),
                mood_state: mood(1),
                sleep_hours: 6.0,
            },
            DayStats {
                date: day("2024-10-20"),
                mood_state: mood(-2),
                sleep_hours: 5.0,
            },
        ]);
        let mut engine = Engine::new(dataset, stats, config("2024-10-18", "2024-10-20")).unwrap();

        engine.click_mood_slice(mood(1)).unwrap();
        let snap = engine.click_node("A").unwrap();
        assert_eq!(snap.sleep_durations, vec![7.5, 6.0]);
        assert_eq!(snap.mood_counts.clone().into_iter().collect::<Vec<_>>(), vec![(mood(1), 2)]);
        assert_eq!(snap.histogram.total(), 2);
        assert!(snap.summary.node_text.contains("Node count: 2"));

        // Dropping the node brings the whole range back
        let snap = engine.click_node("A").unwrap();
        assert_eq!(snap.sleep_durations, vec![7.5, 6.0, 5.0]);
    }

    #[test]
    fn default_range_outside_bounds_fails() {
        let result = Engine::new(
            DatasetStore::default(),
            DayStatsStore::default(),
            config("2024-09-01", "2024-10-19"),
        );
        assert!(matches!(result, Err(FeelvizError::InvalidRange { .. })));
    }

    #[test]
    fn missing_stats_rejects_the_range() {
        let dataset = DatasetStore::from_records(vec![
            DayRecord::new(day("2024-10-18"), "A", ItemType::Context),
            DayRecord::new(day("2024-10-30"), "B", ItemType::Context),
        ]);
        let stats = DayStatsStore::from_stats(vec![DayStats {
            date: day("2024-10-18"),
            mood_state: mood(0),
            sleep_hours: 8.0,
        }]);
        let mut engine = Engine::new(dataset, stats, config("2024-10-18", "2024-10-19")).unwrap();

        let err = engine.set_date_range(day("2024-10-18"), day("2024-10-31")).err();
        assert!(matches!(err, Some(FeelvizError::DataIntegrity { .. })));
        assert_eq!(engine.filter().end(), day("2024-10-19"));
    }
}
