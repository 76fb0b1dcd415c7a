//! Property-based tests for feelviz
//!
//! These tests verify invariants that must hold for all journals:
//! - Graph counts match a brute-force recount of the passing days
//! - Selection toggles are reversible
//! - Chart datasets account for every projected day
//!
//! Run with: cargo test --test property_tests

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

use feelviz::data::{DatasetStore, DayRecord, DayStats, DayStatsStore, ItemType};
use feelviz::filter::DateBounds;
use feelviz::graph::ItemPair;
use feelviz::mood::MoodState;
use feelviz::{Engine, EngineConfig, FeelvizError};

const WINDOW_DAYS: i64 = 30;

fn origin() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
}

fn bounds() -> DateBounds {
    DateBounds {
        min: origin(),
        max: origin() + Duration::days(WINDOW_DAYS),
    }
}

/// One journal day: offset from the origin, items (duplicates allowed), mood, sleep
type JournalDay = (i64, Vec<String>, i64, f64);

fn journal_day() -> impl Strategy<Value = JournalDay> {
    (
        0..=WINDOW_DAYS,
        prop::collection::vec("[a-f]", 1..6),
        -3i64..=3,
        4.0f64..10.0,
    )
}

fn journal() -> impl Strategy<Value = Vec<JournalDay>> {
    prop::collection::vec(journal_day(), 0..25)
}

fn range() -> impl Strategy<Value = (i64, i64)> {
    (0..=WINDOW_DAYS).prop_flat_map(|start| (Just(start), start..=WINDOW_DAYS))
}

fn mood_filter() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(-3i64..=3)
}

/// Build the stores. Later duplicates of a day overwrite its statistics.
fn stores(days: &[JournalDay]) -> (DatasetStore, DayStatsStore) {
    let mut records = Vec::new();
    let mut stats = Vec::new();
    for (offset, items, mood, sleep) in days {
        let date = origin() + Duration::days(*offset);
        for item in items {
            records.push(DayRecord::new(date, item.as_str(), ItemType::Context));
        }
        stats.push(DayStats {
            date,
            mood_state: MoodState::new(*mood).unwrap(),
            sleep_hours: *sleep,
        });
    }
    (DatasetStore::from_records(records), DayStatsStore::from_stats(stats))
}

fn engine_for(days: &[JournalDay], (start, end): (i64, i64)) -> Engine {
    let (dataset, stats) = stores(days);
    let config = EngineConfig {
        bounds: bounds(),
        default_start: origin() + Duration::days(start),
        default_end: origin() + Duration::days(end),
    };
    Engine::new(dataset, stats, config).unwrap()
}

// ============================================================================
// GRAPH TESTS
// ============================================================================

mod graph_tests {
    use super::*;

    proptest! {
        /// Invariant: edges are exactly the pairs sharing a passing day, weighted by
        /// the number of such days
        #[test]
        fn multiplicity_matches_recount(days in journal(), r in range(), mood in mood_filter()) {
            let mut engine = engine_for(&days, r);
            engine.set_mood_filter(mood.map(|m| MoodState::new(m).unwrap())).unwrap();
            let snapshot = engine.snapshot();
            let (dataset, stats) = stores(&days);

            for (pair, &count) in &snapshot.graph.edges {
                let expected = dataset
                    .days()
                    .filter(|(date, _)| snapshot.filter.matches(*date, &stats))
                    .filter(|(_, items)| {
                        items.iter().any(|i| i == pair.low()) && items.iter().any(|i| i == pair.high())
                    })
                    .count();
                prop_assert_eq!(count, expected);
                prop_assert_eq!(snapshot.graph.multiplicity(pair.low(), pair.high()).unwrap(), expected);
            }

            // Every pair sharing a passing day must have its edge
            let mut recount: BTreeMap<(String, String), usize> = BTreeMap::new();
            for (date, items) in dataset.days() {
                if !snapshot.filter.matches(date, &stats) {
                    continue;
                }
                let distinct: Vec<&String> = items.iter().collect::<BTreeSet<_>>().into_iter().collect();
                for (i, a) in distinct.iter().enumerate() {
                    for b in &distinct[i + 1..] {
                        *recount.entry(((*a).clone(), (*b).clone())).or_insert(0) += 1;
                    }
                }
            }
            prop_assert_eq!(snapshot.graph.edges.len(), recount.len());
            for ((a, b), expected) in &recount {
                let pair = ItemPair::new(a, b).unwrap();
                prop_assert_eq!(snapshot.graph.edges.get(&pair), Some(expected));
            }
        }

        /// Invariant: no item is linked to itself
        #[test]
        fn no_self_loops(days in journal(), r in range()) {
            let engine = engine_for(&days, r);
            for pair in engine.snapshot().graph.edges.keys() {
                prop_assert_ne!(pair.low(), pair.high());
            }
        }

        /// Invariant: frequency counts passing days, not edges
        #[test]
        fn frequency_counts_passing_days(days in journal(), r in range(), mood in mood_filter()) {
            let mut engine = engine_for(&days, r);
            engine.set_mood_filter(mood.map(|m| MoodState::new(m).unwrap())).unwrap();
            let snapshot = engine.snapshot();
            let (dataset, stats) = stores(&days);

            for item in &snapshot.graph.nodes {
                let expected: BTreeSet<NaiveDate> = dataset
                    .days()
                    .filter(|(date, _)| snapshot.filter.matches(*date, &stats))
                    .filter(|(_, items)| items.iter().any(|i| i == item))
                    .map(|(date, _)| date)
                    .collect();
                prop_assert_eq!(snapshot.graph.frequency_of(item), expected.len());
            }
        }
    }
}

// ============================================================================
// SELECTION TESTS
// ============================================================================

mod selection_tests {
    use super::*;

    proptest! {
        /// Invariant: clicking the same node twice restores the selection
        #[test]
        fn double_click_is_a_no_op(days in journal(), r in range(), pick in any::<prop::sample::Index>()) {
            let mut engine = engine_for(&days, r);
            let nodes: Vec<String> = engine.snapshot().graph.nodes.iter().cloned().collect();
            prop_assume!(!nodes.is_empty());
            let id = pick.get(&nodes).clone();

            let before = engine.selection().clone();
            engine.click_node(&id).unwrap();
            prop_assert_eq!(engine.selection().selected_node(), Some(id.as_str()));
            engine.click_node(&id).unwrap();
            prop_assert_eq!(engine.selection(), &before);
        }

        /// Invariant: a selected node that leaves the graph is cleared
        #[test]
        fn vanished_selection_is_cleared(days in journal(), r in range(), r2 in range()) {
            let mut engine = engine_for(&days, r);
            let Some(id) = engine.snapshot().graph.nodes.iter().next().cloned() else {
                return Ok(());
            };
            engine.click_node(&id).unwrap();
            let (start, end) = r2;
            engine
                .set_date_range(origin() + Duration::days(start), origin() + Duration::days(end))
                .unwrap();
            let snapshot = engine.snapshot();
            if !snapshot.graph.contains(&id) {
                prop_assert_eq!(snapshot.selection.selected_node(), None);
                prop_assert!(snapshot.highlighted_links.is_empty());
            }
        }

        /// Invariant: a rejected range leaves the snapshot untouched
        #[test]
        fn rejected_range_changes_nothing(days in journal(), r in range()) {
            let mut engine = engine_for(&days, r);
            let before = engine.snapshot().clone();
            let result = engine.set_date_range(origin() + Duration::days(5), origin() + Duration::days(4));
            let is_invalid_range = matches!(result, Err(FeelvizError::InvalidRange { .. }));
            prop_assert!(is_invalid_range);
            prop_assert_eq!(engine.snapshot().filter, before.filter);
            prop_assert_eq!(&engine.snapshot().graph, &before.graph);
        }
    }
}

// ============================================================================
// STATISTICS TESTS
// ============================================================================

mod stats_tests {
    use super::*;

    proptest! {
        /// Invariant: every projected night lands in exactly one histogram bin
        #[test]
        fn histogram_accounts_for_every_night(days in journal(), r in range()) {
            let engine = engine_for(&days, r);
            let snapshot = engine.snapshot();
            prop_assert_eq!(snapshot.histogram.total(), snapshot.sleep_durations.len());
        }

        /// Invariant: mood counts sum to the in-range days that have statistics
        #[test]
        fn mood_counts_cover_range(days in journal(), r in range()) {
            let engine = engine_for(&days, r);
            let snapshot = engine.snapshot();
            let (dataset, _) = stores(&days);
            let in_range = dataset.days().filter(|(date, _)| snapshot.filter.in_range(*date)).count();
            prop_assert_eq!(snapshot.mood_counts.values().sum::<usize>(), in_range);
            prop_assert_eq!(snapshot.sleep_durations.len(), in_range);
        }

        /// Invariant: a selected node projects exactly its passing days, mood filter included
        #[test]
        fn selected_node_projects_its_passing_days(
            days in journal(),
            r in range(),
            mood in mood_filter(),
            pick in any::<prop::sample::Index>(),
        ) {
            let mut engine = engine_for(&days, r);
            engine.set_mood_filter(mood.map(|m| MoodState::new(m).unwrap())).unwrap();
            let nodes: Vec<String> = engine.snapshot().graph.nodes.iter().cloned().collect();
            prop_assume!(!nodes.is_empty());
            let id = pick.get(&nodes).clone();

            let snapshot = engine.click_node(&id).unwrap();
            let frequency = snapshot.graph.frequency_of(&id);
            prop_assert_eq!(snapshot.sleep_durations.len(), frequency);
            prop_assert_eq!(snapshot.mood_counts.values().sum::<usize>(), frequency);
            if let Some(m) = snapshot.filter.mood_state() {
                prop_assert!(snapshot.mood_counts.keys().all(|k| *k == m));
            }
        }
    }
}
