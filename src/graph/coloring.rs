//! Dominant mood classification for graph nodes.
//!
//! A node's color reflects its mood distribution over the visible window:
//! occurrences are counted over the date range only, not the mood filter.

use std::collections::{BTreeMap, BTreeSet};

use super::builder::FilteredGraph;
use crate::data::{DatasetStore, DayStatsStore, ItemId};
use crate::error::Result;
use crate::filter::FilterState;
use crate::mood::MoodState;

/// Mood histogram for one node, indexed by `value + 3`
type MoodTally = [usize; 7];

fn dominant(tally: &MoodTally) -> MoodState {
    // Strict comparison keeps the lowest value on ties
    let mut best = MoodState::LOWEST;
    for state in MoodState::all() {
        if tally[index(state)] > tally[index(best)] {
            best = state;
        }
    }
    best
}

fn index(state: MoodState) -> usize {
    (state.value() - MoodState::MIN) as usize
}

/// Dominant mood for every node of `graph`
pub fn dominant_moods(
    graph: &FilteredGraph,
    dataset: &DatasetStore,
    stats: &DayStatsStore,
    filter: &FilterState,
) -> Result<BTreeMap<ItemId, MoodState>> {
    let mut tallies: BTreeMap<&str, MoodTally> = BTreeMap::new();

    for (date, raw_items) in dataset.days() {
        if !filter.in_range(date) {
            continue;
        }
        let items: BTreeSet<&str> = raw_items
            .iter()
            .map(String::as_str)
            .filter(|item| graph.contains(item))
            .collect();
        if items.is_empty() {
            continue;
        }

        let mood = stats.require(date)?.mood_state;
        for item in items {
            tallies.entry(item).or_insert([0; 7])[index(mood)] += 1;
        }
    }

    Ok(tallies
        .into_iter()
        .map(|(item, tally)| (item.to_string(), dominant(&tally)))
        .collect())
}

/// Run the coloring pass and store the result on the graph
pub fn apply(
    graph: &mut FilteredGraph,
    dataset: &DatasetStore,
    stats: &DayStatsStore,
    filter: &FilterState,
) -> Result<()> {
    graph.colors = dominant_moods(graph, dataset, stats, filter)?;
    Ok(())
}
