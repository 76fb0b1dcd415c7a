//! Co-occurrence graph built from the days passing the current filter.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use super::pair::ItemPair;
use crate::data::{DatasetStore, DayStatsStore, ItemId, ItemType};
use crate::error::{FeelvizError, Result};
use crate::filter::FilterState;
use crate::mood::MoodState;

/// Nodes, weighted edges and per-node data derived from the passing days.
///
/// Rebuilt from scratch on every filter change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredGraph {
    pub nodes: BTreeSet<ItemId>,
    /// Passing days on which each item occurs
    pub occurrences: BTreeMap<ItemId, BTreeSet<NaiveDate>>,
    /// Number of passing days per item
    pub frequency: BTreeMap<ItemId, usize>,
    /// Number of passing days on which both items occur
    pub edges: BTreeMap<ItemPair, usize>,
    /// Dominant mood state per node, filled in by the coloring pass
    pub colors: BTreeMap<ItemId, MoodState>,
    pub kinds: BTreeMap<ItemId, ItemType>,
    pub passing_days: BTreeSet<NaiveDate>,
}

impl FilteredGraph {
    /// Build the graph for `filter`. Never fails; no passing days gives an empty graph.
    pub fn build(dataset: &DatasetStore, stats: &DayStatsStore, filter: &FilterState) -> Self {
        let mut graph = FilteredGraph::default();

        for (date, raw_items) in dataset.days() {
            if !filter.matches(date, stats) {
                continue;
            }
            graph.passing_days.insert(date);

            // An item counts once per day however many rows it has
            let items: BTreeSet<&ItemId> = raw_items.iter().collect();

            for &item in &items {
                graph.nodes.insert(item.clone());
                graph
                    .occurrences
                    .entry(item.clone())
                    .or_default()
                    .insert(date);
                if let Some(kind) = dataset.kind(item) {
                    graph.kinds.insert(item.clone(), kind);
                }
            }

            // Sorted set, so every pair is visited once with low < high
            let ordered: Vec<&ItemId> = items.into_iter().collect();
            for (i, &a) in ordered.iter().enumerate() {
                for &b in &ordered[i + 1..] {
                    if let Some(pair) = ItemPair::new(a.as_str(), b.as_str()) {
                        *graph.edges.entry(pair).or_insert(0) += 1;
                    }
                }
            }
        }

        graph.frequency = graph
            .occurrences
            .iter()
            .map(|(item, days)| (item.clone(), days.len()))
            .collect();

        tracing::debug!(
            "Built graph: {} nodes, {} edges over {} passing days",
            graph.nodes.len(),
            graph.edges.len(),
            graph.passing_days.len()
        );

        graph
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, item: &str) -> bool {
        self.nodes.contains(item)
    }

    pub fn frequency_of(&self, item: &str) -> usize {
        self.frequency.get(item).copied().unwrap_or(0)
    }

    /// Edge weight. An absent pair is a lookup miss, never a silent zero.
    pub fn multiplicity(&self, a: &str, b: &str) -> Result<usize> {
        ItemPair::new(a, b)
            .and_then(|pair| self.edges.get(&pair).copied())
            .ok_or_else(|| FeelvizError::LookupMiss(format!("no edge between {:?} and {:?}", a, b)))
    }

    /// Edges touching `item` with their weights
    pub fn incident_edges<'a>(&'a self, item: &'a str) -> impl Iterator<Item = (&'a ItemPair, usize)> + 'a {
        self.edges
            .iter()
            .filter(move |&(pair, &count)| count > 0 && pair.contains(item))
            .map(|(pair, &count)| (pair, count))
    }

    /// Item frequency relative to the node count, used for node sizing
    pub fn node_share(&self, item: &str) -> f32 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.frequency_of(item) as f32 / self.nodes.len() as f32
    }

    pub fn kind(&self, item: &str) -> Option<ItemType> {
        self.kinds.get(item).copied()
    }

    pub fn mood_of(&self, item: &str) -> Option<MoodState> {
        self.colors.get(item).copied()
    }
}
