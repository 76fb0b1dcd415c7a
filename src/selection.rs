//! Node and mood-slice selection.
//!
//! The two axes are independent toggles: clicking the selected entity again
//! clears it, and a click on one axis never touches the other.

use crate::data::ItemId;
use crate::graph::{FilteredGraph, ItemPair};
use crate::mood::MoodState;

/// Borrowed view of the reachable selection states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    NoneSelected,
    NodeSelected(&'a str),
    MoodSelected(MoodState),
    Both(&'a str, MoodState),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_node: Option<ItemId>,
    selected_mood: Option<MoodState>,
}

impl SelectionState {
    pub fn selected_node(&self) -> Option<&str> {
        self.selected_node.as_deref()
    }

    pub fn selected_mood(&self) -> Option<MoodState> {
        self.selected_mood
    }

    pub fn state(&self) -> Selection<'_> {
        match (self.selected_node.as_deref(), self.selected_mood) {
            (None, None) => Selection::NoneSelected,
            (Some(id), None) => Selection::NodeSelected(id),
            (None, Some(m)) => Selection::MoodSelected(m),
            (Some(id), Some(m)) => Selection::Both(id, m),
        }
    }

    pub fn toggle_node(&mut self, id: &str) {
        if self.selected_node.as_deref() == Some(id) {
            self.selected_node = None;
        } else {
            self.selected_node = Some(id.to_string());
        }
    }

    pub fn toggle_mood(&mut self, state: MoodState) {
        if self.selected_mood == Some(state) {
            self.selected_mood = None;
        } else {
            self.selected_mood = Some(state);
        }
    }

    pub fn set_mood(&mut self, state: Option<MoodState>) {
        self.selected_mood = state;
    }

    /// Drop the selected node if it vanished from `graph`. Returns whether it did.
    pub fn reconcile(&mut self, graph: &FilteredGraph) -> bool {
        match &self.selected_node {
            Some(id) if !graph.contains(id) => {
                tracing::debug!("Selected node {:?} left the filtered graph, clearing", id);
                self.selected_node = None;
                true
            }
            _ => false,
        }
    }

    /// Edges incident to the selected node; empty without a selection
    pub fn highlighted_links(&self, graph: &FilteredGraph) -> Vec<ItemPair> {
        match &self.selected_node {
            Some(id) => graph
                .incident_edges(id)
                .map(|(pair, _)| pair.clone())
                .collect(),
            None => Vec::new(),
        }
    }
}
