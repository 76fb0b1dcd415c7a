//! Human-readable summary lines shown next to the charts.

use egui::Color32;

use crate::filter::FilterState;
use crate::graph::FilteredGraph;
use crate::mood::MoodState;
use crate::selection::SelectionState;

/// Text for the selected-mood line. The mood name is drawn in its color.
#[derive(Debug, Clone, PartialEq)]
pub enum MoodSummary {
    AllFeelings,
    Feeling { name: &'static str, color: Color32 },
}

impl MoodSummary {
    pub const ALL_FEELINGS_TEXT: &'static str =
        "Showing all feelings. Click on a pie chart's slice to filter by a feeling.";

    pub fn for_mood(mood: Option<MoodState>) -> Self {
        match mood {
            None => MoodSummary::AllFeelings,
            Some(m) => MoodSummary::Feeling {
                name: m.name(),
                color: m.color(),
            },
        }
    }

    pub fn plain_text(&self) -> String {
        match self {
            MoodSummary::AllFeelings => Self::ALL_FEELINGS_TEXT.to_string(),
            MoodSummary::Feeling { name, .. } => format!("Selected feeling: {}.", name),
        }
    }
}

/// All summary lines for one snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub node_text: String,
    pub mood: MoodSummary,
    pub day_count: i64,
}

impl Summary {
    pub fn build(filter: &FilterState, selection: &SelectionState, graph: &FilteredGraph) -> Self {
        let day_count = filter.day_span();
        let node_text = match selection.selected_node() {
            None => "No node selected. Showing all statistics from the selected date range.".to_string(),
            Some(id) => format!(
                "Selected Node: \"{}\". Node count: {} out of {} days.",
                id,
                graph.frequency_of(id),
                day_count
            ),
        };
        Self {
            node_text,
            mood: MoodSummary::for_mood(selection.selected_mood()),
            day_count,
        }
    }

    pub fn day_count_text(&self) -> String {
        format!("{} days", self.day_count)
    }
}
