//! Unified theme and color constants for the app.
//!
//! Mood colors live in `mood.rs`; everything else the panels draw with
//! is sourced from here.

use egui::Color32;

/// Background colors for different layers
pub mod bg {
    use super::*;

    /// Main graph area background - darkest layer
    pub const GRAPH: Color32 = Color32::from_rgb(14, 17, 23);

    /// Panel backgrounds - slightly lighter than graph
    pub const PANEL: Color32 = Color32::from_rgb(20, 22, 28);

    /// Timeline track background
    pub const TIMELINE_TRACK: Color32 = Color32::from_rgb(118, 122, 131);
}

/// Text colors at different emphasis levels
pub mod text {
    use super::*;

    /// Primary text - high contrast
    pub const PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);

    /// Secondary text - medium contrast
    pub const SECONDARY: Color32 = Color32::from_rgb(180, 180, 190);

    /// Muted text - low contrast for less important info
    pub const MUTED: Color32 = Color32::from_rgb(120, 125, 135);
}

/// Graph links and nodes
pub mod graph {
    use super::*;

    /// Link not touching the selected node
    pub const LINK: Color32 = Color32::from_rgb(0xD4, 0xD7, 0xDB);

    /// Link touching the selected node
    pub const LINK_HIGHLIGHT: Color32 = Color32::WHITE;

    /// Fill of the selected node
    pub const SELECTED_NODE: Color32 = Color32::from_rgb(0xE8, 0x4C, 0x58);

    /// Node fill when no mood color is known
    pub const UNCOLORED_NODE: Color32 = Color32::from_rgb(120, 125, 135);

    pub const LINK_WIDTH: f32 = 0.5;
    pub const LINK_HIGHLIGHT_WIDTH: f32 = 1.5;
}

/// Chart colors
pub mod chart {
    use super::*;

    /// Sleep histogram bars
    pub const HISTOGRAM_BAR: Color32 = Color32::from_rgb(0x69, 0xB3, 0xA2);

    /// Border between pie slices
    pub const SLICE_BORDER: Color32 = Color32::WHITE;

    /// Outline of the selected slice
    pub const SLICE_SELECTED: Color32 = Color32::BLACK;
}

/// Timeline-specific colors
pub mod timeline {
    use super::*;

    /// Tick marks/notches
    pub const NOTCH: Color32 = Color32::from_rgb(60, 65, 75);

    /// Selected span between the handles
    pub const RANGE: Color32 = Color32::from_rgb(0x8E, 0xD4, 0x33);

    /// Start handle
    pub const HANDLE_START: Color32 = Color32::from_rgb(0xF3, 0x44, 0x24);

    /// End handle
    pub const HANDLE_END: Color32 = Color32::from_rgb(0xF3, 0x44, 0x24);
}

/// State colors for status lines
pub mod state {
    use super::*;

    /// Success indicator
    pub const SUCCESS: Color32 = Color32::from_rgb(34, 197, 94);

    /// Error indicator
    pub const ERROR: Color32 = Color32::from_rgb(239, 68, 68);

    /// Warning indicator
    pub const WARNING: Color32 = Color32::from_rgb(245, 158, 11);
}

/// Helper to create a stroke with consistent styling
pub fn stroke(color: Color32, width: f32) -> egui::Stroke {
    egui::Stroke::new(width, color)
}
