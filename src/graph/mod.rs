//! Co-occurrence graph construction, coloring and layout.

pub mod builder;
pub mod coloring;
pub mod layout;
pub mod pair;

pub use builder::FilteredGraph;
pub use layout::{ForceLayout, LayoutState};
pub use pair::ItemPair;
