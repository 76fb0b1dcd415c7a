//! Mood journal engine.
//!
//! Turns a journal of (date, item) records plus per-day mood and sleep
//! statistics into a co-occurrence graph, a sleep histogram and a mood
//! breakdown, all driven by a date-range filter and a two-axis selection.
//! `Engine` owns the stores and rebuilds an immutable `Snapshot` on every
//! event; the eframe shell in `main.rs` only renders snapshots.

pub mod data;
pub mod engine;
pub mod error;
pub mod filter;
pub mod graph;
pub mod mood;
pub mod selection;
pub mod settings;
pub mod stats;
pub mod summary;
pub mod theme;
pub mod timeline;

pub use engine::{Engine, EngineConfig, Snapshot};
pub use error::{FeelvizError, Result};
