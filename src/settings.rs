//! Persistent settings for the dashboard app.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::engine::EngineConfig;
use crate::filter::DateBounds;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// All persistable settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Data
    pub data_dir: PathBuf,
    pub nodes_file: String,
    pub day_stats_file: String,

    // Date selection
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
    /// Range selected when the app last closed
    pub last_range: Option<(NaiveDate, NaiveDate)>,

    // Display
    pub node_scale: f32,
    pub show_labels: bool,
    pub label_size: f32,

    // Physics
    pub physics_enabled: bool,
    pub repulsion: f32,
    pub attraction: f32,
    pub centering: f32,
    /// Link length for a pair seen on one day; halves at two days, and so on
    pub link_distance: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Data
            data_dir: PathBuf::from("data"),
            nodes_file: "nodes.csv".to_string(),
            day_stats_file: "day_stats.csv".to_string(),

            // Date selection
            min_date: date(2024, 10, 7),
            max_date: date(2024, 12, 23),
            default_start: date(2024, 10, 18),
            default_end: date(2024, 10, 31),
            last_range: None,

            // Display
            node_scale: 1500.0,
            show_labels: true,
            label_size: 10.0,

            // Physics
            physics_enabled: true,
            repulsion: 2000.0,
            attraction: 0.05,
            centering: 0.002,
            link_distance: 160.0,
        }
    }
}

impl Settings {
    /// Get the path to the settings file
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("feelviz");
            p.push("settings.json");
            p
        })
    }

    /// Load settings from disk, returning defaults if file doesn't exist or is invalid
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => Self::from_json(&contents).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse settings file: {}, using defaults", e);
                Self::default()
            }),
            Err(_) => {
                // File doesn't exist yet, that's fine
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            tracing::warn!("Could not determine config directory, settings not saved");
            return;
        };

        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create config directory: {}", e);
                return;
            }
        }

        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    tracing::warn!("Failed to write settings file: {}", e);
                } else {
                    tracing::debug!("Saved settings to {:?}", path);
                }
            }
            Err(e) => {
                tracing::warn!("Failed to serialize settings: {}", e);
            }
        }
    }

    pub fn nodes_path(&self) -> PathBuf {
        self.data_dir.join(&self.nodes_file)
    }

    pub fn day_stats_path(&self) -> PathBuf {
        self.data_dir.join(&self.day_stats_file)
    }

    pub fn bounds(&self) -> DateBounds {
        DateBounds {
            min: self.min_date,
            max: self.max_date,
        }
    }

    /// Engine start-up config. A remembered range wins when it still fits the bounds.
    pub fn engine_config(&self) -> EngineConfig {
        let bounds = self.bounds();
        let (start, end) = match self.last_range {
            Some((s, e)) if s <= e && bounds.contains(s) && bounds.contains(e) => (s, e),
            _ => (self.default_start, self.default_end),
        };
        EngineConfig {
            bounds,
            default_start: start,
            default_end: end,
        }
    }
}
