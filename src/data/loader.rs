//! CSV loader for the journal tables.
//!
//! Reads `nodes.csv` (`date,word,type`) and `day_stats.csv`
//! (`date,mindState,sleep`) into the stores. Rows with an unknown item type
//! are logged and skipped; any other malformed field aborts the load.

use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use super::records::{DayRecord, DayStats, ItemType};
use super::store::{DatasetStore, DayStatsStore};
use crate::error::{FeelvizError, Result};
use crate::mood::MoodState;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw row of the item table
#[derive(Debug, Deserialize)]
struct NodeRow {
    date: String,
    word: String,
    #[serde(rename = "type")]
    kind: String,
}

/// Raw row of the day statistics table
#[derive(Debug, Deserialize)]
struct DayStatsRow {
    date: String,
    #[serde(rename = "mindState")]
    mind_state: String,
    sleep: String,
}

/// Outcome of a full load
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: usize,
    pub days: usize,
    pub stats_days: usize,
    pub skipped_records: usize,
    pub days_without_stats: usize,
    pub load_time_ms: u64,
}

/// Both stores plus what happened while reading them
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub dataset: DatasetStore,
    pub day_stats: DayStatsStore,
    pub report: LoadReport,
}

fn parse_date(raw: &str, line: u64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| FeelvizError::InvalidRecord {
        line,
        reason: format!("bad date {:?}: {}", raw, e),
    })
}

/// Read day records, returning them with the number of skipped rows
pub fn read_records<R: Read>(reader: R) -> Result<(Vec<DayRecord>, usize)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut records = Vec::new();
    let mut skipped = 0;

    for result in rdr.records() {
        let raw = result?;
        let line = raw.position().map_or(0, |p| p.line());
        let row: NodeRow = raw.deserialize(Some(&headers))?;

        let item_type = match row.kind.parse::<ItemType>() {
            Ok(kind) => kind,
            Err(()) => {
                let err = FeelvizError::UnknownItemType {
                    line,
                    value: row.kind,
                };
                tracing::warn!("Skipping record: {}", err);
                skipped += 1;
                continue;
            }
        };

        if row.word.is_empty() {
            return Err(FeelvizError::InvalidRecord {
                line,
                reason: "empty item".to_string(),
            });
        }

        records.push(DayRecord::new(parse_date(&row.date, line)?, row.word, item_type));
    }

    Ok((records, skipped))
}

/// Read day statistics rows
pub fn read_day_stats<R: Read>(reader: R) -> Result<Vec<DayStats>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();

    let mut stats = Vec::new();
    for result in rdr.records() {
        let raw = result?;
        let line = raw.position().map_or(0, |p| p.line());
        let row: DayStatsRow = raw.deserialize(Some(&headers))?;

        let mood_value: i64 = row.mind_state.parse().map_err(|_| FeelvizError::InvalidRecord {
            line,
            reason: format!("bad mindState {:?}", row.mind_state),
        })?;
        let mood_state = MoodState::new(mood_value).map_err(|e| FeelvizError::InvalidRecord {
            line,
            reason: e.to_string(),
        })?;
        let sleep_hours: f64 = row.sleep.parse().map_err(|_| FeelvizError::InvalidRecord {
            line,
            reason: format!("bad sleep {:?}", row.sleep),
        })?;
        if !sleep_hours.is_finite() || sleep_hours < 0.0 {
            return Err(FeelvizError::InvalidRecord {
                line,
                reason: format!("sleep out of range: {}", sleep_hours),
            });
        }

        stats.push(DayStats {
            date: parse_date(&row.date, line)?,
            mood_state,
            sleep_hours,
        });
    }

    Ok(stats)
}

/// Build both stores from two readers
pub fn load_from_readers<N: Read, S: Read>(nodes: N, day_stats: S) -> Result<LoadedData> {
    let start = Instant::now();

    let (records, skipped_records) = read_records(nodes)?;
    let dataset = DatasetStore::from_records(records);
    let day_stats = DayStatsStore::from_stats(read_day_stats(day_stats)?);

    let missing = day_stats.missing_for(&dataset);
    for date in &missing {
        tracing::warn!("Record day {} has no day statistics", date);
    }

    let report = LoadReport {
        records: dataset.record_count(),
        days: dataset.day_count(),
        stats_days: day_stats.len(),
        skipped_records,
        days_without_stats: missing.len(),
        load_time_ms: start.elapsed().as_millis() as u64,
    };

    tracing::info!(
        "Loaded {} records over {} days ({} skipped), {} stats days in {}ms",
        report.records,
        report.days,
        report.skipped_records,
        report.stats_days,
        report.load_time_ms
    );

    Ok(LoadedData {
        dataset,
        day_stats,
        report,
    })
}

/// Build both stores from two CSV files
pub fn load_from_paths(nodes: &Path, day_stats: &Path) -> Result<LoadedData> {
    let nodes_file = std::fs::File::open(nodes)?;
    let stats_file = std::fs::File::open(day_stats)?;
    load_from_readers(nodes_file, stats_file)
}
