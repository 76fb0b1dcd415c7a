//! Journal data: typed records, the two stores and the CSV loader.

pub mod loader;
pub mod records;
pub mod store;

pub use loader::{load_from_paths, load_from_readers, LoadReport, LoadedData};
pub use records::{DayRecord, DayStats, ItemId, ItemType};
pub use store::{DatasetStore, DayStatsStore};
