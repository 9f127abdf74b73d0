// Analysis history: records of past analyses, persisted to a JSON file.

pub mod models;
pub mod store;

pub use models::{AnalysisRecord, HistoryStats, NoveltyKind, RecordStatus};
pub use store::{HistoryStore, MAX_PERSISTED};
