// History store: newest-first list of analyses backed by a JSON file.
//
// Loaded once at startup. Every insert goes through a mutex and rewrites the
// file from the in-memory list, so concurrent analyses cannot drop each
// other's entries. The snapshot is written to a sibling temp file and renamed
// into place, so a crash mid-write leaves the previous file intact.
//
// Persistence failures are logged and swallowed: a full disk should not turn
// a successful analysis into an error for the caller.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use super::models::{AnalysisRecord, HistoryStats};

/// Number of records kept in memory and on disk.
pub const MAX_PERSISTED: usize = 50;

pub struct HistoryStore {
    path: PathBuf,
    records: Mutex<Vec<AnalysisRecord>>,
}

impl HistoryStore {
    /// Open the store, loading whatever is on disk at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load(&path);
        Self {
            path,
            records: Mutex::new(records),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a record at the front and persist the newest entries.
    pub async fn insert_at_front(&self, record: AnalysisRecord) {
        let mut records = self.records.lock().await;
        records.insert(0, record);
        records.truncate(MAX_PERSISTED);
        save(&self.path, &records).await;
    }

    /// The `n` most recent records, newest first.
    pub async fn recent(&self, n: usize) -> Vec<AnalysisRecord> {
        let records = self.records.lock().await;
        records.iter().take(n).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    pub async fn stats(&self) -> HistoryStats {
        let records = self.records.lock().await;
        HistoryStats::from_records(&records)
    }
}

/// Read the history file. A missing or unreadable file yields an empty list;
/// entries that no longer deserialize are skipped one by one.
pub fn load(path: &Path) -> Vec<AnalysisRecord> {
    if !path.exists() {
        debug!(path = %path.display(), "No history file, starting empty");
        return Vec::new();
    }

    let parsed = std::fs::read(path)
        .map_err(anyhow::Error::from)
        .and_then(|bytes| {
            serde_json::from_slice::<Vec<serde_json::Value>>(&bytes).map_err(anyhow::Error::from)
        });

    let entries = match parsed {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load history, starting empty");
            return Vec::new();
        }
    };

    let mut records: Vec<AnalysisRecord> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(path = %path.display(), index = i, error = %e, "Skipping malformed history entry");
                None
            }
        })
        .collect();

    records.truncate(MAX_PERSISTED);
    debug!(path = %path.display(), count = records.len(), "Loaded history");
    records
}

/// Write at most the first `MAX_PERSISTED` records, replacing the file.
pub async fn save(path: &Path, records: &[AnalysisRecord]) {
    if let Err(e) = try_save(path, records).await {
        error!(path = %path.display(), error = %e, "Failed to save history");
    }
}

async fn try_save(path: &Path, records: &[AnalysisRecord]) -> anyhow::Result<()> {
    let keep = &records[..records.len().min(MAX_PERSISTED)];
    let json = serde_json::to_vec_pretty(keep)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, json).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
