// History data models: the persisted shape of one analysis and the
// aggregate statistics derived from the stored list.
//
// Field names are part of the on-disk format and the /history response,
// so they are kept stable through serde renames.

use serde::{Deserialize, Serialize};

use crate::output::truncate_chars;
use crate::scoring::NoveltyVerdict;

/// Stored texts are cut to this many characters.
pub const STORED_TEXT_CHARS: usize = 150;

/// Coarse type tag, `"new"` or `"similar"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoveltyKind {
    New,
    Similar,
}

/// Human-facing status label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    Novel,
    Similar,
}

/// One completed analysis. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    /// Submitted text, truncated to 150 characters plus "..."
    pub text: String,
    pub status: RecordStatus,
    pub similarity_score: f64,
    pub confidence: f64,
    /// Raw whitespace-delimited word count
    pub word_count: usize,
    /// Token count after preprocessing
    pub clean_word_count: usize,
    /// Local time, "%Y-%m-%d %H:%M:%S"
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: NoveltyKind,
}

impl AnalysisRecord {
    pub fn new(
        text: &str,
        verdict: &NoveltyVerdict,
        word_count: usize,
        clean_word_count: usize,
        timestamp: String,
    ) -> Self {
        let (status, kind) = if verdict.is_novel {
            (RecordStatus::Novel, NoveltyKind::New)
        } else {
            (RecordStatus::Similar, NoveltyKind::Similar)
        };

        Self {
            text: truncate_chars(text, STORED_TEXT_CHARS),
            status,
            similarity_score: verdict.similarity,
            confidence: verdict.confidence,
            word_count,
            clean_word_count,
            timestamp,
            kind,
        }
    }
}

/// Aggregates over the stored history, served by /stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryStats {
    pub total: usize,
    pub new: usize,
    pub similar: usize,
    pub novelty_rate: f64,
    pub avg_similarity: f64,
    pub avg_confidence: f64,
}

impl HistoryStats {
    /// Compute aggregates. An empty history yields all zeros.
    pub fn from_records(records: &[AnalysisRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let total = records.len();
        let new = records
            .iter()
            .filter(|r| r.kind == NoveltyKind::New)
            .count();
        let n = total as f64;

        Self {
            total,
            new,
            similar: total - new,
            novelty_rate: new as f64 / n,
            avg_similarity: records.iter().map(|r| r.similarity_score).sum::<f64>() / n,
            avg_confidence: records.iter().map(|r| r.confidence).sum::<f64>() / n,
        }
    }
}
