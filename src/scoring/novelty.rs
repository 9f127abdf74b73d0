// Novelty scoring: nearest-reference cosine similarity and classification.
//
// A submission is novel when nothing in the reference sample comes close:
// the maximum cosine similarity against every reference row must fall
// strictly below the threshold. Confidence is the distance from a perfect
// match, 1 - similarity.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::reference::ReferenceStore;

/// Tunable classification thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoveltyThresholds {
    /// Max similarity below this is novel (default 0.60, exclusive).
    pub novelty_threshold: f64,
    /// Novel texts with confidence above this are "High" novelty (default 0.7).
    pub high_novelty_confidence: f64,
}

impl Default for NoveltyThresholds {
    fn default() -> Self {
        Self {
            novelty_threshold: 0.60,
            high_novelty_confidence: 0.7,
        }
    }
}

/// How novel a submission is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoveltyLevel {
    High,
    Moderate,
    Low,
}

impl NoveltyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoveltyLevel::High => "High",
            NoveltyLevel::Moderate => "Moderate",
            NoveltyLevel::Low => "Low",
        }
    }
}

impl std::fmt::Display for NoveltyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of comparing one submission against the reference set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoveltyVerdict {
    pub is_novel: bool,
    /// Maximum cosine similarity, clamped to [0, 1].
    pub similarity: f64,
    /// 1 - similarity.
    pub confidence: f64,
    pub level: NoveltyLevel,
}

/// Cosine similarity between two vectors, clamped to [0, 1].
///
/// Mismatched lengths, empty input or a zero vector yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0_f64;
    let mut mag_a = 0.0_f64;
    let mut mag_b = 0.0_f64;
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        mag_a += x * x;
        mag_b += y * y;
    }

    let denom = mag_a.sqrt() * mag_b.sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

/// Highest similarity between `query` and any row of the reference set.
pub fn max_similarity(query: &[f32], reference: &ReferenceStore) -> Result<f64> {
    if query.len() != reference.dimension() {
        anyhow::bail!(
            "Embedding dimension {} does not match reference dimension {}",
            query.len(),
            reference.dimension()
        );
    }

    Ok(reference
        .iter_rows()
        .map(|row| cosine_similarity(query, row))
        .fold(0.0_f64, f64::max))
}

/// Classify a maximum similarity score.
pub fn classify(similarity: f64, thresholds: &NoveltyThresholds) -> NoveltyVerdict {
    let similarity = similarity.clamp(0.0, 1.0);
    let confidence = 1.0 - similarity;
    let is_novel = similarity < thresholds.novelty_threshold;

    let level = if !is_novel {
        NoveltyLevel::Low
    } else if confidence > thresholds.high_novelty_confidence {
        NoveltyLevel::High
    } else {
        NoveltyLevel::Moderate
    };

    NoveltyVerdict {
        is_novel,
        similarity,
        confidence,
        level,
    }
}

/// Score a query embedding against the reference set.
pub fn score(
    query: &[f32],
    reference: &ReferenceStore,
    thresholds: &NoveltyThresholds,
) -> Result<NoveltyVerdict> {
    let similarity = max_similarity(query, reference)?;
    Ok(classify(similarity, thresholds))
}
