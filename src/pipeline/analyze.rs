// Per-submission analysis: validate -> preprocess -> embed -> score.
//
// Validation runs in a fixed order and stops at the first failure, so a
// client always gets the most basic problem first (empty before too short,
// too short before nothing-left-after-cleaning).

use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use thiserror::Error;
use tracing::{debug, error};

use super::engine::Analyzer;
use crate::history::AnalysisRecord;
use crate::scoring::novelty;
use crate::scoring::NoveltyVerdict;
use crate::text::{preprocess, word_count};

/// Fewest raw words accepted.
pub const MIN_WORDS: usize = 4;
/// Most raw words accepted.
pub const MAX_WORDS: usize = 1000;
/// Fewest tokens that must survive preprocessing.
pub const MIN_CLEAN_WORDS: usize = 2;

/// Why an analysis request was refused or failed.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("System not initialized. Please try again later.")]
    NotInitialized,

    #[error("Missing data in request.")]
    MissingData,

    #[error("Please enter a text to analyze.")]
    EmptyText,

    #[error("Text is too short ({words} words). Minimum {min} words required.", min = MIN_WORDS)]
    TooShort { words: usize },

    #[error("Text is too long ({words} words). Maximum {max} words allowed.", max = MAX_WORDS)]
    TooLong { words: usize },

    #[error("Text is too short after preprocessing. Please provide a more substantial text.")]
    TooShortAfterPreprocessing,

    #[error("Analysis failed: {0}")]
    Failed(anyhow::Error),
}

impl AnalyzeError {
    /// True for problems with the submission itself, false for server-side failures.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AnalyzeError::NotInitialized | AnalyzeError::Failed(_))
    }
}

/// A submission that passed every validation rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedText {
    /// Trimmed original text
    pub text: String,
    pub cleaned: String,
    pub word_count: usize,
    pub clean_word_count: usize,
}

/// A completed analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub verdict: NoveltyVerdict,
    pub original_words: usize,
    pub processed_words: usize,
    pub embedding_dim: usize,
    pub comparison_base_size: usize,
    pub record: AnalysisRecord,
}

/// Apply the length and content rules to a raw submission.
pub fn validate(raw: &str) -> Result<ValidatedText, AnalyzeError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(AnalyzeError::EmptyText);
    }

    let words = word_count(text);
    if words < MIN_WORDS {
        return Err(AnalyzeError::TooShort { words });
    }
    if words > MAX_WORDS {
        return Err(AnalyzeError::TooLong { words });
    }

    let cleaned = preprocess(text);
    let clean_words = word_count(&cleaned);
    if clean_words < MIN_CLEAN_WORDS {
        return Err(AnalyzeError::TooShortAfterPreprocessing);
    }

    Ok(ValidatedText {
        text: text.to_string(),
        cleaned,
        word_count: words,
        clean_word_count: clean_words,
    })
}

impl Analyzer {
    /// Validate, embed and score a submission. Does not touch history.
    pub async fn analyze(&self, raw: &str) -> Result<Analysis, AnalyzeError> {
        let input = validate(raw)?;
        debug!(
            words = input.word_count,
            clean_words = input.clean_word_count,
            "Submission passed validation"
        );

        let analysis = self.embed_and_score(input).await.map_err(|e| {
            error!(error = %e, "Analysis failed");
            AnalyzeError::Failed(e)
        })?;
        Ok(analysis)
    }

    async fn embed_and_score(&self, input: ValidatedText) -> anyhow::Result<Analysis> {
        let query = self
            .embedder
            .embed_one(&input.cleaned)
            .await
            .context("Embedding failed")?;
        let embedding_dim = query.len();

        let reference = Arc::clone(&self.reference);
        let thresholds = self.thresholds;
        let verdict =
            tokio::task::spawn_blocking(move || novelty::score(&query, &reference, &thresholds))
                .await
                .context("spawn_blocking panicked")??;

        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let record = AnalysisRecord::new(
            &input.text,
            &verdict,
            input.word_count,
            input.clean_word_count,
            timestamp,
        );

        Ok(Analysis {
            verdict,
            original_words: input.word_count,
            processed_words: input.clean_word_count,
            embedding_dim,
            comparison_base_size: self.reference.len(),
            record,
        })
    }
}
