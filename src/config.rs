use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::reference::DEFAULT_SAMPLE_SIZE;
use crate::scoring::NoveltyThresholds;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Host and
/// port are not here: they are arguments of the `serve` command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing model.onnx and tokenizer.json
    pub model_dir: PathBuf,
    /// Precomputed reference embeddings (.npy or JSON)
    pub reference_path: PathBuf,
    /// Optional CSV of the texts behind the reference embeddings
    pub metadata_path: Option<PathBuf>,
    /// JSON file holding the analysis history
    pub history_path: PathBuf,
    /// Maximum number of reference rows kept in memory
    pub reference_sample_size: usize,
    /// Seed for the reference sample (random when unset)
    pub sample_seed: Option<u64>,
    pub thresholds: NoveltyThresholds,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every value has a default; only malformed numbers are errors.
    pub fn load() -> Result<Self> {
        let defaults = NoveltyThresholds::default();

        let model_dir = env::var("NEUROSCAN_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::embedding::download::default_model_dir());

        Ok(Self {
            model_dir,
            reference_path: env::var("NEUROSCAN_REFERENCE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data/embeddings.npy")),
            metadata_path: env::var("NEUROSCAN_METADATA_PATH")
                .ok()
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            history_path: env::var("NEUROSCAN_HISTORY_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./analysis_history.json")),
            reference_sample_size: parse_var("NEUROSCAN_REFERENCE_SAMPLE")?
                .unwrap_or(DEFAULT_SAMPLE_SIZE),
            sample_seed: parse_var("NEUROSCAN_SAMPLE_SEED")?,
            thresholds: NoveltyThresholds {
                novelty_threshold: parse_var("NEUROSCAN_NOVELTY_THRESHOLD")?
                    .unwrap_or(defaults.novelty_threshold),
                high_novelty_confidence: parse_var("NEUROSCAN_HIGH_NOVELTY_CONFIDENCE")?
                    .unwrap_or(defaults.high_novelty_confidence),
            },
        })
    }

    /// Check that the configured values make sense together.
    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        if !(0.0..=1.0).contains(&t.novelty_threshold) {
            anyhow::bail!(
                "NEUROSCAN_NOVELTY_THRESHOLD must be between 0 and 1, got {}",
                t.novelty_threshold
            );
        }
        if !(0.0..=1.0).contains(&t.high_novelty_confidence) {
            anyhow::bail!(
                "NEUROSCAN_HIGH_NOVELTY_CONFIDENCE must be between 0 and 1, got {}",
                t.high_novelty_confidence
            );
        }
        if self.reference_sample_size == 0 {
            anyhow::bail!("NEUROSCAN_REFERENCE_SAMPLE must be at least 1");
        }
        Ok(())
    }
}

/// Parse an optional environment variable. Unset or empty is `None`.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            model_dir: PathBuf::from("/models"),
            reference_path: PathBuf::from("/data/embeddings.npy"),
            metadata_path: None,
            history_path: PathBuf::from("/tmp/history.json"),
            reference_sample_size: DEFAULT_SAMPLE_SIZE,
            sample_seed: None,
            thresholds: NoveltyThresholds::default(),
        }
    }

    #[test]
    fn test_defaults_validate() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        let mut c = config();
        c.thresholds.novelty_threshold = 1.5;
        let err = c.validate().unwrap_err();
        assert!(err.to_string().contains("NEUROSCAN_NOVELTY_THRESHOLD"));
    }

    #[test]
    fn test_zero_sample_size_rejected() {
        let mut c = config();
        c.reference_sample_size = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_parse_var_unset_is_none() {
        let v: Option<f64> = parse_var("NEUROSCAN_TEST_SURELY_UNSET_VARIABLE").unwrap();
        assert!(v.is_none());
    }
}
