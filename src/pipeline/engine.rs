// Startup initialization result.
//
// Loading the model or the reference vectors can fail (missing files,
// corrupt data, mismatched dimensions). The server still starts in that
// case, and every handler checks the Engine variant instead of probing for
// missing globals: Ready carries the loaded resources, Degraded carries what
// did load plus the reason the rest didn't.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::embedding::{Embedder, SentenceEmbedder};
use crate::reference::{metadata, ReferenceStore};
use crate::scoring::NoveltyThresholds;

/// Everything needed to analyze a submission.
pub struct Analyzer {
    pub(crate) embedder: Arc<dyn Embedder>,
    pub(crate) reference: Arc<ReferenceStore>,
    pub(crate) thresholds: NoveltyThresholds,
}

impl Analyzer {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        reference: Arc<ReferenceStore>,
        thresholds: NoveltyThresholds,
    ) -> Self {
        Self {
            embedder,
            reference,
            thresholds,
        }
    }

    pub fn model_name(&self) -> &str {
        self.embedder.model_name()
    }

    pub fn reference(&self) -> &ReferenceStore {
        &self.reference
    }

    pub fn thresholds(&self) -> &NoveltyThresholds {
        &self.thresholds
    }
}

/// What loaded, and why the engine is not usable.
#[derive(Debug, Clone)]
pub struct Degraded {
    /// Model name, when the model itself loaded
    pub model_name: Option<String>,
    /// (rows, dimension) of the reference set, when it loaded
    pub reference_shape: Option<(usize, usize)>,
    pub reason: String,
}

pub enum Engine {
    Ready(Analyzer),
    Degraded(Degraded),
}

/// Read-only snapshot reported by /system_info and /health.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemStatus {
    pub model_loaded: bool,
    pub reference_loaded: bool,
    pub model_name: Option<String>,
    pub embedding_dimension: usize,
    pub reference_size: usize,
}

impl Engine {
    /// Load the model and reference vectors named by `config`.
    ///
    /// Never fails: load errors are logged and produce `Engine::Degraded`.
    pub fn initialize(config: &Config) -> Self {
        info!(model_dir = %config.model_dir.display(), "Loading sentence embedding model");
        let embedder = SentenceEmbedder::load(&config.model_dir)
            .map(|e| Arc::new(e) as Arc<dyn Embedder>);

        info!(path = %config.reference_path.display(), "Loading reference vectors");
        let reference = ReferenceStore::load(
            &config.reference_path,
            config.reference_sample_size,
            config.sample_seed,
        );

        if let (Some(path), Ok(store)) = (&config.metadata_path, &reference) {
            match metadata::check(path, store.source_rows()) {
                Ok(check) if check.is_consistent() => {
                    info!(path = %path.display(), records = check.records, "Reference metadata matches")
                }
                Ok(check) => warn!(
                    path = %path.display(),
                    records = check.records,
                    reference_rows = check.reference_rows,
                    "Reference metadata record count differs from reference vectors"
                ),
                Err(e) => warn!(error = %e, "Reference metadata unavailable"),
            }
        }

        let engine = Self::from_parts(embedder, reference, config.thresholds);
        match &engine {
            Engine::Ready(a) => info!(
                model = a.model_name(),
                reference_rows = a.reference.len(),
                dim = a.reference.dimension(),
                "Engine ready"
            ),
            Engine::Degraded(d) => error!(reason = %d.reason, "Engine degraded, /analyze disabled"),
        }
        engine
    }

    /// Combine independently loaded parts into an engine.
    pub fn from_parts(
        embedder: Result<Arc<dyn Embedder>>,
        reference: Result<ReferenceStore>,
        thresholds: NoveltyThresholds,
    ) -> Self {
        match (embedder, reference) {
            (Ok(embedder), Ok(reference)) => {
                if embedder.dimension() != reference.dimension() {
                    return Engine::Degraded(Degraded {
                        model_name: Some(embedder.model_name().to_string()),
                        reference_shape: Some((reference.len(), reference.dimension())),
                        reason: format!(
                            "Model produces {}-dim embeddings but reference vectors are {}-dim",
                            embedder.dimension(),
                            reference.dimension()
                        ),
                    });
                }
                Engine::Ready(Analyzer::new(embedder, Arc::new(reference), thresholds))
            }
            (embedder, reference) => {
                let mut reasons = Vec::new();
                let model_name = match embedder {
                    Ok(e) => Some(e.model_name().to_string()),
                    Err(e) => {
                        reasons.push(format!("model: {e:#}"));
                        None
                    }
                };
                let reference_shape = match reference {
                    Ok(r) => Some((r.len(), r.dimension())),
                    Err(e) => {
                        reasons.push(format!("reference vectors: {e:#}"));
                        None
                    }
                };
                Engine::Degraded(Degraded {
                    model_name,
                    reference_shape,
                    reason: reasons.join("; "),
                })
            }
        }
    }

    pub fn analyzer(&self) -> Option<&Analyzer> {
        match self {
            Engine::Ready(a) => Some(a),
            Engine::Degraded(_) => None,
        }
    }

    pub fn status(&self) -> SystemStatus {
        match self {
            Engine::Ready(a) => SystemStatus {
                model_loaded: true,
                reference_loaded: true,
                model_name: Some(a.model_name().to_string()),
                embedding_dimension: a.reference.dimension(),
                reference_size: a.reference.len(),
            },
            Engine::Degraded(d) => SystemStatus {
                model_loaded: d.model_name.is_some(),
                reference_loaded: d.reference_shape.is_some(),
                model_name: d.model_name.clone(),
                embedding_dimension: d.reference_shape.map(|(_, dim)| dim).unwrap_or(0),
                reference_size: d.reference_shape.map(|(rows, _)| rows).unwrap_or(0),
            },
        }
    }
}
