// Analysis pipeline: startup initialization and the per-request
// validate -> preprocess -> embed -> score flow, independent of HTTP so the
// CLI and the web layer share one implementation.

pub mod analyze;
pub mod engine;

pub use analyze::{validate, Analysis, AnalyzeError, ValidatedText, MAX_WORDS, MIN_WORDS};
pub use engine::{Analyzer, Degraded, Engine, SystemStatus};
