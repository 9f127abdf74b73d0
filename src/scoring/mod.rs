// Novelty scoring against the reference set.

pub mod novelty;

pub use novelty::{NoveltyLevel, NoveltyThresholds, NoveltyVerdict};
