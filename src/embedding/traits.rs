// Embedder trait: the swap-ready abstraction over the sentence model.
//
// The default implementation runs all-MiniLM-L6-v2 locally via ONNX. The
// analysis pipeline only sees this trait, so tests and alternative backends
// can plug in without touching request handling.

use anyhow::Result;
use async_trait::async_trait;

/// Converts cleaned text into fixed-dimensional vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per text in order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Length of every vector returned by `embed`.
    fn dimension(&self) -> usize;

    /// Human-readable model identifier, reported by /system_info.
    fn model_name(&self) -> &str;

    /// Embed a single text.
    async fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let mut vectors = self.embed(&[text.to_string()]).await?;
        match vectors.pop() {
            Some(v) if vectors.is_empty() => Ok(v),
            _ => anyhow::bail!("Embedder returned an unexpected number of vectors"),
        }
    }
}
