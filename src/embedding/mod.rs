// Sentence embeddings: the Embedder abstraction, the local ONNX
// implementation, and model download.

pub mod download;
pub mod onnx;
pub mod traits;

pub use onnx::SentenceEmbedder;
pub use traits::Embedder;
