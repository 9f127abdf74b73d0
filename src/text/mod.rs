// Text normalization: turns raw submissions into the cleaned token string
// that gets embedded.

pub mod lemmatize;
pub mod normalize;

pub use normalize::{preprocess, word_count};
