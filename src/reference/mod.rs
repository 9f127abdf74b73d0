// Reference store: the fixed sample of precomputed embeddings that
// submissions are compared against.
//
// Loaded once at startup and never mutated, so it is shared across requests
// behind an Arc with no locking. When the file holds more rows than the
// configured cap, a uniform random sample without replacement is kept.

pub mod metadata;
pub mod npy;

use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use tracing::info;

/// Default cap on the number of reference rows kept in memory.
pub const DEFAULT_SAMPLE_SIZE: usize = 30_000;

/// Immutable row-major matrix of reference embeddings.
#[derive(Debug, Clone)]
pub struct ReferenceStore {
    rows: usize,
    dim: usize,
    data: Vec<f32>,
    /// Row count of the source before sampling
    source_rows: usize,
}

impl ReferenceStore {
    /// Build a store from explicit rows. All rows must share one non-zero length.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self> {
        let dim = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || dim == 0 {
            anyhow::bail!("Reference set is empty");
        }
        if let Some(i) = rows.iter().position(|r| r.len() != dim) {
            anyhow::bail!(
                "Reference row {i} has dimension {}, expected {dim}",
                rows[i].len()
            );
        }

        let n = rows.len();
        let data = rows.into_iter().flatten().collect();
        Ok(Self {
            rows: n,
            dim,
            data,
            source_rows: n,
        })
    }

    fn from_matrix(rows: usize, dim: usize, data: Vec<f32>) -> Result<Self> {
        if rows == 0 || dim == 0 {
            anyhow::bail!("Reference set is empty (shape {rows}x{dim})");
        }
        if data.len() != rows * dim {
            anyhow::bail!(
                "Reference data has {} values, expected {rows}x{dim}",
                data.len()
            );
        }
        Ok(Self {
            rows,
            dim,
            data,
            source_rows: rows,
        })
    }

    /// Load reference vectors from disk and cap them at `sample_size` rows.
    ///
    /// `.npy` files are read as NumPy arrays; anything else is parsed as a
    /// JSON array of arrays. `seed` makes the sample reproducible.
    pub fn load(path: &Path, sample_size: usize, seed: Option<u64>) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read reference vectors from {}", path.display()))?;

        let full = if path.extension().is_some_and(|e| e == "npy") {
            let m = npy::parse(&bytes)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Self::from_matrix(m.rows, m.cols, m.data)?
        } else {
            let rows: Vec<Vec<f32>> = serde_json::from_slice(&bytes)
                .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;
            Self::from_rows(rows)?
        };

        let store = full.sample(sample_size, seed);

        info!(
            path = %path.display(),
            total_rows = store.source_rows,
            kept_rows = store.rows,
            dim = store.dim,
            "Loaded reference vectors"
        );

        Ok(store)
    }

    /// Keep at most `n` rows, chosen uniformly without replacement.
    pub fn sample(self, n: usize, seed: Option<u64>) -> Self {
        if self.rows <= n {
            return self;
        }

        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let picked = index::sample(&mut rng, self.rows, n);

        let mut data = Vec::with_capacity(n * self.dim);
        for i in picked.iter() {
            data.extend_from_slice(self.row(i));
        }

        Self {
            rows: n,
            dim: self.dim,
            data,
            source_rows: self.source_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    /// Rows in the source file, before the sample cap was applied.
    pub fn source_rows(&self) -> usize {
        self.source_rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.dim..(i + 1) * self.dim]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        self.data.chunks_exact(self.dim)
    }
}
