use serde::{Deserialize, Serialize};

use crate::errors::{CodescopeResult, EmbeddingError};
use crate::similarity;

/// A dense embedding vector.
///
/// Fixed length per deployment. Stored as little-endian `f32` bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Embedding(Vec<f32>);

impl Embedding {
    pub fn new(values: Vec<f32>) -> Self {
        Self(values)
    }

    /// Build an embedding, rejecting wrong lengths and non-finite components.
    pub fn validated(values: Vec<f32>, dimensions: usize) -> CodescopeResult<Self> {
        Self::check(&values, dimensions)?;
        Ok(Self(values))
    }

    /// Validate a raw slice against the deployment dimension.
    pub fn check(values: &[f32], dimensions: usize) -> CodescopeResult<()> {
        if values.len() != dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: dimensions,
                actual: values.len(),
            }
            .into());
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFiniteComponent { index }.into());
        }
        Ok(())
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn norm(&self) -> f64 {
        similarity::norm(&self.0)
    }

    /// Zero or near-zero norm: similarity against it is undefined.
    pub fn is_degenerate(&self) -> bool {
        similarity::is_degenerate_vector(&self.0)
    }

    /// Little-endian byte encoding used for the `embedding` BLOB column.
    pub fn to_bytes(&self) -> Vec<u8> {
        f32s_to_bytes(&self.0)
    }

    /// Decode a BLOB written by [`Embedding::to_bytes`]. Trailing bytes that
    /// do not form a whole `f32` are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes_to_f32s(bytes))
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self(values)
    }
}

impl AsRef<[f32]> for Embedding {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Convert an `f32` slice to little-endian bytes.
pub fn f32s_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert little-endian bytes back to `f32`s.
pub fn bytes_to_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
