//! Exact dense-vector similarity search over catalog embeddings.
//!
//! At catalog scale (a few thousand records) an exact linear scan beats the complexity
//! of an approximate index: every search touches every vector, there's no recall
//! tradeoff to reason about, and a reindex just rebuilds the flat array. If the catalog
//! ever grows by orders of magnitude this is the first place to revisit.

mod error;

pub use error::VecIndexError;

/// A single similarity search hit: the catalog ordinal of the matched record and its
/// similarity score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub ordinal: usize,
    pub score: f32,
}

/// A flat, immutable index of unit-norm embedding vectors, one per catalog ordinal.
///
/// Vectors are expected to already be L2-normalized (the embedding provider guarantees
/// this), so similarity search is a plain dot product rather than a full cosine
/// computation.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl VectorIndex {
    /// Builds an index from `vectors`, one per catalog ordinal in order. All vectors
    /// must share the same dimension.
    pub fn build_from(vectors: Vec<Vec<f32>>) -> Result<Self, VecIndexError> {
        let dim = vectors.first().map(|v| v.len()).unwrap_or(0);
        for (ordinal, v) in vectors.iter().enumerate() {
            if v.len() != dim {
                return Err(VecIndexError::DimensionMismatch {
                    expected: dim,
                    actual: v.len(),
                });
            }
            if !v.iter().all(|x| x.is_finite()) {
                return Err(VecIndexError::NonFiniteVector { ordinal });
            }
        }
        Ok(VectorIndex { dim, vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the top-`k` most similar vectors to `query`, sorted by score descending
    /// with catalog ordinal ascending as the tiebreak (so results are deterministic for
    /// equal-scoring candidates).
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Hit>, VecIndexError> {
        if self.dim != 0 && query.len() != self.dim {
            return Err(VecIndexError::DimensionMismatch {
                expected: self.dim,
                actual: query.len(),
            });
        }
        if k == 0 || self.vectors.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<Hit> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(ordinal, v)| Hit {
                ordinal,
                score: dot(query, v),
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.ordinal.cmp(&b.ordinal))
        });
        hits.truncate(k);
        Ok(hits)
    }
}

#[inline]
fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Numerically stable softmax over a slice of similarity scores.
pub fn softmax(scores: &[f32]) -> Vec<f32> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max = scores.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum <= 0.0 {
        return vec![0.0; scores.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> VectorIndex {
        VectorIndex::build_from(vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.7071068, 0.7071068],
        ])
        .unwrap()
    }

    #[test]
    fn search_ranks_by_score_descending() {
        let idx = index();
        let hits = idx.search(&[1.0, 0.0], 3).unwrap();
        assert_eq!(hits[0].ordinal, 0);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn search_respects_k() {
        let idx = index();
        let hits = idx.search(&[1.0, 0.0], 1).unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn ties_break_by_ordinal_ascending() {
        let idx = VectorIndex::build_from(vec![vec![1.0, 0.0], vec![1.0, 0.0]]).unwrap();
        let hits = idx.search(&[1.0, 0.0], 2).unwrap();
        assert_eq!(hits[0].ordinal, 0);
        assert_eq!(hits[1].ordinal, 1);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let idx = index();
        let err = idx.search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, VecIndexError::DimensionMismatch { .. }));
    }

    #[test]
    fn build_from_rejects_non_finite_vectors() {
        let err = VectorIndex::build_from(vec![vec![1.0, 0.0], vec![f32::NAN, 0.0]]).unwrap_err();
        assert!(matches!(err, VecIndexError::NonFiniteVector { ordinal: 1 }));
    }

    #[test]
    fn empty_index_returns_no_hits() {
        let idx = VectorIndex::build_from(Vec::new()).unwrap();
        assert!(idx.search(&[1.0], 5).unwrap().is_empty());
    }

    #[test]
    fn softmax_sums_to_one() {
        let probs = softmax(&[2.0, 1.0, 0.1]);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[0] > probs[1] && probs[1] > probs[2]);
    }

    #[test]
    fn softmax_empty_input() {
        assert!(softmax(&[]).is_empty());
    }
}
