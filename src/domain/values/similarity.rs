//! Pairwise cosine similarity over an embedded corpus.
//!
//! Builds the all-pairs similarity matrix and extracts candidate duplicate
//! pairs above a fixed threshold. Both functions are pure and deterministic:
//! the same embeddings always produce the same matrix and the same candidate
//! ordering (descending score, then ascending index pair), so a dedup run is
//! reproducible end to end.

use serde::Serialize;

/// Minimum cosine similarity for two markets to be considered duplicate
/// candidates. Strictly greater-than: a pair sitting exactly on the
/// threshold does not qualify.
pub const DUPLICATE_THRESHOLD: f64 = 0.8;

/// An unordered pair of record indices with its similarity score.
/// Invariant: `a < b`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidatePair {
    pub a: usize,
    pub b: usize,
    pub score: f64,
}

/// Cosine similarity between two vectors. Returns 0.0 for mismatched
/// lengths, empty vectors, or zero-norm vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// All-pairs cosine similarity. The result is symmetric with the diagonal
/// pinned to 1.0; only the upper triangle is computed and mirrored.
/// O(n²·d): fine for a few thousand markets, not built for more.
pub fn similarity_matrix(embeddings: &[Vec<f32>]) -> Vec<Vec<f64>> {
    let n = embeddings.len();
    let mut matrix = vec![vec![0.0_f64; n]; n];
    for i in 0..n {
        matrix[i][i] = 1.0;
        for j in (i + 1)..n {
            let sim = cosine_similarity(&embeddings[i], &embeddings[j]);
            matrix[i][j] = sim;
            matrix[j][i] = sim;
        }
    }
    matrix
}

/// Extract index pairs `(a, b)` with `a < b` whose similarity strictly
/// exceeds `threshold`, sorted by descending score with ties broken by
/// ascending `(a, b)`. The downstream resolver walks this list greedily, so
/// the ordering is the tie-break policy: the highest-scoring pair claims its
/// records first.
pub fn select_candidates(matrix: &[Vec<f64>], threshold: f64) -> Vec<CandidatePair> {
    let mut candidates = Vec::new();
    for (a, row) in matrix.iter().enumerate() {
        for (b, &score) in row.iter().enumerate().skip(a + 1) {
            if score > threshold {
                candidates.push(CandidatePair { a, b, score });
            }
        }
    }
    candidates.sort_by(|x, y| {
        y.score
            .partial_cmp(&x.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(x.a.cmp(&y.a))
            .then(x.b.cmp(&y.b))
    });
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5_f32, 0.5, 0.7];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0_f32, 0.0];
        let b = vec![0.0_f32, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        let a = vec![1.0_f32, 0.0];
        let b = vec![-1.0_f32, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_cosine_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_matrix_diagonal_and_symmetry() {
        let embeddings = vec![
            vec![1.0_f32, 0.0, 0.0],
            vec![0.6_f32, 0.8, 0.0],
            vec![0.0_f32, 0.0, 1.0],
        ];
        let m = similarity_matrix(&embeddings);
        for i in 0..3 {
            assert_eq!(m[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(m[i][j], m[j][i]);
            }
        }
        assert!((m[0][1] - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_matrix_is_deterministic() {
        let embeddings = vec![vec![0.3_f32, 0.9, 0.1], vec![0.2_f32, 0.7, 0.4]];
        let first = similarity_matrix(&embeddings);
        let second = similarity_matrix(&embeddings);
        assert_eq!(first, second);
    }

    #[test]
    fn test_threshold_is_strict() {
        // m[0][1] exactly at the threshold, m[0][2] a hair above.
        let mut m = vec![vec![1.0_f64; 3]; 3];
        m[0][1] = 0.8;
        m[1][0] = 0.8;
        m[0][2] = 0.8000001;
        m[2][0] = 0.8000001;
        m[1][2] = 0.5;
        m[2][1] = 0.5;

        let candidates = select_candidates(&m, DUPLICATE_THRESHOLD);
        assert_eq!(candidates.len(), 1);
        assert_eq!((candidates[0].a, candidates[0].b), (0, 2));
    }

    #[test]
    fn test_candidates_ordered_by_score_then_index() {
        let mut m = vec![vec![1.0_f64; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                if i != j {
                    m[i][j] = 0.0;
                }
            }
        }
        m[0][1] = 0.85;
        m[1][0] = 0.85;
        m[2][3] = 0.95;
        m[3][2] = 0.95;
        m[0][3] = 0.85;
        m[3][0] = 0.85;

        let candidates = select_candidates(&m, DUPLICATE_THRESHOLD);
        let pairs: Vec<(usize, usize)> = candidates.iter().map(|c| (c.a, c.b)).collect();
        // Highest score first, then equal scores by ascending index pair.
        assert_eq!(pairs, vec![(2, 3), (0, 1), (0, 3)]);
    }

    #[test]
    fn test_no_candidates_below_threshold() {
        let embeddings = vec![vec![1.0_f32, 0.0], vec![0.0_f32, 1.0]];
        let m = similarity_matrix(&embeddings);
        assert!(select_candidates(&m, DUPLICATE_THRESHOLD).is_empty());
    }
}
