//! Deterministic pseudo-vectors for running without a remote provider.
//!
//! The same text always hashes to the same seed, so vectors are reproducible
//! across runs and machines. Useful for seeding development data where real
//! embeddings are not worth a network dependency.

use {
    rand::{Rng, SeedableRng},
    rand_chacha::ChaCha8Rng,
    rand_distr::StandardNormal,
    sha2::{Digest, Sha256},
};

/// Default pseudo-vector dimension, matching the remote providers' output.
pub const DEFAULT_DIMS: usize = 384;

/// Generate a deterministic, L2-normalized pseudo-vector from text content.
///
/// The seed is the low 32 bits of the SHA-256 digest of the text. Components
/// are Gaussian draws (mean 0, std dev 0.1) scaled to unit norm, so distinct
/// texts land in scattered directions on the unit sphere.
#[must_use]
pub fn pseudo_vector(text: &str, dims: usize) -> Vec<f32> {
    let digest = Sha256::digest(text.as_bytes());
    let seed = u32::from_be_bytes([digest[28], digest[29], digest[30], digest[31]]);
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));

    let mut vector: Vec<f32> = (0..dims)
        .map(|_| {
            let z: f32 = rng.sample(StandardNormal);
            z * 0.1
        })
        .collect();

    let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > 0.0 {
        for v in &mut vector {
            *v /= norm;
        }
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pseudo_vector_is_deterministic() {
        let a = pseudo_vector("incident response runbook", DEFAULT_DIMS);
        let b = pseudo_vector("incident response runbook", DEFAULT_DIMS);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_texts_differ() {
        let a = pseudo_vector("alpha", DEFAULT_DIMS);
        let b = pseudo_vector("beta", DEFAULT_DIMS);
        assert_ne!(a, b);
    }

    #[test]
    fn test_unit_norm() {
        for text in ["", "x", "a longer piece of text with several words"] {
            let vec = pseudo_vector(text, DEFAULT_DIMS);
            let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
            assert!(
                (norm - 1.0).abs() < 1e-5,
                "norm for {text:?} was {norm}, expected 1.0"
            );
        }
    }

    #[test]
    fn test_requested_dimension_is_honored() {
        assert_eq!(pseudo_vector("text", 384).len(), 384);
        assert_eq!(pseudo_vector("text", 8).len(), 8);
    }

    #[test]
    fn test_empty_text_is_well_defined() {
        let vec = pseudo_vector("", DEFAULT_DIMS);
        assert_eq!(vec.len(), DEFAULT_DIMS);
        let norm: f32 = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
