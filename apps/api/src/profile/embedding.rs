//! Embedding normalization — coerce provider vectors to the index dimension.

/// Value used for every element of the substitute vector when the embedding call fails.
pub const FALLBACK_EMBEDDING_VALUE: f32 = 0.1;

/// Returns a vector of exactly `target_dimension` elements.
/// Longer input is truncated, shorter input is right-padded with `0.0`.
pub fn normalize(mut vector: Vec<f32>, target_dimension: usize) -> Vec<f32> {
    vector.resize(target_dimension, 0.0);
    vector
}

/// Deterministic substitute embedding so a profile save can proceed without one.
pub fn fallback_embedding(target_dimension: usize) -> Vec<f32> {
    vec![FALLBACK_EMBEDDING_VALUE; target_dimension]
}
