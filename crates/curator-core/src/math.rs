//! Shared math utilities.

/// L2 norm (magnitude) of a vector.
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Cosine similarity between two vectors, clamped to [-1, 1].
///
/// Returns `None` when the vectors differ in length or either has
/// (near-)zero magnitude, since the quantity is undefined there.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let norm_a = l2_norm(a);
    let norm_b = l2_norm(b);
    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return None;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    Some((dot / (norm_a * norm_b)).clamp(-1.0, 1.0))
}
