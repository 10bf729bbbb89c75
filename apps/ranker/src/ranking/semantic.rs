use crate::ranking::settings::round_to;

/// Cosine similarity of two vectors.
///
/// Returns 0.0 when the lengths differ, either vector is all zeros, or the
/// result is not finite.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f64 = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum();
    let magnitude_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let magnitude_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    let similarity = dot_product / (magnitude_a * magnitude_b);
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

/// Semantic score on a 0–100 scale: cosine similarity × 100, clamped, then
/// rounded to `precision` decimal places.
pub fn semantic_score(a: &[f32], b: &[f32], precision: u32) -> f64 {
    round_to((cosine_similarity(a, b) * 100.0).clamp(0.0, 100.0), precision)
}
