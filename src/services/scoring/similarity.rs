/// Cosine of the angle between two vectors
///
/// Returns `0.0` when either vector has zero norm or the computation leaves
/// the finite range. Extra trailing elements of the longer vector are ignored.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    if cosine.is_finite() {
        cosine.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_identical_direction_is_one() {
        assert!((cosine_similarity(&[1.0, 2.0], &[2.0, 4.0]) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_opposite_direction_is_minus_one() {
        assert!((cosine_similarity(&[1.0, -1.0], &[-3.0, 3.0]) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_orthogonal_is_zero() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 5.0]).abs() < EPS);
    }

    #[test]
    fn test_zero_vector_is_zero_not_nan() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_overflowing_inputs_are_zero_not_nan() {
        assert_eq!(cosine_similarity(&[f64::INFINITY, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1e200, 1e200], &[1e200, 0.0]), 0.0);
    }

    #[test]
    fn test_result_stays_within_unit_range() {
        let value = cosine_similarity(&[0.1, 0.2, 0.3], &[0.1, 0.2, 0.3]);
        assert!((-1.0..=1.0).contains(&value));
    }
}
