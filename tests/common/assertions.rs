//! Assertion utilities for testing.
//!
//! Floating-point comparisons for bounds, offsets and Lab components.

/// Default epsilon for floating-point comparisons
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Assert that two floating-point values are approximately equal.
///
/// # Panics
///
/// Panics if the absolute difference between `actual` and `expected` is greater than `epsilon`.
pub fn assert_approx_eq(actual: f64, expected: f64, epsilon: Option<f64>) {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    let diff = (actual - expected).abs();

    assert!(
        diff <= epsilon,
        "Values not approximately equal: actual = {}, expected = {}, diff = {}, epsilon = {}",
        actual,
        expected,
        diff,
        epsilon
    );
}

/// Assert that two coordinate pairs are approximately equal.
pub fn assert_point_approx_eq(actual: [f64; 2], expected: [f64; 2], epsilon: Option<f64>) {
    for (i, (a, e)) in actual.iter().zip(expected.iter()).enumerate() {
        let eps = epsilon.unwrap_or(DEFAULT_EPSILON);
        assert!(
            (a - e).abs() <= eps,
            "Points differ at index {}: actual = {:?}, expected = {:?}, epsilon = {}",
            i,
            actual,
            expected,
            eps
        );
    }
}

/// Assert that a "#rrggbb" color is well formed.
pub fn assert_hex_color(value: &str) {
    assert!(
        value.len() == 7
            && value.starts_with('#')
            && value[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()),
        "Not a lowercase #rrggbb color: {}",
        value
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_approx_eq() {
        assert_approx_eq(1.0, 1.0, None);
        assert_approx_eq(1.0, 1.0 + 1e-12, None);
        assert_approx_eq(1.0, 1.001, Some(0.01));
    }

    #[test]
    fn test_assert_point_approx_eq() {
        assert_point_approx_eq([1.0, 2.0], [1.0, 2.0], None);
        assert_point_approx_eq([1.0, 2.0], [1.001, 1.999], Some(0.01));
    }

    #[test]
    fn test_assert_hex_color() {
        assert_hex_color("#08306b");
    }
}
