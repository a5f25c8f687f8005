//! Shared numeric bounds for recipe fields.

/// Lower bound for ingredient amounts and cooking time, in their own units.
pub const POSITIVE_MIN: i32 = 1;

/// Upper bound for ingredient amounts and cooking time.
pub const POSITIVE_MAX: i32 = 32000;

/// Whether `value` lies in the accepted `1..=32000` range.
pub fn in_positive_range(value: i32) -> bool {
    (POSITIVE_MIN..=POSITIVE_MAX).contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_boundary_values() {
        assert!(in_positive_range(1));
        assert!(in_positive_range(32000));
    }

    #[test]
    fn should_reject_out_of_range_values() {
        assert!(!in_positive_range(0));
        assert!(!in_positive_range(32001));
        assert!(!in_positive_range(-5));
    }
}
