//! Integer division helpers with explicit rounding direction
//!
//! Fixed-point simulation code divides scaled accumulators back down to
//! whole units. Which way the quotient rounds matters: flooring biases
//! negative values further from zero, so a body moving left would gain speed
//! from rounding alone.

/// Divide `x` by `y`, rounding the quotient toward zero.
///
/// ```
/// use pickles_engine::utils::divide_toward_zero;
///
/// assert_eq!(divide_toward_zero(2, 2), 1);
/// assert_eq!(divide_toward_zero(1, 2), 0);
/// assert_eq!(divide_toward_zero(-1, 2), 0);
/// assert_eq!(divide_toward_zero(-2, 2), -1);
/// ```
pub fn divide_toward_zero(x: i64, y: i64) -> i64 {
    // Rust's integer division already truncates
    x / y
}

/// Divide `x` by `y`, rounding the quotient toward negative infinity.
pub fn divide_floor(x: i64, y: i64) -> i64 {
    let quotient = x / y;
    if x % y != 0 && ((x < 0) != (y < 0)) {
        quotient - 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_divide_toward_zero() {
        assert_eq!(divide_toward_zero(2, 2), 1);
        assert_eq!(divide_toward_zero(1, 2), 0);
        assert_eq!(divide_toward_zero(0, 2), 0);
        assert_eq!(divide_toward_zero(-1, 2), 0);
        assert_eq!(divide_toward_zero(-2, 2), -1);
        assert_eq!(divide_toward_zero(-2500, 1000), -2);
        assert_eq!(divide_toward_zero(2500, -1000), -2);
    }

    #[test]
    fn test_divide_floor() {
        assert_eq!(divide_floor(5, 2), 2);
        assert_eq!(divide_floor(-5, 2), -3);
        assert_eq!(divide_floor(5, -2), -3);
        assert_eq!(divide_floor(-5, -2), 2);
        assert_eq!(divide_floor(-4, 2), -2);
        assert_eq!(divide_floor(0, 3), 0);
    }
}
