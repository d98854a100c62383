//! Floating-point helpers shared by the engine and the explanation layer

/// Default tolerance for floating-point comparisons
pub(crate) const FLOAT_TOLERANCE: f64 = 1e-10;

/// Largest denominator tried when recovering an exact fraction from an `f64`
const MAX_DENOMINATOR: i64 = 10_000;

#[inline]
pub(crate) fn is_zero(n: f64) -> bool {
    n.abs() < FLOAT_TOLERANCE
}

#[inline]
pub(crate) fn is_one(n: f64) -> bool {
    (n - 1.0).abs() < FLOAT_TOLERANCE
}

#[inline]
pub(crate) fn is_neg_one(n: f64) -> bool {
    (n + 1.0).abs() < FLOAT_TOLERANCE
}

/// True when `n` is (within tolerance) a whole number
#[inline]
pub(crate) fn is_integer(n: f64) -> bool {
    n.is_finite() && (n - n.round()).abs() < FLOAT_TOLERANCE * n.abs().max(1.0)
}

/// Snap values that are within tolerance of an integer onto it
pub(crate) fn snap(n: f64) -> f64 {
    if is_integer(n) {
        let r = n.round();
        if r == 0.0 { 0.0 } else { r }
    } else {
        n
    }
}

/// Recover `p/q` (q > 0, reduced) from a float, if one with a small denominator exists
pub(crate) fn as_fraction(n: f64) -> Option<(i64, i64)> {
    if !n.is_finite() || n.abs() > 1e15 {
        return None;
    }
    for q in 1..=MAX_DENOMINATOR {
        let p = n * q as f64;
        if (p - p.round()).abs() < 1e-11 * q as f64 {
            let p = p.round() as i64;
            let g = gcd(p.abs(), q);
            return Some((p / g, q / g));
        }
    }
    None
}

pub(crate) fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    if a == 0 { 1 } else { a.abs() }
}

/// Format a number the way explanations print it: `3` rather than `3.0`
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "undefined".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "∞".to_string() } else { "-∞".to_string() }
    } else if is_integer(n) && n.abs() < 1e15 {
        format!("{}", snap(n) as i64)
    } else {
        format!("{}", n)
    }
}

/// Split an integer into `k² · m` with `m` square-free
pub(crate) fn split_square(n: u64) -> (u64, u64) {
    let mut outside = 1;
    let mut inside = n;
    let mut f = 2;
    while f * f <= inside {
        while inside % (f * f) == 0 {
            inside /= f * f;
            outside *= f;
        }
        f += 1;
    }
    (outside, inside)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(-5.0), "-5");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "∞");
    }

    #[test]
    fn test_as_fraction() {
        assert_eq!(as_fraction(0.5), Some((1, 2)));
        assert_eq!(as_fraction(-1.5), Some((-3, 2)));
        assert_eq!(as_fraction(1.0 / 3.0), Some((1, 3)));
        assert_eq!(as_fraction(4.0), Some((4, 1)));
        assert_eq!(as_fraction(std::f64::consts::PI), None);
    }

    #[test]
    fn test_split_square() {
        assert_eq!(split_square(8), (2, 2));
        assert_eq!(split_square(12), (2, 3));
        assert_eq!(split_square(5), (1, 5));
        assert_eq!(split_square(36), (6, 1));
    }
}
