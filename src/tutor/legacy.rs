//! Coefficient-reading quadratic solver
//!
//! Works on the normalized text of `x**2 ± N*x ± N = 0` directly, without the
//! symbolic engine, and shows the substituted numbers at every step. Only
//! that exact shape is routed here; every other quadratic goes through the
//! general equation template.

use super::pattern;
use super::steps::{SolutionSteps, StepsBuilder};
use crate::format_number;
use crate::poly::{Discriminant, RealRoots};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static SHAPE: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"^x\*\*2\s*[+-]\s*\d+\s*\*\s*x\s*[+-]\s*\d+$"));

static LEADING: LazyLock<Regex> = LazyLock::new(|| pattern(r"^([+-]?\s*\d*)\s*\*?\s*x\*\*2"));

static LINEAR: LazyLock<Regex> = LazyLock::new(|| pattern(r"([+-])\s*(\d*)\s*\*?\s*x"));

static CONSTANT: LazyLock<Regex> = LazyLock::new(|| pattern(r"([+-])\s*(\d+)"));

/// Coefficients of `a*x**2 + b*x + c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Whether `lhs = rhs` has the exact shape handled by [`solve_quadratic_legacy`]
pub fn matches_legacy_shape(lhs: &str, rhs: &str) -> bool {
    rhs.trim() == "0" && SHAPE.is_match(lhs.trim())
}

/// Read `a`, `b` and `c` from the normalized left-hand side
///
/// - `a`: sign and digits before `x**2`; empty or `+` is 1, `-` is -1
/// - `b`: the first signed term ending in a bare `x` (not followed by `*`);
///   a sign without digits is ±1
/// - `c`: the first signed digit prefix not followed by `*x`; a run is
///   shortened one digit at a time until that holds, so the `12` of `+ 12*x`
///   yields `c = 1`
///
/// A coefficient whose term is missing is 0.
pub fn extract_coefficients(lhs: &str) -> Coefficients {
    let lhs = lhs.trim();

    let a = LEADING.captures(lhs).map_or(0.0, |caps| {
        let text: String = caps[1].chars().filter(|c| !c.is_whitespace()).collect();
        match text.as_str() {
            "" | "+" => 1.0,
            "-" => -1.0,
            digits => digits.parse().unwrap_or(0.0),
        }
    });

    let b = LINEAR
        .captures_iter(lhs)
        .find(|caps| {
            let end = caps.get(0).map_or(0, |m| m.end());
            !lhs[end..].starts_with('*')
        })
        .map_or(0.0, |caps| {
            let magnitude = if caps[2].is_empty() {
                1.0
            } else {
                caps[2].parse().unwrap_or(0.0)
            };
            signed(&caps[1], magnitude)
        });

    let c = CONSTANT
        .captures_iter(lhs)
        .find_map(|caps| {
            let (sign, run) = (caps.get(1)?, caps.get(2)?);
            let digits = run.as_str();
            (1..=digits.len())
                .rev()
                .find(|&len| !multiplies_x(&lhs[run.start() + len..]))
                .map(|len| signed(sign.as_str(), digits[..len].parse().unwrap_or(0.0)))
        })
        .unwrap_or(0.0);

    Coefficients { a, b, c }
}

fn signed(sign: &str, magnitude: f64) -> f64 {
    if sign == "-" { -magnitude } else { magnitude }
}

/// `rest` starts with optional spaces, an optional `*` and then `x`
fn multiplies_x(rest: &str) -> bool {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix('*').unwrap_or(rest).trim_start();
    rest.starts_with('x')
}

fn paren_if_negative(n: f64) -> String {
    if n < 0.0 {
        format!("({})", format_number(n))
    } else {
        format_number(n)
    }
}

/// Explain the solution of `lhs = 0` from its coefficients
pub fn solve_quadratic_legacy(lhs: &str) -> SolutionSteps {
    let Coefficients { a, b, c } = extract_coefficients(lhs);
    debug!(a, b, c, "legacy quadratic coefficients");

    let disc = Discriminant::new(a, b, c);
    let (fa, fb, fc) = (format_number(a), format_number(b), format_number(c));
    let fd = format_number(disc.value);

    let mut steps = StepsBuilder::new();
    steps.step("Identify that this is a quadratic equation in the form ax² + bx + c = 0");
    steps.step(format!("Identify the coefficients: a={}, b={}, c={}", fa, fb, fc));
    steps.step(format!(
        "Calculate the discriminant: b² - 4ac = {}² - 4({})({}) = {}",
        paren_if_negative(b),
        fa,
        fc,
        fd
    ));

    match disc.roots() {
        RealRoots::None => {
            steps.step("Since the discriminant is negative, there are no real solutions");
            steps.finish("This equation has no real solutions.")
        }
        RealRoots::One(x) => {
            steps.step("Since the discriminant is zero, there is exactly one solution");
            steps.step(format!(
                "x = -b / (2a) = -({}) / (2({})) = {}",
                fb,
                fa,
                format_number(x)
            ));
            steps.finish(format!("x = {}", format_number(x)))
        }
        RealRoots::Two(x1, x2) => {
            let (f1, f2) = (format_number(x1), format_number(x2));
            let two_a = format_number(2.0 * a);
            steps.step("Use the quadratic formula: x = (-b ± √(b² - 4ac)) / 2a");
            steps.step(format!("x = (-({}) ± √{}) / (2({}))", fb, fd, fa));
            steps.step("Solve for both roots:");
            steps.detail(format!("x₁ = (-({}) + √{}) / {} = {}", fb, fd, two_a, f1));
            steps.detail(format!("x₂ = (-({}) - √{}) / {} = {}", fb, fd, two_a, f2));
            steps.finish(format!("x = {} or x = {}", f1, f2))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        assert!(matches_legacy_shape("x**2 - 5*x + 6", "0"));
        assert!(matches_legacy_shape("x**2+5*x+6", " 0 "));
        assert!(!matches_legacy_shape("x**2 - 5*x + 6", "1"));
        assert!(!matches_legacy_shape("x**2 + x - 6", "0"));
        assert!(!matches_legacy_shape("2*x**2 + 3*x + 1", "0"));
        assert!(!matches_legacy_shape("x**2 - 4", "0"));
    }

    #[test]
    fn test_extract_coefficients() {
        assert_eq!(
            extract_coefficients("x**2 - 5*x + 6"),
            Coefficients { a: 1.0, b: -5.0, c: 6.0 }
        );
        assert_eq!(
            extract_coefficients("-x**2 + x"),
            Coefficients { a: -1.0, b: 1.0, c: 0.0 }
        );
        assert_eq!(
            extract_coefficients("x**2 - 5*x + 16"),
            Coefficients { a: 1.0, b: -5.0, c: 16.0 }
        );
    }

    #[test]
    fn test_constant_backtracks_into_linear_coefficient() {
        // A multi-digit `b` loses its last digit to the constant scan
        assert_eq!(extract_coefficients("x**2 + 12*x - 13").c, 1.0);
        assert_eq!(extract_coefficients("x**2+12*x-13").c, 1.0);
        assert_eq!(
            extract_coefficients("3*x**2 - 15*x + 10"),
            Coefficients { a: 3.0, b: -15.0, c: -1.0 }
        );
    }

    #[test]
    fn test_backtracked_constant_reaches_the_steps() {
        let steps = solve_quadratic_legacy("x**2 + 12*x - 13");
        let lines = steps.lines();
        assert_eq!(lines[1], "Step 2: Identify the coefficients: a=1, b=12, c=1");
        assert_eq!(
            lines[2],
            "Step 3: Calculate the discriminant: b² - 4ac = 12² - 4(1)(1) = 140"
        );
    }

    #[test]
    fn test_two_roots_in_formula_order() {
        let steps = solve_quadratic_legacy("x**2 - 5*x + 6");
        let lines = steps.lines();
        assert_eq!(lines[1], "Step 2: Identify the coefficients: a=1, b=-5, c=6");
        assert_eq!(
            lines[2],
            "Step 3: Calculate the discriminant: b² - 4ac = (-5)² - 4(1)(6) = 1"
        );
        assert_eq!(lines[4], "Step 5: x = (-(-5) ± √1) / (2(1))");
        assert_eq!(lines[6], "         x₁ = (-(-5) + √1) / 2 = 3");
        assert_eq!(lines[7], "         x₂ = (-(-5) - √1) / 2 = 2");
        assert_eq!(steps.answer(), "Answer: x = 3 or x = 2");
    }

    #[test]
    fn test_single_root() {
        let steps = solve_quadratic_legacy("x**2 + 4*x + 4");
        assert!(steps.iter().any(|l| l.contains("exactly one solution")));
        assert!(
            steps
                .iter()
                .any(|l| l == "Step 5: x = -b / (2a) = -(4) / (2(1)) = -2")
        );
        assert_eq!(steps.answer(), "Answer: x = -2");
    }

    #[test]
    fn test_no_real_roots() {
        let steps = solve_quadratic_legacy("x**2 + 2*x + 5");
        assert!(steps.iter().any(|l| l.contains("= -16")));
        assert!(steps.iter().any(|l| l.contains("no real solutions")));
        assert_eq!(steps.answer(), "Answer: This equation has no real solutions.");
        assert_eq!(steps.len(), 5);
    }

    #[test]
    fn test_irrational_roots() {
        let steps = solve_quadratic_legacy("x**2 + 3*x + 1");
        assert!(steps.answer().starts_with("Answer: x = -0.38196"));
        assert!(steps.answer().contains("or x = -2.61803"));
    }
}
