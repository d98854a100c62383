//! Dense univariate polynomials with real coefficients
//!
//! Used by the solver, the factoring routine and the explanation layer to
//! reason about polynomial structure (degree, discriminant, rational roots).

use crate::algebra::expand_expr;
use crate::numeric::{FLOAT_TOLERANCE, as_fraction, gcd, is_integer, is_zero, snap};
use crate::simplification::simplify_expr;
use crate::simplification::terms::{exp_value, terms_of};
use crate::Expr;

/// Degrees above this are not treated as polynomials
const MAX_DEGREE: usize = 64;

/// Coefficient magnitude above which divisor enumeration is skipped
const MAX_ROOT_SEARCH: i64 = 1_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    var: String,
    /// `coeffs[i]` multiplies `var**i`; no trailing zeros except for the zero polynomial
    coeffs: Vec<f64>,
}

impl Polynomial {
    pub fn new(var: impl Into<String>, coeffs: Vec<f64>) -> Self {
        let mut poly = Polynomial {
            var: var.into(),
            coeffs,
        };
        poly.trim();
        poly
    }

    fn trim(&mut self) {
        while self.coeffs.len() > 1 && self.coeffs.last().is_some_and(|c| is_zero(*c)) {
            self.coeffs.pop();
        }
        if self.coeffs.is_empty() {
            self.coeffs.push(0.0);
        }
    }

    /// Read an expression as a polynomial in `var` with numeric coefficients
    ///
    /// The expression is expanded first, so `(x + 1)*(x - 2)` is accepted.
    /// Returns `None` when any term involves another symbol, a function of
    /// `var`, a negative/fractional power of `var`, or a coefficient that is
    /// not finite.
    pub fn from_expr(expr: &Expr, var: &str) -> Option<Self> {
        let expanded = expand_expr(expr).ok()?;
        let mut coeffs = vec![0.0; 1];
        for term in terms_of(&expanded) {
            let mut degree = 0usize;
            for factor in &term.factors {
                if factor.base.as_symbol() != Some(var) {
                    return None;
                }
                let n = exp_value(&factor.exp)?;
                if n < 0.0 || !is_integer(n) {
                    return None;
                }
                degree += n.round() as usize;
            }
            if degree > MAX_DEGREE {
                return None;
            }
            if !term.coeff.is_finite() {
                return None;
            }
            if coeffs.len() <= degree {
                coeffs.resize(degree + 1, 0.0);
            }
            coeffs[degree] += term.coeff;
        }
        Some(Polynomial::new(var, coeffs))
    }

    pub fn var(&self) -> &str {
        &self.var
    }

    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    pub fn coeff(&self, power: usize) -> f64 {
        self.coeffs.get(power).copied().unwrap_or(0.0)
    }

    pub fn leading(&self) -> f64 {
        self.coeffs[self.degree()]
    }

    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && is_zero(self.coeffs[0])
    }

    /// Horner evaluation
    pub fn eval(&self, x: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
    }

    pub fn derivative(&self) -> Polynomial {
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, c)| c * i as f64)
            .collect();
        Polynomial::new(self.var.clone(), coeffs)
    }

    /// Antiderivative with zero constant term
    pub fn integral(&self) -> Polynomial {
        let mut coeffs = vec![0.0];
        coeffs.extend(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(i, c)| c / (i as f64 + 1.0)),
        );
        Polynomial::new(self.var.clone(), coeffs)
    }

    /// Divide by `q*var - p`, returning quotient and remainder
    pub fn divide_linear(&self, p: f64, q: f64) -> (Polynomial, f64) {
        let n = self.degree();
        if n == 0 {
            return (Polynomial::new(self.var.clone(), vec![0.0]), self.coeffs[0]);
        }
        let mut quotient = vec![0.0; n];
        let mut next = 0.0;
        for i in (1..=n).rev() {
            let value = (self.coeffs[i] + p * next) / q;
            quotient[i - 1] = value;
            next = value;
        }
        let remainder = self.coeffs[0] + p * next;
        (Polynomial::new(self.var.clone(), quotient), remainder)
    }

    /// Remove the factor `var - root`
    pub fn deflate(&self, root: f64) -> Polynomial {
        self.divide_linear(root, 1.0).0
    }

    /// Polynomial long division
    pub fn div_rem(&self, divisor: &Polynomial) -> Option<(Polynomial, Polynomial)> {
        if divisor.is_zero() {
            return None;
        }
        let mut remainder = self.coeffs.clone();
        let d = divisor.degree();
        if self.degree() < d {
            return Some((
                Polynomial::new(self.var.clone(), vec![0.0]),
                self.clone(),
            ));
        }
        let mut quotient = vec![0.0; self.degree() - d + 1];
        for i in (0..quotient.len()).rev() {
            let factor = remainder[i + d] / divisor.leading();
            quotient[i] = factor;
            for (j, c) in divisor.coeffs.iter().enumerate() {
                remainder[i + j] -= factor * c;
            }
        }
        remainder.truncate(d.max(1));
        Some((
            Polynomial::new(self.var.clone(), quotient),
            Polynomial::new(self.var.clone(), remainder),
        ))
    }

    /// Coefficients scaled to coprime integers, with the scale used
    ///
    /// `self = integer_poly / scale`. Returns `None` when a coefficient has no
    /// small exact fraction.
    pub(crate) fn integer_coeffs(&self) -> Option<(Vec<i64>, i64)> {
        let fractions = self
            .coeffs
            .iter()
            .map(|c| as_fraction(*c))
            .collect::<Option<Vec<_>>>()?;
        let mut scale: i64 = 1;
        for (_, q) in &fractions {
            scale = scale.checked_mul(q / gcd(scale, *q))?;
        }
        let ints = fractions
            .iter()
            .map(|(p, q)| p.checked_mul(scale / q))
            .collect::<Option<Vec<_>>>()?;
        Some((ints, scale))
    }

    /// Distinct rational roots, ascending
    pub fn rational_roots(&self) -> Vec<f64> {
        if self.degree() == 0 {
            return Vec::new();
        }
        let Some((ints, _)) = self.integer_coeffs() else {
            return Vec::new();
        };

        let mut roots = Vec::new();
        let low = ints.iter().position(|c| *c != 0).unwrap_or(0);
        if low > 0 {
            roots.push(0.0);
        }
        let ints = &ints[low..];
        let (Some(&a0), Some(&an)) = (ints.first(), ints.last()) else {
            return roots;
        };
        if ints.len() < 2 || a0.abs() > MAX_ROOT_SEARCH || an.abs() > MAX_ROOT_SEARCH {
            return roots;
        }

        let reduced = Polynomial::new(
            self.var.clone(),
            ints.iter().map(|c| *c as f64).collect(),
        );
        let scale: f64 = ints.iter().map(|c| (*c as f64).abs()).sum();
        for p in divisors(a0) {
            for q in divisors(an) {
                if gcd(p, q) != 1 {
                    continue;
                }
                for candidate in [p as f64 / q as f64, -(p as f64) / q as f64] {
                    let magnitude = candidate.abs().max(1.0).powi(reduced.degree() as i32);
                    if reduced.eval(candidate).abs() <= FLOAT_TOLERANCE * scale * magnitude
                        && !roots.iter().any(|r: &f64| (r - candidate).abs() < FLOAT_TOLERANCE)
                    {
                        roots.push(candidate);
                    }
                }
            }
        }
        roots.sort_by(f64::total_cmp);
        roots
    }

    /// Discriminant data for a quadratic, `None` for any other degree
    pub fn discriminant(&self) -> Option<Discriminant> {
        (self.degree() == 2).then(|| Discriminant::new(self.coeff(2), self.coeff(1), self.coeff(0)))
    }

    /// The polynomial as a simplified expression in descending powers
    pub fn to_expr(&self) -> Expr {
        let x = Expr::symbol(self.var.clone());
        let sum = self
            .coeffs
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, c)| !is_zero(**c))
            .map(|(i, c)| {
                Expr::mul_expr(
                    Expr::number(snap(*c)),
                    Expr::pow(x.clone(), Expr::number(i as f64)),
                )
            })
            .reduce(Expr::add_expr)
            .unwrap_or_else(|| Expr::number(0.0));
        simplify_expr(&sum)
    }
}

/// Positive divisors of `|n|`
fn divisors(n: i64) -> Vec<i64> {
    let n = n.abs();
    let mut out = Vec::new();
    let mut d = 1;
    while d * d <= n {
        if n % d == 0 {
            out.push(d);
            if d != n / d {
                out.push(n / d);
            }
        }
        d += 1;
    }
    out
}

/// Real roots of a quadratic
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RealRoots {
    None,
    One(f64),
    /// `(-b + √D) / 2a` first, then `(-b - √D) / 2a`
    Two(f64, f64),
}

/// `b² - 4ac` together with the coefficients it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Discriminant {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub value: f64,
}

impl Discriminant {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Discriminant {
            a,
            b,
            c,
            value: b * b - 4.0 * a * c,
        }
    }

    /// Zero up to rounding relative to the size of `b²` and `4ac`
    pub fn is_zero(&self) -> bool {
        let scale = (self.b * self.b).abs().max((4.0 * self.a * self.c).abs()).max(1.0);
        self.value.abs() < FLOAT_TOLERANCE * scale
    }

    pub fn roots(&self) -> RealRoots {
        let two_a = 2.0 * self.a;
        if self.is_zero() {
            RealRoots::One(snap(-self.b / two_a))
        } else if self.value < 0.0 {
            RealRoots::None
        } else {
            let sqrt_d = self.value.sqrt();
            RealRoots::Two(
                snap((-self.b + sqrt_d) / two_a),
                snap((-self.b - sqrt_d) / two_a),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn poly(input: &str) -> Polynomial {
        Polynomial::from_expr(&parse(input).unwrap(), "x").unwrap()
    }

    #[test]
    fn test_from_expr() {
        let p = poly("(x + 1)*(x - 2)");
        assert_eq!(p.coeffs(), &[-2.0, -1.0, 1.0]);
        assert_eq!(p.degree(), 2);
        assert!(Polynomial::from_expr(&parse("sin(x) + 1").unwrap(), "x").is_none());
        assert!(Polynomial::from_expr(&parse("x*y").unwrap(), "x").is_none());
        assert!(Polynomial::from_expr(&parse("1/x").unwrap(), "x").is_none());
    }

    #[test]
    fn test_from_expr_rejects_non_finite() {
        let blown_up = Expr::mul_expr(Expr::number(f64::INFINITY), Expr::symbol("x"));
        assert!(Polynomial::from_expr(&blown_up, "x").is_none());
        assert!(Polynomial::from_expr(&parse("(x + 1)^40").unwrap(), "x").is_none());
    }

    #[test]
    fn test_calculus_on_coefficients() {
        let p = poly("x**3 + 2*x");
        assert_eq!(p.derivative().coeffs(), &[2.0, 0.0, 3.0]);
        assert_eq!(p.integral().coeffs(), &[0.0, 0.0, 1.0, 0.0, 0.25]);
        assert_eq!(p.eval(2.0), 12.0);
    }

    #[test]
    fn test_division() {
        let p = poly("x**3 - 6*x**2 + 11*x - 6");
        let (q, r) = p.divide_linear(1.0, 1.0);
        assert_eq!(q.coeffs(), &[6.0, -5.0, 1.0]);
        assert_eq!(r, 0.0);

        let (q, r) = p.div_rem(&poly("x - 2")).unwrap();
        assert_eq!(q.coeffs(), &[3.0, -4.0, 1.0]);
        assert!(r.is_zero());
    }

    #[test]
    fn test_rational_roots() {
        assert_eq!(poly("x**3 - 6*x**2 + 11*x - 6").rational_roots(), vec![1.0, 2.0, 3.0]);
        assert_eq!(poly("6*x**2 + x - 2").rational_roots(), vec![-2.0 / 3.0, 0.5]);
        assert_eq!(poly("x**3 - x").rational_roots(), vec![-1.0, 0.0, 1.0]);
        assert!(poly("x**2 - 2").rational_roots().is_empty());
    }

    #[test]
    fn test_discriminant_roots() {
        assert_eq!(Discriminant::new(1.0, -5.0, 6.0).roots(), RealRoots::Two(3.0, 2.0));
        assert_eq!(Discriminant::new(1.0, 2.0, 1.0).roots(), RealRoots::One(-1.0));
        assert_eq!(Discriminant::new(1.0, 0.0, 1.0).roots(), RealRoots::None);
        assert_eq!(poly("x**2 - 4").discriminant().map(|d| d.value), Some(16.0));
    }

    #[test]
    fn test_to_expr() {
        assert_eq!(poly("(x + 1)**2").to_expr().to_string(), "x**2 + 2*x + 1");
        assert_eq!(Polynomial::new("x", vec![0.0, 0.5]).to_expr().to_string(), "x/2");
    }
}
