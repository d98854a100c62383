//! Limits by leading-term analysis and extended-real substitution

use std::f64::consts::{E, FRAC_PI_2, PI};
use std::fmt;

use crate::functions::registry::Registry;
use crate::numeric::{format_number, is_zero};
use crate::poly::Polynomial;
use crate::simplification::simplify_expr;
use crate::simplification::terms::number_expr;
use crate::{Expr, ExprKind, MathError};

/// Where the variable tends to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LimitPoint {
    Finite(f64),
    PosInfinity,
    NegInfinity,
}

impl fmt::Display for LimitPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitPoint::Finite(v) => write!(f, "{}", format_number(*v)),
            LimitPoint::PosInfinity => write!(f, "∞"),
            LimitPoint::NegInfinity => write!(f, "-∞"),
        }
    }
}

/// Result of a limit computation
#[derive(Debug, Clone, PartialEq)]
pub enum LimitValue {
    Finite(Expr),
    PosInfinity,
    NegInfinity,
    Indeterminate,
}

impl LimitValue {
    pub fn is_zero(&self) -> bool {
        matches!(self, LimitValue::Finite(e) if e.is_zero_num())
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self, LimitValue::PosInfinity | LimitValue::NegInfinity)
    }
}

impl fmt::Display for LimitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitValue::Finite(e) => write!(f, "{}", e),
            LimitValue::PosInfinity => write!(f, "∞"),
            LimitValue::NegInfinity => write!(f, "-∞"),
            LimitValue::Indeterminate => write!(f, "indeterminate"),
        }
    }
}

/// A value on the extended real line
#[derive(Debug, Clone, Copy, PartialEq)]
enum Ext {
    Real(f64),
    PosInf,
    NegInf,
    Undefined,
}

impl Ext {
    fn from_f64(v: f64) -> Ext {
        if v.is_nan() {
            Ext::Undefined
        } else if v == f64::INFINITY {
            Ext::PosInf
        } else if v == f64::NEG_INFINITY {
            Ext::NegInf
        } else {
            Ext::Real(v)
        }
    }

    fn infinity(sign: f64) -> Ext {
        if sign < 0.0 { Ext::NegInf } else { Ext::PosInf }
    }

    /// Sign of a non-zero value, `None` for zero and undefined
    fn sign(self) -> Option<f64> {
        match self {
            Ext::Real(v) if !is_zero(v) => Some(v.signum()),
            Ext::PosInf => Some(1.0),
            Ext::NegInf => Some(-1.0),
            _ => None,
        }
    }

    fn is_infinite(self) -> bool {
        matches!(self, Ext::PosInf | Ext::NegInf)
    }

    fn is_zero(self) -> bool {
        matches!(self, Ext::Real(v) if is_zero(v))
    }

    fn add(self, other: Ext) -> Ext {
        match (self, other) {
            (Ext::Undefined, _) | (_, Ext::Undefined) => Ext::Undefined,
            (Ext::Real(a), Ext::Real(b)) => Ext::from_f64(a + b),
            (Ext::PosInf, Ext::NegInf) | (Ext::NegInf, Ext::PosInf) => Ext::Undefined,
            (inf, Ext::Real(_)) | (Ext::Real(_), inf) => inf,
            (a, _) => a,
        }
    }

    fn neg(self) -> Ext {
        match self {
            Ext::Real(v) => Ext::Real(-v),
            Ext::PosInf => Ext::NegInf,
            Ext::NegInf => Ext::PosInf,
            Ext::Undefined => Ext::Undefined,
        }
    }

    fn mul(self, other: Ext) -> Ext {
        match (self, other) {
            (Ext::Undefined, _) | (_, Ext::Undefined) => Ext::Undefined,
            (Ext::Real(a), Ext::Real(b)) => Ext::from_f64(a * b),
            // 0 * ∞
            (a, b) if a.is_zero() || b.is_zero() => Ext::Undefined,
            (a, b) => match (a.sign(), b.sign()) {
                (Some(x), Some(y)) => Ext::infinity(x * y),
                _ => Ext::Undefined,
            },
        }
    }

    fn div(self, other: Ext) -> Ext {
        match (self, other) {
            (Ext::Undefined, _) | (_, Ext::Undefined) => Ext::Undefined,
            (a, b) if a.is_infinite() && b.is_infinite() => Ext::Undefined,
            (a, b) if a.is_zero() && b.is_zero() => Ext::Undefined,
            // c/0 takes the sign of c
            (a, b) if b.is_zero() => a.sign().map_or(Ext::Undefined, Ext::infinity),
            (Ext::Real(_), b) if b.is_infinite() => Ext::Real(0.0),
            (Ext::Real(a), Ext::Real(b)) => Ext::from_f64(a / b),
            (a, b) => match (a.sign(), b.sign()) {
                (Some(x), Some(y)) => Ext::infinity(x * y),
                _ => Ext::Undefined,
            },
        }
    }

    fn pow(self, exponent: Ext) -> Ext {
        match (self, exponent) {
            (Ext::Undefined, _) | (_, Ext::Undefined) => Ext::Undefined,
            (Ext::Real(b), Ext::Real(n)) => {
                if is_zero(b) && n < 0.0 {
                    return Ext::PosInf;
                }
                Ext::from_f64(b.powf(n))
            }
            // ∞^0
            (base, Ext::Real(n)) if base.is_infinite() && is_zero(n) => Ext::Undefined,
            (Ext::PosInf, Ext::Real(n)) => {
                if n > 0.0 { Ext::PosInf } else { Ext::Real(0.0) }
            }
            (Ext::NegInf, Ext::Real(n)) => {
                if n < 0.0 {
                    Ext::Real(0.0)
                } else if n.fract() == 0.0 && (n as i64) % 2 == 1 {
                    Ext::NegInf
                } else if n.fract() == 0.0 {
                    Ext::PosInf
                } else {
                    Ext::Undefined
                }
            }
            (Ext::Real(b), inf) => {
                let grows = inf == Ext::PosInf;
                if (b - 1.0).abs() < f64::EPSILON || b < 0.0 {
                    // 1^∞ and oscillating bases
                    Ext::Undefined
                } else if (b > 1.0) == grows {
                    Ext::PosInf
                } else {
                    Ext::Real(0.0)
                }
            }
            (Ext::PosInf, Ext::PosInf) => Ext::PosInf,
            (Ext::PosInf, Ext::NegInf) => Ext::Real(0.0),
            _ => Ext::Undefined,
        }
    }
}

/// Value of a built-in function at an infinite argument
fn function_at_infinity(name: &str, arg: Ext) -> Ext {
    let positive = arg == Ext::PosInf;
    match name {
        "exp" => if positive { Ext::PosInf } else { Ext::Real(0.0) },
        "ln" | "sqrt" if positive => Ext::PosInf,
        "abs" | "cosh" => Ext::PosInf,
        "sinh" => arg,
        "atan" => Ext::Real(if positive { FRAC_PI_2 } else { -FRAC_PI_2 }),
        "tanh" => Ext::Real(if positive { 1.0 } else { -1.0 }),
        // sin, cos, tan and friends oscillate
        _ => Ext::Undefined,
    }
}

fn eval_ext(expr: &Expr, var: &str, at: Ext) -> Ext {
    match &expr.kind {
        ExprKind::Number(n) => Ext::Real(*n),
        ExprKind::Symbol(s) if s == var => at,
        ExprKind::Symbol(s) => match s.as_str() {
            "pi" => Ext::Real(PI),
            "e" => Ext::Real(E),
            _ => Ext::Undefined,
        },
        ExprKind::FunctionCall { name, args } => {
            let values: Vec<Ext> = args.iter().map(|a| eval_ext(a, var, at)).collect();
            if let [arg] = values.as_slice()
                && arg.is_infinite()
            {
                return function_at_infinity(name, *arg);
            }
            let reals = values
                .iter()
                .map(|v| match v {
                    Ext::Real(r) => Some(*r),
                    _ => None,
                })
                .collect::<Option<Vec<f64>>>();
            match (Registry::get(name), reals) {
                (Some(def), Some(reals)) if def.validate_arity(reals.len()) => {
                    (def.eval)(&reals).map_or(Ext::Undefined, Ext::from_f64)
                }
                _ => Ext::Undefined,
            }
        }
        ExprKind::Add(u, v) => eval_ext(u, var, at).add(eval_ext(v, var, at)),
        ExprKind::Sub(u, v) => eval_ext(u, var, at).add(eval_ext(v, var, at).neg()),
        ExprKind::Mul(u, v) => eval_ext(u, var, at).mul(eval_ext(v, var, at)),
        ExprKind::Div(u, v) => eval_ext(u, var, at).div(eval_ext(v, var, at)),
        ExprKind::Pow(u, v) => eval_ext(u, var, at).pow(eval_ext(v, var, at)),
    }
}

/// Numerator and denominator polynomials of a rational function
fn rational_parts(expr: &Expr, var: &str) -> Option<(Polynomial, Polynomial)> {
    match &expr.kind {
        ExprKind::Div(n, d) => Some((
            Polynomial::from_expr(n, var)?,
            Polynomial::from_expr(d, var)?,
        )),
        ExprKind::Mul(l, r) if l.is_neg_one_num() => {
            let (n, d) = rational_parts(r, var)?;
            let negated = n.coeffs().iter().map(|c| -c).collect();
            Some((Polynomial::new(var, negated), d))
        }
        _ => Some((
            Polynomial::from_expr(expr, var)?,
            Polynomial::new(var, vec![1.0]),
        )),
    }
}

/// Leading-term behavior of `num/den` as `var` grows without bound
fn rational_at_infinity(num: &Polynomial, den: &Polynomial, sign: f64) -> LimitValue {
    if num.is_zero() {
        return LimitValue::Finite(Expr::number(0.0));
    }
    let (n, d) = (num.degree(), den.degree());
    let ratio = num.leading() / den.leading();
    if n < d {
        LimitValue::Finite(Expr::number(0.0))
    } else if n == d {
        LimitValue::Finite(number_expr(ratio))
    } else {
        let direction = if (n - d) % 2 == 1 { sign } else { 1.0 };
        if ratio * direction > 0.0 {
            LimitValue::PosInfinity
        } else {
            LimitValue::NegInfinity
        }
    }
}

/// Limit of `expr` as `var` approaches `point`
///
/// # Example
/// ```
/// use mathly::{LimitPoint, LimitValue, compute_limit, parse};
///
/// let expr = parse("(2x^2 + 1)/(x^2 - 3)").unwrap();
/// let value = compute_limit(&expr, "x", LimitPoint::PosInfinity).unwrap();
/// assert_eq!(value.to_string(), "2");
///
/// let expr = parse("sin(x)/x").unwrap();
/// let value = compute_limit(&expr, "x", LimitPoint::Finite(0.0)).unwrap();
/// assert_eq!(value, LimitValue::Indeterminate);
/// ```
///
/// # Errors
/// Returns `MathError::Unsupported` when the expression has free symbols
/// other than `var` and the point is infinite.
pub fn compute_limit(expr: &Expr, var: &str, point: LimitPoint) -> Result<LimitValue, MathError> {
    let simplified = simplify_expr(expr);
    let parameters = simplified.variables().into_iter().any(|v| v != var);

    let at = match point {
        LimitPoint::Finite(v) => Ext::Real(v),
        LimitPoint::PosInfinity => Ext::PosInf,
        LimitPoint::NegInfinity => Ext::NegInf,
    };

    if let LimitPoint::PosInfinity | LimitPoint::NegInfinity = point {
        if parameters {
            return Err(MathError::unsupported(format!(
                "limit at infinity of {} with free parameters",
                simplified
            )));
        }
        if let Some((num, den)) = rational_parts(&simplified, var) {
            let sign = if point == LimitPoint::PosInfinity { 1.0 } else { -1.0 };
            return Ok(rational_at_infinity(&num, &den, sign));
        }
    }

    if parameters {
        // Parameters stay symbolic; only direct substitution is attempted
        let LimitPoint::Finite(v) = point else {
            return Ok(LimitValue::Indeterminate);
        };
        let substituted = simplify_expr(&simplified.substitute(var, &Expr::number(v)));
        return Ok(LimitValue::Finite(substituted));
    }

    tracing::trace!(expr = %simplified, point = %point, "extended-real substitution");
    Ok(match eval_ext(&simplified, var, at) {
        Ext::Real(value) => match point {
            LimitPoint::Finite(v) => {
                let substituted = simplify_expr(&simplified.substitute(var, &Expr::number(v)));
                if substituted.as_number().is_some() || substituted.node_count() <= simplified.node_count() {
                    LimitValue::Finite(substituted)
                } else {
                    LimitValue::Finite(number_expr(value))
                }
            }
            _ => LimitValue::Finite(number_expr(value)),
        },
        Ext::PosInf => LimitValue::PosInfinity,
        Ext::NegInf => LimitValue::NegInfinity,
        Ext::Undefined => LimitValue::Indeterminate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn limit(input: &str, point: LimitPoint) -> LimitValue {
        compute_limit(&parse(input).unwrap(), "x", point).unwrap()
    }

    #[test]
    fn test_direct_substitution() {
        assert_eq!(limit("x^2 + 1", LimitPoint::Finite(2.0)).to_string(), "5");
        assert_eq!(limit("sin(x)", LimitPoint::Finite(0.0)).to_string(), "0");
        assert_eq!(limit("cos(x)", LimitPoint::Finite(1.0)).to_string(), "cos(1)");
    }

    #[test]
    fn test_rational_at_infinity() {
        assert_eq!(limit("1/x", LimitPoint::PosInfinity).to_string(), "0");
        assert_eq!(limit("(3x^2 + 1)/(x^2 - 3)", LimitPoint::PosInfinity).to_string(), "3");
        assert_eq!(limit("x^3", LimitPoint::NegInfinity), LimitValue::NegInfinity);
        assert_eq!(limit("-x^2", LimitPoint::PosInfinity), LimitValue::NegInfinity);
    }

    #[test]
    fn test_transcendental_at_infinity() {
        assert_eq!(limit("exp(-x)", LimitPoint::PosInfinity).to_string(), "0");
        assert_eq!(limit("exp(x)", LimitPoint::PosInfinity), LimitValue::PosInfinity);
        assert_eq!(limit("sin(x)", LimitPoint::PosInfinity), LimitValue::Indeterminate);
    }

    #[test]
    fn test_division_by_zero_is_signed() {
        assert_eq!(limit("1/x^2", LimitPoint::Finite(0.0)), LimitValue::PosInfinity);
        assert_eq!(limit("-2/x^2", LimitPoint::Finite(0.0)), LimitValue::NegInfinity);
    }

    #[test]
    fn test_indeterminate_forms() {
        assert_eq!(limit("sin(x)/x", LimitPoint::Finite(0.0)), LimitValue::Indeterminate);
        assert_eq!(limit("(x^2 - 1)/(x - 1)", LimitPoint::Finite(1.0)), LimitValue::Indeterminate);
        assert!(limit("(x^2 - 1)/(x - 1)", LimitPoint::Finite(1.0)) != LimitValue::PosInfinity);
    }

    #[test]
    fn test_parameters_substitute() {
        let expr = parse("a*x + 1").unwrap();
        let value = compute_limit(&expr, "x", LimitPoint::Finite(2.0)).unwrap();
        assert_eq!(value.to_string(), "2*a + 1");
        assert!(compute_limit(&expr, "x", LimitPoint::PosInfinity).is_err());
    }
}
