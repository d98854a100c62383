//! Real roots of equations in one variable

use std::cmp::Ordering;

use crate::algebra::expand_expr;
use crate::numeric::{as_fraction, is_integer, is_zero, snap, split_square};
use crate::poly::{Discriminant, Polynomial, RealRoots};
use crate::simplification::simplify_expr;
use crate::simplification::terms::number_expr;
use crate::{Expr, ExprKind, MathError};

/// Subintervals scanned for sign changes when no exact method applies
const SCAN_STEPS: usize = 4000;
const BISECTION_ITERATIONS: usize = 200;

/// Solve `lhs = rhs` for `var`
///
/// Roots are real, de-duplicated and sorted ascending. Polynomials of degree
/// one and two are solved exactly; higher degrees use rational roots plus a
/// numeric scan of whatever does not deflate. Other equations are solved when
/// `var` occurs exactly once, by undoing the operations around it.
///
/// # Example
/// ```
/// use mathly::{parse, solve_equation};
///
/// let roots = solve_equation(&parse("x^2 - 5x + 6").unwrap(), &parse("0").unwrap(), "x").unwrap();
/// let roots: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
/// assert_eq!(roots, ["2", "3"]);
/// ```
///
/// # Errors
/// `MathError::Unsupported` when the equation is an identity or no method applies.
pub fn solve_equation(lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>, MathError> {
    let difference = simplify_expr(&Expr::sub_expr(lhs.clone(), rhs.clone()));
    let expanded = expand_expr(&difference)?;

    let roots = if let Some(poly) = Polynomial::from_expr(&expanded, var) {
        tracing::trace!(degree = poly.degree(), "solving polynomial equation");
        if poly.is_zero() {
            return Err(MathError::unsupported(format!(
                "every value of {} satisfies the equation",
                var
            )));
        }
        polynomial_roots(&poly)
    } else if difference.occurrences(var) == 1 {
        isolate(&difference, Expr::number(0.0), var)?
    } else {
        return Err(MathError::unsupported(format!(
            "cannot solve {} = 0 for {}",
            difference, var
        )));
    };

    Ok(finish(roots))
}

/// Keep real roots, drop duplicates, sort ascending
fn finish(roots: Vec<Expr>) -> Vec<Expr> {
    let mut keyed: Vec<(Option<f64>, Expr)> = Vec::new();
    for root in roots {
        let value = root
            .evaluate(&Default::default())
            .filter(|v| v.is_finite());
        if root.variables().is_empty() && value.is_none() {
            // Complex or undefined
            continue;
        }
        let duplicate = keyed.iter().any(|(v, r)| match (v, value) {
            (Some(a), Some(b)) => (a - b).abs() < 1e-9,
            _ => *r == root,
        });
        if !duplicate {
            keyed.push((value, root));
        }
    }
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    keyed.into_iter().map(|(_, r)| r).collect()
}

fn polynomial_roots(poly: &Polynomial) -> Vec<Expr> {
    match poly.degree() {
        0 => Vec::new(),
        1 => vec![number_expr(-poly.coeff(0) / poly.coeff(1))],
        2 => quadratic_roots(poly),
        _ => {
            let mut roots = Vec::new();
            let mut rest = poly.clone();
            for root in poly.rational_roots() {
                roots.push(number_expr(root));
                while rest.degree() > 0 && is_zero(rest.eval(root)) {
                    rest = rest.deflate(root);
                }
            }
            match rest.degree() {
                0 => {}
                1 | 2 => roots.extend(polynomial_roots(&rest)),
                _ => roots.extend(scan_roots(&rest).into_iter().map(Expr::number)),
            }
            roots
        }
    }
}

/// Exact quadratic roots, irrational ones as `p ± q*sqrt(m)`
fn quadratic_roots(poly: &Polynomial) -> Vec<Expr> {
    let Some(discriminant) = poly.discriminant() else {
        return Vec::new();
    };
    match discriminant.roots() {
        RealRoots::None => Vec::new(),
        RealRoots::One(x) => vec![number_expr(x)],
        RealRoots::Two(x1, x2) => {
            let exact = as_fraction(x1).is_some() && as_fraction(x2).is_some();
            if !exact && let Some(surds) = surd_roots(poly) {
                return surds;
            }
            vec![number_expr(x1), number_expr(x2)]
        }
    }
}

fn surd_roots(poly: &Polynomial) -> Option<Vec<Expr>> {
    let (ints, _) = poly.integer_coeffs()?;
    let (c, b, a) = (ints[0] as f64, ints[1] as f64, ints[2] as f64);
    let d = Discriminant::new(a, b, c).value;
    if d <= 0.0 || !is_integer(d) || d > 1e15 {
        return None;
    }
    let (k, m) = split_square(d as u64);
    let p = snap(-b / (2.0 * a));
    let q = (k as f64 / (2.0 * a)).abs();

    let surd = simplify_expr(&Expr::mul_expr(
        number_expr(q),
        Expr::func("sqrt", Expr::number(m as f64)),
    ));
    if is_zero(p) {
        return Some(vec![Expr::neg(surd.clone()), surd]);
    }
    let p = number_expr(p);
    Some(vec![
        Expr::sub_expr(p.clone(), surd.clone()),
        Expr::add_expr(p, surd),
    ])
}

/// Real roots by sign changes over the Cauchy bound, refined by bisection
fn scan_roots(poly: &Polynomial) -> Vec<f64> {
    let lead = poly.leading();
    let bound = 1.0
        + poly.coeffs()[..poly.degree()]
            .iter()
            .map(|c| (c / lead).abs())
            .fold(0.0, f64::max);
    let step = 2.0 * bound / SCAN_STEPS as f64;

    let mut roots: Vec<f64> = Vec::new();
    let mut left = -bound;
    let mut f_left = poly.eval(left);
    for i in 1..=SCAN_STEPS {
        let right = -bound + step * i as f64;
        let f_right = poly.eval(right);
        if is_zero(f_left) {
            roots.push(left);
        } else if f_left * f_right < 0.0 {
            let (mut lo, mut hi) = (left, right);
            for _ in 0..BISECTION_ITERATIONS {
                let mid = 0.5 * (lo + hi);
                if poly.eval(lo) * poly.eval(mid) <= 0.0 {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            roots.push(snap(0.5 * (lo + hi)));
        }
        left = right;
        f_left = f_right;
    }
    roots
}

/// Undo the operations around the single occurrence of `var` in `expr = target`
fn isolate(expr: &Expr, target: Expr, var: &str) -> Result<Vec<Expr>, MathError> {
    let target = simplify_expr(&target);
    let value = target.evaluate(&Default::default());

    match &expr.kind {
        ExprKind::Symbol(s) if s == var => Ok(vec![target]),
        ExprKind::Add(u, v) => {
            if u.contains_var(var) {
                isolate(u, Expr::sub_expr(target, (**v).clone()), var)
            } else {
                isolate(v, Expr::sub_expr(target, (**u).clone()), var)
            }
        }
        ExprKind::Sub(u, v) => {
            if u.contains_var(var) {
                isolate(u, Expr::add_expr(target, (**v).clone()), var)
            } else {
                isolate(v, Expr::sub_expr((**u).clone(), target), var)
            }
        }
        ExprKind::Mul(u, v) => {
            if u.contains_var(var) {
                isolate(u, Expr::div_expr(target, (**v).clone()), var)
            } else {
                isolate(v, Expr::div_expr(target, (**u).clone()), var)
            }
        }
        ExprKind::Div(u, v) => {
            if u.contains_var(var) {
                isolate(u, Expr::mul_expr(target, (**v).clone()), var)
            } else if value.is_some_and(is_zero) {
                // c / f(x) = 0 has no solution
                Ok(Vec::new())
            } else {
                isolate(v, Expr::div_expr((**u).clone(), target), var)
            }
        }
        ExprKind::Pow(u, v) if u.contains_var(var) => {
            let Some(n) = v.as_number().or_else(|| crate::simplification::terms::exp_value(v))
            else {
                return Err(cannot_isolate(expr));
            };
            if is_zero(n) {
                return Err(cannot_isolate(expr));
            }
            let even = is_integer(n) && (n.round() as i64) % 2 == 0;
            if even {
                if value.is_some_and(|t| t < 0.0) {
                    return Ok(Vec::new());
                }
                let root = if (n - 2.0).abs() < f64::EPSILON {
                    Expr::func("sqrt", target)
                } else {
                    Expr::pow(target, number_expr(1.0 / n))
                };
                let mut roots = isolate(u, Expr::neg(root.clone()), var)?;
                roots.extend(isolate(u, root, var)?);
                Ok(roots)
            } else if is_integer(n) && let Some(t) = value {
                // Odd integer powers keep the sign
                let root = t.signum() * t.abs().powf(1.0 / n);
                isolate(u, number_expr(root), var)
            } else {
                isolate(u, Expr::pow(target, number_expr(1.0 / n)), var)
            }
        }
        ExprKind::Pow(u, v) => {
            // b^f(x) = t  =>  f(x) = ln(t)/ln(b)
            if value.is_some_and(|t| t <= 0.0) {
                return Ok(Vec::new());
            }
            let rhs = if u.as_symbol() == Some("e") {
                Expr::func("ln", target)
            } else {
                Expr::div_expr(Expr::func("ln", target), Expr::func("ln", (**u).clone()))
            };
            isolate(v, rhs, var)
        }
        ExprKind::FunctionCall { name, args } if args.len() == 1 => {
            let arg = &args[0];
            let in_range = |lo: f64, hi: f64| value.is_none_or(|t| (lo..=hi).contains(&t));
            let inverse = match name.as_str() {
                "exp" if in_range(f64::MIN_POSITIVE, f64::MAX) => Expr::func("ln", target),
                "ln" => Expr::func("exp", target),
                "sqrt" if in_range(0.0, f64::MAX) => Expr::pow(target, Expr::number(2.0)),
                "sin" if in_range(-1.0, 1.0) => Expr::func("asin", target),
                "cos" if in_range(-1.0, 1.0) => Expr::func("acos", target),
                "tan" => Expr::func("atan", target),
                "abs" if in_range(0.0, f64::MAX) => {
                    let mut roots = isolate(arg, Expr::neg(target.clone()), var)?;
                    roots.extend(isolate(arg, target, var)?);
                    return Ok(roots);
                }
                "exp" | "sqrt" | "sin" | "cos" | "abs" => return Ok(Vec::new()),
                _ => return Err(cannot_isolate(expr)),
            };
            isolate(arg, inverse, var)
        }
        _ => Err(cannot_isolate(expr)),
    }
}

fn cannot_isolate(expr: &Expr) -> MathError {
    MathError::unsupported(format!("cannot isolate the variable in {}", expr))
}
