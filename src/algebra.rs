//! Expansion and factoring

use crate::numeric::{as_fraction, gcd, is_integer, is_one, is_zero};
use crate::poly::Polynomial;
use crate::simplification::simplify_expr;
use crate::simplification::terms::{exp_value, number_expr};
use crate::{Expr, ExprKind, MathError};

/// Integer powers of sums up to this exponent are multiplied out
const MAX_EXPAND_POWER: f64 = 16.0;

/// Multiply out products and integer powers of sums, then simplify
///
/// # Example
/// ```
/// use mathly::{expand_expr, parse};
///
/// let expr = parse("(x + 2)(x + 3)").unwrap();
/// assert_eq!(expand_expr(&expr).unwrap().to_string(), "x**2 + 5*x + 6");
/// ```
///
/// # Errors
/// `MathError::Unsupported` when a sum is raised to an integer power above 16.
pub fn expand_expr(expr: &Expr) -> Result<Expr, MathError> {
    Ok(simplify_expr(&expand_inner(expr)?))
}

fn expand_inner(expr: &Expr) -> Result<Expr, MathError> {
    Ok(match &expr.kind {
        ExprKind::Number(_) | ExprKind::Symbol(_) => expr.clone(),
        ExprKind::FunctionCall { name, args } => Expr::func_multi(
            name.clone(),
            args.iter().map(expand_inner).collect::<Result<_, _>>()?,
        ),
        ExprKind::Add(u, v) => Expr::add_expr(expand_inner(u)?, expand_inner(v)?),
        ExprKind::Sub(u, v) => Expr::sub_expr(expand_inner(u)?, expand_inner(v)?),
        ExprKind::Mul(u, v) => multiply(&expand_inner(u)?, &expand_inner(v)?),
        ExprKind::Div(u, v) => {
            let numerator = expand_inner(u)?;
            let denominator = expand_inner(v)?;
            if numerator.is_sum() {
                addends(&numerator)
                    .into_iter()
                    .map(|t| Expr::div_expr(t, denominator.clone()))
                    .reduce(Expr::add_expr)
                    .unwrap_or_else(|| Expr::number(0.0))
            } else {
                Expr::div_expr(numerator, denominator)
            }
        }
        ExprKind::Pow(base, exp) => {
            let base = expand_inner(base)?;
            match exp_value(exp) {
                Some(n) if is_integer(n) && n >= 2.0 && base.is_sum() => {
                    if n > MAX_EXPAND_POWER {
                        return Err(MathError::unsupported(format!(
                            "cannot expand a sum raised to the power {}",
                            n
                        )));
                    }
                    let mut acc = base.clone();
                    for _ in 1..n.round() as usize {
                        acc = multiply(&acc, &base);
                    }
                    acc
                }
                _ => Expr::pow(base, expand_inner(exp)?),
            }
        }
    })
}

/// Signed addends of a sum; subtraction becomes negation
fn addends(expr: &Expr) -> Vec<Expr> {
    let mut out = Vec::new();
    collect_addends(expr, false, &mut out);
    out
}

fn collect_addends(expr: &Expr, negate: bool, out: &mut Vec<Expr>) {
    match &expr.kind {
        ExprKind::Add(u, v) => {
            collect_addends(u, negate, out);
            collect_addends(v, negate, out);
        }
        ExprKind::Sub(u, v) => {
            collect_addends(u, negate, out);
            collect_addends(v, !negate, out);
        }
        _ if negate => out.push(Expr::neg(expr.clone())),
        _ => out.push(expr.clone()),
    }
}

/// Distribute a product over both operands' addends
fn multiply(a: &Expr, b: &Expr) -> Expr {
    if !a.is_sum() && !b.is_sum() {
        return Expr::mul_expr(a.clone(), b.clone());
    }
    let right = addends(b);
    let product = addends(a)
        .iter()
        .flat_map(|l| right.iter().map(move |r| Expr::mul_expr(l.clone(), r.clone())))
        .reduce(Expr::add_expr)
        .unwrap_or_else(|| Expr::number(0.0));
    // Keep intermediate sums combined so repeated products stay small
    simplify_expr(&product)
}

/// Factor a univariate polynomial over the rationals
///
/// Pulls out the (signed) integer content, powers of the variable and every
/// rational linear factor; an irreducible remainder is kept as is. Input
/// that is not a univariate polynomial, or that does not factor, comes back
/// simplified but otherwise unchanged.
///
/// # Example
/// ```
/// use mathly::{factor_expr, parse};
///
/// let expr = parse("x^2 - 5x + 6").unwrap();
/// assert_eq!(factor_expr(&expr).to_string(), "(x - 2)*(x - 3)");
/// ```
pub fn factor_expr(expr: &Expr) -> Expr {
    let simplified = simplify_expr(expr);
    let vars = simplified.variables();
    let Some(var) = vars.iter().next().filter(|_| vars.len() == 1) else {
        return simplified;
    };
    let Some(poly) = Polynomial::from_expr(&simplified, var) else {
        return simplified;
    };
    if poly.degree() == 0 {
        return simplified;
    }
    let Some((ints, scale)) = poly.integer_coeffs() else {
        return simplified;
    };

    // Content, signed so the primitive part has a positive leading coefficient
    let mut content = ints.iter().filter(|c| **c != 0).fold(0, |g, c| gcd(g, *c));
    if ints.last().is_some_and(|c| *c < 0) {
        content = -content;
    }
    let constant = content as f64 / scale as f64;

    let low = ints.iter().position(|c| *c != 0).unwrap_or(0);
    let mut primitive = Polynomial::new(
        var.clone(),
        ints[low..].iter().map(|c| (c / content) as f64).collect(),
    );

    let x = Expr::symbol(var.clone());
    let mut factors: Vec<Expr> = Vec::new();
    if low == 1 {
        factors.push(x.clone());
    } else if low > 1 {
        factors.push(Expr::pow(x.clone(), Expr::number(low as f64)));
    }

    for root in primitive.rational_roots() {
        let Some((p, q)) = as_fraction(root) else {
            continue;
        };
        let (p, q) = (p as f64, q as f64);
        let mut multiplicity = 0;
        loop {
            let (quotient, remainder) = primitive.divide_linear(p, q);
            if !is_zero(remainder) || primitive.degree() == 0 {
                break;
            }
            primitive = quotient;
            multiplicity += 1;
        }
        if multiplicity == 0 {
            continue;
        }
        let linear = simplify_expr(&Expr::sub_expr(
            Expr::mul_expr(Expr::number(q), x.clone()),
            Expr::number(p),
        ));
        factors.push(if multiplicity == 1 {
            linear
        } else {
            Expr::pow(linear, Expr::number(multiplicity as f64))
        });
    }

    if primitive.degree() > 0 {
        factors.push(primitive.to_expr());
    }

    let scaled = !is_one(constant.abs());
    let pieces = factors.len() + usize::from(scaled);
    if pieces < 2 && !(factors.len() == 1 && matches!(factors[0].kind, ExprKind::Pow(..))) {
        return simplified;
    }

    if scaled {
        factors.insert(0, number_expr(constant.abs()));
    }
    let Some(product) = factors.into_iter().reduce(Expr::mul_expr) else {
        return simplified;
    };
    if constant < 0.0 {
        Expr::neg(product)
    } else {
        product
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn expand(input: &str) -> String {
        expand_expr(&parse(input).unwrap()).unwrap().to_string()
    }

    fn factor(input: &str) -> String {
        factor_expr(&parse(input).unwrap()).to_string()
    }

    #[test]
    fn test_expand_products() {
        assert_eq!(expand("(x + 2)(x + 3)"), "x**2 + 5*x + 6");
        assert_eq!(expand("(x + 1)(x - 1)"), "x**2 - 1");
        assert_eq!(expand("2*(x - 3)"), "2*x - 6");
        assert_eq!(expand("x*(x + 1)"), "x**2 + x");
    }

    #[test]
    fn test_expand_powers() {
        assert_eq!(expand("(x + 1)**2"), "x**2 + 2*x + 1");
        assert_eq!(expand("(a + b)^2"), "a**2 + 2*a*b + b**2");
        assert_eq!(expand("(x - 1)**3"), "x**3 - 3*x**2 + 3*x - 1");
    }

    #[test]
    fn test_expand_leaves_expanded_input() {
        assert_eq!(expand("x**2 + 1"), "x**2 + 1");
        assert_eq!(expand("1/(x + 1)"), "1/(x + 1)");
    }

    #[test]
    fn test_expand_power_cap() {
        assert_eq!(
            expand_expr(&parse("(x + 1)^50").unwrap()),
            Err(MathError::unsupported("cannot expand a sum raised to the power 50"))
        );
        assert!(expand("(x + 1)^16").starts_with("x**16 + 16*x**15"));
        assert_eq!(expand("x^50 + 1"), "x**50 + 1");
    }

    #[test]
    fn test_factor_quadratics() {
        assert_eq!(factor("x^2 - 5x + 6"), "(x - 2)*(x - 3)");
        assert_eq!(factor("x^2 - 4"), "(x + 2)*(x - 2)");
        assert_eq!(factor("x^2 + 2x + 1"), "(x + 1)**2");
        assert_eq!(factor("6x^2 + x - 2"), "(3*x + 2)*(2*x - 1)");
    }

    #[test]
    fn test_factor_content_and_powers() {
        assert_eq!(factor("2x^2 + 4x"), "2*x*(x + 2)");
        assert_eq!(factor("x^3 - x"), "x*(x + 1)*(x - 1)");
        assert_eq!(factor("-x^2 + 1"), "-(x + 1)*(x - 1)");
    }

    #[test]
    fn test_factor_irreducible_unchanged() {
        assert_eq!(factor("x^2 + 1"), "x**2 + 1");
        assert_eq!(factor("x + 1"), "x + 1");
        assert_eq!(factor("sin(x) + 1"), "sin(x) + 1");
    }
}
