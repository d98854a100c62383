//! Indefinite integration by rule matching
//!
//! Handles linearity, the power rule (including `1/x`), exponentials with a
//! linear exponent, registry antiderivatives of a linear argument and
//! polynomials. Anything else is reported as unsupported.

use crate::functions::registry::Registry;
use crate::numeric::{is_neg_one, is_one};
use crate::poly::Polynomial;
use crate::simplification::simplify_expr;
use crate::simplification::terms::{Factor, exp_value, terms_of};
use crate::{Expr, ExprKind, MathError};

/// Antiderivative with the constant of integration omitted
///
/// # Example
/// ```
/// use mathly::{integrate, parse};
///
/// let expr = parse("3x^2 + 2x + 1").unwrap();
/// assert_eq!(integrate(&expr, "x").unwrap().to_string(), "x**3 + x**2 + x");
/// ```
///
/// # Errors
/// Returns `MathError::Unsupported` when no rule matches a term.
pub fn integrate(expr: &Expr, var: &str) -> Result<Expr, MathError> {
    let simplified = simplify_expr(expr);
    let mut result: Option<Expr> = None;
    for term in terms_of(&simplified) {
        let (dependent, constant): (Vec<Factor>, Vec<Factor>) = term
            .factors
            .into_iter()
            .partition(|f| f.base.contains_var(var) || f.exp.contains_var(var));

        let scale = constant
            .into_iter()
            .map(|f| Expr::pow(f.base, f.exp))
            .fold(Expr::number(term.coeff), Expr::mul_expr);

        let antiderivative = match dependent.as_slice() {
            [] => Ok(Expr::symbol(var)),
            [factor] => integrate_factor(factor, var),
            _ => integrate_polynomial(&product(&dependent), var),
        }
        .map_err(|_| unsupported(expr))?;
        let piece = Expr::mul_expr(scale, antiderivative);
        result = Some(match result {
            Some(acc) => Expr::add_expr(acc, piece),
            None => piece,
        });
    }
    Ok(simplify_expr(&result.unwrap_or_else(|| Expr::number(0.0))))
}

fn product(factors: &[Factor]) -> Expr {
    factors
        .iter()
        .map(|f| {
            if f.exp.is_one_num() {
                f.base.clone()
            } else {
                Expr::pow(f.base.clone(), f.exp.clone())
            }
        })
        .reduce(Expr::mul_expr)
        .unwrap_or_else(|| Expr::number(1.0))
}

/// `(a, b)` for an expression equal to `a*var + b` with `a != 0`
fn linear_coeffs(expr: &Expr, var: &str) -> Option<(f64, f64)> {
    let poly = Polynomial::from_expr(expr, var)?;
    (poly.degree() == 1).then(|| (poly.coeff(1), poly.coeff(0)))
}

fn integrate_factor(factor: &Factor, var: &str) -> Result<Expr, MathError> {
    let base = &factor.base;
    let exponent = exp_value(&factor.exp);

    if !factor.exp.contains_var(var) {
        let Some(n) = exponent else {
            return Err(unsupported(base));
        };
        if let Some((a, _)) = linear_coeffs(base, var) {
            // ∫(ax+b)^n dx = (ax+b)^(n+1) / (a(n+1)), or ln(ax+b)/a for n = -1
            let integral = if is_neg_one(n) {
                Expr::func("ln", base.clone())
            } else {
                Expr::div_expr(
                    Expr::pow(base.clone(), Expr::number(n + 1.0)),
                    Expr::number(n + 1.0),
                )
            };
            return Ok(Expr::div_expr(integral, Expr::number(a)));
        }
        if is_one(n)
            && let ExprKind::FunctionCall { name, args } = &base.kind
            && args.len() == 1
        {
            return integrate_function(name, &args[0], var);
        }
        return integrate_polynomial(&Expr::pow(base.clone(), factor.exp.clone()), var);
    }

    // b^(ax+c) dx = b^(ax+c) / (a ln b)
    if !base.contains_var(var)
        && let Some((a, _)) = linear_coeffs(&factor.exp, var)
    {
        let power = Expr::pow(base.clone(), factor.exp.clone());
        let ln_base = Expr::func("ln", base.clone());
        return Ok(Expr::div_expr(
            power,
            Expr::mul_expr(Expr::number(a), ln_base),
        ));
    }
    Err(unsupported(&Expr::pow(base.clone(), factor.exp.clone())))
}

/// Registry antiderivative `F(u)` of `f(u)` with a linear `u`, divided by `u'`
fn integrate_function(name: &str, arg: &Expr, var: &str) -> Result<Expr, MathError> {
    let call = Expr::func(name, arg.clone());
    let antiderivative = Registry::get(name)
        .and_then(|def| def.antiderivative)
        .ok_or_else(|| unsupported(&call))?;
    let (a, _) = linear_coeffs(arg, var).ok_or_else(|| unsupported(&call))?;
    Ok(Expr::div_expr(antiderivative(arg), Expr::number(a)))
}

fn integrate_polynomial(expr: &Expr, var: &str) -> Result<Expr, MathError> {
    Polynomial::from_expr(expr, var)
        .map(|p| p.integral().to_expr())
        .ok_or_else(|| unsupported(expr))
}

fn unsupported(expr: &Expr) -> MathError {
    MathError::unsupported(format!("cannot integrate {}", expr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn int(input: &str) -> String {
        integrate(&parse(input).unwrap(), "x").unwrap().to_string()
    }

    #[test]
    fn test_power_rule() {
        assert_eq!(int("x^2"), "x**3/3");
        assert_eq!(int("2x"), "x**2");
        assert_eq!(int("5"), "5*x");
        assert_eq!(int("1/x"), "ln(x)");
        assert_eq!(int("x**(-2)"), "-1/x");
    }

    #[test]
    fn test_trig_and_exponential() {
        assert_eq!(int("sin(x)"), "-cos(x)");
        assert_eq!(int("cos(x)"), "sin(x)");
        assert_eq!(int("e^x"), "exp(x)");
        assert_eq!(int("sin(2x)"), "-cos(2*x)/2");
        assert_eq!(int("2^x"), "2**x/ln(2)");
    }

    #[test]
    fn test_linear_base() {
        assert_eq!(int("1/(x + 1)"), "ln(x + 1)");
        assert_eq!(int("(2*x + 1)**2"), "(2*x + 1)**3/6");
        assert_eq!(int("x*(x + 1)"), "x**3/3 + x**2/2");
    }

    #[test]
    fn test_constant_factors() {
        assert_eq!(int("a*x"), "a*x**2/2");
    }

    #[test]
    fn test_unsupported() {
        let expr = parse("x*exp(x)").unwrap();
        assert!(matches!(integrate(&expr, "x"), Err(MathError::Unsupported(_))));
    }

    #[test]
    fn test_unsupported_names_the_input() {
        let expr = parse("x*sin(x)").unwrap();
        assert_eq!(
            integrate(&expr, "x"),
            Err(MathError::unsupported("cannot integrate x*sin(x)"))
        );
    }
}
