// Differentiation engine - applies calculus rules
//
// Inline checks (0 + x -> x, 1 * x -> x) keep intermediate trees small; the
// simplifier cleans up whatever remains once the derivative is built.

use crate::functions::registry::Registry;
use crate::simplification::simplify_expr;
use crate::{Expr, ExprKind, MathError};

/// Differentiate and simplify
///
/// # Example
/// ```
/// use mathly::{differentiate, parse};
///
/// let expr = parse("3x^2 + 2x").unwrap();
/// assert_eq!(differentiate(&expr, "x").unwrap().to_string(), "6*x + 2");
/// ```
///
/// # Errors
/// Returns `MathError::Unsupported` for functions without a derivative rule.
pub fn differentiate(expr: &Expr, var: &str) -> Result<Expr, MathError> {
    Ok(simplify_expr(&expr.derive(var)?))
}

fn add_opt(a: Expr, b: Expr) -> Expr {
    if a.is_zero_num() {
        b
    } else if b.is_zero_num() {
        a
    } else {
        Expr::add_expr(a, b)
    }
}

fn sub_opt(a: Expr, b: Expr) -> Expr {
    if b.is_zero_num() {
        a
    } else if a.is_zero_num() {
        Expr::neg(b)
    } else {
        Expr::sub_expr(a, b)
    }
}

fn mul_opt(a: Expr, b: Expr) -> Expr {
    crate::functions::mul_opt(a, b)
}

impl Expr {
    /// Differentiate this expression with respect to a variable, unsimplified
    pub(crate) fn derive(&self, var: &str) -> Result<Expr, MathError> {
        let result = match &self.kind {
            ExprKind::Number(_) => Expr::number(0.0),

            ExprKind::Symbol(name) => {
                if name == var {
                    Expr::number(1.0)
                } else {
                    Expr::number(0.0)
                }
            }

            ExprKind::FunctionCall { name, args } => {
                if !self.contains_var(var) {
                    return Ok(Expr::number(0.0));
                }
                let def = Registry::get(name)
                    .filter(|def| def.validate_arity(args.len()))
                    .ok_or_else(|| {
                        MathError::unsupported(format!("no derivative rule for '{}'", name))
                    })?;
                let arg_primes = args
                    .iter()
                    .map(|arg| arg.derive(var))
                    .collect::<Result<Vec<_>, _>>()?;
                (def.derivative)(args, &arg_primes)
            }

            // Sum rule: (u + v)' = u' + v'
            ExprKind::Add(u, v) => add_opt(u.derive(var)?, v.derive(var)?),

            ExprKind::Sub(u, v) => sub_opt(u.derive(var)?, v.derive(var)?),

            // Product rule: (u*v)' = u'v + uv'
            ExprKind::Mul(u, v) => {
                let u_prime = u.derive(var)?;
                let v_prime = v.derive(var)?;
                add_opt(
                    mul_opt(u_prime, (**v).clone()),
                    mul_opt((**u).clone(), v_prime),
                )
            }

            // Quotient rule: (u/v)' = (u'v - uv') / v^2
            ExprKind::Div(u, v) => {
                let u_prime = u.derive(var)?;
                let v_prime = v.derive(var)?;
                if v_prime.is_zero_num() {
                    // Constant denominator: u'/v
                    if u_prime.is_zero_num() {
                        Expr::number(0.0)
                    } else {
                        Expr::div_expr(u_prime, (**v).clone())
                    }
                } else {
                    let numerator = sub_opt(
                        mul_opt(u_prime, (**v).clone()),
                        mul_opt((**u).clone(), v_prime),
                    );
                    Expr::div_expr(numerator, Expr::pow((**v).clone(), Expr::number(2.0)))
                }
            }

            ExprKind::Pow(u, v) => {
                if !v.contains_var(var) {
                    // Power rule: (u^n)' = n * u^(n-1) * u'
                    let u_prime = u.derive(var)?;
                    if u_prime.is_zero_num() {
                        return Ok(Expr::number(0.0));
                    }
                    let n_minus_1 = match v.as_number() {
                        Some(n) => Expr::number(n - 1.0),
                        None => Expr::sub_expr((**v).clone(), Expr::number(1.0)),
                    };
                    mul_opt(
                        mul_opt((**v).clone(), Expr::pow((**u).clone(), n_minus_1)),
                        u_prime,
                    )
                } else {
                    // Variable exponent - logarithmic differentiation
                    // d/dx[u^v] = u^v * (v' * ln(u) + v * u'/u)
                    let u_prime = u.derive(var)?;
                    let v_prime = v.derive(var)?;

                    let ln_u = if u.as_symbol() == Some("e") {
                        // ln(e) = 1
                        Expr::number(1.0)
                    } else if u.is_one_num() {
                        Expr::number(0.0)
                    } else {
                        Expr::func("ln", (**u).clone())
                    };
                    let term1 = if ln_u.is_zero_num() {
                        Expr::number(0.0)
                    } else {
                        mul_opt(v_prime, ln_u)
                    };
                    let term2 = if u_prime.is_zero_num() {
                        Expr::number(0.0)
                    } else {
                        mul_opt(
                            (**v).clone(),
                            Expr::div_expr(u_prime, (**u).clone()),
                        )
                    };

                    let sum = add_opt(term1, term2);
                    mul_opt(Expr::pow((**u).clone(), (**v).clone()), sum)
                }
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn d(input: &str) -> String {
        differentiate(&parse(input).unwrap(), "x").unwrap().to_string()
    }

    #[test]
    fn test_polynomial_rules() {
        assert_eq!(d("x**3"), "3*x**2");
        assert_eq!(d("3x^2 + 2x + 1"), "6*x + 2");
        assert_eq!(d("x**2 - 5*x + 6"), "2*x - 5");
        assert_eq!(d("7"), "0");
    }

    #[test]
    fn test_derive_subtraction() {
        // (x - 1)' = 1
        let expr = Expr::sub_expr(Expr::symbol("x"), Expr::number(1.0));
        assert_eq!(expr.derive("x").unwrap(), Expr::number(1.0));
    }

    #[test]
    fn test_chain_rule() {
        assert_eq!(d("sin(2x)"), "2*cos(2*x)");
        assert_eq!(d("cos(x)"), "-sin(x)");
        assert_eq!(d("exp(x**2)"), "2*x*exp(x**2)");
    }

    #[test]
    fn test_product_and_quotient_rules() {
        assert_eq!(d("x*sin(x)"), "x*cos(x) + sin(x)");
        assert_eq!(d("sin(x)/x"), "(x*cos(x) - sin(x))/x**2");
    }

    #[test]
    fn test_exponential_base() {
        assert_eq!(d("e^x"), "exp(x)");
        assert_eq!(d("2^x"), "2**x*ln(2)");
    }

    #[test]
    fn test_other_variable_is_constant() {
        let expr = parse("x*y + y**2").unwrap();
        assert_eq!(differentiate(&expr, "x").unwrap().to_string(), "y");
    }

    #[test]
    fn test_unknown_function_is_unsupported() {
        let expr = Expr::func("mystery", Expr::symbol("x"));
        assert!(matches!(expr.derive("x"), Err(MathError::Unsupported(_))));
    }
}
