//! Simplification framework - reduces expressions to a canonical form
pub(crate) mod terms;

use crate::numeric::{is_integer, split_square};
use crate::{Expr, ExprKind};
use terms::{build_sum, combine, terms_of};

/// Simplify an expression
///
/// Works bottom-up: children are simplified first, then numeric functions
/// with exact special values are evaluated (`sin(0)`, `sqrt(16)`, `ln(1)`)
/// and every arithmetic node is rebuilt from its canonical sum-of-products
/// form. The result is deterministic, so structurally different inputs with
/// the same canonical form render identically.
///
/// # Example
/// ```
/// use mathly::{parse, simplify_expr};
///
/// let expr = parse("3*(2*x) + x*x - 6*x + 2/4").unwrap();
/// assert_eq!(simplify_expr(&expr).to_string(), "x**2 + 1/2");
/// ```
pub fn simplify_expr(expr: &Expr) -> Expr {
    match &expr.kind {
        ExprKind::Number(n) => terms::number_expr(*n),
        ExprKind::Symbol(_) => expr.clone(),
        ExprKind::FunctionCall { name, args } => {
            let args: Vec<Expr> = args.iter().map(simplify_expr).collect();
            apply_function_rules(name, args)
        }
        ExprKind::Add(u, v) => canonical(&Expr::add_expr(simplify_expr(u), simplify_expr(v))),
        ExprKind::Sub(u, v) => canonical(&Expr::sub_expr(simplify_expr(u), simplify_expr(v))),
        ExprKind::Mul(u, v) => canonical(&Expr::mul_expr(simplify_expr(u), simplify_expr(v))),
        ExprKind::Div(u, v) => canonical(&Expr::div_expr(simplify_expr(u), simplify_expr(v))),
        ExprKind::Pow(u, v) => canonical(&Expr::pow(simplify_expr(u), simplify_expr(v))),
    }
}

/// Whether some divisor (or base raised to a negative power) simplifies to zero
pub(crate) fn has_zero_divisor(expr: &Expr) -> bool {
    match &expr.kind {
        ExprKind::Number(_) | ExprKind::Symbol(_) => false,
        ExprKind::FunctionCall { args, .. } => args.iter().any(has_zero_divisor),
        ExprKind::Div(u, v) => {
            simplify_expr(v).is_zero_num() || has_zero_divisor(u) || has_zero_divisor(v)
        }
        ExprKind::Pow(u, v) => {
            let negative = simplify_expr(v).as_number().is_some_and(|n| n < 0.0);
            (negative && simplify_expr(u).is_zero_num()) || has_zero_divisor(u) || has_zero_divisor(v)
        }
        ExprKind::Add(u, v) | ExprKind::Sub(u, v) | ExprKind::Mul(u, v) => {
            has_zero_divisor(u) || has_zero_divisor(v)
        }
    }
}

fn canonical(expr: &Expr) -> Expr {
    build_sum(&combine(terms_of(expr)))
}

/// Exact values and inverse pairs for built-in functions
fn apply_function_rules(name: &str, args: Vec<Expr>) -> Expr {
    if args.len() != 1 {
        return Expr::func_multi(name, args);
    }
    let arg = &args[0];

    // exp(ln(u)) = u, ln(exp(u)) = u
    if let ExprKind::FunctionCall {
        name: inner,
        args: inner_args,
    } = &arg.kind
        && inner_args.len() == 1
        && ((name == "exp" && inner == "ln") || (name == "ln" && inner == "exp"))
    {
        return inner_args[0].clone();
    }

    if name == "ln" && arg.as_symbol() == Some("e") {
        return Expr::number(1.0);
    }

    let Some(n) = arg.as_number() else {
        return Expr::func(name, arg.clone());
    };

    let exact = match name {
        "sin" | "tan" | "asin" | "atan" | "sinh" | "tanh" if n == 0.0 => Some(0.0),
        "cos" | "cosh" | "exp" if n == 0.0 => Some(1.0),
        "ln" | "acos" if n == 1.0 => Some(0.0),
        "abs" => Some(n.abs()),
        "sqrt" if n >= 0.0 && is_integer(n.sqrt()) => Some(n.sqrt().round()),
        _ => None,
    };
    if let Some(value) = exact {
        return Expr::number(value);
    }

    // sqrt(k^2 * m) = k * sqrt(m)
    if name == "sqrt" && n > 0.0 && is_integer(n) && n < 1e12 {
        let (outside, inside) = split_square(n as u64);
        if outside > 1 {
            return Expr::mul_expr(
                Expr::number(outside as f64),
                Expr::func("sqrt", Expr::number(inside as f64)),
            );
        }
    }

    Expr::func(name, arg.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn simp(input: &str) -> String {
        simplify_expr(&parse(input).unwrap()).to_string()
    }

    #[test]
    fn test_like_terms() {
        assert_eq!(simp("x + x"), "2*x");
        assert_eq!(simp("3*x**2 + 2*x - x**2"), "2*x**2 + 2*x");
        assert_eq!(simp("x - x"), "0");
    }

    #[test]
    fn test_numeric_folding() {
        assert_eq!(simp("2 + 3 * 4"), "14");
        assert_eq!(simp("6/4"), "3/2");
        assert_eq!(simp("2**10"), "1024");
    }

    #[test]
    fn test_powers_merge() {
        assert_eq!(simp("x * x**2"), "x**3");
        assert_eq!(simp("x**3 / x"), "x**2");
        assert_eq!(simp("x / x"), "1");
        assert_eq!(simp("(2*x)**2"), "4*x**2");
        assert_eq!(simp("sqrt(x)**2"), "x");
    }

    #[test]
    fn test_distribution_over_single_sum() {
        assert_eq!(simp("2*(x + 1)"), "2*x + 2");
        assert_eq!(simp("-(x - 3)"), "-x + 3");
    }

    #[test]
    fn test_zero_divisors() {
        let zero_divisor = |input: &str| has_zero_divisor(&parse(input).unwrap());
        assert!(zero_divisor("x/0"));
        assert!(zero_divisor("1/(x - x)"));
        assert!(zero_divisor("sin(2/(3 - 3))"));
        assert!(zero_divisor("0**(-1)"));
        assert!(!zero_divisor("1/x"));
        assert!(!zero_divisor("0/5"));
        assert!(!zero_divisor("0**2"));
    }

    #[test]
    fn test_function_values() {
        assert_eq!(simp("sin(0)"), "0");
        assert_eq!(simp("cos(0) + exp(0)"), "2");
        assert_eq!(simp("sqrt(16)"), "4");
        assert_eq!(simp("sqrt(8)"), "2*sqrt(2)");
        assert_eq!(simp("ln(exp(x))"), "x");
        assert_eq!(simp("e^x"), "exp(x)");
    }

    #[test]
    fn test_quotients() {
        assert_eq!(simp("x**2/2"), "x**2/2");
        assert_eq!(simp("1/(x + 1)"), "1/(x + 1)");
        assert_eq!(simp("3*x/6"), "x/2");
    }

    #[test]
    fn test_idempotent() {
        for input in ["x**2 - 5*x + 6", "(x*cos(x) - sin(x))/x**2", "-cos(x)", "x**3/3 + sin(x)"] {
            let once = simplify_expr(&parse(input).unwrap());
            let twice = simplify_expr(&once);
            assert_eq!(once, twice, "{input}");
        }
    }
}
