//! Centralized mathematical function registry
//!
//! This module provides a single source of truth for all built-in functions,
//! including their numeric evaluation, derivative and antiderivative formulas.

use crate::{Expr, ExprKind};

pub(crate) mod definitions;
pub(crate) mod registry;

// ===== Helper functions for building calculus expressions =====

/// Create a function call expression
pub(crate) fn func(name: &str, arg: Expr) -> Expr {
    Expr::func(name, arg)
}

/// Multiply, optimizing for common cases (0 and 1)
pub(crate) fn mul_opt(a: Expr, b: Expr) -> Expr {
    match (&a.kind, &b.kind) {
        (ExprKind::Number(x), _) if *x == 0.0 => Expr::number(0.0),
        (_, ExprKind::Number(x)) if *x == 0.0 => Expr::number(0.0),
        (ExprKind::Number(x), _) if *x == 1.0 => b,
        (_, ExprKind::Number(x)) if *x == 1.0 => a,
        _ => Expr::mul_expr(a, b),
    }
}

/// Divide, skipping division by one
pub(crate) fn div_opt(a: Expr, b: Expr) -> Expr {
    if b.is_one_num() {
        a
    } else {
        Expr::div_expr(a, b)
    }
}

/// Negate an expression
pub(crate) fn neg(e: Expr) -> Expr {
    Expr::neg(e)
}

/// `u**n` for a numeric exponent
pub(crate) fn powi(u: Expr, n: f64) -> Expr {
    Expr::pow(u, Expr::number(n))
}
