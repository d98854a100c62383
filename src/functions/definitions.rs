//! Mathematical function definitions for the function registry
//!
//! Contains evaluation, differentiation and (where closed-form) integration
//! rules for every built-in function. Evaluation returns `None` outside the
//! real domain of the function.

use super::registry::FunctionDefinition;
use super::{div_opt, func, mul_opt, neg, powi};
use crate::Expr;

fn non_zero(v: f64) -> Option<f64> {
    if v.abs() < 1e-15 { None } else { Some(v) }
}

/// Return all function definitions for populating the registry
pub(crate) fn all_definitions() -> Vec<FunctionDefinition> {
    vec![
        // Trigonometric
        FunctionDefinition {
            name: "sin",
            arity: 1..=1,
            eval: |args| Some(args[0].sin()),
            derivative: |args, arg_primes| {
                // d/dx sin(u) = cos(u) * u'
                mul_opt(func("cos", args[0].clone()), arg_primes[0].clone())
            },
            antiderivative: Some(|u| neg(func("cos", u.clone()))),
        },
        FunctionDefinition {
            name: "cos",
            arity: 1..=1,
            eval: |args| Some(args[0].cos()),
            derivative: |args, arg_primes| {
                // d/dx cos(u) = -sin(u) * u'
                mul_opt(neg(func("sin", args[0].clone())), arg_primes[0].clone())
            },
            antiderivative: Some(|u| func("sin", u.clone())),
        },
        FunctionDefinition {
            name: "tan",
            arity: 1..=1,
            eval: |args| non_zero(args[0].cos()).map(|c| args[0].sin() / c),
            derivative: |args, arg_primes| {
                // d/dx tan(u) = sec(u)^2 * u'
                mul_opt(powi(func("sec", args[0].clone()), 2.0), arg_primes[0].clone())
            },
            antiderivative: Some(|u| neg(func("ln", func("cos", u.clone())))),
        },
        FunctionDefinition {
            name: "sec",
            arity: 1..=1,
            eval: |args| non_zero(args[0].cos()).map(|c| 1.0 / c),
            derivative: |args, arg_primes| {
                // d/dx sec(u) = sec(u) tan(u) * u'
                let u = &args[0];
                mul_opt(
                    Expr::mul_expr(func("sec", u.clone()), func("tan", u.clone())),
                    arg_primes[0].clone(),
                )
            },
            antiderivative: None,
        },
        FunctionDefinition {
            name: "csc",
            arity: 1..=1,
            eval: |args| non_zero(args[0].sin()).map(|s| 1.0 / s),
            derivative: |args, arg_primes| {
                // d/dx csc(u) = -csc(u) cot(u) * u'
                let u = &args[0];
                mul_opt(
                    neg(Expr::mul_expr(func("csc", u.clone()), func("cot", u.clone()))),
                    arg_primes[0].clone(),
                )
            },
            antiderivative: None,
        },
        FunctionDefinition {
            name: "cot",
            arity: 1..=1,
            eval: |args| non_zero(args[0].sin()).map(|s| args[0].cos() / s),
            derivative: |args, arg_primes| {
                // d/dx cot(u) = -csc(u)^2 * u'
                mul_opt(
                    neg(powi(func("csc", args[0].clone()), 2.0)),
                    arg_primes[0].clone(),
                )
            },
            antiderivative: Some(|u| func("ln", func("sin", u.clone()))),
        },
        // Inverse trigonometric
        FunctionDefinition {
            name: "asin",
            arity: 1..=1,
            eval: |args| (args[0].abs() <= 1.0).then(|| args[0].asin()),
            derivative: |args, arg_primes| {
                // d/dx asin(u) = u' / sqrt(1 - u^2)
                let root = func(
                    "sqrt",
                    Expr::sub_expr(Expr::number(1.0), powi(args[0].clone(), 2.0)),
                );
                div_opt(arg_primes[0].clone(), root)
            },
            antiderivative: None,
        },
        FunctionDefinition {
            name: "acos",
            arity: 1..=1,
            eval: |args| (args[0].abs() <= 1.0).then(|| args[0].acos()),
            derivative: |args, arg_primes| {
                // d/dx acos(u) = -u' / sqrt(1 - u^2)
                let root = func(
                    "sqrt",
                    Expr::sub_expr(Expr::number(1.0), powi(args[0].clone(), 2.0)),
                );
                neg(div_opt(arg_primes[0].clone(), root))
            },
            antiderivative: None,
        },
        FunctionDefinition {
            name: "atan",
            arity: 1..=1,
            eval: |args| Some(args[0].atan()),
            derivative: |args, arg_primes| {
                // d/dx atan(u) = u' / (1 + u^2)
                div_opt(
                    arg_primes[0].clone(),
                    Expr::add_expr(Expr::number(1.0), powi(args[0].clone(), 2.0)),
                )
            },
            antiderivative: None,
        },
        // Hyperbolic
        FunctionDefinition {
            name: "sinh",
            arity: 1..=1,
            eval: |args| Some(args[0].sinh()),
            derivative: |args, arg_primes| {
                mul_opt(func("cosh", args[0].clone()), arg_primes[0].clone())
            },
            antiderivative: Some(|u| func("cosh", u.clone())),
        },
        FunctionDefinition {
            name: "cosh",
            arity: 1..=1,
            eval: |args| Some(args[0].cosh()),
            derivative: |args, arg_primes| {
                mul_opt(func("sinh", args[0].clone()), arg_primes[0].clone())
            },
            antiderivative: Some(|u| func("sinh", u.clone())),
        },
        FunctionDefinition {
            name: "tanh",
            arity: 1..=1,
            eval: |args| Some(args[0].tanh()),
            derivative: |args, arg_primes| {
                // d/dx tanh(u) = (1 - tanh(u)^2) * u'
                mul_opt(
                    Expr::sub_expr(Expr::number(1.0), powi(func("tanh", args[0].clone()), 2.0)),
                    arg_primes[0].clone(),
                )
            },
            antiderivative: Some(|u| func("ln", func("cosh", u.clone()))),
        },
        // Exponential and logarithmic
        FunctionDefinition {
            name: "exp",
            arity: 1..=1,
            eval: |args| Some(args[0].exp()),
            derivative: |args, arg_primes| {
                mul_opt(func("exp", args[0].clone()), arg_primes[0].clone())
            },
            antiderivative: Some(|u| func("exp", u.clone())),
        },
        FunctionDefinition {
            name: "ln",
            arity: 1..=1,
            eval: |args| (args[0] > 0.0).then(|| args[0].ln()),
            derivative: |args, arg_primes| {
                // d/dx ln(u) = u' / u
                Expr::div_expr(arg_primes[0].clone(), args[0].clone())
            },
            antiderivative: Some(|u| {
                // u ln(u) - u
                Expr::sub_expr(
                    Expr::mul_expr(u.clone(), func("ln", u.clone())),
                    u.clone(),
                )
            }),
        },
        FunctionDefinition {
            name: "sqrt",
            arity: 1..=1,
            eval: |args| (args[0] >= 0.0).then(|| args[0].sqrt()),
            derivative: |args, arg_primes| {
                // d/dx sqrt(u) = u' / (2 sqrt(u))
                Expr::div_expr(
                    arg_primes[0].clone(),
                    Expr::mul_expr(Expr::number(2.0), func("sqrt", args[0].clone())),
                )
            },
            antiderivative: Some(|u| {
                // 2/3 u^(3/2)
                Expr::div_expr(
                    Expr::mul_expr(Expr::number(2.0), powi(u.clone(), 1.5)),
                    Expr::number(3.0),
                )
            }),
        },
        FunctionDefinition {
            name: "abs",
            arity: 1..=1,
            eval: |args| Some(args[0].abs()),
            derivative: |args, arg_primes| {
                // d/dx |u| = u u' / |u|
                Expr::div_expr(
                    mul_opt(args[0].clone(), arg_primes[0].clone()),
                    func("abs", args[0].clone()),
                )
            },
            antiderivative: None,
        },
    ]
}
