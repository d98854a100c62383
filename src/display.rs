// Display formatting for AST, in canonical syntax (`**` for powers, `*` for products)
use crate::numeric::format_number;
use crate::{Expr, ExprKind};
use std::fmt;

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Number(n) => {
                if n.is_nan() {
                    write!(f, "NaN")
                } else {
                    write!(f, "{}", format_number(*n))
                }
            }

            ExprKind::Symbol(s) => write!(f, "{}", s),

            ExprKind::FunctionCall { name, args } => {
                let args_str: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
                write!(f, "{}({})", name, args_str.join(", "))
            }

            ExprKind::Add(u, v) => {
                // A negative right operand reads as subtraction
                if let Some(positive) = negated(v) {
                    write!(f, "{} - {}", u, format_sub_operand(&positive))
                } else {
                    write!(f, "{} + {}", u, v)
                }
            }

            ExprKind::Sub(u, v) => write!(f, "{} - {}", u, format_sub_operand(v)),

            ExprKind::Mul(u, v) => {
                if u.is_neg_one_num() {
                    write!(f, "-{}", format_mul_operand(v))
                } else {
                    write!(f, "{}*{}", format_mul_operand(u), format_mul_right(v))
                }
            }

            ExprKind::Div(u, v) => {
                let formatted_num = match &u.kind {
                    ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", u),
                    _ => u.to_string(),
                };
                // Denominators other than atoms, powers and calls need parentheses
                let formatted_denom = match &v.kind {
                    ExprKind::Symbol(_) | ExprKind::Pow(_, _) | ExprKind::FunctionCall { .. } => {
                        v.to_string()
                    }
                    ExprKind::Number(n) if *n >= 0.0 => v.to_string(),
                    _ => format!("({})", v),
                };
                write!(f, "{}/{}", formatted_num, formatted_denom)
            }

            ExprKind::Pow(u, v) => {
                // e**x displays as exp(x)
                if let ExprKind::Symbol(s) = &u.kind
                    && s == "e"
                {
                    return write!(f, "exp({})", v);
                }
                let formatted_base = match &u.kind {
                    ExprKind::Add(_, _)
                    | ExprKind::Sub(_, _)
                    | ExprKind::Mul(_, _)
                    | ExprKind::Div(_, _)
                    | ExprKind::Pow(_, _) => format!("({})", u),
                    ExprKind::Number(n) if *n < 0.0 => format!("({})", u),
                    _ => u.to_string(),
                };
                let formatted_exp = match &v.kind {
                    ExprKind::Number(n) if *n >= 0.0 => v.to_string(),
                    ExprKind::Symbol(_) => v.to_string(),
                    _ => format!("({})", v),
                };
                write!(f, "{}**{}", formatted_base, formatted_exp)
            }
        }
    }
}

/// The positive counterpart of a negative addend, if it is one
fn negated(expr: &Expr) -> Option<Expr> {
    match &expr.kind {
        ExprKind::Number(n) if *n < 0.0 => Some(Expr::number(-n)),
        ExprKind::Mul(l, r) => match l.as_number() {
            Some(n) if crate::numeric::is_neg_one(n) => Some((**r).clone()),
            Some(n) if n < 0.0 => Some(Expr::mul_expr(Expr::number(-n), (**r).clone())),
            _ => None,
        },
        ExprKind::Div(l, r) => {
            negated(l).map(|positive| Expr::div_expr(positive, (**r).clone()))
        }
        _ => None,
    }
}

fn format_sub_operand(expr: &Expr) -> String {
    if expr.is_sum() {
        format!("({})", expr)
    } else {
        expr.to_string()
    }
}

/// Format operand for multiplication to minimize parentheses
fn format_mul_operand(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Add(_, _) | ExprKind::Sub(_, _) => format!("({})", expr),
        _ => expr.to_string(),
    }
}

fn format_mul_right(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Number(n) if *n < 0.0 => format!("({})", expr),
        ExprKind::Mul(l, _) if l.is_neg_one_num() => format!("({})", expr),
        _ => format_mul_operand(expr),
    }
}

/// Convert canonical syntax into the form shown to users: `**` becomes `^`, then `*` becomes `·`
pub fn render_for_display(text: &str) -> String {
    text.replace("**", "^").replace('*', "·")
}
