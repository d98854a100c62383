//! Step-by-step explanation templates
//!
//! One template per problem family. Each takes normalized text, asks the
//! engine for the result and narrates it through a [`StepsBuilder`]. Engine
//! failures propagate as `MathError`; formatting for display happens once in
//! [`StepsBuilder::finish`].
//!
//! [`StepsBuilder`]: super::steps::StepsBuilder
//! [`StepsBuilder::finish`]: super::steps::StepsBuilder::finish

mod calculus;
mod equation;
mod limit;
mod rewrite;

pub use calculus::{explain_derivative, explain_integral};
pub use equation::explain_equation;
pub use limit::{explain_limit, parse_point};
pub use rewrite::{explain_expansion, explain_factoring};

use crate::{Expr, MathError, SymbolicEngine};

/// An addend of a sum as written, with the sign that joins it to the previous one
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Term {
    pub subtracted: bool,
    pub text: String,
}

/// Split `text` into top-level addends
///
/// Signs inside parentheses and unary signs (after an operator, a `(` or at
/// the start) do not split. A leading unary minus stays part of the first term.
pub(crate) fn split_terms(text: &str) -> Vec<Term> {
    let mut terms = Vec::new();
    let mut current = String::new();
    let mut subtracted = false;
    let mut depth = 0usize;
    let mut previous: Option<char> = None;

    for c in text.chars() {
        let binary = depth == 0
            && matches!(c, '+' | '-')
            && previous.is_some_and(|p| !matches!(p, '+' | '-' | '*' | '/' | '^' | '(' | ','));
        if binary {
            push_term(&mut terms, &current, subtracted);
            current.clear();
            subtracted = c == '-';
        } else {
            match c {
                '(' => depth += 1,
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            }
            current.push(c);
        }
        if !c.is_whitespace() {
            previous = Some(c);
        }
    }
    push_term(&mut terms, &current, subtracted);
    terms
}

fn push_term(terms: &mut Vec<Term>, text: &str, subtracted: bool) {
    let text = text.trim();
    if !text.is_empty() {
        terms.push(Term {
            subtracted,
            text: text.to_string(),
        });
    }
}

/// Parse one addend, negated when it was subtracted
pub(crate) fn parse_term<E: SymbolicEngine + ?Sized>(
    engine: &E,
    term: &Term,
) -> Result<Expr, MathError> {
    let expr = engine.parse(&term.text)?;
    Ok(if term.subtracted { Expr::neg(expr) } else { expr })
}

/// How a term is written in a per-term line: `-term` when subtracted
pub(crate) fn signed_text(term: &Term) -> String {
    if term.subtracted {
        format!("-{}", term.text)
    } else {
        term.text.clone()
    }
}

/// Variable an expression is most likely about: `preferred` if it occurs,
/// else the first variable in name order
pub(crate) fn main_variable(expr: &Expr, preferred: &str) -> Option<String> {
    let vars = expr.variables();
    if vars.contains(preferred) {
        Some(preferred.to_string())
    } else {
        vars.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn texts(text: &str) -> Vec<String> {
        split_terms(text).iter().map(signed_text).collect()
    }

    #[test]
    fn test_split_terms() {
        assert_eq!(texts("3*x**2 + 2*x"), ["3*x**2", "2*x"]);
        assert_eq!(texts("x**3 - 2*x + 1"), ["x**3", "-2*x", "1"]);
        assert_eq!(texts("-x**2 + 3"), ["-x**2", "3"]);
        assert_eq!(texts("sin(x - 1)*(x + 2)"), ["sin(x - 1)*(x + 2)"]);
        assert_eq!(texts("x**-1 + x"), ["x**-1", "x"]);
        assert_eq!(texts("2*-x"), ["2*-x"]);
        assert!(split_terms("   ").is_empty());
    }

    #[test]
    fn test_main_variable() {
        let expr = parse("a*t^2 + x").unwrap();
        assert_eq!(main_variable(&expr, "x"), Some("x".to_string()));
        let expr = parse("a*t^2").unwrap();
        assert_eq!(main_variable(&expr, "x"), Some("a".to_string()));
        assert_eq!(main_variable(&parse("2 + pi").unwrap(), "x"), None);
    }
}
