//! Parser module - converts strings to AST
mod implicit_mul;
mod lexer;
mod pratt;
mod tokens;

use crate::{Expr, MathError};

/// Parse an expression string into an `Expr` AST
///
/// Accepts both `**` and `^` for powers, implicit multiplication (`2x`,
/// `(x+1)(x-1)`), unicode operators (`·`, `×`, `÷`, `²`) and the built-in
/// function names of the function registry.
///
/// # Example
/// ```
/// use mathly::parse;
///
/// let expr = parse("3x^2 + 2x").unwrap();
/// assert_eq!(expr.to_string(), "3*x**2 + 2*x");
/// ```
///
/// # Errors
/// Returns `MathError` if the input is empty, contains characters outside the
/// expression grammar, or is syntactically malformed.
pub fn parse(input: &str) -> Result<Expr, MathError> {
    // Pipeline: validate -> balance -> lex -> implicit_mul -> parse
    if input.trim().is_empty() {
        return Err(MathError::EmptyFormula);
    }

    let balanced = lexer::balance_parentheses(input);
    let tokens = lexer::lex(&balanced)?;
    let tokens = implicit_mul::insert_implicit_multiplication(tokens);
    pratt::parse_expression(&tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pipeline() {
        assert_eq!(parse("2x").unwrap().to_string(), "2*x");
        assert_eq!(parse("(x+2)(x+3)").unwrap().to_string(), "(x + 2)*(x + 3)");
        assert_eq!(parse("sin(x)/x").unwrap().to_string(), "sin(x)/x");
        assert_eq!(parse("e^x").unwrap().to_string(), "exp(x)");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(parse("   "), Err(MathError::EmptyFormula));
        assert!(parse("x +").is_err());
        assert!(parse("sin x").is_err());
        assert!(parse("2 = x").is_err());
    }
}
