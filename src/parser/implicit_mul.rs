//! Implicit multiplication insertion for natural notation
//!
//! Inserts `*` operators between tokens where multiplication is implied, e.g. `2x` → `2 * x`.

use super::tokens::{Operator, Token};

/// Check if implicit multiplication should be inserted between two tokens
fn should_insert_mul(current: &Token, next: &Token) -> bool {
    match (current, next) {
        // Number * Identifier: 2x
        // Number * Function: 4 sin(x)
        // Number * (: 2(x)
        // Identifier * Identifier: xy
        // Identifier * Function: x sin(x)
        // Identifier * (: x(y + 1)
        // Identifier * Number: x2
        // ) * anything operand-like: (a)(b), (a)x, (a)2, (a)sin(x)
        (
            Token::Number(_) | Token::Identifier(_) | Token::RightParen,
            Token::Identifier(_) | Token::Function(_) | Token::LeftParen,
        )
        | (Token::Identifier(_) | Token::RightParen, Token::Number(_)) => true,

        // Function followed by ( is a call, not multiplication
        _ => false,
    }
}

/// Insert implicit multiplication operators between appropriate tokens
pub(crate) fn insert_implicit_multiplication(tokens: Vec<Token>) -> Vec<Token> {
    let needs_insertion = tokens.windows(2).any(|w| should_insert_mul(&w[0], &w[1]));
    if !needs_insertion {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 3 / 2);
    let mut it = tokens.into_iter().peekable();

    while let Some(current) = it.next() {
        let needs_mul = it.peek().is_some_and(|next| should_insert_mul(&current, next));

        result.push(current);
        if needs_mul {
            result.push(Token::Operator(Operator::Mul));
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_identifier() {
        let tokens = vec![Token::Number(2.0), Token::Identifier("x".into())];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }

    #[test]
    fn test_paren_paren() {
        let tokens = vec![Token::RightParen, Token::LeftParen];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_function_no_multiplication() {
        let tokens = vec![Token::Function("sin"), Token::LeftParen];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_number_function() {
        let tokens = vec![Token::Number(4.0), Token::Function("sin")];
        let result = insert_implicit_multiplication(tokens);
        assert_eq!(result.len(), 3);
        assert!(matches!(result[1], Token::Operator(Operator::Mul)));
    }
}
