//! Character-level lexer producing parser tokens

use super::tokens::{Operator, Token};
use crate::error::{MathError, Span};
use crate::functions::registry::Registry;

/// Close unclosed parentheses and open unmatched closing ones
pub(crate) fn balance_parentheses(input: &str) -> String {
    let mut depth: i64 = 0;
    let mut missing_open = 0;
    for c in input.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                if depth == 0 {
                    missing_open += 1;
                } else {
                    depth -= 1;
                }
            }
            _ => {}
        }
    }

    if depth == 0 && missing_open == 0 {
        return input.to_string();
    }

    let mut balanced = String::with_capacity(input.len() + (depth + missing_open) as usize);
    for _ in 0..missing_open {
        balanced.push('(');
    }
    balanced.push_str(input);
    for _ in 0..depth {
        balanced.push(')');
    }
    balanced
}

/// Tokenize an expression string
pub(crate) fn lex(input: &str) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,

            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|_| MathError::InvalidNumber {
                    value: text.clone(),
                    span: Some(Span::new(start, i)),
                })?;
                tokens.push(Token::Number(value));
            }

            '+' => {
                tokens.push(Token::Operator(Operator::Add));
                i += 1;
            }
            '-' | '−' => {
                tokens.push(Token::Operator(Operator::Sub));
                i += 1;
            }
            '*' => {
                if chars.get(i + 1) == Some(&'*') {
                    tokens.push(Token::Operator(Operator::Pow));
                    i += 2;
                } else {
                    tokens.push(Token::Operator(Operator::Mul));
                    i += 1;
                }
            }
            '·' | '×' => {
                tokens.push(Token::Operator(Operator::Mul));
                i += 1;
            }
            '/' | '÷' => {
                tokens.push(Token::Operator(Operator::Div));
                i += 1;
            }
            '^' => {
                tokens.push(Token::Operator(Operator::Pow));
                i += 1;
            }
            '²' | '³' => {
                tokens.push(Token::Operator(Operator::Pow));
                tokens.push(Token::Number(if c == '²' { 2.0 } else { 3.0 }));
                i += 1;
            }
            '(' | '[' | '{' => {
                tokens.push(Token::LeftParen);
                i += 1;
            }
            ')' | ']' | '}' => {
                tokens.push(Token::RightParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            '√' => {
                tokens.push(Token::Function("sqrt"));
                i += 1;
            }
            'π' => {
                tokens.push(Token::Identifier("pi".to_string()));
                i += 1;
            }

            c if c.is_ascii_alphabetic() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_alphabetic() {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                split_identifier(&word, &mut tokens);
            }

            other => {
                return Err(MathError::invalid_token_at(other.to_string(), Span::at(i)));
            }
        }
    }

    Ok(tokens)
}

/// Split a run of letters into function names, `pi` and single-letter symbols
///
/// `sin` → function, `xy` → `x`, `y`, `xsin` → `x`, `sin`.
fn split_identifier(word: &str, tokens: &mut Vec<Token>) {
    if let Some(name) = Registry::canonical_name(word) {
        tokens.push(Token::Function(name));
        return;
    }

    let mut rest = word;
    while !rest.is_empty() {
        if let Some((name, len)) = Registry::longest_prefix(rest) {
            tokens.push(Token::Function(name));
            rest = &rest[len..];
        } else if rest.starts_with("pi") {
            tokens.push(Token::Identifier("pi".to_string()));
            rest = &rest[2..];
        } else {
            // ASCII letters only, so slicing one byte is a char boundary
            tokens.push(Token::Identifier(rest[..1].to_string()));
            rest = &rest[1..];
        }
    }
}
