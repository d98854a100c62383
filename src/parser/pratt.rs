use super::tokens::{Operator, Token, describe};
use crate::{Expr, MathError};

/// Binding power of prefix minus: between Mul (20) and Pow (30),
/// so `-x^2` parses as `-(x^2)`
const UNARY_PRECEDENCE: u8 = 25;

/// Parse tokens into an AST using Pratt parsing algorithm
pub(crate) fn parse_expression(tokens: &[Token]) -> Result<Expr, MathError> {
    if tokens.is_empty() {
        return Err(MathError::UnexpectedEndOfInput);
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0)?;

    if let Some(token) = parser.current() {
        return Err(MathError::UnexpectedToken {
            expected: "end of input".to_string(),
            got: token.to_user_string(),
            span: None,
        });
    }
    Ok(expr)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn expect_right_paren(&mut self) -> Result<(), MathError> {
        if let Some(Token::RightParen) = self.current() {
            self.advance();
            Ok(())
        } else {
            Err(MathError::UnexpectedToken {
                expected: ")".to_string(),
                got: describe(self.current()),
                span: None,
            })
        }
    }

    fn parse_expr(&mut self, min_precedence: u8) -> Result<Expr, MathError> {
        let mut left = self.parse_prefix()?;

        while let Some(Token::Operator(op)) = self.current() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            left = self.parse_infix(left, *op)?;
        }

        Ok(left)
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>, MathError> {
        let mut args = Vec::new();

        loop {
            args.push(self.parse_expr(0)?);

            match self.current() {
                Some(Token::Comma) => self.advance(),
                Some(Token::RightParen) => break,
                other => {
                    return Err(MathError::UnexpectedToken {
                        expected: ", or )".to_string(),
                        got: describe(other),
                        span: None,
                    });
                }
            }
        }

        Ok(args)
    }

    fn parse_prefix(&mut self) -> Result<Expr, MathError> {
        let token = self.current().ok_or(MathError::UnexpectedEndOfInput)?;

        match token {
            Token::Number(n) => {
                self.advance();
                Ok(Expr::number(*n))
            }

            Token::Identifier(name) => {
                self.advance();
                Ok(Expr::symbol(name.clone()))
            }

            Token::Function(name) => {
                self.advance();
                if let Some(Token::LeftParen) = self.current() {
                    self.advance();
                    let args = self.parse_arguments()?;
                    self.expect_right_paren()?;
                    Ok(Expr::func_multi(*name, args))
                } else {
                    Err(MathError::UnexpectedToken {
                        expected: "(".to_string(),
                        got: describe(self.current()),
                        span: None,
                    })
                }
            }

            Token::Operator(Operator::Sub) => {
                self.advance();
                let expr = self.parse_expr(UNARY_PRECEDENCE)?;
                // Fold literal negatives directly
                Ok(match expr.as_number() {
                    Some(n) => Expr::number(-n),
                    None => Expr::neg(expr),
                })
            }

            Token::Operator(Operator::Add) => {
                self.advance();
                self.parse_expr(UNARY_PRECEDENCE)
            }

            Token::LeftParen => {
                self.advance();
                let expr = self.parse_expr(0)?;
                self.expect_right_paren()?;
                Ok(expr)
            }

            other => Err(MathError::InvalidToken {
                token: other.to_user_string(),
                span: None,
            }),
        }
    }

    fn parse_infix(&mut self, left: Expr, op: Operator) -> Result<Expr, MathError> {
        self.advance();

        // Right associative for power, left for others
        let next_precedence = if op == Operator::Pow {
            op.precedence()
        } else {
            op.precedence() + 1
        };

        let right = self.parse_expr(next_precedence)?;

        Ok(match op {
            Operator::Add => Expr::add_expr(left, right),
            Operator::Sub => Expr::sub_expr(left, right),
            Operator::Mul => Expr::mul_expr(left, right),
            Operator::Div => Expr::div_expr(left, right),
            Operator::Pow => Expr::pow(left, right),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExprKind;

    #[test]
    fn test_parse_number() {
        let tokens = vec![Token::Number(3.14)];
        let ast = parse_expression(&tokens).unwrap();
        assert_eq!(ast, Expr::number(3.14));
    }

    #[test]
    fn test_precedence() {
        // x + 2 * 3 should be x + (2 * 3)
        let tokens = vec![
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Add),
            Token::Number(2.0),
            Token::Operator(Operator::Mul),
            Token::Number(3.0),
        ];
        let ast = parse_expression(&tokens).unwrap();

        match &ast.kind {
            ExprKind::Add(left, right) => {
                assert!(matches!(left.kind, ExprKind::Symbol(_)));
                assert!(matches!(right.kind, ExprKind::Mul(_, _)));
            }
            _ => panic!("Expected Add at top level"),
        }
    }

    #[test]
    fn test_power_right_associative() {
        // 2 ** 3 ** 2 is 2 ** (3 ** 2)
        let tokens = vec![
            Token::Number(2.0),
            Token::Operator(Operator::Pow),
            Token::Number(3.0),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ];
        let ast = parse_expression(&tokens).unwrap();
        match &ast.kind {
            ExprKind::Pow(_, right) => assert!(matches!(right.kind, ExprKind::Pow(_, _))),
            _ => panic!("Expected Pow at top level"),
        }
    }

    #[test]
    fn test_unary_minus_below_power() {
        let tokens = vec![
            Token::Operator(Operator::Sub),
            Token::Identifier("x".to_string()),
            Token::Operator(Operator::Pow),
            Token::Number(2.0),
        ];
        let ast = parse_expression(&tokens).unwrap();
        assert_eq!(ast.to_string(), "-x**2");
    }

    #[test]
    fn test_empty_parentheses() {
        let tokens = vec![Token::LeftParen, Token::RightParen];
        assert!(parse_expression(&tokens).is_err());
    }

    #[test]
    fn test_trailing_tokens_rejected() {
        let tokens = vec![Token::Number(1.0), Token::RightParen];
        assert!(parse_expression(&tokens).is_err());
    }
}
