/// Binary arithmetic operators understood by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl Operator {
    /// Binding power for the Pratt parser (higher binds tighter)
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Sub => 10,
            Operator::Mul | Operator::Div => 20,
            Operator::Pow => 30,
        }
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    Number(f64),
    /// Single-letter variable or named constant
    Identifier(String),
    /// Canonical name of a built-in function
    Function(&'static str),
    Operator(Operator),
    LeftParen,
    RightParen,
    Comma,
}

impl Token {
    /// Human-readable rendering for error messages
    pub(crate) fn to_user_string(&self) -> String {
        match self {
            Token::Number(n) => crate::numeric::format_number(*n),
            Token::Identifier(name) => name.clone(),
            Token::Function(name) => (*name).to_string(),
            Token::Operator(op) => op.symbol().to_string(),
            Token::LeftParen => "(".to_string(),
            Token::RightParen => ")".to_string(),
            Token::Comma => ",".to_string(),
        }
    }
}

/// Describe an optional token for `UnexpectedToken` errors
pub(crate) fn describe(token: Option<&Token>) -> String {
    token.map_or_else(|| "end of input".to_string(), Token::to_user_string)
}
