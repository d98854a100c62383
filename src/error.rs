use thiserror::Error;

/// Source location span for error reporting
/// Represents a range of characters in the input string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start position (0-indexed char offset)
    pub start: usize,
    /// End position (exclusive)
    pub end: usize,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    /// Create a span for a single position
    pub fn at(pos: usize) -> Self {
        Span {
            start: pos,
            end: pos + 1,
        }
    }

    /// Check if this span has valid location info
    pub fn is_valid(&self) -> bool {
        self.end > self.start
    }

    /// Format the span for display (1-indexed for users)
    pub fn display(&self) -> String {
        if !self.is_valid() {
            String::new()
        } else if self.end - self.start == 1 {
            format!(" at position {}", self.start + 1)
        } else {
            format!(" at positions {}-{}", self.start + 1, self.end)
        }
    }
}

fn span_suffix(span: &Option<Span>) -> String {
    span.map_or(String::new(), |s| s.display())
}

/// Errors raised while parsing, manipulating or evaluating expressions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    // Input validation errors
    #[error("Expression cannot be empty")]
    EmptyFormula,
    #[error("Invalid syntax: {msg}{}", span_suffix(.span))]
    InvalidSyntax { msg: String, span: Option<Span> },

    // Parsing errors
    #[error("Invalid number format: '{value}'{}", span_suffix(.span))]
    InvalidNumber { value: String, span: Option<Span> },
    #[error("Invalid token: '{token}'{}", span_suffix(.span))]
    InvalidToken { token: String, span: Option<Span> },
    #[error("Expected '{expected}', but got '{got}'{}", span_suffix(.span))]
    UnexpectedToken {
        expected: String,
        got: String,
        span: Option<Span>,
    },
    #[error("Unexpected end of input")]
    UnexpectedEndOfInput,

    // Semantic errors
    #[error("Unsupported operation: {0}")]
    Unsupported(String),
    #[error("Division by zero is undefined")]
    DivisionByZero,
    #[error("{0} is undefined")]
    Undefined(String),
    #[error("Unsupported input '{token}': only arithmetic expressions can be evaluated")]
    UnsafeInput { token: String },

    // Safety limits
    #[error("Expression nesting depth exceeds maximum limit")]
    MaxDepthExceeded,
    #[error("Expression size exceeds maximum node count limit")]
    MaxNodesExceeded,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl MathError {
    /// Create InvalidSyntax without span
    pub fn invalid_syntax(msg: impl Into<String>) -> Self {
        MathError::InvalidSyntax {
            msg: msg.into(),
            span: None,
        }
    }

    /// Create InvalidSyntax with span
    pub fn invalid_syntax_at(msg: impl Into<String>, span: Span) -> Self {
        MathError::InvalidSyntax {
            msg: msg.into(),
            span: Some(span),
        }
    }

    /// Create InvalidToken with span
    pub fn invalid_token_at(token: impl Into<String>, span: Span) -> Self {
        MathError::InvalidToken {
            token: token.into(),
            span: Some(span),
        }
    }

    pub fn unsupported(msg: impl Into<String>) -> Self {
        MathError::Unsupported(msg.into())
    }
}
