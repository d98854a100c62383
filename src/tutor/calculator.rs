//! Restricted arithmetic evaluator
//!
//! A small recursive-descent parser over a fixed set of operators, constants
//! and functions. Anything outside that grammar is rejected as
//! [`MathError::UnsafeInput`] before evaluation starts; nothing in the input
//! is ever executed.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary | unary)*
//! unary   := ('-' | '+') unary | power
//! power   := postfix ('^' unary)?
//! postfix := primary '°'*
//! primary := number | constant | function '(' args ')' | function power | '(' expr ')'
//! ```

use super::pattern;
use super::steps::{SolutionSteps, StepsBuilder};
use crate::MathError;
use crate::numeric::{is_integer, snap};
use regex::Regex;
use std::f64::consts::{E, PI, TAU};
use std::sync::LazyLock;
use tracing::debug;

const CONSTANTS: [(&str, f64); 3] = [("pi", PI), ("e", E), ("tau", TAU)];

const FUNCTIONS: [&str; 21] = [
    "sqrt", "abs", "sin", "cos", "tan", "asin", "acos", "atan", "sinh", "cosh", "tanh", "exp",
    "ln", "log", "log10", "log2", "floor", "ceil", "round", "min", "max",
];

/// Word and symbol spellings rewritten before lexing, in order
static REWRITES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"\bsquare\s+root\s+of\b", "sqrt"),
        (
            r"\b(sqrt|abs|sin|cos|tan|asin|acos|atan|sinh|cosh|tanh|exp|ln|log|log10|log2)\s+of\b",
            "$1",
        ),
        (r"\bmultiplied\s+by\b", " * "),
        (r"\bdivided\s+by\b", " / "),
        (r"\bplus\b", " + "),
        (r"\bminus\b", " - "),
        (r"\btimes\b", " * "),
        (r"\bover\b", " / "),
        (r"\bmod(?:ulo)?\b", " % "),
        (r"\bsquared\b", "^2"),
        (r"\bcubed\b", "^3"),
        (r"\s*\bdegrees?\b", "°"),
        (r"×", "*"),
        (r"÷", "/"),
        (r"−", "-"),
        (r"\*\*", "^"),
    ]
    .into_iter()
    .map(|(src, replacement)| (pattern(src), replacement))
    .collect()
});

/// `x` used as a multiplication sign between two numbers
static TIMES_X: LazyLock<Regex> = LazyLock::new(|| pattern(r"(\d)\s*x\s*(\d)"));

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Num(f64),
    Const(f64),
    Func(&'static str),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Degree,
    LParen,
    RParen,
    Comma,
}

/// Evaluator for plain arithmetic questions
#[derive(Debug, Clone, Copy, Default)]
pub struct Calculator;

impl Calculator {
    pub fn new() -> Self {
        Calculator
    }

    /// Numeric value of `text`
    ///
    /// # Errors
    /// - `UnsafeInput` for identifiers or characters outside the grammar
    /// - `DivisionByZero` for `/ 0` and `% 0`
    /// - `Undefined` for values outside a function's domain
    /// - syntax errors for malformed arithmetic
    pub fn evaluate(&self, text: &str) -> Result<f64, MathError> {
        let prepared = prepare(text);
        debug!(%prepared, "calculator input");
        let tokens = lex(&prepared)?;
        if tokens.is_empty() {
            return Err(MathError::EmptyFormula);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let value = parser.expr()?;
        if let Some(tok) = parser.peek() {
            return Err(MathError::UnexpectedToken {
                expected: "end of input".to_string(),
                got: describe(tok),
                span: None,
            });
        }
        if !value.is_finite() {
            return Err(MathError::Undefined(text.trim().to_string()));
        }
        Ok(snap(value))
    }

    /// `Step 1: Evaluate …` followed by the value
    pub fn explain(&self, text: &str) -> Result<SolutionSteps, MathError> {
        let value = self.evaluate(text)?;
        let mut steps = StepsBuilder::new();
        steps.step(format!("Evaluate {}", text.trim()));
        Ok(steps.finish(format_value(value)))
    }
}

/// Integers without a decimal part, everything else to at most 10 decimals
pub fn format_value(value: f64) -> String {
    if is_integer(value) && value.abs() < 1e15 {
        let n = snap(value) as i64;
        return n.to_string();
    }
    let fixed = format!("{:.10}", value);
    match fixed.trim_end_matches('0').trim_end_matches('.') {
        "-0" => "0".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn prepare(text: &str) -> String {
    let mut out = text
        .trim()
        .trim_end_matches(['?', '='])
        .to_lowercase();
    for (re, replacement) in REWRITES.iter() {
        out = re.replace_all(&out, *replacement).into_owned();
    }
    // Overlapping matches ("2x3x4") need more than one pass
    while TIMES_X.is_match(&out) {
        out = TIMES_X.replace_all(&out, "$1*$2").into_owned();
    }
    out
}

fn lex(input: &str) -> Result<Vec<Tok>, MathError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let single = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                // Scientific notation: 1e5, 2.5e-3
                if i < chars.len() && chars[i] == 'e' {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| MathError::InvalidNumber {
                        value: text.clone(),
                        span: None,
                    })?;
                tokens.push(Tok::Num(value));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(identifier(&word)?);
                continue;
            }
            '+' => Tok::Plus,
            '-' => Tok::Minus,
            '*' => Tok::Star,
            '/' => Tok::Slash,
            '%' => Tok::Percent,
            '^' => Tok::Caret,
            '°' => Tok::Degree,
            '(' => Tok::LParen,
            ')' => Tok::RParen,
            ',' => Tok::Comma,
            other => {
                return Err(MathError::UnsafeInput {
                    token: other.to_string(),
                });
            }
        };
        tokens.push(single);
        i += 1;
    }
    Ok(tokens)
}

fn identifier(word: &str) -> Result<Tok, MathError> {
    if let Some((_, value)) = CONSTANTS.iter().find(|(name, _)| *name == word) {
        return Ok(Tok::Const(*value));
    }
    FUNCTIONS
        .iter()
        .find(|name| **name == word)
        .map(|name| Tok::Func(*name))
        .ok_or_else(|| MathError::UnsafeInput {
            token: word.to_string(),
        })
}

fn describe(tok: &Tok) -> String {
    match tok {
        Tok::Num(n) => format_value(*n),
        Tok::Const(_) => "constant".to_string(),
        Tok::Func(name) => name.to_string(),
        Tok::Plus => "+".to_string(),
        Tok::Minus => "-".to_string(),
        Tok::Star => "*".to_string(),
        Tok::Slash => "/".to_string(),
        Tok::Percent => "%".to_string(),
        Tok::Caret => "^".to_string(),
        Tok::Degree => "°".to_string(),
        Tok::LParen => "(".to_string(),
        Tok::RParen => ")".to_string(),
        Tok::Comma => ",".to_string(),
    }
}

struct Parser {
    tokens: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Tok> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn eat(&mut self, tok: &Tok) -> bool {
        if self.peek() == Some(tok) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: &Tok) -> Result<(), MathError> {
        match self.advance() {
            Some(ref got) if got == tok => Ok(()),
            Some(got) => Err(MathError::UnexpectedToken {
                expected: describe(tok),
                got: describe(&got),
                span: None,
            }),
            None => Err(MathError::UnexpectedEndOfInput),
        }
    }

    fn expr(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;
        loop {
            if self.eat(&Tok::Plus) {
                value += self.term()?;
            } else if self.eat(&Tok::Minus) {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.unary()?;
        loop {
            if self.eat(&Tok::Star) {
                value *= self.unary()?;
            } else if self.eat(&Tok::Slash) {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(MathError::DivisionByZero);
                }
                value /= divisor;
            } else if self.eat(&Tok::Percent) {
                let divisor = self.unary()?;
                if divisor == 0.0 {
                    return Err(MathError::DivisionByZero);
                }
                value = value.rem_euclid(divisor);
            } else if matches!(
                self.peek(),
                Some(Tok::Const(_) | Tok::Func(_) | Tok::LParen)
            ) {
                // Implicit product: 2pi, 3(4 + 1)
                value *= self.unary()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn unary(&mut self) -> Result<f64, MathError> {
        if self.eat(&Tok::Minus) {
            return Ok(-self.unary()?);
        }
        if self.eat(&Tok::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> Result<f64, MathError> {
        let base = self.postfix()?;
        if self.eat(&Tok::Caret) {
            let exponent = self.unary()?;
            if base == 0.0 && exponent < 0.0 {
                return Err(MathError::DivisionByZero);
            }
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn postfix(&mut self) -> Result<f64, MathError> {
        let mut value = self.primary()?;
        while self.eat(&Tok::Degree) {
            value = value.to_radians();
        }
        Ok(value)
    }

    fn primary(&mut self) -> Result<f64, MathError> {
        match self.advance() {
            Some(Tok::Num(n)) | Some(Tok::Const(n)) => Ok(n),
            Some(Tok::LParen) => {
                let value = self.expr()?;
                self.expect(&Tok::RParen)?;
                Ok(value)
            }
            Some(Tok::Func(name)) => {
                let args = if self.eat(&Tok::LParen) {
                    let mut args = vec![self.expr()?];
                    while self.eat(&Tok::Comma) {
                        args.push(self.expr()?);
                    }
                    self.expect(&Tok::RParen)?;
                    args
                } else {
                    // Prefix application: sqrt 16, sin 30°
                    vec![self.power()?]
                };
                apply(name, &args)
            }
            Some(tok) => Err(MathError::UnexpectedToken {
                expected: "number".to_string(),
                got: describe(&tok),
                span: None,
            }),
            None => Err(MathError::UnexpectedEndOfInput),
        }
    }
}

fn apply(name: &str, args: &[f64]) -> Result<f64, MathError> {
    let arity = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(MathError::invalid_syntax(format!(
                "{} takes {} argument{}, got {}",
                name,
                n,
                if n == 1 { "" } else { "s" },
                args.len()
            )))
        }
    };

    let value = match name {
        "min" | "max" => {
            let fold = if name == "min" { f64::min } else { f64::max };
            args.iter()
                .copied()
                .reduce(fold)
                .ok_or_else(|| MathError::invalid_syntax(format!("{} needs arguments", name)))?
        }
        "log" if args.len() == 2 => {
            if args[1] <= 0.0 || args[1] == 1.0 {
                return Err(MathError::Undefined(format!(
                    "log base {}",
                    format_value(args[1])
                )));
            }
            args[0].ln() / args[1].ln()
        }
        _ => {
            arity(1)?;
            let x = args[0];
            match name {
                "sqrt" => x.sqrt(),
                "abs" => x.abs(),
                "sin" => x.sin(),
                "cos" => x.cos(),
                "tan" => {
                    if x.cos().abs() < 1e-12 {
                        return Err(MathError::Undefined(format!(
                            "tan({}°)",
                            format_value(x.to_degrees())
                        )));
                    }
                    x.tan()
                }
                "asin" => x.asin(),
                "acos" => x.acos(),
                "atan" => x.atan(),
                "sinh" => x.sinh(),
                "cosh" => x.cosh(),
                "tanh" => x.tanh(),
                "exp" => x.exp(),
                "ln" | "log" => x.ln(),
                "log10" => x.log10(),
                "log2" => x.log2(),
                "floor" => x.floor(),
                "ceil" => x.ceil(),
                "round" => x.round(),
                _ => return Err(MathError::UnsafeInput { token: name.to_string() }),
            }
        }
    };

    if value.is_nan() {
        let shown: Vec<String> = args.iter().map(|a| format_value(*a)).collect();
        return Err(MathError::Undefined(format!("{}({})", name, shown.join(", "))));
    }
    Ok(value)
}
