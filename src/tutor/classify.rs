//! Maps a query to exactly one problem type
//!
//! Rules are checked in a fixed order and the first match wins, so earlier
//! rules shadow later ones: "solve the quadratic equation x^2+5x+6=0" is a
//! quadratic equation, not a plain equation.

use super::config::Lexicon;
use super::pattern;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// Number, operator, number; a spelled-out operator or a spaced `x` between numbers
static ARITHMETIC: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"\d\s*[-+*/^%×÷()]\s*\d|\d+\s*(?:plus|minus|times|multiplied by|divided by|over)\s*\d+|\d+\s+x\s+\d+",
    )
});

/// "sin of 30 degrees", "cos(60°)"
static DEGREE_TRIG: LazyLock<Regex> = LazyLock::new(|| {
    pattern(r"\b(?:sin|cos|tan)\s*(?:of\s*)?\(?\s*-?\d+(?:\.\d+)?\s*(?:°|degrees?\b)")
});

/// Formula category used when a formula request names none
pub const GENERAL_CATEGORY: &str = "general";

/// Problem family of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProblemType {
    Equation,
    QuadraticEquation,
    Differentiation,
    Integration,
    Limit,
    Factoring,
    Expansion,
    /// Formula request for a category (or [`GENERAL_CATEGORY`])
    FormulaLookup(String),
    Calculation,
    General,
}

impl ProblemType {
    /// Equation family: the payload is an equation, `= 0` when no `=` is given
    pub fn is_equation(&self) -> bool {
        matches!(self, ProblemType::Equation | ProblemType::QuadraticEquation)
    }

    /// Operations applied to an expression rather than solved for a variable
    pub fn is_operation(&self) -> bool {
        matches!(
            self,
            ProblemType::Differentiation
                | ProblemType::Integration
                | ProblemType::Limit
                | ProblemType::Factoring
                | ProblemType::Expansion
        )
    }

    /// Verb used in error messages: "Error {verb} expression: …"
    pub fn verb(&self) -> &'static str {
        match self {
            ProblemType::Equation | ProblemType::QuadraticEquation => "solving",
            ProblemType::Differentiation => "differentiating",
            ProblemType::Integration => "integrating",
            ProblemType::Limit => "evaluating the limit of",
            ProblemType::Factoring => "factoring",
            ProblemType::Expansion => "expanding",
            ProblemType::Calculation => "evaluating",
            ProblemType::FormulaLookup(_) | ProblemType::General => "processing",
        }
    }
}

impl fmt::Display for ProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemType::Equation => write!(f, "equation"),
            ProblemType::QuadraticEquation => write!(f, "quadratic_equation"),
            ProblemType::Differentiation => write!(f, "differentiation"),
            ProblemType::Integration => write!(f, "integration"),
            ProblemType::Limit => write!(f, "limit"),
            ProblemType::Factoring => write!(f, "factoring"),
            ProblemType::Expansion => write!(f, "expansion"),
            ProblemType::FormulaLookup(category) => write!(f, "formula_{}", category),
            ProblemType::Calculation => write!(f, "calculation"),
            ProblemType::General => write!(f, "general"),
        }
    }
}

/// Rule-based classifier over an injected [`Lexicon`]
#[derive(Debug, Clone)]
pub struct Classifier {
    lexicon: Lexicon,
    categories: Vec<String>,
}

impl Classifier {
    /// `categories` are the formula categories recognized by rule 8, checked in order
    pub fn new<I, S>(lexicon: Lexicon, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Classifier {
            lexicon,
            categories: categories
                .into_iter()
                .map(|c| c.into().to_lowercase())
                .collect(),
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Problem type of `text`; total and case-insensitive
    pub fn classify(&self, text: &str) -> ProblemType {
        let text = text.to_lowercase();
        let problem = self.rules(&text);
        debug!(%problem, "classified query");
        problem
    }

    /// Operation named by `text` (rules 3 to 7 only), in rule order
    pub fn operation(&self, text: &str) -> Option<ProblemType> {
        let text = text.to_lowercase();
        let lex = &self.lexicon;
        [
            (&lex.derivative_words, ProblemType::Differentiation),
            (&lex.integral_words, ProblemType::Integration),
            (&lex.limit_words, ProblemType::Limit),
            (&lex.factor_words, ProblemType::Factoring),
            (&lex.expand_words, ProblemType::Expansion),
        ]
        .into_iter()
        .find(|(table, _)| Lexicon::any(table, &text))
        .map(|(_, problem)| problem)
    }

    fn rules(&self, text: &str) -> ProblemType {
        let lex = &self.lexicon;
        let has = |table: &[String]| Lexicon::any(table, text);

        if has(&lex.quadratic_markers) || has(&lex.quadratic_phrases) {
            return ProblemType::QuadraticEquation;
        }
        if has(&lex.solve_words) && (has(&lex.equation_words) || text.contains('=')) {
            return ProblemType::Equation;
        }
        if has(&lex.derivative_words) {
            return ProblemType::Differentiation;
        }
        if has(&lex.integral_words) {
            return ProblemType::Integration;
        }
        if has(&lex.limit_words) {
            return ProblemType::Limit;
        }
        if has(&lex.factor_words) {
            return ProblemType::Factoring;
        }
        if has(&lex.expand_words) {
            return ProblemType::Expansion;
        }
        if has(&lex.formula_words) {
            let category = self
                .categories
                .iter()
                .find(|c| text.contains(c.as_str()))
                .cloned()
                .unwrap_or_else(|| GENERAL_CATEGORY.to_string());
            return ProblemType::FormulaLookup(category);
        }
        if has(&lex.calculation_words) || ARITHMETIC.is_match(text) || DEGREE_TRIG.is_match(text)
        {
            return ProblemType::Calculation;
        }
        // Shadowed by the first rule
        if has(&lex.quadratic_markers) && text.contains('=') {
            return ProblemType::QuadraticEquation;
        }
        ProblemType::General
    }
}
