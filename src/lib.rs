//! Step-by-Step Math Tutor
//!
//! Answers natural-language math questions with numbered explanation steps,
//! backed by a small built-in symbolic engine.
//!
//! # Features
//! - Rule-based classification of queries (equations, calculus, factoring,
//!   expansion, formula lookups, arithmetic)
//! - Pattern-based extraction of the math payload from free text
//! - Symbolic engine: parsing, simplification, differentiation, integration,
//!   limits, factoring over ℚ, expansion and equation solving
//! - Restricted arithmetic evaluator for calculation questions
//! - Built-in formula book, replaceable from JSON
//!
//! # Usage Examples
//!
//! ## One-shot
//! ```
//! let answer = mathly::solve("what is 5 + 3");
//! assert_eq!(answer, "Step 1: Evaluate 5 + 3\n\nAnswer: 8");
//! ```
//!
//! ## Configured tutor
//! ```
//! use mathly::{ProblemType, Tutor, TutorConfig};
//!
//! let config = TutorConfig::from_json_str(r#"{"default_variable": "t"}"#).unwrap();
//! let tutor = Tutor::from_config(config).unwrap();
//! assert_eq!(tutor.classify("integrate 3t^2"), ProblemType::Integration);
//! assert!(tutor.solve("integrate 3t^2").ends_with("Answer: ∫3·t^2 dt = t^3 + C"));
//! ```
//!
//! ## Engine only
//! ```
//! use mathly::{Engine, SymbolicEngine, parse};
//!
//! let expr = parse("(x + 1)^2").unwrap();
//! assert_eq!(Engine::new().expand(&expr).unwrap().to_string(), "x**2 + 2*x + 1");
//! ```

mod algebra;
mod ast;
mod differentiation;
mod display;
mod engine;
mod error;
mod functions;
mod integration;
mod limits;
mod numeric;
mod parser;
mod poly;
mod simplification;
mod solve;
mod tutor;

#[cfg(feature = "parallel")]
pub mod parallel;

#[cfg(test)]
mod tests;

use std::sync::OnceLock;

// Re-export key types for easier usage
pub use algebra::{expand_expr, factor_expr};
pub use ast::{Expr, ExprKind};
pub use differentiation::differentiate;
pub use display::render_for_display;
pub use engine::{Engine, SymbolicEngine};
pub use error::{MathError, Span};
pub use integration::integrate;
pub use limits::{LimitPoint, LimitValue, compute_limit};
pub use numeric::format_number;
pub use parser::parse;
pub use poly::{Discriminant, Polynomial, RealRoots};
pub use simplification::simplify_expr;
pub use solve::solve_equation;
pub use tutor::{
    Calculator, Classifier, Extractor, Failure, FormulaBook, GENERAL_CATEGORY, Lexicon,
    LimitTarget, ProblemType, Response, SolutionSteps, StepsBuilder, Tutor, TutorConfig,
    normalize,
};

/// Lower-level pipeline pieces: individual templates and the legacy solver
pub mod explain {
    pub use crate::tutor::{
        Coefficients, explain_derivative, explain_equation, explain_expansion, explain_factoring,
        explain_integral, explain_limit, extract_coefficients, format_value,
        matches_legacy_shape, parse_point, solve_quadratic_legacy,
    };
}

/// Default maximum AST depth
pub const DEFAULT_MAX_DEPTH: usize = 100;
/// Default maximum AST node count
pub const DEFAULT_MAX_NODES: usize = 10_000;

static DEFAULT_TUTOR: OnceLock<Tutor> = OnceLock::new();

/// Answer a math question with step-by-step explanation text
///
/// Uses a process-wide [`Tutor`] with the default configuration, built on
/// first use. Never fails: errors are rendered as text.
///
/// # Example
/// ```
/// let answer = mathly::solve("differentiate 3x^2 + 2x");
/// assert!(answer.ends_with("Answer: d/dx(3·x^2 + 2·x) = 6·x + 2"));
/// ```
pub fn solve(query: &str) -> String {
    DEFAULT_TUTOR.get_or_init(Tutor::new).solve(query)
}
