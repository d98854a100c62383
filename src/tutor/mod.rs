//! Natural-language front end
//!
//! A query goes through classify → extract → normalize → route → explain.
//! The legacy quadratic path is taken only for the exact shape it reads
//! (`x**2 ± N*x ± N = 0`); every other equation, quadratic or not, falls
//! through to the general equation template.
//!
//! ```
//! use mathly::Tutor;
//!
//! let tutor = Tutor::new();
//! let answer = tutor.solve("solve x^2 - 5x + 6 = 0");
//! assert!(answer.ends_with("Answer: x = 3 or x = 2"));
//! ```

mod calculator;
mod classify;
mod config;
mod explain;
mod extract;
mod formulas;
mod legacy;
mod normalize;
mod steps;

pub use calculator::{Calculator, format_value};
pub use classify::{Classifier, GENERAL_CATEGORY, ProblemType};
pub use config::{Lexicon, TutorConfig};
pub use explain::{
    explain_derivative, explain_equation, explain_expansion, explain_factoring, explain_integral,
    explain_limit, parse_point,
};
pub use extract::{Extractor, LimitTarget};
pub use formulas::FormulaBook;
pub use legacy::{Coefficients, extract_coefficients, matches_legacy_shape, solve_quadratic_legacy};
pub use normalize::normalize;
pub use steps::{SolutionSteps, StepsBuilder};

use crate::limits::LimitPoint;
use crate::{Engine, MathError, SymbolicEngine, render_for_display};
use regex::Regex;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

const EMPTY_QUERY: &str = "Please enter a math question.";
const NOT_UNDERSTOOD: &str = "I'm not sure how to solve this problem. Could you please rephrase it?";
const GENERIC_FAILURE: &str =
    "I had trouble processing that request. Please check your input and try again.";

/// Category answering "what is the quadratic formula"
const QUADRATIC_FORMULA_CATEGORY: &str = "algebra";

/// Compile a pattern literal from this module tree
pub(crate) fn pattern(src: &str) -> Regex {
    Regex::new(src).expect("static pattern is valid")
}

/// Successful answer to a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Step-by-step explanation
    Steps(SolutionSteps),
    /// Plain text: formula listings, prompts
    Text(String),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Steps(steps) => write!(f, "{}", steps),
            Response::Text(text) => write!(f, "{}", text),
        }
    }
}

/// A query that was understood but could not be answered
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Error {} expression: {}", .problem.verb(), displayed(.error))]
pub struct Failure {
    /// The route the query was on when it failed
    pub problem: ProblemType,
    #[source]
    pub error: MathError,
}

fn displayed(error: &MathError) -> String {
    render_for_display(&error.to_string())
}

/// Orchestrator: owns the engine and every piece of configuration
///
/// Holds no mutable state; one `Tutor` can answer any number of queries,
/// from any number of threads.
#[derive(Debug)]
pub struct Tutor<E: SymbolicEngine = Engine> {
    engine: E,
    config: TutorConfig,
    classifier: Classifier,
    extractor: Extractor,
    calculator: Calculator,
    formulas: FormulaBook,
}

impl Default for Tutor<Engine> {
    fn default() -> Self {
        Self::with_engine(Engine::new(), TutorConfig::default(), FormulaBook::builtin())
    }
}

impl Tutor<Engine> {
    /// Tutor with the built-in engine, default configuration and built-in formula book
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a configuration, loading `formula_file` when it is set
    ///
    /// # Errors
    /// `MathError::Config` when the formula file cannot be loaded.
    pub fn from_config(config: TutorConfig) -> Result<Self, MathError> {
        let engine = Engine::new()
            .max_depth(config.max_depth)
            .max_nodes(config.max_nodes);
        let formulas = match &config.formula_file {
            Some(path) => FormulaBook::from_json_file(path)?,
            None => FormulaBook::builtin(),
        };
        Ok(Self::with_engine(engine, config, formulas))
    }
}

impl<E: SymbolicEngine> Tutor<E> {
    pub fn with_engine(engine: E, config: TutorConfig, formulas: FormulaBook) -> Self {
        let formulas = formulas.with_limits(config.max_formulas, config.max_subformulas);
        let classifier = Classifier::new(config.lexicon.clone(), formulas.categories());
        Tutor {
            engine,
            config,
            classifier,
            extractor: Extractor::new(),
            calculator: Calculator::new(),
            formulas,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    pub fn formulas(&self) -> &FormulaBook {
        &self.formulas
    }

    pub fn classify(&self, query: &str) -> ProblemType {
        self.classifier.classify(query)
    }

    /// Answer a query, always as display text
    ///
    /// Failures become `Error … expression: …`; a panic anywhere in the
    /// pipeline becomes a generic apology.
    pub fn solve(&self, query: &str) -> String {
        match panic::catch_unwind(AssertUnwindSafe(|| self.explain(query))) {
            Ok(Ok(response)) => response.to_string(),
            Ok(Err(failure)) => {
                warn!(%failure, query, "query failed");
                failure.to_string()
            }
            Err(_) => {
                warn!(query, "query panicked");
                GENERIC_FAILURE.to_string()
            }
        }
    }

    /// Answer a query, keeping failures typed
    pub fn explain(&self, query: &str) -> Result<Response, Failure> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Response::Text(EMPTY_QUERY.to_string()));
        }

        let problem = self.route(query, self.classify(query));
        let fail = |error: MathError| Failure {
            problem: problem.clone(),
            error,
        };

        match &problem {
            ProblemType::General => Ok(Response::Text(NOT_UNDERSTOOD.to_string())),
            ProblemType::FormulaLookup(category) => {
                Ok(Response::Text(self.formula_answer(query, category)))
            }
            ProblemType::Calculation => {
                let payload = self.extractor.extract(query, &problem);
                debug!(%payload, "calculation");
                self.calculator
                    .explain(&payload)
                    .map(Response::Steps)
                    .map_err(fail)
            }
            _ => self
                .explain_symbolic(query, &problem)
                .map(Response::Steps)
                .map_err(fail),
        }
    }

    /// Route of a classified query
    ///
    /// A quadratic tag without `=` is re-routed: to the operation the query
    /// names, or, when the query has no squared variable either, to the
    /// quadratic formula itself.
    fn route(&self, query: &str, problem: ProblemType) -> ProblemType {
        if problem != ProblemType::QuadraticEquation || query.contains('=') {
            return problem;
        }
        let lower = query.to_lowercase();
        let routed = if let Some(operation) = self.classifier.operation(&lower) {
            operation
        } else if !Lexicon::any(&self.classifier.lexicon().quadratic_markers, &lower) {
            ProblemType::FormulaLookup(QUADRATIC_FORMULA_CATEGORY.to_string())
        } else {
            problem
        };
        debug!(%routed, "re-routed quadratic query");
        routed
    }

    fn formula_answer(&self, query: &str, category: &str) -> String {
        if category == GENERAL_CATEGORY {
            return self.formulas.overview();
        }
        let topic = self.formulas.detect_topic(category, query);
        debug!(category, ?topic, "formula lookup");
        self.formulas.lookup(category, topic.as_deref())
    }

    fn explain_symbolic(&self, query: &str, problem: &ProblemType) -> Result<SolutionSteps, MathError> {
        let payload = self.extractor.extract(query, problem);
        let text = normalize(&payload);
        debug!(%payload, normalized = %text, "normalized expression");
        let default_var = self.config.default_variable.as_str();

        match problem {
            ProblemType::Equation | ProblemType::QuadraticEquation => {
                let (lhs, rhs) = text.split_once('=').unwrap_or((text.as_str(), "0"));
                if matches_legacy_shape(lhs, rhs) {
                    debug!("legacy quadratic path");
                    return Ok(solve_quadratic_legacy(lhs));
                }
                explain_equation(&self.engine, lhs, rhs, default_var)
            }
            ProblemType::Differentiation => {
                let var = self.operation_variable(query, &text)?;
                explain_derivative(&self.engine, &text, &var)
            }
            ProblemType::Integration => {
                let var = self.operation_variable(query, &text)?;
                explain_integral(&self.engine, &text, &var)
            }
            ProblemType::Limit => {
                let (var, point) = match self.extractor.limit_target(query) {
                    Some(target) => (target.var, parse_point(&self.engine, &target.point)?),
                    None => (default_var.to_string(), LimitPoint::Finite(0.0)),
                };
                explain_limit(&self.engine, &text, &var, point)
            }
            ProblemType::Factoring => explain_factoring(&self.engine, &text, default_var),
            ProblemType::Expansion => explain_expansion(&self.engine, &text),
            other => Err(MathError::unsupported(format!("no explanation for {}", other))),
        }
    }

    /// "with respect to v" if given, else the default variable if it occurs,
    /// else the expression's first variable
    fn operation_variable(&self, query: &str, text: &str) -> Result<String, MathError> {
        if let Some(var) = self.extractor.respect_to(query) {
            return Ok(var);
        }
        let default_var = &self.config.default_variable;
        let expr = self.engine.parse(text)?;
        Ok(explain::main_variable(&expr, default_var).unwrap_or_else(|| default_var.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_general() {
        let tutor = Tutor::new();
        assert_eq!(tutor.solve("   "), EMPTY_QUERY);
        assert_eq!(tutor.solve("tell me a joke"), NOT_UNDERSTOOD);
    }

    #[test]
    fn test_legacy_route() {
        let answer = Tutor::new().solve("solve x^2 - 5x + 6 = 0");
        assert!(answer.contains("Step 3: Calculate the discriminant"));
        assert!(answer.ends_with("\n\nAnswer: x = 3 or x = 2"));
    }

    #[test]
    fn test_off_shape_quadratic_falls_through() {
        let answer = Tutor::new().solve("solve 2x^2 + 3x - 2 = 0");
        assert!(answer.starts_with("Step 1: Start with the equation 2·x^2 + 3·x - 2 = 0"));
        assert!(answer.ends_with("Answer: x = -2 or x = 1/2"));
    }

    #[test]
    fn test_quadratic_operation_reroute() {
        let tutor = Tutor::new();
        assert_eq!(tutor.classify("differentiate x^2"), ProblemType::QuadraticEquation);
        let answer = tutor.solve("differentiate x^2");
        assert!(answer.ends_with("Answer: d/dx(x^2) = 2·x"));
        let answer = tutor.solve("factor x^2 - 4");
        assert!(answer.ends_with("Answer: x^2 - 4 = (x + 2)·(x - 2)"));
    }

    #[test]
    fn test_quadratic_formula_request() {
        let answer = Tutor::new().solve("What is the quadratic formula?");
        assert_eq!(answer, "quadratic formula: x = (-b ± √(b² - 4ac)) / 2a");
    }

    #[test]
    fn test_failure_message() {
        let tutor = Tutor::new();
        let failure = tutor.explain("differentiate (x +").unwrap_err();
        assert_eq!(failure.problem, ProblemType::Differentiation);
        assert!(tutor.solve("differentiate (x +").starts_with("Error differentiating expression: "));
        assert_eq!(
            tutor.solve("what is 1/0"),
            "Error evaluating expression: Division by zero is undefined"
        );
    }

    #[test]
    fn test_failure_uses_display_syntax() {
        let tutor = Tutor::new();
        assert_eq!(
            tutor.solve("integrate x*sin(x)"),
            "Error integrating expression: Unsupported operation: cannot integrate x·sin(x)"
        );
        let failure = tutor.explain("integrate x^2*sin(x)").unwrap_err();
        assert!(!failure.to_string().contains('*'));
        assert!(failure.to_string().ends_with("cannot integrate x^2·sin(x)"));
    }

    #[test]
    fn test_formula_routes() {
        let tutor = Tutor::new();
        assert!(tutor.solve("geometry formulas").starts_with("Here are formulas for geometry:"));
        assert!(tutor.solve("geometry formula for a circle").starts_with("circle area: A = πr²"));
        assert!(tutor.solve("give me a formula").starts_with("I have formulas for: algebra"));
    }

    #[test]
    fn test_from_config() {
        let config = TutorConfig {
            default_variable: "t".to_string(),
            ..TutorConfig::default()
        };
        let tutor = Tutor::from_config(config).unwrap();
        assert!(tutor.solve("integrate 2t").ends_with("Answer: ∫2·t dt = t^2 + C"));

        let config = TutorConfig {
            formula_file: Some("/definitely/not/here.json".into()),
            ..TutorConfig::default()
        };
        assert!(matches!(Tutor::from_config(config), Err(MathError::Config(_))));
    }
}
