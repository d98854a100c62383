//! Tutor configuration
//!
//! Everything here is plain data: loaded once (from defaults or a JSON file)
//! and then shared read-only by the classifier, the formula book and the
//! engine limits.

use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, MathError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration of a [`Tutor`](crate::Tutor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TutorConfig {
    /// Variable used when the query does not name one
    pub default_variable: String,
    /// Maximum AST depth accepted by the engine
    pub max_depth: usize,
    /// Maximum AST node count accepted by the engine
    pub max_nodes: usize,
    /// Formula book replacing the built-in one
    pub formula_file: Option<PathBuf>,
    /// Entries listed when a whole formula category is requested
    pub max_formulas: usize,
    /// Sub-entries listed per topic in a category listing
    pub max_subformulas: usize,
    pub lexicon: Lexicon,
}

impl Default for TutorConfig {
    fn default() -> Self {
        Self {
            default_variable: "x".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            formula_file: None,
            max_formulas: 15,
            max_subformulas: 3,
            lexicon: Lexicon::default(),
        }
    }
}

impl TutorConfig {
    /// Load a configuration from a JSON file; absent fields keep their defaults
    ///
    /// # Errors
    /// `MathError::Config` when the file cannot be read or is not valid JSON.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MathError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| MathError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, MathError> {
        let config: TutorConfig =
            serde_json::from_str(text).map_err(|e| MathError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), MathError> {
        let var = &self.default_variable;
        if var.chars().count() != 1 || !var.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(MathError::Config(format!(
                "default_variable must be a single lowercase letter, got '{}'",
                var
            )));
        }
        if self.max_depth == 0 || self.max_nodes == 0 {
            return Err(MathError::Config(
                "max_depth and max_nodes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Keyword tables consulted by the [`Classifier`](crate::Classifier)
///
/// All entries are matched as lowercase substrings of the lowercased query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub quadratic_markers: Vec<String>,
    pub quadratic_phrases: Vec<String>,
    pub solve_words: Vec<String>,
    pub equation_words: Vec<String>,
    pub derivative_words: Vec<String>,
    pub integral_words: Vec<String>,
    pub limit_words: Vec<String>,
    pub factor_words: Vec<String>,
    pub expand_words: Vec<String>,
    pub formula_words: Vec<String>,
    pub calculation_words: Vec<String>,
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            quadratic_markers: words(&["x^2", "x²"]),
            quadratic_phrases: words(&["quadratic equation", "quadratic formula"]),
            solve_words: words(&["solve"]),
            equation_words: words(&["equation"]),
            derivative_words: words(&["derivative", "differentiate"]),
            integral_words: words(&["integrate", "integral"]),
            limit_words: words(&["limit"]),
            factor_words: words(&["factor"]),
            expand_words: words(&["expand"]),
            formula_words: words(&["formula", "formulas"]),
            calculation_words: words(&["calculate", "compute", "evaluate"]),
        }
    }
}

impl Lexicon {
    /// Whether `text` (already lowercase) contains any entry of `table`
    pub(crate) fn any(table: &[String], text: &str) -> bool {
        table.iter().any(|w| !w.is_empty() && text.contains(w.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TutorConfig::default();
        assert_eq!(config.default_variable, "x");
        assert_eq!(config.max_formulas, 15);
        assert_eq!(config.max_subformulas, 3);
        assert!(config.lexicon.solve_words.contains(&"solve".to_string()));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TutorConfig::from_json_str(r#"{"default_variable": "t", "max_formulas": 5}"#)
            .unwrap();
        assert_eq!(config.default_variable, "t");
        assert_eq!(config.max_formulas, 5);
        assert_eq!(config.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.lexicon, Lexicon::default());
    }

    #[test]
    fn test_lexicon_override() {
        let config =
            TutorConfig::from_json_str(r#"{"lexicon": {"limit_words": ["limit", "lim"]}}"#).unwrap();
        assert_eq!(config.lexicon.limit_words, vec!["limit", "lim"]);
        assert_eq!(config.lexicon.factor_words, vec!["factor"]);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            TutorConfig::from_json_str("{not json"),
            Err(MathError::Config(_))
        ));
        assert!(matches!(
            TutorConfig::from_json_str(r#"{"default_variable": "xy"}"#),
            Err(MathError::Config(_))
        ));
        assert!(matches!(
            TutorConfig::from_json_file("/definitely/not/here.json"),
            Err(MathError::Config(_))
        ));
    }
}
