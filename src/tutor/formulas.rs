//! Formula knowledge base
//!
//! A nested JSON mapping `category → topic → (formula | {sub-topic → …})`,
//! queried read-only. Key order is the order of the source file.

use crate::MathError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::warn;

static BUILTIN: &str = include_str!("../../data/formulas.json");

/// On-disk layout: `{"formulas": {category: {...}}}`
#[derive(Debug, Default, Serialize, Deserialize)]
struct BookFile {
    formulas: Map<String, Value>,
}

/// Read-only formula lookup
#[derive(Debug, Clone)]
pub struct FormulaBook {
    categories: Map<String, Value>,
    max_formulas: usize,
    max_subformulas: usize,
}

impl Default for FormulaBook {
    fn default() -> Self {
        FormulaBook {
            categories: Map::new(),
            max_formulas: 15,
            max_subformulas: 3,
        }
    }
}

impl FormulaBook {
    /// The book embedded in the crate
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN).unwrap_or_else(|e| {
            warn!(error = %e, "built-in formula book is invalid");
            Self::default()
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, MathError> {
        let file: BookFile = serde_json::from_str(text)
            .map_err(|e| MathError::Config(format!("invalid formula book: {}", e)))?;
        Ok(FormulaBook {
            categories: file.formulas,
            ..Self::default()
        })
    }

    /// # Errors
    /// `MathError::Config` when the file cannot be read or has the wrong shape.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MathError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| MathError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    /// Set how much of a category a listing shows
    pub fn with_limits(mut self, max_formulas: usize, max_subformulas: usize) -> Self {
        self.max_formulas = max_formulas;
        self.max_subformulas = max_subformulas;
        self
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn topics(&self, category: &str) -> impl Iterator<Item = &str> {
        self.category(category)
            .into_iter()
            .flat_map(|topics| topics.keys().map(String::as_str))
    }

    /// First topic of `category` whose name occurs in `query` as whole words
    pub fn detect_topic(&self, category: &str, query: &str) -> Option<String> {
        let query = query.to_lowercase();
        self.topics(category)
            .find(|topic| contains_words(&query, &topic.to_lowercase()))
            .map(str::to_string)
    }

    fn category(&self, name: &str) -> Option<&Map<String, Value>> {
        self.categories
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, value)| value.as_object())
    }

    /// Render one topic of a category, or a truncated listing of the whole category
    pub fn lookup(&self, category: &str, topic: Option<&str>) -> String {
        let Some(topics) = self.category(category) else {
            return format!(
                "No formulas found for {}. Available categories: {}.",
                category,
                self.categories().collect::<Vec<_>>().join(", ")
            );
        };
        match topic {
            Some(topic) => render_topic(topics, category, topic),
            None => self.render_category(topics, category),
        }
    }

    /// Answer for a formula request that names no category
    pub fn overview(&self) -> String {
        format!(
            "I have formulas for: {}. Ask for a category, for example \"geometry formulas\".",
            self.categories().collect::<Vec<_>>().join(", ")
        )
    }

    fn render_category(&self, topics: &Map<String, Value>, category: &str) -> String {
        let mut out = format!("Here are formulas for {}:", category);
        let mut count = 0;

        for (name, value) in topics {
            if count >= self.max_formulas {
                let _ = write!(
                    out,
                    "\n... and more {} formulas (ask for specific topics for more details)",
                    category
                );
                break;
            }
            match value.as_object() {
                Some(subs) => {
                    let _ = write!(out, "\n{}:", name);
                    for (sub, formula) in subs.iter().take(self.max_subformulas) {
                        if formula.is_object() {
                            let _ = write!(
                                out,
                                "\n  • {}: (complex formula - ask specifically for details)",
                                sub
                            );
                        } else {
                            let _ = write!(out, "\n  • {}: {}", sub, text_of(formula));
                        }
                        count += 1;
                    }
                    if subs.len() > self.max_subformulas {
                        let _ = write!(out, "\n  • ... and more formulas for {}", name);
                    }
                }
                None => {
                    let _ = write!(out, "\n{}: {}", name, text_of(value));
                    count += 1;
                }
            }
        }
        out
    }

    /// Lines `category > topic[ > sub]: formula` whose names or formulas contain `term`
    pub fn search(&self, term: &str) -> Vec<String> {
        let term = term.to_lowercase();
        let hit = |text: &str| text.to_lowercase().contains(&term);
        let mut found = Vec::new();

        for (category, topics) in &self.categories {
            let Some(topics) = topics.as_object() else {
                continue;
            };
            for (name, value) in topics {
                match value.as_object() {
                    Some(subs) => {
                        for (sub, formula) in subs {
                            let formula = if formula.is_object() {
                                "(complex formula)".to_string()
                            } else {
                                text_of(formula)
                            };
                            if hit(name) || hit(sub) || hit(&formula) {
                                found.push(format!("{} > {} > {}: {}", category, name, sub, formula));
                            }
                        }
                    }
                    None => {
                        let formula = text_of(value);
                        if hit(name) || hit(&formula) {
                            found.push(format!("{} > {}: {}", category, name, formula));
                        }
                    }
                }
            }
        }
        found
    }
}

fn render_topic(topics: &Map<String, Value>, category: &str, topic: &str) -> String {
    let Some((name, value)) = topics.iter().find(|(key, _)| key.eq_ignore_ascii_case(topic)) else {
        return format!("Formula for {} not found in {}.", topic, category);
    };
    let Some(subs) = value.as_object() else {
        return format!("{}: {}", name, text_of(value));
    };

    let mut lines = Vec::new();
    for (sub, formula) in subs {
        match formula.as_object() {
            Some(deeper) => {
                lines.push(format!("{} {}:", name, sub));
                lines.extend(
                    deeper
                        .iter()
                        .map(|(key, f)| format!("  • {}: {}", key, text_of(f))),
                );
            }
            None => lines.push(format!("{} {}: {}", name, sub, text_of(formula))),
        }
    }
    lines.join("\n")
}

fn contains_words(haystack: &str, needle: &str) -> bool {
    let is_word = |c: char| c.is_alphanumeric();
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        !haystack[..start].chars().next_back().is_some_and(is_word)
            && !haystack[end..].chars().next().is_some_and(is_word)
    })
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
