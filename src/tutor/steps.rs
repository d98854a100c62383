//! Ordered explanation lines ending in an answer

use crate::render_for_display;
use std::fmt;

/// Indentation of detail lines under a numbered step
const DETAIL_INDENT: &str = "         ";

/// Immutable sequence of explanation steps
///
/// The last entry is always the `Answer: …` line. When rendered with
/// `Display`, lines are joined by newlines and the answer is set apart by a
/// blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionSteps {
    lines: Vec<String>,
}

impl SolutionSteps {
    /// All lines, the answer last
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn answer(&self) -> &str {
        self.lines.last().map_or("", String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

impl fmt::Display for SolutionSteps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((answer, body)) = self.lines.split_last() else {
            return Ok(());
        };
        for line in body {
            writeln!(f, "{}", line)?;
        }
        if !body.is_empty() {
            writeln!(f)?;
        }
        write!(f, "{}", answer)
    }
}

/// Append-only builder for [`SolutionSteps`]
///
/// Numbered steps are counted automatically. Display formatting is applied
/// once, in [`StepsBuilder::finish`].
///
/// ```
/// use mathly::StepsBuilder;
///
/// let mut steps = StepsBuilder::new();
/// steps.step("Simplify x**2*2");
/// steps.detail("2*x**2");
/// let steps = steps.finish("2*x**2");
/// assert_eq!(steps.lines()[0], "Step 1: Simplify x^2·2");
/// assert_eq!(steps.answer(), "Answer: 2·x^2");
/// ```
#[derive(Debug, Default)]
pub struct StepsBuilder {
    lines: Vec<String>,
    count: usize,
}

impl StepsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next numbered step: `Step N: text`
    pub fn step(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.count += 1;
        self.lines
            .push(format!("Step {}: {}", self.count, text.as_ref()));
        self
    }

    /// Indented line belonging to the previous step
    pub fn detail(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines.push(format!("{}{}", DETAIL_INDENT, text.as_ref()));
        self
    }

    /// Unnumbered, unindented line
    pub fn line(&mut self, text: impl Into<String>) -> &mut Self {
        self.lines.push(text.into());
        self
    }

    pub fn steps_taken(&self) -> usize {
        self.count
    }

    /// Close the sequence with `Answer: {answer}` and render every line for display
    pub fn finish(self, answer: impl fmt::Display) -> SolutionSteps {
        let mut lines = self.lines;
        lines.push(format!("Answer: {}", answer));
        SolutionSteps {
            lines: lines.iter().map(|l| render_for_display(l)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbering_and_answer() {
        let mut builder = StepsBuilder::new();
        builder.step("first").detail("more").line("free text").step("second");
        assert_eq!(builder.steps_taken(), 2);
        let steps = builder.finish("42");
        assert_eq!(
            steps.lines(),
            [
                "Step 1: first",
                "         more",
                "free text",
                "Step 2: second",
                "Answer: 42"
            ]
        );
        assert_eq!(steps.answer(), "Answer: 42");
    }

    #[test]
    fn test_display_blank_line_before_answer() {
        let mut builder = StepsBuilder::new();
        builder.step("Evaluate 5 + 3");
        let steps = builder.finish(8);
        assert_eq!(steps.to_string(), "Step 1: Evaluate 5 + 3\n\nAnswer: 8");
    }

    #[test]
    fn test_answer_only() {
        let steps = StepsBuilder::new().finish("No solution found.");
        assert_eq!(steps.len(), 1);
        assert_eq!(steps.to_string(), "Answer: No solution found.");
    }

    #[test]
    fn test_operators_rendered() {
        let mut builder = StepsBuilder::new();
        builder.detail("d/dx(3*x**2) = 6*x");
        let steps = builder.finish("x**3 + C");
        let rendered: Vec<&str> = steps.iter().collect();
        assert_eq!(rendered, ["         d/dx(3·x^2) = 6·x", "Answer: x^3 + C"]);
    }
}
