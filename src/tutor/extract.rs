//! Isolates the math payload of a natural-language query
//!
//! Three pattern families are tried in turn and the first one that yields a
//! non-empty capture wins:
//!
//! - **equation**: whenever the text has an `=` (or the intent is an
//!   equation), leading verbs such as "solve" or "find" are stripped and a
//!   trailing "for …"/"where …" clause is dropped
//! - **evaluation**: "evaluate", "calculate", "what is", … followed by the
//!   expression
//! - **calculus**: "differentiate", "integral of", "factor", … followed by the
//!   expression, up to "with respect to", "when", "as x approaches" or `dx`
//!
//! Operation intents try the calculus family before the evaluation family, so
//! "find the derivative of x^2" extracts `x^2` rather than "the derivative of
//! x^2". When nothing matches, the trimmed input is returned unchanged.

use super::classify::ProblemType;
use super::pattern;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static EQUATION_LEAD: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)^\s*(?:(?:solve\s+for\s+[a-z]\s+in|find\s+the\s+solutions?\s+(?:to|of)|solve|find|the|quadratic|equation)\b|for\s+[a-z]\s*:)[\s:,]*",
    )
});

static EQUATION_TAIL: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)\s+(?:for|where)\b.*$"));

static EVALUATION: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\b(?:evaluate|calculate|compute|find|determine|what\s+is|what's)\b\s*(?:the\s+)?(?:value\s+of\s+)?(.+)",
    )
});

static CALCULUS: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\b(?:differentiate|derivative\s+of|integrate|integral\s+of|limit\s+of|factor(?:ise|ize)?|expand)\b\s*(?:the\s+)?(?:(?:function|expression|polynomial)\s+)?(.+)",
    )
});

static CALCULUS_STOP: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\s*(?:\bwith\s+respect\s+to\b|\bwhen\b|\bas\s+[a-z]\s*(?:approaches|→|->|goes\s+to|tends\s+to)|\s+d[a-z]\b)",
    )
});

static RESPECT_TO: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)with\s+respect\s+to\s+([a-z])\b"));

static LIMIT_TARGET: LazyLock<Regex> = LazyLock::new(|| {
    pattern(
        r"(?i)\b(?:as|when)\s+([a-z])\s*(?:approaches|→|->|goes\s+to|tends\s+to)\s*([\w\-+.∞]+)",
    )
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Equation,
    Evaluation,
    Calculus,
}

/// Variable and target point of a limit query, as written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitTarget {
    pub var: String,
    pub point: String,
}

/// Pattern-based payload extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct Extractor;

impl Extractor {
    pub fn new() -> Self {
        Extractor
    }

    /// Math payload of `text`, not yet normalized
    ///
    /// Never empty unless `text` is blank.
    pub fn extract(&self, text: &str, intent: &ProblemType) -> String {
        let order = if intent.is_operation() {
            [Family::Equation, Family::Calculus, Family::Evaluation]
        } else {
            [Family::Equation, Family::Evaluation, Family::Calculus]
        };

        for family in order {
            let captured = match family {
                Family::Equation if text.contains('=') || intent.is_equation() => {
                    Some(equation_payload(text))
                }
                Family::Equation => None,
                Family::Evaluation => EVALUATION
                    .captures(text)
                    .map(|caps| cut_sentence(&caps[1]).to_string()),
                Family::Calculus => CALCULUS.captures(text).map(|caps| calculus_payload(&caps[1])),
            };
            if let Some(payload) = captured.map(|p| p.trim().to_string())
                && !payload.is_empty()
            {
                debug!(?family, %payload, "extracted expression");
                return payload;
            }
        }
        text.trim().to_string()
    }

    /// Variable named by "with respect to v"
    pub fn respect_to(&self, text: &str) -> Option<String> {
        RESPECT_TO
            .captures(text)
            .map(|caps| caps[1].to_ascii_lowercase())
    }

    /// Variable and point named by "as v approaches p" (or "when v → p", …)
    pub fn limit_target(&self, text: &str) -> Option<LimitTarget> {
        LIMIT_TARGET.captures(text).map(|caps| LimitTarget {
            var: caps[1].to_ascii_lowercase(),
            point: caps[2].trim_end_matches('.').to_ascii_lowercase(),
        })
    }
}

fn equation_payload(text: &str) -> String {
    let mut rest = cut_sentence(text).trim();
    while let Some(found) = EQUATION_LEAD.find(rest) {
        if found.end() == 0 {
            break;
        }
        rest = &rest[found.end()..];
    }
    EQUATION_TAIL.replace(rest, "").into_owned()
}

fn calculus_payload(captured: &str) -> String {
    let end = CALCULUS_STOP
        .find(captured)
        .map_or(captured.len(), |m| m.start());
    cut_sentence(&captured[..end]).to_string()
}

/// Text before the first `?`, or before a `.` that ends a sentence
///
/// A `.` followed by a digit is a decimal point and is kept.
fn cut_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '?' => return &text[..i],
            '.' if chars.peek().is_none_or(|(_, next)| next.is_whitespace()) => {
                return &text[..i];
            }
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ex(text: &str, intent: ProblemType) -> String {
        Extractor::new().extract(text, &intent)
    }

    #[test]
    fn test_equation_family() {
        assert_eq!(
            ex("solve x^2 - 5x + 6 = 0", ProblemType::QuadraticEquation),
            "x^2 - 5x + 6 = 0"
        );
        assert_eq!(
            ex("Solve the equation 2x + 3 = 7 for x.", ProblemType::Equation),
            "2x + 3 = 7"
        );
        assert_eq!(ex("solve for x: 3x = 9", ProblemType::Equation), "3x = 9");
        assert_eq!(ex("solve for x in 3x = 9", ProblemType::Equation), "3x = 9");
        assert_eq!(
            ex("find the solution to x^2 = 4?", ProblemType::QuadraticEquation),
            "x^2 = 4"
        );
    }

    #[test]
    fn test_equation_intent_without_equals() {
        assert_eq!(ex("solve x^2 - 4", ProblemType::QuadraticEquation), "x^2 - 4");
    }

    #[test]
    fn test_evaluation_family() {
        assert_eq!(ex("what is 5 + 3", ProblemType::Calculation), "5 + 3");
        assert_eq!(ex("Calculate 2.5 * 4.", ProblemType::Calculation), "2.5 * 4");
        assert_eq!(
            ex("evaluate the value of 2^10?", ProblemType::Calculation),
            "2^10"
        );
    }

    #[test]
    fn test_calculus_family() {
        assert_eq!(
            ex(
                "differentiate 3x^2 + 2x with respect to x",
                ProblemType::Differentiation
            ),
            "3x^2 + 2x"
        );
        assert_eq!(
            ex("find the derivative of sin(2x)", ProblemType::Differentiation),
            "sin(2x)"
        );
        assert_eq!(ex("integrate 2x dx", ProblemType::Integration), "2x");
        assert_eq!(
            ex("limit of sin(x)/x as x approaches 0", ProblemType::Limit),
            "sin(x)/x"
        );
        assert_eq!(
            ex("Factor the expression x^2 - 5x + 6.", ProblemType::Factoring),
            "x^2 - 5x + 6"
        );
        assert_eq!(ex("expand (x + 1)^2", ProblemType::Expansion), "(x + 1)^2");
    }

    #[test]
    fn test_fail_open() {
        assert_eq!(ex("  x^2 + 1  ", ProblemType::General), "x^2 + 1");
        assert_eq!(ex("", ProblemType::General), "");
    }

    #[test]
    fn test_decimal_survives() {
        assert_eq!(ex("compute 3.75 + 1.25", ProblemType::Calculation), "3.75 + 1.25");
    }

    #[test]
    fn test_respect_to() {
        let extractor = Extractor::new();
        assert_eq!(
            extractor.respect_to("differentiate t^2 with respect to t"),
            Some("t".to_string())
        );
        assert_eq!(extractor.respect_to("differentiate x^2"), None);
    }

    #[test]
    fn test_limit_target() {
        let extractor = Extractor::new();
        let target = extractor
            .limit_target("limit of 1/x as x approaches infinity")
            .unwrap();
        assert_eq!(target.var, "x");
        assert_eq!(target.point, "infinity");

        let target = extractor.limit_target("limit of sin(t)/t when t → 0.").unwrap();
        assert_eq!(target.var, "t");
        assert_eq!(target.point, "0");

        let target = extractor.limit_target("limit of e^x as x -> -inf").unwrap();
        assert_eq!(target.point, "-inf");
        assert!(extractor.limit_target("limit of 1/x").is_none());
    }
}
