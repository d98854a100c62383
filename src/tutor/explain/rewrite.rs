use super::main_variable;
use crate::poly::Polynomial;
use crate::tutor::steps::{SolutionSteps, StepsBuilder};
use crate::{ExprKind, MathError, SymbolicEngine};
use tracing::debug;

/// Explain factoring `text`
///
/// The strategy line depends on whether the engine found factors, and on
/// whether the input is a quadratic polynomial.
pub fn explain_factoring<E: SymbolicEngine + ?Sized>(
    engine: &E,
    text: &str,
    preferred_var: &str,
) -> Result<SolutionSteps, MathError> {
    let text = text.trim();
    let expr = engine.parse(text)?;
    let simplified = engine.simplify(&expr)?;
    let factored = engine.factor(&expr)?;
    let changed = factored.to_string() != simplified.to_string();
    debug!(%factored, changed, "factored expression");

    let quadratic = main_variable(&simplified, preferred_var)
        .and_then(|var| Polynomial::from_expr(&simplified, &var))
        .is_some_and(|poly| poly.degree() == 2);

    let mut steps = StepsBuilder::new();
    steps.line(format!("Factoring the expression {}:", text));
    steps.step("Identify common factors and factorizable patterns");
    steps.step(match (changed, quadratic) {
        (true, true) => {
            "This is a quadratic expression. We can factor it using the quadratic formula or grouping."
        }
        (true, false) => "Extract common factors and identify factorizable patterns",
        (false, _) => "Apply algebraic factoring techniques",
    });
    steps.step("The factored form is:").detail(factored.to_string());
    if !changed {
        steps.line("This expression is already in its simplest factored form.");
    }
    Ok(steps.finish(format!("{} = {}", text, factored)))
}

/// Explain expanding `text`
///
/// A squared sum gets the binomial-square hint, any other product involving
/// a sum gets the term-by-term multiplication hint.
pub fn explain_expansion<E: SymbolicEngine + ?Sized>(
    engine: &E,
    text: &str,
) -> Result<SolutionSteps, MathError> {
    let text = text.trim();
    let expr = engine.parse(text)?;
    let expanded = engine.expand(&expr)?;
    let changed = expanded.to_string() != engine.simplify(&expr)?.to_string();
    debug!(%expanded, changed, "expanded expression");

    let mut steps = StepsBuilder::new();
    steps.line(format!("Expanding the expression {}:", text));
    steps.step("Apply the distributive property to remove parentheses");
    match &expr.kind {
        ExprKind::Pow(base, exp) if base.is_sum() && exp.as_number() == Some(2.0) => {
            steps.step("Use the formula (a + b)² = a² + 2ab + b² or similar patterns");
        }
        ExprKind::Mul(left, right) if left.is_sum() || right.is_sum() => {
            steps.step("Multiply each term in the first parenthesis by each term in the second");
        }
        _ => {}
    }
    steps.step("Combine like terms");
    steps.line("The expanded form is:").detail(expanded.to_string());
    if !changed {
        steps.line("This expression is already in its expanded form.");
    }
    Ok(steps.finish(format!("{} = {}", text, expanded)))
}
