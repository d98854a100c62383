use super::main_variable;
use crate::tutor::steps::{SolutionSteps, StepsBuilder};
use crate::{Expr, MathError, SymbolicEngine};
use tracing::debug;

/// Explain solving `lhs = rhs` for the preferred variable (or the one that occurs)
///
/// Steps: restate, move everything to the left, simplify, list the roots.
/// An empty root set is not an error: the answer is "No solution found."
///
/// # Errors
/// Parse and solver errors from the engine, or `Unsupported` when the
/// equation has no variable at all.
pub fn explain_equation<E: SymbolicEngine + ?Sized>(
    engine: &E,
    lhs_text: &str,
    rhs_text: &str,
    preferred_var: &str,
) -> Result<SolutionSteps, MathError> {
    let lhs = engine.parse(lhs_text)?;
    let rhs = engine.parse(rhs_text)?;
    let moved = Expr::sub_expr(lhs.clone(), rhs.clone());

    let var = main_variable(&moved, preferred_var)
        .ok_or_else(|| MathError::unsupported("the equation has no variable to solve for"))?;
    let single_side = engine.expand(&engine.simplify(&moved)?)?;
    debug!(%var, %single_side, "solving equation");

    let mut steps = StepsBuilder::new();
    steps.step(format!(
        "Start with the equation {} = {}",
        lhs_text.trim(),
        rhs_text.trim()
    ));
    steps
        .step(format!("Subtract {} from both sides", rhs))
        .detail(format!("{} = 0", moved));
    steps
        .step("Simplify the equation")
        .detail(format!("{} = 0", single_side));

    let roots = engine.solve_equation(&lhs, &rhs, &var)?;
    if roots.is_empty() {
        return Ok(steps.finish("No solution found."));
    }

    steps.step(format!("Solve for {}", var));
    for root in &roots {
        steps.detail(format!("{} = {}", var, root));
    }
    let answer = roots
        .iter()
        .map(|root| format!("{} = {}", var, root))
        .collect::<Vec<_>>()
        .join(" or ");
    Ok(steps.finish(answer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Engine;

    #[test]
    fn test_linear_equation() {
        let steps = explain_equation(&Engine::new(), "2*x + 3", "7", "x").unwrap();
        assert_eq!(steps.lines()[0], "Step 1: Start with the equation 2·x + 3 = 7");
        assert_eq!(steps.lines()[1], "Step 2: Subtract 7 from both sides");
        assert_eq!(steps.lines()[2], "         2·x + 3 - 7 = 0");
        assert_eq!(steps.lines()[4], "         2·x - 4 = 0");
        assert_eq!(steps.answer(), "Answer: x = 2");
    }

    #[test]
    fn test_quadratic_roots_joined() {
        let steps = explain_equation(&Engine::new(), "2*x**2 + 3*x - 2", "0", "x").unwrap();
        assert_eq!(steps.answer(), "Answer: x = -2 or x = 1/2");
    }

    #[test]
    fn test_no_real_roots() {
        let steps = explain_equation(&Engine::new(), "x**2 + 1", "0", "x").unwrap();
        assert_eq!(steps.answer(), "Answer: No solution found.");
        assert!(!steps.iter().any(|l| l.starts_with("Step 4")));
    }

    #[test]
    fn test_other_variable() {
        let steps = explain_equation(&Engine::new(), "3*t", "12", "x").unwrap();
        assert_eq!(steps.answer(), "Answer: t = 4");
    }

    #[test]
    fn test_errors() {
        let engine = Engine::new();
        assert!(explain_equation(&engine, "2 + 2", "4", "x").is_err());
        assert!(explain_equation(&engine, "2*x +", "4", "x").is_err());
    }
}
