use crate::limits::{LimitPoint, LimitValue};
use crate::tutor::steps::{SolutionSteps, StepsBuilder};
use crate::{Expr, ExprKind, MathError, SymbolicEngine};
use tracing::debug;

/// Read a limit point as written in a query
///
/// `inf`, `infinity`, `oo` and `∞`, optionally signed, are infinities.
/// Anything else must evaluate to a finite number (`2`, `-0.5`, `pi/2`).
pub fn parse_point<E: SymbolicEngine + ?Sized>(
    engine: &E,
    text: &str,
) -> Result<LimitPoint, MathError> {
    let text = text.trim().to_lowercase();
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text)),
    };
    if matches!(magnitude.trim(), "inf" | "infinity" | "oo" | "∞") {
        return Ok(if negative {
            LimitPoint::NegInfinity
        } else {
            LimitPoint::PosInfinity
        });
    }
    if let Ok(value) = text.parse::<f64>()
        && value.is_finite()
    {
        return Ok(LimitPoint::Finite(value));
    }
    engine
        .parse(&text)?
        .evaluate(&Default::default())
        .filter(|v| v.is_finite())
        .map(LimitPoint::Finite)
        .ok_or_else(|| MathError::unsupported(format!("limit point '{}'", text)))
}

/// Explain `lim var→point` of `text`
///
/// When the engine reports an indeterminate form for a quotient whose
/// numerator and denominator both tend to zero (or both to infinity),
/// L'Hôpital's rule is applied once.
pub fn explain_limit<E: SymbolicEngine + ?Sized>(
    engine: &E,
    text: &str,
    var: &str,
    point: LimitPoint,
) -> Result<SolutionSteps, MathError> {
    let text = text.trim();
    let expr = engine.parse(text)?;
    let notation = format!("lim_{{{}→{}}}", var, point);
    let mut value = engine.limit(&expr, var, point)?;
    debug!(%value, "direct limit");

    let mut steps = StepsBuilder::new();
    steps.line(format!(
        "Calculating limit of {} as {} approaches {}:",
        text, var, point
    ));
    steps
        .step("Evaluate the limit directly")
        .detail(format!("{} {} = {}", notation, text, value));

    match value {
        LimitValue::PosInfinity => {
            steps.step("The limit is positive infinity.");
        }
        LimitValue::NegInfinity => {
            steps.step("The limit is negative infinity.");
        }
        LimitValue::Indeterminate => {
            steps.step("This appears to be an indeterminate form.");
            if let ExprKind::Div(num, den) = &expr.kind {
                steps.detail("We can try using L'Hôpital's rule.");
                let num_limit = engine.limit(num, var, point)?;
                let den_limit = engine.limit(den, var, point)?;
                let applies = (num_limit.is_zero() && den_limit.is_zero())
                    || (num_limit.is_infinite() && den_limit.is_infinite());

                if applies {
                    let quotient = Expr::div_expr(
                        engine.differentiate(num, var)?,
                        engine.differentiate(den, var)?,
                    );
                    value = engine.limit(&quotient, var, point)?;
                    steps
                        .step("Applying L'Hôpital's rule:")
                        .detail(format!("{} {} = {}", notation, quotient, value));
                } else {
                    steps.detail(format!(
                        "L'Hôpital's rule does not apply: the numerator tends to {} and the denominator to {}.",
                        num_limit, den_limit
                    ));
                }
            }
        }
        LimitValue::Finite(_) => {}
    }

    Ok(match value {
        LimitValue::Indeterminate => steps.finish("The limit is indeterminate"),
        value => steps.finish(format!("The limit equals {}", value)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Engine;

    #[test]
    fn test_parse_point() {
        let engine = Engine::new();
        assert_eq!(parse_point(&engine, "0").unwrap(), LimitPoint::Finite(0.0));
        assert_eq!(parse_point(&engine, "-2.5").unwrap(), LimitPoint::Finite(-2.5));
        assert_eq!(parse_point(&engine, "Infinity").unwrap(), LimitPoint::PosInfinity);
        assert_eq!(parse_point(&engine, "-inf").unwrap(), LimitPoint::NegInfinity);
        assert_eq!(parse_point(&engine, "+∞").unwrap(), LimitPoint::PosInfinity);
        assert_eq!(parse_point(&engine, "oo").unwrap(), LimitPoint::PosInfinity);
        assert_eq!(
            parse_point(&engine, "pi").unwrap(),
            LimitPoint::Finite(std::f64::consts::PI)
        );
        assert!(parse_point(&engine, "y").is_err());
    }

    #[test]
    fn test_direct_limit() {
        let steps =
            explain_limit(&Engine::new(), "x**2 + 1", "x", LimitPoint::Finite(2.0)).unwrap();
        assert_eq!(steps.lines()[0], "Calculating limit of x^2 + 1 as x approaches 2:");
        assert_eq!(steps.lines()[2], "         lim_{x→2} x^2 + 1 = 5");
        assert_eq!(steps.answer(), "Answer: The limit equals 5");
    }

    #[test]
    fn test_infinite_limit() {
        let steps = explain_limit(&Engine::new(), "1/x**2", "x", LimitPoint::Finite(0.0)).unwrap();
        assert!(steps.iter().any(|l| l.ends_with("The limit is positive infinity.")));
        assert_eq!(steps.answer(), "Answer: The limit equals ∞");
    }

    #[test]
    fn test_lhopital_applied_once() {
        let steps = explain_limit(&Engine::new(), "sin(x)/x", "x", LimitPoint::Finite(0.0)).unwrap();
        assert!(steps.iter().any(|l| l.contains("indeterminate form")));
        assert!(steps.iter().any(|l| l.contains("Applying L'Hôpital's rule:")));
        assert!(steps.iter().any(|l| l.trim() == "lim_{x→0} cos(x)/1 = 1"));
        assert_eq!(steps.answer(), "Answer: The limit equals 1");
    }

    #[test]
    fn test_indeterminate_without_quotient() {
        let steps =
            explain_limit(&Engine::new(), "sin(x)", "x", LimitPoint::PosInfinity).unwrap();
        assert!(!steps.iter().any(|l| l.contains("L'Hôpital")));
        assert_eq!(steps.answer(), "Answer: The limit is indeterminate");
    }
}
