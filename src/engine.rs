//! Symbolic engine seam used by the tutor
//!
//! The tutor only talks to the engine through [`SymbolicEngine`], so another
//! computer-algebra backend can be plugged in with `Tutor::with_engine`.
//!
//! # Example
//! ```
//! use mathly::{Engine, SymbolicEngine};
//!
//! let engine = Engine::new().max_depth(50);
//! let expr = engine.parse("x^2 + 2x").unwrap();
//! assert_eq!(engine.differentiate(&expr, "x").unwrap().to_string(), "2*x + 2");
//! ```

use crate::limits::{LimitPoint, LimitValue};
use crate::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, Expr, MathError};
use crate::{algebra, differentiation, integration, limits, parser, simplification, solve};

/// Operations the explanation layer needs from a computer-algebra system
///
/// Every operation reports failure as a `MathError`; none of them panic on
/// malformed input.
pub trait SymbolicEngine: Send + Sync {
    fn parse(&self, text: &str) -> Result<Expr, MathError>;

    /// Real roots of `lhs = rhs`, sorted ascending
    fn solve_equation(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>, MathError>;

    fn differentiate(&self, expr: &Expr, var: &str) -> Result<Expr, MathError>;

    /// Antiderivative without the constant of integration
    fn integrate(&self, expr: &Expr, var: &str) -> Result<Expr, MathError>;

    fn limit(&self, expr: &Expr, var: &str, point: LimitPoint) -> Result<LimitValue, MathError>;

    fn factor(&self, expr: &Expr) -> Result<Expr, MathError>;

    fn expand(&self, expr: &Expr) -> Result<Expr, MathError>;

    fn simplify(&self, expr: &Expr) -> Result<Expr, MathError>;
}

/// The built-in engine
#[derive(Debug, Clone)]
pub struct Engine {
    max_depth: usize,
    max_nodes: usize,
}

impl Default for Engine {
    fn default() -> Self {
        Engine {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set maximum AST depth accepted by `parse`
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set maximum AST node count accepted by `parse`
    pub fn max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    fn check_limits(&self, expr: &Expr) -> Result<(), MathError> {
        if expr.max_depth() > self.max_depth {
            return Err(MathError::MaxDepthExceeded);
        }
        if expr.node_count() > self.max_nodes {
            return Err(MathError::MaxNodesExceeded);
        }
        Ok(())
    }
}

/// Reject expressions with a divisor that is identically zero
fn check_defined(expr: &Expr) -> Result<(), MathError> {
    if simplification::has_zero_divisor(expr) {
        return Err(MathError::DivisionByZero);
    }
    Ok(())
}

impl SymbolicEngine for Engine {
    fn parse(&self, text: &str) -> Result<Expr, MathError> {
        let expr = parser::parse(text)?;
        self.check_limits(&expr)?;
        Ok(expr)
    }

    fn solve_equation(&self, lhs: &Expr, rhs: &Expr, var: &str) -> Result<Vec<Expr>, MathError> {
        check_defined(lhs)?;
        check_defined(rhs)?;
        solve::solve_equation(lhs, rhs, var)
    }

    fn differentiate(&self, expr: &Expr, var: &str) -> Result<Expr, MathError> {
        check_defined(expr)?;
        differentiation::differentiate(expr, var)
    }

    fn integrate(&self, expr: &Expr, var: &str) -> Result<Expr, MathError> {
        check_defined(expr)?;
        integration::integrate(expr, var)
    }

    fn limit(&self, expr: &Expr, var: &str, point: LimitPoint) -> Result<LimitValue, MathError> {
        check_defined(expr)?;
        limits::compute_limit(expr, var, point)
    }

    fn factor(&self, expr: &Expr) -> Result<Expr, MathError> {
        check_defined(expr)?;
        Ok(algebra::factor_expr(expr))
    }

    fn expand(&self, expr: &Expr) -> Result<Expr, MathError> {
        check_defined(expr)?;
        algebra::expand_expr(expr)
    }

    fn simplify(&self, expr: &Expr) -> Result<Expr, MathError> {
        check_defined(expr)?;
        Ok(simplification::simplify_expr(expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_limits() {
        let engine = Engine::new().max_depth(3);
        assert!(engine.parse("x + 1").is_ok());
        assert_eq!(engine.parse("sin(cos(tan(x)))"), Err(MathError::MaxDepthExceeded));

        let engine = Engine::new().max_nodes(4);
        assert_eq!(engine.parse("x + y + z"), Err(MathError::MaxNodesExceeded));
    }

    #[test]
    fn test_zero_divisor_rejected() {
        let engine = Engine::new();
        let x_over_zero = engine.parse("x/0").unwrap();
        let one = engine.parse("1").unwrap();
        assert_eq!(
            engine.solve_equation(&x_over_zero, &one, "x"),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            engine.differentiate(&engine.parse("1/0").unwrap(), "x"),
            Err(MathError::DivisionByZero)
        );
        assert_eq!(
            engine.simplify(&engine.parse("2/(x - x)").unwrap()),
            Err(MathError::DivisionByZero)
        );
        assert!(engine.differentiate(&engine.parse("1/x").unwrap(), "x").is_ok());
    }

    #[test]
    fn test_engine_is_object_safe() {
        let engine: Box<dyn SymbolicEngine> = Box::new(Engine::new());
        let expr = engine.parse("(x + 1)^2").unwrap();
        assert_eq!(engine.expand(&expr).unwrap().to_string(), "x**2 + 2*x + 1");
        assert_eq!(engine.factor(&engine.expand(&expr).unwrap()).unwrap().to_string(), "(x + 1)**2");
    }
}
