//! Abstract Syntax Tree for mathematical expressions

use std::collections::BTreeSet;
use std::ops::Deref;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::functions::registry::Registry;

/// Symbol names that denote constants rather than variables
pub(crate) const CONSTANT_SYMBOLS: [&str; 2] = ["pi", "e"];

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
}

impl Deref for Expr {
    type Target = ExprKind;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Constant number (e.g., 3.14, 2)
    Number(f64),

    /// Variable or named constant (e.g., "x", "pi")
    Symbol(String),

    /// Built-in function call
    FunctionCall { name: String, args: Vec<Expr> },

    // Binary operations
    Add(Arc<Expr>, Arc<Expr>),
    Sub(Arc<Expr>, Arc<Expr>),
    Mul(Arc<Expr>, Arc<Expr>),
    Div(Arc<Expr>, Arc<Expr>),
    Pow(Arc<Expr>, Arc<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Expr { kind }
    }

    // Accessor methods

    /// Check if expression is a constant number and return its value
    pub fn as_number(&self) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_symbol(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this expression is the number zero (with tolerance)
    #[inline]
    pub fn is_zero_num(&self) -> bool {
        self.as_number().is_some_and(crate::numeric::is_zero)
    }

    /// Check if this expression is the number one (with tolerance)
    #[inline]
    pub fn is_one_num(&self) -> bool {
        self.as_number().is_some_and(crate::numeric::is_one)
    }

    #[inline]
    pub fn is_neg_one_num(&self) -> bool {
        self.as_number().is_some_and(crate::numeric::is_neg_one)
    }

    /// True for `Add`/`Sub` nodes
    pub fn is_sum(&self) -> bool {
        matches!(self.kind, ExprKind::Add(..) | ExprKind::Sub(..))
    }

    // Convenience constructors

    pub fn number(n: f64) -> Self {
        Expr::new(ExprKind::Number(n))
    }

    pub fn symbol(s: impl Into<String>) -> Self {
        Expr::new(ExprKind::Symbol(s.into()))
    }

    pub fn add_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Add(Arc::new(left), Arc::new(right)))
    }

    pub fn sub_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Sub(Arc::new(left), Arc::new(right)))
    }

    pub fn mul_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Mul(Arc::new(left), Arc::new(right)))
    }

    pub fn div_expr(left: Expr, right: Expr) -> Self {
        Expr::new(ExprKind::Div(Arc::new(left), Arc::new(right)))
    }

    pub fn pow(base: Expr, exponent: Expr) -> Self {
        Expr::new(ExprKind::Pow(Arc::new(base), Arc::new(exponent)))
    }

    /// `-1 * expr`, the parser's representation of unary minus
    pub fn neg(expr: Expr) -> Self {
        Expr::mul_expr(Expr::number(-1.0), expr)
    }

    /// Create a function call expression (single argument convenience)
    pub fn func(name: impl Into<String>, content: Expr) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args: vec![content],
        })
    }

    pub fn func_multi(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::new(ExprKind::FunctionCall {
            name: name.into(),
            args,
        })
    }

    // Analysis methods

    /// Count the total number of nodes in the AST
    pub fn node_count(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.node_count()).sum::<usize>()
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.node_count() + r.node_count(),
        }
    }

    /// Get the maximum nesting depth of the AST
    pub fn max_depth(&self) -> usize {
        match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { args, .. } => {
                1 + args.iter().map(|a| a.max_depth()).max().unwrap_or(0)
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => 1 + l.max_depth().max(r.max_depth()),
        }
    }

    /// Check if the expression contains a specific variable
    pub fn contains_var(&self, var: &str) -> bool {
        match &self.kind {
            ExprKind::Number(_) => false,
            ExprKind::Symbol(s) => s == var,
            ExprKind::FunctionCall { args, .. } => args.iter().any(|a| a.contains_var(var)),
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => l.contains_var(var) || r.contains_var(var),
        }
    }

    /// Count occurrences of a variable
    pub(crate) fn occurrences(&self, var: &str) -> usize {
        match &self.kind {
            ExprKind::Number(_) => 0,
            ExprKind::Symbol(s) => usize::from(s == var),
            ExprKind::FunctionCall { args, .. } => args.iter().map(|a| a.occurrences(var)).sum(),
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => l.occurrences(var) + r.occurrences(var),
        }
    }

    /// Collect all free variables (named constants excluded), sorted
    pub fn variables(&self) -> BTreeSet<String> {
        let mut vars = BTreeSet::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, vars: &mut BTreeSet<String>) {
        match &self.kind {
            ExprKind::Number(_) => {}
            ExprKind::Symbol(s) => {
                if !CONSTANT_SYMBOLS.contains(&s.as_str()) {
                    vars.insert(s.clone());
                }
            }
            ExprKind::FunctionCall { args, .. } => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
            ExprKind::Add(l, r)
            | ExprKind::Sub(l, r)
            | ExprKind::Mul(l, r)
            | ExprKind::Div(l, r)
            | ExprKind::Pow(l, r) => {
                l.collect_variables(vars);
                r.collect_variables(vars);
            }
        }
    }

    /// Rebuild the tree bottom-up, applying `f` to every node after its children
    pub fn map<F>(&self, f: F) -> Expr
    where
        F: Fn(&Expr) -> Expr,
    {
        self.map_inner(&f)
    }

    fn map_inner<F>(&self, f: &F) -> Expr
    where
        F: Fn(&Expr) -> Expr,
    {
        let rebuilt = match &self.kind {
            ExprKind::Number(_) | ExprKind::Symbol(_) => self.clone(),
            ExprKind::FunctionCall { name, args } => Expr::func_multi(
                name.clone(),
                args.iter().map(|a| a.map_inner(f)).collect(),
            ),
            ExprKind::Add(l, r) => Expr::add_expr(l.map_inner(f), r.map_inner(f)),
            ExprKind::Sub(l, r) => Expr::sub_expr(l.map_inner(f), r.map_inner(f)),
            ExprKind::Mul(l, r) => Expr::mul_expr(l.map_inner(f), r.map_inner(f)),
            ExprKind::Div(l, r) => Expr::div_expr(l.map_inner(f), r.map_inner(f)),
            ExprKind::Pow(l, r) => Expr::pow(l.map_inner(f), r.map_inner(f)),
        };
        f(&rebuilt)
    }

    /// Substitute a variable with another expression
    pub fn substitute(&self, var: &str, replacement: &Expr) -> Expr {
        self.map(|node| {
            if let ExprKind::Symbol(s) = &node.kind
                && s == var
            {
                return replacement.clone();
            }
            node.clone()
        })
    }

    /// Numerically evaluate the expression
    ///
    /// Returns `None` when a free symbol has no value or a function is unknown.
    /// IEEE semantics apply otherwise, so `1/0` yields infinity and `0/0` NaN.
    pub fn evaluate(&self, vars: &FxHashMap<&str, f64>) -> Option<f64> {
        match &self.kind {
            ExprKind::Number(n) => Some(*n),
            ExprKind::Symbol(s) => vars.get(s.as_str()).copied().or(match s.as_str() {
                "pi" => Some(std::f64::consts::PI),
                "e" => Some(std::f64::consts::E),
                _ => None,
            }),
            ExprKind::FunctionCall { name, args } => {
                let def = Registry::get(name)?;
                if !def.validate_arity(args.len()) {
                    return None;
                }
                let values = args
                    .iter()
                    .map(|a| a.evaluate(vars))
                    .collect::<Option<Vec<f64>>>()?;
                (def.eval)(&values)
            }
            ExprKind::Add(l, r) => Some(l.evaluate(vars)? + r.evaluate(vars)?),
            ExprKind::Sub(l, r) => Some(l.evaluate(vars)? - r.evaluate(vars)?),
            ExprKind::Mul(l, r) => Some(l.evaluate(vars)? * r.evaluate(vars)?),
            ExprKind::Div(l, r) => Some(l.evaluate(vars)? / r.evaluate(vars)?),
            ExprKind::Pow(l, r) => Some(l.evaluate(vars)?.powf(r.evaluate(vars)?)),
        }
    }

    /// Evaluate with a single variable bound
    pub fn evaluate_at(&self, var: &str, value: f64) -> Option<f64> {
        let mut vars = FxHashMap::default();
        vars.insert(var, value);
        self.evaluate(&vars)
    }
}
