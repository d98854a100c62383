//! Canonical sum-of-products representation
//!
//! Every expression is read as a list of [`Term`]s, each a numeric
//! coefficient times a product of [`Factor`]s (`base ** exp`). Like factors
//! merge by adding exponents, like terms merge by adding coefficients, and the
//! result is rebuilt in a deterministic order.

use std::cmp::Ordering;

use super::simplify_expr;
use crate::functions::func;
use crate::numeric::{as_fraction, is_integer, is_one, is_zero, snap};
use crate::{Expr, ExprKind};

/// Exponents above this are left unexpanded when folding numeric powers
const MAX_FOLD_EXPONENT: f64 = 64.0;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Factor {
    pub base: Expr,
    pub exp: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Term {
    pub coeff: f64,
    pub factors: Vec<Factor>,
}

/// Exact numeric value of an exponent-like expression (`3`, `3/2`, `-1/2`)
pub(crate) fn exp_value(expr: &Expr) -> Option<f64> {
    match &expr.kind {
        ExprKind::Number(n) => Some(*n),
        ExprKind::Div(l, r) => match (l.as_number(), r.as_number()) {
            (Some(p), Some(q)) if q != 0.0 => Some(p / q),
            _ => None,
        },
        ExprKind::Mul(l, r) if l.is_neg_one_num() => exp_value(r).map(|v| -v),
        _ => None,
    }
}

/// Number as an expression, using an exact fraction `p/q` when one exists
pub(crate) fn number_expr(value: f64) -> Expr {
    let value = snap(value);
    if !value.is_finite() || is_integer(value) {
        return Expr::number(value);
    }
    match as_fraction(value) {
        Some((p, q)) if q != 1 => Expr::div_expr(Expr::number(p as f64), Expr::number(q as f64)),
        _ => Expr::number(value),
    }
}

fn add_exponents(a: &Expr, b: &Expr) -> Expr {
    match (exp_value(a), exp_value(b)) {
        (Some(x), Some(y)) => number_expr(x + y),
        _ => simplify_expr(&Expr::add_expr(a.clone(), b.clone())),
    }
}

fn scale_exponent(e: &Expr, by: f64) -> Expr {
    match exp_value(e) {
        Some(v) => number_expr(v * by),
        None => simplify_expr(&Expr::mul_expr(Expr::number(by), e.clone())),
    }
}

impl Factor {
    fn new(base: Expr, exp: Expr) -> Self {
        Factor { base, exp }
    }

    fn exp_is_one(&self) -> bool {
        exp_value(&self.exp).is_some_and(is_one)
    }

    /// Ordering rank: numbers, symbols, function calls, compound bases
    fn rank(&self) -> u8 {
        match &self.base.kind {
            ExprKind::Number(_) => 0,
            ExprKind::Symbol(_) => 1,
            ExprKind::FunctionCall { .. } => 2,
            _ => 3,
        }
    }

    fn as_expr(&self) -> Expr {
        if self.exp_is_one() {
            self.base.clone()
        } else {
            Expr::pow(self.base.clone(), self.exp.clone())
        }
    }
}

impl Term {
    pub(crate) fn constant(coeff: f64) -> Self {
        Term {
            coeff,
            factors: Vec::new(),
        }
    }

    /// A term whose single factor is `expr` itself
    pub(crate) fn opaque(expr: &Expr) -> Self {
        Term {
            coeff: 1.0,
            factors: vec![Factor::new(expr.clone(), Expr::number(1.0))],
        }
    }

    pub(crate) fn is_constant(&self) -> bool {
        self.factors.is_empty()
    }

    fn mul(mut self, other: Term) -> Term {
        self.coeff *= other.coeff;
        self.factors.extend(other.factors);
        self.normalize()
    }

    fn recip(self) -> Option<Term> {
        if is_zero(self.coeff) {
            return None;
        }
        let factors = self
            .factors
            .into_iter()
            .map(|f| Factor::new(f.base, scale_exponent(&f.exp, -1.0)))
            .collect();
        Some(
            Term {
                coeff: 1.0 / self.coeff,
                factors,
            }
            .normalize(),
        )
    }

    fn powi(self, n: f64) -> Term {
        let factors = self
            .factors
            .into_iter()
            .map(|f| Factor::new(f.base, scale_exponent(&f.exp, n)))
            .collect();
        Term {
            coeff: self.coeff.powf(n),
            factors,
        }
        .normalize()
    }

    pub(crate) fn negated(&self) -> Term {
        Term {
            coeff: -self.coeff,
            factors: self.factors.clone(),
        }
    }

    /// Merge equal bases, fold numeric bases with integral exponents, drop `x**0`, sort
    fn normalize(mut self) -> Term {
        let mut merged: Vec<Factor> = Vec::with_capacity(self.factors.len());
        for factor in self.factors {
            if let Some(existing) = merged.iter_mut().find(|f| f.base == factor.base) {
                existing.exp = add_exponents(&existing.exp, &factor.exp);
            } else {
                merged.push(factor);
            }
        }

        let mut coeff = self.coeff;
        merged.retain(|f| {
            let exponent = exp_value(&f.exp);
            if exponent.is_some_and(is_zero) {
                return false;
            }
            if let (Some(b), Some(n)) = (f.base.as_number(), exponent)
                && is_integer(n)
                && b.powf(n).is_finite()
            {
                coeff *= b.powf(n);
                return false;
            }
            true
        });

        merged.sort_by(|a, b| {
            a.rank()
                .cmp(&b.rank())
                .then_with(|| a.base.to_string().cmp(&b.base.to_string()))
        });
        self.coeff = snap(coeff);
        self.factors = merged;
        self
    }

    /// Total degree in plain symbols; used for ordering terms
    fn degree(&self) -> f64 {
        self.factors
            .iter()
            .filter(|f| matches!(f.base.kind, ExprKind::Symbol(_)))
            .filter_map(|f| exp_value(&f.exp))
            .sum()
    }

    /// The non-numeric part rendered as text, for tie-breaking
    fn shape(&self) -> String {
        build_term(&Term {
            coeff: 1.0,
            factors: self.factors.clone(),
        })
        .to_string()
    }
}

/// Read a (child-simplified) node as a single product term
pub(crate) fn term_of(expr: &Expr) -> Term {
    match &expr.kind {
        ExprKind::Number(n) => Term::constant(*n),
        ExprKind::Mul(a, b) => term_of(a).mul(term_of(b)),
        ExprKind::Div(a, b) => match term_of(b).recip() {
            Some(inverse) => term_of(a).mul(inverse),
            None => Term::opaque(expr),
        },
        ExprKind::Pow(base, exp) => pow_term(base, exp),
        _ => Term::opaque(expr),
    }
}

fn pow_term(base: &Expr, exp: &Expr) -> Term {
    let Some(n) = exp_value(exp) else {
        if base.as_symbol() == Some("e") {
            return Term::opaque(&func("exp", exp.clone()));
        }
        return Term {
            coeff: 1.0,
            factors: vec![Factor::new(base.clone(), exp.clone())],
        };
    };

    if let Some(b) = base.as_number() {
        let value = b.powf(n);
        if value.is_finite() && n.abs() <= MAX_FOLD_EXPONENT && (is_integer(n) || is_integer(value)) {
            return Term::constant(value);
        }
    }

    match &base.kind {
        ExprKind::Mul(..) | ExprKind::Div(..) if is_integer(n) => term_of(base).powi(n),
        ExprKind::Pow(inner_base, inner_exp) if is_integer(n) => {
            if let Some(m) = exp_value(inner_exp) {
                return pow_term(inner_base, &number_expr(m * n));
            }
            Term::opaque(&Expr::pow(base.clone(), exp.clone()))
        }
        // sqrt(u)**(2k) = u**k
        ExprKind::FunctionCall { name, args }
            if name == "sqrt" && args.len() == 1 && is_integer(n / 2.0) =>
        {
            pow_term(&args[0], &number_expr(n / 2.0))
        }
        _ => Term {
            coeff: 1.0,
            factors: vec![Factor::new(base.clone(), number_expr(n))],
        }
        .normalize(),
    }
}

/// Flatten a sum into signed terms
pub(crate) fn collect_terms(expr: &Expr, sign: f64, out: &mut Vec<Term>) {
    match &expr.kind {
        ExprKind::Add(a, b) => {
            collect_terms(a, sign, out);
            collect_terms(b, sign, out);
        }
        ExprKind::Sub(a, b) => {
            collect_terms(a, sign, out);
            collect_terms(b, -sign, out);
        }
        _ => {
            let mut term = term_of(expr);
            term.coeff *= sign;
            out.push(term);
        }
    }
}

/// Terms of an expression, flattened
pub(crate) fn terms_of(expr: &Expr) -> Vec<Term> {
    let mut out = Vec::new();
    collect_terms(expr, 1.0, &mut out);
    out
}

/// Distribute coefficients over lone sums, merge like terms, drop zeros, sort
pub(crate) fn combine(terms: Vec<Term>) -> Vec<Term> {
    let mut flat = Vec::with_capacity(terms.len());
    for term in terms {
        let lone_sum = term.factors.len() == 1
            && term.factors[0].exp_is_one()
            && term.factors[0].base.is_sum();
        if lone_sum {
            collect_terms(&term.factors[0].base, term.coeff, &mut flat);
        } else {
            flat.push(term);
        }
    }

    let mut merged: Vec<Term> = Vec::with_capacity(flat.len());
    for term in flat {
        if let Some(existing) = merged.iter_mut().find(|t| t.factors == term.factors) {
            existing.coeff += term.coeff;
        } else {
            merged.push(term);
        }
    }

    merged.retain(|t| !is_zero(t.coeff));
    for term in &mut merged {
        term.coeff = snap(term.coeff);
    }
    sort_terms(&mut merged);
    merged
}

/// Descending degree, constants last, ties by rendered shape
pub(crate) fn sort_terms(terms: &mut [Term]) {
    terms.sort_by(|a, b| match (a.is_constant(), b.is_constant()) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (true, true) => Ordering::Equal,
        (false, false) => b
            .degree()
            .partial_cmp(&a.degree())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.shape().cmp(&b.shape())),
    });
}

fn product(parts: Vec<Expr>) -> Option<Expr> {
    parts.into_iter().reduce(Expr::mul_expr)
}

/// Rebuild one term: `coeff * numerator / denominator`
pub(crate) fn build_term(term: &Term) -> Expr {
    if term.factors.is_empty() {
        return number_expr(term.coeff);
    }

    let magnitude = term.coeff.abs();
    let (num_coeff, den_coeff) = match as_fraction(magnitude) {
        Some((p, q)) => (p as f64, q as f64),
        None => (magnitude, 1.0),
    };

    let mut numerator = Vec::new();
    let mut denominator = Vec::new();
    if !is_one(num_coeff) {
        numerator.push(Expr::number(num_coeff));
    }
    if !is_one(den_coeff) {
        denominator.push(Expr::number(den_coeff));
    }
    for factor in &term.factors {
        match exp_value(&factor.exp) {
            Some(n) if n < 0.0 => {
                denominator.push(Factor::new(factor.base.clone(), number_expr(-n)).as_expr())
            }
            _ => numerator.push(factor.as_expr()),
        }
    }

    let numerator = product(numerator).unwrap_or_else(|| Expr::number(1.0));
    let body = match product(denominator) {
        Some(den) => Expr::div_expr(numerator, den),
        None => numerator,
    };

    if term.coeff < 0.0 { Expr::neg(body) } else { body }
}

/// Rebuild a sum of already-combined terms, writing negative addends as subtraction
pub(crate) fn build_sum(terms: &[Term]) -> Expr {
    let mut iter = terms.iter();
    let Some(first) = iter.next() else {
        return Expr::number(0.0);
    };
    let mut acc = build_term(first);
    for term in iter {
        acc = if term.coeff < 0.0 {
            Expr::sub_expr(acc, build_term(&term.negated()))
        } else {
            Expr::add_expr(acc, build_term(term))
        };
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn x() -> Expr {
        Expr::symbol("x")
    }

    #[test]
    fn test_number_expr_fractions() {
        assert_eq!(number_expr(0.5).to_string(), "1/2");
        assert_eq!(number_expr(-1.5).to_string(), "-3/2");
        assert_eq!(number_expr(4.0).to_string(), "4");
    }

    #[test]
    fn test_term_merges_powers() {
        let expr = Expr::mul_expr(x(), Expr::pow(x(), Expr::number(2.0)));
        let term = term_of(&expr);
        assert_eq!(term.factors.len(), 1);
        assert_eq!(exp_value(&term.factors[0].exp), Some(3.0));
    }

    #[test]
    fn test_build_term_fraction() {
        let term = Term {
            coeff: 0.5,
            factors: vec![Factor::new(x(), Expr::number(2.0))],
        };
        assert_eq!(build_term(&term).to_string(), "x**2/2");
    }

    #[test]
    fn test_combine_orders_by_degree() {
        let terms = vec![
            Term::constant(6.0),
            Term {
                coeff: -5.0,
                factors: vec![Factor::new(x(), Expr::number(1.0))],
            },
            Term {
                coeff: 1.0,
                factors: vec![Factor::new(x(), Expr::number(2.0))],
            },
        ];
        let combined = combine(terms);
        assert_eq!(build_sum(&combined).to_string(), "x**2 - 5*x + 6");
    }
}
