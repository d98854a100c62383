use crate::Expr;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Definition of a mathematical function including its evaluation and calculus rules
#[derive(Clone)]
pub(crate) struct FunctionDefinition {
    /// Canonical name of the function (e.g., "sin", "ln")
    pub name: &'static str,

    /// Acceptable argument count (arity)
    pub arity: RangeInclusive<usize>,

    /// Numerical evaluation function
    pub eval: fn(&[f64]) -> Option<f64>,

    /// Symbolic differentiation function
    /// Arguments: (args of the function call, derivatives of the arguments)
    pub derivative: fn(&[Expr], &[Expr]) -> Expr,

    /// Antiderivative of `f(u)` with respect to `u`, when one is known in closed form
    pub antiderivative: Option<fn(&Expr) -> Expr>,
}

impl FunctionDefinition {
    /// Helper to check if argument count is valid
    pub(crate) fn validate_arity(&self, args: usize) -> bool {
        self.arity.contains(&args)
    }
}

/// Alternative spellings accepted by the lexer
const ALIASES: [(&str, &str); 7] = [
    ("log", "ln"),
    ("arcsin", "asin"),
    ("arccos", "acos"),
    ("arctan", "atan"),
    ("sqr", "sqrt"),
    ("cosec", "csc"),
    ("cotan", "cot"),
];

static REGISTRY: OnceLock<FxHashMap<&'static str, FunctionDefinition>> = OnceLock::new();

fn init_registry() -> FxHashMap<&'static str, FunctionDefinition> {
    let mut map = FxHashMap::default();
    for def in crate::functions::definitions::all_definitions() {
        map.insert(def.name, def);
    }
    map
}

/// Central registry for getting function definitions
pub(crate) struct Registry;

impl Registry {
    /// Get a function definition by canonical name
    pub(crate) fn get(name: &str) -> Option<&'static FunctionDefinition> {
        REGISTRY.get_or_init(init_registry).get(name)
    }

    /// Resolve a spelling (canonical or alias) to the canonical name
    pub(crate) fn canonical_name(word: &str) -> Option<&'static str> {
        if let Some(def) = Self::get(word) {
            return Some(def.name);
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == word)
            .and_then(|(_, canonical)| Self::get(canonical).map(|def| def.name))
    }

    /// Longest function name (or alias) that `word` starts with, and its length
    pub(crate) fn longest_prefix(word: &str) -> Option<(&'static str, usize)> {
        let registry = REGISTRY.get_or_init(init_registry);
        let spellings = registry
            .keys()
            .map(|name| (*name, *name))
            .chain(ALIASES.iter().copied());
        spellings
            .filter(|(spelling, _)| word.starts_with(spelling))
            .max_by_key(|(spelling, _)| spelling.len())
            .and_then(|(spelling, canonical)| {
                Self::canonical_name(canonical).map(|name| (name, spelling.len()))
            })
    }
}
