//! Parallel batch answering using Rayon
//!
//! Queries share nothing but the read-only [`Tutor`], so a batch is a plain
//! parallel map.
//!
//! Enable with the `parallel` feature:
//! ```toml
//! mathly = { version = "0.4", features = ["parallel"] }
//! ```

use crate::{SymbolicEngine, Tutor};
use rayon::prelude::*;

/// Answer every query of `queries`, keeping their order
///
/// # Example
/// ```
/// use mathly::{Tutor, parallel::solve_batch};
///
/// let answers = solve_batch(&Tutor::new(), &["what is 2 + 2", "differentiate x^3"]);
/// assert!(answers[0].ends_with("Answer: 4"));
/// assert!(answers[1].ends_with("Answer: d/dx(x^3) = 3·x^2"));
/// ```
pub fn solve_batch<E: SymbolicEngine>(tutor: &Tutor<E>, queries: &[&str]) -> Vec<String> {
    queries.par_iter().map(|query| tutor.solve(query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_matches_sequential() {
        let tutor = Tutor::new();
        let queries = [
            "solve x^2 - 5x + 6 = 0",
            "integrate cos(x)",
            "what is 12 divided by 4",
            "",
            "factor x^3 - x",
        ];
        let sequential: Vec<String> = queries.iter().map(|q| tutor.solve(q)).collect();
        assert_eq!(solve_batch(&tutor, &queries), sequential);
    }

    #[test]
    fn test_empty_batch() {
        assert!(solve_batch(&Tutor::new(), &[]).is_empty());
    }
}
