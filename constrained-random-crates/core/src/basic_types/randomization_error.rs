use thiserror::Error;

use crate::csp::ProblemError;

/// Errors which can occur while randomizing; none of them is recovered from internally, a failed
/// randomization never returns a (partial) value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RandomizationError {
    /// No value satisfying the constraints was found within the retry budget.
    #[error("too many iterations, '{name}' could not be solved within {max_iterations} attempts")]
    IterationsExhausted { name: String, max_iterations: usize },
    /// An exhaustive enumeration showed that no value satisfies the constraints.
    #[error("the problem for '{name}' is unsolvable")]
    Unsolvable { name: String },
    /// The constraint problem was malformed.
    #[error(transparent)]
    Problem(#[from] ProblemError),
}
