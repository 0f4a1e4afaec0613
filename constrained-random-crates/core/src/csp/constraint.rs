use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;

use crate::basic_types::Value;

/// The signature of a predicate; it receives the values of the constrained variables in the order
/// in which they were named when creating the [`Constraint`].
type PredicateFn = dyn Fn(&[&Value]) -> bool + Send + Sync;

/// A boolean relation over a number of named variables.
///
/// Every predicate is invoked in the same way, regardless of how many variables it relates, so
/// that the solver never has to reason about the arity of user-provided functions.
///
/// ```rust
/// # use constrained_random_core::csp::Constraint;
/// # use constrained_random_core::Value;
/// let plus_one = Constraint::new(
///     |values: &[&Value]| values[1].as_int() == values[0].as_int().map(|x| x + 1),
///     ["x", "y"],
/// );
/// assert!(plus_one.is_satisfied(&[&Value::Int(3), &Value::Int(4)]));
/// assert!(!plus_one.is_satisfied(&[&Value::Int(3), &Value::Int(3)]));
/// ```
#[derive(Clone)]
pub struct Constraint {
    predicate: Arc<PredicateFn>,
    variables: Vec<String>,
}

impl Constraint {
    pub fn new<S: Into<String>>(
        predicate: impl Fn(&[&Value]) -> bool + Send + Sync + 'static,
        variables: impl IntoIterator<Item = S>,
    ) -> Self {
        Constraint {
            predicate: Arc::new(predicate),
            variables: variables.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a constraint over a single variable.
    pub fn unary(
        variable: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        Constraint::new(move |values: &[&Value]| predicate(values[0]), [variable])
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Evaluates the predicate on the values of [`Constraint::variables`], in that order.
    pub fn is_satisfied(&self, values: &[&Value]) -> bool {
        (self.predicate)(values)
    }
}

impl Debug for Constraint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraint")
            .field("variables", &self.variables)
            .finish_non_exhaustive()
    }
}
