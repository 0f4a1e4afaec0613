//! Contains the [`RandVar`], a named quantity which produces constrained random values.
//!
//! A variable is created with a [`RandVarBuilder`]; when it is built, its specification is
//! compiled into a [`Sampler`] which is used for every subsequent draw. Depending on the size of
//! the domain, constraints are either solved exhaustively up-front (or per list element) with the
//! solver in [`crate::csp`], or checked after every random draw.
mod builder;
mod introspection;
mod sampler;
mod sampling;

use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;

pub use builder::RandVarBuilder;
pub(crate) use sampler::Sampler;

use crate::basic_types::SharedRandom;
use crate::basic_types::Value;
use crate::csp::Constraint;
use crate::domain::Domain;

/// A predicate over a single value; for list variables it is applied to every element.
pub type ValueConstraint = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A predicate over the (partial) list produced by a list variable.
pub type ListConstraint = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// A user-provided function which produces values, called with the fixed arguments of the
/// variable.
pub type GeneratorFn = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A randomizable variable.
///
/// The variable is immutable once built; every call to [`RandVar::randomize`] produces a fresh
/// value from the compiled strategy.
///
/// ```rust
/// # use constrained_random_core::RandVar;
/// # use constrained_random_core::Value;
/// let even = RandVar::builder("even")
///     .domain(0..10)
///     .constraint(|value: &Value| value.as_int().is_some_and(|x| x % 2 == 0))
///     .build()
///     .unwrap();
///
/// let value = even.randomize().unwrap().as_int().unwrap();
/// assert!((0..10).contains(&value) && value % 2 == 0);
/// ```
pub struct RandVar {
    name: String,
    order: i32,
    /// `0` for a scalar, otherwise the number of elements in the produced list.
    length: usize,
    max_iterations: usize,
    max_domain_size: usize,
    /// The normalized domain; [`None`] if values come from a generator.
    domain: Option<Domain>,
    constraints: Vec<ValueConstraint>,
    list_constraints: Vec<ListConstraint>,
    /// Whether draws of the sampler need to be checked against the per-value constraints.
    check_constraints: bool,
    sampler: Sampler,
    random: Option<SharedRandom>,
}

impl RandVar {
    pub fn builder(name: impl Into<String>) -> RandVarBuilder {
        RandVarBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The hint used by a multi-variable problem to decide in which group the variable is solved.
    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn is_list(&self) -> bool {
        self.length > 0
    }

    pub fn domain(&self) -> Option<&Domain> {
        self.domain.as_ref()
    }

    pub fn constraints(&self) -> &[ValueConstraint] {
        &self.constraints
    }

    pub fn list_constraints(&self) -> &[ListConstraint] {
        &self.list_constraints
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn max_domain_size(&self) -> usize {
        self.max_domain_size
    }

    /// The injected random source, if any.
    pub fn random(&self) -> Option<&SharedRandom> {
        self.random.as_ref()
    }

    /// Binds the whole-list constraints to the name of this variable; they are evaluated on
    /// candidate values of the shape [`Value::List`].
    fn bind_list_constraints(&self) -> Vec<Constraint> {
        self.list_constraints
            .iter()
            .map(|constraint| {
                let constraint = Arc::clone(constraint);
                Constraint::unary(self.name.as_str(), move |value: &Value| {
                    value.as_list().is_some_and(|list| constraint(list))
                })
            })
            .collect()
    }
}

/// Binds per-value constraints to the variable `name`.
pub(crate) fn bind_value_constraints(name: &str, constraints: &[ValueConstraint]) -> Vec<Constraint> {
    constraints
        .iter()
        .map(|constraint| {
            let constraint = Arc::clone(constraint);
            Constraint::unary(name, move |value: &Value| constraint(value))
        })
        .collect()
}

impl Debug for RandVar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandVar")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("length", &self.length)
            .field("domain", &self.domain)
            .field("num_constraints", &self.constraints.len())
            .field("num_list_constraints", &self.list_constraints.len())
            .field("sampler", &self.sampler)
            .finish_non_exhaustive()
    }
}
