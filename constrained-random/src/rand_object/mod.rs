//! Randomization of several variables which are related by constraints.
mod var_group;

use std::collections::BTreeMap;
use std::sync::Arc;

use constrained_random_core::csp::Assignment;
use constrained_random_core::csp::Constraint;
use constrained_random_core::csp::ProblemError;
use constrained_random_core::rand::rngs::SmallRng;
use constrained_random_core::rand::SeedableRng;
use constrained_random_core::shared_random;
use constrained_random_core::with_random;
use constrained_random_core::DomainTypeError;
use constrained_random_core::RandVar;
use constrained_random_core::RandVarBuilder;
use constrained_random_core::RandomizationError;
use constrained_random_core::RandomizationOptions;
use constrained_random_core::Random;
use constrained_random_core::SharedRandom;
use constrained_random_core::Value;
use constrained_random_core::ValueConstraint;
use fnv::FnvHashMap;
use fnv::FnvHashSet;
use log::debug;
use log::trace;
use thiserror::Error;
use var_group::VarGroup;

/// Errors related to registering variables and constraints with a [`RandObject`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RandObjectError {
    #[error("a variable named '{0}' was already added")]
    DuplicateVariable(String),
    #[error("the constraint refers to the unknown variable '{0}'")]
    UnknownVariable(String),
    #[error(transparent)]
    Domain(#[from] DomainTypeError),
}

/// A collection of [`RandVar`]s and constraints between them which are randomized together.
///
/// Without constraints between variables every variable is randomized on its own. Otherwise the
/// constrained variables are solved in groups of ascending [`RandVar::order`]: a group is solved
/// with the values chosen for the earlier groups fixed, and constraints which refer to a variable
/// of a later group are only applied once that group is solved.
///
/// ```rust
/// # use constrained_random::RandObject;
/// # use constrained_random::RandVar;
/// # use constrained_random::Value;
/// let mut object = RandObject::default();
/// object.add_rand_var(RandVar::builder("x").domain(0..100)).unwrap();
/// object
///     .add_rand_var(RandVar::builder("y").domain(0..100).order(1))
///     .unwrap();
/// object
///     .add_constraint(
///         |values: &[&Value]| values[1].as_int() == values[0].as_int().map(|x| x + 1),
///         ["x", "y"],
///     )
///     .unwrap();
///
/// object.randomize().unwrap();
/// let x = object.get_value("x").and_then(Value::as_int).unwrap();
/// let y = object.get_value("y").and_then(Value::as_int).unwrap();
/// assert_eq!(y, x + 1);
/// ```
#[derive(Debug, Default)]
pub struct RandObject {
    options: RandomizationOptions,
    random: Option<SharedRandom>,
    /// The variables in the order in which they were added.
    variables: Vec<RandVar>,
    constraints: Vec<Constraint>,
    values: FnvHashMap<String, Value>,
}

impl RandObject {
    /// Creates an object whose variables use `options` and `random` unless they set their own.
    pub fn new(options: RandomizationOptions, random: Option<SharedRandom>) -> Self {
        RandObject {
            options,
            random,
            ..Default::default()
        }
    }

    /// Creates an object whose variables all draw from a generator seeded with `seed`.
    pub fn with_seed(options: RandomizationOptions, seed: u64) -> Self {
        RandObject::new(options, Some(shared_random(SmallRng::seed_from_u64(seed))))
    }

    pub fn options(&self) -> &RandomizationOptions {
        &self.options
    }

    /// Builds the variable described by `builder` and adds it to the object.
    pub fn add_rand_var(&mut self, builder: RandVarBuilder) -> Result<(), RandObjectError> {
        if self.get_var(builder.name()).is_some() {
            return Err(RandObjectError::DuplicateVariable(builder.name().to_owned()));
        }

        let variable = builder.build_with_defaults(&self.options, self.random.as_ref())?;
        debug!("Added {variable:?}");
        self.variables.push(variable);

        Ok(())
    }

    /// Adds a constraint over the variables named in `variables`; `predicate` receives their
    /// values in the same order.
    pub fn add_constraint<S: Into<String>>(
        &mut self,
        predicate: impl Fn(&[&Value]) -> bool + Send + Sync + 'static,
        variables: impl IntoIterator<Item = S>,
    ) -> Result<(), RandObjectError> {
        let constraint = Constraint::new(predicate, variables);
        if let Some(unknown) = self.find_unknown_variable(&constraint) {
            return Err(RandObjectError::UnknownVariable(unknown.to_owned()));
        }

        self.constraints.push(constraint);
        Ok(())
    }

    pub fn get_var(&self, name: &str) -> Option<&RandVar> {
        self.variables.iter().find(|variable| variable.name() == name)
    }

    /// The value of `name` chosen by the last successful randomization.
    pub fn get_value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Randomizes every variable such that all constraints hold.
    ///
    /// On failure the values of the previous randomization are kept.
    pub fn randomize(&mut self) -> Result<(), RandomizationError> {
        self.randomize_with(&[])
    }

    /// Like [`RandObject::randomize`], but `temporary` constraints also have to hold for this
    /// randomization only.
    pub fn randomize_with(&mut self, temporary: &[Constraint]) -> Result<(), RandomizationError> {
        if let Some(unknown) = temporary
            .iter()
            .find_map(|constraint| self.find_unknown_variable(constraint))
        {
            return Err(ProblemError::UnknownVariable(unknown.to_owned()).into());
        }

        // A variable is solved jointly once a permanent constraint or a temporary constraint over
        // several variables names it.
        let constrained = self
            .constraints
            .iter()
            .chain(temporary.iter().filter(|constraint| constraint.variables().len() > 1))
            .flat_map(|constraint| constraint.variables())
            .map(String::as_str)
            .collect::<FnvHashSet<_>>();

        // Constraints over a single independent variable are passed to that variable directly.
        let mut unary_constraints: FnvHashMap<&str, Vec<ValueConstraint>> = FnvHashMap::default();
        let mut joint_constraints = self.constraints.clone();
        for constraint in temporary {
            match constraint.variables() {
                [name] if !constrained.contains(name.as_str()) => {
                    let constraint = constraint.clone();
                    unary_constraints
                        .entry(name.as_str())
                        .or_default()
                        .push(Arc::new(move |value: &Value| constraint.is_satisfied(&[value])));
                }
                _ => joint_constraints.push(constraint.clone()),
            }
        }

        let mut values = FnvHashMap::default();
        for variable in &self.variables {
            if constrained.contains(variable.name()) {
                continue;
            }
            let temporary = unary_constraints
                .get(variable.name())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let _ = values.insert(
                variable.name().to_owned(),
                variable.randomize_with(temporary)?,
            );
        }

        if !joint_constraints.is_empty() {
            let variables = self
                .variables
                .iter()
                .filter(|variable| constrained.contains(variable.name()))
                .collect::<Vec<_>>();
            values.extend(self.solve_jointly(&variables, &joint_constraints)?);
        }

        self.values = values;
        Ok(())
    }

    /// Solves the constrained variables group by group, retrying the whole problem until every
    /// group is solved or the iteration budget is spent.
    fn solve_jointly(
        &self,
        variables: &[&RandVar],
        constraints: &[Constraint],
    ) -> Result<Assignment, RandomizationError> {
        let mut groups: BTreeMap<i32, Vec<&RandVar>> = BTreeMap::new();
        for &variable in variables {
            groups.entry(variable.order()).or_default().push(variable);
        }

        for attempt in 0..self.options.max_iterations {
            if let Some(solution) = self.solve_groups(&groups, constraints)? {
                return Ok(solution);
            }
            trace!("Attempt {} to solve the constrained variables failed", attempt + 1);
        }

        let name = variables
            .iter()
            .map(|variable| variable.name())
            .collect::<Vec<_>>()
            .join(", ");
        debug!(
            "Variables [{name}] could not be solved within {} attempts",
            self.options.max_iterations
        );
        Err(RandomizationError::IterationsExhausted {
            name,
            max_iterations: self.options.max_iterations,
        })
    }

    /// Makes one attempt at solving every group; returns [`None`] as soon as a group cannot be
    /// solved.
    fn solve_groups(
        &self,
        groups: &BTreeMap<i32, Vec<&RandVar>>,
        constraints: &[Constraint],
    ) -> Result<Option<Assignment>, RandomizationError> {
        let candidates_per_variable = self
            .options
            .solutions_per_group
            .unwrap_or(self.options.max_domain_size);

        let mut solved = Assignment::default();
        let mut remaining = constraints.to_vec();
        for group in groups.values() {
            let mut var_group =
                VarGroup::new(group, &solved, remaining, self.options.max_domain_size);
            let Some(mut solutions) =
                var_group.solve(self.options.max_iterations, candidates_per_variable)?
            else {
                return Ok(None);
            };

            let index = with_random(self.random.as_ref(), |random: &mut dyn Random| {
                random.generate_usize_in_range(0..solutions.len())
            });
            let mut solution = solutions.swap_remove(index);
            for name in var_group.names() {
                if let Some(value) = solution.remove(*name) {
                    let _ = solved.insert((*name).to_owned(), value);
                }
            }
            remaining = var_group.into_remaining_constraints();
        }

        Ok(Some(solved))
    }

    fn find_unknown_variable<'c>(&self, constraint: &'c Constraint) -> Option<&'c str> {
        constraint
            .variables()
            .iter()
            .find(|name| self.get_var(name).is_none())
            .map(String::as_str)
    }
}
