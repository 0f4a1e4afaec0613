use std::sync::Arc;

use constrained_random_core::csp::Assignment;
use constrained_random_core::csp::Constraint;
use constrained_random_core::csp::Problem;
use constrained_random_core::num::BigUint;
use constrained_random_core::RandVar;
use constrained_random_core::RandomizationError;
use constrained_random_core::Value;
use fnv::FnvHashSet;
use log::debug;
use log::trace;

/// The variables of one `order` which are solved together.
///
/// Variables with a small enough domain are added to the problem with their complete domain;
/// the others are randomized and take part with the values they produced.
#[derive(Debug)]
pub(crate) struct VarGroup<'a> {
    problem: Problem,
    names: Vec<&'a str>,
    random_variables: Vec<&'a RandVar>,
    /// The constraints which refer to variables that are solved in a later group.
    remaining_constraints: Vec<Constraint>,
}

impl<'a> VarGroup<'a> {
    pub(crate) fn new(
        variables: &[&'a RandVar],
        solved: &Assignment,
        constraints: Vec<Constraint>,
        max_domain_size: usize,
    ) -> Self {
        let mut problem = Problem::default();
        for (name, value) in solved {
            problem.add_variable(name.as_str(), [value.clone()]);
        }

        let mut random_variables = vec![];
        for &variable in variables {
            match variable.csp_domain_projection() {
                Some(domain)
                    if variable.domain_size_estimate() < BigUint::from(max_domain_size) =>
                {
                    problem.add_variable(variable.name(), domain.iter());
                    for constraint in own_constraints(variable) {
                        problem.add_constraint(constraint);
                    }
                }
                _ => random_variables.push(variable),
            }
        }

        let names = variables.iter().map(|variable| variable.name()).collect::<Vec<_>>();
        let (applicable, remaining_constraints): (Vec<_>, Vec<_>) =
            constraints.into_iter().partition(|constraint| {
                constraint
                    .variables()
                    .iter()
                    .all(|name| names.contains(&name.as_str()) || solved.contains_key(name))
            });
        for constraint in applicable {
            problem.add_constraint(constraint);
        }

        VarGroup {
            problem,
            names,
            random_variables,
            remaining_constraints,
        }
    }

    /// Returns every solution of the group, or [`None`] if none was found within
    /// `max_iterations` attempts.
    ///
    /// Every attempt draws `candidates_per_variable` values (without duplicates) for each variable
    /// which is not solved exhaustively; without such variables there is only a single attempt.
    pub(crate) fn solve(
        &mut self,
        max_iterations: usize,
        candidates_per_variable: usize,
    ) -> Result<Option<Vec<Assignment>>, RandomizationError> {
        if self.random_variables.is_empty() {
            let solutions = self.problem.solutions()?;
            if solutions.is_empty() {
                debug!("Group {:?} has no solution", self.names);
                return Ok(None);
            }
            return Ok(Some(solutions));
        }

        for attempt in 0..max_iterations {
            for variable in &self.random_variables {
                let mut seen = FnvHashSet::default();
                let mut candidates = vec![];
                for _ in 0..candidates_per_variable {
                    let value = variable.randomize()?;
                    if seen.insert(value.clone()) {
                        candidates.push(value);
                    }
                }
                self.problem.add_variable(variable.name(), candidates);
            }

            let solutions = self.problem.solutions()?;
            if !solutions.is_empty() {
                trace!(
                    "Group {:?} has {} solution(s) after {} attempt(s)",
                    self.names,
                    solutions.len(),
                    attempt + 1
                );
                return Ok(Some(solutions));
            }
        }

        debug!(
            "Group {:?} has no solution within {max_iterations} attempts",
            self.names
        );
        Ok(None)
    }

    pub(crate) fn names(&self) -> &[&'a str] {
        &self.names
    }

    pub(crate) fn into_remaining_constraints(self) -> Vec<Constraint> {
        self.remaining_constraints
    }
}

/// The constraints of a variable, expressed over its projected domain: per-value constraints of
/// a list variable have to hold for every element.
fn own_constraints(variable: &RandVar) -> Vec<Constraint> {
    let name = variable.name();

    if !variable.is_list() {
        return variable
            .constraints()
            .iter()
            .map(|constraint| {
                let constraint = Arc::clone(constraint);
                Constraint::unary(name, move |value: &Value| constraint(value))
            })
            .collect();
    }

    let list_constraints = variable.list_constraints().iter().map(|constraint| {
        let constraint = Arc::clone(constraint);
        Constraint::unary(name, move |value: &Value| {
            value.as_list().is_some_and(|list| constraint(list))
        })
    });
    let element_constraints = variable.constraints().iter().map(|constraint| {
        let constraint = Arc::clone(constraint);
        Constraint::unary(name, move |value: &Value| {
            value
                .as_list()
                .is_some_and(|list| list.iter().all(|element| constraint(element)))
        })
    });

    list_constraints.chain(element_constraints).collect()
}
