use std::cmp::Reverse;
use std::ops::ControlFlow;

use log::trace;
use thiserror::Error;

use super::Constraint;
use crate::basic_types::HashMap;
use crate::basic_types::Value;

/// A satisfying assignment of values to the variables of a [`Problem`].
pub type Assignment = HashMap<String, Value>;

/// Errors related to malformed [`Problem`]s.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    /// A constraint refers to a variable which was never added to the problem.
    #[error("a constraint refers to the unknown variable '{0}'")]
    UnknownVariable(String),
}

/// A finite-domain constraint satisfaction problem over named variables.
///
/// The problem is solved with a depth-first backtracking search. Variables which take part in
/// more constraints (and then those with smaller domains) are assigned first; a constraint is
/// evaluated as soon as all of its variables are assigned, and forward checking removes values
/// from the domain of the last unassigned variable of a constraint.
///
/// ```rust
/// # use constrained_random_core::csp::Constraint;
/// # use constrained_random_core::csp::Problem;
/// # use constrained_random_core::Value;
/// let mut problem = Problem::default();
/// problem.add_variable("x", (0..10).map(Value::from));
/// problem.add_variable("y", (0..10).map(Value::from));
/// problem.add_constraint(Constraint::new(
///     |values: &[&Value]| values[0].as_int().unwrap() + values[1].as_int().unwrap() == 3,
///     ["x", "y"],
/// ));
///
/// let solutions = problem.solutions().unwrap();
/// assert_eq!(solutions.len(), 4);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Problem {
    variables: Vec<(String, Vec<Value>)>,
    constraints: Vec<Constraint>,
}

impl Problem {
    /// Adds a variable with the provided candidate values; if a variable with the same name was
    /// already added then its candidates are replaced.
    pub fn add_variable(&mut self, name: impl Into<String>, values: impl IntoIterator<Item = Value>) {
        let name = name.into();
        let values = values.into_iter().collect();

        match self.variables.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing_values)) => *existing_values = values,
            None => self.variables.push((name, values)),
        }
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Returns every satisfying assignment; the order is deterministic for a given problem.
    pub fn solutions(&self) -> Result<Vec<Assignment>, ProblemError> {
        let mut solutions = Vec::new();
        let _ = self.search(&mut |assignment| {
            solutions.push(assignment);
            ControlFlow::Continue(())
        })?;
        trace!("Found {} solutions", solutions.len());
        Ok(solutions)
    }

    /// Returns the first satisfying assignment, if there is any.
    pub fn solution(&self) -> Result<Option<Assignment>, ProblemError> {
        let mut solution = None;
        let _ = self.search(&mut |assignment| {
            solution = Some(assignment);
            ControlFlow::Break(())
        })?;
        Ok(solution)
    }

    fn search(
        &self,
        on_solution: &mut dyn FnMut(Assignment) -> ControlFlow<()>,
    ) -> Result<ControlFlow<()>, ProblemError> {
        match Search::new(self)? {
            Some(mut search) => Ok(search.assign(0, on_solution)),
            None => Ok(ControlFlow::Continue(())),
        }
    }
}

/// The state of one backtracking search; variables are referred to by their position in the
/// search order.
struct Search<'problem> {
    names: Vec<&'problem str>,
    domains: Vec<Vec<Value>>,
    assignment: Vec<Option<Value>>,
    /// Each constraint together with the positions of its variables.
    constraints: Vec<(&'problem Constraint, Vec<usize>)>,
    /// For each position, the indices of the constraints in which it occurs.
    watchers: Vec<Vec<usize>>,
}

impl<'problem> Search<'problem> {
    /// Prepares the search; returns [`None`] if a constraint without variables is violated.
    fn new(problem: &'problem Problem) -> Result<Option<Self>, ProblemError> {
        let degree = |name: &str| {
            problem
                .constraints
                .iter()
                .filter(|constraint| constraint.variables().iter().any(|var| var == name))
                .count()
        };

        let mut order = problem.variables.iter().collect::<Vec<_>>();
        order.sort_by_key(|(name, values)| (Reverse(degree(name.as_str())), values.len()));

        let names = order
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>();
        let domains = order
            .iter()
            .map(|(_, values)| values.clone())
            .collect::<Vec<_>>();

        let mut constraints = Vec::with_capacity(problem.constraints.len());
        let mut watchers = vec![Vec::new(); names.len()];

        for constraint in &problem.constraints {
            let positions = constraint
                .variables()
                .iter()
                .map(|var| {
                    names
                        .iter()
                        .position(|name| *name == var.as_str())
                        .ok_or_else(|| ProblemError::UnknownVariable(var.clone()))
                })
                .collect::<Result<Vec<_>, _>>()?;

            if positions.is_empty() {
                if !constraint.is_satisfied(&[]) {
                    return Ok(None);
                }
                continue;
            }

            let index = constraints.len();
            let mut watched = positions.clone();
            watched.sort_unstable();
            watched.dedup();
            for position in watched {
                watchers[position].push(index);
            }
            constraints.push((constraint, positions));
        }

        Ok(Some(Search {
            assignment: vec![None; names.len()],
            names,
            domains,
            constraints,
            watchers,
        }))
    }

    fn assign(
        &mut self,
        position: usize,
        on_solution: &mut dyn FnMut(Assignment) -> ControlFlow<()>,
    ) -> ControlFlow<()> {
        if position == self.names.len() {
            let assignment = self
                .names
                .iter()
                .zip(&self.assignment)
                .map(|(name, value)| {
                    let value = value
                        .clone()
                        .expect("every variable is assigned once the search is complete");
                    ((*name).to_owned(), value)
                })
                .collect();
            return on_solution(assignment);
        }

        let candidates = self.domains[position].clone();
        for value in candidates {
            self.assignment[position] = Some(value);

            let mut pruned = Vec::new();
            let flow = if self.propagate(position, &mut pruned) {
                self.assign(position + 1, on_solution)
            } else {
                ControlFlow::Continue(())
            };

            for (pruned_position, domain) in pruned.into_iter().rev() {
                self.domains[pruned_position] = domain;
            }
            if flow.is_break() {
                self.assignment[position] = None;
                return flow;
            }
        }

        self.assignment[position] = None;
        ControlFlow::Continue(())
    }

    /// Checks the constraints which became fully assigned and applies forward checking to the
    /// ones with a single unassigned variable left. The replaced domains are stored in `pruned`
    /// so that they can be restored.
    fn propagate(&mut self, position: usize, pruned: &mut Vec<(usize, Vec<Value>)>) -> bool {
        for watcher in 0..self.watchers[position].len() {
            let index = self.watchers[position][watcher];
            let mut unassigned = self.constraints[index]
                .1
                .iter()
                .copied()
                .filter(|other| *other > position)
                .collect::<Vec<_>>();
            unassigned.sort_unstable();
            unassigned.dedup();

            match unassigned.as_slice() {
                [] => {
                    if !self.evaluate(index, None) {
                        return false;
                    }
                }
                [remaining] => {
                    let remaining = *remaining;
                    let supported = self.domains[remaining]
                        .iter()
                        .filter(|candidate| self.evaluate(index, Some((remaining, candidate))))
                        .cloned()
                        .collect::<Vec<_>>();

                    if supported.len() != self.domains[remaining].len() {
                        let previous = std::mem::replace(&mut self.domains[remaining], supported);
                        pruned.push((remaining, previous));
                    }
                    if self.domains[remaining].is_empty() {
                        return false;
                    }
                }
                _ => {}
            }
        }

        true
    }

    /// Evaluates a constraint on the current assignment, where `candidate` optionally provides the
    /// value of one not yet assigned position.
    fn evaluate(&self, index: usize, candidate: Option<(usize, &Value)>) -> bool {
        let (constraint, positions) = &self.constraints[index];
        let values = positions
            .iter()
            .map(|position| match candidate {
                Some((candidate_position, value)) if candidate_position == *position => value,
                _ => self.assignment[*position]
                    .as_ref()
                    .expect("constraint is only evaluated when its variables are assigned"),
            })
            .collect::<Vec<_>>();

        constraint.is_satisfied(&values)
    }
}

/// Enumerates every value of the single variable `name` which satisfies all `constraints`.
pub fn solve_all(
    name: &str,
    domain: impl IntoIterator<Item = Value>,
    constraints: &[Constraint],
) -> Result<Vec<Value>, ProblemError> {
    let problem = single_variable_problem(name, domain, constraints);
    Ok(problem
        .solutions()?
        .into_iter()
        .filter_map(|mut assignment| assignment.remove(name))
        .collect())
}

/// Finds one value of the single variable `name` which satisfies all `constraints`.
pub fn solve_one(
    name: &str,
    domain: impl IntoIterator<Item = Value>,
    constraints: &[Constraint],
) -> Result<Option<Value>, ProblemError> {
    let problem = single_variable_problem(name, domain, constraints);
    Ok(problem
        .solution()?
        .and_then(|mut assignment| assignment.remove(name)))
}

fn single_variable_problem(
    name: &str,
    domain: impl IntoIterator<Item = Value>,
    constraints: &[Constraint],
) -> Problem {
    let mut problem = Problem::default();
    problem.add_variable(name, domain);
    for constraint in constraints {
        problem.add_constraint(constraint.clone());
    }
    problem
}
