use std::sync::Arc;

use log::debug;
use log::trace;
use num::BigUint;

use super::bind_value_constraints;
use super::RandVar;
use super::ValueConstraint;
use crate::basic_types::with_random;
use crate::basic_types::RandomizationError;
use crate::basic_types::Value;
use crate::csp::solve_all;
use crate::csp::solve_one;
use crate::csp::Constraint;
use crate::domain::Domain;

impl RandVar {
    /// Produces a random value which satisfies every constraint of the variable.
    ///
    /// Scalar variables produce a scalar value and list variables produce a [`Value::List`] of
    /// [`RandVar::length`] elements.
    pub fn randomize(&self) -> Result<Value, RandomizationError> {
        self.randomize_with(&[])
    }

    /// Produces a random value which additionally satisfies the `temporary` per-value
    /// constraints, which only apply to this call.
    pub fn randomize_with(
        &self,
        temporary: &[ValueConstraint],
    ) -> Result<Value, RandomizationError> {
        let check_constraints = self.check_constraints || !temporary.is_empty();
        let constraints = self
            .constraints
            .iter()
            .chain(temporary)
            .map(Arc::clone)
            .collect::<Vec<_>>();

        match self.length {
            0 => self.randomize_once(&constraints, check_constraints),
            1 => Ok(Value::List(vec![
                self.randomize_once(&constraints, check_constraints)?
            ])),
            _ => self
                .randomize_list(&constraints, check_constraints)
                .map(Value::List),
        }
    }

    /// Draws raw values until one satisfies `constraints`, checking at most
    /// [`RandVar::max_iterations`] of them.
    fn randomize_once(
        &self,
        constraints: &[ValueConstraint],
        check_constraints: bool,
    ) -> Result<Value, RandomizationError> {
        if !check_constraints {
            return self.sampler.sample(&self.name, self.random.as_ref());
        }

        let bound = bind_value_constraints(&self.name, constraints);
        for _ in 0..self.max_iterations {
            let candidate = self.sampler.sample(&self.name, self.random.as_ref())?;
            if solve_one(&self.name, [candidate.clone()], &bound)?.is_some() {
                return Ok(candidate);
            }
            trace!("Candidate {candidate} for '{}' is rejected", self.name);
        }

        debug!(
            "No value for '{}' within {} attempts",
            self.name, self.max_iterations
        );
        Err(RandomizationError::IterationsExhausted {
            name: self.name.clone(),
            max_iterations: self.max_iterations,
        })
    }

    fn randomize_list(
        &self,
        constraints: &[ValueConstraint],
        check_constraints: bool,
    ) -> Result<Vec<Value>, RandomizationError> {
        match self.domain.as_ref() {
            Some(domain)
                if !self.list_constraints.is_empty()
                    && domain.is_enumerable()
                    && domain.cardinality() < BigUint::from(self.max_domain_size) =>
            {
                self.randomize_list_exhaustively(domain, constraints)
            }
            _ => self.randomize_list_per_element(constraints, check_constraints),
        }
    }

    /// Builds the list from left to right; every value of the domain extends the prefix and one of
    /// the extensions which satisfy all constraints is chosen.
    fn randomize_list_exhaustively(
        &self,
        domain: &Domain,
        constraints: &[ValueConstraint],
    ) -> Result<Vec<Value>, RandomizationError> {
        let mut bound = self.bind_list_constraints();
        if !constraints.is_empty() {
            let constraints = constraints.to_vec();
            bound.push(Constraint::unary(self.name.as_str(), move |value: &Value| {
                value
                    .as_list()
                    .and_then(<[Value]>::last)
                    .is_some_and(|last| constraints.iter().all(|constraint| constraint(last)))
            }));
        }

        let mut values: Vec<Value> = Vec::with_capacity(self.length);
        for position in 0..self.length {
            let candidates = domain.iter().map(|value| {
                let mut candidate = values.clone();
                candidate.push(value);
                Value::List(candidate)
            });
            let mut solutions = solve_all(&self.name, candidates, &bound)?;

            if solutions.is_empty() {
                debug!(
                    "No extension of position {position} of '{}' satisfies the constraints",
                    self.name
                );
                return Err(RandomizationError::Unsolvable {
                    name: self.name.clone(),
                });
            }

            let index = with_random(self.random.as_ref(), |random| {
                random.generate_usize_in_range(0..solutions.len())
            });
            let Value::List(extended) = solutions.swap_remove(index) else {
                unreachable!("every candidate is a list")
            };
            values = extended;
        }

        Ok(values)
    }

    /// Draws every element separately; every element but the first is redrawn until the list so
    /// far satisfies the whole-list constraints.
    fn randomize_list_per_element(
        &self,
        constraints: &[ValueConstraint],
        check_constraints: bool,
    ) -> Result<Vec<Value>, RandomizationError> {
        let bound = self.bind_list_constraints();

        let mut values: Vec<Value> = Vec::with_capacity(self.length);
        for position in 0..self.length {
            let mut candidate = self.randomize_once(constraints, check_constraints)?;

            if position > 0 && !bound.is_empty() {
                let mut iterations = 0;
                loop {
                    if iterations == self.max_iterations {
                        debug!(
                            "No element at position {position} of '{}' within {} attempts",
                            self.name, self.max_iterations
                        );
                        return Err(RandomizationError::IterationsExhausted {
                            name: self.name.clone(),
                            max_iterations: self.max_iterations,
                        });
                    }

                    let mut extended = values.clone();
                    extended.push(candidate.clone());
                    if solve_one(&self.name, [Value::List(extended)], &bound)?.is_some() {
                        break;
                    }

                    trace!(
                        "Element {candidate} at position {position} of '{}' is rejected",
                        self.name
                    );
                    candidate = self.randomize_once(constraints, check_constraints)?;
                    iterations += 1;
                }
            }

            values.push(candidate);
        }

        Ok(values)
    }
}
