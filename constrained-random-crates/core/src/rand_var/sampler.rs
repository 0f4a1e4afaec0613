use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::Range;

use log::debug;
use num::BigUint;

use super::bind_value_constraints;
use super::GeneratorFn;
use super::ValueConstraint;
use crate::basic_types::with_random;
use crate::basic_types::RandomizationError;
use crate::basic_types::SharedRandom;
use crate::basic_types::Value;
use crate::cr_assert_simple;
use crate::csp::solve_all;
use crate::domain::Domain;
use crate::domain::WeightedTable;

/// The compiled strategy of a [`RandVar`](crate::RandVar), which produces raw (unchecked) values.
#[derive(Clone)]
pub(crate) enum Sampler {
    /// Calls a user-provided function with fixed arguments.
    Generator {
        function: GeneratorFn,
        arguments: Vec<Value>,
    },
    /// Draws an integer of the given bit-width.
    Bits(u32),
    /// Draws uniformly from `[start, end)`.
    Range(Range<i128>),
    /// Draws uniformly from a collection.
    Choice(Vec<Value>),
    /// Draws proportionally to the weights of the entries.
    Weighted(WeightedTable),
    /// Draws uniformly from values which are known to satisfy every per-value constraint.
    Solutions(Vec<Value>),
}

/// The result of compiling a specification: the sampler and whether its draws still need to be
/// checked against the per-value constraints.
pub(crate) struct CompiledSampler {
    pub(crate) sampler: Sampler,
    pub(crate) check_constraints: bool,
}

impl Sampler {
    /// Compiles an explicit domain, taking the exhaustive shortcut when there are constraints and
    /// the domain is small enough to enumerate.
    ///
    /// It is assumed that `domain` has been validated.
    pub(crate) fn compile_domain(
        name: &str,
        domain: &Domain,
        constraints: &[ValueConstraint],
        max_domain_size: usize,
    ) -> CompiledSampler {
        if !constraints.is_empty()
            && domain.is_enumerable()
            && domain.cardinality() < BigUint::from(max_domain_size)
        {
            let bound = bind_value_constraints(name, constraints);
            // Every bound constraint names only `name`, which is the sole variable of the problem,
            // so the solver cannot report an unknown variable.
            cr_assert_simple!(bound
                .iter()
                .flat_map(|constraint| constraint.variables())
                .all(|variable| variable == name));
            let solutions = solve_all(name, domain.iter(), &bound)
                .expect("a single-variable problem only constrains its own variable");

            debug!(
                "Variable '{name}' is solved exhaustively with {} solution(s) out of {} value(s)",
                solutions.len(),
                domain.cardinality()
            );

            return CompiledSampler {
                sampler: Sampler::Solutions(solutions),
                check_constraints: false,
            };
        }

        let sampler = match domain {
            Domain::Range(range) => Sampler::Range(range.clone()),
            Domain::Values(values) => Sampler::Choice(values.clone()),
            Domain::Weighted(entries) => Sampler::Weighted(WeightedTable::new(entries)),
        };
        debug!(
            "Variable '{name}' is sampled with {sampler:?} and {} checked constraint(s)",
            constraints.len()
        );

        CompiledSampler {
            sampler,
            check_constraints: !constraints.is_empty(),
        }
    }

    /// Produces one raw value; only a pool of precomputed solutions can fail, when it is empty.
    pub(crate) fn sample(
        &self,
        name: &str,
        random: Option<&SharedRandom>,
    ) -> Result<Value, RandomizationError> {
        let value = match self {
            Sampler::Generator {
                function,
                arguments,
            } => function(arguments),
            Sampler::Bits(bits) => Value::Int(with_random(random, |random| {
                random.generate_bits(*bits)
            })),
            Sampler::Range(range) => Value::Int(with_random(random, |random| {
                random.generate_i128_in_range(range.clone())
            })),
            Sampler::Choice(values) | Sampler::Solutions(values) => {
                if values.is_empty() {
                    return Err(RandomizationError::Unsolvable {
                        name: name.to_owned(),
                    });
                }
                let index = with_random(random, |random| {
                    random.generate_usize_in_range(0..values.len())
                });
                values[index].clone()
            }
            Sampler::Weighted(table) => with_random(random, |random| table.sample(random)),
        };

        Ok(value)
    }
}

impl Debug for Sampler {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sampler::Generator { arguments, .. } => f
                .debug_struct("Generator")
                .field("arguments", arguments)
                .finish_non_exhaustive(),
            Sampler::Bits(bits) => f.debug_tuple("Bits").field(bits).finish(),
            Sampler::Range(range) => f.debug_tuple("Range").field(range).finish(),
            Sampler::Choice(values) => f.debug_tuple("Choice").field(&values.len()).finish(),
            Sampler::Weighted(table) => f.debug_tuple("Weighted").field(table).finish(),
            Sampler::Solutions(values) => f
                .debug_tuple("Solutions")
                .field(&values.len())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::Sampler;
    use crate::basic_types::shared_random;
    use crate::basic_types::tests::TestRandom;
    use crate::basic_types::RandomizationError;
    use crate::basic_types::Value;
    use crate::domain::Domain;
    use crate::rand_var::bind_value_constraints;
    use crate::rand_var::ValueConstraint;

    fn is_even() -> ValueConstraint {
        Arc::new(|value: &Value| value.as_int().is_some_and(|x| x % 2 == 0))
    }

    #[test]
    fn small_constrained_domain_is_solved_exhaustively() {
        let compiled = Sampler::compile_domain("x", &Domain::from(0..10), &[is_even()], 1024);

        assert!(!compiled.check_constraints);
        match compiled.sampler {
            Sampler::Solutions(solutions) => assert_eq!(
                solutions,
                (0..10).step_by(2).map(Value::Int).collect::<Vec<_>>()
            ),
            sampler => panic!("expected precomputed solutions, got {sampler:?}"),
        }
    }

    #[test]
    fn bound_constraints_only_name_their_own_variable() {
        let bound = bind_value_constraints("x", &[is_even(), is_even()]);

        assert_eq!(bound.len(), 2);
        assert!(bound.iter().all(|constraint| constraint.variables() == ["x"]));
        assert!(bound[0].is_satisfied(&[&Value::Int(4)]));
    }

    #[test]
    fn domain_at_threshold_is_checked_at_sampling_time() {
        let compiled = Sampler::compile_domain("x", &Domain::from(0..10), &[is_even()], 10);

        assert!(compiled.check_constraints);
        assert!(matches!(compiled.sampler, Sampler::Range(_)));
    }

    #[test]
    fn unconstrained_domain_is_never_checked() {
        let compiled = Sampler::compile_domain("x", &Domain::values(["a", "b"]), &[], 1024);

        assert!(!compiled.check_constraints);
        assert!(matches!(compiled.sampler, Sampler::Choice(_)));
    }

    #[test]
    fn weighted_domain_never_takes_the_exhaustive_shortcut() {
        let domain = Domain::weighted([(0, 1), (1, 1)]);
        let compiled = Sampler::compile_domain("x", &domain, &[is_even()], 1024);

        assert!(compiled.check_constraints);
        assert!(matches!(compiled.sampler, Sampler::Weighted(_)));
    }

    #[test]
    fn empty_pool_of_solutions_fails_every_draw() {
        let never: ValueConstraint = Arc::new(|_: &Value| false);
        let compiled = Sampler::compile_domain("x", &Domain::from(0..10), &[never], 1024);

        assert_eq!(
            compiled.sampler.sample("x", None),
            Err(RandomizationError::Unsolvable {
                name: "x".to_owned()
            })
        );
    }

    #[test]
    fn choice_uses_the_injected_random_source() {
        let random = shared_random(TestRandom {
            usizes: vec![2, 0],
            ..Default::default()
        });
        let sampler = Sampler::Choice(vec![Value::Int(5), Value::Int(6), Value::Int(7)]);

        assert_eq!(sampler.sample("x", Some(&random)), Ok(Value::Int(7)));
        assert_eq!(sampler.sample("x", Some(&random)), Ok(Value::Int(5)));
    }

    #[test]
    fn generator_is_called_with_its_arguments() {
        let sampler = Sampler::Generator {
            function: Arc::new(|arguments: &[Value]| {
                Value::Int(arguments[0].as_int().unwrap_or_default() + 1)
            }),
            arguments: vec![Value::Int(1)],
        };

        assert_eq!(sampler.sample("x", None), Ok(Value::Int(2)));
    }
}
