use std::fmt::Debug;
use std::fmt::Formatter;
use std::sync::Arc;

use log::debug;

use super::sampler::CompiledSampler;
use super::GeneratorFn;
use super::ListConstraint;
use super::RandVar;
use super::Sampler;
use super::ValueConstraint;
use crate::basic_types::DomainTypeError;
use crate::basic_types::SharedRandom;
use crate::basic_types::Value;
use crate::domain::Domain;
use crate::options::RandomizationOptions;

/// Collects the specification of a [`RandVar`]; see [`RandVar::builder`].
///
/// Exactly one of [`RandVarBuilder::domain`], [`RandVarBuilder::bits`] and
/// [`RandVarBuilder::generator`] should be provided; this is checked by
/// [`RandVarBuilder::build`].
pub struct RandVarBuilder {
    name: String,
    domain: Option<Domain>,
    bits: Option<u32>,
    generator: Option<GeneratorFn>,
    arguments: Option<Vec<Value>>,
    constraints: Vec<ValueConstraint>,
    list_constraints: Vec<ListConstraint>,
    length: usize,
    order: i32,
    max_iterations: Option<usize>,
    max_domain_size: Option<usize>,
    random: Option<SharedRandom>,
}

impl RandVarBuilder {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        RandVarBuilder {
            name: name.into(),
            domain: None,
            bits: None,
            generator: None,
            arguments: None,
            constraints: vec![],
            list_constraints: vec![],
            length: 0,
            order: 0,
            max_iterations: None,
            max_domain_size: None,
            random: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets an explicit domain.
    pub fn domain(mut self, domain: impl Into<Domain>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets the domain to the integers `[0, 2^bits)`.
    pub fn bits(mut self, bits: u32) -> Self {
        self.bits = Some(bits);
        self
    }

    /// Produces values by calling `generator`, with the fixed arguments provided by
    /// [`RandVarBuilder::arguments`] (or none).
    pub fn generator(
        mut self,
        generator: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.generator = Some(Arc::new(generator));
        self
    }

    pub fn arguments(mut self, arguments: impl IntoIterator<Item = Value>) -> Self {
        self.arguments = Some(arguments.into_iter().collect());
        self
    }

    /// Adds a per-value constraint; for a list variable it applies to every element.
    pub fn constraint(mut self, constraint: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.constraints.push(Arc::new(constraint));
        self
    }

    /// Adds a constraint over the whole list; it is ignored for scalar variables.
    pub fn list_constraint(
        mut self,
        constraint: impl Fn(&[Value]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.list_constraints.push(Arc::new(constraint));
        self
    }

    /// Produces lists of `length` elements instead of scalars; `0` means a scalar.
    pub fn length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    pub fn max_domain_size(mut self, max_domain_size: usize) -> Self {
        self.max_domain_size = Some(max_domain_size);
        self
    }

    /// Sets both limits from `options`.
    pub fn options(self, options: RandomizationOptions) -> Self {
        self.max_iterations(options.max_iterations)
            .max_domain_size(options.max_domain_size)
    }

    /// Uses `random` for every draw instead of the process-wide default source.
    pub fn random(mut self, random: SharedRandom) -> Self {
        self.random = Some(random);
        self
    }

    /// Validates the specification and compiles the sampling strategy.
    pub fn build(self) -> Result<RandVar, DomainTypeError> {
        self.build_with_defaults(&RandomizationOptions::default(), None)
    }

    /// Like [`RandVarBuilder::build`], but uses `defaults` and `random` for whatever was not set
    /// on this builder.
    pub fn build_with_defaults(
        self,
        defaults: &RandomizationOptions,
        random: Option<&SharedRandom>,
    ) -> Result<RandVar, DomainTypeError> {
        let name = self.name;
        let num_specified = usize::from(self.domain.is_some())
            + usize::from(self.bits.is_some())
            + usize::from(self.generator.is_some());
        match num_specified {
            0 => return Err(DomainTypeError::Unspecified(name)),
            1 => {}
            _ => return Err(DomainTypeError::OverSpecified(name)),
        }
        if self.arguments.is_some() && self.generator.is_none() {
            return Err(DomainTypeError::ArgumentsWithoutGenerator(name));
        }

        let max_iterations = self.max_iterations.unwrap_or(defaults.max_iterations);
        let max_domain_size = self.max_domain_size.unwrap_or(defaults.max_domain_size);

        let (domain, compiled) = if let Some(function) = self.generator {
            debug!("Variable '{name}' is produced by a generator");
            (
                None,
                CompiledSampler {
                    sampler: Sampler::Generator {
                        function,
                        arguments: self.arguments.unwrap_or_default(),
                    },
                    check_constraints: !self.constraints.is_empty(),
                },
            )
        } else if let Some(bits) = self.bits {
            if bits > Domain::MAX_BITS {
                return Err(DomainTypeError::TooManyBits { name, bits });
            }
            debug!("Variable '{name}' is sampled as a {bits}-bit integer");
            (
                Some(Domain::bits(bits)),
                CompiledSampler {
                    sampler: Sampler::Bits(bits),
                    check_constraints: !self.constraints.is_empty(),
                },
            )
        } else if let Some(domain) = self.domain {
            domain.validate(&name)?;
            let compiled =
                Sampler::compile_domain(&name, &domain, &self.constraints, max_domain_size);
            (Some(domain), compiled)
        } else {
            unreachable!("exactly one of the specifications is present")
        };

        Ok(RandVar {
            name,
            order: self.order,
            length: self.length,
            max_iterations,
            max_domain_size,
            domain,
            constraints: self.constraints,
            list_constraints: self.list_constraints,
            check_constraints: compiled.check_constraints,
            sampler: compiled.sampler,
            random: self.random.or_else(|| random.map(Arc::clone)),
        })
    }
}

impl Debug for RandVarBuilder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandVarBuilder")
            .field("name", &self.name)
            .field("domain", &self.domain)
            .field("bits", &self.bits)
            .field("has_generator", &self.generator.is_some())
            .field("arguments", &self.arguments)
            .field("length", &self.length)
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::basic_types::DomainTypeError;
    use crate::basic_types::Value;
    use crate::domain::Domain;
    use crate::options::RandomizationOptions;
    use crate::RandVar;

    #[test]
    fn missing_specification_is_rejected() {
        let result = RandVar::builder("x").build();

        assert_eq!(
            result.unwrap_err(),
            DomainTypeError::Unspecified("x".to_owned())
        );
    }

    #[test]
    fn bits_and_domain_together_are_rejected() {
        let result = RandVar::builder("x").bits(5).domain(0..10).build();

        assert_eq!(
            result.unwrap_err(),
            DomainTypeError::OverSpecified("x".to_owned())
        );
    }

    #[test]
    fn generator_and_domain_together_are_rejected() {
        let result = RandVar::builder("x")
            .generator(|_| Value::Int(0))
            .domain(0..10)
            .build();

        assert_eq!(
            result.unwrap_err(),
            DomainTypeError::OverSpecified("x".to_owned())
        );
    }

    #[test]
    fn arguments_without_generator_are_rejected() {
        let result = RandVar::builder("x")
            .domain(0..10)
            .arguments([Value::Int(1)])
            .build();

        assert_eq!(
            result.unwrap_err(),
            DomainTypeError::ArgumentsWithoutGenerator("x".to_owned())
        );
    }

    #[test]
    fn too_many_bits_are_rejected() {
        let result = RandVar::builder("x").bits(127).build();

        assert_eq!(
            result.unwrap_err(),
            DomainTypeError::TooManyBits {
                name: "x".to_owned(),
                bits: 127
            }
        );
    }

    #[test]
    fn empty_domain_is_rejected_at_construction() {
        let result = RandVar::builder("x").domain(Domain::values(Vec::<i32>::new())).build();

        assert_eq!(
            result.unwrap_err(),
            DomainTypeError::EmptyDomain("x".to_owned())
        );
    }

    #[test]
    fn bits_establish_the_integer_domain() {
        let var = RandVar::builder("x").bits(5).build().unwrap();

        assert_eq!(var.domain(), Some(&Domain::Range(0..32)));
    }

    #[test]
    fn generator_has_no_domain() {
        let var = RandVar::builder("x")
            .generator(|_| Value::Int(0))
            .build()
            .unwrap();

        assert_eq!(var.domain(), None);
    }

    #[test]
    fn explicit_settings_take_precedence_over_defaults() {
        let defaults = RandomizationOptions {
            max_iterations: 7,
            max_domain_size: 8,
            solutions_per_group: None,
        };
        let var = RandVar::builder("x")
            .domain(0..10)
            .max_iterations(3)
            .build_with_defaults(&defaults, None)
            .unwrap();

        assert_eq!(var.max_iterations(), 3);
        assert_eq!(var.max_domain_size(), 8);
    }
}
