use itertools::Itertools;
use num::BigUint;
use num::One;

use super::RandVar;
use crate::basic_types::Value;
use crate::domain::Domain;

impl RandVar {
    /// The number of distinct values the variable could produce without constraints; `1` for a
    /// generator, whose domain is unknown.
    pub fn domain_size_estimate(&self) -> BigUint {
        match &self.domain {
            None => BigUint::one(),
            Some(domain) if self.length <= 1 => domain.cardinality(),
            Some(domain) => num::pow(domain.cardinality(), self.length),
        }
    }

    /// Returns whether the variable has a known domain without weights, i.e. whether its domain
    /// can be handed to the constraint solver.
    pub fn is_csp_eligible(&self) -> bool {
        self.domain.as_ref().is_some_and(Domain::is_enumerable)
    }

    /// The domain of the variable as seen by the constraint solver; lists are represented by
    /// every possible list of [`RandVar::length`] elements.
    ///
    /// The number of values grows exponentially with the length of a list; callers should check
    /// [`RandVar::domain_size_estimate`] first.
    pub fn csp_domain_projection(&self) -> Option<Domain> {
        let domain = self.domain.as_ref().filter(|domain| domain.is_enumerable())?;

        let projection = match self.length {
            0 => domain.clone(),
            1 => Domain::Values(domain.iter().map(|value| Value::List(vec![value])).collect()),
            length => Domain::Values(
                (0..length)
                    .map(|_| domain.iter().collect::<Vec<_>>())
                    .multi_cartesian_product()
                    .map(Value::List)
                    .collect(),
            ),
        };

        Some(projection)
    }
}

#[cfg(test)]
mod tests {
    use num::BigUint;

    use crate::basic_types::Value;
    use crate::domain::Domain;
    use crate::domain::WeightedKey;
    use crate::RandVar;

    #[test]
    fn generator_has_a_domain_size_of_one() {
        let var = RandVar::builder("x")
            .generator(|_| Value::Int(3))
            .build()
            .unwrap();

        assert_eq!(var.domain_size_estimate(), BigUint::from(1_u32));
        assert!(!var.is_csp_eligible());
        assert_eq!(var.csp_domain_projection(), None);
    }

    #[test]
    fn list_domain_size_is_raised_to_the_length() {
        let var = RandVar::builder("x").bits(64).length(3).build().unwrap();

        assert_eq!(var.domain_size_estimate(), BigUint::from(2_u32).pow(192));
    }

    #[test]
    fn single_element_list_has_the_scalar_domain_size() {
        let var = RandVar::builder("x").domain(0..10).length(1).build().unwrap();

        assert_eq!(var.domain_size_estimate(), BigUint::from(10_u32));
    }

    #[test]
    fn weighted_domain_size_counts_covered_values() {
        let var = RandVar::builder("x")
            .domain(Domain::weighted([
                (WeightedKey::from(0), 25),
                (WeightedKey::from(1), 25),
                (WeightedKey::from(2..5), 50),
            ]))
            .build()
            .unwrap();

        assert_eq!(var.domain_size_estimate(), BigUint::from(5_u32));
        assert!(!var.is_csp_eligible());
        assert_eq!(var.csp_domain_projection(), None);
    }

    #[test]
    fn scalar_projection_is_the_domain() {
        let var = RandVar::builder("x").domain(0..3).build().unwrap();

        assert!(var.is_csp_eligible());
        assert_eq!(var.csp_domain_projection(), Some(Domain::Range(0..3)));
    }

    #[test]
    fn single_element_list_projection_wraps_every_value() {
        let var = RandVar::builder("x")
            .domain(Domain::values(["a", "b"]))
            .length(1)
            .build()
            .unwrap();

        assert_eq!(
            var.csp_domain_projection(),
            Some(Domain::Values(vec![
                Value::List(vec![Value::from("a")]),
                Value::List(vec![Value::from("b")]),
            ]))
        );
    }

    #[test]
    fn list_projection_is_the_cartesian_product() {
        let var = RandVar::builder("x").domain(0..2).length(2).build().unwrap();

        assert_eq!(
            var.csp_domain_projection(),
            Some(Domain::values([
                Value::from(vec![0, 0]),
                Value::from(vec![0, 1]),
                Value::from(vec![1, 0]),
                Value::from(vec![1, 1]),
            ]))
        );
    }
}
