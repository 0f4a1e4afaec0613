//! The sets of values a [`RandVar`](crate::RandVar) may take before constraints are applied.
mod weighted;

use std::ops::Range;

use num::BigUint;
use num::Zero;
pub use weighted::WeightedKey;
pub(crate) use weighted::WeightedTable;

use crate::basic_types::DomainTypeError;
use crate::basic_types::Value;

/// An explicit domain of a variable.
///
/// Any finite iterable can be turned into a domain with [`Domain::values`] (or
/// [`FromIterator`]); it is materialized once into an ordered sequence, so a domain is always
/// indexable.
///
/// ```rust
/// # use constrained_random_core::domain::Domain;
/// # use constrained_random_core::domain::WeightedKey;
/// # use constrained_random_core::num::BigUint;
/// let range = Domain::from(0..100);
/// let colours = Domain::values(["red", "green", "blue"]);
/// let skewed = Domain::weighted([
///     (WeightedKey::from(0), 25),
///     (WeightedKey::from(1), 25),
///     (WeightedKey::from(2..5), 50),
/// ]);
/// assert_eq!(range.cardinality(), BigUint::from(100_u32));
/// assert_eq!(colours.cardinality(), BigUint::from(3_u32));
/// assert_eq!(skewed.cardinality(), BigUint::from(5_u32));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Domain {
    /// The contiguous integers `[start, end)`.
    Range(Range<i128>),
    /// A finite collection of values.
    Values(Vec<Value>),
    /// A mapping from values or sub-ranges to relative weights; a sub-range is sampled uniformly
    /// once it is selected. Weights are drawn as [`f64`], so they may not exceed
    /// [`Domain::MAX_WEIGHT`].
    Weighted(Vec<(WeightedKey, u64)>),
}

impl Domain {
    pub fn values<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Self {
        Domain::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn weighted<K: Into<WeightedKey>>(entries: impl IntoIterator<Item = (K, u64)>) -> Self {
        Domain::Weighted(
            entries
                .into_iter()
                .map(|(key, weight)| (key.into(), weight))
                .collect(),
        )
    }

    /// The largest supported bit-width; `2^MAX_BITS` is the largest range end which fits in an
    /// [`i128`].
    pub const MAX_BITS: u32 = 126;

    /// The largest weight of a weighted domain which is represented exactly by an [`f64`].
    pub const MAX_WEIGHT: u64 = 1 << f64::MANTISSA_DIGITS;

    /// The domain `[0, 2^bits)` of a bit-width variable. It should hold that
    /// `bits <= Domain::MAX_BITS`.
    pub fn bits(bits: u32) -> Self {
        Domain::Range(0..1 << bits)
    }

    /// Returns whether the domain can be handed to the constraint solver, i.e. whether it is an
    /// enumerable domain without weights.
    pub fn is_enumerable(&self) -> bool {
        matches!(self, Domain::Range(_) | Domain::Values(_))
    }

    /// The number of distinct draws covered by the domain.
    ///
    /// For a weighted domain scalar keys count once and sub-ranges count their length; weights do
    /// not influence the cardinality.
    pub fn cardinality(&self) -> BigUint {
        match self {
            Domain::Range(range) => range_length(range),
            Domain::Values(values) => BigUint::from(values.len()),
            Domain::Weighted(entries) => entries
                .iter()
                .map(|(key, _)| match key {
                    WeightedKey::Value(_) => BigUint::from(1_u32),
                    WeightedKey::Range(range) => range_length(range),
                })
                .sum(),
        }
    }

    /// Iterates over every value covered by the domain, in order.
    ///
    /// Note that a range is enumerated lazily, but callers which collect the values should gate
    /// this on [`Domain::cardinality`].
    pub fn iter(&self) -> Box<dyn Iterator<Item = Value> + '_> {
        match self {
            Domain::Range(range) => Box::new(range.clone().map(Value::Int)),
            Domain::Values(values) => Box::new(values.iter().cloned()),
            Domain::Weighted(entries) => {
                Box::new(entries.iter().flat_map(|(key, _)| -> Box<dyn Iterator<Item = Value>> {
                    match key {
                        WeightedKey::Value(value) => Box::new(std::iter::once(value.clone())),
                        WeightedKey::Range(range) => Box::new(range.clone().map(Value::Int)),
                    }
                }))
            }
        }
    }

    /// Checks that the domain can be sampled from.
    pub(crate) fn validate(&self, name: &str) -> Result<(), DomainTypeError> {
        match self {
            Domain::Range(range) if range.is_empty() => {
                Err(DomainTypeError::EmptyDomain(name.to_owned()))
            }
            Domain::Values(values) if values.is_empty() => {
                Err(DomainTypeError::EmptyDomain(name.to_owned()))
            }
            Domain::Weighted(entries) => {
                if let Some(range) = entries.iter().find_map(|(key, _)| match key {
                    WeightedKey::Range(range) if range.is_empty() => Some(range),
                    _ => None,
                }) {
                    return Err(DomainTypeError::EmptyWeightedRange {
                        name: name.to_owned(),
                        start: range.start,
                        end: range.end,
                    });
                }
                if let Some(&(_, weight)) = entries
                    .iter()
                    .find(|(_, weight)| *weight > Domain::MAX_WEIGHT)
                {
                    return Err(DomainTypeError::WeightTooLarge {
                        name: name.to_owned(),
                        weight,
                    });
                }
                if entries.iter().all(|(_, weight)| *weight == 0) {
                    return Err(DomainTypeError::NoPositiveWeight(name.to_owned()));
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

fn range_length(range: &Range<i128>) -> BigUint {
    if range.is_empty() {
        BigUint::zero()
    } else {
        BigUint::from(range.end.abs_diff(range.start))
    }
}

impl From<Range<i128>> for Domain {
    fn from(range: Range<i128>) -> Self {
        Domain::Range(range)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Domain {
    fn from(values: Vec<T>) -> Self {
        Domain::values(values)
    }
}

impl<T: Into<Value>> FromIterator<T> for Domain {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Domain::values(iter)
    }
}

#[cfg(test)]
mod tests {
    use num::BigUint;

    use super::Domain;
    use super::WeightedKey;
    use crate::basic_types::DomainTypeError;
    use crate::basic_types::Value;

    #[test]
    fn iterable_is_materialized_in_order() {
        let domain = (1..4).map(|i| i * 10).collect::<Domain>();

        assert_eq!(
            domain,
            Domain::Values(vec![Value::Int(10), Value::Int(20), Value::Int(30)])
        );
    }

    #[test]
    fn cardinality_of_extreme_range_does_not_overflow() {
        let domain = Domain::from(i128::MIN..i128::MAX);

        assert_eq!(domain.cardinality(), BigUint::from(u128::MAX));
    }

    #[test]
    fn weighted_domain_iterates_over_all_covered_values() {
        let domain = Domain::weighted([(WeightedKey::from(7), 1), (WeightedKey::from(2..4), 1)]);

        assert_eq!(
            domain.iter().collect::<Vec<_>>(),
            vec![Value::Int(7), Value::Int(2), Value::Int(3)]
        );
        assert!(!domain.is_enumerable());
    }

    #[test]
    fn empty_domains_are_rejected() {
        assert_eq!(
            Domain::from(5..5).validate("x"),
            Err(DomainTypeError::EmptyDomain("x".to_owned()))
        );
        assert_eq!(
            Domain::values(Vec::<i32>::new()).validate("x"),
            Err(DomainTypeError::EmptyDomain("x".to_owned()))
        );
    }

    #[test]
    fn weighted_domain_without_positive_weight_is_rejected() {
        let domain = Domain::weighted([(WeightedKey::from(0), 0)]);

        assert_eq!(
            domain.validate("x"),
            Err(DomainTypeError::NoPositiveWeight("x".to_owned()))
        );
    }

    #[test]
    fn weights_beyond_float_precision_are_rejected() {
        let largest = Domain::weighted([
            (WeightedKey::from(0), Domain::MAX_WEIGHT),
            (WeightedKey::from(1), 1),
        ]);
        let too_large = Domain::weighted([(WeightedKey::from(0), Domain::MAX_WEIGHT + 1)]);

        assert_eq!(largest.validate("x"), Ok(()));
        assert_eq!(
            too_large.validate("x"),
            Err(DomainTypeError::WeightTooLarge {
                name: "x".to_owned(),
                weight: Domain::MAX_WEIGHT + 1
            })
        );
    }

    #[test]
    fn weighted_domain_with_empty_sub_range_is_rejected() {
        let domain = Domain::weighted([(WeightedKey::from(3..1), 4)]);

        assert_eq!(
            domain.validate("x"),
            Err(DomainTypeError::EmptyWeightedRange {
                name: "x".to_owned(),
                start: 3,
                end: 1
            })
        );
    }
}
