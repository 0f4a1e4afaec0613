use std::ops::Range;

use crate::basic_types::Random;
use crate::basic_types::Value;
use crate::cr_assert_eq_simple;

/// A key of a weighted [`Domain`](super::Domain): either one value or a sub-range of integers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WeightedKey {
    Value(Value),
    Range(Range<i128>),
}

impl From<Value> for WeightedKey {
    fn from(value: Value) -> Self {
        WeightedKey::Value(value)
    }
}

impl From<Range<i128>> for WeightedKey {
    fn from(range: Range<i128>) -> Self {
        WeightedKey::Range(range)
    }
}

macro_rules! impl_from_scalar {
    ($($scalar:ty),*) => {
        $(
            impl From<$scalar> for WeightedKey {
                fn from(value: $scalar) -> Self {
                    WeightedKey::Value(value.into())
                }
            }
        )*
    };
}

impl_from_scalar!(i32, i64, i128, u32, u64, bool, &str, String);

/// The compiled form of a weighted domain: the keys with a positive weight and their weights, in
/// the shape expected by [`Random::get_weighted_choice`].
#[derive(Clone, Debug)]
pub(crate) struct WeightedTable {
    keys: Vec<WeightedKey>,
    weights: Vec<f64>,
}

impl WeightedTable {
    pub(crate) fn new(entries: &[(WeightedKey, u64)]) -> Self {
        let (keys, weights): (Vec<_>, Vec<_>) = entries
            .iter()
            .filter(|(_, weight)| *weight > 0)
            // Validated weights are at most `Domain::MAX_WEIGHT`, so the conversion is exact.
            .map(|(key, weight)| (key.clone(), *weight as f64))
            .unzip();
        cr_assert_eq_simple!(keys.len(), weights.len());

        WeightedTable { keys, weights }
    }

    pub(crate) fn sample(&self, random: &mut dyn Random) -> Value {
        let index = random
            .get_weighted_choice(&self.weights)
            .expect("a validated weighted domain has at least one positive weight");

        match &self.keys[index] {
            WeightedKey::Value(value) => value.clone(),
            WeightedKey::Range(range) => Value::Int(random.generate_i128_in_range(range.clone())),
        }
    }
}
