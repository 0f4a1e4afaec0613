use std::fmt::Debug;
use std::ops::Range;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use once_cell::sync::Lazy;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;

use crate::cr_assert_moderate;

/// Abstraction for randomness, in order to swap out different sources of randomness.
///
/// This is especially useful when testing, to control which values are generated when random
/// values are required.
///
/// # Testing
/// The crate's unit tests use an implementation of this trait which takes as input a list of
/// `usize`s and integers and returns them in that order. This allows deterministic test-cases
/// while the implementation makes use of the [`Random`] trait.
pub trait Random: Debug {
    /// Generates a random usize in the provided range with equal probability; this can be seen as
    /// sampling from a uniform distribution in the range `[range.start, range.end)`
    ///
    /// # Example
    /// ```rust
    /// # use rand::rngs::SmallRng;
    /// # use rand::SeedableRng;
    /// # use constrained_random_core::Random;
    /// let mut rng = SmallRng::seed_from_u64(42);
    /// let elements = vec!["This", "is", "a", "test"];
    /// let selected_index = rng.generate_usize_in_range(0..elements.len());
    /// assert!(selected_index < elements.len());
    /// ```
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize;

    /// Generates a random i128 in the provided range with equal probability; this can be seen as
    /// sampling from a uniform distribution in the range `[range.start, range.end)`
    fn generate_i128_in_range(&mut self, range: Range<i128>) -> i128;

    /// Generates a uniformly random non-negative integer of `bits` bits, i.e. in `[0, 2^bits)`.
    /// It should hold that `bits <= 127`.
    fn generate_bits(&mut self, bits: u32) -> i128;

    /// Generate a random float in the range 0..1.
    fn generate_f64(&mut self) -> f64;

    /// Given a slice of weights, select the index with `weight` weighted probability compared to
    /// the other weights.
    fn get_weighted_choice(&mut self, weights: &[f64]) -> Option<usize>;
}

// We provide a blanket implementation of the trait for any type which implements `SeedableRng`,
// `Rng` and `Debug` to ensure that we can use any "regular" random generator where we expect an
// implementation of Random.
impl<T> Random for T
where
    T: SeedableRng + Rng + Debug,
{
    fn generate_usize_in_range(&mut self, range: Range<usize>) -> usize {
        self.gen_range(range)
    }

    fn generate_i128_in_range(&mut self, range: Range<i128>) -> i128 {
        self.gen_range(range)
    }

    fn generate_bits(&mut self, bits: u32) -> i128 {
        cr_assert_moderate!(bits <= 127, "It should hold that {bits} <= 127");

        if bits == 0 {
            return 0;
        }
        (self.gen::<u128>() >> (128 - bits)) as i128
    }

    fn generate_f64(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }

    fn get_weighted_choice(&mut self, weights: &[f64]) -> Option<usize> {
        // Taken from https://docs.rs/random_choice/latest/src/random_choice/lib.rs.html
        if weights.is_empty() {
            return None;
        }

        let sum = weights.iter().sum::<f64>();
        let spin = self.generate_f64() * sum;

        let mut i: usize = 0;
        let mut accumulated_weights = weights[0];

        while accumulated_weights <= spin && i + 1 < weights.len() {
            i += 1;
            accumulated_weights += weights[i];
        }

        Some(i)
    }
}

/// A random source which can be shared between several variables; see
/// [`RandVarBuilder::random`](crate::RandVarBuilder::random).
pub type SharedRandom = Arc<Mutex<dyn Random + Send>>;

/// Wraps a concrete random generator so it can be injected into variables.
pub fn shared_random(random: impl Random + Send + 'static) -> SharedRandom {
    Arc::new(Mutex::new(random))
}

/// The process-wide source used by every variable which was not given its own.
static DEFAULT_RANDOM: Lazy<Mutex<SmallRng>> = Lazy::new(|| Mutex::new(SmallRng::from_entropy()));

/// Runs `f` with exclusive access to either the provided source or, if there is none, the
/// process-wide default source.
pub fn with_random<R>(
    random: Option<&SharedRandom>,
    f: impl FnOnce(&mut dyn Random) -> R,
) -> R {
    match random {
        Some(random) => {
            let mut guard = random.lock().unwrap_or_else(PoisonError::into_inner);
            f(&mut *guard)
        }
        None => {
            let mut guard = DEFAULT_RANDOM
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            f(&mut *guard)
        }
    }
}
