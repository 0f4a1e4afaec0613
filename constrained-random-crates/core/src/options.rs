//! Contains the options which bound the work done during randomization.

/// The limits used when randomizing variables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomizationOptions {
    /// The maximum number of failed attempts to find a value before giving up.
    pub max_iterations: usize,
    /// Domains with strictly fewer values than this are solved exhaustively with the constraint
    /// solver; larger domains are sampled at random and checked.
    pub max_domain_size: usize,
    /// How many random candidates a variable which cannot be solved exhaustively contributes to a
    /// multi-variable problem; [`None`] means `max_domain_size` candidates.
    pub solutions_per_group: Option<usize>,
}

impl Default for RandomizationOptions {
    fn default() -> Self {
        RandomizationOptions {
            max_iterations: 100,
            max_domain_size: 1 << 10,
            solutions_per_group: None,
        }
    }
}
