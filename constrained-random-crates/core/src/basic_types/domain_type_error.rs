use thiserror::Error;

#[cfg(doc)]
use crate::RandVar;

/// Errors related to the domain specification of a [`RandVar`]; these are always raised when the
/// variable is built, never when it is randomized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainTypeError {
    /// None of a domain, a bit-width or a generator function was provided.
    #[error("variable '{0}' needs exactly one of a domain, a bit-width or a generator, but got none")]
    Unspecified(String),
    /// More than one of a domain, a bit-width or a generator function was provided.
    #[error("variable '{0}' needs exactly one of a domain, a bit-width or a generator, but got several")]
    OverSpecified(String),
    /// Generator arguments were provided without a generator function.
    #[error("variable '{0}' has generator arguments but no generator")]
    ArgumentsWithoutGenerator(String),
    /// The explicit domain contains no values.
    #[error("variable '{0}' has an empty domain")]
    EmptyDomain(String),
    /// A weighted domain contains a sub-range without values.
    #[error("variable '{name}' has the empty sub-range {start}..{end} in its weighted domain")]
    EmptyWeightedRange { name: String, start: i128, end: i128 },
    /// A weighted domain has no entry with a positive weight.
    #[error("variable '{0}' has a weighted domain without any positive weight")]
    NoPositiveWeight(String),
    /// A weight of a weighted domain cannot be represented exactly when drawing.
    #[error("variable '{name}' has the weight {weight} in its weighted domain, but at most 2^53 is supported")]
    WeightTooLarge { name: String, weight: u64 },
    /// The bit-width does not fit in the supported integer values.
    #[error("variable '{name}' has a bit-width of {bits}, but at most 126 bits are supported")]
    TooManyBits { name: String, bits: u32 },
}
