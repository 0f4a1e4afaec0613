//! # Constrained Random
//! Generates random values which satisfy user-provided constraints, for example to produce
//! stimulus for the verification of hardware designs.
//!
//! A single quantity is described by a [`RandVar`]: its domain (an explicit range, collection or
//! weighted mapping, a bit-width, or a generator function) together with the constraints which
//! every produced value has to satisfy. Lists of values are produced by setting a length, in which
//! case constraints can also be placed on the list as a whole.
//! ```rust
//! # use constrained_random::RandVar;
//! # use constrained_random::Value;
//! let register = RandVar::builder("register")
//!     .bits(5)
//!     .constraint(|value: &Value| value.as_int() != Some(0))
//!     .build()
//!     .unwrap();
//!
//! let value = register.randomize().unwrap().as_int().unwrap();
//! assert!((1..32).contains(&value));
//! ```
//!
//! Several variables which are related by constraints are randomized together with a
//! [`RandObject`]; see its documentation for an example.
//!
//! Small domains are solved exhaustively with the constraint solver in [`csp`], larger domains are
//! sampled at random and checked. How much work is done before giving up with a
//! [`RandomizationError`] is controlled by the [`RandomizationOptions`].
mod rand_object;

pub use constrained_random_core::*;

pub use crate::rand_object::RandObject;
pub use crate::rand_object::RandObjectError;
