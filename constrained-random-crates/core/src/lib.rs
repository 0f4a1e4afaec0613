//! # Constrained Random
//! The core of a constrained-random value generator: a [`RandVar`] is a named quantity with a
//! domain (an explicit [`Domain`](domain::Domain), a bit-width or a generator function) and
//! constraints which every produced value has to satisfy.
//!
//! Small domains are solved exhaustively by the constraint solver in [`csp`], while large domains
//! are sampled at random and checked; both modes are bounded by the [`RandomizationOptions`].
//!
//! ```rust
//! # use constrained_random_core::RandVar;
//! # use constrained_random_core::Value;
//! let sorted = RandVar::builder("sorted")
//!     .domain(0..100)
//!     .length(3)
//!     .list_constraint(|list: &[Value]| list.windows(2).all(|pair| pair[0] <= pair[1]))
//!     .build()
//!     .unwrap();
//!
//! let value = sorted.randomize().unwrap();
//! let list = value.as_list().unwrap();
//! assert_eq!(list.len(), 3);
//! assert!(list[0] <= list[1] && list[1] <= list[2]);
//! ```
#[doc(hidden)]
pub mod asserts;
pub(crate) mod basic_types;
pub mod csp;
pub mod domain;
pub mod options;
mod rand_var;

pub use num;
pub use rand;

pub use crate::basic_types::shared_random;
pub use crate::basic_types::with_random;
pub use crate::basic_types::DomainTypeError;
pub use crate::basic_types::HashMap;
pub use crate::basic_types::HashSet;
pub use crate::basic_types::Random;
pub use crate::basic_types::RandomizationError;
pub use crate::basic_types::SharedRandom;
pub use crate::basic_types::Value;
pub use crate::options::RandomizationOptions;
pub use crate::rand_var::GeneratorFn;
pub use crate::rand_var::ListConstraint;
pub use crate::rand_var::RandVar;
pub use crate::rand_var::RandVarBuilder;
pub use crate::rand_var::ValueConstraint;
