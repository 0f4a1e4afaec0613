mod domain_type_error;
mod hash_structures;
mod random;
mod randomization_error;
mod value;

pub use domain_type_error::DomainTypeError;
pub use hash_structures::*;
pub use random::shared_random;
pub use random::Random;
pub use random::SharedRandom;
pub use random::with_random;
pub use randomization_error::RandomizationError;
pub use value::Value;
