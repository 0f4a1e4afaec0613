//! A small finite-domain constraint solver.
//!
//! The randomization engine never calls user predicates directly; every check goes through a
//! [`Problem`], either by enumerating all solutions ([`solve_all`]) or by asking for a single one
//! ([`solve_one`]).
mod constraint;
mod problem;

pub use constraint::Constraint;
pub use problem::solve_all;
pub use problem::solve_one;
pub use problem::Assignment;
pub use problem::Problem;
pub use problem::ProblemError;
