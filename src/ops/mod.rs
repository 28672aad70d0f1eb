//! Problem abstractions.
//!
//! The optimizer only talks to objectives through the [`Problem`] trait, so
//! benchmark functions and user supplied objectives are interchangeable.

pub mod problem;

pub use problem::{Problem, ProblemError, ProblemResult};
