#![warn(missing_docs)]

//! Firefly metaheuristic optimization for real-valued problems.
//!
//! The crate minimizes objectives through the [`ops::Problem`] trait and ships
//! the Michalewicz benchmark in [`functions`]. Most callers either use the
//! [`solve`] shortcut with the four integer inputs, or configure a
//! [`FireflyOptimizer`] directly:
//! ```
//! use firefly::functions::Michalewicz;
//! use firefly::FireflyOptimizer;
//! use rand::SeedableRng;
//!
//! let optimizer = FireflyOptimizer::builder(Michalewicz::new(5))
//!     .population_size(20)
//!     .max_epochs(10)
//!     .build()
//!     .unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let report = optimizer.run(&mut rng).unwrap();
//! assert_eq!(report.best_position.len(), 5);
//! ```

pub mod core;
mod firefly;
pub mod functions;
pub mod ops;

pub use crate::core::{BestSolution, Coordinate, Firefly, RunStats, Swarm};
pub use crate::firefly::{
    solve, BoundaryRepair, FireflyError, FireflyOptimizer, FireflyOptimizerBuilder,
    FireflyParams, FireflyReport, Solution, StopCondition, DEFAULT_DIMENSIONS,
    DEFAULT_MAX_EPOCHS, DEFAULT_POPULATION_SIZE,
};
