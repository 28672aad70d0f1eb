//! The Michalewicz benchmark and its error metric.
//!
//! The free functions are pure and total over finite inputs. [`Michalewicz`]
//! wraps them behind the [`Problem`](crate::ops::Problem) trait so the
//! optimizer can minimize them:
//! ```
//! use firefly::functions::{self, Michalewicz};
//! use firefly::ops::Problem;
//!
//! let x = [2.2029, 1.5707, 1.2850, 1.9231, 1.7205];
//! let problem = Michalewicz::new(5);
//! assert_eq!(problem.evaluate(&x).unwrap(), functions::michalewicz(&x));
//! ```

use crate::ops::{Problem, ProblemError, ProblemResult};
use std::f64::consts::PI;

/// Steepness exponent applied to the inner sine term.
const STEEPNESS: f64 = 20.0;

/// Lower end of the domain the benchmark is usually searched on.
pub const MICHALEWICZ_LOWER: f64 = 0.0;
/// Upper end of the domain the benchmark is usually searched on.
pub const MICHALEWICZ_UPPER: f64 = 3.2;

/// Evaluates the Michalewicz function
/// `-sum_i sin(x_i) * sin(i * x_i^2 / pi)^20` with 1-based `i`.
///
/// Any finite input is accepted; the usual domain is `[0, 3.2]`.
///
/// # Examples
/// ```
/// use firefly::functions::michalewicz;
/// assert_eq!(michalewicz(&[0.0, 0.0]), 0.0);
/// assert!(michalewicz(&[2.20, 1.57]) < -1.7);
/// ```
#[must_use]
pub fn michalewicz(x: &[f64]) -> f64 {
    let mut result = 0.0;
    for (idx, value) in x.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let position = (idx + 1) as f64;
        let inner = (position * value * value / PI).sin();
        result += value.sin() * inner.powf(STEEPNESS);
    }
    -result
}

/// Reference optimum of the Michalewicz function for a dimensionality.
///
/// Only 2, 5 and 10 dimensions are tabulated.
///
/// # Examples
/// ```
/// use firefly::functions::known_minimum;
/// assert_eq!(known_minimum(5), Some(-4.687658));
/// assert_eq!(known_minimum(3), None);
/// ```
#[must_use]
pub fn known_minimum(dimensions: usize) -> Option<f64> {
    match dimensions {
        2 => Some(-1.8013),
        5 => Some(-4.687658),
        10 => Some(-9.66015),
        _ => None,
    }
}

/// Squared deviation of [`michalewicz`] from [`known_minimum`].
///
/// Untabulated dimensionalities compare against `0.0`, so the result is only
/// a meaningful error for 2, 5 and 10 dimensions.
///
/// # Examples
/// ```
/// use firefly::functions::squared_error;
/// let x = [2.2029, 1.5707, 1.2850, 1.9231, 1.7205];
/// assert!(squared_error(&x) < 1e-3);
/// ```
#[must_use]
pub fn squared_error(x: &[f64]) -> f64 {
    let reference = known_minimum(x.len()).unwrap_or(0.0);
    let value = michalewicz(x);
    (reference - value) * (reference - value)
}

/// Michalewicz benchmark with a fixed dimensionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Michalewicz {
    dimensions: usize,
}

impl Michalewicz {
    /// Creates the benchmark for `dimensions` decision variables.
    #[must_use]
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    /// Creates the benchmark, rejecting zero dimensions.
    ///
    /// # Errors
    /// Returns [`ProblemError::NoDimensions`] when `dimensions` is zero.
    pub fn try_new(dimensions: usize) -> ProblemResult<Self> {
        if dimensions == 0 {
            return Err(ProblemError::NoDimensions);
        }
        Ok(Self { dimensions })
    }
}

impl Problem for Michalewicz {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64> {
        self.validate_candidate_length(genes.len())?;
        Ok(michalewicz(genes))
    }

    fn known_minimum(&self) -> Option<f64> {
        known_minimum(self.dimensions)
    }
}
