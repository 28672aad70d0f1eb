//! Core firefly primitives.
//!
//! A [`Firefly`] is one candidate position together with its cached error and
//! brightness. A [`Swarm`] is the ordered population the optimizer mutates in
//! place, and [`BestSolution`] remembers the best position ever observed.

use crate::ops::{Problem, ProblemResult};
use std::cmp::Ordering;

pub mod stats;

pub use stats::RunStats;

/// Scalar type used for a single coordinate of a firefly position.
pub type Coordinate = f64;

/// Brightness associated with an error value, `1 / (error + 1)`.
///
/// # Examples
/// ```
/// use firefly::core::intensity;
/// assert_eq!(intensity(0.0), 1.0);
/// assert_eq!(intensity(1.0), 0.5);
/// ```
#[must_use]
pub fn intensity(error: f64) -> f64 {
    1.0 / (error + 1.0)
}

/// Euclidean distance between two positions.
///
/// # Examples
/// ```
/// use firefly::core::distance;
/// assert_eq!(distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
/// ```
#[must_use]
pub fn distance(lhs: &[Coordinate], rhs: &[Coordinate]) -> f64 {
    let mut ssd = 0.0;
    for (a, b) in lhs.iter().zip(rhs.iter()) {
        ssd += (a - b) * (a - b);
    }
    ssd.sqrt()
}

/// Orders fireflies from lowest to highest error.
///
/// Used as the explicit comparator when the swarm is sorted so the ordering
/// policy stays outside of [`Firefly`] itself.
#[must_use]
pub fn by_error(lhs: &Firefly, rhs: &Firefly) -> Ordering {
    lhs.error.total_cmp(&rhs.error)
}

/// A single candidate solution.
///
/// The error and intensity are always updated together through
/// [`Firefly::set_error`].
///
/// # Examples
/// ```
/// use firefly::core::Firefly;
/// let mut firefly = Firefly::new(vec![1.0, 2.0], 3.0);
/// assert_eq!(firefly.intensity(), 0.25);
/// firefly.set_error(0.0);
/// assert_eq!(firefly.intensity(), 1.0);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Firefly {
    position: Vec<Coordinate>,
    error: f64,
    intensity: f64,
}

impl Firefly {
    /// Creates a firefly from a position and its already computed error.
    #[must_use]
    pub fn new(position: Vec<Coordinate>, error: f64) -> Self {
        Self {
            position,
            error,
            intensity: intensity(error),
        }
    }

    /// Creates a firefly and scores it against `problem`.
    ///
    /// # Errors
    /// Propagates any error reported by [`Problem::squared_error`].
    pub fn evaluate_with<P>(position: Vec<Coordinate>, problem: &P) -> ProblemResult<Self>
    where
        P: Problem + ?Sized,
    {
        let error = problem.squared_error(&position)?;
        Ok(Self::new(position, error))
    }

    /// Returns the current position.
    #[must_use]
    pub fn position(&self) -> &[Coordinate] {
        &self.position
    }

    pub(crate) fn position_mut(&mut self) -> &mut [Coordinate] {
        &mut self.position
    }

    /// Returns the cached squared error.
    #[must_use]
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Returns the cached brightness.
    #[must_use]
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Replaces the error and recomputes the intensity.
    pub fn set_error(&mut self, error: f64) {
        self.error = error;
        self.intensity = intensity(error);
    }

    /// Re-scores the current position against `problem`.
    ///
    /// # Errors
    /// Propagates any error reported by [`Problem::squared_error`].
    pub fn rescore<P>(&mut self, problem: &P) -> ProblemResult<()>
    where
        P: Problem + ?Sized,
    {
        let error = problem.squared_error(&self.position)?;
        self.set_error(error);
        Ok(())
    }

    /// Indicates whether every coordinate lies within `[lower, upper]`.
    #[must_use]
    pub fn within(&self, lower: Coordinate, upper: Coordinate) -> bool {
        self.position
            .iter()
            .all(|value| (lower..=upper).contains(value))
    }
}

/// Ordered population of fireflies.
///
/// After [`Swarm::sort`] index zero holds the lowest error.
///
/// # Examples
/// ```
/// use firefly::core::{Firefly, Swarm};
/// let mut swarm = Swarm::from_fireflies(vec![
///     Firefly::new(vec![0.0], 2.0),
///     Firefly::new(vec![1.0], 1.0),
/// ]);
/// swarm.sort();
/// assert_eq!(swarm.fireflies()[0].error(), 1.0);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Swarm {
    fireflies: Vec<Firefly>,
}

impl Swarm {
    /// Wraps an existing set of fireflies.
    #[must_use]
    pub fn from_fireflies(fireflies: Vec<Firefly>) -> Self {
        Self { fireflies }
    }

    /// Returns the number of fireflies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fireflies.len()
    }

    /// Indicates whether the swarm is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fireflies.is_empty()
    }

    /// Returns the fireflies in their current order.
    #[must_use]
    pub fn fireflies(&self) -> &[Firefly] {
        &self.fireflies
    }

    pub(crate) fn fireflies_mut(&mut self) -> &mut [Firefly] {
        &mut self.fireflies
    }

    /// Returns the lowest-error firefly, preferring the earliest on ties.
    #[must_use]
    pub fn best(&self) -> Option<&Firefly> {
        self.fireflies.iter().min_by(|lhs, rhs| by_error(lhs, rhs))
    }

    /// Sorts the swarm ascending by error. Equal errors keep their order.
    pub fn sort(&mut self) {
        self.fireflies.sort_by(by_error);
    }

    /// Mean error across the swarm, `0.0` when empty.
    #[must_use]
    pub fn mean_error(&self) -> f64 {
        if self.fireflies.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.fireflies.iter().map(Firefly::error).sum();
        #[allow(clippy::cast_precision_loss)]
        {
            sum / self.fireflies.len() as f64
        }
    }

    /// Root mean spread of the positions around their centroid.
    #[must_use]
    pub fn diversity(&self) -> f64 {
        let dimensions = match self.fireflies.first() {
            Some(firefly) if !firefly.position.is_empty() => firefly.position.len(),
            _ => return 0.0,
        };
        #[allow(clippy::cast_precision_loss)]
        let count = self.fireflies.len() as f64;
        let mut centroid = vec![0.0; dimensions];
        for firefly in &self.fireflies {
            for (sum, value) in centroid.iter_mut().zip(&firefly.position) {
                *sum += value;
            }
        }
        for sum in &mut centroid {
            *sum /= count;
        }
        let spread: f64 = self
            .fireflies
            .iter()
            .flat_map(|firefly| firefly.position.iter().zip(&centroid))
            .map(|(value, mean)| (value - mean) * (value - mean))
            .sum();
        #[allow(clippy::cast_precision_loss)]
        {
            (spread / (count * dimensions as f64)).sqrt()
        }
    }

    /// Indicates whether every firefly lies within `[lower, upper]`.
    #[must_use]
    pub fn within(&self, lower: Coordinate, upper: Coordinate) -> bool {
        self.fireflies
            .iter()
            .all(|firefly| firefly.within(lower, upper))
    }
}

/// Best position and error observed over a whole run.
///
/// Kept apart from the swarm because a firefly can regress after it has been
/// recorded. The stored error never increases.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct BestSolution {
    position: Vec<Coordinate>,
    error: f64,
}

impl BestSolution {
    /// Creates an empty record with an infinite error.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec::new(),
            error: f64::INFINITY,
        }
    }

    /// Takes `candidate` when its error is strictly lower. Returns whether it
    /// was taken.
    pub fn consider(&mut self, candidate: &Firefly) -> bool {
        if candidate.error() < self.error {
            self.error = candidate.error();
            self.position.clone_from(&candidate.position);
            true
        } else {
            false
        }
    }

    /// Returns the recorded position, empty if nothing was recorded yet.
    #[must_use]
    pub fn position(&self) -> &[Coordinate] {
        &self.position
    }

    /// Returns the recorded error.
    #[must_use]
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Consumes the record and returns its position.
    #[must_use]
    pub fn into_position(self) -> Vec<Coordinate> {
        self.position
    }
}

impl Default for BestSolution {
    fn default() -> Self {
        Self::new()
    }
}
