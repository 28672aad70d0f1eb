//! Problem abstractions consumed by the optimizer.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

/// Convenience alias used by the problem traits.
pub type ProblemResult<T> = Result<T, ProblemError>;

/// Errors produced when a candidate solution is incompatible with a problem.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// The candidate contains the wrong number of decision variables.
    DimensionMismatch {
        /// Number of variables expected by the problem.
        expected: usize,
        /// Number of variables provided by the candidate solution.
        found: usize,
    },
    /// The problem was declared with zero decision variables.
    NoDimensions,
}

impl Display for ProblemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, found } => {
                write!(
                    f,
                    "candidate has {found} decision variables but problem expects {expected}"
                )
            }
            Self::NoDimensions => f.write_str("problem must have at least one dimension"),
        }
    }
}

impl Error for ProblemError {}

/// Objective minimized by the firefly optimizer.
///
/// Implementors only provide [`Problem::dimensions`] and
/// [`Problem::evaluate`]. The error metric that drives brightness is derived
/// from [`Problem::known_minimum`].
///
/// # Examples
/// ```
/// use firefly::ops::{Problem, ProblemResult};
///
/// struct Sphere;
///
/// impl Problem for Sphere {
///     fn dimensions(&self) -> usize { 2 }
///
///     fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64> {
///         self.validate_candidate_length(genes.len())?;
///         Ok(genes.iter().map(|value| value * value).sum())
///     }
///
///     fn known_minimum(&self) -> Option<f64> { Some(0.0) }
/// }
///
/// let problem = Sphere;
/// assert_eq!(problem.squared_error(&[1.0, 2.0]).unwrap(), 25.0);
/// assert!(problem.evaluate(&[1.0]).is_err());
/// ```
pub trait Problem {
    /// Returns the number of decision variables handled by the problem.
    fn dimensions(&self) -> usize;

    /// Evaluates the objective value of the provided candidate.
    ///
    /// # Errors
    /// Implementations may return [`ProblemError`] to describe domain issues.
    fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64>;

    /// Reference optimum of the objective, when one is tabulated.
    fn known_minimum(&self) -> Option<f64> {
        None
    }

    /// Squared deviation of the objective value from [`Problem::known_minimum`].
    ///
    /// A missing reference minimum is treated as `0.0`, which keeps the metric
    /// well defined but means it is no longer a distance to the optimum.
    ///
    /// # Errors
    /// Propagates any [`ProblemError`] reported by [`Problem::evaluate`].
    fn squared_error(&self, genes: &[f64]) -> ProblemResult<f64> {
        let reference = self.known_minimum().unwrap_or(0.0);
        let value = self.evaluate(genes)?;
        Ok((reference - value) * (reference - value))
    }

    /// Ensures that a candidate with the provided length is valid for the problem.
    ///
    /// # Errors
    /// Returns [`ProblemError::DimensionMismatch`] when the candidate contains
    /// the wrong number of decision variables.
    fn validate_candidate_length(&self, candidate_len: usize) -> ProblemResult<()> {
        let expected = self.dimensions();
        if candidate_len != expected {
            return Err(ProblemError::DimensionMismatch {
                expected,
                found: candidate_len,
            });
        }
        Ok(())
    }
}

impl<T: Problem + ?Sized> Problem for &T {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64> {
        (**self).evaluate(genes)
    }

    fn known_minimum(&self) -> Option<f64> {
        (**self).known_minimum()
    }
}

impl<T: Problem + ?Sized> Problem for Box<T> {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64> {
        (**self).evaluate(genes)
    }

    fn known_minimum(&self) -> Option<f64> {
        (**self).known_minimum()
    }
}

impl<T: Problem + ?Sized> Problem for Arc<T> {
    fn dimensions(&self) -> usize {
        (**self).dimensions()
    }

    fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64> {
        (**self).evaluate(genes)
    }

    fn known_minimum(&self) -> Option<f64> {
        (**self).known_minimum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Linear {
        dims: usize,
    }

    impl Problem for Linear {
        fn dimensions(&self) -> usize {
            self.dims
        }

        fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64> {
            self.validate_candidate_length(genes.len())?;
            Ok(genes.iter().copied().sum())
        }
    }

    struct Shifted;

    impl Problem for Shifted {
        fn dimensions(&self) -> usize {
            1
        }

        fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64> {
            Ok(genes[0])
        }

        fn known_minimum(&self) -> Option<f64> {
            Some(-1.0)
        }
    }

    #[test]
    fn missing_minimum_defaults_to_zero() {
        let problem = Linear { dims: 2 };
        let error = problem.squared_error(&[1.0, 2.0]).unwrap();
        assert!((error - 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn squared_error_uses_reference() {
        let error = Shifted.squared_error(&[1.0]).unwrap();
        assert!((error - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn length_mismatch_is_reported() {
        let problem = Linear { dims: 3 };
        let err = problem.evaluate(&[1.0]).unwrap_err();
        assert_eq!(
            err,
            ProblemError::DimensionMismatch {
                expected: 3,
                found: 1
            }
        );
        assert!(err.to_string().contains("expects 3"));
    }

    #[test]
    fn forwarding_impls_delegate() {
        let boxed: Box<dyn Problem> = Box::new(Shifted);
        assert_eq!(boxed.known_minimum(), Some(-1.0));
        let shared = Arc::new(Linear { dims: 1 });
        assert_eq!(shared.dimensions(), 1);
        assert_eq!(shared.evaluate(&[4.0]).unwrap(), 4.0);
    }
}
