//! Firefly metaheuristic engine.
//!
//! Every firefly is pulled towards each brighter (lower error) firefly with a
//! strength that decays with distance, plus a small random jitter. The
//! [`FireflyOptimizer`] builder exposes the attraction constants, the epoch
//! budget and the boundary repair policy; [`FireflyOptimizer::run`] performs
//! the search with a caller supplied random number generator. All randomness
//! in a run is drawn from that one generator in a fixed order, so the same
//! seed reproduces the same trajectory bit for bit.

use crate::core::{distance, BestSolution, Coordinate, Firefly, RunStats, Swarm};
use crate::functions::{Michalewicz, MICHALEWICZ_LOWER, MICHALEWICZ_UPPER};
use crate::ops::{Problem, ProblemError};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::{self, Display, Formatter};

/// Default number of fireflies in the swarm.
pub const DEFAULT_POPULATION_SIZE: usize = 40;
/// Default dimensionality used by [`solve`] callers that have no preference.
pub const DEFAULT_DIMENSIONS: usize = 5;
/// Default number of epochs.
pub const DEFAULT_MAX_EPOCHS: usize = 100;

const DEFAULT_ATTRACTION: f64 = 1.0;
const DEFAULT_ABSORPTION: f64 = 1.0;
const DEFAULT_RANDOMIZATION: f64 = 0.20;
const PROGRESS_REPORTS: usize = 10;

/// How a coordinate that left the search domain is brought back.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryRepair {
    /// Checks the lower bound and then, unconditionally, the upper bound.
    /// Resampled values lie in `[lower, upper)`, so the second check never
    /// fires after the first and both policies consume the same draws.
    #[default]
    Literal,
    /// Resamples at most once, only when the value is outside the domain.
    Exclusive,
}

impl BoundaryRepair {
    /// Repairs a single coordinate, drawing from `rng` only when a bound is
    /// violated.
    ///
    /// # Examples
    /// ```
    /// use firefly::BoundaryRepair;
    /// use rand::SeedableRng;
    ///
    /// let mut rng = rand::rngs::StdRng::seed_from_u64(3);
    /// assert_eq!(BoundaryRepair::Literal.apply(1.0, 0.0, 3.2, &mut rng), 1.0);
    /// let repaired = BoundaryRepair::Exclusive.apply(-0.5, 0.0, 3.2, &mut rng);
    /// assert!((0.0..=3.2).contains(&repaired));
    /// ```
    pub fn apply<R>(
        self,
        value: Coordinate,
        lower: Coordinate,
        upper: Coordinate,
        rng: &mut R,
    ) -> Coordinate
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Literal => {
                let mut value = value;
                if value < lower {
                    value = sample_uniform(lower, upper, rng);
                }
                if value > upper {
                    value = sample_uniform(lower, upper, rng);
                }
                value
            }
            Self::Exclusive => {
                if value < lower || value > upper {
                    sample_uniform(lower, upper, rng)
                } else {
                    value
                }
            }
        }
    }
}

/// Tunable constants of the firefly update.
///
/// # Examples
/// ```
/// use firefly::{BoundaryRepair, FireflyParams};
/// let params = FireflyParams {
///     boundary_repair: BoundaryRepair::Exclusive,
///     ..FireflyParams::default()
/// };
/// assert_eq!(params.attraction, 1.0);
/// assert_eq!(params.upper, 3.2);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FireflyParams {
    /// Attraction at zero distance (`B0`).
    pub attraction: f64,
    /// Light absorption coefficient (`g`); larger values shorten the reach of
    /// the attraction.
    pub absorption: f64,
    /// Weight of the uniform jitter added per coordinate (`a`).
    pub randomization: f64,
    /// Lower bound shared by every coordinate.
    pub lower: Coordinate,
    /// Upper bound shared by every coordinate.
    pub upper: Coordinate,
    /// Policy applied to coordinates that leave `[lower, upper]`.
    pub boundary_repair: BoundaryRepair,
}

impl Default for FireflyParams {
    fn default() -> Self {
        Self {
            attraction: DEFAULT_ATTRACTION,
            absorption: DEFAULT_ABSORPTION,
            randomization: DEFAULT_RANDOMIZATION,
            lower: MICHALEWICZ_LOWER,
            upper: MICHALEWICZ_UPPER,
            boundary_repair: BoundaryRepair::default(),
        }
    }
}

impl FireflyParams {
    /// Checks that the bounds and coefficients describe a usable search.
    ///
    /// # Errors
    /// Returns [`FireflyError::InvalidBounds`] unless `lower < upper` with both
    /// finite, and [`FireflyError::InvalidCoefficient`] for any coefficient
    /// that is negative or not finite.
    pub fn validate(&self) -> Result<(), FireflyError> {
        if !(self.lower.is_finite() && self.upper.is_finite() && self.lower < self.upper) {
            return Err(FireflyError::InvalidBounds {
                lower: self.lower,
                upper: self.upper,
            });
        }
        for (name, value) in [
            ("attraction", self.attraction),
            ("absorption", self.absorption),
            ("randomization", self.randomization),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(FireflyError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}

/// Conditions that end a run.
///
/// The epoch budget configured on the builder always applies; a condition
/// passed to [`FireflyOptimizerBuilder::stop_condition`] can only end the run
/// earlier.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum StopCondition {
    /// Stop once this many epochs have run.
    MaxEpochs {
        /// Maximum number of epochs to run.
        limit: usize,
    },
    /// Stop once the best error is at or below the threshold.
    TargetErrorBelow {
        /// Error that ends the run.
        threshold: f64,
    },
    /// Logical OR that triggers when either child condition is met.
    Or(Box<StopCondition>, Box<StopCondition>),
}

impl StopCondition {
    /// Creates a stop condition that limits the number of epochs.
    #[must_use]
    pub fn max_epochs(limit: usize) -> Self {
        Self::MaxEpochs { limit }
    }

    /// Creates a stop condition that targets a best error threshold.
    #[must_use]
    pub fn target_error_below(threshold: f64) -> Self {
        Self::TargetErrorBelow { threshold }
    }

    /// Combines two stop conditions using logical OR semantics.
    #[must_use]
    pub fn or(self, other: StopCondition) -> Self {
        Self::Or(Box::new(self), Box::new(other))
    }

    fn is_met(&self, epochs: usize, best_error: f64) -> bool {
        match self {
            Self::MaxEpochs { limit } => epochs >= *limit,
            Self::TargetErrorBelow { threshold } => best_error <= *threshold,
            Self::Or(left, right) => {
                left.is_met(epochs, best_error) || right.is_met(epochs, best_error)
            }
        }
    }
}

/// Errors produced by the [`FireflyOptimizer`] engine and [`solve`].
#[derive(Debug, Clone, PartialEq)]
pub enum FireflyError {
    /// The swarm must contain at least one firefly.
    InvalidPopulationSize(i64),
    /// The problem must have at least one dimension.
    InvalidDimensions(i64),
    /// The epoch budget cannot be negative.
    InvalidEpochs(i64),
    /// The search domain is empty or not finite.
    InvalidBounds {
        /// Configured lower bound.
        lower: f64,
        /// Configured upper bound.
        upper: f64,
    },
    /// An update coefficient is negative or not finite.
    InvalidCoefficient {
        /// Name of the offending coefficient.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Wrapper around [`ProblemError`].
    Problem(ProblemError),
}

impl Display for FireflyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPopulationSize(size) => {
                write!(
                    f,
                    "population size must be greater than zero (received {size})"
                )
            }
            Self::InvalidDimensions(dims) => {
                write!(f, "dimensions must be greater than zero (received {dims})")
            }
            Self::InvalidEpochs(epochs) => {
                write!(f, "epoch budget must not be negative (received {epochs})")
            }
            Self::InvalidBounds { lower, upper } => {
                write!(
                    f,
                    "search bounds must be finite with lower < upper (received [{lower}, {upper}])"
                )
            }
            Self::InvalidCoefficient { name, value } => {
                write!(
                    f,
                    "{name} coefficient must be finite and non-negative (received {value})"
                )
            }
            Self::Problem(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for FireflyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Problem(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ProblemError> for FireflyError {
    fn from(err: ProblemError) -> Self {
        Self::Problem(err)
    }
}

/// Report produced by [`FireflyOptimizer::run`].
///
/// # Examples
/// ```
/// use firefly::functions::Michalewicz;
/// use firefly::FireflyOptimizer;
/// use rand::SeedableRng;
///
/// let optimizer = FireflyOptimizer::builder(Michalewicz::new(2))
///     .population_size(8)
///     .max_epochs(5)
///     .build()
///     .unwrap();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(0);
/// let report = optimizer.run(&mut rng).unwrap();
/// assert_eq!(report.best_position.len(), 2);
/// assert_eq!(report.epochs, 5);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct FireflyReport {
    /// Best position observed over the whole run.
    pub best_position: Vec<Coordinate>,
    /// Squared error associated with [`Self::best_position`].
    pub best_error: f64,
    /// Number of epochs executed before stopping.
    pub epochs: usize,
    /// Per-epoch statistics.
    pub stats: RunStats,
}

/// Builder returned by [`FireflyOptimizer::builder`].
#[derive(Debug)]
pub struct FireflyOptimizerBuilder<P> {
    problem: P,
    population_size: usize,
    max_epochs: usize,
    params: FireflyParams,
    stop_condition: Option<StopCondition>,
}

impl<P> FireflyOptimizerBuilder<P>
where
    P: Problem,
{
    /// Configures the number of fireflies.
    #[must_use]
    pub fn population_size(mut self, size: usize) -> Self {
        self.population_size = size;
        self
    }

    /// Configures the epoch budget.
    #[must_use]
    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    /// Replaces the update constants.
    #[must_use]
    pub fn params(mut self, params: FireflyParams) -> Self {
        self.params = params;
        self
    }

    /// Adds a condition that may end the run before the epoch budget.
    #[must_use]
    pub fn stop_condition(mut self, condition: StopCondition) -> Self {
        self.stop_condition = Some(condition);
        self
    }

    /// Finalizes the builder into a [`FireflyOptimizer`].
    ///
    /// # Errors
    /// Returns [`FireflyError`] when the population is empty, the problem has
    /// no dimensions, or the parameters fail [`FireflyParams::validate`].
    pub fn build(self) -> Result<FireflyOptimizer<P>, FireflyError> {
        if self.population_size == 0 {
            return Err(FireflyError::InvalidPopulationSize(0));
        }
        if self.problem.dimensions() == 0 {
            return Err(FireflyError::InvalidDimensions(0));
        }
        self.params.validate()?;
        let budget = StopCondition::max_epochs(self.max_epochs);
        let stop_condition = match self.stop_condition {
            Some(condition) => budget.or(condition),
            None => budget,
        };
        Ok(FireflyOptimizer {
            problem: self.problem,
            population_size: self.population_size,
            max_epochs: self.max_epochs,
            params: self.params,
            stop_condition,
        })
    }
}

/// Firefly algorithm engine that minimizes a [`Problem`].
#[derive(Debug, Clone)]
pub struct FireflyOptimizer<P> {
    problem: P,
    population_size: usize,
    max_epochs: usize,
    params: FireflyParams,
    stop_condition: StopCondition,
}

impl<P> FireflyOptimizer<P>
where
    P: Problem,
{
    /// Creates a builder used to configure the engine.
    #[must_use]
    pub fn builder(problem: P) -> FireflyOptimizerBuilder<P> {
        FireflyOptimizerBuilder {
            problem,
            population_size: DEFAULT_POPULATION_SIZE,
            max_epochs: DEFAULT_MAX_EPOCHS,
            params: FireflyParams::default(),
            stop_condition: None,
        }
    }

    /// Returns the problem being minimized.
    #[must_use]
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Returns the update constants.
    #[must_use]
    pub fn params(&self) -> &FireflyParams {
        &self.params
    }

    /// Returns the number of fireflies per swarm.
    #[must_use]
    pub fn population_size(&self) -> usize {
        self.population_size
    }

    /// Returns the epoch budget.
    #[must_use]
    pub fn max_epochs(&self) -> usize {
        self.max_epochs
    }

    /// Runs the search and returns the best position ever observed.
    ///
    /// # Errors
    /// Propagates any [`ProblemError`] reported while scoring fireflies.
    pub fn run<R>(&self, rng: &mut R) -> Result<FireflyReport, FireflyError>
    where
        R: Rng + ?Sized,
    {
        if self.problem.known_minimum().is_none() {
            warn!(
                "no reference minimum for {} dimensions, errors are measured against 0.0",
                self.problem.dimensions()
            );
        }
        let mut swarm = self.initialize(rng)?;
        let mut best = BestSolution::new();
        for firefly in swarm.fireflies() {
            best.consider(firefly);
        }

        let display_interval = (self.max_epochs / PROGRESS_REPORTS).max(1);
        let mut stats = RunStats::new();
        let mut epoch = 0_usize;
        while !self.stop_condition.is_met(epoch, best.error()) {
            if epoch % display_interval == 0 {
                info!("epoch = {epoch:>6}   error = {:.14}", best.error());
            }
            self.epoch(&mut swarm, rng)?;
            if let Some(leader) = swarm.fireflies().first() {
                if best.consider(leader) {
                    debug!("epoch {epoch}: new best error {}", best.error());
                }
            }
            epoch += 1;
            stats.record(&swarm, best.error());
        }
        info!("finished after {epoch} epochs, best error = {:.14}", best.error());

        let best_error = best.error();
        Ok(FireflyReport {
            best_position: best.into_position(),
            best_error,
            epochs: epoch,
            stats,
        })
    }

    /// Creates a swarm with uniformly random positions in the search domain.
    ///
    /// Coordinates are drawn firefly by firefly, dimension by dimension.
    ///
    /// # Errors
    /// Propagates any [`ProblemError`] reported while scoring fireflies.
    pub fn initialize<R>(&self, rng: &mut R) -> Result<Swarm, FireflyError>
    where
        R: Rng + ?Sized,
    {
        let dimensions = self.problem.dimensions();
        let mut fireflies = Vec::with_capacity(self.population_size);
        for _ in 0..self.population_size {
            let position = (0..dimensions)
                .map(|_| sample_uniform(self.params.lower, self.params.upper, rng))
                .collect();
            fireflies.push(Firefly::evaluate_with(position, &self.problem)?);
        }
        Ok(Swarm::from_fireflies(fireflies))
    }

    /// Performs one epoch: every firefly moves towards each brighter one, in
    /// index order, and the swarm is then sorted by error.
    ///
    /// A firefly is re-scored right after it moves, so later comparisons in
    /// the same epoch see its new brightness.
    ///
    /// # Errors
    /// Propagates any [`ProblemError`] reported while scoring fireflies.
    pub fn epoch<R>(&self, swarm: &mut Swarm, rng: &mut R) -> Result<(), FireflyError>
    where
        R: Rng + ?Sized,
    {
        let fireflies = swarm.fireflies_mut();
        let count = fireflies.len();
        for i in 0..count {
            for j in 0..count {
                if fireflies[i].intensity() < fireflies[j].intensity() {
                    let (moving, brighter) = pair_mut(fireflies, i, j);
                    self.move_towards(moving, brighter, rng)?;
                }
            }
        }
        swarm.sort();
        Ok(())
    }

    fn move_towards<R>(
        &self,
        moving: &mut Firefly,
        brighter: &Firefly,
        rng: &mut R,
    ) -> Result<(), FireflyError>
    where
        R: Rng + ?Sized,
    {
        let params = &self.params;
        let r = distance(moving.position(), brighter.position());
        let beta = params.attraction * (-params.absorption * r * r).exp();
        for (value, &target) in moving.position_mut().iter_mut().zip(brighter.position()) {
            *value += beta * (target - *value);
            *value += params.randomization * (rng.gen::<f64>() - 0.5);
            *value = params
                .boundary_repair
                .apply(*value, params.lower, params.upper, rng);
        }
        moving.rescore(&self.problem)?;
        Ok(())
    }
}

/// Everything the host reads back after a run.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Best position found.
    pub position: Vec<Coordinate>,
    /// Michalewicz value at [`Self::position`].
    pub value: f64,
    /// Squared error of [`Self::value`] against the reference minimum, or
    /// against `0.0` when [`Self::reference_minimum`] is `None`.
    pub error: f64,
    /// Reference minimum used for [`Self::error`], if one is tabulated.
    pub reference_minimum: Option<f64>,
}

impl Solution {
    /// Scores a position against the Michalewicz benchmark.
    ///
    /// # Examples
    /// ```
    /// use firefly::Solution;
    /// let solution = Solution::from_position(vec![2.20, 1.57]);
    /// assert_eq!(solution.reference_minimum, Some(-1.8013));
    /// assert!(solution.error < 1e-3);
    /// ```
    #[must_use]
    pub fn from_position(position: Vec<Coordinate>) -> Self {
        let value = crate::functions::michalewicz(&position);
        let error = crate::functions::squared_error(&position);
        let reference_minimum = crate::functions::known_minimum(position.len());
        Self {
            position,
            value,
            error,
            reference_minimum,
        }
    }
}

/// Minimizes the Michalewicz function with the default firefly constants.
///
/// Takes the four integers a host supplies and validates them before any
/// work is done. The generator is seeded from `seed`, so identical inputs
/// always return identical results.
///
/// # Examples
/// ```
/// let solution = firefly::solve(10, 2, 0, 10).unwrap();
/// assert_eq!(solution.position.len(), 2);
/// assert!(solution.position.iter().all(|x| (0.0..=3.2).contains(x)));
/// assert!(firefly::solve(0, 2, 0, 10).is_err());
/// ```
///
/// # Errors
/// Returns [`FireflyError::InvalidPopulationSize`],
/// [`FireflyError::InvalidDimensions`] or [`FireflyError::InvalidEpochs`]
/// when the corresponding input is out of range.
pub fn solve(
    num_fireflies: i32,
    dim: i32,
    seed: i32,
    max_epochs: i32,
) -> Result<Solution, FireflyError> {
    let population_size = positive(num_fireflies).ok_or(FireflyError::InvalidPopulationSize(
        i64::from(num_fireflies),
    ))?;
    let dimensions = positive(dim).ok_or(FireflyError::InvalidDimensions(i64::from(dim)))?;
    let max_epochs = usize::try_from(max_epochs)
        .map_err(|_| FireflyError::InvalidEpochs(i64::from(max_epochs)))?;

    let optimizer = FireflyOptimizer::builder(Michalewicz::new(dimensions))
        .population_size(population_size)
        .max_epochs(max_epochs)
        .build()?;
    #[allow(clippy::cast_sign_loss)]
    let mut rng = StdRng::seed_from_u64(i64::from(seed) as u64);
    let report = optimizer.run(&mut rng)?;
    Ok(Solution::from_position(report.best_position))
}

fn positive(value: i32) -> Option<usize> {
    usize::try_from(value).ok().filter(|value| *value > 0)
}

fn sample_uniform<R>(lower: Coordinate, upper: Coordinate, rng: &mut R) -> Coordinate
where
    R: Rng + ?Sized,
{
    (upper - lower) * rng.gen::<f64>() + lower
}

/// Splits out the firefly at `moving` mutably and the one at `target` shared.
/// The indices must differ.
fn pair_mut(
    fireflies: &mut [Firefly],
    moving: usize,
    target: usize,
) -> (&mut Firefly, &Firefly) {
    if moving < target {
        let (head, tail) = fireflies.split_at_mut(target);
        (&mut head[moving], &tail[0])
    } else {
        let (head, tail) = fireflies.split_at_mut(moving);
        (&mut tail[0], &head[target])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::ProblemResult;
    use rand::rngs::mock::StepRng;
    use rand::RngCore;

    #[derive(Debug)]
    struct Sphere {
        dims: usize,
    }

    impl Problem for Sphere {
        fn dimensions(&self) -> usize {
            self.dims
        }

        fn evaluate(&self, genes: &[f64]) -> ProblemResult<f64> {
            self.validate_candidate_length(genes.len())?;
            Ok(genes.iter().map(|value| value * value).sum())
        }

        fn known_minimum(&self) -> Option<f64> {
            Some(0.0)
        }
    }

    /// Counts how many values were drawn from the wrapped generator.
    struct CountingRng {
        inner: StepRng,
        draws: usize,
    }

    impl CountingRng {
        fn new(value: u64) -> Self {
            Self {
                inner: StepRng::new(value, 0),
                draws: 0,
            }
        }
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.draws += 1;
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.draws += 1;
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.draws += 1;
            self.inner.fill_bytes(dest);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.draws += 1;
            self.inner.try_fill_bytes(dest)
        }
    }

    #[test]
    fn stop_condition_max_epochs() {
        let condition = StopCondition::max_epochs(2);
        assert!(!condition.is_met(0, 0.0));
        assert!(condition.is_met(2, 10.0));
    }

    #[test]
    fn stop_condition_target_error() {
        let condition = StopCondition::target_error_below(0.1);
        assert!(condition.is_met(0, 0.05));
        assert!(!condition.is_met(0, 0.5));
    }

    #[test]
    fn stop_condition_or_logic() {
        let condition = StopCondition::max_epochs(1).or(StopCondition::target_error_below(1.0));
        assert!(condition.is_met(1, 5.0));
        assert!(condition.is_met(0, 0.5));
        assert!(!condition.is_met(0, 5.0));
    }

    #[test]
    fn repair_leaves_in_range_values_alone() {
        let mut rng = CountingRng::new(0);
        for policy in [BoundaryRepair::Literal, BoundaryRepair::Exclusive] {
            assert_eq!(policy.apply(1.5, 0.0, 3.2, &mut rng), 1.5);
            assert_eq!(policy.apply(0.0, 0.0, 3.2, &mut rng), 0.0);
            assert_eq!(policy.apply(3.2, 0.0, 3.2, &mut rng), 3.2);
        }
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn repair_resamples_out_of_range_values() {
        // A zero generator always samples the lower bound.
        let mut rng = CountingRng::new(0);
        assert_eq!(BoundaryRepair::Literal.apply(-1.0, 0.0, 3.2, &mut rng), 0.0);
        assert_eq!(rng.draws, 1);
        assert_eq!(BoundaryRepair::Literal.apply(4.0, 0.0, 3.2, &mut rng), 0.0);
        assert_eq!(rng.draws, 2);
        assert_eq!(BoundaryRepair::Exclusive.apply(4.0, 0.0, 3.2, &mut rng), 0.0);
        assert_eq!(rng.draws, 3);
    }

    #[test]
    fn build_rejects_invalid_configuration() {
        let err = FireflyOptimizer::builder(Sphere { dims: 2 })
            .population_size(0)
            .build()
            .unwrap_err();
        assert_eq!(err, FireflyError::InvalidPopulationSize(0));

        let err = FireflyOptimizer::builder(Sphere { dims: 0 })
            .build()
            .unwrap_err();
        assert_eq!(err, FireflyError::InvalidDimensions(0));

        let params = FireflyParams {
            lower: 1.0,
            upper: 1.0,
            ..FireflyParams::default()
        };
        let err = FireflyOptimizer::builder(Sphere { dims: 2 })
            .params(params)
            .build()
            .unwrap_err();
        assert!(matches!(err, FireflyError::InvalidBounds { .. }));

        let params = FireflyParams {
            randomization: f64::NAN,
            ..FireflyParams::default()
        };
        let err = FireflyOptimizer::builder(Sphere { dims: 2 })
            .params(params)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("randomization"));
    }

    #[test]
    fn builder_is_debug_formatted() {
        let builder = FireflyOptimizer::builder(Sphere { dims: 2 }).population_size(3);
        let text = format!("{builder:?}");
        assert!(text.contains("Sphere"));
        assert!(text.contains("population_size: 3"));
    }

    #[test]
    fn initialize_draws_within_bounds() {
        let optimizer = FireflyOptimizer::builder(Sphere { dims: 3 })
            .population_size(7)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let swarm = optimizer.initialize(&mut rng).unwrap();
        assert_eq!(swarm.len(), 7);
        assert!(swarm.within(0.0, 3.2));
        for firefly in swarm.fireflies() {
            assert_eq!(firefly.position().len(), 3);
        }
    }

    #[test]
    fn initialize_consumes_one_draw_per_coordinate() {
        let optimizer = FireflyOptimizer::builder(Sphere { dims: 4 })
            .population_size(5)
            .build()
            .unwrap();
        let mut rng = CountingRng::new(0);
        optimizer.initialize(&mut rng).unwrap();
        assert_eq!(rng.draws, 20);
    }

    #[test]
    fn dimmer_firefly_moves_towards_brighter() {
        let params = FireflyParams {
            randomization: 0.0,
            ..FireflyParams::default()
        };
        let optimizer = FireflyOptimizer::builder(Sphere { dims: 1 })
            .population_size(2)
            .params(params)
            .build()
            .unwrap();
        let mut swarm = Swarm::from_fireflies(vec![
            Firefly::new(vec![2.0], 4.0),
            Firefly::new(vec![1.0], 1.0),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        optimizer.epoch(&mut swarm, &mut rng).unwrap();
        // beta = exp(-1) for a unit distance
        let expected = 2.0 + (-1.0_f64).exp() * (1.0 - 2.0);
        let moved = swarm
            .fireflies()
            .iter()
            .find(|firefly| firefly.position()[0] != 1.0)
            .unwrap();
        assert!((moved.position()[0] - expected).abs() < 1e-12);
        assert!((moved.error() - expected.powi(4)).abs() < 1e-12);
        assert_eq!(swarm.fireflies()[0].error(), 1.0);
    }

    #[test]
    fn moved_firefly_is_compared_with_its_new_brightness() {
        let params = FireflyParams {
            randomization: 0.0,
            ..FireflyParams::default()
        };
        let optimizer = FireflyOptimizer::builder(Sphere { dims: 1 })
            .population_size(3)
            .params(params)
            .build()
            .unwrap();
        let mut swarm = Swarm::from_fireflies(vec![
            Firefly::new(vec![1.0], 1.0),
            Firefly::new(vec![0.5], 0.0625),
            Firefly::new(vec![0.0], 0.0),
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        optimizer.epoch(&mut swarm, &mut rng).unwrap();

        let step = |x: f64, target: f64| x + (-(x - target) * (x - target)).exp() * (target - x);
        // Firefly 0 passes firefly 1 in brightness before firefly 1 is visited,
        // so firefly 1 is then pulled towards firefly 0 as well.
        let first = step(step(1.0, 0.5), 0.0);
        let second = step(step(0.5, first), 0.0);
        assert!(second < first);
        let positions: Vec<f64> = swarm
            .fireflies()
            .iter()
            .map(|firefly| firefly.position()[0])
            .collect();
        assert_eq!(positions[0], 0.0);
        assert!((positions[1] - second).abs() < 1e-12);
        assert!((positions[2] - first).abs() < 1e-12);
    }

    #[test]
    fn move_draws_one_jitter_per_dimension() {
        let optimizer = FireflyOptimizer::builder(Sphere { dims: 3 })
            .population_size(2)
            .build()
            .unwrap();
        let mut swarm = Swarm::from_fireflies(vec![
            Firefly::new(vec![2.0; 3], 144.0),
            Firefly::new(vec![1.0; 3], 9.0),
        ]);
        // A zero generator jitters every coordinate by -0.1, which stays in range.
        let mut rng = CountingRng::new(0);
        optimizer.epoch(&mut swarm, &mut rng).unwrap();
        assert_eq!(rng.draws, 3);
        assert!(swarm.within(0.0, 3.2));
    }

    #[test]
    fn literal_upper_check_never_fires_after_lower_resample() {
        for seed in 0..64 {
            for value in [-0.5, -100.0, 3.5, 100.0] {
                let mut literal = CountingRng {
                    inner: StepRng::new(0, 0),
                    draws: 0,
                };
                let mut exclusive = CountingRng {
                    inner: StepRng::new(0, 0),
                    draws: 0,
                };
                let mut literal_rng = StdRng::seed_from_u64(seed);
                let mut exclusive_rng = StdRng::seed_from_u64(seed);
                let lhs = BoundaryRepair::Literal.apply(value, 0.0, 3.2, &mut literal_rng);
                let rhs = BoundaryRepair::Exclusive.apply(value, 0.0, 3.2, &mut exclusive_rng);
                assert_eq!(lhs, rhs);
                assert_eq!(literal_rng.gen::<u64>(), exclusive_rng.gen::<u64>());
                BoundaryRepair::Literal.apply(value, 0.0, 3.2, &mut literal);
                BoundaryRepair::Exclusive.apply(value, 0.0, 3.2, &mut exclusive);
                assert_eq!(literal.draws, 1);
                assert_eq!(exclusive.draws, 1);
            }
        }
    }

    #[test]
    fn equal_brightness_never_moves() {
        let optimizer = FireflyOptimizer::builder(Sphere { dims: 2 })
            .population_size(2)
            .build()
            .unwrap();
        let mut swarm = Swarm::from_fireflies(vec![
            Firefly::new(vec![1.0, 0.0], 1.0),
            Firefly::new(vec![0.0, 1.0], 1.0),
        ]);
        let before = swarm.clone();
        let mut rng = CountingRng::new(0);
        optimizer.epoch(&mut swarm, &mut rng).unwrap();
        assert_eq!(swarm, before);
        assert_eq!(rng.draws, 0);
    }

    #[test]
    fn target_error_ends_run_early() {
        let optimizer = FireflyOptimizer::builder(Sphere { dims: 1 })
            .population_size(4)
            .max_epochs(50)
            .stop_condition(StopCondition::target_error_below(f64::INFINITY))
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let report = optimizer.run(&mut rng).unwrap();
        assert_eq!(report.epochs, 0);
        assert_eq!(report.stats.epochs(), 0);
    }

    #[test]
    fn run_on_sphere_improves() {
        let optimizer = FireflyOptimizer::builder(Sphere { dims: 2 })
            .population_size(15)
            .max_epochs(30)
            .build()
            .unwrap();
        let mut rng = StdRng::seed_from_u64(42);
        let swarm = optimizer.initialize(&mut StdRng::seed_from_u64(42)).unwrap();
        let initial_best = swarm.best().unwrap().error();
        let report = optimizer.run(&mut rng).unwrap();
        assert_eq!(report.epochs, 30);
        assert!(report.best_error <= initial_best);
        assert!(report.best_error.is_finite());
    }

    #[test]
    fn pair_mut_returns_requested_indices() {
        let mut fireflies = vec![
            Firefly::new(vec![0.0], 0.0),
            Firefly::new(vec![1.0], 0.0),
            Firefly::new(vec![2.0], 0.0),
        ];
        let (moving, target) = pair_mut(&mut fireflies, 2, 0);
        assert_eq!(moving.position(), &[2.0]);
        assert_eq!(target.position(), &[0.0]);
        let (moving, target) = pair_mut(&mut fireflies, 0, 1);
        assert_eq!(moving.position(), &[0.0]);
        assert_eq!(target.position(), &[1.0]);
    }

    #[test]
    fn solve_rejects_bad_inputs() {
        assert_eq!(solve(0, 5, 0, 10), Err(FireflyError::InvalidPopulationSize(0)));
        assert_eq!(solve(-3, 5, 0, 10), Err(FireflyError::InvalidPopulationSize(-3)));
        assert_eq!(solve(10, 0, 0, 10), Err(FireflyError::InvalidDimensions(0)));
        assert_eq!(solve(10, 5, 0, -1), Err(FireflyError::InvalidEpochs(-1)));
    }
}
