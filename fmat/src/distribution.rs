//! Random sources for [`DenseMatrix::random`](crate::DenseMatrix::random)

use fmat_core::{ContinuousDistribution, FmatError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Uniform};

/// Pairs a `rand` distribution with the generator that drives it
#[derive(Debug, Clone)]
pub struct RandomSampler<D, R> {
    distribution: D,
    rng: R,
}

impl<D, R> RandomSampler<D, R>
where
    D: Distribution<f64>,
    R: Rng,
{
    pub fn new(distribution: D, rng: R) -> Self {
        Self { distribution, rng }
    }

    pub fn distribution(&self) -> &D {
        &self.distribution
    }

    pub fn into_parts(self) -> (D, R) {
        (self.distribution, self.rng)
    }
}

impl<D, R> ContinuousDistribution for RandomSampler<D, R>
where
    D: Distribution<f64>,
    R: Rng,
{
    fn sample(&mut self) -> f64 {
        self.distribution.sample(&mut self.rng)
    }
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform `f64` samples from `[low, high)`
///
/// [`DenseMatrix::random`](crate::DenseMatrix::random) rounds each sample to
/// `f32`, so matrix elements lie in the closed range `[low, high]`.
pub fn uniform(low: f64, high: f64, seed: Option<u64>) -> Result<RandomSampler<Uniform<f64>, StdRng>> {
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(FmatError::InvalidParameter);
    }
    Ok(RandomSampler::new(Uniform::new(low, high), seeded(seed)))
}

/// Normal samples with the given mean and standard deviation
pub fn normal(mean: f64, std_dev: f64, seed: Option<u64>) -> Result<RandomSampler<Normal<f64>, StdRng>> {
    if !(mean.is_finite() && std_dev.is_finite() && std_dev >= 0.0) {
        return Err(FmatError::InvalidParameter);
    }
    let distribution = Normal::new(mean, std_dev).map_err(|_| FmatError::InvalidParameter)?;
    Ok(RandomSampler::new(distribution, seeded(seed)))
}
