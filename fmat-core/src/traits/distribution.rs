//! Sampling contract consumed by random matrix construction

/// A source of independent draws from a continuous distribution
pub trait ContinuousDistribution {
    /// Draw one sample
    fn sample(&mut self) -> f64;
}
