//! Aggregate observables and bootstrap error estimation.

use latsim_core::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Append-only sequence of per-sweep measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObservableSeries {
    values: Vec<f64>,
}

impl ObservableSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The samples left after discarding the first `cutoff` (equilibration).
    pub fn after(&self, cutoff: usize) -> &[f64] {
        &self.values[cutoff.min(self.values.len())..]
    }

    pub fn mean(&self) -> Result<f64> {
        mean(&self.values)
    }

    pub fn variance(&self) -> Result<f64> {
        variance(&self.values)
    }
}

impl From<Vec<f64>> for ObservableSeries {
    fn from(values: Vec<f64>) -> Self {
        Self { values }
    }
}

impl FromIterator<f64> for ObservableSeries {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn require_samples(values: &[f64]) -> Result<()> {
    if values.is_empty() {
        return Err(Error::State("statistics of an empty series".to_string()));
    }
    Ok(())
}

pub fn mean(values: &[f64]) -> Result<f64> {
    require_samples(values)?;
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population variance (divisor `n`).
///
/// Accumulated relative to the first sample, so a constant series gives
/// exactly zero.
pub fn variance(values: &[f64]) -> Result<f64> {
    require_samples(values)?;
    let shift = values[0];
    let n = values.len() as f64;
    let (sum, sum_sq) = values.iter().fold((0.0, 0.0), |(s, sq), &v| {
        let d = v - shift;
        (s + d, sq + d * d)
    });
    Ok(((sum_sq - sum * sum / n) / n).max(0.0))
}

/// Bootstrap standard error of the variance estimator.
///
/// Each of `n_resamples` rounds draws `values.len()` indices uniformly with
/// replacement from `0..=len-1` and takes the variance of the resample. The
/// result is the square root of the variance of those resample variances.
pub fn bootstrap<R: Rng + ?Sized>(values: &[f64], n_resamples: usize, rng: &mut R) -> Result<f64> {
    require_samples(values)?;
    if n_resamples == 0 {
        return Err(Error::Config("bootstrap needs at least one resample".to_string()));
    }

    let n = values.len();
    let mut resample = vec![0.0; n];
    let mut estimates = Vec::with_capacity(n_resamples);
    for _ in 0..n_resamples {
        for slot in resample.iter_mut() {
            *slot = values[rng.gen_range(0..n)];
        }
        estimates.push(variance(&resample)?);
    }

    Ok(variance(&estimates)?.sqrt())
}

/// Count `values` into bins `[k*width, (k+1)*width)` covering `[0, upper)`.
///
/// Returns `(lower edge, count)` per bin. Values at or above `upper` are not
/// counted.
pub fn histogram(values: &[usize], bin_width: usize, upper: usize) -> Result<Vec<(usize, usize)>> {
    if bin_width == 0 {
        return Err(Error::Config("histogram bin width must be positive".to_string()));
    }
    let bins = upper.div_ceil(bin_width);
    let mut counts = vec![0usize; bins];
    for &value in values.iter().filter(|&&v| v < upper) {
        counts[value / bin_width] += 1;
    }
    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(k, count)| (k * bin_width, count))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_mean_and_variance() {
        let series: ObservableSeries = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into();
        assert_eq!(series.mean().unwrap(), 5.0);
        assert_eq!(series.variance().unwrap(), 4.0);
    }

    #[test]
    fn test_empty_series_is_state_error() {
        let series = ObservableSeries::new();
        assert!(matches!(series.mean(), Err(Error::State(_))));
        assert!(matches!(series.variance(), Err(Error::State(_))));

        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(bootstrap(&[], 10, &mut rng), Err(Error::State(_))));
    }

    #[test]
    fn test_after_cutoff() {
        let series: ObservableSeries = (0..10).map(f64::from).collect();
        assert_eq!(series.after(7), &[7.0, 8.0, 9.0]);
        assert!(series.after(20).is_empty());
        assert_eq!(mean(series.after(8)).unwrap(), 8.5);
    }

    #[test]
    fn test_bootstrap_constant_series_is_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let values = vec![0.37; 200];
        assert_eq!(bootstrap(&values, 500, &mut rng).unwrap(), 0.0);
    }

    #[test]
    fn test_bootstrap_needs_resamples() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(matches!(
            bootstrap(&[1.0, 2.0], 0, &mut rng),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_bootstrap_error_is_positive_and_reproducible() {
        let values: Vec<f64> = (0..100).map(|i| ((i * 37) % 11) as f64).collect();
        let first = bootstrap(&values, 200, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        let second = bootstrap(&values, 200, &mut ChaCha8Rng::seed_from_u64(1)).unwrap();
        assert!(first > 0.0);
        assert!(first < variance(&values).unwrap());
        assert_eq!(first, second);
    }

    #[test]
    fn test_bootstrap_reaches_last_element() {
        // Only the last element differs; an exclusive upper bound would never
        // see it and report zero error.
        let mut values = vec![0.0; 4];
        values[3] = 1.0;
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert!(bootstrap(&values, 100, &mut rng).unwrap() > 0.0);
    }

    #[test]
    fn test_histogram() {
        let bins = histogram(&[0, 99, 100, 250, 2499, 2500, 9000], 100, 2500).unwrap();
        assert_eq!(bins.len(), 25);
        assert_eq!(bins[0], (0, 2));
        assert_eq!(bins[1], (100, 1));
        assert_eq!(bins[2], (200, 1));
        assert_eq!(bins[24], (2400, 1));
        assert_eq!(bins.iter().map(|(_, c)| c).sum::<usize>(), 5);

        assert!(matches!(histogram(&[1], 0, 10), Err(Error::Config(_))));
    }
}
