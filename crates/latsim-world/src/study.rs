//! Study drivers: repeated trials and parameter sweeps over the engines.
//!
//! Every trial owns its lattice and an RNG stream derived from the study seed
//! and the trial index, so trials are independent and reproducible.

use crate::equilibrium::EquilibriumDetector;
use crate::glider::{GliderSample, GliderTracker};
use crate::life;
use crate::patterns::InitialCondition;
use crate::sirs::{self, Probabilities};
use crate::stats::{self, bootstrap, ObservableSeries};
use latsim_core::{LifeStudyConfig, Result, SirsStudyConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};

/// RNG for trial `trial` of a study seeded with `seed`.
pub fn trial_rng(seed: u64, trial: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(trial);
    rng
}

/// Run independent automaton trials until their live count plateaus.
///
/// Returns one entry per trial: the equilibrium time, or `None` when the
/// trial hit `max_steps` first.
#[instrument(skip(config), fields(rows = config.rows, cols = config.cols, trials = config.simulations))]
pub fn equilibrium_times(config: &LifeStudyConfig) -> Result<Vec<Option<usize>>> {
    config.validate()?;
    let condition: InitialCondition = config.initial_condition.parse()?;
    info!(condition = %condition, "Starting equilibrium study");

    let mut times = Vec::with_capacity(config.simulations);
    for trial in 0..config.simulations {
        let mut rng = trial_rng(config.seed, trial as u64);
        let mut lattice = life::new_lattice(config.rows, config.cols, &condition, &mut rng)?;
        let mut detector = EquilibriumDetector::new();

        for _ in 0..config.max_steps {
            lattice = life::step(&lattice);
            if detector.record(life::live_count(&lattice)) {
                break;
            }
        }

        let time = detector.equilibrium_time();
        debug!(trial, ?time, final_live = life::live_count(&lattice), "Trial finished");
        times.push(time);
    }

    let capped = times.iter().filter(|t| t.is_none()).count();
    info!(
        trials = times.len(),
        capped,
        "Equilibrium study complete"
    );
    Ok(times)
}

/// Kept glider samples and the fitted velocity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GliderRun {
    pub samples: Vec<GliderSample>,
    /// (row, col) cells per step
    pub velocity: Option<(f64, f64)>,
}

/// Track a single glider for `simulations` samples of `steps_per_sample` steps.
#[instrument(skip(config), fields(rows = config.rows, cols = config.cols, samples = config.simulations))]
pub fn glider_trajectory(config: &LifeStudyConfig) -> Result<GliderRun> {
    config.validate()?;
    let mut rng = trial_rng(config.seed, 0);
    let mut lattice = life::new_lattice(config.rows, config.cols, &InitialCondition::Glider, &mut rng)?;
    let mut tracker = GliderTracker::new(config.boundary_margin);

    for sample in 0..config.simulations {
        let step = sample * config.steps_per_sample;
        if !tracker.observe(step, &lattice) {
            trace!(step, "Glider sample skipped");
        }
        for _ in 0..config.steps_per_sample {
            lattice = life::step(&lattice);
        }
    }

    let velocity = tracker.velocity();
    info!(
        kept = tracker.samples().len(),
        ?velocity,
        speed = ?tracker.speed(),
        "Glider tracking complete"
    );
    Ok(GliderRun {
        samples: tracker.samples().to_vec(),
        velocity,
    })
}

/// Infected fraction after every sweep of one run.
///
/// Once no site is infected the state is absorbing, so the remaining sweeps
/// are recorded as zero without simulating them.
pub fn infected_fraction_series(
    config: &SirsStudyConfig,
    probs: &Probabilities,
    rng: &mut ChaCha8Rng,
) -> Result<ObservableSeries> {
    let mut lattice = sirs::new_lattice(config.rows, config.cols, config.immune_fraction, rng)?;
    let mut series = ObservableSeries::new();

    for sweep in 0..config.sweeps {
        if sirs::infected_count(&lattice) == 0 {
            trace!(sweep, "Infection died out");
            for _ in sweep..config.sweeps {
                series.push(0.0);
            }
            break;
        }
        sirs::sweep(&mut lattice, probs, rng);
        series.push(sirs::infected_fraction(&lattice));
    }

    Ok(series)
}

/// Mean infected fraction over the (p1, p3) grid with p2 fixed.
///
/// Indexed `[p3][p1]`, both ascending along `config.probability_grid()`.
#[instrument(skip(config), fields(rows = config.rows, cols = config.cols, p2 = config.p2))]
pub fn phase_diagram(config: &SirsStudyConfig) -> Result<Vec<Vec<f64>>> {
    config.validate()?;
    let grid = config.probability_grid();
    info!(points = grid.len() * grid.len(), "Starting phase diagram");

    let mut matrix = Vec::with_capacity(grid.len());
    for (i3, &p3) in grid.iter().enumerate() {
        let mut row = Vec::with_capacity(grid.len());
        for (i1, &p1) in grid.iter().enumerate() {
            let probs = Probabilities::new(p1, config.p2, p3)?;
            let mut rng = trial_rng(config.seed, (i3 * grid.len() + i1) as u64);
            let series = infected_fraction_series(config, &probs, &mut rng)?;
            let mean = stats::mean(series.after(config.eqm_sweeps))?;
            debug!(p1, p3, mean, "Phase point");
            row.push(mean);
        }
        matrix.push(row);
    }

    info!("Phase diagram complete");
    Ok(matrix)
}

/// Statistics of the infected fraction at one value of p1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariancePoint {
    pub p1: f64,
    pub mean: f64,
    pub variance: f64,
    /// Bootstrap standard error of `variance`
    pub error: f64,
}

/// Scan p1 along the probability grid with p2 and p3 fixed, estimating the
/// variance of the infected fraction and its bootstrap error.
#[instrument(skip(config), fields(rows = config.rows, cols = config.cols, p2 = config.p2, p3 = config.p3))]
pub fn variance_scan(config: &SirsStudyConfig) -> Result<Vec<VariancePoint>> {
    config.validate()?;
    let grid = config.probability_grid();
    info!(points = grid.len(), resamples = config.bootstrap_resamples, "Starting variance scan");

    let mut points = Vec::with_capacity(grid.len());
    for (i1, &p1) in grid.iter().enumerate() {
        let probs = Probabilities::new(p1, config.p2, config.p3)?;
        let mut rng = trial_rng(config.seed, i1 as u64);
        let series = infected_fraction_series(config, &probs, &mut rng)?;
        let sampled: ObservableSeries = series.after(config.eqm_sweeps).iter().copied().collect();

        let point = VariancePoint {
            p1,
            mean: sampled.mean()?,
            variance: sampled.variance()?,
            error: bootstrap(sampled.values(), config.bootstrap_resamples, &mut rng)?,
        };
        debug!(p1, mean = point.mean, variance = point.variance, error = point.error, "Variance point");
        points.push(point);
    }

    info!("Variance scan complete");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use latsim_core::Error;
    use rand::Rng;

    fn small_life() -> LifeStudyConfig {
        LifeStudyConfig {
            rows: 16,
            cols: 16,
            simulations: 5,
            max_steps: 2000,
            seed: 7,
            ..Default::default()
        }
    }

    fn small_sirs() -> SirsStudyConfig {
        SirsStudyConfig {
            rows: 10,
            cols: 10,
            sweeps: 40,
            eqm_sweeps: 20,
            prob_step: 0.5,
            bootstrap_resamples: 50,
            seed: 3,
            ..Default::default()
        }
    }

    #[test]
    fn test_trial_streams_differ() {
        let a: u64 = trial_rng(1, 0).gen();
        let b: u64 = trial_rng(1, 1).gen();
        let again: u64 = trial_rng(1, 0).gen();
        assert_ne!(a, b);
        assert_eq!(a, again);
    }

    #[test]
    fn test_equilibrium_times_reproducible() {
        let config = small_life();
        let first = equilibrium_times(&config).unwrap();
        assert_eq!(first.len(), 5);
        assert_eq!(first, equilibrium_times(&config).unwrap());
    }

    #[test]
    fn test_still_life_equilibrates_immediately() {
        let config = LifeStudyConfig {
            initial_condition: "square".to_string(),
            simulations: 2,
            ..small_life()
        };
        assert_eq!(equilibrium_times(&config).unwrap(), vec![Some(0), Some(0)]);
    }

    #[test]
    fn test_unknown_condition_rejected() {
        let config = LifeStudyConfig {
            initial_condition: "pulsar".to_string(),
            ..small_life()
        };
        assert!(matches!(equilibrium_times(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_glider_trajectory() {
        let config = LifeStudyConfig {
            rows: 30,
            cols: 30,
            simulations: 60,
            steps_per_sample: 4,
            ..small_life()
        };
        let run = glider_trajectory(&config).unwrap();
        assert!(!run.samples.is_empty());
        let (vr, vc) = run.velocity.unwrap();
        assert!((vr - 0.25).abs() < 1e-9);
        assert!((vc - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_glider_sampling_too_coarse_for_lattice() {
        let config = LifeStudyConfig {
            rows: 30,
            cols: 30,
            simulations: 20,
            steps_per_sample: 80,
            ..small_life()
        };
        assert!(matches!(glider_trajectory(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_phase_diagram_shape() {
        let config = small_sirs();
        let matrix = phase_diagram(&config).unwrap();
        assert_eq!(matrix.len(), 3);
        assert!(matrix.iter().all(|row| row.len() == 3));
        assert!(matrix.iter().flatten().all(|&v| (0.0..=1.0).contains(&v)));
        // p1 = 0: nothing new is infected, so the infection dies out.
        for row in &matrix {
            assert!(row[0] < 0.05);
        }
    }

    #[test]
    fn test_absorbing_state_fills_zeros() {
        let config = SirsStudyConfig {
            p1: 0.0,
            p2: 1.0,
            ..small_sirs()
        };
        let probs = Probabilities::new(config.p1, config.p2, config.p3).unwrap();
        let mut rng = trial_rng(1, 0);
        let series = infected_fraction_series(&config, &probs, &mut rng).unwrap();
        assert_eq!(series.len(), config.sweeps);
        assert!(series.after(config.eqm_sweeps).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_variance_scan() {
        let config = small_sirs();
        let points = variance_scan(&config).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].p1, 0.0);
        assert_eq!(points[2].p1, 1.0);
        for point in &points {
            assert!(point.variance >= 0.0);
            assert!(point.error >= 0.0);
        }
        // The dead phase has a constant series, so zero spread.
        assert_eq!(points[0].error, 0.0);
        assert_eq!(points, variance_scan(&config).unwrap());
    }

    #[test]
    fn test_invalid_sirs_config() {
        let config = SirsStudyConfig {
            p3: -0.5,
            ..small_sirs()
        };
        assert!(matches!(variance_scan(&config), Err(Error::Range(_))));
    }
}
