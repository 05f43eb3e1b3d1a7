//! Configuration types for the simulation studies.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Cells per step a glider travels along each axis.
pub const GLIDER_SPEED: f64 = 0.25;

/// True if a glider moving for `steps` steps covers half the shorter lattice
/// side or more, beyond which its wrapped position is ambiguous.
pub fn glider_displacement_ambiguous(steps: usize, rows: i32, cols: i32) -> bool {
    steps as f64 * GLIDER_SPEED >= f64::from(rows.min(cols)) / 2.0
}

/// Parameters for automaton studies (equilibrium times, glider tracking)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeStudyConfig {
    /// Number of lattice rows
    pub rows: i32,
    /// Number of lattice columns
    pub cols: i32,
    /// Initial condition name (random, oscillator, glider, beehive, square)
    pub initial_condition: String,
    /// Number of independent trials, or number of samples for a glider run
    pub simulations: usize,
    /// Step cap for a single equilibrium trial
    pub max_steps: usize,
    /// Steps between glider position samples; the glider must move less than
    /// half the shorter lattice side in this many steps
    pub steps_per_sample: usize,
    /// Minimum distance between a tracked pattern and the lattice seam
    pub boundary_margin: i32,
    /// Bin width of the equilibrium-time histogram
    pub histogram_bin_width: usize,
    /// Upper edge of the equilibrium-time histogram
    pub histogram_upper: usize,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for LifeStudyConfig {
    fn default() -> Self {
        Self {
            rows: 50,
            cols: 50,
            initial_condition: "random".to_string(),
            simulations: 100,
            max_steps: 5000,
            steps_per_sample: 10,
            boundary_margin: 2,
            histogram_bin_width: 100,
            histogram_upper: 2500,
            seed: 0,
        }
    }
}

impl LifeStudyConfig {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.rows, self.cols)?;
        if self.steps_per_sample == 0 {
            return Err(Error::Config("steps_per_sample must be positive".to_string()));
        }
        if glider_displacement_ambiguous(self.steps_per_sample, self.rows, self.cols) {
            return Err(Error::Config(format!(
                "steps_per_sample {} moves a glider half way round a {}x{} lattice",
                self.steps_per_sample, self.rows, self.cols
            )));
        }
        if self.boundary_margin < 0 {
            return Err(Error::Config(format!(
                "boundary_margin must not be negative, got {}",
                self.boundary_margin
            )));
        }
        if self.histogram_bin_width == 0 {
            return Err(Error::Config("histogram_bin_width must be positive".to_string()));
        }
        Ok(())
    }
}

/// Parameters for epidemic studies (phase diagram, variance scan)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SirsStudyConfig {
    /// Number of lattice rows
    pub rows: i32,
    /// Number of lattice columns
    pub cols: i32,
    /// P(S -> I) given an infected neighbour; swept by the phase diagram and variance scan
    pub p1: f64,
    /// P(I -> R)
    pub p2: f64,
    /// P(R -> S); swept by the phase diagram
    pub p3: f64,
    /// Fraction of sites that are permanently immune (0.0 to 1.0)
    pub immune_fraction: f64,
    /// Total sweeps per parameter point
    pub sweeps: usize,
    /// Sweeps discarded before sampling observables
    pub eqm_sweeps: usize,
    /// Grid spacing in probability space
    pub prob_step: f64,
    /// Bootstrap resamples per error estimate
    pub bootstrap_resamples: usize,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for SirsStudyConfig {
    fn default() -> Self {
        Self {
            rows: 50,
            cols: 50,
            p1: 0.5,
            p2: 0.5,
            p3: 0.5,
            immune_fraction: 0.0,
            sweeps: 1000,
            eqm_sweeps: 100,
            prob_step: 0.05,
            bootstrap_resamples: 1000,
            seed: 0,
        }
    }
}

impl SirsStudyConfig {
    pub fn validate(&self) -> Result<()> {
        check_dimensions(self.rows, self.cols)?;
        Error::check_probability("p1", self.p1)?;
        Error::check_probability("p2", self.p2)?;
        Error::check_probability("p3", self.p3)?;
        Error::check_probability("immune_fraction", self.immune_fraction)?;
        if !(self.prob_step > 0.0 && self.prob_step <= 1.0) {
            return Err(Error::Config(format!(
                "prob_step must lie in (0, 1], got {}",
                self.prob_step
            )));
        }
        if self.eqm_sweeps >= self.sweeps {
            return Err(Error::Config(format!(
                "eqm_sweeps ({}) must be smaller than sweeps ({})",
                self.eqm_sweeps, self.sweeps
            )));
        }
        if self.bootstrap_resamples == 0 {
            return Err(Error::Config("bootstrap_resamples must be positive".to_string()));
        }
        Ok(())
    }

    /// Probability grid `0, step, 2*step, ..., 1` used by the sweeps.
    pub fn probability_grid(&self) -> Vec<f64> {
        let points = (1.0 / self.prob_step).round() as usize;
        (0..=points)
            .map(|i| (i as f64 * self.prob_step).min(1.0))
            .collect()
    }
}

/// Top-level study configuration as loaded by the runner
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StudyConfig {
    pub life: LifeStudyConfig,
    pub sirs: SirsStudyConfig,
}

impl StudyConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Reject lattice dimensions that cannot be wrapped.
pub fn check_dimensions(rows: i32, cols: i32) -> Result<()> {
    if rows <= 0 || cols <= 0 {
        return Err(Error::Config(format!(
            "lattice dimensions must be positive, got {}x{}",
            rows, cols
        )));
    }
    Ok(())
}
