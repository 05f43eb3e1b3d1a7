//! Stochastic SIRS epidemic with asynchronous single-site updates.
//!
//! One call to [`step`] updates one uniformly chosen site; a sweep is
//! `rows * cols` such calls, so every site is visited once on average.

use crate::lattice::Lattice;
use latsim_core::{Error, Result, Site, VON_NEUMANN};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epidemic cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SirsCell {
    Susceptible,
    Infected,
    Recovered,
    /// Permanently immune; never changes state.
    Immune,
}

impl SirsCell {
    pub fn is_infected(self) -> bool {
        self == SirsCell::Infected
    }

    /// Numeric code used in text snapshots.
    pub fn code(self) -> i8 {
        match self {
            SirsCell::Susceptible => -1,
            SirsCell::Infected => 0,
            SirsCell::Recovered => 1,
            SirsCell::Immune => 2,
        }
    }

    pub fn from_code(code: i8) -> Result<Self> {
        match code {
            -1 => Ok(SirsCell::Susceptible),
            0 => Ok(SirsCell::Infected),
            1 => Ok(SirsCell::Recovered),
            2 => Ok(SirsCell::Immune),
            other => Err(Error::State(format!("invalid epidemic cell code {}", other))),
        }
    }
}

/// Validated transition probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    /// S -> I, given at least one infected neighbour
    pub p1: f64,
    /// I -> R
    pub p2: f64,
    /// R -> S
    pub p3: f64,
}

impl Probabilities {
    pub fn new(p1: f64, p2: f64, p3: f64) -> Result<Self> {
        Ok(Self {
            p1: Error::check_probability("p1", p1)?,
            p2: Error::check_probability("p2", p2)?,
            p3: Error::check_probability("p3", p3)?,
        })
    }
}

/// Build a random starting lattice.
///
/// Each site is immune with probability `immune_fraction`, otherwise one of
/// susceptible, infected or recovered with equal probability.
pub fn new_lattice<R: Rng + ?Sized>(
    rows: i32,
    cols: i32,
    immune_fraction: f64,
    rng: &mut R,
) -> Result<Lattice<SirsCell>> {
    Error::check_probability("immune_fraction", immune_fraction)?;
    Lattice::from_fn(rows, cols, |_| {
        if immune_fraction > 0.0 && rng.gen_bool(immune_fraction) {
            return SirsCell::Immune;
        }
        match rng.gen_range(0..3) {
            0 => SirsCell::Susceptible,
            1 => SirsCell::Infected,
            _ => SirsCell::Recovered,
        }
    })
}

/// True if any of the four von Neumann neighbours of `site` is infected.
pub fn has_infected_neighbour(lattice: &Lattice<SirsCell>, site: Site) -> bool {
    lattice.any_neighbour(site, &VON_NEUMANN, SirsCell::is_infected)
}

/// Perform one asynchronous update, validating the probabilities first.
///
/// Nothing is mutated when a probability is outside `[0, 1]`.
pub fn step<R: Rng + ?Sized>(
    lattice: &mut Lattice<SirsCell>,
    p1: f64,
    p2: f64,
    p3: f64,
    rng: &mut R,
) -> Result<()> {
    let probs = Probabilities::new(p1, p2, p3)?;
    update_site(lattice, &probs, rng);
    Ok(())
}

/// One asynchronous update with already validated probabilities.
pub fn update_site<R: Rng + ?Sized>(lattice: &mut Lattice<SirsCell>, probs: &Probabilities, rng: &mut R) {
    let site = Site::new(
        rng.gen_range(0..lattice.rows()),
        rng.gen_range(0..lattice.cols()),
    );

    let next = match lattice.get(site.row, site.col) {
        SirsCell::Susceptible => {
            if has_infected_neighbour(lattice, site) && rng.gen_bool(probs.p1) {
                SirsCell::Infected
            } else {
                SirsCell::Susceptible
            }
        }
        SirsCell::Infected => {
            if rng.gen_bool(probs.p2) {
                SirsCell::Recovered
            } else {
                SirsCell::Infected
            }
        }
        SirsCell::Recovered => {
            if rng.gen_bool(probs.p3) {
                SirsCell::Susceptible
            } else {
                SirsCell::Recovered
            }
        }
        SirsCell::Immune => SirsCell::Immune,
    };

    lattice.set(site.row, site.col, next);
}

/// `rows * cols` single-site updates.
pub fn sweep<R: Rng + ?Sized>(lattice: &mut Lattice<SirsCell>, probs: &Probabilities, rng: &mut R) {
    for _ in 0..lattice.len() {
        update_site(lattice, probs, rng);
    }
}

pub fn infected_count(lattice: &Lattice<SirsCell>) -> usize {
    lattice.count(SirsCell::is_infected)
}

/// Fraction of sites currently infected; the order parameter.
pub fn infected_fraction(lattice: &Lattice<SirsCell>) -> f64 {
    infected_count(lattice) as f64 / lattice.len() as f64
}
