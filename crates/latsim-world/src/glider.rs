//! Centre-of-mass tracking for a single travelling pattern.

use crate::lattice::Lattice;
use crate::life::{live_sites, LifeCell};
use latsim_core::{glider_displacement_ambiguous, Site};
use serde::{Deserialize, Serialize};

/// Inclusive row/column extent of a set of sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_row: i32,
    pub max_row: i32,
    pub min_col: i32,
    pub max_col: i32,
}

impl BoundingBox {
    pub fn of(sites: &[Site]) -> Option<Self> {
        let first = sites.first()?;
        let init = Self {
            min_row: first.row,
            max_row: first.row,
            min_col: first.col,
            max_col: first.col,
        };
        Some(sites.iter().fold(init, |b, s| Self {
            min_row: b.min_row.min(s.row),
            max_row: b.max_row.max(s.row),
            min_col: b.min_col.min(s.col),
            max_col: b.max_col.max(s.col),
        }))
    }

    /// True if the box comes within `margin` cells of any lattice edge.
    ///
    /// Rows are checked against `rows` and columns against `cols`. A pattern
    /// split across the seam spans both edges and is always reported.
    pub fn near_seam(&self, rows: i32, cols: i32, margin: i32) -> bool {
        self.min_row < margin
            || self.max_row > rows - 1 - margin
            || self.min_col < margin
            || self.max_col > cols - 1 - margin
    }
}

/// Mean (row, col) of `sites`.
pub fn centre_of_mass(sites: &[Site]) -> Option<(f64, f64)> {
    if sites.is_empty() {
        return None;
    }
    let n = sites.len() as f64;
    let (rows, cols) = sites.iter().fold((0.0, 0.0), |(r, c), s| {
        (r + s.row as f64, c + s.col as f64)
    });
    Some((rows / n, cols / n))
}

/// Shortest signed displacement on a ring of length `period`.
pub fn minimum_image(delta: f64, period: i32) -> f64 {
    let period = period as f64;
    delta - period * (delta / period).round()
}

/// Ordinary least-squares slope of `ys` against `xs`.
pub fn least_squares_slope(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let (sxy, sxx) = xs.iter().zip(ys).fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });
    if sxx == 0.0 {
        None
    } else {
        Some(sxy / sxx)
    }
}

/// One kept observation: step count and unwrapped centre of mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GliderSample {
    pub step: usize,
    pub row: f64,
    pub col: f64,
}

/// Records the centre of mass of the live cells whenever they are clear of
/// the seam, unwrapping positions so the trajectory stays continuous.
///
/// Unwrapping only holds while the glider moves less than half the lattice
/// between kept samples; a longer gap ends the trajectory.
#[derive(Debug, Clone)]
pub struct GliderTracker {
    margin: i32,
    samples: Vec<GliderSample>,
    last_raw: Option<(f64, f64)>,
}

impl GliderTracker {
    pub fn new(margin: i32) -> Self {
        Self {
            margin,
            samples: Vec::new(),
            last_raw: None,
        }
    }

    /// Observe the lattice at `step`. Returns whether a sample was kept.
    pub fn observe(&mut self, step: usize, lattice: &Lattice<LifeCell>) -> bool {
        if let Some(prev) = self.samples.last() {
            let gap = step.saturating_sub(prev.step);
            if glider_displacement_ambiguous(gap, lattice.rows(), lattice.cols()) {
                return false;
            }
        }
        let sites = live_sites(lattice);
        let bbox = match BoundingBox::of(&sites) {
            Some(bbox) => bbox,
            None => return false,
        };
        if bbox.near_seam(lattice.rows(), lattice.cols(), self.margin) {
            return false;
        }
        let (row, col) = match centre_of_mass(&sites) {
            Some(com) => com,
            None => return false,
        };

        let sample = match (self.last_raw, self.samples.last()) {
            (Some((last_row, last_col)), Some(prev)) => GliderSample {
                step,
                row: prev.row + minimum_image(row - last_row, lattice.rows()),
                col: prev.col + minimum_image(col - last_col, lattice.cols()),
            },
            _ => GliderSample { step, row, col },
        };
        self.last_raw = Some((row, col));
        self.samples.push(sample);
        true
    }

    pub fn samples(&self) -> &[GliderSample] {
        &self.samples
    }

    /// Fitted (row, col) velocity in cells per step.
    pub fn velocity(&self) -> Option<(f64, f64)> {
        let steps: Vec<f64> = self.samples.iter().map(|s| s.step as f64).collect();
        let rows: Vec<f64> = self.samples.iter().map(|s| s.row).collect();
        let cols: Vec<f64> = self.samples.iter().map(|s| s.col).collect();
        Some((
            least_squares_slope(&steps, &rows)?,
            least_squares_slope(&steps, &cols)?,
        ))
    }

    /// Magnitude of the fitted velocity.
    pub fn speed(&self) -> Option<f64> {
        self.velocity().map(|(vr, vc)| vr.hypot(vc))
    }
}
