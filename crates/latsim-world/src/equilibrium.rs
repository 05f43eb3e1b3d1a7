//! Plateau-based stopping criterion.
//!
//! A run is at equilibrium once the last three recorded samples are equal.
//! This detects fixed points of the observable only; a pattern whose sampled
//! value keeps changing periodically never triggers it, so every caller also
//! needs its own step cap.

/// Number of equal trailing samples that make a plateau.
pub const PLATEAU_LEN: usize = 3;

/// True iff `series` has at least three samples and the last three are equal.
pub fn is_equilibrium<T: PartialEq>(series: &[T]) -> bool {
    match series {
        [.., a, b, c] => a == b && b == c,
        _ => false,
    }
}

/// Records a growing series and latches once it reaches a plateau.
#[derive(Debug, Clone)]
pub struct EquilibriumDetector<T> {
    samples: Vec<T>,
    equilibrium_time: Option<usize>,
}

impl<T: PartialEq> EquilibriumDetector<T> {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            equilibrium_time: None,
        }
    }

    /// Append a sample and return the (sticky) equilibrium flag.
    pub fn record(&mut self, sample: T) -> bool {
        self.samples.push(sample);
        if self.equilibrium_time.is_none() && is_equilibrium(&self.samples) {
            self.equilibrium_time = Some(self.samples.len() - PLATEAU_LEN);
        }
        self.reached()
    }

    pub fn reached(&self) -> bool {
        self.equilibrium_time.is_some()
    }

    pub fn samples(&self) -> &[T] {
        &self.samples
    }

    /// Samples taken before the plateau began, once it has been reached.
    pub fn equilibrium_time(&self) -> Option<usize> {
        self.equilibrium_time
    }
}

impl<T: PartialEq> Default for EquilibriumDetector<T> {
    fn default() -> Self {
        Self::new()
    }
}
