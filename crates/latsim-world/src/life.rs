//! Deterministic life-rule automaton with synchronous updates.

use crate::lattice::Lattice;
use crate::patterns::{place_pattern, InitialCondition};
use latsim_core::{Error, Result, Site, MOORE};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Automaton cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeCell {
    Dead,
    Alive,
}

impl LifeCell {
    pub fn is_alive(self) -> bool {
        self == LifeCell::Alive
    }

    /// Numeric code used in text snapshots: dead 0, alive 1.
    pub fn code(self) -> i8 {
        match self {
            LifeCell::Dead => 0,
            LifeCell::Alive => 1,
        }
    }

    pub fn from_code(code: i8) -> Result<Self> {
        match code {
            0 => Ok(LifeCell::Dead),
            1 => Ok(LifeCell::Alive),
            other => Err(Error::State(format!("invalid automaton cell code {}", other))),
        }
    }
}

/// Build a starting lattice for the given initial condition.
pub fn new_lattice<R: Rng + ?Sized>(
    rows: i32,
    cols: i32,
    condition: &InitialCondition,
    rng: &mut R,
) -> Result<Lattice<LifeCell>> {
    match (condition.pattern(), condition.envelope()) {
        (Some(pattern), Some(envelope)) => {
            let mut lattice = Lattice::new(rows, cols, LifeCell::Dead)?;
            let anchor = place_pattern(&mut lattice, pattern, envelope)?;
            trace!(condition = %condition, row = anchor.row, col = anchor.col, "placed seed pattern");
            Ok(lattice)
        }
        _ => Lattice::from_fn(rows, cols, |_| {
            if rng.gen_bool(0.5) {
                LifeCell::Alive
            } else {
                LifeCell::Dead
            }
        }),
    }
}

/// Live cells among the eight Moore neighbours of `site`.
pub fn live_neighbours(lattice: &Lattice<LifeCell>, site: Site) -> usize {
    lattice.count_neighbours(site, &MOORE, LifeCell::is_alive)
}

/// The life rule: survival on 2 or 3, birth on exactly 3.
pub fn next_state(cell: LifeCell, live_neighbours: usize) -> LifeCell {
    match (cell, live_neighbours) {
        (LifeCell::Alive, 2) | (LifeCell::Alive, 3) => LifeCell::Alive,
        (LifeCell::Dead, 3) => LifeCell::Alive,
        _ => LifeCell::Dead,
    }
}

/// Advance the automaton by one generation.
///
/// Returns a freshly built lattice; every cell's next state depends only on
/// the input lattice.
pub fn step(lattice: &Lattice<LifeCell>) -> Lattice<LifeCell> {
    lattice.map_sites(|site, cell| next_state(cell, live_neighbours(lattice, site)))
}

/// Advance by `n` generations.
pub fn steps(lattice: &Lattice<LifeCell>, n: usize) -> Lattice<LifeCell> {
    let mut current = lattice.clone();
    for _ in 0..n {
        current = step(&current);
    }
    current
}

pub fn live_count(lattice: &Lattice<LifeCell>) -> usize {
    lattice.count(LifeCell::is_alive)
}

/// Sites of every live cell, in row-major order.
pub fn live_sites(lattice: &Lattice<LifeCell>) -> Vec<Site> {
    lattice
        .iter()
        .filter(|(_, cell)| cell.is_alive())
        .map(|(site, _)| site)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equilibrium::EquilibriumDetector;
    use crate::patterns::centred_anchor;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pattern_lattice(rows: i32, cols: i32, condition: InitialCondition) -> Lattice<LifeCell> {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        new_lattice(rows, cols, &condition, &mut rng).unwrap()
    }

    #[test]
    fn test_rule_table() {
        assert_eq!(next_state(LifeCell::Alive, 1), LifeCell::Dead);
        assert_eq!(next_state(LifeCell::Alive, 2), LifeCell::Alive);
        assert_eq!(next_state(LifeCell::Alive, 3), LifeCell::Alive);
        assert_eq!(next_state(LifeCell::Alive, 4), LifeCell::Dead);
        assert_eq!(next_state(LifeCell::Dead, 2), LifeCell::Dead);
        assert_eq!(next_state(LifeCell::Dead, 3), LifeCell::Alive);
        assert_eq!(next_state(LifeCell::Dead, 8), LifeCell::Dead);
    }

    #[test]
    fn test_cell_codes() {
        assert_eq!(LifeCell::from_code(1).unwrap(), LifeCell::Alive);
        assert_eq!(LifeCell::Dead.code(), 0);
        assert!(matches!(LifeCell::from_code(-1), Err(Error::State(_))));
    }

    #[test]
    fn test_block_is_still_life() {
        let block = pattern_lattice(8, 8, InitialCondition::Square);
        let mut current = block.clone();
        for _ in 0..20 {
            current = step(&current);
            assert_eq!(current, block);
        }
    }

    #[test]
    fn test_beehive_is_still_life() {
        let beehive = pattern_lattice(9, 10, InitialCondition::Beehive);
        assert_eq!(live_count(&beehive), 6);
        assert_eq!(steps(&beehive, 7), beehive);
    }

    #[test]
    fn test_glider_translates_diagonally() {
        let glider = pattern_lattice(20, 20, InitialCondition::Glider);
        let advanced = steps(&glider, 4);

        let anchor = centred_anchor(20, 20, 3, 3).unwrap();
        let expected = Lattice::from_fn(20, 20, |site| {
            glider.get(site.row - 1, site.col - 1)
        })
        .unwrap();
        assert_eq!(anchor, Site::new(8, 8));
        assert_eq!(advanced, expected);
        assert_eq!(live_count(&advanced), 5);
    }

    #[test]
    fn test_blinker_has_period_two() {
        let blinker = pattern_lattice(5, 5, InitialCondition::Oscillator);
        let once = step(&blinker);
        assert_ne!(once, blinker);
        assert_eq!(live_count(&once), 3);
        assert_eq!(step(&once), blinker);

        let mut detector = EquilibriumDetector::new();
        let mut current = blinker;
        for _ in 0..50 {
            current = step(&current);
            assert!(!detector.record(current.clone()));
        }
    }

    #[test]
    fn test_random_run_is_reproducible() {
        let run = |seed: u64| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut lattice = new_lattice(50, 50, &InitialCondition::Random, &mut rng).unwrap();
            let mut counts = Vec::with_capacity(100);
            for _ in 0..100 {
                lattice = step(&lattice);
                counts.push(live_count(&lattice));
            }
            counts
        };

        let first = run(42);
        assert_eq!(first.len(), 100);
        assert_eq!(first[0], 703);
        assert_eq!(first[9], 532);
        assert_eq!(first[99], 186);
        assert_eq!(first, run(42));
    }

    #[test]
    fn test_pattern_too_large() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            new_lattice(4, 4, &InitialCondition::Glider, &mut rng),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_blinker_rejected_when_vertical_phase_would_wrap() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(matches!(
            new_lattice(3, 5, &InitialCondition::Oscillator, &mut rng),
            Err(Error::Config(_))
        ));
        // Smallest lattice that holds both phases keeps the period.
        let blinker = new_lattice(5, 5, &InitialCondition::Oscillator, &mut rng).unwrap();
        assert_eq!(steps(&blinker, 2), blinker);
        assert_eq!(live_count(&step(&blinker)), 3);
    }

    proptest! {
        #[test]
        fn step_is_deterministic(cells in proptest::collection::vec(any::<bool>(), 64)) {
            let lattice = Lattice::from_cells(
                8,
                8,
                cells.into_iter().map(|a| if a { LifeCell::Alive } else { LifeCell::Dead }).collect(),
            ).unwrap();
            let first = step(&lattice);
            let second = step(&lattice);
            prop_assert_eq!(first, second);
        }
    }
}
