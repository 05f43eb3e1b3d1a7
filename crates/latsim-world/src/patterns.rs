//! Initial conditions for the automaton and the seed patterns they place.

use crate::lattice::Lattice;
use crate::life::LifeCell;
use latsim_core::{Error, Result, Site};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a fresh automaton lattice is populated. Resolved once from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InitialCondition {
    /// Every site alive with probability 1/2
    Random,
    /// Period-2 blinker, a horizontal row of three
    Oscillator,
    /// Glider travelling towards increasing row and column
    Glider,
    /// Beehive still life
    Beehive,
    /// 2x2 block still life
    Square,
}

const OSCILLATOR: &[&str] = &["###"];
const GLIDER: &[&str] = &[".#.", "..#", "###"];
const BEEHIVE: &[&str] = &[".##.", "#..#", ".##."];
const SQUARE: &[&str] = &["##", "##"];

impl InitialCondition {
    pub fn all() -> [InitialCondition; 5] {
        [
            InitialCondition::Random,
            InitialCondition::Oscillator,
            InitialCondition::Glider,
            InitialCondition::Beehive,
            InitialCondition::Square,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            InitialCondition::Random => "random",
            InitialCondition::Oscillator => "oscillator",
            InitialCondition::Glider => "glider",
            InitialCondition::Beehive => "beehive",
            InitialCondition::Square => "square",
        }
    }

    /// Seed pattern rows, `#` alive and `.` dead. `None` for a random fill.
    pub fn pattern(&self) -> Option<&'static [&'static str]> {
        match self {
            InitialCondition::Random => None,
            InitialCondition::Oscillator => Some(OSCILLATOR),
            InitialCondition::Glider => Some(GLIDER),
            InitialCondition::Beehive => Some(BEEHIVE),
            InitialCondition::Square => Some(SQUARE),
        }
    }

    /// Height and width of the box that holds the pattern in every phase.
    ///
    /// A blinker occupies 1x3 and 3x1, so its envelope is 3x3. A glider keeps
    /// a 3x3 box while it travels.
    pub fn envelope(&self) -> Option<(i32, i32)> {
        match self {
            InitialCondition::Random => None,
            InitialCondition::Oscillator | InitialCondition::Glider => Some((3, 3)),
            InitialCondition::Beehive => Some((3, 4)),
            InitialCondition::Square => Some((2, 2)),
        }
    }
}

impl fmt::Display for InitialCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitialCondition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "r" => Ok(InitialCondition::Random),
            "oscillator" | "blinker" => Ok(InitialCondition::Oscillator),
            "glider" => Ok(InitialCondition::Glider),
            "beehive" => Ok(InitialCondition::Beehive),
            "square" | "block" => Ok(InitialCondition::Square),
            other => Err(Error::Config(format!(
                "unknown initial condition '{}', expected one of random, oscillator, glider, beehive, square",
                other
            ))),
        }
    }
}

/// Top-left anchor that centres a `height x width` window on the lattice.
///
/// The window must leave at least one clear row and column on every side so
/// that the pattern does not interact with itself across the seam.
pub fn centred_anchor(rows: i32, cols: i32, height: i32, width: i32) -> Result<Site> {
    if rows < height + 2 || cols < width + 2 {
        return Err(Error::Config(format!(
            "a {}x{} pattern does not fit on a {}x{} lattice",
            height, width, rows, cols
        )));
    }
    Ok(Site::new((rows - height) / 2, (cols - width) / 2))
}

/// Place `pattern` at the centre of `lattice`, overwriting the window.
///
/// `envelope` is the pattern's extent across all its phases; the lattice
/// must fit it with a clear row and column on every side.
pub fn place_pattern(
    lattice: &mut Lattice<LifeCell>,
    pattern: &[&str],
    envelope: (i32, i32),
) -> Result<Site> {
    let window: Vec<Vec<LifeCell>> = pattern
        .iter()
        .map(|line| {
            line.chars()
                .map(|ch| if ch == '#' { LifeCell::Alive } else { LifeCell::Dead })
                .collect()
        })
        .collect();
    let height = window.len() as i32;
    let width = window.iter().map(|line| line.len()).max().unwrap_or(0) as i32;

    centred_anchor(lattice.rows(), lattice.cols(), envelope.0, envelope.1)?;
    let anchor = centred_anchor(lattice.rows(), lattice.cols(), height, width)?;
    lattice.overwrite(anchor, &window);
    Ok(anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for condition in InitialCondition::all() {
            let parsed: InitialCondition = condition.name().parse().unwrap();
            assert_eq!(parsed, condition);
        }
        assert_eq!("r".parse::<InitialCondition>().unwrap(), InitialCondition::Random);
        assert_eq!("Block".parse::<InitialCondition>().unwrap(), InitialCondition::Square);
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            "spaceship".parse::<InitialCondition>(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_centred_anchor() {
        assert_eq!(centred_anchor(10, 10, 3, 3).unwrap(), Site::new(3, 3));
        assert_eq!(centred_anchor(5, 5, 1, 3).unwrap(), Site::new(2, 1));
        assert!(matches!(centred_anchor(4, 10, 3, 3), Err(Error::Config(_))));
    }

    #[test]
    fn test_place_glider() {
        let mut lattice = Lattice::new(10, 10, LifeCell::Dead).unwrap();
        let anchor = place_pattern(&mut lattice, GLIDER, (3, 3)).unwrap();
        assert_eq!(anchor, Site::new(3, 3));
        assert_eq!(lattice.count(|c| c == LifeCell::Alive), 5);
        assert_eq!(lattice.get(3, 4), LifeCell::Alive);
        assert_eq!(lattice.get(4, 5), LifeCell::Alive);
        assert_eq!(lattice.get(5, 3), LifeCell::Alive);
        assert_eq!(lattice.get(3, 3), LifeCell::Dead);
    }

    #[test]
    fn test_envelopes_cover_patterns() {
        for condition in InitialCondition::all() {
            match (condition.pattern(), condition.envelope()) {
                (Some(pattern), Some((height, width))) => {
                    assert!(pattern.len() as i32 <= height);
                    assert!(pattern.iter().all(|line| line.len() as i32 <= width));
                }
                (None, None) => assert_eq!(condition, InitialCondition::Random),
                _ => panic!("{} has a pattern without an envelope", condition),
            }
        }
    }

    #[test]
    fn test_oscillator_needs_room_for_both_phases() {
        let mut lattice = Lattice::new(3, 5, LifeCell::Dead).unwrap();
        assert!(matches!(
            place_pattern(&mut lattice, OSCILLATOR, (3, 3)),
            Err(Error::Config(_))
        ));
        assert_eq!(lattice.count(LifeCell::is_alive), 0);

        let mut lattice = Lattice::new(5, 5, LifeCell::Dead).unwrap();
        assert_eq!(place_pattern(&mut lattice, OSCILLATOR, (3, 3)).unwrap(), Site::new(2, 1));
    }
}
