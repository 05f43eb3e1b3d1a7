//! Lattice simulation engines.
//!
//! A deterministic life-rule automaton and a stochastic SIRS epidemic, both on
//! a toroidal grid, plus the statistics and study drivers built on them.

pub mod lattice;
pub mod patterns;
pub mod life;
pub mod sirs;
pub mod equilibrium;
pub mod stats;
pub mod glider;
pub mod study;

pub use lattice::Lattice;
pub use patterns::InitialCondition;
pub use life::LifeCell;
pub use sirs::{Probabilities, SirsCell};
pub use equilibrium::EquilibriumDetector;
pub use stats::ObservableSeries;
pub use glider::GliderTracker;
