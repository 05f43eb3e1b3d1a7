//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};

/// A (row, col) site on the lattice. Coordinates may lie outside the grid
/// until they are wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Site {
    pub row: i32,
    pub col: i32,
}

impl Site {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn add(&self, dr: i32, dc: i32) -> Self {
        Self {
            row: self.row + dr,
            col: self.col + dc,
        }
    }

    /// Apply toroidal wrapping for the given lattice dimensions.
    ///
    /// Floor-modulo on both axes, so `-1` maps to the last row/column.
    pub fn wrap(&self, rows: i32, cols: i32) -> Self {
        Self {
            row: self.row.rem_euclid(rows),
            col: self.col.rem_euclid(cols),
        }
    }
}

/// The eight surrounding offsets, diagonals included.
pub const MOORE: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// North, east, south, west.
pub const VON_NEUMANN: [(i32, i32); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];
