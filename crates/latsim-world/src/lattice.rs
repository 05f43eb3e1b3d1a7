//! Toroidal 2D lattice shared by both engines.

use latsim_core::{check_dimensions, Error, Result, Site};
use serde::{Deserialize, Serialize};

/// A fixed-size toroidal grid of cell states, stored row-major.
///
/// All access goes through wrapped coordinates; there is no edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lattice<C> {
    rows: i32,
    cols: i32,
    cells: Vec<C>,
}

impl<C: Copy> Lattice<C> {
    /// Create a lattice with every site set to `fill`.
    pub fn new(rows: i32, cols: i32, fill: C) -> Result<Self> {
        check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![fill; (rows as usize) * (cols as usize)],
        })
    }

    /// Create a lattice by evaluating `f` at every site in row-major order.
    pub fn from_fn(rows: i32, cols: i32, mut f: impl FnMut(Site) -> C) -> Result<Self> {
        check_dimensions(rows, cols)?;
        let mut cells = Vec::with_capacity((rows as usize) * (cols as usize));
        for row in 0..rows {
            for col in 0..cols {
                cells.push(f(Site::new(row, col)));
            }
        }
        Ok(Self { rows, cols, cells })
    }

    /// Wrap an existing row-major cell vector.
    pub fn from_cells(rows: i32, cols: i32, cells: Vec<C>) -> Result<Self> {
        check_dimensions(rows, cols)?;
        let expected = (rows as usize) * (cols as usize);
        if cells.len() != expected {
            return Err(Error::State(format!(
                "{} cells supplied for a {}x{} lattice",
                cells.len(),
                rows,
                cols
            )));
        }
        Ok(Self { rows, cols, cells })
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    /// Total number of sites, `rows * cols`.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: construction rejects empty lattices.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Floor-modulo wrap of `(row, col)` onto the grid.
    pub fn wrap(&self, row: i32, col: i32) -> Site {
        Site::new(row, col).wrap(self.rows, self.cols)
    }

    /// Get the state at `(row, col)` (with toroidal wrapping)
    pub fn get(&self, row: i32, col: i32) -> C {
        self.cells[self.index(self.wrap(row, col))]
    }

    /// Set the state at `(row, col)` (with toroidal wrapping)
    pub fn set(&mut self, row: i32, col: i32, cell: C) {
        let index = self.index(self.wrap(row, col));
        self.cells[index] = cell;
    }

    /// Count the neighbours of `site` at the given offsets that satisfy `pred`.
    pub fn count_neighbours(
        &self,
        site: Site,
        offsets: &[(i32, i32)],
        pred: impl Fn(C) -> bool,
    ) -> usize {
        offsets
            .iter()
            .filter(|(dr, dc)| pred(self.get(site.row + dr, site.col + dc)))
            .count()
    }

    /// True if any neighbour of `site` at the given offsets satisfies `pred`.
    pub fn any_neighbour(&self, site: Site, offsets: &[(i32, i32)], pred: impl Fn(C) -> bool) -> bool {
        offsets
            .iter()
            .any(|(dr, dc)| pred(self.get(site.row + dr, site.col + dc)))
    }

    /// Number of sites whose state satisfies `pred`.
    pub fn count(&self, pred: impl Fn(C) -> bool) -> usize {
        self.cells.iter().filter(|&&c| pred(c)).count()
    }

    /// Overwrite a rectangular window whose top-left corner is `anchor`.
    pub fn overwrite(&mut self, anchor: Site, window: &[Vec<C>]) {
        for (dr, line) in window.iter().enumerate() {
            for (dc, &cell) in line.iter().enumerate() {
                self.set(anchor.row + dr as i32, anchor.col + dc as i32, cell);
            }
        }
    }

    /// Build a new lattice of the same shape from every site of this one.
    ///
    /// `f` only sees the current lattice, so a rule applied through it is a
    /// synchronous update.
    pub fn map_sites<D: Copy>(&self, f: impl Fn(Site, C) -> D) -> Lattice<D> {
        let cells = self.iter().map(|(site, cell)| f(site, cell)).collect();
        Lattice {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }

    /// Apply a fallible conversion to every site.
    pub fn try_map<D: Copy>(&self, f: impl Fn(C) -> Result<D>) -> Result<Lattice<D>> {
        let cells = self.cells.iter().map(|&c| f(c)).collect::<Result<Vec<_>>>()?;
        Ok(Lattice {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    /// Iterator over all sites with their states
    pub fn iter(&self) -> impl Iterator<Item = (Site, C)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (self.index_to_site(i), cell))
    }

    pub fn cells(&self) -> &[C] {
        &self.cells
    }

    fn index(&self, site: Site) -> usize {
        site_index(site, self.cols)
    }

    fn index_to_site(&self, index: usize) -> Site {
        index_site(index, self.cols)
    }
}

/// Row-major offset of an in-range `site`, computed in `usize` so that
/// `rows * cols` may exceed `i32::MAX`.
fn site_index(site: Site, cols: i32) -> usize {
    site.row as usize * cols as usize + site.col as usize
}

fn index_site(index: usize, cols: i32) -> Site {
    let cols = cols as usize;
    Site::new((index / cols) as i32, (index % cols) as i32)
}
