//! # Sparse Grid
//!
//! Hash-map backed world storage. Only occupied cells cost memory, which
//! suits machine placements scattered over an unbounded world.

use std::collections::HashMap;

use super::coord::Coord;
use super::Grid;

/// A sparse world of occupied cells.
///
/// # Example
///
/// ```rust,ignore
/// let mut grid = SparseGrid::new();
/// grid.insert(Coord::new(0, 64, 0), block);
/// assert!(grid.cell_at(Coord::new(0, 64, 0)).is_some());
/// ```
#[derive(Clone, Debug)]
pub struct SparseGrid<C> {
    cells: HashMap<Coord, C>,
    authoritative: bool,
}

impl<C> SparseGrid<C> {
    /// Creates an empty authoritative grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: HashMap::new(),
            authoritative: true,
        }
    }

    /// Creates an empty non-authoritative (replica) grid.
    #[must_use]
    pub fn replica() -> Self {
        Self {
            cells: HashMap::new(),
            authoritative: false,
        }
    }

    /// Places `cell` at `coord`, returning the previous occupant.
    pub fn insert(&mut self, coord: Coord, cell: C) -> Option<C> {
        self.cells.insert(coord, cell)
    }

    /// Clears `coord`, returning its occupant.
    pub fn remove(&mut self, coord: Coord) -> Option<C> {
        self.cells.remove(&coord)
    }

    /// Whether `coord` is occupied.
    #[inline]
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        self.cells.contains_key(&coord)
    }

    /// Number of occupied cells.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates occupied cells in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &C)> {
        self.cells.iter().map(|(&coord, cell)| (coord, cell))
    }
}

impl<C> Default for SparseGrid<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Grid for SparseGrid<C> {
    type Cell = C;

    #[inline]
    fn cell_at(&self, coord: Coord) -> Option<&C> {
        self.cells.get(&coord)
    }

    #[inline]
    fn cell_at_mut(&mut self, coord: Coord) -> Option<&mut C> {
        self.cells.get_mut(&coord)
    }

    fn is_authoritative(&self) -> bool {
        self.authoritative
    }
}
