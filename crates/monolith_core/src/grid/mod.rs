//! # World Grid
//!
//! Integer-addressed 3D cell storage.
//!
//! ## Access Model
//!
//! Exactly one authoritative mutator owns the live world. Replicas
//! (client-side views, read-only mirrors) report `is_authoritative() == false`
//! and must never drive structural logic.

mod bounds;
mod coord;
mod sparse;

pub use bounds::{Bounds, Extent};
pub use coord::{Axis, Coord, Direction};
pub use sparse::SparseGrid;

/// Read/write access to the cells of a 3D world.
///
/// An empty or unrelated location is `None`.
pub trait Grid {
    /// The occupant type stored in a cell.
    type Cell;

    /// The occupant at `coord`, if any.
    fn cell_at(&self, coord: Coord) -> Option<&Self::Cell>;

    /// Mutable access to the occupant at `coord`, if any.
    fn cell_at_mut(&mut self, coord: Coord) -> Option<&mut Self::Cell>;

    /// Whether this view is the authoritative copy of the world.
    fn is_authoritative(&self) -> bool {
        true
    }
}
