//! # Structure Rules
//!
//! Everything a detection pass needs to know about one structure type:
//! which cells belong to it, which volumes are admissible, and how its
//! interior must be arranged.
//!
//! Rules are injected per pass; the calculator never inspects cells itself.

use monolith_core::{Bounds, Coord, Grid};

use crate::cluster::{Cluster, ClusterId, ClusterStatus, StructureKind};
use crate::error::ShapeFault;

/// Back-reference from a grid cell to the cluster it belongs to.
///
/// The reference is non-owning: the cluster lives in the registry and the
/// cell only remembers its handle.
pub trait StructureHost {
    /// The cluster this cell belongs to, if any.
    fn cluster(&self) -> Option<ClusterId>;

    /// Sets or clears the cluster reference.
    fn assign(&mut self, cluster: Option<ClusterId>);
}

/// Type-specific rules for one kind of multiblock structure.
///
/// # Contract
///
/// - `is_candidate`, `check_scale` and `verify_internal_structure` are pure
///   with respect to the grid.
/// - `verify_internal_structure` may fault; an `Err` is treated as `false`.
/// - `configure_member` / `release_member` are the only hooks allowed to
///   mutate cells, and only the cell they are handed.
pub trait StructureRules<C> {
    /// Name of this structure type.
    fn kind(&self) -> StructureKind;

    /// Whether `cell` can be a member of this structure type.
    fn is_candidate(&self, cell: &C) -> bool;

    /// Whether a grown volume has admissible dimensions.
    fn check_scale(&self, bounds: Bounds) -> bool;

    /// Whether the interior of `bounds` satisfies the shape contract.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeFault`] when validation itself breaks down.
    fn verify_internal_structure(
        &self,
        grid: &dyn Grid<Cell = C>,
        bounds: Bounds,
    ) -> Result<bool, ShapeFault>;

    /// Recomputes the operating status of a validated cluster.
    fn compute_status(&self, grid: &dyn Grid<Cell = C>, cluster: &Cluster) -> ClusterStatus;

    /// Builds the (not yet registered) cluster for a new structure.
    fn create_cluster(&self, bounds: Bounds) -> Cluster {
        Cluster::new(self.kind(), bounds)
    }

    /// Prepares one member cell after its cluster is published.
    fn configure_member(&self, _cell: &mut C, _cluster: ClusterId, _bounds: Bounds, _at: Coord) {}

    /// Returns one member cell to its standalone state.
    fn release_member(&self, _cell: &mut C) {}
}

/// Whether the cell at `coord` exists and is a candidate under `rules`.
pub fn candidate_at<C, R>(rules: &R, grid: &dyn Grid<Cell = C>, coord: Coord) -> bool
where
    R: StructureRules<C> + ?Sized,
{
    grid.cell_at(coord).is_some_and(|cell| rules.is_candidate(cell))
}
