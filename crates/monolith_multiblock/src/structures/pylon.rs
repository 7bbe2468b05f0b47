//! # Spatial Pylon
//!
//! A straight run of pylon segments along any axis. Capacity is the run's
//! length.

use monolith_core::{Bounds, Coord, Grid};

use crate::block::{BlockKind, MachineBlock};
use crate::cluster::{Cluster, ClusterId, ClusterStatus, StructureKind};
use crate::config::ScaleRule;
use crate::error::ShapeFault;
use crate::rules::StructureRules;

/// Rules for spatial pylons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpatialPylon {
    scale: ScaleRule,
}

impl SpatialPylon {
    /// Creates the rules with the given scale limits.
    #[must_use]
    pub const fn new(scale: ScaleRule) -> Self {
        Self { scale }
    }
}

impl Default for SpatialPylon {
    fn default() -> Self {
        Self::new(crate::config::StructureConfig::default().pylon)
    }
}

impl StructureRules<MachineBlock> for SpatialPylon {
    fn kind(&self) -> StructureKind {
        StructureKind::SPATIAL_PYLON
    }

    fn is_candidate(&self, cell: &MachineBlock) -> bool {
        cell.kind() == BlockKind::SpatialPylon
    }

    fn check_scale(&self, bounds: Bounds) -> bool {
        bounds.extent().is_line() && self.scale.accepts(bounds.extent())
    }

    fn verify_internal_structure(
        &self,
        grid: &dyn Grid<Cell = MachineBlock>,
        bounds: Bounds,
    ) -> Result<bool, ShapeFault> {
        for at in bounds.cells() {
            let cell = grid.cell_at(at).ok_or(ShapeFault::MissingCell(at))?;
            if !self.is_candidate(cell) {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn compute_status(&self, _grid: &dyn Grid<Cell = MachineBlock>, cluster: &Cluster) -> ClusterStatus {
        ClusterStatus {
            active: true,
            capacity: cluster.bounds().volume(),
        }
    }

    fn configure_member(&self, cell: &mut MachineBlock, _cluster: ClusterId, _bounds: Bounds, _at: Coord) {
        cell.set_formed(true);
    }

    fn release_member(&self, cell: &mut MachineBlock) {
        cell.set_formed(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monolith_core::SparseGrid;

    #[test]
    fn test_vertical_pylon() {
        let rules = SpatialPylon::default();
        let mut grid = SparseGrid::new();
        let bounds = Bounds::new(Coord::ORIGIN, Coord::new(0, 4, 0));
        for at in bounds.cells() {
            grid.insert(at, MachineBlock::new(BlockKind::SpatialPylon));
        }

        assert!(rules.check_scale(bounds));
        assert_eq!(rules.verify_internal_structure(&grid, bounds), Ok(true));

        let cluster = Cluster::new(rules.kind(), bounds);
        assert_eq!(rules.compute_status(&grid, &cluster).capacity, 5);
    }

    #[test]
    fn test_slab_is_not_a_pylon() {
        let rules = SpatialPylon::default();
        assert!(!rules.check_scale(Bounds::new(Coord::ORIGIN, Coord::new(1, 0, 1))));
    }

    #[test]
    fn test_missing_segment_faults() {
        let rules = SpatialPylon::default();
        let mut grid = SparseGrid::new();
        grid.insert(Coord::ORIGIN, MachineBlock::new(BlockKind::SpatialPylon));

        let bounds = Bounds::new(Coord::ORIGIN, Coord::new(2, 0, 0));
        assert_eq!(
            rules.verify_internal_structure(&grid, bounds),
            Err(ShapeFault::MissingCell(Coord::new(1, 0, 0)))
        );
    }
}
