//! # Quantum Bridge
//!
//! A flat 3x3 frame of ring segments around a single link chamber, in any
//! orientation:
//!
//! ```text
//! R R R
//! R L R
//! R R R
//! ```

use monolith_core::{Bounds, Coord, Grid};

use crate::block::{BlockKind, MachineBlock};
use crate::cluster::{Cluster, ClusterId, ClusterStatus, StructureKind};
use crate::config::ScaleRule;
use crate::error::ShapeFault;
use crate::rules::StructureRules;

/// Rules for quantum bridges.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantumBridge {
    scale: ScaleRule,
}

impl QuantumBridge {
    /// Creates the rules with the given scale limits.
    #[must_use]
    pub const fn new(scale: ScaleRule) -> Self {
        Self { scale }
    }

    /// Centre cell of `bounds`.
    #[must_use]
    pub fn centre(bounds: Bounds) -> Coord {
        let extent = bounds.extent();
        let min = bounds.min();
        Coord::new(
            min.x + (extent.x / 2) as i32,
            min.y + (extent.y / 2) as i32,
            min.z + (extent.z / 2) as i32,
        )
    }
}

impl Default for QuantumBridge {
    fn default() -> Self {
        Self::new(crate::config::StructureConfig::default().quantum)
    }
}

impl StructureRules<MachineBlock> for QuantumBridge {
    fn kind(&self) -> StructureKind {
        StructureKind::QUANTUM_BRIDGE
    }

    fn is_candidate(&self, cell: &MachineBlock) -> bool {
        matches!(cell.kind(), BlockKind::QuantumRing | BlockKind::QuantumLink)
    }

    fn check_scale(&self, bounds: Bounds) -> bool {
        self.scale.accepts(bounds.extent())
    }

    fn verify_internal_structure(
        &self,
        grid: &dyn Grid<Cell = MachineBlock>,
        bounds: Bounds,
    ) -> Result<bool, ShapeFault> {
        if bounds.extent().sorted() != [1, 3, 3] {
            return Ok(false);
        }

        let centre = Self::centre(bounds);
        for at in bounds.cells() {
            let Some(cell) = grid.cell_at(at) else {
                return Ok(false);
            };
            let expected = if at == centre {
                BlockKind::QuantumLink
            } else {
                BlockKind::QuantumRing
            };
            if cell.kind() != expected {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn compute_status(&self, _grid: &dyn Grid<Cell = MachineBlock>, _cluster: &Cluster) -> ClusterStatus {
        ClusterStatus {
            active: true,
            capacity: 1,
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

    fn frame(grid: &mut SparseGrid<MachineBlock>, bounds: Bounds) {
        let centre = QuantumBridge::centre(bounds);
        for at in bounds.cells() {
            let kind = if at == centre {
                BlockKind::QuantumLink
            } else {
                BlockKind::QuantumRing
            };
            grid.insert(at, MachineBlock::new(kind));
        }
    }

    #[test]
    fn test_frame_in_every_orientation() {
        let rules = QuantumBridge::default();
        for max in [Coord::new(2, 2, 0), Coord::new(2, 0, 2), Coord::new(0, 2, 2)] {
            let mut grid = SparseGrid::new();
            let bounds = Bounds::new(Coord::ORIGIN, max);
            frame(&mut grid, bounds);

            assert!(rules.check_scale(bounds), "{bounds}");
            assert_eq!(rules.verify_internal_structure(&grid, bounds), Ok(true), "{bounds}");
        }
    }

    #[test]
    fn test_link_must_be_central() {
        let rules = QuantumBridge::default();
        let mut grid = SparseGrid::new();
        let bounds = Bounds::new(Coord::ORIGIN, Coord::new(2, 2, 0));
        frame(&mut grid, bounds);

        grid.insert(Coord::new(1, 1, 0), MachineBlock::new(BlockKind::QuantumRing));
        grid.insert(Coord::ORIGIN, MachineBlock::new(BlockKind::QuantumLink));
        assert_eq!(rules.verify_internal_structure(&grid, bounds), Ok(false));
    }

    #[test]
    fn test_wrong_size_rejected() {
        let rules = QuantumBridge::default();
        let cube = Bounds::new(Coord::ORIGIN, Coord::new(2, 2, 2));
        assert!(!rules.check_scale(cube));

        let grid: SparseGrid<MachineBlock> = SparseGrid::new();
        assert_eq!(rules.verify_internal_structure(&grid, cube), Ok(false));
    }
}
