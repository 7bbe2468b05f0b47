//! # Crafting Complex
//!
//! A solid cuboid of crafting blocks. At least one storage block is
//! required; the complex's capacity is the total storage it holds.

use monolith_core::{Bounds, Coord, Grid};

use crate::block::{BlockKind, MachineBlock};
use crate::cluster::{Cluster, ClusterId, ClusterStatus, StructureKind};
use crate::config::ScaleRule;
use crate::error::ShapeFault;
use crate::rules::StructureRules;

/// Rules for crafting complexes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CraftingComplex {
    scale: ScaleRule,
}

impl CraftingComplex {
    /// Creates the rules with the given scale limits.
    #[must_use]
    pub const fn new(scale: ScaleRule) -> Self {
        Self { scale }
    }

    /// Active scale limits.
    #[inline]
    #[must_use]
    pub const fn scale(&self) -> &ScaleRule {
        &self.scale
    }

    /// Total storage bytes over `cells`, or the first cell where the sum
    /// overflows.
    fn total_storage<I>(grid: &dyn Grid<Cell = MachineBlock>, cells: I) -> Result<u64, Coord>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut total: u64 = 0;
        for at in cells {
            let bytes = grid.cell_at(at).map_or(0, |cell| cell.kind().storage_bytes());
            total = total.checked_add(bytes).ok_or(at)?;
        }
        Ok(total)
    }
}

impl Default for CraftingComplex {
    fn default() -> Self {
        Self::new(ScaleRule::default())
    }
}

impl StructureRules<MachineBlock> for CraftingComplex {
    fn kind(&self) -> StructureKind {
        StructureKind::CRAFTING_COMPLEX
    }

    fn is_candidate(&self, cell: &MachineBlock) -> bool {
        cell.kind().structure() == Some(StructureKind::CRAFTING_COMPLEX)
    }

    fn check_scale(&self, bounds: Bounds) -> bool {
        self.scale.accepts(bounds.extent())
    }

    fn verify_internal_structure(
        &self,
        grid: &dyn Grid<Cell = MachineBlock>,
        bounds: Bounds,
    ) -> Result<bool, ShapeFault> {
        let mut has_storage = false;
        for at in bounds.cells() {
            let Some(cell) = grid.cell_at(at) else {
                return Ok(false);
            };
            if !self.is_candidate(cell) {
                return Ok(false);
            }
            has_storage |= matches!(cell.kind(), BlockKind::CraftingStorage { .. });
        }

        Self::total_storage(grid, bounds.cells()).map_err(ShapeFault::CapacityOverflow)?;
        Ok(has_storage)
    }

    fn compute_status(&self, grid: &dyn Grid<Cell = MachineBlock>, cluster: &Cluster) -> ClusterStatus {
        let has_storage = cluster.members().iter().any(|&at| {
            grid.cell_at(at)
                .is_some_and(|cell| matches!(cell.kind(), BlockKind::CraftingStorage { .. }))
        });
        let capacity = Self::total_storage(grid, cluster.members().iter().copied()).unwrap_or(u64::MAX);

        ClusterStatus {
            active: has_storage,
            capacity,
        }
    }

    fn configure_member(&self, cell: &mut MachineBlock, _cluster: ClusterId, _bounds: Bounds, _at: Coord) {
        cell.set_formed(true);
    }

    fn release_member(&self, cell: &mut MachineBlock) {
        cell.set_formed(false);
    }
}
