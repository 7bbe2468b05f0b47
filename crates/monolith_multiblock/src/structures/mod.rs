//! # Built-in Structure Types
//!
//! | Kind | Blocks | Shape |
//! |------|--------|-------|
//! | `crafting_complex` | unit, storage, co-processor, monitor | solid cuboid with storage |
//! | `quantum_bridge` | ring, link | 3x3x1 frame, link at the centre |
//! | `spatial_pylon` | pylon | straight line |

pub mod crafting;
pub mod pylon;
pub mod quantum;

pub use crafting::CraftingComplex;
pub use pylon::SpatialPylon;
pub use quantum::QuantumBridge;

use crate::block::{BlockKind, MachineBlock};
use crate::cluster::StructureKind;
use crate::config::StructureConfig;
use crate::rules::StructureRules;

/// The rules for every built-in structure type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StructureCatalog {
    crafting: CraftingComplex,
    quantum: QuantumBridge,
    pylon: SpatialPylon,
}

impl StructureCatalog {
    /// Every kind the catalog knows, in lookup order.
    pub const KINDS: [StructureKind; 3] = [
        StructureKind::CRAFTING_COMPLEX,
        StructureKind::QUANTUM_BRIDGE,
        StructureKind::SPATIAL_PYLON,
    ];

    /// Builds the catalog from configured scale rules.
    #[must_use]
    pub fn from_config(config: &StructureConfig) -> Self {
        Self {
            crafting: CraftingComplex::new(config.crafting),
            quantum: QuantumBridge::new(config.quantum),
            pylon: SpatialPylon::new(config.pylon),
        }
    }

    /// Rules for `kind`, if it is a built-in type.
    #[must_use]
    pub fn rules(&self, kind: StructureKind) -> Option<&dyn StructureRules<MachineBlock>> {
        match kind {
            StructureKind::CRAFTING_COMPLEX => Some(&self.crafting),
            StructureKind::QUANTUM_BRIDGE => Some(&self.quantum),
            StructureKind::SPATIAL_PYLON => Some(&self.pylon),
            _ => None,
        }
    }

    /// Rules for the structure `block` can join.
    #[must_use]
    pub fn rules_for_block(&self, block: BlockKind) -> Option<&dyn StructureRules<MachineBlock>> {
        block.structure().and_then(|kind| self.rules(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monolith_core::Extent;

    #[test]
    fn test_lookup_by_kind() {
        let catalog = StructureCatalog::default();
        for kind in StructureCatalog::KINDS {
            assert_eq!(catalog.rules(kind).map(|rules| rules.kind()), Some(kind));
        }
        assert!(catalog.rules(StructureKind::new("unknown")).is_none());
        assert!(catalog.rules_for_block(BlockKind::Inert).is_none());
    }

    #[test]
    fn test_config_reaches_rules() {
        let mut config = StructureConfig::default();
        config.pylon.max = Extent::new(1, 1, 4);

        let catalog = StructureCatalog::from_config(&config);
        let pylon = catalog.rules_for_block(BlockKind::SpatialPylon).unwrap();
        let five = monolith_core::Bounds::new(
            monolith_core::Coord::ORIGIN,
            monolith_core::Coord::new(4, 0, 0),
        );
        assert!(!pylon.check_scale(five));
    }
}
