//! # Machine Blocks
//!
//! The cell type of a [`MultiblockWorld`](crate::world::MultiblockWorld).
//! Every machine block is a structure host: it remembers which cluster it
//! belongs to and whether it is currently part of a formed structure.

use serde::{Deserialize, Serialize};

use crate::cluster::{ClusterId, StructureKind};
use crate::rules::StructureHost;

/// Bytes held by the standard storage tiers.
pub mod storage {
    /// 1k storage.
    pub const TIER_1K: u64 = 1024;
    /// 4k storage.
    pub const TIER_4K: u64 = 4 * 1024;
    /// 16k storage.
    pub const TIER_16K: u64 = 16 * 1024;
    /// 64k storage.
    pub const TIER_64K: u64 = 64 * 1024;
}

/// What a machine block is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Plain crafting unit.
    CraftingUnit,
    /// Crafting storage holding `bytes`.
    CraftingStorage {
        /// Storage capacity in bytes.
        bytes: u64,
    },
    /// Parallel co-processor.
    CoProcessor,
    /// Crafting monitor.
    CraftingMonitor,
    /// Quantum ring segment.
    QuantumRing,
    /// Quantum link chamber.
    QuantumLink,
    /// Spatial pylon segment.
    SpatialPylon,
    /// Takes part in no structure.
    Inert,
}

impl BlockKind {
    /// The structure type this block can join.
    #[must_use]
    pub const fn structure(self) -> Option<StructureKind> {
        match self {
            Self::CraftingUnit
            | Self::CraftingStorage { .. }
            | Self::CoProcessor
            | Self::CraftingMonitor => Some(StructureKind::CRAFTING_COMPLEX),
            Self::QuantumRing | Self::QuantumLink => Some(StructureKind::QUANTUM_BRIDGE),
            Self::SpatialPylon => Some(StructureKind::SPATIAL_PYLON),
            Self::Inert => None,
        }
    }

    /// Storage bytes contributed to a crafting complex.
    #[inline]
    #[must_use]
    pub const fn storage_bytes(self) -> u64 {
        match self {
            Self::CraftingStorage { bytes } => bytes,
            _ => 0,
        }
    }
}

/// A machine block placed in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineBlock {
    kind: BlockKind,
    cluster: Option<ClusterId>,
    formed: bool,
}

impl MachineBlock {
    /// Creates a standalone block.
    #[inline]
    #[must_use]
    pub const fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            cluster: None,
            formed: false,
        }
    }

    /// What this block is.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Whether this block is part of a formed structure.
    #[inline]
    #[must_use]
    pub const fn is_formed(&self) -> bool {
        self.formed
    }

    /// Marks the block as formed or standalone.
    #[inline]
    pub fn set_formed(&mut self, formed: bool) {
        self.formed = formed;
    }
}

impl StructureHost for MachineBlock {
    fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }

    fn assign(&mut self, cluster: Option<ClusterId>) {
        self.cluster = cluster;
    }
}
