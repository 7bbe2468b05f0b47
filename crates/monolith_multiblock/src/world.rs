//! # Multiblock World
//!
//! A grid of machine blocks with the built-in structure types wired in.
//!
//! ## Block Changes
//!
//! ```text
//! place / remove ──> retire clusters at the cell and its 6 neighbours
//!                     whose candidate set the old or new block is in
//!                         │
//!                         ▼
//!               recalculate from: the placed cell,
//!                                 every released member,
//!                                 every occupied neighbour,
//!                                 every cell a new cluster displaced
//! ```
//!
//! Retiring first means every affected structure is re-detected from
//! scratch, so a block that breaks a neighbour's isolation (or restores
//! it) is always noticed. A block that is not a candidate for a cluster
//! cannot change its shape or isolation, so that cluster keeps its id.
//!
//! ## Threading
//!
//! The world itself is single-threaded. [`MultiblockWorld::into_shared`]
//! wraps it in a `parking_lot::RwLock`; hold the write lock for every
//! mutation and readers only ever see committed passes.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use monolith_core::{Coord, Grid, SparseGrid};
use parking_lot::RwLock;

use crate::block::{BlockKind, MachineBlock};
use crate::calculator::{release_cluster, Calculator, Outcome};
use crate::cluster::{Cluster, ClusterId};
use crate::config::StructureConfig;
use crate::events::{ClusterBus, ClusterEventReceiver};
use crate::registry::ClusterRegistry;
use crate::rules::StructureHost;
use crate::structures::StructureCatalog;

/// A world shared between threads.
pub type SharedWorld = Arc<RwLock<MultiblockWorld>>;

/// Machine blocks, their clusters and the rules that form them.
#[derive(Debug)]
pub struct MultiblockWorld {
    grid: SparseGrid<MachineBlock>,
    registry: ClusterRegistry,
    catalog: StructureCatalog,
}

impl Default for MultiblockWorld {
    fn default() -> Self {
        Self::new(&StructureConfig::default())
    }
}

impl MultiblockWorld {
    /// Creates an empty authoritative world.
    #[must_use]
    pub fn new(config: &StructureConfig) -> Self {
        Self {
            grid: SparseGrid::new(),
            registry: ClusterRegistry::new(),
            catalog: StructureCatalog::from_config(config),
        }
    }

    /// Creates an empty non-authoritative view.
    ///
    /// Blocks can be placed and removed, but detection never runs.
    #[must_use]
    pub fn replica(config: &StructureConfig) -> Self {
        Self {
            grid: SparseGrid::replica(),
            ..Self::new(config)
        }
    }

    /// Attaches a new event channel and returns its receiving end.
    ///
    /// Replaces any previous subscription.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum undelivered events before new ones are dropped.
    pub fn subscribe(&mut self, capacity: usize) -> ClusterEventReceiver {
        let bus = ClusterBus::new(capacity);
        self.registry.attach_events(bus.sender());
        bus.receiver()
    }

    /// Wraps the world for sharing between threads.
    #[must_use]
    pub fn into_shared(self) -> SharedWorld {
        Arc::new(RwLock::new(self))
    }

    /// Places (or replaces) a block and re-detects everything it touches.
    ///
    /// Returns the outcome of every detection pass that ran, with its seed.
    pub fn place(&mut self, at: Coord, kind: BlockKind) -> Vec<(Coord, Outcome)> {
        let mut seeds = vec![at];
        if self.grid.is_authoritative() {
            let old = self.grid.cell_at(at).map(MachineBlock::kind);
            seeds.extend(self.retire_around(at, old.into_iter().chain([kind])));
        }
        self.grid.insert(at, MachineBlock::new(kind));
        seeds.extend(self.occupied_neighbors(at));

        let outcomes = self.settle(seeds);
        tracing::debug!(%at, ?kind, passes = outcomes.len(), "block placed");
        outcomes
    }

    /// Removes a block and re-detects everything it touched.
    ///
    /// Returns the removed block's kind, or `None` if the cell was empty.
    pub fn remove(&mut self, at: Coord) -> Option<BlockKind> {
        let old = self.grid.cell_at(at)?.kind();

        let mut seeds = Vec::new();
        if self.grid.is_authoritative() {
            seeds.extend(self.retire_around(at, [old]));
        }
        let removed = self.grid.remove(at)?;
        seeds.extend(self.occupied_neighbors(at));

        let outcomes = self.settle(seeds);
        tracing::debug!(%at, kind = ?removed.kind(), passes = outcomes.len(), "block removed");
        Some(removed.kind())
    }

    /// Runs one detection pass from `at` with its block's rules.
    pub fn recalculate(&mut self, at: Coord) -> Outcome {
        let Some(rules) = self
            .grid
            .cell_at(at)
            .and_then(|block| self.catalog.rules_for_block(block.kind()))
        else {
            return Outcome::Unclaimed;
        };
        Calculator::new(rules).calculate(&mut self.grid, &mut self.registry, at)
    }

    /// Tears down the structure containing `at`.
    ///
    /// Returns `false` if the block was unassigned (or the view is not
    /// authoritative).
    pub fn disconnect(&mut self, at: Coord) -> bool {
        if !self.grid.is_authoritative() {
            return false;
        }
        let Some(rules) = self
            .grid
            .cell_at(at)
            .and_then(|block| self.catalog.rules_for_block(block.kind()))
        else {
            return false;
        };
        Calculator::new(rules).disconnect(&mut self.grid, &mut self.registry, at)
    }

    /// The live cluster the block at `at` belongs to.
    #[must_use]
    pub fn cluster_at(&self, at: Coord) -> Option<ClusterId> {
        self.grid
            .cell_at(at)
            .and_then(StructureHost::cluster)
            .filter(|&id| self.registry.is_live(id))
    }

    /// Looks up a live cluster.
    #[inline]
    #[must_use]
    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.registry.get(id)
    }

    /// Iterates live clusters.
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterId, &Cluster)> {
        self.registry.iter()
    }

    /// The block at `at`.
    #[inline]
    #[must_use]
    pub fn block(&self, at: Coord) -> Option<&MachineBlock> {
        self.grid.cell_at(at)
    }

    /// The underlying grid.
    #[inline]
    #[must_use]
    pub fn grid(&self) -> &SparseGrid<MachineBlock> {
        &self.grid
    }

    /// The cluster registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ClusterRegistry {
        &self.registry
    }

    /// The structure rules in use.
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &StructureCatalog {
        &self.catalog
    }

    /// Retires every live cluster at `at` or its neighbours for which one
    /// of the `changed` kinds at `at` is a candidate, returning the released
    /// members.
    fn retire_around(&mut self, at: Coord, changed: impl IntoIterator<Item = BlockKind>) -> Vec<Coord> {
        let changed: Vec<MachineBlock> = changed.into_iter().map(MachineBlock::new).collect();

        let mut touched: Vec<ClusterId> = Vec::new();
        for cell in std::iter::once(at).chain(at.neighbors()) {
            if let Some(id) = self.cluster_at(cell) {
                if !touched.contains(&id) {
                    touched.push(id);
                }
            }
        }

        let mut released = Vec::new();
        for id in touched {
            let Some(rules) = self
                .registry
                .get(id)
                .and_then(|cluster| self.catalog.rules(cluster.kind()))
            else {
                continue;
            };
            if !changed.iter().any(|block| rules.is_candidate(block)) {
                continue;
            }
            if let Some(cluster) = release_cluster(rules, &mut self.grid, &mut self.registry, id) {
                released.extend_from_slice(cluster.members());
            }
        }
        released
    }

    fn occupied_neighbors(&self, at: Coord) -> impl Iterator<Item = Coord> + '_ {
        at.neighbors().filter(move |&cell| self.grid.contains(cell))
    }

    /// Runs a pass from each distinct seed not already in a live cluster.
    ///
    /// Cells displaced by a new cluster are seeded again, once each.
    fn settle(&mut self, seeds: Vec<Coord>) -> Vec<(Coord, Outcome)> {
        let mut seen = HashSet::with_capacity(seeds.len());
        let mut requeued = HashSet::new();
        let mut pending = VecDeque::from(seeds);
        let mut outcomes = Vec::new();
        while let Some(seed) = pending.pop_front() {
            if !seen.insert(seed) || !self.grid.contains(seed) || self.cluster_at(seed).is_some() {
                continue;
            }
            let outcome = self.recalculate(seed);
            if let Outcome::Formed { displaced, .. } = &outcome {
                for &at in displaced {
                    if requeued.insert(at) {
                        seen.remove(&at);
                        pending.push_back(at);
                    }
                }
            }
            outcomes.push((seed, outcome));
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::storage;
    use monolith_core::Bounds;

    fn build_complex(world: &mut MultiblockWorld, max: Coord) {
        for at in Bounds::new(Coord::ORIGIN, max).cells() {
            let kind = if at == Coord::ORIGIN {
                BlockKind::CraftingStorage { bytes: storage::TIER_1K }
            } else {
                BlockKind::CraftingUnit
            };
            world.place(at, kind);
        }
    }

    #[test]
    fn test_complex_forms_as_blocks_arrive() {
        let mut world = MultiblockWorld::default();
        build_complex(&mut world, Coord::new(1, 1, 1));

        let id = world.cluster_at(Coord::ORIGIN).unwrap();
        let cluster = world.cluster(id).unwrap();
        assert_eq!(cluster.bounds(), Bounds::new(Coord::ORIGIN, Coord::new(1, 1, 1)));
        assert_eq!(cluster.members().len(), 8);
        assert_eq!(world.registry().len(), 1);
        assert!(world.block(Coord::new(1, 1, 1)).unwrap().is_formed());
    }

    #[test]
    fn test_replica_never_forms() {
        let mut world = MultiblockWorld::replica(&StructureConfig::default());
        let outcomes = world.place(Coord::ORIGIN, BlockKind::CraftingStorage { bytes: 1 });

        assert_eq!(outcomes, vec![(Coord::ORIGIN, Outcome::Skipped)]);
        assert!(world.registry().is_empty());
        assert!(!world.disconnect(Coord::ORIGIN));
    }

    #[test]
    fn test_inert_block_is_unclaimed() {
        let mut world = MultiblockWorld::default();
        world.place(Coord::ORIGIN, BlockKind::Inert);
        assert_eq!(world.recalculate(Coord::ORIGIN), Outcome::Unclaimed);
        assert_eq!(world.recalculate(Coord::new(5, 5, 5)), Outcome::Unclaimed);
    }

    #[test]
    fn test_unrelated_block_keeps_neighbour_cluster() {
        let mut world = MultiblockWorld::default();
        build_complex(&mut world, Coord::new(1, 1, 1));
        let id = world.cluster_at(Coord::ORIGIN).unwrap();
        let published = world.registry().stats().published;

        world.place(Coord::new(2, 0, 0), BlockKind::Inert);
        world.place(Coord::new(0, 2, 0), BlockKind::SpatialPylon);
        world.remove(Coord::new(2, 0, 0));
        world.place(Coord::new(-1, 0, 0), BlockKind::QuantumRing);

        assert_eq!(world.cluster_at(Coord::new(1, 1, 1)), Some(id));
        assert_eq!(world.registry().stats().retired, 0);
        // Only the lone pylon segment formed since.
        assert_eq!(world.registry().stats().published, published + 1);
    }

    #[test]
    fn test_replacing_a_member_with_a_foreign_block_dissolves() {
        let mut world = MultiblockWorld::default();
        build_complex(&mut world, Coord::new(1, 1, 1));
        let id = world.cluster_at(Coord::ORIGIN).unwrap();

        world.place(Coord::new(1, 1, 1), BlockKind::Inert);
        assert!(!world.registry().is_live(id));
        assert!(world.registry().is_empty());
        assert!(!world.block(Coord::ORIGIN).unwrap().is_formed());
    }

    #[test]
    fn test_block_at_the_edge_of_the_range() {
        let mut world = MultiblockWorld::default();
        let edge = Coord::new(i32::MAX, 0, i32::MIN);
        world.place(edge, BlockKind::SpatialPylon);
        world.place(Coord::new(i32::MAX, 1, i32::MIN), BlockKind::SpatialPylon);

        let id = world.cluster_at(edge).unwrap();
        assert_eq!(world.cluster(id).unwrap().status().capacity, 2);
        assert_eq!(world.remove(edge), Some(BlockKind::SpatialPylon));
        assert_eq!(world.registry().len(), 1);
    }

    #[test]
    fn test_shared_world_readers() {
        let mut world = MultiblockWorld::default();
        build_complex(&mut world, Coord::new(0, 0, 2));
        let shared = world.into_shared();

        let reader = Arc::clone(&shared);
        let live = std::thread::spawn(move || reader.read().clusters().count())
            .join()
            .unwrap();
        assert_eq!(live, 1);

        shared.write().remove(Coord::new(0, 0, 1));
        assert_eq!(shared.read().registry().len(), 1);
    }
}
