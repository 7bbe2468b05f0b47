//! # Multiblock Calculator
//!
//! **Detection pass with transactional rollback.**
//!
//! ## The Pass
//!
//! ```text
//! Unvalidated -> Grown -> ScaleChecked -> Isolated -> ClusterBound
//!     -> InternallyValidated -> Done
//!
//! any stage ──failure──> Disconnected (host and members unassigned)
//! ```
//!
//! A pass either commits (cluster published or reused, status recomputed)
//! or disconnects. A tentative cluster is only published after internal
//! validation succeeds, so a failed pass never leaves a registered cluster
//! behind.
//!
//! ## Authority
//!
//! On a non-authoritative view the pass is a no-op and returns
//! [`Outcome::Skipped`] without disconnecting anything.

use monolith_core::{Bounds, Coord, Grid};

use crate::cluster::{Cluster, ClusterId};
use crate::error::Rejection;
use crate::registry::ClusterRegistry;
use crate::rules::{candidate_at, StructureHost, StructureRules};
use crate::search;

/// Stages of a detection pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Nothing checked yet.
    Unvalidated,
    /// Bounding volume computed.
    Grown,
    /// Volume dimensions accepted.
    ScaleChecked,
    /// No candidate in the surrounding shell.
    Isolated,
    /// Existing cluster reused or tentative cluster built.
    ClusterBound,
    /// Interior arrangement accepted.
    InternallyValidated,
    /// Committed (terminal).
    Done,
    /// Rolled back (terminal).
    Disconnected,
}

/// Report of one detection pass.
///
/// Purely informational: rejections are already handled by the time the
/// caller sees this value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Non-authoritative view; nothing was examined or changed.
    Skipped,

    /// No structure type claims the seed cell.
    Unclaimed,

    /// The structure is assembled.
    Formed {
        /// The live cluster.
        cluster: ClusterId,
        /// `true` if the cluster was created by this pass, `false` if reused.
        created: bool,
        /// Cells left unassigned because a cluster they belonged to was
        /// replaced or absorbed by this one. They lie outside the new
        /// volume; run a pass from each to re-detect them.
        displaced: Vec<Coord>,
    },

    /// The structure was disconnected.
    Disconnected {
        /// Last stage reached before the failure.
        stage: Stage,
        /// The grown volume, if growth ran.
        bounds: Option<Bounds>,
        /// Why the pass failed.
        reason: Rejection,
    },
}

impl Outcome {
    /// The live cluster, if the structure formed.
    #[must_use]
    pub const fn cluster(&self) -> Option<ClusterId> {
        match self {
            Self::Formed { cluster, .. } => Some(*cluster),
            _ => None,
        }
    }

    /// Whether the structure formed.
    #[must_use]
    pub const fn is_formed(&self) -> bool {
        matches!(self, Self::Formed { .. })
    }

    /// The terminal stage, or `None` if the pass never ran.
    #[must_use]
    pub const fn terminal_stage(&self) -> Option<Stage> {
        match self {
            Self::Formed { .. } => Some(Stage::Done),
            Self::Disconnected { .. } => Some(Stage::Disconnected),
            Self::Skipped | Self::Unclaimed => None,
        }
    }
}

/// A committed pass.
struct Commit {
    cluster: ClusterId,
    created: bool,
    displaced: Vec<Coord>,
}

/// A failed pass, before rollback.
struct Failure {
    stage: Stage,
    bounds: Option<Bounds>,
    reason: Rejection,
}

/// How the pass obtained its cluster.
enum Binding {
    /// The seed's live cluster matches the grown volume.
    Reused(ClusterId),
    /// A fresh cluster, not yet published.
    Tentative(Cluster),
}

/// Runs detection passes for one structure type.
///
/// # Example
///
/// ```rust,ignore
/// let calculator = Calculator::new(&rules);
/// match calculator.calculate(&mut grid, &mut registry, seed) {
///     Outcome::Formed { cluster, displaced, .. } => { /* re-seed `displaced` */ }
///     _ => { /* seed is unassigned */ }
/// }
/// ```
pub struct Calculator<'r, C> {
    rules: &'r dyn StructureRules<C>,
}

impl<'r, C: StructureHost> Calculator<'r, C> {
    /// Creates a calculator driven by `rules`.
    #[must_use]
    pub fn new(rules: &'r dyn StructureRules<C>) -> Self {
        Self { rules }
    }

    /// Runs one detection pass from `seed`.
    ///
    /// Never fails: every rejection is rolled back through
    /// [`disconnect`](Self::disconnect) and reported in the [`Outcome`].
    pub fn calculate<G>(&self, grid: &mut G, registry: &mut ClusterRegistry, seed: Coord) -> Outcome
    where
        G: Grid<Cell = C>,
    {
        if !grid.is_authoritative() {
            tracing::trace!(%seed, "non-authoritative view, detection skipped");
            return Outcome::Skipped;
        }

        match self.run(grid, registry, seed) {
            Ok(Commit {
                cluster,
                created,
                displaced,
            }) => Outcome::Formed {
                cluster,
                created,
                displaced,
            },
            Err(Failure {
                stage,
                bounds,
                reason,
            }) => {
                tracing::debug!(
                    kind = %self.rules.kind(),
                    %seed,
                    ?stage,
                    %reason,
                    "structure rejected, disconnecting"
                );
                self.disconnect(grid, registry, seed);
                Outcome::Disconnected {
                    stage,
                    bounds,
                    reason,
                }
            }
        }
    }

    /// Tears down the structure anchored at `seed`.
    ///
    /// Retires the seed's cluster (if live), releases every member still
    /// pointing at it, and clears the seed's reference even when stale.
    /// Returns `false` if the seed was already unassigned.
    pub fn disconnect<G>(&self, grid: &mut G, registry: &mut ClusterRegistry, seed: Coord) -> bool
    where
        G: Grid<Cell = C>,
    {
        let Some(id) = grid.cell_at(seed).and_then(StructureHost::cluster) else {
            return false;
        };

        release_cluster(self.rules, grid, registry, id);
        if let Some(host) = grid.cell_at_mut(seed) {
            if host.cluster().is_some() {
                self.rules.release_member(host);
                host.assign(None);
            }
        }
        true
    }

    fn run<G>(
        &self,
        grid: &mut G,
        registry: &mut ClusterRegistry,
        seed: Coord,
    ) -> Result<Commit, Failure>
    where
        G: Grid<Cell = C>,
    {
        let rules = self.rules;

        if !candidate_at(rules, &*grid, seed) {
            return Err(Failure {
                stage: Stage::Unvalidated,
                bounds: None,
                reason: Rejection::NotACandidate { at: seed },
            });
        }

        let bounds = search::grow(seed, |cell| candidate_at(rules, &*grid, cell));
        self.enter(seed, Stage::Grown);

        if !rules.check_scale(bounds) {
            return Err(Failure {
                stage: Stage::Grown,
                bounds: Some(bounds),
                reason: Rejection::ScaleRejected {
                    extent: bounds.extent(),
                },
            });
        }
        self.enter(seed, Stage::ScaleChecked);

        if let Some((face, at)) =
            search::find_shell_candidate(bounds, |cell| candidate_at(rules, &*grid, cell))
        {
            return Err(Failure {
                stage: Stage::ScaleChecked,
                bounds: Some(bounds),
                reason: Rejection::NotIsolated { face, at },
            });
        }
        self.enter(seed, Stage::Isolated);

        let mut displaced = Vec::new();
        let binding = self.bind(grid, registry, seed, bounds, &mut displaced);
        self.enter(seed, Stage::ClusterBound);

        match rules.verify_internal_structure(&*grid, bounds) {
            Ok(true) => {}
            Ok(false) => {
                return Err(Failure {
                    stage: Stage::ClusterBound,
                    bounds: Some(bounds),
                    reason: Rejection::InternalStructureInvalid { fault: None },
                });
            }
            Err(fault) => {
                tracing::debug!(kind = %rules.kind(), %bounds, %fault, "internal structure validation faulted");
                return Err(Failure {
                    stage: Stage::ClusterBound,
                    bounds: Some(bounds),
                    reason: Rejection::InternalStructureInvalid { fault: Some(fault) },
                });
            }
        }
        self.enter(seed, Stage::InternallyValidated);

        let (id, topology_changed) = match binding {
            Binding::Reused(id) => (id, false),
            Binding::Tentative(cluster) => {
                let id = registry.publish(cluster);
                self.configure_members(grid, registry, id, bounds, &mut displaced);
                (id, true)
            }
        };

        if let Some(cluster) = registry.get(id) {
            let status = rules.compute_status(&*grid, cluster);
            registry.update_status(id, status, topology_changed);
        }
        self.enter(seed, Stage::Done);

        Ok(Commit {
            cluster: id,
            created: topology_changed,
            displaced,
        })
    }

    /// Reuses the seed's cluster if it still describes `bounds`, otherwise
    /// builds a tentative one.
    ///
    /// A replaced cluster's members outside `bounds` go to `displaced`.
    fn bind<G>(
        &self,
        grid: &mut G,
        registry: &mut ClusterRegistry,
        seed: Coord,
        bounds: Bounds,
        displaced: &mut Vec<Coord>,
    ) -> Binding
    where
        G: Grid<Cell = C>,
    {
        let Some(id) = grid.cell_at(seed).and_then(StructureHost::cluster) else {
            return Binding::Tentative(self.rules.create_cluster(bounds));
        };

        let matches = registry
            .get(id)
            .is_some_and(|cluster| cluster.kind() == self.rules.kind() && cluster.bounds() == bounds);
        if matches {
            return Binding::Reused(id);
        }

        if registry.is_live(id) {
            tracing::debug!(%id, %bounds, "cluster no longer matches its volume, replacing");
            if let Some(old) = release_cluster(self.rules, grid, registry, id) {
                displaced.extend(outside(&old, bounds));
            }
        }
        Binding::Tentative(self.rules.create_cluster(bounds))
    }

    /// Binds every candidate cell in `bounds` to the freshly published `id`.
    ///
    /// Any other live cluster still claiming a candidate cell in `bounds`
    /// is retired whole; its members outside `bounds` go to `displaced`.
    fn configure_members<G>(
        &self,
        grid: &mut G,
        registry: &mut ClusterRegistry,
        id: ClusterId,
        bounds: Bounds,
        displaced: &mut Vec<Coord>,
    ) where
        G: Grid<Cell = C>,
    {
        // Clusters still claiming cells in this volume lost those cells.
        let mut overlapped: Vec<ClusterId> = Vec::new();
        for at in bounds.cells() {
            let Some(other) = grid
                .cell_at(at)
                .filter(|cell| self.rules.is_candidate(cell))
                .and_then(StructureHost::cluster)
            else {
                continue;
            };
            if other != id && registry.is_live(other) && !overlapped.contains(&other) {
                overlapped.push(other);
            }
        }
        for other in overlapped {
            tracing::debug!(%other, into = %id, "retiring overlapped cluster");
            if let Some(old) = release_cluster(self.rules, grid, registry, other) {
                displaced.extend(outside(&old, bounds));
            }
        }

        let mut members = Vec::new();
        for at in bounds.cells() {
            let Some(cell) = grid.cell_at_mut(at) else {
                continue;
            };
            if !self.rules.is_candidate(cell) {
                continue;
            }
            self.rules.configure_member(cell, id, bounds, at);
            cell.assign(Some(id));
            members.push(at);
        }

        if let Some(cluster) = registry.get_mut(id) {
            cluster.set_members(members);
        }
    }

    fn enter(&self, seed: Coord, stage: Stage) {
        tracing::trace!(kind = %self.rules.kind(), %seed, ?stage, "detection stage");
    }
}

/// Members of `cluster` that lie outside `bounds`.
fn outside(cluster: &Cluster, bounds: Bounds) -> impl Iterator<Item = Coord> + '_ {
    cluster
        .members()
        .iter()
        .copied()
        .filter(move |&at| !bounds.contains(at))
}

/// Retires cluster `id` and releases every member still pointing at it.
///
/// Returns the retired cluster, or `None` if `id` was already stale.
/// Released members are left unassigned; nothing re-detects them unless
/// the caller runs a pass from each.
pub fn release_cluster<C, G>(
    rules: &dyn StructureRules<C>,
    grid: &mut G,
    registry: &mut ClusterRegistry,
    id: ClusterId,
) -> Option<Cluster>
where
    C: StructureHost,
    G: Grid<Cell = C> + ?Sized,
{
    let cluster = registry.retire(id)?;
    for &at in cluster.members() {
        if let Some(cell) = grid.cell_at_mut(at) {
            if cell.cluster() == Some(id) {
                rules.release_member(cell);
                cell.assign(None);
            }
        }
    }
    Some(cluster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::{ClusterStatus, StructureKind};
    use crate::error::ShapeFault;
    use monolith_core::{Extent, SparseGrid};

    #[derive(Debug, Default)]
    struct Cell {
        member: bool,
        cluster: Option<ClusterId>,
    }

    impl StructureHost for Cell {
        fn cluster(&self) -> Option<ClusterId> {
            self.cluster
        }

        fn assign(&mut self, cluster: Option<ClusterId>) {
            self.cluster = cluster;
        }
    }

    /// Accepts any solid cuboid; optionally faults during validation.
    struct Solid {
        fault: bool,
    }

    impl StructureRules<Cell> for Solid {
        fn kind(&self) -> StructureKind {
            StructureKind::new("solid")
        }

        fn is_candidate(&self, cell: &Cell) -> bool {
            cell.member
        }

        fn check_scale(&self, bounds: Bounds) -> bool {
            bounds.extent().within(Extent::UNIT, Extent::new(8, 8, 8))
        }

        fn verify_internal_structure(
            &self,
            grid: &dyn Grid<Cell = Cell>,
            bounds: Bounds,
        ) -> Result<bool, ShapeFault> {
            if self.fault {
                return Err(ShapeFault::Other("validator exploded".to_string()));
            }
            Ok(bounds.cells().all(|c| candidate_at(self, grid, c)))
        }

        fn compute_status(&self, _grid: &dyn Grid<Cell = Cell>, cluster: &Cluster) -> ClusterStatus {
            ClusterStatus {
                active: true,
                capacity: cluster.members().len() as u64,
            }
        }
    }

    fn fill(grid: &mut SparseGrid<Cell>, min: Coord, max: Coord) {
        for at in Bounds::new(min, max).cells() {
            grid.insert(at, Cell { member: true, cluster: None });
        }
    }

    #[test]
    fn test_forms_and_binds_members() {
        let rules = Solid { fault: false };
        let mut grid = SparseGrid::new();
        let mut registry = ClusterRegistry::new();
        fill(&mut grid, Coord::ORIGIN, Coord::new(1, 1, 1));

        let outcome = Calculator::new(&rules).calculate(&mut grid, &mut registry, Coord::ORIGIN);
        let id = outcome.cluster().unwrap();
        assert_eq!(
            outcome,
            Outcome::Formed {
                cluster: id,
                created: true,
                displaced: Vec::new(),
            }
        );
        assert!(grid.iter().all(|(_, cell)| cell.cluster == Some(id)));

        let cluster = registry.get(id).unwrap();
        assert_eq!(cluster.members().len(), 8);
        assert_eq!(cluster.status().capacity, 8);
    }

    #[test]
    fn test_replica_is_skipped_without_disconnect() {
        let rules = Solid { fault: false };
        let mut grid = SparseGrid::replica();
        let mut registry = ClusterRegistry::new();
        let stale = ClusterId::new(0, 7);
        grid.insert(Coord::ORIGIN, Cell { member: true, cluster: Some(stale) });

        let outcome = Calculator::new(&rules).calculate(&mut grid, &mut registry, Coord::ORIGIN);
        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(outcome.terminal_stage(), None);
        // Untouched: the replica mirrors whatever the authority says.
        assert_eq!(grid.cell_at(Coord::ORIGIN).unwrap().cluster, Some(stale));
    }

    #[test]
    fn test_non_candidate_seed_is_rejected() {
        let rules = Solid { fault: false };
        let mut grid = SparseGrid::new();
        let mut registry = ClusterRegistry::new();
        grid.insert(Coord::ORIGIN, Cell::default());

        let outcome = Calculator::new(&rules).calculate(&mut grid, &mut registry, Coord::ORIGIN);
        assert!(matches!(
            outcome,
            Outcome::Disconnected {
                stage: Stage::Unvalidated,
                bounds: None,
                reason: Rejection::NotACandidate { .. },
            }
        ));

        let empty = Calculator::new(&rules).calculate(&mut grid, &mut registry, Coord::new(9, 9, 9));
        assert_eq!(empty.terminal_stage(), Some(Stage::Disconnected));
    }

    #[test]
    fn test_validator_fault_is_contained() {
        let rules = Solid { fault: true };
        let mut grid = SparseGrid::new();
        let mut registry = ClusterRegistry::new();
        fill(&mut grid, Coord::ORIGIN, Coord::new(1, 0, 0));

        let outcome = Calculator::new(&rules).calculate(&mut grid, &mut registry, Coord::ORIGIN);
        match outcome {
            Outcome::Disconnected {
                stage: Stage::ClusterBound,
                reason: Rejection::InternalStructureInvalid { fault: Some(fault) },
                ..
            } => assert_eq!(fault, ShapeFault::Other("validator exploded".to_string())),
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(registry.is_empty());
        assert_eq!(registry.stats().published, 0);
    }

    #[test]
    fn test_stale_reference_is_cleared_on_failure() {
        let rules = Solid { fault: false };
        let mut grid = SparseGrid::new();
        let mut registry = ClusterRegistry::new();
        let stale = ClusterId::new(3, 1);
        // 9 cells long: fails the 8-cell scale limit.
        for x in 0..9 {
            grid.insert(Coord::new(x, 0, 0), Cell { member: true, cluster: None });
        }
        grid.cell_at_mut(Coord::ORIGIN).unwrap().cluster = Some(stale);

        let outcome = Calculator::new(&rules).calculate(&mut grid, &mut registry, Coord::ORIGIN);
        assert_eq!(outcome.terminal_stage(), Some(Stage::Disconnected));
        assert_eq!(grid.cell_at(Coord::ORIGIN).unwrap().cluster, None);
    }

    #[test]
    fn test_disconnect_is_idempotent() {
        let rules = Solid { fault: false };
        let mut grid = SparseGrid::new();
        let mut registry = ClusterRegistry::new();
        fill(&mut grid, Coord::ORIGIN, Coord::new(2, 0, 0));

        let calculator = Calculator::new(&rules);
        let id = calculator
            .calculate(&mut grid, &mut registry, Coord::ORIGIN)
            .cluster()
            .unwrap();

        assert!(calculator.disconnect(&mut grid, &mut registry, Coord::new(1, 0, 0)));
        assert!(!registry.is_live(id));
        assert!(grid.iter().all(|(_, cell)| cell.cluster.is_none()));

        assert!(!calculator.disconnect(&mut grid, &mut registry, Coord::new(1, 0, 0)));
        assert_eq!(registry.stats().retired, 1);
    }

    #[test]
    fn test_grown_volume_replaces_mismatched_cluster() {
        let rules = Solid { fault: false };
        let mut grid = SparseGrid::new();
        let mut registry = ClusterRegistry::new();
        fill(&mut grid, Coord::ORIGIN, Coord::new(1, 0, 0));

        let calculator = Calculator::new(&rules);
        let first = calculator
            .calculate(&mut grid, &mut registry, Coord::ORIGIN)
            .cluster()
            .unwrap();

        // The structure grows without the old cluster being torn down.
        grid.insert(Coord::new(2, 0, 0), Cell { member: true, cluster: None });
        let outcome = calculator.calculate(&mut grid, &mut registry, Coord::ORIGIN);
        let second = outcome.cluster().unwrap();

        assert!(matches!(outcome, Outcome::Formed { created: true, .. }));
        assert_ne!(first, second);
        assert!(!registry.is_live(first));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(second).unwrap().members().len(), 3);
    }

    #[test]
    fn test_overlapped_cluster_is_absorbed() {
        let rules = Solid { fault: false };
        let mut grid = SparseGrid::new();
        let mut registry = ClusterRegistry::new();
        fill(&mut grid, Coord::ORIGIN, Coord::new(1, 0, 0));

        let calculator = Calculator::new(&rules);
        let old = calculator
            .calculate(&mut grid, &mut registry, Coord::ORIGIN)
            .cluster()
            .unwrap();

        // Seeded from a new, unassigned cell: the old cluster is not the
        // seed's, but its members fall inside the new volume.
        grid.insert(Coord::new(2, 0, 0), Cell { member: true, cluster: None });
        let new = calculator
            .calculate(&mut grid, &mut registry, Coord::new(2, 0, 0))
            .cluster()
            .unwrap();

        assert!(!registry.is_live(old));
        assert_eq!(registry.len(), 1);
        assert!(grid.iter().all(|(_, cell)| cell.cluster == Some(new)));
    }

    #[test]
    fn test_absorbed_cluster_reports_cells_outside_the_volume() {
        let rules = Solid { fault: false };
        let mut grid = SparseGrid::new();
        let mut registry = ClusterRegistry::new();
        fill(&mut grid, Coord::ORIGIN, Coord::new(2, 0, 0));

        let calculator = Calculator::new(&rules);
        let old = calculator
            .calculate(&mut grid, &mut registry, Coord::ORIGIN)
            .cluster()
            .unwrap();

        // (2, 0, 0) stops being a member without a pass noticing; the old
        // cluster still lists it.
        grid.cell_at_mut(Coord::new(2, 0, 0)).unwrap().member = false;
        grid.insert(Coord::new(0, 1, 0), Cell { member: true, cluster: None });
        grid.insert(Coord::new(1, 1, 0), Cell { member: true, cluster: None });

        let outcome = calculator.calculate(&mut grid, &mut registry, Coord::new(0, 1, 0));
        let Outcome::Formed {
            cluster: new,
            created: true,
            displaced,
        } = &outcome
        else {
            panic!("expected a new structure, got {outcome:?}");
        };

        assert!(!registry.is_live(old));
        assert_eq!(registry.get(*new).unwrap().members().len(), 4);
        assert_eq!(displaced, &[Coord::new(2, 0, 0)]);
        assert_eq!(grid.cell_at(Coord::new(2, 0, 0)).unwrap().cluster, None);
    }
}
