//! # Clusters
//!
//! A cluster is the logical object behind one assembled structure. It is
//! owned by the [`ClusterRegistry`](crate::ClusterRegistry); member cells
//! refer to it through a copyable [`ClusterId`].

use monolith_core::{Bounds, Coord, SlotId};

/// Handle naming a registered cluster.
pub type ClusterId = SlotId;

/// Name of a structure type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StructureKind(&'static str);

impl StructureKind {
    /// Crafting complex: a solid cuboid of crafting units with storage.
    pub const CRAFTING_COMPLEX: Self = Self("crafting_complex");
    /// Quantum bridge: a 3x3x1 ring around a central link.
    pub const QUANTUM_BRIDGE: Self = Self("quantum_bridge");
    /// Spatial pylon: a straight line of pylon cells.
    pub const SPATIAL_PYLON: Self = Self("spatial_pylon");

    /// Creates a structure kind from a static name.
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// The kind's name.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for StructureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// Structure-specific operating state, recomputed after every successful
/// detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClusterStatus {
    /// Whether the structure is able to operate.
    pub active: bool,
    /// Structure-specific capacity figure (storage bytes, pylon length, ...).
    pub capacity: u64,
}

/// One validated structure instance.
#[derive(Clone, Debug)]
pub struct Cluster {
    kind: StructureKind,
    bounds: Bounds,
    /// Cells bound to this cluster, in volume iteration order.
    members: Vec<Coord>,
    status: ClusterStatus,
    /// Number of status recomputes so far.
    revision: u64,
    /// `topology_changed` flag of the most recent status recompute.
    last_topology_changed: Option<bool>,
}

impl Cluster {
    /// Creates an unregistered cluster over `bounds` with no members yet.
    #[must_use]
    pub const fn new(kind: StructureKind, bounds: Bounds) -> Self {
        Self {
            kind,
            bounds,
            members: Vec::new(),
            status: ClusterStatus {
                active: false,
                capacity: 0,
            },
            revision: 0,
            last_topology_changed: None,
        }
    }

    /// The structure type.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> StructureKind {
        self.kind
    }

    /// The volume this cluster occupies.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Member cells bound to this cluster.
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[Coord] {
        &self.members
    }

    /// Whether `cell` is a member.
    #[must_use]
    pub fn is_member(&self, cell: Coord) -> bool {
        self.bounds.contains(cell) && self.members.contains(&cell)
    }

    /// Current status.
    #[inline]
    #[must_use]
    pub const fn status(&self) -> ClusterStatus {
        self.status
    }

    /// Number of status recomputes applied.
    #[inline]
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether the latest status recompute followed a topology change.
    ///
    /// `None` until the first recompute.
    #[inline]
    #[must_use]
    pub const fn last_topology_changed(&self) -> Option<bool> {
        self.last_topology_changed
    }

    pub(crate) fn set_members(&mut self, members: Vec<Coord>) {
        self.members = members;
    }

    pub(crate) fn apply_status(&mut self, status: ClusterStatus, topology_changed: bool) {
        self.status = status;
        self.revision += 1;
        self.last_topology_changed = Some(topology_changed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_cluster_is_blank() {
        let bounds = Bounds::new(Coord::ORIGIN, Coord::new(2, 2, 2));
        let cluster = Cluster::new(StructureKind::CRAFTING_COMPLEX, bounds);
        assert_eq!(cluster.bounds(), bounds);
        assert!(cluster.members().is_empty());
        assert_eq!(cluster.revision(), 0);
        assert_eq!(cluster.last_topology_changed(), None);
        assert!(!cluster.status().active);
    }

    #[test]
    fn test_apply_status_counts_revisions() {
        let mut cluster = Cluster::new(
            StructureKind::SPATIAL_PYLON,
            Bounds::single(Coord::ORIGIN),
        );
        cluster.apply_status(ClusterStatus { active: true, capacity: 1 }, true);
        cluster.apply_status(ClusterStatus { active: true, capacity: 1 }, false);
        assert_eq!(cluster.revision(), 2);
        assert_eq!(cluster.last_topology_changed(), Some(false));
    }

    #[test]
    fn test_membership() {
        let mut cluster = Cluster::new(
            StructureKind::new("custom"),
            Bounds::new(Coord::ORIGIN, Coord::new(1, 0, 0)),
        );
        cluster.set_members(vec![Coord::ORIGIN]);
        assert!(cluster.is_member(Coord::ORIGIN));
        assert!(!cluster.is_member(Coord::new(1, 0, 0)));
        assert_eq!(cluster.kind().to_string(), "custom");
    }
}
