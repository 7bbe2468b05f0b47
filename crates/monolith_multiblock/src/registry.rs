//! # Cluster Registry
//!
//! Process-wide home of every live cluster. Publishing a cluster makes it
//! visible to the rest of the system; retiring it makes every outstanding
//! [`ClusterId`] stale.

use monolith_core::SlotPool;

use crate::cluster::{Cluster, ClusterId, ClusterStatus};
use crate::events::{ClusterEvent, ClusterEventSender};

/// Lifetime counters for a registry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Clusters currently live.
    pub live: usize,
    /// Clusters published since creation.
    pub published: u64,
    /// Clusters retired since creation.
    pub retired: u64,
}

/// Owner of all live clusters.
#[derive(Debug, Default)]
pub struct ClusterRegistry {
    clusters: SlotPool<Cluster>,
    /// Optional event sink, attached by whoever wants notifications.
    events: Option<ClusterEventSender>,
    published: u64,
    retired: u64,
}

impl ClusterRegistry {
    /// Creates an empty registry with no event sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry publishing to `events`.
    #[must_use]
    pub fn with_events(events: ClusterEventSender) -> Self {
        Self {
            events: Some(events),
            ..Self::default()
        }
    }

    /// Replaces the event sink.
    pub fn attach_events(&mut self, events: ClusterEventSender) {
        self.events = Some(events);
    }

    /// Registers `cluster`, returning its handle.
    pub fn publish(&mut self, cluster: Cluster) -> ClusterId {
        let kind = cluster.kind();
        let bounds = cluster.bounds();
        let id = self.clusters.insert(cluster);
        self.published += 1;

        tracing::debug!(%id, %kind, %bounds, "cluster published");
        self.emit(ClusterEvent::Registered { id, kind, bounds });
        id
    }

    /// Removes the cluster named by `id`.
    ///
    /// Returns `None` (and emits nothing) if the handle is stale.
    pub fn retire(&mut self, id: ClusterId) -> Option<Cluster> {
        let cluster = self.clusters.remove(id)?;
        self.retired += 1;

        tracing::debug!(%id, kind = %cluster.kind(), bounds = %cluster.bounds(), "cluster retired");
        self.emit(ClusterEvent::Retired {
            id,
            kind: cluster.kind(),
            bounds: cluster.bounds(),
        });
        Some(cluster)
    }

    /// Applies a recomputed status to a live cluster.
    ///
    /// Returns `false` if the handle is stale.
    pub fn update_status(&mut self, id: ClusterId, status: ClusterStatus, topology_changed: bool) -> bool {
        let Some(cluster) = self.clusters.get_mut(id) else {
            return false;
        };
        cluster.apply_status(status, topology_changed);

        tracing::trace!(%id, ?status, topology_changed, "cluster status recomputed");
        self.emit(ClusterEvent::StatusChanged {
            id,
            status,
            topology_changed,
        });
        true
    }

    /// Whether `id` names a live cluster.
    #[inline]
    #[must_use]
    pub fn is_live(&self, id: ClusterId) -> bool {
        self.clusters.contains(id)
    }

    /// Looks up a live cluster.
    #[inline]
    #[must_use]
    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    /// Looks up a live cluster mutably.
    #[inline]
    pub fn get_mut(&mut self, id: ClusterId) -> Option<&mut Cluster> {
        self.clusters.get_mut(id)
    }

    /// Iterates live clusters.
    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, &Cluster)> {
        self.clusters.iter()
    }

    /// Number of live clusters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Whether no cluster is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Lifetime counters.
    #[must_use]
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            live: self.clusters.len(),
            published: self.published,
            retired: self.retired,
        }
    }

    fn emit(&self, event: ClusterEvent) {
        if let Some(events) = &self.events {
            events.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::StructureKind;
    use crate::events::ClusterBus;
    use monolith_core::{Bounds, Coord};

    fn cluster() -> Cluster {
        Cluster::new(
            StructureKind::CRAFTING_COMPLEX,
            Bounds::new(Coord::ORIGIN, Coord::new(1, 1, 1)),
        )
    }

    #[test]
    fn test_publish_and_retire() {
        let mut registry = ClusterRegistry::new();
        let id = registry.publish(cluster());
        assert!(registry.is_live(id));
        assert_eq!(registry.len(), 1);

        let retired = registry.retire(id).unwrap();
        assert_eq!(retired.kind(), StructureKind::CRAFTING_COMPLEX);
        assert!(!registry.is_live(id));
        assert!(registry.retire(id).is_none());
        assert_eq!(
            registry.stats(),
            RegistryStats {
                live: 0,
                published: 1,
                retired: 1
            }
        );
    }

    #[test]
    fn test_events_follow_lifecycle() {
        let (sender, receiver) = ClusterBus::create_pair(16);
        let mut registry = ClusterRegistry::with_events(sender);

        let id = registry.publish(cluster());
        assert!(registry.update_status(id, ClusterStatus { active: true, capacity: 4 }, true));
        registry.retire(id);
        assert!(!registry.update_status(id, ClusterStatus::default(), false));

        let events = receiver.drain();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], ClusterEvent::Registered { id: e, .. } if e == id));
        assert!(matches!(
            events[1],
            ClusterEvent::StatusChanged { topology_changed: true, .. }
        ));
        assert!(matches!(events[2], ClusterEvent::Retired { id: e, .. } if e == id));
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut registry = ClusterRegistry::new();
        let first = registry.publish(cluster());
        registry.retire(first);
        let second = registry.publish(cluster());

        assert_eq!(first.index(), second.index());
        assert!(registry.get(first).is_none());
        assert!(registry.get(second).is_some());
    }
}
