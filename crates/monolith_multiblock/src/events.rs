//! # Cluster Event Bus
//!
//! Lock-free notification of cluster lifecycle changes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐      ┌─────────────┐      ┌──────────────────┐
//! │ ClusterRegistry  │─────>│   Event     │─────>│  Grid networks,  │
//! │ (authoritative)  │      │   Channel   │      │  renderers, ...  │
//! └──────────────────┘      └─────────────┘      └──────────────────┘
//! ```
//!
//! Events flow FROM the registry TO whoever tracks live clusters.
//! Consumers never touch the world directly.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use monolith_core::Bounds;

use crate::cluster::{ClusterId, ClusterStatus, StructureKind};

/// Lifecycle events published by the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClusterEvent {
    /// A new cluster was published.
    Registered {
        /// The new cluster.
        id: ClusterId,
        /// Structure type.
        kind: StructureKind,
        /// Volume occupied.
        bounds: Bounds,
    },

    /// A cluster's status was recomputed.
    StatusChanged {
        /// The cluster.
        id: ClusterId,
        /// The recomputed status.
        status: ClusterStatus,
        /// Whether the recompute followed a topology change.
        topology_changed: bool,
    },

    /// A cluster was torn down.
    Retired {
        /// The retired cluster (stale from now on).
        id: ClusterId,
        /// Structure type.
        kind: StructureKind,
        /// Volume it occupied.
        bounds: Bounds,
    },
}

/// Event bus for cluster notifications.
///
/// Pre-allocates a bounded channel so a stalled consumer cannot grow
/// memory without limit.
pub struct ClusterBus {
    /// Sender end - held by the registry.
    sender: Sender<ClusterEvent>,
    /// Receiver end - held by consumers.
    receiver: Receiver<ClusterEvent>,
}

impl ClusterBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> ClusterEventSender {
        ClusterEventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle (clones compete for events).
    #[must_use]
    pub fn receiver(&self) -> ClusterEventReceiver {
        ClusterEventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a new pair of sender and receiver.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (ClusterEventSender, ClusterEventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending cluster events.
#[derive(Clone, Debug)]
pub struct ClusterEventSender {
    sender: Sender<ClusterEvent>,
}

impl ClusterEventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the channel is full or every receiver is gone;
    /// the event is dropped in both cases.
    #[inline]
    pub fn send(&self, event: ClusterEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(?event, "cluster event channel full, dropping event");
                false
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving cluster events.
#[derive(Clone, Debug)]
pub struct ClusterEventReceiver {
    receiver: Receiver<ClusterEvent>,
}

impl ClusterEventReceiver {
    /// Receives all pending events (non-blocking).
    #[inline]
    pub fn drain(&self) -> Vec<ClusterEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    #[inline]
    pub fn try_recv(&self) -> Option<ClusterEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}
