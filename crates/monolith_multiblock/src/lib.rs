//! # MONOLITH Multiblock
//!
//! Detection and lifecycle of composite structures built from many grid
//! cells.
//!
//! ## Design Principles
//!
//! 1. **One pass, one answer** - a detection pass either commits or rolls back
//! 2. **Rules are injected** - structure types plug in through `StructureRules`
//! 3. **Handles, not owners** - cells point at clusters by `ClusterId`
//! 4. **External configuration** - scale limits live in TOML files
//!
//! ## Detection Pass
//!
//! ```text
//! seed ──> grow ──> check scale ──> isolation ──> bind cluster
//!                                                     │
//!                 disconnect <──fail── internal check ┘
//!                                           │
//!                                    publish + configure members
//!                                           │
//!                                    recompute status
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use monolith_multiblock::{BlockKind, MultiblockWorld, StructureConfig};
//!
//! let config = StructureConfig::load("data/schemas/multiblock/structures.toml")?;
//! let mut world = MultiblockWorld::new(&config);
//! let events = world.subscribe(1024);
//!
//! world.place(Coord::new(0, 0, 0), BlockKind::CraftingStorage { bytes: 1024 });
//! for event in events.drain() {
//!     // ...
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod calculator;
pub mod cluster;
pub mod config;
pub mod error;
pub mod events;
pub mod registry;
pub mod rules;
pub mod search;
pub mod structures;
pub mod world;

pub use block::{BlockKind, MachineBlock};
pub use calculator::{release_cluster, Calculator, Outcome, Stage};
pub use cluster::{Cluster, ClusterId, ClusterStatus, StructureKind};
pub use config::{ScaleRule, StructureConfig};
pub use error::{ConfigError, ConfigResult, Rejection, ShapeFault};
pub use events::{ClusterBus, ClusterEvent, ClusterEventReceiver, ClusterEventSender};
pub use registry::{ClusterRegistry, RegistryStats};
pub use rules::{candidate_at, StructureHost, StructureRules};
pub use structures::{CraftingComplex, QuantumBridge, SpatialPylon, StructureCatalog};
pub use world::{MultiblockWorld, SharedWorld};
