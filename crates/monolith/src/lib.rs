//! # MONOLITH
//!
//! Multiblock structure detection, integrating all crates.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         MONOLITH                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  ┌─────────────────┐          ┌──────────────────────────┐  │
//! │  │ monolith_core   │─────────>│ monolith_multiblock      │  │
//! │  │                 │          │                          │  │
//! │  │  • Coord/Bounds │          │  • Growth + isolation    │  │
//! │  │  • Grid trait   │          │  • Detection passes      │  │
//! │  │  • SlotPool     │          │  • Cluster registry      │  │
//! │  └─────────────────┘          │  • Built-in structures   │  │
//! │                               └──────────────────────────┘  │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub use monolith_core as core;
pub use monolith_multiblock as multiblock;

pub use monolith_multiblock::{
    BlockKind, ClusterEvent, MultiblockWorld, Outcome, SharedWorld, StructureConfig,
};
