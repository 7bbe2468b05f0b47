//! # Memory Management
//!
//! Generational storage for long-lived objects that many cells refer to.
//!
//! ## Design Philosophy
//!
//! Objects referenced from many places are owned by exactly one pool.
//! Everyone else holds a copyable [`SlotId`]:
//! - No reference cycles
//! - No dangling pointers (stale handles simply fail to resolve)
//! - O(1) insert, lookup and removal

mod handle;
mod pool;

pub use handle::SlotId;
pub use pool::SlotPool;
