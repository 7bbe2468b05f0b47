//! # MONOLITH Core
//!
//! Grid primitives shared by every structure-building system:
//! - Integer cell coordinates and axis directions
//! - Inclusive bounding volumes and their one-cell shells
//! - A sparse world grid with an authority flag
//! - Generational slot storage with copyable handles
//!
//! ## Architecture Rules
//!
//! 1. **Value types** - `Coord`, `Bounds` and `Extent` are `Copy` and immutable
//! 2. **Handles, not pointers** - shared objects live in a `SlotPool`
//! 3. **One authority** - only the authoritative grid may drive structural logic
//!
//! ## Example
//!
//! ```rust,ignore
//! use monolith_core::{Bounds, Coord, Direction};
//!
//! let b = Bounds::single(Coord::ORIGIN).extend(Direction::PosX)?;
//! assert_eq!(b.volume(), 2);
//!
//! // Nothing exists past the edge of the i32 range.
//! assert_eq!(Coord::new(i32::MAX, 0, 0).offset(Direction::PosX), None);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod grid;
pub mod memory;

pub use grid::{Axis, Bounds, Coord, Direction, Extent, Grid, SparseGrid};
pub use memory::{SlotId, SlotPool};
