//! # Bounding Volumes
//!
//! Inclusive axis-aligned boxes of cells.
//!
//! ## Invariant
//!
//! `min.axis <= max.axis` holds on every axis for every [`Bounds`] value.
//! All constructors normalize their corners, and the only mutator
//! ([`Bounds::extend`]) moves a face outward, so the invariant cannot be
//! broken from outside this module.
//!
//! Nothing exists past the edge of the `i32` range: a box cannot grow
//! through it and has no face shell beyond it.

use serde::{Deserialize, Serialize};

use super::coord::{Axis, Coord, Direction};

/// Dimensions of a [`Bounds`], in cells. Every component is at least 1
/// for a real volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u32; 3]", into = "[u32; 3]")]
pub struct Extent {
    /// Cells along X.
    pub x: u32,
    /// Cells along Y.
    pub y: u32,
    /// Cells along Z.
    pub z: u32,
}

impl Extent {
    /// A single cell.
    pub const UNIT: Self = Self::new(1, 1, 1);

    /// Creates a new extent.
    #[inline]
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Components in X, Y, Z order.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [u32; 3] {
        [self.x, self.y, self.z]
    }

    /// Components sorted ascending, for orientation-free comparison.
    #[must_use]
    pub fn sorted(self) -> [u32; 3] {
        let mut dims = self.to_array();
        dims.sort_unstable();
        dims
    }

    /// Number of cells covered.
    #[inline]
    #[must_use]
    pub const fn volume(self) -> u64 {
        self.x as u64 * self.y as u64 * self.z as u64
    }

    /// Whether every component lies within `[lower, upper]`.
    #[must_use]
    pub const fn within(self, lower: Self, upper: Self) -> bool {
        self.x >= lower.x
            && self.x <= upper.x
            && self.y >= lower.y
            && self.y <= upper.y
            && self.z >= lower.z
            && self.z <= upper.z
    }

    /// Whether at least two components equal 1 (a straight line of cells).
    #[must_use]
    pub fn is_line(self) -> bool {
        self.to_array().iter().filter(|&&d| d == 1).count() >= 2
    }

    /// Whether any component is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.x == 0 || self.y == 0 || self.z == 0
    }
}

impl From<[u32; 3]> for Extent {
    fn from([x, y, z]: [u32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Extent> for [u32; 3] {
    fn from(extent: Extent) -> Self {
        extent.to_array()
    }
}

impl std::fmt::Display for Extent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// An inclusive axis-aligned box of cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Bounds {
    min: Coord,
    max: Coord,
}

impl Bounds {
    /// Creates a box spanning two opposite corners, in any order.
    #[inline]
    #[must_use]
    pub fn new(a: Coord, b: Coord) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A degenerate 1x1x1 box.
    #[inline]
    #[must_use]
    pub const fn single(cell: Coord) -> Self {
        Self { min: cell, max: cell }
    }

    /// The minimum corner.
    #[inline]
    #[must_use]
    pub const fn min(&self) -> Coord {
        self.min
    }

    /// The maximum corner.
    #[inline]
    #[must_use]
    pub const fn max(&self) -> Coord {
        self.max
    }

    /// Dimensions in cells.
    #[must_use]
    pub fn extent(&self) -> Extent {
        let span = |axis| {
            let cells = i64::from(self.max.get(axis)) - i64::from(self.min.get(axis)) + 1;
            u32::try_from(cells).unwrap_or(u32::MAX)
        };
        Extent::new(span(Axis::X), span(Axis::Y), span(Axis::Z))
    }

    /// Number of cells inside.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> u64 {
        self.extent().volume()
    }

    /// Whether the box is a single cell.
    #[inline]
    #[must_use]
    pub fn is_single_cell(&self) -> bool {
        self.min == self.max
    }

    /// Whether `cell` lies inside the box.
    #[must_use]
    pub fn contains(&self, cell: Coord) -> bool {
        Axis::ALL
            .iter()
            .all(|&axis| cell.get(axis) >= self.min.get(axis) && cell.get(axis) <= self.max.get(axis))
    }

    /// Grows the face on `direction`'s side by one cell.
    ///
    /// `Unknown` leaves the box unchanged. Returns `None` if the face
    /// already lies on the edge of the `i32` range.
    #[must_use]
    pub fn extend(self, direction: Direction) -> Option<Self> {
        if direction.is_positive() {
            Some(Self {
                min: self.min,
                max: self.max.offset(direction)?,
            })
        } else {
            Some(Self {
                min: self.min.offset(direction)?,
                max: self.max,
            })
        }
    }

    /// The one-cell-thick layer just outside the face on `direction`'s side.
    ///
    /// The layer spans the face's full extent on the other two axes.
    /// Returns `None` for `Unknown` and for a face on the edge of the
    /// `i32` range.
    #[must_use]
    pub fn face_shell(&self, direction: Direction) -> Option<Self> {
        let axis = direction.axis()?;
        let plane = if direction.is_positive() {
            self.max.get(axis).checked_add(1)?
        } else {
            self.min.get(axis).checked_sub(1)?
        };
        Some(Self {
            min: self.min.with(axis, plane),
            max: self.max.with(axis, plane),
        })
    }

    /// Iterates every cell, X outermost and Z innermost.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let (min, max) = (self.min, self.max);
        (min.x..=max.x).flat_map(move |x| {
            (min.y..=max.y).flat_map(move |y| (min.z..=max.z).map(move |z| Coord::new(x, y, z)))
        })
    }
}

impl std::fmt::Display for Bounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}
