//! # Coordinates and Directions
//!
//! Integer cell coordinates and the six axis-aligned step directions.

use serde::{Deserialize, Serialize};

/// One of the three grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// East/west axis.
    X,
    /// Vertical axis.
    Y,
    /// North/south axis.
    Z,
}

impl Axis {
    /// All axes in component order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];
}

/// Axis-aligned step direction.
///
/// `Unknown` is a sentinel for invalid input. It has no delta and no
/// opposite; every operation treats it as "no direction".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// -X
    NegX,
    /// -Y
    NegY,
    /// -Z
    NegZ,
    /// +X
    PosX,
    /// +Y
    PosY,
    /// +Z
    PosZ,
    /// Invalid / unresolved direction.
    Unknown,
}

impl Direction {
    /// The six valid directions, negative faces first.
    ///
    /// This is also the order in which bounding-volume growth visits them.
    pub const ALL: [Self; 6] = [
        Self::NegX,
        Self::NegY,
        Self::NegZ,
        Self::PosX,
        Self::PosY,
        Self::PosZ,
    ];

    /// Unit step as `(dx, dy, dz)`. `Unknown` yields `(0, 0, 0)`.
    #[inline]
    #[must_use]
    pub const fn delta(self) -> (i32, i32, i32) {
        match self {
            Self::NegX => (-1, 0, 0),
            Self::NegY => (0, -1, 0),
            Self::NegZ => (0, 0, -1),
            Self::PosX => (1, 0, 0),
            Self::PosY => (0, 1, 0),
            Self::PosZ => (0, 0, 1),
            Self::Unknown => (0, 0, 0),
        }
    }

    /// The axis this direction moves along.
    #[inline]
    #[must_use]
    pub const fn axis(self) -> Option<Axis> {
        match self {
            Self::NegX | Self::PosX => Some(Axis::X),
            Self::NegY | Self::PosY => Some(Axis::Y),
            Self::NegZ | Self::PosZ => Some(Axis::Z),
            Self::Unknown => None,
        }
    }

    /// Whether this direction points toward increasing coordinates.
    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::PosX | Self::PosY | Self::PosZ)
    }

    /// The reversed direction.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::NegX => Self::PosX,
            Self::PosX => Self::NegX,
            Self::NegY => Self::PosY,
            Self::PosY => Self::NegY,
            Self::NegZ => Self::PosZ,
            Self::PosZ => Self::NegZ,
            Self::Unknown => Self::Unknown,
        }
    }
}

/// A cell coordinate in the world grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl Coord {
    /// The world origin.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Creates a new coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring coordinate one step along `direction`.
    ///
    /// Returns `None` past the edge of the `i32` range; there is no cell
    /// there.
    #[inline]
    #[must_use]
    pub fn offset(self, direction: Direction) -> Option<Self> {
        self.step(direction, 1)
    }

    /// The coordinate `distance` steps along `direction`, or `None` if it
    /// lies outside the `i32` range.
    #[must_use]
    pub fn step(self, direction: Direction, distance: i32) -> Option<Self> {
        let (dx, dy, dz) = direction.delta();
        let along = |component: i32, delta: i32| component.checked_add(delta.checked_mul(distance)?);
        Some(Self {
            x: along(self.x, dx)?,
            y: along(self.y, dy)?,
            z: along(self.z, dz)?,
        })
    }

    /// Component along `axis`.
    #[inline]
    #[must_use]
    pub const fn get(self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Returns a copy with the component along `axis` replaced.
    #[inline]
    #[must_use]
    pub const fn with(self, axis: Axis, value: i32) -> Self {
        match axis {
            Axis::X => Self { x: value, ..self },
            Axis::Y => Self { y: value, ..self },
            Axis::Z => Self { z: value, ..self },
        }
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// The face-adjacent neighbours, in [`Direction::ALL`] order.
    ///
    /// Six of them, fewer at the edge of the `i32` range.
    pub fn neighbors(self) -> impl Iterator<Item = Self> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.offset(direction))
    }
}

impl From<[i32; 3]> for Coord {
    fn from([x, y, z]: [i32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
