//! # Bounding-Volume Search & Isolation
//!
//! ## Growth
//!
//! ```text
//!   seed ──> -X ──> -Y ──> -Z ──> +X ──> +Y ──> +Z
//!            (min corner)          (max corner)
//! ```
//!
//! Each direction is stepped once, in order, along the line through the
//! current extreme corner. This is not a flood fill: hollow or ragged
//! candidate regions produce an axis-aligned box that the isolation check
//! and the structure's internal validator then re-examine cell by cell.
//!
//! ## Isolation
//!
//! The one-cell shell around each of the six faces must hold no candidate.
//! A candidate there means the box under-counted the structure or touches a
//! second instance that must not be merged.

use monolith_core::{Bounds, Coord, Direction};

/// Grows a box from `seed` while the next cell is a candidate.
///
/// Never fails; the result always contains `seed`. Growth stops at the
/// edge of the `i32` range.
pub fn grow<F>(seed: Coord, mut candidate: F) -> Bounds
where
    F: FnMut(Coord) -> bool,
{
    let mut bounds = Bounds::single(seed);
    for direction in Direction::ALL {
        while let Some(grown) = bounds.extend(direction) {
            let corner = if direction.is_positive() {
                grown.max()
            } else {
                grown.min()
            };
            if !candidate(corner) {
                break;
            }
            bounds = grown;
        }
    }
    bounds
}

/// First candidate in the shell beyond `face`, if any.
///
/// `Direction::Unknown` has no shell and never finds anything.
pub fn shell_candidate<F>(bounds: Bounds, face: Direction, mut candidate: F) -> Option<Coord>
where
    F: FnMut(Coord) -> bool,
{
    bounds.face_shell(face)?.cells().find(|&cell| candidate(cell))
}

/// First candidate found in any of the six shells, with its face.
///
/// Scanning stops at the first hit.
pub fn find_shell_candidate<F>(bounds: Bounds, mut candidate: F) -> Option<(Direction, Coord)>
where
    F: FnMut(Coord) -> bool,
{
    Direction::ALL.into_iter().find_map(|face| {
        shell_candidate(bounds, face, &mut candidate).map(|cell| (face, cell))
    })
}

/// Whether no shell cell around `bounds` is a candidate.
pub fn verify_isolated<F>(bounds: Bounds, candidate: F) -> bool
where
    F: FnMut(Coord) -> bool,
{
    find_shell_candidate(bounds, candidate).is_none()
}
