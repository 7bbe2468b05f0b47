//! # Multiblock Error Types
//!
//! Detection rejections are contained inside a pass and reported through
//! [`Outcome`](crate::Outcome); only configuration loading returns `Err`.

use monolith_core::{Coord, Direction, Extent};
use thiserror::Error;

/// Unexpected fault raised while validating a structure's interior.
///
/// A fault is treated exactly like a failed validation: the structure is
/// disconnected and the fault is logged, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeFault {
    /// A cell inside the volume disappeared between growth and validation.
    #[error("cell at {0} vanished during validation")]
    MissingCell(Coord),

    /// Summing member capacities overflowed.
    #[error("capacity overflow at {0}")]
    CapacityOverflow(Coord),

    /// Any other validator-specific fault.
    #[error("{0}")]
    Other(String),
}

/// Why a detection pass ended in disconnect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The seed cell is empty or not a member of this structure type.
    #[error("seed {at} is not a structure candidate")]
    NotACandidate {
        /// The seed coordinate.
        at: Coord,
    },

    /// The grown volume has inadmissible dimensions.
    #[error("volume {extent} rejected by scale rules")]
    ScaleRejected {
        /// Dimensions of the grown volume.
        extent: Extent,
    },

    /// A candidate cell sits just outside the grown volume.
    #[error("candidate at {at} beyond the {face:?} face")]
    NotIsolated {
        /// The face whose shell holds the candidate.
        face: Direction,
        /// The offending cell.
        at: Coord,
    },

    /// The interior arrangement violates the structure's shape contract.
    #[error("internal structure invalid{}", describe_fault(.fault))]
    InternalStructureInvalid {
        /// Set when validation faulted rather than simply returning `false`.
        fault: Option<ShapeFault>,
    },
}

fn describe_fault(fault: &Option<ShapeFault>) -> String {
    fault
        .as_ref()
        .map(|fault| format!(": {fault}"))
        .unwrap_or_default()
}

/// Errors that can occur while loading structure configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML for this schema.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but describes impossible rules.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_messages() {
        let scale = Rejection::ScaleRejected {
            extent: Extent::new(3, 3, 3),
        };
        assert_eq!(scale.to_string(), "volume 3x3x3 rejected by scale rules");

        let plain = Rejection::InternalStructureInvalid { fault: None };
        assert_eq!(plain.to_string(), "internal structure invalid");

        let faulted = Rejection::InternalStructureInvalid {
            fault: Some(ShapeFault::MissingCell(Coord::new(1, 2, 3))),
        };
        assert_eq!(
            faulted.to_string(),
            "internal structure invalid: cell at (1, 2, 3) vanished during validation"
        );
    }
}
