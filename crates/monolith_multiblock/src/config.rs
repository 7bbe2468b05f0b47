//! # Structure Configuration
//!
//! Admissible dimensions for the built-in structure types, loaded from TOML.
//!
//! ```toml
//! [crafting]
//! min = [1, 1, 1]
//! max = [16, 16, 16]
//!
//! [quantum]
//! exact = [3, 3, 1]
//! orientation_free = true
//!
//! [pylon]
//! max = [1, 1, 32]
//! orientation_free = true
//! line = true
//! ```
//!
//! Missing tables fall back to the production defaults.

use std::path::Path;

use monolith_core::Extent;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Dimension rule for one structure type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaleRule {
    /// Smallest admissible extent.
    pub min: Extent,
    /// Largest admissible extent.
    pub max: Extent,
    /// If set, the only admissible extent.
    pub exact: Option<Extent>,
    /// Compare sorted dimensions, so any rotation of an extent is accepted.
    pub orientation_free: bool,
    /// Require a straight line of cells.
    pub line: bool,
}

impl Default for ScaleRule {
    fn default() -> Self {
        Self::between(Extent::UNIT, Extent::new(16, 16, 16))
    }
}

impl ScaleRule {
    /// Accepts every extent in `[min, max]`.
    #[must_use]
    pub const fn between(min: Extent, max: Extent) -> Self {
        Self {
            min,
            max,
            exact: None,
            orientation_free: false,
            line: false,
        }
    }

    /// Accepts exactly `extent`.
    #[must_use]
    pub const fn exactly(extent: Extent) -> Self {
        Self {
            min: extent,
            max: extent,
            exact: Some(extent),
            orientation_free: false,
            line: false,
        }
    }

    /// Same rule, orientation-free.
    #[must_use]
    pub const fn any_orientation(mut self) -> Self {
        self.orientation_free = true;
        self
    }

    /// Same rule, restricted to lines.
    #[must_use]
    pub const fn lines_only(mut self) -> Self {
        self.line = true;
        self
    }

    /// Whether `extent` is admissible.
    #[must_use]
    pub fn accepts(&self, extent: Extent) -> bool {
        if extent.is_empty() || (self.line && !extent.is_line()) {
            return false;
        }

        let (extent, min, max, exact) = if self.orientation_free {
            (
                Extent::from(extent.sorted()),
                Extent::from(self.min.sorted()),
                Extent::from(self.max.sorted()),
                self.exact.map(|exact| Extent::from(exact.sorted())),
            )
        } else {
            (extent, self.min, self.max, self.exact)
        };

        match exact {
            Some(exact) => extent == exact,
            None => extent.within(min, max),
        }
    }

    /// Checks the rule can accept anything at all.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming `name` when an extent is
    /// zero, `min` exceeds `max`, or `exact` lies outside `[min, max]`.
    pub fn validate(&self, name: &str) -> ConfigResult<()> {
        if self.min.is_empty() || self.max.is_empty() {
            return Err(ConfigError::Invalid(format!("{name}: extents must be non-zero")));
        }
        if !self.min.within(Extent::UNIT, self.max) {
            return Err(ConfigError::Invalid(format!(
                "{name}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        if let Some(exact) = self.exact {
            if exact.is_empty() {
                return Err(ConfigError::Invalid(format!("{name}: exact extent must be non-zero")));
            }
            let range = Self { exact: None, ..*self };
            if !range.accepts(exact) {
                return Err(ConfigError::Invalid(format!(
                    "{name}: exact {exact} outside [{}, {}]",
                    self.min, self.max
                )));
            }
        }
        if self.line && !self.max.is_line() {
            return Err(ConfigError::Invalid(format!(
                "{name}: line rule with non-line max {}",
                self.max
            )));
        }
        Ok(())
    }
}

/// Scale rules for every built-in structure type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StructureConfig {
    /// Crafting complex.
    pub crafting: ScaleRule,
    /// Quantum bridge.
    pub quantum: ScaleRule,
    /// Spatial pylon.
    pub pylon: ScaleRule,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            crafting: ScaleRule::between(Extent::UNIT, Extent::new(16, 16, 16)),
            quantum: ScaleRule::exactly(Extent::new(3, 3, 1)).any_orientation(),
            pylon: ScaleRule::between(Extent::UNIT, Extent::new(1, 1, 32))
                .any_orientation()
                .lines_only(),
        }
    }
}

impl StructureConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or a rule is invalid.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds
    /// an invalid rule.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), "structure configuration loaded");
        Ok(config)
    }

    /// Validates every rule.
    ///
    /// # Errors
    ///
    /// Returns the first invalid rule.
    pub fn validate(&self) -> ConfigResult<()> {
        self.crafting.validate("crafting")?;
        self.quantum.validate("quantum")?;
        self.pylon.validate("pylon")
    }
}
