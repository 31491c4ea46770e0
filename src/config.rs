//! Procedure arguments and their values.
//!
//! [`IntArgument`] describes one argument the way the host registry sees it:
//! name, labels, bounds and default. A [`ProcedureConfig`] holds the current
//! values for a procedure's arguments and enforces those bounds.
//! [`RoundedIconConfig`] is the typed view the icon rounder works with, and
//! can be saved to and loaded from JSON.
//!
//! # Example
//!
//! ```
//! use rounded_iconify::{ProcedureConfig, RoundedIconConfig, ARGUMENTS};
//!
//! let mut config = ProcedureConfig::new(&ARGUMENTS);
//! config.set_property("icon-size", 256).unwrap();
//! assert!(config.set_property("icon-size", 8).is_err());
//!
//! let typed = RoundedIconConfig::from_procedure_config(&config).unwrap();
//! assert_eq!(typed.icon_size, 256);
//! assert_eq!(typed.corner_ratio, 6);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),

    #[error("argument '{name}' = {value} is outside {min}..={max}")]
    OutOfRange {
        name: String,
        value: i64,
        min: i32,
        max: i32,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Argument Schema
// ============================================================================

/// An integer argument declared by a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntArgument {
    /// Property name, e.g. `corner-ratio`.
    pub name: &'static str,
    /// Short label shown in dialogs.
    pub nick: &'static str,
    /// One-line description.
    pub blurb: &'static str,
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

impl IntArgument {
    /// Returns the value if it lies within bounds.
    pub fn check(&self, value: i64) -> Result<i32, ConfigError> {
        if value < self.min as i64 || value > self.max as i64 {
            return Err(ConfigError::OutOfRange {
                name: self.name.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value as i32)
    }
}

pub const CORNER_RATIO: IntArgument = IntArgument {
    name: "corner-ratio",
    nick: "Corner Ratio",
    blurb: "Corner radius as divisor of width (e.g. 6 = width/6)",
    min: 1,
    max: 50,
    default: 6,
};

pub const ICON_SIZE: IntArgument = IntArgument {
    name: "icon-size",
    nick: "Icon Size",
    blurb: "Final square icon size (px)",
    min: 16,
    max: 2048,
    default: 128,
};

/// The arguments of the rounded icon procedure, in dialog order.
pub const ARGUMENTS: [IntArgument; 2] = [CORNER_RATIO, ICON_SIZE];

// ============================================================================
// ProcedureConfig
// ============================================================================

/// Current argument values for one procedure run.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureConfig {
    arguments: Vec<IntArgument>,
    values: BTreeMap<&'static str, i32>,
}

impl ProcedureConfig {
    /// Creates a config holding the default of every argument.
    pub fn new(arguments: &[IntArgument]) -> Self {
        Self {
            arguments: arguments.to_vec(),
            values: arguments.iter().map(|a| (a.name, a.default)).collect(),
        }
    }

    pub fn arguments(&self) -> &[IntArgument] {
        &self.arguments
    }

    /// Looks up an argument by name.
    pub fn argument(&self, name: &str) -> Option<&IntArgument> {
        self.arguments.iter().find(|a| a.name == name)
    }

    /// Sets an argument, rejecting unknown names and out-of-range values.
    pub fn set_property(&mut self, name: &str, value: i64) -> Result<(), ConfigError> {
        let arg = self
            .argument(name)
            .copied()
            .ok_or_else(|| ConfigError::UnknownArgument(name.to_string()))?;
        let value = arg.check(value)?;
        self.values.insert(arg.name, value);
        Ok(())
    }

    pub fn get_property(&self, name: &str) -> Option<i32> {
        self.values.get(name).copied()
    }
}

// ============================================================================
// RoundedIconConfig
// ============================================================================

/// Settings for one rounded icon run.
///
/// # JSON Format
///
/// ```json
/// { "corner-ratio": 6, "icon-size": 128 }
/// ```
///
/// Missing keys take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct RoundedIconConfig {
    /// Width divided by this gives the corner radius.
    pub corner_ratio: u32,

    /// Side of the final square icon in pixels.
    pub icon_size: u32,
}

impl Default for RoundedIconConfig {
    fn default() -> Self {
        Self {
            corner_ratio: CORNER_RATIO.default as u32,
            icon_size: ICON_SIZE.default as u32,
        }
    }
}

impl RoundedIconConfig {
    pub fn new(corner_ratio: u32, icon_size: u32) -> Self {
        Self {
            corner_ratio,
            icon_size,
        }
    }

    /// Checks both values against the argument bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        CORNER_RATIO.check(self.corner_ratio as i64)?;
        ICON_SIZE.check(self.icon_size as i64)?;
        Ok(())
    }

    /// Corner radius for an image of the given width.
    pub fn corner_radius(&self, width: u32) -> u32 {
        corner_radius(width, self.corner_ratio)
    }

    /// Reads the typed settings out of a procedure config.
    pub fn from_procedure_config(config: &ProcedureConfig) -> Result<Self, ConfigError> {
        let get = |arg: &IntArgument| {
            config
                .get_property(arg.name)
                .ok_or_else(|| ConfigError::UnknownArgument(arg.name.to_string()))
        };
        let typed = Self {
            corner_ratio: get(&CORNER_RATIO)? as u32,
            icon_size: get(&ICON_SIZE)? as u32,
        };
        typed.validate()?;
        Ok(typed)
    }

    /// Writes these settings into a procedure config.
    pub fn apply_to(&self, config: &mut ProcedureConfig) -> Result<(), ConfigError> {
        config.set_property(CORNER_RATIO.name, self.corner_ratio as i64)?;
        config.set_property(ICON_SIZE.name, self.icon_size as i64)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses and validates settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// `max(1, width / corner_ratio)` with floor division.
///
/// A ratio of zero is treated as one.
pub fn corner_radius(width: u32, corner_ratio: u32) -> u32 {
    (width / corner_ratio.max(1)).max(1)
}

// ============================================================================
// Tests
// ============================================================================
