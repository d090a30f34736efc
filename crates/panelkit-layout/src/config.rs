//! Group-level configuration.

use std::fmt;

use panelkit_core::geometry::Axis;
use serde::{Deserialize, Serialize};

use crate::solver::AllocationSolver;

/// Default divider thickness in pixels.
pub const DEFAULT_DIVIDER_THICKNESS: f64 = 4.0;
/// Default extra hit area on each side of a divider, in pixels.
pub const DEFAULT_DIVIDER_HIT_SLOP: f64 = 4.0;
/// Default minimum per-panel change that counts as a resize.
pub const DEFAULT_CHANGE_EPSILON: f64 = 0.01;

/// Settings shared by every panel in a group.
///
/// All fields have defaults, so a partial JSON/TOML object deserializes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupConfig {
    /// Main axis. `Row` lays panels out left to right.
    pub axis: Axis,
    pub divider_thickness: f64,
    /// Report intermediate drag moves to resize listeners. When off, only
    /// the committed end of a drag is reported.
    pub live_resize: bool,
    /// Invert pointer deltas (right-to-left or bottom-up hosts).
    pub reverse: bool,
    /// Round solved sizes to whole pixels.
    pub snap_to_pixels: bool,
    pub divider_hit_slop: f64,
    /// Changes at or below this are treated as "no change".
    pub change_epsilon: f64,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            axis: Axis::Row,
            divider_thickness: DEFAULT_DIVIDER_THICKNESS,
            live_resize: true,
            reverse: false,
            snap_to_pixels: false,
            divider_hit_slop: DEFAULT_DIVIDER_HIT_SLOP,
            change_epsilon: DEFAULT_CHANGE_EPSILON,
        }
    }
}

impl GroupConfig {
    #[must_use]
    pub fn row() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn column() -> Self {
        Self {
            axis: Axis::Column,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    #[must_use]
    pub fn divider_thickness(mut self, px: f64) -> Self {
        self.divider_thickness = px;
        self
    }

    #[must_use]
    pub fn live_resize(mut self, live: bool) -> Self {
        self.live_resize = live;
        self
    }

    #[must_use]
    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    #[must_use]
    pub fn snap_to_pixels(mut self, snap: bool) -> Self {
        self.snap_to_pixels = snap;
        self
    }

    #[must_use]
    pub fn divider_hit_slop(mut self, px: f64) -> Self {
        self.divider_hit_slop = px;
        self
    }

    #[must_use]
    pub fn change_epsilon(mut self, epsilon: f64) -> Self {
        self.change_epsilon = epsilon;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("divider_thickness", self.divider_thickness),
            ("divider_hit_slop", self.divider_hit_slop),
            ("change_epsilon", self.change_epsilon),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        Ok(())
    }

    /// Solver configured for this group.
    #[must_use]
    pub fn solver(&self) -> AllocationSolver {
        AllocationSolver::new(self.divider_thickness).snap_to_pixels(self.snap_to_pixels)
    }
}

/// Invalid [`GroupConfig`] field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    InvalidValue { field: &'static str, value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { field, value } => {
                write!(f, "invalid {field} value {value} (must be finite and >= 0)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GroupConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.axis, Axis::Row);
        assert!(config.live_resize);
        assert_eq!(GroupConfig::column().axis, Axis::Column);
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        assert_eq!(
            GroupConfig::default().divider_thickness(-1.0).validate(),
            Err(ConfigError::InvalidValue {
                field: "divider_thickness",
                value: -1.0
            })
        );
        assert!(GroupConfig::default()
            .divider_hit_slop(f64::INFINITY)
            .validate()
            .is_err());
        let err = GroupConfig::default()
            .change_epsilon(f64::NAN)
            .validate()
            .expect_err("nan epsilon");
        assert!(err.to_string().contains("change_epsilon"));
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: GroupConfig =
            serde_json::from_str(r#"{"axis":"column","live_resize":false}"#).expect("parse");
        assert_eq!(config.axis, Axis::Column);
        assert!(!config.live_resize);
        assert_eq!(config.divider_thickness, DEFAULT_DIVIDER_THICKNESS);
    }

    #[test]
    fn solver_carries_thickness_and_snapping() {
        let solver = GroupConfig::default().divider_thickness(2.0).solver();
        assert_eq!(solver.divider_thickness(), 2.0);
    }
}
