//! Declared panel configuration.
//!
//! A [`PanelDescriptor`] is what the host supplies for every panel on every
//! render. It is plain data: the engine never mutates it, and two descriptors
//! with equal sizing-relevant fields are interchangeable as far as layout is
//! concerned (see [`PanelDescriptor::same_sizing`]).

use std::fmt;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Stable, host-provided panel identity.
///
/// Used to match descriptors across re-declarations so that a content-only
/// change never resets the layout.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    /// Create a panel ID from any string-like key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrow the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PanelId {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for PanelId {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// How a panel competes for space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    /// An exact length in pixels.
    Fixed(f64),
    /// A percentage (0.0 to 100.0) of the space left after dividers.
    Percentage(f64),
    /// An equal share of whatever fixed and percentage panels leave over.
    #[default]
    Flexible,
}

impl SizingMode {
    /// The size this mode claims directly, or `None` for flexible panels.
    #[must_use]
    pub fn claim(self, available: f64) -> Option<f64> {
        match self {
            Self::Fixed(px) => Some(px),
            Self::Percentage(pct) => Some(available * pct / 100.0),
            Self::Flexible => None,
        }
    }

    #[must_use]
    pub const fn is_flexible(self) -> bool {
        matches!(self, Self::Flexible)
    }
}

/// Declared configuration of one panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelDescriptor {
    pub id: PanelId,
    #[serde(default)]
    pub sizing: SizingMode,
    #[serde(default)]
    pub min_size: f64,
    /// Upper bound in pixels; `None` is unbounded.
    #[serde(default)]
    pub max_size: Option<f64>,
    #[serde(default)]
    pub collapsible: bool,
    #[serde(default)]
    pub initial_collapsed: bool,
}

impl PanelDescriptor {
    /// Create a descriptor with the given sizing mode and default bounds.
    #[must_use]
    pub fn new(id: impl Into<PanelId>, sizing: SizingMode) -> Self {
        Self {
            id: id.into(),
            sizing,
            min_size: 0.0,
            max_size: None,
            collapsible: false,
            initial_collapsed: false,
        }
    }

    /// A panel with an exact pixel length.
    #[must_use]
    pub fn fixed(id: impl Into<PanelId>, px: f64) -> Self {
        Self::new(id, SizingMode::Fixed(px))
    }

    /// A panel taking `pct` percent of the available space.
    #[must_use]
    pub fn percentage(id: impl Into<PanelId>, pct: f64) -> Self {
        Self::new(id, SizingMode::Percentage(pct))
    }

    /// A panel sharing leftover space with other flexible panels.
    #[must_use]
    pub fn flexible(id: impl Into<PanelId>) -> Self {
        Self::new(id, SizingMode::Flexible)
    }

    /// Set the minimum size.
    #[must_use]
    pub fn min_size(mut self, min_size: f64) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the maximum size.
    #[must_use]
    pub fn max_size(mut self, max_size: f64) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Allow the panel to be collapsed.
    #[must_use]
    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    /// Start the panel collapsed. Implies `collapsible`.
    #[must_use]
    pub fn initially_collapsed(mut self, collapsed: bool) -> Self {
        self.initial_collapsed = collapsed;
        if collapsed {
            self.collapsible = true;
        }
        self
    }

    /// Upper bound as a number (`+inf` when unbounded).
    #[inline]
    #[must_use]
    pub fn max_bound(&self) -> f64 {
        self.max_size.unwrap_or(f64::INFINITY)
    }

    /// Clamp `size` into `[min_size, max_size]`.
    ///
    /// The minimum wins if the bounds conflict, so an unvalidated descriptor
    /// still yields a number instead of a panic.
    #[inline]
    #[must_use]
    pub fn clamp(&self, size: f64) -> f64 {
        size.min(self.max_bound()).max(self.min_size)
    }

    /// Whether the fields that influence layout are equal.
    ///
    /// `initial_collapsed` only matters the first time a panel is seen, so
    /// it is not part of the comparison.
    #[must_use]
    pub fn same_sizing(&self, other: &Self) -> bool {
        self.sizing == other.sizing
            && self.min_size == other.min_size
            && self.max_size == other.max_size
            && self.collapsible == other.collapsible
    }

    /// Reject configurations the solver cannot honour.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        self.check_length("min_size", self.min_size)?;
        if let Some(max) = self.max_size {
            if max.is_nan() || max < 0.0 {
                return Err(self.bad_length("max_size", max));
            }
            if max < self.min_size {
                return Err(DescriptorError::InvalidBounds {
                    panel: self.id.clone(),
                    min: self.min_size,
                    max,
                });
            }
        }
        match self.sizing {
            SizingMode::Fixed(px) => self.check_length("fixed", px)?,
            SizingMode::Percentage(pct) => {
                if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                    return Err(DescriptorError::PercentageOutOfRange {
                        panel: self.id.clone(),
                        value: pct,
                    });
                }
            }
            SizingMode::Flexible => {}
        }
        if self.initial_collapsed && !self.collapsible {
            return Err(DescriptorError::CollapsedNotCollapsible {
                panel: self.id.clone(),
            });
        }
        Ok(())
    }

    fn check_length(&self, field: &'static str, value: f64) -> Result<(), DescriptorError> {
        if !value.is_finite() || value < 0.0 {
            return Err(self.bad_length(field, value));
        }
        Ok(())
    }

    fn bad_length(&self, field: &'static str, value: f64) -> DescriptorError {
        if value.is_finite() || value == f64::NEG_INFINITY {
            DescriptorError::NegativeSize {
                panel: self.id.clone(),
                field,
                value,
            }
        } else {
            DescriptorError::NonFiniteSize {
                panel: self.id.clone(),
                field,
            }
        }
    }
}

/// Validate an ordered descriptor list: every descriptor individually, plus
/// unique IDs.
pub fn validate_descriptors(descriptors: &[PanelDescriptor]) -> Result<(), DescriptorError> {
    let mut seen = FxHashSet::default();
    for descriptor in descriptors {
        descriptor.validate()?;
        if !seen.insert(&descriptor.id) {
            return Err(DescriptorError::DuplicateId {
                panel: descriptor.id.clone(),
            });
        }
    }
    Ok(())
}

/// Descriptor configuration errors. These are caller bugs, reported at
/// declaration time rather than solved around.
#[derive(Debug, Clone, PartialEq)]
pub enum DescriptorError {
    NegativeSize {
        panel: PanelId,
        field: &'static str,
        value: f64,
    },
    NonFiniteSize {
        panel: PanelId,
        field: &'static str,
    },
    InvalidBounds {
        panel: PanelId,
        min: f64,
        max: f64,
    },
    PercentageOutOfRange {
        panel: PanelId,
        value: f64,
    },
    DuplicateId {
        panel: PanelId,
    },
    CollapsedNotCollapsible {
        panel: PanelId,
    },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeSize {
                panel,
                field,
                value,
            } => write!(f, "panel {panel}: {field} must be >= 0 (got {value})"),
            Self::NonFiniteSize { panel, field } => {
                write!(f, "panel {panel}: {field} must be a finite number")
            }
            Self::InvalidBounds { panel, min, max } => {
                write!(f, "panel {panel}: max_size {max} < min_size {min}")
            }
            Self::PercentageOutOfRange { panel, value } => {
                write!(f, "panel {panel}: percentage {value} outside 0..=100")
            }
            Self::DuplicateId { panel } => write!(f, "duplicate panel id {panel}"),
            Self::CollapsedNotCollapsible { panel } => {
                write!(f, "panel {panel} starts collapsed but is not collapsible")
            }
        }
    }
}

impl std::error::Error for DescriptorError {}
