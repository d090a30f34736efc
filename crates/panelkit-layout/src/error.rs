//! Umbrella error for [`PanelGroup`](crate::PanelGroup) operations.

use std::fmt;

use crate::collapse::CollapseError;
use crate::config::ConfigError;
use crate::descriptor::DescriptorError;
use crate::drag::DragError;

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutError {
    Config(ConfigError),
    Descriptor(DescriptorError),
    Drag(DragError),
    Collapse(CollapseError),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config error: {err}"),
            Self::Descriptor(err) => write!(f, "descriptor error: {err}"),
            Self::Drag(err) => write!(f, "drag error: {err}"),
            Self::Collapse(err) => write!(f, "collapse error: {err}"),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Descriptor(err) => Some(err),
            Self::Drag(err) => Some(err),
            Self::Collapse(err) => Some(err),
        }
    }
}

impl From<ConfigError> for LayoutError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DescriptorError> for LayoutError {
    fn from(err: DescriptorError) -> Self {
        Self::Descriptor(err)
    }
}

impl From<DragError> for LayoutError {
    fn from(err: DragError) -> Self {
        Self::Drag(err)
    }
}

impl From<CollapseError> for LayoutError {
    fn from(err: CollapseError) -> Self {
        Self::Collapse(err)
    }
}
