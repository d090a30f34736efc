#![forbid(unsafe_code)]

//! Panel-sizing engine for resizable panel groups.
//!
//! A panel group is one row or column of panels separated by draggable
//! dividers. Each panel declares how it wants to be sized
//! ([`SizingMode`]) plus optional bounds; this crate turns those
//! declarations and a container length into pixel sizes, and keeps them
//! consistent while the user drags dividers and collapses panels.
//!
//! After every operation:
//!
//! - sizes plus dividers fill the container exactly (when the declared
//!   bounds allow it; see [`Allocation::overflow`]),
//! - every visible panel is within its `[min_size, max_size]`,
//! - collapsed panels are zero and receive no space.
//!
//! # Example
//!
//! ```
//! use panelkit_layout::{GroupConfig, PanelDescriptor, PanelGroup};
//! use panelkit_core::geometry::Point;
//!
//! let mut group = PanelGroup::new(
//!     GroupConfig::default().divider_thickness(0.0),
//!     vec![
//!         PanelDescriptor::fixed("nav", 200.0).collapsible(true),
//!         PanelDescriptor::flexible("main"),
//!     ],
//! )?;
//! group.on_container_length_changed(1000.0);
//! assert_eq!(group.sizes(), vec![200.0, 800.0]);
//!
//! group.pointer_start(0, Point::new(200.0, 0.0))?;
//! group.pointer_end(Point::new(260.0, 0.0))?;
//! assert_eq!(group.sizes(), vec![260.0, 740.0]);
//!
//! group.toggle_collapse(0)?;
//! assert_eq!(group.sizes(), vec![0.0, 1000.0]);
//! # Ok::<(), panelkit_layout::LayoutError>(())
//! ```

pub mod collapse;
pub mod config;
pub mod descriptor;
pub mod drag;
pub mod error;
pub mod group;
pub mod observer;
pub mod solver;
pub mod state;

pub use collapse::{CollapseController, CollapseError, CollapseTransition};
pub use config::{ConfigError, GroupConfig};
pub use descriptor::{DescriptorError, PanelDescriptor, PanelId, SizingMode, validate_descriptors};
pub use drag::{DragController, DragError, DragOutcome, DragSession, DragState, redistribute_pair};
pub use error::LayoutError;
pub use group::{
    DividerHandle, PanelGroup, Redeclared, ResizeCause, ResizeEvent, ResolvedBox, SubscriptionId,
};
pub use observer::ContainerObserver;
pub use solver::{Allocation, AllocationSolver, SIZE_EPSILON, solve};
pub use state::{PanelState, PanelStore};
