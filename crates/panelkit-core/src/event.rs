#![forbid(unsafe_code)]

//! Canonical input events for a panel group.
//!
//! Hosts translate whatever their windowing or DOM layer delivers (mouse,
//! touch, pen) into these device-agnostic events. Only a divider press starts
//! a drag, so the press carries the divider index the host hit-tested; moves
//! and releases just carry a position.
//!
//! # Design Notes
//!
//! - Positions are in the same pixel space as the container length.
//! - `Cancel` models a lost pointer capture: the drag is rolled back.
//! - `Frame` is the host's animation tick; coalesced moves are applied on it.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Canonical panel-group event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PanelEvent {
    /// A pointer interaction on a divider.
    Pointer(PointerEvent),

    /// The observed container length changed.
    ContainerResized {
        /// New container length along the group axis.
        length: f64,
    },

    /// Toggle the collapsed state of a panel (divider toggle hook).
    ToggleCollapse {
        /// Panel index.
        panel: usize,
    },

    /// Keyboard-style divider nudge.
    Nudge {
        /// Divider index.
        divider: usize,
        /// Signed pixel delta applied to the panel before the divider.
        delta: f64,
    },

    /// One rendered frame elapsed.
    Frame,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// The phase of the pointer session.
    pub kind: PointerEventKind,

    /// Pointer position in container pixels.
    pub position: Point,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, position: Point) -> Self {
        Self { kind, position }
    }

    /// Pointer pressed on `divider`.
    #[must_use]
    pub const fn down(divider: usize, position: Point) -> Self {
        Self::new(PointerEventKind::Down { divider }, position)
    }

    /// Pointer moved.
    #[must_use]
    pub const fn moved(position: Point) -> Self {
        Self::new(PointerEventKind::Moved, position)
    }

    /// Pointer released.
    #[must_use]
    pub const fn up(position: Point) -> Self {
        Self::new(PointerEventKind::Up, position)
    }

    /// Pointer capture lost.
    #[must_use]
    pub const fn cancel(position: Point) -> Self {
        Self::new(PointerEventKind::Cancel, position)
    }

    /// Whether this is a move (the only coalescable kind).
    #[must_use]
    pub const fn is_move(&self) -> bool {
        matches!(self.kind, PointerEventKind::Moved)
    }
}

/// The phase of a pointer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Pointer pressed on a divider; starts a drag session.
    Down {
        /// Divider index (between panel `divider` and `divider + 1`).
        divider: usize,
    },
    /// Pointer moved while a session may be active.
    Moved,
    /// Pointer released; ends the session.
    Up,
    /// Pointer capture lost; aborts the session.
    Cancel,
}
