#![forbid(unsafe_code)]

//! Pointer-move coalescing for drag sessions.
//!
//! Pointer devices can report moves far faster than a host renders frames.
//! Recomputing panel sizes for every one of them is wasted work: only the
//! position at the next frame is ever visible.
//!
//! [`PointerCoalescer`] uses a "latest wins" strategy:
//! - Moves replace any pending move; superseded positions are discarded,
//!   never queued.
//! - Every other pointer event passes through immediately.
//!
//! The caller drains the pending move once per frame with
//! [`PointerCoalescer::take`]. Before processing a release the caller should
//! drain as well (or simply use the release position, which is the latest).
//!
//! # Usage
//!
//! ```
//! use panelkit_core::event::PointerEvent;
//! use panelkit_core::event_coalescer::PointerCoalescer;
//! use panelkit_core::geometry::Point;
//!
//! let mut coalescer = PointerCoalescer::new();
//!
//! assert!(coalescer.push(PointerEvent::moved(Point::new(10.0, 0.0))).is_none());
//! assert!(coalescer.push(PointerEvent::moved(Point::new(20.0, 0.0))).is_none());
//!
//! // One frame later only the latest position is delivered.
//! assert_eq!(coalescer.take(), Some(Point::new(20.0, 0.0)));
//! assert_eq!(coalescer.take(), None);
//! ```

use crate::event::PointerEvent;
use crate::geometry::Point;

/// Coalesces pointer moves to at most one pending position.
///
/// # Thread Safety
///
/// `PointerCoalescer` is not thread-safe. It should be used from the single
/// thread that receives input events.
///
/// # Performance
///
/// All operations are O(1).
#[derive(Debug, Clone, Default)]
pub struct PointerCoalescer {
    /// Latest unprocessed move position.
    pending: Option<Point>,
    /// Moves discarded because a newer one arrived before the frame.
    superseded: u64,
}

impl PointerCoalescer {
    /// Create a new coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a pointer event.
    ///
    /// Returns `None` when the event was a move and is now pending, or
    /// `Some(event)` for events that must be handled immediately.
    pub fn push(&mut self, event: PointerEvent) -> Option<PointerEvent> {
        if event.is_move() {
            self.push_move(event.position);
            None
        } else {
            Some(event)
        }
    }

    /// Record a move position, replacing any pending one.
    pub fn push_move(&mut self, position: Point) {
        if self.pending.replace(position).is_some() {
            self.superseded = self.superseded.saturating_add(1);
        }
    }

    /// Drain the pending move, if any.
    pub fn take(&mut self) -> Option<Point> {
        self.pending.take()
    }

    /// Peek at the pending move without draining it.
    #[must_use]
    pub fn pending(&self) -> Option<Point> {
        self.pending
    }

    /// Check whether a move is waiting for the next frame.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop any pending move (session aborted).
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Total number of moves discarded in favour of a newer position.
    #[must_use]
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }
}
