//! Interactive divider drag sessions.
//!
//! A drag only ever redistributes space between the two panels adjacent to
//! the grabbed divider. Every other panel stays where it is for the whole
//! session, which keeps a drag O(1) and visually stable.
//!
//! ```text
//! Idle --start--> Dragging --move_to*--> Dragging --end----> Idle (commit)
//!                                                 \--cancel-> Idle (revert)
//! ```
//!
//! Sessions are strictly sequential: `start` while dragging and
//! `move_to`/`end`/`cancel` while idle are caller bugs and return a
//! [`DragError`] instead of being silently ignored.

use std::fmt;

use panelkit_core::geometry::{Axis, Point};
use panelkit_core::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::descriptor::PanelDescriptor;
use crate::state::PanelStore;

/// Snapshot of one side of a divider at session start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairBounds {
    pub index: usize,
    pub size: f64,
    pub min: f64,
    pub max: f64,
}

impl PairBounds {
    fn capture(index: usize, descriptor: &PanelDescriptor, size: f64) -> Self {
        Self {
            index,
            size,
            min: descriptor.min_size,
            max: descriptor.max_bound(),
        }
    }

    fn clamp(&self, size: f64) -> f64 {
        size.min(self.max).max(self.min)
    }
}

/// Move `delta` pixels from `b` to `a`, keeping `a.size + b.size` constant.
///
/// `a` is clamped first; if the complement then violates `b`'s bounds, `b`
/// is clamped and `a` re-derived from it and clamped again. The returned
/// pair always sums to the snapshot total, so when both bounds cannot hold
/// at once the drag simply stops advancing.
#[must_use]
pub fn redistribute_pair(a: PairBounds, b: PairBounds, delta: f64) -> (f64, f64) {
    let total = a.size + b.size;
    let delta = if delta.is_finite() { delta } else { 0.0 };

    let mut new_a = a.clamp(a.size + delta);
    let new_b = total - new_a;
    let clamped_b = b.clamp(new_b);
    if clamped_b != new_b {
        new_a = a.clamp(total - clamped_b);
    }
    (new_a, total - new_a)
}

/// One active drag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragSession {
    divider: usize,
    origin: f64,
    a: PairBounds,
    b: PairBounds,
    offset: f64,
    sizes: (f64, f64),
    moves: u64,
}

impl DragSession {
    /// Divider index (between panels `divider` and `divider + 1`).
    #[must_use]
    pub const fn divider(&self) -> usize {
        self.divider
    }

    /// Pointer coordinate on the group axis at session start.
    #[must_use]
    pub const fn origin(&self) -> f64 {
        self.origin
    }

    /// Signed pointer travel since start (after `reverse` is applied).
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Current sizes of the two panels.
    #[must_use]
    pub const fn sizes(&self) -> (f64, f64) {
        self.sizes
    }

    /// Sizes captured at start.
    #[must_use]
    pub const fn snapshot(&self) -> (f64, f64) {
        (self.a.size, self.b.size)
    }

    /// Panel indices on either side of the divider.
    #[must_use]
    pub const fn panels(&self) -> (usize, usize) {
        (self.a.index, self.b.index)
    }

    /// Number of recomputations performed in this session.
    #[must_use]
    pub const fn moves(&self) -> u64 {
        self.moves
    }

    fn apply(&mut self, offset: f64) -> (f64, f64) {
        self.offset = offset;
        self.sizes = redistribute_pair(self.a, self.b, offset);
        self.moves = self.moves.saturating_add(1);
        self.sizes
    }
}

/// Drag lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Final result of a committed (or reverted) session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DragOutcome {
    pub divider: usize,
    pub panels: (usize, usize),
    pub sizes: (f64, f64),
    /// Whether the sizes differ from the session snapshot.
    pub changed: bool,
}

/// Drives drag sessions against a [`PanelStore`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragController {
    state: DragState,
    axis: Axis,
    reverse: bool,
}

impl DragController {
    #[must_use]
    pub fn new(axis: Axis, reverse: bool) -> Self {
        Self {
            state: DragState::Idle,
            axis,
            reverse,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    /// Divider being dragged, for rendering active-divider visuals.
    #[must_use]
    pub fn dragging_divider(&self) -> Option<usize> {
        self.session().map(DragSession::divider)
    }

    /// Begin a session on `divider`.
    pub fn start(
        &mut self,
        divider: usize,
        pointer: Point,
        descriptors: &[PanelDescriptor],
        store: &PanelStore,
    ) -> Result<DragSession, DragError> {
        if let DragState::Dragging(active) = self.state {
            return Err(DragError::SessionActive {
                divider: active.divider,
            });
        }
        let (a, b) = capture_pair(divider, descriptors, store)?;
        let session = DragSession {
            divider,
            origin: self.axis.main(pointer),
            a,
            b,
            offset: 0.0,
            sizes: (a.size, b.size),
            moves: 0,
        };
        self.state = DragState::Dragging(session);
        debug!(divider, a = a.size, b = b.size, "drag session started");
        Ok(session)
    }

    /// Recompute the pair for a new pointer position and write it to the
    /// store. The store revision advances whenever the pair moves.
    pub fn move_to(&mut self, pointer: Point, store: &mut PanelStore) -> Result<(f64, f64), DragError> {
        let offset = self.offset_for(pointer);
        let DragState::Dragging(session) = &mut self.state else {
            return Err(DragError::NoActiveSession);
        };
        let previous = session.sizes;
        let (size_a, size_b) = session.apply(offset);
        store.set_size(session.a.index, size_a);
        store.set_size(session.b.index, size_b);
        if (size_a, size_b) != previous {
            store.bump_revision();
        }
        trace!(divider = session.divider, offset, size_a, size_b, "drag move");
        Ok((size_a, size_b))
    }

    /// Apply the final position, commit the pair as preferred sizes, and
    /// return to idle.
    pub fn end(&mut self, pointer: Point, store: &mut PanelStore) -> Result<DragOutcome, DragError> {
        self.move_to(pointer, store)?;
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return Err(DragError::NoActiveSession);
        };
        let outcome = commit(&session, store);
        debug!(
            divider = session.divider,
            a = outcome.sizes.0,
            b = outcome.sizes.1,
            moves = session.moves,
            "drag session committed"
        );
        Ok(outcome)
    }

    /// Abort the session and restore the snapshot sizes.
    pub fn cancel(&mut self, store: &mut PanelStore) -> Result<DragSession, DragError> {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return Err(DragError::NoActiveSession);
        };
        store.set_size(session.a.index, session.a.size);
        store.set_size(session.b.index, session.b.size);
        if session.sizes != session.snapshot() {
            store.bump_revision();
        }
        debug!(divider = session.divider, "drag session canceled");
        Ok(session)
    }

    /// One-shot pairwise resize, as from a keyboard arrow on a focused
    /// divider. Uses the same redistribution as a drag.
    pub fn nudge(
        &mut self,
        divider: usize,
        delta: f64,
        descriptors: &[PanelDescriptor],
        store: &mut PanelStore,
    ) -> Result<DragOutcome, DragError> {
        if let DragState::Dragging(active) = self.state {
            return Err(DragError::SessionActive {
                divider: active.divider,
            });
        }
        let (a, b) = capture_pair(divider, descriptors, store)?;
        let mut session = DragSession {
            divider,
            origin: 0.0,
            a,
            b,
            offset: 0.0,
            sizes: (a.size, b.size),
            moves: 0,
        };
        let (size_a, size_b) = session.apply(delta);
        store.set_size(a.index, size_a);
        store.set_size(b.index, size_b);
        Ok(commit(&session, store))
    }

    fn offset_for(&self, pointer: Point) -> f64 {
        let Some(session) = self.session() else {
            return 0.0;
        };
        let travel = self.axis.main(pointer) - session.origin;
        if self.reverse { -travel } else { travel }
    }
}

fn capture_pair(
    divider: usize,
    descriptors: &[PanelDescriptor],
    store: &PanelStore,
) -> Result<(PairBounds, PairBounds), DragError> {
    let dividers = store.len().saturating_sub(1);
    if divider >= dividers || descriptors.len() != store.len() {
        return Err(DragError::DividerOutOfRange { divider, dividers });
    }
    let mut pair = [None, None];
    for (slot, index) in pair.iter_mut().zip([divider, divider + 1]) {
        let state = store
            .get(index)
            .ok_or(DragError::DividerOutOfRange { divider, dividers })?;
        if state.is_collapsed {
            return Err(DragError::CollapsedNeighbor {
                divider,
                panel: index,
            });
        }
        *slot = Some(PairBounds::capture(
            index,
            &descriptors[index],
            state.current_size,
        ));
    }
    match pair {
        [Some(a), Some(b)] => Ok((a, b)),
        _ => Err(DragError::DividerOutOfRange { divider, dividers }),
    }
}

fn commit(session: &DragSession, store: &mut PanelStore) -> DragOutcome {
    let (size_a, size_b) = session.sizes;
    for (index, size) in [(session.a.index, size_a), (session.b.index, size_b)] {
        if let Some(state) = store.get_mut(index) {
            state.current_size = size;
            state.preferred_size = Some(size);
        }
    }
    let changed = session.sizes != session.snapshot();
    if changed {
        store.bump_revision();
    }
    DragOutcome {
        divider: session.divider,
        panels: session.panels(),
        sizes: session.sizes,
        changed,
    }
}

/// Drag session discipline and targeting errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragError {
    /// `start` (or `nudge`) while a session is already running.
    SessionActive { divider: usize },
    /// `move`/`end`/`cancel` without a session.
    NoActiveSession,
    /// Divider index does not exist.
    DividerOutOfRange { divider: usize, dividers: usize },
    /// One side of the divider is collapsed; expand it first.
    CollapsedNeighbor { divider: usize, panel: usize },
    /// The group has not seen a container length yet.
    NotInitialized,
}

impl fmt::Display for DragError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionActive { divider } => {
                write!(f, "a drag session on divider {divider} is already active")
            }
            Self::NoActiveSession => write!(f, "no active drag session"),
            Self::DividerOutOfRange { divider, dividers } => write!(
                f,
                "divider {divider} out of range (group has {dividers} dividers)"
            ),
            Self::CollapsedNeighbor { divider, panel } => write!(
                f,
                "divider {divider} borders collapsed panel {panel}; expand it before dragging"
            ),
            Self::NotInitialized => {
                write!(f, "panel group has no layout yet (no container length reported)")
            }
        }
    }
}

impl std::error::Error for DragError {}
