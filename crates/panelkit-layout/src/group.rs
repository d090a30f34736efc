//! The panel group facade.
//!
//! [`PanelGroup`] is what a host talks to. It owns the declared panels, the
//! live [`PanelStore`], the drag controller and pointer coalescer, and the
//! list of resize listeners, and it routes every input to the component
//! that handles it:
//!
//! ```text
//! container length --> observer --> solver (full) ----\
//! pointer down/move/up --> coalescer --> drag (pair) --+--> store --> listeners
//! collapse toggle --> collapse controller (full) -----/
//! ```
//!
//! Everything is synchronous and single-threaded. Listeners run inline,
//! after the store has been updated.

use std::fmt;

use panelkit_core::event::{PanelEvent, PointerEventKind};
use panelkit_core::event_coalescer::PointerCoalescer;
use panelkit_core::geometry::{Point, Span};
use panelkit_core::{debug, debug_span, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::collapse::{CollapseController, CollapseError, CollapseTransition};
use crate::config::GroupConfig;
use crate::descriptor::{PanelDescriptor, PanelId, validate_descriptors};
use crate::drag::{DragController, DragError, DragOutcome, DragSession};
use crate::error::LayoutError;
use crate::observer::ContainerObserver;
use crate::state::{PanelState, PanelStore};

/// Why listeners are being notified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeCause {
    /// First layout after a non-zero container length arrived.
    Initialized,
    ContainerResized,
    /// Panels were re-declared with different identity or sizing.
    Redeclared,
    /// Intermediate drag position (only with `live_resize`).
    DragMove,
    DragEnd,
    /// A drag was aborted and the pre-drag sizes restored.
    DragCancel,
    Collapse,
    Expand,
    Nudge,
}

/// Payload delivered to resize listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// Sizes in declaration order.
    pub sizes: Vec<f64>,
    pub cause: ResizeCause,
    /// Store revision after the change.
    pub revision: u64,
}

/// Handle returned by [`PanelGroup::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

type ResizeCallback = Box<dyn FnMut(&ResizeEvent)>;

struct Listener {
    id: SubscriptionId,
    callback: ResizeCallback,
}

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    fn register<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ResizeEvent) + 'static,
    {
        self.next_id = self.next_id.saturating_add(1);
        let id = SubscriptionId(self.next_id);
        self.listeners.push(Listener {
            id,
            callback: Box::new(callback),
        });
        id
    }

    fn deregister(&mut self, id: SubscriptionId) -> bool {
        if let Some(idx) = self.listeners.iter().position(|l| l.id == id) {
            self.listeners.remove(idx);
            return true;
        }
        false
    }

    fn dispatch(&mut self, event: &ResizeEvent) {
        for listener in &mut self.listeners {
            (listener.callback)(event);
        }
    }

    fn len(&self) -> usize {
        self.listeners.len()
    }
}

/// How [`PanelGroup::set_descriptors`] treated a re-declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Redeclared {
    /// Same panels, same sizing. Nothing moved.
    Unchanged,
    /// Same panels, some sizing fields changed; re-solved in place.
    Resolved,
    /// Panel count or identity changed; state rebuilt from scratch.
    Reset,
}

/// Where one panel ended up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBox {
    pub index: usize,
    /// Offset and length along the group axis.
    pub span: Span,
    pub size: f64,
    /// Share of the available space, 0..=100.
    pub percentage: f64,
    pub collapsed: bool,
}

/// Rendering hooks for one divider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DividerHandle {
    pub index: usize,
    pub span: Span,
    /// Whether the panel before / after the divider can be collapsed, so a
    /// host can show toggle affordances.
    pub before_collapsible: bool,
    pub after_collapsible: bool,
    /// False when a neighbour is collapsed; dragging it is refused.
    pub draggable: bool,
    /// This divider is being dragged right now.
    pub active: bool,
}

/// A single row or column of resizable panels.
pub struct PanelGroup {
    config: GroupConfig,
    descriptors: Vec<PanelDescriptor>,
    store: Option<PanelStore>,
    container_length: f64,
    /// Length reported mid-drag, applied once the session finishes.
    deferred_length: Option<f64>,
    observer: ContainerObserver,
    drag: DragController,
    /// Listeners have seen intermediate sizes of the running drag.
    drag_reported: bool,
    coalescer: PointerCoalescer,
    listeners: ListenerRegistry,
}

impl fmt::Debug for PanelGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelGroup")
            .field("config", &self.config)
            .field("descriptors", &self.descriptors)
            .field("store", &self.store)
            .field("container_length", &self.container_length)
            .field("deferred_length", &self.deferred_length)
            .field("drag", &self.drag)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl PanelGroup {
    /// Validate and take ownership of the configuration and panels.
    ///
    /// No sizes exist until the first non-zero container length arrives via
    /// [`on_container_length_changed`](Self::on_container_length_changed).
    pub fn new(config: GroupConfig, descriptors: Vec<PanelDescriptor>) -> Result<Self, LayoutError> {
        config.validate()?;
        validate_descriptors(&descriptors)?;
        Ok(Self {
            observer: ContainerObserver::new(config.change_epsilon),
            drag: DragController::new(config.axis, config.reverse),
            drag_reported: false,
            config,
            descriptors,
            store: None,
            container_length: 0.0,
            deferred_length: None,
            coalescer: PointerCoalescer::new(),
            listeners: ListenerRegistry::default(),
        })
    }

    // --- declaration --------------------------------------------------

    /// Re-declare the panels, as a host does on every render.
    ///
    /// Identical declarations leave every size untouched. A change in any
    /// panel's sizing fields forgets that panel's interactive size and
    /// re-solves. A change in the number or order of ids rebuilds the state.
    /// An active drag is cancelled in the latter two cases.
    pub fn set_descriptors(&mut self, descriptors: Vec<PanelDescriptor>) -> Result<Redeclared, LayoutError> {
        validate_descriptors(&descriptors)?;
        let _span = debug_span!("panel_group.redeclare", panels = descriptors.len()).entered();

        let same_identity = self.descriptors.len() == descriptors.len()
            && self
                .descriptors
                .iter()
                .zip(&descriptors)
                .all(|(old, new)| old.id == new.id);
        if !same_identity {
            self.descriptors = descriptors;
            self.reset_state();
            return Ok(Redeclared::Reset);
        }

        let changed: Vec<usize> = self
            .descriptors
            .iter()
            .zip(&descriptors)
            .enumerate()
            .filter(|(_, (old, new))| !old.same_sizing(new))
            .map(|(i, _)| i)
            .collect();
        self.descriptors = descriptors;
        if changed.is_empty() {
            return Ok(Redeclared::Unchanged);
        }

        let aborted = self.abort_drag();
        if let Some(store) = self.store.as_mut() {
            for &index in &changed {
                let collapsible = self.descriptors[index].collapsible;
                if let Some(state) = store.get_mut(index) {
                    state.reset_preference();
                    if !collapsible {
                        state.is_collapsed = false;
                    }
                }
            }
        }
        debug!(changed = changed.len(), "panel sizing re-declared");
        let length = self.deferred_length.take().unwrap_or(self.container_length);
        if self.resolve(length) || aborted {
            self.notify(ResizeCause::Redeclared);
        }
        Ok(Redeclared::Resolved)
    }

    fn reset_state(&mut self) {
        self.drag = DragController::new(self.config.axis, self.config.reverse);
        self.drag_reported = false;
        self.coalescer.clear();
        let length = self.deferred_length.take().unwrap_or(self.container_length);
        if self.store.is_none() {
            return;
        }
        info!(panels = self.descriptors.len(), "panel identity changed; rebuilding state");
        self.store = Some(PanelStore::new(&self.descriptors));
        self.resolve(length);
        self.notify(ResizeCause::Redeclared);
    }

    // --- container ------------------------------------------------------

    /// Report a new container length along the group axis.
    ///
    /// Returns `true` if listeners were notified. Non-finite, negative and
    /// repeated lengths are ignored. During a drag the length is held back
    /// and applied when the session ends or is cancelled.
    pub fn on_container_length_changed(&mut self, length: f64) -> bool {
        let Some(length) = self.observer.observe(length) else {
            return false;
        };
        if self.drag.is_active() {
            debug!(length, "container resize deferred until drag ends");
            self.deferred_length = Some(length);
            return false;
        }
        if self.store.is_none() {
            self.container_length = length;
            if length <= 0.0 {
                return false;
            }
            self.store = Some(PanelStore::new(&self.descriptors));
            self.resolve(length);
            info!(panels = self.descriptors.len(), length, "panel group initialized");
            self.notify(ResizeCause::Initialized);
            return true;
        }
        if self.resolve(length) {
            self.notify(ResizeCause::ContainerResized);
            return true;
        }
        false
    }

    // --- pointer drag ---------------------------------------------------

    /// Pointer pressed on `divider`.
    pub fn pointer_start(&mut self, divider: usize, pointer: Point) -> Result<(), LayoutError> {
        let pointer = self.snap_point(pointer);
        let store = self.store.as_ref().ok_or(DragError::NotInitialized)?;
        self.drag.start(divider, pointer, &self.descriptors, store)?;
        self.drag_reported = false;
        self.coalescer.clear();
        Ok(())
    }

    /// Record a pointer move. It is applied on the next [`on_frame`](Self::on_frame).
    pub fn pointer_move(&mut self, pointer: Point) -> Result<(), LayoutError> {
        if !self.drag.is_active() {
            return Err(DragError::NoActiveSession.into());
        }
        let pointer = self.snap_point(pointer);
        self.coalescer.push_move(pointer);
        Ok(())
    }

    /// Apply the latest pending pointer move, if any.
    ///
    /// Returns `true` if a recomputation happened.
    pub fn on_frame(&mut self) -> bool {
        let Some(pointer) = self.coalescer.take() else {
            return false;
        };
        let before = self.drag.session().map(DragSession::sizes);
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        let Ok((size_a, size_b)) = self.drag.move_to(pointer, store) else {
            return false;
        };
        let moved = before.is_none_or(|(a, b)| {
            (a - size_a).abs() > self.config.change_epsilon
                || (b - size_b).abs() > self.config.change_epsilon
        });
        if moved && self.config.live_resize {
            self.drag_reported = true;
            self.notify(ResizeCause::DragMove);
        }
        true
    }

    /// Pointer released. The release position is always applied.
    ///
    /// Listeners get a `DragEnd` whenever the sizes differ from the start of
    /// the drag or an intermediate `DragMove` was reported.
    pub fn pointer_end(&mut self, pointer: Point) -> Result<DragOutcome, LayoutError> {
        let pointer = self.snap_point(pointer);
        let store = self.store.as_mut().ok_or(DragError::NoActiveSession)?;
        let outcome = self.drag.end(pointer, store)?;
        self.coalescer.clear();
        if outcome.changed || std::mem::take(&mut self.drag_reported) {
            self.notify(ResizeCause::DragEnd);
        }
        self.apply_deferred_length();
        Ok(outcome)
    }

    /// Pointer capture lost. Restores the sizes from before the drag.
    pub fn pointer_cancel(&mut self) -> Result<(), LayoutError> {
        let store = self.store.as_mut().ok_or(DragError::NoActiveSession)?;
        let session = self.drag.cancel(store)?;
        self.coalescer.clear();
        let reported = std::mem::take(&mut self.drag_reported);
        if reported || (self.config.live_resize && session.sizes() != session.snapshot()) {
            self.notify(ResizeCause::DragCancel);
        }
        self.apply_deferred_length();
        Ok(())
    }

    /// Route a canonical event to the matching operation.
    pub fn handle_event(&mut self, event: &PanelEvent) -> Result<(), LayoutError> {
        match *event {
            PanelEvent::Pointer(pointer) => match pointer.kind {
                PointerEventKind::Down { divider } => self.pointer_start(divider, pointer.position),
                PointerEventKind::Moved => self.pointer_move(pointer.position),
                PointerEventKind::Up => self.pointer_end(pointer.position).map(|_| ()),
                PointerEventKind::Cancel => self.pointer_cancel(),
            },
            PanelEvent::ContainerResized { length } => {
                self.on_container_length_changed(length);
                Ok(())
            }
            PanelEvent::ToggleCollapse { panel } => self.toggle_collapse(panel).map(|_| ()),
            PanelEvent::Nudge { divider, delta } => self.nudge_divider(divider, delta).map(|_| ()),
            PanelEvent::Frame => {
                self.on_frame();
                Ok(())
            }
        }
    }

    /// Keyboard-style resize of the pair around `divider` by `delta` pixels.
    pub fn nudge_divider(&mut self, divider: usize, delta: f64) -> Result<DragOutcome, LayoutError> {
        let delta = if self.config.snap_to_pixels { delta.round() } else { delta };
        let store = self.store.as_mut().ok_or(DragError::NotInitialized)?;
        let outcome = self.drag.nudge(divider, delta, &self.descriptors, store)?;
        if outcome.changed {
            self.notify(ResizeCause::Nudge);
        }
        Ok(outcome)
    }

    // --- collapse -------------------------------------------------------

    pub fn toggle_collapse(&mut self, index: usize) -> Result<CollapseTransition, LayoutError> {
        let (controller, length) = self.collapse_controller()?;
        let store = self.store.as_mut().ok_or(CollapseError::NotInitialized)?;
        let transition = controller.toggle(index, &self.descriptors, store, length)?;
        self.notify_transition(transition);
        Ok(transition)
    }

    /// Collapse `index`. Returns `false` if it already was collapsed.
    pub fn collapse(&mut self, index: usize) -> Result<bool, LayoutError> {
        let (controller, length) = self.collapse_controller()?;
        let store = self.store.as_mut().ok_or(CollapseError::NotInitialized)?;
        let Some(transition) = controller.collapse(index, &self.descriptors, store, length)? else {
            return Ok(false);
        };
        self.notify_transition(transition);
        Ok(true)
    }

    /// Expand `index`. Returns `false` if it was not collapsed.
    pub fn expand(&mut self, index: usize) -> Result<bool, LayoutError> {
        let (controller, length) = self.collapse_controller()?;
        let store = self.store.as_mut().ok_or(CollapseError::NotInitialized)?;
        let Some(transition) = controller.expand(index, &self.descriptors, store, length)? else {
            return Ok(false);
        };
        self.notify_transition(transition);
        Ok(true)
    }

    fn collapse_controller(&self) -> Result<(CollapseController, f64), CollapseError> {
        if let Some(divider) = self.drag.dragging_divider() {
            return Err(CollapseError::DragInProgress { divider });
        }
        if self.store.is_none() {
            return Err(CollapseError::NotInitialized);
        }
        let controller = CollapseController::new(self.config.solver(), self.config.change_epsilon);
        Ok((controller, self.container_length))
    }

    fn notify_transition(&mut self, transition: CollapseTransition) {
        let cause = if transition.is_collapse() {
            ResizeCause::Collapse
        } else {
            ResizeCause::Expand
        };
        self.notify(cause);
    }

    // --- queries --------------------------------------------------------

    #[must_use]
    pub const fn config(&self) -> &GroupConfig {
        &self.config
    }

    #[must_use]
    pub fn descriptors(&self) -> &[PanelDescriptor] {
        &self.descriptors
    }

    /// Whether a non-zero container length has been seen.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.store.is_some()
    }

    /// Container length the current sizes were solved for.
    #[must_use]
    pub const fn container_length(&self) -> f64 {
        self.container_length
    }

    /// Sizes in declaration order; zeros before initialization.
    #[must_use]
    pub fn sizes(&self) -> Vec<f64> {
        match &self.store {
            Some(store) => store.sizes(),
            None => vec![0.0; self.descriptors.len()],
        }
    }

    #[must_use]
    pub fn panel_state(&self, index: usize) -> Option<&PanelState> {
        self.store.as_ref()?.get(index)
    }

    #[must_use]
    pub fn panel_index(&self, id: &PanelId) -> Option<usize> {
        self.descriptors.iter().position(|d| d.id == *id)
    }

    /// Store revision; 0 before initialization.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.store.as_ref().map_or(0, PanelStore::revision)
    }

    #[must_use]
    pub fn dragging_divider(&self) -> Option<usize> {
        self.drag.dragging_divider()
    }

    #[must_use]
    pub const fn drag_session(&self) -> Option<&DragSession> {
        self.drag.session()
    }

    /// Panel boxes keyed by id, for the rendering layer.
    #[must_use]
    pub fn resolved_boxes(&self) -> FxHashMap<PanelId, ResolvedBox> {
        self.layout_boxes()
            .map(|(id, resolved)| (id.clone(), resolved))
            .collect()
    }

    #[must_use]
    pub fn resolved_box(&self, id: &PanelId) -> Option<ResolvedBox> {
        self.layout_boxes()
            .find(|(panel, _)| *panel == id)
            .map(|(_, resolved)| resolved)
    }

    fn layout_boxes(&self) -> impl Iterator<Item = (&PanelId, ResolvedBox)> + '_ {
        let available = self
            .config
            .solver()
            .available_space(self.container_length, self.descriptors.len());
        let thickness = self.config.divider_thickness;
        let sizes = self.sizes();
        let mut offset = 0.0;
        self.descriptors
            .iter()
            .zip(sizes)
            .enumerate()
            .map(move |(index, (descriptor, size))| {
                let span = Span::new(offset, size);
                offset += size + thickness;
                let resolved = ResolvedBox {
                    index,
                    span,
                    size,
                    percentage: if available > 0.0 { size / available * 100.0 } else { 0.0 },
                    collapsed: self.panel_state(index).is_some_and(|s| s.is_collapsed),
                };
                (&descriptor.id, resolved)
            })
    }

    /// Divider positions along the axis, in order.
    #[must_use]
    pub fn divider_spans(&self) -> Vec<Span> {
        let thickness = self.config.divider_thickness;
        let sizes = self.sizes();
        let count = sizes.len().saturating_sub(1);
        let mut offset = 0.0;
        sizes
            .iter()
            .take(count)
            .map(|size| {
                let span = Span::new(offset + size, thickness);
                offset = span.end();
                span
            })
            .collect()
    }

    /// Per-divider rendering hooks.
    #[must_use]
    pub fn dividers(&self) -> Vec<DividerHandle> {
        let active = self.dragging_divider();
        let collapsed = |i: usize| self.panel_state(i).is_some_and(|s| s.is_collapsed);
        self.divider_spans()
            .into_iter()
            .enumerate()
            .map(|(index, span)| DividerHandle {
                index,
                span,
                before_collapsible: self.descriptors[index].collapsible,
                after_collapsible: self.descriptors[index + 1].collapsible,
                draggable: !collapsed(index) && !collapsed(index + 1),
                active: active == Some(index),
            })
            .collect()
    }

    /// Divider under `point`, widened by the configured hit slop. When
    /// inflated regions overlap the nearest divider center wins.
    #[must_use]
    pub fn divider_at(&self, point: Point) -> Option<usize> {
        let pos = self.config.axis.main(point);
        let slop = self.config.divider_hit_slop;
        self.divider_spans()
            .iter()
            .enumerate()
            .filter(|(_, span)| span.inflate(slop).distance_to(pos) <= 0.0)
            .min_by(|(_, a), (_, b)| {
                (a.center() - pos)
                    .abs()
                    .total_cmp(&(b.center() - pos).abs())
            })
            .map(|(index, _)| index)
    }

    // --- listeners ------------------------------------------------------

    /// Register a resize listener.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&ResizeEvent) + 'static,
    {
        self.listeners.register(callback)
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.deregister(id)
    }

    // --- internals ------------------------------------------------------

    fn snap_point(&self, point: Point) -> Point {
        if self.config.snap_to_pixels {
            Point::new(point.x.round(), point.y.round())
        } else {
            point
        }
    }

    /// Cancel any running drag. Returns whether one was running.
    fn abort_drag(&mut self) -> bool {
        self.coalescer.clear();
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        let aborted = self.drag.cancel(store).is_ok();
        self.drag_reported = false;
        if aborted {
            debug!("drag session aborted by re-declaration");
        }
        aborted
    }

    fn apply_deferred_length(&mut self) {
        if let Some(length) = self.deferred_length.take()
            && self.resolve(length)
        {
            self.notify(ResizeCause::ContainerResized);
        }
    }

    /// Full solve at `length`. Returns whether any size changed.
    fn resolve(&mut self, length: f64) -> bool {
        self.container_length = length;
        let Some(store) = self.store.as_mut() else {
            return false;
        };
        let allocation = self
            .config
            .solver()
            .solve(&self.descriptors, store.states(), length);
        store.apply(&allocation.sizes, self.config.change_epsilon)
    }

    fn notify(&mut self, cause: ResizeCause) {
        let event = ResizeEvent {
            sizes: self.sizes(),
            cause,
            revision: self.revision(),
        };
        debug!(cause = ?cause, revision = event.revision, "panel sizes changed");
        self.listeners.dispatch(&event);
    }
}
