//! Collapse and expand transitions.
//!
//! Collapsing a panel frees its space for the siblings; expanding reclaims a
//! target size. Both end in a full re-solve so every invariant is restored
//! in one step.
//!
//! Expand target, first match wins:
//!
//! 1. the size captured when the panel collapsed,
//! 2. a declared `Fixed` length,
//! 3. a declared `Percentage` of the available space,
//! 4. `min_size`, when positive.
//!
//! The target is clamped into the panel's bounds and becomes its preferred
//! size. When no rule matches, the panel rejoins the flexible pool.

use std::fmt;

use panelkit_core::debug;
use serde::{Deserialize, Serialize};

use crate::descriptor::PanelDescriptor;
use crate::solver::AllocationSolver;
use crate::state::{PanelState, PanelStore};

/// What a collapse operation did.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "transition", rename_all = "snake_case")]
pub enum CollapseTransition {
    /// Panel collapsed, releasing `freed` pixels to its siblings.
    Collapsed { panel: usize, freed: f64 },
    /// Panel expanded; `target` is the preferred size it was given, if any.
    Expanded { panel: usize, target: Option<f64> },
}

impl CollapseTransition {
    #[must_use]
    pub const fn panel(&self) -> usize {
        match *self {
            Self::Collapsed { panel, .. } | Self::Expanded { panel, .. } => panel,
        }
    }

    #[must_use]
    pub const fn is_collapse(&self) -> bool {
        matches!(self, Self::Collapsed { .. })
    }
}

/// Applies collapse transitions and re-solves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollapseController {
    solver: AllocationSolver,
    epsilon: f64,
}

impl CollapseController {
    #[must_use]
    pub fn new(solver: AllocationSolver, epsilon: f64) -> Self {
        Self { solver, epsilon }
    }

    /// Flip the collapsed flag of `index`.
    pub fn toggle(
        &self,
        index: usize,
        descriptors: &[PanelDescriptor],
        store: &mut PanelStore,
        container_length: f64,
    ) -> Result<CollapseTransition, CollapseError> {
        let collapsed = collapsible_state(index, descriptors, store)?.is_collapsed;
        let transition = if collapsed {
            self.apply_expand(index, descriptors, store, container_length)
        } else {
            self.apply_collapse(index, store)
        };
        self.resolve(descriptors, store, container_length);
        Ok(transition)
    }

    /// Collapse `index`. Returns `Ok(None)` if it already is.
    pub fn collapse(
        &self,
        index: usize,
        descriptors: &[PanelDescriptor],
        store: &mut PanelStore,
        container_length: f64,
    ) -> Result<Option<CollapseTransition>, CollapseError> {
        if collapsible_state(index, descriptors, store)?.is_collapsed {
            return Ok(None);
        }
        let transition = self.apply_collapse(index, store);
        self.resolve(descriptors, store, container_length);
        Ok(Some(transition))
    }

    /// Expand `index`. Returns `Ok(None)` if it is not collapsed.
    pub fn expand(
        &self,
        index: usize,
        descriptors: &[PanelDescriptor],
        store: &mut PanelStore,
        container_length: f64,
    ) -> Result<Option<CollapseTransition>, CollapseError> {
        if !collapsible_state(index, descriptors, store)?.is_collapsed {
            return Ok(None);
        }
        let transition = self.apply_expand(index, descriptors, store, container_length);
        self.resolve(descriptors, store, container_length);
        Ok(Some(transition))
    }

    /// Size a collapsed panel would be given on expand, before the re-solve.
    #[must_use]
    pub fn expand_target(
        &self,
        descriptor: &PanelDescriptor,
        state: &PanelState,
        available: f64,
    ) -> Option<f64> {
        let target = state
            .size_before_collapse
            .or_else(|| descriptor.sizing.claim(available))
            .or_else(|| (descriptor.min_size > 0.0).then_some(descriptor.min_size))?;
        Some(descriptor.clamp(target))
    }

    fn apply_collapse(&self, index: usize, store: &mut PanelStore) -> CollapseTransition {
        let mut freed = 0.0;
        if let Some(state) = store.get_mut(index) {
            freed = state.current_size;
            state.size_before_collapse = (freed > 0.0).then_some(freed);
            state.preferred_size = None;
            state.is_collapsed = true;
        }
        debug!(panel = index, freed, "panel collapsed");
        CollapseTransition::Collapsed {
            panel: index,
            freed,
        }
    }

    fn apply_expand(
        &self,
        index: usize,
        descriptors: &[PanelDescriptor],
        store: &mut PanelStore,
        container_length: f64,
    ) -> CollapseTransition {
        let available = self.solver.available_space(container_length, descriptors.len());
        let mut target = None;
        if let (Some(descriptor), Some(state)) = (descriptors.get(index), store.get_mut(index)) {
            target = self.expand_target(descriptor, state, available);
            state.is_collapsed = false;
            state.size_before_collapse = None;
            state.preferred_size = target;
        }
        debug!(panel = index, target = ?target, "panel expanded");
        CollapseTransition::Expanded {
            panel: index,
            target,
        }
    }

    fn resolve(&self, descriptors: &[PanelDescriptor], store: &mut PanelStore, container_length: f64) {
        let allocation = self.solver.solve(descriptors, store.states(), container_length);
        store.apply(&allocation.sizes, self.epsilon);
    }
}

fn collapsible_state<'a>(
    index: usize,
    descriptors: &[PanelDescriptor],
    store: &'a PanelStore,
) -> Result<&'a PanelState, CollapseError> {
    let (Some(descriptor), Some(state)) = (descriptors.get(index), store.get(index)) else {
        return Err(CollapseError::PanelOutOfRange {
            panel: index,
            panels: store.len(),
        });
    };
    if !descriptor.collapsible {
        return Err(CollapseError::NotCollapsible {
            panel: descriptor.id.to_string(),
        });
    }
    Ok(state)
}

/// Reasons a collapse transition was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollapseError {
    PanelOutOfRange { panel: usize, panels: usize },
    NotCollapsible { panel: String },
    /// Collapse changes the pair a drag session is redistributing.
    DragInProgress { divider: usize },
    /// The group has not seen a container length yet.
    NotInitialized,
}

impl fmt::Display for CollapseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PanelOutOfRange { panel, panels } => {
                write!(f, "panel index {panel} out of range (group has {panels} panels)")
            }
            Self::NotCollapsible { panel } => write!(f, "panel '{panel}' is not collapsible"),
            Self::DragInProgress { divider } => write!(
                f,
                "cannot change collapse state while divider {divider} is being dragged"
            ),
            Self::NotInitialized => {
                write!(f, "panel group has no layout yet (no container length reported)")
            }
        }
    }
}

impl std::error::Error for CollapseError {}
