//! Mutable per-panel state.
//!
//! [`PanelStore`] owns the only mutable layout state in a panel group. The
//! solver reads it, and the group writes solver output back through
//! [`PanelStore::apply`]. Drag and collapse transitions mutate individual
//! entries.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::descriptor::{PanelDescriptor, PanelId};
use crate::solver::SIZE_EPSILON;

/// Live state of one panel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PanelState {
    /// Current length in pixels. Zero while collapsed.
    pub current_size: f64,
    pub is_collapsed: bool,
    /// Size captured at collapse time, consumed by the next expand.
    pub size_before_collapse: Option<f64>,
    /// Size established by an interaction (drag, nudge, expand). The solver
    /// treats it as an explicit claim in place of the declared sizing mode.
    pub preferred_size: Option<f64>,
}

impl PanelState {
    /// Fresh state for a newly declared panel.
    #[must_use]
    pub fn initial(descriptor: &PanelDescriptor) -> Self {
        Self {
            current_size: 0.0,
            is_collapsed: descriptor.initial_collapsed,
            size_before_collapse: None,
            preferred_size: None,
        }
    }

    /// Forget interaction history after the panel's sizing fields changed.
    pub fn reset_preference(&mut self) {
        self.preferred_size = None;
        self.size_before_collapse = None;
    }
}

/// Per-panel state for one group, indexed in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelStore {
    ids: Vec<PanelId>,
    index: FxHashMap<PanelId, usize>,
    states: Vec<PanelState>,
    /// Bumped every time sizes actually change.
    revision: u64,
}

impl PanelStore {
    /// Build state for the given descriptors. Sizes start at zero until the
    /// first solve is applied.
    #[must_use]
    pub fn new(descriptors: &[PanelDescriptor]) -> Self {
        let ids: Vec<PanelId> = descriptors.iter().map(|d| d.id.clone()).collect();
        let index = ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        Self {
            ids,
            index,
            states: descriptors.iter().map(PanelState::initial).collect(),
            revision: 0,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[must_use]
    pub fn states(&self) -> &[PanelState] {
        &self.states
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PanelState> {
        self.states.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut PanelState> {
        self.states.get_mut(index)
    }

    #[must_use]
    pub fn ids(&self) -> &[PanelId] {
        &self.ids
    }

    /// Position of a panel by ID.
    #[must_use]
    pub fn index_of(&self, id: &PanelId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Current sizes in declaration order.
    #[must_use]
    pub fn sizes(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.current_size).collect()
    }

    /// Number of size changes applied so far.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether `descriptors` declare the same panels, in the same order.
    #[must_use]
    pub fn matches_identity(&self, descriptors: &[PanelDescriptor]) -> bool {
        self.ids.len() == descriptors.len()
            && self.ids.iter().zip(descriptors).all(|(id, d)| *id == d.id)
    }

    /// Write solved sizes back.
    ///
    /// Returns `true` if any size moved by more than `epsilon`, or if the
    /// total moved at all. Otherwise the store is left untouched so
    /// downstream listeners see no change; skipped writes never let the sum
    /// drift from the solved total.
    pub fn apply(&mut self, sizes: &[f64], epsilon: f64) -> bool {
        debug_assert_eq!(sizes.len(), self.states.len());
        let current_total: f64 = self.states.iter().map(|s| s.current_size).sum();
        let total: f64 = sizes.iter().sum();
        let changed = (current_total - total).abs() > SIZE_EPSILON
            || self
                .states
                .iter()
                .zip(sizes)
                .any(|(state, &size)| (state.current_size - size).abs() > epsilon);
        if changed {
            for (state, &size) in self.states.iter_mut().zip(sizes) {
                state.current_size = size;
            }
            self.revision = self.revision.saturating_add(1);
        }
        changed
    }

    /// Overwrite one panel's size (pairwise drag updates).
    pub(crate) fn set_size(&mut self, index: usize, size: f64) {
        if let Some(state) = self.states.get_mut(index) {
            state.current_size = size;
        }
    }

    pub(crate) fn bump_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}
