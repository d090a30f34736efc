//! Allocation solver: declared sizing → concrete pixel lengths.
//!
//! # Algorithm
//!
//! ```text
//! available = container - (n - 1) * divider            (clamped to >= 0)
//!
//! 1. collapsed panels            -> 0, excluded from everything below
//! 2. claimed panels              -> Fixed px | Percentage of `available` |
//!                                   preferred size, clamped to [min, max]
//! 3. remaining = available - sum(claimed)
//! 4. flexible pool               -> pin every panel whose fair share is below
//!                                   its minimum; repeat until a pass pins none
//! 5. survivors                   -> remaining / survivors
//! 6. max clamp on every non-collapsed panel
//! 7. residual = available - sum  -> water-filled within bounds over
//!                                   absorber tiers (see below)
//! 8. floor at 0
//! ```
//!
//! Percentages are fractions of `available`, not of what fixed panels leave
//! over. Step 4 is a fixed-point iteration: pinning one panel lowers the
//! share of every other panel, which can pin more. The pool shrinks on every
//! pass that pins anything, so it terminates in at most `n` passes.
//!
//! Residual absorber tiers, tried in order until the residual is placed:
//! flexible panels without a preferred size, other flexible panels, then
//! every non-collapsed panel. Collapsed panels never receive residual.
//!
//! # Unsatisfiable constraints
//!
//! When the minimums alone exceed `available`, every panel sits at its
//! minimum and the sum overshoots; [`Allocation::overflow`] reports by how
//! much. When every panel sits at its maximum and space is left,
//! [`Allocation::unplaced`] reports the gap. Neither case panics.

use panelkit_core::{debug, warn};

use crate::descriptor::PanelDescriptor;
use crate::state::PanelState;

/// Tolerance used by the solver when comparing pixel sums.
pub const SIZE_EPSILON: f64 = 1e-6;

/// Result of one full solve.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Allocation {
    /// Pixel length per panel, in declaration order.
    pub sizes: Vec<f64>,
    /// Space left for panels once dividers are subtracted.
    pub available: f64,
    /// How far the sizes overshoot `available` because minimums could not
    /// be met. Zero when the constraints are satisfiable.
    pub overflow: f64,
    /// Space that could not be placed because every panel is at its maximum.
    pub unplaced: f64,
}

impl Allocation {
    /// Sum of all panel sizes.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.sizes.iter().sum()
    }

    /// Whether the sizes fill `available` exactly.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.overflow <= SIZE_EPSILON && self.unplaced <= SIZE_EPSILON
    }

    #[must_use]
    pub fn into_sizes(self) -> Vec<f64> {
        self.sizes
    }
}

/// Pure panel-size solver.
///
/// Holds only configuration; [`AllocationSolver::solve`] has no side effects
/// and can be called with any container length, including zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AllocationSolver {
    divider_thickness: f64,
    snap_to_pixels: bool,
}

impl Default for AllocationSolver {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AllocationSolver {
    /// Create a solver for dividers of the given thickness.
    #[must_use]
    pub fn new(divider_thickness: f64) -> Self {
        Self {
            divider_thickness: if divider_thickness.is_finite() {
                divider_thickness.max(0.0)
            } else {
                0.0
            },
            snap_to_pixels: false,
        }
    }

    /// Round results to whole pixels, keeping the sum exact.
    #[must_use]
    pub fn snap_to_pixels(mut self, snap: bool) -> Self {
        self.snap_to_pixels = snap;
        self
    }

    #[must_use]
    pub const fn divider_thickness(&self) -> f64 {
        self.divider_thickness
    }

    /// Space left for `count` panels in a container of `container_length`.
    #[must_use]
    pub fn available_space(&self, container_length: f64, count: usize) -> f64 {
        if !container_length.is_finite() || count == 0 {
            return 0.0;
        }
        let dividers = count.saturating_sub(1) as f64 * self.divider_thickness;
        (container_length - dividers).max(0.0)
    }

    /// Solve sizes for `descriptors`.
    ///
    /// `states` supplies collapse flags and preferred sizes by index. It may
    /// be shorter than `descriptors` (or empty, for the very first solve);
    /// panels without state use their declared `initial_collapsed`.
    #[must_use]
    pub fn solve(
        &self,
        descriptors: &[PanelDescriptor],
        states: &[PanelState],
        container_length: f64,
    ) -> Allocation {
        let n = descriptors.len();
        if n == 0 {
            return Allocation::default();
        }
        if !container_length.is_finite() || container_length <= 0.0 {
            return Allocation {
                sizes: vec![0.0; n],
                ..Allocation::default()
            };
        }

        let available = self.available_space(container_length, n);
        let panels: Vec<Slot<'_>> = descriptors
            .iter()
            .enumerate()
            .map(|(i, descriptor)| Slot::new(descriptor, states.get(i)))
            .collect();

        let mut sizes = vec![0.0; n];
        let mut remaining = available;
        let mut pool = Vec::with_capacity(n);

        // Claimed panels take their size directly.
        for (i, slot) in panels.iter().enumerate() {
            if slot.collapsed {
                continue;
            }
            match slot.claim(available) {
                Some(claim) => {
                    sizes[i] = slot.descriptor.clamp(claim);
                    remaining -= sizes[i];
                }
                None => pool.push(i),
            }
        }

        // Pin flexible panels whose fair share falls below their minimum.
        loop {
            if pool.is_empty() {
                break;
            }
            let share = remaining / pool.len() as f64;
            let (pinned, rest): (Vec<usize>, Vec<usize>) = pool
                .iter()
                .partition(|&&i| panels[i].descriptor.min_size > share);
            if pinned.is_empty() {
                break;
            }
            for i in pinned {
                sizes[i] = panels[i].descriptor.min_size;
                remaining -= sizes[i];
            }
            pool = rest;
        }

        if !pool.is_empty() {
            let share = remaining / pool.len() as f64;
            for &i in &pool {
                sizes[i] = share;
            }
        }

        for (size, slot) in sizes.iter_mut().zip(&panels) {
            if !slot.collapsed {
                *size = size.min(slot.descriptor.max_bound());
            }
        }

        let residual = available - sizes.iter().sum::<f64>();
        let leftover = if residual.abs() > SIZE_EPSILON {
            distribute_residual(&mut sizes, &panels, residual)
        } else {
            0.0
        };

        for size in &mut sizes {
            *size = size.max(0.0);
        }

        if self.snap_to_pixels {
            snap_to_whole_pixels(&mut sizes, &panels);
        }

        let allocation = Allocation {
            sizes,
            available,
            overflow: (-leftover).max(0.0),
            unplaced: leftover.max(0.0),
        };

        if allocation.overflow > SIZE_EPSILON {
            warn!(
                available,
                overflow = allocation.overflow,
                panels = n,
                "panel minimums exceed available space; allocating minimums"
            );
        } else if allocation.unplaced > SIZE_EPSILON {
            warn!(
                available,
                unplaced = allocation.unplaced,
                panels = n,
                "every panel is at its maximum; space left unallocated"
            );
        }
        debug!(
            container_length,
            available,
            panels = n,
            flexible = pool.len(),
            "solved panel allocation"
        );

        allocation
    }
}

/// Solve with default options. See [`AllocationSolver::solve`].
#[must_use]
pub fn solve(
    descriptors: &[PanelDescriptor],
    states: &[PanelState],
    container_length: f64,
    divider_thickness: f64,
) -> Vec<f64> {
    AllocationSolver::new(divider_thickness)
        .solve(descriptors, states, container_length)
        .into_sizes()
}

/// One panel as the solver sees it.
#[derive(Debug, Clone, Copy)]
struct Slot<'a> {
    descriptor: &'a PanelDescriptor,
    collapsed: bool,
    preferred: Option<f64>,
}

impl<'a> Slot<'a> {
    fn new(descriptor: &'a PanelDescriptor, state: Option<&PanelState>) -> Self {
        let collapsed = state.map_or(descriptor.initial_collapsed, |s| s.is_collapsed);
        let preferred = state
            .and_then(|s| s.preferred_size)
            .filter(|size| size.is_finite());
        Self {
            descriptor,
            collapsed,
            preferred,
        }
    }

    fn claim(&self, available: f64) -> Option<f64> {
        self.preferred
            .or_else(|| self.descriptor.sizing.claim(available))
            .filter(|size| size.is_finite())
    }

    fn is_flexible(&self) -> bool {
        !self.collapsed && self.descriptor.sizing.is_flexible()
    }
}

/// Spread `residual` over absorber tiers; returns what could not be placed.
fn distribute_residual(sizes: &mut [f64], panels: &[Slot<'_>], residual: f64) -> f64 {
    let unpinned: Vec<usize> = (0..panels.len())
        .filter(|&i| panels[i].is_flexible() && panels[i].preferred.is_none())
        .collect();
    let preferred: Vec<usize> = (0..panels.len())
        .filter(|&i| panels[i].is_flexible() && panels[i].preferred.is_some())
        .collect();
    let open: Vec<usize> = (0..panels.len())
        .filter(|&i| !panels[i].collapsed)
        .collect();

    let mut residual = residual;
    for tier in [unpinned, preferred, open] {
        if residual.abs() <= SIZE_EPSILON {
            break;
        }
        residual = water_fill(sizes, panels, &tier, residual);
    }
    residual
}

/// Add `amount` (possibly negative) to `indices` in equal shares, clamping
/// each panel to its bounds and re-sharing what clamped panels refuse.
fn water_fill(sizes: &mut [f64], panels: &[Slot<'_>], indices: &[usize], amount: f64) -> f64 {
    let growing = amount > 0.0;
    let mut open: Vec<usize> = indices
        .iter()
        .copied()
        .filter(|&i| {
            let d = panels[i].descriptor;
            if growing {
                sizes[i] < d.max_bound()
            } else {
                sizes[i] > d.min_size
            }
        })
        .collect();
    let mut amount = amount;

    while amount.abs() > SIZE_EPSILON && !open.is_empty() {
        let share = amount / open.len() as f64;
        let mut still_open = Vec::with_capacity(open.len());
        for &i in &open {
            let target = sizes[i] + share;
            let clamped = panels[i].descriptor.clamp(target);
            amount -= clamped - sizes[i];
            sizes[i] = clamped;
            if clamped == target {
                still_open.push(i);
            }
        }
        if still_open.len() == open.len() {
            // Nobody saturated, so the whole share was absorbed.
            break;
        }
        open = still_open;
    }
    amount
}

/// Round to whole pixels with the largest-remainder method.
///
/// Every non-collapsed panel is floored and raised to its smallest whole
/// pixel at or above `min_size`. The pixels still missing from the rounded
/// total go one each to the panels with the largest fractional parts (lowest
/// index on ties) that have room below their maximum; surplus pixels come
/// off the smallest fractional parts first. Only when the bounds leave no
/// room are they relaxed, so the rounded total is always preserved.
fn snap_to_whole_pixels(sizes: &mut [f64], panels: &[Slot<'_>]) {
    let target = sizes.iter().sum::<f64>().round();
    let mut ranges = vec![(0.0, 0.0); sizes.len()];
    let mut order: Vec<(usize, f64)> = Vec::with_capacity(sizes.len());
    for (i, size) in sizes.iter_mut().enumerate() {
        if panels[i].collapsed {
            *size = 0.0;
            continue;
        }
        let (lo, hi) = pixel_range(panels[i].descriptor, *size);
        let snapped = size.floor().clamp(lo, hi);
        order.push((i, *size - snapped));
        ranges[i] = (lo, hi);
        *size = snapped;
    }

    let missing = target - sizes.iter().sum::<f64>();
    if missing.abs() < 0.5 {
        return;
    }
    let step = missing.signum();
    if step > 0.0 {
        order.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    } else {
        order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    }

    let mut missing = missing;
    for bounded in [true, false] {
        loop {
            let mut moved = false;
            for &(i, _) in &order {
                if missing.abs() < 0.5 {
                    return;
                }
                let next = sizes[i] + step;
                let (lo, hi) = if bounded { ranges[i] } else { (0.0, f64::INFINITY) };
                if next >= lo && next <= hi {
                    sizes[i] = next;
                    missing -= step;
                    moved = true;
                }
            }
            if !moved {
                break;
            }
        }
    }
}

/// Whole-pixel sizes a panel may take. A panel whose bounds contain no
/// whole pixel is pinned to its rounded size.
fn pixel_range(descriptor: &PanelDescriptor, size: f64) -> (f64, f64) {
    let lo = (descriptor.min_size - SIZE_EPSILON).ceil().max(0.0);
    let hi = (descriptor.max_bound() + SIZE_EPSILON).floor();
    if lo <= hi {
        (lo, hi)
    } else {
        let pinned = size.round();
        (pinned, pinned)
    }
}
