//! Property tests for the allocation solver.
//!
//! Random descriptor sets are generated within satisfiable bounds (minimums
//! fit, and an unbounded flexible panel exists to soak up slack) so the sum
//! invariant must hold exactly; a separate property covers arbitrary bounds.

use panelkit_layout::{AllocationSolver, PanelDescriptor, PanelState, SizingMode};
use proptest::prelude::*;

const EPS: f64 = 1e-6;

fn sizing_strategy() -> impl Strategy<Value = SizingMode> {
    prop_oneof![
        (0.0f64..400.0).prop_map(SizingMode::Fixed),
        (0.0f64..=100.0).prop_map(SizingMode::Percentage),
        Just(SizingMode::Flexible),
    ]
}

fn descriptor_strategy(index: usize) -> impl Strategy<Value = PanelDescriptor> {
    (
        sizing_strategy(),
        0.0f64..120.0,
        proptest::option::of(0.0f64..600.0),
        any::<bool>(),
    )
        .prop_map(move |(sizing, min, extra_max, collapsible)| {
            let mut d = PanelDescriptor::new(format!("p{index}"), sizing)
                .min_size(min)
                .collapsible(collapsible);
            if let Some(extra) = extra_max {
                d = d.max_size(min + extra);
            }
            d
        })
}

fn panels_strategy() -> impl Strategy<Value = Vec<PanelDescriptor>> {
    (1usize..8).prop_flat_map(|n| {
        (0..n)
            .map(descriptor_strategy)
            .collect::<Vec<_>>()
            .prop_map(|mut panels| {
                // Always keep one unbounded flexible sink.
                let sink = PanelDescriptor::flexible(format!("p{}", panels.len()));
                panels.push(sink);
                panels
            })
    })
}

fn states_for(descriptors: &[PanelDescriptor], collapse_mask: u32) -> Vec<PanelState> {
    descriptors
        .iter()
        .enumerate()
        .map(|(i, d)| PanelState {
            is_collapsed: d.collapsible && collapse_mask & (1 << i) != 0,
            ..PanelState::default()
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn sum_and_bounds_hold_when_satisfiable(
        panels in panels_strategy(),
        slack in 0.0f64..2_000.0,
        divider in 0.0f64..8.0,
        collapse_mask in any::<u32>(),
    ) {
        let states = states_for(&panels, collapse_mask);
        let min_total: f64 = panels
            .iter()
            .zip(&states)
            .filter(|(_, s)| !s.is_collapsed)
            .map(|(d, _)| d.min_size)
            .sum();
        let dividers = (panels.len() - 1) as f64 * divider;
        let container = min_total + dividers + slack;

        let allocation = AllocationSolver::new(divider).solve(&panels, &states, container);
        prop_assert!(allocation.is_exact(), "{allocation:?}");
        let total = allocation.total() + dividers;
        prop_assert!((total - container).abs() < EPS * container.max(1.0), "{total} vs {container}");

        for ((d, s), size) in panels.iter().zip(&states).zip(&allocation.sizes) {
            if s.is_collapsed {
                prop_assert_eq!(*size, 0.0);
            } else {
                prop_assert!(*size >= d.min_size - EPS, "{} below min {}", size, d.min_size);
                prop_assert!(*size <= d.max_bound() + EPS, "{} above max {}", size, d.max_bound());
            }
        }
    }

    #[test]
    fn solve_is_deterministic(
        panels in panels_strategy(),
        container in 0.0f64..3_000.0,
        collapse_mask in any::<u32>(),
    ) {
        let states = states_for(&panels, collapse_mask);
        let solver = AllocationSolver::new(4.0);
        let first = solver.solve(&panels, &states, container);
        let second = solver.solve(&panels, &states, container);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn arbitrary_containers_never_go_negative(
        panels in panels_strategy(),
        container in -100.0f64..3_000.0,
    ) {
        let allocation = AllocationSolver::new(2.0).solve(&panels, &[], container);
        prop_assert_eq!(allocation.sizes.len(), panels.len());
        prop_assert!(allocation.sizes.iter().all(|s| s.is_finite() && *s >= 0.0));
        if container <= 0.0 {
            prop_assert!(allocation.sizes.iter().all(|&s| s == 0.0));
        }
    }

    #[test]
    fn snapping_keeps_integer_totals_exact(
        panels in panels_strategy(),
        container in 1u32..4_000,
    ) {
        let container = f64::from(container);
        let allocation = AllocationSolver::new(0.0)
            .snap_to_pixels(true)
            .solve(&panels, &[], container);
        prop_assert!(allocation.sizes.iter().all(|s| s.fract() == 0.0), "{:?}", allocation.sizes);
        if allocation.is_exact() {
            prop_assert_eq!(allocation.total(), container);
        }
    }

    #[test]
    fn snapping_respects_whole_pixel_bounds(
        panels in panels_strategy(),
        slack in 0u32..2_000,
    ) {
        let min_pixels: f64 = panels.iter().map(|d| d.min_size.ceil()).sum();
        let container = min_pixels + panels.len() as f64 + f64::from(slack);
        let allocation = AllocationSolver::new(0.0)
            .snap_to_pixels(true)
            .solve(&panels, &[], container);

        prop_assert_eq!(allocation.total(), container);
        for (d, size) in panels.iter().zip(&allocation.sizes) {
            let lo = (d.min_size - EPS).ceil();
            let hi = (d.max_bound() + EPS).floor();
            if lo <= hi {
                prop_assert!(*size >= lo && *size <= hi, "{} outside [{}, {}]", size, lo, hi);
            }
        }
    }
}
