#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use panelkit_layout::{AllocationSolver, PanelDescriptor, PanelState, SizingMode, validate_descriptors};

#[derive(Debug, Arbitrary)]
enum Sizing {
    Fixed(u16),
    Percentage(u8),
    Flexible,
}

#[derive(Debug, Arbitrary)]
struct Panel {
    sizing: Sizing,
    min: u16,
    max_extra: Option<u16>,
    collapsed: bool,
    preferred: Option<u16>,
}

#[derive(Debug, Arbitrary)]
struct Input {
    panels: Vec<Panel>,
    container: i32,
    divider: u8,
    snap: bool,
}

fuzz_target!(|input: Input| {
    if input.panels.len() > 64 {
        return;
    }
    let descriptors: Vec<PanelDescriptor> = input
        .panels
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let sizing = match p.sizing {
                Sizing::Fixed(px) => SizingMode::Fixed(f64::from(px)),
                Sizing::Percentage(pct) => SizingMode::Percentage(f64::from(pct.min(100))),
                Sizing::Flexible => SizingMode::Flexible,
            };
            let mut d = PanelDescriptor::new(format!("p{i}"), sizing)
                .min_size(f64::from(p.min))
                .collapsible(true);
            if let Some(extra) = p.max_extra {
                d = d.max_size(f64::from(p.min) + f64::from(extra));
            }
            d
        })
        .collect();
    assert!(validate_descriptors(&descriptors).is_ok());

    let states: Vec<PanelState> = input
        .panels
        .iter()
        .map(|p| PanelState {
            is_collapsed: p.collapsed,
            preferred_size: p.preferred.map(f64::from),
            ..PanelState::default()
        })
        .collect();

    let container = f64::from(input.container);
    let divider = f64::from(input.divider);
    let solver = AllocationSolver::new(divider).snap_to_pixels(input.snap);
    let allocation = solver.solve(&descriptors, &states, container);

    assert_eq!(allocation.sizes.len(), descriptors.len());
    assert!(allocation.sizes.iter().all(|s| s.is_finite() && *s >= 0.0));
    assert_eq!(allocation, solver.solve(&descriptors, &states, container));

    for ((d, s), size) in descriptors.iter().zip(&states).zip(&allocation.sizes) {
        if s.is_collapsed {
            assert_eq!(*size, 0.0, "collapsed panel received space");
        }
        if !input.snap && container > 0.0 && !s.is_collapsed {
            assert!(*size <= d.max_bound() + 1e-6, "max violated: {size} > {}", d.max_bound());
        }
    }

    if allocation.is_exact() && !input.snap && !descriptors.is_empty() {
        let gap = (allocation.total() - allocation.available).abs();
        assert!(gap < 1e-6 * allocation.available.max(1.0), "sum drifted by {gap}");
    }
});
