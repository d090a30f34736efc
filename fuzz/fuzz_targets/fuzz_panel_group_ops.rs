#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use panelkit_core::event::{PanelEvent, PointerEvent};
use panelkit_core::geometry::Point;
use panelkit_layout::{GroupConfig, PanelDescriptor, PanelGroup};

#[derive(Debug, Arbitrary)]
enum Op {
    Resize(u16),
    Down { divider: u8, x: i16 },
    Move(i16),
    Up(i16),
    Cancel,
    Frame,
    Toggle(u8),
    Nudge { divider: u8, delta: i8 },
}

#[derive(Debug, Arbitrary)]
struct Input {
    panel_mins: Vec<u8>,
    live_resize: bool,
    reverse: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    if input.panel_mins.is_empty() || input.panel_mins.len() > 16 || input.ops.len() > 256 {
        return;
    }
    let descriptors = input
        .panel_mins
        .iter()
        .enumerate()
        .map(|(i, &min)| {
            PanelDescriptor::flexible(format!("p{i}"))
                .min_size(f64::from(min))
                .collapsible(i % 2 == 0)
        })
        .collect();
    let config = GroupConfig::default()
        .live_resize(input.live_resize)
        .reverse(input.reverse);
    let Ok(mut group) = PanelGroup::new(config, descriptors) else {
        return;
    };

    for op in input.ops {
        let event = match op {
            Op::Resize(len) => PanelEvent::ContainerResized {
                length: f64::from(len),
            },
            Op::Down { divider, x } => PanelEvent::Pointer(PointerEvent::down(
                usize::from(divider),
                Point::new(f64::from(x), 0.0),
            )),
            Op::Move(x) => PanelEvent::Pointer(PointerEvent::moved(Point::new(f64::from(x), 0.0))),
            Op::Up(x) => PanelEvent::Pointer(PointerEvent::up(Point::new(f64::from(x), 0.0))),
            Op::Cancel => PanelEvent::Pointer(PointerEvent::cancel(Point::ORIGIN)),
            Op::Frame => PanelEvent::Frame,
            Op::Toggle(panel) => PanelEvent::ToggleCollapse {
                panel: usize::from(panel),
            },
            Op::Nudge { divider, delta } => PanelEvent::Nudge {
                divider: usize::from(divider),
                delta: f64::from(delta),
            },
        };
        // Errors are expected for out-of-order input; panics are not.
        let _ = group.handle_event(&event);

        let sizes = group.sizes();
        assert_eq!(sizes.len(), input.panel_mins.len());
        assert!(sizes.iter().all(|s| s.is_finite() && *s >= 0.0));
        for (i, size) in sizes.iter().enumerate() {
            if group.panel_state(i).is_some_and(|s| s.is_collapsed) {
                assert_eq!(*size, 0.0);
            }
        }
        if group.is_initialized() {
            let thickness = group.config().divider_thickness;
            let dividers = sizes.len().saturating_sub(1) as f64 * thickness;
            let visible = (0..sizes.len())
                .filter(|&i| group.panel_state(i).is_some_and(|s| !s.is_collapsed))
                .collect::<Vec<_>>();
            let min_total: f64 = visible.iter().map(|&i| f64::from(input.panel_mins[i])).sum();
            let length = group.container_length();
            if !visible.is_empty() && min_total + dividers <= length {
                let total = sizes.iter().sum::<f64>() + dividers;
                assert!(
                    (total - length).abs() < 1e-6 * length.max(1.0),
                    "sizes {sizes:?} do not fill container {length}"
                );
            }
        }
        if let Some(session) = group.drag_session() {
            let (a, b) = session.sizes();
            let (sa, sb) = session.snapshot();
            assert!(((a + b) - (sa + sb)).abs() < 1e-6, "pair total drifted");
        }
    }
});
