//! Group-level invariants over random operation sequences.
//!
//! After every step the panels plus dividers must fill the container, and
//! whenever no drag is running the last resize event a listener saw must
//! match the group's sizes.

use std::cell::RefCell;
use std::rc::Rc;

use panelkit_core::geometry::Point;
use panelkit_layout::{GroupConfig, PanelDescriptor, PanelGroup};
use proptest::prelude::*;

const THICKNESS: f64 = 4.0;

#[derive(Debug, Clone)]
enum Op {
    Resize(f64),
    Start(usize, f64),
    Move(f64),
    Frame,
    End(f64),
    Cancel,
    Toggle(usize),
    Nudge(usize, f64),
    Redeclare(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (300.0f64..2_000.0).prop_map(Op::Resize),
        (0usize..4, 0.0f64..2_000.0).prop_map(|(d, x)| Op::Start(d, x)),
        (-200.0f64..2_200.0).prop_map(Op::Move),
        Just(Op::Frame),
        (-200.0f64..2_200.0).prop_map(Op::End),
        Just(Op::Cancel),
        (0usize..4).prop_map(Op::Toggle),
        (0usize..4, -300.0f64..300.0).prop_map(|(d, delta)| Op::Nudge(d, delta)),
        (0u8..3).prop_map(Op::Redeclare),
    ]
}

/// Minimums always fit in 300px, and "main" is an unbounded sink, so every
/// solve is exact.
fn declaration(variant: u8) -> Vec<PanelDescriptor> {
    let inspector_share = if variant == 1 { 10.0 } else { 25.0 };
    let mut panels = vec![
        PanelDescriptor::fixed("nav", 200.0).min_size(40.0).collapsible(true),
        PanelDescriptor::flexible("main").min_size(50.0),
        PanelDescriptor::percentage("inspector", inspector_share)
            .min_size(30.0)
            .max_size(400.0)
            .collapsible(true),
        PanelDescriptor::flexible("console").min_size(20.0).collapsible(true),
    ];
    if variant == 2 {
        panels.swap(0, 3);
    }
    panels
}

fn apply(group: &mut PanelGroup, op: &Op) {
    let at = |x: f64| Point::new(x, 0.0);
    // Out-of-order input is rejected with an error and must not move sizes.
    let _ = match *op {
        Op::Resize(length) => {
            group.on_container_length_changed(length);
            Ok(())
        }
        Op::Start(divider, x) => group.pointer_start(divider, at(x)),
        Op::Move(x) => group.pointer_move(at(x)),
        Op::Frame => {
            group.on_frame();
            Ok(())
        }
        Op::End(x) => group.pointer_end(at(x)).map(|_| ()),
        Op::Cancel => group.pointer_cancel(),
        Op::Toggle(panel) => group.toggle_collapse(panel).map(|_| ()),
        Op::Nudge(divider, delta) => group.nudge_divider(divider, delta).map(|_| ()),
        Op::Redeclare(variant) => group.set_descriptors(declaration(variant)).map(|_| ()),
    };
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn sizes_fill_the_container_after_every_operation(
        live_resize in any::<bool>(),
        ops in proptest::collection::vec(op_strategy(), 1..60),
    ) {
        let config = GroupConfig::default()
            .divider_thickness(THICKNESS)
            .live_resize(live_resize);
        let mut group = PanelGroup::new(config, declaration(0)).expect("valid group");
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        group.subscribe(move |event| *sink.borrow_mut() = event.sizes.clone());
        group.on_container_length_changed(1_000.0);

        for op in &ops {
            apply(&mut group, op);

            let sizes = group.sizes();
            let length = group.container_length();
            let total = sizes.iter().sum::<f64>() + (sizes.len() - 1) as f64 * THICKNESS;
            prop_assert!(
                (total - length).abs() < 1e-6 * length,
                "after {:?}: {:?} sums to {} in {}", op, sizes, total, length
            );
            for (i, size) in sizes.iter().enumerate() {
                let state = group.panel_state(i).expect("initialized");
                let descriptor = &group.descriptors()[i];
                if state.is_collapsed {
                    prop_assert_eq!(*size, 0.0);
                } else {
                    prop_assert!(*size >= descriptor.min_size - 1e-6, "after {:?}: {:?}", op, sizes);
                    prop_assert!(*size <= descriptor.max_bound() + 1e-6, "after {:?}: {:?}", op, sizes);
                }
            }
            if group.dragging_divider().is_none() {
                let last_seen = seen.borrow().clone();
                prop_assert_eq!(last_seen, sizes, "listener stale after {:?}", op);
            }
        }
    }
}

#[test]
fn sub_epsilon_steps_cannot_drift_from_the_container() {
    let panels = (0..50)
        .map(|i| PanelDescriptor::flexible(format!("p{i}")))
        .collect();
    let mut group = PanelGroup::new(GroupConfig::default().divider_thickness(0.0), panels)
        .expect("valid group");
    group.on_container_length_changed(1_000.0);

    assert!(group.on_container_length_changed(1_000.4));
    let total: f64 = group.sizes().iter().sum();
    assert!((total - 1_000.4).abs() < 1e-6, "sum {total}");
}
