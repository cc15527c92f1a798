//! Property tests for the layout dependency tree.
//!
//! Random sequences of requests are applied to a fixed element tree. After
//! every step the queues and blocker sets must agree with the needs and the
//! size relations of the tree.

use proptest::prelude::*;
use trellis_api::{Axis, SizeSpec};
use trellis_layout::{
    DependencyState, ElementHost, ElementId, ElementTree, LayoutDependencyTree, LayoutError, LayoutKind,
};

struct Fixture {
    host: ElementTree,
    elements: Vec<ElementId>,
}

fn fixture() -> Fixture {
    let mut host = ElementTree::new();
    let root = host.add_root("root");
    host.set_layout_kind(root, Some(LayoutKind::Directional));
    host.set_sizes(root, SizeSpec::Fixed(500.0), SizeSpec::Fixed(400.0));
    host.set_may_scroll_children(root, true);

    let panel = host.add_child(root, "panel");
    host.set_layout_kind(panel, Some(LayoutKind::Directional));
    let label = host.add_child(panel, "label");
    let text = host.add_child(panel, "text");
    host.set_sizes(text, SizeSpec::Fixed(120.0), SizeSpec::Undefined);

    let filler = host.add_child(root, "filler");
    host.set_sizes(filler, SizeSpec::Relative(100.0), SizeSpec::Relative(50.0));

    let grid = host.add_child(root, "grid");
    host.set_layout_kind(grid, Some(LayoutKind::Simple));
    host.set_sizes(grid, SizeSpec::Relative(100.0), SizeSpec::Undefined);
    let cell = host.add_child(grid, "cell");
    host.set_sizes(cell, SizeSpec::Relative(50.0), SizeSpec::Fixed(30.0));

    let elements = vec![root, panel, label, text, filler, grid, cell];
    Fixture { host, elements }
}

#[derive(Debug, Clone)]
enum Op {
    NeedsMeasure(usize, Axis, bool),
    NeedsLayout(usize, Axis, bool),
    SizeChanged(usize, Axis),
    Layouted(usize, Axis),
}

fn axis() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::Horizontal), Just(Axis::Vertical)]
}

fn op() -> impl Strategy<Value = Op> {
    let element = 0..7usize;
    prop_oneof![
        (element.clone(), axis(), any::<bool>()).prop_map(|(e, a, b)| Op::NeedsMeasure(e, a, b)),
        (element.clone(), axis(), any::<bool>()).prop_map(|(e, a, b)| Op::NeedsLayout(e, a, b)),
        (element.clone(), axis()).prop_map(|(e, a)| Op::SizeChanged(e, a)),
        (element, axis()).prop_map(|(e, a)| Op::Layouted(e, a)),
    ]
}

fn apply(tree: &mut LayoutDependencyTree, f: &Fixture, op: &Op) {
    let host: &dyn ElementHost = &f.host;
    match *op {
        Op::NeedsMeasure(e, axis, needs) => tree.set_needs_measure(host, f.elements[e], axis, needs),
        Op::NeedsLayout(e, axis, needs) => {
            let id = f.elements[e];
            let result = tree.set_needs_layout(host, id, axis, needs);
            if host.is_managed_layout(id) {
                assert!(result.is_ok());
            } else {
                assert!(matches!(result, Err(LayoutError::NotALayout(_))));
            }
        }
        Op::SizeChanged(e, axis) => tree.mark_size_as_changed(host, f.elements[e], axis),
        Op::Layouted(e, axis) => {
            let id = f.elements[e];
            if host.is_managed_layout(id) {
                let _ = tree.mark_as_layouted(host, id, axis);
            }
        }
    }
}

fn state(tree: &LayoutDependencyTree, id: ElementId, axis: Axis) -> DependencyState {
    tree.dependency_state(id, axis).unwrap_or(DependencyState {
        needs_layout: false,
        needs_measure: false,
        in_layout_queue: false,
        in_measure_queue: false,
        layout_blockers: Vec::new(),
        measure_blockers: Vec::new(),
    })
}

fn check_invariants(tree: &LayoutDependencyTree, f: &Fixture) -> Result<(), TestCaseError> {
    let host: &dyn ElementHost = &f.host;
    for axis in Axis::BOTH {
        for &id in &f.elements {
            let s = state(tree, id, axis);
            prop_assert_eq!(
                s.in_measure_queue,
                s.needs_measure && s.measure_blockers.is_empty(),
                "measure queue of {} ({})",
                host.describe(id),
                axis
            );
            prop_assert_eq!(
                s.in_layout_queue,
                s.needs_layout && s.layout_blockers.is_empty(),
                "layout queue of {} ({})",
                host.describe(id),
                axis
            );
            prop_assert_eq!(
                tree.is_layout_target(id, axis),
                s.in_layout_queue
            );
        }

        for &blocker in &f.elements {
            let b = state(tree, blocker, axis);
            let may_resize = b.needs_measure || !b.measure_blockers.is_empty();
            let may_layout = b.needs_layout || !b.layout_blockers.is_empty();
            let readers = LayoutDependencyTree::needs_size_for_layout(host, blocker, axis);
            let resized = LayoutDependencyTree::resized_by_layout(host, blocker, axis);

            for &dependent in &f.elements {
                let d = state(tree, dependent, axis);
                prop_assert_eq!(
                    d.layout_blockers.contains(&blocker),
                    readers.contains(&dependent) && may_resize,
                    "{} blocking layout of {} ({})",
                    host.describe(blocker),
                    host.describe(dependent),
                    axis
                );
                prop_assert_eq!(
                    d.measure_blockers.contains(&blocker),
                    resized.contains(&dependent) && may_layout,
                    "{} blocking measure of {} ({})",
                    host.describe(blocker),
                    host.describe(dependent),
                    axis
                );
            }
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn queues_and_blockers_stay_consistent(ops in prop::collection::vec(op(), 1..60)) {
        let f = fixture();
        let mut tree = LayoutDependencyTree::new();
        for op in &ops {
            apply(&mut tree, &f, op);
            check_invariants(&tree, &f)?;
        }
    }

    #[test]
    fn draining_the_queues_always_terminates(ops in prop::collection::vec(op(), 1..40)) {
        let f = fixture();
        let host: &dyn ElementHost = &f.host;
        let mut tree = LayoutDependencyTree::new();
        for op in &ops {
            apply(&mut tree, &f, op);
        }

        // Measure everything measurable, then lay out everything ready,
        // the way the layout manager does, without any size changes.
        let mut rounds = 0;
        while tree.has_connectors_to_measure()
            || tree.has_horizontal_layout_targets()
            || tree.has_vertical_layout_targets()
        {
            rounds += 1;
            prop_assert!(rounds < 100, "queues never drained");
            for id in tree.measure_targets() {
                for axis in Axis::BOTH {
                    tree.set_needs_measure(host, id, axis, false);
                }
            }
            for axis in Axis::BOTH {
                for id in tree.layout_targets(axis) {
                    if tree.is_layout_target(id, axis) {
                        tree.mark_as_layouted(host, id, axis).map_err(|e| TestCaseError::fail(e.to_string()))?;
                    }
                }
            }
            check_invariants(&tree, &f)?;
        }
        for &id in &f.elements {
            prop_assert!(tree.no_more_changes_expected(id), "{} still pending", host.describe(id));
        }
    }
}
