//! Integration tests for full layout runs.
//!
//! Each test builds an element tree, registers layouts with a
//! `LayoutManager` and runs it to convergence, then checks where the
//! children ended up.

use std::any::Any;

use trellis_api::{Axis, LayoutState, SizeSpec};
use trellis_layout::{
    CellLayout, ElementHost, ElementId, ElementTree, LayoutConfig, LayoutContext, LayoutError, LayoutKind,
    LayoutManager, LayoutSlot, ManagedLayout, ScrollbarBundle, VirtualScroller,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn fixed_state(width: f64, height: f64) -> LayoutState {
    LayoutState {
        width: format!("{width}px"),
        height: format!("{height}px"),
        ..LayoutState::default()
    }
}

fn add_label(host: &mut ElementTree, parent: ElementId, name: &str, width: f64, height: f64) -> ElementId {
    let id = host.add_child(parent, name);
    host.set_intrinsic_size(id, width, height);
    id
}

#[test]
fn test_nested_layouts_settle_inner_first() {
    init_tracing();
    let mut host = ElementTree::new();
    let root = host.add_root("root");
    host.set_layout_kind(root, Some(LayoutKind::Directional));
    host.set_sizes(root, SizeSpec::Fixed(400.0), SizeSpec::Fixed(300.0));

    let toolbar = host.add_child(root, "toolbar");
    host.set_layout_kind(toolbar, Some(LayoutKind::Directional));
    let ok = add_label(&mut host, toolbar, "ok", 60.0, 20.0);
    let cancel = add_label(&mut host, toolbar, "cancel", 40.0, 25.0);

    let filler = host.add_child(root, "filler");
    host.set_sizes(filler, SizeSpec::Relative(100.0), SizeSpec::Relative(100.0));

    let mut outer = CellLayout::vertical(root);
    outer.update_from_state(&fixed_state(400.0, 300.0)).unwrap();
    outer.add_or_move_child(LayoutSlot::new(toolbar), 0);
    outer.add_or_move_child(LayoutSlot::new(filler).with_expand_ratio(1.0), 1);

    let mut inner = CellLayout::horizontal(toolbar);
    inner.add_or_move_child(LayoutSlot::new(ok), 0);
    inner.add_or_move_child(LayoutSlot::new(cancel), 1);

    let mut manager = LayoutManager::default();
    manager.register_layout(Box::new(outer));
    manager.register_layout(Box::new(inner));
    manager.set_everything_needs_measure();
    let report = manager.layout_now(&mut host).unwrap();

    assert_eq!(host.outer_size(toolbar, Axis::Horizontal), 100.0);
    assert_eq!(host.outer_size(toolbar, Axis::Vertical), 25.0);
    assert_eq!(host.position(cancel, Axis::Horizontal), 60.0);
    assert_eq!(host.position(filler, Axis::Vertical), 25.0);
    assert_eq!(host.outer_size(filler, Axis::Vertical), 275.0);
    assert_eq!(host.outer_size(filler, Axis::Horizontal), 400.0);

    // The outer layout waited for the toolbar instead of running twice.
    assert_eq!(report.layout_count(root), 2);
    assert_eq!(report.layout_count(toolbar), 2);
    assert!(manager.dependency_tree().is_empty());
}

#[test]
fn test_growing_child_relayouts_parent_on_next_run() {
    init_tracing();
    let mut host = ElementTree::new();
    let root = host.add_root("root");
    host.set_layout_kind(root, Some(LayoutKind::Directional));
    host.set_sizes(root, SizeSpec::Fixed(200.0), SizeSpec::Fixed(200.0));
    let first = add_label(&mut host, root, "first", 50.0, 30.0);
    let second = add_label(&mut host, root, "second", 50.0, 30.0);

    let mut cells = CellLayout::vertical(root);
    cells.update_from_state(&fixed_state(200.0, 200.0)).unwrap();
    cells.add_or_move_child(LayoutSlot::new(first), 0);
    cells.add_or_move_child(LayoutSlot::new(second).with_expand_ratio(1.0), 1);

    let mut manager = LayoutManager::default();
    manager.register_layout(Box::new(cells));
    manager.set_everything_needs_measure();
    manager.layout_now(&mut host).unwrap();
    assert_eq!(host.position(second, Axis::Vertical), 30.0);

    host.set_intrinsic_size(first, 50.0, 70.0);
    manager.set_needs_measure(first);
    assert!(manager.is_layout_needed());
    let report = manager.layout_now(&mut host).unwrap();

    assert_eq!(host.position(second, Axis::Vertical), 70.0);
    // Only the vertical layout depends on the height.
    assert_eq!(report.layout_count(root), 1);
}

#[test]
fn test_simple_layout_runs_once_per_change() {
    let mut host = ElementTree::new();
    let root = host.add_root("root");
    host.set_layout_kind(root, Some(LayoutKind::Simple));
    host.set_sizes(root, SizeSpec::Fixed(120.0), SizeSpec::Fixed(80.0));
    let label = add_label(&mut host, root, "label", 30.0, 10.0);
    host.set_sizing(label, Axis::Horizontal, SizeSpec::Relative(50.0));

    let mut cells = CellLayout::horizontal(root);
    cells.update_from_state(&fixed_state(120.0, 80.0)).unwrap();
    cells.add_or_move_child(LayoutSlot::new(label).with_alignment(trellis_api::AlignmentInfo::MIDDLE_CENTER), 0);

    let mut manager = LayoutManager::default();
    manager.register_layout(Box::new(cells));
    manager.set_everything_needs_measure();
    let report = manager.layout_now(&mut host).unwrap();

    assert_eq!(report.layout_count(root), 1);
    // A relative-only track takes the whole row; the label gets half of it.
    assert_eq!(host.outer_size(label, Axis::Horizontal), 60.0);
    assert_eq!(host.position(label, Axis::Horizontal), 30.0);
    assert_eq!(host.position(label, Axis::Vertical), 35.0);
}

/// Grows a plain child every time it runs, so the parent never settles.
struct RunawayLayout {
    element: ElementId,
    child: ElementId,
    width: f64,
}

impl ManagedLayout for RunawayLayout {
    fn element(&self) -> ElementId {
        self.element
    }

    fn layout_horizontally(&mut self, cx: &mut LayoutContext<'_>) {
        self.width += 10.0;
        cx.host_mut().set_content_size(self.child, Axis::Horizontal, self.width);
        cx.request_measure(self.child, Axis::Horizontal);
    }

    fn layout_vertically(&mut self, _cx: &mut LayoutContext<'_>) {}

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn test_runaway_layout_reports_non_convergence() {
    init_tracing();
    let mut host = ElementTree::new();
    let root = host.add_root("root");
    host.set_layout_kind(root, Some(LayoutKind::Directional));
    host.set_sizes(root, SizeSpec::Fixed(100.0), SizeSpec::Fixed(100.0));
    let child = host.add_child(root, "child");

    let config: LayoutConfig = serde_json::from_str(r#"{ "max_passes": 5 }"#).unwrap();
    let mut manager = LayoutManager::new(config);
    manager.register_layout(Box::new(RunawayLayout {
        element: root,
        child,
        width: 0.0,
    }));
    manager.set_everything_needs_measure();

    let err = manager.layout_now(&mut host).unwrap_err();
    assert_eq!(err, LayoutError::DidNotConverge { passes: 5 });
    assert!(manager.dependency_tree().is_empty());
    assert!(manager.layout_as::<RunawayLayout>(root).is_some_and(|l| l.width > 0.0));
}

#[test]
fn test_scrollbar_follows_measured_content() {
    init_tracing();
    let mut host = ElementTree::new();
    let viewport = host.add_root("viewport");
    host.set_layout_kind(viewport, Some(LayoutKind::Directional));
    host.set_sizes(viewport, SizeSpec::Fixed(200.0), SizeSpec::Fixed(100.0));
    host.set_may_scroll_children(viewport, true);

    let content = host.add_child(viewport, "content");
    host.set_layout_kind(content, Some(LayoutKind::Directional));
    let rows: Vec<ElementId> = (0..3)
        .map(|i| add_label(&mut host, content, &format!("row-{i}"), 50.0, 60.0))
        .collect();

    let mut outer = CellLayout::vertical(viewport);
    outer.update_from_state(&fixed_state(200.0, 100.0)).unwrap();
    outer.add_or_move_child(LayoutSlot::new(content), 0);
    let mut list = CellLayout::vertical(content);
    for (i, row) in rows.iter().enumerate() {
        list.add_or_move_child(LayoutSlot::new(*row), i);
    }

    let mut manager = LayoutManager::default();
    manager.register_layout(Box::new(outer));
    manager.register_layout(Box::new(list));
    manager.set_everything_needs_measure();
    manager.layout_now(&mut host).unwrap();
    assert_eq!(host.outer_size(content, Axis::Vertical), 180.0);

    let mut bar = ScrollbarBundle::new(Axis::Vertical, VirtualScroller::new(), manager.config());
    bar.sync_from_registry(manager.registry(), content, viewport);
    assert!(bar.shows_scroll_handle());
    assert_eq!(bar.max_scroll_pos(), 80.0);
    bar.set_scroll_pos(1000.0);
    assert_eq!(bar.scroll_pos(), 80.0);
    assert!(host.describe(content).starts_with("content"));
}
