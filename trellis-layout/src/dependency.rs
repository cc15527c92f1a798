//! Layout dependency tree.
//!
//! Tracks, per element and axis, whether the element needs to be measured
//! or laid out, and which other elements must finish first. Elements whose
//! needs are unblocked sit in a measure queue or a layout queue; the layout
//! manager drains those queues until nothing is left.
//!
//! Two relations drive the propagation:
//!
//! - `needs_size_for_layout(e)`: the layouts that read `e`'s size. That is
//!   `e` itself when it is not sized by content, plus its parent unless `e`
//!   is relatively sized.
//! - `resized_by_layout(e)`: the elements whose size `e`'s layout decides.
//!   That is `e` itself when it is sized by content, plus its relatively
//!   sized children.
//!
//! A pending measure of `e` blocks the layout of everything in
//! `needs_size_for_layout(e)`; a pending layout of `e` blocks the measure of
//! everything in `resized_by_layout(e)`. Blockers are added when the first
//! potential change appears and removed when no change can come anymore, so
//! an element is queued exactly when it has a need and no blockers.

use std::fmt::Write as _;

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use trellis_api::Axis;

use crate::element::{ElementHost, ElementId};
use crate::error::LayoutError;

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

#[derive(Debug, Default, Clone)]
struct LayoutDependency {
    needs_layout: bool,
    needs_measure: bool,
    measure_blockers: FxIndexSet<ElementId>,
    layout_blockers: FxIndexSet<ElementId>,
    /// Cached nearest scrolling boundary. Only kept on the horizontal entry.
    scrolling_boundary: Option<Option<ElementId>>,
}

impl LayoutDependency {
    fn no_more_changes_expected(&self) -> bool {
        !self.needs_layout
            && !self.needs_measure
            && self.layout_blockers.is_empty()
            && self.measure_blockers.is_empty()
    }
}

/// Read-only view of one element's dependency state along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyState {
    pub needs_layout: bool,
    pub needs_measure: bool,
    pub in_layout_queue: bool,
    pub in_measure_queue: bool,
    pub layout_blockers: Vec<ElementId>,
    pub measure_blockers: Vec<ElementId>,
}

/// Per-axis measure and layout bookkeeping for a set of elements.
#[derive(Debug, Default)]
pub struct LayoutDependencyTree {
    dependencies: [FxHashMap<ElementId, LayoutDependency>; 2],
    measure_queues: [FxIndexSet<ElementId>; 2],
    layout_queues: [FxIndexSet<ElementId>; 2],
}

impl LayoutDependencyTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn dependency(&mut self, id: ElementId, axis: Axis) -> &mut LayoutDependency {
        self.dependencies[axis.index()].entry(id).or_default()
    }

    // =====================================================================
    // Needs
    // =====================================================================

    /// Request or withdraw a measurement of `id` along `axis`.
    ///
    /// Withdrawing is ignored while the measurement is blocked: the element
    /// is measured in both axes anyway once it becomes unblocked.
    pub fn set_needs_measure(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis, needs: bool) {
        let i = axis.index();
        let dep = self.dependency(id, axis);
        if needs {
            if dep.needs_measure {
                return;
            }
            dep.needs_measure = true;
            if dep.measure_blockers.is_empty() {
                self.measure_queues[i].insert(id);
                self.propagate_potential_resize(host, id, axis);
            }
        } else {
            if !dep.needs_measure || !dep.measure_blockers.is_empty() {
                return;
            }
            dep.needs_measure = false;
            self.measure_queues[i].shift_remove(&id);
            self.propagate_no_upcoming_resize(host, id, axis);
        }
    }

    /// Request or withdraw a layout of `id` along `axis`.
    ///
    /// Only managed layouts can need layout.
    pub fn set_needs_layout(
        &mut self,
        host: &dyn ElementHost,
        id: ElementId,
        axis: Axis,
        needs: bool,
    ) -> Result<(), LayoutError> {
        if !host.is_managed_layout(id) {
            return Err(LayoutError::NotALayout(host.describe(id)));
        }
        self.update_needs_layout(host, id, axis, needs);
        Ok(())
    }

    fn update_needs_layout(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis, needs: bool) {
        let i = axis.index();
        let dep = self.dependency(id, axis);
        if needs {
            if dep.needs_layout {
                return;
            }
            dep.needs_layout = true;
            if dep.layout_blockers.is_empty() {
                self.layout_queues[i].insert(id);
                self.propagate_potential_layout(host, id, axis);
            }
        } else {
            if !dep.needs_layout || !dep.layout_blockers.is_empty() {
                return;
            }
            dep.needs_layout = false;
            self.layout_queues[i].shift_remove(&id);
            self.propagate_no_upcoming_layout(host, id, axis);
        }
    }

    /// Record that `id` changed size along `axis`.
    ///
    /// Layouts that read the size are scheduled for layout, other readers
    /// remeasure whatever they size. The nearest scrolling boundary is
    /// remeasured in the opposite axis since a scrollbar may have appeared
    /// or vanished.
    pub fn mark_size_as_changed(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis) {
        for target in Self::needs_size_for_layout(host, id, axis) {
            if host.is_managed_layout(target) {
                self.update_needs_layout(host, target, axis, true);
            } else {
                self.propagate_post_layout_measure(host, target, axis);
            }
        }

        if let Some(boundary) = self.scrolling_boundary(host, id) {
            self.set_needs_measure(host, boundary, axis.opposite(), true);
        }
    }

    pub fn mark_width_as_changed(&mut self, host: &dyn ElementHost, id: ElementId) {
        self.mark_size_as_changed(host, id, Axis::Horizontal);
    }

    pub fn mark_height_as_changed(&mut self, host: &dyn ElementHost, id: ElementId) {
        self.mark_size_as_changed(host, id, Axis::Vertical);
    }

    /// Record that the layout of `id` along `axis` has run.
    ///
    /// Returns `Ok(false)` without changing anything while the layout still
    /// has blockers. A simple layout laid out in both axes at once must be
    /// marked for each axis by the caller.
    pub fn mark_as_layouted(
        &mut self,
        host: &dyn ElementHost,
        id: ElementId,
        axis: Axis,
    ) -> Result<bool, LayoutError> {
        let blocked = self.dependencies[axis.index()]
            .get(&id)
            .is_some_and(|d| !d.layout_blockers.is_empty());
        if blocked {
            return Ok(false);
        }
        self.set_needs_layout(host, id, axis, false)?;
        self.propagate_post_layout_measure(host, id, axis);
        Ok(true)
    }

    pub fn mark_as_horizontally_layouted(&mut self, host: &dyn ElementHost, id: ElementId) -> Result<bool, LayoutError> {
        self.mark_as_layouted(host, id, Axis::Horizontal)
    }

    pub fn mark_as_vertically_layouted(&mut self, host: &dyn ElementHost, id: ElementId) -> Result<bool, LayoutError> {
        self.mark_as_layouted(host, id, Axis::Vertical)
    }

    // =====================================================================
    // Propagation
    // =====================================================================

    fn propagate_potential_resize(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis) {
        for target in Self::needs_size_for_layout(host, id, axis) {
            self.add_layout_blocker(host, target, axis, id);
        }
    }

    fn propagate_no_upcoming_resize(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis) {
        for target in Self::needs_size_for_layout(host, id, axis) {
            self.remove_layout_blocker(host, target, axis, id);
        }
    }

    fn propagate_potential_layout(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis) {
        for target in Self::resized_by_layout(host, id, axis) {
            self.add_measure_blocker(host, target, axis, id);
        }
    }

    fn propagate_no_upcoming_layout(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis) {
        for target in Self::resized_by_layout(host, id, axis) {
            self.remove_measure_blocker(host, target, axis, id);
        }
    }

    fn propagate_post_layout_measure(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis) {
        for target in Self::resized_by_layout(host, id, axis) {
            self.set_needs_measure(host, target, axis, true);
        }

        // Content with a set width and free height (wrapping text) may
        // change height when its width changes.
        if axis == Axis::Horizontal
            && !host.is_undefined(id, Axis::Horizontal)
            && host.is_undefined(id, Axis::Vertical)
        {
            self.set_needs_measure(host, id, Axis::Vertical, true);
        }
    }

    fn add_measure_blocker(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis, blocker: ElementId) {
        let dep = self.dependency(id, axis);
        if !dep.measure_blockers.insert(blocker) || dep.measure_blockers.len() != 1 {
            return;
        }
        if dep.needs_measure {
            self.measure_queues[axis.index()].shift_remove(&id);
        } else {
            self.propagate_potential_resize(host, id, axis);
        }
    }

    fn remove_measure_blocker(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis, blocker: ElementId) {
        let Some(dep) = self.dependencies[axis.index()].get_mut(&id) else {
            return;
        };
        if !dep.measure_blockers.shift_remove(&blocker) || !dep.measure_blockers.is_empty() {
            return;
        }
        if dep.needs_measure {
            self.measure_queues[axis.index()].insert(id);
        } else {
            self.propagate_no_upcoming_resize(host, id, axis);
        }
    }

    fn add_layout_blocker(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis, blocker: ElementId) {
        let dep = self.dependency(id, axis);
        if !dep.layout_blockers.insert(blocker) || dep.layout_blockers.len() != 1 {
            return;
        }
        if dep.needs_layout {
            self.layout_queues[axis.index()].shift_remove(&id);
        } else {
            self.propagate_potential_layout(host, id, axis);
        }
    }

    fn remove_layout_blocker(&mut self, host: &dyn ElementHost, id: ElementId, axis: Axis, blocker: ElementId) {
        let Some(dep) = self.dependencies[axis.index()].get_mut(&id) else {
            return;
        };
        if !dep.layout_blockers.shift_remove(&blocker) || !dep.layout_blockers.is_empty() {
            return;
        }
        if dep.needs_layout {
            self.layout_queues[axis.index()].insert(id);
        } else {
            self.propagate_no_upcoming_layout(host, id, axis);
        }
    }

    // =====================================================================
    // Relations
    // =====================================================================

    /// Layouts that need the size of `id` along `axis`.
    pub fn needs_size_for_layout(host: &dyn ElementHost, id: ElementId, axis: Axis) -> Vec<ElementId> {
        let mut targets = Vec::with_capacity(2);
        if !host.is_undefined(id, axis) {
            targets.push(id);
        }
        if !host.is_relative(id, axis) {
            if let Some(parent) = host.parent(id) {
                targets.push(parent);
            }
        }
        targets
    }

    /// Elements whose size along `axis` is decided by the layout of `id`.
    pub fn resized_by_layout(host: &dyn ElementHost, id: ElementId, axis: Axis) -> Vec<ElementId> {
        let mut resized = Vec::new();
        if host.is_undefined(id, axis) {
            resized.push(id);
        }
        resized.extend(
            host.children(id)
                .into_iter()
                .filter(|child| host.is_relative(*child, axis)),
        );
        resized
    }

    /// Nearest ancestor-or-self whose parent may scroll its children.
    pub fn scrolling_boundary(&mut self, host: &dyn ElementHost, id: ElementId) -> Option<ElementId> {
        if let Some(cached) = self.dependency(id, Axis::Horizontal).scrolling_boundary {
            return cached;
        }
        let boundary = match host.parent(id) {
            Some(parent) if host.may_scroll_children(parent) => Some(id),
            Some(parent) => self.scrolling_boundary(host, parent),
            None => None,
        };
        self.dependency(id, Axis::Horizontal).scrolling_boundary = Some(boundary);
        boundary
    }

    // =====================================================================
    // Queues
    // =====================================================================

    pub fn has_connectors_to_measure(&self) -> bool {
        self.measure_queues.iter().any(|q| !q.is_empty())
    }

    pub fn has_layout_targets(&self, axis: Axis) -> bool {
        !self.layout_queues[axis.index()].is_empty()
    }

    pub fn has_horizontal_layout_targets(&self) -> bool {
        self.has_layout_targets(Axis::Horizontal)
    }

    pub fn has_vertical_layout_targets(&self) -> bool {
        self.has_layout_targets(Axis::Vertical)
    }

    pub fn is_layout_target(&self, id: ElementId, axis: Axis) -> bool {
        self.layout_queues[axis.index()].contains(&id)
    }

    /// Layouts that are ready to run along `axis`.
    pub fn layout_targets(&self, axis: Axis) -> Vec<ElementId> {
        self.layout_queues[axis.index()].iter().copied().collect()
    }

    /// Elements ready to be measured in either axis, without duplicates.
    pub fn measure_targets(&self) -> Vec<ElementId> {
        let mut targets: FxIndexSet<ElementId> = self.measure_queues[0].clone();
        targets.extend(self.measure_queues[1].iter().copied());
        targets.into_iter().collect()
    }

    // =====================================================================
    // Diagnostics and teardown
    // =====================================================================

    /// True when `id` has no needs and no blockers in either axis.
    pub fn no_more_changes_expected(&self, id: ElementId) -> bool {
        self.dependencies
            .iter()
            .all(|deps| deps.get(&id).is_none_or(|d| d.no_more_changes_expected()))
    }

    pub fn dependency_state(&self, id: ElementId, axis: Axis) -> Option<DependencyState> {
        let i = axis.index();
        let dep = self.dependencies[i].get(&id)?;
        Some(DependencyState {
            needs_layout: dep.needs_layout,
            needs_measure: dep.needs_measure,
            in_layout_queue: self.layout_queues[i].contains(&id),
            in_measure_queue: self.measure_queues[i].contains(&id),
            layout_blockers: dep.layout_blockers.iter().copied().collect(),
            measure_blockers: dep.measure_blockers.iter().copied().collect(),
        })
    }

    /// Human readable status of `id` along `axis`.
    pub fn describe_dependency(&self, host: &dyn ElementHost, id: ElementId, axis: Axis) -> String {
        let i = axis.index();
        let blockers_to_string = |blockers: &FxIndexSet<ElementId>| {
            let names: Vec<String> = blockers.iter().map(|b| host.describe(*b)).collect();
            format!("[{}]", names.join(", "))
        };
        let empty = LayoutDependency::default();
        let dep = self.dependencies[i].get(&id).unwrap_or(&empty);

        let mut s = String::new();
        let _ = writeln!(s, "{}", host.describe(id));
        let _ = writeln!(s, "{axis} sizing: {}", host.sizing(id, axis).kind_label());
        if dep.needs_layout {
            s.push_str("Needs layout\n");
        }
        if self.layout_queues[i].contains(&id) {
            s.push_str("In layout queue\n");
        }
        let _ = writeln!(s, "Layout blockers: {}", blockers_to_string(&dep.layout_blockers));
        if dep.needs_measure {
            s.push_str("Needs measure\n");
        }
        if self.measure_queues[i].contains(&id) {
            s.push_str("In measure queue\n");
        }
        let _ = write!(s, "Measure blockers: {}", blockers_to_string(&dep.measure_blockers));
        s
    }

    pub fn log_dependency_status(&self, host: &dyn ElementHost, id: ElementId) {
        tracing::info!("====");
        for axis in Axis::BOTH {
            tracing::info!("{}", self.describe_dependency(host, id, axis));
        }
    }

    /// Drop all state of `id`. Elements it was blocking are released.
    pub fn forget(&mut self, host: &dyn ElementHost, id: ElementId) {
        for axis in Axis::BOTH {
            let i = axis.index();
            self.dependencies[i].remove(&id);
            self.measure_queues[i].shift_remove(&id);
            self.layout_queues[i].shift_remove(&id);

            let measure_blocked: Vec<ElementId> = self.dependencies[i]
                .iter()
                .filter(|(_, d)| d.measure_blockers.contains(&id))
                .map(|(other, _)| *other)
                .collect();
            for other in measure_blocked {
                self.remove_measure_blocker(host, other, axis, id);
            }
            let layout_blocked: Vec<ElementId> = self.dependencies[i]
                .iter()
                .filter(|(_, d)| d.layout_blockers.contains(&id))
                .map(|(other, _)| *other)
                .collect();
            for other in layout_blocked {
                self.remove_layout_blocker(host, other, axis, id);
            }
        }
        for deps in &mut self.dependencies {
            for dep in deps.values_mut() {
                if dep.scrolling_boundary == Some(Some(id)) {
                    dep.scrolling_boundary = None;
                }
            }
        }
    }

    pub fn clear(&mut self) {
        for i in 0..2 {
            self.dependencies[i].clear();
            self.measure_queues[i].clear();
            self.layout_queues[i].clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.iter().all(|d| d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::LayoutKind;
    use crate::element_tree::ElementTree;
    use trellis_api::SizeSpec;

    fn state(tree: &LayoutDependencyTree, id: ElementId, axis: Axis) -> DependencyState {
        tree.dependency_state(id, axis).expect("dependency exists")
    }

    /// Layout `parent` (content sized) with one relatively sized child.
    fn relative_child_fixture() -> (ElementTree, ElementId, ElementId) {
        let mut host = ElementTree::new();
        let parent = host.add_root("parent");
        host.set_layout_kind(parent, Some(LayoutKind::Directional));
        host.set_sizes(parent, SizeSpec::Fixed(200.0), SizeSpec::Undefined);
        let child = host.add_child(parent, "child");
        host.set_sizes(child, SizeSpec::Fixed(50.0), SizeSpec::Relative(100.0));
        (host, parent, child)
    }

    #[test]
    fn test_relative_child_waits_for_parent_layout() {
        let (host, parent, child) = relative_child_fixture();
        let mut tree = LayoutDependencyTree::new();

        tree.set_needs_layout(&host, parent, Axis::Vertical, true).unwrap();
        assert!(tree.layout_targets(Axis::Vertical).contains(&parent));
        assert_eq!(state(&tree, child, Axis::Vertical).measure_blockers, vec![parent]);

        tree.set_needs_measure(&host, child, Axis::Vertical, true);
        assert!(!state(&tree, child, Axis::Vertical).in_measure_queue);

        assert!(tree.mark_as_layouted(&host, parent, Axis::Vertical).unwrap());
        let child_state = state(&tree, child, Axis::Vertical);
        assert!(child_state.needs_measure);
        assert!(child_state.in_measure_queue);
        assert!(child_state.measure_blockers.is_empty());
        // Content sized parent remeasures itself after layout.
        assert!(state(&tree, parent, Axis::Vertical).in_measure_queue);
    }

    #[test]
    fn test_measure_blocks_parent_layout_until_withdrawn() {
        let mut host = ElementTree::new();
        let parent = host.add_root("parent");
        host.set_layout_kind(parent, Some(LayoutKind::Directional));
        host.set_sizes(parent, SizeSpec::Fixed(200.0), SizeSpec::Fixed(100.0));
        let child = host.add_child(parent, "child");

        let mut tree = LayoutDependencyTree::new();
        tree.set_needs_measure(&host, child, Axis::Horizontal, true);
        tree.set_needs_layout(&host, parent, Axis::Horizontal, true).unwrap();
        assert!(!tree.has_layout_targets(Axis::Horizontal));
        assert_eq!(state(&tree, parent, Axis::Horizontal).layout_blockers, vec![child]);

        tree.set_needs_measure(&host, child, Axis::Horizontal, false);
        assert_eq!(tree.layout_targets(Axis::Horizontal), vec![parent]);
    }

    #[test]
    fn test_mark_as_layouted_is_noop_while_blocked() {
        let mut host = ElementTree::new();
        let parent = host.add_root("parent");
        host.set_layout_kind(parent, Some(LayoutKind::Directional));
        let child = host.add_child(parent, "child");

        let mut tree = LayoutDependencyTree::new();
        tree.set_needs_measure(&host, child, Axis::Vertical, true);
        tree.set_needs_layout(&host, parent, Axis::Vertical, true).unwrap();
        let before = state(&tree, parent, Axis::Vertical);

        assert!(!tree.mark_as_layouted(&host, parent, Axis::Vertical).unwrap());
        assert_eq!(state(&tree, parent, Axis::Vertical), before);
        assert!(before.needs_layout);
    }

    #[test]
    fn test_non_layout_cannot_need_layout() {
        let mut host = ElementTree::new();
        let label = host.add_root("label");
        let mut tree = LayoutDependencyTree::new();
        let err = tree.set_needs_layout(&host, label, Axis::Horizontal, true).unwrap_err();
        assert!(matches!(err, LayoutError::NotALayout(_)));
    }

    #[test]
    fn test_size_change_under_plain_container_requests_measure() {
        let mut host = ElementTree::new();
        let panel = host.add_root("panel");
        let child = host.add_child(panel, "child");
        host.set_sizes(child, SizeSpec::Fixed(80.0), SizeSpec::Fixed(20.0));

        let mut tree = LayoutDependencyTree::new();
        tree.mark_size_as_changed(&host, child, Axis::Horizontal);

        let panel_state = state(&tree, panel, Axis::Horizontal);
        assert!(panel_state.needs_measure);
        assert!(panel_state.in_measure_queue);
    }

    #[test]
    fn test_size_change_schedules_parent_layout() {
        let (mut host, parent, _) = relative_child_fixture();
        let other = host.add_child(parent, "other");
        let mut tree = LayoutDependencyTree::new();
        tree.mark_size_as_changed(&host, other, Axis::Vertical);
        assert_eq!(tree.layout_targets(Axis::Vertical), vec![parent]);
    }

    #[test]
    fn test_scrolling_boundary_remeasured_in_opposite_axis() {
        let mut host = ElementTree::new();
        let window = host.add_root("window");
        host.set_may_scroll_children(window, true);
        let content = host.add_child(window, "content");
        let leaf = host.add_child(content, "leaf");
        host.set_sizes(leaf, SizeSpec::Fixed(10.0), SizeSpec::Fixed(10.0));

        let mut tree = LayoutDependencyTree::new();
        assert_eq!(tree.scrolling_boundary(&host, leaf), Some(content));
        assert_eq!(tree.scrolling_boundary(&host, window), None);

        tree.mark_size_as_changed(&host, leaf, Axis::Vertical);
        assert!(state(&tree, content, Axis::Horizontal).needs_measure);
    }

    #[test]
    fn test_horizontal_layout_remeasures_wrapping_content_height() {
        let mut host = ElementTree::new();
        let text = host.add_root("text");
        host.set_layout_kind(text, Some(LayoutKind::Directional));
        host.set_sizes(text, SizeSpec::Fixed(120.0), SizeSpec::Undefined);

        let mut tree = LayoutDependencyTree::new();
        tree.set_needs_layout(&host, text, Axis::Horizontal, true).unwrap();
        assert!(tree.mark_as_layouted(&host, text, Axis::Horizontal).unwrap());
        assert!(state(&tree, text, Axis::Vertical).in_measure_queue);
        assert!(tree.dependency_state(text, Axis::Horizontal).is_some_and(|s| !s.needs_measure));
    }

    #[test]
    fn test_measure_targets_are_union_of_axes() {
        let mut host = ElementTree::new();
        let a = host.add_root("a");
        let b = host.add_root("b");
        let mut tree = LayoutDependencyTree::new();
        tree.set_needs_measure(&host, a, Axis::Horizontal, true);
        tree.set_needs_measure(&host, a, Axis::Vertical, true);
        tree.set_needs_measure(&host, b, Axis::Vertical, true);
        let targets = tree.measure_targets();
        assert_eq!(targets.len(), 2);
        assert!(targets.contains(&a) && targets.contains(&b));
    }

    #[test]
    fn test_no_more_changes_expected() {
        let (host, parent, child) = relative_child_fixture();
        let mut tree = LayoutDependencyTree::new();
        assert!(tree.no_more_changes_expected(child));
        tree.set_needs_layout(&host, parent, Axis::Vertical, true).unwrap();
        assert!(!tree.no_more_changes_expected(child));
        tree.mark_as_layouted(&host, parent, Axis::Vertical).unwrap();
        tree.set_needs_measure(&host, child, Axis::Vertical, false);
        assert!(tree.no_more_changes_expected(child));
    }

    #[test]
    fn test_describe_dependency_lists_status() {
        let (host, parent, child) = relative_child_fixture();
        let mut tree = LayoutDependencyTree::new();
        tree.set_needs_layout(&host, parent, Axis::Vertical, true).unwrap();

        let text = tree.describe_dependency(&host, child, Axis::Vertical);
        assert!(text.contains("Vertical sizing: relative"));
        // A pending measure of a relative child only blocks its own layout.
        assert!(text.contains(&format!("Layout blockers: [{}]", host.describe(child))));
        assert!(text.contains(&format!("Measure blockers: [{}]", host.describe(parent))));

        let text = tree.describe_dependency(&host, parent, Axis::Vertical);
        assert!(text.contains("Needs layout\nIn layout queue\n"));
    }

    #[test]
    fn test_forget_releases_blocked_elements() {
        let mut host = ElementTree::new();
        let parent = host.add_root("parent");
        host.set_layout_kind(parent, Some(LayoutKind::Directional));
        host.set_sizes(parent, SizeSpec::Fixed(100.0), SizeSpec::Fixed(100.0));
        let child = host.add_child(parent, "child");

        let mut tree = LayoutDependencyTree::new();
        tree.set_needs_measure(&host, child, Axis::Horizontal, true);
        tree.set_needs_layout(&host, parent, Axis::Horizontal, true).unwrap();
        assert!(!tree.has_layout_targets(Axis::Horizontal));

        tree.forget(&host, child);
        assert_eq!(tree.layout_targets(Axis::Horizontal), vec![parent]);
        assert!(tree.dependency_state(child, Axis::Horizontal).is_none());
        assert!(!tree.has_connectors_to_measure());

        tree.clear();
        assert!(tree.is_empty());
    }
}
