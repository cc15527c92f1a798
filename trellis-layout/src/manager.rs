//! Layout manager.
//!
//! Runs the layout phase: measures elements, runs the layouts whose inputs
//! are settled, and repeats until a pass measures nothing new. Work requested
//! between runs is queued here and seeded into a fresh dependency tree when
//! [`LayoutManager::layout_now`] starts.

use std::any::Any;

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use trellis_api::Axis;

use crate::cell_layout::CellLayout;
use crate::config::LayoutConfig;
use crate::dependency::LayoutDependencyTree;
use crate::element::{ElementHost, ElementHostMut, ElementId, LayoutKind, StyleProbe};
use crate::error::LayoutError;
use crate::measured::MeasuredRegistry;
use crate::slot::RegistryMetrics;

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// What a layout gets to work with while it runs.
pub struct LayoutContext<'a> {
    host: &'a mut dyn ElementHostMut,
    registry: &'a MeasuredRegistry,
    tree: &'a mut LayoutDependencyTree,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        host: &'a mut dyn ElementHostMut,
        registry: &'a MeasuredRegistry,
        tree: &'a mut LayoutDependencyTree,
    ) -> Self {
        Self { host, registry, tree }
    }

    pub fn host(&self) -> &dyn ElementHost {
        self.host.as_host()
    }

    pub fn host_mut(&mut self) -> &mut dyn ElementHostMut {
        &mut *self.host
    }

    pub fn registry(&self) -> &MeasuredRegistry {
        self.registry
    }

    /// Slot metrics backed by the measured registry.
    pub fn metrics(&self) -> RegistryMetrics<'_> {
        RegistryMetrics::new(self.host.as_host(), self.registry)
    }

    /// Ask for `id` to be measured again in this run.
    pub fn request_measure(&mut self, id: ElementId, axis: Axis) {
        self.tree.set_needs_measure(self.host.as_host(), id, axis, true);
    }
}

/// A layout driven by the [`LayoutManager`].
///
/// Whether it is laid out per axis or once for both axes is decided by the
/// host's [`LayoutKind`] for [`ManagedLayout::element`].
pub trait ManagedLayout: Any {
    /// The element this layout manages.
    fn element(&self) -> ElementId;

    fn layout_horizontally(&mut self, cx: &mut LayoutContext<'_>);

    fn layout_vertically(&mut self, cx: &mut LayoutContext<'_>);

    /// Lay out both axes at once. Used for [`LayoutKind::Simple`].
    fn layout(&mut self, cx: &mut LayoutContext<'_>) {
        self.layout_horizontally(cx);
        self.layout_vertically(cx);
    }

    /// Elements that are not children but whose size changes require a new
    /// layout (captions, for instance).
    fn dependencies(&self) -> Vec<ElementId> {
        Vec::new()
    }

    /// Called once after the run has converged.
    fn post_layout(&mut self, _cx: &mut LayoutContext<'_>) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Fired when a measured element changed size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementResizeEvent {
    pub element: ElementId,
    pub outer_width: f64,
    pub outer_height: f64,
}

pub type ElementResizeListener = Box<dyn FnMut(&ElementResizeEvent)>;

/// Statistics of one layout run.
#[derive(Debug, Clone, Default)]
pub struct LayoutReport {
    pub passes: usize,
    pub measured: usize,
    pub layouts_run: usize,
    pub layout_counts: FxHashMap<ElementId, usize>,
}

impl LayoutReport {
    pub fn layout_count(&self, id: ElementId) -> usize {
        self.layout_counts.get(&id).copied().unwrap_or(0)
    }
}

/// Drives measurement and layout for a view.
pub struct LayoutManager {
    config: LayoutConfig,
    tree: LayoutDependencyTree,
    registry: MeasuredRegistry,
    layouts: FxHashMap<ElementId, Box<dyn ManagedLayout>>,
    registered_dependencies: FxHashMap<ElementId, Vec<ElementId>>,
    needs_layout: [FxIndexSet<ElementId>; 2],
    needs_measure: FxIndexSet<ElementId>,
    measure_everything: bool,
    resize_listeners: FxHashMap<ElementId, Vec<ElementResizeListener>>,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutManager {
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            tree: LayoutDependencyTree::new(),
            registry: MeasuredRegistry::new(),
            layouts: FxHashMap::default(),
            registered_dependencies: FxHashMap::default(),
            needs_layout: Default::default(),
            needs_measure: FxIndexSet::default(),
            measure_everything: false,
            resize_listeners: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn registry(&self) -> &MeasuredRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut MeasuredRegistry {
        &mut self.registry
    }

    pub fn dependency_tree(&self) -> &LayoutDependencyTree {
        &self.tree
    }

    // =====================================================================
    // Registration
    // =====================================================================

    /// Register a layout. A new layout needs layout in both axes.
    pub fn register_layout(&mut self, layout: Box<dyn ManagedLayout>) -> Option<Box<dyn ManagedLayout>> {
        let id = layout.element();
        self.set_needs_layout(id);
        self.layouts.insert(id, layout)
    }

    pub fn layout(&self, id: ElementId) -> Option<&dyn ManagedLayout> {
        self.layouts.get(&id).map(|l| &**l)
    }

    /// Typed access to a registered layout.
    pub fn layout_as_mut<T: ManagedLayout>(&mut self, id: ElementId) -> Option<&mut T> {
        self.layouts
            .get_mut(&id)
            .and_then(|l| l.as_any_mut().downcast_mut::<T>())
    }

    pub fn layout_as<T: ManagedLayout>(&self, id: ElementId) -> Option<&T> {
        self.layouts.get(&id).and_then(|l| l.as_any().downcast_ref::<T>())
    }

    /// Drop everything known about `id` (view teardown).
    pub fn unregister_element(&mut self, host: &dyn ElementHost, id: ElementId) {
        self.layouts.remove(&id);
        if let Some(deps) = self.registered_dependencies.remove(&id) {
            for dep in deps {
                self.registry.unregister_dependency(dep, id);
            }
        }
        for queue in &mut self.needs_layout {
            queue.shift_remove(&id);
        }
        self.needs_measure.shift_remove(&id);
        self.resize_listeners.remove(&id);
        self.registry.remove(id);
        self.tree.forget(host, id);
    }

    pub fn add_element_resize_listener(&mut self, id: ElementId, listener: ElementResizeListener) {
        self.resize_listeners.entry(id).or_default().push(listener);
    }

    pub fn remove_element_resize_listeners(&mut self, id: ElementId) {
        self.resize_listeners.remove(&id);
    }

    // =====================================================================
    // Pending work
    // =====================================================================

    pub fn set_needs_layout(&mut self, id: ElementId) {
        self.set_needs_horizontal_layout(id);
        self.set_needs_vertical_layout(id);
    }

    pub fn set_needs_horizontal_layout(&mut self, id: ElementId) {
        self.needs_layout[Axis::Horizontal.index()].insert(id);
    }

    pub fn set_needs_vertical_layout(&mut self, id: ElementId) {
        self.needs_layout[Axis::Vertical.index()].insert(id);
    }

    pub fn set_needs_measure(&mut self, id: ElementId) {
        self.needs_measure.insert(id);
    }

    pub fn set_everything_needs_measure(&mut self) {
        self.measure_everything = true;
    }

    pub fn is_layout_needed(&self) -> bool {
        self.measure_everything
            || !self.needs_measure.is_empty()
            || self.needs_layout.iter().any(|q| !q.is_empty())
    }

    /// Re-read margins and spacing of every attached cell layout whose
    /// style changed, and queue the ones that moved for measure and layout.
    ///
    /// Returns how many layouts got new margins or spacing.
    pub fn refresh_cell_margins(&mut self, probe: &dyn StyleProbe) -> Result<usize, LayoutError> {
        let mut moved = Vec::new();
        for (id, layout) in &mut self.layouts {
            let Some(cells) = layout.as_any_mut().downcast_mut::<CellLayout>() else {
                continue;
            };
            if !cells.needs_margin_measure() || !cells.is_attached() {
                continue;
            }
            if cells.measure_margins_and_spacing(probe)? {
                moved.push(*id);
            }
        }
        for id in &moved {
            tracing::debug!("Margins or spacing of {:?} changed", id);
            self.set_needs_layout(*id);
            self.set_needs_measure(*id);
        }
        Ok(moved.len())
    }

    /// Measure everything and lay out every registered layout.
    pub fn force_layout(&mut self, host: &mut dyn ElementHostMut) -> Result<LayoutReport, LayoutError> {
        let ids: Vec<ElementId> = self.layouts.keys().copied().collect();
        for id in ids {
            self.set_needs_layout(id);
        }
        self.set_everything_needs_measure();
        self.layout_now(host)
    }

    // =====================================================================
    // Layout run
    // =====================================================================

    /// Run measurement and layout until nothing changes.
    ///
    /// Fails with [`LayoutError::DidNotConverge`] when more passes than
    /// [`LayoutConfig::max_passes`] are needed. The dependency tree is reset
    /// after every run, successful or not.
    pub fn layout_now(&mut self, host: &mut dyn ElementHostMut) -> Result<LayoutReport, LayoutError> {
        let result = self.do_layout(host);
        self.tree.clear();
        result
    }

    fn do_layout(&mut self, host: &mut dyn ElementHostMut) -> Result<LayoutReport, LayoutError> {
        let mut report = LayoutReport::default();

        self.sync_dependencies();
        self.seed(host.as_host());
        self.measure_non_components(host.as_host(), &mut report);

        loop {
            report.passes += 1;
            if report.passes > self.config.max_passes {
                tracing::error!(
                    "Aborting layout after {} passes. This would probably be an infinite loop.",
                    self.config.max_passes
                );
                return Err(LayoutError::DidNotConverge {
                    passes: self.config.max_passes,
                });
            }

            let measured = self.measure_pass(host.as_host(), &mut report);
            if measured == 0 {
                break;
            }

            while self.tree.has_horizontal_layout_targets() || self.tree.has_vertical_layout_targets() {
                for axis in Axis::BOTH {
                    for target in self.tree.layout_targets(axis) {
                        if self.tree.is_layout_target(target, axis) {
                            self.run_layout(host, target, axis, &mut report)?;
                        }
                    }
                }
            }

            tracing::debug!(
                pass = report.passes,
                measured,
                layouts = report.layouts_run,
                "layout pass done"
            );
        }

        let mut cx = LayoutContext::new(host, &self.registry, &mut self.tree);
        for layout in self.layouts.values_mut() {
            layout.post_layout(&mut cx);
        }

        tracing::debug!(
            passes = report.passes,
            measured = report.measured,
            layouts = report.layouts_run,
            "layout run converged"
        );
        Ok(report)
    }

    /// Register caption-like dependencies reported by the layouts.
    fn sync_dependencies(&mut self) {
        for (id, layout) in &self.layouts {
            let current = layout.dependencies();
            let previous = self.registered_dependencies.remove(id).unwrap_or_default();
            for old in previous.iter().filter(|d| !current.contains(d)) {
                self.registry.unregister_dependency(*old, *id);
            }
            for dep in &current {
                self.registry.register_dependency(*dep, *id);
            }
            self.registered_dependencies.insert(*id, current);
        }
    }

    fn seed(&mut self, host: &dyn ElementHost) {
        if std::mem::take(&mut self.measure_everything) {
            self.needs_measure.extend(host.elements());
        }
        for axis in Axis::BOTH {
            for id in std::mem::take(&mut self.needs_layout[axis.index()]) {
                if let Err(e) = self.tree.set_needs_layout(host, id, axis, true) {
                    tracing::warn!("Ignoring layout request: {}", e);
                }
            }
        }
        for id in std::mem::take(&mut self.needs_measure) {
            for axis in Axis::BOTH {
                self.tree.set_needs_measure(host, id, axis, true);
            }
        }
    }

    fn measure_non_components(&mut self, host: &dyn ElementHost, report: &mut LayoutReport) {
        let elements: FxIndexSet<ElementId> = self
            .registered_dependencies
            .values()
            .flatten()
            .copied()
            .collect();
        for id in elements {
            self.measure_element(host, id, report);
        }
    }

    fn measure_pass(&mut self, host: &dyn ElementHost, report: &mut LayoutReport) -> usize {
        let mut count = 0;
        let mut changed: FxIndexSet<ElementId> = FxIndexSet::default();

        while self.tree.has_connectors_to_measure() {
            let targets = self.tree.measure_targets();
            if self.config.debug_logging {
                let names: Vec<String> = targets.iter().map(|t| host.describe(*t)).collect();
                tracing::debug!("Measuring {} elements: {}", targets.len(), names.join(", "));
            }
            for &id in &targets {
                if self.measure_element(host, id, report) {
                    changed.insert(id);
                }
                count += 1;
            }
            for &id in &targets {
                for axis in Axis::BOTH {
                    self.tree.set_needs_measure(host, id, axis, false);
                }
            }
        }

        self.fire_resize_listeners(&changed);
        count
    }

    /// Measure one element and propagate a size change. Returns whether the
    /// size changed.
    fn measure_element(&mut self, host: &dyn ElementHost, id: ElementId, report: &mut LayoutReport) -> bool {
        report.measured += 1;
        let result = self.registry.measure(host, id);
        if !result.is_changed() {
            return false;
        }

        for dependent in self.registry.dependents(id) {
            for axis in Axis::BOTH {
                if result.changed(axis) {
                    if let Err(e) = self.tree.set_needs_layout(host, dependent, axis, true) {
                        tracing::warn!("Dependent of {} is not a layout: {}", host.describe(id), e);
                    }
                }
            }
        }
        if result.height_changed {
            self.tree.mark_height_as_changed(host, id);
        }
        if result.width_changed {
            self.tree.mark_width_as_changed(host, id);
        }
        true
    }

    fn fire_resize_listeners(&mut self, changed: &FxIndexSet<ElementId>) {
        for id in changed {
            let Some(listeners) = self.resize_listeners.get_mut(id) else {
                continue;
            };
            let event = ElementResizeEvent {
                element: *id,
                outer_width: self.registry.outer(*id, Axis::Horizontal),
                outer_height: self.registry.outer(*id, Axis::Vertical),
            };
            for listener in listeners.iter_mut() {
                listener(&event);
            }
        }
    }

    fn run_layout(
        &mut self,
        host: &mut dyn ElementHostMut,
        id: ElementId,
        axis: Axis,
        report: &mut LayoutReport,
    ) -> Result<(), LayoutError> {
        let kind = host.layout_kind(id);
        match kind {
            Some(LayoutKind::Simple) => {
                self.tree.mark_as_layouted(host.as_host(), id, Axis::Horizontal)?;
                self.tree.mark_as_layouted(host.as_host(), id, Axis::Vertical)?;
            }
            _ => {
                self.tree.mark_as_layouted(host.as_host(), id, axis)?;
            }
        }

        let Some(layout) = self.layouts.get_mut(&id) else {
            tracing::warn!("No layout registered for {}", host.describe(id));
            return Ok(());
        };
        if self.config.debug_logging {
            tracing::debug!("Running {} layout of {}", axis, host.describe(id));
        }

        let mut cx = LayoutContext::new(host, &self.registry, &mut self.tree);
        match (kind, axis) {
            (Some(LayoutKind::Simple), _) => layout.layout(&mut cx),
            (_, Axis::Horizontal) => layout.layout_horizontally(&mut cx),
            (_, Axis::Vertical) => layout.layout_vertically(&mut cx),
        }
        report.layouts_run += 1;
        *report.layout_counts.entry(id).or_default() += 1;
        Ok(())
    }
}
