//! Measured element registry.
//!
//! Caches the last measured outer size and box insets of each element, and
//! remembers which layouts depend on an element's size. A measurement tells
//! the caller whether the width, the height, or both changed since the
//! previous one.

use indexmap::IndexSet;
use rustc_hash::{FxBuildHasher, FxHashMap};
use trellis_api::Axis;

use crate::element::{ElementHost, ElementId};
use crate::geometry::{BoxGeometry, Insets, pixel_values_equal};

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Outcome of measuring one element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeasureResult {
    pub width_changed: bool,
    pub height_changed: bool,
}

impl MeasureResult {
    pub fn is_changed(&self) -> bool {
        self.width_changed || self.height_changed
    }

    pub fn changed(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.width_changed,
            Axis::Vertical => self.height_changed,
        }
    }
}

/// Cached size of one element.
#[derive(Debug, Clone, Default)]
pub struct MeasuredSize {
    outer_width: f64,
    outer_height: f64,
    padding: Insets,
    border: Insets,
    margin: Insets,
    measured: bool,
    dependents: FxIndexSet<ElementId>,
}

impl MeasuredSize {
    /// Store a fresh geometry and report what changed.
    ///
    /// The first measurement always reports both axes as changed.
    ///
    /// Padding and border changes count as size changes of the affected
    /// axis, since they move the content box.
    pub fn measure(&mut self, geometry: &BoxGeometry) -> MeasureResult {
        let mut result = MeasureResult {
            width_changed: !self.measured,
            height_changed: !self.measured,
        };

        if !pixel_values_equal(self.outer_width, geometry.outer_width) {
            result.width_changed = true;
        }
        if !pixel_values_equal(self.outer_height, geometry.outer_height) {
            result.height_changed = true;
        }
        for (old, new) in [(&self.padding, &geometry.padding), (&self.border, &geometry.border)] {
            if !pixel_values_equal(old.sum(Axis::Horizontal), new.sum(Axis::Horizontal))
                || !pixel_values_equal(old.left, new.left)
            {
                result.width_changed = true;
            }
            if !pixel_values_equal(old.sum(Axis::Vertical), new.sum(Axis::Vertical))
                || !pixel_values_equal(old.top, new.top)
            {
                result.height_changed = true;
            }
        }

        self.outer_width = geometry.outer_width;
        self.outer_height = geometry.outer_height;
        self.padding = geometry.padding;
        self.border = geometry.border;
        self.margin = geometry.margin;
        self.measured = true;
        result
    }

    pub fn outer_width(&self) -> f64 {
        self.outer_width
    }

    pub fn outer_height(&self) -> f64 {
        self.outer_height
    }

    pub fn outer(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.outer_width,
            Axis::Vertical => self.outer_height,
        }
    }

    /// Size of the content box along `axis`.
    pub fn inner(&self, axis: Axis) -> f64 {
        (self.outer(axis) - self.padding.sum(axis) - self.border.sum(axis)).max(0.0)
    }

    pub fn padding(&self) -> Insets {
        self.padding
    }

    pub fn border(&self) -> Insets {
        self.border
    }

    pub fn margin(&self) -> Insets {
        self.margin
    }

    pub fn dependents(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.dependents.iter().copied()
    }
}

/// Registry of measured sizes, keyed by element.
#[derive(Debug, Default)]
pub struct MeasuredRegistry {
    sizes: FxHashMap<ElementId, MeasuredSize>,
}

impl MeasuredRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Measure `id` through the host. Unrendered elements measure as empty.
    pub fn measure(&mut self, host: &dyn ElementHost, id: ElementId) -> MeasureResult {
        let geometry = host.box_geometry(id).unwrap_or_default();
        self.sizes.entry(id).or_default().measure(&geometry)
    }

    pub fn get(&self, id: ElementId) -> Option<&MeasuredSize> {
        self.sizes.get(&id)
    }

    /// Last measured outer size, zero when never measured.
    pub fn outer(&self, id: ElementId, axis: Axis) -> f64 {
        self.sizes.get(&id).map(|s| s.outer(axis)).unwrap_or(0.0)
    }

    pub fn inner(&self, id: ElementId, axis: Axis) -> f64 {
        self.sizes.get(&id).map(|s| s.inner(axis)).unwrap_or(0.0)
    }

    /// Make `dependent` re-layout whenever `element` changes size.
    pub fn register_dependency(&mut self, element: ElementId, dependent: ElementId) {
        self.sizes.entry(element).or_default().dependents.insert(dependent);
    }

    pub fn unregister_dependency(&mut self, element: ElementId, dependent: ElementId) {
        if let Some(size) = self.sizes.get_mut(&element) {
            size.dependents.shift_remove(&dependent);
        }
    }

    pub fn dependents(&self, element: ElementId) -> Vec<ElementId> {
        self.sizes
            .get(&element)
            .map(|s| s.dependents().collect())
            .unwrap_or_default()
    }

    /// Forget everything about `id`, including it as a dependent.
    pub fn remove(&mut self, id: ElementId) {
        self.sizes.remove(&id);
        for size in self.sizes.values_mut() {
            size.dependents.shift_remove(&id);
        }
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
