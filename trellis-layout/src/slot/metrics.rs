//! Size sources for slot positioning.
//!
//! A slot can read child sizes straight from the rendered boxes, or from
//! the measured registry filled by the layout manager. Both implement
//! [`SlotMetrics`] and must agree whenever the registry is up to date.

use trellis_api::{Axis, SizeSpec};

use crate::element::{ElementHost, ElementId};
use crate::measured::MeasuredRegistry;

/// Capabilities a slot needs to position its widget and caption.
pub trait SlotMetrics {
    /// Declared size of `id` along `axis`.
    fn sizing(&self, id: ElementId, axis: Axis) -> SizeSpec;

    /// Outer size of `id` along `axis`.
    fn outer_size(&self, id: ElementId, axis: Axis) -> f64;
}

/// Reads sizes from the live rendered boxes.
pub struct DirectMetrics<'a> {
    host: &'a dyn ElementHost,
}

impl<'a> DirectMetrics<'a> {
    pub fn new(host: &'a dyn ElementHost) -> Self {
        Self { host }
    }
}

impl SlotMetrics for DirectMetrics<'_> {
    fn sizing(&self, id: ElementId, axis: Axis) -> SizeSpec {
        self.host.sizing(id, axis)
    }

    fn outer_size(&self, id: ElementId, axis: Axis) -> f64 {
        self.host
            .box_geometry(id)
            .map(|g| g.outer(axis))
            .unwrap_or(0.0)
    }
}

/// Reads sizes from the measured registry.
pub struct RegistryMetrics<'a> {
    host: &'a dyn ElementHost,
    registry: &'a MeasuredRegistry,
}

impl<'a> RegistryMetrics<'a> {
    pub fn new(host: &'a dyn ElementHost, registry: &'a MeasuredRegistry) -> Self {
        Self { host, registry }
    }
}

impl SlotMetrics for RegistryMetrics<'_> {
    fn sizing(&self, id: ElementId, axis: Axis) -> SizeSpec {
        self.host.sizing(id, axis)
    }

    fn outer_size(&self, id: ElementId, axis: Axis) -> f64 {
        self.registry.outer(id, axis)
    }
}
