//! The seam between the layout core and the rendered element tree.
//!
//! The core never owns elements. It reads hierarchy, sizing and rendered
//! boxes through [`ElementHost`] and writes placements through
//! [`ElementHostMut`]. [`crate::ElementTree`] is the in-memory backing.

use slotmap::new_key_type;
use trellis_api::{Axis, SizeSpec};

use crate::geometry::{BoxGeometry, Insets};

new_key_type! {
    /// Opaque handle of a rendered element.
    pub struct ElementId;
}

/// How a managed layout wants to be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Laid out separately per axis.
    Directional,
    /// Laid out once for both axes. The manager marks both axes as done
    /// before calling it.
    Simple,
}

/// Read access to the element tree.
pub trait ElementHost {
    fn parent(&self, id: ElementId) -> Option<ElementId>;

    /// Children that take part in layout, in order.
    fn children(&self, id: ElementId) -> Vec<ElementId>;

    /// Declared size of `id` along `axis`.
    fn sizing(&self, id: ElementId, axis: Axis) -> SizeSpec;

    /// `Some` when `id` is a managed layout.
    fn layout_kind(&self, id: ElementId) -> Option<LayoutKind>;

    /// Whether `id` can scroll its children (a scrollbar may appear in it).
    fn may_scroll_children(&self, id: ElementId) -> bool;

    /// Current rendered box, or `None` when `id` is not rendered.
    fn box_geometry(&self, id: ElementId) -> Option<BoxGeometry>;

    /// Every element known to the host.
    fn elements(&self) -> Vec<ElementId>;

    /// Short human readable label for diagnostics.
    fn describe(&self, id: ElementId) -> String {
        format!("{id:?}")
    }

    fn is_undefined(&self, id: ElementId, axis: Axis) -> bool {
        self.sizing(id, axis).is_undefined()
    }

    fn is_relative(&self, id: ElementId, axis: Axis) -> bool {
        self.sizing(id, axis).is_relative()
    }

    fn is_managed_layout(&self, id: ElementId) -> bool {
        self.layout_kind(id).is_some()
    }
}

/// Write access used by layouts to place their children.
pub trait ElementHostMut: ElementHost {
    /// The same host seen through its read-only interface.
    fn as_host(&self) -> &dyn ElementHost;

    /// Position `id` at `position` inside its parent's content box and give
    /// it `allocated` pixels along `axis`.
    fn place(&mut self, id: ElementId, axis: Axis, position: f64, allocated: f64);

    /// Report the content-driven size of a layout that is sized by content.
    fn set_content_size(&mut self, id: ElementId, axis: Axis, size: f64);

    /// Show or hide an element.
    fn set_visible(&mut self, id: ElementId, visible: bool);
}

/// Reads effective padding of a hidden probe element carrying the given
/// style classes.
pub trait StyleProbe {
    fn probe_padding(&self, class_names: &[String]) -> Insets;
}
