//! Box geometry primitives shared by measurement and layout.

use trellis_api::Axis;

/// Two pixel values closer than this are considered equal.
pub const PIXEL_EPSILON: f64 = 0.1;

pub fn pixel_values_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= PIXEL_EPSILON
}

/// Per-side box insets (padding, border or margin).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    pub fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self { top, right, bottom, left }
    }

    pub fn all(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    /// Leading inset along `axis` (left or top).
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// Trailing inset along `axis` (right or bottom).
    pub fn end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.right,
            Axis::Vertical => self.bottom,
        }
    }

    /// Sum of both insets along `axis`.
    pub fn sum(&self, axis: Axis) -> f64 {
        self.start(axis) + self.end(axis)
    }

    pub fn approx_eq(&self, other: &Insets) -> bool {
        pixel_values_equal(self.top, other.top)
            && pixel_values_equal(self.right, other.right)
            && pixel_values_equal(self.bottom, other.bottom)
            && pixel_values_equal(self.left, other.left)
    }
}

/// Rendered box of an element as read from the host.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxGeometry {
    pub outer_width: f64,
    pub outer_height: f64,
    pub padding: Insets,
    pub border: Insets,
    pub margin: Insets,
}

impl BoxGeometry {
    pub fn outer(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.outer_width,
            Axis::Vertical => self.outer_height,
        }
    }
}
