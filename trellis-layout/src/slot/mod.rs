//! Layout slots.
//!
//! A slot wraps one child widget and its optional caption inside a cell
//! layout. Given a position and the space allocated along an axis, it
//! works out where the wrapper, the widget and the caption go, honouring
//! the child's alignment and whether it is sized relatively.

mod metrics;

pub use metrics::{DirectMetrics, RegistryMetrics, SlotMetrics};

use trellis_api::{AlignmentInfo, Axis};

use crate::element::ElementId;

/// Where a caption goes relative to its widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionPlacement {
    /// Stacked on top of the widget.
    #[default]
    Above,
    /// To the right of the widget (check boxes and the like).
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caption {
    pub element: ElementId,
    pub placement: CaptionPlacement,
}

impl Caption {
    pub fn above(element: ElementId) -> Self {
        Self { element, placement: CaptionPlacement::Above }
    }

    pub fn after(element: ElementId) -> Self {
        Self { element, placement: CaptionPlacement::After }
    }

    fn is_after(&self) -> bool {
        self.placement == CaptionPlacement::After
    }
}

/// Result of positioning a slot along one axis.
///
/// Offsets of the widget and caption are relative to the wrapper start.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisPlacement {
    /// Wrapper start inside the layout's content box.
    pub offset: f64,
    /// Space left for the widget once the caption has been accounted for.
    pub size: f64,
    /// Space reserved for the caption (top padding or right padding).
    pub caption_reserve: f64,
    pub widget_offset: f64,
    pub caption_offset: Option<f64>,
    /// Size handed to a relatively sized widget.
    pub allocated_content: Option<f64>,
}

impl AxisPlacement {
    pub fn widget_position(&self) -> f64 {
        self.offset + self.widget_offset
    }

    pub fn caption_position(&self) -> Option<f64> {
        self.caption_offset.map(|c| self.offset + c)
    }
}

/// Cached placements from the last layout pass.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SlotGeometry {
    pub horizontal: Option<AxisPlacement>,
    pub vertical: Option<AxisPlacement>,
}

impl SlotGeometry {
    pub fn get(&self, axis: Axis) -> Option<&AxisPlacement> {
        match axis {
            Axis::Horizontal => self.horizontal.as_ref(),
            Axis::Vertical => self.vertical.as_ref(),
        }
    }
}

/// One child of a cell layout.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSlot {
    widget: ElementId,
    caption: Option<Caption>,
    alignment: AlignmentInfo,
    expand_ratio: f64,
    geometry: SlotGeometry,
}

impl LayoutSlot {
    pub fn new(widget: ElementId) -> Self {
        Self {
            widget,
            caption: None,
            alignment: AlignmentInfo::default(),
            expand_ratio: 0.0,
            geometry: SlotGeometry::default(),
        }
    }

    pub fn with_caption(mut self, caption: Caption) -> Self {
        self.caption = Some(caption);
        self
    }

    pub fn with_alignment(mut self, alignment: AlignmentInfo) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_expand_ratio(mut self, ratio: f64) -> Self {
        self.set_expand_ratio(ratio);
        self
    }

    pub fn widget(&self) -> ElementId {
        self.widget
    }

    pub(crate) fn set_widget(&mut self, widget: ElementId) {
        self.widget = widget;
        self.geometry = SlotGeometry::default();
    }

    pub fn caption(&self) -> Option<Caption> {
        self.caption
    }

    pub fn set_caption(&mut self, caption: Option<Caption>) {
        self.caption = caption;
    }

    pub fn alignment(&self) -> AlignmentInfo {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: AlignmentInfo) {
        self.alignment = alignment;
    }

    pub fn expand_ratio(&self) -> f64 {
        self.expand_ratio
    }

    /// Negative and non-finite ratios are treated as zero.
    pub fn set_expand_ratio(&mut self, ratio: f64) {
        self.expand_ratio = if ratio.is_finite() { ratio.max(0.0) } else { 0.0 };
    }

    pub fn geometry(&self) -> &SlotGeometry {
        &self.geometry
    }

    /// Drop cached placements before a new pass.
    pub fn invalidate(&mut self) {
        self.geometry = SlotGeometry::default();
    }

    pub fn is_relative(&self, metrics: &dyn SlotMetrics, axis: Axis) -> bool {
        metrics.sizing(self.widget, axis).is_relative()
    }

    pub fn is_undefined(&self, metrics: &dyn SlotMetrics, axis: Axis) -> bool {
        metrics.sizing(self.widget, axis).is_undefined()
    }

    fn caption_size(&self, metrics: &dyn SlotMetrics, axis: Axis) -> f64 {
        self.caption
            .map(|c| metrics.outer_size(c.element, axis))
            .unwrap_or(0.0)
    }

    /// Width taken by the widget and its caption.
    pub fn used_width(&self, metrics: &dyn SlotMetrics) -> f64 {
        let widget_width = metrics.outer_size(self.widget, Axis::Horizontal);
        match self.caption {
            None => widget_width,
            Some(c) if c.is_after() => widget_width + self.caption_size(metrics, Axis::Horizontal),
            Some(_) => widget_width.max(self.caption_size(metrics, Axis::Horizontal)),
        }
    }

    /// Height taken by the widget and its caption.
    pub fn used_height(&self, metrics: &dyn SlotMetrics) -> f64 {
        let widget_height = metrics.outer_size(self.widget, Axis::Vertical);
        match self.caption {
            None => widget_height,
            Some(c) if c.is_after() => widget_height.max(self.caption_size(metrics, Axis::Vertical)),
            Some(_) => widget_height + self.caption_size(metrics, Axis::Vertical),
        }
    }

    pub fn used_size(&self, metrics: &dyn SlotMetrics, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.used_width(metrics),
            Axis::Vertical => self.used_height(metrics),
        }
    }

    pub fn position_in_axis(
        &mut self,
        metrics: &dyn SlotMetrics,
        axis: Axis,
        location: f64,
        allocated: f64,
    ) -> AxisPlacement {
        match axis {
            Axis::Horizontal => self.position_horizontally(metrics, location, allocated),
            Axis::Vertical => self.position_vertically(metrics, location, allocated),
        }
    }

    /// Place the slot horizontally at `location` within `allocated` pixels.
    ///
    /// A caption placed after the widget takes its width from the space
    /// available to the widget, so alignment only moves the widget within
    /// what is left.
    pub fn position_horizontally(
        &mut self,
        metrics: &dyn SlotMetrics,
        location: f64,
        allocated: f64,
    ) -> AxisPlacement {
        let caption_reserve = match self.caption {
            Some(c) if c.is_after() => self.caption_size(metrics, Axis::Horizontal),
            _ => 0.0,
        };
        let available = (allocated - caption_reserve).max(0.0);

        let relative = metrics
            .sizing(self.widget, Axis::Horizontal)
            .percent()
            .map(|pct| available * pct / 100.0);
        let used = relative.unwrap_or_else(|| metrics.outer_size(self.widget, Axis::Horizontal));

        let widget_offset = if self.alignment.is_left() {
            0.0
        } else {
            let mut padding = available - used;
            if self.alignment.is_horizontal_center() {
                padding /= 2.0;
            }
            padding.round()
        };
        let caption_offset = self.caption.map(|c| {
            if c.is_after() { (widget_offset + used).round() } else { widget_offset }
        });

        let placement = AxisPlacement {
            offset: location.round(),
            size: available.trunc(),
            caption_reserve,
            widget_offset,
            caption_offset,
            allocated_content: relative.map(f64::round),
        };
        self.geometry.horizontal = Some(placement);
        placement
    }

    /// Place the slot vertically at `location` within `allocated` pixels.
    ///
    /// A caption above the widget is reserved as top padding.
    pub fn position_vertically(
        &mut self,
        metrics: &dyn SlotMetrics,
        location: f64,
        allocated: f64,
    ) -> AxisPlacement {
        let caption_height = match self.caption {
            Some(c) if !c.is_after() => self.caption_size(metrics, Axis::Vertical),
            _ => 0.0,
        };
        let content = (allocated - caption_height).max(0.0);

        let relative = metrics.sizing(self.widget, Axis::Vertical).percent();
        let relative_content = relative.map(|pct| content * pct / 100.0);

        let (widget_offset, caption_offset) = if self.alignment.is_top() {
            (caption_height, self.caption.map(|_| 0.0))
        } else {
            let used = match relative_content {
                Some(content) => caption_height + content,
                None => self.used_height(metrics),
            };
            let padding = if self.alignment.is_vertical_center() {
                (allocated - used) / 2.0
            } else {
                allocated - used
            };
            let padding = padding.round() + caption_height;
            (padding, self.caption.map(|_| padding - caption_height))
        };

        let placement = AxisPlacement {
            offset: location,
            size: content,
            caption_reserve: caption_height,
            widget_offset,
            caption_offset,
            allocated_content: relative_content.map(f64::round),
        };
        self.geometry.vertical = Some(placement);
        placement
    }
}
