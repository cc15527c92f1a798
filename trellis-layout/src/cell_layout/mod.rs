//! Cell-based layout.
//!
//! Arranges [`LayoutSlot`]s in a single row, a single column or a grid.
//! Space along each axis is split into tracks (columns or rows). A track
//! is as large as its largest non-relative slot; leftover space goes to
//! tracks by expand ratio. Margins and spacing are read from the host's
//! style rules through a [`StyleProbe`].

mod columns;
mod grid;

pub use columns::ColumnSet;

use rustc_hash::FxHashMap;
use trellis_api::{Axis, LayoutState, MarginInfo};

use crate::element::{ElementHost, ElementId, StyleProbe};
use crate::error::LayoutError;
use crate::geometry::{Insets, pixel_values_equal};
use crate::manager::{LayoutContext, ManagedLayout};
use crate::slot::{LayoutSlot, SlotMetrics};

/// How slots are arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// One row, slots left to right.
    Horizontal,
    /// One column, slots top to bottom.
    Vertical,
    /// Explicit cells.
    Grid,
}

/// Position of a slot in a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub column: usize,
    pub row: usize,
}

impl CellCoord {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    fn track(&self, axis: Axis) -> usize {
        match axis {
            Axis::Horizontal => self.column,
            Axis::Vertical => self.row,
        }
    }
}

/// Element operation performed by [`CellLayout::add_or_move_child`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomOp {
    /// Already in place.
    Unchanged,
    Appended,
    Inserted(usize),
}

/// Spacing between tracks, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spacing {
    pub horizontal: f64,
    pub vertical: f64,
}

impl Spacing {
    fn along(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.horizontal,
            Axis::Vertical => self.vertical,
        }
    }
}

/// What a state update changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateChanges {
    /// Margins or spacing changed; run `measure_margins_and_spacing`.
    pub margins_changed: bool,
    pub size_changed: bool,
    pub children_changed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateUpdate {
    /// The update was a cached one and nothing was applied.
    Skipped,
    Applied(StateChanges),
}

/// A row, column or grid of slots.
#[derive(Debug, Clone)]
pub struct CellLayout {
    element: ElementId,
    style_name: String,
    orientation: Orientation,
    slots: Vec<LayoutSlot>,
    index: FxHashMap<ElementId, usize>,
    cells: FxHashMap<ElementId, CellCoord>,
    columns: ColumnSet,
    rows: usize,
    margins: MarginInfo,
    spacing: bool,
    active_margins: Insets,
    active_spacing: Spacing,
    margins_stale: bool,
    dynamic: [bool; 2],
    attached: bool,
    content_size: [Option<f64>; 2],
}

impl CellLayout {
    fn with_orientation(element: ElementId, orientation: Orientation, style_name: &str) -> Self {
        Self {
            element,
            style_name: style_name.to_string(),
            orientation,
            slots: Vec::new(),
            index: FxHashMap::default(),
            cells: FxHashMap::default(),
            columns: ColumnSet::new(1),
            rows: 1,
            margins: MarginInfo::empty(),
            spacing: false,
            active_margins: Insets::default(),
            active_spacing: Spacing::default(),
            margins_stale: true,
            dynamic: [true, true],
            attached: true,
            content_size: [None, None],
        }
    }

    pub fn vertical(element: ElementId) -> Self {
        Self::with_orientation(element, Orientation::Vertical, "v-verticallayout")
    }

    pub fn horizontal(element: ElementId) -> Self {
        Self::with_orientation(element, Orientation::Horizontal, "v-horizontallayout")
    }

    /// A grid with the given number of columns and rows.
    pub fn grid(element: ElementId, columns: usize, rows: usize) -> Result<Self, LayoutError> {
        if columns == 0 {
            return Err(LayoutError::InvalidCount(columns));
        }
        if rows == 0 {
            return Err(LayoutError::InvalidCount(rows));
        }
        let mut layout = Self::with_orientation(element, Orientation::Grid, "v-gridlayout");
        layout.columns = ColumnSet::new(columns);
        layout.rows = rows;
        Ok(layout)
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn style_name(&self) -> &str {
        &self.style_name
    }

    /// Margin and spacing classes derive from the style name, so a new
    /// name flags them for re-measure.
    pub fn set_style_name(&mut self, style_name: &str) {
        if self.style_name != style_name {
            self.style_name = style_name.to_string();
            self.margins_stale = true;
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    // =====================================================================
    // Children
    // =====================================================================

    pub fn slots(&self) -> &[LayoutSlot] {
        &self.slots
    }

    pub fn slot(&self, widget: ElementId) -> Option<&LayoutSlot> {
        self.index.get(&widget).map(|&i| &self.slots[i])
    }

    pub fn slot_mut(&mut self, widget: ElementId) -> Option<&mut LayoutSlot> {
        self.index.get(&widget).map(|&i| &mut self.slots[i])
    }

    pub fn position_of(&self, widget: ElementId) -> Option<usize> {
        self.index.get(&widget).copied()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (i, slot) in self.slots.iter().enumerate() {
            self.index.insert(slot.widget(), i);
        }
    }

    /// Insert `slot` at `position`, or move it there if its widget is
    /// already a child. Positions past the end append.
    ///
    /// In a grid a new widget takes the first free cell, adding a row when
    /// the grid is full.
    pub fn add_or_move_child(&mut self, slot: LayoutSlot, position: usize) -> DomOp {
        let widget = slot.widget();
        if let Some(current) = self.index.get(&widget).copied() {
            if current == position {
                self.slots[current] = slot;
                return DomOp::Unchanged;
            }
            self.slots.remove(current);
        } else if self.orientation == Orientation::Grid && !self.cells.contains_key(&widget) {
            let cell = self.first_free_cell();
            self.cells.insert(widget, cell);
        }

        let op = if position >= self.slots.len() {
            self.slots.push(slot);
            DomOp::Appended
        } else {
            self.slots.insert(position, slot);
            DomOp::Inserted(position)
        };
        self.reindex();
        op
    }

    /// Remove the slot of `widget`.
    pub fn remove_child(&mut self, widget: ElementId) -> Option<LayoutSlot> {
        let position = self.index.get(&widget).copied()?;
        let slot = self.slots.remove(position);
        self.cells.remove(&widget);
        self.reindex();
        Some(slot)
    }

    /// Put `new` where `old` was, keeping position, cell, alignment,
    /// expand ratio and caption.
    pub fn replace_child_component(&mut self, old: ElementId, new: ElementId) -> Result<(), LayoutError> {
        let position = self
            .index
            .get(&old)
            .copied()
            .ok_or_else(|| LayoutError::UnknownElement(format!("{old:?}")))?;
        if old == new {
            return Ok(());
        }
        if self.index.contains_key(&new) {
            self.remove_child(new);
        }
        let position = self.index.get(&old).copied().unwrap_or(position);
        self.slots[position].set_widget(new);
        if let Some(cell) = self.cells.remove(&old) {
            self.cells.insert(new, cell);
        }
        self.reindex();
        Ok(())
    }

    fn cell_of(&self, position: usize) -> CellCoord {
        match self.orientation {
            Orientation::Vertical => CellCoord::new(0, position),
            Orientation::Horizontal => CellCoord::new(position, 0),
            Orientation::Grid => self
                .cells
                .get(&self.slots[position].widget())
                .copied()
                .unwrap_or(CellCoord::new(0, 0)),
        }
    }

    fn track_count(&self, axis: Axis) -> usize {
        match (self.orientation, axis) {
            (Orientation::Vertical, Axis::Horizontal) | (Orientation::Horizontal, Axis::Vertical) => 1,
            (Orientation::Vertical, Axis::Vertical) | (Orientation::Horizontal, Axis::Horizontal) => {
                self.slots.len()
            }
            (Orientation::Grid, Axis::Horizontal) => self.columns.len(),
            (Orientation::Grid, Axis::Vertical) => self.rows,
        }
    }

    /// Track indices along `axis` in display order.
    fn visible_tracks(&self, axis: Axis) -> Vec<usize> {
        if self.orientation == Orientation::Grid && axis == Axis::Horizontal {
            self.columns.visible_order().to_vec()
        } else {
            (0..self.track_count(axis)).collect()
        }
    }

    /// Slots in hidden grid columns are not shown at all.
    fn is_slot_shown(&self, position: usize) -> bool {
        self.orientation != Orientation::Grid || self.columns.is_visible(self.cell_of(position).column)
    }

    /// The cross axis of a single row or column always fills the layout.
    fn is_cross_axis(&self, axis: Axis) -> bool {
        matches!(
            (self.orientation, axis),
            (Orientation::Vertical, Axis::Horizontal) | (Orientation::Horizontal, Axis::Vertical)
        )
    }

    // =====================================================================
    // Margins, spacing and state
    // =====================================================================

    pub fn margins(&self) -> MarginInfo {
        self.margins
    }

    pub fn set_margins(&mut self, margins: MarginInfo) {
        if self.margins != margins {
            self.margins = margins;
            self.margins_stale = true;
        }
    }

    pub fn spacing(&self) -> bool {
        self.spacing
    }

    pub fn set_spacing(&mut self, spacing: bool) {
        if self.spacing != spacing {
            self.spacing = spacing;
            self.margins_stale = true;
        }
    }

    /// Whether the style, margins or spacing changed since the last
    /// `measure_margins_and_spacing`.
    pub fn needs_margin_measure(&self) -> bool {
        self.margins_stale
    }

    /// Margins in pixels from the last probe.
    pub fn active_margins(&self) -> Insets {
        self.active_margins
    }

    pub fn active_spacing(&self) -> Spacing {
        self.active_spacing
    }

    pub fn margin_class_names(&self) -> Vec<String> {
        self.margins
            .side_suffixes()
            .map(|side| format!("{}-margin-{side}", self.style_name))
            .collect()
    }

    pub fn spacing_class_name(&self) -> String {
        format!("{}-spacing", self.style_name)
    }

    /// Read the pixel margins and spacing the current style classes produce.
    ///
    /// Returns whether anything changed.
    pub fn measure_margins_and_spacing(&mut self, probe: &dyn StyleProbe) -> Result<bool, LayoutError> {
        if !self.attached {
            return Err(LayoutError::NotAttached);
        }
        let margins = probe.probe_padding(&self.margin_class_names());
        let spacing = if self.spacing {
            let padding = probe.probe_padding(&[self.spacing_class_name()]);
            Spacing {
                horizontal: padding.left,
                vertical: padding.top,
            }
        } else {
            Spacing::default()
        };

        let changed = !margins.approx_eq(&self.active_margins)
            || !pixel_values_equal(spacing.horizontal, self.active_spacing.horizontal)
            || !pixel_values_equal(spacing.vertical, self.active_spacing.vertical);
        self.active_margins = margins;
        self.active_spacing = spacing;
        self.margins_stale = false;
        Ok(changed)
    }

    /// Whether the layout is sized by its content along `axis`.
    pub fn is_dynamic(&self, axis: Axis) -> bool {
        self.dynamic[axis.index()]
    }

    pub fn is_dynamic_width(&self) -> bool {
        self.is_dynamic(Axis::Horizontal)
    }

    pub fn is_dynamic_height(&self) -> bool {
        self.is_dynamic(Axis::Vertical)
    }

    /// Apply a state update from the state-sync layer.
    ///
    /// Cached updates are skipped. Child data is applied by child order.
    pub fn update_from_state(&mut self, state: &LayoutState) -> Result<StateUpdate, LayoutError> {
        if state.cached {
            tracing::debug!("Skipping cached state update for {:?}", self.element);
            return Ok(StateUpdate::Skipped);
        }
        let width = state.width_spec()?;
        let height = state.height_spec()?;

        let mut changes = StateChanges {
            margins_changed: state.margins != self.margins || state.spacing != self.spacing,
            ..StateChanges::default()
        };
        self.margins = state.margins;
        self.spacing = state.spacing;
        self.margins_stale |= changes.margins_changed;

        let dynamic = [width.is_undefined(), height.is_undefined()];
        changes.size_changed = dynamic != self.dynamic;
        self.dynamic = dynamic;

        if state.child_data.len() != self.slots.len() {
            tracing::warn!(
                "Layout {:?} got data for {} children but has {}",
                self.element,
                state.child_data.len(),
                self.slots.len()
            );
        }
        for (slot, data) in self.slots.iter_mut().zip(&state.child_data) {
            if slot.alignment() != data.alignment || slot.expand_ratio() != data.expand_ratio {
                changes.children_changed = true;
            }
            slot.set_alignment(data.alignment);
            slot.set_expand_ratio(data.expand_ratio);
        }
        Ok(StateUpdate::Applied(changes))
    }

    // =====================================================================
    // Layout
    // =====================================================================

    /// Natural sizes, expand ratios and relative-only flags per track.
    fn track_requirements(&self, metrics: &dyn SlotMetrics, axis: Axis) -> Vec<TrackRequirement> {
        let mut tracks = vec![TrackRequirement::default(); self.track_count(axis)];
        for (position, slot) in self.slots.iter().enumerate() {
            if !self.is_slot_shown(position) {
                continue;
            }
            let Some(track) = tracks.get_mut(self.cell_of(position).track(axis)) else {
                continue;
            };
            track.occupied = true;
            track.expand_ratio = track.expand_ratio.max(slot.expand_ratio());
            if slot.is_relative(metrics, axis) {
                continue;
            }
            track.relative_only = false;
            track.natural = track.natural.max(slot.used_size(metrics, axis));
        }
        tracks
    }

    /// Compute the size of every track along `axis`.
    ///
    /// Returns the sizes and the total content size (tracks plus spacing).
    fn track_sizes(&self, cx_inner: f64, metrics: &dyn SlotMetrics, axis: Axis) -> (Vec<f64>, f64) {
        let tracks = self.track_requirements(metrics, axis);
        let visible = self.visible_tracks(axis);
        let spacing = self.active_spacing.along(axis) * visible.len().saturating_sub(1) as f64;
        let mut sizes = vec![0.0; tracks.len()];
        for &t in &visible {
            sizes[t] = tracks[t].natural;
        }
        let natural_total: f64 = visible.iter().map(|&t| tracks[t].natural).sum();

        if self.is_dynamic(axis) {
            return (sizes, natural_total + spacing);
        }

        let available = (cx_inner - self.active_margins.sum(axis)).max(0.0);
        if self.is_cross_axis(axis) {
            if let Some(&t) = visible.first() {
                sizes[t] = available.max(tracks[t].natural);
            }
            return (sizes, available);
        }

        let leftover = (available - natural_total - spacing).max(0.0);
        let total_ratio: f64 = visible.iter().map(|&t| tracks[t].expand_ratio).sum();
        let weights: Vec<(usize, f64)> = if total_ratio > 0.0 {
            visible
                .iter()
                .filter(|&&t| tracks[t].expand_ratio > 0.0)
                .map(|&t| (t, tracks[t].expand_ratio))
                .collect()
        } else {
            visible
                .iter()
                .filter(|&&t| tracks[t].occupied && tracks[t].relative_only)
                .map(|&t| (t, 1.0))
                .collect()
        };
        distribute(&mut sizes, &weights, leftover);
        (sizes, available)
    }

    /// Lay out all slots along `axis`.
    fn layout_axis(&mut self, cx: &mut LayoutContext<'_>, axis: Axis) {
        let own_inner = cx.registry().inner(self.element, axis);
        let mut writes: Vec<Placement> = Vec::with_capacity(self.slots.len() * 2);
        let content;
        {
            let metrics = cx.metrics();
            let (sizes, total) = self.track_sizes(own_inner, &metrics, axis);
            content = total;

            let spacing = self.active_spacing.along(axis);
            let mut starts = vec![None; sizes.len()];
            let mut location = self.active_margins.start(axis);
            for t in self.visible_tracks(axis) {
                starts[t] = Some(location);
                location += sizes[t] + spacing;
            }

            for position in 0..self.slots.len() {
                let track = self.cell_of(position).track(axis);
                let shown = self.is_slot_shown(position);
                let slot = &mut self.slots[position];
                let start = starts.get(track).copied().flatten().filter(|_| shown);
                let Some(start) = start else {
                    slot.invalidate();
                    writes.push(Placement::Hidden(slot.widget()));
                    if let Some(caption) = slot.caption() {
                        writes.push(Placement::Hidden(caption.element));
                    }
                    continue;
                };
                let placement = slot.position_in_axis(&metrics, axis, start, sizes[track]);
                writes.push(Placement::Shown {
                    id: slot.widget(),
                    position: placement.widget_position(),
                    allocated: placement.size,
                });
                if let (Some(caption), Some(position)) = (slot.caption(), placement.caption_position()) {
                    writes.push(Placement::Shown {
                        id: caption.element,
                        position,
                        allocated: placement.size,
                    });
                }
            }
        }

        let host = cx.host_mut();
        for write in writes {
            match write {
                Placement::Shown { id, position, allocated } => {
                    host.set_visible(id, true);
                    host.place(id, axis, position, allocated);
                }
                Placement::Hidden(id) => host.set_visible(id, false),
            }
        }

        if self.is_dynamic(axis) {
            let own = cx.registry().get(self.element);
            let insets = own
                .map(|m| m.padding().sum(axis) + m.border().sum(axis))
                .unwrap_or(0.0);
            let outer = content + self.active_margins.sum(axis) + insets;
            let previous = self.content_size[axis.index()];
            if previous.is_none_or(|p| !pixel_values_equal(p, outer)) {
                self.content_size[axis.index()] = Some(outer);
                cx.host_mut().set_content_size(self.element, axis, outer);
                cx.request_measure(self.element, axis);
            }
        }
    }
}

enum Placement {
    Shown { id: ElementId, position: f64, allocated: f64 },
    Hidden(ElementId),
}

#[derive(Debug, Clone, Copy)]
struct TrackRequirement {
    natural: f64,
    expand_ratio: f64,
    relative_only: bool,
    occupied: bool,
}

impl Default for TrackRequirement {
    fn default() -> Self {
        Self {
            natural: 0.0,
            expand_ratio: 0.0,
            relative_only: true,
            occupied: false,
        }
    }
}

/// Add `leftover` pixels to `sizes` in proportion to `weights`.
///
/// Shares are floored; the remaining whole pixels go one at a time to the
/// weighted tracks in order.
fn distribute(sizes: &mut [f64], weights: &[(usize, f64)], leftover: f64) {
    let total: f64 = weights.iter().map(|(_, w)| w).sum();
    if total <= 0.0 || leftover <= 0.0 {
        return;
    }
    let whole = leftover.floor();
    let mut handed_out = 0.0;
    for &(t, weight) in weights {
        let share = (whole * weight / total).floor();
        sizes[t] += share;
        handed_out += share;
    }
    let mut remaining = whole - handed_out;
    for &(t, _) in weights.iter().cycle() {
        if remaining < 1.0 {
            break;
        }
        sizes[t] += 1.0;
        remaining -= 1.0;
    }
}

impl ManagedLayout for CellLayout {
    fn element(&self) -> ElementId {
        self.element
    }

    fn layout_horizontally(&mut self, cx: &mut LayoutContext<'_>) {
        self.layout_axis(cx, Axis::Horizontal);
    }

    fn layout_vertically(&mut self, cx: &mut LayoutContext<'_>) {
        self.layout_axis(cx, Axis::Vertical);
    }

    fn dependencies(&self) -> Vec<ElementId> {
        self.slots
            .iter()
            .filter_map(|s| s.caption().map(|c| c.element))
            .collect()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Lay out `layout` without a manager, reading live boxes from `host`.
///
/// Useful for hosts that position a layout once, outside a layout run.
pub fn position_directly(
    layout: &mut CellLayout,
    host: &dyn ElementHost,
    axis: Axis,
    inner: f64,
) -> Vec<(ElementId, f64, f64)> {
    let metrics = crate::slot::DirectMetrics::new(host);
    let (sizes, _) = layout.track_sizes(inner, &metrics, axis);
    let spacing = layout.active_spacing.along(axis);
    let mut starts = vec![None; sizes.len()];
    let mut location = layout.active_margins.start(axis);
    for t in layout.visible_tracks(axis) {
        starts[t] = Some(location);
        location += sizes[t] + spacing;
    }
    let mut placed = Vec::new();
    for position in 0..layout.slots.len() {
        let track = layout.cell_of(position).track(axis);
        if !layout.is_slot_shown(position) {
            continue;
        }
        let Some(start) = starts.get(track).copied().flatten() else {
            continue;
        };
        let slot = &mut layout.slots[position];
        let placement = slot.position_in_axis(&metrics, axis, start, sizes[track]);
        placed.push((slot.widget(), placement.widget_position(), placement.size));
    }
    placed
}
