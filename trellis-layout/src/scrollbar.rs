//! Scrollbar bundle.
//!
//! One axis of scroll state for a scrollable viewport. The bundle owns the
//! application-visible scroll position, the scrollable extent and the
//! visible extent, and keeps a native scroll element in step with them.
//!
//! Programmatic changes go through [`ScrollbarBundle::set_scroll_pos`];
//! scrolls made by the user or the platform arrive through
//! [`ScrollbarBundle::on_native_scroll`]. After every public call the
//! position satisfies `0 <= pos <= max(0, scroll_size - offset_size)`.

use std::cell::Cell;
use std::time::{Duration, Instant};

use trellis_api::Axis;

use crate::config::LayoutConfig;
use crate::element::ElementId;
use crate::geometry::{PIXEL_EPSILON, pixel_values_equal};
use crate::measured::MeasuredRegistry;

/// Largest position a native element can hold.
const MAX_NATIVE_POSITION: f64 = i32::MAX as f64;

/// Whole-pixel value for the native element, saturating at the ends.
fn native_px(px: f64) -> i32 {
    px.round().clamp(0.0, MAX_NATIVE_POSITION) as i32
}

/// The native scroll box behind a bundle.
pub trait ScrollElement {
    /// Current native scroll position, in whole pixels.
    fn scroll_position(&self) -> i32;

    fn set_scroll_position(&mut self, px: i32);

    /// Size of the scrollable content.
    fn set_scroll_size(&mut self, px: f64);

    /// Length of the visible part.
    fn set_offset_size(&mut self, px: f64);

    /// Thickness of the scrollbar across the scroll axis.
    fn set_thickness(&mut self, px: f64);

    /// Force the native scrollbar on or off.
    fn set_scrollbar_visible(&mut self, visible: bool);

    fn set_class_name(&mut self, class_name: &str);
}

/// In-memory scroll element that clamps positions like a browser does.
#[derive(Debug, Clone, Default)]
pub struct VirtualScroller {
    position: i32,
    scroll_size: f64,
    offset_size: f64,
    thickness: f64,
    scrollbar_visible: bool,
    class_name: String,
    writes: usize,
}

impl VirtualScroller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_position(&self) -> i32 {
        (self.scroll_size - self.offset_size).max(0.0).floor() as i32
    }

    fn clamp(&mut self) {
        self.position = self.position.clamp(0, self.max_position());
    }

    /// Scroll as the user would, without going through a bundle.
    pub fn user_scroll(&mut self, px: i32) {
        self.position = px;
        self.clamp();
    }

    /// Number of programmatic position writes.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn is_scrollbar_visible(&self) -> bool {
        self.scrollbar_visible
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }
}

impl ScrollElement for VirtualScroller {
    fn scroll_position(&self) -> i32 {
        self.position
    }

    fn set_scroll_position(&mut self, px: i32) {
        self.writes += 1;
        self.position = px;
        self.clamp();
    }

    fn set_scroll_size(&mut self, px: f64) {
        self.scroll_size = px;
        self.clamp();
    }

    fn set_offset_size(&mut self, px: f64) {
        self.offset_size = px;
        self.clamp();
    }

    fn set_thickness(&mut self, px: f64) {
        self.thickness = px;
    }

    fn set_scrollbar_visible(&mut self, visible: bool) {
        self.scrollbar_visible = visible;
    }

    fn set_class_name(&mut self, class_name: &str) {
        self.class_name = class_name.to_string();
    }
}

/// Notifications from a [`ScrollbarBundle`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollbarEvent {
    /// The position was changed programmatically or by clamping.
    PositionChanged(f64),
    ScrollSizeChanged(f64),
    OffsetSizeChanged(f64),
    /// The scroll handle appeared or disappeared.
    VisibilityChanged(bool),
    /// A native scroll, delivered by [`ScrollbarBundle::fire_scheduled_scroll_event`].
    Scroll(f64),
}

pub type ScrollbarListener = Box<dyn FnMut(&ScrollbarEvent)>;

/// Handle returned by [`ScrollbarBundle::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Briefly shows an invisible scrollbar at full size after a scroll.
#[derive(Debug, Clone)]
struct TemporaryResizer {
    probe_size: f64,
    delay: Duration,
    hide_at: Option<Instant>,
}

impl TemporaryResizer {
    fn new(config: &LayoutConfig) -> Self {
        Self {
            probe_size: config.invisible_scrollbar_size,
            delay: config.temporary_resize_delay(),
            hide_at: None,
        }
    }

    fn show(&mut self, element: &mut dyn ScrollElement, now: Instant) {
        element.set_thickness(self.probe_size);
        self.hide_at = Some(now + self.delay);
    }

    fn poll(&mut self, element: &mut dyn ScrollElement, thickness: f64, now: Instant) -> bool {
        match self.hide_at {
            Some(at) if at <= now => {
                element.set_thickness(thickness);
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }

    fn is_showing(&self) -> bool {
        self.hide_at.is_some()
    }
}

/// Scroll state for one axis of a viewport.
pub struct ScrollbarBundle<E: ScrollElement> {
    axis: Axis,
    element: E,
    scroll_pos: Cell<f64>,
    scroll_size: f64,
    offset_size: f64,
    max_scroll_pos: f64,
    locked: bool,
    invisible: bool,
    thickness: f64,
    style_primary_name: String,
    scroll_scheduled: bool,
    resizer: TemporaryResizer,
    listeners: Vec<(ListenerId, ScrollbarListener)>,
    next_listener: u64,
}

impl<E: ScrollElement> ScrollbarBundle<E> {
    pub fn new(axis: Axis, element: E, config: &LayoutConfig) -> Self {
        let mut bundle = Self {
            axis,
            element,
            scroll_pos: Cell::new(0.0),
            scroll_size: 0.0,
            offset_size: 0.0,
            max_scroll_pos: 0.0,
            locked: false,
            invisible: false,
            thickness: 1.0,
            style_primary_name: String::new(),
            scroll_scheduled: false,
            resizer: TemporaryResizer::new(config),
            listeners: Vec::new(),
            next_listener: 0,
        };
        bundle.element.set_scrollbar_visible(false);
        bundle
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    // =====================================================================
    // Listeners
    // =====================================================================

    pub fn add_listener(&mut self, listener: ScrollbarListener) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Returns whether the listener was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(l, _)| *l != id);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: ScrollbarEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    // =====================================================================
    // Position
    // =====================================================================

    /// The current scroll position.
    ///
    /// The cached value must match the native element. A mismatch means a
    /// native scroll was never reconciled; the cache is resynced from the
    /// element.
    pub fn scroll_pos(&self) -> f64 {
        let native = self.element.scroll_position() as f64;
        let cached = self.scroll_pos.get();
        let in_sync = (native - cached).abs() <= PIXEL_EPSILON;
        debug_assert!(
            in_sync,
            "{} scroll position out of sync: cached {cached}, native {native}",
            self.axis
        );
        if !in_sync {
            tracing::warn!(
                "{} scroll position out of sync (cached {}, native {}), resyncing",
                self.axis,
                cached,
                native
            );
            self.scroll_pos.set(native);
            return native;
        }
        cached
    }

    /// Scroll to `px`, clamped to `[0, max_scroll_pos]` and truncated.
    /// Positions past `i32::MAX` stop there, as the native element would.
    ///
    /// Does nothing while locked. The native element is only written when the
    /// position actually changes.
    pub fn set_scroll_pos(&mut self, px: f64) {
        if self.locked {
            return;
        }
        self.apply_scroll_pos(px);
    }

    pub fn set_scroll_pos_by_delta(&mut self, delta: f64) {
        if delta != 0.0 {
            let current = self.scroll_pos.get();
            self.set_scroll_pos(current + delta);
        }
    }

    fn apply_scroll_pos(&mut self, px: f64) {
        let px = if px.is_finite() { px } else { 0.0 };
        let px = px.clamp(0.0, self.max_scroll_pos.min(MAX_NATIVE_POSITION)).trunc();
        if pixel_values_equal(px, self.scroll_pos.get()) {
            return;
        }
        self.scroll_pos.set(px);
        self.element.set_scroll_position(native_px(px));
        self.emit(ScrollbarEvent::PositionChanged(px));
        if self.invisible {
            self.resizer.show(&mut self.element, Instant::now());
        }
    }

    pub fn max_scroll_pos(&self) -> f64 {
        self.max_scroll_pos
    }

    /// Recompute the largest position and pull the current one inside it.
    pub fn recalculate_max_scroll_pos(&mut self) {
        self.max_scroll_pos = (self.scroll_size - self.offset_size).max(0.0);
        if self.scroll_pos.get() > self.max_scroll_pos.min(MAX_NATIVE_POSITION) {
            // Clamping ignores the lock; the position must stay in range.
            self.apply_scroll_pos(self.max_scroll_pos);
        }
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    // =====================================================================
    // Sizes
    // =====================================================================

    pub fn scroll_size(&self) -> f64 {
        self.scroll_size
    }

    pub fn offset_size(&self) -> f64 {
        self.offset_size
    }

    /// Whether there is anything to scroll.
    pub fn shows_scroll_handle(&self) -> bool {
        Self::handle_shown(self.scroll_size, self.offset_size)
    }

    fn handle_shown(scroll_size: f64, offset_size: f64) -> bool {
        scroll_size - offset_size > PIXEL_EPSILON
    }

    /// Zero the position if the new sizes would hide the handle while
    /// scrolled. Goes through the normal position path so listeners see it.
    fn reset_before_hiding(&mut self, scroll_size: f64, offset_size: f64) {
        if self.shows_scroll_handle()
            && !Self::handle_shown(scroll_size, offset_size)
            && self.scroll_pos.get() != 0.0
        {
            self.set_scroll_pos(0.0);
        }
    }

    /// Set the size of the scrollable content.
    pub fn set_scroll_size(&mut self, px: f64) {
        let px = px.max(0.0);
        if pixel_values_equal(px, self.scroll_size) {
            return;
        }
        self.reset_before_hiding(px, self.offset_size);
        let was_shown = self.shows_scroll_handle();
        self.scroll_size = px;
        self.element.set_scroll_size(px);
        self.emit(ScrollbarEvent::ScrollSizeChanged(px));
        self.sizes_changed(was_shown);
    }

    /// Set the length of the visible viewport.
    pub fn set_offset_size(&mut self, px: f64) {
        let px = px.max(0.0);
        if pixel_values_equal(px, self.offset_size) {
            return;
        }
        self.reset_before_hiding(self.scroll_size, px);
        let was_shown = self.shows_scroll_handle();
        self.offset_size = px;
        self.element.set_offset_size(px);
        self.emit(ScrollbarEvent::OffsetSizeChanged(px));
        self.sizes_changed(was_shown);
    }

    fn sizes_changed(&mut self, was_shown: bool) {
        self.recalculate_max_scroll_pos();
        let shown = self.shows_scroll_handle();
        self.element.set_scrollbar_visible(shown);
        if shown != was_shown {
            tracing::debug!("{} scroll handle {}", self.axis, if shown { "shown" } else { "hidden" });
            self.emit(ScrollbarEvent::VisibilityChanged(shown));
        }
    }

    /// Take the scroll size from `content` and the offset size from the
    /// inner size of `viewport`.
    pub fn sync_from_registry(&mut self, registry: &MeasuredRegistry, content: ElementId, viewport: ElementId) {
        self.set_offset_size(registry.inner(viewport, self.axis));
        self.set_scroll_size(registry.outer(content, self.axis));
    }

    // =====================================================================
    // Native scroll
    // =====================================================================

    /// Reconcile with a scroll reported by the native element.
    ///
    /// While locked the native element is put back where it was. Otherwise
    /// the new position is adopted and a [`ScrollbarEvent::Scroll`] is
    /// scheduled.
    pub fn on_native_scroll(&mut self) {
        let native = self.element.scroll_position() as f64;
        let current = self.scroll_pos.get();
        if self.locked {
            if !pixel_values_equal(native, current) {
                tracing::trace!("{} scrollbar locked, reverting to {}", self.axis, current);
                self.element.set_scroll_position(native_px(current));
            }
            return;
        }
        let adopted = native.clamp(0.0, self.max_scroll_pos).trunc();
        self.scroll_pos.set(adopted);
        if !pixel_values_equal(adopted, native) {
            self.element.set_scroll_position(native_px(adopted));
        }
        self.scroll_scheduled = true;
        if self.invisible {
            self.resizer.show(&mut self.element, Instant::now());
        }
    }

    /// Deliver the pending scroll event, if any. Returns whether one fired.
    pub fn fire_scheduled_scroll_event(&mut self) -> bool {
        if !std::mem::take(&mut self.scroll_scheduled) {
            return false;
        }
        let pos = self.scroll_pos.get();
        self.emit(ScrollbarEvent::Scroll(pos));
        true
    }

    /// Whether a native scroll has not been delivered yet.
    pub fn is_work_pending(&self) -> bool {
        self.scroll_scheduled
    }

    /// Re-apply the position after the element was attached again.
    pub fn on_load(&mut self) {
        let pos = self.scroll_pos.get();
        self.element.set_scroll_position(native_px(pos));
    }

    // =====================================================================
    // Appearance
    // =====================================================================

    /// Set the scrollbar thickness. Zero switches to invisible-scrollbar
    /// mode, which keeps a 1px bar and reveals it briefly on scroll.
    pub fn set_scrollbar_thickness(&mut self, px: f64) {
        self.invisible = px <= 0.0;
        self.thickness = px.max(1.0);
        if !self.resizer.is_showing() {
            self.element.set_thickness(self.thickness);
        }
    }

    pub fn scrollbar_thickness(&self) -> f64 {
        if self.invisible { 0.0 } else { self.thickness }
    }

    pub fn is_invisible_scrollbar(&self) -> bool {
        self.invisible
    }

    /// Restore the thickness of a temporarily revealed scrollbar once its
    /// delay has passed. Returns whether anything changed.
    pub fn poll_timers(&mut self, now: Instant) -> bool {
        self.resizer.poll(&mut self.element, self.thickness, now)
    }

    pub fn set_style_primary_name(&mut self, name: &str) {
        self.style_primary_name = name.to_string();
        let class_name = self.class_name();
        self.element.set_class_name(&class_name);
    }

    pub fn style_primary_name(&self) -> &str {
        &self.style_primary_name
    }

    pub fn class_name(&self) -> String {
        let axis = match self.axis {
            Axis::Horizontal => "horizontal",
            Axis::Vertical => "vertical",
        };
        format!("{0}-scroller {0}-scroller-{axis}", self.style_primary_name)
    }
}
