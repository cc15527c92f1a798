//! Trellis Layout - the measurement and layout core.
//!
//! This crate contains:
//! - The element host seam and an in-memory element tree
//! - The measured element registry
//! - The layout dependency tree (who must be measured or laid out, and when)
//! - Layout slots and the cell-based row, column and grid layouts
//! - The scrollbar bundle
//! - The layout manager that drives a run to convergence

pub mod cell_layout;
pub mod dependency;
pub mod element;
pub mod element_tree;
pub mod manager;
pub mod measured;
pub mod scrollbar;
pub mod slot;

mod config;
mod error;
mod geometry;

pub use cell_layout::{
    CellCoord, CellLayout, ColumnSet, DomOp, Orientation, Spacing, StateChanges, StateUpdate, position_directly,
};
pub use config::LayoutConfig;
pub use dependency::{DependencyState, LayoutDependencyTree};
pub use element::{ElementHost, ElementHostMut, ElementId, LayoutKind, StyleProbe};
pub use element_tree::{ElementTree, PaddingRule};
pub use error::LayoutError;
pub use geometry::{BoxGeometry, Insets, PIXEL_EPSILON, pixel_values_equal};
pub use manager::{
    ElementResizeEvent, ElementResizeListener, LayoutContext, LayoutManager, LayoutReport, ManagedLayout,
};
pub use measured::{MeasureResult, MeasuredRegistry, MeasuredSize};
pub use scrollbar::{ListenerId, ScrollElement, ScrollbarBundle, ScrollbarEvent, ScrollbarListener, VirtualScroller};
pub use slot::{
    AxisPlacement, Caption, CaptionPlacement, DirectMetrics, LayoutSlot, RegistryMetrics, SlotGeometry, SlotMetrics,
};
