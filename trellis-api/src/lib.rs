//! Trellis API - shared layout state exchanged with the state-sync layer.
//!
//! These types describe what the server side says about a component's
//! layout: its declared sizes, margins, spacing and per-child alignment.
//! The layout core in `trellis-layout` consumes them.

mod alignment;
mod axis;
mod sizing;
mod state;

pub use alignment::{AlignmentInfo, MarginInfo};
pub use axis::Axis;
pub use sizing::{SizeSpec, StateError};
pub use state::{ChildLayoutData, LayoutState};
