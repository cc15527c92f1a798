//! Layout state as delivered by the state-sync layer.

use serde::{Deserialize, Serialize};

use crate::{AlignmentInfo, MarginInfo, SizeSpec, StateError};

/// Per-child layout data, in child order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChildLayoutData {
    #[serde(default)]
    pub alignment: AlignmentInfo,
    #[serde(default)]
    pub expand_ratio: f64,
}

impl Default for ChildLayoutData {
    fn default() -> Self {
        Self {
            alignment: AlignmentInfo::default(),
            expand_ratio: 0.0,
        }
    }
}

/// State update for a cell-based layout.
///
/// When `cached` is set the update carries nothing new and receivers skip it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    #[serde(default)]
    pub width: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub margins: MarginInfo,
    #[serde(default)]
    pub spacing: bool,
    #[serde(default)]
    pub cached: bool,
    #[serde(default)]
    pub child_data: Vec<ChildLayoutData>,
}

impl LayoutState {
    /// A state that only tells the receiver to keep what it has.
    pub fn cached() -> Self {
        Self {
            cached: true,
            ..Self::default()
        }
    }

    pub fn width_spec(&self) -> Result<SizeSpec, StateError> {
        SizeSpec::parse(&self.width)
    }

    pub fn height_spec(&self) -> Result<SizeSpec, StateError> {
        SizeSpec::parse(&self.height)
    }
}
