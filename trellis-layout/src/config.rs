//! Layout configuration.

use std::time::Duration;

use serde::Deserialize;

/// Tunables for the layout manager and scrollbars.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Passes allowed before a layout run is abandoned as non-convergent.
    pub max_passes: usize,
    /// Log element lists for every pass (expensive).
    pub debug_logging: bool,
    /// Thickness shown while revealing an invisible scrollbar.
    pub invisible_scrollbar_size: f64,
    /// How long an invisible scrollbar stays revealed, in milliseconds.
    pub temporary_resize_delay_ms: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_passes: 100,
            debug_logging: false,
            invisible_scrollbar_size: 13.0,
            temporary_resize_delay_ms: 1000,
        }
    }
}

impl LayoutConfig {
    pub fn temporary_resize_delay(&self) -> Duration {
        Duration::from_millis(self.temporary_resize_delay_ms)
    }
}
