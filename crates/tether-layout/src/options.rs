//! Layout configuration.

use tether_constraint::DEFAULT_EPSILON;

/// Options for a layout context.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Initial width of the root viewport
    pub viewport_width: f64,
    /// Initial height of the root viewport
    pub viewport_height: f64,
    /// Relative tolerance under which the solver treats a sum as cancelled.
    ///
    /// It is scaled by the magnitudes being combined, so small factors are
    /// kept and rounding on large coordinates does not read as a conflict.
    pub epsilon: f64,
    /// Attach each widget's debug string to its draw item
    pub debug_overlay: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            epsilon: DEFAULT_EPSILON,
            debug_overlay: false,
        }
    }
}

impl LayoutOptions {
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    pub fn with_debug_overlay(mut self, enabled: bool) -> Self {
        self.debug_overlay = enabled;
        self
    }
}
