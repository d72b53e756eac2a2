//! Widget kinds and what they hand to the renderer.

use tether_core::{Geometry, WidgetId};

/// The behavior attached to a widget, beyond its geometry.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    /// The viewport itself. Only the root has this kind.
    Window,
    /// A plain rectangle.
    Panel,
    /// A text label; with no text it shows the widget's debug string.
    Label { text: Option<String> },
    Checkbox { checked: bool },
}

/// What a renderer should paint for one widget.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawContent {
    Background,
    Text(String),
    Checkbox { checked: bool },
}

/// One widget handed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    pub widget: WidgetId,
    pub geometry: Geometry,
    /// Depth in the master chain, root = 0
    pub z: usize,
    pub hovered: bool,
    pub content: DrawContent,
    /// Present when the debug overlay is enabled.
    pub debug: Option<String>,
}

/// Widgets that can produce renderer output.
pub trait Drawable {
    /// Content to paint; `debug` is the widget's debug string.
    fn content(&self, debug: &str) -> DrawContent;
}

/// Widgets that react to pointer presses.
pub trait HitTarget {
    /// Handle a press. Returns true when the widget needs a redraw.
    fn press(&mut self) -> bool;
}

impl Drawable for WidgetKind {
    fn content(&self, debug: &str) -> DrawContent {
        match self {
            WidgetKind::Window | WidgetKind::Panel => DrawContent::Background,
            WidgetKind::Label { text } => {
                DrawContent::Text(text.clone().unwrap_or_else(|| debug.to_string()))
            }
            WidgetKind::Checkbox { checked } => DrawContent::Checkbox { checked: *checked },
        }
    }
}

impl HitTarget for WidgetKind {
    fn press(&mut self) -> bool {
        match self {
            WidgetKind::Checkbox { checked } => {
                *checked = !*checked;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_falls_back_to_debug_string() {
        let label = WidgetKind::Label { text: None };
        assert_eq!(label.content("x=0"), DrawContent::Text("x=0".to_string()));

        let label = WidgetKind::Label {
            text: Some("Left".to_string()),
        };
        assert_eq!(label.content("x=0"), DrawContent::Text("Left".to_string()));
    }

    #[test]
    fn test_checkbox_toggles_on_press() {
        let mut checkbox = WidgetKind::Checkbox { checked: false };
        assert!(checkbox.press());
        assert_eq!(checkbox, WidgetKind::Checkbox { checked: true });

        let mut panel = WidgetKind::Panel;
        assert!(!panel.press());
    }
}
