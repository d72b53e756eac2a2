//! Pointer hit-testing and dispatch.

use glam::DVec2;
use tether_core::WidgetId;
use tracing::debug;

use crate::context::LayoutContext;
use crate::kind::HitTarget;

/// Hover transition caused by a pointer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverChange {
    pub previous: Option<WidgetId>,
    pub current: Option<WidgetId>,
}

impl HoverChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

impl LayoutContext {
    /// Find the deepest widget whose resolved bounds contain `point`.
    ///
    /// Siblings are tried topmost (last registered) first and the first one
    /// strictly containing the point wins. Falls back to the root; `None`
    /// only when the tree has no resolved geometry.
    pub fn locate(&self, point: DVec2) -> Option<WidgetId> {
        let mut current = self.widgets.get(&self.root)?;
        current.geometry()?;

        'descend: loop {
            for child in current.children.iter().rev() {
                let Some(node) = self.widgets.get(child) else {
                    continue;
                };
                if !node.active {
                    continue;
                }
                if let Some(geometry) = node.geometry() {
                    if geometry.contains(point.x, point.y) {
                        current = node;
                        continue 'descend;
                    }
                }
            }
            return Some(current.id);
        }
    }

    /// Route a pointer move, updating the single hovered widget.
    ///
    /// Only the previously and newly hovered widgets are marked for redraw.
    pub fn pointer_moved(&mut self, point: DVec2) -> HoverChange {
        let current = self.locate(point);
        let change = HoverChange {
            previous: self.hovered,
            current,
        };

        if let Some(node) = current.and_then(|id| self.widgets.get_mut(&id)) {
            node.last_pointer = Some(point);
        }

        if change.changed() {
            if let Some(node) = change.previous.and_then(|id| self.widgets.get_mut(&id)) {
                node.hovered = false;
                node.needs_redraw = true;
            }
            if let Some(node) = current.and_then(|id| self.widgets.get_mut(&id)) {
                node.hovered = true;
                node.needs_redraw = true;
            }
            self.hovered = current;
            debug!(previous = ?change.previous, current = ?change.current, "hover changed");
        }
        change
    }

    /// Route a pointer press to the widget under `point`.
    pub fn pointer_pressed(&mut self, point: DVec2) -> Option<WidgetId> {
        let id = self.locate(point)?;
        if let Some(node) = self.widgets.get_mut(&id) {
            node.last_pointer = Some(point);
            if node.kind.press() {
                node.needs_redraw = true;
            }
        }
        Some(id)
    }

    /// The widget currently under the pointer.
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }
}
