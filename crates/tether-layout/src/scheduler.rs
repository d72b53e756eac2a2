//! Once-per-frame solve, evaluation and redraw scheduling.
//!
//! Three tiers of invalidation:
//! 1. `needs_resolve` (tree-wide): the constraint set changed, so the
//!    global system is solved again and every evaluator is recompiled.
//! 2. `needs_update` (per widget, inherited by descendants): evaluators are
//!    still valid but parameters changed, so geometry is re-evaluated.
//! 3. `needs_redraw` (per widget, inherited by descendants): the widget is
//!    handed to the renderer.
//!
//! Resizing the viewport or moving a named parameter only touches the
//! last two tiers.

use tether_constraint::ConstraintSystem;
use tether_core::{LayoutError, ParamId, ResolutionError, WidgetId};
use tracing::{debug, warn};

use crate::context::LayoutContext;
use crate::kind::{DrawItem, Drawable};

/// Outcome of one call to [`LayoutContext::evaluate_frame`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Whether the global system was solved this frame
    pub resolved: bool,
    /// Number of widgets whose geometry was re-evaluated
    pub evaluated: usize,
    /// Widgets to hand to the renderer, in draw order
    pub redraw: Vec<DrawItem>,
}

impl LayoutContext {
    /// Solve the whole tree and install fresh evaluators on every widget.
    ///
    /// On failure every widget loses its evaluators, so no half-applied
    /// solution can be evaluated, drawn or hit-tested.
    pub fn solve_tree(&mut self) -> Result<(), ResolutionError> {
        let mut system = ConstraintSystem::with_epsilon(self.options.epsilon);
        for node in self.widgets.values().filter(|n| n.active) {
            if node.id == self.root {
                system.add_root(node.id);
            } else {
                system.add_widget(node.id, node.scoped.iter().map(|c| c.equation.clone()));
            }
        }

        let result = system.solve().and_then(|solution| {
            self.widgets
                .values_mut()
                .filter(|n| n.active)
                .try_for_each(|node| node.apply_solution(&solution))
        });

        match result {
            Ok(()) => {
                self.needs_resolve = false;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "constraint solve failed");
                for node in self.widgets.values_mut() {
                    node.invalidate();
                }
                Err(err)
            }
        }
    }

    /// Run one frame: solve if needed, re-evaluate stale geometry and
    /// collect the widgets to redraw.
    ///
    /// Resolution errors abort the frame and leave the tree marked for a
    /// re-solve.
    pub fn evaluate_frame(&mut self) -> Result<Frame, LayoutError> {
        self.sweep();

        let mut frame = Frame::default();
        if self.needs_resolve {
            self.solve_tree()?;
            frame.resolved = true;
        }

        // Depth-first in registration order, carrying inherited flags.
        let mut stack = vec![(self.root, 0usize, false, false)];
        while let Some((id, z, inherited_update, inherited_redraw)) = stack.pop() {
            let Some(node) = self.widgets.get_mut(&id) else {
                continue;
            };

            let update = inherited_update || node.needs_update;
            if update {
                node.evaluate(&self.params)?;
                frame.evaluated += 1;
            }

            let redraw = inherited_redraw || update || node.needs_redraw;
            if redraw {
                node.needs_redraw = false;
                if let Some(geometry) = node.geometry() {
                    let debug = node.debug_string();
                    frame.redraw.push(DrawItem {
                        widget: id,
                        geometry,
                        z,
                        hovered: node.hovered,
                        content: node.kind.content(&debug),
                        debug: self.options.debug_overlay.then_some(debug),
                    });
                }
            }

            for &child in node.children.iter().rev() {
                stack.push((child, z + 1, update, redraw));
            }
        }

        debug!(
            resolved = frame.resolved,
            evaluated = frame.evaluated,
            redraw = frame.redraw.len(),
            "frame evaluated"
        );
        Ok(frame)
    }

    /// Change the viewport size.
    ///
    /// Evaluators stay valid, so this only schedules re-evaluation and
    /// redraw of the whole tree.
    pub fn on_root_resize(&mut self, width: f64, height: f64) {
        self.params.root.width = width;
        self.params.root.height = height;
        self.mark_update(self.root);
    }

    /// Set a named parameter, re-evaluating without re-solving.
    pub fn set_parameter(&mut self, id: ParamId, value: f64) -> Result<(), LayoutError> {
        let slot = self
            .params
            .named
            .get_mut(&id)
            .ok_or(LayoutError::UnknownParameter(id))?;
        *slot = value;
        self.mark_update(self.root);
        Ok(())
    }

    /// Schedule re-evaluation and redraw of a widget and its descendants.
    pub fn mark_update(&mut self, id: WidgetId) {
        if let Some(node) = self.widgets.get_mut(&id) {
            node.needs_update = true;
            node.needs_redraw = true;
        }
    }

    /// Schedule a redraw of a widget and its descendants.
    pub fn mark_redraw(&mut self, id: WidgetId) {
        if let Some(node) = self.widgets.get_mut(&id) {
            node.needs_redraw = true;
        }
    }
}
