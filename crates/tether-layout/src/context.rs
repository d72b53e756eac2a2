//! The layout context: widget arena, tree edits and constraint registration.
//!
//! A [`LayoutContext`] owns every widget of one tree together with the
//! tree-wide "needs resolve" flag. All mutation goes through it, so there
//! is no ambient state reachable from individual widgets.

use indexmap::IndexMap;
use tether_constraint::{scope, Constraint, ParamValues, ScopedConstraint, Symbol};
use tether_core::{AuthoringError, Geometry, LayoutError, Param, ParamId, WidgetId};
use tracing::debug;

use crate::kind::WidgetKind;
use crate::node::WidgetNode;
use crate::options::LayoutOptions;

/// Owner of a widget tree and its solve state.
#[derive(Debug, Clone)]
pub struct LayoutContext {
    pub(crate) options: LayoutOptions,
    /// All widgets, in creation order
    pub(crate) widgets: IndexMap<WidgetId, WidgetNode>,
    pub(crate) root: WidgetId,
    next_id: u32,
    /// Names of allocated parameters
    pub(crate) param_names: IndexMap<ParamId, String>,
    pub(crate) params: ParamValues,
    pub(crate) needs_resolve: bool,
    pub(crate) hovered: Option<WidgetId>,
}

impl Default for LayoutContext {
    fn default() -> Self {
        Self::new(LayoutOptions::default())
    }
}

impl LayoutContext {
    /// Create a context holding only the root window widget.
    pub fn new(options: LayoutOptions) -> Self {
        let root = WidgetId(0);
        let mut widgets = IndexMap::new();
        widgets.insert(root, WidgetNode::new(root, WidgetKind::Window, None));
        let params = ParamValues::new(Geometry::new(
            0.0,
            0.0,
            options.viewport_width,
            options.viewport_height,
        ));

        Self {
            options,
            widgets,
            root,
            next_id: 1,
            param_names: IndexMap::new(),
            params,
            needs_resolve: true,
            hovered: None,
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn root(&self) -> WidgetId {
        self.root
    }

    /// Get a widget by ID.
    pub fn widget(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.widgets.get(&id)
    }

    /// Mutable access for widget behavior such as editing a label's text.
    ///
    /// Marks the widget for redraw.
    pub fn widget_kind_mut(&mut self, id: WidgetId) -> Option<&mut WidgetKind> {
        let node = self.widgets.get_mut(&id)?;
        node.needs_redraw = true;
        Some(&mut node.kind)
    }

    /// Iterate over all widgets, destroyed ones included until swept.
    pub fn widgets(&self) -> impl Iterator<Item = &WidgetNode> {
        self.widgets.values()
    }

    /// Resolved geometry of a widget.
    pub fn geometry(&self, id: WidgetId) -> Option<Geometry> {
        self.widgets.get(&id).and_then(WidgetNode::geometry)
    }

    pub fn needs_resolve(&self) -> bool {
        self.needs_resolve
    }

    /// Current parameter values.
    pub fn params(&self) -> &ParamValues {
        &self.params
    }

    /// Depth in the master chain; the root is 0.
    pub fn depth(&self, id: WidgetId) -> Option<usize> {
        let mut node = self.widgets.get(&id)?;
        let mut depth = 0;
        while let Some(master) = node.master {
            node = self.widgets.get(&master)?;
            depth += 1;
        }
        Some(depth)
    }

    pub(crate) fn node(&self, id: WidgetId) -> Result<&WidgetNode, AuthoringError> {
        self.widgets
            .get(&id)
            .ok_or(AuthoringError::UnknownWidget { widget: id })
    }

    fn active_node(&self, id: WidgetId) -> Result<&WidgetNode, AuthoringError> {
        let node = self.node(id)?;
        if !node.active {
            return Err(AuthoringError::NotActive { widget: id });
        }
        Ok(node)
    }

    /// Create a widget registered as the topmost child of `master`.
    ///
    /// The widget starts with no constraints, so it must be given some
    /// before the next frame solves.
    pub fn create_widget(
        &mut self,
        master: WidgetId,
        kind: WidgetKind,
    ) -> Result<WidgetId, AuthoringError> {
        self.active_node(master)?;

        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.widgets.insert(id, WidgetNode::new(id, kind, Some(master)));
        if let Some(node) = self.widgets.get_mut(&master) {
            node.children.push(id);
        }
        self.needs_resolve = true;
        Ok(id)
    }

    /// Move `widget` under `master`, on top of its new siblings.
    ///
    /// Relative terms of the widget's constraints now refer to `master`.
    pub fn register_child(&mut self, master: WidgetId, widget: WidgetId) -> Result<(), LayoutError> {
        if widget == self.root {
            return Err(AuthoringError::RootImmutable.into());
        }
        self.active_node(master)?;
        let old_master = self.active_node(widget)?.master;

        // Walking up from the new master must not reach the widget.
        let mut cursor = Some(master);
        while let Some(id) = cursor {
            if id == widget {
                return Err(AuthoringError::Cycle { widget, master }.into());
            }
            cursor = self.widgets.get(&id).and_then(|n| n.master);
        }

        let constraints = self.node(widget)?.constraints.clone();
        let scoped = self.scope_all(widget, Some(master), &constraints)?;

        if let Some(old) = old_master.and_then(|id| self.widgets.get_mut(&id)) {
            old.children.retain(|&child| child != widget);
            old.needs_redraw = true;
        }
        if let Some(node) = self.widgets.get_mut(&master) {
            node.children.push(widget);
        }
        if let Some(node) = self.widgets.get_mut(&widget) {
            node.master = Some(master);
            node.scoped = scoped;
            node.needs_redraw = true;
        }
        self.needs_resolve = true;
        Ok(())
    }

    /// Replace a widget's constraints.
    ///
    /// This marks the whole tree for a re-solve on the next frame, which is
    /// expensive. Misuse is reported here rather than at solve time.
    pub fn set_constraints(
        &mut self,
        widget: WidgetId,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<(), LayoutError> {
        if widget == self.root {
            return Err(AuthoringError::RootConstraints.into());
        }
        let master = self.active_node(widget)?.master;
        let constraints: Vec<Constraint> = constraints.into_iter().collect();
        let scoped = self.scope_all(widget, master, &constraints)?;

        if let Some(node) = self.widgets.get_mut(&widget) {
            node.constraints = constraints;
            node.scoped = scoped;
        }
        self.needs_resolve = true;
        debug!(%widget, "constraints replaced");
        Ok(())
    }

    /// Scope constraints for `widget` and check everything they name exists.
    fn scope_all(
        &self,
        widget: WidgetId,
        frame: Option<WidgetId>,
        constraints: &[Constraint],
    ) -> Result<Vec<ScopedConstraint>, LayoutError> {
        let mut out = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            let scoped = scope(constraint, widget, frame)?;

            for &target in &scoped.references {
                self.active_node(target)?;
            }
            for symbol in scoped.equation.terms.keys() {
                match symbol {
                    Symbol::Unknown(var) => {
                        self.active_node(var.widget)?;
                    }
                    Symbol::Param(Param::Named(id)) => {
                        if !self.param_names.contains_key(id) {
                            return Err(LayoutError::UnknownParameter(*id));
                        }
                    }
                    Symbol::Param(Param::Root(_)) => {}
                }
            }
            out.push(scoped);
        }
        Ok(out)
    }

    /// Flag a widget and its descendants as destroyed.
    ///
    /// They stay in the tree until the next [`LayoutContext::sweep`] and
    /// are never solved against again.
    pub fn destroy(&mut self, widget: WidgetId) -> Result<(), AuthoringError> {
        if widget == self.root {
            return Err(AuthoringError::RootImmutable);
        }
        self.node(widget)?;

        let mut stack = vec![widget];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.widgets.get_mut(&id) {
                node.active = false;
                node.hovered = false;
                stack.extend(node.children.iter().copied());
            }
            if self.hovered == Some(id) {
                self.hovered = None;
            }
        }
        self.needs_resolve = true;
        Ok(())
    }

    /// Detach destroyed widgets from their masters and drop them.
    ///
    /// Returns how many widgets were removed.
    pub fn sweep(&mut self) -> usize {
        let dead: Vec<WidgetId> = self
            .widgets
            .values()
            .filter(|node| !node.active)
            .map(|node| node.id)
            .collect();
        if dead.is_empty() {
            return 0;
        }

        for &id in &dead {
            let master = self.widgets.get(&id).and_then(|n| n.master);
            if let Some(node) = master.and_then(|m| self.widgets.get_mut(&m)) {
                node.children.retain(|&child| child != id);
                node.needs_redraw = true;
            }
        }
        for id in &dead {
            self.widgets.shift_remove(id);
        }

        debug!(removed = dead.len(), "swept destroyed widgets");
        dead.len()
    }

    /// Allocate a named parameter usable in constraints.
    pub fn create_parameter(&mut self, name: impl Into<String>, initial: f64) -> ParamId {
        let id = ParamId(self.param_names.len() as u32);
        self.param_names.insert(id, name.into());
        self.params.named.insert(id, initial);
        id
    }

    pub fn parameter_name(&self, id: ParamId) -> Option<&str> {
        self.param_names.get(&id).map(String::as_str)
    }
}
