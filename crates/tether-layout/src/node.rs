//! Per-widget geometry state.

use std::fmt::Write as _;

use glam::DVec2;
use tether_constraint::{CompiledExpr, Constraint, ParamValues, ScopedConstraint, Solution};
use tether_core::{Geometry, LayoutError, Param, Prop, ResolutionError, WidgetId};
use tracing::trace;

use crate::kind::WidgetKind;

/// A widget in the layout tree.
#[derive(Debug, Clone)]
pub struct WidgetNode {
    pub(crate) id: WidgetId,
    pub(crate) kind: WidgetKind,
    /// Master (parent) widget, `None` for the root
    pub(crate) master: Option<WidgetId>,
    /// Children in registration order, which is also their z-order
    pub(crate) children: Vec<WidgetId>,
    /// Constraints as authored
    pub(crate) constraints: Vec<Constraint>,
    /// Constraints rewritten onto global variables
    pub(crate) scoped: Vec<ScopedConstraint>,
    /// Evaluators from the last successful solve
    pub(crate) compiled: Option<[CompiledExpr; 4]>,
    pub(crate) geometry: Geometry,
    pub(crate) evaluated: bool,
    pub(crate) needs_update: bool,
    pub(crate) needs_redraw: bool,
    pub(crate) active: bool,
    pub(crate) hovered: bool,
    pub(crate) last_pointer: Option<DVec2>,
}

impl WidgetNode {
    pub(crate) fn new(id: WidgetId, kind: WidgetKind, master: Option<WidgetId>) -> Self {
        Self {
            id,
            kind,
            master,
            children: Vec::new(),
            constraints: Vec::new(),
            scoped: Vec::new(),
            compiled: None,
            geometry: Geometry::default(),
            evaluated: false,
            needs_update: true,
            needs_redraw: true,
            active: true,
            hovered: false,
            last_pointer: None,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    pub fn kind(&self) -> &WidgetKind {
        &self.kind
    }

    pub fn master(&self) -> Option<WidgetId> {
        self.master
    }

    pub fn children(&self) -> &[WidgetId] {
        &self.children
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Widgets this one's targeted constraints point at.
    pub fn dependencies(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.scoped.iter().flat_map(|c| c.references.iter().copied())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    pub fn last_pointer(&self) -> Option<DVec2> {
        self.last_pointer
    }

    /// Resolved geometry, once the widget has been solved and evaluated.
    pub fn geometry(&self) -> Option<Geometry> {
        (self.compiled.is_some() && self.evaluated).then_some(self.geometry)
    }

    /// Compiled evaluators from the last successful solve.
    pub fn compiled(&self) -> Option<&[CompiledExpr; 4]> {
        self.compiled.as_ref()
    }

    /// Install evaluators for this widget's four variables.
    ///
    /// Leaves the widget untouched and fails if any of them is missing
    /// from `solution`.
    pub fn apply_solution(&mut self, solution: &Solution) -> Result<(), ResolutionError> {
        let lookup = |prop: Prop| {
            solution
                .property(self.id, prop)
                .cloned()
                .ok_or(ResolutionError::Underdetermined {
                    widget: self.id,
                    prop,
                })
        };
        let compiled = [
            lookup(Prop::X)?,
            lookup(Prop::Y)?,
            lookup(Prop::Width)?,
            lookup(Prop::Height)?,
        ];
        self.compiled = Some(compiled);
        self.evaluated = false;
        self.needs_update = true;
        self.needs_redraw = true;
        Ok(())
    }

    /// Drop evaluators and geometry after a failed solve.
    pub(crate) fn invalidate(&mut self) {
        self.compiled = None;
        self.evaluated = false;
    }

    /// Evaluate the compiled functions against `params` and store the result.
    pub fn evaluate(&mut self, params: &ParamValues) -> Result<Geometry, LayoutError> {
        let widget = self.id;
        let compiled = self
            .compiled
            .as_ref()
            .ok_or(LayoutError::Unsolved { widget })?;

        let mut values = [0.0; 4];
        for (value, expr) in values.iter_mut().zip(compiled.iter()) {
            *value = expr.evaluate(params).ok_or_else(|| match expr.missing_param(params) {
                Some(Param::Named(id)) => LayoutError::UnknownParameter(id),
                _ => LayoutError::Unsolved { widget },
            })?;
        }

        self.geometry = Geometry::from_array(values);
        self.evaluated = true;
        self.needs_update = false;
        trace!(widget = %self.id, geometry = ?self.geometry, "evaluated widget");
        Ok(self.geometry)
    }

    /// Right edge (x + width) of the resolved geometry.
    pub fn right_edge(&self) -> Option<f64> {
        self.geometry().map(|g| g.right())
    }

    /// Top edge (y + height) of the resolved geometry.
    pub fn top_edge(&self) -> Option<f64> {
        self.geometry().map(|g| g.top())
    }

    pub fn center_x(&self) -> Option<f64> {
        self.geometry().map(|g| g.center_x())
    }

    pub fn center_y(&self) -> Option<f64> {
        self.geometry().map(|g| g.center_y())
    }

    /// Symbolic solution and last value of each variable, one per line.
    pub fn debug_string(&self) -> String {
        let mut out = String::new();
        for prop in Prop::ALL {
            let value = self.geometry.get(prop);
            match &self.compiled {
                Some(compiled) => {
                    let _ = writeln!(out, "{}={}={:.0}", prop, compiled[prop.index()], value);
                }
                None => {
                    let _ = writeln!(out, "{}=?", prop);
                }
            }
        }
        if let Some(pointer) = self.last_pointer {
            let _ = write!(out, "pointer=({:.0}, {:.0})", pointer.x, pointer.y);
        }
        out.trim_end().to_string()
    }
}
