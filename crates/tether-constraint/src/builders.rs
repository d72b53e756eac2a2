//! Ready-made constraints.
//!
//! Each function returns one constraint in terms of the authoring widget
//! (`self`) and its reference frame (`relative`, the master unless rebound
//! with [`bind_to`]). Nothing is validated here; bad combinations surface
//! when the tree is solved.

use tether_core::{Param, ParamId, Prop, Variable, WidgetId};

use crate::expression::{Constraint, Equation, Expression, Term};

/// Geometry of the authoring widget.
pub fn own(prop: Prop) -> Expression {
    Expression::from_term(Term::Own(prop))
}

/// Geometry of the reference frame.
pub fn relative(prop: Prop) -> Expression {
    Expression::from_term(Term::Relative(prop))
}

/// Geometry of an explicit widget.
pub fn var(widget: WidgetId, prop: Prop) -> Expression {
    Expression::from_term(Term::Var(Variable::new(widget, prop)))
}

/// A named parameter.
pub fn param(id: ParamId) -> Expression {
    Expression::from_term(Term::Param(Param::Named(id)))
}

/// Top edge (y + height) of another widget.
pub fn top_edge(widget: WidgetId) -> Expression {
    var(widget, Prop::Y) + var(widget, Prop::Height)
}

/// Right edge (x + width) of another widget.
pub fn right_edge(widget: WidgetId) -> Expression {
    var(widget, Prop::X) + var(widget, Prop::Width)
}

/// width = height × ratio
pub fn aspect(ratio: f64) -> Constraint {
    own(Prop::Width).equals(own(Prop::Height) * ratio).into()
}

/// width = relative width × factor
pub fn percent_of_width(factor: f64) -> Constraint {
    own(Prop::Width).equals(relative(Prop::Width) * factor).into()
}

/// height = relative height × factor
pub fn percent_of_height(factor: f64) -> Constraint {
    own(Prop::Height).equals(relative(Prop::Height) * factor).into()
}

/// x = relative width × factor
///
/// The position is a fraction of the frame's size, not an offset from its
/// origin.
pub fn x_percent(factor: f64) -> Constraint {
    own(Prop::X).equals(relative(Prop::Width) * factor).into()
}

/// y = relative height × factor
pub fn y_percent(factor: f64) -> Constraint {
    own(Prop::Y).equals(relative(Prop::Height) * factor).into()
}

/// Left edge `pixels` inside the frame's left edge.
pub fn left_inside(pixels: impl Into<Expression>) -> Constraint {
    own(Prop::X).equals(relative(Prop::X) + pixels).into()
}

/// Bottom edge `pixels` inside the frame's bottom edge.
pub fn bottom_inside(pixels: impl Into<Expression>) -> Constraint {
    own(Prop::Y).equals(relative(Prop::Y) + pixels).into()
}

/// Right edge `pixels` inside the frame's right edge.
pub fn right_inside(pixels: impl Into<Expression>) -> Constraint {
    (own(Prop::X) + own(Prop::Width))
        .equals(relative(Prop::X) + relative(Prop::Width) - pixels)
        .into()
}

/// Top edge `pixels` inside the frame's top edge.
pub fn top_inside(pixels: impl Into<Expression>) -> Constraint {
    (own(Prop::Y) + own(Prop::Height))
        .equals(relative(Prop::Y) + relative(Prop::Height) - pixels)
        .into()
}

/// Bottom edge `pixels` above `widget`'s top edge.
pub fn over(widget: WidgetId, pixels: impl Into<Expression>) -> Constraint {
    Constraint::targeted(own(Prop::Y).equals(top_edge(widget) + pixels), [widget])
}

/// Top edge `pixels` below `widget`'s bottom edge.
pub fn under(widget: WidgetId, pixels: impl Into<Expression>) -> Constraint {
    Constraint::targeted(
        (own(Prop::Y) + own(Prop::Height)).equals(var(widget, Prop::Y) - pixels),
        [widget],
    )
}

/// Left edge `pixels` right of `widget`'s right edge.
pub fn right_of(widget: WidgetId, pixels: impl Into<Expression>) -> Constraint {
    Constraint::targeted(own(Prop::X).equals(right_edge(widget) + pixels), [widget])
}

/// Right edge `pixels` left of `widget`'s left edge.
pub fn left_of(widget: WidgetId, pixels: impl Into<Expression>) -> Constraint {
    Constraint::targeted(
        (own(Prop::X) + own(Prop::Width)).equals(var(widget, Prop::X) - pixels),
        [widget],
    )
}

/// Shift an equation on `x`/`y` so it constrains the widget's center.
pub fn self_centered(equation: Equation) -> Equation {
    let mut equation = equation;
    equation.substitute(Term::Own(Prop::X), &(own(Prop::X) + own(Prop::Width) / 2.0));
    equation.substitute(Term::Own(Prop::Y), &(own(Prop::Y) + own(Prop::Height) / 2.0));
    equation
}

/// Horizontal center on the frame's horizontal center.
pub fn centered_x() -> Constraint {
    self_centered(own(Prop::X).equals(relative(Prop::X) + relative(Prop::Width) / 2.0)).into()
}

/// Vertical center on the frame's vertical center.
pub fn centered_y() -> Constraint {
    self_centered(own(Prop::Y).equals(relative(Prop::Y) + relative(Prop::Height) / 2.0)).into()
}

/// Cover the whole frame.
pub fn fill() -> [Constraint; 4] {
    Prop::ALL.map(|prop| own(prop).equals(relative(prop)).into())
}

/// Point the constraint's relative terms at `widget` instead of the master.
pub fn bind_to(widget: WidgetId, constraint: impl Into<Constraint>) -> Constraint {
    let constraint = constraint.into();
    let equation = constraint.equation().map_terms(|term| match term {
        Term::Relative(prop) => Term::Var(Variable::new(widget, prop)),
        other => other,
    });
    let mut references: Vec<WidgetId> = constraint.references().to_vec();
    if !references.contains(&widget) {
        references.push(widget);
    }
    Constraint::targeted(equation, references)
}
