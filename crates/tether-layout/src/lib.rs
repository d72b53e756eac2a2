//! Constraint-driven layout of widget trees.
//!
//! Each widget declares linear equations relating its geometry to its
//! master's (or another widget's). A [`LayoutContext`] owns the tree and
//! turns those equations into numeric geometry every frame.
//!
//! # Architecture
//!
//! 1. **Solve**: when the constraint set changes, every widget's equations
//!    are solved together and compiled into evaluators that stay symbolic
//!    in the viewport and named parameters
//! 2. **Evaluate**: stale widgets re-run their evaluators, which is all a
//!    resize or an animation tick costs
//! 3. **Redraw**: dirty widgets are handed to the renderer as [`DrawItem`]s
//! 4. **Dispatch**: pointer events are routed to the deepest covering widget
//!
//! # Example
//!
//! ```
//! use tether_layout::{LayoutContext, LayoutOptions, WidgetKind};
//! use tether_layout::builders::{bottom_inside, left_inside, percent_of_width, top_inside};
//!
//! let mut ctx = LayoutContext::new(LayoutOptions::default().with_viewport(800.0, 450.0));
//! let pane = ctx.create_widget(ctx.root(), WidgetKind::Panel).unwrap();
//! ctx.set_constraints(
//!     pane,
//!     [left_inside(10.0), top_inside(10.0), bottom_inside(10.0), percent_of_width(0.2)],
//! )
//! .unwrap();
//!
//! ctx.evaluate_frame().unwrap();
//! let geometry = ctx.geometry(pane).unwrap();
//! assert!((geometry.width - 160.0).abs() < 1e-9);
//! assert!((geometry.height - 430.0).abs() < 1e-9);
//! ```

mod context;
mod hit;
mod kind;
mod node;
mod options;
mod scheduler;

pub use context::LayoutContext;
pub use hit::HoverChange;
pub use kind::{DrawContent, DrawItem, Drawable, HitTarget, WidgetKind};
pub use node::WidgetNode;
pub use options::LayoutOptions;
pub use scheduler::Frame;

pub use tether_constraint::builders;
pub use tether_constraint::{Constraint, Equation, Expression, Term};
pub use tether_core::{
    AuthoringError, Geometry, LayoutError, Param, ParamId, Prop, ResolutionError, Variable,
    WidgetId,
};
