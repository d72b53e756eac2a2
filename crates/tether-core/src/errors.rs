//! Error types for the tether engine.

use crate::types::{ParamId, Prop, WidgetId};
use thiserror::Error;

/// Top-level error type for layout operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error(transparent)]
    Authoring(#[from] AuthoringError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("Unknown parameter {0}")]
    UnknownParameter(ParamId),

    #[error("Widget {widget} has no solved geometry")]
    Unsolved { widget: WidgetId },
}

/// Misuse detected while registering constraints or editing the tree.
///
/// These are raised synchronously by the call that introduced them, before
/// any solve runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthoringError {
    #[error("Constraint of widget {widget} references the widget itself as its target")]
    SelfReference { widget: WidgetId },

    #[error("Widget {widget} does not exist in this layout context")]
    UnknownWidget { widget: WidgetId },

    #[error("Widget {widget} has been destroyed")]
    NotActive { widget: WidgetId },

    #[error("The root widget's geometry is fixed by the viewport and takes no constraints")]
    RootConstraints,

    #[error("The root widget can not be destroyed or re-parented")]
    RootImmutable,

    #[error("Registering {widget} under {master} would create a cycle")]
    Cycle { widget: WidgetId, master: WidgetId },

    #[error("Constraint of widget {widget} has a non-finite coefficient")]
    NonFiniteCoefficient { widget: WidgetId },
}

/// Failures of the global solve.
///
/// Neither variant is recovered locally; both abort the current solve.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolutionError {
    #[error(
        "No solution exists: constraint `{constraint}` of widget {widget} contradicts the \
         constraints registered before it. Look for edges pinned twice, for instance both \
         opposite edges plus an explicit size"
    )]
    Unsatisfiable { widget: WidgetId, constraint: String },

    #[error(
        "Couldn't resolve {prop} of widget {widget}: its constraints are too lax to pin it \
         to a single value"
    )]
    Underdetermined { widget: WidgetId, prop: Prop },
}
