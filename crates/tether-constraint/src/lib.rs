//! Constraint expressions and solving for tether layouts.
//!
//! This crate implements:
//! - A small symbolic vocabulary of linear constraints ([`builders`])
//! - Scoping of widget-local constraints onto global variables
//! - Parametric Gaussian elimination over the whole tree
//! - Compiled evaluators, affine in the root and named parameters

pub mod builders;
mod compiled;
mod expression;
mod scope;
mod system;
mod tableau;

pub use compiled::{CompiledExpr, ParamValues};
pub use expression::{Constraint, Equation, Expression, Term};
pub use scope::{scope, ScopedConstraint, ScopedEquation, Symbol};
pub use system::{ConstraintSystem, Solution};
pub use tableau::{Contradiction, Insertion, Tableau, DEFAULT_EPSILON};
