//! High-level constraint system interface.
//!
//! A [`ConstraintSystem`] collects every widget's scoped equations and
//! solves them together in one pass. Constraints are frequently
//! cross-widget, so the whole tree is always solved at once.

use indexmap::IndexMap;
use tether_core::{Param, Prop, ResolutionError, Variable, WidgetId};
use tracing::{debug, warn};

use crate::compiled::CompiledExpr;
use crate::scope::ScopedEquation;
use crate::tableau::{Insertion, Tableau, DEFAULT_EPSILON};

/// The solution to a constraint system.
#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub variables: IndexMap<Variable, CompiledExpr>,
}

impl Solution {
    /// Get the compiled value of a variable.
    pub fn get(&self, var: Variable) -> Option<&CompiledExpr> {
        self.variables.get(&var)
    }

    /// Get the compiled value of one of a widget's properties.
    pub fn property(&self, widget: WidgetId, prop: Prop) -> Option<&CompiledExpr> {
        self.get(Variable::new(widget, prop))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Equations of every widget in a tree, ready to be solved together.
#[derive(Debug, Clone)]
pub struct ConstraintSystem {
    /// Equations per widget, in registration order
    widgets: IndexMap<WidgetId, Vec<ScopedEquation>>,
    epsilon: f64,
}

impl Default for ConstraintSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintSystem {
    /// Create a new constraint system.
    pub fn new() -> Self {
        Self::with_epsilon(DEFAULT_EPSILON)
    }

    pub fn with_epsilon(epsilon: f64) -> Self {
        Self {
            widgets: IndexMap::new(),
            epsilon,
        }
    }

    /// Add the root widget, whose geometry equals the root parameters.
    pub fn add_root(&mut self, root: WidgetId) {
        let equations = Prop::ALL
            .iter()
            .map(|&prop| ScopedEquation::pin(Variable::new(root, prop), Param::Root(prop)))
            .collect();
        self.widgets.insert(root, equations);
    }

    /// Add a widget together with its equations.
    pub fn add_widget(
        &mut self,
        widget: WidgetId,
        equations: impl IntoIterator<Item = ScopedEquation>,
    ) {
        self.widgets
            .entry(widget)
            .or_default()
            .extend(equations);
    }

    /// Number of registered widgets.
    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Number of registered equations.
    pub fn equation_count(&self) -> usize {
        self.widgets.values().map(Vec::len).sum()
    }

    /// Solve the constraint system.
    ///
    /// The returned solution holds every registered widget variable the
    /// system pins; variables left free are simply absent, which callers
    /// report per widget. An empty system yields an empty solution.
    pub fn solve(&self) -> Result<Solution, ResolutionError> {
        debug!(
            widgets = self.widget_count(),
            equations = self.equation_count(),
            "solving constraint system"
        );

        let mut tableau = Tableau::new(self.epsilon);
        let mut redundant = 0usize;

        for (&widget, equations) in &self.widgets {
            for equation in equations {
                match tableau.add_equation(equation) {
                    Ok(Insertion::Pivot(_)) => {}
                    Ok(Insertion::Redundant) => redundant += 1,
                    Err(_) => {
                        warn!(%widget, constraint = %equation.source, "unsatisfiable constraint");
                        return Err(ResolutionError::Unsatisfiable {
                            widget,
                            constraint: equation.source.clone(),
                        });
                    }
                }
            }
        }

        let mut solution = Solution::default();
        for &widget in self.widgets.keys() {
            for var in Variable::all(widget) {
                if let Some(expr) = tableau.solution(var) {
                    solution.variables.insert(var, expr);
                }
            }
        }

        debug!(
            rank = tableau.rank(),
            redundant,
            solved = solution.len(),
            "constraint system solved"
        );
        Ok(solution)
    }
}
