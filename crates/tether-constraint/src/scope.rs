//! Scoping of authored constraints onto global variables.

use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tether_core::{AuthoringError, Param, Variable, WidgetId};

use crate::expression::{accumulate, write_linear, Constraint, Term, EPSILON};

/// A symbol of the global system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// An unknown solved for.
    Unknown(Variable),
    /// A parameter the solution stays symbolic in.
    Param(Param),
}

impl Symbol {
    pub fn is_unknown(&self) -> bool {
        matches!(self, Symbol::Unknown(_))
    }

    pub fn is_param(&self) -> bool {
        matches!(self, Symbol::Param(_))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Unknown(var) => write!(f, "{}", var),
            Symbol::Param(param) => write!(f, "{}", param),
        }
    }
}

/// An equation over global symbols: `constant + Σ(coefficient * symbol) = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedEquation {
    pub constant: f64,
    pub terms: IndexMap<Symbol, f64>,
    /// The authored form, kept for error messages.
    pub source: String,
}

impl ScopedEquation {
    /// The equation `var = param`.
    pub fn pin(var: Variable, param: Param) -> Self {
        let mut terms = IndexMap::new();
        terms.insert(Symbol::Unknown(var), 1.0);
        terms.insert(Symbol::Param(param), -1.0);
        Self {
            constant: 0.0,
            terms,
            source: format!("{} = {}", var, param),
        }
    }

    /// Widgets whose variables occur in this equation.
    pub fn widgets(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.terms.keys().filter_map(|symbol| match symbol {
            Symbol::Unknown(var) => Some(var.widget),
            Symbol::Param(_) => None,
        })
    }

    /// Named parameters used by this equation.
    pub fn params(&self) -> impl Iterator<Item = Param> + '_ {
        self.terms.keys().filter_map(|symbol| match symbol {
            Symbol::Param(param) => Some(*param),
            Symbol::Unknown(_) => None,
        })
    }
}

impl fmt::Display for ScopedEquation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_linear(
            f,
            self.terms.iter().map(|(s, c)| (s as &dyn fmt::Display, *c)),
            self.constant,
        )?;
        f.write_str(" = 0")
    }
}

/// A constraint whose terms all name global symbols.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopedConstraint {
    pub equation: ScopedEquation,
    pub references: SmallVec<[WidgetId; 2]>,
}

/// Rewrite an authored constraint for `owner`.
///
/// `Own` terms become `owner`'s variables and `Relative` terms become
/// `frame`'s. The root has no frame, so a relative term there is an error.
pub fn scope(
    constraint: &Constraint,
    owner: WidgetId,
    frame: Option<WidgetId>,
) -> Result<ScopedConstraint, AuthoringError> {
    if constraint.references().contains(&owner) {
        return Err(AuthoringError::SelfReference { widget: owner });
    }

    let residual = constraint.equation().residual();
    if !residual.constant.is_finite() {
        return Err(AuthoringError::NonFiniteCoefficient { widget: owner });
    }

    let mut terms: IndexMap<Symbol, f64> = IndexMap::new();
    for (&term, &coeff) in residual.terms() {
        if !coeff.is_finite() {
            return Err(AuthoringError::NonFiniteCoefficient { widget: owner });
        }
        let symbol = match term {
            Term::Own(prop) => Symbol::Unknown(Variable::new(owner, prop)),
            Term::Relative(prop) => {
                let frame = frame.ok_or(AuthoringError::RootConstraints)?;
                Symbol::Unknown(Variable::new(frame, prop))
            }
            Term::Var(var) => Symbol::Unknown(var),
            Term::Param(param) => Symbol::Param(param),
        };
        accumulate(&mut terms, symbol, coeff, EPSILON);
    }

    Ok(ScopedConstraint {
        equation: ScopedEquation {
            constant: residual.constant,
            terms,
            source: constraint.to_string(),
        },
        references: constraint.references().iter().copied().collect(),
    })
}
