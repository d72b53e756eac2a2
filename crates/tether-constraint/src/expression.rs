//! Symbolic linear expressions and the constraints built from them.
//!
//! Constraints are authored "as if" local to one widget: `Term::Own` stands
//! for the authoring widget's geometry and `Term::Relative` for its
//! reference frame (the master, unless rebound). Both are rewritten to
//! concrete [`Variable`]s when the constraint is scoped.

use std::fmt;
use std::hash::Hash;
use std::ops::{Add, Div, Mul, Neg, Sub};

use indexmap::map::Entry;
use indexmap::IndexMap;
use smallvec::SmallVec;
use tether_core::{Param, Prop, Variable, WidgetId};

/// Relative tolerance under which a sum counts as cancelled.
pub(crate) const EPSILON: f64 = 1e-8;

/// Add `coefficient` to the entry for `key`, removing the entry when the
/// sum cancels out.
///
/// Cancellation is judged against the larger of the two addends, so a tiny
/// coefficient on its own is kept while `1.0 - 0.9999999999` is dropped.
pub(crate) fn accumulate<K: Hash + Eq>(
    cells: &mut IndexMap<K, f64>,
    key: K,
    coefficient: f64,
    epsilon: f64,
) {
    if coefficient == 0.0 {
        return;
    }
    match cells.entry(key) {
        Entry::Occupied(mut entry) => {
            let scale = entry.get().abs().max(coefficient.abs());
            *entry.get_mut() += coefficient;
            if entry.get().abs() <= epsilon * scale {
                entry.shift_remove();
            }
        }
        Entry::Vacant(entry) => {
            entry.insert(coefficient);
        }
    }
}

/// A symbol appearing in an authored expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Term {
    /// Geometry of the authoring widget.
    Own(Prop),
    /// Geometry of the reference frame.
    Relative(Prop),
    /// Geometry of an explicit widget.
    Var(Variable),
    /// A free parameter.
    Param(Param),
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Own(prop) => write!(f, "self.{}", prop),
            Term::Relative(prop) => write!(f, "relative.{}", prop),
            Term::Var(var) => write!(f, "{}", var),
            Term::Param(param) => write!(f, "{}", param),
        }
    }
}

/// A linear expression in the form: constant + Σ(coefficient * term)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub constant: f64,
    terms: IndexMap<Term, f64>,
}

impl Expression {
    /// Create a constant expression.
    pub fn from_constant(value: f64) -> Self {
        Self {
            constant: value,
            terms: IndexMap::new(),
        }
    }

    /// Create an expression from a single term.
    pub fn from_term(term: Term) -> Self {
        let mut terms = IndexMap::new();
        terms.insert(term, 1.0);
        Self { constant: 0.0, terms }
    }

    /// Add a term to the expression.
    pub fn add_term(&mut self, term: Term, coefficient: f64) {
        accumulate(&mut self.terms, term, coefficient, EPSILON);
    }

    /// Multiply the expression by a scalar.
    pub fn multiply(&mut self, scalar: f64) {
        self.constant *= scalar;
        for coeff in self.terms.values_mut() {
            *coeff *= scalar;
        }
    }

    /// Add another expression to this one.
    pub fn add_expression(&mut self, other: &Expression, multiplier: f64) {
        self.constant += other.constant * multiplier;
        for (&term, &coeff) in &other.terms {
            self.add_term(term, coeff * multiplier);
        }
    }

    /// Get the coefficient for a term.
    pub fn coefficient(&self, term: Term) -> f64 {
        self.terms.get(&term).copied().unwrap_or(0.0)
    }

    /// Check if this expression contains the given term.
    pub fn contains(&self, term: Term) -> bool {
        self.terms.contains_key(&term)
    }

    /// Substitute a term with an expression.
    pub fn substitute(&mut self, term: Term, expr: &Expression) {
        if let Some(coeff) = self.terms.shift_remove(&term) {
            self.add_expression(expr, coeff);
        }
    }

    /// Replace every term through `map`, keeping coefficients.
    pub fn map_terms(&self, mut map: impl FnMut(Term) -> Term) -> Expression {
        let mut out = Expression::from_constant(self.constant);
        for (&term, &coeff) in &self.terms {
            out.add_term(map(term), coeff);
        }
        out
    }

    /// Get an iterator over the terms.
    pub fn terms(&self) -> impl Iterator<Item = (&Term, &f64)> {
        self.terms.iter()
    }

    /// Build the equation `self = rhs`.
    pub fn equals(self, rhs: impl Into<Expression>) -> Equation {
        Equation::new(self, rhs)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_linear(f, self.terms.iter().map(|(t, c)| (t as &dyn fmt::Display, *c)), self.constant)
    }
}

/// Write `c1*s1 + c2*s2 - k` style output shared by every linear form.
pub(crate) fn write_linear<'a>(
    f: &mut fmt::Formatter<'_>,
    terms: impl Iterator<Item = (&'a dyn fmt::Display, f64)>,
    constant: f64,
) -> fmt::Result {
    let mut first = true;
    for (symbol, coeff) in terms {
        let magnitude = coeff.abs();
        let sign = if coeff < 0.0 { "-" } else { "+" };
        if first {
            if coeff < 0.0 {
                f.write_str("-")?;
            }
        } else {
            write!(f, " {} ", sign)?;
        }
        if (magnitude - 1.0).abs() < EPSILON {
            write!(f, "{}", symbol)?;
        } else {
            write!(f, "{}*{}", magnitude, symbol)?;
        }
        first = false;
    }
    if first {
        write!(f, "{}", constant)
    } else if constant.abs() >= EPSILON {
        let sign = if constant < 0.0 { "-" } else { "+" };
        write!(f, " {} {}", sign, constant.abs())
    } else {
        Ok(())
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Expression::from_term(term)
    }
}

impl From<f64> for Expression {
    fn from(value: f64) -> Self {
        Expression::from_constant(value)
    }
}

impl<T: Into<Expression>> Add<T> for Expression {
    type Output = Expression;

    fn add(mut self, rhs: T) -> Expression {
        self.add_expression(&rhs.into(), 1.0);
        self
    }
}

impl<T: Into<Expression>> Sub<T> for Expression {
    type Output = Expression;

    fn sub(mut self, rhs: T) -> Expression {
        self.add_expression(&rhs.into(), -1.0);
        self
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;

    fn mul(mut self, rhs: f64) -> Expression {
        self.multiply(rhs);
        self
    }
}

impl Div<f64> for Expression {
    type Output = Expression;

    fn div(mut self, rhs: f64) -> Expression {
        self.multiply(1.0 / rhs);
        self
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(mut self) -> Expression {
        self.multiply(-1.0);
        self
    }
}

impl<T: Into<Expression>> Add<T> for Term {
    type Output = Expression;

    fn add(self, rhs: T) -> Expression {
        Expression::from_term(self) + rhs
    }
}

impl<T: Into<Expression>> Sub<T> for Term {
    type Output = Expression;

    fn sub(self, rhs: T) -> Expression {
        Expression::from_term(self) - rhs
    }
}

impl Mul<f64> for Term {
    type Output = Expression;

    fn mul(self, rhs: f64) -> Expression {
        Expression::from_term(self) * rhs
    }
}

impl Div<f64> for Term {
    type Output = Expression;

    fn div(self, rhs: f64) -> Expression {
        Expression::from_term(self) / rhs
    }
}

/// A linear equation `lhs = rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Equation {
    pub lhs: Expression,
    pub rhs: Expression,
}

impl Equation {
    pub fn new(lhs: impl Into<Expression>, rhs: impl Into<Expression>) -> Self {
        Self {
            lhs: lhs.into(),
            rhs: rhs.into(),
        }
    }

    /// The expression `lhs - rhs`, which the equation pins to zero.
    pub fn residual(&self) -> Expression {
        let mut expr = self.lhs.clone();
        expr.add_expression(&self.rhs, -1.0);
        expr
    }

    /// Substitute a term on both sides.
    pub fn substitute(&mut self, term: Term, expr: &Expression) {
        self.lhs.substitute(term, expr);
        self.rhs.substitute(term, expr);
    }

    /// Replace every term on both sides through `map`.
    pub fn map_terms(&self, mut map: impl FnMut(Term) -> Term) -> Equation {
        Equation {
            lhs: self.lhs.map_terms(&mut map),
            rhs: self.rhs.map_terms(&mut map),
        }
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.lhs, self.rhs)
    }
}

/// An authored constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Refers only to the authoring widget and its reference frame.
    Bare(Equation),
    /// Also refers to other widgets directly; `references` records them
    /// for diagnostics.
    Targeted {
        equation: Equation,
        references: SmallVec<[WidgetId; 2]>,
    },
}

impl Constraint {
    pub fn targeted(equation: Equation, references: impl IntoIterator<Item = WidgetId>) -> Self {
        Constraint::Targeted {
            equation,
            references: references.into_iter().collect(),
        }
    }

    pub fn equation(&self) -> &Equation {
        match self {
            Constraint::Bare(equation) => equation,
            Constraint::Targeted { equation, .. } => equation,
        }
    }

    pub fn references(&self) -> &[WidgetId] {
        match self {
            Constraint::Bare(_) => &[],
            Constraint::Targeted { references, .. } => references,
        }
    }
}

impl From<Equation> for Constraint {
    fn from(equation: Equation) -> Self {
        Constraint::Bare(equation)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.equation())
    }
}
