//! Parametric Gaussian elimination over a tableau of rows.
//!
//! Every row expresses one basic unknown as
//! `constant + Σ(coefficient * symbol)` where the symbols are parameters or
//! still-free unknowns. Adding an equation substitutes the current basic
//! rows into it, picks a subject among its remaining unknowns and
//! eliminates that subject from every other row. Parameters are never
//! eliminated, so a fully pinned unknown ends up as an affine function of
//! the parameters alone.

use indexmap::IndexMap;
use tether_core::Variable;
use thiserror::Error;

use crate::compiled::CompiledExpr;
use crate::expression::accumulate;
use crate::scope::{ScopedEquation, Symbol};

/// Relative tolerance for floating-point comparisons.
pub const DEFAULT_EPSILON: f64 = 1e-8;

/// What adding an equation did to the tableau.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The equation pinned `subject` in terms of the others.
    Pivot(Variable),
    /// The equation was implied by the ones before it.
    Redundant,
}

/// The equation can not hold together with the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("equation contradicts the equations added before it")]
pub struct Contradiction;

/// A row in the tableau.
#[derive(Debug, Clone)]
struct Row {
    constant: f64,
    cells: IndexMap<Symbol, f64>,
}

impl Row {
    fn new(constant: f64) -> Self {
        Self {
            constant,
            cells: IndexMap::new(),
        }
    }

    fn add(&mut self, symbol: Symbol, coefficient: f64, epsilon: f64) {
        accumulate(&mut self.cells, symbol, coefficient, epsilon);
    }

    /// Substitute a symbol in this row with another row.
    fn substitute(&mut self, symbol: Symbol, row: &Row, epsilon: f64) {
        if let Some(coeff) = self.cells.shift_remove(&symbol) {
            self.constant += coeff * row.constant;
            for (&s, &c) in &row.cells {
                self.add(s, c * coeff, epsilon);
            }
        }
    }

    /// Solve `0 = row` for a symbol, leaving `symbol = row`.
    fn solve_for(&mut self, symbol: Symbol) {
        let coeff = self.cells.shift_remove(&symbol).unwrap_or(1.0);
        let multiplier = -1.0 / coeff;
        self.constant *= multiplier;
        for c in self.cells.values_mut() {
            *c *= multiplier;
        }
    }

    fn has_unknowns(&self) -> bool {
        self.cells.keys().any(Symbol::is_unknown)
    }
}

/// The elimination state of a linear system.
#[derive(Debug, Clone)]
pub struct Tableau {
    /// The rows, keyed by their basic unknown
    rows: IndexMap<Variable, Row>,
    epsilon: f64,
}

impl Default for Tableau {
    fn default() -> Self {
        Self::new(DEFAULT_EPSILON)
    }
}

impl Tableau {
    pub fn new(epsilon: f64) -> Self {
        Self {
            rows: IndexMap::new(),
            epsilon,
        }
    }

    /// Add an equation to the system.
    pub fn add_equation(&mut self, equation: &ScopedEquation) -> Result<Insertion, Contradiction> {
        let row = self.create_row(equation);

        let Some(subject) = self.choose_subject(&row) else {
            // No unknowns left: the equation is either implied or violated.
            // A leftover parameter term means it only holds for particular
            // parameter values, which counts as violated.
            if row.cells.is_empty() && row.constant == 0.0 {
                return Ok(Insertion::Redundant);
            }
            return Err(Contradiction);
        };

        let symbol = Symbol::Unknown(subject);
        let mut row = row;
        row.solve_for(symbol);
        self.substitute(symbol, &row);
        self.rows.insert(subject, row);

        Ok(Insertion::Pivot(subject))
    }

    /// Create a row for an equation, substituting basic unknowns.
    ///
    /// A constant that is tiny next to the largest value summed into it is
    /// rounding noise and snaps to zero.
    fn create_row(&self, equation: &ScopedEquation) -> Row {
        let mut row = Row::new(equation.constant);
        let mut scale = equation.constant.abs();

        for (&symbol, &coeff) in &equation.terms {
            if coeff == 0.0 {
                continue;
            }

            let basic = match symbol {
                Symbol::Unknown(var) => self.rows.get(&var),
                Symbol::Param(_) => None,
            };

            match basic {
                Some(basic_row) => {
                    let shift = coeff * basic_row.constant;
                    scale = scale.max(shift.abs());
                    row.constant += shift;
                    for (&s, &c) in &basic_row.cells {
                        row.add(s, c * coeff, self.epsilon);
                    }
                }
                None => row.add(symbol, coeff, self.epsilon),
            }
        }

        if row.constant.abs() <= self.epsilon * scale.max(1.0) {
            row.constant = 0.0;
        }
        row
    }

    /// Choose the unknown with the largest coefficient as the row's subject.
    fn choose_subject(&self, row: &Row) -> Option<Variable> {
        let mut best: Option<(Variable, f64)> = None;
        for (&symbol, &coeff) in &row.cells {
            if let Symbol::Unknown(var) = symbol {
                let magnitude = coeff.abs();
                if best.map_or(true, |(_, m)| magnitude > m + self.epsilon) {
                    best = Some((var, magnitude));
                }
            }
        }
        best.map(|(var, _)| var)
    }

    /// Substitute a symbol throughout the tableau.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        let epsilon = self.epsilon;
        for r in self.rows.values_mut() {
            r.substitute(symbol, row, epsilon);
        }
    }

    /// The solved value of `var`, if the system pins it.
    ///
    /// `None` when `var` is free or still depends on a free unknown.
    pub fn solution(&self, var: Variable) -> Option<CompiledExpr> {
        let row = self.rows.get(&var)?;
        if row.has_unknowns() {
            return None;
        }
        let terms = row.cells.iter().filter_map(|(symbol, &coeff)| match symbol {
            Symbol::Param(param) => Some((*param, coeff)),
            Symbol::Unknown(_) => None,
        });
        Some(CompiledExpr::new(row.constant, terms))
    }

    /// Number of basic unknowns.
    pub fn rank(&self) -> usize {
        self.rows.len()
    }
}
