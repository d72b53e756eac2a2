//! Numeric evaluators produced by a solve.

use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;
use tether_core::{Geometry, Param, ParamId};

use crate::expression::write_linear;

/// Current values of every parameter a solution can mention.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamValues {
    /// Viewport geometry.
    pub root: Geometry,
    pub named: IndexMap<ParamId, f64>,
}

impl ParamValues {
    pub fn new(root: Geometry) -> Self {
        Self {
            root,
            named: IndexMap::new(),
        }
    }

    pub fn get(&self, param: Param) -> Option<f64> {
        match param {
            Param::Root(prop) => Some(self.root.get(prop)),
            Param::Named(id) => self.named.get(&id).copied(),
        }
    }
}

/// A solved variable: `constant + Σ(coefficient * param)`.
///
/// Evaluating it is a handful of multiply-adds, so it is safe to do every
/// frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledExpr {
    pub constant: f64,
    terms: SmallVec<[(Param, f64); 2]>,
}

impl CompiledExpr {
    pub fn new(constant: f64, terms: impl IntoIterator<Item = (Param, f64)>) -> Self {
        Self {
            constant,
            terms: terms.into_iter().collect(),
        }
    }

    pub fn terms(&self) -> &[(Param, f64)] {
        &self.terms
    }

    /// Evaluate against `params`. Returns `None` when a named parameter
    /// has no value.
    pub fn evaluate(&self, params: &ParamValues) -> Option<f64> {
        let mut value = self.constant;
        for &(param, coeff) in &self.terms {
            value += coeff * params.get(param)?;
        }
        Some(value)
    }

    /// First parameter with no value in `params`.
    pub fn missing_param(&self, params: &ParamValues) -> Option<Param> {
        self.terms
            .iter()
            .map(|&(param, _)| param)
            .find(|&param| params.get(param).is_none())
    }
}

impl fmt::Display for CompiledExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_linear(
            f,
            self.terms.iter().map(|(p, c)| (p as &dyn fmt::Display, *c)),
            self.constant,
        )
    }
}
