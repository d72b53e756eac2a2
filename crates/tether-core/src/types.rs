//! Core value types shared by the solver and the layout tree.

use std::fmt;

/// Stable identifier of a widget inside a layout context.
///
/// Ids are handed out monotonically and never reused, so a destroyed
/// widget's id can not alias a newer widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WidgetId(pub u32);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

/// One of the four geometry unknowns every widget owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prop {
    X,
    Y,
    Width,
    Height,
}

impl Prop {
    /// All four properties, in storage order.
    pub const ALL: [Prop; 4] = [Prop::X, Prop::Y, Prop::Width, Prop::Height];

    /// Position of this property in `[x, y, width, height]` arrays.
    pub fn index(self) -> usize {
        match self {
            Prop::X => 0,
            Prop::Y => 1,
            Prop::Width => 2,
            Prop::Height => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Prop::X => "x",
            Prop::Y => "y",
            Prop::Width => "width",
            Prop::Height => "height",
        }
    }
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A geometry unknown scoped to exactly one widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variable {
    pub widget: WidgetId,
    pub prop: Prop,
}

impl Variable {
    pub fn new(widget: WidgetId, prop: Prop) -> Self {
        Self { widget, prop }
    }

    /// The four variables owned by `widget`.
    pub fn all(widget: WidgetId) -> [Variable; 4] {
        Prop::ALL.map(|prop| Variable::new(widget, prop))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.widget, self.prop)
    }
}

/// Identifier of a named parameter allocated by a layout context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParamId(pub u32);

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// A free quantity that solutions are expressed in terms of.
///
/// The viewport geometry is always available as `Root(..)`; `Named`
/// parameters are extra scalars (animation offsets and the like) that can
/// change every frame without re-solving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Param {
    Root(Prop),
    Named(ParamId),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Root(prop) => write!(f, "root.{}", prop),
            Param::Named(id) => write!(f, "{}", id),
        }
    }
}

/// Resolved numeric geometry of a widget.
///
/// The coordinate system has its origin at the bottom left of the viewport,
/// so the top edge is `y + height`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build geometry from values in `[x, y, width, height]` order.
    pub fn from_array(values: [f64; 4]) -> Self {
        Self::new(values[0], values[1], values[2], values[3])
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    pub fn get(&self, prop: Prop) -> f64 {
        match prop {
            Prop::X => self.x,
            Prop::Y => self.y,
            Prop::Width => self.width,
            Prop::Height => self.height,
        }
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the top edge (y + height).
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Check if a point lies strictly inside the bounds.
    ///
    /// Points on an edge are outside, so two widgets sharing an edge never
    /// both claim a point on it.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.x < x && x < self.right() && self.y < y && y < self.top()
    }

    /// True when all four components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}
