//! Tagged scalar/vector values and threshold comparison.
//!
//! [`Value`] is the sum type carried by numeric sensors (scroll counters,
//! pointer positions, stick vectors). [`ValueLogic`] pairs a threshold value
//! with a [`Comparison`] operator and answers "does this candidate satisfy
//! the threshold" every frame. Comparisons never fail outward: a candidate of
//! the wrong kind simply compares as `false`.

use crate::error::InputError;
use glam::{IVec2, Vec2};

/// Default tolerance for `f32` equality comparisons.
pub const DEFAULT_F32_TOLERANCE: f32 = 1e-5;
/// Default tolerance for `f64` equality comparisons.
pub const DEFAULT_F64_TOLERANCE: f64 = 1e-7;

/// A sensor value: a tagged union over the scalar and vector payloads the
/// device trackers produce.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    /// No value. Rejected wherever a concrete comparison is required.
    #[default]
    None,
    /// Signed integer (e.g. scroll tick counters).
    Int(i32),
    /// Unsigned integer.
    UInt(u32),
    /// Single-precision float (e.g. trigger positions).
    Float(f32),
    /// Double-precision float.
    Double(f64),
    /// Integer 2D point (e.g. combined scroll wheel).
    Point(IVec2),
    /// Float 2D vector (e.g. pointer position, stick position).
    Vector2(Vec2),
}

/// Discriminant of a [`Value`], used for construction-time kind checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// [`Value::None`].
    None,
    /// [`Value::Int`].
    Int,
    /// [`Value::UInt`].
    UInt,
    /// [`Value::Float`].
    Float,
    /// [`Value::Double`].
    Double,
    /// [`Value::Point`].
    Point,
    /// [`Value::Vector2`].
    Vector2,
}

impl Value {
    /// The kind tag of this value.
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::None => ValueKind::None,
            Self::Int(_) => ValueKind::Int,
            Self::UInt(_) => ValueKind::UInt,
            Self::Float(_) => ValueKind::Float,
            Self::Double(_) => ValueKind::Double,
            Self::Point(_) => ValueKind::Point,
            Self::Vector2(_) => ValueKind::Vector2,
        }
    }

    /// Rejects [`Value::None`] where a concrete payload is required.
    ///
    /// # Errors
    /// [`InputError::MissingValue`] if this is `None`.
    pub fn validate(&self) -> Result<(), InputError> {
        if matches!(self, Self::None) {
            return Err(InputError::MissingValue);
        }
        Ok(())
    }
}

/// Relational operator applied by [`ValueLogic`].
///
/// The `..X`/`..Y` variants test a single axis of a 2D payload and compare
/// as `false` against scalar payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Equal (with epsilon tolerance for float kinds).
    Equal,
    /// Not equal (with epsilon tolerance for float kinds).
    NotEqual,
    /// Greater than.
    GreaterThan,
    /// Greater than or equal.
    GreaterThanOrEqual,
    /// Less than.
    LessThan,
    /// Less than or equal.
    LessThanOrEqual,
    /// Equal on the X axis only.
    EqualX,
    /// Not equal on the X axis only.
    NotEqualX,
    /// Greater than on the X axis only.
    GreaterThanX,
    /// Greater than or equal on the X axis only.
    GreaterThanOrEqualX,
    /// Less than on the X axis only.
    LessThanX,
    /// Less than or equal on the X axis only.
    LessThanOrEqualX,
    /// Equal on the Y axis only.
    EqualY,
    /// Not equal on the Y axis only.
    NotEqualY,
    /// Greater than on the Y axis only.
    GreaterThanY,
    /// Greater than or equal on the Y axis only.
    GreaterThanOrEqualY,
    /// Less than on the Y axis only.
    LessThanY,
    /// Less than or equal on the Y axis only.
    LessThanOrEqualY,
}

/// Which axis (if any) a [`Comparison`] variant is qualified to.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Both,
    X,
    Y,
}

/// The unqualified relational shape of a comparison.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Relation {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    fn split(self) -> (Relation, Axis) {
        match self {
            Self::Equal => (Relation::Eq, Axis::Both),
            Self::NotEqual => (Relation::Ne, Axis::Both),
            Self::GreaterThan => (Relation::Gt, Axis::Both),
            Self::GreaterThanOrEqual => (Relation::Ge, Axis::Both),
            Self::LessThan => (Relation::Lt, Axis::Both),
            Self::LessThanOrEqual => (Relation::Le, Axis::Both),
            Self::EqualX => (Relation::Eq, Axis::X),
            Self::NotEqualX => (Relation::Ne, Axis::X),
            Self::GreaterThanX => (Relation::Gt, Axis::X),
            Self::GreaterThanOrEqualX => (Relation::Ge, Axis::X),
            Self::LessThanX => (Relation::Lt, Axis::X),
            Self::LessThanOrEqualX => (Relation::Le, Axis::X),
            Self::EqualY => (Relation::Eq, Axis::Y),
            Self::NotEqualY => (Relation::Ne, Axis::Y),
            Self::GreaterThanY => (Relation::Gt, Axis::Y),
            Self::GreaterThanOrEqualY => (Relation::Ge, Axis::Y),
            Self::LessThanY => (Relation::Lt, Axis::Y),
            Self::LessThanOrEqualY => (Relation::Le, Axis::Y),
        }
    }
}

/// An axis-aligned rectangle used to bound cursor and gesture conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Top-left corner (inclusive).
    pub min: Vec2,
    /// Bottom-right corner (inclusive).
    pub max: Vec2,
}

impl Rect {
    /// Creates a rectangle from two corners.
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Whether `point` lies within the rectangle (inclusive on all edges).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

/// A threshold [`Value`] paired with a [`Comparison`].
///
/// # 2D comparison semantics
///
/// For `Point` and `Vector2` payloads the unqualified relational operators
/// (`GreaterThan`, `LessThan`, ...) are satisfied when **either** axis
/// satisfies them, not both. This OR-across-axes behaviour is intentional
/// and long-standing; callers that want a single axis use the `..X`/`..Y`
/// variants. Unqualified `Equal`/`NotEqual` compare both axes as a whole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueLogic {
    threshold: Value,
    comparison: Comparison,
    f32_tolerance: f32,
    f64_tolerance: f64,
}

impl ValueLogic {
    /// Creates a threshold comparison with the default float tolerances.
    #[must_use]
    pub fn new(threshold: Value, comparison: Comparison) -> Self {
        Self {
            threshold,
            comparison,
            f32_tolerance: DEFAULT_F32_TOLERANCE,
            f64_tolerance: DEFAULT_F64_TOLERANCE,
        }
    }

    /// Overrides the epsilon used for float equality comparisons.
    #[must_use]
    pub fn with_tolerances(mut self, f32_tolerance: f32, f64_tolerance: f64) -> Self {
        self.f32_tolerance = f32_tolerance;
        self.f64_tolerance = f64_tolerance;
        self
    }

    /// The threshold value.
    #[must_use]
    pub fn threshold(&self) -> Value {
        self.threshold
    }

    /// The comparison operator.
    #[must_use]
    pub fn comparison(&self) -> Comparison {
        self.comparison
    }

    /// Tests `candidate` against the threshold.
    ///
    /// Mismatched kinds (including `None` on either side) compare as `false`;
    /// this method never fails.
    #[must_use]
    pub fn compare(&self, candidate: &Value) -> bool {
        let (relation, axis) = self.comparison.split();
        match (self.threshold, *candidate) {
            (Value::Int(t), Value::Int(c)) => {
                axis == Axis::Both && compare_ord(c.cmp(&t), relation)
            }
            (Value::UInt(t), Value::UInt(c)) => {
                axis == Axis::Both && compare_ord(c.cmp(&t), relation)
            }
            (Value::Float(t), Value::Float(c)) => {
                axis == Axis::Both && compare_f32(c, t, relation, self.f32_tolerance)
            }
            (Value::Double(t), Value::Double(c)) => {
                axis == Axis::Both && compare_f64(c, t, relation, self.f64_tolerance)
            }
            (Value::Point(t), Value::Point(c)) => match (relation, axis) {
                (Relation::Eq, Axis::Both) => c == t,
                (Relation::Ne, Axis::Both) => c != t,
                // OR across axes for unqualified relational operators.
                (_, Axis::Both) => {
                    compare_ord(c.x.cmp(&t.x), relation) || compare_ord(c.y.cmp(&t.y), relation)
                }
                (_, Axis::X) => compare_ord(c.x.cmp(&t.x), relation),
                (_, Axis::Y) => compare_ord(c.y.cmp(&t.y), relation),
            },
            (Value::Vector2(t), Value::Vector2(c)) => {
                let eps = self.f32_tolerance;
                match (relation, axis) {
                    (Relation::Eq, Axis::Both) => {
                        (c.x - t.x).abs() <= eps && (c.y - t.y).abs() <= eps
                    }
                    (Relation::Ne, Axis::Both) => {
                        (c.x - t.x).abs() > eps || (c.y - t.y).abs() > eps
                    }
                    (_, Axis::Both) => {
                        compare_f32(c.x, t.x, relation, eps) || compare_f32(c.y, t.y, relation, eps)
                    }
                    (_, Axis::X) => compare_f32(c.x, t.x, relation, eps),
                    (_, Axis::Y) => compare_f32(c.y, t.y, relation, eps),
                }
            }
            _ => false,
        }
    }
}

fn compare_ord(ordering: std::cmp::Ordering, relation: Relation) -> bool {
    use std::cmp::Ordering::{Equal, Greater, Less};
    match relation {
        Relation::Eq => ordering == Equal,
        Relation::Ne => ordering != Equal,
        Relation::Gt => ordering == Greater,
        Relation::Ge => ordering != Less,
        Relation::Lt => ordering == Less,
        Relation::Le => ordering != Greater,
    }
}

fn compare_f32(candidate: f32, threshold: f32, relation: Relation, eps: f32) -> bool {
    let eq = (candidate - threshold).abs() <= eps;
    match relation {
        Relation::Eq => eq,
        Relation::Ne => !eq,
        Relation::Gt => candidate > threshold,
        Relation::Ge => candidate > threshold || eq,
        Relation::Lt => candidate < threshold,
        Relation::Le => candidate < threshold || eq,
    }
}

fn compare_f64(candidate: f64, threshold: f64, relation: Relation, eps: f64) -> bool {
    let eq = (candidate - threshold).abs() <= eps;
    match relation {
        Relation::Eq => eq,
        Relation::Ne => !eq,
        Relation::Gt => candidate > threshold,
        Relation::Ge => candidate > threshold || eq,
        Relation::Lt => candidate < threshold,
        Relation::Le => candidate < threshold || eq,
    }
}
