//! Value shape classification.

use serde_json::Value;

/// Coarse shape of a template value.
///
/// Merging only ever descends into records and sequences; scalars are
/// replaced atomically and nullish values are treated as "nothing here".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Plain key/value record
    Record,
    /// Ordered, index-addressed sequence
    Sequence,
    /// String, number or boolean
    Scalar,
    /// Null or absent
    Nullish,
}

impl Shape {
    /// Classify an optional value. `None` stands for an undefined value.
    pub fn of(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Shape::Nullish,
            Some(Value::Object(_)) => Shape::Record,
            Some(Value::Array(_)) => Shape::Sequence,
            Some(Value::Bool(_) | Value::Number(_) | Value::String(_)) => Shape::Scalar,
        }
    }

    /// Records and sequences can be merged into; everything else cannot.
    pub fn is_container(self) -> bool {
        matches!(self, Shape::Record | Shape::Sequence)
    }
}

/// Check if the value is a plain record.
pub fn is_plain_object(value: &Value) -> bool {
    Shape::of(Some(value)) == Shape::Record
}

/// Check if the value is a sequence.
pub fn is_array(value: &Value) -> bool {
    Shape::of(Some(value)) == Shape::Sequence
}
