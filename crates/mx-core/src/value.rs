//! Typed scalar values carried through tables and queries

use std::cmp::Ordering;
use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A single typed value in a record or table cell.
///
/// A missing value is represented by the field being absent from its
/// record, never by a dedicated variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    /// UTF-8 text (titles, type tags)
    Text(String),
    /// Signed integer (years, vote counts)
    Int(i64),
    /// Floating point (ratings, money)
    Float(f64),
}

impl Scalar {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(v) => Some(*v as f64),
            Scalar::Float(v) => Some(*v),
            Scalar::Text(_) => None,
        }
    }

    /// Integer view of the value. Floats only convert when they are whole.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Int(v) => Some(*v),
            Scalar::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short type tag used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Int(_) => "int",
            Scalar::Float(_) => "float",
        }
    }

    /// Compare two scalars of compatible types.
    ///
    /// Numeric values compare across `Int`/`Float`; text compares with
    /// text. Returns `None` for incompatible types, which callers treat
    /// as a shape mismatch rather than inventing an order.
    pub fn compare(&self, other: &Scalar) -> Option<Ordering> {
        match (self, other) {
            (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
            (a, b) => {
                let (a, b) = (a.as_f64()?, b.as_f64()?);
                Some(OrderedFloat(a).cmp(&OrderedFloat(b)))
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            Scalar::Int(v) => write!(f, "{}", v),
            Scalar::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_comparison_across_types() {
        assert_eq!(
            Scalar::Int(3).compare(&Scalar::Float(3.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Scalar::Float(10.0).compare(&Scalar::Int(10)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn test_text_and_number_do_not_compare() {
        assert_eq!(Scalar::Text("2020".into()).compare(&Scalar::Int(2020)), None);
    }

    #[test]
    fn test_integer_view_of_whole_float() {
        assert_eq!(Scalar::Float(2021.0).as_i64(), Some(2021));
        assert_eq!(Scalar::Float(7.5).as_i64(), None);
    }

    #[test]
    fn test_serializes_untagged() {
        assert_eq!(serde_json::to_string(&Scalar::Int(2020)).unwrap(), "2020");
        assert_eq!(
            serde_json::to_string(&Scalar::Text("Dune".into())).unwrap(),
            "\"Dune\""
        );
    }
}
