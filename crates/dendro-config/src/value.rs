//! Dynamic values for job parameters and file metadata.
//!
//! Values are stored as a closed set of variants rather than raw JSON so that
//! every emitter serializes them the same way. Maps are kept sorted by key,
//! which makes a serialized pipeline byte-stable.
//!
//! # Examples
//!
//! ```json
//! {
//!   "dandisetId": "000946",
//!   "supplemental": true,
//!   "bin_size_msec": 1,
//!   "window": [0.5, 1.5]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Free-form metadata attached to a file.
pub type Metadata = BTreeMap<String, Value>;

/// A parameter or metadata value.
///
/// Serialized untagged, so documents contain plain JSON scalars, arrays and
/// objects. Integers are tried before floats; `1` stays an integer and `1.0`
/// stays a float across a round trip. Integers above `i64::MAX` land in
/// `Unsigned` rather than degrading to a float.
///
/// JSON has no representation for NaN or infinity. A pipeline refuses such
/// floats when they are declared, see [`Value::is_finite`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
  Null,
  Bool(bool),
  Integer(i64),
  Unsigned(u64),
  Float(f64),
  String(String),
  List(Vec<Value>),
  Map(BTreeMap<String, Value>),
}

impl Value {
  /// Returns the string slice if this is a string value.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  pub fn is_null(&self) -> bool {
    matches!(self, Value::Null)
  }

  /// False if this value holds a NaN or infinite float, at any depth.
  pub fn is_finite(&self) -> bool {
    match self {
      Value::Float(f) => f.is_finite(),
      Value::List(values) => values.iter().all(Value::is_finite),
      Value::Map(map) => map.values().all(Value::is_finite),
      _ => true,
    }
  }
}

impl From<bool> for Value {
  fn from(value: bool) -> Self {
    Value::Bool(value)
  }
}

impl From<i64> for Value {
  fn from(value: i64) -> Self {
    Value::Integer(value)
  }
}

impl From<i32> for Value {
  fn from(value: i32) -> Self {
    Value::Integer(value.into())
  }
}

impl From<u64> for Value {
  fn from(value: u64) -> Self {
    match i64::try_from(value) {
      Ok(value) => Value::Integer(value),
      Err(_) => Value::Unsigned(value),
    }
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Float(value)
  }
}

impl From<&str> for Value {
  fn from(value: &str) -> Self {
    Value::String(value.to_string())
  }
}

impl From<String> for Value {
  fn from(value: String) -> Self {
    Value::String(value)
  }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
  fn from(values: Vec<T>) -> Self {
    Value::List(values.into_iter().map(Into::into).collect())
  }
}

impl From<BTreeMap<String, Value>> for Value {
  fn from(map: BTreeMap<String, Value>) -> Self {
    Value::Map(map)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_integer_and_float_stay_distinct() {
    let parsed: Vec<Value> = serde_json::from_str("[1, 1.0, -3, 2.5]").unwrap();
    assert_eq!(
      parsed,
      vec![
        Value::Integer(1),
        Value::Float(1.0),
        Value::Integer(-3),
        Value::Float(2.5)
      ]
    );
    assert_eq!(serde_json::to_string(&parsed).unwrap(), "[1,1.0,-3,2.5]");
  }

  #[test]
  fn test_nested_values_parse() {
    let parsed: Value =
      serde_json::from_str(r#"{"b": [true, null, "x"], "a": {"k": 3}}"#).unwrap();

    let Value::Map(map) = &parsed else {
      panic!("expected map");
    };
    // Sorted by key regardless of input order
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(
      map["b"],
      Value::List(vec![Value::Bool(true), Value::Null, Value::from("x")])
    );
    assert_eq!(
      serde_json::to_string(&parsed).unwrap(),
      r#"{"a":{"k":3},"b":[true,null,"x"]}"#
    );
  }

  #[test]
  fn test_large_integers_stay_integers() {
    let text = "[9223372036854775807,18446744073709551615]";
    let parsed: Vec<Value> = serde_json::from_str(text).unwrap();

    assert_eq!(
      parsed,
      vec![Value::Integer(i64::MAX), Value::Unsigned(u64::MAX)]
    );
    assert_eq!(serde_json::to_string(&parsed).unwrap(), text);
    assert_eq!(Value::from(u64::MAX), Value::Unsigned(u64::MAX));
    assert_eq!(Value::from(7u64), Value::Integer(7));
  }

  #[test]
  fn test_is_finite_looks_inside_containers() {
    assert!(Value::from(1.5).is_finite());
    assert!(!Value::Float(f64::NAN).is_finite());
    assert!(!Value::from(vec![1.0, f64::INFINITY]).is_finite());

    let mut inner = BTreeMap::new();
    inner.insert("x".to_string(), Value::Float(f64::NEG_INFINITY));
    let mut outer = BTreeMap::new();
    outer.insert("nested".to_string(), Value::Map(inner));
    assert!(!Value::Map(outer).is_finite());
  }

  #[test]
  fn test_conversions() {
    assert_eq!(Value::from("abc").as_str(), Some("abc"));
    assert_eq!(Value::from(4), Value::Integer(4));
    assert_eq!(
      Value::from(vec![1, 2]),
      Value::List(vec![Value::Integer(1), Value::Integer(2)])
    );
    assert!(Value::Null.is_null());
    assert!(!Value::from(false).is_null());
  }
}
