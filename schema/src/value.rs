use std::collections::BTreeMap;

/// Dynamically typed message data.
///
/// Generated code encodes plain Rust structs; `Value` exists for tooling that
/// has to encode instances of types it only knows from their schema, such as
/// the plan interpreter and the command line `encode` command. Numbers keep
/// only their broad class here and are narrowed to the field's wire type when
/// written.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Build an [Object](#variant.Object) from `(name, value)` pairs.
    pub fn object<I, K>(fields: I) -> Value
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Look up a field of an [Object](#variant.Object).
    pub fn get(&self, name: &str) -> Option<&Value> {
        match *self {
            Value::Object(ref fields) => fields.get(name),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(value) => Some(value),
            Value::Int(value) => Some(value != 0),
            Value::UInt(value) => Some(value != 0),
            _ => None,
        }
    }

    /// Signed view of an integer value. `None` for non-integers and for
    /// unsigned values above `i64::MAX`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(value) => Some(value),
            Value::UInt(value) => i64::try_from(value).ok(),
            Value::Bool(value) => Some(value as i64),
            _ => None,
        }
    }

    /// Unsigned view of an integer value. `None` for non-integers and for
    /// negative values.
    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::UInt(value) => Some(value),
            Value::Int(value) => u64::try_from(value).ok(),
            Value::Bool(value) => Some(value as u64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(value) => Some(value),
            Value::Int(value) => Some(value as f64),
            Value::UInt(value) => Some(value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match *self {
            Value::Array(ref values) => Some(values.as_slice()),
            _ => None,
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match *self {
            Value::Bool(_)   => "bool",
            Value::Int(_)    => "int",
            Value::UInt(_)   => "uint",
            Value::Float(_)  => "float",
            Value::String(_) => "string",
            Value::Array(_)  => "array",
            Value::Object(_) => "object",
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
        Value::Int(value)
    }
}

impl From<u64> for Value {
    fn from(value: u64) -> Self {
        Value::UInt(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::Array(values.into_iter().map(Into::into).collect())
    }
}

#[test]
fn numeric_views() {
    assert_eq!(Value::Int(-1).as_u64(), None);
    assert_eq!(Value::Int(7).as_u64(), Some(7));
    assert_eq!(Value::UInt(u64::MAX).as_i64(), None);
    assert_eq!(Value::UInt(3).as_f64(), Some(3.0));
    assert_eq!(Value::String("x".into()).as_i64(), None);
}

#[test]
fn object_lookup() {
    let v = Value::object([("a", Value::from(1i64)), ("b", Value::from("x"))]);
    assert_eq!(v.get("a"), Some(&Value::Int(1)));
    assert_eq!(v.get("b").and_then(Value::as_str), Some("x"));
    assert_eq!(v.get("c"), None);
    assert_eq!(Value::Bool(true).get("a"), None);
}
