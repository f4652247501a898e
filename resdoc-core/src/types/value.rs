//! Typed field values exchanged between host objects and the coercer.
//!
//! The document side only knows null, booleans, numbers, strings, sequences
//! and nested maps. The host side is richer: fixed-width integers, timestamps
//! and optional values. `FieldKind` describes a field's declared shape at
//! schema-registration time; `FieldValue` carries one concrete runtime value
//! across the accessor boundary.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// The scalar kinds a declared field can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    String,
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ScalarKind {
    /// Whether this kind is numeric (integer or floating).
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ScalarKind::String | ScalarKind::Bool)
    }

    /// Whether this kind is a fixed-width integer.
    pub fn is_integer(&self) -> bool {
        self.is_numeric() && !matches!(self, ScalarKind::F32 | ScalarKind::F64)
    }
}

/// The declared shape of a host field, registered once per schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A required scalar.
    Scalar(ScalarKind),
    /// An optional (nullable) scalar.
    Optional(ScalarKind),
    /// A required timestamp; an unset value never serializes.
    Timestamp,
    /// An optional timestamp; an unset value serializes as null.
    OptionalTimestamp,
    /// Structural passthrough: sequences and nested maps, carried verbatim.
    Raw,
}

/// One concrete scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Scalar {
    /// The kind of this scalar.
    pub fn kind(&self) -> ScalarKind {
        match self {
            Scalar::String(_) => ScalarKind::String,
            Scalar::Bool(_) => ScalarKind::Bool,
            Scalar::I8(_) => ScalarKind::I8,
            Scalar::I16(_) => ScalarKind::I16,
            Scalar::I32(_) => ScalarKind::I32,
            Scalar::I64(_) => ScalarKind::I64,
            Scalar::U8(_) => ScalarKind::U8,
            Scalar::U16(_) => ScalarKind::U16,
            Scalar::U32(_) => ScalarKind::U32,
            Scalar::U64(_) => ScalarKind::U64,
            Scalar::F32(_) => ScalarKind::F32,
            Scalar::F64(_) => ScalarKind::F64,
        }
    }

    /// Whether this scalar equals its kind's zero value.
    pub fn is_zero(&self) -> bool {
        match self {
            Scalar::String(s) => s.is_empty(),
            Scalar::Bool(b) => !b,
            Scalar::I8(n) => *n == 0,
            Scalar::I16(n) => *n == 0,
            Scalar::I32(n) => *n == 0,
            Scalar::I64(n) => *n == 0,
            Scalar::U8(n) => *n == 0,
            Scalar::U16(n) => *n == 0,
            Scalar::U32(n) => *n == 0,
            Scalar::U64(n) => *n == 0,
            Scalar::F32(n) => *n == 0.0,
            Scalar::F64(n) => *n == 0.0,
        }
    }

    /// The document representation of this scalar.
    pub fn to_json(&self) -> Value {
        match self {
            Scalar::String(s) => Value::String(s.clone()),
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::I8(n) => Value::from(*n),
            Scalar::I16(n) => Value::from(*n),
            Scalar::I32(n) => Value::from(*n),
            Scalar::I64(n) => Value::from(*n),
            Scalar::U8(n) => Value::from(*n),
            Scalar::U16(n) => Value::from(*n),
            Scalar::U32(n) => Value::from(*n),
            Scalar::U64(n) => Value::from(*n),
            Scalar::F32(n) => Value::from(f64::from(*n)),
            Scalar::F64(n) => Value::from(*n),
        }
    }

    /// Narrow a floating-point intermediate to the given numeric kind,
    /// truncating toward zero. Returns `None` for non-numeric kinds.
    pub fn from_f64(kind: ScalarKind, value: f64) -> Option<Scalar> {
        match kind {
            ScalarKind::I8 => Some(Scalar::I8(value as i8)),
            ScalarKind::I16 => Some(Scalar::I16(value as i16)),
            ScalarKind::I32 => Some(Scalar::I32(value as i32)),
            ScalarKind::I64 => Some(Scalar::I64(value as i64)),
            ScalarKind::U8 => Some(Scalar::U8(value as u8)),
            ScalarKind::U16 => Some(Scalar::U16(value as u16)),
            ScalarKind::U32 => Some(Scalar::U32(value as u32)),
            ScalarKind::U64 => Some(Scalar::U64(value as u64)),
            ScalarKind::F32 => Some(Scalar::F32(value as f32)),
            ScalarKind::F64 => Some(Scalar::F64(value)),
            ScalarKind::String | ScalarKind::Bool => None,
        }
    }
}

/// One runtime field value crossing the accessor boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A required scalar.
    Scalar(Scalar),
    /// An optional scalar; `None` models an unset optional field.
    Optional(Option<Scalar>),
    /// A required timestamp; `None` models the unset (zero) timestamp.
    Timestamp(Option<DateTime<Utc>>),
    /// An optional timestamp; `None` serializes as null.
    OptionalTimestamp(Option<DateTime<Utc>>),
    /// Structural passthrough value.
    Raw(Value),
}

impl FieldValue {
    /// Extract an owned string, if this is a string scalar.
    pub fn into_string(self) -> Option<String> {
        match self {
            FieldValue::Scalar(Scalar::String(s)) => Some(s),
            FieldValue::Optional(Some(Scalar::String(s))) => Some(s),
            _ => None,
        }
    }

    /// Extract a boolean, if this is a boolean scalar.
    pub fn into_bool(self) -> Option<bool> {
        match self {
            FieldValue::Scalar(Scalar::Bool(b)) => Some(b),
            FieldValue::Optional(Some(Scalar::Bool(b))) => Some(b),
            _ => None,
        }
    }

    /// Extract the inner scalar, if any.
    pub fn into_scalar(self) -> Option<Scalar> {
        match self {
            FieldValue::Scalar(s) => Some(s),
            FieldValue::Optional(inner) => inner,
            _ => None,
        }
    }

    /// Extract a signed integer, widening from any signed or unsigned
    /// integer scalar that fits.
    pub fn into_i64(self) -> Option<i64> {
        match self.into_scalar()? {
            Scalar::I8(n) => Some(i64::from(n)),
            Scalar::I16(n) => Some(i64::from(n)),
            Scalar::I32(n) => Some(i64::from(n)),
            Scalar::I64(n) => Some(n),
            Scalar::U8(n) => Some(i64::from(n)),
            Scalar::U16(n) => Some(i64::from(n)),
            Scalar::U32(n) => Some(i64::from(n)),
            Scalar::U64(n) => i64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Extract an unsigned integer, widening from any unsigned scalar.
    pub fn into_u64(self) -> Option<u64> {
        match self.into_scalar()? {
            Scalar::U8(n) => Some(u64::from(n)),
            Scalar::U16(n) => Some(u64::from(n)),
            Scalar::U32(n) => Some(u64::from(n)),
            Scalar::U64(n) => Some(n),
            Scalar::I8(n) => u64::try_from(n).ok(),
            Scalar::I16(n) => u64::try_from(n).ok(),
            Scalar::I32(n) => u64::try_from(n).ok(),
            Scalar::I64(n) => u64::try_from(n).ok(),
            _ => None,
        }
    }

    /// Extract a float, widening from any numeric scalar.
    pub fn into_f64(self) -> Option<f64> {
        match self.into_scalar()? {
            Scalar::F32(n) => Some(f64::from(n)),
            Scalar::F64(n) => Some(n),
            Scalar::I8(n) => Some(f64::from(n)),
            Scalar::I16(n) => Some(f64::from(n)),
            Scalar::I32(n) => Some(f64::from(n)),
            Scalar::I64(n) => Some(n as f64),
            Scalar::U8(n) => Some(f64::from(n)),
            Scalar::U16(n) => Some(f64::from(n)),
            Scalar::U32(n) => Some(f64::from(n)),
            Scalar::U64(n) => Some(n as f64),
            _ => None,
        }
    }

    /// Extract a timestamp from either timestamp variant.
    pub fn into_timestamp(self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(t) | FieldValue::OptionalTimestamp(t) => t,
            _ => None,
        }
    }

    /// Extract the passthrough document value.
    pub fn into_raw(self) -> Option<Value> {
        match self {
            FieldValue::Raw(v) => Some(v),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Scalar(Scalar::String(s))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Scalar(Scalar::Bool(b))
    }
}

macro_rules! from_numeric {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(impl From<$ty> for FieldValue {
            fn from(n: $ty) -> Self {
                FieldValue::Scalar(Scalar::$variant(n))
            }
        })*
    };
}

from_numeric! {
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64,
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(t: DateTime<Utc>) -> Self {
        FieldValue::Timestamp(Some(t))
    }
}

impl From<Option<DateTime<Utc>>> for FieldValue {
    fn from(t: Option<DateTime<Utc>>) -> Self {
        FieldValue::OptionalTimestamp(t)
    }
}

impl From<Value> for FieldValue {
    fn from(v: Value) -> Self {
        FieldValue::Raw(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_zero_values() {
        assert!(Scalar::String(String::new()).is_zero());
        assert!(Scalar::Bool(false).is_zero());
        assert!(Scalar::I32(0).is_zero());
        assert!(Scalar::F64(0.0).is_zero());
        assert!(!Scalar::String("x".to_string()).is_zero());
        assert!(!Scalar::U64(5).is_zero());
    }

    #[test]
    fn test_from_f64_truncates_toward_zero() {
        assert_eq!(Scalar::from_f64(ScalarKind::I32, 9.9), Some(Scalar::I32(9)));
        assert_eq!(
            Scalar::from_f64(ScalarKind::I32, -9.9),
            Some(Scalar::I32(-9))
        );
        assert_eq!(Scalar::from_f64(ScalarKind::U8, 300.0), Some(Scalar::U8(255)));
        assert_eq!(Scalar::from_f64(ScalarKind::String, 1.0), None);
    }

    #[test]
    fn test_field_value_conversions() {
        assert_eq!(
            FieldValue::from("title").into_string(),
            Some("title".to_string())
        );
        assert_eq!(FieldValue::from(42u32).into_u64(), Some(42));
        assert_eq!(FieldValue::from(-3i8).into_i64(), Some(-3));
        assert_eq!(FieldValue::from(json!(["a", "b"])).into_raw(), Some(json!(["a", "b"])));
        assert_eq!(FieldValue::from(true).into_i64(), None);
    }

    #[test]
    fn test_scalar_to_json() {
        assert_eq!(Scalar::U64(7).to_json(), json!(7));
        assert_eq!(Scalar::F32(1.5).to_json(), json!(1.5));
        assert_eq!(Scalar::String("a".to_string()).to_json(), json!("a"));
    }
}
