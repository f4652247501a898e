//! Value coercion between document values and typed field values.
//!
//! Encode turns one runtime field value into its document representation
//! (or omits it); decode turns one document attribute value into the typed
//! value a target field declares. Numeric conversion always goes through a
//! floating-point intermediate, truncating toward zero. Timestamps encode as
//! ISO-8601 strings (`iso8601` modifier) or unix epoch seconds.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::types::{FieldKind, FieldValue, ResdocError, Scalar};

/// ISO-8601 subset used on the wire: `YYYY-MM-DDThh:mm:ssZ`, always UTC.
pub(crate) const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Produce the document representation of one attribute value.
///
/// Returns `None` when the attribute must be omitted entirely: an unset
/// required timestamp (with or without `omitempty`), or an `omitempty` value
/// equal to its kind's zero.
pub fn encode_attribute(value: &FieldValue, omit_empty: bool, iso8601: bool) -> Option<Value> {
    match value {
        // a zero timestamp never serializes
        FieldValue::Timestamp(None) => None,
        FieldValue::Timestamp(Some(t)) => Some(format_timestamp(t, iso8601)),
        FieldValue::OptionalTimestamp(None) => {
            if omit_empty {
                None
            } else {
                Some(Value::Null)
            }
        }
        FieldValue::OptionalTimestamp(Some(t)) => Some(format_timestamp(t, iso8601)),
        FieldValue::Scalar(scalar) => {
            if omit_empty && scalar.is_zero() {
                None
            } else {
                Some(scalar.to_json())
            }
        }
        FieldValue::Optional(None) => {
            if omit_empty {
                None
            } else {
                Some(Value::Null)
            }
        }
        FieldValue::Optional(Some(scalar)) => Some(scalar.to_json()),
        FieldValue::Raw(raw) => {
            if omit_empty && is_empty_raw(raw) {
                None
            } else {
                Some(raw.clone())
            }
        }
    }
}

/// Coerce one document attribute value into the target field's declared
/// kind. Absent and null attribute keys are handled by the decoder before
/// this runs; `value` is always a concrete document value here.
pub fn decode_attribute(
    value: &Value,
    kind: FieldKind,
    iso8601: bool,
) -> Result<FieldValue, ResdocError> {
    if matches!(kind, FieldKind::Timestamp | FieldKind::OptionalTimestamp) {
        return decode_timestamp(value, kind, iso8601);
    }

    // a numeric document value converts through f64 into any numeric target
    if let Some(float) = value.as_f64() {
        return decode_numeric(float, kind);
    }

    match kind {
        FieldKind::Optional(scalar_kind) => {
            let scalar = match value {
                Value::String(s) if scalar_kind == crate::types::ScalarKind::String => {
                    Scalar::String(s.clone())
                }
                Value::Bool(b) if scalar_kind == crate::types::ScalarKind::Bool => Scalar::Bool(*b),
                _ => return Err(ResdocError::unsupported_optional_field_type()),
            };
            Ok(FieldValue::Optional(Some(scalar)))
        }
        FieldKind::Scalar(scalar_kind) => {
            let scalar = match value {
                Value::String(s) if scalar_kind == crate::types::ScalarKind::String => {
                    Scalar::String(s.clone())
                }
                Value::Bool(b) if scalar_kind == crate::types::ScalarKind::Bool => Scalar::Bool(*b),
                _ => return Err(ResdocError::invalid_field_type()),
            };
            Ok(FieldValue::Scalar(scalar))
        }
        FieldKind::Raw => Ok(FieldValue::Raw(value.clone())),
        FieldKind::Timestamp | FieldKind::OptionalTimestamp => unreachable!("handled above"),
    }
}

fn decode_numeric(float: f64, kind: FieldKind) -> Result<FieldValue, ResdocError> {
    match kind {
        FieldKind::Scalar(scalar_kind) if scalar_kind.is_numeric() => {
            let scalar = Scalar::from_f64(scalar_kind, float)
                .ok_or_else(ResdocError::unsupported_numeric_field_type)?;
            Ok(FieldValue::Scalar(scalar))
        }
        FieldKind::Optional(scalar_kind) if scalar_kind.is_numeric() => {
            let scalar = Scalar::from_f64(scalar_kind, float)
                .ok_or_else(ResdocError::unsupported_numeric_field_type)?;
            Ok(FieldValue::Optional(Some(scalar)))
        }
        _ => Err(ResdocError::unsupported_numeric_field_type()),
    }
}

fn decode_timestamp(
    value: &Value,
    kind: FieldKind,
    iso8601: bool,
) -> Result<FieldValue, ResdocError> {
    let timestamp = if iso8601 {
        let text = value
            .as_str()
            .ok_or_else(ResdocError::invalid_iso8601_timestamp)?;
        parse_iso8601(text)?
    } else {
        let seconds = if let Some(n) = value.as_i64() {
            n
        } else if let Some(f) = value.as_f64() {
            f as i64
        } else {
            return Err(ResdocError::invalid_unix_timestamp());
        };
        DateTime::<Utc>::from_timestamp(seconds, 0)
            .ok_or_else(ResdocError::invalid_unix_timestamp)?
    };

    match kind {
        FieldKind::Timestamp => Ok(FieldValue::Timestamp(Some(timestamp))),
        _ => Ok(FieldValue::OptionalTimestamp(Some(timestamp))),
    }
}

/// Parse the ISO-8601 subset used on the wire.
pub(crate) fn parse_iso8601(text: &str) -> Result<DateTime<Utc>, ResdocError> {
    NaiveDateTime::parse_from_str(text, ISO8601_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| ResdocError::invalid_iso8601_timestamp())
}

fn format_timestamp(t: &DateTime<Utc>, iso8601: bool) -> Value {
    if iso8601 {
        Value::String(t.format(ISO8601_FORMAT).to_string())
    } else {
        Value::from(t.timestamp())
    }
}

/// Whether a passthrough value counts as empty for `omitempty`.
fn is_empty_raw(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}
