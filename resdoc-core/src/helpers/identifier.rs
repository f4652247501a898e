//! Identifier stringification.
//!
//! Identifiers are always strings on the wire regardless of the host field's
//! declared kind. String and fixed-width integer kinds are supported; any
//! other kind fails with `InvalidIdentifier`.

use crate::types::{FieldKind, FieldValue, ResdocError, Scalar};

/// Render a host identifier value as its wire string.
///
/// An unset identifier renders as the empty string, which the node layer
/// omits from serialization.
pub fn identifier_to_string(value: &FieldValue) -> Result<String, ResdocError> {
    let scalar = match value {
        FieldValue::Scalar(scalar) => scalar,
        FieldValue::Optional(Some(scalar)) => scalar,
        FieldValue::Optional(None) => return Ok(String::new()),
        _ => return Err(ResdocError::invalid_identifier()),
    };

    match scalar {
        Scalar::String(s) => Ok(s.clone()),
        Scalar::I8(n) => Ok(n.to_string()),
        Scalar::I16(n) => Ok(n.to_string()),
        Scalar::I32(n) => Ok(n.to_string()),
        Scalar::I64(n) => Ok(n.to_string()),
        Scalar::U8(n) => Ok(n.to_string()),
        Scalar::U16(n) => Ok(n.to_string()),
        Scalar::U32(n) => Ok(n.to_string()),
        Scalar::U64(n) => Ok(n.to_string()),
        Scalar::Bool(_) | Scalar::F32(_) | Scalar::F64(_) => {
            Err(ResdocError::invalid_identifier())
        }
    }
}

/// Coerce a wire identifier string back into the host field's declared kind.
///
/// String targets take the text verbatim; integer targets parse through a
/// floating-point intermediate, truncating toward zero. The caller skips
/// empty wire identifiers before this runs.
pub fn identifier_from_string(text: &str, kind: FieldKind) -> Result<FieldValue, ResdocError> {
    let scalar_kind = match kind {
        FieldKind::Scalar(k) | FieldKind::Optional(k) => k,
        _ => return Err(ResdocError::invalid_identifier()),
    };

    let scalar = if scalar_kind == crate::types::ScalarKind::String {
        Scalar::String(text.to_string())
    } else if scalar_kind.is_integer() {
        let float: f64 = text
            .parse()
            .map_err(|_| ResdocError::invalid_identifier())?;
        Scalar::from_f64(scalar_kind, float).ok_or_else(ResdocError::invalid_identifier)?
    } else {
        return Err(ResdocError::invalid_identifier());
    };

    match kind {
        FieldKind::Optional(_) => Ok(FieldValue::Optional(Some(scalar))),
        _ => Ok(FieldValue::Scalar(scalar)),
    }
}
