//! Resdoc error types.
//!
//! This module provides error handling using `exn` for context-aware errors
//! while preserving stable `error_type()` strings for interop with callers
//! that match on error categories.

use std::fmt;

/// Error kind enum for resdoc operations.
///
/// This defines the stable error types that map to `error_type()` strings.
/// Each variant corresponds to a specific error condition. The first error
/// encountered during an encode or decode aborts the whole call; errors are
/// never accumulated.
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// A field annotation string did not follow the annotation grammar.
    MalformedAnnotation { tag: String },
    /// The input to an encode/decode call had the wrong shape
    /// (e.g. a collection document where a single resource was expected).
    UnexpectedInputShape { message: String },
    /// An identifier field was not a string or a recognized integer kind.
    InvalidIdentifier,
    /// A document attribute value did not match the target field's kind.
    InvalidFieldType,
    /// A numeric document value targeted a non-numeric field.
    UnsupportedNumericFieldType,
    /// An optional field's element kind did not match the document value.
    UnsupportedOptionalFieldType,
    /// An `iso8601` timestamp attribute was not a parseable ISO-8601 string.
    InvalidIso8601Timestamp,
    /// A timestamp attribute without `iso8601` was not a unix epoch number.
    InvalidUnixTimestamp,
    /// An embedded (`extends`) reference was unset during encode.
    EmbeddedReferenceUnset,
    /// The document node's `type` did not match the target's declared type.
    TypeMismatch { expected: String, actual: String },
    /// The document was not a resource-document representation of the target.
    MalformedDocument { target: String },
    /// A links-producing hook returned a structurally invalid links payload.
    InvalidLinksPayload { name: String },
    /// The relationship graph exceeded the maximum encode depth.
    RecursionLimitExceeded { depth: usize },
}

impl ErrorKind {
    /// Get the error type as a string.
    ///
    /// These strings are stable and must not change to maintain compatibility
    /// with callers that dispatch on them.
    pub fn error_type(&self) -> &'static str {
        match self {
            ErrorKind::MalformedAnnotation { .. } => "malformed_annotation",
            ErrorKind::UnexpectedInputShape { .. } => "unexpected_input_shape",
            ErrorKind::InvalidIdentifier => "invalid_identifier",
            ErrorKind::InvalidFieldType => "invalid_field_type",
            ErrorKind::UnsupportedNumericFieldType => "unsupported_numeric_field_type",
            ErrorKind::UnsupportedOptionalFieldType => "unsupported_optional_field_type",
            ErrorKind::InvalidIso8601Timestamp => "invalid_iso8601_timestamp",
            ErrorKind::InvalidUnixTimestamp => "invalid_unix_timestamp",
            ErrorKind::EmbeddedReferenceUnset => "embedded_reference_unset",
            ErrorKind::TypeMismatch { .. } => "type_mismatch",
            ErrorKind::MalformedDocument { .. } => "malformed_document",
            ErrorKind::InvalidLinksPayload { .. } => "invalid_links_payload",
            ErrorKind::RecursionLimitExceeded { .. } => "recursion_limit_exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedAnnotation { tag } => {
                write!(f, "bad resource annotation format: {:?}", tag)
            }
            ErrorKind::UnexpectedInputShape { message } => write!(f, "{}", message),
            ErrorKind::InvalidIdentifier => write!(
                f,
                "id should be either a string, int(8,16,32,64) or uint(8,16,32,64)"
            ),
            ErrorKind::InvalidFieldType => {
                write!(f, "document value does not match the target field type")
            }
            ErrorKind::UnsupportedNumericFieldType => {
                write!(f, "the target field is not of a known numeric kind")
            }
            ErrorKind::UnsupportedOptionalFieldType => {
                write!(f, "optional target field does not support this document value")
            }
            ErrorKind::InvalidIso8601Timestamp => {
                write!(f, "only strings can be parsed as dates, ISO8601 timestamps")
            }
            ErrorKind::InvalidUnixTimestamp => {
                write!(f, "only numbers can be parsed as dates, unix timestamps")
            }
            ErrorKind::EmbeddedReferenceUnset => write!(f, "embedded reference is unset"),
            ErrorKind::TypeMismatch { expected, actual } => write!(
                f,
                "trying to decode an object of type {:?}, but {:?} does not match",
                actual, expected
            ),
            ErrorKind::MalformedDocument { target } => write!(
                f,
                "data is not a resource document representation of '{}'",
                target
            ),
            ErrorKind::InvalidLinksPayload { name } => write!(
                f,
                "the {:?} member of the links object was not a url string or a link object",
                name
            ),
            ErrorKind::RecursionLimitExceeded { depth } => write!(
                f,
                "relationship graph exceeds the maximum encode depth of {}",
                depth
            ),
        }
    }
}

impl std::error::Error for ErrorKind {}

/// Main error type for resdoc operations.
///
/// This wraps `exn::Exn<ErrorKind>` to provide context-aware error handling
/// while maintaining the stable `error_type()` interface.
#[derive(Debug)]
pub struct ResdocError(exn::Exn<ErrorKind>);

impl ResdocError {
    /// Create a new error from an error kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self(exn::Exn::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_error()
    }

    /// Get the error type as a string.
    ///
    /// This delegates to `ErrorKind::error_type()` to maintain stable strings.
    pub fn error_type(&self) -> &'static str {
        self.kind().error_type()
    }

    // Convenience constructors for common error types

    /// Create a "malformed annotation" error.
    pub fn malformed_annotation(tag: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedAnnotation { tag: tag.into() })
    }

    /// Create an "unexpected input shape" error.
    pub fn unexpected_input_shape(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnexpectedInputShape {
            message: message.into(),
        })
    }

    /// Create an "invalid identifier" error.
    pub fn invalid_identifier() -> Self {
        Self::new(ErrorKind::InvalidIdentifier)
    }

    /// Create an "invalid field type" error.
    pub fn invalid_field_type() -> Self {
        Self::new(ErrorKind::InvalidFieldType)
    }

    /// Create an "unsupported numeric field type" error.
    pub fn unsupported_numeric_field_type() -> Self {
        Self::new(ErrorKind::UnsupportedNumericFieldType)
    }

    /// Create an "unsupported optional field type" error.
    pub fn unsupported_optional_field_type() -> Self {
        Self::new(ErrorKind::UnsupportedOptionalFieldType)
    }

    /// Create an "invalid ISO8601 timestamp" error.
    pub fn invalid_iso8601_timestamp() -> Self {
        Self::new(ErrorKind::InvalidIso8601Timestamp)
    }

    /// Create an "invalid unix timestamp" error.
    pub fn invalid_unix_timestamp() -> Self {
        Self::new(ErrorKind::InvalidUnixTimestamp)
    }

    /// Create an "embedded reference unset" error.
    pub fn embedded_reference_unset() -> Self {
        Self::new(ErrorKind::EmbeddedReferenceUnset)
    }

    /// Create a "type mismatch" error.
    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Create a "malformed document" error for a target type.
    pub fn malformed_document(target: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedDocument {
            target: target.into(),
        })
    }

    /// Create an "invalid links payload" error for a named link member.
    pub fn invalid_links_payload(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidLinksPayload { name: name.into() })
    }

    /// Create a "recursion limit exceeded" error.
    pub fn recursion_limit_exceeded(depth: usize) -> Self {
        Self::new(ErrorKind::RecursionLimitExceeded { depth })
    }
}

impl fmt::Display for ResdocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ResdocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        // ErrorKind is the root cause, no further source
        None
    }
}
