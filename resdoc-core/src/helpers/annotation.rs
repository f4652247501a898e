//! Field annotation parsing (the field classifier).
//!
//! Annotation grammar: comma-separated tokens. The first token selects the
//! role (`primary`, `clientid`, `attr`, `relation`, `extends`); for every
//! role except `clientid` the second token supplies the role's name (the
//! resource type name for `primary`/`extends`, the serialized field name for
//! `attr`/`relation`); trailing tokens are role-appropriate modifiers
//! (`omitempty`, `iso8601`). The token spellings are part of the external
//! contract and must not change.

use crate::types::{FieldRole, ResdocError};

pub(crate) const ANNOTATION_PRIMARY: &str = "primary";
pub(crate) const ANNOTATION_CLIENT_ID: &str = "clientid";
pub(crate) const ANNOTATION_ATTRIBUTE: &str = "attr";
pub(crate) const ANNOTATION_RELATION: &str = "relation";
pub(crate) const ANNOTATION_EXTENDS: &str = "extends";
pub(crate) const ANNOTATION_OMIT_EMPTY: &str = "omitempty";
pub(crate) const ANNOTATION_ISO8601: &str = "iso8601";
pub(crate) const ANNOTATION_SEPARATOR: char = ',';

/// Parse a field's declarative annotation into its role.
///
/// Fails with `MalformedAnnotation` when fewer than the minimum required
/// tokens are present or the first token is not a recognized role. Unknown
/// trailing modifier tokens are ignored.
pub fn parse_annotation(tag: &str) -> Result<FieldRole, ResdocError> {
    let args: Vec<&str> = tag.split(ANNOTATION_SEPARATOR).collect();

    let annotation = match args.first() {
        Some(first) if !first.is_empty() => *first,
        _ => return Err(ResdocError::malformed_annotation(tag)),
    };

    // clientid stands alone; every other role needs a name token
    if (annotation == ANNOTATION_CLIENT_ID && args.len() != 1)
        || (annotation != ANNOTATION_CLIENT_ID && args.len() < 2)
    {
        return Err(ResdocError::malformed_annotation(tag));
    }

    match annotation {
        ANNOTATION_PRIMARY => Ok(FieldRole::Identifier {
            type_name: args[1].to_string(),
        }),
        ANNOTATION_CLIENT_ID => Ok(FieldRole::ClientIdentifier),
        ANNOTATION_ATTRIBUTE => {
            let mut omit_empty = false;
            let mut iso8601 = false;
            for modifier in &args[2..] {
                match *modifier {
                    ANNOTATION_OMIT_EMPTY => omit_empty = true,
                    ANNOTATION_ISO8601 => iso8601 = true,
                    _ => {}
                }
            }
            Ok(FieldRole::Attribute {
                name: args[1].to_string(),
                omit_empty,
                iso8601,
            })
        }
        ANNOTATION_RELATION => {
            let omit_empty = args[2..].contains(&ANNOTATION_OMIT_EMPTY);
            Ok(FieldRole::Relationship {
                name: args[1].to_string(),
                omit_empty,
            })
        }
        ANNOTATION_EXTENDS => Ok(FieldRole::Embedded {
            type_name: args[1].to_string(),
        }),
        _ => Err(ResdocError::malformed_annotation(tag)),
    }
}
