//! Resdoc Core Library
//!
//! Bidirectional mapping between typed object graphs and resource documents:
//! JSON envelopes that carry one entity (or a collection) under `data`, with
//! related entities sideloaded once into `included` and cross-referenced by
//! `(type, id)`.
//!
//! Host types implement [`Resource`] and register a [`Schema`] describing
//! their fields with the same declarative annotation grammar used on struct
//! tags in other ecosystems (`"primary,books"`, `"attr,title,omitempty"`,
//! `"relation,comments"`, ...).
//!
//! # Architecture
//!
//! - `types`: document model (Node, Document, Links) and the schema layer
//! - `ops`: encode and decode operations
//! - `helpers`: annotation parsing, value coercion, identifier handling

pub mod helpers;
pub mod ops;
pub mod types;

// Re-export commonly used types at crate root
pub use types::{
    Document,
    ErrorKind,
    FieldKind,
    FieldRole,
    FieldValue,
    Links,
    Meta,
    Node,
    PrimaryData,
    Relationship,
    RelationshipData,
    ResdocError,
    Resource,
    ResourceCollection,
    Scalar,
    ScalarKind,
    Schema,
    SchemaBuilder,
};

// Re-export operations at crate root
pub use ops::{decode_many, decode_many_str, decode_one, decode_one_str};
pub use ops::{encode_many, encode_one, encode_one_embedded};

// Re-export the annotation parser for callers that classify fields directly
pub use helpers::annotation::parse_annotation;
