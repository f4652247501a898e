//! Core type definitions for resdoc.

mod document;
mod error;
mod links;
mod node;
mod schema;
mod value;

pub use document::{Document, PrimaryData};
pub use error::{ErrorKind, ResdocError};
pub use links::{Links, Meta};
pub use node::{Node, Relationship, RelationshipData};
pub use schema::{FieldRole, Resource, ResourceCollection, Schema, SchemaBuilder};
pub use value::{FieldKind, FieldValue, Scalar, ScalarKind};

pub(crate) use schema::FieldDef;
