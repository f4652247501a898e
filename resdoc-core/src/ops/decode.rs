//! Decoding: resource documents back into host object graphs.
//!
//! The decoder walks the target type's field descriptors and pulls each
//! field out of the node. Relationship linkages resolve against the
//! envelope's `included` set by `(type, id)`, falling back to the linkage
//! node itself when no sideloaded entity matches, so embedded-full documents
//! decode without an `included` set. Absent and null attributes leave the
//! target's default value in place. A panic escaping an accessor is reported
//! as a malformed document rather than unwinding into the caller.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use serde_json::Value;

use crate::helpers::coerce::decode_attribute;
use crate::helpers::identifier::identifier_from_string;
use crate::ops::MAX_GRAPH_DEPTH;
use crate::types::{
    Document, FieldDef, Node, PrimaryData, RelationshipData, ResdocError, Resource,
};

type IncludedIndex<'a> = BTreeMap<(&'a str, &'a str), &'a Node>;

/// Decode a single-resource envelope into a `T`.
pub fn decode_one<T: Resource + Default>(document: &Document) -> Result<T, ResdocError> {
    match &document.data {
        PrimaryData::One(node) => hydrate(node, &included_index(document)),
        PrimaryData::Many(_) => Err(ResdocError::unexpected_input_shape(
            "expected a single resource document, found a collection",
        )),
    }
}

/// Decode a collection envelope into a vector of `T`.
pub fn decode_many<T: Resource + Default>(document: &Document) -> Result<Vec<T>, ResdocError> {
    match &document.data {
        PrimaryData::Many(nodes) => {
            let index = included_index(document);
            nodes.iter().map(|node| hydrate(node, &index)).collect()
        }
        PrimaryData::One(_) => Err(ResdocError::unexpected_input_shape(
            "expected a collection document, found a single resource",
        )),
    }
}

/// Parse a JSON string and decode it as a single-resource envelope.
pub fn decode_one_str<T: Resource + Default>(input: &str) -> Result<T, ResdocError> {
    let document = parse::<T>(input)?;
    decode_one(&document)
}

/// Parse a JSON string and decode it as a collection envelope.
pub fn decode_many_str<T: Resource + Default>(input: &str) -> Result<Vec<T>, ResdocError> {
    let document = parse::<T>(input)?;
    decode_many(&document)
}

fn parse<T>(input: &str) -> Result<Document, ResdocError> {
    serde_json::from_str(input)
        .map_err(|_| ResdocError::malformed_document(std::any::type_name::<T>()))
}

fn included_index(document: &Document) -> IncludedIndex<'_> {
    document
        .included
        .iter()
        .map(|node| ((node.node_type.as_str(), node.id.as_str()), node))
        .collect()
}

/// Resolve a relationship linkage to its full node: the sideloaded entity
/// with the same `(type, id)` when present, the linkage node itself
/// otherwise.
fn resolve<'a>(reference: &'a Node, included: &IncludedIndex<'a>) -> &'a Node {
    included
        .get(&(reference.node_type.as_str(), reference.id.as_str()))
        .copied()
        .unwrap_or(reference)
}

fn hydrate<T: Resource + Default>(
    node: &Node,
    included: &IncludedIndex<'_>,
) -> Result<T, ResdocError> {
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        let mut target = T::default();
        fill(&mut target, node, included, 0).map(|_| target)
    }));
    match outcome {
        Ok(result) => result,
        Err(_) => Err(ResdocError::malformed_document(std::any::type_name::<T>())),
    }
}

fn fill(
    target: &mut dyn Resource,
    node: &Node,
    included: &IncludedIndex<'_>,
    depth: usize,
) -> Result<(), ResdocError> {
    if depth > MAX_GRAPH_DEPTH {
        return Err(ResdocError::recursion_limit_exceeded(MAX_GRAPH_DEPTH));
    }

    for field in target.schema().fields() {
        match field {
            FieldDef::Identifier {
                type_name,
                kind,
                set,
                ..
            } => {
                // an unidentified node (create-style document) skips both
                // the type check and the identifier
                if node.id.is_empty() {
                    continue;
                }
                if node.node_type != *type_name {
                    return Err(ResdocError::type_mismatch(
                        type_name.as_str(),
                        node.node_type.as_str(),
                    ));
                }
                set(target, identifier_from_string(&node.id, *kind)?);
            }
            FieldDef::ClientId { set, .. } => {
                if let Some(client_id) = &node.client_id {
                    set(target, client_id.clone());
                }
            }
            FieldDef::Attribute {
                name,
                iso8601,
                kind,
                set,
                ..
            } => match node.attributes.get(name) {
                None | Some(Value::Null) => {}
                Some(value) => set(target, decode_attribute(value, *kind, *iso8601)?),
            },
            FieldDef::ToOne {
                name,
                set,
                new_target,
                ..
            } => {
                let Some(relationship) = node.relationships.get(name) else {
                    continue;
                };
                match &relationship.data {
                    RelationshipData::One(Some(reference)) => {
                        let full = resolve(reference, included);
                        let mut child = new_target();
                        fill(child.as_mut(), full, included, depth + 1)?;
                        set(target, child);
                    }
                    RelationshipData::One(None) => {}
                    RelationshipData::Many(_) => {
                        return Err(ResdocError::unexpected_input_shape(format!(
                            "relationship {name:?} carries a collection linkage where a \
                             single linkage was expected"
                        )));
                    }
                }
            }
            FieldDef::ToMany {
                name,
                set,
                new_target,
                ..
            } => {
                let Some(relationship) = node.relationships.get(name) else {
                    continue;
                };
                match &relationship.data {
                    RelationshipData::Many(references) => {
                        let mut children = Vec::with_capacity(references.len());
                        for reference in references {
                            let full = resolve(reference, included);
                            let mut child = new_target();
                            fill(child.as_mut(), full, included, depth + 1)?;
                            children.push(child);
                        }
                        set(target, children);
                    }
                    RelationshipData::One(None) => {}
                    RelationshipData::One(Some(_)) => {
                        return Err(ResdocError::unexpected_input_shape(format!(
                            "relationship {name:?} carries a single linkage where a \
                             collection linkage was expected"
                        )));
                    }
                }
            }
            // embedding is an encode-side flattening; nothing to pull back out
            FieldDef::Embedded { .. } => {}
        }
    }

    Ok(())
}
