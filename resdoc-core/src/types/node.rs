//! Resource nodes and relationship linkages.
//!
//! A `Node` is the canonical in-memory representation of one entity in the
//! document: its type, identifier, client identifier, attribute map and
//! relationship map. `(type, id)` is the sole identity used for sideload
//! deduplication and cross-referencing; two nodes with equal `(type, id)`
//! are the same entity even when their attribute snapshots differ.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::links::{Links, Meta};

/// One resource entity in the document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Resource type name. Wire key `type`.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub node_type: String,

    /// Server identifier, always a string on the wire. Empty means
    /// "unassigned" (e.g. a not-yet-persisted entity) and is omitted.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Client-supplied identifier, independent of the server identifier.
    #[serde(
        rename = "client-id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub client_id: Option<String>,

    /// Attribute map. Values are document values (null, boolean, number,
    /// string, sequence or nested map).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Value>,

    /// Relationship map, keyed by relation name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Node {
    /// A shallow `{type, id}` reference to this node, used inside
    /// relationship linkages when sideloading is active.
    pub fn shallow(&self) -> Node {
        Node {
            node_type: self.node_type.clone(),
            id: self.id.clone(),
            ..Node::default()
        }
    }

    /// The `(type, id)` identity used for dedup and cross-referencing.
    pub fn identity(&self) -> (String, String) {
        (self.node_type.clone(), self.id.clone())
    }

    /// Merge an embedded ("extends") child node into this node.
    ///
    /// Type and client id come from the child unconditionally; the id comes
    /// from the child only when this node's id is still unset; attribute maps
    /// are unioned with this node's pre-existing keys winning on collision,
    /// so top-level declared fields shadow embedded fields of the same
    /// serialized name regardless of declaration order.
    pub fn merge_embedded(&mut self, child: Node) {
        self.node_type = child.node_type;
        self.client_id = child.client_id;
        if self.id.is_empty() {
            self.id = child.id;
        }
        for (name, value) in child.attributes {
            self.attributes.entry(name).or_insert(value);
        }
    }
}

/// One relationship linkage: to-one (absent or present) or to-many, each
/// optionally carrying its own links and meta.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub data: RelationshipData,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// The `data` member of a relationship linkage.
///
/// Serializes untagged so the wire shape is exactly `null`, a node object or
/// a node array. When sideloading is active the nodes here are shallow
/// `{type, id}` references; with sideloading disabled they carry full data.
///
/// `Many` must be tried first: every `Node` field defaults, so an untagged
/// probe of an empty array against the struct variant would succeed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    /// To-many linkage: a sequence of nodes.
    Many(Vec<Node>),
    /// To-one linkage: `null` (absent) or a single node.
    One(Option<Box<Node>>),
}
