//! Document envelopes.
//!
//! A document wraps either one node or a homogeneous sequence of nodes under
//! `data`, with related entities sideloaded once into `included`. `included`
//! is never emitted as an empty sequence. Envelopes are constructed fresh per
//! encode/decode call and discarded after serialization or hydration.

use serde::{Deserialize, Serialize};

use crate::types::links::{Links, Meta};
use crate::types::node::Node;

/// A complete document envelope, for one resource or a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub data: PrimaryData,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<Node>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// The `data` member: one node or a sequence of nodes, untagged on the wire.
///
/// `Many` must be tried first: every `Node` field defaults, so an untagged
/// probe of an empty array against the struct variant would succeed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Many(Vec<Node>),
    One(Box<Node>),
}

impl Document {
    /// Build a single-resource envelope.
    pub fn one(data: Node, included: Vec<Node>) -> Self {
        Document {
            data: PrimaryData::One(Box::new(data)),
            included,
            links: None,
            meta: None,
        }
    }

    /// Build a collection envelope.
    pub fn many(data: Vec<Node>, included: Vec<Node>) -> Self {
        Document {
            data: PrimaryData::Many(data),
            included,
            links: None,
            meta: None,
        }
    }

    /// Return this envelope with the `included` set cleared, for responses
    /// that must not sideload.
    pub fn strip_included(mut self) -> Self {
        self.included.clear();
        self
    }
}
