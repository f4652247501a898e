//! Links and meta maps attached to nodes, relationships and envelopes.
//!
//! The wire format allows each link member to be either a plain url string or
//! an object of the form `{"href": "...", "meta": {...}}`. Links are produced
//! by capability hooks at encode time, so their shape is validated before
//! attachment rather than trusted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::error::ResdocError;

/// Free-form metadata map (`meta` members of nodes, relationships and
/// envelopes).
pub type Meta = BTreeMap<String, Value>;

/// A `links` map: member name to url string or `{href, meta}` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(pub BTreeMap<String, Value>);

impl Links {
    /// Create an empty links map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a plain url link.
    pub fn insert_url(&mut self, name: impl Into<String>, href: impl Into<String>) {
        self.0.insert(name.into(), Value::String(href.into()));
    }

    /// Insert a link object with attached metadata.
    pub fn insert_link(&mut self, name: impl Into<String>, href: impl Into<String>, meta: Meta) {
        let mut object = serde_json::Map::new();
        object.insert("href".to_string(), Value::String(href.into()));
        object.insert(
            "meta".to_string(),
            Value::Object(meta.into_iter().collect()),
        );
        self.0.insert(name.into(), Value::Object(object));
    }

    /// Validate that every member is a url string or an `{href, meta?}`
    /// object with a string `href`.
    ///
    /// Called before a links payload produced by a capability hook is
    /// attached to any node or envelope.
    pub fn validate(&self) -> Result<(), ResdocError> {
        for (name, value) in &self.0 {
            match value {
                Value::String(_) => {}
                Value::Object(object) => {
                    if !matches!(object.get("href"), Some(Value::String(_))) {
                        return Err(ResdocError::invalid_links_payload(name));
                    }
                    for key in object.keys() {
                        if key != "href" && key != "meta" {
                            return Err(ResdocError::invalid_links_payload(name));
                        }
                    }
                    if let Some(meta) = object.get("meta") {
                        if !meta.is_object() {
                            return Err(ResdocError::invalid_links_payload(name));
                        }
                    }
                }
                _ => return Err(ResdocError::invalid_links_payload(name)),
            }
        }
        Ok(())
    }
}
