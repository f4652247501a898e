//! Encoding: host object graphs to resource documents.
//!
//! The encoder walks a resource's field descriptors in declaration order and
//! builds one node per entity. With sideloading active (the default), related
//! entities land once in the envelope's `included` set, deduplicated by
//! `(type, id)` with the first encoded snapshot winning, and relationship
//! linkages hold shallow `{type, id}` references. The embedded variant
//! disables sideloading and inlines full node data into the linkages instead.

use std::collections::BTreeMap;

use crate::helpers::coerce::encode_attribute;
use crate::helpers::identifier::identifier_to_string;
use crate::ops::MAX_GRAPH_DEPTH;
use crate::types::{
    Document, FieldDef, Links, Node, Relationship, RelationshipData, ResdocError, Resource,
    ResourceCollection,
};

/// Encode one resource into a single-resource envelope, sideloading every
/// related entity into `included`.
pub fn encode_one(resource: &dyn Resource) -> Result<Document, ResdocError> {
    let mut encoder = Encoder::new(true);
    let node = encoder.visit(resource, 0)?;
    Ok(Document::one(node, encoder.into_included()))
}

/// Encode a collection into a "many" envelope. Envelope-level links and meta
/// come from the collection value; the `included` set is shared across all
/// members.
pub fn encode_many<C: ResourceCollection + ?Sized>(
    collection: &C,
) -> Result<Document, ResdocError> {
    let mut encoder = Encoder::new(true);
    let mut nodes = Vec::new();
    for member in collection.members() {
        nodes.push(encoder.visit(member, 0)?);
    }

    let mut document = Document::many(nodes, encoder.into_included());
    if let Some(links) = collection.links() {
        links.validate()?;
        document.links = Some(links);
    }
    document.meta = collection.meta();
    Ok(document)
}

/// Encode one resource with sideloading disabled: relationship linkages
/// carry full node data inline and the envelope has no `included` set.
pub fn encode_one_embedded(resource: &dyn Resource) -> Result<Document, ResdocError> {
    let mut encoder = Encoder::new(false);
    let node = encoder.visit(resource, 0)?;
    Ok(Document::one(node, Vec::new()))
}

struct Encoder {
    sideload: bool,
    included: BTreeMap<(String, String), Node>,
}

impl Encoder {
    fn new(sideload: bool) -> Self {
        Encoder {
            sideload,
            included: BTreeMap::new(),
        }
    }

    fn into_included(self) -> Vec<Node> {
        self.included.into_values().collect()
    }

    /// First write wins: a later snapshot of the same `(type, id)` never
    /// replaces the one already sideloaded.
    fn append_included(&mut self, node: Node) {
        self.included.entry(node.identity()).or_insert(node);
    }

    fn visit(&mut self, resource: &dyn Resource, depth: usize) -> Result<Node, ResdocError> {
        if depth > MAX_GRAPH_DEPTH {
            return Err(ResdocError::recursion_limit_exceeded(MAX_GRAPH_DEPTH));
        }

        let mut node = Node::default();

        for field in resource.schema().fields() {
            match field {
                FieldDef::Identifier { type_name, get, .. } => {
                    // an earlier embedded merge may already have named the
                    // node; the merged type wins
                    if node.node_type.is_empty() {
                        node.node_type = type_name.clone();
                    }
                    node.id = identifier_to_string(&get(resource))?;
                }
                FieldDef::ClientId { get, .. } => {
                    let client_id = get(resource);
                    if !client_id.is_empty() {
                        node.client_id = Some(client_id);
                    }
                }
                FieldDef::Attribute {
                    name,
                    omit_empty,
                    iso8601,
                    get,
                    ..
                } => {
                    if let Some(value) = encode_attribute(&get(resource), *omit_empty, *iso8601) {
                        node.attributes.insert(name.clone(), value);
                    }
                }
                FieldDef::ToOne {
                    name,
                    omit_empty,
                    get,
                    ..
                } => match get(resource) {
                    None => {
                        if !*omit_empty {
                            node.relationships.insert(
                                name.clone(),
                                Relationship {
                                    data: RelationshipData::One(None),
                                    links: relationship_links(resource, name)?,
                                    meta: resource.relationship_meta(name),
                                },
                            );
                        }
                    }
                    Some(child) => {
                        let linkage = self.visit_related(child, depth)?;
                        node.relationships.insert(
                            name.clone(),
                            Relationship {
                                data: RelationshipData::One(Some(Box::new(linkage))),
                                links: relationship_links(resource, name)?,
                                meta: resource.relationship_meta(name),
                            },
                        );
                    }
                },
                FieldDef::ToMany {
                    name,
                    omit_empty,
                    get,
                    ..
                } => {
                    let children = get(resource);
                    if children.is_empty() && *omit_empty {
                        continue;
                    }
                    let mut linkages = Vec::with_capacity(children.len());
                    for child in children {
                        linkages.push(self.visit_related(child, depth)?);
                    }
                    node.relationships.insert(
                        name.clone(),
                        Relationship {
                            data: RelationshipData::Many(linkages),
                            links: relationship_links(resource, name)?,
                            meta: resource.relationship_meta(name),
                        },
                    );
                }
                FieldDef::Embedded { type_name, get } => {
                    let child = get(resource).ok_or_else(ResdocError::embedded_reference_unset)?;
                    let mut child_node = self.visit(child, depth + 1)?;
                    child_node.node_type = type_name.clone();
                    node.merge_embedded(child_node);
                }
            }
        }

        if let Some(links) = resource.links() {
            links.validate()?;
            node.links = Some(links);
        }
        node.meta = resource.meta();

        Ok(node)
    }

    /// Encode one related entity and return the linkage node for it: a
    /// shallow reference when sideloading, the full node otherwise.
    fn visit_related(
        &mut self,
        child: &dyn Resource,
        depth: usize,
    ) -> Result<Node, ResdocError> {
        let child_node = self.visit(child, depth + 1)?;
        if self.sideload {
            let reference = child_node.shallow();
            self.append_included(child_node);
            Ok(reference)
        } else {
            Ok(child_node)
        }
    }
}

fn relationship_links(
    resource: &dyn Resource,
    relation: &str,
) -> Result<Option<Links>, ResdocError> {
    match resource.relationship_links(relation) {
        Some(links) => {
            links.validate()?;
            Ok(Some(links))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::fixtures::{sample_blog, Blog, Comment, ExtendedModel, Model, Post};
    use crate::types::{FieldKind, FieldValue, Meta, Schema, ScalarKind};
    use serde_json::json;
    use std::any::Any;
    use std::sync::LazyLock;

    #[test]
    fn test_encode_one_simple() {
        let comment = Comment {
            id: 3,
            client_id: "c-17".to_string(),
            body: "nice".to_string(),
        };
        let doc = encode_one(&comment).unwrap();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "data": {
                    "type": "comments",
                    "id": "3",
                    "client-id": "c-17",
                    "attributes": {"body": "nice"}
                }
            })
        );
    }

    #[test]
    fn test_encode_one_sideloads_and_dedups() {
        let doc = encode_one(&sample_blog()).unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["data"]["type"], json!("blogs"));
        assert_eq!(value["data"]["id"], json!("5"));
        assert_eq!(
            value["data"]["attributes"],
            json!({"title": "Title 1", "created_at": "2016-08-08T09:00:00Z"})
        );
        assert_eq!(
            value["data"]["relationships"]["posts"]["data"],
            json!([
                {"type": "posts", "id": "1"},
                {"type": "posts", "id": "2"}
            ])
        );
        assert_eq!(
            value["data"]["relationships"]["current_post"]["data"],
            json!({"type": "posts", "id": "1"})
        );

        // current_post shares identity with posts[0]; included holds the
        // entity once, alongside the second post and both comments
        let included = value["included"].as_array().unwrap();
        assert_eq!(included.len(), 4);
        let identities: Vec<(&str, &str)> = included
            .iter()
            .map(|n| (n["type"].as_str().unwrap(), n["id"].as_str().unwrap()))
            .collect();
        assert_eq!(
            identities,
            vec![
                ("comments", "1"),
                ("comments", "2"),
                ("posts", "1"),
                ("posts", "2")
            ]
        );
    }

    #[test]
    fn test_encode_one_first_included_snapshot_wins() {
        let mut blog = sample_blog();
        // same identity as posts[0] but a diverged snapshot
        blog.current_post.as_mut().unwrap().title = "Diverged".to_string();

        let doc = encode_one(&blog).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        let post_one = value["included"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["type"] == json!("posts") && n["id"] == json!("1"))
            .unwrap();
        assert_eq!(post_one["attributes"]["title"], json!("Foo"));
    }

    #[test]
    fn test_omit_empty_relationship_matrix() {
        // latest_comment is omitempty, comments is not
        let post = Post {
            id: 9,
            title: "t".to_string(),
            body: "b".to_string(),
            ..Post::default()
        };
        let value = serde_json::to_value(encode_one(&post).unwrap()).unwrap();
        let relationships = &value["data"]["relationships"];
        assert!(relationships.get("latest_comment").is_none());
        assert_eq!(relationships["comments"]["data"], json!([]));

        // current_post is not omitempty, so unset encodes as a null linkage
        let blog = Blog {
            id: 1,
            ..Blog::default()
        };
        let value = serde_json::to_value(encode_one(&blog).unwrap()).unwrap();
        assert_eq!(
            value["data"]["relationships"]["current_post"],
            json!({"data": null})
        );
    }

    #[test]
    fn test_zero_timestamp_and_omit_empty_attribute() {
        let blog = Blog {
            id: 1,
            title: "t".to_string(),
            created_at: None,
            view_count: 0,
            ..Blog::default()
        };
        let value = serde_json::to_value(encode_one(&blog).unwrap()).unwrap();
        assert_eq!(value["data"]["attributes"], json!({"title": "t"}));

        let blog = Blog {
            id: 1,
            view_count: 3,
            ..Blog::default()
        };
        let value = serde_json::to_value(encode_one(&blog).unwrap()).unwrap();
        assert_eq!(value["data"]["attributes"]["view_count"], json!(3));
    }

    #[test]
    fn test_encode_many_shares_included() {
        let shared = Comment {
            id: 1,
            body: "shared".to_string(),
            ..Comment::default()
        };
        let posts = vec![
            Post {
                id: 1,
                title: "a".to_string(),
                comments: vec![shared.clone()],
                ..Post::default()
            },
            Post {
                id: 2,
                title: "b".to_string(),
                comments: vec![shared],
                ..Post::default()
            },
        ];

        let doc = encode_many(&posts).unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["data"].as_array().unwrap().len(), 2);
        assert_eq!(value["included"].as_array().unwrap().len(), 1);
        assert_eq!(value["included"][0]["id"], json!("1"));
        assert_eq!(value["included"][0]["type"], json!("comments"));
    }

    struct PagedPosts(Vec<Post>);

    impl ResourceCollection for PagedPosts {
        fn members(&self) -> Vec<&dyn Resource> {
            self.0.members()
        }
        fn links(&self) -> Option<Links> {
            let mut links = Links::new();
            links.insert_url("self", "https://example.com/posts?page=2");
            Some(links)
        }
        fn meta(&self) -> Option<Meta> {
            Some(Meta::from([("total".to_string(), json!(42))]))
        }
    }

    #[test]
    fn test_encode_many_collection_hooks() {
        let page = PagedPosts(vec![Post {
            id: 1,
            ..Post::default()
        }]);
        let value = serde_json::to_value(encode_many(&page).unwrap()).unwrap();
        assert_eq!(
            value["links"],
            json!({"self": "https://example.com/posts?page=2"})
        );
        assert_eq!(value["meta"], json!({"total": 42}));
    }

    #[test]
    fn test_encode_one_embedded_inlines_full_nodes() {
        let doc = encode_one_embedded(&sample_blog()).unwrap();
        let value = serde_json::to_value(&doc).unwrap();

        assert!(value.get("included").is_none());
        let current = &value["data"]["relationships"]["current_post"]["data"];
        assert_eq!(current["attributes"]["title"], json!("Foo"));
        assert_eq!(
            current["relationships"]["comments"]["data"][0]["attributes"]["body"],
            json!("foo")
        );
    }

    #[test]
    fn test_embedded_merge_parent_shadows_child() {
        let extended = ExtendedModel {
            base: Some(Model {
                id: 5,
                fizz: "fizzy".to_string(),
                buzz: 99,
            }),
            buzz: 10,
        };
        let value = serde_json::to_value(encode_one(&extended).unwrap()).unwrap();
        assert_eq!(
            value["data"],
            json!({
                "type": "models",
                "id": "5",
                "attributes": {"buzz": 10, "fizz": "fizzy"}
            })
        );
    }

    #[derive(Debug, Default)]
    struct Wrapper {
        id: u64,
        base: Option<Model>,
    }

    // embedding declared before the identifier
    static WRAPPER_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder::<Wrapper>()
            .extends::<Model>("extends,models", |w| w.base.as_ref())
            .value(
                "primary,wrappers",
                FieldKind::Scalar(ScalarKind::U64),
                |w| FieldValue::from(w.id),
                |w, v| w.id = v.into_u64().unwrap_or_default(),
            )
            .build()
            .expect("wrapper schema")
    });

    impl Resource for Wrapper {
        fn schema(&self) -> &'static Schema {
            &WRAPPER_SCHEMA
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    #[test]
    fn test_embedded_type_survives_later_identifier() {
        let wrapper = Wrapper {
            id: 7,
            base: Some(Model {
                id: 5,
                fizz: "f".to_string(),
                buzz: 1,
            }),
        };
        let value = serde_json::to_value(encode_one(&wrapper).unwrap()).unwrap();
        assert_eq!(value["data"]["type"], json!("models"));
        assert_eq!(value["data"]["id"], json!("7"));
    }

    #[test]
    fn test_embedded_unset_reference_fails() {
        let extended = ExtendedModel {
            base: None,
            buzz: 10,
        };
        let err = encode_one(&extended).unwrap_err();
        assert_eq!(err.error_type(), "embedded_reference_unset");
    }

    #[derive(Debug, Default)]
    struct Nested {
        id: u64,
        child: Option<Box<Nested>>,
    }

    static NESTED_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder::<Nested>()
            .value(
                "primary,nested",
                FieldKind::Scalar(ScalarKind::U64),
                |n| FieldValue::from(n.id),
                |n, v| n.id = v.into_u64().unwrap_or_default(),
            )
            .to_one::<Nested>(
                "relation,child,omitempty",
                |n| n.child.as_deref(),
                |n, child| n.child = Some(Box::new(child)),
            )
            .build()
            .expect("nested schema")
    });

    impl Resource for Nested {
        fn schema(&self) -> &'static Schema {
            &NESTED_SCHEMA
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    #[test]
    fn test_recursion_limit() {
        let mut root = Nested {
            id: 0,
            child: None,
        };
        for id in 1..=70 {
            root = Nested {
                id,
                child: Some(Box::new(root)),
            };
        }
        let err = encode_one(&root).unwrap_err();
        assert_eq!(err.error_type(), "recursion_limit_exceeded");

        let mut shallow = Nested {
            id: 0,
            child: None,
        };
        for id in 1..=10 {
            shallow = Nested {
                id,
                child: Some(Box::new(shallow)),
            };
        }
        assert!(encode_one(&shallow).is_ok());
    }

    #[derive(Debug, Default)]
    struct Linked {
        id: u64,
        comments: Vec<Comment>,
        bad_links: bool,
    }

    static LINKED_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
        Schema::builder::<Linked>()
            .value(
                "primary,linked",
                FieldKind::Scalar(ScalarKind::U64),
                |l| FieldValue::from(l.id),
                |l, v| l.id = v.into_u64().unwrap_or_default(),
            )
            .to_many::<Comment>(
                "relation,comments",
                |l| l.comments.iter().collect(),
                |l, children| l.comments = children,
            )
            .build()
            .expect("linked schema")
    });

    impl Resource for Linked {
        fn schema(&self) -> &'static Schema {
            &LINKED_SCHEMA
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
        fn links(&self) -> Option<Links> {
            let mut links = Links::new();
            if self.bad_links {
                links.0.insert("self".to_string(), json!(42));
            } else {
                links.insert_url("self", format!("https://example.com/linked/{}", self.id));
            }
            Some(links)
        }
        fn meta(&self) -> Option<Meta> {
            Some(Meta::from([("observed".to_string(), json!(true))]))
        }
        fn relationship_links(&self, relation: &str) -> Option<Links> {
            let mut links = Links::new();
            links.insert_url(
                "related",
                format!("https://example.com/linked/{}/{relation}", self.id),
            );
            Some(links)
        }
    }

    #[test]
    fn test_node_and_relationship_hooks() {
        let linked = Linked {
            id: 7,
            ..Linked::default()
        };
        let value = serde_json::to_value(encode_one(&linked).unwrap()).unwrap();
        assert_eq!(
            value["data"]["links"],
            json!({"self": "https://example.com/linked/7"})
        );
        assert_eq!(value["data"]["meta"], json!({"observed": true}));
        assert_eq!(
            value["data"]["relationships"]["comments"]["links"],
            json!({"related": "https://example.com/linked/7/comments"})
        );
    }

    #[test]
    fn test_invalid_links_hook_fails_encode() {
        let linked = Linked {
            id: 7,
            bad_links: true,
            ..Linked::default()
        };
        let err = encode_one(&linked).unwrap_err();
        assert_eq!(err.error_type(), "invalid_links_payload");
    }
}
