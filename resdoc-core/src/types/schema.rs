//! Resource schemas: the registration-time replacement for reflection.
//!
//! The original engine enumerated struct fields at runtime. Here each host
//! type registers a `Schema` once: an ordered field-descriptor table built by
//! [`SchemaBuilder`] from the same declarative annotation strings
//! (`"primary,books"`, `"attr,title,omitempty"`, ...) plus typed accessor
//! functions. Descriptor order is declaration order and drives attribute and
//! embedding precedence, so register fields in the order they are declared.
//!
//! Schemas hold no per-call data and are immutable after `build`, so a
//! `static` schema (e.g. in a `std::sync::LazyLock`) is safe for concurrent
//! read-mostly access.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;

use crate::helpers::annotation::parse_annotation;
use crate::types::error::ResdocError;
use crate::types::links::{Links, Meta};
use crate::types::value::{FieldKind, FieldValue};

/// The classification assigned to a field from its declarative annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldRole {
    /// `primary,<type-name>`: the server identifier.
    Identifier { type_name: String },
    /// `clientid`: the client-supplied identifier.
    ClientIdentifier,
    /// `attr,<name>[,omitempty][,iso8601]`: a plain attribute.
    Attribute {
        name: String,
        omit_empty: bool,
        iso8601: bool,
    },
    /// `relation,<name>[,omitempty]`: a to-one or to-many relationship.
    /// Fan-out arity is structural: it comes from which builder method
    /// registered the accessor, not from the annotation tokens.
    Relationship { name: String, omit_empty: bool },
    /// `extends,<type-name>`: an embedded value flattened into its container.
    Embedded { type_name: String },
}

/// A host type that maps to resource-document nodes.
///
/// The capability hooks default to `None`; implementations override them to
/// attach links or metadata during encode. This is the capability-set check
/// of the original engine rendered as default trait methods.
pub trait Resource: Any + Send + Sync {
    /// The field-descriptor table for this type.
    fn schema(&self) -> &'static Schema;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Node-level links, attached after field processing.
    fn links(&self) -> Option<Links> {
        None
    }

    /// Node-level metadata, attached after field processing.
    fn meta(&self) -> Option<Meta> {
        None
    }

    /// Links for one named relationship of this resource.
    fn relationship_links(&self, _relation: &str) -> Option<Links> {
        None
    }

    /// Metadata for one named relationship of this resource.
    fn relationship_meta(&self, _relation: &str) -> Option<Meta> {
        None
    }
}

/// A homogeneous collection of resources, encoded as a "many" envelope.
///
/// Top-level envelope links and meta come from the collection value itself,
/// not from its elements. Plain slices and vectors carry no hooks; wrap the
/// collection in a newtype to attach them.
pub trait ResourceCollection {
    /// The member resources, in order.
    fn members(&self) -> Vec<&dyn Resource>;

    /// Envelope-level links.
    fn links(&self) -> Option<Links> {
        None
    }

    /// Envelope-level metadata.
    fn meta(&self) -> Option<Meta> {
        None
    }
}

impl<T: Resource> ResourceCollection for [T] {
    fn members(&self) -> Vec<&dyn Resource> {
        self.iter().map(|member| member as &dyn Resource).collect()
    }
}

impl<T: Resource> ResourceCollection for Vec<T> {
    fn members(&self) -> Vec<&dyn Resource> {
        self.as_slice().members()
    }
}

type GetValue = Box<dyn Fn(&dyn Resource) -> FieldValue + Send + Sync>;
type SetValue = Box<dyn Fn(&mut dyn Resource, FieldValue) + Send + Sync>;
type GetString = Box<dyn Fn(&dyn Resource) -> String + Send + Sync>;
type SetString = Box<dyn Fn(&mut dyn Resource, String) + Send + Sync>;
type GetRef = Box<dyn for<'a> Fn(&'a dyn Resource) -> Option<&'a dyn Resource> + Send + Sync>;
type GetRefs = Box<dyn for<'a> Fn(&'a dyn Resource) -> Vec<&'a dyn Resource> + Send + Sync>;
type SetBoxed = Box<dyn Fn(&mut dyn Resource, Box<dyn Resource>) + Send + Sync>;
type SetBoxedMany = Box<dyn Fn(&mut dyn Resource, Vec<Box<dyn Resource>>) + Send + Sync>;
type NewResource = Box<dyn Fn() -> Box<dyn Resource> + Send + Sync>;

/// One resolved field descriptor: classified role plus erased accessors.
pub(crate) enum FieldDef {
    Identifier {
        type_name: String,
        kind: FieldKind,
        get: GetValue,
        set: SetValue,
    },
    ClientId {
        get: GetString,
        set: SetString,
    },
    Attribute {
        name: String,
        omit_empty: bool,
        iso8601: bool,
        kind: FieldKind,
        get: GetValue,
        set: SetValue,
    },
    ToOne {
        name: String,
        omit_empty: bool,
        get: GetRef,
        set: SetBoxed,
        new_target: NewResource,
    },
    ToMany {
        name: String,
        omit_empty: bool,
        get: GetRefs,
        set: SetBoxedMany,
        new_target: NewResource,
    },
    Embedded {
        type_name: String,
        get: GetRef,
    },
}

/// An ordered, immutable field-descriptor table for one host type.
pub struct Schema {
    fields: Vec<FieldDef>,
    type_name: Option<String>,
}

impl Schema {
    /// Start building a schema for `T`.
    pub fn builder<T: Resource>() -> SchemaBuilder<T> {
        SchemaBuilder::new()
    }

    /// The resource type name declared by the identifier field, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub(crate) fn fields(&self) -> &[FieldDef] {
        &self.fields
    }
}

// descriptors hold boxed accessors, so render a summary instead of deriving
impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields.len())
            .finish()
    }
}

enum PendingAccessor {
    Value {
        kind: FieldKind,
        get: GetValue,
        set: SetValue,
    },
    ClientId {
        get: GetString,
        set: SetString,
    },
    ToOne {
        get: GetRef,
        set: SetBoxed,
        new_target: NewResource,
    },
    ToMany {
        get: GetRefs,
        set: SetBoxedMany,
        new_target: NewResource,
    },
    Embedded {
        get: GetRef,
    },
}

/// Builds a [`Schema`] from annotation strings and typed accessors.
///
/// Accessors are plain function pointers over the concrete host type; the
/// builder erases them behind the `Resource` trait. Annotations are parsed
/// and checked against the registered accessor shape in [`build`], which is
/// where `MalformedAnnotation` surfaces.
///
/// [`build`]: SchemaBuilder::build
pub struct SchemaBuilder<T> {
    pending: Vec<(String, PendingAccessor)>,
    _marker: PhantomData<fn(T)>,
}

fn expect_ref<T: Resource>(resource: &dyn Resource) -> &T {
    resource
        .as_any()
        .downcast_ref::<T>()
        .expect("schema accessor invoked with a mismatched resource type")
}

fn expect_mut<T: Resource>(resource: &mut dyn Resource) -> &mut T {
    resource
        .as_any_mut()
        .downcast_mut::<T>()
        .expect("schema accessor invoked with a mismatched resource type")
}

impl<T: Resource> SchemaBuilder<T> {
    pub fn new() -> Self {
        SchemaBuilder {
            pending: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Register a value-backed field: the identifier (`primary,...`) or a
    /// plain attribute (`attr,...`).
    pub fn value(
        mut self,
        annotation: &str,
        kind: FieldKind,
        get: fn(&T) -> FieldValue,
        set: fn(&mut T, FieldValue),
    ) -> Self {
        let get: GetValue = Box::new(move |resource: &dyn Resource| get(expect_ref::<T>(resource)));
        let set: SetValue = Box::new(move |resource: &mut dyn Resource, value: FieldValue| {
            set(expect_mut::<T>(resource), value)
        });
        self.pending
            .push((annotation.to_string(), PendingAccessor::Value { kind, get, set }));
        self
    }

    /// Register the client identifier field (`clientid`).
    pub fn client_id(
        mut self,
        annotation: &str,
        get: fn(&T) -> String,
        set: fn(&mut T, String),
    ) -> Self {
        let get: GetString =
            Box::new(move |resource: &dyn Resource| get(expect_ref::<T>(resource)));
        let set: SetString = Box::new(move |resource: &mut dyn Resource, value: String| {
            set(expect_mut::<T>(resource), value)
        });
        self.pending
            .push((annotation.to_string(), PendingAccessor::ClientId { get, set }));
        self
    }

    /// Register a to-one relationship (`relation,...`).
    pub fn to_one<R: Resource + Default>(
        mut self,
        annotation: &str,
        get: fn(&T) -> Option<&R>,
        set: fn(&mut T, R),
    ) -> Self {
        let get: GetRef = Box::new(move |resource: &dyn Resource| {
            get(expect_ref::<T>(resource)).map(|child| child as &dyn Resource)
        });
        let set: SetBoxed = Box::new(move |resource: &mut dyn Resource, child: Box<dyn Resource>| {
            let child = child
                .into_any()
                .downcast::<R>()
                .expect("schema accessor invoked with a mismatched resource type");
            set(expect_mut::<T>(resource), *child)
        });
        let new_target: NewResource = Box::new(|| Box::new(R::default()));
        self.pending.push((
            annotation.to_string(),
            PendingAccessor::ToOne {
                get,
                set,
                new_target,
            },
        ));
        self
    }

    /// Register a to-many relationship (`relation,...`).
    pub fn to_many<R: Resource + Default>(
        mut self,
        annotation: &str,
        get: fn(&T) -> Vec<&R>,
        set: fn(&mut T, Vec<R>),
    ) -> Self {
        let get: GetRefs = Box::new(move |resource: &dyn Resource| {
            get(expect_ref::<T>(resource))
                .into_iter()
                .map(|child| child as &dyn Resource)
                .collect()
        });
        let set: SetBoxedMany =
            Box::new(move |resource: &mut dyn Resource, children: Vec<Box<dyn Resource>>| {
                let children = children
                    .into_iter()
                    .map(|child| {
                        *child
                            .into_any()
                            .downcast::<R>()
                            .expect("schema accessor invoked with a mismatched resource type")
                    })
                    .collect();
                set(expect_mut::<T>(resource), children)
            });
        let new_target: NewResource = Box::new(|| Box::new(R::default()));
        self.pending.push((
            annotation.to_string(),
            PendingAccessor::ToMany {
                get,
                set,
                new_target,
            },
        ));
        self
    }

    /// Register an embedded value (`extends,...`), flattened into this
    /// type's node on encode. An unset reference fails the encode.
    pub fn extends<R: Resource>(mut self, annotation: &str, get: fn(&T) -> Option<&R>) -> Self {
        let get: GetRef = Box::new(move |resource: &dyn Resource| {
            get(expect_ref::<T>(resource)).map(|child| child as &dyn Resource)
        });
        self.pending
            .push((annotation.to_string(), PendingAccessor::Embedded { get }));
        self
    }

    /// Parse every annotation, check it against the registered accessor
    /// shape, and produce the immutable schema.
    pub fn build(self) -> Result<Schema, ResdocError> {
        let mut fields = Vec::with_capacity(self.pending.len());
        let mut type_name = None;

        for (annotation, accessor) in self.pending {
            let role = parse_annotation(&annotation)?;
            let field = match (role, accessor) {
                (
                    FieldRole::Identifier { type_name: name },
                    PendingAccessor::Value { kind, get, set },
                ) => {
                    type_name = Some(name.clone());
                    FieldDef::Identifier {
                        type_name: name,
                        kind,
                        get,
                        set,
                    }
                }
                (FieldRole::ClientIdentifier, PendingAccessor::ClientId { get, set }) => {
                    FieldDef::ClientId { get, set }
                }
                (
                    FieldRole::Attribute {
                        name,
                        omit_empty,
                        iso8601,
                    },
                    PendingAccessor::Value { kind, get, set },
                ) => FieldDef::Attribute {
                    name,
                    omit_empty,
                    iso8601,
                    kind,
                    get,
                    set,
                },
                (
                    FieldRole::Relationship { name, omit_empty },
                    PendingAccessor::ToOne {
                        get,
                        set,
                        new_target,
                    },
                ) => FieldDef::ToOne {
                    name,
                    omit_empty,
                    get,
                    set,
                    new_target,
                },
                (
                    FieldRole::Relationship { name, omit_empty },
                    PendingAccessor::ToMany {
                        get,
                        set,
                        new_target,
                    },
                ) => FieldDef::ToMany {
                    name,
                    omit_empty,
                    get,
                    set,
                    new_target,
                },
                (FieldRole::Embedded { type_name }, PendingAccessor::Embedded { get }) => {
                    FieldDef::Embedded { type_name, get }
                }
                _ => return Err(ResdocError::malformed_annotation(annotation)),
            };
            fields.push(field);
        }

        Ok(Schema { fields, type_name })
    }
}

impl<T: Resource> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
