//! Fixture catalog: books, authors and reviews with registered schemas.
//!
//! These types cover the full annotation surface (identifier, client id,
//! plain and omitempty attributes, both timestamp encodings, passthrough
//! values, to-one and to-many relationships, embedding) so integration
//! tests can exercise every encode/decode path against one small domain.

use std::any::Any;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde_json::Value;

use resdoc_core::{
    FieldKind, FieldValue, Links, Meta, Resource, ResourceCollection, Schema, ScalarKind,
};

/// A review left on a book. Carries a client identifier so tests can cover
/// create-style documents for entities the server has not identified yet.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Review {
    pub id: u64,
    pub client_id: String,
    pub rating: i8,
    pub body: String,
}

static REVIEW_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<Review>()
        .value(
            "primary,reviews",
            FieldKind::Scalar(ScalarKind::U64),
            |r| FieldValue::from(r.id),
            |r, v| r.id = v.into_u64().unwrap_or_default(),
        )
        .client_id("clientid", |r| r.client_id.clone(), |r, v| r.client_id = v)
        .value(
            "attr,rating",
            FieldKind::Scalar(ScalarKind::I8),
            |r| FieldValue::from(r.rating),
            |r, v| r.rating = v.into_i64().unwrap_or_default() as i8,
        )
        .value(
            "attr,body,omitempty",
            FieldKind::Scalar(ScalarKind::String),
            |r| FieldValue::from(r.body.as_str()),
            |r, v| r.body = v.into_string().unwrap_or_default(),
        )
        .build()
        .expect("review schema")
});

impl Resource for Review {
    fn schema(&self) -> &'static Schema {
        &REVIEW_SCHEMA
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

/// An author. Overrides the node-level links hook.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Author {
    pub id: u64,
    pub name: String,
    pub website: String,
}

static AUTHOR_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<Author>()
        .value(
            "primary,authors",
            FieldKind::Scalar(ScalarKind::U64),
            |a| FieldValue::from(a.id),
            |a, v| a.id = v.into_u64().unwrap_or_default(),
        )
        .value(
            "attr,name",
            FieldKind::Scalar(ScalarKind::String),
            |a| FieldValue::from(a.name.as_str()),
            |a, v| a.name = v.into_string().unwrap_or_default(),
        )
        .value(
            "attr,website,omitempty",
            FieldKind::Scalar(ScalarKind::String),
            |a| FieldValue::from(a.website.as_str()),
            |a, v| a.website = v.into_string().unwrap_or_default(),
        )
        .build()
        .expect("author schema")
});

impl Resource for Author {
    fn schema(&self) -> &'static Schema {
        &AUTHOR_SCHEMA
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
        links.insert_url("self", format!("https://example.com/authors/{}", self.id));
        Some(links)
    }
}

/// A book: the central fixture. `published_at` uses the unix-epoch timestamp
/// encoding; `tags` is a passthrough value.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub isbn: String,
    pub published_at: Option<DateTime<Utc>>,
    pub pages: u32,
    pub tags: Value,
    pub author: Option<Author>,
    pub reviews: Vec<Review>,
}

static BOOK_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<Book>()
        .value(
            "primary,books",
            FieldKind::Scalar(ScalarKind::U64),
            |b| FieldValue::from(b.id),
            |b, v| b.id = v.into_u64().unwrap_or_default(),
        )
        .value(
            "attr,title",
            FieldKind::Scalar(ScalarKind::String),
            |b| FieldValue::from(b.title.as_str()),
            |b, v| b.title = v.into_string().unwrap_or_default(),
        )
        .value(
            "attr,isbn,omitempty",
            FieldKind::Scalar(ScalarKind::String),
            |b| FieldValue::from(b.isbn.as_str()),
            |b, v| b.isbn = v.into_string().unwrap_or_default(),
        )
        .value(
            "attr,published_at",
            FieldKind::Timestamp,
            |b| FieldValue::Timestamp(b.published_at),
            |b, v| b.published_at = v.into_timestamp(),
        )
        .value(
            "attr,pages,omitempty",
            FieldKind::Scalar(ScalarKind::U32),
            |b| FieldValue::from(b.pages),
            |b, v| b.pages = v.into_u64().unwrap_or_default() as u32,
        )
        .value(
            "attr,tags,omitempty",
            FieldKind::Raw,
            |b| FieldValue::Raw(b.tags.clone()),
            |b, v| b.tags = v.into_raw().unwrap_or_default(),
        )
        .to_one::<Author>(
            "relation,author,omitempty",
            |b| b.author.as_ref(),
            |b, author| b.author = Some(author),
        )
        .to_many::<Review>(
            "relation,reviews",
            |b| b.reviews.iter().collect(),
            |b, reviews| b.reviews = reviews,
        )
        .build()
        .expect("book schema")
});

impl Resource for Book {
    fn schema(&self) -> &'static Schema {
        &BOOK_SCHEMA
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

/// A collection of books carrying envelope-level links and meta.
#[derive(Debug, Default, Clone)]
pub struct BookShelf(pub Vec<Book>);

impl ResourceCollection for BookShelf {
    fn members(&self) -> Vec<&dyn Resource> {
        self.0.members()
    }
    fn links(&self) -> Option<Links> {
        let mut links = Links::new();
        links.insert_url("self", "https://example.com/books?page=1");
        links.insert_url("next", "https://example.com/books?page=2");
        Some(links)
    }
    fn meta(&self) -> Option<Meta> {
        Some(Meta::from([(
            "count".to_string(),
            Value::from(self.0.len()),
        )]))
    }
}

/// A catalog entry that embeds a [`Book`], flattening the book's node into
/// its own and shadowing nothing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CatalogEntry {
    pub book: Option<Book>,
    pub featured: bool,
}

static CATALOG_ENTRY_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<CatalogEntry>()
        .extends::<Book>("extends,books", |e| e.book.as_ref())
        .value(
            "attr,featured",
            FieldKind::Scalar(ScalarKind::Bool),
            |e| FieldValue::from(e.featured),
            |e, v| e.featured = v.into_bool().unwrap_or_default(),
        )
        .build()
        .expect("catalog entry schema")
});

impl Resource for CatalogEntry {
    fn schema(&self) -> &'static Schema {
        &CATALOG_ENTRY_SCHEMA
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

/// A populated author: id 9, with a node links hook pointing at
/// `https://example.com/authors/9`.
pub fn sample_author() -> Author {
    Author {
        id: 9,
        name: "Ursula K. Le Guin".to_string(),
        website: String::new(),
    }
}

/// A fully populated book: unix-epoch publication timestamp, passthrough
/// tags, a to-one author and two reviews (one with an omitted empty body).
pub fn sample_book() -> Book {
    Book {
        id: 1,
        title: "The Dispossessed".to_string(),
        isbn: String::new(),
        published_at: DateTime::from_timestamp(1586946600, 0),
        pages: 286,
        tags: serde_json::json!(["sf", "classic"]),
        author: Some(sample_author()),
        reviews: vec![
            Review {
                id: 1,
                rating: 5,
                body: "brilliant".to_string(),
                ..Review::default()
            },
            Review {
                id: 2,
                rating: 4,
                ..Review::default()
            },
        ],
    }
}
