//! Shared test fixtures: a blog/post/comment graph plus embedding types.

use std::any::Any;
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone, Utc};

use crate::types::{
    FieldKind, FieldValue, Resource, Schema, ScalarKind,
};

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Comment {
    pub id: u64,
    pub client_id: String,
    pub body: String,
}

static COMMENT_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<Comment>()
        .value(
            "primary,comments",
            FieldKind::Scalar(ScalarKind::U64),
            |c| FieldValue::from(c.id),
            |c, v| c.id = v.into_u64().unwrap_or_default(),
        )
        .client_id("clientid", |c| c.client_id.clone(), |c, v| c.client_id = v)
        .value(
            "attr,body",
            FieldKind::Scalar(ScalarKind::String),
            |c| FieldValue::from(c.body.as_str()),
            |c, v| c.body = v.into_string().unwrap_or_default(),
        )
        .build()
        .expect("comment schema")
});

impl Resource for Comment {
    fn schema(&self) -> &'static Schema {
        &COMMENT_SCHEMA
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

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Post {
    pub id: u64,
    pub title: String,
    pub body: String,
    pub comments: Vec<Comment>,
    pub latest_comment: Option<Box<Comment>>,
}

static POST_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<Post>()
        .value(
            "primary,posts",
            FieldKind::Scalar(ScalarKind::U64),
            |p| FieldValue::from(p.id),
            |p, v| p.id = v.into_u64().unwrap_or_default(),
        )
        .value(
            "attr,title",
            FieldKind::Scalar(ScalarKind::String),
            |p| FieldValue::from(p.title.as_str()),
            |p, v| p.title = v.into_string().unwrap_or_default(),
        )
        .value(
            "attr,body",
            FieldKind::Scalar(ScalarKind::String),
            |p| FieldValue::from(p.body.as_str()),
            |p, v| p.body = v.into_string().unwrap_or_default(),
        )
        .to_many::<Comment>(
            "relation,comments",
            |p| p.comments.iter().collect(),
            |p, children| p.comments = children,
        )
        .to_one::<Comment>(
            "relation,latest_comment,omitempty",
            |p| p.latest_comment.as_deref(),
            |p, child| p.latest_comment = Some(Box::new(child)),
        )
        .build()
        .expect("post schema")
});

impl Resource for Post {
    fn schema(&self) -> &'static Schema {
        &POST_SCHEMA
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

#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Blog {
    pub id: u64,
    pub title: String,
    pub created_at: Option<DateTime<Utc>>,
    pub view_count: i32,
    pub posts: Vec<Post>,
    pub current_post: Option<Box<Post>>,
}

static BLOG_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<Blog>()
        .value(
            "primary,blogs",
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
            "attr,created_at,iso8601",
            FieldKind::Timestamp,
            |b| FieldValue::Timestamp(b.created_at),
            |b, v| b.created_at = v.into_timestamp(),
        )
        .value(
            "attr,view_count,omitempty",
            FieldKind::Scalar(ScalarKind::I32),
            |b| FieldValue::from(b.view_count),
            |b, v| b.view_count = v.into_i64().unwrap_or_default() as i32,
        )
        .to_many::<Post>(
            "relation,posts",
            |b| b.posts.iter().collect(),
            |b, children| b.posts = children,
        )
        .to_one::<Post>(
            "relation,current_post",
            |b| b.current_post.as_deref(),
            |b, child| b.current_post = Some(Box::new(child)),
        )
        .build()
        .expect("blog schema")
});

impl Resource for Blog {
    fn schema(&self) -> &'static Schema {
        &BLOG_SCHEMA
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

/// Base type for embedding tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct Model {
    pub id: u64,
    pub fizz: String,
    pub buzz: i32,
}

static MODEL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<Model>()
        .value(
            "primary,models",
            FieldKind::Scalar(ScalarKind::U64),
            |m| FieldValue::from(m.id),
            |m, v| m.id = v.into_u64().unwrap_or_default(),
        )
        .value(
            "attr,fizz",
            FieldKind::Scalar(ScalarKind::String),
            |m| FieldValue::from(m.fizz.as_str()),
            |m, v| m.fizz = v.into_string().unwrap_or_default(),
        )
        .value(
            "attr,buzz",
            FieldKind::Scalar(ScalarKind::I32),
            |m| FieldValue::from(m.buzz),
            |m, v| m.buzz = v.into_i64().unwrap_or_default() as i32,
        )
        .build()
        .expect("model schema")
});

impl Resource for Model {
    fn schema(&self) -> &'static Schema {
        &MODEL_SCHEMA
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

/// Container that embeds a [`Model`] and shadows its `buzz` attribute.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct ExtendedModel {
    pub base: Option<Model>,
    pub buzz: i32,
}

static EXTENDED_MODEL_SCHEMA: LazyLock<Schema> = LazyLock::new(|| {
    Schema::builder::<ExtendedModel>()
        .extends::<Model>("extends,models", |e| e.base.as_ref())
        .value(
            "attr,buzz",
            FieldKind::Scalar(ScalarKind::I32),
            |e| FieldValue::from(e.buzz),
            |e, v| e.buzz = v.into_i64().unwrap_or_default() as i32,
        )
        .build()
        .expect("extended model schema")
});

impl Resource for ExtendedModel {
    fn schema(&self) -> &'static Schema {
        &EXTENDED_MODEL_SCHEMA
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

pub(crate) fn timestamp(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

/// A small blog graph whose current post shares identity with the first
/// post in the collection.
pub(crate) fn sample_blog() -> Blog {
    let first_post = Post {
        id: 1,
        title: "Foo".to_string(),
        body: "Bar".to_string(),
        comments: vec![
            Comment {
                id: 1,
                body: "foo".to_string(),
                ..Comment::default()
            },
            Comment {
                id: 2,
                body: "bar".to_string(),
                ..Comment::default()
            },
        ],
        ..Post::default()
    };

    Blog {
        id: 5,
        title: "Title 1".to_string(),
        created_at: Some(timestamp(2016, 8, 8)),
        view_count: 0,
        current_post: Some(Box::new(first_post.clone())),
        posts: vec![
            first_post,
            Post {
                id: 2,
                title: "Fuubar".to_string(),
                body: "Bas".to_string(),
                ..Post::default()
            },
        ],
    }
}
