//! Resdoc Test Kit - fixtures and assertion helpers.
//!
//! This crate provides a small book/author/review domain with registered
//! schemas, collection and embedding fixtures, and helpers for comparing
//! encoded envelopes against expected JSON.
//!
//! # Key Types
//!
//! - [`Book`], [`Author`], [`Review`]: the fixture catalog
//! - [`BookShelf`]: a collection fixture with envelope links and meta
//! - [`CatalogEntry`]: an embedding fixture for flattened node merges
//! - [`assert_document_matches`], [`roundtrip_one`]: assertion helpers
//!
//! # Example
//!
//! ```
//! use resdoc_testkit::{roundtrip_one, sample_book};
//!
//! let book = sample_book();
//! assert_eq!(roundtrip_one(&book), book);
//! ```

mod assert;
mod fixtures;
mod integration;

pub use assert::{assert_document_matches, roundtrip_one};
pub use fixtures::{
    sample_author, sample_book, Author, Book, BookShelf, CatalogEntry, Review,
};

/// Re-export resdoc_core for convenience in tests.
pub use resdoc_core;
