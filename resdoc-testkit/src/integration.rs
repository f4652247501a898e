//! Integration tests for full encode/decode workflows.
//!
//! These exercise the complete pipeline over the fixture catalog: envelope
//! shapes as literal JSON, sideload deduplication, collection hooks,
//! embedding, and whole-graph round trips.
