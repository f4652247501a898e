//! Document assertion and round-trip helpers.

use resdoc_core::{decode_one, encode_one, Document, Resource};
use serde_json::Value;

/// Assert that a document serializes to exactly the expected JSON value,
/// panicking with both renderings pretty-printed on mismatch.
pub fn assert_document_matches(document: &Document, expected: &Value) {
    let actual = serde_json::to_value(document).expect("document serializes");
    if &actual != expected {
        panic!(
            "document mismatch\nexpected:\n{}\nactual:\n{}",
            serde_json::to_string_pretty(expected).expect("expected value renders"),
            serde_json::to_string_pretty(&actual).expect("actual value renders"),
        );
    }
}

/// Encode a resource and decode it straight back.
pub fn roundtrip_one<T: Resource + Default>(resource: &T) -> T {
    let document = encode_one(resource).expect("encode");
    decode_one(&document).expect("decode")
}
