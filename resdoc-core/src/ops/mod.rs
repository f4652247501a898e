//! Encode and decode operations over resource documents.

mod decode;
mod encode;

pub use decode::{decode_many, decode_many_str, decode_one, decode_one_str};
pub use encode::{encode_many, encode_one, encode_one_embedded};

/// Ceiling on relationship-graph depth for one encode or decode call.
pub(crate) const MAX_GRAPH_DEPTH: usize = 64;

#[cfg(test)]
pub(crate) mod fixtures;
