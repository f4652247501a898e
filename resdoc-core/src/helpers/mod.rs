//! Internal helpers shared by the encode and decode paths.

pub mod annotation;
pub mod coerce;
pub mod identifier;
