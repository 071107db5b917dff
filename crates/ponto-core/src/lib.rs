//! ponto-core — Identity matching engine.
//!
//! Validates 128-dimensional face descriptors and finds the nearest
//! enrolled identity by Euclidean distance over a full linear scan.

pub mod matcher;
pub mod types;

pub use matcher::{BestMatch, Matcher, NearestMatcher};
pub use types::{Descriptor, Identity, Person, PunchRecord, DESCRIPTOR_DIM};
