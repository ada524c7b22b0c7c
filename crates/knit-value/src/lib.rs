//! Knit value model
//!
//! Defines the dynamic value graph that the knit engine clones, freezes and
//! merges. Composite values are shared handles, so a graph may alias
//! sub-trees and may contain cycles.

mod array;
mod buffer;
mod classify;
mod collections;
mod date;
mod error;
mod json;
mod key;
mod object;
mod opaque;
mod regexp;
mod value;

pub use array::ArrayRef;
pub use buffer::BufferRef;
pub use classify::{classify, is_plain_object, Kind};
pub use collections::{MapRef, SetRef};
pub use date::DateRef;
pub use error::ValueError;
pub use key::ValueKey;
pub use object::ObjectRef;
pub use opaque::{OpaqueKind, OpaqueRef};
pub use regexp::RegExpRef;
pub use value::Value;

/// Keys that must never be copied from untrusted input into a plain object.
pub const PROTOTYPE_POLLUTION_KEYS: &[&str] = &["__proto__", "constructor", "prototype"];

/// Whether `key` is one of [`PROTOTYPE_POLLUTION_KEYS`].
pub fn is_prototype_pollution_key(key: &str) -> bool {
    PROTOTYPE_POLLUTION_KEYS.contains(&key)
}
