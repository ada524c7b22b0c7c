//! Knit - recursive clone, freeze and merge engine
//!
//! This crate implements the value engine behind configuration composition,
//! package-manifest patching and file-conflict resolution: independent
//! copies of possibly cyclic value graphs, bounded-depth immutability, and
//! deterministic merging with per-kind conflict strategies.

pub mod clone;
pub mod compose;
pub mod error;
pub mod freeze;
pub mod merge;

pub use clone::{
    bounded_clone, clone, deep_clone, sanitized_clone, shallow_clone, CloneOptions, CloneStrategy,
};
pub use compose::{merge_layers, Composed, Layer, LayerOrigin, LayerSource};
pub use error::{CloneError, MergeError};
pub use freeze::{freeze, FreezeClone, FreezeOptions};
pub use merge::{
    merge, merge_arrays, strip_nullish, ArrayBehavior, ArrayMergeOptions, Compact, MergeOptions,
};

pub use knit_value::{classify, is_plain_object, Kind, ObjectRef, Value};
