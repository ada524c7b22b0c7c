//! Engine error types.

use knit_value::{Kind, ValueError};

/// Errors raised by [`crate::clone()`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloneError {
    /// A structured clone met a value it cannot copy (functions, class instances).
    #[error("DataCloneError: {type_name} could not be cloned")]
    NotCloneable { type_name: String },
}

/// Errors raised by [`crate::merge()`] and [`crate::merge_arrays`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    #[error("unknown array merge behavior: '{0}' (expected append, prepend or overwrite)")]
    UnknownArrayBehavior(String),

    #[error(transparent)]
    Clone(#[from] CloneError),

    #[error(transparent)]
    Value(#[from] ValueError),

    /// Raised by a custom array merge behavior.
    #[error("custom array merge failed: {0}")]
    Custom(String),

    #[error("expected a plain object, got {0}")]
    NotAnObject(Kind),
}
