//! Error types for the value model.

/// Errors raised by value handles.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("cannot assign to key '{key}' of a frozen object")]
    Frozen { key: String },

    #[error("converting circular structure to JSON")]
    Circular,

    #[error("invalid regular expression /{pattern}/: {message}")]
    InvalidRegExp { pattern: String, message: String },
}
