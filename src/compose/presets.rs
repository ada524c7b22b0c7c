//! Merge option presets for the engine's callers.

use knit_value::Value;

use crate::error::MergeError;
use crate::merge::{merge, ArrayBehavior, MergeOptions};

impl MergeOptions {
    /// Extends-chain folding where a later config replaces arrays.
    pub fn config_overwrite() -> Self {
        Self::default().with_array_behavior(ArrayBehavior::Overwrite)
    }

    /// Extends-chain folding where a later config adds to arrays.
    pub fn config_append() -> Self {
        Self::default().with_array_behavior(ArrayBehavior::Append)
    }

    /// Package manifest patches: an empty object in the patch clears the key.
    pub fn manifest_patch() -> Self {
        Self::default().with_retain_empty_object_props()
    }

    /// Default deep merge for JSON-shaped files during conflict resolution.
    pub fn conflict_resolution() -> Self {
        Self::default()
    }
}

/// Apply `patch` to a parsed manifest and export the result as JSON.
pub fn patch_manifest(
    manifest: &serde_json::Value,
    patch: &serde_json::Value,
) -> Result<serde_json::Value, MergeError> {
    let merged = merge(
        &Value::from(manifest.clone()),
        &Value::from(patch.clone()),
        &MergeOptions::manifest_patch(),
    )?;
    Ok(merged.to_json()?)
}

/// Merge the "theirs" side of a JSON-shaped file into "ours".
pub fn resolve_json_conflict(ours: &Value, theirs: &Value) -> Result<Value, MergeError> {
    merge(ours, theirs, &MergeOptions::conflict_resolution())
}
