//! Composition helpers
//!
//! The calling contracts used by config composition, manifest patching and
//! JSON conflict resolution:
//! 1. Option presets for each caller
//! 2. Layer folding with per-layer provenance
//! 3. Publishing the composed value frozen

mod layers;
mod presets;

pub use layers::{merge_layers, Composed, Layer, LayerOrigin, LayerSource};
pub use presets::{patch_manifest, resolve_json_conflict};
