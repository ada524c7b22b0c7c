//! Layered composition with provenance
//!
//! Folds an ordered list of layers (first is the base, last has the highest
//! precedence) with [`merge`], recording where each layer came from and a
//! digest of what it contributed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use knit_value::{is_plain_object, Value};

use crate::error::{CloneError, MergeError};
use crate::freeze::{freeze, FreezeClone, FreezeOptions};
use crate::merge::{merge, MergeOptions};

/// Where a layer came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    Defaults,
    Extends,
    User,
    Cli,
    Patch,
}

/// One input to [`merge_layers`].
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub origin: LayerOrigin,
    pub value: Value,
}

impl Layer {
    pub fn new(name: impl Into<String>, origin: LayerOrigin, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            origin,
            value: value.into(),
        }
    }
}

/// Provenance record for a layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerSource {
    pub name: String,

    pub origin: LayerOrigin,

    /// SHA-256 of the layer's canonical JSON (RFC 8785). None when the layer
    /// cannot be exported, e.g. because it is cyclic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// False when the layer was not a plain object and was skipped.
    pub applied: bool,
}

/// Result of [`merge_layers`].
#[derive(Debug, Clone)]
pub struct Composed {
    /// The merged value; always a plain object.
    pub value: Value,

    /// Contributing layers in precedence order.
    pub sources: Vec<LayerSource>,
}

/// Fold `layers` in order into a new plain object.
pub fn merge_layers(layers: Vec<Layer>, opts: &MergeOptions) -> Result<Composed, MergeError> {
    let mut value = Value::object();
    let mut sources = Vec::with_capacity(layers.len());

    for layer in layers {
        let applied = is_plain_object(&layer.value);
        if applied {
            value = merge(&value, &layer.value, opts)?;
        } else {
            tracing::debug!(layer = %layer.name, "skipping layer that is not a plain object");
        }
        sources.push(LayerSource {
            digest: layer_digest(&layer.value),
            name: layer.name,
            origin: layer.origin,
            applied,
        });
    }

    tracing::debug!(layers = sources.len(), "composed layers");
    Ok(Composed { value, sources })
}

fn layer_digest(value: &Value) -> Option<String> {
    let json = value.to_json().ok()?;
    let jcs_bytes = serde_json_canonicalizer::to_vec(&json).ok()?;
    let mut hasher = Sha256::new();
    hasher.update(&jcs_bytes);
    Some(hex::encode(hasher.finalize()))
}

impl Composed {
    /// Get a value by dot-separated path.
    pub fn get(&self, path: &str) -> Option<Value> {
        let mut current = self.value.clone();
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_f64(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(|v| v.as_f64())
    }

    pub fn get_str(&self, path: &str) -> Option<String> {
        self.get(path).and_then(|v| v.as_str().map(str::to_string))
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }

    /// Frozen deep copy of the composed value, safe to share read-only.
    /// `self.value` stays mutable.
    pub fn publish(&self, max_depth: Option<usize>) -> Result<Value, CloneError> {
        let opts = FreezeOptions::default()
            .with_clone(FreezeClone::Deep)
            .with_max_depth(max_depth);
        freeze(&self.value, &opts)
    }
}
