//! Test fixtures
//!
//! This module provides:
//! - The merge corpus (current/next/options/expected cases)
//! - Builders for cyclic and diamond-shaped graphs

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use knit::{MergeOptions, ObjectRef, Value};

/// Path to the merge corpus fixture
pub fn merge_corpus_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/merge_corpus/corpus.json")
}

/// Merge test case from corpus.json
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MergeTestCase {
    pub id: String,
    pub description: String,
    pub current: serde_json::Value,
    pub next: serde_json::Value,
    #[serde(default)]
    pub options: Option<serde_json::Value>,
    pub expected: serde_json::Value,
}

impl MergeTestCase {
    pub fn options(&self) -> MergeOptions {
        match &self.options {
            Some(raw) => serde_json::from_value(raw.clone())
                .unwrap_or_else(|e| panic!("case {}: bad options: {}", self.id, e)),
            None => MergeOptions::default(),
        }
    }
}

/// Full merge corpus
#[derive(Debug, Clone, serde::Deserialize)]
pub struct MergeCorpus {
    pub version: u32,
    pub cases: Vec<MergeTestCase>,
}

/// Load the merge corpus
pub fn load_merge_corpus() -> MergeCorpus {
    let path = merge_corpus_path();
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read corpus at {:?}: {}", path, e));
    serde_json::from_str(&content).expect("Failed to parse merge corpus")
}

/// `{ name, self: <itself> }`
pub fn self_referential(name: &str) -> Value {
    let obj = ObjectRef::from_entries([("name", Value::from(name))]);
    obj.insert("self", Value::Object(obj.clone())).unwrap();
    Value::Object(obj)
}

/// `{ left: shared, right: shared }` where `shared` is one object.
pub fn diamond() -> (Value, Value) {
    let shared = Value::from(serde_json::json!({"leaf": 1}));
    let root = ObjectRef::from_entries([("left", shared.clone()), ("right", shared.clone())]);
    (Value::Object(root), shared)
}
