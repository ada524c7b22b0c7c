//! End-to-end composition scenarios
//!
//! Extends-chain folding, manifest patching and publishing frozen defaults.

use knit::compose::{patch_manifest, resolve_json_conflict};
use knit::{
    freeze, merge, merge_layers, FreezeOptions, Layer, LayerOrigin, MergeOptions, Value,
};
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_extends_chain_overwrite() {
    let chain = vec![
        Layer::new(
            "builtin",
            LayerOrigin::Defaults,
            json!({"semi": true, "ignore": ["dist"], "rules": {"quotes": "double"}}),
        ),
        Layer::new(
            "@org/preset",
            LayerOrigin::Extends,
            json!({"ignore": ["build"], "rules": {"indent": 2}}),
        ),
        Layer::new("project", LayerOrigin::User, json!({"rules": {"quotes": "single"}})),
    ];
    let composed = merge_layers(chain, &MergeOptions::config_overwrite()).unwrap();
    assert_eq!(
        composed.value.to_json().unwrap(),
        json!({"semi": true, "ignore": ["build"], "rules": {"quotes": "single", "indent": 2}})
    );
    let origins: Vec<LayerOrigin> = composed.sources.iter().map(|s| s.origin).collect();
    assert_eq!(origins, vec![LayerOrigin::Defaults, LayerOrigin::Extends, LayerOrigin::User]);
}

#[test]
fn test_partial_user_config_is_tolerated() {
    let chain = vec![
        Layer::new("builtin", LayerOrigin::Defaults, json!({"semi": true})),
        Layer::new("empty-file", LayerOrigin::User, Value::Undefined),
        Layer::new("null-file", LayerOrigin::User, json!(null)),
    ];
    let composed = merge_layers(chain, &MergeOptions::config_append()).unwrap();
    assert_eq!(composed.value.to_json().unwrap(), json!({"semi": true}));
    assert_eq!(
        composed.sources.iter().map(|s| s.applied).collect::<Vec<_>>(),
        vec![true, false, false]
    );
}

#[test]
fn test_published_defaults_are_read_only() {
    let defaults = merge(
        &Value::from(json!({"retries": 3, "backoff": {"base_ms": 100}})),
        &Value::from(json!({"backoff": {"max_ms": 5000}})),
        &MergeOptions::default(),
    )
    .unwrap();
    let shared = freeze(&defaults, &FreezeOptions::unbounded()).unwrap();

    let backoff = shared.get("backoff").unwrap();
    assert!(backoff.as_object().unwrap().insert("base_ms", Value::from(1)).is_err());

    // a caller derives its own copy by merging over the frozen defaults
    let local = merge(&shared, &Value::from(json!({"retries": 5})), &MergeOptions::default()).unwrap();
    assert!(!local.is_frozen());
    assert_eq!(local.to_json().unwrap(), json!({"retries": 5, "backoff": {"base_ms": 100, "max_ms": 5000}}));
}

#[test]
fn test_manifest_patch_scenario() {
    let manifest = json!({
        "name": "web",
        "version": "1.0.0",
        "scripts": {"dev": "vite"},
        "dependencies": {"react": "^18.2.0"},
        "jest": {"preset": "ts-jest"}
    });
    let add_tests = json!({"scripts": {"test": "vitest run"}, "jest": {}});
    let patched = patch_manifest(&manifest, &add_tests).unwrap();
    assert_eq!(
        patched,
        json!({
            "name": "web",
            "version": "1.0.0",
            "scripts": {"dev": "vite", "test": "vitest run"},
            "dependencies": {"react": "^18.2.0"},
            "jest": {}
        })
    );
}

#[test]
fn test_conflict_resolution_scenario() {
    let ours = Value::from(json!({"recommendations": ["a"], "settings": {"tab": 2}}));
    let theirs = Value::from(json!({"recommendations": ["b"], "settings": {"wrap": true}}));
    let out = resolve_json_conflict(&ours, &theirs).unwrap();
    assert_eq!(
        out.to_json().unwrap(),
        json!({"recommendations": ["b"], "settings": {"tab": 2, "wrap": true}})
    );
}

#[test]
fn test_patch_manifest_never_writes_prototype_keys() {
    let manifest = json!({"name": "x"});
    let patch = json!({
        "scripts": {"__proto__": {"p": 1}, "build": "tsc"},
        "files": [{"constructor": {"prototype": {}}, "path": "dist"}]
    });
    let patched = patch_manifest(&manifest, &patch).unwrap();
    assert_eq!(
        patched,
        json!({"name": "x", "scripts": {"build": "tsc"}, "files": [{"path": "dist"}]})
    );
}
