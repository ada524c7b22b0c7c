//! Bridge to and from `serde_json::Value`.
//!
//! Export follows `JSON.stringify`: members that cannot be represented are
//! dropped from objects and become `null` in arrays.

use chrono::SecondsFormat;
use serde_json::{Map as JsonMap, Number, Value as Json};

use crate::{ObjectRef, Value, ValueError};

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::array(items.into_iter().map(Value::from).collect()),
            Json::Object(map) => Value::Object(ObjectRef::from_entries(
                map.into_iter().map(|(k, v)| (k, Value::from(v))),
            )),
        }
    }
}

impl Value {
    /// Export to JSON. Fails with [`ValueError::Circular`] on a cycle.
    pub fn to_json(&self) -> Result<Json, ValueError> {
        let mut path = Vec::new();
        Ok(export(self, &mut path)?.unwrap_or(Json::Null))
    }
}

/// `None` means "not representable": omitted in objects, `null` in arrays.
fn export(value: &Value, path: &mut Vec<usize>) -> Result<Option<Json>, ValueError> {
    let json = match value {
        Value::Undefined | Value::Opaque(_) => return Ok(None),
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => number(*n),
        Value::String(s) => Json::String(s.clone()),
        Value::Date(d) => Json::String(d.get().to_rfc3339_opts(SecondsFormat::Millis, true)),
        Value::Map(_) | Value::Set(_) | Value::RegExp(_) | Value::ArrayBuffer(_) => {
            Json::Object(JsonMap::new())
        }
        Value::Object(o) => {
            let id = o.identity();
            if path.contains(&id) {
                return Err(ValueError::Circular);
            }
            path.push(id);
            let mut map = JsonMap::new();
            for (k, v) in o.entries() {
                if let Some(j) = export(&v, path)? {
                    map.insert(k, j);
                }
            }
            path.pop();
            Json::Object(map)
        }
        Value::Array(a) => {
            let id = a.identity();
            if path.contains(&id) {
                return Err(ValueError::Circular);
            }
            path.push(id);
            let mut items = Vec::with_capacity(a.len());
            for v in a.to_vec() {
                items.push(export(&v, path)?.unwrap_or(Json::Null));
            }
            path.pop();
            Json::Array(items)
        }
    };
    Ok(Some(json))
}

fn number(n: f64) -> Json {
    if n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map(Json::Number).unwrap_or(Json::Null)
}
