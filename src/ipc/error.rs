use serde_json::{json, Map, Value};

use crate::error::StoreError;

pub fn ok(id: &str, result: Value) -> Value {
    json!({ "id": id, "ok": true, "result": result })
}

pub fn err(id: &str, code: &str, message: impl Into<String>, details: Option<Value>) -> Value {
    let mut error = Map::new();
    error.insert("code".to_string(), Value::from(code));
    error.insert("message".to_string(), Value::from(message.into()));
    if let Some(details) = details {
        error.insert("details".to_string(), details);
    }
    json!({ "id": id, "ok": false, "error": error })
}

/// Maps a store failure to its stable wire code.
pub fn store_err(id: &str, e: &StoreError) -> serde_json::Value {
    err(id, e.code(), e.to_string(), None)
}

pub fn bad_params(id: &str, message: impl Into<String>) -> serde_json::Value {
    err(id, "bad_params", message, None)
}

pub fn no_workspace(id: &str) -> serde_json::Value {
    err(id, "no_workspace", "select a workspace first", None)
}
