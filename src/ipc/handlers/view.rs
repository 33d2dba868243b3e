use serde_json::json;

use crate::ipc::error::{bad_params, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::Selection;

/// `view.select` takes `{"periodId": "..."}`, `{"mode": "edit"}` or `{}`
/// (clear). Pure local state change; only the selection channel fires.
fn handle_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };

    let selection = if let Some(period_id) = req.params.get("periodId").and_then(|v| v.as_str()) {
        Selection::Period(period_id.to_string())
    } else if let Some(mode) = req.params.get("mode").and_then(|v| v.as_str()) {
        if mode != "edit" {
            return bad_params(&req.id, format!("unknown mode: {mode}"));
        }
        Selection::EditMode
    } else {
        Selection::None
    };

    store.select(selection);
    ok(&req.id, json!({ "selection": store.selection() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "view.select" => Some(handle_select(state, req)),
        _ => None,
    }
}
