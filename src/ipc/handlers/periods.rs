use serde_json::json;

use crate::ipc::error::{bad_params, no_workspace, ok, store_err};
use crate::ipc::types::{AppState, Request};
use crate::model::PeriodInput;

async fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };
    if let Err(e) = store.load_periods().await {
        return store_err(&req.id, &e);
    }
    ok(&req.id, json!({ "periods": store.periods() }))
}

async fn handle_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };
    let input: PeriodInput = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match store.add_period(&input).await {
        Ok(()) => ok(&req.id, json!({ "periods": store.periods() })),
        Err(e) => store_err(&req.id, &e),
    }
}

async fn handle_edit(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let input: PeriodInput = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match store.edit_period(id, &input).await {
        Ok(()) => ok(&req.id, json!({ "periods": store.periods() })),
        Err(e) => store_err(&req.id, &e),
    }
}

async fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    match store.remove_period(id).await {
        Ok(()) => ok(&req.id, json!({ "periods": store.periods() })),
        Err(e) => store_err(&req.id, &e),
    }
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "periods.list" => Some(handle_list(state, req).await),
        "periods.add" => Some(handle_add(state, req).await),
        "periods.edit" => Some(handle_edit(state, req).await),
        "periods.delete" => Some(handle_delete(state, req).await),
        _ => None,
    }
}
