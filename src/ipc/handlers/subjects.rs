use serde_json::json;

use crate::ipc::error::{bad_params, no_workspace, ok, store_err};
use crate::ipc::types::{AppState, Request};
use crate::model::SubjectInput;

async fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };
    if let Err(e) = store.load_subjects().await {
        return store_err(&req.id, &e);
    }
    ok(&req.id, json!({ "subjects": store.subjects() }))
}

async fn handle_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };
    let input: SubjectInput = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match store.add_subject(&input).await {
        Ok(()) => ok(&req.id, json!({ "subjects": store.subjects() })),
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
    let input: SubjectInput = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match store.edit_subject(id, &input).await {
        Ok(()) => ok(&req.id, json!({ "subjects": store.subjects() })),
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
    match store.remove_subject(id).await {
        Ok(()) => ok(
            &req.id,
            json!({
                "subjects": store.subjects(),
                "grades": store.visible_grades()
            }),
        ),
        Err(e) => store_err(&req.id, &e),
    }
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "subjects.list" => Some(handle_list(state, req).await),
        "subjects.add" => Some(handle_add(state, req).await),
        "subjects.edit" => Some(handle_edit(state, req).await),
        "subjects.delete" => Some(handle_delete(state, req).await),
        _ => None,
    }
}
