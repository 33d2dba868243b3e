use serde_json::json;

use crate::ipc::error::{bad_params, no_workspace, ok, store_err};
use crate::ipc::types::{AppState, Request};
use crate::model::GradeInput;

async fn handle_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(period_id) = req.params.get("periodId").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing periodId");
    };
    if let Err(e) = store.load_grades(period_id).await {
        return store_err(&req.id, &e);
    }
    ok(
        &req.id,
        json!({ "periodId": period_id, "grades": store.visible_grades() }),
    )
}

async fn handle_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(store) = state.store.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(period_id) = req.params.get("periodId").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing periodId");
    };
    let input: GradeInput = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match store.add_grade(period_id, &input).await {
        Ok(()) => ok(&req.id, json!({ "grades": store.visible_grades() })),
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
    let input: GradeInput = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match store.edit_grade(id, &input).await {
        Ok(()) => ok(&req.id, json!({ "grades": store.visible_grades() })),
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
    match store.remove_grade(id).await {
        Ok(()) => ok(&req.id, json!({ "grades": store.visible_grades() })),
        Err(e) => store_err(&req.id, &e),
    }
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_list(state, req).await),
        "grades.add" => Some(handle_add(state, req).await),
        "grades.edit" => Some(handle_edit(state, req).await),
        "grades.delete" => Some(handle_delete(state, req).await),
        _ => None,
    }
}
