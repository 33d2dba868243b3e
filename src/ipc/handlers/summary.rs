use serde_json::json;

use crate::ipc::error::{bad_params, no_workspace, ok, store_err};
use crate::ipc::types::{AppState, Request};

/// Per-subject weighted summary for one period. Loads the period's grades
/// first so the figures are backend-confirmed.
async fn handle_get(state: &mut AppState, req: &Request) -> serde_json::Value {
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
        json!({
            "periodId": period_id,
            "subjects": store.period_summary()
        }),
    )
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "summary.get" => Some(handle_get(state, req).await),
        _ => None,
    }
}
