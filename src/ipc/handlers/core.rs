use std::path::PathBuf;

use serde_json::json;

use crate::db::SqliteGateway;
use crate::ipc::error::{bad_params, err, ok, store_err};
use crate::ipc::types::{AppState, Request};
use crate::store::EntityStore;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

async fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = match req.params.get("path").and_then(|v| v.as_str()) {
        Some(v) => PathBuf::from(v),
        None => return bad_params(&req.id, "missing params.path"),
    };

    let gateway = match SqliteGateway::open(&path) {
        Ok(g) => g,
        Err(e) => return err(&req.id, "db_open_failed", e.to_string(), None),
    };

    let mut store = EntityStore::new(gateway);
    // Initial load, same as the UI's startup fetch.
    if let Err(e) = store.load_periods().await {
        return store_err(&req.id, &e);
    }
    if let Err(e) = store.load_subjects().await {
        return store_err(&req.id, &e);
    }

    let period_count = store.periods().len();
    let subject_count = store.subjects().len();
    state.workspace = Some(path.clone());
    state.store = Some(store);

    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "periodCount": period_count,
            "subjectCount": subject_count
        }),
    )
}

pub async fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req).await),
        _ => None,
    }
}
