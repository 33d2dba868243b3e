use std::path::PathBuf;

use serde_json::json;

use crate::backup;
use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};

fn handle_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(workspace) = state.workspace.clone() else {
        return no_workspace(&req.id);
    };

    let out_path = match req.params.get("outPath").and_then(|v| v.as_str()) {
        Some(v) => PathBuf::from(v),
        None => workspace.join(backup::default_bundle_name()),
    };

    match backup::export_workspace_bundle(&workspace, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "outPath": out_path.to_string_lossy(),
                "bundleFormat": summary.bundle_format,
                "entryCount": summary.entry_count
            }),
        ),
        Err(e) => err(&req.id, "backup_failed", e.to_string(), None),
    }
}

fn handle_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(workspace) = state.workspace.clone() else {
        return no_workspace(&req.id);
    };
    let Some(in_path) = req.params.get("inPath").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing inPath");
    };

    // The open connection would see the database file swapped underneath
    // it; drop the store and make the caller re-select the workspace.
    state.store = None;
    state.workspace = None;

    match backup::import_workspace_bundle(&PathBuf::from(in_path), &workspace) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormatDetected": summary.bundle_format_detected,
                "workspacePath": workspace.to_string_lossy(),
                "periodCount": summary.counts.periods,
                "subjectCount": summary.counts.subjects,
                "gradeCount": summary.counts.grades
            }),
        ),
        Err(e) => err(&req.id, "backup_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.export" => Some(handle_export(state, req)),
        "backup.import" => Some(handle_import(state, req)),
        _ => None,
    }
}
