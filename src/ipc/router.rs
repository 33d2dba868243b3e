use super::handlers;
use super::types::{AppState, Request};
use crate::ipc::error::err;

pub async fn handle_request(state: &mut AppState, req: Request) -> serde_json::Value {
    if let Some(resp) = handlers::core::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::periods::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::subjects::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::grades::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::view::try_handle(state, &req) {
        return resp;
    }
    if let Some(resp) = handlers::summary::try_handle(state, &req).await {
        return resp;
    }
    if let Some(resp) = handlers::backup::try_handle(state, &req) {
        return resp;
    }

    err(
        &req.id,
        "not_implemented",
        format!("unknown method: {}", req.method),
        None,
    )
}
