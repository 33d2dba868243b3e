use std::path::PathBuf;

use serde::Deserialize;

use crate::db::SqliteGateway;
use crate::store::EntityStore;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub store: Option<EntityStore<SqliteGateway>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workspace: None,
            store: None,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
