//! Line-oriented JSON-RPC surface: the view-bindings entry point of the
//! daemon. One request per line in, one response per line out.

pub mod error;
mod handlers;
mod router;
mod types;

pub use router::handle_request;
pub use types::{AppState, Request};
