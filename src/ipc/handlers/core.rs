use serde_json::json;

use super::view_id_param;
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Request};

fn handle_health(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "apiBaseUrl": state.config.api_base_url,
        "authenticated": state.session.is_authenticated(),
        "openViews": state.views.len(),
    }))
}

/// Unmounting is always allowed, even after logout; a late result for the
/// view is then dropped.
fn handle_close(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let view_id = view_id_param(req)?;
    Ok(json!({ "closed": state.views.close(view_id) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "health" => handle_health(state),
        "views.close" => handle_close(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
