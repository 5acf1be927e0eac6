use serde_json::json;
use tracing::debug;

use super::{end_session, field_param, str_param, view_id_param};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::views::login::LoginForm;
use crate::views::{MountedView, ViewId, ViewRegistry};

fn login_mut(views: &mut ViewRegistry, view_id: ViewId) -> Result<&mut LoginForm, HandlerErr> {
    match views.get_mut(view_id) {
        Some(MountedView::Login(form)) => Ok(form),
        Some(other) => Err(HandlerErr::kind_mismatch(view_id, "login", other.kind())),
        None => Err(HandlerErr::view_not_found(view_id)),
    }
}

fn handle_status(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    Ok(json!({
        "authenticated": state.session.is_authenticated(),
        "loggedInAt": state.session.logged_in_at().map(|t| t.to_rfc3339()),
    }))
}

fn handle_logout(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let nav = end_session(state);
    Ok(json!({ "navigate": nav }))
}

fn handle_login_open(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let view_id = state.views.mount(MountedView::Login(LoginForm::new()));
    let form = login_mut(&mut state.views, view_id)?;
    Ok(json!({ "viewId": view_id, "view": form.snapshot() }))
}

fn handle_login_change(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let view_id = view_id_param(req)?;
    let field = field_param(req)?;
    let value = str_param(req, "value")?;
    let form = login_mut(&mut state.views, view_id)?;
    form.change(field, value)?;
    Ok(json!({ "viewId": view_id, "view": form.snapshot() }))
}

fn handle_login_submit(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let view_id = view_id_param(req)?;
    let form = login_mut(&mut state.views, view_id)?;
    let draft = match form.submit() {
        Ok(draft) => draft,
        Err(errors) => {
            debug!(invalid = errors.len(), "login blocked by validation");
            return Ok(json!({ "viewId": view_id, "view": form.snapshot() }));
        }
    };

    let result = state.service.authenticate(&draft.username, &draft.password);

    let form = login_mut(&mut state.views, view_id)?;
    match form.complete(&mut state.session, result) {
        Some(nav) => {
            state.views.close(view_id);
            Ok(json!({ "navigate": nav }))
        }
        None => Ok(json!({ "viewId": view_id, "view": form.snapshot() })),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "session.status" => handle_status(state),
        "session.logout" => handle_logout(state),
        "login.open" => handle_login_open(state),
        "login.change" => handle_login_change(state, req),
        "login.submit" => handle_login_submit(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
