pub mod classes;
pub mod collection;
pub mod core;
pub mod session;
pub mod student_form;
pub mod students;

use tracing::info;

use crate::api::ServiceError;
use crate::ipc::error::HandlerErr;
use crate::ipc::types::{AppState, Request};
use crate::session::Credential;
use crate::validate::Field;
use crate::views::{Navigation, Route, ViewId};

/// Protected methods start here: the credential, or a redirect to login.
pub(crate) fn guard(state: &AppState) -> Result<Credential, HandlerErr> {
    state
        .session
        .require()
        .cloned()
        .map_err(HandlerErr::Redirect)
}

/// Ends the session and tears down every protected view.
pub(crate) fn end_session(state: &mut AppState) -> Navigation {
    state.session.clear_credential();
    let closed = state.views.close_protected();
    info!(closed_views = closed, "session ended");
    Navigation::replace(Route::Login)
}

/// A 401 from the service means the credential is gone; handle it like a
/// logout before the result reaches any view.
pub(crate) fn check_expired<T>(
    state: &mut AppState,
    result: &Result<T, ServiceError>,
) -> Result<(), HandlerErr> {
    match result {
        Err(e) if e.is_unauthorized() => {
            info!("credential rejected by service");
            Err(HandlerErr::Redirect(end_session(state)))
        }
        _ => Ok(()),
    }
}

pub(crate) fn view_id_param(req: &Request) -> Result<ViewId, HandlerErr> {
    let raw = str_param(req, "viewId")?;
    ViewId::parse(raw).ok_or_else(|| HandlerErr::bad_params("viewId is not a valid id"))
}

pub(crate) fn str_param<'a>(req: &'a Request, name: &str) -> Result<&'a str, HandlerErr> {
    req.params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {name}")))
}

pub(crate) fn i64_param(req: &Request, name: &str) -> Result<i64, HandlerErr> {
    req.params
        .get(name)
        .and_then(|v| v.as_i64())
        .ok_or_else(|| HandlerErr::bad_params(format!("missing {name}")))
}

pub(crate) fn field_param(req: &Request) -> Result<Field, HandlerErr> {
    str_param(req, "field")?
        .parse::<Field>()
        .map_err(HandlerErr::bad_params)
}
