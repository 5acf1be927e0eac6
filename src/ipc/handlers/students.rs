use serde_json::json;
use tracing::debug;

use super::collection::{self, handle_open, handle_refresh, handle_search, handle_sort, view_mut};
use super::{check_expired, guard, i64_param, view_id_param};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::Student;
use crate::views::collection::CollectionView;

fn handle_request_delete(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    guard(state)?;
    let view_id = view_id_param(req)?;
    let student_id = i64_param(req, "studentId")?;
    let view = view_mut::<Student>(state, view_id)?;
    let prompt = view.request_delete(student_id)?;
    Ok(json!({
        "viewId": view_id,
        "confirm": prompt,
        "view": view.snapshot(),
    }))
}

fn handle_cancel_delete(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    guard(state)?;
    let view_id = view_id_param(req)?;
    let view = view_mut::<Student>(state, view_id)?;
    view.cancel_delete()?;
    Ok(collection::snapshot(view_id, view))
}

fn handle_confirm_delete(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let auth = guard(state)?;
    let view_id = view_id_param(req)?;
    let ticket = view_mut::<Student>(state, view_id)?.confirm_delete()?;

    let result = state.service.delete_student(&auth, ticket.id);
    check_expired(state, &result)?;

    let view: &mut CollectionView<Student> = match view_mut::<Student>(state, view_id) {
        Ok(v) => v,
        Err(e) => {
            debug!(%view_id, id = ticket.id, "view closed before delete finished");
            return Err(e);
        }
    };
    view.complete_delete(ticket, result);
    Ok(collection::snapshot(view_id, view))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "students.open" => handle_open::<Student>(state),
        "students.refresh" => handle_refresh::<Student>(state, req),
        "students.search" => handle_search::<Student>(state, req),
        "students.sort" => handle_sort::<Student>(state, req),
        "students.requestDelete" => handle_request_delete(state, req),
        "students.cancelDelete" => handle_cancel_delete(state, req),
        "students.confirmDelete" => handle_confirm_delete(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
