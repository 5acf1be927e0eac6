use serde_json::json;
use tracing::{debug, warn};

use super::{check_expired, field_param, guard, str_param, view_id_param};
use crate::api::{self, CollectionService, ServiceError};
use crate::ipc::error::{respond, HandlerErr};
use crate::ipc::types::{AppState, Request};
use crate::model::{Class, StudentRecord};
use crate::session::Credential;
use crate::views::student_form::{StudentForm, SubmitBlocked, SubmitTask};
use crate::views::{MountedView, ViewError, ViewId};

fn form_mut(state: &mut AppState, view_id: ViewId) -> Result<&mut StudentForm, HandlerErr> {
    match state.views.get_mut(view_id) {
        Some(MountedView::StudentForm(form)) => Ok(form),
        Some(other) => Err(HandlerErr::kind_mismatch(
            view_id,
            "studentForm",
            other.kind(),
        )),
        None => Err(HandlerErr::view_not_found(view_id)),
    }
}

fn snapshot(view_id: ViewId, form: &StudentForm) -> serde_json::Value {
    json!({ "viewId": view_id, "view": form.snapshot() })
}

/// Fetches the record and the class list side by side.
fn load_for_edit(
    service: &dyn CollectionService,
    auth: &Credential,
    id: i64,
) -> (api::Result<StudentRecord>, api::Result<Vec<Class>>) {
    std::thread::scope(|s| {
        let student = s.spawn(|| service.get_student(auth, id));
        let classes = service.list_classes(auth);
        let student = student.join().unwrap_or_else(|_| {
            warn!(id, "student fetch thread panicked");
            Err(ServiceError::Network("student fetch aborted".to_string()))
        });
        (student, classes)
    })
}

fn handle_open(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let auth = guard(state)?;
    let student_id = match req.params.get("studentId") {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => Some(
            v.as_i64()
                .ok_or_else(|| HandlerErr::bad_params("studentId must be an integer"))?,
        ),
    };

    match student_id {
        None => {
            let view_id = state
                .views
                .mount(MountedView::StudentForm(StudentForm::new()));
            let classes = state.service.list_classes(&auth);
            check_expired(state, &classes)?;
            let form = reacquire(state, view_id)?;
            form.apply_classes(classes);
            Ok(snapshot(view_id, form))
        }
        Some(id) => {
            let view_id = state
                .views
                .mount(MountedView::StudentForm(StudentForm::editing(id)));
            let (student, classes) = load_for_edit(state.service.as_ref(), &auth, id);
            check_expired(state, &student)?;
            check_expired(state, &classes)?;
            let form = reacquire(state, view_id)?;
            form.apply_classes(classes);
            form.apply_student(student);
            Ok(snapshot(view_id, form))
        }
    }
}

fn reacquire(state: &mut AppState, view_id: ViewId) -> Result<&mut StudentForm, HandlerErr> {
    form_mut(state, view_id).inspect_err(|_| {
        debug!(%view_id, "form closed before load finished");
    })
}

fn handle_change(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    guard(state)?;
    let view_id = view_id_param(req)?;
    let field = field_param(req)?;
    let value = str_param(req, "value")?;
    let form = form_mut(state, view_id)?;
    form.change(field, value)?;
    Ok(snapshot(view_id, form))
}

fn handle_set_classes(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    guard(state)?;
    let view_id = view_id_param(req)?;
    let ids: Vec<i64> = req
        .params
        .get("classIds")
        .cloned()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| HandlerErr::bad_params(format!("classIds: {e}")))?
        .ok_or_else(|| HandlerErr::bad_params("missing classIds"))?;
    let form = form_mut(state, view_id)?;
    form.set_class_ids(ids);
    Ok(snapshot(view_id, form))
}

fn handle_submit(state: &mut AppState, req: &Request) -> Result<serde_json::Value, HandlerErr> {
    let auth = guard(state)?;
    let view_id = view_id_param(req)?;
    let form = form_mut(state, view_id)?;
    let task = match form.submit() {
        Ok(task) => task,
        Err(SubmitBlocked::Invalid(errors)) => {
            debug!(%view_id, invalid = errors.len(), "submit blocked by validation");
            return Ok(json!({
                "viewId": view_id,
                "submitted": false,
                "view": form.snapshot(),
            }));
        }
        Err(SubmitBlocked::NotReady) => return Err(ViewError::NotReady.into()),
    };

    let result = match &task {
        SubmitTask::Create(draft) => state.service.create_student(&auth, draft),
        SubmitTask::Update(id, draft) => state.service.update_student(&auth, *id, draft),
    };
    check_expired(state, &result)?;

    let form = reacquire(state, view_id)?;
    match form.complete_submit(result) {
        Some(nav) => {
            state.views.close(view_id);
            Ok(json!({ "navigate": nav }))
        }
        None => Ok(json!({
            "viewId": view_id,
            "submitted": false,
            "view": form.snapshot(),
        })),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "studentForm.open" => handle_open(state, req),
        "studentForm.change" => handle_change(state, req),
        "studentForm.setClasses" => handle_set_classes(state, req),
        "studentForm.submit" => handle_submit(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
