//! Table-view handlers shared by the students and classes families.

use serde_json::json;
use tracing::debug;

use super::{check_expired, guard, str_param, view_id_param};
use crate::api::{self, CollectionService};
use crate::ipc::error::HandlerErr;
use crate::ipc::types::{AppState, Request};
use crate::model::{Class, Student};
use crate::session::Credential;
use crate::views::collection::{CollectionView, Entity, FetchTicket};
use crate::views::{MountedView, ViewId};

/// Ties an entity to its slot in `MountedView` and its list endpoint.
pub(crate) trait Listed: Entity {
    const KIND: &'static str;
    const DEFAULT_KEY: Self::Key;

    fn mount(view: CollectionView<Self>) -> MountedView;

    fn unwrap_view(view: &mut MountedView) -> Option<&mut CollectionView<Self>>;

    fn list(service: &dyn CollectionService, auth: &Credential) -> api::Result<Vec<Self>>;
}

impl Listed for Student {
    const KIND: &'static str = "students";
    const DEFAULT_KEY: Self::Key = crate::sort::StudentSortKey::Name;

    fn mount(view: CollectionView<Self>) -> MountedView {
        MountedView::Students(view)
    }

    fn unwrap_view(view: &mut MountedView) -> Option<&mut CollectionView<Self>> {
        match view {
            MountedView::Students(v) => Some(v),
            _ => None,
        }
    }

    fn list(service: &dyn CollectionService, auth: &Credential) -> api::Result<Vec<Self>> {
        service.list_students(auth)
    }
}

impl Listed for Class {
    const KIND: &'static str = "classes";
    const DEFAULT_KEY: Self::Key = crate::sort::ClassSortKey::Name;

    fn mount(view: CollectionView<Self>) -> MountedView {
        MountedView::Classes(view)
    }

    fn unwrap_view(view: &mut MountedView) -> Option<&mut CollectionView<Self>> {
        match view {
            MountedView::Classes(v) => Some(v),
            _ => None,
        }
    }

    fn list(service: &dyn CollectionService, auth: &Credential) -> api::Result<Vec<Self>> {
        service.list_classes(auth)
    }
}

pub(crate) fn view_mut<E: Listed>(
    state: &mut AppState,
    view_id: ViewId,
) -> Result<&mut CollectionView<E>, HandlerErr> {
    let mounted = state
        .views
        .get_mut(view_id)
        .ok_or_else(|| HandlerErr::view_not_found(view_id))?;
    let kind = mounted.kind();
    E::unwrap_view(mounted).ok_or_else(|| HandlerErr::kind_mismatch(view_id, E::KIND, kind))
}

pub(crate) fn snapshot<E: Listed>(view_id: ViewId, view: &CollectionView<E>) -> serde_json::Value {
    json!({ "viewId": view_id, "view": view.snapshot() })
}

/// Runs the list request for `ticket` and hands the result back to the view,
/// if it is still mounted.
fn run_fetch<E: Listed>(
    state: &mut AppState,
    view_id: ViewId,
    ticket: FetchTicket,
    auth: &Credential,
) -> Result<serde_json::Value, HandlerErr> {
    let result = E::list(state.service.as_ref(), auth);
    check_expired(state, &result)?;
    let Some(mounted) = state.views.get_mut(view_id) else {
        debug!(kind = E::KIND, %view_id, "view closed before fetch finished");
        return Err(HandlerErr::view_not_found(view_id));
    };
    let Some(view) = E::unwrap_view(mounted) else {
        return Err(HandlerErr::view_not_found(view_id));
    };
    view.complete_fetch(ticket, result);
    Ok(snapshot(view_id, view))
}

pub(crate) fn handle_open<E: Listed>(state: &mut AppState) -> Result<serde_json::Value, HandlerErr> {
    let auth = guard(state)?;
    let mut view = CollectionView::<E>::new(E::DEFAULT_KEY);
    let ticket = view.begin_fetch();
    let view_id = state.views.mount(E::mount(view));
    run_fetch::<E>(state, view_id, ticket, &auth)
}

pub(crate) fn handle_refresh<E: Listed>(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    let auth = guard(state)?;
    let view_id = view_id_param(req)?;
    let ticket = view_mut::<E>(state, view_id)?.begin_fetch();
    run_fetch::<E>(state, view_id, ticket, &auth)
}

pub(crate) fn handle_search<E: Listed>(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    guard(state)?;
    let view_id = view_id_param(req)?;
    let term = req
        .params
        .get("term")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    let view = view_mut::<E>(state, view_id)?;
    view.set_search_term(term);
    Ok(snapshot(view_id, view))
}

pub(crate) fn handle_sort<E: Listed>(
    state: &mut AppState,
    req: &Request,
) -> Result<serde_json::Value, HandlerErr> {
    guard(state)?;
    let view_id = view_id_param(req)?;
    let key = str_param(req, "key")?
        .parse::<E::Key>()
        .map_err(HandlerErr::bad_params)?;
    let view = view_mut::<E>(state, view_id)?;
    view.set_sort(key);
    Ok(snapshot(view_id, view))
}
