use super::collection::{handle_open, handle_refresh, handle_search, handle_sort};
use crate::ipc::error::respond;
use crate::ipc::types::{AppState, Request};
use crate::model::Class;

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    let result = match req.method.as_str() {
        "classes.open" => handle_open::<Class>(state),
        "classes.refresh" => handle_refresh::<Class>(state, req),
        "classes.search" => handle_search::<Class>(state, req),
        "classes.sort" => handle_sort::<Class>(state, req),
        _ => return None,
    };
    Some(respond(&req.id, result))
}
