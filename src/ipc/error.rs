use serde_json::json;

use crate::views::{Navigation, ViewError, ViewId};

pub fn ok(id: &str, result: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "ok": true,
        "result": result
    })
}

pub fn err(
    id: &str,
    code: &str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> serde_json::Value {
    let mut error = json!({
        "code": code,
        "message": message.into(),
    });
    if let Some(d) = details {
        error["details"] = d;
    }
    json!({
        "id": id,
        "ok": false,
        "error": error,
    })
}

pub fn navigate(id: &str, nav: Navigation) -> serde_json::Value {
    ok(id, json!({ "navigate": nav }))
}

/// Early exit from a handler.
pub enum HandlerErr {
    Fail {
        code: &'static str,
        message: String,
        details: Option<serde_json::Value>,
    },
    /// Unauthenticated access is not shown as an error; the caller gets a
    /// successful response telling it where to go instead.
    Redirect(Navigation),
}

impl HandlerErr {
    pub fn bad_params(message: impl Into<String>) -> Self {
        Self::Fail {
            code: "bad_params",
            message: message.into(),
            details: None,
        }
    }

    pub fn view_not_found(view_id: ViewId) -> Self {
        Self::Fail {
            code: "view_not_found",
            message: "view is not open".to_string(),
            details: Some(json!({ "viewId": view_id })),
        }
    }

    pub fn kind_mismatch(view_id: ViewId, expected: &str, actual: &str) -> Self {
        Self::Fail {
            code: "view_kind_mismatch",
            message: format!("view is a {actual} view, not {expected}"),
            details: Some(json!({ "viewId": view_id })),
        }
    }

    pub fn response(self, id: &str) -> serde_json::Value {
        match self {
            Self::Fail {
                code,
                message,
                details,
            } => err(id, code, message, details),
            Self::Redirect(nav) => navigate(id, nav),
        }
    }
}

impl From<ViewError> for HandlerErr {
    fn from(e: ViewError) -> Self {
        Self::Fail {
            code: e.code(),
            message: e.to_string(),
            details: None,
        }
    }
}

pub fn respond(id: &str, result: Result<serde_json::Value, HandlerErr>) -> serde_json::Value {
    match result {
        Ok(v) => ok(id, v),
        Err(e) => e.response(id),
    }
}
