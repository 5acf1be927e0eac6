//! Failures reported by the remote collection service.

use thiserror::Error;

/// Bodies longer than this are not shown to users as a raw message.
const RAW_MESSAGE_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ServiceError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// 401. For a session call the credential no longer exists; for login
    /// the supplied details were wrong.
    #[error("unauthorized")]
    Unauthorized { message: Option<String> },

    /// The service answered with a non-success status.
    #[error("request rejected with status {status}")]
    Rejected {
        status: u16,
        /// Message extracted from the failure body, if it carried one.
        message: Option<String>,
    },

    /// A success response whose payload could not be decoded.
    #[error("unexpected response payload: {0}")]
    Decode(String),
}

impl ServiceError {
    pub fn rejected(status: u16, body: &str) -> Self {
        let message = extract_message(body);
        if status == 401 {
            return Self::Unauthorized { message };
        }
        Self::Rejected { status, message }
    }

    /// Human-readable text for the UI: the service's own message when it sent
    /// one, otherwise the caller's fallback.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Rejected {
                message: Some(m), ..
            }
            | Self::Unauthorized { message: Some(m) } => m.clone(),
            _ => fallback.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Accepts a structured `{"message": ...}` body, a JSON string, or a short
/// plain-text body. Anything else (HTML pages, JSON without a message) yields
/// nothing so the UI falls back to its generic text.
fn extract_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|v| v.as_str())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        Ok(serde_json::Value::String(s)) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Ok(_) => None,
        Err(_) => {
            if trimmed.starts_with('<') || trimmed.chars().count() > RAW_MESSAGE_MAX_CHARS {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}
