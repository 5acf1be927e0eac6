use chrono::{DateTime, Utc};
use std::fmt;

use crate::views::{Navigation, Route};

/// Opaque bearer token issued by the service at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Session context owned by the process state. Only login, logout and expiry
/// write to it; every protected view reads it through `require`.
#[derive(Debug, Default)]
pub struct Session {
    credential: Option<Credential>,
    logged_in_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    pub fn set_credential(&mut self, token: impl Into<String>) {
        self.credential = Some(Credential::new(token));
        self.logged_in_at = Some(Utc::now());
    }

    pub fn clear_credential(&mut self) {
        self.credential = None;
        self.logged_in_at = None;
    }

    pub fn logged_in_at(&self) -> Option<DateTime<Utc>> {
        self.logged_in_at
    }

    /// Guard for protected views: the credential, or a history-replacing
    /// redirect to the login entry point.
    pub fn require(&self) -> Result<&Credential, Navigation> {
        self.credential
            .as_ref()
            .ok_or_else(|| Navigation::replace(Route::Login))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_sets_and_clears_the_credential() {
        let mut session = Session::new();
        assert!(!session.is_authenticated());
        assert!(session.logged_in_at().is_none());

        session.set_credential("tok-1");
        assert!(session.is_authenticated());
        assert!(session.logged_in_at().is_some());
        assert_eq!(session.require().map(Credential::as_str), Ok("tok-1"));

        session.clear_credential();
        assert!(!session.is_authenticated());
        assert!(session.logged_in_at().is_none());
    }

    #[test]
    fn unauthenticated_guard_redirects_with_history_replace() {
        let session = Session::new();
        let nav = session.require().expect_err("must redirect");
        assert_eq!(nav.to, Route::Login);
        assert!(nav.replace);
    }

    #[test]
    fn credential_debug_is_redacted() {
        let c = Credential::new("secret-token");
        assert!(!format!("{c:?}").contains("secret"));
    }
}
