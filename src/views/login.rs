use serde::Serialize;
use tracing::{info, warn};

use super::{Navigation, Route, ViewError};
use crate::api::ServiceError;
use crate::model::LoginDraft;
use crate::session::Session;
use crate::validate::{is_valid, validate_all, ErrorSet, Field};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginSnapshot<'a> {
    pub username: &'a str,
    pub errors: &'a ErrorSet,
    pub error: Option<&'a str>,
}

pub struct LoginForm {
    draft: LoginDraft,
    errors: ErrorSet,
    error: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            draft: LoginDraft::default(),
            errors: ErrorSet::default(),
            error: None,
        }
    }

    pub fn change(&mut self, field: Field, value: &str) -> Result<(), ViewError> {
        let slot = match field {
            Field::Username => &mut self.draft.username,
            Field::Password => &mut self.draft.password,
            other => return Err(ViewError::ForeignField(other.label())),
        };
        *slot = value.to_string();
        self.errors.revalidate(field, slot.as_str());
        Ok(())
    }

    /// Returns the draft to authenticate with, or the errors that block it.
    pub fn submit(&mut self) -> Result<LoginDraft, ErrorSet> {
        self.error = None;
        self.errors = validate_all(&self.draft);
        if is_valid(&self.errors) {
            Ok(self.draft.clone())
        } else {
            Err(self.errors.clone())
        }
    }

    /// Stores the issued credential in the session on success.
    pub fn complete(
        &mut self,
        session: &mut Session,
        result: Result<String, ServiceError>,
    ) -> Option<Navigation> {
        match result {
            Ok(token) => {
                info!(username = %self.draft.username, "logged in");
                session.set_credential(token);
                self.draft.password.clear();
                Some(Navigation::push(Route::Students))
            }
            Err(err) => {
                warn!(username = %self.draft.username, error = %err, "login failed");
                self.error = Some(err.user_message("Login failed"));
                None
            }
        }
    }

    pub fn snapshot(&self) -> LoginSnapshot<'_> {
        LoginSnapshot {
            username: &self.draft.username,
            errors: &self.errors,
            error: self.error.as_deref(),
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_password_blocks_login() {
        let mut form = LoginForm::new();
        form.change(Field::Username, "admin").expect("user");
        form.change(Field::Password, "ab").expect("pw");
        let errors = form.submit().expect_err("blocked");
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 3 characters")
        );
        form.change(Field::Password, "abc").expect("pw");
        assert!(form.snapshot().errors.is_empty());
    }

    #[test]
    fn successful_login_sets_the_session_and_goes_to_students() {
        let mut session = Session::new();
        let mut form = LoginForm::new();
        form.change(Field::Username, "admin").expect("user");
        form.change(Field::Password, "secret").expect("pw");
        form.submit().expect("valid");
        let nav = form.complete(&mut session, Ok("tok".into())).expect("navigate");
        assert_eq!(nav.to, Route::Students);
        assert!(session.is_authenticated());
    }

    #[test]
    fn rejected_login_shows_message_and_leaves_session_empty() {
        let mut session = Session::new();
        let mut form = LoginForm::new();
        let nav = form.complete(&mut session, Err(ServiceError::rejected(400, "Bad credentials")));
        assert!(nav.is_none());
        assert_eq!(form.snapshot().error, Some("Bad credentials"));
        assert!(!session.is_authenticated());

        form.complete(&mut session, Err(ServiceError::Network("refused".into())));
        assert_eq!(form.snapshot().error, Some("Login failed"));
    }

    #[test]
    fn student_fields_do_not_belong_to_login() {
        let mut form = LoginForm::new();
        assert!(form.change(Field::EmailId, "x").is_err());
    }
}
