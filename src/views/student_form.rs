use serde::Serialize;
use tracing::{info, warn};

use super::{Navigation, Route, ViewError};
use crate::api::ServiceError;
use crate::model::{Class, StudentDraft, StudentRecord};
use crate::validate::{coerce_phone, is_valid, validate_all, ErrorSet, Field};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    New,
    Editing(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase {
    /// Editing: waiting for the student record.
    Loading,
    Ready,
    LoadFailed(String),
    Submitting,
    Submitted,
}

/// A request the caller must send to the service on the form's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitTask {
    Create(StudentDraft),
    Update(i64, StudentDraft),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitBlocked {
    /// Local validation failed; nothing was sent.
    Invalid(ErrorSet),
    NotReady,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot<'a> {
    pub mode: &'static str,
    pub student_id: Option<i64>,
    pub phase: &'static str,
    pub draft: &'a StudentDraft,
    pub errors: &'a ErrorSet,
    pub class_options: &'a [Class],
    pub load_error: Option<&'a str>,
    pub submit_error: Option<&'a str>,
    pub can_submit: bool,
}

/// Create-or-edit form for one student.
pub struct StudentForm {
    mode: FormMode,
    phase: FormPhase,
    draft: StudentDraft,
    errors: ErrorSet,
    class_options: Vec<Class>,
    submit_error: Option<String>,
}

impl StudentForm {
    pub fn new() -> Self {
        Self::with_mode(FormMode::New, FormPhase::Ready)
    }

    /// The caller fetches the record and the class list, then hands both
    /// results back through `apply_student` and `apply_classes`.
    pub fn editing(id: i64) -> Self {
        Self::with_mode(FormMode::Editing(id), FormPhase::Loading)
    }

    fn with_mode(mode: FormMode, phase: FormPhase) -> Self {
        Self {
            mode,
            phase,
            draft: StudentDraft::default(),
            errors: ErrorSet::default(),
            class_options: Vec::new(),
            submit_error: None,
        }
    }

    pub fn apply_student(&mut self, result: Result<StudentRecord, ServiceError>) {
        if self.phase != FormPhase::Loading {
            return;
        }
        match result {
            Ok(record) => {
                self.draft = record.into_draft();
                self.phase = FormPhase::Ready;
            }
            Err(err) => {
                warn!(error = %err, "student load failed");
                self.phase = FormPhase::LoadFailed(err.user_message("Failed to load student"));
            }
        }
    }

    /// A failed class load leaves the association list empty; the form stays
    /// usable.
    pub fn apply_classes(&mut self, result: Result<Vec<Class>, ServiceError>) {
        match result {
            Ok(classes) => self.class_options = classes,
            Err(err) => {
                warn!(error = %err, "class list load failed");
                self.class_options.clear();
            }
        }
    }

    /// Applies one field edit and re-validates only that field.
    pub fn change(&mut self, field: Field, value: &str) -> Result<(), ViewError> {
        let slot = match field {
            Field::FirstName => &mut self.draft.first_name,
            Field::LastName => &mut self.draft.last_name,
            Field::EmailId => &mut self.draft.email_id,
            Field::PhoneNumber => &mut self.draft.phone_number,
            Field::Username | Field::Password => {
                return Err(ViewError::ForeignField(field.label()))
            }
        };
        *slot = if field == Field::PhoneNumber {
            coerce_phone(value)
        } else {
            value.to_string()
        };
        self.errors.revalidate(field, slot.as_str());
        Ok(())
    }

    pub fn set_class_ids(&mut self, ids: Vec<i64>) {
        self.draft.class_ids = ids;
    }

    /// Exhaustive validation, then the create or update to send.
    pub fn submit(&mut self) -> Result<SubmitTask, SubmitBlocked> {
        if self.phase != FormPhase::Ready {
            return Err(SubmitBlocked::NotReady);
        }
        self.errors = validate_all(&self.draft);
        if !is_valid(&self.errors) {
            return Err(SubmitBlocked::Invalid(self.errors.clone()));
        }
        self.submit_error = None;
        self.phase = FormPhase::Submitting;
        let outgoing = trimmed(&self.draft);
        Ok(match self.mode {
            FormMode::New => SubmitTask::Create(outgoing),
            FormMode::Editing(id) => SubmitTask::Update(id, outgoing),
        })
    }

    /// Success discards the draft and returns to the list. Failure keeps the
    /// draft as typed so it can be corrected.
    pub fn complete_submit(&mut self, result: Result<(), ServiceError>) -> Option<Navigation> {
        if self.phase != FormPhase::Submitting {
            return None;
        }
        match result {
            Ok(()) => {
                info!(mode = ?self.mode, "student saved");
                self.draft = StudentDraft::default();
                self.phase = FormPhase::Submitted;
                Some(Navigation::push(Route::Students))
            }
            Err(err) => {
                warn!(mode = ?self.mode, error = %err, "student save failed");
                self.submit_error = Some(err.user_message("Failed to save student"));
                self.phase = FormPhase::Ready;
                None
            }
        }
    }

    pub fn snapshot(&self) -> FormSnapshot<'_> {
        let (mode, student_id) = match self.mode {
            FormMode::New => ("new", None),
            FormMode::Editing(id) => ("editing", Some(id)),
        };
        let (phase, load_error) = match &self.phase {
            FormPhase::Loading => ("loading", None),
            FormPhase::Ready => ("ready", None),
            FormPhase::LoadFailed(msg) => ("loadFailed", Some(msg.as_str())),
            FormPhase::Submitting => ("submitting", None),
            FormPhase::Submitted => ("submitted", None),
        };
        FormSnapshot {
            mode,
            student_id,
            phase,
            draft: &self.draft,
            errors: &self.errors,
            class_options: &self.class_options,
            load_error,
            submit_error: self.submit_error.as_deref(),
            can_submit: self.phase == FormPhase::Ready,
        }
    }
}

/// Validation looks at trimmed text, so the service gets the same.
fn trimmed(draft: &StudentDraft) -> StudentDraft {
    StudentDraft {
        first_name: draft.first_name.trim().to_string(),
        last_name: draft.last_name.trim().to_string(),
        email_id: draft.email_id.trim().to_string(),
        phone_number: draft.phone_number.clone(),
        class_ids: draft.class_ids.clone(),
    }
}

impl Default for StudentForm {
    fn default() -> Self {
        Self::new()
    }
}
