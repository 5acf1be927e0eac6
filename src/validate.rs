use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{LoginDraft, StudentDraft};

pub const PHONE_MAX_DIGITS: usize = 10;
pub const PASSWORD_MIN_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    EmailId,
    PhoneNumber,
    Username,
    Password,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::LastName => "Last Name",
            Field::EmailId => "Email",
            Field::PhoneNumber => "Phone Number",
            Field::Username => "Username",
            Field::Password => "Password",
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firstName" => Ok(Field::FirstName),
            "lastName" => Ok(Field::LastName),
            "emailId" => Ok(Field::EmailId),
            "phoneNumber" => Ok(Field::PhoneNumber),
            "username" => Ok(Field::Username),
            "password" => Ok(Field::Password),
            other => Err(format!("unknown field: {other}")),
        }
    }
}

/// Field -> message. A field without an entry is currently valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ErrorSet(BTreeMap<Field, String>);

impl ErrorSet {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Incremental pass: re-checks one field and leaves the others alone.
    pub fn revalidate(&mut self, field: Field, value: &str) {
        match validate_field(field, value) {
            Some(message) => {
                self.0.insert(field, message);
            }
            None => {
                self.0.remove(&field);
            }
        }
    }
}

/// Drafts expose their validated fields so one aggregator serves every form.
pub trait Validate {
    fn fields(&self) -> Vec<(Field, &str)>;
}

impl Validate for StudentDraft {
    fn fields(&self) -> Vec<(Field, &str)> {
        vec![
            (Field::FirstName, self.first_name.as_str()),
            (Field::LastName, self.last_name.as_str()),
            (Field::EmailId, self.email_id.as_str()),
            (Field::PhoneNumber, self.phone_number.as_str()),
        ]
    }
}

impl Validate for LoginDraft {
    fn fields(&self) -> Vec<(Field, &str)> {
        vec![
            (Field::Username, self.username.as_str()),
            (Field::Password, self.password.as_str()),
        ]
    }
}

pub fn validate_field(field: Field, value: &str) -> Option<String> {
    match field {
        Field::FirstName | Field::LastName | Field::Username => required(field, value),
        Field::EmailId => required(field, value).or_else(|| {
            if looks_like_email(value.trim()) {
                None
            } else {
                Some("Enter a valid email address".to_string())
            }
        }),
        Field::PhoneNumber => required(field, value).or_else(|| {
            let trimmed = value.trim();
            if !trimmed.chars().all(|c| c.is_ascii_digit()) {
                Some(format!("{} must contain only digits", field.label()))
            } else if trimmed.len() > PHONE_MAX_DIGITS {
                Some(format!(
                    "{} must be at most {PHONE_MAX_DIGITS} digits",
                    field.label()
                ))
            } else {
                None
            }
        }),
        Field::Password => {
            if value.is_empty() {
                Some(format!("{} is required", field.label()))
            } else if value.chars().count() < PASSWORD_MIN_CHARS {
                Some(format!(
                    "{} must be at least {PASSWORD_MIN_CHARS} characters",
                    field.label()
                ))
            } else {
                None
            }
        }
    }
}

/// Exhaustive pass over every field of the draft.
pub fn validate_all<D: Validate>(draft: &D) -> ErrorSet {
    let mut errors = ErrorSet::default();
    for (field, value) in draft.fields() {
        errors.revalidate(field, value);
    }
    errors
}

pub fn is_valid(errors: &ErrorSet) -> bool {
    errors.is_empty()
}

/// Applied at entry: non-digits are dropped and anything past the tenth digit
/// is not accepted.
pub fn coerce_phone(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(PHONE_MAX_DIGITS)
        .collect()
}

fn required(field: Field, value: &str) -> Option<String> {
    if value.trim().is_empty() {
        Some(format!("{} is required", field.label()))
    } else {
        None
    }
}

/// local@domain.tld: no whitespace, exactly one '@', and a domain that does
/// not start or end with a dot.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.][^\s@]*\.[^\s@.]+$").expect("Invalid email regex")
});

fn looks_like_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}
