mod error;
mod http;

#[cfg(test)]
pub mod fake;

pub use error::ServiceError;
pub use http::HttpService;

use crate::model::{Class, Student, StudentDraft, StudentRecord};
use crate::session::Credential;

pub type Result<T> = std::result::Result<T, ServiceError>;

/// The remote collection service. Every call except `authenticate` carries the
/// session credential.
pub trait CollectionService: Send + Sync {
    /// Exchanges login details for a credential token.
    fn authenticate(&self, username: &str, password: &str) -> Result<String>;

    fn list_students(&self, auth: &Credential) -> Result<Vec<Student>>;

    fn get_student(&self, auth: &Credential, id: i64) -> Result<StudentRecord>;

    fn create_student(&self, auth: &Credential, draft: &StudentDraft) -> Result<()>;

    fn update_student(&self, auth: &Credential, id: i64, draft: &StudentDraft) -> Result<()>;

    fn delete_student(&self, auth: &Credential, id: i64) -> Result<()>;

    fn list_classes(&self, auth: &Credential) -> Result<Vec<Class>>;
}
