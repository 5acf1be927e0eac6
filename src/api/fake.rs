//! Scripted in-memory service for controller and handler tests.

use std::sync::{Arc, Mutex};

use super::{CollectionService, Result, ServiceError};
use crate::model::{Class, Student, StudentDraft, StudentRecord};
use crate::session::Credential;

pub struct FakeService {
    pub token: Mutex<Result<String>>,
    pub students: Mutex<Result<Vec<Student>>>,
    pub student: Mutex<Result<StudentRecord>>,
    pub classes: Mutex<Result<Vec<Class>>>,
    pub mutation: Mutex<Result<()>>,
    /// Shared so a test can keep reading it after the service is boxed.
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl Default for FakeService {
    fn default() -> Self {
        Self {
            token: Mutex::new(Ok("fake-token".to_string())),
            students: Mutex::new(Ok(Vec::new())),
            student: Mutex::new(Err(ServiceError::rejected(404, "Student not found"))),
            classes: Mutex::new(Ok(Vec::new())),
            mutation: Mutex::new(Ok(())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeService {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CollectionService for FakeService {
    fn authenticate(&self, username: &str, _password: &str) -> Result<String> {
        self.record(format!("authenticate {username}"));
        self.token.lock().unwrap().clone()
    }

    fn list_students(&self, _auth: &Credential) -> Result<Vec<Student>> {
        self.record("list_students".into());
        self.students.lock().unwrap().clone()
    }

    fn get_student(&self, _auth: &Credential, id: i64) -> Result<StudentRecord> {
        self.record(format!("get_student {id}"));
        self.student.lock().unwrap().clone()
    }

    fn create_student(&self, _auth: &Credential, _draft: &StudentDraft) -> Result<()> {
        self.record("create_student".into());
        self.mutation.lock().unwrap().clone()
    }

    fn update_student(&self, _auth: &Credential, id: i64, _draft: &StudentDraft) -> Result<()> {
        self.record(format!("update_student {id}"));
        self.mutation.lock().unwrap().clone()
    }

    fn delete_student(&self, _auth: &Credential, id: i64) -> Result<()> {
        self.record(format!("delete_student {id}"));
        self.mutation.lock().unwrap().clone()
    }

    fn list_classes(&self, _auth: &Credential) -> Result<Vec<Class>> {
        self.record("list_classes".into());
        self.classes.lock().unwrap().clone()
    }
}
