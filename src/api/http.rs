use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{CollectionService, Result, ServiceError};
use crate::model::{Class, Student, StudentDraft, StudentRecord};
use crate::session::Credential;

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginReply {
    token: String,
}

/// `CollectionService` over the service's JSON HTTP API.
pub struct HttpService {
    client: Client,
    base_url: String,
}

impl HttpService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder, auth: &Credential) -> RequestBuilder {
        builder.bearer_auth(auth.as_str()).header(ACCEPT, "application/json")
    }

    fn send(&self, what: &str, builder: RequestBuilder) -> Result<Response> {
        debug!(request = what, "sending");
        let response = builder.send().map_err(|e| {
            warn!(request = what, error = %e, "request failed");
            ServiceError::from(e)
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        warn!(request = what, status = status.as_u16(), "request rejected");
        Err(ServiceError::rejected(status.as_u16(), &body))
    }

    fn json<T: DeserializeOwned>(&self, what: &str, builder: RequestBuilder) -> Result<T> {
        let response = self.send(what, builder)?;
        response
            .json::<T>()
            .map_err(|e| ServiceError::Decode(e.to_string()))
    }
}

impl CollectionService for HttpService {
    fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        let builder = self
            .client
            .post(self.url("/auth/login"))
            .json(&LoginBody { username, password });
        let reply: LoginReply = self.json("auth.login", builder)?;
        Ok(reply.token)
    }

    fn list_students(&self, auth: &Credential) -> Result<Vec<Student>> {
        let builder = self.authed(self.client.get(self.url("/students")), auth);
        self.json("students.list", builder)
    }

    fn get_student(&self, auth: &Credential, id: i64) -> Result<StudentRecord> {
        let builder = self.authed(self.client.get(self.url(&format!("/students/{id}"))), auth);
        self.json("students.get", builder)
    }

    fn create_student(&self, auth: &Credential, draft: &StudentDraft) -> Result<()> {
        let builder = self.authed(self.client.post(self.url("/students")), auth).json(draft);
        self.send("students.create", builder).map(|_| ())
    }

    fn update_student(&self, auth: &Credential, id: i64, draft: &StudentDraft) -> Result<()> {
        let builder = self
            .authed(self.client.put(self.url(&format!("/students/{id}"))), auth)
            .json(draft);
        self.send("students.update", builder).map(|_| ())
    }

    fn delete_student(&self, auth: &Credential, id: i64) -> Result<()> {
        let builder = self.authed(self.client.delete(self.url(&format!("/students/{id}"))), auth);
        self.send("students.delete", builder).map(|_| ())
    }

    fn list_classes(&self, auth: &Credential) -> Result<Vec<Class>> {
        let builder = self.authed(self.client.get(self.url("/classes")), auth);
        self.json("classes.list", builder)
    }
}
