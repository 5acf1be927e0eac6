#![allow(dead_code)]

use serde_json::json;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

type Routes = Arc<Mutex<HashMap<(String, String), (u16, String)>>>;

/// Minimal HTTP/1.1 stand-in for the collection service. Every response is
/// scripted per `METHOD path`; anything unscripted gets a 404.
pub struct StubApi {
    base_url: String,
    routes: Routes,
    log: Arc<Mutex<Vec<String>>>,
}

impl StubApi {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub api");
        let addr = listener.local_addr().expect("stub addr");
        let routes: Routes = Arc::new(Mutex::new(HashMap::new()));
        let log = Arc::new(Mutex::new(Vec::new()));

        let (routes_bg, log_bg) = (routes.clone(), log.clone());
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                serve_one(stream, &routes_bg, &log_bg);
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            routes,
            log,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn route(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        self.routes
            .lock()
            .expect("routes")
            .insert((method.to_string(), path.to_string()), (status, body));
    }

    /// `METHOD path` lines, plus `BODY <json>` after any request that had one.
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().expect("log").clone()
    }

    pub fn count(&self, method_and_path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|l| l.as_str() == method_and_path)
            .count()
    }
}

fn serve_one(stream: TcpStream, routes: &Routes, log: &Arc<Mutex<Vec<String>>>) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).is_err() || header.trim().is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0u8; content_length];
    let _ = reader.read_exact(&mut body);

    {
        let mut log = log.lock().expect("log");
        log.push(format!("{method} {path}"));
        if !body.is_empty() {
            log.push(format!("BODY {}", String::from_utf8_lossy(&body)));
        }
    }

    let (status, payload) = routes
        .lock()
        .expect("routes")
        .get(&(method, path))
        .cloned()
        .unwrap_or_else(|| (404, json!({ "message": "Not found" }).to_string()));

    let mut stream = stream;
    let _ = write!(
        stream,
        "HTTP/1.1 {status} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let _ = stream.flush();
}

pub fn spawn_sidecar(api_url: &str) -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_rosterd");
    let mut child = Command::new(exe)
        .env("ROSTERD_API_URL", api_url)
        .env("ROSTERD_TIMEOUT_SECS", "5")
        .env("NO_PROXY", "127.0.0.1")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn rosterd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

pub fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

pub fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
            .get("error")
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("unknown")
    );
    value.get("result").cloned().unwrap_or_default()
}

/// Returns the error code of a failed call.
pub fn request_err(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> String {
    let value = request(stdin, reader, id, method, params);
    assert_eq!(
        value.get("ok").and_then(|v| v.as_bool()),
        Some(false),
        "{} unexpectedly succeeded: {}",
        method,
        value
    );
    value
        .pointer("/error/code")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Logs in as `admin` against a stub that issues `token-1`.
pub fn login(
    api: &StubApi,
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
) {
    api.route("POST", "/auth/login", 200, json!({ "token": "token-1" }));
    let open = request_ok(stdin, reader, "login-open", "login.open", json!({}));
    let view_id = open["viewId"].as_str().expect("login viewId").to_string();
    request_ok(
        stdin,
        reader,
        "login-user",
        "login.change",
        json!({ "viewId": view_id, "field": "username", "value": "admin" }),
    );
    request_ok(
        stdin,
        reader,
        "login-pass",
        "login.change",
        json!({ "viewId": view_id, "field": "password", "value": "secret" }),
    );
    let submitted = request_ok(
        stdin,
        reader,
        "login-submit",
        "login.submit",
        json!({ "viewId": view_id }),
    );
    assert_eq!(submitted["navigate"]["to"], "/students");
}

pub fn student_json(id: i64, first: &str, last: &str, classes: serde_json::Value) -> serde_json::Value {
    json!({
        "id": id,
        "firstName": first,
        "lastName": last,
        "emailId": format!("{}@school.test", first.to_lowercase()),
        "phoneNumber": "5550100",
        "classes": classes,
    })
}
