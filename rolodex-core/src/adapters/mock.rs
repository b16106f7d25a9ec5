//! Mock user-record service implementations for testing
//!
//! Two levels of fake are provided:
//!
//! - [`MockUserService`] implements the `UserService` port in process, with a
//!   recorded call log and scriptable failures, for exercising the flow
//!   services without any IO.
//! - [`MockUserServer`] is a small threaded HTTP server speaking the real
//!   wire protocol, for exercising `HttpUserService` end to end:
//!   - POST /users returns the persisted record with a minted id
//!   - GET /users/{id} returns the record or 404
//!   - PUT /users/{id} replaces the record's fields or 404

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{User, UserDraft};
use crate::ports::UserService;

// =============================================================================
// In-process mock
// =============================================================================

/// A call observed by the mock service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Create(UserDraft),
    GetById(String),
    Update(String, UserDraft),
}

/// In-memory `UserService` with a call log and scriptable failures
#[derive(Default)]
pub struct MockUserService {
    records: Mutex<HashMap<String, User>>,
    calls: Mutex<Vec<RecordedCall>>,
    fail_create: bool,
    fail_get: bool,
    fail_update: bool,
}

impl MockUserService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every create call fail with a simulated network error
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Make every get_by_id call fail with a simulated network error
    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    /// Make every update call fail with a simulated network error
    pub fn failing_update(mut self) -> Self {
        self.fail_update = true;
        self
    }

    /// Preload a record into the store
    pub fn seed(&self, user: User) {
        self.records.lock().unwrap().insert(user.id.clone(), user);
    }

    /// All calls observed so far, in order
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn network_error() -> Error {
        Error::transport("Unable to connect to the user-record service")
    }
}

#[async_trait]
impl UserService for MockUserService {
    async fn create(&self, draft: &UserDraft) -> Result<User> {
        self.record(RecordedCall::Create(draft.clone()));
        if self.fail_create {
            return Err(Self::network_error());
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            role: draft.role.clone(),
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.records
            .lock()
            .unwrap()
            .insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: &str) -> Result<User> {
        self.record(RecordedCall::GetById(id.to_string()));
        if self.fail_get {
            return Err(Self::network_error());
        }
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("No user record with id {}", id)))
    }

    async fn update(&self, id: &str, draft: &UserDraft) -> Result<User> {
        self.record(RecordedCall::Update(id.to_string(), draft.clone()));
        if self.fail_update {
            return Err(Self::network_error());
        }
        let mut records = self.records.lock().unwrap();
        let existing = records
            .get(id)
            .ok_or_else(|| Error::not_found(format!("No user record with id {}", id)))?;
        let user = User {
            id: existing.id.clone(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            role: draft.role.clone(),
            created_at: existing.created_at,
            updated_at: Some(Utc::now()),
        };
        records.insert(id.to_string(), user.clone());
        Ok(user)
    }
}

// =============================================================================
// HTTP mock server
// =============================================================================

/// Configuration for mock server behavior
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Respond 401 to every request
    pub fail_auth: bool,
    /// Respond 404 to every request, even for stored records
    pub not_found: bool,
    /// Respond 500 to every request
    pub server_error: bool,
    /// Require an x-api-key header on every request
    pub require_api_key: bool,
    /// Delay in milliseconds before responding
    pub delay_ms: u64,
}

/// Mock user-record HTTP server for testing
pub struct MockUserServer {
    port: u16,
    running: Arc<AtomicBool>,
    records: Arc<Mutex<HashMap<String, User>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockUserServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let records: Arc<Mutex<HashMap<String, User>>> = Arc::new(Mutex::new(HashMap::new()));
        let records_clone = records.clone();

        // Non-blocking listener so the accept loop can observe shutdown
        listener.set_nonblocking(true)?;

        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let store = records_clone.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg, &store);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            records,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Preload a record into the server's store
    pub fn seed(&self, user: User) {
        self.records.lock().unwrap().insert(user.id.clone(), user);
    }

    /// Number of records currently stored
    pub fn record_count(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockUserServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(
    mut stream: TcpStream,
    config: &MockConfig,
    records: &Arc<Mutex<HashMap<String, User>>>,
) {
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    if config.delay_ms > 0 {
        thread::sleep(std::time::Duration::from_millis(config.delay_ms));
    }

    let first_line = request.lines().next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 2 {
        send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid request"}"#);
        return;
    }
    let method = parts[0];
    let path = parts[1].split('?').next().unwrap_or(parts[1]);

    if config.fail_auth {
        send_response(&mut stream, 401, "Unauthorized", r#"{"error": "Invalid API key"}"#);
        return;
    }
    if config.require_api_key && !request.to_lowercase().contains("x-api-key:") {
        send_response(&mut stream, 401, "Unauthorized", r#"{"error": "Missing API key"}"#);
        return;
    }
    if config.not_found {
        send_response(&mut stream, 404, "Not Found", r#"{"error": "No such user"}"#);
        return;
    }
    if config.server_error {
        send_response(
            &mut stream,
            500,
            "Internal Server Error",
            r#"{"error": "Internal error"}"#,
        );
        return;
    }

    let body = request.split("\r\n\r\n").nth(1).unwrap_or("");

    match (method, path) {
        ("POST", "/users") => {
            let draft: UserDraft = match serde_json::from_str(body) {
                Ok(d) => d,
                Err(_) => {
                    send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid body"}"#);
                    return;
                }
            };
            let now = Utc::now();
            let user = User {
                id: Uuid::new_v4().to_string(),
                name: draft.name,
                email: draft.email,
                role: draft.role,
                created_at: Some(now),
                updated_at: Some(now),
            };
            records.lock().unwrap().insert(user.id.clone(), user.clone());
            let json = serde_json::to_string(&user).unwrap();
            send_response(&mut stream, 201, "Created", &json);
        }
        ("GET", p) if p.starts_with("/users/") => {
            let id = &p["/users/".len()..];
            match records.lock().unwrap().get(id) {
                Some(user) => {
                    let json = serde_json::to_string(user).unwrap();
                    send_response(&mut stream, 200, "OK", &json);
                }
                None => {
                    send_response(&mut stream, 404, "Not Found", r#"{"error": "No such user"}"#);
                }
            }
        }
        ("PUT", p) if p.starts_with("/users/") => {
            let id = &p["/users/".len()..];
            let draft: UserDraft = match serde_json::from_str(body) {
                Ok(d) => d,
                Err(_) => {
                    send_response(&mut stream, 400, "Bad Request", r#"{"error": "Invalid body"}"#);
                    return;
                }
            };
            let mut store = records.lock().unwrap();
            match store.get(id).cloned() {
                Some(existing) => {
                    let user = User {
                        id: existing.id,
                        name: draft.name,
                        email: draft.email,
                        role: draft.role,
                        created_at: existing.created_at,
                        updated_at: Some(Utc::now()),
                    };
                    store.insert(id.to_string(), user.clone());
                    let json = serde_json::to_string(&user).unwrap();
                    send_response(&mut stream, 200, "OK", &json);
                }
                None => {
                    send_response(&mut stream, 404, "Not Found", r#"{"error": "No such user"}"#);
                }
            }
        }
        _ => {
            send_response(&mut stream, 404, "Not Found", r#"{"error": "Endpoint not found"}"#);
        }
    }
}

/// Read a full HTTP request, honoring Content-Length for bodies
fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut data = Vec::new();
    let mut buffer = [0; 4096];

    loop {
        let n = stream.read(&mut buffer).ok()?;
        if n == 0 {
            break;
        }
        data.extend_from_slice(&buffer[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if data.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    if data.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(&data).into_owned())
    }
}

fn send_response(stream: &mut TcpStream, status: u16, status_text: &str, body: &str) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::http::HttpUserService;

    #[test]
    fn test_mock_server_starts() {
        let server = MockUserServer::start(MockConfig::default()).unwrap();
        assert!(server.base_url().starts_with("http://127.0.0.1:"));
    }

    #[tokio::test]
    async fn test_mock_server_create_and_get() {
        let server = MockUserServer::start(MockConfig::default()).unwrap();
        let client = HttpUserService::new_with_base_url(&server.base_url()).unwrap();

        let created = client
            .create(&UserDraft::new("Alice", "alice@example.com"))
            .await
            .unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.name, "Alice");
        assert_eq!(server.record_count(), 1);

        let fetched = client.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_mock_server_update() {
        let server = MockUserServer::start(MockConfig::default()).unwrap();
        server.seed(User::new("7", "Old Name", "old@example.com"));
        let client = HttpUserService::new_with_base_url(&server.base_url()).unwrap();

        let updated = client
            .update("7", &UserDraft::new("New Name", "new@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.id, "7");
        assert_eq!(updated.name, "New Name");
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_mock_server_get_missing_is_not_found() {
        let server = MockUserServer::start(MockConfig::default()).unwrap();
        let client = HttpUserService::new_with_base_url(&server.base_url()).unwrap();

        let result = client.get_by_id("missing").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mock_server_auth_failure() {
        let server = MockUserServer::start(MockConfig {
            fail_auth: true,
            ..Default::default()
        })
        .unwrap();
        let client = HttpUserService::new_with_base_url(&server.base_url()).unwrap();

        let result = client.get_by_id("7").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Authentication"));
    }

    #[tokio::test]
    async fn test_mock_server_requires_api_key() {
        let server = MockUserServer::start(MockConfig {
            require_api_key: true,
            ..Default::default()
        })
        .unwrap();
        server.seed(User::new("7", "Alice", "alice@example.com"));

        let without_key = HttpUserService::new_with_base_url(&server.base_url()).unwrap();
        assert!(without_key.get_by_id("7").await.is_err());

        let with_key = HttpUserService::new_with_base_url(&server.base_url())
            .unwrap()
            .with_api_key("test_key");
        assert!(with_key.get_by_id("7").await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_server_forced_not_found() {
        let server = MockUserServer::start(MockConfig {
            not_found: true,
            ..Default::default()
        })
        .unwrap();
        server.seed(User::new("7", "Alice", "alice@example.com"));
        let client = HttpUserService::new_with_base_url(&server.base_url()).unwrap();

        // Stored records are also shadowed by the forced 404
        let result = client.get_by_id("7").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mock_server_server_error() {
        let server = MockUserServer::start(MockConfig {
            server_error: true,
            ..Default::default()
        })
        .unwrap();
        let client = HttpUserService::new_with_base_url(&server.base_url()).unwrap();

        let result = client
            .create(&UserDraft::new("Alice", "alice@example.com"))
            .await;
        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_mock_service_records_calls() {
        let mock = MockUserService::new();
        let created = mock
            .create(&UserDraft::new("Alice", "alice@example.com"))
            .await
            .unwrap();
        let _ = mock.get_by_id(&created.id).await.unwrap();

        let calls = mock.recorded_calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], RecordedCall::Create(_)));
        assert_eq!(calls[1], RecordedCall::GetById(created.id));
    }

    #[tokio::test]
    async fn test_mock_service_scripted_failure() {
        let mock = MockUserService::new().failing_get();
        mock.seed(User::new("7", "Alice", "alice@example.com"));
        let result = mock.get_by_id("7").await;
        assert!(matches!(result, Err(Error::Transport(_))));
    }
}
