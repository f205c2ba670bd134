#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use staffdesk::config::ApiConfig;
use staffdesk::error::SessionError;
use staffdesk::{build_api_client, ApiClient, Navigator, Session, SessionState, SessionStorage};
use wiremock::MockServer;

pub fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig {
        base_url: server.uri(),
        timeout_secs: 10,
    }
}

/// Navigator that records redirects instead of performing them.
pub struct RecordingNavigator {
    current: Mutex<String>,
    assigned: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(path.to_string()),
            assigned: Mutex::new(Vec::new()),
        })
    }

    pub fn assigned(&self) -> Vec<String> {
        self.assigned.lock().unwrap().clone()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    async fn assign(&self, location: &str) {
        self.assigned.lock().unwrap().push(location.to_string());
    }
}

/// Storage that counts writes and remembers the last one.
#[derive(Default)]
pub struct CountingStorage {
    initial: Option<Session>,
    saves: AtomicUsize,
    last: Mutex<Option<Session>>,
}

impl CountingStorage {
    pub fn with_token(token: &str) -> Arc<Self> {
        Arc::new(Self {
            initial: Some(Session {
                token: token.to_string(),
                user: None,
                expires_at: None,
            }),
            ..Default::default()
        })
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<Session> {
        self.last.lock().unwrap().clone()
    }
}

impl SessionStorage for CountingStorage {
    fn load(&self) -> Result<Option<Session>, SessionError> {
        Ok(self.initial.clone())
    }

    fn save(&self, session: &Session) -> Result<(), SessionError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(session.clone());
        Ok(())
    }
}

pub struct Harness {
    pub api: ApiClient,
    pub session: SessionState,
    pub navigator: Arc<RecordingNavigator>,
    pub storage: Arc<CountingStorage>,
}

/// Client wired like the application, with a session holding `token`
/// (empty for signed out) and a navigator sitting at `path`.
pub fn harness(server: &MockServer, token: &str, path: &str) -> Harness {
    let storage = CountingStorage::with_token(token);
    let session = SessionState::restore(storage.clone());
    let navigator = RecordingNavigator::at(path);
    let api = build_api_client(&api_config(server), &session, navigator.clone())
        .expect("Failed to build client");

    Harness {
        api,
        session,
        navigator,
        storage,
    }
}

pub fn login_body(token: &str) -> Value {
    json!({
        "success": true,
        "message": "Login successfully",
        "data": {
            "expires_in": 3600,
            "token": token,
            "user_data": {
                "id": 1,
                "name": "Admin",
                "email": "a@b.com",
                "email_verified_at": null,
                "created_at": "2024-05-01T08:00:00.000000Z",
                "updated_at": "2024-05-01T08:00:00.000000Z"
            }
        }
    })
}

pub fn employee_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "gender": "female",
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": "08123456789",
        "date_of_birth": "1994-03-12",
        "address": "Jl. Sudirman 1",
        "departement": "Finance",
        "position": "Analyst",
        "status": "active"
    })
}
