//! Common test utilities for integration tests.
//!
//! Runs an in-process axum server that stands in for the sniffer backend. It
//! records every request it receives and answers from a table of canned
//! responses; anything not in the table gets a 404.

// Not every helper is used by every test binary.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::MACAddress;
use fake::faker::name::en::FirstName;
use fake::Fake;
use serde_json::{json, Value};

use probe_dash_client::config::BackendConfig;
use probe_dash_client::SnifferClient;

/// A request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: String,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), Canned>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockBackend {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockBackend {
    /// Binds to an ephemeral port on 127.0.0.1 and starts serving.
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("Mock backend has no address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock backend failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn client(&self) -> SnifferClient {
        SnifferClient::new(&BackendConfig::new(&self.base_url)).expect("Failed to build client")
    }

    /// Serves `body` as JSON with `status` for `method path`.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).expect("Invalid status code");
        self.state.routes.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            Canned {
                status,
                body: body.to_string(),
            },
        );
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("Mock backend received no requests")
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        body: serde_json::from_slice(&body).ok(),
    };
    state.requests.lock().unwrap().push(recorded);

    let canned = state
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned();

    match canned {
        Some(canned) => (
            canned.status,
            [(header::CONTENT_TYPE, "application/json")],
            canned.body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "detail": "Not Found" }).to_string(),
        )
            .into_response(),
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn fake_mac() -> String {
    MACAddress().fake::<String>().to_lowercase()
}

pub fn device_json(mac: &str, is_trusted: bool) -> Value {
    json!({
        "mac": mac,
        "name": null,
        "first_seen": "2024-01-15 10:30:00",
        "last_seen": "2024-01-16 08:00:00",
        "is_trusted": is_trusted,
        "oui": CompanyName().fake::<String>(),
        "ssids": ["HomeNet"],
        "total_sightings": 12
    })
}

pub fn named_device_json(mac: &str, name: &str, is_trusted: bool) -> Value {
    let mut device = device_json(mac, is_trusted);
    device["name"] = json!(name);
    device
}

pub fn device_with_stats_json(mac: &str, is_trusted: bool) -> Value {
    let mut device = device_json(mac, is_trusted);
    device["avg_signal_dbm"] = json!(-61.5);
    device
}

pub fn sighting_json(id: i64, mac: &str) -> Value {
    json!({
        "id": id,
        "timestamp": "2024-01-15 10:30:00",
        "mac": mac,
        "rssi": "-67",
        "dbm": -67,
        "ssid": "HomeNet",
        "oui": null
    })
}

pub fn activity_json() -> Value {
    let mut by_hour = vec![0; 24];
    by_hour[9] = 14;
    json!({
        "by_hour": by_hour,
        "by_day_of_week": [1, 2, 3, 4, 5, 6, 7],
        "by_date": { "2024-01-15": 14 }
    })
}

pub fn overview_json() -> Value {
    json!({
        "total_devices": 120,
        "new_today": 3,
        "new_this_week": 17,
        "trusted_count": 8,
        "unknown_count": 112,
        "most_active_today": { "mac": "aa:bb:cc:dd:ee:ff", "name": null, "sightings": 340 },
        "top_manufacturers": [{ "oui": "Apple, Inc.", "count": 40 }],
        "probes_by_hour": vec![5; 24]
    })
}

pub fn identity_json(identity_id: &str, alias: Option<&str>) -> Value {
    json!({
        "identity_id": identity_id,
        "alias": alias,
        "alias_set_at": alias.map(|_| "2024-01-15 12:00:00"),
        "ssid_signature": null,
        "first_seen": "2024-01-10 09:00:00",
        "last_seen": "2024-01-15 10:30:00",
        "total_sightings": 88
    })
}

pub fn fingerprint_json(fingerprint_id: &str) -> Value {
    json!({
        "fingerprint_id": fingerprint_id,
        "identity_id": null,
        "ie_data": "{\"ht_cap\":\"0x1ef\"}",
        "first_seen": "2024-01-10 09:00:00",
        "last_seen": "2024-01-15 10:30:00",
        "sighting_count": 31
    })
}

pub fn fake_alias() -> String {
    format!("{}'s phone", FirstName().fake::<String>())
}
