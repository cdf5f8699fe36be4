use axum::Router;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::api_client::ApiClient;
use crate::settings::ClientSettings;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_stub(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub listener has no address");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Stub server failed");
    });

    format!("http://{}", addr)
}

/// Base URL of a port nothing listens on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind probe listener");
    let addr = listener.local_addr().expect("Probe listener has no address");
    drop(listener);
    format!("http://{}", addr)
}

pub fn client_for(base_url: &str) -> ApiClient {
    let settings = ClientSettings {
        api_base_url: base_url.to_string(),
        request_timeout_ms: 5_000,
    };
    ApiClient::new(settings).expect("Failed to build API client")
}

/// The backend's `{ success, data }` envelope.
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

pub fn category_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "type": 1,
        "status": 2,
        "created_at": 1757339265,
        "updated_at": 1757339265
    })
}

pub fn money_note_json(id: i64, category_id: i64, amount: i64) -> Value {
    json!({
        "id": id,
        "note": format!("note {}", id),
        "date": 1741996800,
        "amount": amount,
        "type": 1,
        "category_id": category_id,
        "status": 2,
        "created_at": 1741996800,
        "updated_at": 1741996800
    })
}
