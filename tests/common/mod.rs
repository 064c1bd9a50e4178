//! Utilidades compartidas por los tests de integración
//!
//! Cada test levanta un `MockServer` que sustituye a Notion, Cloudinary,
//! Clerk y Twilio, y llama al router completo con `oneshot`.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::MockServer;

use glass_workflow::build_router;
use glass_workflow::config::{EnvironmentConfig, IntegrationsConfig};
use glass_workflow::services::SessionClaims;
use glass_workflow::state::AppState;

pub const USER_ID: &str = "user_2field";
pub const CLIENT_ID: &str = "1c2b3a4d-5e6f-4a1b-8c9d-0e1f2a3b4c5d";
pub const TRUCK_ID: &str = "2d3c4b5a-6f7e-4b2c-9d0e-1f2a3b4c5d6e";
pub const CREW_ID: &str = "3e4d5c6b-7a8f-4c3d-8e1f-2a3b4c5d6e7f";
pub const ORDER_PAGE_ID: &str = "4f5e6d7c-8b9a-4d4e-9f2a-3b4c5d6e7f80";
pub const SECOND_ORDER_PAGE_ID: &str = "5a6f7e8d-9c0b-4e5f-8a3b-4c5d6e7f8091";

pub struct TestApp {
    pub server: MockServer,
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub fn test_config(base_url: &str) -> EnvironmentConfig {
    EnvironmentConfig {
        environment: "test".to_string(),
        port: 0,
        host: "127.0.0.1".to_string(),
        log_level: "debug".to_string(),
        cors_origins: vec![],
        rate_limit_requests: 1000,
        rate_limit_window: 60,
        invoice_font_path: None,
        integrations: IntegrationsConfig::for_base_url(base_url),
    }
}

pub async fn create_test_app() -> TestApp {
    create_test_app_with(|_| {}).await
}

/// App de prueba con ajustes sobre la configuración por defecto
pub async fn create_test_app_with<F>(customize: F) -> TestApp
where
    F: FnOnce(&mut EnvironmentConfig),
{
    let server = MockServer::start().await;
    let mut config = test_config(&server.uri());
    customize(&mut config);

    let state = AppState::new(config).expect("test state");
    TestApp {
        server,
        router: build_router(state),
    }
}

/// Token de sesión firmado con el secreto local de pruebas
pub fn session_token(user_id: &str) -> String {
    sign_session(user_id, "local-session-secret")
}

pub fn sign_session(user_id: &str, secret: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = SessionClaims {
        sub: user_id.to_string(),
        sid: Some("sess_test".to_string()),
        azp: None,
        exp: (now + 600) as usize,
        iat: now as usize,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("sign session token")
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.send(request).await
    }

    /// Enviar una request ya construida al router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| json!(String::from_utf8_lossy(&bytes)))
        };

        TestResponse { status, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let token = session_token(USER_ID);
        self.request(Method::GET, uri, None, Some(&token)).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        let token = session_token(USER_ID);
        self.request(Method::POST, uri, Some(body), Some(&token)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> TestResponse {
        let token = session_token(USER_ID);
        self.request(Method::PUT, uri, Some(body), Some(&token)).await
    }

    /// Cuerpos JSON de las requests recibidas por el mock para un método y path
    pub async fn received_json(&self, method: &str, path: &str) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == method && r.url.path() == path)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}

/// Página de la base de órdenes
pub fn order_page(page_id: &str, order_id: &str, status: &str, price: Option<f64>) -> Value {
    json!({
        "object": "page",
        "id": page_id,
        "created_time": "2025-02-01T15:00:00.000Z",
        "last_edited_time": "2025-02-03T10:30:00.000Z",
        "properties": {
            "Order ID": { "type": "title", "title": [{ "plain_text": order_id }] },
            "Client": { "type": "relation", "relation": [{ "id": CLIENT_ID }] },
            "Unit Number": { "type": "rich_text", "rich_text": [{ "plain_text": "U-118" }] },
            "Truck Model": { "type": "relation", "relation": [{ "id": TRUCK_ID }] },
            "Glass Position": { "type": "select", "select": { "name": "Parabrisas" } },
            "Status": { "type": "select", "select": { "name": status } },
            "Price": { "type": "number", "number": price }
        }
    })
}

pub fn query_result(pages: Vec<Value>) -> Value {
    json!({ "object": "list", "results": pages, "has_more": false, "next_cursor": null })
}
