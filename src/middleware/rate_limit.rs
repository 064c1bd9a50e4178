//! Middleware de Rate Limiting
//! 
//! Ventana fija por IP para limitar el abuso de la API.

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Conteo de requests de una IP dentro de su ventana
#[derive(Debug, Clone)]
struct RateLimitInfo {
    requests: u32,
    window_start: Instant,
}

/// Estado global del rate limiting
#[derive(Clone)]
pub struct RateLimitState {
    requests: Arc<RwLock<HashMap<String, RateLimitInfo>>>,
    max_requests: u32,
    window_duration: Duration,
}

impl RateLimitState {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self::with_limits(
            config.rate_limit_requests,
            Duration::from_secs(config.rate_limit_window),
        )
    }

    pub fn with_limits(max_requests: u32, window_duration: Duration) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window_duration,
        }
    }

    /// Registrar una request; error si la IP excedió el límite
    pub async fn check_rate_limit(&self, ip: &str) -> Result<(), AppError> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();

        requests.retain(|_, info| now.duration_since(info.window_start) < self.window_duration);

        let info = requests.entry(ip.to_string()).or_insert(RateLimitInfo {
            requests: 0,
            window_start: now,
        });

        if info.requests >= self.max_requests {
            return Err(AppError::RateLimitExceeded);
        }

        info.requests += 1;
        Ok(())
    }
}

/// Primera IP de `x-forwarded-for`; si no viene, la dirección del peer
fn client_ip(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    match forwarded {
        Some(ip) => ip.to_string(),
        None => request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string()),
    }
}

/// Middleware de rate limiting
pub async fn rate_limit_middleware(
    State(rate_limit_state): State<RateLimitState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    rate_limit_state.check_rate_limit(&client_ip(&request)).await?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_from(peer: Option<&str>, forwarded: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/clients");
        if let Some(forwarded) = forwarded {
            builder = builder.header("x-forwarded-for", forwarded);
        }
        let mut request = builder.body(Body::empty()).unwrap();
        if let Some(peer) = peer {
            let addr: SocketAddr = peer.parse().unwrap();
            request.extensions_mut().insert(ConnectInfo(addr));
        }
        request
    }

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let request = request_from(Some("127.0.0.1:50000"), Some("203.0.113.7, 10.0.0.1"));
        assert_eq!(client_ip(&request), "203.0.113.7");
    }

    #[test]
    fn peer_address_is_used_without_forwarded_header() {
        let first = request_from(Some("198.51.100.4:51000"), None);
        let second = request_from(Some("198.51.100.5:51000"), None);
        assert_eq!(client_ip(&first), "198.51.100.4");
        assert_eq!(client_ip(&second), "198.51.100.5");
        assert_eq!(client_ip(&request_from(Some("198.51.100.4:62000"), Some(" "))), "198.51.100.4");
    }

    #[test]
    fn unknown_without_header_or_peer() {
        assert_eq!(client_ip(&request_from(None, None)), "unknown");
    }

    #[tokio::test]
    async fn requests_over_the_limit_are_rejected_per_ip() {
        let state = RateLimitState::with_limits(2, Duration::from_secs(60));
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(matches!(
            state.check_rate_limit("10.0.0.1").await,
            Err(AppError::RateLimitExceeded)
        ));
        assert!(state.check_rate_limit("10.0.0.2").await.is_ok());
    }

    #[tokio::test]
    async fn window_expiry_resets_the_counter() {
        let state = RateLimitState::with_limits(1, Duration::from_millis(20));
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
        assert!(state.check_rate_limit("10.0.0.1").await.is_err());
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(state.check_rate_limit("10.0.0.1").await.is_ok());
    }
}
