//! Middleware de autenticación
//! 
//! Verifica el token de sesión de Clerk, tomado del header
//! `Authorization: Bearer` o de la cookie `__session`, e inyecta
//! el usuario autenticado en las extensions de la request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;
use crate::utils::errors::AppError;

pub const SESSION_COOKIE: &str = "__session";

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub session_id: Option<String>,
}

/// Extraer el token de sesión del header o de la cookie
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

/// Middleware de autenticación por sesión
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = session_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Unauthorized - Please sign in".to_string()))?;

    let claims = state.sessions.verify(&token)?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        session_id: claims.sid,
    });

    Ok(next.run(request).await)
}
