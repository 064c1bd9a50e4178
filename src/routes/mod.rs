//! Rutas HTTP
//! 
//! Todas las rutas bajo `/api` requieren sesión y pasan por el rate limiter.

pub mod admin_routes;
pub mod catalog_routes;
pub mod crew_routes;
pub mod order_routes;

use axum::{middleware, Router};

use crate::middleware::{auth_middleware, rate_limit_middleware};
use crate::state::AppState;

pub fn create_api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/orders", order_routes::create_order_router())
        .nest("/crew", crew_routes::create_crew_router())
        .nest("/admin", admin_routes::create_admin_router())
        .merge(catalog_routes::create_catalog_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.rate_limit.clone(),
            rate_limit_middleware,
        ))
}
