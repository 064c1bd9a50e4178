use axum::{extract::State, routing::get, Json, Router};

use crate::controllers::catalog_controller::CatalogController;
use crate::dto::catalog_dto::{CatalogResponse, PricingDebugResponse};
use crate::models::client::Client;
use crate::models::crew::Crew;
use crate::models::truck_model::TruckModel;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_catalog_router() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/truck-models", get(list_truck_models))
        .route("/crews", get(list_crews))
        .route("/glass-positions", get(list_glass_positions))
        .route("/debug/pricing", get(pricing_debug))
}

async fn list_clients(
    State(state): State<AppState>,
) -> Result<Json<CatalogResponse<Client>>, AppError> {
    Ok(Json(CatalogController::new(&state).clients().await?))
}

async fn list_truck_models(
    State(state): State<AppState>,
) -> Result<Json<CatalogResponse<TruckModel>>, AppError> {
    Ok(Json(CatalogController::new(&state).truck_models().await?))
}

async fn list_crews(State(state): State<AppState>) -> Result<Json<CatalogResponse<Crew>>, AppError> {
    Ok(Json(CatalogController::new(&state).crews().await?))
}

async fn list_glass_positions(State(state): State<AppState>) -> Json<CatalogResponse<&'static str>> {
    Json(CatalogController::new(&state).glass_positions())
}

async fn pricing_debug(State(state): State<AppState>) -> Result<Json<PricingDebugResponse>, AppError> {
    Ok(Json(CatalogController::new(&state).pricing_debug().await?))
}
