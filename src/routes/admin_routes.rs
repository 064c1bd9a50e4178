use axum::{extract::State, routing::post, Json, Router};

use crate::controllers::admin_controller::AdminController;
use crate::dto::admin_dto::{AssignCrewRequest, AssignCrewResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_admin_router() -> Router<AppState> {
    Router::new().route("/assign-crew", post(assign_crew))
}

async fn assign_crew(
    State(state): State<AppState>,
    AppJson(request): AppJson<AssignCrewRequest>,
) -> Result<Json<AssignCrewResponse>, AppError> {
    let controller = AdminController::new(&state);
    Ok(Json(controller.assign_crew(request).await?))
}
