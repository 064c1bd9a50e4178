use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::controllers::crew_controller::CrewController;
use crate::dto::crew_dto::{
    CompleteJobRequest, CrewJobsResponse, SaveProgressRequest, SaveProgressResponse,
};
use crate::dto::order_dto::OrderMutationResponse;
use crate::middleware::AuthenticatedUser;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::AppJson;

pub fn create_crew_router() -> Router<AppState> {
    Router::new()
        .route("/save-progress", post(save_progress).put(save_progress))
        .route("/complete-job", post(complete_job))
        .route("/jobs", get(crew_jobs))
}

async fn save_progress(
    State(state): State<AppState>,
    AppJson(request): AppJson<SaveProgressRequest>,
) -> Result<Json<SaveProgressResponse>, AppError> {
    let controller = CrewController::new(&state);
    Ok(Json(controller.save_progress(request).await?))
}

async fn complete_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<CompleteJobRequest>,
) -> Result<Json<OrderMutationResponse>, AppError> {
    let controller = CrewController::new(&state);
    Ok(Json(controller.complete_job(&user, request).await?))
}

async fn crew_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<CrewJobsResponse>, AppError> {
    let controller = CrewController::new(&state);
    Ok(Json(controller.jobs(&user).await?))
}
