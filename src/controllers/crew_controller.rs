use chrono::Utc;
use validator::Validate;

use crate::clients::ClerkClient;
use crate::dto::crew_dto::{
    CompleteJobRequest, CrewJobsResponse, SaveProgressRequest, SaveProgressResponse,
};
use crate::dto::order_dto::OrderMutationResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::order::{JobCompletion, JobProgress};
use crate::repositories::OrderRepository;
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::normalize_notion_id;

pub struct CrewController {
    orders: OrderRepository,
    clerk: ClerkClient,
}

impl CrewController {
    pub fn new(state: &AppState) -> Self {
        Self {
            orders: state.orders(),
            clerk: state.clerk.clone(),
        }
    }

    /// Autoguardado: reemplaza el snapshot completo
    pub async fn save_progress(
        &self,
        request: SaveProgressRequest,
    ) -> Result<SaveProgressResponse, AppError> {
        request.validate()?;
        let order_id = normalize_notion_id(request.order_id.as_deref().unwrap_or_default());
        let last_updated = Utc::now();

        let progress = JobProgress {
            current_step: request.current_step.unwrap_or_default(),
            before_photos: request.before_photos,
            after_photos: request.after_photos,
            signature_url: request.signature_url,
            customer_name: request.customer_name,
            gps_location: request.gps_location,
            last_updated: Some(last_updated),
        };

        let order = self.orders.save_progress(&order_id, &progress).await?;
        log::debug!("💾 Progreso de {} en paso {}", order.order_id, progress.current_step);

        Ok(SaveProgressResponse {
            success: true,
            page_id: order.id,
            last_updated,
        })
    }

    pub async fn complete_job(
        &self,
        user: &AuthenticatedUser,
        request: CompleteJobRequest,
    ) -> Result<OrderMutationResponse, AppError> {
        request.validate()?;
        let order_id = normalize_notion_id(request.order_id.as_deref().unwrap_or_default());

        let completion = JobCompletion {
            before_photos: request.before_photos,
            after_photos: request.after_photos,
            signature_url: request.signature_url.unwrap_or_default(),
            customer_name: request.customer_name.unwrap_or_default(),
            gps_location: request.gps_location.unwrap_or_default(),
            completed_by: user.user_id.clone(),
            completed_at: Utc::now(),
        };

        let order = self.orders.complete(&order_id, &completion).await?;
        log::info!("✅ Trabajo {} completado por {}", order.order_id, user.user_id);
        Ok(order.into())
    }

    /// Trabajos programados del equipo asignado al usuario
    pub async fn jobs(&self, user: &AuthenticatedUser) -> Result<CrewJobsResponse, AppError> {
        let crew_id = self
            .clerk
            .get_user(&user.user_id)
            .await?
            .crew_id()
            .map(|id| normalize_notion_id(&id));

        let jobs = match crew_id.as_deref() {
            Some(crew_id) => self.orders.crew_jobs(crew_id).await?,
            None => {
                log::info!("👷 Usuario {} sin equipo asignado", user.user_id);
                Vec::new()
            }
        };

        Ok(CrewJobsResponse {
            success: true,
            crew_id,
            count: jobs.len(),
            jobs,
        })
    }
}
