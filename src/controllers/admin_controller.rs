use validator::Validate;

use crate::clients::ClerkClient;
use crate::dto::admin_dto::{AssignCrewRequest, AssignCrewResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::validation::normalize_notion_id;

pub struct AdminController {
    clerk: ClerkClient,
}

impl AdminController {
    pub fn new(state: &AppState) -> Self {
        Self {
            clerk: state.clerk.clone(),
        }
    }

    /// Vincular un usuario (por email) con un equipo, o desvincularlo
    /// cuando no viene `crewId`. No se verifica rol de administrador.
    pub async fn assign_crew(&self, request: AssignCrewRequest) -> Result<AssignCrewResponse, AppError> {
        request.validate()?;
        let email = request.user_email.unwrap_or_default();
        let crew_id = request
            .crew_id
            .filter(|id| !id.trim().is_empty())
            .map(|id| normalize_notion_id(&id));

        let user = self
            .clerk
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No user found with email: {}", email)))?;

        self.clerk.set_crew(&user.id, crew_id.as_deref()).await?;

        let message = match &crew_id {
            Some(crew_id) => format!("Assigned {} to crew {}", email, crew_id),
            None => format!("Removed crew assignment for {}", email),
        };
        log::info!("👷 {}", message);

        Ok(AssignCrewResponse {
            success: true,
            message,
            user_id: user.id,
        })
    }
}
