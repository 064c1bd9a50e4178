use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::validate_notion_id;

// Request para asignar (o quitar) el equipo de un usuario
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AssignCrewRequest {
    #[validate(
        required(message = "User email is required"),
        email(message = "User email is invalid")
    )]
    pub user_email: Option<String>,
    #[validate(custom = "validate_notion_id")]
    pub crew_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignCrewResponse {
    pub success: bool,
    pub message: String,
    pub user_id: String,
}
