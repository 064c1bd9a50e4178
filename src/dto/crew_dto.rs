use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::order::{GpsLocation, Order};
use crate::utils::validation::{validate_customer_name, validate_notion_id};

// Snapshot de progreso enviado por la app de campo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressRequest {
    #[validate(required(message = "Missing orderId"), custom = "validate_notion_id")]
    pub order_id: Option<String>,
    #[validate(required(message = "Missing currentStep"))]
    pub current_step: Option<u32>,
    #[serde(default)]
    pub before_photos: Vec<String>,
    #[serde(default)]
    pub after_photos: Vec<String>,
    #[serde(default)]
    pub signature_url: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub gps_location: GpsLocation,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressResponse {
    pub success: bool,
    pub page_id: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompleteJobRequest {
    #[validate(required(message = "Missing orderId"), custom = "validate_notion_id")]
    pub order_id: Option<String>,
    #[serde(default)]
    #[validate(length(equal = 3, message = "Exactly 3 before photos are required"))]
    pub before_photos: Vec<String>,
    #[serde(default)]
    #[validate(length(equal = 1, message = "Exactly 1 after photo is required"))]
    pub after_photos: Vec<String>,
    #[validate(
        required(message = "Customer signature is required"),
        length(min = 1, message = "Customer signature is required")
    )]
    pub signature_url: Option<String>,
    #[validate(required(message = "Customer name is required"), custom = "validate_customer_name")]
    pub customer_name: Option<String>,
    #[validate(required(message = "GPS location is required"))]
    pub gps_location: Option<GpsLocation>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrewJobsResponse {
    pub success: bool,
    pub crew_id: Option<String>,
    pub count: usize,
    pub jobs: Vec<Order>,
}
