use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::{validate_iso_date, validate_notion_id, validate_notion_ids};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceRequest {
    #[validate(required(message = "Client ID is required"), custom = "validate_notion_id")]
    pub client_id: Option<String>,
    #[validate(custom = "validate_iso_date")]
    pub start_date: Option<String>,
    #[validate(custom = "validate_iso_date")]
    pub end_date: Option<String>,
    #[serde(default)]
    #[validate(custom = "validate_notion_ids")]
    pub order_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceResponse {
    pub success: bool,
    pub invoice_number: String,
    pub pdf_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    pub order_count: usize,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceWhatsappRequest {
    #[validate(
        required(message = "Missing required fields: clientPhone, pdfUrl"),
        length(min = 1, message = "Missing required fields: clientPhone, pdfUrl")
    )]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub invoice_number: String,
    #[validate(
        required(message = "Missing required fields: clientPhone, pdfUrl"),
        url(message = "pdfUrl must be a valid URL")
    )]
    pub pdf_url: Option<String>,
    pub client_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInvoiceWhatsappResponse {
    pub success: bool,
    pub message_id: String,
    pub status: Option<String>,
    pub sent_to: String,
}
