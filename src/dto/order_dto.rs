use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::order::Order;
use crate::utils::validation::{
    validate_glass_position, validate_iso_date, validate_notion_id, validate_schedule_date,
};

// Request para crear una orden
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[validate(required(message = "clientId is required"), custom = "validate_notion_id")]
    pub client_id: Option<String>,
    #[validate(
        required(message = "unitNumber is required"),
        length(min = 1, message = "unitNumber is required")
    )]
    pub unit_number: Option<String>,
    #[validate(required(message = "truckModelId is required"), custom = "validate_notion_id")]
    pub truck_model_id: Option<String>,
    #[validate(required(message = "glassPosition is required"), custom = "validate_glass_position")]
    pub glass_position: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: String,
    pub notion_page_id: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

// Request para consultar un precio sin crear la orden
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPriceRequest {
    #[validate(required(message = "clientId is required"), custom = "validate_notion_id")]
    pub client_id: Option<String>,
    #[validate(required(message = "truckModelId is required"), custom = "validate_notion_id")]
    pub truck_model_id: Option<String>,
    #[validate(required(message = "glassPosition is required"), custom = "validate_glass_position")]
    pub glass_position: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PreviewPriceResponse {
    pub success: bool,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub found: bool,
}

// Request para cambiar el estado; el valor se guarda tal cual
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    #[validate(required(message = "orderId is required"), custom = "validate_notion_id")]
    pub order_id: Option<String>,
    #[validate(
        required(message = "status is required"),
        length(min = 1, message = "status is required")
    )]
    pub status: Option<String>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleOrderRequest {
    #[validate(required(message = "orderId is required"), custom = "validate_notion_id")]
    pub order_id: Option<String>,
    #[validate(required(message = "crewId is required"), custom = "validate_notion_id")]
    pub crew_id: Option<String>,
    #[validate(required(message = "scheduleDate is required"), custom = "validate_schedule_date")]
    pub schedule_date: Option<String>,
}

// Respuesta de las operaciones que modifican una página
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderMutationResponse {
    pub success: bool,
    pub page_id: String,
    pub status: String,
}

impl From<Order> for OrderMutationResponse {
    fn from(order: Order) -> Self {
        Self {
            success: true,
            page_id: order.id,
            status: order.status,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderListQuery {
    pub status: Option<String>,
    #[validate(custom = "validate_notion_id")]
    pub client_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrdersQuery {
    #[validate(custom = "validate_notion_id")]
    pub client_id: Option<String>,
    #[validate(custom = "validate_iso_date")]
    pub start_date: Option<String>,
    #[validate(custom = "validate_iso_date")]
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub success: bool,
    pub count: usize,
    pub orders: Vec<Order>,
}

impl From<Vec<Order>> for OrderListResponse {
    fn from(orders: Vec<Order>) -> Self {
        Self {
            success: true,
            count: orders.len(),
            orders,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: Order,
}
