use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::invoice_controller::InvoiceController;
use crate::controllers::order_controller::OrderController;
use crate::dto::invoice_dto::{
    GenerateInvoiceRequest, GenerateInvoiceResponse, SendInvoiceWhatsappRequest,
    SendInvoiceWhatsappResponse,
};
use crate::dto::order_dto::{
    CompletedOrdersQuery, CreateOrderRequest, CreateOrderResponse, OrderListQuery,
    OrderListResponse, OrderMutationResponse, OrderResponse, PreviewPriceRequest,
    PreviewPriceResponse, ScheduleOrderRequest, UpdateStatusRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::extract::{AppJson, AppQuery};

pub fn create_order_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/create", post(create_order))
        .route("/preview-price", post(preview_price))
        .route("/update-status", post(update_status))
        .route("/schedule", post(schedule_order))
        .route("/completed", get(completed_orders))
        .route("/generate-invoice", post(generate_invoice))
        .route("/send-invoice-whatsapp", post(send_invoice_whatsapp))
        .route("/:id", get(get_order))
}

async fn create_order(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateOrderRequest>,
) -> Result<Json<CreateOrderResponse>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.create(request).await?))
}

async fn list_orders(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<OrderListQuery>,
) -> Result<Json<OrderListResponse>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.list(query).await?))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.get_by_id(&id).await?))
}

async fn preview_price(
    State(state): State<AppState>,
    AppJson(request): AppJson<PreviewPriceRequest>,
) -> Result<Json<PreviewPriceResponse>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.preview_price(request).await?))
}

async fn update_status(
    State(state): State<AppState>,
    AppJson(request): AppJson<UpdateStatusRequest>,
) -> Result<Json<OrderMutationResponse>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.update_status(request).await?))
}

async fn schedule_order(
    State(state): State<AppState>,
    AppJson(request): AppJson<ScheduleOrderRequest>,
) -> Result<Json<OrderMutationResponse>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.schedule(request).await?))
}

async fn completed_orders(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<CompletedOrdersQuery>,
) -> Result<Json<OrderListResponse>, AppError> {
    let controller = OrderController::new(&state);
    Ok(Json(controller.completed(query).await?))
}

async fn generate_invoice(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateInvoiceRequest>,
) -> Result<Json<GenerateInvoiceResponse>, AppError> {
    let controller = InvoiceController::new(&state);
    Ok(Json(controller.generate(request).await?))
}

async fn send_invoice_whatsapp(
    State(state): State<AppState>,
    AppJson(request): AppJson<SendInvoiceWhatsappRequest>,
) -> Result<Json<SendInvoiceWhatsappResponse>, AppError> {
    let controller = InvoiceController::new(&state);
    Ok(Json(controller.send_whatsapp(request).await?))
}
