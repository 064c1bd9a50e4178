use chrono::{Datelike, Utc};
use validator::Validate;

use crate::dto::order_dto::{
    CompletedOrdersQuery, CreateOrderRequest, CreateOrderResponse, OrderListQuery,
    OrderListResponse, OrderMutationResponse, OrderResponse, PreviewPriceRequest,
    PreviewPriceResponse, ScheduleOrderRequest, UpdateStatusRequest,
};
use crate::models::order::{GlassPosition, NewOrder, OrderStatus};
use crate::repositories::{OrderRepository, PricingRepository};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::{normalize_notion_id, validate_date, validate_notion_id};

pub struct OrderController {
    orders: OrderRepository,
    pricing: PricingRepository,
}

impl OrderController {
    pub fn new(state: &AppState) -> Self {
        Self {
            orders: state.orders(),
            pricing: state.pricing(),
        }
    }

    /// Alta de orden: genera el ID, busca el precio y guarda en `Pendiente`
    pub async fn create(&self, request: CreateOrderRequest) -> Result<CreateOrderResponse, AppError> {
        request.validate()?;

        let client_id = normalize_notion_id(request.client_id.as_deref().unwrap_or_default());
        let truck_model_id =
            normalize_notion_id(request.truck_model_id.as_deref().unwrap_or_default());
        let glass_position: GlassPosition = request
            .glass_position
            .unwrap_or_default()
            .parse()
            .map_err(|e: String| bad_request_error(&e))?;

        let year = Utc::now().year();
        let (order_id, price) = futures::try_join!(
            self.orders.next_order_id(year),
            self.pricing
                .lookup(&client_id, &truck_model_id, glass_position.as_str()),
        )?;

        if price.is_none() {
            log::warn!(
                "⚠️ Sin precio para cliente {} / modelo {} / {}; la orden se crea sin precio",
                client_id,
                truck_model_id,
                glass_position
            );
        }

        let order = self
            .orders
            .create(&NewOrder {
                order_id: order_id.clone(),
                client_id,
                unit_number: request.unit_number.unwrap_or_default(),
                truck_model_id,
                glass_position,
                price,
                notes: request.notes,
            })
            .await?;

        Ok(CreateOrderResponse {
            success: true,
            order_id,
            notion_page_id: order.id,
            price,
        })
    }

    pub async fn list(&self, query: OrderListQuery) -> Result<OrderListResponse, AppError> {
        query.validate()?;
        let status = query.status.as_deref().filter(|s| !s.is_empty());
        let client_id = query.client_id.as_deref().map(normalize_notion_id);
        let orders = self.orders.list(status, client_id.as_deref()).await?;
        Ok(orders.into())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<OrderResponse, AppError> {
        validate_notion_id(id).map_err(|_| bad_request_error(&format!("Invalid order id '{}'", id)))?;
        let order = self.orders.find_by_id(&normalize_notion_id(id)).await?;
        Ok(OrderResponse {
            success: true,
            order,
        })
    }

    pub async fn preview_price(
        &self,
        request: PreviewPriceRequest,
    ) -> Result<PreviewPriceResponse, AppError> {
        request.validate()?;
        let price = self
            .pricing
            .lookup(
                &normalize_notion_id(request.client_id.as_deref().unwrap_or_default()),
                &normalize_notion_id(request.truck_model_id.as_deref().unwrap_or_default()),
                request.glass_position.as_deref().unwrap_or_default(),
            )
            .await?;

        Ok(PreviewPriceResponse {
            success: true,
            price,
            found: price.is_some(),
        })
    }

    /// Cambio de estado sin tabla de transiciones: cualquier valor se escribe
    /// tal cual, sólo se deja aviso en el log cuando sale del flujo documentado
    pub async fn update_status(
        &self,
        request: UpdateStatusRequest,
    ) -> Result<OrderMutationResponse, AppError> {
        request.validate()?;
        let order_id = normalize_notion_id(request.order_id.as_deref().unwrap_or_default());
        let status = request.status.unwrap_or_default();

        let current = self.orders.find_by_id(&order_id).await?;
        match (current.known_status(), status.parse::<OrderStatus>()) {
            (Some(from), Ok(to)) if !from.follows_workflow(to) => log::warn!(
                "⚠️ Transición fuera del flujo en {}: {} → {}",
                current.order_id,
                from,
                to
            ),
            (_, Err(_)) => log::warn!(
                "⚠️ Estado desconocido '{}' escrito en {}",
                status,
                current.order_id
            ),
            _ => {}
        }

        let order = self
            .orders
            .update_status(&order_id, &status, request.note.as_deref())
            .await?;
        log::info!("🔄 {} → {}", current.order_id, order.status);
        Ok(order.into())
    }

    pub async fn schedule(
        &self,
        request: ScheduleOrderRequest,
    ) -> Result<OrderMutationResponse, AppError> {
        request.validate()?;
        let order = self
            .orders
            .schedule(
                &normalize_notion_id(request.order_id.as_deref().unwrap_or_default()),
                &normalize_notion_id(request.crew_id.as_deref().unwrap_or_default()),
                request.schedule_date.as_deref().unwrap_or_default(),
            )
            .await?;
        log::info!("📅 {} programada", order.order_id);
        Ok(order.into())
    }

    /// Vista de facturación: órdenes terminadas
    pub async fn completed(&self, query: CompletedOrdersQuery) -> Result<OrderListResponse, AppError> {
        query.validate()?;
        let range = match (query.start_date.as_deref(), query.end_date.as_deref()) {
            (Some(start), Some(end)) => Some((
                validate_date(start).map_err(|_| bad_request_error("Invalid startDate"))?,
                validate_date(end).map_err(|_| bad_request_error("Invalid endDate"))?,
            )),
            _ => None,
        };
        let client_id = query.client_id.as_deref().map(normalize_notion_id);
        let orders = self.orders.completed(client_id.as_deref(), range).await?;
        Ok(orders.into())
    }
}
