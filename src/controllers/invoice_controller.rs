use std::sync::Arc;

use chrono::{Datelike, Utc};
use futures::future::try_join_all;
use validator::Validate;

use crate::clients::{format_whatsapp_number, CloudinaryClient, TwilioClient};
use crate::dto::invoice_dto::{
    GenerateInvoiceRequest, GenerateInvoiceResponse, SendInvoiceWhatsappRequest,
    SendInvoiceWhatsappResponse,
};
use crate::repositories::{CatalogRepository, OrderRepository};
use crate::services::invoice_pdf::render_invoice;
use crate::services::invoice_service;
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppError};
use crate::utils::validation::{normalize_notion_id, validate_date};

pub struct InvoiceController {
    orders: OrderRepository,
    catalog: CatalogRepository,
    cloudinary: CloudinaryClient,
    twilio: TwilioClient,
    font: Option<Arc<Vec<u8>>>,
}

impl InvoiceController {
    pub fn new(state: &AppState) -> Self {
        Self {
            orders: state.orders(),
            catalog: state.catalog(),
            cloudinary: state.cloudinary.clone(),
            twilio: state.twilio.clone(),
            font: state.invoice_font.clone(),
        }
    }

    /// Facturar las órdenes terminadas de un cliente.
    ///
    /// Si falla alguna actualización a `Facturado` la petición falla, pero
    /// el PDF ya subido y las órdenes ya actualizadas se quedan como están.
    pub async fn generate(
        &self,
        request: GenerateInvoiceRequest,
    ) -> Result<GenerateInvoiceResponse, AppError> {
        request.validate()?;
        let client_id = normalize_notion_id(request.client_id.as_deref().unwrap_or_default());
        let order_ids: Vec<String> = request
            .order_ids
            .iter()
            .map(|id| normalize_notion_id(id))
            .collect();

        let range = match (request.start_date.as_deref(), request.end_date.as_deref()) {
            (Some(start), Some(end)) => Some((
                validate_date(start).map_err(|_| bad_request_error("Invalid startDate"))?,
                validate_date(end).map_err(|_| bad_request_error("Invalid endDate"))?,
            )),
            _ => None,
        };

        let completed = self.orders.completed(Some(&client_id), range).await?;
        let orders = invoice_service::select_orders(completed, &order_ids);
        if orders.is_empty() {
            return Err(AppError::NotFound(
                "No completed orders found for this client".to_string(),
            ));
        }

        let (clients, truck_models) = self.catalog.clients_and_truck_models().await?;
        let client = clients
            .iter()
            .find(|c| c.id == client_id)
            .ok_or_else(|| AppError::NotFound("Client not found".to_string()))?;

        let now = Utc::now();
        let invoice_number = self
            .orders
            .next_invoice_number(now.year(), now.month())
            .await?;
        let invoice_date = now.date_naive();

        let items = invoice_service::build_items(&orders, &truck_models);
        let invoice =
            invoice_service::build_invoice(invoice_number.clone(), invoice_date, client, items);
        let total = invoice.total();

        log::info!(
            "🧾 Generando {} para {} ({} órdenes, total {})",
            invoice_number,
            client.name,
            orders.len(),
            total
        );

        let pdf = render_invoice(&invoice, now, self.font.as_deref().map(Vec::as_slice))?;
        let pdf_url = self
            .cloudinary
            .upload_invoice_pdf(
                pdf,
                &client_id,
                &invoice_service::invoice_file_name(&invoice_number),
            )
            .await?;

        try_join_all(orders.iter().map(|order| {
            self.orders
                .mark_invoiced(&order.id, &invoice_number, invoice_date, &pdf_url, now)
        }))
        .await?;

        Ok(GenerateInvoiceResponse {
            success: true,
            invoice_number,
            pdf_url,
            total,
            order_count: orders.len(),
        })
    }

    /// Enviar la liga de la factura por WhatsApp
    pub async fn send_whatsapp(
        &self,
        request: SendInvoiceWhatsappRequest,
    ) -> Result<SendInvoiceWhatsappResponse, AppError> {
        if !self.twilio.is_configured() {
            return Err(AppError::Configuration(
                "Twilio WhatsApp not configured. Please set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, and TWILIO_WHATSAPP_NUMBER in .env".to_string(),
            ));
        }
        request.validate()?;

        let to = format_whatsapp_number(request.client_phone.as_deref().unwrap_or_default());
        let body = invoice_service::whatsapp_message(
            request.client_name.as_deref().unwrap_or_default(),
            &request.invoice_number,
            request.pdf_url.as_deref().unwrap_or_default(),
        );

        let message = self.twilio.send_whatsapp(&to, &body).await?;
        log::info!("📨 Factura {} enviada a {} ({})", request.invoice_number, to, message.sid);

        Ok(SendInvoiceWhatsappResponse {
            success: true,
            message_id: message.sid,
            status: message.status,
            sent_to: to,
        })
    }
}
