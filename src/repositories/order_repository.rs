//! Repositorio de órdenes sobre la fuente de datos de Notion
//!
//! Traduce las operaciones del flujo de trabajo a propiedades de página.
//! No hay transacciones: cada método es una o varias llamadas
//! independientes a la API.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Map, Value};

use crate::clients::NotionClient;
use crate::config::NotionDatabases;
use crate::models::notion::{filter, props};
use crate::models::order::{fields, JobCompletion, JobProgress, NewOrder, Order, OrderStatus};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::sequence;

#[derive(Clone)]
pub struct OrderRepository {
    notion: NotionClient,
    data_source: String,
}

impl OrderRepository {
    pub fn new(notion: NotionClient, databases: &NotionDatabases) -> Self {
        Self {
            notion,
            data_source: databases.orders.clone(),
        }
    }

    async fn query(&self, filters: Vec<Value>) -> AppResult<Vec<Order>> {
        let pages = self
            .notion
            .query_all(&self.data_source, filter::all(filters))
            .await?;
        Ok(pages.iter().map(Order::from_page).collect())
    }

    async fn update(&self, page_id: &str, properties: Map<String, Value>) -> AppResult<Order> {
        let page = self
            .notion
            .update_page(page_id, properties)
            .await
            .map_err(|e| not_found_as_order(e, page_id))?;
        Ok(Order::from_page(&page))
    }

    /// Siguiente ID `ORD-<año>-NNNN`.
    ///
    /// Lee todas las órdenes del año y calcula el máximo sin ningún bloqueo:
    /// dos altas concurrentes pueden obtener el mismo ID.
    pub async fn next_order_id(&self, year: i32) -> AppResult<String> {
        let prefix = sequence::order_id_prefix(year);
        let existing = self
            .query(vec![filter::title_starts_with(fields::ORDER_ID, &prefix)])
            .await?;
        Ok(sequence::next_order_id(
            existing.iter().map(|order| order.order_id.as_str()),
            year,
        ))
    }

    /// Siguiente folio `INV-<año><mes>-NNNN`, con el mismo esquema de escaneo
    pub async fn next_invoice_number(&self, year: i32, month: u32) -> AppResult<String> {
        let prefix = sequence::invoice_number_prefix(year, month);
        let existing = self
            .query(vec![filter::rich_text_starts_with(fields::INVOICE_NUMBER, &prefix)])
            .await?;
        Ok(sequence::next_invoice_number(
            existing
                .iter()
                .filter_map(|order| order.invoice_number.as_deref()),
            year,
            month,
        ))
    }

    pub async fn create(&self, new_order: &NewOrder) -> AppResult<Order> {
        let mut properties = Map::new();
        properties.insert(fields::ORDER_ID.to_string(), props::title(&new_order.order_id));
        properties.insert(fields::CLIENT.to_string(), props::relation(&new_order.client_id));
        properties.insert(
            fields::UNIT_NUMBER.to_string(),
            props::rich_text(&new_order.unit_number),
        );
        properties.insert(
            fields::TRUCK_MODEL.to_string(),
            props::relation(&new_order.truck_model_id),
        );
        properties.insert(
            fields::GLASS_POSITION.to_string(),
            props::select(new_order.glass_position.as_str()),
        );
        properties.insert(
            fields::STATUS.to_string(),
            props::select(OrderStatus::Pendiente.as_str()),
        );
        if let Some(price) = new_order.price.and_then(|p| p.to_f64()) {
            properties.insert(fields::PRICE.to_string(), props::number(price));
        }
        if let Some(notes) = new_order.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            properties.insert(fields::NOTES.to_string(), props::rich_text(notes));
        }

        let page = self.notion.create_page(&self.data_source, properties).await?;
        log::info!("🆕 Orden {} creada ({})", new_order.order_id, page.id);
        Ok(Order::from_page(&page))
    }

    /// Listar órdenes con filtros opcionales de estado y cliente
    pub async fn list(&self, status: Option<&str>, client_id: Option<&str>) -> AppResult<Vec<Order>> {
        let mut filters = Vec::new();
        if let Some(status) = status {
            filters.push(filter::select_equals(fields::STATUS, status));
        }
        if let Some(client_id) = client_id {
            filters.push(filter::relation_contains(fields::CLIENT, client_id));
        }
        self.query(filters).await
    }

    pub async fn find_by_id(&self, page_id: &str) -> AppResult<Order> {
        let page = self
            .notion
            .retrieve_page(page_id)
            .await
            .map_err(|e| not_found_as_order(e, page_id))?;
        Ok(Order::from_page(&page))
    }

    /// Escribir el estado tal cual lo envió el cliente
    pub async fn update_status(
        &self,
        page_id: &str,
        status: &str,
        note: Option<&str>,
    ) -> AppResult<Order> {
        let mut properties = Map::new();
        properties.insert(fields::STATUS.to_string(), props::select(status));
        if let Some(note) = note {
            properties.insert(fields::INVENTORY_NOTE.to_string(), props::rich_text(note));
        }
        self.update(page_id, properties).await
    }

    pub async fn schedule(&self, page_id: &str, crew_id: &str, schedule_date: &str) -> AppResult<Order> {
        let mut properties = Map::new();
        properties.insert(fields::ASSIGNED_CREW.to_string(), props::relation(crew_id));
        properties.insert(fields::SCHEDULE_DATE.to_string(), props::date(schedule_date));
        properties.insert(
            fields::STATUS.to_string(),
            props::select(OrderStatus::Programado.as_str()),
        );
        self.update(page_id, properties).await
    }

    /// Sobrescribir el snapshot completo de progreso (última escritura gana)
    pub async fn save_progress(&self, page_id: &str, progress: &JobProgress) -> AppResult<Order> {
        let blob = serde_json::to_string(progress)
            .map_err(|e| AppError::Internal(format!("Cannot serialize job progress: {}", e)))?;

        let mut properties = Map::new();
        properties.insert(fields::JOB_PROGRESS.to_string(), props::rich_text(&blob));
        self.update(page_id, properties).await
    }

    pub async fn complete(&self, page_id: &str, completion: &JobCompletion) -> AppResult<Order> {
        let before = completion
            .before_photos
            .iter()
            .enumerate()
            .map(|(i, url)| (format!("before_{}.jpg", i + 1), url.as_str()));
        let after = completion
            .after_photos
            .iter()
            .enumerate()
            .map(|(i, url)| (format!("after_{}.jpg", i + 1), url.as_str()));

        let mut properties = Map::new();
        properties.insert(fields::BEFORE_PHOTOS.to_string(), props::external_files(before));
        properties.insert(fields::AFTER_PHOTOS.to_string(), props::external_files(after));
        properties.insert(
            fields::CUSTOMER_SIGNATURE.to_string(),
            props::external_files([("signature.png".to_string(), completion.signature_url.as_str())]),
        );
        properties.insert(
            fields::CUSTOMER_NAME.to_string(),
            props::rich_text(completion.customer_name.trim()),
        );
        properties.insert(
            fields::GPS_LOCATION.to_string(),
            props::rich_text(&completion.gps_location.to_notion_text()),
        );
        properties.insert(
            fields::COMPLETION_TIME.to_string(),
            props::date(&completion.completed_at.to_rfc3339()),
        );
        properties.insert(
            fields::COMPLETED_BY.to_string(),
            props::rich_text(&completion.completed_by),
        );
        properties.insert(
            fields::STATUS.to_string(),
            props::select(OrderStatus::Completado.as_str()),
        );
        properties.insert(fields::JOB_PROGRESS.to_string(), props::empty_rich_text());

        self.update(page_id, properties).await
    }

    /// Órdenes `Completado`; el rango sobre `Completion Time` aplica sólo
    /// cuando vienen ambas fechas
    pub async fn completed(
        &self,
        client_id: Option<&str>,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> AppResult<Vec<Order>> {
        let mut filters = vec![filter::select_equals(
            fields::STATUS,
            OrderStatus::Completado.as_str(),
        )];
        if let Some(client_id) = client_id {
            filters.push(filter::relation_contains(fields::CLIENT, client_id));
        }
        if let Some((start, end)) = range {
            filters.push(filter::date_between(
                fields::COMPLETION_TIME,
                &start.format("%Y-%m-%d").to_string(),
                &end.format("%Y-%m-%d").to_string(),
            ));
        }
        self.query(filters).await
    }

    /// Trabajos programados de un equipo
    pub async fn crew_jobs(&self, crew_id: &str) -> AppResult<Vec<Order>> {
        self.query(vec![
            filter::relation_contains(fields::ASSIGNED_CREW, crew_id),
            filter::select_equals(fields::STATUS, OrderStatus::Programado.as_str()),
        ])
        .await
    }

    pub async fn mark_invoiced(
        &self,
        page_id: &str,
        invoice_number: &str,
        invoice_date: NaiveDate,
        pdf_url: &str,
        sent_at: DateTime<Utc>,
    ) -> AppResult<Order> {
        let mut properties = Map::new();
        properties.insert(
            fields::STATUS.to_string(),
            props::select(OrderStatus::Facturado.as_str()),
        );
        properties.insert(fields::INVOICE_NUMBER.to_string(), props::rich_text(invoice_number));
        properties.insert(
            fields::INVOICE_DATE.to_string(),
            props::date(&invoice_date.format("%Y-%m-%d").to_string()),
        );
        properties.insert(fields::INVOICE_PDF_URL.to_string(), props::url(pdf_url));
        properties.insert(
            fields::INVOICE_SENT_DATE.to_string(),
            props::date(&sent_at.to_rfc3339()),
        );
        self.update(page_id, properties).await
    }
}

fn not_found_as_order(error: AppError, page_id: &str) -> AppError {
    match error {
        AppError::NotFound(_) => AppError::NotFound(format!("Order '{}' not found", page_id)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegrationsConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repository(server: &MockServer) -> OrderRepository {
        let config = IntegrationsConfig::for_base_url(&server.uri());
        let notion = NotionClient::new(reqwest::Client::new(), &config.notion);
        OrderRepository::new(notion, &config.notion.databases)
    }

    fn order_page(title: &str) -> Value {
        json!({
            "object": "page",
            "id": format!("page-{}", title),
            "properties": {
                "Order ID": { "type": "title", "title": [{ "plain_text": title }] }
            }
        })
    }

    #[tokio::test]
    async fn next_order_id_scans_every_page_of_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/data_sources/orders-db/query"))
            .and(body_partial_json(json!({ "start_cursor": "cursor-2" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [order_page("ORD-2025-0120")],
                "has_more": false,
                "next_cursor": null
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/data_sources/orders-db/query"))
            .and(body_partial_json(json!({
                "filter": { "property": "Order ID", "title": { "starts_with": "ORD-2025-" } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [order_page("ORD-2025-0007"), order_page("ORD-2025-0099")],
                "has_more": true,
                "next_cursor": "cursor-2"
            })))
            .mount(&server)
            .await;

        let next = repository(&server).next_order_id(2025).await.unwrap();
        assert_eq!(next, "ORD-2025-0121");
    }

    #[tokio::test]
    async fn update_status_writes_the_status_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/pages/page-1"))
            .and(body_partial_json(json!({
                "properties": {
                    "Status": { "select": { "name": "Sin Stock" } },
                    "Inventory Note": { "rich_text": [{ "text": { "content": "Llega el lunes" } }] }
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "page-1",
                "properties": { "Status": { "select": { "name": "Sin Stock" } } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let order = repository(&server)
            .update_status("page-1", "Sin Stock", Some("Llega el lunes"))
            .await
            .unwrap();
        assert_eq!(order.status, "Sin Stock");
    }

    #[tokio::test]
    async fn missing_pages_are_reported_as_missing_orders() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/pages/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "object": "error",
                "code": "object_not_found",
                "message": "Could not find page with ID: gone."
            })))
            .mount(&server)
            .await;

        let err = repository(&server).find_by_id("gone").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "Order 'gone' not found"));
    }
}
