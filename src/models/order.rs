//! Modelo de Order
//! 
//! Una orden es un trabajo de reemplazo de vidrio. Este módulo define los
//! enums de estado y posición, el snapshot de progreso de trabajo y el
//! mapeo desde una página de la base de órdenes de Notion.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::notion::NotionPage;

/// Nombres de las propiedades de la base de órdenes
pub mod fields {
    pub const ORDER_ID: &str = "Order ID";
    pub const CLIENT: &str = "Client";
    pub const UNIT_NUMBER: &str = "Unit Number";
    pub const TRUCK_MODEL: &str = "Truck Model";
    pub const GLASS_POSITION: &str = "Glass Position";
    pub const STATUS: &str = "Status";
    pub const PRICE: &str = "Price";
    pub const NOTES: &str = "Notes";
    pub const INVENTORY_NOTE: &str = "Inventory Note";
    pub const ASSIGNED_CREW: &str = "Assigned Crew";
    pub const SCHEDULE_DATE: &str = "Schedule Date";
    pub const JOB_PROGRESS: &str = "Job Progress";
    pub const BEFORE_PHOTOS: &str = "Before Photos";
    pub const AFTER_PHOTOS: &str = "After Photos";
    pub const CUSTOMER_SIGNATURE: &str = "Customer Signature";
    pub const CUSTOMER_NAME: &str = "Customer Name";
    pub const GPS_LOCATION: &str = "GPS Location";
    pub const COMPLETION_TIME: &str = "Completion Time";
    pub const COMPLETED_BY: &str = "Completed By";
    pub const INVOICE_NUMBER: &str = "Invoice Number";
    pub const INVOICE_DATE: &str = "Invoice Date";
    pub const INVOICE_PDF_URL: &str = "Invoice PDF URL";
    pub const INVOICE_SENT_DATE: &str = "Invoice Sent Date";
}

/// Estado de la orden.
///
/// Flujo documentado: `Pendiente → {En Stock | Sin Stock} → Programado →
/// Completado → Facturado`, con `Sin Stock → En Stock` como único retroceso.
/// El servidor no lo impone: update-status escribe el valor recibido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pendiente,
    #[serde(rename = "En Stock")]
    EnStock,
    #[serde(rename = "Sin Stock")]
    SinStock,
    Programado,
    Completado,
    Facturado,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pendiente,
        OrderStatus::EnStock,
        OrderStatus::SinStock,
        OrderStatus::Programado,
        OrderStatus::Completado,
        OrderStatus::Facturado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "Pendiente",
            OrderStatus::EnStock => "En Stock",
            OrderStatus::SinStock => "Sin Stock",
            OrderStatus::Programado => "Programado",
            OrderStatus::Completado => "Completado",
            OrderStatus::Facturado => "Facturado",
        }
    }

    /// Si `next` es un paso del flujo documentado (o el mismo estado)
    pub fn follows_workflow(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        *self == next
            || matches!(
                (self, next),
                (Pendiente, EnStock)
                    | (Pendiente, SinStock)
                    | (SinStock, EnStock)
                    | (EnStock, Programado)
                    | (Programado, Completado)
                    | (Completado, Facturado)
            )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("Unknown order status: {}", s))
    }
}

/// Posición del vidrio en el camión
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlassPosition {
    Parabrisas,
    #[serde(rename = "Lateral Izq")]
    LateralIzq,
    #[serde(rename = "Lateral Der")]
    LateralDer,
    Trasero,
}

impl GlassPosition {
    pub const ALL: [GlassPosition; 4] = [
        GlassPosition::Parabrisas,
        GlassPosition::LateralIzq,
        GlassPosition::LateralDer,
        GlassPosition::Trasero,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GlassPosition::Parabrisas => "Parabrisas",
            GlassPosition::LateralIzq => "Lateral Izq",
            GlassPosition::LateralDer => "Lateral Der",
            GlassPosition::Trasero => "Trasero",
        }
    }
}

impl fmt::Display for GlassPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GlassPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GlassPosition::ALL
            .into_iter()
            .find(|position| position.as_str() == s)
            .ok_or_else(|| format!("Unknown glass position: {}", s))
    }
}

/// Coordenadas GPS capturadas al terminar el trabajo
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GpsLocation {
    pub lat: f64,
    pub lng: f64,
}

impl GpsLocation {
    /// Formato almacenado en Notion: `"lat,lng"`
    pub fn to_notion_text(&self) -> String {
        format!("{},{}", self.lat, self.lng)
    }

    pub fn parse(text: &str) -> Option<Self> {
        let (lat, lng) = text.split_once(',')?;
        Some(Self {
            lat: lat.trim().parse().ok()?,
            lng: lng.trim().parse().ok()?,
        })
    }
}

/// Snapshot del trabajo en campo, guardado tal cual en `Job Progress`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobProgress {
    pub current_step: u32,
    pub before_photos: Vec<String>,
    pub after_photos: Vec<String>,
    pub signature_url: String,
    pub customer_name: String,
    pub gps_location: GpsLocation,
    pub last_updated: Option<DateTime<Utc>>,
}

impl JobProgress {
    /// Blob guardado; `None` si está vacío o no es JSON válido
    pub fn from_blob(blob: &str) -> Option<Self> {
        if blob.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(blob) {
            Ok(progress) => Some(progress),
            Err(e) => {
                log::warn!("⚠️ Job Progress ilegible, se ignora: {}", e);
                None
            }
        }
    }
}

/// Orden de trabajo
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// ID de la página en Notion
    pub id: String,
    /// ID legible (`ORD-2025-0001`)
    pub order_id: String,
    pub client_id: String,
    pub unit_number: String,
    pub truck_model_id: String,
    pub glass_position: String,
    pub status: String,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    pub notes: String,
    pub inventory_note: Option<String>,
    pub assigned_crew: Option<String>,
    pub schedule_date: Option<String>,
    pub job_progress: Option<JobProgress>,
    pub before_photos: Vec<String>,
    pub after_photos: Vec<String>,
    pub signature_url: Option<String>,
    pub customer_name: Option<String>,
    pub gps_location: Option<GpsLocation>,
    pub completed_at: Option<String>,
    pub completed_by: Option<String>,
    pub invoice_number: Option<String>,
    pub invoice_date: Option<String>,
    pub invoice_pdf_url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Mapear una página de la base de órdenes
    pub fn from_page(page: &NotionPage) -> Self {
        Self {
            id: page.id.clone(),
            order_id: page.title(fields::ORDER_ID),
            client_id: page.first_relation(fields::CLIENT).unwrap_or_default(),
            unit_number: page.rich_text(fields::UNIT_NUMBER),
            truck_model_id: page.first_relation(fields::TRUCK_MODEL).unwrap_or_default(),
            glass_position: page.select(fields::GLASS_POSITION).unwrap_or_default(),
            status: page
                .select(fields::STATUS)
                .unwrap_or_else(|| OrderStatus::Pendiente.as_str().to_string()),
            price: page.number(fields::PRICE).and_then(Decimal::from_f64),
            notes: page.rich_text(fields::NOTES),
            inventory_note: page.optional_text(fields::INVENTORY_NOTE),
            assigned_crew: page.first_relation(fields::ASSIGNED_CREW),
            schedule_date: page.date_start(fields::SCHEDULE_DATE),
            job_progress: JobProgress::from_blob(&page.rich_text(fields::JOB_PROGRESS)),
            before_photos: page.file_urls(fields::BEFORE_PHOTOS),
            after_photos: page.file_urls(fields::AFTER_PHOTOS),
            signature_url: page.file_urls(fields::CUSTOMER_SIGNATURE).into_iter().next(),
            customer_name: page.optional_text(fields::CUSTOMER_NAME),
            gps_location: page
                .optional_text(fields::GPS_LOCATION)
                .and_then(|text| GpsLocation::parse(&text)),
            completed_at: page.date_start(fields::COMPLETION_TIME),
            completed_by: page.optional_text(fields::COMPLETED_BY),
            invoice_number: page.optional_text(fields::INVOICE_NUMBER),
            invoice_date: page.date_start(fields::INVOICE_DATE),
            invoice_pdf_url: page.url(fields::INVOICE_PDF_URL),
            created_at: page.created_time,
            updated_at: page.last_edited_time,
        }
    }

    /// Estado conocido, si el texto guardado pertenece al flujo
    pub fn known_status(&self) -> Option<OrderStatus> {
        self.status.parse().ok()
    }

    /// Precio para facturación: una orden sin precio cuenta como 0
    pub fn billable_price(&self) -> Decimal {
        self.price.unwrap_or(Decimal::ZERO)
    }
}

/// Datos para crear una orden
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub client_id: String,
    pub unit_number: String,
    pub truck_model_id: String,
    pub glass_position: GlassPosition,
    pub price: Option<Decimal>,
    pub notes: Option<String>,
}

/// Evidencia final de un trabajo terminado
#[derive(Debug, Clone)]
pub struct JobCompletion {
    pub before_photos: Vec<String>,
    pub after_photos: Vec<String>,
    pub signature_url: String,
    pub customer_name: String,
    pub gps_location: GpsLocation,
    pub completed_by: String,
    pub completed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_names_round_trip_through_from_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("Cancelado".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn documented_workflow_edges() {
        use OrderStatus::*;

        assert!(Pendiente.follows_workflow(EnStock));
        assert!(Pendiente.follows_workflow(SinStock));
        assert!(SinStock.follows_workflow(EnStock));
        assert!(Completado.follows_workflow(Facturado));
        assert!(!EnStock.follows_workflow(SinStock));
        assert!(!Facturado.follows_workflow(Pendiente));
        assert!(!Pendiente.follows_workflow(Completado));
    }

    #[test]
    fn glass_positions_serialize_with_display_names() {
        assert_eq!(
            serde_json::to_value(GlassPosition::LateralIzq).unwrap(),
            json!("Lateral Izq")
        );
        assert_eq!("Trasero".parse::<GlassPosition>(), Ok(GlassPosition::Trasero));
    }

    #[test]
    fn gps_text_parses_back() {
        let gps = GpsLocation { lat: 19.4326, lng: -99.1332 };
        assert_eq!(GpsLocation::parse(&gps.to_notion_text()), Some(gps));
        assert_eq!(GpsLocation::parse("sin señal"), None);
    }

    #[test]
    fn maps_order_page() {
        let page: NotionPage = serde_json::from_value(json!({
            "id": "9a1f0c8e-0000-4000-8000-000000000001",
            "created_time": "2025-02-01T10:00:00.000Z",
            "properties": {
                "Order ID": { "title": [{ "plain_text": "ORD-2025-0042" }] },
                "Client": { "relation": [{ "id": "client-1" }] },
                "Unit Number": { "rich_text": [{ "plain_text": "T-118" }] },
                "Truck Model": { "relation": [{ "id": "truck-1" }] },
                "Glass Position": { "select": { "name": "Parabrisas" } },
                "Status": { "select": { "name": "Programado" } },
                "Price": { "number": 3450.75 },
                "Assigned Crew": { "relation": [{ "id": "crew-7" }] },
                "Schedule Date": { "date": { "start": "2025-02-12" } },
                "GPS Location": { "rich_text": [{ "plain_text": "19.4,-99.1" }] },
                "Job Progress": { "rich_text": [{ "plain_text": "{\"currentStep\":2,\"beforePhotos\":[\"a\",\"b\",\"\"]}" }] }
            }
        }))
        .unwrap();

        let order = Order::from_page(&page);
        assert_eq!(order.order_id, "ORD-2025-0042");
        assert_eq!(order.known_status(), Some(OrderStatus::Programado));
        assert_eq!(order.price, Decimal::from_str("3450.75").ok());
        assert_eq!(order.assigned_crew.as_deref(), Some("crew-7"));
        assert_eq!(order.gps_location, Some(GpsLocation { lat: 19.4, lng: -99.1 }));

        let progress = order.job_progress.unwrap();
        assert_eq!(progress.current_step, 2);
        assert_eq!(progress.before_photos.len(), 3);
        assert!(progress.after_photos.is_empty());
    }

    #[test]
    fn missing_status_defaults_to_pendiente_and_bad_progress_is_dropped() {
        let page: NotionPage = serde_json::from_value(json!({
            "id": "page-2",
            "properties": {
                "Job Progress": { "rich_text": [{ "plain_text": "{not json" }] }
            }
        }))
        .unwrap();

        let order = Order::from_page(&page);
        assert_eq!(order.status, "Pendiente");
        assert!(order.job_progress.is_none());
        assert_eq!(order.billable_price(), Decimal::ZERO);
    }
}
