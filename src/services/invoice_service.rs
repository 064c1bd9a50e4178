//! Lógica de facturación independiente de las APIs externas

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::client::Client;
use crate::models::invoice::{InvoiceData, InvoiceItem};
use crate::models::order::Order;
use crate::models::truck_model::TruckModel;

pub const UNKNOWN_TRUCK_MODEL: &str = "Unknown";

/// Restringir las órdenes a los IDs de página pedidos; una lista vacía no filtra
pub fn select_orders(orders: Vec<Order>, order_ids: &[String]) -> Vec<Order> {
    if order_ids.is_empty() {
        return orders;
    }
    orders
        .into_iter()
        .filter(|order| order_ids.iter().any(|id| id == &order.id))
        .collect()
}

/// Partidas de la factura, una por orden
pub fn build_items(orders: &[Order], truck_models: &[TruckModel]) -> Vec<InvoiceItem> {
    let models: HashMap<&str, &str> = truck_models
        .iter()
        .map(|truck| (truck.id.as_str(), truck.model.as_str()))
        .collect();

    orders
        .iter()
        .map(|order| InvoiceItem {
            order_id: order.order_id.clone(),
            unit_number: order.unit_number.clone(),
            truck_model: models
                .get(order.truck_model_id.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or(&UNKNOWN_TRUCK_MODEL)
                .to_string(),
            glass_position: order.glass_position.clone(),
            price: order.billable_price(),
        })
        .collect()
}

pub fn build_invoice(
    invoice_number: String,
    invoice_date: NaiveDate,
    client: &Client,
    items: Vec<InvoiceItem>,
) -> InvoiceData {
    InvoiceData {
        invoice_number,
        invoice_date,
        client_name: client.name.clone(),
        client_address: client.address.clone(),
        client_phone: client.phone.clone(),
        items,
    }
}

pub fn invoice_file_name(invoice_number: &str) -> String {
    format!("{}.pdf", invoice_number)
}

/// Texto del mensaje de WhatsApp con la liga al PDF
pub fn whatsapp_message(client_name: &str, invoice_number: &str, pdf_url: &str) -> String {
    format!(
        "Hola {},\n\nAdjuntamos su factura #{}.\n\n📄 Descargar PDF:\n{}\n\nGracias por su confianza.",
        client_name, invoice_number, pdf_url
    )
}
