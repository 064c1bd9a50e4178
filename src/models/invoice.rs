//! Modelo de factura
//! 
//! Datos que se imprimen en el PDF de la factura mensual de un cliente.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    pub order_id: String,
    pub unit_number: String,
    pub truck_model: String,
    pub glass_position: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceData {
    pub invoice_number: String,
    pub invoice_date: NaiveDate,
    pub client_name: String,
    pub client_address: String,
    pub client_phone: String,
    pub items: Vec<InvoiceItem>,
}

impl InvoiceData {
    pub fn total(&self) -> Decimal {
        self.items.iter().map(|item| item.price).sum()
    }
}
