use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

// Lista genérica de un catálogo
#[derive(Debug, Serialize)]
pub struct CatalogResponse<T> {
    pub success: bool,
    pub count: usize,
    pub items: Vec<T>,
}

impl<T> From<Vec<T>> for CatalogResponse<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            success: true,
            count: items.len(),
            items,
        }
    }
}

// Fila de la tabla de precios con nombres resueltos
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingDebugRow {
    pub id: String,
    pub client: String,
    pub client_ids: Vec<String>,
    pub truck_model: String,
    pub truck_ids: Vec<String>,
    pub glass_position: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct PricingDebugResponse {
    pub success: bool,
    pub total: usize,
    pub grouped: BTreeMap<String, Vec<PricingDebugRow>>,
    pub raw: Vec<PricingDebugRow>,
}
