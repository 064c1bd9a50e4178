//! Modelo de TruckModel

use serde::Serialize;

use super::notion::NotionPage;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruckModel {
    pub id: String,
    pub model: String,
    pub manufacturer: String,
}

impl TruckModel {
    pub fn from_page(page: &NotionPage) -> Self {
        let model = page.title("Model Name");
        Self {
            id: page.id.clone(),
            model: if model.is_empty() { "Unnamed".to_string() } else { model },
            manufacturer: page.select("Manufacturer").unwrap_or_default(),
        }
    }

    /// Nombre para mostrar: fabricante y modelo
    pub fn display_name(&self) -> String {
        format!("{} {}", self.manufacturer, self.model).trim().to_string()
    }
}
