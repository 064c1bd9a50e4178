//! Modelo de Client (empresa a la que se le factura)

use serde::Serialize;

use super::notion::NotionPage;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl Client {
    pub fn from_page(page: &NotionPage) -> Self {
        let name = page.title("Company Name");
        Self {
            id: page.id.clone(),
            name: if name.is_empty() { "Unnamed".to_string() } else { name },
            phone: page.phone("Phone"),
            address: page.rich_text("Address"),
        }
    }
}
