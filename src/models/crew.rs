//! Modelo de Crew (equipo de instalación en campo)

use serde::Serialize;

use super::notion::NotionPage;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crew {
    pub id: String,
    pub name: String,
    pub lead_installer: String,
    pub phone: String,
    pub status: String,
}

impl Crew {
    pub fn from_page(page: &NotionPage) -> Self {
        let name = page.title("Crew Name");
        Self {
            id: page.id.clone(),
            name: if name.is_empty() { "Unnamed".to_string() } else { name },
            lead_installer: page.rich_text("Lead Installer"),
            phone: page.phone("Phone"),
            status: page.select("Status").unwrap_or_else(|| "Available".to_string()),
        }
    }
}
