//! Repositorio de la tabla de precios

use rust_decimal::Decimal;

use crate::clients::NotionClient;
use crate::config::NotionDatabases;
use crate::models::notion::filter;
use crate::models::pricing::{fields, find_price, PricingRow};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct PricingRepository {
    notion: NotionClient,
    data_source: String,
}

impl PricingRepository {
    pub fn new(notion: NotionClient, databases: &NotionDatabases) -> Self {
        Self {
            notion,
            data_source: databases.pricing.clone(),
        }
    }

    /// Precio para (cliente, modelo, posición); `None` si no hay fila exacta.
    /// No hay precio por defecto.
    pub async fn lookup(
        &self,
        client_id: &str,
        truck_model_id: &str,
        glass_position: &str,
    ) -> AppResult<Option<Decimal>> {
        let query = filter::all(vec![
            filter::relation_contains(fields::CLIENT, client_id),
            filter::relation_contains(fields::TRUCK_MODEL, truck_model_id),
            filter::select_equals(fields::GLASS_POSITION, glass_position),
        ]);

        let response = self
            .notion
            .query_page(&self.data_source, query.as_ref(), None)
            .await?;
        let rows: Vec<PricingRow> = response.results.iter().map(PricingRow::from_page).collect();

        let price = find_price(&rows, client_id, truck_model_id, glass_position);
        log::debug!(
            "💲 Precio para {}/{}/{}: {:?}",
            client_id,
            truck_model_id,
            glass_position,
            price
        );
        Ok(price)
    }

    pub async fn all(&self) -> AppResult<Vec<PricingRow>> {
        let pages = self.notion.query_all(&self.data_source, None).await?;
        Ok(pages.iter().map(PricingRow::from_page).collect())
    }
}
