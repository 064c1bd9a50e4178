use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;

use crate::dto::catalog_dto::{CatalogResponse, PricingDebugResponse, PricingDebugRow};
use crate::models::client::Client;
use crate::models::crew::Crew;
use crate::models::order::GlassPosition;
use crate::models::truck_model::TruckModel;
use crate::repositories::{CatalogRepository, PricingRepository};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct CatalogController {
    catalog: CatalogRepository,
    pricing: PricingRepository,
}

impl CatalogController {
    pub fn new(state: &AppState) -> Self {
        Self {
            catalog: state.catalog(),
            pricing: state.pricing(),
        }
    }

    pub async fn clients(&self) -> Result<CatalogResponse<Client>, AppError> {
        Ok(self.catalog.clients().await?.into())
    }

    pub async fn truck_models(&self) -> Result<CatalogResponse<TruckModel>, AppError> {
        Ok(self.catalog.truck_models().await?.into())
    }

    pub async fn crews(&self) -> Result<CatalogResponse<Crew>, AppError> {
        Ok(self.catalog.crews().await?.into())
    }

    pub fn glass_positions(&self) -> CatalogResponse<&'static str> {
        GlassPosition::ALL.map(|p| p.as_str()).to_vec().into()
    }

    /// Tabla de precios con nombres resueltos, agrupada por cliente
    pub async fn pricing_debug(&self) -> Result<PricingDebugResponse, AppError> {
        let (rows, (clients, truck_models)) = futures::try_join!(
            self.pricing.all(),
            self.catalog.clients_and_truck_models()
        )?;

        let client_names: HashMap<&str, &str> = clients
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();
        let truck_names: HashMap<&str, String> = truck_models
            .iter()
            .map(|t| (t.id.as_str(), t.display_name()))
            .collect();

        let raw: Vec<PricingDebugRow> = rows
            .into_iter()
            .map(|row| PricingDebugRow {
                client: resolve_names(&row.client_ids, "NO CLIENT", |id| {
                    client_names.get(id).map(|n| n.to_string())
                }),
                truck_model: resolve_names(&row.truck_model_ids, "NO TRUCK", |id| {
                    truck_names.get(id).cloned()
                }),
                glass_position: row
                    .glass_position
                    .unwrap_or_else(|| "NO GLASS POSITION".to_string()),
                price: row.price.unwrap_or(Decimal::ZERO),
                id: row.id,
                client_ids: row.client_ids,
                truck_ids: row.truck_model_ids,
            })
            .collect();

        let mut grouped: BTreeMap<String, Vec<PricingDebugRow>> = BTreeMap::new();
        for row in &raw {
            grouped.entry(row.client.clone()).or_default().push(row.clone());
        }

        Ok(PricingDebugResponse {
            success: true,
            total: raw.len(),
            grouped,
            raw,
        })
    }
}

// Nombres de todas las páginas relacionadas, separados por coma. Un ID sin
// nombre conocido se muestra tal cual.
fn resolve_names(ids: &[String], missing: &str, name_of: impl Fn(&str) -> Option<String>) -> String {
    if ids.is_empty() {
        return missing.to_string();
    }
    ids.iter()
        .map(|id| name_of(id).unwrap_or_else(|| id.clone()))
        .collect::<Vec<_>>()
        .join(", ")
}
