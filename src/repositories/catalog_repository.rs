//! Catálogos de referencia: clientes, modelos de camión y equipos

use crate::clients::NotionClient;
use crate::config::NotionDatabases;
use crate::models::client::Client;
use crate::models::crew::Crew;
use crate::models::truck_model::TruckModel;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct CatalogRepository {
    notion: NotionClient,
    databases: NotionDatabases,
}

impl CatalogRepository {
    pub fn new(notion: NotionClient, databases: &NotionDatabases) -> Self {
        Self {
            notion,
            databases: databases.clone(),
        }
    }

    pub async fn clients(&self) -> AppResult<Vec<Client>> {
        let pages = self.notion.query_all(&self.databases.clients, None).await?;
        Ok(pages.iter().map(Client::from_page).collect())
    }

    pub async fn truck_models(&self) -> AppResult<Vec<TruckModel>> {
        let pages = self
            .notion
            .query_all(&self.databases.truck_models, None)
            .await?;
        Ok(pages.iter().map(TruckModel::from_page).collect())
    }

    pub async fn crews(&self) -> AppResult<Vec<Crew>> {
        let pages = self.notion.query_all(&self.databases.crews, None).await?;
        Ok(pages.iter().map(Crew::from_page).collect())
    }

    /// Clientes y modelos de camión en paralelo
    pub async fn clients_and_truck_models(&self) -> AppResult<(Vec<Client>, Vec<TruckModel>)> {
        futures::try_join!(self.clients(), self.truck_models())
    }
}
