//! Cliente HTTP para la API de Notion
//! 
//! Notion es la única fuente de verdad del sistema: no hay cache, cada
//! lectura vuelve a consultar la API. Se usan las fuentes de datos
//! (`data_sources`) y páginas de la versión 2025-09-03.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Map, Value};

use crate::config::NotionConfig;
use crate::models::notion::{NotionPage, QueryResponse};
use crate::utils::errors::{AppError, AppResult};

/// Tamaño de página máximo permitido por Notion
const PAGE_SIZE: u32 = 100;

/// Cliente HTTP para Notion
#[derive(Clone)]
pub struct NotionClient {
    client: Client,
    base_url: String,
    api_key: String,
    version: String,
}

impl NotionClient {
    pub fn new(client: Client, config: &NotionConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            version: config.version.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }

    /// Agregar headers comunes, enviar y convertir errores de la API
    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.version)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Notion request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or(body);

        log::error!("❌ Notion respondió {}: {}", status, message);

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(message));
        }
        Err(AppError::ExternalApi(format!("Notion API error ({}): {}", status, message)))
    }

    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> AppResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid Notion response: {}", e)))
    }

    /// Consultar una página de resultados de una fuente de datos
    pub async fn query_page(
        &self,
        data_source_id: &str,
        filter: Option<&Value>,
        start_cursor: Option<&str>,
    ) -> AppResult<QueryResponse> {
        let mut body = Map::new();
        body.insert("page_size".to_string(), json!(PAGE_SIZE));
        if let Some(filter) = filter {
            body.insert("filter".to_string(), filter.clone());
        }
        if let Some(cursor) = start_cursor {
            body.insert("start_cursor".to_string(), json!(cursor));
        }

        let request = self
            .client
            .post(self.url(&format!("data_sources/{}/query", data_source_id)))
            .json(&body);

        Self::parse(self.send(request).await?).await
    }

    /// Consultar todos los resultados, siguiendo la paginación
    pub async fn query_all(
        &self,
        data_source_id: &str,
        filter: Option<Value>,
    ) -> AppResult<Vec<NotionPage>> {
        let mut pages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let batch = self
                .query_page(data_source_id, filter.as_ref(), cursor.as_deref())
                .await?;
            pages.extend(batch.results);

            match (batch.has_more, batch.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        log::debug!("📄 {} páginas leídas de {}", pages.len(), data_source_id);
        Ok(pages)
    }

    /// Obtener una página por ID
    pub async fn retrieve_page(&self, page_id: &str) -> AppResult<NotionPage> {
        let request = self.client.get(self.url(&format!("pages/{}", page_id)));
        Self::parse(self.send(request).await?).await
    }

    /// Crear una página dentro de una fuente de datos
    pub async fn create_page(
        &self,
        data_source_id: &str,
        properties: Map<String, Value>,
    ) -> AppResult<NotionPage> {
        let request = self.client.post(self.url("pages")).json(&json!({
            "parent": { "data_source_id": data_source_id },
            "properties": properties,
        }));
        Self::parse(self.send(request).await?).await
    }

    /// Actualizar propiedades de una página existente
    pub async fn update_page(
        &self,
        page_id: &str,
        properties: Map<String, Value>,
    ) -> AppResult<NotionPage> {
        let request = self
            .client
            .patch(self.url(&format!("pages/{}", page_id)))
            .json(&json!({ "properties": properties }));
        Self::parse(self.send(request).await?).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntegrationsConfig;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> NotionClient {
        let config = IntegrationsConfig::for_base_url(&server.uri());
        NotionClient::new(Client::new(), &config.notion)
    }

    #[tokio::test]
    async fn query_all_follows_cursors() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/data_sources/orders-db/query"))
            .and(body_partial_json(json!({ "start_cursor": "cursor-2" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "id": "p3", "properties": {} }],
                "has_more": false,
                "next_cursor": null
            })))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/data_sources/orders-db/query"))
            .and(header("Notion-Version", "2025-09-03"))
            .and(header("Authorization", "Bearer secret_notion"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{ "id": "p1", "properties": {} }, { "id": "p2", "properties": {} }],
                "has_more": true,
                "next_cursor": "cursor-2"
            })))
            .mount(&server)
            .await;

        let pages = client_for(&server).await.query_all("orders-db", None).await.unwrap();
        let ids: Vec<_> = pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
    }

    #[tokio::test]
    async fn missing_page_maps_to_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/pages/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "object": "error",
                "status": 404,
                "code": "object_not_found",
                "message": "Could not find page with ID: missing."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).await.retrieve_page("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg.contains("Could not find page")));
    }

    #[tokio::test]
    async fn api_errors_surface_the_remote_message() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/v1/pages/p1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "object": "error",
                "status": 400,
                "code": "validation_error",
                "message": "Status is expected to be select."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .update_page("p1", Map::new())
            .await
            .unwrap_err();
        match err {
            AppError::ExternalApi(msg) => assert!(msg.contains("Status is expected to be select.")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
