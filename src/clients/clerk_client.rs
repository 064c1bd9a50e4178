//! Cliente HTTP para la Backend API de Clerk
//! 
//! La asignación de un usuario a un equipo vive en su `unsafe_metadata`
//! bajo la llave `notion_crew_id`.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::ClerkConfig;
use crate::utils::errors::{AppError, AppResult};

pub const CREW_METADATA_KEY: &str = "notion_crew_id";

#[derive(Debug, Clone, Deserialize)]
pub struct ClerkEmailAddress {
    pub email_address: String,
}

/// Usuario de Clerk (sólo los campos que usamos)
#[derive(Debug, Clone, Deserialize)]
pub struct ClerkUser {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<ClerkEmailAddress>,
    #[serde(default)]
    pub unsafe_metadata: Value,
}

impl ClerkUser {
    /// Equipo asignado al usuario, si lo tiene
    pub fn crew_id(&self) -> Option<String> {
        self.unsafe_metadata
            .get(CREW_METADATA_KEY)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}

#[derive(Clone)]
pub struct ClerkClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl ClerkClient {
    pub fn new(client: Client, config: &ClerkConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        }
    }

    async fn send(&self, request: RequestBuilder) -> AppResult<Response> {
        let response = request
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Clerk request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| {
                v["errors"][0]["long_message"]
                    .as_str()
                    .or_else(|| v["errors"][0]["message"].as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(message));
        }
        Err(AppError::ExternalApi(format!("Clerk API error ({}): {}", status, message)))
    }

    /// Buscar un usuario por email
    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<ClerkUser>> {
        let url = format!(
            "{}/v1/users?email_address={}",
            self.base_url,
            urlencoding::encode(email)
        );
        let users: Vec<ClerkUser> = self
            .send(self.client.get(&url))
            .await?
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid Clerk response: {}", e)))?;
        Ok(users.into_iter().next())
    }

    /// Obtener un usuario por ID
    pub async fn get_user(&self, user_id: &str) -> AppResult<ClerkUser> {
        let url = format!("{}/v1/users/{}", self.base_url, user_id);
        self.send(self.client.get(&url))
            .await?
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid Clerk response: {}", e)))
    }

    /// Asignar (o quitar, con `None`) el equipo de un usuario.
    /// Clerk mezcla la metadata; `null` elimina la llave.
    pub async fn set_crew(&self, user_id: &str, crew_id: Option<&str>) -> AppResult<ClerkUser> {
        let url = format!("{}/v1/users/{}/metadata", self.base_url, user_id);
        let body = json!({ "unsafe_metadata": { CREW_METADATA_KEY: crew_id } });
        self.send(self.client.patch(&url).json(&body))
            .await?
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid Clerk response: {}", e)))
    }
}
