//! Shared application state
//! 
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum: la configuración y los clientes de cada
//! servicio externo, todos sobre un único cliente HTTP.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;

use crate::clients::{ClerkClient, CloudinaryClient, NotionClient, TwilioClient};
use crate::config::environment::EnvironmentConfig;
use crate::middleware::rate_limit::RateLimitState;
use crate::repositories::{CatalogRepository, OrderRepository, PricingRepository};
use crate::services::session_service::SessionVerifier;
use crate::utils::errors::{AppError, AppResult};

/// Timeout de cada llamada a una API externa
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub notion: NotionClient,
    pub cloudinary: CloudinaryClient,
    pub clerk: ClerkClient,
    pub twilio: TwilioClient,
    pub sessions: SessionVerifier,
    pub rate_limit: RateLimitState,
    /// Bytes de la fuente del PDF de facturas
    pub invoice_font: Option<Arc<Vec<u8>>>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .user_agent(concat!("glass_workflow/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Configuration(format!("Cannot build HTTP client: {}", e)))?;

        let integrations = &config.integrations;
        let sessions = SessionVerifier::from_config(&integrations.clerk)?;

        let invoice_font = match config.invoice_font_path.as_deref() {
            Some(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    AppError::Configuration(format!("Cannot read INVOICE_FONT_PATH {}: {}", path, e))
                })?;
                log::info!("🔤 Fuente de facturas cargada desde {}", path);
                Some(Arc::new(bytes))
            }
            None => None,
        };

        if integrations.twilio.credentials().is_none() {
            log::warn!("⚠️ Twilio no configurado: el envío por WhatsApp responderá con error");
        }

        Ok(Self {
            notion: NotionClient::new(http_client.clone(), &integrations.notion),
            cloudinary: CloudinaryClient::new(http_client.clone(), &integrations.cloudinary),
            clerk: ClerkClient::new(http_client.clone(), &integrations.clerk),
            twilio: TwilioClient::new(http_client, &integrations.twilio),
            rate_limit: RateLimitState::new(&config),
            invoice_font,
            sessions,
            config,
        })
    }

    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.notion.clone(), &self.config.integrations.notion.databases)
    }

    pub fn pricing(&self) -> PricingRepository {
        PricingRepository::new(self.notion.clone(), &self.config.integrations.notion.databases)
    }

    pub fn catalog(&self) -> CatalogRepository {
        CatalogRepository::new(self.notion.clone(), &self.config.integrations.notion.databases)
    }
}
