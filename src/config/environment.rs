//! Configuración de variables de entorno
//! 
//! Este módulo maneja la configuración del servidor HTTP: entorno, host,
//! puerto, CORS, rate limiting y nivel de logs.

use anyhow::{Context, Result};
use std::env;

use super::integrations::IntegrationsConfig;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub log_level: String,
    pub cors_origins: Vec<String>,
    pub rate_limit_requests: u32,
    pub rate_limit_window: u64,
    /// Fuente TrueType para el PDF de facturas; sin ella se usa Helvetica
    pub invoice_font_path: Option<String>,
    pub integrations: IntegrationsConfig,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parse_var("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| split_list(&origins))
                .unwrap_or_default(),
            rate_limit_requests: parse_var("RATE_LIMIT_REQUESTS", 120)?,
            rate_limit_window: parse_var("RATE_LIMIT_WINDOW", 60)?,
            invoice_font_path: env::var("INVOICE_FONT_PATH")
                .ok()
                .filter(|path| !path.trim().is_empty()),
            integrations: IntegrationsConfig::from_env()?,
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección de escucha del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Nivel de logs para el subscriber de tracing
    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

/// Leer una variable obligatoria
pub(crate) fn required_var(name: &str) -> Result<String> {
    let value = env::var(name).with_context(|| format!("{} must be set", name))?;
    if value.trim().is_empty() {
        anyhow::bail!("{} must not be empty", name);
    }
    Ok(value)
}

/// Leer una variable numérica con valor por defecto
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid number", name)),
        Err(_) => Ok(default),
    }
}

/// Separar una lista de valores por comas
pub(crate) fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
