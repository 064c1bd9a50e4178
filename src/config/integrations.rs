//! Configuración de servicios externos
//! 
//! Notion es la única fuente de verdad; Cloudinary guarda los archivos,
//! Clerk maneja la identidad y Twilio envía las facturas por WhatsApp.
//! Todas las URLs base son configurables para poder apuntar a mocks.

use anyhow::Result;
use std::env;

use super::environment::{required_var, split_list};

pub const NOTION_DEFAULT_URL: &str = "https://api.notion.com";
pub const NOTION_DEFAULT_VERSION: &str = "2025-09-03";
pub const CLOUDINARY_DEFAULT_URL: &str = "https://api.cloudinary.com";
pub const CLERK_DEFAULT_URL: &str = "https://api.clerk.com";
pub const TWILIO_DEFAULT_URL: &str = "https://api.twilio.com";

/// IDs de las fuentes de datos de Notion
#[derive(Debug, Clone)]
pub struct NotionDatabases {
    pub orders: String,
    pub clients: String,
    pub truck_models: String,
    pub crews: String,
    pub pricing: String,
}

/// Configuración de Notion
#[derive(Debug, Clone)]
pub struct NotionConfig {
    pub api_key: String,
    pub api_url: String,
    pub version: String,
    pub databases: NotionDatabases,
}

/// Configuración de Cloudinary (subidas sin firma con upload preset)
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub api_url: String,
}

/// Configuración de Clerk
#[derive(Debug, Clone)]
pub struct ClerkConfig {
    /// Secret key de la Backend API
    pub secret_key: String,
    /// Llave PEM pública de la instancia (RS256). Un secreto plano habilita
    /// HS256, útil en desarrollo local.
    pub jwt_key: String,
    /// Valores aceptados del claim `azp`; vacío desactiva la verificación
    pub authorized_parties: Vec<String>,
    pub api_url: String,
}

/// Configuración de Twilio. Es opcional: se verifica en cada envío.
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub account_sid: Option<String>,
    pub auth_token: Option<String>,
    pub whatsapp_number: Option<String>,
    pub api_url: String,
}

impl TwilioConfig {
    /// Credenciales completas, si están configuradas
    pub fn credentials(&self) -> Option<(&str, &str, &str)> {
        match (
            self.account_sid.as_deref(),
            self.auth_token.as_deref(),
            self.whatsapp_number.as_deref(),
        ) {
            (Some(sid), Some(token), Some(from)) => Some((sid, token, from)),
            _ => None,
        }
    }
}

/// Configuración agrupada de integraciones
#[derive(Debug, Clone)]
pub struct IntegrationsConfig {
    pub notion: NotionConfig,
    pub cloudinary: CloudinaryConfig,
    pub clerk: ClerkConfig,
    pub twilio: TwilioConfig,
}

impl IntegrationsConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            notion: NotionConfig {
                api_key: required_var("NOTION_API_KEY")?,
                api_url: var_or("NOTION_API_URL", NOTION_DEFAULT_URL),
                version: var_or("NOTION_VERSION", NOTION_DEFAULT_VERSION),
                databases: NotionDatabases {
                    orders: required_var("NOTION_ORDERS_DB_ID")?,
                    clients: required_var("NOTION_CLIENTS_DB_ID")?,
                    truck_models: required_var("NOTION_TRUCK_MODELS_DB_ID")?,
                    crews: required_var("NOTION_CREWS_DB_ID")?,
                    pricing: required_var("NOTION_PRICING_DB_ID")?,
                },
            },
            cloudinary: CloudinaryConfig {
                cloud_name: required_var("CLOUDINARY_CLOUD_NAME")?,
                upload_preset: required_var("CLOUDINARY_UPLOAD_PRESET")?,
                api_url: var_or("CLOUDINARY_API_URL", CLOUDINARY_DEFAULT_URL),
            },
            clerk: ClerkConfig {
                secret_key: required_var("CLERK_SECRET_KEY")?,
                jwt_key: required_var("CLERK_JWT_KEY")?.replace("\\n", "\n"),
                authorized_parties: env::var("CLERK_AUTHORIZED_PARTIES")
                    .map(|raw| split_list(&raw))
                    .unwrap_or_default(),
                api_url: var_or("CLERK_API_URL", CLERK_DEFAULT_URL),
            },
            twilio: TwilioConfig {
                account_sid: optional_var("TWILIO_ACCOUNT_SID"),
                auth_token: optional_var("TWILIO_AUTH_TOKEN"),
                whatsapp_number: optional_var("TWILIO_WHATSAPP_NUMBER"),
                api_url: var_or("TWILIO_API_URL", TWILIO_DEFAULT_URL),
            },
        })
    }

    /// Configuración con todas las APIs apuntando a una misma URL base
    /// (servidor mock local) e IDs de bases de datos fijos.
    pub fn for_base_url(base_url: &str) -> Self {
        Self {
            notion: NotionConfig {
                api_key: "secret_notion".to_string(),
                api_url: base_url.to_string(),
                version: NOTION_DEFAULT_VERSION.to_string(),
                databases: NotionDatabases {
                    orders: "orders-db".to_string(),
                    clients: "clients-db".to_string(),
                    truck_models: "truck-models-db".to_string(),
                    crews: "crews-db".to_string(),
                    pricing: "pricing-db".to_string(),
                },
            },
            cloudinary: CloudinaryConfig {
                cloud_name: "demo-cloud".to_string(),
                upload_preset: "unsigned-preset".to_string(),
                api_url: base_url.to_string(),
            },
            clerk: ClerkConfig {
                secret_key: "sk_test_local".to_string(),
                jwt_key: "local-session-secret".to_string(),
                authorized_parties: vec![],
                api_url: base_url.to_string(),
            },
            twilio: TwilioConfig {
                account_sid: Some("AC_local".to_string()),
                auth_token: Some("twilio-token".to_string()),
                whatsapp_number: Some("whatsapp:+14155238886".to_string()),
                api_url: base_url.to_string(),
            },
        }
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
