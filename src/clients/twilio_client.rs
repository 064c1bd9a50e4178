//! Cliente HTTP para Twilio (mensajes de WhatsApp)

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::TwilioConfig;
use crate::utils::errors::{AppError, AppResult};

/// Mensaje creado por Twilio
#[derive(Debug, Clone, Deserialize)]
pub struct TwilioMessage {
    pub sid: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Normalizar un teléfono al formato `whatsapp:+<código><número>`
pub fn format_whatsapp_number(phone: &str) -> String {
    let phone = phone.trim();
    if phone.starts_with("whatsapp:") {
        return phone.to_string();
    }
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("whatsapp:+{}", digits)
}

/// Traducir los errores más comunes de Twilio a mensajes accionables
fn friendly_error(message: &str, from: &str) -> String {
    if message.contains("Channel") {
        format!(
            "WhatsApp number not configured. Please use Twilio WhatsApp Sandbox number (e.g., whatsapp:+14155238886) or set up a WhatsApp Business number. Current: {}",
            from
        )
    } else if message.contains("not a valid") {
        "Invalid phone number format. Expected: whatsapp:+[country code][number]".to_string()
    } else {
        message.to_string()
    }
}

#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    config: TwilioConfig,
}

impl TwilioClient {
    pub fn new(client: Client, config: &TwilioConfig) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.credentials().is_some()
    }

    /// Enviar un mensaje de WhatsApp
    pub async fn send_whatsapp(&self, to: &str, body: &str) -> AppResult<TwilioMessage> {
        let (account_sid, auth_token, from) = self.config.credentials().ok_or_else(|| {
            AppError::Configuration(
                "Twilio WhatsApp not configured. Please set TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN, and TWILIO_WHATSAPP_NUMBER in .env".to_string(),
            )
        })?;

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_url.trim_end_matches('/'),
            account_sid
        );

        log::info!("📲 [WhatsApp] Enviando mensaje de {} a {}", from, to);

        let response = self
            .client
            .post(&url)
            .basic_auth(account_sid, Some(auth_token))
            .form(&[("From", from), ("To", to), ("Body", body)])
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Twilio request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(body);
            log::error!("❌ Twilio respondió {}: {}", status, message);
            return Err(AppError::ExternalApi(friendly_error(&message, from)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid Twilio response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers_are_normalised() {
        assert_eq!(format_whatsapp_number("+52 (55) 1234-5678"), "whatsapp:+525512345678");
        assert_eq!(format_whatsapp_number("5215551234567"), "whatsapp:+5215551234567");
        assert_eq!(
            format_whatsapp_number("whatsapp:+14155238886"),
            "whatsapp:+14155238886"
        );
    }

    #[test]
    fn channel_errors_point_at_the_sender_number() {
        let msg = friendly_error("Twilio could not find a Channel with the specified From address", "whatsapp:+1000");
        assert!(msg.contains("Current: whatsapp:+1000"));

        let msg = friendly_error("The 'To' number 123 is not a valid phone number.", "x");
        assert!(msg.starts_with("Invalid phone number format"));

        assert_eq!(friendly_error("Authenticate", "x"), "Authenticate");
    }
}
