//! Cliente HTTP para Cloudinary
//! 
//! Sube archivos generados en el servidor (PDFs de facturas) como recursos
//! `raw`, usando un upload preset sin firma. Las fotos y firmas las sube el
//! navegador directamente; aquí sólo se guardan sus URLs.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::CloudinaryConfig;
use crate::utils::errors::{AppError, AppResult};

/// Respuesta de una subida exitosa
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub secure_url: String,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub bytes: Option<u64>,
}

#[derive(Clone)]
pub struct CloudinaryClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    upload_preset: String,
}

impl CloudinaryClient {
    pub fn new(client: Client, config: &CloudinaryConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloud_name.clone(),
            upload_preset: config.upload_preset.clone(),
        }
    }

    /// Carpeta de las facturas de un cliente
    pub fn invoice_folder(client_id: &str) -> String {
        format!("glass-orders/{}/invoices", client_id)
    }

    /// Subir un PDF de factura y devolver su URL HTTPS
    pub async fn upload_invoice_pdf(
        &self,
        pdf: Vec<u8>,
        client_id: &str,
        file_name: &str,
    ) -> AppResult<String> {
        let file = Part::bytes(pdf)
            .file_name(file_name.to_string())
            .mime_str("application/pdf")
            .map_err(|e| AppError::Internal(format!("Invalid MIME type: {}", e)))?;

        let form = Form::new()
            .part("file", file)
            .text("upload_preset", self.upload_preset.clone())
            .text("folder", Self::invoice_folder(client_id))
            .text("context", format!("client_id={}|type=invoice", client_id));

        let url = format!("{}/v1_1/{}/raw/upload", self.base_url, self.cloud_name);
        log::info!("☁️ Subiendo {} a Cloudinary", file_name);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("PDF upload failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(body);
            return Err(AppError::ExternalApi(format!(
                "PDF upload failed ({}): {}",
                status, message
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid Cloudinary response: {}", e)))?;

        log::info!(
            "✅ PDF subido: {} ({} bytes)",
            upload.secure_url,
            upload.bytes.unwrap_or_default()
        );
        Ok(upload.secure_url)
    }
}
