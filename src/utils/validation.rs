//! Utilidades de validación
//! 
//! Este módulo contiene las funciones `custom` que usan los DTOs con
//! `validator`, además de helpers de conversión de fechas.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use validator::ValidationError;

use crate::models::order::GlassPosition;

fn error_with_message(code: &'static str, message: String) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Validar una fecha `YYYY-MM-DD` (rango de facturación)
pub fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    validate_date(value).map(|_| ()).map_err(|_| {
        error_with_message("date", format!("Invalid date '{}'. Expected YYYY-MM-DD", value))
    })
}

/// Validar que un string no esté vacío (ignorando espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("not_blank", "Value must not be blank".to_string()));
    }
    Ok(())
}

/// Validar que el nombre del cliente que firma no esté vacío
pub fn validate_customer_name(value: &str) -> Result<(), ValidationError> {
    validate_not_blank(value)
        .map_err(|_| error_with_message("not_blank", "Customer name is required".to_string()))
}

/// Validar un ID de página de Notion (UUID con o sin guiones)
pub fn validate_notion_id(value: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(value.trim()).map(|_| ()).map_err(|_| {
        let mut error = error_with_message("notion_id", format!("Invalid Notion id: '{}'", value));
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Forma canónica de un ID de Notion: UUID con guiones y en minúsculas,
/// que es como la API devuelve los IDs de página. Un valor que no es UUID
/// se devuelve sin espacios alrededor.
pub fn normalize_notion_id(value: &str) -> String {
    let value = value.trim();
    Uuid::parse_str(value)
        .map(|id| id.hyphenated().to_string())
        .unwrap_or_else(|_| value.to_string())
}

/// Validar que la posición del vidrio sea una de las cuatro permitidas
pub fn validate_glass_position(value: &str) -> Result<(), ValidationError> {
    value.parse::<GlassPosition>().map(|_| ()).map_err(|_| {
        error_with_message(
            "glass_position",
            format!(
                "Invalid glass position '{}'. Expected one of: {}",
                value,
                GlassPosition::ALL.map(|p| p.as_str()).join(", ")
            ),
        )
    })
}

/// Validar una fecha de programación (YYYY-MM-DD o RFC3339)
pub fn validate_schedule_date(value: &str) -> Result<(), ValidationError> {
    if validate_date(value).is_ok() || validate_datetime(value).is_ok() {
        return Ok(());
    }
    Err(error_with_message(
        "date",
        format!("Invalid schedule date '{}'. Expected YYYY-MM-DD", value),
    ))
}

/// Validar un arreglo de IDs de Notion
pub fn validate_notion_ids(values: &[String]) -> Result<(), ValidationError> {
    values.iter().try_for_each(|id| validate_notion_id(id))
}

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar y convertir string a datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            let mut error = ValidationError::new("datetime");
            error.add_param("value".into(), &value.to_string());
            error.add_param("format".into(), &"RFC3339".to_string());
            error
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notion_ids_accept_dashed_and_compact_uuids() {
        assert!(validate_notion_id("1c2b3a4d-5e6f-4a1b-8c9d-0e1f2a3b4c5d").is_ok());
        assert!(validate_notion_id("1c2b3a4d5e6f4a1b8c9d0e1f2a3b4c5d").is_ok());
        assert!(validate_notion_id("ORD-2025-0001").is_err());
    }

    #[test]
    fn notion_ids_normalize_to_dashed_lowercase() {
        let canonical = "1c2b3a4d-5e6f-4a1b-8c9d-0e1f2a3b4c5d";
        assert_eq!(normalize_notion_id("1c2b3a4d5e6f4a1b8c9d0e1f2a3b4c5d"), canonical);
        assert_eq!(normalize_notion_id(" 1C2B3A4D-5E6F-4A1B-8C9D-0E1F2A3B4C5D "), canonical);
        assert_eq!(normalize_notion_id(canonical), canonical);
        assert_eq!(normalize_notion_id(" crew-7 "), "crew-7");
    }

    #[test]
    fn glass_position_must_be_known() {
        assert!(validate_glass_position("Parabrisas").is_ok());
        assert!(validate_glass_position("Lateral Der").is_ok());
        let err = validate_glass_position("Techo").unwrap_err();
        assert!(err.message.unwrap().contains("Parabrisas"));
    }

    #[test]
    fn schedule_date_accepts_plain_dates_and_timestamps() {
        assert!(validate_schedule_date("2025-03-14").is_ok());
        assert!(validate_schedule_date("2025-03-14T09:30:00-06:00").is_ok());
        assert!(validate_schedule_date("14/03/2025").is_err());
    }

    #[test]
    fn blank_customer_name_is_rejected() {
        assert!(validate_customer_name("   ").is_err());
        assert!(validate_customer_name("Juan Pérez").is_ok());
    }
}
