//! Esquema de propiedades de Notion
//! 
//! Lectura de páginas (`NotionPage`), construcción de valores de propiedades
//! (`props`) y de filtros para consultas (`filter`). Los modelos del dominio
//! se mapean desde y hacia estas estructuras.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Máximo de caracteres por segmento de texto aceptado por Notion
pub const TEXT_SEGMENT_LIMIT: usize = 2000;

/// Página de Notion tal como la devuelve la API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionPage {
    pub id: String,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_edited_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

/// Resultado paginado de una consulta a una fuente de datos
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<NotionPage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

fn plain_text(segments: Option<&Value>) -> Option<String> {
    let segments = segments?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|segment| {
            segment
                .get("plain_text")
                .or_else(|| segment.get("text").and_then(|t| t.get("content")))
                .and_then(Value::as_str)
        })
        .collect();
    Some(text)
}

impl NotionPage {
    fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Texto de una propiedad `title`
    pub fn title(&self, name: &str) -> String {
        plain_text(self.property(name).and_then(|p| p.get("title"))).unwrap_or_default()
    }

    /// Texto completo de una propiedad `rich_text` (todos los segmentos)
    pub fn rich_text(&self, name: &str) -> String {
        plain_text(self.property(name).and_then(|p| p.get("rich_text"))).unwrap_or_default()
    }

    /// Texto de una propiedad `rich_text`, `None` si está vacía
    pub fn optional_text(&self, name: &str) -> Option<String> {
        Some(self.rich_text(name)).filter(|text| !text.is_empty())
    }

    /// Nombre de la opción de una propiedad `select`
    pub fn select(&self, name: &str) -> Option<String> {
        self.property(name)?
            .get("select")?
            .get("name")?
            .as_str()
            .map(str::to_string)
    }

    /// Primer ID de una propiedad `relation`
    pub fn first_relation(&self, name: &str) -> Option<String> {
        self.relation_ids(name).into_iter().next()
    }

    /// Todos los IDs de una propiedad `relation`, en orden
    pub fn relation_ids(&self, name: &str) -> Vec<String> {
        self.property(name)
            .and_then(|p| p.get("relation"))
            .and_then(Value::as_array)
            .map(|related| {
                related
                    .iter()
                    .filter_map(|r| r.get("id").and_then(Value::as_str))
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Valor de una propiedad `number`
    pub fn number(&self, name: &str) -> Option<f64> {
        self.property(name)?.get("number")?.as_f64()
    }

    /// Inicio de una propiedad `date`
    pub fn date_start(&self, name: &str) -> Option<String> {
        self.property(name)?
            .get("date")?
            .get("start")?
            .as_str()
            .map(str::to_string)
    }

    /// Valor de una propiedad `url`
    pub fn url(&self, name: &str) -> Option<String> {
        self.property(name)?.get("url")?.as_str().map(str::to_string)
    }

    /// Teléfono: acepta `phone_number` o `rich_text`
    pub fn phone(&self, name: &str) -> String {
        self.property(name)
            .and_then(|p| p.get("phone_number"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| self.rich_text(name))
    }

    /// URLs de una propiedad `files` (externos o alojados en Notion)
    pub fn file_urls(&self, name: &str) -> Vec<String> {
        self.property(name)
            .and_then(|p| p.get("files"))
            .and_then(Value::as_array)
            .map(|files| {
                files
                    .iter()
                    .filter_map(|file| {
                        file.get("external")
                            .or_else(|| file.get("file"))
                            .and_then(|f| f.get("url"))
                            .and_then(Value::as_str)
                            .map(str::to_string)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Constructores de valores de propiedades para crear/actualizar páginas
pub mod props {
    use serde_json::{json, Value};

    use super::TEXT_SEGMENT_LIMIT;

    fn text_segments(content: &str) -> Vec<Value> {
        let chars: Vec<char> = content.chars().collect();
        chars
            .chunks(TEXT_SEGMENT_LIMIT)
            .map(|chunk| json!({ "text": { "content": chunk.iter().collect::<String>() } }))
            .collect()
    }

    pub fn title(content: &str) -> Value {
        json!({ "title": text_segments(content) })
    }

    /// Texto enriquecido, partido en segmentos de como máximo 2000 caracteres
    pub fn rich_text(content: &str) -> Value {
        json!({ "rich_text": text_segments(content) })
    }

    pub fn empty_rich_text() -> Value {
        json!({ "rich_text": [] })
    }

    pub fn select(name: &str) -> Value {
        json!({ "select": { "name": name } })
    }

    pub fn relation(id: &str) -> Value {
        json!({ "relation": [{ "id": id }] })
    }

    pub fn number(value: f64) -> Value {
        json!({ "number": value })
    }

    pub fn date(start: &str) -> Value {
        json!({ "date": { "start": start } })
    }

    pub fn url(value: &str) -> Value {
        json!({ "url": value })
    }

    /// Archivos externos; cada elemento es `(nombre, url)`
    pub fn external_files<'a, I>(files: I) -> Value
    where
        I: IntoIterator<Item = (String, &'a str)>,
    {
        let files: Vec<Value> = files
            .into_iter()
            .map(|(name, url)| json!({ "type": "external", "name": name, "external": { "url": url } }))
            .collect();
        json!({ "files": files })
    }
}

/// Constructores de filtros para consultas a fuentes de datos
pub mod filter {
    use serde_json::{json, Value};

    pub fn select_equals(property: &str, value: &str) -> Value {
        json!({ "property": property, "select": { "equals": value } })
    }

    pub fn relation_contains(property: &str, id: &str) -> Value {
        json!({ "property": property, "relation": { "contains": id } })
    }

    pub fn title_starts_with(property: &str, prefix: &str) -> Value {
        json!({ "property": property, "title": { "starts_with": prefix } })
    }

    pub fn rich_text_starts_with(property: &str, prefix: &str) -> Value {
        json!({ "property": property, "rich_text": { "starts_with": prefix } })
    }

    pub fn date_between(property: &str, on_or_after: &str, on_or_before: &str) -> Value {
        json!({
            "property": property,
            "date": { "on_or_after": on_or_after, "on_or_before": on_or_before }
        })
    }

    /// Combina filtros con `and`; un solo filtro se envía sin envolver
    pub fn all(mut filters: Vec<Value>) -> Option<Value> {
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(json!({ "and": filters })),
        }
    }
}
