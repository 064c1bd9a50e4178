//! Modelo de PricingRow
//! 
//! Un precio por combinación de cliente, modelo de camión y posición del
//! vidrio. La búsqueda es por coincidencia exacta de las tres llaves, sin
//! valores por defecto.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use super::notion::NotionPage;
use crate::utils::validation::normalize_notion_id;

pub mod fields {
    pub const CLIENT: &str = "Client";
    pub const TRUCK_MODEL: &str = "Truck Model";
    pub const GLASS_POSITION: &str = "Glass Position";
    pub const PRICE: &str = "Price";
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRow {
    pub id: String,
    pub client_ids: Vec<String>,
    pub truck_model_ids: Vec<String>,
    pub glass_position: Option<String>,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
}

impl PricingRow {
    pub fn from_page(page: &NotionPage) -> Self {
        Self {
            id: page.id.clone(),
            client_ids: page.relation_ids(fields::CLIENT),
            truck_model_ids: page.relation_ids(fields::TRUCK_MODEL),
            glass_position: page.select(fields::GLASS_POSITION),
            price: page.number(fields::PRICE).and_then(Decimal::from_f64),
        }
    }

    /// Coincidencia exacta de las tres llaves. Las relaciones pueden apuntar
    /// a varias páginas: basta con que contengan el ID buscado, igual que el
    /// filtro `contains` de Notion.
    pub fn matches(&self, client_id: &str, truck_model_id: &str, glass_position: &str) -> bool {
        contains_id(&self.client_ids, client_id)
            && contains_id(&self.truck_model_ids, truck_model_id)
            && self.glass_position.as_deref() == Some(glass_position)
    }
}

fn contains_id(ids: &[String], id: &str) -> bool {
    let id = normalize_notion_id(id);
    ids.iter().any(|candidate| normalize_notion_id(candidate) == id)
}

/// Precio de la primera fila que coincide, `None` si ninguna coincide
pub fn find_price(
    rows: &[PricingRow],
    client_id: &str,
    truck_model_id: &str,
    glass_position: &str,
) -> Option<Decimal> {
    rows.iter()
        .find(|row| row.matches(client_id, truck_model_id, glass_position))
        .and_then(|row| row.price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(client: &str, truck: &str, position: &str, price: Option<i64>) -> PricingRow {
        PricingRow {
            id: format!("{}-{}-{}", client, truck, position),
            client_ids: vec![client.to_string()],
            truck_model_ids: vec![truck.to_string()],
            glass_position: Some(position.to_string()),
            price: price.map(Decimal::from),
        }
    }

    #[test]
    fn returns_price_of_exact_match() {
        let rows = vec![
            row("c1", "t1", "Parabrisas", Some(3200)),
            row("c1", "t1", "Trasero", Some(1800)),
            row("c2", "t1", "Parabrisas", Some(2900)),
        ];
        assert_eq!(find_price(&rows, "c1", "t1", "Trasero"), Some(Decimal::from(1800)));
        assert_eq!(find_price(&rows, "c2", "t1", "Parabrisas"), Some(Decimal::from(2900)));
    }

    #[test]
    fn partial_matches_return_none() {
        let rows = vec![row("c1", "t1", "Parabrisas", Some(3200))];
        assert_eq!(find_price(&rows, "c1", "t1", "Lateral Izq"), None);
        assert_eq!(find_price(&rows, "c1", "t2", "Parabrisas"), None);
        assert_eq!(find_price(&rows, "c9", "t1", "Parabrisas"), None);
    }

    #[test]
    fn rows_related_to_several_clients_match_any_of_them() {
        let mut shared = row("c1", "t1", "Parabrisas", Some(2500));
        shared.client_ids.push("c2".to_string());
        let rows = vec![shared];

        assert_eq!(find_price(&rows, "c1", "t1", "Parabrisas"), Some(Decimal::from(2500)));
        assert_eq!(find_price(&rows, "c2", "t1", "Parabrisas"), Some(Decimal::from(2500)));
        assert_eq!(find_price(&rows, "c3", "t1", "Parabrisas"), None);
    }

    #[test]
    fn ids_match_regardless_of_dashes_and_case() {
        let rows = vec![row(
            "1c2b3a4d-5e6f-4a1b-8c9d-0e1f2a3b4c5d",
            "2d3c4b5a-6f7e-4b2c-9d0e-1f2a3b4c5d6e",
            "Trasero",
            Some(1200),
        )];
        assert_eq!(
            find_price(
                &rows,
                "1C2B3A4D5E6F4A1B8C9D0E1F2A3B4C5D",
                "2d3c4b5a6f7e4b2c9d0e1f2a3b4c5d6e",
                "Trasero"
            ),
            Some(Decimal::from(1200))
        );
    }

    #[test]
    fn first_match_wins() {
        let rows = vec![
            row("c1", "t1", "Parabrisas", Some(3200)),
            row("c1", "t1", "Parabrisas", Some(9999)),
        ];
        assert_eq!(find_price(&rows, "c1", "t1", "Parabrisas"), Some(Decimal::from(3200)));
    }
}
