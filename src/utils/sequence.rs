//! Identificadores secuenciales legibles
//!
//! Órdenes: `ORD-<año>-<NNNN>`, la secuencia se reinicia cada año.
//! Facturas: `INV-<año><mes>-<NNNN>`, la secuencia se reinicia cada mes.
//!
//! El siguiente valor se calcula a partir de los identificadores existentes,
//! sin ningún bloqueo: dos creaciones concurrentes pueden obtener el mismo
//! identificador. No es linealizable; sólo es aceptable por el bajo volumen.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ORDER_ID_RE: Regex = Regex::new(r"^ORD-(\d{4})-(\d{4,})$").unwrap();
    static ref INVOICE_NUMBER_RE: Regex = Regex::new(r"^INV-(\d{6})-(\d{4,})$").unwrap();
}

pub const ORDER_PREFIX: &str = "ORD";
pub const INVOICE_PREFIX: &str = "INV";

/// Prefijo común de las órdenes de un año (`ORD-2025-`)
pub fn order_id_prefix(year: i32) -> String {
    format!("{}-{}-", ORDER_PREFIX, year)
}

/// Prefijo común de las facturas de un mes (`INV-202502-`)
pub fn invoice_number_prefix(year: i32, month: u32) -> String {
    format!("{}-{}{:02}-", INVOICE_PREFIX, year, month)
}

/// Siguiente secuencia para el periodo indicado, 1 si no hay ninguna.
///
/// Las secuencias que no caben en `u32` se ignoran; la suma se hace en `u64`
/// para que `u32::MAX` también tenga sucesor.
fn next_sequence<'a, I>(existing: I, pattern: &Regex, period: &str) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    existing
        .into_iter()
        .filter_map(|id| pattern.captures(id.trim()))
        .filter(|caps| &caps[1] == period)
        .filter_map(|caps| caps[2].parse::<u32>().ok())
        .max()
        .map_or(1, |max| u64::from(max) + 1)
}

/// Siguiente ID de orden para el año dado
pub fn next_order_id<'a, I>(existing: I, year: i32) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let next = next_sequence(existing, &ORDER_ID_RE, &year.to_string());
    format!("{}{:04}", order_id_prefix(year), next)
}

/// Siguiente número de factura para el mes dado
pub fn next_invoice_number<'a, I>(existing: I, year: i32, month: u32) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let period = format!("{}{:02}", year, month);
    let next = next_sequence(existing, &INVOICE_NUMBER_RE, &period);
    format!("{}{:04}", invoice_number_prefix(year, month), next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_order_of_the_year_starts_at_0001() {
        assert_eq!(next_order_id(Vec::<&str>::new(), 2025), "ORD-2025-0001");
    }

    #[test]
    fn continues_from_the_highest_sequence_of_the_year() {
        let existing = ["ORD-2025-0003", "ORD-2025-0010", "ORD-2025-0007"];
        assert_eq!(next_order_id(existing, 2025), "ORD-2025-0011");
    }

    #[test]
    fn other_years_and_malformed_titles_are_ignored() {
        let existing = ["ORD-2024-0950", "ORD-2025-0002", "ORD-2025-XYZ", "Orden de prueba", ""];
        assert_eq!(next_order_id(existing, 2025), "ORD-2025-0003");
        assert_eq!(next_order_id(existing, 2026), "ORD-2026-0001");
    }

    #[test]
    fn generation_is_deterministic_and_monotonic() {
        let mut ids: Vec<String> = Vec::new();
        for _ in 0..12 {
            let next = next_order_id(ids.iter().map(String::as_str), 2025);
            assert_eq!(next, next_order_id(ids.iter().map(String::as_str), 2025));
            if let Some(last) = ids.last() {
                assert!(next > *last);
            }
            ids.push(next);
        }
        assert_eq!(ids.last().map(String::as_str), Some("ORD-2025-0012"));
    }

    #[test]
    fn sequence_grows_past_four_digits() {
        assert_eq!(next_order_id(["ORD-2025-9999"], 2025), "ORD-2025-10000");
    }

    #[test]
    fn largest_sequences_do_not_overflow() {
        assert_eq!(next_order_id(["ORD-2025-4294967295"], 2025), "ORD-2025-4294967296");
        assert_eq!(
            next_invoice_number(["INV-202502-4294967295"], 2025, 2),
            "INV-202502-4294967296"
        );
    }

    #[test]
    fn sequences_beyond_u32_are_ignored() {
        let existing = ["ORD-2025-99999999999", "ORD-2025-0041"];
        assert_eq!(next_order_id(existing, 2025), "ORD-2025-0042");
    }

    #[test]
    fn invoice_numbers_reset_each_month() {
        let existing = ["INV-202502-0004", "INV-202501-0020"];
        assert_eq!(next_invoice_number(existing, 2025, 2), "INV-202502-0005");
        assert_eq!(next_invoice_number(existing, 2025, 3), "INV-202503-0001");
    }
}
