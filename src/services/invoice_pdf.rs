//! Generación del PDF de factura
//!
//! El acomodo (encabezado, tabla de partidas paginada, total y pie) se arma
//! primero como una lista de operaciones de dibujo por página, en puntos
//! desde la esquina inferior izquierda de una hoja A4. Después `printpdf`
//! las escribe al documento.
//!
//! Sin fuente configurada se usan Helvetica y Helvetica-Bold integradas,
//! que sólo cubren WinAnsi (Latin-1 más comillas tipográficas, guiones y €);
//! cualquier otro carácter se imprime como `?`. Con `INVOICE_FONT_PATH` se
//! incrusta esa fuente TrueType y el texto se escribe tal cual.

use chrono::{DateTime, Utc};
use printpdf::{
    BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
    Point, Pt,
};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::invoice::{InvoiceData, InvoiceItem};
use crate::utils::errors::{AppError, AppResult};

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const ROW_HEIGHT: f32 = 18.0;

const FIRST_TABLE_TOP: f32 = 610.0;
const CONTINUED_TABLE_TOP: f32 = 780.0;
/// Debajo de esta altura no se dibujan más filas
const TABLE_BOTTOM: f32 = 110.0;
const TOTAL_BLOCK_HEIGHT: f32 = 40.0;

const LAYER_NAME: &str = "Factura";

/// Columnas de la tabla: (x, encabezado, caracteres máximos)
const COLUMNS: [(f32, &str, usize); 4] = [
    (MARGIN, "Descripción", 44),
    (310.0, "Unidad", 14),
    (395.0, "Vidrio", 14),
    (480.0, "Precio", 14),
];

/// Caracteres de WinAnsi entre 0x80 y 0x9F (fuera de Latin-1)
const WIN_ANSI_EXTRA: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, PartialEq)]
enum DrawOp {
    Text {
        font: Font,
        size: f32,
        x: f32,
        y: f32,
        text: String,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
    },
}

/// Operaciones de dibujo de una página
#[derive(Debug, Default)]
struct PageContent {
    ops: Vec<DrawOp>,
}

impl PageContent {
    fn text(&mut self, font: Font, size: f32, x: f32, y: f32, text: &str) {
        self.ops.push(DrawOp::Text {
            font,
            size,
            x,
            y,
            text: text.to_string(),
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(DrawOp::Line {
            from: (x1, y1),
            to: (x2, y2),
        });
    }

    #[cfg(test)]
    fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                DrawOp::Line { .. } => None,
            })
            .collect()
    }
}

/// Texto representable con las fuentes integradas
fn winansi_safe(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' | '\r' | '\t' => Some(' '),
            c if c.is_control() => None,
            ' '..='~' | '\u{A0}'..='\u{FF}' => Some(c),
            c if WIN_ANSI_EXTRA.contains(c) => Some(c),
            _ => Some('?'),
        })
        .collect()
}

/// Recortar texto a un número máximo de caracteres
fn fit(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

pub fn format_money(amount: Decimal) -> String {
    format!(
        "{:.2}",
        amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

fn draw_header(page: &mut PageContent, data: &InvoiceData) {
    page.text(Font::Bold, 24.0, MARGIN, 780.0, "FACTURA");
    page.text(Font::Regular, 11.0, MARGIN, 760.0, "Glass Installation Services");

    let right = 380.0;
    page.text(Font::Bold, 10.0, right, 780.0, "Folio:");
    page.text(Font::Regular, 10.0, right + 45.0, 780.0, &data.invoice_number);
    page.text(Font::Bold, 10.0, right, 765.0, "Fecha:");
    page.text(
        Font::Regular,
        10.0,
        right + 45.0,
        765.0,
        &data.invoice_date.format("%d/%m/%Y").to_string(),
    );

    page.line(MARGIN, 740.0, PAGE_WIDTH - MARGIN, 740.0);

    let mut y = 715.0;
    page.text(Font::Bold, 11.0, MARGIN, y, "Cliente:");
    y -= 16.0;
    page.text(Font::Regular, 11.0, MARGIN, y, &data.client_name);
    for extra in [&data.client_address, &data.client_phone] {
        if !extra.trim().is_empty() {
            y -= 14.0;
            page.text(Font::Regular, 10.0, MARGIN, y, extra);
        }
    }
}

/// Encabezado de la tabla; devuelve la altura de la primera fila
fn draw_table_header(page: &mut PageContent, top: f32) -> f32 {
    for (x, title, _) in COLUMNS {
        page.text(Font::Bold, 10.0, x, top, title);
    }
    page.line(MARGIN, top - 6.0, PAGE_WIDTH - MARGIN, top - 6.0);
    top - ROW_HEIGHT - 4.0
}

fn draw_row(page: &mut PageContent, item: &InvoiceItem, y: f32) {
    let cells = [
        format!("{} - {}", item.order_id, item.truck_model),
        item.unit_number.clone(),
        item.glass_position.clone(),
        format!("${}", format_money(item.price)),
    ];
    for ((x, _, max_chars), cell) in COLUMNS.iter().zip(cells.iter()) {
        page.text(Font::Regular, 9.0, *x, y, &fit(cell, *max_chars));
    }
}

fn draw_total(page: &mut PageContent, total: Decimal, y: f32) {
    page.line(MARGIN, y + 10.0, PAGE_WIDTH - MARGIN, y + 10.0);
    page.text(
        Font::Bold,
        13.0,
        360.0,
        y - 8.0,
        &format!("TOTAL: ${} MXN", format_money(total)),
    );
}

fn draw_footer(page: &mut PageContent, number: usize, count: usize, generated_at: DateTime<Utc>) {
    page.text(Font::Regular, 9.0, MARGIN, 55.0, "Gracias por su preferencia");
    page.text(
        Font::Regular,
        8.0,
        MARGIN,
        42.0,
        &format!("Generado el {}", generated_at.format("%d/%m/%Y %H:%M UTC")),
    );
    page.text(
        Font::Regular,
        8.0,
        PAGE_WIDTH - MARGIN - 60.0,
        42.0,
        &format!("Página {} de {}", number, count),
    );
}

fn layout(data: &InvoiceData, generated_at: DateTime<Utc>) -> Vec<PageContent> {
    let mut pages = Vec::new();
    let mut page = PageContent::default();

    draw_header(&mut page, data);
    let mut y = draw_table_header(&mut page, FIRST_TABLE_TOP);

    for item in &data.items {
        if y < TABLE_BOTTOM {
            pages.push(std::mem::take(&mut page));
            y = draw_table_header(&mut page, CONTINUED_TABLE_TOP);
        }
        draw_row(&mut page, item, y);
        y -= ROW_HEIGHT;
    }

    if y < TABLE_BOTTOM + TOTAL_BLOCK_HEIGHT - ROW_HEIGHT {
        pages.push(std::mem::take(&mut page));
        y = CONTINUED_TABLE_TOP;
    }
    draw_total(&mut page, data.total(), y);
    pages.push(page);

    let count = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        draw_footer(page, index + 1, count, generated_at);
    }
    pages
}

fn pdf_error(error: impl std::fmt::Display) -> AppError {
    AppError::Internal(format!("Cannot render invoice PDF: {}", error))
}

/// Fuentes registradas en el documento
struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    builtin: bool,
}

impl Fonts {
    /// Una fuente externa se usa para ambos pesos
    fn load(doc: &PdfDocumentReference, external: Option<&[u8]>) -> AppResult<Self> {
        match external {
            Some(bytes) => {
                let font = doc.add_external_font(bytes).map_err(pdf_error)?;
                Ok(Self {
                    regular: font.clone(),
                    bold: font,
                    builtin: false,
                })
            }
            None => Ok(Self {
                regular: doc
                    .add_builtin_font(BuiltinFont::Helvetica)
                    .map_err(pdf_error)?,
                bold: doc
                    .add_builtin_font(BuiltinFont::HelveticaBold)
                    .map_err(pdf_error)?,
                builtin: true,
            }),
        }
    }

    fn get(&self, font: Font) -> &IndirectFontRef {
        match font {
            Font::Regular => &self.regular,
            Font::Bold => &self.bold,
        }
    }
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn draw_page(layer: &PdfLayerReference, page: &PageContent, fonts: &Fonts) {
    for op in &page.ops {
        match op {
            DrawOp::Text {
                font,
                size,
                x,
                y,
                text,
            } => {
                let text = if fonts.builtin {
                    winansi_safe(text)
                } else {
                    text.clone()
                };
                layer.use_text(text, *size, mm(*x), mm(*y), fonts.get(*font));
            }
            DrawOp::Line { from, to } => layer.add_line(Line {
                points: vec![
                    (Point::new(mm(from.0), mm(from.1)), false),
                    (Point::new(mm(to.0), mm(to.1)), false),
                ],
                is_closed: false,
            }),
        }
    }
}

/// Renderizar la factura como documento PDF.
///
/// `font` son los bytes de una fuente TrueType para texto fuera de WinAnsi.
pub fn render_invoice(
    data: &InvoiceData,
    generated_at: DateTime<Utc>,
    font: Option<&[u8]>,
) -> AppResult<Vec<u8>> {
    let pages = layout(data, generated_at);

    let (doc, first_page, first_layer) = PdfDocument::new(
        format!("Factura {}", data.invoice_number),
        mm(PAGE_WIDTH),
        mm(PAGE_HEIGHT),
        LAYER_NAME,
    );
    let fonts = Fonts::load(&doc, font)?;

    for (index, page) in pages.iter().enumerate() {
        let (page_index, layer_index) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(mm(PAGE_WIDTH), mm(PAGE_HEIGHT), LAYER_NAME)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        draw_page(&layer, page, &fonts);
    }

    doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn dec(units: i64, scale: u32) -> Decimal {
        Decimal::new(units, scale)
    }

    fn invoice(items: usize) -> InvoiceData {
        InvoiceData {
            invoice_number: "INV-202502-0003".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2025, 2, 14).unwrap(),
            client_name: "Transportes (Norte)".to_string(),
            client_address: "Av. Juárez 100, Monterrey".to_string(),
            client_phone: "+52 81 1234 5678".to_string(),
            items: (0..items)
                .map(|i| InvoiceItem {
                    order_id: format!("ORD-2025-{:04}", i + 1),
                    unit_number: format!("U-{}", i + 1),
                    truck_model: "Freightliner Cascadia".to_string(),
                    glass_position: "Parabrisas".to_string(),
                    price: dec(250050, 2),
                })
                .collect(),
        }
    }

    fn generated() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 14, 18, 30, 0).unwrap()
    }

    #[test]
    fn first_page_has_header_and_total() {
        let pages = layout(&invoice(2), generated());
        assert_eq!(pages.len(), 1);

        let texts = pages[0].texts();
        for expected in [
            "FACTURA",
            "INV-202502-0003",
            "14/02/2025",
            "Transportes (Norte)",
            "Av. Juárez 100, Monterrey",
            "ORD-2025-0002 - Freightliner Cascadia",
            "$2500.50",
            "TOTAL: $5001.00 MXN",
            "Generado el 14/02/2025 18:30 UTC",
            "Página 1 de 1",
        ] {
            assert!(texts.contains(&expected), "missing {:?}", expected);
        }
    }

    #[test]
    fn blank_client_details_are_skipped() {
        let mut data = invoice(1);
        data.client_address = "  ".to_string();
        let texts = layout(&data, generated()).remove(0).texts().join("|");
        assert!(!texts.contains("|  |"));
        assert!(texts.contains("+52 81 1234 5678"));
    }

    #[test]
    fn long_tables_are_paginated() {
        let pages = layout(&invoice(60), generated());
        assert!(pages.len() >= 2);

        let last = pages.last().unwrap().texts();
        assert!(last.contains(&"ORD-2025-0060 - Freightliner Cascadia"));
        assert!(last.iter().any(|t| t.starts_with("TOTAL: ")));
        assert!(last.contains(&"Descripción"));

        let count = pages.len();
        for (index, page) in pages.iter().enumerate() {
            let footer = format!("Página {} de {}", index + 1, count);
            assert!(page.texts().contains(&footer.as_str()));
        }
        for page in &pages[..count - 1] {
            assert!(!page.texts().iter().any(|t| t.starts_with("TOTAL: ")));
        }
    }

    #[test]
    fn rows_stay_above_the_footer() {
        for page in layout(&invoice(120), generated()) {
            for op in &page.ops {
                if let DrawOp::Text { size, y, text, .. } = op {
                    if *size == 9.0 && text != "Gracias por su preferencia" {
                        assert!(*y >= TABLE_BOTTOM, "{:?} drawn at {}", text, y);
                    }
                }
            }
        }
    }

    #[test]
    fn builtin_fonts_keep_winansi_and_replace_the_rest() {
        assert_eq!(winansi_safe("Av. Juárez Núñez"), "Av. Juárez Núñez");
        assert_eq!(winansi_safe("“€ 1,500” – ok"), "“€ 1,500” – ok");
        assert_eq!(winansi_safe("Łódź 東京 📄"), "?ód? ?? ?");
        assert_eq!(winansi_safe("línea\nsiguiente\u{7}"), "línea siguiente");
    }

    #[test]
    fn long_cells_are_truncated() {
        assert_eq!(fit("short", 10), "short");
        assert_eq!(fit("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn money_uses_two_decimals() {
        assert_eq!(format_money(dec(1500, 0)), "1500.00");
        assert_eq!(format_money(dec(12345, 3)), "12.35");
    }

    #[test]
    fn renders_a_pdf_document() {
        let pdf = render_invoice(&invoice(60), generated(), None).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.windows(5).any(|w| w == b"%%EOF"));
    }

    #[test]
    fn invalid_font_bytes_are_an_error() {
        let result = render_invoice(&invoice(1), generated(), Some(b"not a font".as_slice()));
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
