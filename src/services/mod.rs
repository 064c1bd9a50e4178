//! Services module
//! 
//! Este módulo contiene la lógica de negocio que no pertenece a un
//! repositorio: verificación de sesiones, armado de facturas y el
//! renderizado del PDF.

pub mod invoice_pdf;
pub mod invoice_service;
pub mod session_service;

pub use invoice_pdf::render_invoice;
pub use session_service::{SessionClaims, SessionVerifier};
