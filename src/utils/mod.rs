//! Utilidades del sistema
//! 
//! Este módulo contiene utilidades para manejo de errores, validación,
//! extracción de JSON y generación de identificadores secuenciales.

pub mod errors;
pub mod extract;
pub mod sequence;
pub mod validation;
