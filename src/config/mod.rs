//! Configuración del proyecto
//! 
//! Este módulo contiene la configuración del servidor y de los servicios
//! externos (Notion, Cloudinary, Clerk y Twilio).

pub mod environment;
pub mod integrations;

pub use environment::*;
pub use integrations::*;
