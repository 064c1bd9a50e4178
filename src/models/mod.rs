//! Modelos del sistema
//! 
//! Este módulo contiene los modelos de datos y su mapeo exacto al esquema
//! de propiedades de las bases de Notion.

pub mod client;
pub mod crew;
pub mod invoice;
pub mod notion;
pub mod order;
pub mod pricing;
pub mod truck_model;

pub use client::Client;
pub use crew::Crew;
pub use invoice::{InvoiceData, InvoiceItem};
pub use notion::NotionPage;
pub use order::{GlassPosition, GpsLocation, JobProgress, Order, OrderStatus};
pub use pricing::PricingRow;
pub use truck_model::TruckModel;
