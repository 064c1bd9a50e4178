//! Clients - HTTP Clients for External APIs
//! 
//! This module contains HTTP clients for the hosted services the workflow
//! depends on: Notion (data), Cloudinary (files), Clerk (identity) and
//! Twilio (WhatsApp delivery).

pub mod clerk_client;
pub mod cloudinary_client;
pub mod notion_client;
pub mod twilio_client;

// Re-export main types for convenience
pub use clerk_client::{ClerkClient, ClerkUser};
pub use cloudinary_client::CloudinaryClient;
pub use notion_client::NotionClient;
pub use twilio_client::{format_whatsapp_number, TwilioClient, TwilioMessage};
