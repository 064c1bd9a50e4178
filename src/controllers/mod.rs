pub mod admin_controller;
pub mod catalog_controller;
pub mod crew_controller;
pub mod invoice_controller;
pub mod order_controller;
