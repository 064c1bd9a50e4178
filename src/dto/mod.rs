pub mod admin_dto;
pub mod catalog_dto;
pub mod crew_dto;
pub mod invoice_dto;
pub mod order_dto;
