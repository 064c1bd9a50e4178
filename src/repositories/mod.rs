pub mod catalog_repository;
pub mod order_repository;
pub mod pricing_repository;

pub use catalog_repository::CatalogRepository;
pub use order_repository::OrderRepository;
pub use pricing_repository::PricingRepository;
