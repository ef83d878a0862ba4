pub mod handlers;
pub mod repository;
pub mod templates;
pub mod versioning;
