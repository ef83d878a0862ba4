pub mod completeness;
pub mod handlers;
pub mod impact;
pub mod import;
pub mod inputs;
pub mod repository;
