//! Application tracking: a status machine with an append-only event history.

pub mod handlers;
pub mod repository;
pub mod stats;
pub mod status;
