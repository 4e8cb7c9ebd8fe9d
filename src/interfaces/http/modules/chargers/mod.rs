//! Charging station module: ownership-scoped CRUD

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
