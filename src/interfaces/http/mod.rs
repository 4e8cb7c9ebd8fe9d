//! HTTP REST API interfaces
//!
//! - `middleware`: bearer-token auth gate
//! - `common`: error mapping and JSON extractor
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiContext, ApiDoc};
