//! # Charger Directory
//!
//! REST service for managing a directory of EV charging stations on behalf
//! of authenticated owners.
//!
//! ## Architecture
//!
//! - **domain**: Entities, value objects (coordinate codec) and repository traits
//! - **application**: Use cases (credential and station operations)
//! - **infrastructure**: JWT/bcrypt crypto, SeaORM persistence, in-memory storage
//! - **interfaces**: HTTP API (axum router, auth gate, OpenAPI)
//! - **shared**: Error taxonomy, validation helpers, shutdown

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::database::repositories::SeaOrmRepositoryProvider;
pub use infrastructure::storage::InMemoryRepositoryProvider;
pub use infrastructure::{init_database, DatabaseConfig};

pub use interfaces::http::create_api_router;
