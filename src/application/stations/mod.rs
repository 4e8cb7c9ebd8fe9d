//! Station module: ownership-scoped station operations

pub mod service;

pub use service::StationService;
