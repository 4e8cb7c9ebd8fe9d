//! Shared HTTP building blocks: error mapping and the JSON body extractor

pub mod error;
pub mod json_body;

pub use error::{ApiError, ErrorBody};
pub use json_body::JsonBody;
