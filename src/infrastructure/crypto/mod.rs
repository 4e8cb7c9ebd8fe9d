pub mod jwt;
pub mod password;

pub use jwt::{JwtConfig, TokenService, TOKEN_VALIDITY_DAYS};
