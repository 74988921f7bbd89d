//! Bearer-token authentication

pub mod jwt;

pub use jwt::{AccessClaims, JwtAuthenticator};
