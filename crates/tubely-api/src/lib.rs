//! Tubely API Library
//!
//! HTTP handlers, bearer-token auth, the video upload pipeline and
//! application setup.

mod handlers;
mod telemetry;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use telemetry::init_tracing;
