//! Application state shared by every handler.

use crate::auth::JwtAuthenticator;
use crate::services::upload::UploadOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub auth: JwtAuthenticator,
    pub uploads: UploadOrchestrator,
    /// Strip error details from every response.
    pub production: bool,
}

impl AppState {
    pub fn new(auth: JwtAuthenticator, uploads: UploadOrchestrator, production: bool) -> Self {
        Self {
            auth,
            uploads,
            production,
        }
    }
}
