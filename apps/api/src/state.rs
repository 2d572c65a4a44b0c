use std::sync::Arc;

use crate::verification::service::VerificationService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Validation, analysis and session storage behind one handle.
    /// The session backend inside is swappable via `SessionStore`.
    pub verifier: Arc<VerificationService>,
}
