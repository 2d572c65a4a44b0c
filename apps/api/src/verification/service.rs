//! Verification Service: validate, analyze, store, retrieve.
//!
//! Shared by the HTML form flow and the JSON API flow; the handlers only
//! decide how an outcome is presented.

use std::sync::Arc;

use tracing::info;

use crate::analysis::analyzer::CredentialAnalyzer;
use crate::analysis::models::{AnalysisInput, AnalysisResult};
use crate::errors::AppError;
use crate::sessions::{session_id, SessionStore};

pub const SESSION_NOT_FOUND: &str = "Session not found";

/// Checks the three fields in fixed order and reports only the first empty one.
pub fn validate(input: &AnalysisInput) -> Result<(), AppError> {
    let checks = [
        (&input.resume_text, "Resume text is required"),
        (&input.github_username, "GitHub username is required"),
        (&input.linkedin_url, "LinkedIn URL is required"),
    ];

    for (value, message) in checks {
        if value.trim().is_empty() {
            return Err(AppError::Validation(message.to_string()));
        }
    }

    Ok(())
}

pub struct VerificationService {
    analyzer: CredentialAnalyzer,
    store: Arc<dyn SessionStore>,
}

impl VerificationService {
    pub fn new(analyzer: CredentialAnalyzer, store: Arc<dyn SessionStore>) -> Self {
        Self { analyzer, store }
    }

    /// Validates, analyzes and stores one submission.
    /// Nothing is stored unless the analysis completed.
    pub async fn handle(
        &self,
        input: &AnalysisInput,
    ) -> Result<(AnalysisResult, String), AppError> {
        validate(input)?;

        let result = self.analyzer.analyze(input).await?;

        let id = session_id(input);
        self.store.put(id.clone(), result.clone()).await;
        info!("Stored analysis under session {id}");

        Ok((result, id))
    }

    pub async fn retrieve(&self, session_id: &str) -> Result<AnalysisResult, AppError> {
        self.store
            .get(session_id)
            .await
            .ok_or_else(|| AppError::NotFound(SESSION_NOT_FOUND.to_string()))
    }
}
