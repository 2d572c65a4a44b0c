//! Session storage: results keyed by a short id derived from the submitted fields.
//!
//! `VerificationService` holds an `Arc<dyn SessionStore>`; the default backend is process memory.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::analysis::models::{AnalysisInput, AnalysisResult};

/// Number of hex characters kept from the digest.
pub const SESSION_ID_LEN: usize = 8;

/// Deterministic id for a submission: MD5 of the three raw fields concatenated,
/// cut to `SESSION_ID_LEN` hex characters. Not a security token.
pub fn session_id(input: &AnalysisInput) -> String {
    let raw = format!(
        "{}{}{}",
        input.resume_text, input.github_username, input.linkedin_url
    );
    let mut digest = format!("{:x}", md5::compute(raw));
    digest.truncate(SESSION_ID_LEN);
    digest
}

/// Key-value store for completed analyses. Implement this to move sessions
/// out of process memory without touching the request handlers.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Option<AnalysisResult>;

    /// Stores `result`, replacing any earlier result for the same id.
    async fn put(&self, session_id: String, result: AnalysisResult);
}

/// Process-lifetime store. No expiry, no eviction; lost on restart.
#[derive(Default)]
pub struct InMemorySessionStore {
    entries: RwLock<HashMap<String, AnalysisResult>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Option<AnalysisResult> {
        self.entries.read().await.get(session_id).cloned()
    }

    async fn put(&self, session_id: String, result: AnalysisResult) {
        self.entries.write().await.insert(session_id, result);
    }
}
