//! Credential Analyzer: one prompt, one model call, one parsed result.

use std::sync::Arc;

use tracing::info;

use crate::analysis::models::{AnalysisInput, AnalysisResult};
use crate::analysis::parser::parse_reply;
use crate::analysis::prompts::build_analysis_prompt;
use crate::llm_client::{LlmError, TextGenerator};

/// Wraps a `TextGenerator` with the credential-analysis prompt and reply parser.
/// Holds no per-call state.
#[derive(Clone)]
pub struct CredentialAnalyzer {
    generator: Arc<dyn TextGenerator>,
}

impl CredentialAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Runs one analysis. Generator failures are returned as-is; an oddly
    /// shaped reply is never an error.
    pub async fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisResult, LlmError> {
        let prompt = build_analysis_prompt(input);
        let reply = self.generator.generate(&prompt).await?;
        let result = parse_reply(&reply);

        info!(
            "Analysis complete for github user {}: score={} badge={}",
            input.github_username, result.trust_score, result.badge
        );

        Ok(result)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{CannedGenerator, FailingGenerator};
    use super::*;
    use crate::analysis::models::Badge;

    fn octocat() -> AnalysisInput {
        AnalysisInput {
            resume_text: "Senior engineer with 5 years Python.".to_string(),
            github_username: "octocat".to_string(),
            linkedin_url: "https://linkedin.com/in/octocat".to_string(),
        }
    }

    #[tokio::test]
    async fn test_analyze_plain_text_reply_uses_text_tier() {
        let generator = Arc::new(CannedGenerator::new(
            "Looks good. trust_score: 88. Strong alignment.",
        ));
        let analyzer = CredentialAnalyzer::new(generator.clone());

        let result = analyzer.analyze(&octocat()).await.unwrap();

        assert_eq!(result.trust_score, 88);
        assert_eq!(result.badge, Badge::Verified);
        assert_eq!(result.reasoning, "Looks good. trust_score: 88. Strong alignment.");
        assert_eq!(generator.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_sends_prompt_with_inputs() {
        let generator = Arc::new(CannedGenerator::new(r#"{"trust_score": 42}"#));
        let analyzer = CredentialAnalyzer::new(generator.clone());

        analyzer.analyze(&octocat()).await.unwrap();

        let prompts = generator.prompts.lock().unwrap();
        assert!(prompts[0].contains("octocat"));
        assert!(prompts[0].contains("https://linkedin.com/in/octocat"));
        assert!(prompts[0].contains("Senior engineer with 5 years Python."));
    }

    #[tokio::test]
    async fn test_analyze_propagates_generator_failure() {
        let analyzer = CredentialAnalyzer::new(Arc::new(FailingGenerator));

        let err = analyzer.analyze(&octocat()).await.unwrap_err();

        assert!(matches!(err, LlmError::Api { status: 429, .. }));
    }
}
