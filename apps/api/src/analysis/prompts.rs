// Analysis prompt template.
// The reply shape requested here is what parser.rs expects to find.

use crate::analysis::models::AnalysisInput;
use crate::analysis::truncate_chars;

/// Only the head of the resume is sent to the model.
pub const MAX_RESUME_CHARS: usize = 2000;

/// Builds the single prompt sent to the model for one verification.
/// The username and URL are embedded verbatim; the resume is cut to `MAX_RESUME_CHARS`.
pub fn build_analysis_prompt(input: &AnalysisInput) -> String {
    let resume_content = truncate_chars(&input.resume_text, MAX_RESUME_CHARS);
    let github_username = &input.github_username;
    let linkedin_url = &input.linkedin_url;

    format!(
        r#"
You are an expert credential verification analyst. Analyze the following digital credentials for consistency and trustworthiness.

RESUME CONTENT:
{resume_content}

GITHUB USERNAME:
{github_username}

LINKEDIN URL:
{linkedin_url}

Please analyze:
1. Consistency between resume claims and GitHub/LinkedIn profiles
2. Credibility indicators (activity, completeness, alignment)
3. Potential red flags or inconsistencies

Provide your analysis in the following JSON format:
{{
    "trust_score": <number between 0-100>,
    "reasoning": "<detailed explanation of your analysis>",
    "badge": "<Verified|Needs Review|Unverified>"
}}

Focus on:
- Matching skills/projects between resume and GitHub
- Professional experience alignment with LinkedIn
- Overall credibility and consistency
"#
    )
}
