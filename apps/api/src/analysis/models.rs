use std::fmt;

use serde::{Deserialize, Serialize};

/// Score at or above which a derived badge is `Verified`.
pub const VERIFIED_THRESHOLD: u32 = 70;

/// The three fields a candidate submits for verification.
/// Values are kept raw; trimming only happens during validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub resume_text: String,
    pub github_username: String,
    pub linkedin_url: String,
}

/// Categorical trust label shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Badge {
    Verified,
    #[serde(rename = "Needs Review")]
    NeedsReview,
    Unverified,
}

impl Badge {
    pub fn as_str(&self) -> &'static str {
        match self {
            Badge::Verified => "Verified",
            Badge::NeedsReview => "Needs Review",
            Badge::Unverified => "Unverified",
        }
    }

    /// Matches a model-supplied label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        [Badge::Verified, Badge::NeedsReview, Badge::Unverified]
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(label))
    }

    /// Badge derived purely from the score. Never yields `Unverified`.
    pub fn for_score(score: u32) -> Self {
        if score >= VERIFIED_THRESHOLD {
            Badge::Verified
        } else {
            Badge::NeedsReview
        }
    }
}

impl fmt::Display for Badge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed trust assessment. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub trust_score: u32, // 0 – 100
    pub reasoning: String,
    pub badge: Badge,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_badge_serializes_display_labels() {
        assert_eq!(serde_json::to_string(&Badge::Verified).unwrap(), r#""Verified""#);
        assert_eq!(
            serde_json::to_string(&Badge::NeedsReview).unwrap(),
            r#""Needs Review""#
        );
        assert_eq!(
            serde_json::to_string(&Badge::Unverified).unwrap(),
            r#""Unverified""#
        );
    }

    #[test]
    fn test_badge_deserializes_needs_review() {
        let badge: Badge = serde_json::from_str(r#""Needs Review""#).unwrap();
        assert_eq!(badge, Badge::NeedsReview);
    }

    #[test]
    fn test_badge_from_label_is_lenient_about_case_and_whitespace() {
        assert_eq!(Badge::from_label(" verified "), Some(Badge::Verified));
        assert_eq!(Badge::from_label("NEEDS REVIEW"), Some(Badge::NeedsReview));
        assert_eq!(Badge::from_label("Unverified"), Some(Badge::Unverified));
        assert_eq!(Badge::from_label("Trusted"), None);
    }

    #[test]
    fn test_badge_for_score_threshold() {
        assert_eq!(Badge::for_score(70), Badge::Verified);
        assert_eq!(Badge::for_score(100), Badge::Verified);
        assert_eq!(Badge::for_score(69), Badge::NeedsReview);
        assert_eq!(Badge::for_score(0), Badge::NeedsReview);
    }

    #[test]
    fn test_analysis_result_json_shape() {
        let result = AnalysisResult {
            trust_score: 42,
            reasoning: "Sparse GitHub history".to_string(),
            badge: Badge::NeedsReview,
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["trust_score"], 42);
        assert_eq!(value["reasoning"], "Sparse GitHub history");
        assert_eq!(value["badge"], "Needs Review");
    }
}
