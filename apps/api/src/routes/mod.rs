pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::verification::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Browser flow
        .route("/", get(handlers::handle_landing))
        .route(
            "/verify",
            get(handlers::handle_verify_form).post(handlers::handle_verify_submit),
        )
        .route("/result/:session_id", get(handlers::handle_result_page))
        // JSON API
        .route("/api/verify", post(handlers::handle_verify_api))
        .route("/api/result/:session_id", get(handlers::handle_result_api))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::analyzer::test_support::{CannedGenerator, FailingGenerator};
    use crate::analysis::analyzer::CredentialAnalyzer;
    use crate::analysis::models::AnalysisInput;
    use crate::llm_client::TextGenerator;
    use crate::sessions::{session_id, InMemorySessionStore};
    use crate::verification::service::VerificationService;

    const PLAIN_REPLY: &str = "Looks good. trust_score: 88. Strong alignment.";

    fn router_with(generator: Arc<dyn TextGenerator>) -> Router {
        let verifier = VerificationService::new(
            CredentialAnalyzer::new(generator),
            Arc::new(InMemorySessionStore::new()),
        );
        build_router(AppState {
            verifier: Arc::new(verifier),
        })
    }

    fn octocat() -> AnalysisInput {
        AnalysisInput {
            resume_text: "Senior engineer with 5 years Python.".to_string(),
            github_username: "octocat".to_string(),
            linkedin_url: "https://linkedin.com/in/octocat".to_string(),
        }
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/verify")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        serde_json::from_str(&body_text(resp).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let app = router_with(Arc::new(FailingGenerator));
        let resp = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "credibleme-api");
    }

    #[tokio::test]
    async fn test_api_verify_returns_result_and_session_id() {
        let app = router_with(Arc::new(CannedGenerator::new(PLAIN_REPLY)));
        let resp = app
            .oneshot(json_request("/api/verify", serde_json::to_value(octocat()).unwrap()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["trust_score"], 88);
        assert_eq!(body["badge"], "Verified");
        assert_eq!(body["reasoning"], PLAIN_REPLY);
        assert_eq!(body["session_id"], session_id(&octocat()));
    }

    #[tokio::test]
    async fn test_api_verify_validation_error_is_400() {
        let generator = Arc::new(CannedGenerator::new(PLAIN_REPLY));
        let app = router_with(generator.clone());
        let resp = app
            .oneshot(json_request(
                "/api/verify",
                json!({"resume_text": " ", "github_username": "", "linkedin_url": ""}),
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Resume text is required");
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_api_verify_model_failure_is_500_with_description() {
        let app = router_with(Arc::new(FailingGenerator));
        let resp = app
            .oneshot(json_request("/api/verify", serde_json::to_value(octocat()).unwrap()))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.starts_with("Internal server error: "));
        assert!(message.contains("exhausted"));
    }

    #[tokio::test]
    async fn test_api_result_round_trip_and_not_found() {
        let app = router_with(Arc::new(CannedGenerator::new(r#"{"trust_score": 42}"#)));

        let resp = app
            .clone()
            .oneshot(json_request("/api/verify", serde_json::to_value(octocat()).unwrap()))
            .await
            .unwrap();
        let id = body_json(resp).await["session_id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = app
            .clone()
            .oneshot(get_request(&format!("/api/result/{id}")))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["trust_score"], 42);
        assert_eq!(body["reasoning"], "Analysis completed");
        assert_eq!(body["badge"], "Verified");
        assert_eq!(body["session_id"], id.as_str());

        let resp = app.oneshot(get_request("/api/result/ffffffff")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body = body_json(resp).await;
        assert_eq!(body["error"]["message"], "Session not found");
    }

    #[tokio::test]
    async fn test_form_submit_redirects_to_result_page() {
        let app = router_with(Arc::new(CannedGenerator::new(PLAIN_REPLY)));
        let form = "resume_text=Senior+engineer+with+5+years+Python.\
&github_username=octocat\
&linkedin_url=https%3A%2F%2Flinkedin.com%2Fin%2Foctocat";

        let resp = app.clone().oneshot(form_request(form)).await.unwrap();

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp
            .headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(location, format!("/result/{}", session_id(&octocat())));

        let resp = app.oneshot(get_request(&location)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("88"));
        assert!(html.contains("Verified"));
        assert!(html.contains("Strong alignment."));
    }

    #[tokio::test]
    async fn test_form_submit_validation_error_renders_error_page() {
        let app = router_with(Arc::new(CannedGenerator::new(PLAIN_REPLY)));
        let resp = app
            .oneshot(form_request("resume_text=resume&github_username=+&linkedin_url="))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let html = body_text(resp).await;
        assert!(html.contains("GitHub username is required"));
    }

    #[tokio::test]
    async fn test_form_submit_model_failure_renders_error_page() {
        let app = router_with(Arc::new(FailingGenerator));
        let resp = app
            .oneshot(form_request(
                "resume_text=resume&github_username=octocat&linkedin_url=url",
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = body_text(resp).await;
        assert!(html.contains("Internal server error: "));
    }

    #[tokio::test]
    async fn test_result_page_unknown_session() {
        let app = router_with(Arc::new(FailingGenerator));
        let resp = app.oneshot(get_request("/result/12345678")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let html = body_text(resp).await;
        assert!(html.contains("Session not found. Please verify your credentials again."));
    }

    #[tokio::test]
    async fn test_result_page_escapes_model_output() {
        let app = router_with(Arc::new(CannedGenerator::new(
            "<script>alert(1)</script> trust_score: 20",
        )));
        let resp = app
            .clone()
            .oneshot(json_request("/api/verify", serde_json::to_value(octocat()).unwrap()))
            .await
            .unwrap();
        let id = body_json(resp).await["session_id"]
            .as_str()
            .unwrap()
            .to_string();

        let resp = app
            .oneshot(get_request(&format!("/result/{id}")))
            .await
            .unwrap();
        let html = body_text(resp).await;
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("Needs Review"));
    }

    #[tokio::test]
    async fn test_pages_render() {
        let app = router_with(Arc::new(FailingGenerator));

        let resp = app.clone().oneshot(get_request("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("href=\"/verify\""));

        let resp = app.oneshot(get_request("/verify")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let html = body_text(resp).await;
        assert!(html.contains("name=\"resume_text\""));
        assert!(html.contains("name=\"github_username\""));
        assert!(html.contains("name=\"linkedin_url\""));
    }
}
