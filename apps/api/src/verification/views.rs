//! Server-rendered HTML pages for the browser flow.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::analysis::models::{AnalysisResult, Badge};

const STYLE: &str = "body{font-family:system-ui,sans-serif;max-width:44rem;margin:2rem auto;padding:0 1rem;color:#1f2933}\
textarea,input{width:100%;box-sizing:border-box;margin:.25rem 0 1rem;padding:.5rem}\
textarea{min-height:12rem}.score{font-size:3rem;font-weight:700}\
.badge{display:inline-block;padding:.25rem .75rem;border-radius:1rem;color:#fff}\
.verified{background:#2f855a}.needs-review{background:#b7791f}.unverified{background:#c53030}\
.error{border-left:4px solid #c53030;padding:.5rem 1rem;background:#fff5f5}";

/// Escapes text for use inside HTML element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><meta charset=\"utf-8\">\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
<title>{title} · CredibleMe</title><style>{STYLE}</style></head><body>\
<header><a href=\"/\"><strong>CredibleMe</strong></a></header>\
<main>{body}</main></body></html>"
    )
}

fn html_response(status: StatusCode, html: String) -> Response {
    (status, Html(html)).into_response()
}

fn badge_class(badge: Badge) -> &'static str {
    match badge {
        Badge::Verified => "verified",
        Badge::NeedsReview => "needs-review",
        Badge::Unverified => "unverified",
    }
}

pub fn landing_page() -> Response {
    let body = "<h1>Privacy-friendly credential verification</h1>\
<p>Paste your resume and point us at your GitHub and LinkedIn profiles. \
An AI analyst checks them for consistency and returns a trust score with its reasoning.</p>\
<p>Nothing is stored on disk: results live in server memory until it restarts.</p>\
<p><a href=\"/verify\">Verify your credentials</a></p>";
    html_response(StatusCode::OK, page("Home", body))
}

pub fn verify_form_page() -> Response {
    let body = "<h1>Verify your credentials</h1>\
<form method=\"post\" action=\"/verify\">\
<label for=\"resume_text\">Resume text</label>\
<textarea id=\"resume_text\" name=\"resume_text\" required></textarea>\
<label for=\"github_username\">GitHub username</label>\
<input id=\"github_username\" name=\"github_username\" type=\"text\" required>\
<label for=\"linkedin_url\">LinkedIn URL</label>\
<input id=\"linkedin_url\" name=\"linkedin_url\" type=\"url\" required>\
<button type=\"submit\">Analyze</button>\
</form>";
    html_response(StatusCode::OK, page("Verify", body))
}

pub fn result_page(result: &AnalysisResult, session_id: &str) -> Response {
    let body = format!(
        "<h1>Verification result</h1>\
<p class=\"score\">{score}<small>/100</small></p>\
<p><span class=\"badge {class}\">{badge}</span></p>\
<h2>Reasoning</h2><p>{reasoning}</p>\
<p>Session: <code>{session}</code></p>\
<p><a href=\"/verify\">Verify again</a></p>",
        score = result.trust_score,
        class = badge_class(result.badge),
        badge = escape_html(result.badge.as_str()),
        reasoning = escape_html(&result.reasoning),
        session = escape_html(session_id),
    );
    html_response(StatusCode::OK, page("Result", &body))
}

pub fn error_page(status: StatusCode, message: &str) -> Response {
    let body = format!(
        "<h1>Something went wrong</h1>\
<p class=\"error\">{}</p>\
<p><a href=\"/verify\">Back to the form</a></p>",
        escape_html(message)
    );
    html_response(status, page("Error", &body))
}
