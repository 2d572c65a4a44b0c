// Analysis Client: prompt construction, one Gemini call, best-effort reply parsing.
// All model calls go through llm_client::TextGenerator: never reqwest directly.

pub mod analyzer;
pub mod models;
pub mod parser;
pub mod prompts;

/// Returns at most the first `max_chars` characters of `text`, never splitting a character.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
