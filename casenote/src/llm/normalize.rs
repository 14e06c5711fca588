use std::sync::OnceLock;

use regex::Regex;

use crate::error::{CasenoteError, Result};
use crate::llm::response::ProviderResponse;

/// Header prepended to every normalized summary.
pub const SUMMARY_HEADER: &str = "Medical Case Summary";

fn echo_prefix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*summarize:\s*").expect("valid regex"))
}

fn visit_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)visit \d+:").expect("valid regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"))
}

/// Normalize a raw provider response into presentation form.
///
/// Extractive models tend to echo the task prefix and the visit markers
/// from the prompt; both are stripped before the header is attached.
pub fn normalize(response: &ProviderResponse) -> Result<String> {
    let raw = response.text().ok_or_else(|| {
        CasenoteError::InvalidResponse("no recognized text field in provider response".to_string())
    })?;

    let cleaned = clean_summary_text(raw);
    if cleaned.is_empty() {
        return Err(CasenoteError::InvalidResponse(
            "provider returned empty summary text".to_string(),
        ));
    }

    Ok(format!("{SUMMARY_HEADER}\n\n{cleaned}"))
}

/// Strip prompt artifacts and collapse whitespace.
pub fn clean_summary_text(text: &str) -> String {
    let without_echo = echo_prefix_re().replace(text, "");
    let without_markers = visit_marker_re().replace_all(&without_echo, "");
    whitespace_re()
        .replace_all(&without_markers, " ")
        .trim()
        .to_string()
}
