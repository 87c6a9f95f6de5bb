//! Cleanup of raw model output.

const FENCE: &str = "```";

/// Body of the first fenced block (an optional `json` tag is dropped), or the
/// whole text when there is no complete block. Always trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let Some(open) = raw.find(FENCE) else {
        return raw.trim();
    };
    let after_open = &raw[open + FENCE.len()..];
    let Some(close) = after_open.find(FENCE) else {
        return raw.trim();
    };

    let inner = &after_open[..close];
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    if inner.is_empty() {
        return raw.trim();
    }
    inner.trim()
}

/// Drops `*`, `_` and `#` so feedback renders as plain text.
pub fn strip_markdown_emphasis(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '*' | '_' | '#'))
        .collect()
}
