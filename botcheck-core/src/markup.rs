//! Normalization of message text before matching.
//!
//! Bot replies are rendered with Markdown; when the rendering path leaks, literal bold/italic
//! markers end up in the text the transport hands back. Matching is done on the stripped text.

const MARKERS: [&str; 2] = ["**", "__"];

/// Strips literal `**` / `__` markers and surrounding whitespace. Idempotent: removal is repeated
/// until no marker is left, so `"*__*"` becomes `""` rather than `"**"`.
pub fn normalize_markup(text: &str) -> String {
    let mut out = text.to_string();
    while MARKERS.iter().any(|m| out.contains(m)) {
        for marker in MARKERS {
            out = out.replace(marker, "");
        }
    }
    out.trim().to_string()
}

/// Truncates to at most `max_chars` characters, appending `…` when something was cut.
pub fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
