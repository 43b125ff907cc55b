//! String heuristics the dialogue relies on
//!
//! A question that happens to contain the word "summary" ends the dialogue,
//! and the assistant name is whatever follows the first "Full Name" marker.

/// Marker that introduces the assistant name in an uploaded document
pub const FULL_NAME_MARKER: &str = "Full Name";

/// Word whose presence in a reply ends the dialogue
pub const SUMMARY_MARKER: &str = "summary";

/// Derive the assistant name from extracted document text
///
/// The first line containing [`FULL_NAME_MARKER`] wins. The name is the text
/// after the marker (up to a second marker on the same line, if any), trimmed
/// of whitespace; punctuation such as a leading `:` is kept. Falls back to
/// `default` when no line has the marker.
pub fn derive_assistant_name(text: &str, default: &str) -> String {
    text.split(is_line_break)
        .find_map(|line| line.split(FULL_NAME_MARKER).nth(1))
        .map(|name| name.trim().to_string())
        .unwrap_or_else(|| default.to_string())
}

/// True when a model reply reads as the concluding summary
pub fn is_summary(reply: &str) -> bool {
    reply.to_lowercase().contains(SUMMARY_MARKER)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
