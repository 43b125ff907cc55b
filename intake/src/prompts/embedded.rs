//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Per-turn dialogue prompt
pub const ASSISTANT: &str = include_str!("../../prompts/assistant.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "assistant" => Some(ASSISTANT),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
