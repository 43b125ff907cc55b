//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files.
//!
//! Template loading chain:
//! 1. `.intake/prompts/{name}.pmt` (user override)
//! 2. `prompts/{name}.pmt` (project default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution. Values are
//! inserted verbatim; no HTML escaping is applied.

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader};

/// Name of the per-turn dialogue template
pub const ASSISTANT_TEMPLATE: &str = "assistant";
