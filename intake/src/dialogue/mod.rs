//! Dialogue engine
//!
//! A two-state machine (Active -> Concluded) that advances one turn per user
//! answer. Each turn renders the transcript and the stored knowledge into a
//! prompt and lets the model decide whether to ask another question or
//! summarize.

mod engine;
pub mod naming;
mod state;

pub use engine::{DEFAULT_TURN_MAX_TOKENS, DialogueEngine, DialogueError, TurnOutcome};
pub use naming::{derive_assistant_name, is_summary};
pub use state::{DialoguePhase, DialogueState, HistoryEntry, Speaker};
