//! Dialogue state owned by one session

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who said a history line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Tag used in the transcript
    pub fn tag(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
        }
    }
}

/// One line of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub speaker: Speaker,
    pub text: String,
}

impl fmt::Display for HistoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker.tag(), self.text)
    }
}

/// Where the dialogue is in its two-state lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DialoguePhase {
    /// Still asking questions
    Active,
    /// The model produced its summary; terminal
    Concluded,
}

/// Conversation state for one session
///
/// Only [`DialogueEngine::advance_turn`](super::DialogueEngine::advance_turn)
/// mutates it, so history is append-only and the phase moves
/// Active -> Concluded at most once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueState {
    session_id: Uuid,
    assistant_name: String,
    history: Vec<HistoryEntry>,
    current_question: String,
    done: bool,
}

impl DialogueState {
    pub fn new(assistant_name: impl Into<String>, opening_question: impl Into<String>) -> Self {
        Self {
            session_id: Uuid::now_v7(),
            assistant_name: assistant_name.into(),
            history: Vec::new(),
            current_question: opening_question.into(),
            done: false,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// The question to show next
    ///
    /// After conclusion this still holds the last question asked, not the
    /// summary; the summary lives only in the history.
    pub fn current_question(&self) -> &str {
        &self.current_question
    }

    pub fn is_concluded(&self) -> bool {
        self.done
    }

    pub fn phase(&self) -> DialoguePhase {
        if self.done {
            DialoguePhase::Concluded
        } else {
            DialoguePhase::Active
        }
    }

    /// Number of completed turns
    pub fn turns(&self) -> usize {
        self.history.len() / 2
    }

    /// The tagged transcript, one `User:`/`Assistant:` entry per line
    pub fn transcript(&self) -> String {
        self.history.iter().map(|entry| format!("{}\n", entry)).collect()
    }

    /// Transcript with a pending user line appended, as sent to the model
    pub(super) fn transcript_with_user(&self, user_response: &str) -> String {
        let pending = HistoryEntry {
            speaker: Speaker::User,
            text: user_response.to_string(),
        };
        format!("{}{}\n", self.transcript(), pending)
    }

    /// Commit a finished turn
    pub(super) fn record_turn(&mut self, user_response: &str, reply: &str, concluded: bool) {
        self.history.push(HistoryEntry {
            speaker: Speaker::User,
            text: user_response.to_string(),
        });
        self.history.push(HistoryEntry {
            speaker: Speaker::Assistant,
            text: reply.to_string(),
        });

        if concluded {
            self.done = true;
        } else {
            self.current_question = reply.to_string();
        }
    }
}
