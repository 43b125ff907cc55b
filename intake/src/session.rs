//! One intake session: a knowledge store, a dialogue engine, and the state they
//! drive.

use std::path::Path;

use knowledgestore::{IngestError, KnowledgeStore, StoreError};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::DialogueConfig;
use crate::dialogue::{DialogueEngine, DialogueError, DialogueState, TurnOutcome, derive_assistant_name};

/// Errors from session operations
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Dialogue(#[from] DialogueError),
}

/// A running intake session
///
/// The knowledge file is shared by every session pointing at it, so each
/// turn reads it fresh rather than caching a copy.
pub struct Session {
    engine: DialogueEngine,
    store: KnowledgeStore,
    settings: DialogueConfig,
    state: DialogueState,
}

impl Session {
    /// Start a session with the configured default assistant name
    pub fn start(engine: DialogueEngine, store: KnowledgeStore, settings: DialogueConfig) -> Self {
        let state = DialogueState::new(&settings.default_assistant_name, &settings.opening_question);
        info!(session_id = %state.session_id(), assistant = %state.assistant_name(), "Session started");
        Self {
            engine,
            store,
            settings,
            state,
        }
    }

    pub fn state(&self) -> &DialogueState {
        &self.state
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    /// Ingest an uploaded document and start over with the derived name
    ///
    /// On failure the stored knowledge and the current dialogue are untouched.
    pub fn ingest(&mut self, bytes: &[u8]) -> Result<&DialogueState, SessionError> {
        debug!(len = bytes.len(), "Session::ingest: called");
        let text = knowledgestore::ingest(&self.store, bytes)?;
        let name = derive_assistant_name(&text, &self.settings.default_assistant_name);
        self.reset(name);
        Ok(&self.state)
    }

    /// Read a PDF from disk and [`ingest`](Self::ingest) it
    pub fn ingest_file(&mut self, path: impl AsRef<Path>) -> Result<&DialogueState, SessionError> {
        let path = path.as_ref();
        debug!(?path, "Session::ingest_file: called");
        let bytes = std::fs::read(path).map_err(|source| SessionError::Read {
            path: path.display().to_string(),
            source,
        })?;
        self.ingest(&bytes)
    }

    /// Answer the current question
    pub async fn advance_turn(&mut self, user_response: &str) -> Result<TurnOutcome, SessionError> {
        let knowledge = self.store.load()?.general_info;
        Ok(self.engine.advance_turn(&mut self.state, &knowledge, user_response).await?)
    }

    /// Start over with the same assistant name and knowledge
    pub fn restart(&mut self) {
        let name = self.state.assistant_name().to_string();
        self.reset(name);
    }

    fn reset(&mut self, assistant_name: String) {
        let previous = self.state.session_id();
        self.state = DialogueState::new(assistant_name, &self.settings.opening_question);
        info!(
            %previous,
            session_id = %self.state.session_id(),
            assistant = %self.state.assistant_name(),
            "Session reset"
        );
    }
}
