//! Turn-by-turn dialogue engine

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::naming::is_summary;
use super::state::DialogueState;
use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, StopReason};
use crate::prompts::{PromptContext, PromptLoader};

/// Default response budget for one turn
pub const DEFAULT_TURN_MAX_TOKENS: u32 = 1024;

/// Errors from advancing a dialogue turn
///
/// Whatever the error, the state is left as it was before the call.
#[derive(Debug, Error)]
pub enum DialogueError {
    #[error("Dialogue has concluded; start a new session to continue")]
    Concluded,

    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),

    #[error("Model returned no text content")]
    EmptyResponse,

    #[error("Failed to build prompt: {0}")]
    Prompt(String),
}

/// What the model said this turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Next question to put to the user
    Question(String),
    /// Concluding summary; the dialogue is over
    Summary(String),
}

impl TurnOutcome {
    pub fn text(&self) -> &str {
        match self {
            TurnOutcome::Question(text) | TurnOutcome::Summary(text) => text,
        }
    }

    pub fn is_summary(&self) -> bool {
        matches!(self, TurnOutcome::Summary(_))
    }
}

/// Advances a [`DialogueState`] by delegating each turn to the model
pub struct DialogueEngine {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl DialogueEngine {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader) -> Self {
        Self {
            llm,
            prompts,
            max_tokens: DEFAULT_TURN_MAX_TOKENS,
            temperature: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The five prompt fields for a turn answering `user_response`
    pub fn prompt_context(&self, state: &DialogueState, knowledge: &str, user_response: &str) -> PromptContext {
        PromptContext {
            assistant_name: state.assistant_name().to_string(),
            knowledge: knowledge.to_string(),
            history: state.transcript_with_user(user_response),
            current_question: state.current_question().to_string(),
            user_response: user_response.to_string(),
        }
    }

    /// Render the prompt a turn would send, without sending it
    pub fn render_prompt(
        &self,
        state: &DialogueState,
        knowledge: &str,
        user_response: &str,
    ) -> Result<String, DialogueError> {
        let context = self.prompt_context(state, knowledge, user_response);
        self.prompts
            .render_turn(&context)
            .map_err(|e| DialogueError::Prompt(e.to_string()))
    }

    /// Run one turn: prompt the model with the transcript plus the new answer
    ///
    /// On success the user line and the reply are appended to history. A reply
    /// containing "summary" (any case) concludes the dialogue and leaves the
    /// current question untouched; otherwise the reply becomes the next
    /// question. Nothing is retried.
    pub async fn advance_turn(
        &self,
        state: &mut DialogueState,
        knowledge: &str,
        user_response: &str,
    ) -> Result<TurnOutcome, DialogueError> {
        let session_id = state.session_id();
        debug!(%session_id, turn = state.turns() + 1, "advance_turn: called");

        if state.is_concluded() {
            debug!(%session_id, "advance_turn: already concluded");
            return Err(DialogueError::Concluded);
        }

        let prompt = self.render_prompt(state, knowledge, user_response)?;
        let request = CompletionRequest {
            system_prompt: String::new(),
            messages: vec![Message::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.llm.complete(request).await.inspect_err(|e| {
            warn!(%session_id, error = %e, "advance_turn: model call failed");
        })?;

        if response.stop_reason == StopReason::MaxTokens {
            warn!(%session_id, "advance_turn: reply truncated at max tokens");
        }

        let reply = response.content.ok_or(DialogueError::EmptyResponse)?;

        let concluded = is_summary(&reply);
        state.record_turn(user_response, &reply, concluded);

        info!(
            %session_id,
            turn = state.turns(),
            concluded,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Dialogue turn complete"
        );

        Ok(if concluded {
            TurnOutcome::Summary(reply)
        } else {
            TurnOutcome::Question(reply)
        })
    }
}
