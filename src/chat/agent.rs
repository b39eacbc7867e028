use serde::Deserialize;

use crate::error::AgentError;
use crate::types::Table;

use super::ChatMessage;

/// Highest temperature the chat accepts.
pub const MAX_TEMPERATURE: f64 = 0.5;

/// Model settings handed to the agent on every turn.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub model: String,
    /// `0.0..=0.5`.
    pub temperature: f64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.0,
            api_key: None,
        }
    }
}

impl std::fmt::Debug for AgentSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSettings")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("api_key_set", &self.api_key.is_some())
            .finish()
    }
}

impl AgentSettings {
    /// The API key, if one was entered (blank keys count as missing).
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

/// An LLM-backed agent that answers questions by analysing `table`.
///
/// Implementations receive the full transcript, system instructions first.
pub trait ConversationalAnalysisAgent {
    fn run(
        &self,
        settings: &AgentSettings,
        table: &Table,
        messages: &[ChatMessage],
    ) -> Result<String, AgentError>;
}
