//! Chat about a table through a [`ConversationalAnalysisAgent`].
//!
//! A [`ChatTranscript`] starts with a system message built from the table's columns and
//! grows by one user message per question and one assistant message per answer.

mod agent;

use serde::Serialize;

use crate::error::ChatError;
use crate::types::Table;

pub use agent::{AgentSettings, ConversationalAnalysisAgent, MAX_TEMPERATURE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// System prompt restricting the assistant to analysis of the given columns.
pub fn system_instructions<'a>(columns: impl IntoIterator<Item = &'a str>) -> String {
    let columns = columns.into_iter().collect::<Vec<_>>().join(", ");
    format!(
        "You are a data analysis assistant for a table with exactly these columns: {columns}. \
         Help summarize the data, look up specific values, and run basic statistics on these \
         columns: minimum, maximum, outliers, percentiles, comparisons (> < <= >= =), ranges and \
         hypothesis tests. Run any analysis code you write, including every import it needs, \
         and report the results. When describing the data, give for each requested column one \
         qualitative line on what it holds and the quantitative details (range, outliers, \
         number of missing or malformed values). Decline questions that are not about \
         analysing this table or its columns ({columns})."
    )
}

/// Conversation history for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    /// A transcript holding only the system instructions for `table`.
    pub fn new(table: &Table) -> Self {
        Self {
            messages: vec![ChatMessage::new(
                Role::System,
                system_instructions(table.schema.field_names()),
            )],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Drop the history, keeping fresh system instructions for `table`.
    pub fn clear(&mut self, table: &Table) {
        *self = Self::new(table);
    }

    /// Ask one question.
    ///
    /// The user message is recorded before the settings are checked, so a missing key
    /// still leaves the question in the history. The assistant message is only recorded when
    /// the agent answers.
    pub fn ask(
        &mut self,
        prompt: &str,
        table: &Table,
        agent: &dyn ConversationalAnalysisAgent,
        settings: &AgentSettings,
    ) -> Result<&str, ChatError> {
        if prompt.trim().is_empty() {
            return Err(ChatError::EmptyPrompt);
        }
        self.messages.push(ChatMessage::new(Role::User, prompt));

        if settings.api_key().is_none() {
            return Err(ChatError::MissingApiKey);
        }
        if !(0.0..=MAX_TEMPERATURE).contains(&settings.temperature) {
            return Err(ChatError::InvalidTemperature(settings.temperature));
        }

        let reply = agent.run(settings, table, &self.messages).inspect_err(|e| {
            tracing::warn!(model = %settings.model, "agent failed: {e}");
        })?;
        self.messages.push(ChatMessage::new(Role::Assistant, reply));
        Ok(self
            .messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default())
    }
}
