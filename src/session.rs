//! Per-user explorer state.
//!
//! A [`Session`] holds what one user is looking at: the uploaded tables, which one is
//! selected, the chat about it, and whether the upload form was submitted.

use std::sync::Arc;

use rand::Rng;

use crate::cache::TableSetCache;
use crate::chat::{AgentSettings, ChatMessage, ChatTranscript, ConversationalAnalysisAgent};
use crate::config::ExplorerConfig;
use crate::error::{PreviewError, SessionError};
use crate::ingestion::{Artifact, Dispatcher, ParserOptions};
use crate::preview::{preview, PreviewMode, PreviewSection};
use crate::types::{Table, TableSet};

#[derive(Debug)]
pub struct Session {
    config: ExplorerConfig,
    dispatcher: Dispatcher,
    cache: Arc<TableSetCache>,
    agent_settings: AgentSettings,
    tables: Option<Arc<TableSet>>,
    selected: Option<String>,
    transcript: Option<ChatTranscript>,
    submitted: bool,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(ExplorerConfig::default())
    }
}

impl Session {
    /// A session with its own cache.
    pub fn new(config: ExplorerConfig) -> Self {
        let cache = Arc::new(TableSetCache::new(config.cache_ttl()));
        Self::with_cache(config, cache)
    }

    /// A session sharing `cache` with other sessions.
    pub fn with_cache(config: ExplorerConfig, cache: Arc<TableSetCache>) -> Self {
        Self {
            dispatcher: config.dispatcher(),
            agent_settings: config.agent.clone(),
            config,
            cache,
            tables: None,
            selected: None,
            transcript: None,
            submitted: false,
        }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn agent_settings(&self) -> &AgentSettings {
        &self.agent_settings
    }

    pub fn agent_settings_mut(&mut self) -> &mut AgentSettings {
        &mut self.agent_settings
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.agent_settings.api_key = Some(key.into());
    }

    /// Load `artifact` and select its first table.
    ///
    /// On failure the previously loaded tables are kept. The submit flag is cleared either way.
    pub fn upload(&mut self, artifact: &Artifact, options: &ParserOptions) -> Result<(), SessionError> {
        self.submitted = false;

        let tables = self
            .cache
            .get_or_load(&self.dispatcher, artifact, options)
            .ok_or(SessionError::LoadFailed)?;

        let first = tables.first().map(|(name, _)| name.to_string());
        self.tables = Some(tables);
        self.selected = None;
        self.transcript = None;
        if let Some(name) = first {
            self.select(&name)?;
        }
        Ok(())
    }

    /// Names of the loaded tables, in load order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.as_deref().map(TableSet::names).unwrap_or_default()
    }

    /// Switch to another loaded table. Resets the chat.
    pub fn select(&mut self, name: &str) -> Result<(), SessionError> {
        let table = self
            .tables
            .as_deref()
            .ok_or(SessionError::NothingLoaded)?
            .get(name)
            .ok_or_else(|| SessionError::UnknownTable(name.to_string()))?;

        self.transcript = Some(ChatTranscript::new(table));
        self.selected = Some(name.to_string());
        tracing::debug!(table = name, "selected table");
        Ok(())
    }

    /// The selected table and its name.
    pub fn selected(&self) -> Option<(&str, &Table)> {
        let name = self.selected.as_deref()?;
        let table = self.tables.as_deref()?.get(name)?;
        Some((name, table))
    }

    /// One-line description of the selection.
    pub fn summary(&self) -> Option<String> {
        self.selected().map(|(name, table)| {
            let (rows, cols) = table.shape();
            format!("Selected {name} with {rows} rows and {cols} columns.")
        })
    }

    /// Preview of the selected table.
    pub fn preview<R: Rng + ?Sized>(
        &self,
        mode: PreviewMode,
        rng: &mut R,
    ) -> Option<Result<Vec<PreviewSection>, PreviewError>> {
        self.selected().map(|(_, table)| preview(table, mode, rng))
    }

    pub fn submit(&mut self) {
        self.submitted = true;
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn clear_submit(&mut self) {
        self.submitted = false;
    }

    /// Chat history for the selected table.
    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript
            .as_ref()
            .map(ChatTranscript::messages)
            .unwrap_or_default()
    }

    /// Reset the chat for the selected table.
    pub fn clear_chat(&mut self) {
        if let Some((_, table)) = self.selected() {
            let fresh = ChatTranscript::new(table);
            self.transcript = Some(fresh);
        }
    }

    /// Ask the agent about the selected table.
    pub fn ask(
        &mut self,
        prompt: &str,
        agent: &dyn ConversationalAnalysisAgent,
    ) -> Result<String, SessionError> {
        let name = self.selected.as_deref().ok_or(SessionError::NothingLoaded)?;
        let table = self
            .tables
            .as_deref()
            .and_then(|tables| tables.get(name))
            .ok_or(SessionError::NothingLoaded)?;
        let transcript = self
            .transcript
            .get_or_insert_with(|| ChatTranscript::new(table));

        let reply = transcript.ask(prompt, table, agent, &self.agent_settings)?;
        Ok(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::chat::Role;
    use crate::error::{AgentError, ChatError};

    struct CountingAgent;

    impl ConversationalAnalysisAgent for CountingAgent {
        fn run(
            &self,
            _settings: &AgentSettings,
            table: &Table,
            _messages: &[ChatMessage],
        ) -> Result<String, AgentError> {
            Ok(format!("{} rows", table.row_count()))
        }
    }

    fn sales() -> Artifact {
        Artifact::upload("sales.csv", "date,amount\n2024-01-01,10\n2024-01-02,12\n")
    }

    #[test]
    fn upload_selects_first_table() {
        let mut session = Session::default();
        session.submit();
        session.upload(&sales(), &ParserOptions::new()).unwrap();

        assert!(!session.is_submitted());
        assert_eq!(session.table_names(), vec!["sales.csv"]);
        assert_eq!(
            session.summary().as_deref(),
            Some("Selected sales.csv with 2 rows and 2 columns.")
        );
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn failed_upload_reports_load_failed() {
        let mut session = Session::default();
        let err = session
            .upload(&Artifact::upload("notes.txt", "hi"), &ParserOptions::new())
            .unwrap_err();
        assert_eq!(err, SessionError::LoadFailed);
        assert_eq!(
            err.to_string(),
            "Failed to load data. Please check the file and try again."
        );
        assert!(session.selected().is_none());
    }

    #[test]
    fn select_rejects_unknown_tables() {
        let mut session = Session::default();
        assert_eq!(session.select("x"), Err(SessionError::NothingLoaded));

        session.upload(&sales(), &ParserOptions::new()).unwrap();
        assert_eq!(
            session.select("Sheet1"),
            Err(SessionError::UnknownTable("Sheet1".to_string()))
        );
        assert_eq!(session.selected().map(|(n, _)| n), Some("sales.csv"));
    }

    #[test]
    fn ask_needs_a_key_then_answers() {
        let mut session = Session::default();
        session.upload(&sales(), &ParserOptions::new()).unwrap();

        assert_eq!(
            session.ask("how many rows?", &CountingAgent),
            Err(SessionError::Chat(ChatError::MissingApiKey))
        );

        session.set_api_key("sk-test");
        assert_eq!(session.ask("how many rows?", &CountingAgent).unwrap(), "2 rows");
        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::User, Role::Assistant]
        );

        session.clear_chat();
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn ask_without_upload_fails() {
        let mut session = Session::default();
        assert_eq!(
            session.ask("hi", &CountingAgent),
            Err(SessionError::NothingLoaded)
        );
    }

    #[test]
    fn preview_uses_selected_table() {
        let mut session = Session::default();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(session.preview(PreviewMode::default(), &mut rng).is_none());

        session.upload(&sales(), &ParserOptions::new()).unwrap();
        let sections = session
            .preview(PreviewMode::RandomSample { n: 2 }, &mut rng)
            .unwrap()
            .unwrap();
        assert_eq!(sections[0].rows.row_count(), 2);
    }
}
