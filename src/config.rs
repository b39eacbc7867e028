//! Explorer configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) is a valid configuration:
//!
//! ```toml
//! cache_ttl_secs = 7200
//!
//! [preview]
//! head = 5
//! tail = 5
//! sample = 5
//!
//! [agent]
//! model = "gpt-3.5-turbo"
//! temperature = 0.0
//!
//! [ingestion]
//! alert_at_or_above = "critical"
//! log_file = "ingestion.log"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::chat::AgentSettings;
use crate::error::ConfigError;
use crate::ingestion::{
    CompositeObserver, Dispatcher, FileObserver, IngestionObserver, IngestionSeverity, TracingObserver,
};
use crate::preview::PreviewMode;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerConfig {
    pub cache_ttl_secs: u64,
    pub preview: PreviewConfig,
    pub agent: AgentSettings,
    pub ingestion: IngestionConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 7200,
            preview: PreviewConfig::default(),
            agent: AgentSettings::default(),
            ingestion: IngestionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreviewConfig {
    pub head: usize,
    pub tail: usize,
    pub sample: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            head: 5,
            tail: 5,
            sample: 5,
        }
    }
}

impl PreviewConfig {
    pub fn head_tail(&self) -> PreviewMode {
        PreviewMode::HeadTail {
            head: self.head,
            tail: self.tail,
        }
    }

    pub fn random_sample(&self) -> PreviewMode {
        PreviewMode::RandomSample { n: self.sample }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IngestionConfig {
    /// Failures at or above this severity trigger `on_alert`.
    pub alert_at_or_above: IngestionSeverity,
    /// When set, load outcomes are also appended to this file.
    pub log_file: Option<PathBuf>,
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            alert_at_or_above: IngestionSeverity::Critical,
            log_file: None,
        }
    }
}

impl ExplorerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// A dispatcher over the default registry that logs through `tracing` and, if
    /// configured, to `log_file`.
    pub fn dispatcher(&self) -> Dispatcher {
        let mut observers: Vec<Arc<dyn IngestionObserver>> = vec![Arc::new(TracingObserver)];
        if let Some(path) = &self.ingestion.log_file {
            observers.push(Arc::new(FileObserver::new(path)));
        }
        Dispatcher::default()
            .with_observer(Arc::new(CompositeObserver::new(observers)))
            .with_alert_threshold(self.ingestion.alert_at_or_above)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_all_defaults() {
        let cfg = ExplorerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, ExplorerConfig::default());
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(7200));
        assert_eq!(cfg.agent.model, "gpt-3.5-turbo");
        assert_eq!(cfg.preview.head_tail(), PreviewMode::HeadTail { head: 5, tail: 5 });
    }

    #[test]
    fn sections_override_defaults() {
        let cfg = ExplorerConfig::from_toml_str(
            r#"
            cache_ttl_secs = 60

            [preview]
            sample = 12

            [agent]
            temperature = 0.3

            [ingestion]
            alert_at_or_above = "error"
            log_file = "ingest.log"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.cache_ttl_secs, 60);
        assert_eq!(cfg.preview.random_sample(), PreviewMode::RandomSample { n: 12 });
        assert_eq!(cfg.preview.head, 5);
        assert_eq!(cfg.agent.temperature, 0.3);
        assert_eq!(cfg.agent.model, "gpt-3.5-turbo");
        assert!(cfg.agent.api_key.is_none());
        assert_eq!(cfg.ingestion.alert_at_or_above, IngestionSeverity::Error);
        assert_eq!(cfg.ingestion.log_file, Some(PathBuf::from("ingest.log")));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ExplorerConfig::from_toml_str("cache_ttl = 1"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = ExplorerConfig::from_path("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn dispatcher_still_loads() {
        let dispatcher = ExplorerConfig::default().dispatcher();
        let artifact = crate::ingestion::Artifact::upload("a.csv", "x\n1\n");
        let tables = dispatcher
            .load(&artifact, &crate::ingestion::ParserOptions::new())
            .unwrap();
        assert_eq!(tables.names(), vec!["a.csv"]);
    }
}
