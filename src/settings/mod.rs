use crate::apm::{ApmEventClient, ApmIndices};
use crate::elasticsearch::{Elasticsearch, ElasticsearchError};
use crate::index_fields::ElasticsearchIndexFieldAdapter;
use serde::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;

pub const ENV_ELASTICSEARCH_URL: &str = "ES_ADAPTERS_URL";
pub const ENV_REQUEST_TIMEOUT: &str = "ES_ADAPTERS_REQUEST_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "ES_ADAPTERS_LOG_LEVEL";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid settings json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request timeout `{value}`: {source}")]
    Timeout {
        value: String,
        source: humantime::DurationError,
    },

    #[error("invalid log level `{0}`")]
    LogLevel(String),

    #[error("unable to install logger: {0}")]
    Logging(String),

    #[error(transparent)]
    Elasticsearch(#[from] ElasticsearchError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The Elasticsearch cluster every request goes to
    pub elasticsearch_url: String,

    /// How long a single request may take, in humantime notation (`30s`, `2m`)
    pub request_timeout: String,

    /// Default `tracing` level when `RUST_LOG` isn't set
    pub log_level: String,

    pub apm_indices: ApmIndices,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            elasticsearch_url: "http://localhost:9200/".into(),
            request_timeout: "60s".into(),
            log_level: "info".into(),
            apm_indices: ApmIndices::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults, overridden by whichever `ES_ADAPTERS_*` variables are set
    pub fn from_env() -> Result<Self, SettingsError> {
        Settings::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(url) = lookup(ENV_ELASTICSEARCH_URL) {
            settings.elasticsearch_url = url;
        }
        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT) {
            settings.request_timeout = timeout;
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            settings.log_level = level;
        }

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        self.request_timeout()?;
        self.log_level()?;
        Ok(())
    }

    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        humantime::parse_duration(&self.request_timeout).map_err(|source| SettingsError::Timeout {
            value: self.request_timeout.clone(),
            source,
        })
    }

    pub fn log_level(&self) -> Result<LevelFilter, SettingsError> {
        self.log_level
            .parse::<LevelFilter>()
            .map_err(|_| SettingsError::LogLevel(self.log_level.clone()))
    }

    pub fn elasticsearch(&self, index_name: &str) -> Result<Elasticsearch, SettingsError> {
        Ok(Elasticsearch::new(&self.elasticsearch_url, index_name)?
            .with_timeout(self.request_timeout()?))
    }

    pub fn apm_event_client(&self) -> Result<ApmEventClient, SettingsError> {
        // the event client always names its indices explicitly
        let elasticsearch = self.elasticsearch("")?;
        Ok(ApmEventClient::new(
            Arc::new(elasticsearch),
            self.apm_indices.clone(),
        ))
    }

    pub fn index_field_adapter(&self) -> Result<ElasticsearchIndexFieldAdapter, SettingsError> {
        let elasticsearch = self.elasticsearch("")?;
        Ok(ElasticsearchIndexFieldAdapter::new(Arc::new(elasticsearch)))
    }
}
