//! Settings structures for flightsearch configuration

use crate::fields::DEFAULT_INDEX;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main settings structure matching `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub elasticsearch: ElasticsearchSettings,
    pub demo: DemoSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(settings)
    }

    /// Merge with environment variables
    pub fn merge_env(&mut self) {
        self.merge_from(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable source
    pub fn merge_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("ES_LOCAL_API_KEY") {
            self.elasticsearch.api_key = val;
        }
        if let Some(val) = lookup("ES_LOCAL_URL") {
            self.elasticsearch.url = val;
        }
        if let Some(val) = lookup("FLIGHTSEARCH_INDEX") {
            self.elasticsearch.index = val;
        }
        if let Some(val) = lookup("FLIGHTSEARCH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("FLIGHTSEARCH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Some(val) = lookup("FLIGHTSEARCH_DEMO") {
            self.demo.enabled = val.parse().unwrap_or(self.demo.enabled);
        }
    }

    /// Reject settings the process cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.elasticsearch.api_key.trim().is_empty() {
            bail!("missing ES_LOCAL_API_KEY in environment or settings");
        }
        url::Url::parse(&self.elasticsearch.url)
            .with_context(|| format!("invalid Elasticsearch URL '{}'", self.elasticsearch.url))?;
        if self.elasticsearch.index.trim().is_empty() {
            bail!("Elasticsearch index name must not be empty");
        }
        self.elasticsearch.timeout()?;
        self.elasticsearch.max_timeout()?;
        Ok(())
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_address: "0.0.0.0".to_string(),
        }
    }
}

/// Search engine connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticsearchSettings {
    /// Base URL of the cluster
    pub url: String,
    /// API key sent as `Authorization: ApiKey <key>`
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Index holding the flight records
    pub index: String,
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Upper bound for any per-call timeout, in seconds
    pub max_request_timeout: f64,
    /// Pool max idle connections per host
    pub pool_maxsize: usize,
    /// Verify TLS certificates
    pub verify_ssl: bool,
}

impl Default for ElasticsearchSettings {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            api_key: String::new(),
            index: DEFAULT_INDEX.to_string(),
            request_timeout: 10.0,
            max_request_timeout: 30.0,
            pool_maxsize: 20,
            verify_ssl: true,
        }
    }
}

impl ElasticsearchSettings {
    /// Default request timeout
    pub fn timeout(&self) -> Result<Duration> {
        seconds("request_timeout", self.request_timeout)
    }

    /// Upper bound for any per-call timeout
    pub fn max_timeout(&self) -> Result<Duration> {
        seconds("max_request_timeout", self.max_request_timeout)
    }
}

fn seconds(name: &str, secs: f64) -> Result<Duration> {
    if !secs.is_finite() || secs <= 0.0 {
        bail!("{} must be a positive number of seconds", name);
    }
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{} of {} seconds is out of range", name, secs))
}

/// Startup demonstration batch
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Run the demonstration queries before serving
    pub enabled: bool,
    /// Hits printed per listing
    pub preview_hits: usize,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            preview_hits: 3,
        }
    }
}
