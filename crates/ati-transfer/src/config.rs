/*
[INPUT]:  YAML configuration file, ATI__* environment overrides
[OUTPUT]: Parsed ATI project configuration
[POS]:    Configuration layer - server, session and project setup
[UPDATE]: When adding new configuration options
*/

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use ati_adapter::{ClientConfig, Credentials, Datasource, HypothesisGroup, datasource_edit_url};
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "ATI";
const ENV_SEPARATOR: &str = "__";

/// Top-level configuration for the `ati` tool
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AtiConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub project: ProjectConfig,
}

/// ATI backend connection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Base URL of the ATI web app, e.g. "https://ati.example.org"
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

/// Session credential used for every outbound call
#[derive(Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Dataverse API token
    pub api_token: String,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// The ATI project (Dataverse dataset) being worked on
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ProjectConfig {
    pub dataset_id: String,
    /// Shown in deletion summaries
    pub manuscript_name: String,
    #[serde(default)]
    pub manuscript_id: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    /// Dataverse server hosting the dataset
    #[serde(default)]
    pub dataverse_url: Option<String>,
    /// Hypothes.is groups available to the project owner
    #[serde(default)]
    pub groups: Vec<HypothesisGroup>,
    #[serde(default)]
    pub datasources: Vec<Datasource>,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl AtiConfig {
    /// `<config dir>/ati/config.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ati").join("config.yaml"))
    }

    /// Load configuration from a YAML file, applying `ATI__SECTION__KEY` env overrides.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like [`AtiConfig::load`], reading overrides from `env` instead of the process environment.
    pub fn load_with_env(path: &Path, env: Option<HashMap<String, String>>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(path)
                    .format(config::FileFormat::Yaml)
                    .required(true),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true)
                    .source(env),
            )
            .build()
            .with_context(|| format!("read config {}", path.display()))?;

        let config: Self = settings
            .try_deserialize()
            .with_context(|| format!("parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as YAML, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(self).context("serialize config")?;
        std::fs::write(path, yaml).with_context(|| format!("write config {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.server.base_url)
            .with_context(|| format!("server.base_url is not a URL: {}", self.server.base_url))?;
        if self.session.api_token.trim().is_empty() {
            bail!("session.api_token must not be empty");
        }
        if self.project.dataset_id.trim().is_empty() {
            bail!("project.dataset_id must not be empty");
        }
        Ok(())
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.server.timeout_secs),
            connect_timeout: Duration::from_secs(self.server.connect_timeout_secs),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.session.api_token.clone())
    }

    /// Dataverse page for editing datasources, when the dataset DOI is known.
    pub fn datasource_edit_url(&self) -> Option<String> {
        match (&self.project.dataverse_url, &self.project.doi) {
            (Some(server), Some(doi)) => Some(datasource_edit_url(server, doi)),
            _ => None,
        }
    }
}
