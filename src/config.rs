//! Configuration for the skillsense host.
//!
//! One TOML file with three sections:
//!
//! ```toml
//! [llm]
//! base_url = "https://api.openai.com"
//! api_key = { type = "env", var = "OPENAI_API_KEY" }
//!
//! [llm.judgment]
//! model = "gpt-4o"
//! temperature = 0.1
//!
//! [search]
//! retrieval_limit = 50
//! timeout_seconds = 30
//! max_concurrent_judgments = 16   # 0 = uncapped
//!
//! [catalog]
//! path = "/var/lib/skillsense/profiles.json"
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use skillsense_search::SearchConfig;

use crate::error::{Result, SkillSenseError};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillSenseConfig {
    /// Language model provider settings.
    pub llm: LlmConfig,
    /// Pipeline settings.
    pub search: SearchConfig,
    /// Profile catalog settings.
    pub catalog: CatalogConfig,
}

impl SkillSenseConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| SkillSenseError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| SkillSenseError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/skillsense/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("skillsense").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("skillsense")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/skillsense-config/config.toml")
        }
    }

    /// Validates every section.
    ///
    /// # Errors
    ///
    /// Returns [`SkillSenseError::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.llm.validate()?;
        self.search
            .validate()
            .map_err(|e| SkillSenseError::Config(e.to_string()))
    }
}

/// OpenAI-compatible provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider base URL, without the `/v1` suffix.
    pub base_url: String,
    /// Where to find the API key.
    pub api_key: ApiKeyRef,
    /// Optional `OpenAI-Organization` header value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Embedding model for semantic retrieval.
    pub embedding_model: String,
    /// Query decomposition.
    pub intent: ChatModelConfig,
    /// Per-candidate relevance judgment.
    pub judgment: ChatModelConfig,
    /// Recruiter-facing summary.
    pub narrative: ChatModelConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".into(),
            api_key: ApiKeyRef::default(),
            organization: None,
            embedding_model: "text-embedding-ada-002".into(),
            intent: ChatModelConfig::new("gpt-4o-mini", 0.0),
            judgment: ChatModelConfig::new("gpt-4o", 0.1),
            narrative: ChatModelConfig::new("gpt-4o", 0.3),
        }
    }
}

impl LlmConfig {
    fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| SkillSenseError::Config(format!("llm.base_url is invalid: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SkillSenseError::Config(format!(
                "llm.base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        self.intent.validate("llm.intent")?;
        self.judgment.validate("llm.judgment")?;
        self.narrative.validate("llm.narrative")?;
        if self.embedding_model.trim().is_empty() {
            return Err(SkillSenseError::Config(
                "llm.embedding_model must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Model and sampling temperature for one chat-completion oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatModelConfig {
    pub model: String,
    #[serde(default)]
    pub temperature: f64,
}

impl ChatModelConfig {
    pub fn new(model: impl Into<String>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            temperature,
        }
    }

    fn validate(&self, section: &str) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(SkillSenseError::Config(format!(
                "{section}.model must not be empty"
            )));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(SkillSenseError::Config(format!(
                "{section}.temperature must be between 0.0 and 2.0"
            )));
        }
        Ok(())
    }
}

/// Secret reference for the provider API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ApiKeyRef {
    /// No API key (local OpenAI-compatible servers).
    None,
    /// Inline literal key (discouraged; use env when possible).
    Literal { value: String },
    /// Resolve API key from an environment variable.
    Env { var: String },
}

impl Default for ApiKeyRef {
    fn default() -> Self {
        Self::Env {
            var: "OPENAI_API_KEY".into(),
        }
    }
}

impl ApiKeyRef {
    /// Resolve the key.
    ///
    /// # Errors
    ///
    /// Returns [`SkillSenseError::Config`] if the referenced environment
    /// variable is missing or blank.
    pub fn resolve(&self) -> Result<Option<String>> {
        match self {
            Self::None => Ok(None),
            Self::Literal { value } => Ok(Some(value.clone())),
            Self::Env { var } => {
                let value = std::env::var(var).map_err(|_| {
                    SkillSenseError::Config(format!("API key env var is missing: {var}"))
                })?;
                if value.trim().is_empty() {
                    return Err(SkillSenseError::Config(format!(
                        "API key env var is empty: {var}"
                    )));
                }
                Ok(Some(value))
            }
        }
    }
}

/// Profile catalog settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON catalog file. Overridden by `--catalog` on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}
