//! Assistant configuration
//!
//! Configuration comes from the environment (optionally a `.env` file) or from
//! a TOML file:
//!
//! ```toml
//! [llm]
//! model = "qwen/qwen3-235b-a22b:free"
//! stream = true
//!
//! [prompt]
//! system = "You are ..."
//! greeting = "Hello! ..."
//! ```

pub mod llm;
pub mod prompts;

use std::env;
use std::path::Path;

use serde::Deserialize;

pub use llm::LlmConfig;
pub use prompts::builtin as prompts_builtin;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssistantConfig {
    /// Chat-completion endpoint settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Prompt overrides
    #[serde(default)]
    pub prompt: PromptConfig,
}

impl AssistantConfig {
    /// Defaults overlaid with environment variables (after loading `.env`)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self::default().with_env_overrides()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: AssistantConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Apply `LLM_*` environment variables on top of the current values
    pub fn with_env_overrides(mut self) -> Self {
        self.llm = self.llm.merge_lookup(|key| env::var(key).ok());
        self
    }
}

/// Prompt text overrides; unset fields use the built-in prompts
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub system: Option<String>,

    #[serde(default)]
    pub greeting: Option<String>,
}

impl PromptConfig {
    pub fn system_prompt(&self) -> &str {
        self.system.as_deref().unwrap_or(prompts_builtin::SYSTEM_PROMPT)
    }

    pub fn greeting(&self) -> &str {
        self.greeting.as_deref().unwrap_or(prompts_builtin::GREETING)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("API key is not configured (set LLM_API_KEY or OPENROUTER_API_KEY)")]
    MissingApiKey,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}
