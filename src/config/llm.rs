//! Chat-completion endpoint settings
//!
//! ```toml
//! [llm]
//! api_key = "sk-or-..."          # or LLM_API_KEY / OPENROUTER_API_KEY
//! model = "qwen/qwen3-235b-a22b:free"
//! base_url = "https://openrouter.ai/api/v1"
//! max_tokens = 1000
//! temperature = 0.7
//! stream = true
//! timeout_secs = 30
//! ```

use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use super::ConfigError;

pub const DEFAULT_MODEL: &str = "qwen/qwen3-235b-a22b:free";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the hosted chat-completion API
#[derive(Clone, Deserialize)]
pub struct LlmConfig {
    /// Bearer token. Missing or blank means every call degrades to the fallback.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL; `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Whether the widget streams replies by default
    #[serde(default = "default_true")]
    pub stream: bool,

    /// Bound on a blocking call, on waiting for stream headers and on each
    /// idle gap between stream chunks
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sent as `HTTP-Referer` for OpenRouter app attribution
    #[serde(default)]
    pub app_url: Option<String>,

    /// Sent as `X-Title` for OpenRouter app attribution
    #[serde(default)]
    pub app_title: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            stream: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            app_url: None,
            app_title: None,
        }
    }
}

// The API key never reaches logs.
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field(
                "api_key",
                &self.api_key.as_ref().map(|key| format!("<{} chars>", key.len())),
            )
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("stream", &self.stream)
            .field("timeout_secs", &self.timeout_secs)
            .field("app_url", &self.app_url)
            .field("app_title", &self.app_title)
            .finish()
    }
}

impl LlmConfig {
    /// Config pointing at an arbitrary OpenAI-compatible server
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Overlay values found through `lookup` onto `self`.
    ///
    /// Numeric and boolean values that fail to parse keep their current value.
    pub fn merge_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("LLM_API_KEY").or_else(|| lookup("OPENROUTER_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = lookup("LLM_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(max_tokens) = lookup("LLM_MAX_TOKENS").and_then(|v| v.trim().parse().ok()) {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = lookup("LLM_TEMPERATURE").and_then(|v| v.trim().parse().ok()) {
            self.temperature = temperature;
        }
        if let Some(stream) = lookup("LLM_STREAM").and_then(|v| parse_flag(&v)) {
            self.stream = stream;
        }
        if let Some(secs) = lookup("LLM_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.timeout_secs = secs;
        }
        if let Some(url) = lookup("LLM_APP_URL") {
            self.app_url = Some(url);
        }
        if let Some(title) = lookup("LLM_APP_TITLE") {
            self.app_title = Some(title);
        }
        self
    }

    /// Check everything a request needs. Performs no I/O.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.api_key.as_deref().map(str::trim) {
            None | Some("") => return Err(ConfigError::MissingApiKey),
            Some(_) => {}
        }

        let url = reqwest::Url::parse(&self.base_url).map_err(|e| {
            ConfigError::Validation(format!("invalid base_url '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "base_url must be http(s), got '{}'",
                url.scheme()
            )));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::Validation("max_tokens must be positive".into()));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation("timeout_secs must be positive".into()));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "temperature {} outside 0.0..=2.0",
                self.temperature
            )));
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LlmConfig::default();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_tokens, 1000);
        assert!(config.stream);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_missing_key_fails_validation() {
        let config = LlmConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));

        let blank = LlmConfig {
            api_key: Some("   ".into()),
            ..LlmConfig::default()
        };
        assert!(matches!(blank.validate(), Err(ConfigError::MissingApiKey)));
    }

    #[test]
    fn test_validation_rules() {
        let good = LlmConfig::new("key", "http://localhost:8080/v1");
        assert!(good.is_valid());

        let bad_url = LlmConfig::new("key", "not a url");
        assert!(matches!(bad_url.validate(), Err(ConfigError::Validation(_))));

        let bad_scheme = LlmConfig::new("key", "ftp://example.com");
        assert!(!bad_scheme.is_valid());

        let hot = LlmConfig {
            temperature: 3.5,
            ..good.clone()
        };
        assert!(!hot.is_valid());

        let no_tokens = LlmConfig {
            max_tokens: 0,
            ..good.clone()
        };
        assert!(!no_tokens.is_valid());

        let no_timeout = LlmConfig {
            timeout_secs: 0,
            ..good
        };
        assert!(matches!(no_timeout.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = LlmConfig::new("key", "https://api.example.com/v1/");
        assert_eq!(config.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_merge_lookup() {
        let config = LlmConfig::default().merge_lookup(lookup_from(&[
            ("OPENROUTER_API_KEY", "or-key"),
            ("LLM_MODEL", "mistral-small"),
            ("LLM_MAX_TOKENS", "256"),
            ("LLM_TEMPERATURE", "not-a-number"),
            ("LLM_STREAM", "off"),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("or-key"));
        assert_eq!(config.model, "mistral-small");
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.temperature, DEFAULT_TEMPERATURE);
        assert!(!config.stream);
    }

    #[test]
    fn test_primary_key_wins() {
        let config = LlmConfig::default().merge_lookup(lookup_from(&[
            ("LLM_API_KEY", "primary"),
            ("OPENROUTER_API_KEY", "secondary"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("primary"));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = LlmConfig::new("sk-secret", DEFAULT_BASE_URL);
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<9 chars>"));
    }
}
