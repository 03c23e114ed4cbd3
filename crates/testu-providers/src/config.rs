//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use testu_core::model::{Question, QuestionKind};
use testu_core::traits::QuestionGenerator;

use crate::groq::GroqProvider;
use crate::mock::MockGenerator;

/// Configuration for a single question generator.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Groq {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    /// Canned offline questions; for tests and demos without an API key.
    Mock,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Groq {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Groq")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock => f.debug_struct("Mock").finish(),
        }
    }
}

/// Top-level testu configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestuConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default model to use.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Default temperature (1.0 for varied questions).
    #[serde(default = "default_temperature")]
    pub default_temperature: f64,
    /// Default number of questions per quiz.
    #[serde(default = "default_num_questions")]
    pub num_questions: u32,
    /// Max retries on provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Where quiz history is stored.
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,
}

fn default_provider() -> String {
    "groq".to_string()
}
fn default_model() -> String {
    "openai/gpt-oss-120b".to_string()
}
fn default_temperature() -> f64 {
    1.0
}
fn default_num_questions() -> u32 {
    5
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_history_file() -> PathBuf {
    PathBuf::from("quiz_history.json")
}

impl Default for TestuConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            num_questions: default_num_questions(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            history_file: default_history_file(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Groq { api_key, base_url } => ProviderConfig::Groq {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Mock => ProviderConfig::Mock,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `testu.toml` in the current directory
/// 2. `~/.config/testu/config.toml`
///
/// Environment variable override: `GROQ_API_KEY`.
pub fn load_config() -> Result<TestuConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<TestuConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("testu.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<TestuConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => TestuConfig::default(),
    };

    // Apply env var override
    if let Ok(key) = std::env::var("GROQ_API_KEY") {
        config
            .providers
            .entry("groq".into())
            .or_insert(ProviderConfig::Groq {
                api_key: String::new(),
                base_url: None,
            });
        if let Some(ProviderConfig::Groq { api_key, .. }) = config.providers.get_mut("groq") {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("testu"))
}

/// Create a generator instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn QuestionGenerator>> {
    match config {
        ProviderConfig::Groq { api_key, base_url } => {
            anyhow::ensure!(
                !api_key.trim().is_empty(),
                "provider '{name}' has no API key; set GROQ_API_KEY or edit testu.toml"
            );
            Ok(Box::new(GroqProvider::new(api_key, base_url.clone())))
        }
        ProviderConfig::Mock => Ok(Box::new(MockGenerator::with_fixed_questions(
            canned_mock_quiz(),
        ))),
    }
}

/// The deterministic quiz served by the mock provider.
fn canned_mock_quiz() -> Vec<Question> {
    vec![
        Question {
            question: "Kokia yra Lietuvos sostinė?".into(),
            kind: QuestionKind::MultipleChoice,
            options: vec![
                "A) Vilnius".into(),
                "B) Kaunas".into(),
                "C) Klaipėda".into(),
                "D) Šiauliai".into(),
            ],
            correct: "A".into(),
            explanation: Some("Vilnius yra Lietuvos sostinė.".into()),
        },
        Question {
            question: "Koks yra lygties 2x + 5 = 11 sprendinys?".into(),
            kind: QuestionKind::Short,
            options: vec![],
            correct: "x = 3".into(),
            explanation: Some("2x = 6, todėl x = 3.".into()),
        },
    ]
}
