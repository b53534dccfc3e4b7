use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    // Database for agent state, changelog and chat history
    #[serde(default = "default_database_path")]
    pub database_path: String,

    // LLM configuration (OpenAI-compatible: Ollama, LM Studio, vLLM, OpenAI, etc.)
    #[serde(default = "default_llm_url")]
    pub llm_api_url: String,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    #[serde(default)]
    pub llm_api_key: Option<String>,
    #[serde(default = "default_chat_timeout_secs")]
    pub chat_timeout_secs: u64,

    // Read-path page sizes
    #[serde(default = "default_changelog_page_size")]
    pub changelog_page_size: usize,
    #[serde(default = "default_chat_history_page_size")]
    pub chat_history_page_size: usize,
}

fn default_database_path() -> String {
    "tiller_control.db".to_string()
}

fn default_llm_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_llm_model() -> String {
    "llama3.2".to_string()
}

fn default_chat_timeout_secs() -> u64 {
    30
}

fn default_changelog_page_size() -> usize {
    50
}

fn default_chat_history_page_size() -> usize {
    50
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            llm_api_url: default_llm_url(),
            llm_model: default_llm_model(),
            llm_api_key: None,
            chat_timeout_secs: default_chat_timeout_secs(),
            changelog_page_size: default_changelog_page_size(),
            chat_history_page_size: default_chat_history_page_size(),
        }
    }
}

impl ControlConfig {
    /// Get the directory containing the executable
    fn get_base_dir() -> PathBuf {
        match std::env::current_exe() {
            Ok(exe_path) => exe_path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from(".")),
            Err(_) => PathBuf::from("."),
        }
    }

    /// Get the path to the config file (relative to executable)
    pub fn config_path() -> PathBuf {
        Self::get_base_dir().join("tiller_config.toml")
    }

    /// Load config from tiller_config.toml next to the executable,
    /// falling back to compiled defaults, then apply env overrides.
    pub fn load() -> Self {
        let path = Self::config_path();

        let mut config = match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<ControlConfig>(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {:?}", path);
                    config
                }
                Err(e) => {
                    tracing::error!("Failed to parse {:?}: {}", path, e);
                    ControlConfig::default()
                }
            },
            Err(_) => {
                tracing::info!("No config file at {:?}, using defaults", path);
                ControlConfig::default()
            }
        };

        if let Ok(db_path) = env::var("TILLER_DB_PATH") {
            if !db_path.trim().is_empty() {
                config.database_path = db_path;
            }
        }
        if let Ok(api_url) = env::var("TILLER_LLM_API_URL") {
            if !api_url.trim().is_empty() {
                config.llm_api_url = api_url;
            }
        }
        if let Ok(api_key) = env::var("TILLER_LLM_API_KEY") {
            if !api_key.trim().is_empty() {
                config.llm_api_key = Some(api_key);
            }
        }

        config
    }

    /// Save config to the standard location
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config to {:?}", path))?;
        Ok(())
    }

    pub fn chat_timeout(&self) -> Duration {
        Duration::from_secs(self.chat_timeout_secs)
    }
}
