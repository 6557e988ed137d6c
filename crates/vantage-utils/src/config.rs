//! Configuration management utilities

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// LLM backend name (deepseek, qwen, zhipu, openai, siliconflow, anthropic)
    pub llm_provider: String,

    /// Model override; each backend has its own default
    pub model: Option<String>,

    /// Path to the persona catalog file
    pub personas_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            llm_provider: "deepseek".to_string(),
            model: None,
            personas_path: PathBuf::from("data/personas.json"),
        }
    }
}

impl Config {
    /// Build the configuration from environment variables, falling back to
    /// defaults: `LLM_PROVIDER`, `LLM_MODEL`, `PERSONAS_PATH`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            llm_provider: std::env::var("LLM_PROVIDER").unwrap_or(defaults.llm_provider),
            model: std::env::var("LLM_MODEL").ok(),
            personas_path: std::env::var("PERSONAS_PATH")
                .map_or(defaults.personas_path, PathBuf::from),
        }
    }
}
