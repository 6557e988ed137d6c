//! Concrete LLM provider implementations
//!
//! This module contains implementations of the LLMProvider trait plus the
//! preset table that maps a provider name (as used in configuration and on
//! the CLI) to its default model, API base URL, and API-key environment
//! variable.

use crate::{LLMError, LLMProvider, Result};
use std::str::FromStr;
use std::sync::Arc;

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAIConfig, OpenAIProvider};

/// Supported LLM backends
///
/// All but `Anthropic` speak the OpenAI chat-completions wire format and
/// differ only in base URL, default model, and key environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// DeepSeek (`DEEPSEEK_API_KEY`)
    DeepSeek,
    /// Qwen via DashScope compatible mode (`QWEN_API_KEY`)
    Qwen,
    /// Zhipu GLM (`ZHIPU_API_KEY`)
    Zhipu,
    /// OpenAI (`OPENAI_API_KEY`)
    OpenAi,
    /// SiliconFlow (`SILICONFLOW_API_KEY`)
    SiliconFlow,
    /// Anthropic Claude (`ANTHROPIC_API_KEY`)
    Anthropic,
}

impl ProviderKind {
    /// The provider name as written in configuration
    pub fn name(&self) -> &'static str {
        match self {
            Self::DeepSeek => "deepseek",
            Self::Qwen => "qwen",
            Self::Zhipu => "zhipu",
            Self::OpenAi => "openai",
            Self::SiliconFlow => "siliconflow",
            Self::Anthropic => "anthropic",
        }
    }

    /// The model used when no explicit model is configured
    pub fn default_model(&self) -> String {
        match self {
            Self::DeepSeek => "deepseek-chat".to_string(),
            Self::Qwen => "qwen-max".to_string(),
            Self::Zhipu => "glm-4".to_string(),
            Self::OpenAi => "gpt-4o-mini".to_string(),
            Self::SiliconFlow => std::env::var("SILICONFLOW_MODEL")
                .unwrap_or_else(|_| "deepseek-ai/DeepSeek-V3.1-Terminus".to_string()),
            Self::Anthropic => "claude-sonnet-4-5-20250929".to_string(),
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Self::DeepSeek => "DEEPSEEK_API_KEY",
            Self::Qwen => "QWEN_API_KEY",
            Self::Zhipu => "ZHIPU_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
            Self::SiliconFlow => "SILICONFLOW_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    #[cfg(feature = "openai")]
    fn api_base(&self) -> Option<String> {
        match self {
            Self::DeepSeek => Some("https://api.deepseek.com/v1".to_string()),
            Self::Qwen => {
                Some("https://dashscope.aliyuncs.com/compatible-mode/v1".to_string())
            }
            Self::Zhipu => Some("https://open.bigmodel.cn/api/paas/v4".to_string()),
            Self::SiliconFlow => Some(
                std::env::var("SILICONFLOW_API_BASE_URL")
                    .unwrap_or_else(|_| "https://api.siliconflow.cn/v1".to_string()),
            ),
            Self::OpenAi | Self::Anthropic => None,
        }
    }
}

impl FromStr for ProviderKind {
    type Err = LLMError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "deepseek" => Ok(Self::DeepSeek),
            "qwen" => Ok(Self::Qwen),
            "zhipu" => Ok(Self::Zhipu),
            "openai" => Ok(Self::OpenAi),
            "siliconflow" => Ok(Self::SiliconFlow),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            other => Err(LLMError::ConfigurationError(format!(
                "Unsupported LLM provider: {other}"
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Build a provider for the given backend, reading its API key from the
/// environment
///
/// Fails with a configuration error when the key variable is unset or the
/// backend was compiled out.
pub fn from_env(kind: ProviderKind) -> Result<Arc<dyn LLMProvider>> {
    let api_key = std::env::var(kind.api_key_env()).map_err(|_| {
        LLMError::ConfigurationError(format!(
            "{} environment variable not set",
            kind.api_key_env()
        ))
    })?;

    match kind {
        ProviderKind::Anthropic => {
            #[cfg(feature = "anthropic")]
            {
                Ok(Arc::new(AnthropicProvider::new(api_key)?))
            }
            #[cfg(not(feature = "anthropic"))]
            {
                let _ = api_key;
                Err(LLMError::ConfigurationError(
                    "anthropic support not compiled in (enable the `anthropic` feature)"
                        .to_string(),
                ))
            }
        }
        _ => {
            #[cfg(feature = "openai")]
            {
                let mut config =
                    OpenAIConfig::new(api_key).with_provider_name(kind.name());
                if let Some(base) = kind.api_base() {
                    config = config.with_api_base(base);
                }
                Ok(Arc::new(OpenAIProvider::with_config(config)?))
            }
            #[cfg(not(feature = "openai"))]
            {
                let _ = api_key;
                Err(LLMError::ConfigurationError(
                    "OpenAI-compatible support not compiled in (enable the `openai` feature)"
                        .to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_str() {
        assert_eq!("deepseek".parse::<ProviderKind>().unwrap(), ProviderKind::DeepSeek);
        assert_eq!("Qwen".parse::<ProviderKind>().unwrap(), ProviderKind::Qwen);
        assert_eq!("claude".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert!("mystery".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_default_models() {
        assert_eq!(ProviderKind::DeepSeek.default_model(), "deepseek-chat");
        assert_eq!(ProviderKind::Zhipu.default_model(), "glm-4");
    }

    #[test]
    fn test_from_env_without_key() {
        // SAFETY: test-only env mutation
        unsafe {
            std::env::remove_var("DEEPSEEK_API_KEY");
        }
        let result = from_env(ProviderKind::DeepSeek);
        assert!(result.is_err());
    }
}
