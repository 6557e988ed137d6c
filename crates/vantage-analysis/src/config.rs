//! Configuration for the perspective engine

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use vantage_llm::providers::ProviderKind;

/// Configuration for perspective analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Model identifier passed to the provider
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens per completion
    pub max_tokens: usize,

    /// Character cap on the raw-text excerpt fed to the ANALYZE stage
    pub excerpt_limit: usize,

    /// Chunk size (characters) for single-analysis streaming
    pub analysis_chunk_size: usize,

    /// Chunk size (characters) for comparison streaming
    pub comparison_chunk_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: "deepseek-chat".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
            excerpt_limit: 2000,
            analysis_chunk_size: 50,
            comparison_chunk_size: 80,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Default configuration for a backend, using its default model
    pub fn for_provider(kind: ProviderKind) -> Self {
        Self {
            model: kind.default_model(),
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(AnalysisError::Config("model must not be empty".to_string()));
        }
        if self.max_tokens == 0 {
            return Err(AnalysisError::Config(
                "max_tokens must be greater than 0".to_string(),
            ));
        }
        if self.analysis_chunk_size == 0 || self.comparison_chunk_size == 0 {
            return Err(AnalysisError::Config(
                "chunk sizes must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AnalysisError::Config(format!(
                "temperature {} out of range 0.0..=2.0",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Builder for EngineConfig
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<usize>,
    excerpt_limit: Option<usize>,
    analysis_chunk_size: Option<usize>,
    comparison_chunk_size: Option<usize>,
}

impl EngineConfigBuilder {
    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set max tokens per completion
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the raw-text excerpt cap
    pub fn excerpt_limit(mut self, limit: usize) -> Self {
        self.excerpt_limit = Some(limit);
        self
    }

    /// Set the single-analysis streaming chunk size
    pub fn analysis_chunk_size(mut self, size: usize) -> Self {
        self.analysis_chunk_size = Some(size);
        self
    }

    /// Set the comparison streaming chunk size
    pub fn comparison_chunk_size(mut self, size: usize) -> Self {
        self.comparison_chunk_size = Some(size);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<EngineConfig> {
        let defaults = EngineConfig::default();

        let config = EngineConfig {
            model: self.model.unwrap_or(defaults.model),
            temperature: self.temperature.unwrap_or(defaults.temperature),
            max_tokens: self.max_tokens.unwrap_or(defaults.max_tokens),
            excerpt_limit: self.excerpt_limit.unwrap_or(defaults.excerpt_limit),
            analysis_chunk_size: self
                .analysis_chunk_size
                .unwrap_or(defaults.analysis_chunk_size),
            comparison_chunk_size: self
                .comparison_chunk_size
                .unwrap_or(defaults.comparison_chunk_size),
        };

        config.validate()?;
        Ok(config)
    }
}
