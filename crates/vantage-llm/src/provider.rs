//! LLM provider trait definition

use crate::{CompletionRequest, CompletionResponse, Result};
use async_trait::async_trait;

/// Trait for LLM providers
///
/// Implementations of this trait provide access to different LLM services
/// (e.g., DeepSeek, Qwen, OpenAI, Anthropic). The perspective engine never
/// talks to a backend except through this trait.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Generate a completion from the LLM
    ///
    /// # Arguments
    ///
    /// * `request` - The completion request with system prompt, messages, and parameters
    ///
    /// # Returns
    ///
    /// The completion response with the assistant's reply and metadata
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    /// Get the provider name (e.g., "deepseek", "anthropic")
    fn name(&self) -> &str;
}
