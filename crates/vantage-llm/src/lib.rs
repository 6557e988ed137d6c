//! LLM provider abstraction layer for vantage-rs
//!
//! This crate provides provider-agnostic abstractions for the chat
//! completions the analysis engine issues. It includes:
//!
//! - Message types for system/user/assistant turns
//! - Completion request/response types
//! - The [`LLMProvider`] trait the engine depends on
//! - Concrete provider implementations (behind feature flags)
//!
//! Every backend the engine talks to is reached through [`LLMProvider`];
//! tests substitute stub implementations at the same seam.

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, StopReason, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(any(feature = "openai", feature = "anthropic"))]
pub mod providers;
