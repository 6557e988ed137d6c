//! Error types for persona operations

use thiserror::Error;

/// Result type for persona operations
pub type Result<T> = std::result::Result<T, PersonaError>;

/// Errors that can occur loading personas or composing prompts
#[derive(Error, Debug)]
pub enum PersonaError {
    /// Catalog file missing or unreadable
    #[error("Failed to read persona catalog '{path}': {detail}")]
    CatalogUnreadable { path: String, detail: String },

    /// Catalog file is not valid JSON or lacks the expected shape
    #[error("Failed to parse persona catalog '{path}': {detail}")]
    CatalogParse { path: String, detail: String },

    /// A persona record failed validation
    #[error("Invalid persona record '{id}': {detail}")]
    InvalidRecord { id: String, detail: String },

    /// Prompt template rendering failed
    #[error("Failed to render prompt '{name}': {detail}")]
    TemplateRender { name: String, detail: String },
}
