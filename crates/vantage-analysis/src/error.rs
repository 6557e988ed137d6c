//! Error types for analysis operations

use thiserror::Error;

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors surfaced by the analysis core
///
/// Provider failures during a perspective call are deliberately NOT here:
/// the engine converts them into degraded [`PerspectiveResult`]s so a
/// multi-persona run is never aborted by one backend hiccup. What remains
/// are the genuinely unrecoverable conditions.
///
/// [`PerspectiveResult`]: crate::result::PerspectiveResult
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Unknown persona id at lookup time
    #[error("Persona not found: {0}")]
    PersonaNotFound(String),

    /// A required pipeline input is absent
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// Document lookup or conversion failed
    #[error("Document error: {0}")]
    Document(String),

    /// Record store operation failed
    #[error("Record store error: {0}")]
    Store(String),

    /// Prompt template rendering failed
    #[error("Template error: {0}")]
    Template(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// LLM provider error that escaped outside a perspective call
    /// (e.g. provider construction)
    #[error("LLM error: {0}")]
    Llm(#[from] vantage_llm::LLMError),

    /// Persona catalog or prompt composition error
    #[error("Persona error: {0}")]
    Persona(#[from] vantage_persona::PersonaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalysisError::PersonaNotFound("galbraith".to_string());
        assert_eq!(err.to_string(), "Persona not found: galbraith");

        let err = AnalysisError::MissingInput("material or document_id".to_string());
        assert_eq!(
            err.to_string(),
            "Missing required input: material or document_id"
        );
    }

    #[test]
    fn test_persona_error_conversion() {
        let persona_err = vantage_persona::PersonaError::InvalidRecord {
            id: "x".to_string(),
            detail: "empty".to_string(),
        };
        let err: AnalysisError = persona_err.into();
        assert!(matches!(err, AnalysisError::Persona(_)));
    }
}
