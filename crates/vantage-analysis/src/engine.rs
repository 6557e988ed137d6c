//! Perspective analysis engine
//!
//! [`PerspectiveEngine`] invokes the configured LLM backend once per
//! persona: resolve the persona, compose its system and analysis prompts,
//! issue exactly one completion, and wrap the outcome in a
//! [`PerspectiveResult`]. Provider failures never escape a perspective
//! call - they become `success = false` results - so multi-persona
//! fan-out always evaluates every requested persona. Fan-out is
//! deliberately sequential: one material, one run, one call in flight.

use crate::config::EngineConfig;
use crate::error::{AnalysisError, Result};
use crate::prompts;
use crate::result::{ComparisonResult, PerspectiveResult};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use vantage_llm::{CompletionRequest, LLMProvider, Message};
use vantage_persona::{prompt, PersonaRegistry, PersonaSummary, RiskTolerance};

/// Persona used by the quick-analysis convenience entry point
pub const DEFAULT_PERSONA: &str = "buffett";

/// Multi-perspective analysis engine
///
/// Holds the shared read-only persona registry and the LLM backend; both
/// are injected so request handlers construct nothing global.
pub struct PerspectiveEngine {
    registry: Arc<PersonaRegistry>,
    provider: Arc<dyn LLMProvider>,
    config: EngineConfig,
}

impl PerspectiveEngine {
    /// Create an engine over a registry and provider
    pub fn new(
        registry: Arc<PersonaRegistry>,
        provider: Arc<dyn LLMProvider>,
        config: EngineConfig,
    ) -> Self {
        Self {
            registry,
            provider,
            config,
        }
    }

    /// The persona registry backing this engine
    pub fn registry(&self) -> &Arc<PersonaRegistry> {
        &self.registry
    }

    /// The engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze material from one persona's perspective
    ///
    /// Fails only for an unknown persona id or a broken prompt template;
    /// a provider error returns a well-formed result with
    /// `success = false`.
    #[instrument(skip(self, material, context), fields(persona = %persona_id))]
    pub async fn analyze_one(
        &self,
        material: &str,
        persona_id: &str,
        context: Option<&str>,
    ) -> Result<PerspectiveResult> {
        let persona = self
            .registry
            .get(persona_id)
            .ok_or_else(|| AnalysisError::PersonaNotFound(persona_id.to_string()))?;

        info!(persona = %persona.name, "Analyzing from perspective");

        let system_prompt = prompt::system_prompt(persona)?;

        let full_material = match context {
            Some(context) => format!("{material}\n\nAdditional context:\n{context}"),
            None => material.to_string(),
        };
        let analysis_prompt = prompt::analysis_prompt(persona, &full_material)?;

        let request = CompletionRequest::builder(&self.config.model)
            .system(system_prompt)
            .add_message(Message::user(analysis_prompt))
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build();

        match self.provider.complete(request).await {
            Ok(response) => Ok(PerspectiveResult::success(persona, response.text())),
            Err(e) => {
                warn!(persona = %persona.id, error = %e, "Perspective call failed");
                Ok(PerspectiveResult::failure(persona, e))
            }
        }
    }

    /// Analyze material from several perspectives, in the given order
    ///
    /// Each persona's call is isolated: a provider failure for one id does
    /// not prevent evaluation of the rest. An unknown id still fails the
    /// whole call, as it would for [`analyze_one`].
    ///
    /// [`analyze_one`]: Self::analyze_one
    pub async fn analyze_many(
        &self,
        material: &str,
        persona_ids: &[String],
        context: Option<&str>,
    ) -> Result<Vec<PerspectiveResult>> {
        let mut results = Vec::with_capacity(persona_ids.len());
        for persona_id in persona_ids {
            results.push(self.analyze_one(material, persona_id, context).await?);
        }
        Ok(results)
    }

    /// Analyze from several perspectives and synthesize a comparison
    ///
    /// The individual results are always returned intact; a failed
    /// synthesis call only degrades the comparison narrative.
    #[instrument(skip(self, material, context), fields(personas = persona_ids.len()))]
    pub async fn compare(
        &self,
        material: &str,
        persona_ids: &[String],
        context: Option<&str>,
    ) -> Result<ComparisonResult> {
        let analyses = self.analyze_many(material, persona_ids, context).await?;

        let comparison_summary = if analyses.is_empty() {
            "No analyses to compare.".to_string()
        } else {
            info!("Generating comparison summary");
            let synthesis_prompt = prompts::comparison_prompt(&analyses)?;
            let request = CompletionRequest::builder(&self.config.model)
                .system(prompts::COMPARISON_SYSTEM_PROMPT)
                .add_message(Message::user(synthesis_prompt))
                .max_tokens(self.config.max_tokens)
                .temperature(self.config.temperature)
                .build();

            match self.provider.complete(request).await {
                Ok(response) => response.text().to_string(),
                Err(e) => {
                    warn!(error = %e, "Comparison synthesis failed");
                    format!("Failed to generate comparison summary: {e}")
                }
            }
        };

        Ok(ComparisonResult {
            material: material.to_string(),
            persona_ids: persona_ids.to_vec(),
            analyses,
            comparison_summary,
        })
    }

    /// Summary projections of every loaded persona
    pub fn available_personas(&self) -> Vec<PersonaSummary> {
        self.registry.summaries()
    }

    /// Recommend personas matching the given preferences
    pub fn recommend(
        &self,
        risk: Option<RiskTolerance>,
        holding_period: Option<&str>,
        keyword: Option<&str>,
    ) -> Vec<PersonaSummary> {
        self.registry.recommend(risk, holding_period, keyword)
    }

    /// One-call convenience: analyze material and return just the text
    ///
    /// Uses [`DEFAULT_PERSONA`] when no persona id is given. The returned
    /// text is the error description when the provider call failed.
    pub async fn quick_analyze(
        &self,
        material: &str,
        persona_id: Option<&str>,
    ) -> Result<String> {
        let result = self
            .analyze_one(material, persona_id.unwrap_or(DEFAULT_PERSONA), None)
            .await?;
        Ok(result.analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{fixture_registry, StubProvider};
    use vantage_llm::LLMError;

    fn engine(provider: Arc<StubProvider>) -> PerspectiveEngine {
        PerspectiveEngine::new(fixture_registry(), provider, EngineConfig::default())
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[tokio::test]
    async fn test_analyze_one_success() {
        let provider = StubProvider::fixed("STUB_ANALYSIS");
        let engine = engine(provider.clone());

        let result = engine.analyze_one("PE: 20", "buffett", None).await.unwrap();

        assert!(result.success);
        assert_eq!(result.analysis, "STUB_ANALYSIS");
        assert_eq!(result.persona_id, "buffett");
        assert_eq!(result.persona_name, "Warren Buffett");
        assert!(result.philosophy.contains("wonderful companies"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_analyze_one_unknown_persona() {
        let provider = StubProvider::fixed("unused");
        let engine = engine(provider.clone());

        let result = engine.analyze_one("PE: 20", "galbraith", None).await;
        assert!(matches!(result, Err(AnalysisError::PersonaNotFound(id)) if id == "galbraith"));
        // No provider call for an unknown persona
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_one_provider_error_degrades() {
        let provider = StubProvider::failing("rate limited");
        let engine = engine(provider);

        let result = engine.analyze_one("PE: 20", "buffett", None).await.unwrap();
        assert!(!result.success);
        assert!(result.analysis.contains("Analysis failed"));
        assert!(result.error.as_deref().unwrap_or("").contains("rate limited"));
    }

    #[tokio::test]
    async fn test_analyze_one_sends_two_roles() {
        let provider = StubProvider::fixed("ok");
        let engine = engine(provider.clone());

        engine
            .analyze_one("PE: 20", "buffett", Some("Q3 beat expectations"))
            .await
            .unwrap();

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        let system = request.system.as_deref().unwrap_or("");
        assert!(system.contains("You are now Warren Buffett"));
        assert_eq!(request.messages.len(), 1);
        let user = &request.messages[0].content;
        assert!(user.contains("Material to analyze:"));
        assert!(user.contains("PE: 20"));
        assert!(user.contains("Additional context:\nQ3 beat expectations"));
    }

    #[tokio::test]
    async fn test_analyze_one_custom_template() {
        let provider = StubProvider::fixed("ok");
        let engine = engine(provider.clone());

        engine.analyze_one("PB: 0.8", "graham", None).await.unwrap();

        let request = &provider.requests()[0];
        let user = &request.messages[0].content;
        assert!(user.starts_with("Apply strict margin-of-safety screening"));
        assert!(user.contains("PB: 0.8"));
        assert!(!user.contains("Material to analyze:"));
    }

    #[tokio::test]
    async fn test_analyze_many_preserves_order() {
        let provider = StubProvider::fixed("ok");
        let engine = engine(provider.clone());

        let persona_ids = ids(&["graham", "buffett", "lynch"]);
        let results = engine
            .analyze_many("PE: 20", &persona_ids, None)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        for (result, expected) in results.iter().zip(&persona_ids) {
            assert_eq!(&result.persona_id, expected);
            assert!(result.success);
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_analyze_many_isolates_failures() {
        // Fail only the Lynch call
        let provider = StubProvider::new(|request| {
            let system = request.system.as_deref().unwrap_or("");
            if system.contains("Peter Lynch") {
                Err(LLMError::ProviderError("backend hiccup".to_string()))
            } else {
                Ok("ok".to_string())
            }
        });
        let engine = engine(provider);

        let results = engine
            .analyze_many("PE: 20", &ids(&["buffett", "lynch", "graham"]), None)
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert!(results[2].success);
    }

    #[tokio::test]
    async fn test_compare_success() {
        let provider = StubProvider::new(|request| {
            let system = request.system.as_deref().unwrap_or("");
            if system == prompts::COMPARISON_SYSTEM_PROMPT {
                Ok("They broadly agree.".to_string())
            } else {
                Ok("individual take".to_string())
            }
        });
        let engine = engine(provider.clone());

        let comparison = engine
            .compare("PE: 20", &ids(&["buffett", "lynch"]), None)
            .await
            .unwrap();

        assert_eq!(comparison.analyses.len(), 2);
        assert!(comparison.all_succeeded());
        assert_eq!(comparison.comparison_summary, "They broadly agree.");
        // Two perspective calls plus one synthesis call
        assert_eq!(provider.call_count(), 3);

        // Synthesis prompt carries both individual analyses
        let synthesis = &provider.requests()[2];
        assert!(synthesis.messages[0].content.contains("individual take"));
    }

    #[tokio::test]
    async fn test_compare_synthesis_failure_keeps_analyses() {
        let provider = StubProvider::new(|request| {
            let system = request.system.as_deref().unwrap_or("");
            if system == prompts::COMPARISON_SYSTEM_PROMPT {
                Err(LLMError::ProviderError("synthesis down".to_string()))
            } else {
                Ok("individual take".to_string())
            }
        });
        let engine = engine(provider);

        let persona_ids = ids(&["buffett", "lynch", "graham"]);
        let comparison = engine.compare("PE: 20", &persona_ids, None).await.unwrap();

        assert_eq!(comparison.analyses.len(), persona_ids.len());
        assert!(comparison.all_succeeded());
        assert!(!comparison.comparison_summary.is_empty());
        assert!(comparison
            .comparison_summary
            .contains("Failed to generate comparison summary"));
    }

    #[tokio::test]
    async fn test_compare_empty_ids() {
        let provider = StubProvider::fixed("unused");
        let engine = engine(provider.clone());

        let comparison = engine.compare("PE: 20", &[], None).await.unwrap();
        assert!(comparison.analyses.is_empty());
        assert_eq!(comparison.comparison_summary, "No analyses to compare.");
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_quick_analyze_defaults_to_buffett() {
        let provider = StubProvider::fixed("quick take");
        let engine = engine(provider.clone());

        let text = engine.quick_analyze("PE: 20", None).await.unwrap();
        assert_eq!(text, "quick take");

        let system = provider.requests()[0].system.clone().unwrap_or_default();
        assert!(system.contains("Warren Buffett"));
    }

    #[test]
    fn test_available_and_recommend() {
        let provider = StubProvider::fixed("unused");
        let engine = engine(provider);

        let all = engine.available_personas();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].id, "buffett");

        let picks = engine.recommend(Some(RiskTolerance::Medium), None, None);
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].id, "lynch");
    }
}
