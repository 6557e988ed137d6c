//! Analysis pipeline orchestration
//!
//! A pipeline run walks four ordered stages - PARSE, CALCULATE, ANALYZE,
//! SUMMARIZE - threading one exclusively-owned [`PipelineState`] through
//! them. A stage whose required input is absent sets the error field and
//! the run short-circuits: remaining stages never execute, completed
//! fields are never overwritten. The orchestrator itself is stateless
//! between runs.

use crate::document::DocumentSource;
use crate::engine::PerspectiveEngine;
use crate::metrics::{self, CalculatedMetrics};
use crate::report::{self, FinalReport};
use crate::store::RecordStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use vantage_persona::PersonaSummary;

/// The ordered pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Parse,
    Calculate,
    Analyze,
    Summarize,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Calculate => "calculate",
            Self::Analyze => "analyze",
            Self::Summarize => "summarize",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineRequest {
    /// Raw material text; may be absent when a document id is given
    pub material: Option<String>,

    /// Document id resolved through the configured [`DocumentSource`]
    pub document_id: Option<String>,

    /// Persona whose perspective drives the ANALYZE stage
    pub persona_id: String,

    /// Extra context appended to the material
    pub additional_context: Option<String>,
}

impl PipelineRequest {
    /// A run over raw material text
    pub fn from_material(material: impl Into<String>, persona_id: impl Into<String>) -> Self {
        Self {
            material: Some(material.into()),
            document_id: None,
            persona_id: persona_id.into(),
            additional_context: None,
        }
    }

    /// A run over a stored document
    pub fn from_document(document_id: impl Into<String>, persona_id: impl Into<String>) -> Self {
        Self {
            material: None,
            document_id: Some(document_id.into()),
            persona_id: persona_id.into(),
            additional_context: None,
        }
    }

    /// Attach additional context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.additional_context = Some(context.into());
        self
    }
}

/// Material after the PARSE stage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedMaterial {
    pub raw_text: String,
    pub format: String,
    pub metadata: HashMap<String, String>,
    /// Length of the raw text in characters
    pub length: usize,
}

impl ParsedMaterial {
    /// Wrap directly supplied material text
    pub fn from_text(text: String) -> Self {
        let length = text.chars().count();
        Self {
            raw_text: text,
            format: "text".to_string(),
            metadata: HashMap::new(),
            length,
        }
    }
}

/// State threaded through one pipeline run
///
/// Exclusively owned by its run; the error field, once set, is propagated
/// unchanged and freezes every other field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineState {
    // Inputs
    pub material: Option<String>,
    pub document_id: Option<String>,
    pub persona_id: String,
    pub additional_context: Option<String>,

    // Intermediate results
    pub parsed: Option<ParsedMaterial>,
    pub metrics: Option<CalculatedMetrics>,
    pub analysis: Option<String>,
    pub persona: Option<PersonaSummary>,

    // Final output
    pub report: Option<FinalReport>,

    // Run metadata
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl PipelineState {
    fn new(request: PipelineRequest) -> Self {
        Self {
            material: request.material,
            document_id: request.document_id,
            persona_id: request.persona_id,
            additional_context: request.additional_context,
            parsed: None,
            metrics: None,
            analysis: None,
            persona: None,
            report: None,
            error: None,
            completed_at: None,
        }
    }

    /// Whether the run ended in the error state
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    fn fail(mut self, stage: PipelineStage, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        warn!(stage = %stage, error = %detail, "Pipeline stage failed");
        if self.error.is_none() {
            self.error = Some(format!("{stage}: {detail}"));
        }
        self
    }
}

/// The PARSE → CALCULATE → ANALYZE → SUMMARIZE orchestrator
pub struct AnalysisPipeline {
    engine: Arc<PerspectiveEngine>,
    documents: Option<Arc<dyn DocumentSource>>,
    store: Option<Arc<dyn RecordStore>>,
}

impl AnalysisPipeline {
    /// Create a pipeline over an engine, with no optional collaborators
    pub fn new(engine: Arc<PerspectiveEngine>) -> Self {
        Self {
            engine,
            documents: None,
            store: None,
        }
    }

    /// Attach a document source for document-id runs
    pub fn with_document_source(mut self, source: Arc<dyn DocumentSource>) -> Self {
        self.documents = Some(source);
        self
    }

    /// Attach a record store; finished reports are saved best-effort
    pub fn with_record_store(mut self, store: Arc<dyn RecordStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Execute one full pipeline run
    ///
    /// Always returns a well-formed state; failure is reported through
    /// `state.error`, never panicked or thrown.
    pub async fn run(&self, request: PipelineRequest) -> PipelineState {
        info!(persona = %request.persona_id, "Starting analysis pipeline");

        let mut state = PipelineState::new(request);

        state = self.parse(state).await;
        if state.is_error() {
            return state;
        }

        state = self.calculate(state);
        if state.is_error() {
            return state;
        }

        state = self.analyze(state).await;
        if state.is_error() {
            return state;
        }

        state = self.summarize(state);
        if state.is_error() {
            return state;
        }

        if let Some(store) = &self.store {
            // Persistence is best-effort; an unreachable store never fails the run
            if let Err(e) = store.save_report(&state).await {
                warn!(error = %e, "Failed to persist report");
            }
        }

        info!("Pipeline run complete");
        state
    }

    async fn parse(&self, mut state: PipelineState) -> PipelineState {
        if let Some(material) = state.material.clone() {
            state.parsed = Some(ParsedMaterial::from_text(material));
            debug!(length = state.parsed.as_ref().map_or(0, |p| p.length), "Parsed material");
            return state;
        }

        let Some(document_id) = state.document_id.clone() else {
            return state.fail(PipelineStage::Parse, "material or document_id required");
        };

        let Some(source) = &self.documents else {
            return state.fail(PipelineStage::Parse, "no document source configured");
        };

        let document = source.fetch(&document_id).await;
        if !document.success {
            let detail = document
                .error
                .unwrap_or_else(|| "document conversion failed".to_string());
            return state.fail(PipelineStage::Parse, detail);
        }

        let length = document.content.chars().count();
        state.parsed = Some(ParsedMaterial {
            raw_text: document.content,
            format: document.format.to_string(),
            metadata: document.metadata,
            length,
        });
        debug!(document_id = %document_id, length, "Parsed document");
        state
    }

    fn calculate(&self, mut state: PipelineState) -> PipelineState {
        let Some(parsed) = &state.parsed else {
            return state.fail(PipelineStage::Calculate, "missing parsed material");
        };

        let calculated = metrics::calculate(&parsed.raw_text);
        debug!(
            extracted = calculated.summary.total_extracted,
            valuation = %calculated.summary.valuation,
            quality = %calculated.summary.quality,
            "Calculated metrics"
        );
        state.metrics = Some(calculated);
        state
    }

    async fn analyze(&self, mut state: PipelineState) -> PipelineState {
        let Some(parsed) = &state.parsed else {
            return state.fail(PipelineStage::Analyze, "missing parsed material");
        };

        let input = build_analysis_input(
            parsed,
            state.metrics.as_ref(),
            self.engine.config().excerpt_limit,
        );

        let result = self
            .engine
            .analyze_one(&input, &state.persona_id, state.additional_context.as_deref())
            .await;

        match result {
            Ok(perspective) => {
                // Provider failure still yields an analysis string
                // (the error description); only hard failures abort here.
                state.persona = self
                    .engine
                    .registry()
                    .get(&state.persona_id)
                    .map(PersonaSummary::from);
                state.analysis = Some(perspective.analysis);
                state
            }
            Err(e) => state.fail(PipelineStage::Analyze, e.to_string()),
        }
    }

    fn summarize(&self, mut state: PipelineState) -> PipelineState {
        let Some(analysis) = state.analysis.clone() else {
            return state.fail(PipelineStage::Summarize, "missing analysis result");
        };

        let report = report::build_final_report(
            state.parsed.as_ref(),
            state.metrics.as_ref(),
            &analysis,
            state.persona.as_ref(),
        );
        state.completed_at = Some(report.metadata.generated_at);
        state.report = Some(report);
        state
    }
}

/// Compose the ANALYZE stage input: a capped raw-text excerpt plus the
/// rendered metrics and their qualitative labels
fn build_analysis_input(
    parsed: &ParsedMaterial,
    metrics: Option<&CalculatedMetrics>,
    excerpt_limit: usize,
) -> String {
    let mut input = String::new();

    if !parsed.raw_text.is_empty() {
        input.push_str("## Source Material\n\n");
        if parsed.length > excerpt_limit {
            input.extend(parsed.raw_text.chars().take(excerpt_limit));
            input.push_str("\n...(content truncated)");
        } else {
            input.push_str(&parsed.raw_text);
        }
    }

    if let Some(calculated) = metrics {
        let lines = report::metric_lines(&calculated.metrics);
        if !lines.is_empty() {
            input.push_str("\n\n## Financial Metrics\n");
            for line in &lines {
                input.push('\n');
                input.push_str(line);
            }
        }

        if calculated.summary.total_extracted > 0 {
            input.push_str("\n\n## Preliminary Assessment\n");
            input.push_str(&format!("\n- Valuation: {}", calculated.summary.valuation));
            input.push_str(&format!("\n- Quality: {}", calculated.summary.quality));
        }
    }

    input
}
