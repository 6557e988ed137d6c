//! Multi-perspective investment analysis core
//!
//! This crate implements the analysis pipeline behind vantage-rs:
//!
//! - [`metrics`] - deterministic extraction of financial ratios from free
//!   text, plus fixed valuation/quality scoring
//! - [`engine`] - the [`PerspectiveEngine`]: single-persona analysis,
//!   sequential multi-persona fan-out, and comparison synthesis over a
//!   configured LLM backend
//! - [`pipeline`] - the [`AnalysisPipeline`] orchestrator: PARSE →
//!   CALCULATE → ANALYZE → SUMMARIZE over a per-run [`PipelineState`]
//! - [`report`] - Markdown report assembly with a structured mirror
//! - [`stream`] - chunked streaming presentation of finished analyses
//! - [`document`] / [`store`] - the document-conversion and record-store
//!   collaborator seams
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vantage_analysis::{AnalysisPipeline, EngineConfig, PerspectiveEngine, PipelineRequest};
//! use vantage_llm::providers::{self, ProviderKind};
//! use vantage_persona::PersonaRegistry;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let registry = Arc::new(PersonaRegistry::load("data/personas.json")?);
//!     let provider = providers::from_env(ProviderKind::DeepSeek)?;
//!     let engine = Arc::new(PerspectiveEngine::new(
//!         registry,
//!         provider,
//!         EngineConfig::for_provider(ProviderKind::DeepSeek),
//!     ));
//!
//!     let pipeline = AnalysisPipeline::new(engine);
//!     let state = pipeline
//!         .run(PipelineRequest::from_material("PE: 20\nROE: 18%", "buffett"))
//!         .await;
//!
//!     if let Some(report) = &state.report {
//!         println!("{}", report.markdown);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod result;
pub mod store;
pub mod stream;

// Re-export main types for convenience
pub use config::EngineConfig;
pub use document::{DocumentFormat, DocumentParser, DocumentSource, FileDocumentSource, ParsedDocument};
pub use engine::PerspectiveEngine;
pub use error::{AnalysisError, Result};
pub use metrics::{CalculatedMetrics, ExtractedMetrics, MetricsSummary, Quality, Valuation};
pub use pipeline::{AnalysisPipeline, ParsedMaterial, PipelineRequest, PipelineStage, PipelineState};
pub use report::{FinalReport, ReportData, ReportMetadata};
pub use result::{ComparisonResult, PerspectiveResult};
pub use store::{InMemoryRecordStore, RecordStore};
pub use stream::TextChunkStream;

#[cfg(test)]
pub(crate) mod test_util;
