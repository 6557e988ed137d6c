//! Perspective analysis result types

use serde::{Deserialize, Serialize};
use vantage_persona::{Persona, RiskTolerance};

/// One persona's analysis of one material
///
/// Always well-formed: a provider failure is represented by
/// `success = false` and an error-describing `analysis` string, never by
/// an absent result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerspectiveResult {
    pub persona_id: String,
    pub persona_name: String,
    pub persona_title: String,

    /// The analysis text, or an error description when `success` is false
    pub analysis: String,

    // Persona metadata echoed for display
    pub philosophy: String,
    pub risk_tolerance: RiskTolerance,
    pub holding_period: String,

    pub success: bool,

    /// Provider error description when the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PerspectiveResult {
    /// A successful analysis
    pub fn success(persona: &Persona, analysis: impl Into<String>) -> Self {
        Self {
            persona_id: persona.id.clone(),
            persona_name: persona.name.clone(),
            persona_title: persona.title.clone(),
            analysis: analysis.into(),
            philosophy: persona.philosophy.clone(),
            risk_tolerance: persona.risk_tolerance,
            holding_period: persona.holding_period.clone(),
            success: true,
            error: None,
        }
    }

    /// A degraded result for a failed provider call
    pub fn failure(persona: &Persona, error: impl std::fmt::Display) -> Self {
        let error = error.to_string();
        Self {
            persona_id: persona.id.clone(),
            persona_name: persona.name.clone(),
            persona_title: persona.title.clone(),
            analysis: format!("Analysis failed: {error}"),
            philosophy: persona.philosophy.clone(),
            risk_tolerance: persona.risk_tolerance,
            holding_period: persona.holding_period.clone(),
            success: false,
            error: Some(error),
        }
    }
}

/// All perspectives on one material plus the synthesized comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The material that was analyzed
    pub material: String,

    /// Persona ids, in request order
    pub persona_ids: Vec<String>,

    /// Individual results, matching `persona_ids` order
    pub analyses: Vec<PerspectiveResult>,

    /// Synthesized comparison narrative, or an error description when the
    /// synthesis call failed
    pub comparison_summary: String,
}

impl ComparisonResult {
    /// Number of individual analyses that succeeded
    pub fn success_count(&self) -> usize {
        self.analyses.iter().filter(|a| a.success).count()
    }

    /// Whether every individual analysis succeeded
    pub fn all_succeeded(&self) -> bool {
        self.analyses.iter().all(|a| a.success)
    }
}
