//! Persona data model
//!
//! A persona is a named investment-philosophy profile used to shape how
//! the LLM frames its analysis. Records are deserialized from the catalog
//! file and validated once at load time; after that they are immutable.

use crate::error::{PersonaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk-tolerance tier (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    VeryLow,
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    /// Human-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLow => "very low",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RiskTolerance {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "very_low" => Ok(Self::VeryLow),
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(PersonaError::InvalidRecord {
                id: String::new(),
                detail: format!("unknown risk tolerance '{other}'"),
            }),
        }
    }
}

/// An investor persona
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Unique identifier within the catalog
    pub id: String,

    /// Display name
    pub name: String,

    /// Localized display name
    pub name_local: String,

    /// Title or epithet (e.g. "the father of value investing")
    pub title: String,

    /// Free-text investment philosophy
    pub philosophy: String,

    /// Ordered core investment principles
    #[serde(default)]
    pub principles: Vec<String>,

    /// Ordered analysis focus points
    #[serde(default)]
    pub analysis_focus: Vec<String>,

    /// Decision criteria, keyed by criterion name
    #[serde(default)]
    pub decision_criteria: HashMap<String, String>,

    /// Risk-tolerance tier
    pub risk_tolerance: RiskTolerance,

    /// Holding-period preference (free-form, filtered by substring)
    pub holding_period: String,

    /// Optional custom analysis-prompt template with a `{{ material }}`
    /// substitution point
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

impl Persona {
    /// Validate the record against the schema invariants
    ///
    /// Required text fields must be non-empty and a custom prompt template,
    /// when present, must actually substitute the material.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("id", &self.id),
            ("name", &self.name),
            ("name_local", &self.name_local),
            ("title", &self.title),
            ("philosophy", &self.philosophy),
            ("holding_period", &self.holding_period),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(PersonaError::InvalidRecord {
                    id: self.id.clone(),
                    detail: format!("required field '{field}' is empty"),
                });
            }
        }

        if let Some(template) = &self.prompt_template {
            crate::prompt::validate_template(template).map_err(|e| {
                PersonaError::InvalidRecord {
                    id: self.id.clone(),
                    detail: format!("prompt_template: {e}"),
                }
            })?;
        }

        Ok(())
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}) - {}", self.name, self.name_local, self.title)
    }
}

/// Display-oriented projection of a persona
///
/// This is what listing endpoints and the pipeline state carry instead of
/// the full record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
    pub name_local: String,
    pub title: String,
    pub philosophy: String,
    pub risk_tolerance: RiskTolerance,
    pub holding_period: String,
}

impl From<&Persona> for PersonaSummary {
    fn from(p: &Persona) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            name_local: p.name_local.clone(),
            title: p.title.clone(),
            philosophy: p.philosophy.clone(),
            risk_tolerance: p.risk_tolerance,
            holding_period: p.holding_period.clone(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_persona(id: &str) -> Persona {
    Persona {
        id: id.to_string(),
        name: "Warren Buffett".to_string(),
        name_local: "沃伦·巴菲特".to_string(),
        title: "the Oracle of Omaha".to_string(),
        philosophy: "Buy wonderful companies at fair prices and hold them.".to_string(),
        principles: vec![
            "Stay within your circle of competence".to_string(),
            "Insist on a margin of safety".to_string(),
        ],
        analysis_focus: vec!["Durable competitive moats".to_string()],
        decision_criteria: HashMap::new(),
        risk_tolerance: RiskTolerance::Low,
        holding_period: "very long term (10+ years)".to_string(),
        prompt_template: None,
    }
}
