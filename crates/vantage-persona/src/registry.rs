//! Persona catalog registry
//!
//! [`PersonaRegistry`] loads the persona catalog once at startup and then
//! serves lookups, searches, and filters. A missing or unparsable catalog
//! is fatal; a single malformed record is skipped with a warning so the
//! rest of the catalog still loads. The registry never mutates after
//! construction, so it is shared across concurrent runs behind an `Arc`
//! with no locking.

use crate::error::{PersonaError, Result};
use crate::persona::{Persona, PersonaSummary, RiskTolerance};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    personas: Vec<serde_json::Value>,
}

/// Registry of investor personas, keyed by id, preserving catalog order
pub struct PersonaRegistry {
    personas: Vec<Persona>,
    index: HashMap<String, usize>,
}

impl PersonaRegistry {
    /// Load the catalog from a JSON file
    ///
    /// The file must hold a top-level `personas` array. Malformed records
    /// are skipped with a warning; an unreadable or unparsable file is an
    /// error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| PersonaError::CatalogUnreadable {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;

        let catalog: CatalogFile =
            serde_json::from_str(&raw).map_err(|e| PersonaError::CatalogParse {
                path: path.display().to_string(),
                detail: e.to_string(),
            })?;

        let registry = Self::from_records(catalog.personas);
        info!(
            count = registry.len(),
            path = %path.display(),
            "Loaded persona catalog"
        );
        Ok(registry)
    }

    /// Build a registry from raw catalog records, quarantining bad ones
    fn from_records(records: Vec<serde_json::Value>) -> Self {
        let mut registry = Self {
            personas: Vec::with_capacity(records.len()),
            index: HashMap::new(),
        };

        for record in records {
            let id_hint = record
                .get("id")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown")
                .to_string();

            let persona: Persona = match serde_json::from_value(record) {
                Ok(p) => p,
                Err(e) => {
                    warn!(id = %id_hint, error = %e, "Skipping malformed persona record");
                    continue;
                }
            };

            if let Err(e) = persona.validate() {
                warn!(id = %persona.id, error = %e, "Skipping invalid persona record");
                continue;
            }

            registry.insert(persona);
        }

        registry
    }

    /// Build a registry from already-constructed personas
    ///
    /// Applies the same validation and duplicate-id policy as [`load`].
    ///
    /// [`load`]: Self::load
    pub fn from_personas(personas: Vec<Persona>) -> Self {
        let mut registry = Self {
            personas: Vec::with_capacity(personas.len()),
            index: HashMap::new(),
        };
        for persona in personas {
            if let Err(e) = persona.validate() {
                warn!(id = %persona.id, error = %e, "Skipping invalid persona record");
                continue;
            }
            registry.insert(persona);
        }
        registry
    }

    fn insert(&mut self, persona: Persona) {
        if self.index.contains_key(&persona.id) {
            warn!(id = %persona.id, "Skipping persona with duplicate id");
            return;
        }
        self.index
            .insert(persona.id.clone(), self.personas.len());
        self.personas.push(persona);
    }

    /// Look up a persona by id
    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.index.get(id).map(|&i| &self.personas[i])
    }

    /// All personas in catalog order
    pub fn list(&self) -> &[Persona] {
        &self.personas
    }

    /// All persona ids in catalog order
    pub fn ids(&self) -> Vec<&str> {
        self.personas.iter().map(|p| p.id.as_str()).collect()
    }

    /// Summary projections of all personas, in catalog order
    pub fn summaries(&self) -> Vec<PersonaSummary> {
        self.personas.iter().map(PersonaSummary::from).collect()
    }

    /// Number of loaded personas
    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    /// Case-insensitive substring search over name, localized name, title,
    /// and philosophy
    pub fn search(&self, keyword: &str) -> Vec<&Persona> {
        let keyword = keyword.to_lowercase();
        self.personas
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&keyword)
                    || p.name_local.to_lowercase().contains(&keyword)
                    || p.title.to_lowercase().contains(&keyword)
                    || p.philosophy.to_lowercase().contains(&keyword)
            })
            .collect()
    }

    /// Personas with exactly the given risk tier
    pub fn filter_by_risk(&self, tier: RiskTolerance) -> Vec<&Persona> {
        self.personas
            .iter()
            .filter(|p| p.risk_tolerance == tier)
            .collect()
    }

    /// Personas whose holding-period descriptor contains the substring
    /// (case-insensitive)
    pub fn filter_by_holding_period(&self, substr: &str) -> Vec<&Persona> {
        let substr = substr.to_lowercase();
        self.personas
            .iter()
            .filter(|p| p.holding_period.to_lowercase().contains(&substr))
            .collect()
    }

    /// Recommend personas matching all of the given preferences
    pub fn recommend(
        &self,
        risk: Option<RiskTolerance>,
        holding_period: Option<&str>,
        keyword: Option<&str>,
    ) -> Vec<PersonaSummary> {
        let keyword = keyword.map(str::to_lowercase);
        let holding = holding_period.map(str::to_lowercase);

        self.personas
            .iter()
            .filter(|p| risk.is_none_or(|r| p.risk_tolerance == r))
            .filter(|p| {
                holding
                    .as_deref()
                    .is_none_or(|h| p.holding_period.to_lowercase().contains(h))
            })
            .filter(|p| {
                keyword.as_deref().is_none_or(|k| {
                    p.name.to_lowercase().contains(k)
                        || p.name_local.to_lowercase().contains(k)
                        || p.title.to_lowercase().contains(k)
                        || p.philosophy.to_lowercase().contains(k)
                })
            })
            .map(PersonaSummary::from)
            .collect()
    }
}

impl std::fmt::Debug for PersonaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersonaRegistry")
            .field("count", &self.len())
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn record(id: &str, name: &str, risk: &str) -> serde_json::Value {
        json!({
            "id": id,
            "name": name,
            "name_local": format!("{name} (local)"),
            "title": format!("the {name}"),
            "philosophy": format!("{name} buys what {name} understands."),
            "principles": ["Think independently"],
            "analysis_focus": ["Cash flow"],
            "risk_tolerance": risk,
            "holding_period": "long term (3-5 years)"
        })
    }

    fn write_catalog(records: &[serde_json::Value]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let body = json!({ "personas": records });
        write!(file, "{body}").unwrap();
        file
    }

    #[test]
    fn test_load_well_formed_catalog() {
        let file = write_catalog(&[
            record("buffett", "Buffett", "low"),
            record("lynch", "Lynch", "medium"),
            record("soros", "Soros", "high"),
        ]);
        let registry = PersonaRegistry::load(file.path()).unwrap();

        assert_eq!(registry.len(), 3);
        for id in ["buffett", "lynch", "soros"] {
            assert!(registry.get(id).is_some(), "missing {id}");
        }
        assert!(registry.get("unknown").is_none());
        // Catalog order preserved
        assert_eq!(registry.ids(), vec!["buffett", "lynch", "soros"]);
    }

    #[test]
    fn test_missing_catalog_is_fatal() {
        let result = PersonaRegistry::load("/nonexistent/personas.json");
        assert!(matches!(
            result,
            Err(PersonaError::CatalogUnreadable { .. })
        ));
    }

    #[test]
    fn test_unparsable_catalog_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let result = PersonaRegistry::load(file.path());
        assert!(matches!(result, Err(PersonaError::CatalogParse { .. })));
    }

    #[test]
    fn test_malformed_record_is_skipped() {
        let mut bad = record("dalio", "Dalio", "medium");
        bad.as_object_mut().unwrap().remove("risk_tolerance");
        let file = write_catalog(&[
            record("buffett", "Buffett", "low"),
            bad,
            record("lynch", "Lynch", "medium"),
        ]);

        let registry = PersonaRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 2);
        assert!(registry.get("dalio").is_none());
        assert!(registry.get("lynch").is_some());
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let file = write_catalog(&[
            record("buffett", "Buffett", "low"),
            record("buffett", "Impostor", "high"),
        ]);
        let registry = PersonaRegistry::load(file.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("buffett").unwrap().name, "Buffett");
    }

    #[test]
    fn test_empty_catalog_is_not_an_error() {
        let file = write_catalog(&[]);
        let registry = PersonaRegistry::load(file.path()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.get("buffett").is_none());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let file = write_catalog(&[
            record("buffett", "Buffett", "low"),
            record("lynch", "Lynch", "medium"),
        ]);
        let registry = PersonaRegistry::load(file.path()).unwrap();

        let hits = registry.search("BUFF");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "buffett");

        // Philosophy text matches too
        let hits = registry.search("understands");
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn test_filters() {
        let file = write_catalog(&[
            record("buffett", "Buffett", "low"),
            record("lynch", "Lynch", "medium"),
            record("soros", "Soros", "high"),
        ]);
        let registry = PersonaRegistry::load(file.path()).unwrap();

        let low = registry.filter_by_risk(RiskTolerance::Low);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].id, "buffett");

        let long = registry.filter_by_holding_period("long");
        assert_eq!(long.len(), 3);
        assert!(registry.filter_by_holding_period("short").is_empty());
    }

    #[test]
    fn test_recommend_combines_filters() {
        let file = write_catalog(&[
            record("buffett", "Buffett", "low"),
            record("lynch", "Lynch", "medium"),
            record("soros", "Soros", "high"),
        ]);
        let registry = PersonaRegistry::load(file.path()).unwrap();

        let all = registry.recommend(None, None, None);
        assert_eq!(all.len(), 3);

        let picks = registry.recommend(Some(RiskTolerance::Medium), Some("long"), Some("lynch"));
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].id, "lynch");

        let none = registry.recommend(Some(RiskTolerance::High), None, Some("buffett"));
        assert!(none.is_empty());
    }
}
