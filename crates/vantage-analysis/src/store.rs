//! Record store collaborator
//!
//! Finished reports and comparisons can be persisted for later retrieval.
//! The store is strictly optional: the pipeline produces correct in-memory
//! results whether or not a store is attached, and a failed save is logged
//! and swallowed rather than failing the run.

use crate::error::{AnalysisError, Result};
use crate::pipeline::PipelineState;
use crate::result::ComparisonResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// Persistence contract for finished analysis artifacts
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a finished pipeline run; returns the record id
    async fn save_report(&self, state: &PipelineState) -> Result<String>;

    /// Persist a comparison result; returns the record id
    async fn save_comparison(&self, comparison: &ComparisonResult) -> Result<String>;

    /// Fetch a record by id
    async fn get(&self, record_id: &str) -> Result<Option<serde_json::Value>>;

    /// Record ids in insertion order
    async fn list_ids(&self) -> Result<Vec<String>>;
}

/// In-memory record store
///
/// Append-only map of record id to the serialized artifact. Good enough
/// for the CLI and for tests; a database-backed store implements the same
/// trait.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, serde_json::Value>>,
    order: RwLock<Vec<String>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&self, value: serde_json::Value) -> Result<String> {
        let record_id = Uuid::new_v4().to_string();
        self.records
            .write()
            .map_err(|_| AnalysisError::Store("record map lock poisoned".to_string()))?
            .insert(record_id.clone(), value);
        self.order
            .write()
            .map_err(|_| AnalysisError::Store("record order lock poisoned".to_string()))?
            .push(record_id.clone());
        Ok(record_id)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn save_report(&self, state: &PipelineState) -> Result<String> {
        let value = serde_json::to_value(state)
            .map_err(|e| AnalysisError::Store(format!("serialize report: {e}")))?;
        self.insert(value)
    }

    async fn save_comparison(&self, comparison: &ComparisonResult) -> Result<String> {
        let value = serde_json::to_value(comparison)
            .map_err(|e| AnalysisError::Store(format!("serialize comparison: {e}")))?;
        self.insert(value)
    }

    async fn get(&self, record_id: &str) -> Result<Option<serde_json::Value>> {
        Ok(self
            .records
            .read()
            .map_err(|_| AnalysisError::Store("record map lock poisoned".to_string()))?
            .get(record_id)
            .cloned())
    }

    async fn list_ids(&self) -> Result<Vec<String>> {
        Ok(self
            .order
            .read()
            .map_err(|_| AnalysisError::Store("record order lock poisoned".to_string()))?
            .clone())
    }
}
