//! Investor persona management for vantage-rs
//!
//! This crate owns the persona side of the analysis system:
//!
//! - [`Persona`] - a named investment-philosophy profile with a closed
//!   risk-tolerance tier and an optional custom prompt template
//! - [`PersonaRegistry`] - catalog loading, lookup, search, and filtering;
//!   read-only after construction so it can be shared across concurrent
//!   analysis runs without locking
//! - [`prompt`] - deterministic system/analysis prompt composition from
//!   a persona record

pub mod error;
pub mod persona;
pub mod prompt;
pub mod registry;

pub use error::{PersonaError, Result};
pub use persona::{Persona, PersonaSummary, RiskTolerance};
pub use registry::PersonaRegistry;
