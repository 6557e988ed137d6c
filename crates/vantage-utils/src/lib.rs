//! Shared utilities for vantage-rs
//!
//! This crate provides common functionality used across the vantage-rs
//! workspace, including logging setup and environment-driven configuration.

pub mod config;
pub mod logging;

pub use config::Config;
pub use logging::init_tracing;
