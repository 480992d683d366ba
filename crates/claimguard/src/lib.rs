//! Insurance policy document analysis.
//!
//! Turns raw policy text into typed fields, a rule-based risk assessment, and
//! human-readable risk factors, then exposes persisted policies through a small
//! service layer for claim simulation, comparison, and statistics.

pub mod analysis;
pub mod claims;
pub mod config;
pub mod error;
pub mod policies;
pub mod portfolio;
pub mod telemetry;
