//! Persisted policy analyses: the aggregate, its storage seam, the service
//! facade and the HTTP routes over it.

pub mod report;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::analysis::{
    Benefit, CoverageSummary, FinancialDetails, KeyClause, KeyDates, PolicyTypeCandidate,
    QualityMetrics, RiskFactor, RiskScores,
};

pub use report::{PolicyReport, ReportSection};
pub use repository::{PolicyRecord, PolicyRepository, PolicySummary, RepositoryError};
pub use router::policy_router;
pub use service::{PolicyService, PolicyServiceError};

const POLICY_ID_LEN: usize = 16;

/// Content-and-time derived identity of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PolicyId(String);

impl PolicyId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// First sixteen hex characters of SHA-256 over the text followed by the
    /// RFC 3339 timestamp with nanoseconds.
    pub fn derive(text: &str, analyzed_at: DateTime<Utc>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(
            analyzed_at
                .to_rfc3339_opts(SecondsFormat::Nanos, true)
                .as_bytes(),
        );
        let digest = format!("{:x}", hasher.finalize());
        Self(digest[..POLICY_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account that owns persisted analyses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub String);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One analyzed policy. Built once by the analyzer and never updated;
/// re-analysis produces a new aggregate with a new identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: PolicyId,
    pub filename: String,
    pub analyzed_at: DateTime<Utc>,
    pub declared_type: String,
    pub detected_type: String,
    pub type_candidates: Vec<PolicyTypeCandidate>,
    pub policy_number: String,
    pub sum_insured: String,
    pub premium: String,
    pub key_dates: KeyDates,
    pub benefits: Vec<Benefit>,
    pub exclusions: Vec<String>,
    pub clauses: Vec<KeyClause>,
    pub waiting_period: String,
    pub risk_factors: Vec<RiskFactor>,
    pub coverage: CoverageSummary,
    pub quality: QualityMetrics,
    pub risk_scores: RiskScores,
    pub financial: FinancialDetails,
    pub text_length: usize,
    pub page_count: u32,
}

impl Policy {
    pub fn summary(&self) -> PolicySummary {
        PolicySummary {
            id: self.id.clone(),
            filename: self.filename.clone(),
            policy_type: self.declared_type.clone(),
            detected_type: self.detected_type.clone(),
            overall_risk: self.risk_scores.overall_risk(),
            analyzed_at: self.analyzed_at,
        }
    }
}
