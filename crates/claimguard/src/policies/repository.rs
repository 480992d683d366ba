use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{OwnerId, Policy, PolicyId};

/// Repository record pairing an analysis with the account that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub owner: OwnerId,
    pub policy: Policy,
}

impl PolicyRecord {
    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner == owner
    }
}

/// Storage abstraction so the service can be exercised in isolation. There is
/// no update or per-policy delete: analyses are immutable once stored.
pub trait PolicyRepository: Send + Sync {
    /// Stores the whole record atomically; an existing id is a conflict.
    fn insert(&self, record: PolicyRecord) -> Result<PolicyRecord, RepositoryError>;
    fn fetch(&self, id: &PolicyId) -> Result<Option<PolicyRecord>, RepositoryError>;
    /// The owner's records, newest first.
    fn recent(&self, owner: &OwnerId, limit: usize) -> Result<Vec<PolicyRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("policy already exists")]
    Conflict,
    #[error("policy not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Listing view of a stored analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicySummary {
    pub id: PolicyId,
    pub filename: String,
    pub policy_type: String,
    pub detected_type: String,
    pub overall_risk: f64,
    pub analyzed_at: DateTime<Utc>,
}
