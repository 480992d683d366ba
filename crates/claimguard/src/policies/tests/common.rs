use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::analysis::{PolicyDocument, UserProfile};
use crate::config::AnalysisConfig;
use crate::policies::repository::{PolicyRecord, PolicyRepository, RepositoryError};
use crate::policies::{policy_router, OwnerId, PolicyId, PolicyService};

pub(super) const HEALTH_POLICY: &str = "Health insurance policy. Policy No: HX-2024/77. \
    Sum insured of Rs. 5 lakh. The plan covers hospitalization expenses in full. \
    A co-pay of 20% applies to every claim. Deductible of Rs. 25,000 per claim. \
    A waiting period of 2 years applies to pre-existing diseases. \
    Cosmetic surgery is not covered under this policy.";

pub(super) const CAR_POLICY: &str = "Motor vehicle policy. Policy Number: MV-9. \
    The insurer covers accident repair at any network garage. \
    Collision damage and theft are included.";

pub(super) fn owner() -> OwnerId {
    OwnerId("alice".to_string())
}

pub(super) fn other_owner() -> OwnerId {
    OwnerId("bob".to_string())
}

pub(super) fn analysis_config() -> AnalysisConfig {
    AnalysisConfig {
        default_age: 30,
        default_policy_type: "Health Insurance".to_string(),
        default_claim_amount: 500_000.0,
        recent_limit: 3,
        stats_window: 50,
    }
}

pub(super) fn analyzed_at(offset_seconds: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 20, 10, 0, 0)
        .single()
        .expect("valid timestamp")
        + Duration::seconds(offset_seconds)
}

pub(super) fn document(text: &str) -> PolicyDocument {
    PolicyDocument::new(text, 4, "policy.pdf")
}

pub(super) fn profile() -> UserProfile {
    UserProfile::new(45, None, "Health Insurance").expect("valid profile")
}

pub(super) fn build_service() -> (PolicyService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PolicyService::new(repository.clone(), analysis_config());
    (service, repository)
}

/// Stores `texts` for `owner`, one second apart, returning ids oldest first.
pub(super) fn seed(
    service: &PolicyService<MemoryRepository>,
    owner: &OwnerId,
    texts: &[&str],
) -> Vec<PolicyId> {
    seed_from(service, owner, 0, texts)
}

/// Like `seed`, starting `first_offset` seconds after the base timestamp so
/// identical texts for another owner get distinct ids.
pub(super) fn seed_from(
    service: &PolicyService<MemoryRepository>,
    owner: &OwnerId,
    first_offset: i64,
    texts: &[&str],
) -> Vec<PolicyId> {
    texts
        .iter()
        .zip(first_offset..)
        .map(|(text, offset)| {
            service
                .analyze_at(owner, &document(text), &profile(), analyzed_at(offset))
                .expect("analysis succeeds")
                .id
        })
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<PolicyId, PolicyRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl PolicyRepository for MemoryRepository {
    fn insert(&self, record: PolicyRecord) -> Result<PolicyRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.policy.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.policy.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &PolicyId) -> Result<Option<PolicyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn recent(&self, owner: &OwnerId, limit: usize) -> Result<Vec<PolicyRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut records: Vec<PolicyRecord> = guard
            .values()
            .filter(|record| record.is_owned_by(owner))
            .cloned()
            .collect();
        records.sort_by(|left, right| right.policy.analyzed_at.cmp(&left.policy.analyzed_at));
        records.truncate(limit);
        Ok(records)
    }
}

pub(super) struct ConflictRepository;

impl PolicyRepository for ConflictRepository {
    fn insert(&self, _record: PolicyRecord) -> Result<PolicyRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _id: &PolicyId) -> Result<Option<PolicyRecord>, RepositoryError> {
        Ok(None)
    }

    fn recent(&self, _owner: &OwnerId, _limit: usize) -> Result<Vec<PolicyRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) struct UnavailableRepository;

impl PolicyRepository for UnavailableRepository {
    fn insert(&self, _record: PolicyRecord) -> Result<PolicyRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PolicyId) -> Result<Option<PolicyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn recent(&self, _owner: &OwnerId, _limit: usize) -> Result<Vec<PolicyRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn policy_router_with_service(
    service: PolicyService<MemoryRepository>,
) -> axum::Router {
    policy_router(Arc::new(service))
}
