use claimguard::policies::{OwnerId, PolicyId, PolicyRecord, PolicyRepository, RepositoryError};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local policy store. Records are kept in insertion order per owner
/// so listings can be served newest first.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPolicyRepository {
    inner: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    records: HashMap<PolicyId, PolicyRecord>,
    order: Vec<PolicyId>,
}

impl InMemoryPolicyRepository {
    fn store(&self) -> Result<MutexGuard<'_, Store>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("policy store lock poisoned".to_string()))
    }
}

impl PolicyRepository for InMemoryPolicyRepository {
    fn insert(&self, record: PolicyRecord) -> Result<PolicyRecord, RepositoryError> {
        let mut store = self.store()?;
        if store.records.contains_key(&record.policy.id) {
            return Err(RepositoryError::Conflict);
        }
        store.order.push(record.policy.id.clone());
        store
            .records
            .insert(record.policy.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &PolicyId) -> Result<Option<PolicyRecord>, RepositoryError> {
        let store = self.store()?;
        Ok(store.records.get(id).cloned())
    }

    fn recent(&self, owner: &OwnerId, limit: usize) -> Result<Vec<PolicyRecord>, RepositoryError> {
        let store = self.store()?;
        Ok(store
            .order
            .iter()
            .rev()
            .filter_map(|id| store.records.get(id))
            .filter(|record| record.is_owned_by(owner))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use claimguard::analysis::{PolicyAnalyzer, PolicyDocument, UserProfile};

    fn record(owner: &str, text: &str, second: u32) -> PolicyRecord {
        let at = Utc
            .with_ymd_and_hms(2025, 7, 1, 9, 0, second)
            .single()
            .expect("timestamp");
        let profile = UserProfile::new(30, None, "Health Insurance").expect("profile");
        let policy = PolicyAnalyzer::analyze(&PolicyDocument::new(text, 1, "p.pdf"), &profile, at)
            .expect("policy");
        PolicyRecord {
            owner: OwnerId(owner.to_string()),
            policy,
        }
    }

    #[test]
    fn insert_rejects_duplicate_ids() {
        let repository = InMemoryPolicyRepository::default();
        let first = record("alice", "Health cover text.", 0);
        repository.insert(first.clone()).expect("insert succeeds");
        assert!(matches!(
            repository.insert(first),
            Err(RepositoryError::Conflict)
        ));
    }

    #[test]
    fn recent_is_newest_first_and_owner_scoped() {
        let repository = InMemoryPolicyRepository::default();
        let older = record("alice", "Health cover text.", 0);
        let foreign = record("bob", "Health cover text.", 1);
        let newer = record("alice", "Motor cover text.", 2);
        for item in [older.clone(), foreign, newer.clone()] {
            repository.insert(item).expect("insert succeeds");
        }

        let listed = repository
            .recent(&OwnerId("alice".to_string()), 10)
            .expect("recent succeeds");
        let ids: Vec<&PolicyId> = listed.iter().map(|record| &record.policy.id).collect();
        assert_eq!(ids, vec![&newer.policy.id, &older.policy.id]);

        let limited = repository
            .recent(&OwnerId("alice".to_string()), 1)
            .expect("recent succeeds");
        assert_eq!(limited.len(), 1);
        assert_eq!(
            repository.fetch(&older.policy.id).expect("fetch succeeds"),
            Some(older)
        );
    }
}
