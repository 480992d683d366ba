use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::repository::{PolicyRecord, PolicyRepository, PolicySummary, RepositoryError};
use super::{OwnerId, Policy, PolicyId};
use crate::analysis::{AnalysisError, PolicyAnalyzer, PolicyCategory, PolicyDocument, UserProfile};
use crate::claims::{ClaimSimulation, ClaimSimulationError, ClaimSimulator};
use crate::config::AnalysisConfig;
use crate::portfolio::{PolicyComparison, PortfolioStats, MIN_COMPARISON_POLICIES};

/// Service composing the analysis pipeline with policy persistence.
pub struct PolicyService<R> {
    repository: Arc<R>,
    config: AnalysisConfig,
}

impl<R> PolicyService<R>
where
    R: PolicyRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: AnalysisConfig) -> Self {
        Self { repository, config }
    }

    /// Builds a profile, filling omitted fields from the configured defaults.
    pub fn profile(
        &self,
        age: Option<u32>,
        pre_existing_condition: Option<String>,
        policy_type: Option<String>,
    ) -> Result<UserProfile, AnalysisError> {
        let declared_type = policy_type
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| self.config.default_policy_type.clone());

        UserProfile::new(
            age.unwrap_or(self.config.default_age),
            pre_existing_condition,
            declared_type,
        )
    }

    /// Analyze a document now and persist the result for `owner`.
    pub fn analyze(
        &self,
        owner: &OwnerId,
        document: &PolicyDocument,
        profile: &UserProfile,
    ) -> Result<Policy, PolicyServiceError> {
        self.analyze_at(owner, document, profile, Utc::now())
    }

    pub fn analyze_at(
        &self,
        owner: &OwnerId,
        document: &PolicyDocument,
        profile: &UserProfile,
        analyzed_at: DateTime<Utc>,
    ) -> Result<Policy, PolicyServiceError> {
        let policy = match PolicyAnalyzer::analyze(document, profile, analyzed_at) {
            Ok(policy) => policy,
            Err(error @ AnalysisError::UnusableDocument) => {
                warn!(
                    owner = %owner,
                    filename = document.filename(),
                    "refusing to analyze document without usable text"
                );
                return Err(error.into());
            }
            Err(error) => return Err(error.into()),
        };

        debug!(
            policy_id = %policy.id,
            detected_type = %policy.detected_type,
            candidates = policy.type_candidates.len(),
            risk_factors = policy.risk_factors.len(),
            "policy pipeline finished"
        );

        let stored = self.repository.insert(PolicyRecord {
            owner: owner.clone(),
            policy,
        })?;

        info!(
            policy_id = %stored.policy.id,
            owner = %owner,
            overall_risk = stored.policy.risk_scores.overall_risk(),
            "policy analysis stored"
        );

        Ok(stored.policy)
    }

    /// Fetch one of the owner's policies. Policies owned by another account
    /// are reported as missing.
    pub fn get(&self, owner: &OwnerId, id: &PolicyId) -> Result<Policy, PolicyServiceError> {
        let record = self
            .repository
            .fetch(id)?
            .filter(|record| record.is_owned_by(owner))
            .ok_or(RepositoryError::NotFound)?;
        Ok(record.policy)
    }

    /// Newest first; `limit` falls back to the configured page size.
    pub fn recent(
        &self,
        owner: &OwnerId,
        limit: Option<usize>,
    ) -> Result<Vec<PolicySummary>, PolicyServiceError> {
        let limit = limit
            .filter(|limit| *limit > 0)
            .unwrap_or(self.config.recent_limit);
        let records = self.repository.recent(owner, limit)?;
        Ok(records
            .iter()
            .map(|record| record.policy.summary())
            .collect())
    }

    pub fn simulate_claim(
        &self,
        owner: &OwnerId,
        id: &PolicyId,
        claim_amount: Option<f64>,
    ) -> Result<ClaimSimulation, PolicyServiceError> {
        let policy = self.get(owner, id)?;
        let claim_amount = claim_amount.unwrap_or(self.config.default_claim_amount);
        let simulation = ClaimSimulator::simulate_for(&policy.financial, claim_amount)?;

        debug!(
            policy_id = %id,
            claim_amount,
            insurer_pays = simulation.insurer_pays,
            "claim simulated"
        );

        Ok(simulation)
    }

    /// Compares the owner's policies in the order given. Ids that do not
    /// resolve to an owned policy are skipped, but two must remain.
    pub fn compare(
        &self,
        owner: &OwnerId,
        ids: &[PolicyId],
    ) -> Result<PolicyComparison, PolicyServiceError> {
        if ids.len() < MIN_COMPARISON_POLICIES {
            return Err(PolicyServiceError::InsufficientPolicies {
                required: MIN_COMPARISON_POLICIES,
            });
        }

        let mut policies = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(owner, id) {
                Ok(policy) => policies.push(policy),
                Err(PolicyServiceError::Repository(RepositoryError::NotFound)) => {
                    debug!(policy_id = %id, "skipping unknown policy in comparison");
                }
                Err(other) => return Err(other),
            }
        }

        if policies.len() < MIN_COMPARISON_POLICIES {
            return Err(RepositoryError::NotFound.into());
        }

        PolicyComparison::from_policies(policies).ok_or(RepositoryError::NotFound.into())
    }

    /// Statistics over the owner's most recent analyses.
    pub fn stats(&self, owner: &OwnerId) -> Result<PortfolioStats, PolicyServiceError> {
        let records = self.repository.recent(owner, self.config.stats_window)?;
        let policies: Vec<Policy> = records.into_iter().map(|record| record.policy).collect();
        Ok(PortfolioStats::from_policies(&policies))
    }

    pub fn policy_types(&self) -> Vec<&'static str> {
        PolicyCategory::ALL
            .into_iter()
            .map(PolicyCategory::label)
            .collect()
    }
}

/// Error raised by the policy service.
#[derive(Debug, thiserror::Error)]
pub enum PolicyServiceError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    #[error(transparent)]
    Simulation(#[from] ClaimSimulationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("at least {required} policies are required for a comparison")]
    InsufficientPolicies { required: usize },
}
