use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::normalizer::round_to_tenth;
use crate::policies::{Policy, PolicyId};

const RECENT_ACTIVITY_LEN: usize = 5;

/// Overall-risk buckets used on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskBand {
    pub fn for_score(overall_risk: f64) -> Self {
        if overall_risk <= 30.0 {
            RiskBand::Low
        } else if overall_risk <= 60.0 {
            RiskBand::Moderate
        } else if overall_risk <= 80.0 {
            RiskBand::High
        } else {
            RiskBand::Critical
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskBand::Low => "Low (0-30)",
            RiskBand::Moderate => "Moderate (31-60)",
            RiskBand::High => "High (61-80)",
            RiskBand::Critical => "Critical (81-100)",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskDistribution {
    #[serde(rename = "Low (0-30)")]
    pub low: usize,
    #[serde(rename = "Moderate (31-60)")]
    pub moderate: usize,
    #[serde(rename = "High (61-80)")]
    pub high: usize,
    #[serde(rename = "Critical (81-100)")]
    pub critical: usize,
}

impl RiskDistribution {
    fn record(&mut self, band: RiskBand) {
        match band {
            RiskBand::Low => self.low += 1,
            RiskBand::Moderate => self.moderate += 1,
            RiskBand::High => self.high += 1,
            RiskBand::Critical => self.critical += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentActivity {
    pub id: PolicyId,
    #[serde(rename = "type")]
    pub policy_type: String,
    pub risk: f64,
    pub time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub total_analyzed: usize,
    pub avg_risk_score: f64,
    pub policy_types: BTreeMap<String, usize>,
    pub risk_distribution: RiskDistribution,
    pub recent_activity: Vec<RecentActivity>,
}

impl PortfolioStats {
    /// Expects policies newest first, as the repository lists them.
    pub fn from_policies(policies: &[Policy]) -> Self {
        let mut policy_types = BTreeMap::new();
        let mut risk_distribution = RiskDistribution::default();

        for policy in policies {
            *policy_types.entry(policy.declared_type.clone()).or_insert(0) += 1;
            risk_distribution.record(RiskBand::for_score(policy.risk_scores.overall_risk()));
        }

        let avg_risk_score = if policies.is_empty() {
            0.0
        } else {
            let total: f64 = policies
                .iter()
                .map(|policy| policy.risk_scores.overall_risk())
                .sum();
            round_to_tenth(total / policies.len() as f64)
        };

        let recent_activity = policies
            .iter()
            .take(RECENT_ACTIVITY_LEN)
            .map(|policy| RecentActivity {
                id: policy.id.clone(),
                policy_type: policy.declared_type.clone(),
                risk: policy.risk_scores.overall_risk(),
                time: policy.analyzed_at,
            })
            .collect();

        Self {
            total_analyzed: policies.len(),
            avg_risk_score,
            policy_types,
            risk_distribution,
            recent_activity,
        }
    }
}
