use serde::Serialize;

use crate::policies::{Policy, PolicyId};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonMetrics {
    pub avg_coverage_risk: f64,
    pub avg_cost_risk: f64,
    pub avg_delay_risk: f64,
    pub min_overall: f64,
    pub max_overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub policy_id: PolicyId,
    pub reason: String,
}

/// Side-by-side view of several policies with the lowest-risk pick.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyComparison {
    pub policies: Vec<Policy>,
    pub metrics: ComparisonMetrics,
    pub recommendation: Recommendation,
}

impl PolicyComparison {
    /// `None` when there is nothing to compare. Ties on overall risk go to the
    /// policy listed first.
    pub fn from_policies(policies: Vec<Policy>) -> Option<Self> {
        let best = policies.iter().reduce(|best, candidate| {
            if candidate.risk_scores.overall_risk() < best.risk_scores.overall_risk() {
                candidate
            } else {
                best
            }
        })?;

        let recommendation = Recommendation {
            policy_id: best.id.clone(),
            reason: format!(
                "Lowest overall risk score ({:?}%) with {} key benefits",
                best.risk_scores.overall_risk(),
                best.benefits.len()
            ),
        };

        let count = policies.len() as f64;
        let average = |score: fn(&Policy) -> u8| {
            policies
                .iter()
                .map(|policy| f64::from(score(policy)))
                .sum::<f64>()
                / count
        };
        let overall = policies.iter().map(|policy| policy.risk_scores.overall_risk());

        let metrics = ComparisonMetrics {
            avg_coverage_risk: average(|policy| policy.risk_scores.coverage_risk()),
            avg_cost_risk: average(|policy| policy.risk_scores.cost_risk()),
            avg_delay_risk: average(|policy| policy.risk_scores.delay_risk()),
            min_overall: overall.clone().fold(f64::INFINITY, f64::min),
            max_overall: overall.fold(f64::NEG_INFINITY, f64::max),
        };

        Some(Self {
            policies,
            metrics,
            recommendation,
        })
    }
}
