//! Additive rule-based risk scoring.
//!
//! Every constant and the order of additions are part of the scoring contract;
//! outputs are compared exactly across releases.

mod rules;

use serde::{Deserialize, Serialize};

use super::domain::UserProfile;
use super::features::ExtractedFeatures;
use super::normalizer::round_to_tenth;

const COVERAGE_WEIGHT: f64 = 0.4;
const COST_WEIGHT: f64 = 0.35;
const DELAY_WEIGHT: f64 = 0.25;

/// Three clamped sub-scores and their weighted aggregate.
///
/// `overall_risk` is always derived from the sub-scores, including when the
/// value is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RiskComponents")]
pub struct RiskScores {
    coverage_risk: u8,
    cost_risk: u8,
    delay_risk: u8,
    overall_risk: f64,
}

#[derive(Deserialize)]
struct RiskComponents {
    coverage_risk: u8,
    cost_risk: u8,
    delay_risk: u8,
}

impl From<RiskComponents> for RiskScores {
    fn from(components: RiskComponents) -> Self {
        Self::from_components(
            components.coverage_risk,
            components.cost_risk,
            components.delay_risk,
        )
    }
}

impl RiskScores {
    /// Clamps each sub-score to 100 and computes the weighted overall score.
    pub fn from_components(coverage_risk: u8, cost_risk: u8, delay_risk: u8) -> Self {
        let coverage_risk = coverage_risk.min(100);
        let cost_risk = cost_risk.min(100);
        let delay_risk = delay_risk.min(100);
        let overall = f64::from(coverage_risk) * COVERAGE_WEIGHT
            + f64::from(cost_risk) * COST_WEIGHT
            + f64::from(delay_risk) * DELAY_WEIGHT;

        Self {
            coverage_risk,
            cost_risk,
            delay_risk,
            overall_risk: round_to_tenth(overall),
        }
    }

    pub fn coverage_risk(&self) -> u8 {
        self.coverage_risk
    }

    pub fn cost_risk(&self) -> u8 {
        self.cost_risk
    }

    pub fn delay_risk(&self) -> u8 {
        self.delay_risk
    }

    pub fn overall_risk(&self) -> f64 {
        self.overall_risk
    }
}

/// Stateless scorer over extracted features and the policyholder profile.
pub struct RiskScorer;

impl RiskScorer {
    pub fn score(features: &ExtractedFeatures, profile: &UserProfile) -> RiskScores {
        RiskScores::from_components(
            clamp_whole(rules::coverage_risk(features, profile)),
            clamp_fractional(rules::cost_risk(features, profile)),
            clamp_whole(rules::delay_risk(features, profile)),
        )
    }
}

fn clamp_whole(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// Truncates toward zero before clamping.
fn clamp_fractional(value: f64) -> u8 {
    value.trunc().clamp(0.0, 100.0) as u8
}
