//! Human-readable risk factors with severity and advice.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::domain::UserProfile;
use super::features::compile;
use super::fields::ExtractedFields;
use super::normalizer::{group_thousands, lowercase};

const SERIOUS_CONDITIONS: &[&str] = &["diabetes", "blood pressure", "heart", "cancer", "thyroid"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImpactTier {
    Low,
    Medium,
    #[serde(rename = "Medium-High")]
    MediumHigh,
    High,
    Critical,
}

impl ImpactTier {
    pub const fn label(self) -> &'static str {
        match self {
            ImpactTier::Low => "Low",
            ImpactTier::Medium => "Medium",
            ImpactTier::MediumHigh => "Medium-High",
            ImpactTier::High => "High",
            ImpactTier::Critical => "Critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: String,
    pub impact: ImpactTier,
    pub score: u8,
    pub description: String,
    pub recommendation: String,
}

impl RiskFactor {
    fn new(
        factor: &str,
        impact: ImpactTier,
        score: u8,
        description: impl Into<String>,
        recommendation: &str,
    ) -> Self {
        Self {
            factor: factor.to_string(),
            impact,
            score,
            description: description.into(),
            recommendation: recommendation.to_string(),
        }
    }
}

fn exclusion_terms() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| compile(r"exclusion|not\s+cover|excluded"))
}

pub struct RiskFactorAnalyzer;

impl RiskFactorAnalyzer {
    /// Evaluates each condition independently, in a fixed order: age,
    /// pre-existing condition, exclusion density, waiting period, co-pay,
    /// deductible.
    pub fn analyze(text: &str, profile: &UserProfile, fields: &ExtractedFields) -> Vec<RiskFactor> {
        let text_lower = lowercase(text);
        let exclusion_count = exclusion_terms().find_iter(&text_lower).count();

        [
            age_factor(profile.age),
            condition_factor(profile),
            exclusion_factor(exclusion_count),
            waiting_period_factor(&fields.waiting_period),
            co_pay_factor(fields.financial.co_pay_percentage),
            deductible_factor(fields.financial.deductible),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

fn age_factor(age: u32) -> Option<RiskFactor> {
    if age > 60 {
        Some(RiskFactor::new(
            "Age",
            ImpactTier::High,
            85,
            "Age above 60 significantly increases claim scrutiny and premium",
            "Consider policies with lower age restrictions or senior citizen plans",
        ))
    } else if age > 50 {
        Some(RiskFactor::new(
            "Age",
            ImpactTier::MediumHigh,
            65,
            "Age between 50-60 may affect premium and coverage options",
            "Review age-related clauses and premium loading carefully",
        ))
    } else if age > 40 {
        Some(RiskFactor::new(
            "Age",
            ImpactTier::Medium,
            45,
            "Moderate age-related risk factors to consider",
            "Standard age-related considerations apply",
        ))
    } else {
        None
    }
}

fn condition_factor(profile: &UserProfile) -> Option<RiskFactor> {
    let condition = profile.declared_condition()?;
    let condition_lower = lowercase(condition);

    if SERIOUS_CONDITIONS
        .iter()
        .any(|term| condition_lower.contains(term))
    {
        Some(RiskFactor::new(
            "Pre-existing condition",
            ImpactTier::Critical,
            90,
            format!(
                "History of {condition} will significantly impact coverage and may have long waiting periods"
            ),
            "Look for policies with shorter waiting periods for pre-existing conditions",
        ))
    } else {
        Some(RiskFactor::new(
            "Pre-existing condition",
            ImpactTier::High,
            75,
            format!("History of {condition} may affect coverage and require waiting periods"),
            "Check waiting period clauses and sub-limits for this condition",
        ))
    }
}

fn exclusion_factor(count: usize) -> Option<RiskFactor> {
    if count > 8 {
        Some(RiskFactor::new(
            "High exclusion count",
            ImpactTier::High,
            80,
            format!("Policy contains {count} exclusion-related terms - higher than average"),
            "Review all exclusions carefully; consider if coverage gaps exist",
        ))
    } else if count > 4 {
        Some(RiskFactor::new(
            "Moderate exclusions",
            ImpactTier::Medium,
            50,
            format!("Policy contains {count} exclusion-related terms"),
            "Understand key exclusions that may affect your specific needs",
        ))
    } else {
        None
    }
}

/// Year-scale periods only count when longer than two years; a short
/// year-scale period does not fall through to the month rule.
fn waiting_period_factor(waiting_period: &str) -> Option<RiskFactor> {
    let period_lower = lowercase(waiting_period);

    if period_lower.contains("year") {
        let years = waiting_period
            .split(|c: char| !c.is_ascii_digit())
            .find(|digits| !digits.is_empty())
            .and_then(|digits| digits.parse::<u64>().ok())?;
        (years > 2).then(|| {
            RiskFactor::new(
                "Long waiting period",
                ImpactTier::High,
                75,
                format!("Long waiting period of {waiting_period} before full coverage applies"),
                "Consider if you can wait this period for claims; check for shorter alternatives",
            )
        })
    } else if period_lower.contains("month") {
        Some(RiskFactor::new(
            "Waiting period applies",
            ImpactTier::Medium,
            40,
            format!("Waiting period of {waiting_period} applies for certain conditions"),
            "Plan healthcare needs around the waiting period",
        ))
    } else {
        None
    }
}

fn co_pay_factor(co_pay: u32) -> Option<RiskFactor> {
    if co_pay > 30 {
        Some(RiskFactor::new(
            "Very high co-pay",
            ImpactTier::Critical,
            90,
            format!("High co-pay of {co_pay}% means significant out-of-pocket expenses"),
            "Consider policies with lower co-pay or build savings for co-pay amount",
        ))
    } else if co_pay > 20 {
        Some(RiskFactor::new(
            "High co-pay",
            ImpactTier::High,
            70,
            format!("Co-pay of {co_pay}% requires substantial out-of-pocket payment"),
            "Budget for co-pay amounts and check if co-pay applies to all claims",
        ))
    } else if co_pay > 10 {
        Some(RiskFactor::new(
            "Moderate co-pay",
            ImpactTier::Medium,
            40,
            format!("Co-pay of {co_pay}% applies"),
            "Standard co-pay arrangement; plan for this expense",
        ))
    } else {
        None
    }
}

fn deductible_factor(deductible: u64) -> Option<RiskFactor> {
    if deductible > 50_000 {
        Some(RiskFactor::new(
            "High deductible",
            ImpactTier::High,
            75,
            format!(
                "Deductible of ₹{} must be paid before coverage starts",
                group_thousands(deductible)
            ),
            "Ensure you have funds available for the deductible amount",
        ))
    } else if deductible > 10_000 {
        Some(RiskFactor::new(
            "Moderate deductible",
            ImpactTier::Medium,
            45,
            format!("Deductible of ₹{} applies per claim", group_thousands(deductible)),
            "Plan for this out-of-pocket expense per claim",
        ))
    } else {
        None
    }
}
