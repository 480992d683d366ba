use serde::{Deserialize, Serialize};

use super::fields::ExtractedFields;
use super::normalizer::{count_occurrences, group_thousands, lowercase};

const CLARITY_INDICATORS: &[&str] = &[
    "clear",
    "simple",
    "understand",
    "easy",
    "plain",
    "explain",
    "described",
    "definition",
    "meaning",
];

const COMPREHENSIVENESS_INDICATORS: &[&str] = &[
    "comprehensive",
    "complete",
    "full",
    "extensive",
    "broad",
    "wide",
    "range",
    "variety",
    "multiple",
    "various",
];

const TRANSPARENCY_INDICATORS: &[&str] = &[
    "transparent",
    "disclose",
    "disclosure",
    "clear",
    "explicit",
    "specifically",
    "detailed",
    "details",
    "specific",
    "particular",
];

/// Wording-based quality indicators, each 0-100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub clarity: u8,
    pub comprehensiveness: u8,
    pub transparency: u8,
}

impl QualityMetrics {
    pub fn measure(text: &str) -> Self {
        let text_lower = lowercase(text);
        Self {
            clarity: indicator_score(&text_lower, CLARITY_INDICATORS),
            comprehensiveness: indicator_score(&text_lower, COMPREHENSIVENESS_INDICATORS),
            transparency: indicator_score(&text_lower, TRANSPARENCY_INDICATORS),
        }
    }
}

fn indicator_score(text_lower: &str, indicators: &[&str]) -> u8 {
    let hits: usize = indicators
        .iter()
        .map(|indicator| count_occurrences(text_lower, indicator))
        .sum();
    hits.saturating_mul(10).min(100) as u8
}

/// Short coverage digest shown next to the risk scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSummary {
    pub comprehensive: String,
    pub waiting_period: String,
    pub co_pay: String,
    pub deductible: String,
}

impl CoverageSummary {
    pub fn summarize(text: &str, fields: &ExtractedFields) -> Self {
        let comprehensive = if lowercase(text).contains("comprehensive") {
            "Yes"
        } else {
            "Limited/Specified"
        };

        let deductible = match fields.financial.deductible {
            0 => "Not specified".to_string(),
            amount => format!("₹{}", group_thousands(amount)),
        };

        Self {
            comprehensive: comprehensive.to_string(),
            waiting_period: fields.waiting_period.clone(),
            co_pay: format!("{}%", fields.financial.co_pay_percentage),
            deductible,
        }
    }
}
