//! Keyword-overlap ranking of policy categories.

use serde::{Deserialize, Serialize};

use super::domain::PolicyCategory;
use super::normalizer::{count_occurrences, lowercase, round_to_tenth};

const CATEGORY_WEIGHT: f64 = 1.5;
const MIN_CONFIDENCE: f64 = 5.0;
const MAX_MATCHED_KEYWORDS: usize = 5;

const HEALTH_KEYWORDS: &[&str] = &[
    "health",
    "medical",
    "hospital",
    "surgery",
    "disease",
    "treatment",
    "doctor",
    "medicine",
    "clinical",
    "diagnosis",
    "patient",
    "healthcare",
    "policy",
    "insurance",
    "cover",
    "benefits",
    "cashless",
    "reimbursement",
    "room rent",
    "icu",
    "pre-existing",
    "waiting period",
    "copay",
    "day care",
    "hospitalization",
];

const CAR_KEYWORDS: &[&str] = &[
    "car",
    "vehicle",
    "motor",
    "automobile",
    "accident",
    "drive",
    "driver",
    "collision",
    "repair",
    "garage",
    "road",
    "traffic",
    "third party",
    "comprehensive",
    "own damage",
    "theft",
    "liability",
    "no claim bonus",
    "depreciation",
    "towing",
    "tire",
    "engine",
];

const LIFE_KEYWORDS: &[&str] = &[
    "life",
    "death",
    "term",
    "maturity",
    "nominee",
    "beneficiary",
    "assured",
    "policyholder",
    "premium",
    "sum assured",
    "survival",
    "mortality",
    "endowment",
    "whole life",
    "riders",
    "critical illness",
    "accidental death",
    "disability",
    "income benefit",
];

const TRAVEL_KEYWORDS: &[&str] = &[
    "travel",
    "trip",
    "flight",
    "baggage",
    "overseas",
    "foreign",
    "passport",
    "journey",
    "tour",
    "abroad",
    "holiday",
    "vacation",
    "airline",
    "trip cancellation",
    "delay",
    "lost luggage",
    "emergency evacuation",
    "travel assistance",
];

const HOME_KEYWORDS: &[&str] = &[
    "home",
    "house",
    "property",
    "building",
    "contents",
    "fire",
    "theft",
    "flood",
    "earthquake",
    "residence",
    "household",
    "structure",
    "burglary",
    "natural disaster",
    "personal belongings",
    "liability",
    "renovation",
];

const BIKE_KEYWORDS: &[&str] = &[
    "bike",
    "motorcycle",
    "two wheeler",
    "scooter",
    "helmet",
    "rider",
    "biking",
    "motorcycling",
    "two-wheeler",
    "accessories",
    "pillion",
    "comprehensive",
];

impl PolicyCategory {
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            PolicyCategory::Health => HEALTH_KEYWORDS,
            PolicyCategory::Car => CAR_KEYWORDS,
            PolicyCategory::Life => LIFE_KEYWORDS,
            PolicyCategory::Travel => TRAVEL_KEYWORDS,
            PolicyCategory::Home => HOME_KEYWORDS,
            PolicyCategory::Bike => BIKE_KEYWORDS,
        }
    }
}

/// One ranked category guess.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyTypeCandidate {
    pub policy_type: String,
    pub confidence: f64,
    pub score: f64,
    pub matched_keywords: Vec<String>,
}

pub struct PolicyTypeClassifier;

impl PolicyTypeClassifier {
    /// Categories by descending score, dropping those at or below 5% confidence.
    /// Equal scores keep table order.
    pub fn classify(text: &str) -> Vec<PolicyTypeCandidate> {
        let text_lower = lowercase(text);

        let mut scored: Vec<(PolicyCategory, f64, Vec<String>)> = PolicyCategory::ALL
            .into_iter()
            .map(|category| {
                let mut score = 0.0;
                let mut matched = Vec::new();
                for keyword in category.keywords() {
                    let count = count_occurrences(&text_lower, keyword);
                    if count > 0 {
                        score += count as f64 * CATEGORY_WEIGHT;
                        matched.push((*keyword).to_string());
                    }
                }
                (category, score, matched)
            })
            .collect();

        let total = match scored.iter().map(|(_, score, _)| score).sum::<f64>() {
            sum if sum == 0.0 => 1.0,
            sum => sum,
        };

        scored.sort_by(|left, right| right.1.total_cmp(&left.1));

        scored
            .into_iter()
            .filter_map(|(category, score, mut matched)| {
                let confidence = score / total * 100.0;
                if confidence <= MIN_CONFIDENCE {
                    return None;
                }
                matched.truncate(MAX_MATCHED_KEYWORDS);
                Some(PolicyTypeCandidate {
                    policy_type: category.label().to_string(),
                    confidence: round_to_tenth(confidence),
                    score,
                    matched_keywords: matched,
                })
            })
            .collect()
    }

    /// Label of the top candidate, or "Unknown".
    pub fn detected_type(candidates: &[PolicyTypeCandidate]) -> String {
        candidates
            .first()
            .map(|candidate| candidate.policy_type.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}
