//! Weighted keyword and numeric-signal counting over raw policy text.
//!
//! Keyword groups are matched as plain substrings of the lowercased text with
//! no word-boundary requirement. The risk scorer's constants were tuned against
//! this looseness, so tightening it would require re-deriving them.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::normalizer::{char_len, count_occurrences, lowercase};

/// Keyword groups and their synonyms, in reporting order.
const KEYWORD_GROUPS: &[(FeatureKey, &[&str])] = &[
    (
        FeatureKey::WaitingPeriod,
        &["waiting period", "waiting time", "cooling period"],
    ),
    (
        FeatureKey::Exclusion,
        &["exclusion", "not covered", "excluded", "not payable"],
    ),
    (
        FeatureKey::CoPay,
        &["co-pay", "copay", "coinsurance", "payable by insured"],
    ),
    (
        FeatureKey::SubLimit,
        &["sub-limit", "sublimit", "cap of", "maximum limit"],
    ),
    (
        FeatureKey::RoomRent,
        &["room rent", "room charges", "accommodation"],
    ),
    (
        FeatureKey::PreExisting,
        &["pre-existing", "preexisting", "existing condition"],
    ),
    (
        FeatureKey::ClaimDays,
        &["within 24 hours", "within 48 hours", "immediately"],
    ),
    (
        FeatureKey::Deductible,
        &["deductible", "excess amount", "first pay"],
    ),
    (
        FeatureKey::Disease,
        &["cancer", "diabetes", "heart", "kidney", "liver", "hiv"],
    ),
    (
        FeatureKey::Surgery,
        &["surgery", "operation", "procedure", "treatment"],
    ),
    (
        FeatureKey::Hospital,
        &["hospital", "medical", "healthcare", "clinic"],
    ),
    (FeatureKey::Percentage, &["%", "percent", "percentage"]),
    (
        FeatureKey::Money,
        &["rupees", "rs", "inr", "lakh", "thousand"],
    ),
    (
        FeatureKey::Time,
        &["day", "days", "month", "months", "year", "years"],
    ),
    (FeatureKey::Limit, &["limit", "capped", "maximum", "upto"]),
];

/// The fifteen keyword groups counted per document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    WaitingPeriod,
    Exclusion,
    CoPay,
    SubLimit,
    RoomRent,
    PreExisting,
    ClaimDays,
    Deductible,
    Disease,
    Surgery,
    Hospital,
    Percentage,
    Money,
    Time,
    Limit,
}

/// Numeric signals derived once per document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFeatures {
    pub counts: BTreeMap<FeatureKey, u32>,
    pub avg_percentage: f64,
    pub avg_amount: f64,
    pub has_days: u32,
    pub has_months: u32,
    pub has_years: u32,
    pub length: f64,
}

impl ExtractedFeatures {
    pub fn count(&self, key: FeatureKey) -> u32 {
        self.counts.get(&key).copied().unwrap_or(0)
    }
}

struct NumericPatterns {
    percentage: Regex,
    amount: Regex,
    days: Regex,
    months: Regex,
    years: Regex,
}

fn numeric_patterns() -> &'static NumericPatterns {
    static PATTERNS: OnceLock<NumericPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| NumericPatterns {
        percentage: compile(r"(\d+)%"),
        amount: compile(r"rs\.?\s*(\d+)|₹\s*(\d+)"),
        days: compile(r"(\d+)\s*(day|days)"),
        months: compile(r"(\d+)\s*(month|months)"),
        years: compile(r"(\d+)\s*(year|years)"),
    })
}

pub(crate) fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("built-in pattern {pattern:?} failed to compile: {err}"),
    }
}

pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn extract(text: &str) -> ExtractedFeatures {
        let text_lower = lowercase(text);
        let patterns = numeric_patterns();

        let counts = KEYWORD_GROUPS
            .iter()
            .map(|(key, words)| {
                let count: usize = words
                    .iter()
                    .map(|word| count_occurrences(&text_lower, word))
                    .sum();
                (*key, saturating_u32(count))
            })
            .collect();

        let percentages: Vec<f64> = patterns
            .percentage
            .captures_iter(&text_lower)
            .filter_map(|caps| caps.get(1))
            .filter_map(|value| value.as_str().parse::<f64>().ok())
            .collect();

        let amounts: Vec<f64> = patterns
            .amount
            .captures_iter(&text_lower)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .filter_map(|value| value.as_str().parse::<f64>().ok())
            .collect();

        ExtractedFeatures {
            counts,
            avg_percentage: mean(&percentages),
            avg_amount: mean(&amounts),
            has_days: saturating_u32(patterns.days.find_iter(&text_lower).count()),
            has_months: saturating_u32(patterns.months.find_iter(&text_lower).count()),
            has_years: saturating_u32(patterns.years.find_iter(&text_lower).count()),
            length: (char_len(text) as f64 / 1000.0).min(10.0),
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_group_is_reported_even_when_absent() {
        let features = FeatureExtractor::extract("");
        assert_eq!(features.counts.len(), 15);
        assert!(features.counts.values().all(|count| *count == 0));
        assert_eq!(features.avg_percentage, 0.0);
        assert_eq!(features.avg_amount, 0.0);
        assert_eq!(features.length, 0.0);
    }

    #[test]
    fn synonyms_are_summed_case_insensitively() {
        let features = FeatureExtractor::extract("Exclusion list: items NOT COVERED and Excluded.");
        assert_eq!(features.count(FeatureKey::Exclusion), 3);
    }

    #[test]
    fn substring_matches_are_counted_without_word_boundaries() {
        let features = FeatureExtractor::extract("telecopayment");
        assert_eq!(features.count(FeatureKey::CoPay), 1);

        // "days" holds both "day" and "days"; "percentage" holds two synonyms.
        let features = FeatureExtractor::extract("30 days at a percentage");
        assert_eq!(features.count(FeatureKey::Time), 2);
        assert_eq!(features.count(FeatureKey::Percentage), 2);
    }

    #[test]
    fn numeric_signals_average_their_matches() {
        let features = FeatureExtractor::extract(
            "Co-pay 10% or 20%. Deductible Rs. 5000 and ₹ 15000. Wait 30 days, 2 months, 4 years.",
        );
        assert_eq!(features.avg_percentage, 15.0);
        assert_eq!(features.avg_amount, 10000.0);
        assert_eq!(features.has_days, 1);
        assert_eq!(features.has_months, 1);
        assert_eq!(features.has_years, 1);
    }

    #[test]
    fn length_is_thousands_of_characters_capped_at_ten() {
        let features = FeatureExtractor::extract(&"a".repeat(2500));
        assert_eq!(features.length, 2.5);

        let features = FeatureExtractor::extract(&"a".repeat(25_000));
        assert_eq!(features.length, 10.0);
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = "Waiting period of 2 years. Room rent Rs. 3000 per day.";
        assert_eq!(FeatureExtractor::extract(text), FeatureExtractor::extract(text));
    }

    #[test]
    fn counts_serialize_under_snake_case_keys() {
        let features = FeatureExtractor::extract("Co-pay and room rent apply.");
        let json = serde_json::to_value(&features).expect("serialize");
        assert_eq!(json["counts"].as_object().map(|counts| counts.len()), Some(15));
        assert_eq!(json["counts"]["co_pay"], 1);
        assert_eq!(json["counts"]["room_rent"], 1);
        assert_eq!(json["counts"]["waiting_period"], 0);
    }
}
