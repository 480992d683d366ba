//! Per-field extractors over raw policy text.
//!
//! Each field owns an ordered list of candidate patterns; the first that
//! matches wins and a miss resolves to the field's documented default.

mod amounts;
mod financial;
mod narrative;
mod patterns;

use serde::{Deserialize, Serialize};

pub use amounts::KeyDates;
pub use financial::{FinancialDetails, DEFAULT_CO_PAY_PERCENTAGE};
pub use narrative::{Benefit, BenefitCategory, ClauseTerm, KeyClause, CLAUSE_NOT_MENTIONED};

use super::normalizer::lowercase;

/// Every field lifted from one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub policy_number: String,
    pub sum_insured: String,
    pub premium: String,
    pub key_dates: KeyDates,
    pub financial: FinancialDetails,
    pub benefits: Vec<Benefit>,
    pub exclusions: Vec<String>,
    pub clauses: Vec<KeyClause>,
    pub waiting_period: String,
}

pub struct FieldExtractor;

impl FieldExtractor {
    pub fn extract(text: &str) -> ExtractedFields {
        let text_lower = lowercase(text);

        ExtractedFields {
            policy_number: amounts::policy_number(text),
            sum_insured: amounts::sum_insured(&text_lower),
            premium: amounts::premium(&text_lower),
            key_dates: amounts::key_dates(&text_lower),
            financial: financial::financial_details(&text_lower),
            benefits: narrative::benefits(&text_lower),
            exclusions: narrative::exclusions(&text_lower),
            clauses: narrative::key_clauses(text),
            waiting_period: narrative::waiting_period(&text_lower),
        }
    }
}

pub fn extract_sum_insured(text: &str) -> String {
    amounts::sum_insured(&lowercase(text))
}

pub fn extract_co_pay_percentage(text: &str) -> u32 {
    financial::co_pay_percentage(&lowercase(text))
}

pub fn extract_exclusions(text: &str) -> Vec<String> {
    narrative::exclusions(&lowercase(text))
}

pub fn extract_key_clauses(text: &str) -> Vec<KeyClause> {
    narrative::key_clauses(text)
}

#[cfg(test)]
mod tests {
    use super::amounts::NOT_SPECIFIED;
    use super::*;

    const SAMPLE: &str = "Policy Number: HG/2024/0091. Sum Insured of Rs. 5 lakh. \
        Annual premium: Rs. 12,450. Date of issue: 01/04/2024. Valid until 31/03/2025. \
        A co-pay of 20% applies. Deductible of Rs. 25,000 per claim. \
        Room rent: Rs. 4,000 per day. ICU: Rs. 8000 per day. \
        A waiting period of 2 years applies to listed illnesses. \
        Cosmetic treatment is not covered under this policy.";

    #[test]
    fn extracts_every_field_from_a_typical_schedule() {
        let fields = FieldExtractor::extract(SAMPLE);
        assert_eq!(fields.policy_number, "HG/2024/0091");
        assert_eq!(fields.sum_insured, "500000.0");
        assert_eq!(fields.premium, "12450");
        assert_eq!(fields.key_dates.issue_date.as_deref(), Some("01/04/2024"));
        assert_eq!(fields.key_dates.expiry_date.as_deref(), Some("31/03/2025"));
        assert_eq!(fields.financial.co_pay_percentage, 20);
        assert_eq!(fields.financial.deductible, 25_000);
        assert_eq!(fields.financial.room_rent_cap.as_deref(), Some("4000"));
        assert_eq!(fields.financial.sub_limits.get("icu"), Some(&8_000));
        assert_eq!(fields.waiting_period, "2 years");
        assert_eq!(fields.clauses.len(), 8);
        assert!(fields
            .exclusions
            .iter()
            .any(|exclusion| exclusion.starts_with("Not covered")));
    }

    #[test]
    fn wrappers_lowercase_their_input() {
        assert_eq!(extract_sum_insured("sum insured of Rs. 5 lakh"), "500000.0");
        assert_eq!(extract_co_pay_percentage("A CO-PAY of 20% applies"), 20);
        assert_eq!(extract_co_pay_percentage("subject to co-pay"), 10);
        assert_eq!(
            extract_exclusions("Dental Work Is NOT COVERED at all."),
            vec!["Not covered at all.".to_string()]
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        assert_eq!(FieldExtractor::extract(SAMPLE), FieldExtractor::extract(SAMPLE));
    }

    #[test]
    fn empty_text_yields_defaults() {
        let fields = FieldExtractor::extract("");
        assert_eq!(fields.sum_insured, NOT_SPECIFIED);
        assert_eq!(fields.premium, NOT_SPECIFIED);
        assert_eq!(fields.policy_number, "Not found");
        assert!(fields.key_dates.is_empty());
        assert_eq!(fields.financial, FinancialDetails::default());
        assert!(fields.benefits.is_empty());
        assert!(fields.exclusions.is_empty());
        assert!(fields.clauses.iter().all(|clause| !clause.is_mentioned()));
        assert_eq!(fields.waiting_period, "Not specified");
    }
}
