use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::patterns::{PatternList, ScaledAmount};

pub(crate) const NOT_SPECIFIED: &str = "Not specified";
pub(crate) const POLICY_NUMBER_NOT_FOUND: &str = "Not found";

struct AmountPatterns {
    sum_insured: PatternList,
    premium: PatternList,
    policy_number: PatternList,
    issue_date: PatternList,
    expiry_date: PatternList,
}

fn patterns() -> &'static AmountPatterns {
    static PATTERNS: OnceLock<AmountPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| AmountPatterns {
        sum_insured: PatternList::new([
            r"(?i)(?:sum\s*insured|cover|coverage|sum\s*assured)[:\s]*(?:of\s*)?(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)\s*(?:lakh|lac|crore|million|thousand)?",
            r"(?i)(?:policy\s*amount|cover\s*amount|benefit\s*amount)[:\s]*(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)(?:liability|maximum\s*benefit)[:\s]*(?:of)?\s*(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)up\s*to\s*(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)cover\s*of\s*(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)",
        ]),
        premium: PatternList::new([
            r"(?i)(?:premium|annual\s*premium|yearly\s*premium)[:\s]*(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)(?:policy\s*fee|installment|payment)[:\s]*(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)",
            r"(?i)(?:pay|payable|charged)[:\s]*(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)\s*(?:per\s*annum|annually|yearly)",
            r"(?i)premium\s*amount[:\s]*(?:rs\.?|₹)?\s*([\d,]+(?:\.\d{1,2})?)",
        ]),
        policy_number: PatternList::new([r"(?i)policy\s*(?:number|no)\.?[:\s]*([A-Z0-9/-]+)"]),
        issue_date: PatternList::new([
            r"(?i)(?:policy\s*issued?|date\s*of\s*issue|issued?\s*on)[:\s]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
            r"(?i)(?:commencement|commencing|start)[:\s]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
        ]),
        expiry_date: PatternList::new([
            r"(?i)(?:expir|valid|validity|expiry)[:\s]*(?:date)?[:\s]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
            r"(?i)(?:valid\s*until|expires?\s*on)[:\s]*(\d{1,2}[-/]\d{1,2}[-/]\d{2,4})",
        ]),
    })
}

/// Issue and expiry dates as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
}

impl KeyDates {
    pub fn is_empty(&self) -> bool {
        self.issue_date.is_none() && self.expiry_date.is_none()
    }
}

pub(crate) fn sum_insured(text_lower: &str) -> String {
    scaled_amount(&patterns().sum_insured, text_lower)
}

pub(crate) fn premium(text_lower: &str) -> String {
    scaled_amount(&patterns().premium, text_lower)
}

fn scaled_amount(list: &PatternList, text_lower: &str) -> String {
    list.first_with(text_lower, |caps| {
        caps.get(1)
            .and_then(|group| ScaledAmount::from_match(text_lower, group))
    })
    .map(|amount| amount.display())
    .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// Matched against the original text so identifiers keep their case.
pub(crate) fn policy_number(text: &str) -> String {
    patterns()
        .policy_number
        .first_match(text)
        .and_then(|caps| caps.get(1))
        .map(|value| value.as_str().to_string())
        .unwrap_or_else(|| POLICY_NUMBER_NOT_FOUND.to_string())
}

pub(crate) fn key_dates(text_lower: &str) -> KeyDates {
    let date_from = |list: &PatternList| {
        list.first_match(text_lower)
            .and_then(|caps| caps.get(1))
            .map(|value| value.as_str().to_string())
    };

    KeyDates {
        issue_date: date_from(&patterns().issue_date),
        expiry_date: date_from(&patterns().expiry_date),
    }
}
