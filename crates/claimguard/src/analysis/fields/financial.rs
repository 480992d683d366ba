use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::patterns::{first_group, strip_separators, PatternList, ScaledAmount};
use crate::analysis::features::compile;

/// Co-pay assumed when the document mentions one without a percentage.
pub const DEFAULT_CO_PAY_PERCENTAGE: u32 = 10;

const CURRENCY_AMOUNT: &str = r"(?:rs\.?\s*|₹\s*)([\d,]+)";

/// Sub-limit categories in reporting order.
const SUB_LIMIT_CATEGORIES: &[&str] = &["icu", "surgery", "doctor", "medicine", "diagnostic"];

/// Out-of-pocket terms lifted from the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialDetails {
    pub co_pay_percentage: u32,
    pub deductible: u64,
    pub room_rent_cap: Option<String>,
    pub sub_limits: BTreeMap<String, u64>,
}

struct FinancialPatterns {
    co_pay: PatternList,
    deductible: PatternList,
    room_rent: PatternList,
    room_rent_percent: Regex,
    sub_limits: Vec<(&'static str, Regex)>,
}

fn patterns() -> &'static FinancialPatterns {
    static PATTERNS: OnceLock<FinancialPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| FinancialPatterns {
        co_pay: PatternList::new([
            r"co[-\s]?pay[:\s]*(?:of\s*)?(\d+)%",
            r"copayment[:\s]*(?:of\s*)?(\d+)%",
            r"co[-\s]?insurance[:\s]*(?:of\s*)?(\d+)%",
            r"payable by insured[:\s]*(\d+)%",
            r"(\d+)%\s*co[-\s]?pay",
            r"(\d+)%\s*copayment",
            r"(\d+)%\s*co-insurance",
        ]),
        deductible: PatternList::new([
            format!(r"deductible[:\s]*(?:of\s*)?{CURRENCY_AMOUNT}"),
            format!(r"excess[:\s]*(?:of\s*)?{CURRENCY_AMOUNT}"),
            format!(r"first pay[:\s]*(?:of\s*)?{CURRENCY_AMOUNT}"),
        ]),
        room_rent: PatternList::new([
            format!(r"room rent[:\s]*{CURRENCY_AMOUNT}"),
            format!(r"room charges[:\s]*{CURRENCY_AMOUNT}"),
            format!(r"accommodation[:\s]*{CURRENCY_AMOUNT}"),
        ]),
        room_rent_percent: compile(r"room rent[:\s]*(\d+)%"),
        sub_limits: SUB_LIMIT_CATEGORIES
            .iter()
            .map(|category| {
                (
                    *category,
                    compile(&format!(r"{category}[:\s]*{CURRENCY_AMOUNT}")),
                )
            })
            .collect(),
    })
}

pub(crate) fn co_pay_percentage(text_lower: &str) -> u32 {
    if let Some(percentage) = patterns()
        .co_pay
        .first_with(text_lower, |caps| caps.get(1)?.as_str().parse::<u32>().ok())
    {
        return percentage;
    }

    if ["co-pay", "copay", "co-payment"]
        .iter()
        .any(|term| text_lower.contains(term))
    {
        return DEFAULT_CO_PAY_PERCENTAGE;
    }

    0
}

pub(crate) fn deductible(text_lower: &str) -> u64 {
    patterns()
        .deductible
        .first_with(text_lower, |caps| whole_amount(text_lower, caps))
        .unwrap_or(0)
}

pub(crate) fn room_rent_cap(text_lower: &str) -> Option<String> {
    let patterns = patterns();
    if let Some(cap) = patterns.room_rent.first_with(text_lower, |caps| {
        let digits = strip_separators(first_group(caps)?.as_str());
        (!digits.is_empty()).then_some(digits)
    }) {
        return Some(cap);
    }

    patterns
        .room_rent_percent
        .captures(text_lower)
        .and_then(|caps| caps.get(1))
        .map(|percent| format!("{}%", percent.as_str()))
}

pub(crate) fn sub_limits(text_lower: &str) -> BTreeMap<String, u64> {
    patterns()
        .sub_limits
        .iter()
        .filter_map(|(category, pattern)| {
            let caps = pattern.captures(text_lower)?;
            let amount = whole_amount(text_lower, &caps)?;
            Some((category.to_string(), amount))
        })
        .collect()
}

pub(crate) fn financial_details(text_lower: &str) -> FinancialDetails {
    FinancialDetails {
        co_pay_percentage: co_pay_percentage(text_lower),
        deductible: deductible(text_lower),
        room_rent_cap: room_rent_cap(text_lower),
        sub_limits: sub_limits(text_lower),
    }
}

fn whole_amount(text_lower: &str, caps: &regex::Captures<'_>) -> Option<u64> {
    ScaledAmount::from_match(text_lower, first_group(caps)?)?.whole_units()
}
