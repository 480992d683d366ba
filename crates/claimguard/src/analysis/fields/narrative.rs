use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::patterns::PatternList;
use crate::analysis::features::compile;
use crate::analysis::normalizer::{capitalize, char_len, collapse_whitespace, lowercase};

/// Clause value used when no sentence mentions the term. Report rendering
/// matches on this exact string.
pub const CLAUSE_NOT_MENTIONED: &str = "Not mentioned in document";

pub(crate) const WAITING_PERIOD_UNSPECIFIED: &str = "Mentioned (duration not specified)";
pub(crate) const WAITING_PERIOD_NOT_SPECIFIED: &str = "Not specified";

const MAX_BENEFITS: usize = 8;
const BENEFITS_PER_CATEGORY: usize = 3;
const MAX_EXCLUSIONS: usize = 8;
const MIN_CANDIDATE_CHARS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenefitCategory {
    Coverage,
    Inclusion,
    Benefit,
}

impl BenefitCategory {
    pub const fn label(self) -> &'static str {
        match self {
            BenefitCategory::Coverage => "coverage",
            BenefitCategory::Inclusion => "inclusion",
            BenefitCategory::Benefit => "benefit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benefit {
    pub text: String,
    pub category: BenefitCategory,
}

/// The eight clause terms, in extraction order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClauseTerm {
    #[serde(rename = "waiting period")]
    WaitingPeriod,
    #[serde(rename = "exclusion")]
    Exclusion,
    #[serde(rename = "co-pay")]
    CoPay,
    #[serde(rename = "sub-limit")]
    SubLimit,
    #[serde(rename = "room rent")]
    RoomRent,
    #[serde(rename = "pre-existing")]
    PreExisting,
    #[serde(rename = "claim")]
    Claim,
    #[serde(rename = "deductible")]
    Deductible,
}

impl ClauseTerm {
    pub const ALL: [ClauseTerm; 8] = [
        ClauseTerm::WaitingPeriod,
        ClauseTerm::Exclusion,
        ClauseTerm::CoPay,
        ClauseTerm::SubLimit,
        ClauseTerm::RoomRent,
        ClauseTerm::PreExisting,
        ClauseTerm::Claim,
        ClauseTerm::Deductible,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ClauseTerm::WaitingPeriod => "waiting period",
            ClauseTerm::Exclusion => "exclusion",
            ClauseTerm::CoPay => "co-pay",
            ClauseTerm::SubLimit => "sub-limit",
            ClauseTerm::RoomRent => "room rent",
            ClauseTerm::PreExisting => "pre-existing",
            ClauseTerm::Claim => "claim",
            ClauseTerm::Deductible => "deductible",
        }
    }

    const fn pattern(self) -> &'static str {
        match self {
            ClauseTerm::WaitingPeriod => {
                r"waiting[-\s]?period|waiting\s+time|pre[-\s]?existing\s+waiting"
            }
            ClauseTerm::Exclusion => r"exclusion|not\s+cover|will\s+not\s+cover|excluded|not\s+payable",
            ClauseTerm::CoPay => r"co[-\s]?pay|copayment|co-payment|coinsurance",
            ClauseTerm::SubLimit => r"sub[-\s]?limit|sublimit|limit\s+of\s+coverage|cap\s+of",
            ClauseTerm::RoomRent => r"room\s+rent|room\s+charges|accommodation\s+benefit",
            ClauseTerm::PreExisting => r"pre[-\s]?existing|preexisting|known\s+condition",
            ClauseTerm::Claim => r"claim\s+process|claim\s+filing|intimation|claim\s+settlement",
            ClauseTerm::Deductible => r"deductible|excess|first\s+pay",
        }
    }
}

/// First sentence mentioning a clause term, or [`CLAUSE_NOT_MENTIONED`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyClause {
    pub term: ClauseTerm,
    pub text: String,
}

impl KeyClause {
    pub fn is_mentioned(&self) -> bool {
        self.text != CLAUSE_NOT_MENTIONED
    }
}

struct NarrativePatterns {
    benefits: Vec<(BenefitCategory, Regex)>,
    exclusions: Vec<Regex>,
    clauses: Vec<(ClauseTerm, Regex)>,
    waiting_period: PatternList,
}

fn patterns() -> &'static NarrativePatterns {
    static PATTERNS: OnceLock<NarrativePatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        const UNIT: &str = "days|day|months|month|years|year";
        NarrativePatterns {
            benefits: vec![
                (
                    BenefitCategory::Coverage,
                    compile(r"(?:covers?|coverage\s*for|benefit\s*of)\s+([^.]{10,50})\."),
                ),
                (
                    BenefitCategory::Inclusion,
                    compile(r"(?:includes?|inclusions?)[:\s]+([^.]{10,50})\."),
                ),
                (
                    BenefitCategory::Benefit,
                    compile(r"(?:provides?|offer|offering)[:\s]+([^.]{10,50})\."),
                ),
            ],
            exclusions: [
                r"(?:not\s+cover(?:ed)?|exclusion|excluded)[^.]*\.",
                r"(?:will\s+not\s+pay|not\s+liable)[^.]*\.",
                r"(?:does\s+not\s+apply|not\s+included)[^.]*\.",
                r"(?:limitations?|restrictions?)[^.]*\.",
                r"(?:waiting\s+period)[^.]*\.",
                r"(?:pre-existing\s+condition)[^.]*\.",
            ]
            .into_iter()
            .map(compile)
            .collect(),
            clauses: ClauseTerm::ALL
                .into_iter()
                .map(|term| (term, compile(term.pattern())))
                .collect(),
            waiting_period: PatternList::new([
                format!(r"waiting\s*period\s*(?:of)?\s*(\d+)\s*({UNIT})"),
                format!(r"(\d+)\s*({UNIT})\s+waiting\s*period"),
                format!(r"initial\s+waiting\s+period\s*(?:of)?\s*(\d+)\s*({UNIT})?"),
                format!(r"waiting\s+period\s+applicable\s*(?:for)?\s*(\d+)\s*({UNIT})"),
            ]),
        }
    })
}

/// Up to three benefits per category and eight overall, first seen first.
pub(crate) fn benefits(text_lower: &str) -> Vec<Benefit> {
    let mut found: Vec<Benefit> = Vec::new();

    for (category, pattern) in &patterns().benefits {
        let candidates = pattern
            .captures_iter(text_lower)
            .filter_map(|caps| caps.get(1))
            .take(BENEFITS_PER_CATEGORY);

        for candidate in candidates {
            let raw = candidate.as_str();
            if char_len(raw) <= MIN_CANDIDATE_CHARS {
                continue;
            }
            let text = capitalize(raw.trim());
            if found.iter().any(|benefit| benefit.text == text) {
                continue;
            }
            found.push(Benefit {
                text,
                category: *category,
            });
        }
    }

    found.truncate(MAX_BENEFITS);
    found
}

/// Exclusion-like sentences, deduplicated in first-seen order and capped at eight.
pub(crate) fn exclusions(text_lower: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    for pattern in &patterns().exclusions {
        for candidate in pattern.find_iter(text_lower) {
            let cleaned = collapse_whitespace(candidate.as_str().trim());
            if char_len(&cleaned) <= MIN_CANDIDATE_CHARS {
                continue;
            }
            let cleaned = capitalize(&cleaned);
            if !found.contains(&cleaned) {
                found.push(cleaned);
            }
        }
    }

    found.truncate(MAX_EXCLUSIONS);
    found
}

/// One entry per clause term, in fixed order. Sentences come from the original
/// text so their casing is preserved.
pub(crate) fn key_clauses(text: &str) -> Vec<KeyClause> {
    let sentences: Vec<&str> = text.split('.').collect();

    patterns()
        .clauses
        .iter()
        .map(|(term, pattern)| {
            let text = sentences
                .iter()
                .find(|sentence| pattern.is_match(&lowercase(sentence)))
                .map(|sentence| format!("{}.", sentence.trim()))
                .unwrap_or_else(|| CLAUSE_NOT_MENTIONED.to_string());
            KeyClause { term: *term, text }
        })
        .collect()
}

/// Waiting period as "N unit"; a figure without a unit reads as months.
pub(crate) fn waiting_period(text_lower: &str) -> String {
    let found = patterns().waiting_period.first_with(text_lower, |caps| {
        let amount = caps.get(1)?.as_str();
        let unit = caps.get(2).map_or("months", |unit| unit.as_str());
        Some(format!("{amount} {unit}"))
    });

    match found {
        Some(period) => period,
        None if text_lower.contains("waiting period") => WAITING_PERIOD_UNSPECIFIED.to_string(),
        None => WAITING_PERIOD_NOT_SPECIFIED.to_string(),
    }
}
