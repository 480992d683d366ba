//! Text sections consumed by report renderers.

use serde::Serialize;

use super::Policy;
use crate::analysis::normalizer::{capitalize, group_thousands};
use crate::claims::ClaimSimulator;

pub const REPORT_TITLE: &str = "ClaimGuard Insurance Report";

const REPORT_CLAIM_AMOUNT: f64 = 500_000.0;
const CLAUSE_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSection {
    pub heading: String,
    pub lines: Vec<String>,
}

impl ReportSection {
    fn new(heading: &str, lines: Vec<String>) -> Self {
        Self {
            heading: heading.to_string(),
            lines: lines.iter().map(|line| latin1_clean(line)).collect(),
        }
    }
}

/// Renderer-neutral report for one analyzed policy. Every line is already
/// restricted to Latin-1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyReport {
    pub title: String,
    pub sections: Vec<ReportSection>,
}

impl PolicyReport {
    pub fn from_policy(policy: &Policy) -> Self {
        let mut sections = vec![
            information_section(policy),
            risk_section(policy),
            terms_section(policy),
        ];
        sections.extend(simulation_section(policy));
        sections.push(clause_section(policy));

        if !policy.risk_factors.is_empty() {
            let lines = policy
                .risk_factors
                .iter()
                .flat_map(|factor| {
                    [
                        format!(
                            "{} [{}, {}]: {}",
                            factor.factor,
                            factor.impact.label(),
                            factor.score,
                            factor.description
                        ),
                        format!("  Recommendation: {}", factor.recommendation),
                    ]
                })
                .collect();
            sections.push(ReportSection::new("Risk Factors", lines));
        }

        if !policy.exclusions.is_empty() {
            let lines = policy
                .exclusions
                .iter()
                .map(|exclusion| format!("• {exclusion}"))
                .collect();
            sections.push(ReportSection::new("Exclusions", lines));
        }

        if !policy.benefits.is_empty() {
            let lines = policy
                .benefits
                .iter()
                .map(|benefit| format!("• {} ({})", benefit.text, benefit.category.label()))
                .collect();
            sections.push(ReportSection::new("Benefits", lines));
        }

        Self {
            title: REPORT_TITLE.to_string(),
            sections,
        }
    }

    /// Plain-text rendering: title, then each heading followed by its lines.
    pub fn render_text(&self) -> String {
        let mut output = format!("{}\n", self.title);
        for section in &self.sections {
            output.push('\n');
            output.push_str(&section.heading);
            output.push('\n');
            for line in &section.lines {
                output.push_str(line);
                output.push('\n');
            }
        }
        output
    }
}

fn information_section(policy: &Policy) -> ReportSection {
    ReportSection::new(
        "Policy Information",
        vec![
            format!("File: {}", policy.filename),
            format!("Policy ID: {}", policy.id),
            format!(
                "Upload Date: {}",
                policy.analyzed_at.format("%Y-%m-%d %H:%M:%S")
            ),
            format!("Policy Type: {}", policy.declared_type),
            format!("Detected Type: {}", policy.detected_type),
            format!("Policy Number: {}", policy.policy_number),
            format!("Sum Insured: {}", policy.sum_insured),
            format!("Premium: {}", policy.premium),
        ],
    )
}

fn risk_section(policy: &Policy) -> ReportSection {
    let scores = &policy.risk_scores;
    ReportSection::new(
        "Risk Assessment",
        vec![
            format!("Claim Coverage Risk: {}%", scores.coverage_risk()),
            format!("Out-of-Pocket Risk: {}%", scores.cost_risk()),
            format!("Claim Delay Risk: {}%", scores.delay_risk()),
            format!("Overall Risk: {:.1}%", scores.overall_risk()),
        ],
    )
}

fn terms_section(policy: &Policy) -> ReportSection {
    let financial = &policy.financial;
    let mut lines = Vec::new();
    if financial.co_pay_percentage > 0 {
        lines.push(format!("- Co-pay: {}%", financial.co_pay_percentage));
    }
    if financial.deductible > 0 {
        lines.push(format!(
            "- Deductible: ₹{}",
            group_thousands(financial.deductible)
        ));
    }
    if let Some(cap) = &financial.room_rent_cap {
        lines.push(format!("- Room rent cap: {cap}"));
    }
    for (category, limit) in &financial.sub_limits {
        lines.push(format!(
            "- {} sub-limit: ₹{}",
            capitalize(category),
            group_thousands(*limit)
        ));
    }
    lines.push(format!("- Waiting period: {}", policy.waiting_period));
    lines.push(format!("- Exclusions Found: {}", policy.exclusions.len()));
    ReportSection::new("Detected Policy Terms", lines)
}

fn simulation_section(policy: &Policy) -> Option<ReportSection> {
    let simulation = ClaimSimulator::simulate_for(&policy.financial, REPORT_CLAIM_AMOUNT).ok()?;
    Some(ReportSection::new(
        "Claim Simulation Results",
        vec![
            format!("Claim Amount: ₹{}", whole_rupees(simulation.claim_amount)),
            format!("Insurance Pays: ₹{}", whole_rupees(simulation.insurer_pays)),
            format!("You Pay: ₹{}", whole_rupees(simulation.out_of_pocket)),
            format!("Coverage: {:.1}%", simulation.coverage_percentage),
        ],
    ))
}

fn clause_section(policy: &Policy) -> ReportSection {
    let lines = policy
        .clauses
        .iter()
        .filter(|clause| clause.is_mentioned())
        .map(|clause| {
            format!(
                "{}: {}",
                capitalize(clause.term.label()),
                preview(&clause.text)
            )
        })
        .collect();
    ReportSection::new("Key Policy Clauses", lines)
}

fn preview(text: &str) -> String {
    if text.chars().count() > CLAUSE_PREVIEW_CHARS {
        let head: String = text.chars().take(CLAUSE_PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn whole_rupees(amount: f64) -> String {
    group_thousands(amount.max(0.0) as u64)
}

/// Substitutes common typographic characters and drops anything else outside
/// Latin-1.
pub fn latin1_clean(text: &str) -> String {
    let mut cleaned = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '₹' => cleaned.push_str("Rs. "),
            '–' | '—' => cleaned.push('-'),
            '•' => cleaned.push('*'),
            '…' => cleaned.push_str("..."),
            c if u32::from(c) <= 0xFF => cleaned.push(c),
            _ => {}
        }
    }
    cleaned
}
