//! Document understanding and risk scoring for insurance policy text.
//!
//! Every stage is a pure function of the document text and the policyholder
//! profile. Pattern tables are compiled once per process and shared.

pub mod classifier;
pub mod domain;
pub mod factors;
pub mod features;
pub mod fields;
pub(crate) mod normalizer;
pub mod quality;
pub mod scoring;

use chrono::{DateTime, Utc};

pub use classifier::{PolicyTypeCandidate, PolicyTypeClassifier};
pub use domain::{PolicyCategory, PolicyDocument, UserProfile};
pub use factors::{ImpactTier, RiskFactor, RiskFactorAnalyzer};
pub use features::{ExtractedFeatures, FeatureExtractor, FeatureKey};
pub use fields::{
    Benefit, BenefitCategory, ClauseTerm, ExtractedFields, FieldExtractor, FinancialDetails,
    KeyClause, KeyDates, CLAUSE_NOT_MENTIONED,
};
pub use quality::{CoverageSummary, QualityMetrics};
pub use scoring::{RiskScorer, RiskScores};

use crate::policies::{Policy, PolicyId};

/// Failures surfaced to callers of the analysis pipeline. Extraction misses
/// are never errors; they resolve to per-field defaults.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("document text is empty or unreadable")]
    UnusableDocument,
}

/// Runs the full pipeline over one document.
pub struct PolicyAnalyzer;

impl PolicyAnalyzer {
    pub fn analyze(
        document: &PolicyDocument,
        profile: &UserProfile,
        analyzed_at: DateTime<Utc>,
    ) -> Result<Policy, AnalysisError> {
        if !document.is_usable() {
            return Err(AnalysisError::UnusableDocument);
        }

        let text = document.text();
        let features = FeatureExtractor::extract(text);
        let fields = FieldExtractor::extract(text);
        let type_candidates = PolicyTypeClassifier::classify(text);

        let risk_scores = RiskScorer::score(&features, profile);
        let risk_factors = RiskFactorAnalyzer::analyze(text, profile, &fields);
        let coverage = CoverageSummary::summarize(text, &fields);
        let quality = QualityMetrics::measure(text);

        let ExtractedFields {
            policy_number,
            sum_insured,
            premium,
            key_dates,
            financial,
            benefits,
            exclusions,
            clauses,
            waiting_period,
        } = fields;

        Ok(Policy {
            id: PolicyId::derive(text, analyzed_at),
            filename: document.filename().to_string(),
            analyzed_at,
            declared_type: profile.declared_type.clone(),
            detected_type: PolicyTypeClassifier::detected_type(&type_candidates),
            type_candidates,
            policy_number,
            sum_insured,
            premium,
            key_dates,
            benefits,
            exclusions,
            clauses,
            waiting_period,
            risk_factors,
            coverage,
            quality,
            risk_scores,
            financial,
            text_length: document.text_length(),
            page_count: document.page_count(),
        })
    }
}
