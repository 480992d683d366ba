use chrono::{TimeZone, Utc};
use claimguard::analysis::fields::{
    extract_co_pay_percentage, extract_exclusions, extract_key_clauses, extract_sum_insured,
};
use claimguard::analysis::{
    ClauseTerm, FeatureExtractor, FieldExtractor, PolicyAnalyzer, PolicyDocument,
    PolicyTypeClassifier, RiskScorer, RiskScores, UserProfile, CLAUSE_NOT_MENTIONED,
};
use claimguard::claims::ClaimSimulator;

const SAMPLES: &[&str] = &[
    "",
    "Comprehensive health insurance policy. Sum insured of Rs. 10 lakh. Co-pay of 40%. \
     Deductible of Rs. 1,00,000. Claims are not covered for cosmetic surgery. \
     Exclusions apply. Excluded: dental. Not covered: obesity. General exclusion: war. \
     Waiting period of 4 years for pre-existing diseases. Documentation and investigation \
     may delay settlement. Rejected claims may be appealed.",
    "Travel cover for overseas trips. Baggage delay benefit of Rs. 5,000. \
     Trip cancellation is included.",
    "Term life plan with sum assured of 1 crore. Nominee receives the death benefit.",
    "exclusion exclusion exclusion exclusion exclusion exclusion exclusion exclusion exclusion",
];

fn profiles() -> Vec<UserProfile> {
    vec![
        UserProfile::new(25, None, "Health Insurance").expect("profile"),
        UserProfile::new(70, Some("heart disease".to_string()), "Life").expect("profile"),
        UserProfile::new(45, Some("None".to_string()), "car insurance").expect("profile"),
        UserProfile::new(120, Some("asthma".to_string()), "Pet Insurance").expect("profile"),
    ]
}

fn tenth(value: f64) -> f64 {
    format!("{value:.1}").parse().expect("formatted float")
}

#[test]
fn sub_scores_stay_in_bounds_for_every_sample() {
    for text in SAMPLES {
        let features = FeatureExtractor::extract(text);
        for profile in profiles() {
            let scores = RiskScorer::score(&features, &profile);
            assert!(scores.coverage_risk() <= 100, "{text}");
            assert!(scores.cost_risk() <= 100, "{text}");
            assert!(scores.delay_risk() <= 100, "{text}");
            assert_eq!(
                scores,
                RiskScores::from_components(
                    scores.coverage_risk(),
                    scores.cost_risk(),
                    scores.delay_risk()
                )
            );
        }
    }
}

#[test]
fn overall_risk_is_the_rounded_weighted_sum() {
    for coverage in (0..=100).step_by(7) {
        for cost in (0..=100).step_by(9) {
            for delay in (0..=100).step_by(11) {
                let scores = RiskScores::from_components(coverage, cost, delay);
                let expected = tenth(
                    f64::from(coverage) * 0.4 + f64::from(cost) * 0.35 + f64::from(delay) * 0.25,
                );
                assert_eq!(scores.overall_risk(), expected, "{coverage}/{cost}/{delay}");
            }
        }
    }
}

#[test]
fn co_pay_defaults_and_explicit_values() {
    assert_eq!(
        extract_co_pay_percentage("A co-pay applies on every claim."),
        10
    );
    assert_eq!(extract_co_pay_percentage("There is a co-pay of 20% here."), 20);
    assert_eq!(extract_co_pay_percentage("No sharing at all."), 0);
}

#[test]
fn lakh_amounts_are_scaled() {
    assert_eq!(extract_sum_insured("sum insured of Rs. 5 lakh"), "500000.0");
}

#[test]
fn absent_clauses_use_the_sentinel_for_every_term() {
    let clauses = extract_key_clauses("Nothing relevant is written in this document.");
    assert_eq!(clauses.len(), ClauseTerm::ALL.len());
    for (clause, term) in clauses.iter().zip(ClauseTerm::ALL) {
        assert_eq!(clause.term, term);
        assert_eq!(clause.text, CLAUSE_NOT_MENTIONED);
    }
}

#[test]
fn claim_simulation_reference_case() {
    let result = ClaimSimulator::simulate(500_000.0, 10, 50_000).expect("simulation");
    assert_eq!(result.deductible_applied, 50_000.0);
    assert_eq!(result.copay_applied, 45_000.0);
    assert_eq!(result.insurer_pays, 405_000.0);
    assert_eq!(result.out_of_pocket, 95_000.0);
    assert_eq!(result.coverage_percentage, 81.0);
    assert!(ClaimSimulator::simulate(0.0, 10, 50_000).is_err());
}

#[test]
fn car_only_text_is_fully_car_insurance() {
    let candidates =
        PolicyTypeClassifier::classify("Vehicle collision repair at the garage after a road accident");
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].policy_type, "Car Insurance");
    assert_eq!(candidates[0].confidence, 100.0);
}

#[test]
fn extraction_is_idempotent() {
    for text in SAMPLES {
        assert_eq!(FeatureExtractor::extract(text), FeatureExtractor::extract(text));
        assert_eq!(FieldExtractor::extract(text), FieldExtractor::extract(text));
    }
}

#[test]
fn exclusions_are_capped_and_unique() {
    let mut text = String::new();
    for index in 0..20 {
        text.push_str(&format!("Item {index} is not covered under any circumstance. "));
        text.push_str("Item zero is not covered under any circumstance. ");
    }
    for sample in SAMPLES.iter().copied().chain([text.as_str()]) {
        let exclusions = extract_exclusions(sample);
        assert!(exclusions.len() <= 8);
        let mut unique = exclusions.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), exclusions.len());
    }
}

#[test]
fn full_pipeline_flags_a_risky_policy() {
    let at = Utc
        .with_ymd_and_hms(2025, 2, 1, 0, 0, 0)
        .single()
        .expect("timestamp");
    let profile = UserProfile::new(70, Some("heart disease".to_string()), "Health Insurance")
        .expect("profile");
    let policy = PolicyAnalyzer::analyze(&PolicyDocument::new(SAMPLES[1], 12, "risky.pdf"), &profile, at)
        .expect("policy");

    assert_eq!(policy.detected_type, "Health Insurance");
    assert_eq!(policy.financial.co_pay_percentage, 40);
    assert_eq!(policy.financial.deductible, 100_000);
    assert_eq!(policy.waiting_period, "4 years");

    let factors: Vec<&str> = policy
        .risk_factors
        .iter()
        .map(|factor| factor.factor.as_str())
        .collect();
    assert_eq!(
        factors,
        vec![
            "Age",
            "Pre-existing condition",
            "Moderate exclusions",
            "Long waiting period",
            "Very high co-pay",
            "High deductible"
        ]
    );
    assert!(policy.risk_scores.overall_risk() > 50.0);
}
