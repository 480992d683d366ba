use super::super::domain::{PolicyCategory, UserProfile};
use super::super::features::{ExtractedFeatures, FeatureKey};

const COVERAGE_BASE: i64 = 20;
const COST_BASE: i64 = 15;
const DELAY_BASE: i64 = 10;

pub(crate) fn coverage_risk(features: &ExtractedFeatures, profile: &UserProfile) -> i64 {
    let mut risk = COVERAGE_BASE;

    risk += count(features, FeatureKey::WaitingPeriod) * 8;
    risk += count(features, FeatureKey::Exclusion) * 10;
    risk += count(features, FeatureKey::PreExisting) * 12;
    risk += count(features, FeatureKey::Disease) * 5;
    risk += i64::from(features.has_years) * 5;

    risk += match profile.declared_category() {
        Some(PolicyCategory::Health) => 10,
        Some(PolicyCategory::Car) => -10,
        Some(PolicyCategory::Life) => -5,
        _ => 0,
    };

    risk += match profile.age {
        age if age > 60 => 15,
        age if age > 45 => 8,
        _ => 0,
    };

    if profile.has_declared_condition() {
        risk += 20;
    }

    risk
}

/// The only fractional sub-score: the average percentage term is weighted 1.5.
pub(crate) fn cost_risk(features: &ExtractedFeatures, profile: &UserProfile) -> f64 {
    let mut counted = COST_BASE;

    counted += count(features, FeatureKey::CoPay) * 12;
    counted += count(features, FeatureKey::SubLimit) * 10;
    counted += count(features, FeatureKey::RoomRent) * 8;
    counted += count(features, FeatureKey::Percentage) * 5;
    counted += count(features, FeatureKey::Money) * 3;
    counted += count(features, FeatureKey::Deductible) * 10;

    let mut risk = counted as f64 + features.avg_percentage * 1.5;

    if profile.has_declared_condition() {
        risk += 10.0;
    }

    risk
}

pub(crate) fn delay_risk(features: &ExtractedFeatures, profile: &UserProfile) -> i64 {
    let mut risk = DELAY_BASE;

    risk += count(features, FeatureKey::ClaimDays) * 15;
    risk += count(features, FeatureKey::Time) * 4;
    risk += i64::from(features.has_days) * 8;
    risk += i64::from(features.has_months) * 5;

    risk += match profile.age {
        age if age > 60 => 10,
        age if age > 45 => 5,
        _ => 0,
    };

    risk
}

fn count(features: &ExtractedFeatures, key: FeatureKey) -> i64 {
    i64::from(features.count(key))
}
