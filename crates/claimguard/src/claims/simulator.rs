use serde::{Deserialize, Serialize};

use super::ClaimSimulationError;
use crate::analysis::normalizer::round_to_tenth;
use crate::analysis::FinancialDetails;

const MAX_CO_PAY: u32 = 100;

/// Split of a claim between the insurer and the policyholder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClaimSimulation {
    pub claim_amount: f64,
    pub insurer_pays: f64,
    pub out_of_pocket: f64,
    pub deductible_applied: f64,
    pub copay_applied: f64,
    pub coverage_percentage: f64,
}

pub struct ClaimSimulator;

impl ClaimSimulator {
    /// Applies the deductible first, then the co-pay to what remains.
    pub fn simulate(
        claim_amount: f64,
        co_pay_percentage: u32,
        deductible: u64,
    ) -> Result<ClaimSimulation, ClaimSimulationError> {
        if !claim_amount.is_finite() || claim_amount <= 0.0 {
            return Err(ClaimSimulationError::InvalidInput(format!(
                "claim amount must be a positive number, got {claim_amount}"
            )));
        }

        let mut remaining = claim_amount;

        let deductible_applied = (deductible as f64).min(remaining);
        remaining -= deductible_applied;

        let co_pay = co_pay_percentage.min(MAX_CO_PAY);
        let copay_applied = remaining * f64::from(co_pay) / 100.0;
        remaining -= copay_applied;

        let insurer_pays = remaining;
        let out_of_pocket = claim_amount - insurer_pays;

        Ok(ClaimSimulation {
            claim_amount,
            insurer_pays: insurer_pays.round_ties_even(),
            out_of_pocket: out_of_pocket.round_ties_even(),
            deductible_applied,
            copay_applied: copay_applied.round_ties_even(),
            coverage_percentage: round_to_tenth(insurer_pays / claim_amount * 100.0),
        })
    }

    pub fn simulate_for(
        financial: &FinancialDetails,
        claim_amount: f64,
    ) -> Result<ClaimSimulation, ClaimSimulationError> {
        Self::simulate(claim_amount, financial.co_pay_percentage, financial.deductible)
    }
}
