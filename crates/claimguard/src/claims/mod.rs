//! Hypothetical claim payouts under a policy's out-of-pocket terms.

mod simulator;

pub use simulator::{ClaimSimulation, ClaimSimulator};

#[derive(Debug, thiserror::Error)]
pub enum ClaimSimulationError {
    #[error("invalid claim: {0}")]
    InvalidInput(String),
}
