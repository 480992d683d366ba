//! Views across several of an owner's analyses.

mod comparison;
mod stats;

pub use comparison::{ComparisonMetrics, PolicyComparison, Recommendation};
pub use stats::{PortfolioStats, RecentActivity, RiskBand, RiskDistribution};

/// Fewest policies a comparison accepts.
pub const MIN_COMPARISON_POLICIES: usize = 2;
