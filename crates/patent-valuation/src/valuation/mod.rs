//! Financial valuation calculators for individual patents.
//!
//! Every calculator is a pure function: it takes plain numeric input, returns a result
//! record, and never touches storage. Inputs that would make a formula undefined are
//! rejected with [`ValuationError::InvalidParameter`] instead of leaking NaN or infinity.

mod asset;
mod income;
mod options;
mod quality;

pub use asset::{
    cost_approach, market_approach, CostValuation, DepreciationBreakdown, DepreciationInputs,
    MarketAdjustments, MarketValuation,
};
pub use income::{
    dcf, rnpv, DcfValuation, RnpvValuation, Scenario, YearlyPresentValue,
    YearlyRiskAdjustedValue,
};
pub use options::{
    real_options, real_options_with, AbramowitzStegunCdf, NormalCdf, OptionParameters,
    RealOptionValuation,
};
pub use quality::{
    quality_score_multi_impact, quality_score_weighted, reference_benchmarks, reference_weights,
    Benchmark, ImpactComponent, MultiImpactScore, NormalizedIndicator, QualityWeights,
    WeightedQualityScore,
};

/// Failure raised when a calculator precondition is violated.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValuationError {
    #[error("invalid parameter `{parameter}`: {reason}")]
    InvalidParameter {
        parameter: &'static str,
        reason: String,
    },
}

impl ValuationError {
    pub(crate) fn invalid(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }

    /// Name of the offending input.
    pub fn parameter(&self) -> &'static str {
        match self {
            Self::InvalidParameter { parameter, .. } => *parameter,
        }
    }
}

/// Discount rates at or below -100% make `(1 + r)^t` vanish or flip sign.
pub(crate) fn validate_discount_rate(discount_rate: f64) -> Result<(), ValuationError> {
    if !discount_rate.is_finite() || discount_rate <= -1.0 {
        return Err(ValuationError::invalid(
            "discount_rate",
            format!("must be a finite number greater than -1 (got {discount_rate})"),
        ));
    }
    Ok(())
}
