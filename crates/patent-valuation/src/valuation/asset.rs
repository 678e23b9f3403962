use serde::{Deserialize, Serialize};

/// Cost-approach inputs: what it would take to recreate the patent and how much of
/// that cost has worn away.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepreciationInputs {
    pub reproduction_cost: f64,
    #[serde(default, rename = "physicalDepreciation")]
    pub physical: f64,
    #[serde(default, rename = "functionalDepreciation")]
    pub functional: f64,
    #[serde(default, rename = "economicDepreciation")]
    pub economic: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepreciationBreakdown {
    pub physical: f64,
    pub functional: f64,
    pub economic: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostValuation {
    /// Never negative: depreciation beyond the reproduction cost floors at zero.
    pub adjusted_value: f64,
    pub reproduction_cost: f64,
    pub total_depreciation: f64,
    pub depreciation_breakdown: DepreciationBreakdown,
    /// Percentage of the reproduction cost consumed by depreciation.
    pub depreciation_rate: f64,
}

pub fn cost_approach(inputs: &DepreciationInputs) -> CostValuation {
    let total_depreciation = inputs.physical + inputs.functional + inputs.economic;
    let adjusted_value = (inputs.reproduction_cost - total_depreciation).max(0.0);
    let depreciation_rate = if inputs.reproduction_cost > 0.0 {
        total_depreciation / inputs.reproduction_cost * 100.0
    } else {
        0.0
    };

    CostValuation {
        adjusted_value,
        reproduction_cost: inputs.reproduction_cost,
        total_depreciation,
        depreciation_breakdown: DepreciationBreakdown {
            physical: inputs.physical,
            functional: inputs.functional,
            economic: inputs.economic,
        },
        depreciation_rate,
    }
}

fn neutral() -> f64 {
    1.0
}

/// Multipliers reconciling a comparable transaction with the subject patent.
/// Each defaults to 1.0, which leaves the comparable price untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketAdjustments {
    #[serde(default = "neutral")]
    pub territory: f64,
    #[serde(default = "neutral")]
    pub life: f64,
    #[serde(default = "neutral")]
    pub technology: f64,
    #[serde(default = "neutral")]
    pub revenue: f64,
}

impl Default for MarketAdjustments {
    fn default() -> Self {
        Self {
            territory: 1.0,
            life: 1.0,
            technology: 1.0,
            revenue: 1.0,
        }
    }
}

impl MarketAdjustments {
    pub fn product(&self) -> f64 {
        self.territory * self.life * self.technology * self.revenue
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketValuation {
    pub adjusted_value: f64,
    pub comparable_price: f64,
    pub total_adjustment: f64,
    pub adjustment_factors: MarketAdjustments,
}

/// Scale a comparable price by the combined adjustment. No floor or ceiling applies.
pub fn market_approach(comparable_price: f64, adjustments: &MarketAdjustments) -> MarketValuation {
    let total_adjustment = adjustments.product();

    MarketValuation {
        adjusted_value: comparable_price * total_adjustment,
        comparable_price,
        total_adjustment,
        adjustment_factors: *adjustments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depreciation(
        reproduction_cost: f64,
        physical: f64,
        functional: f64,
        economic: f64,
    ) -> DepreciationInputs {
        DepreciationInputs {
            reproduction_cost,
            physical,
            functional,
            economic,
        }
    }

    #[test]
    fn subtracts_all_depreciation_components() {
        let valuation = cost_approach(&depreciation(500.0, 50.0, 30.0, 20.0));
        assert_eq!(valuation.adjusted_value, 400.0);
        assert_eq!(valuation.total_depreciation, 100.0);
        assert_eq!(valuation.depreciation_rate, 20.0);
        assert_eq!(valuation.depreciation_breakdown.functional, 30.0);
    }

    #[test]
    fn floors_value_at_zero() {
        let valuation = cost_approach(&depreciation(100.0, 200.0, 0.0, 0.0));
        assert_eq!(valuation.adjusted_value, 0.0);
        assert_eq!(valuation.depreciation_rate, 200.0);
    }

    #[test]
    fn zero_reproduction_cost_reports_zero_rate() {
        let valuation = cost_approach(&depreciation(0.0, 10.0, 0.0, 0.0));
        assert_eq!(valuation.depreciation_rate, 0.0);
        assert_eq!(valuation.adjusted_value, 0.0);
    }

    #[test]
    fn neutral_multipliers_are_identity() {
        let valuation = market_approach(600.0, &MarketAdjustments::default());
        assert_eq!(valuation.adjusted_value, 600.0);
        assert_eq!(valuation.total_adjustment, 1.0);
    }

    #[test]
    fn multiplies_every_adjustment() {
        let adjustments = MarketAdjustments {
            territory: 1.0,
            life: 0.5,
            technology: 2.0,
            revenue: 1.5,
        };
        let valuation = market_approach(600.0, &adjustments);
        assert_eq!(valuation.total_adjustment, 1.5);
        assert_eq!(valuation.adjusted_value, 900.0);
    }

    #[test]
    fn missing_adjustments_deserialize_as_neutral() {
        let adjustments: MarketAdjustments =
            serde_json::from_str(r#"{ "life": 0.9 }"#).expect("parses");
        assert_eq!(adjustments.territory, 1.0);
        assert_eq!(adjustments.life, 0.9);
        assert_eq!(adjustments.revenue, 1.0);
    }
}
