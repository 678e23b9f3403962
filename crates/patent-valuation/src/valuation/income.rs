use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{validate_discount_rate, ValuationError};

/// One year of a discounted cash-flow schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyPresentValue {
    pub year: u32,
    pub cash_flow: f64,
    pub present_value: f64,
}

/// Income-approach valuation: V = Σ CF_t / (1 + r)^t.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfValuation {
    pub present_value: f64,
    #[serde(rename = "yearlyPV")]
    pub yearly_pv: Vec<YearlyPresentValue>,
    pub total_years: usize,
    pub discount_rate: f64,
}

/// Expected cash flow for a year together with the probability it materializes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub cash_flow: f64,
    pub probability: f64,
}

impl Scenario {
    pub fn new(cash_flow: f64, probability: f64) -> Self {
        Self {
            cash_flow,
            probability,
        }
    }
}

/// One year of a risk-adjusted schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRiskAdjustedValue {
    pub year: u32,
    pub cash_flow: f64,
    pub probability: f64,
    pub adjusted_cash_flow: f64,
    pub present_value: f64,
}

/// Risk-adjusted NPV: V = Σ p_t · CF_t / (1 + r)^t.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RnpvValuation {
    pub risk_adjusted_value: f64,
    pub yearly_values: Vec<YearlyRiskAdjustedValue>,
    /// Undiscounted sum of probability-weighted cash flows.
    pub expected_value: f64,
    pub total_years: usize,
}

/// `(1 + r)^t`, rejected once it underflows to zero or overflows.
fn discount_factor(discount_rate: f64, year: u32) -> Result<f64, ValuationError> {
    let factor = (1.0 + discount_rate).powi(i32::try_from(year).unwrap_or(i32::MAX));
    if !factor.is_finite() || factor == 0.0 {
        return Err(ValuationError::invalid(
            "discount_rate",
            format!("(1 + {discount_rate})^{year} is not a usable discount factor"),
        ));
    }
    Ok(factor)
}

fn discounted(amount: f64, discount_rate: f64, year: u32) -> Result<f64, ValuationError> {
    let present_value = amount / discount_factor(discount_rate, year)?;
    if !present_value.is_finite() {
        return Err(ValuationError::invalid(
            "discount_rate",
            format!("discounting {amount} in year {year} overflows"),
        ));
    }
    Ok(present_value)
}

/// Discount a series of annual cash flows, year 1 first.
pub fn dcf(cash_flows: &[f64], discount_rate: f64) -> Result<DcfValuation, ValuationError> {
    validate_discount_rate(discount_rate)?;

    let yearly_pv = cash_flows
        .iter()
        .zip(1u32..)
        .map(|(&cash_flow, year)| {
            Ok(YearlyPresentValue {
                year,
                cash_flow,
                present_value: discounted(cash_flow, discount_rate, year)?,
            })
        })
        .collect::<Result<Vec<_>, ValuationError>>()?;

    let present_value: f64 = yearly_pv.iter().map(|entry| entry.present_value).sum();
    debug!(
        years = cash_flows.len(),
        discount_rate, present_value, "computed discounted cash flow"
    );

    Ok(DcfValuation {
        present_value,
        yearly_pv,
        total_years: cash_flows.len(),
        discount_rate,
    })
}

/// Discount probability-weighted cash flows. Probabilities are taken as given.
pub fn rnpv(scenarios: &[Scenario], discount_rate: f64) -> Result<RnpvValuation, ValuationError> {
    validate_discount_rate(discount_rate)?;

    let yearly_values = scenarios
        .iter()
        .zip(1u32..)
        .map(|(scenario, year)| {
            let adjusted_cash_flow = scenario.cash_flow * scenario.probability;
            Ok(YearlyRiskAdjustedValue {
                year,
                cash_flow: scenario.cash_flow,
                probability: scenario.probability,
                adjusted_cash_flow,
                present_value: discounted(adjusted_cash_flow, discount_rate, year)?,
            })
        })
        .collect::<Result<Vec<_>, ValuationError>>()?;

    let risk_adjusted_value: f64 = yearly_values.iter().map(|entry| entry.present_value).sum();
    let expected_value: f64 = yearly_values
        .iter()
        .map(|entry| entry.adjusted_cash_flow)
        .sum();

    Ok(RnpvValuation {
        risk_adjusted_value,
        yearly_values,
        expected_value,
        total_years: scenarios.len(),
    })
}
