use serde::{Deserialize, Serialize};

use super::BibliographicIndicators;

/// Invalidity exposure bucket derived from the legal-risk sub-score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Thresholds apply to the clamped legal-risk score, the same value used in the blend.
    pub(crate) fn from_legal_risk(legal_risk: f64) -> Self {
        if legal_risk < 45.0 {
            Self::High
        } else if legal_risk < 70.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Coarse value bucket derived from the strength score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueProxy {
    Low,
    Medium,
    High,
}

impl ValueProxy {
    pub(crate) fn from_strength(strength_score: u8) -> Self {
        match strength_score {
            75.. => Self::High,
            55..=74 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ValueProxy::Low => "Low",
            ValueProxy::Medium => "Medium",
            ValueProxy::High => "High",
        }
    }
}

pub(crate) const STRONG_FORWARD_CITATIONS: &str = "Strong forward citations";
pub(crate) const WIDE_COVERAGE: &str = "Wide jurisdictional coverage";
pub(crate) const ROBUST_CLAIMS: &str = "Robust independent claim set";
pub(crate) const BALANCED_SIGNALS: &str = "Balanced portfolio signals";

pub(crate) const PRIOR_ART_DENSITY: &str = "High prior art density";
pub(crate) const NARROW_CLAIMS: &str = "Narrow claim breadth";
pub(crate) const INVALIDITY_EXPOSURE: &str = "Elevated invalidity exposure";
pub(crate) const NO_CRITICAL_RISKS: &str = "No critical risks detected";

fn with_fallback(drivers: Vec<&'static str>, fallback: &'static str) -> Vec<String> {
    if drivers.is_empty() {
        vec![fallback.to_string()]
    } else {
        drivers.into_iter().map(str::to_string).collect()
    }
}

pub(crate) fn positive_drivers(indicators: &BibliographicIndicators) -> Vec<String> {
    let mut drivers = Vec::new();
    if indicators.citations_forward >= 12 {
        drivers.push(STRONG_FORWARD_CITATIONS);
    }
    if indicators.family_size >= 6 {
        drivers.push(WIDE_COVERAGE);
    }
    if indicators.claims_independent >= 3 {
        drivers.push(ROBUST_CLAIMS);
    }
    with_fallback(drivers, BALANCED_SIGNALS)
}

pub(crate) fn negative_drivers(
    indicators: &BibliographicIndicators,
    risk_level: RiskLevel,
) -> Vec<String> {
    let mut drivers = Vec::new();
    if indicators.citations_backward >= 12 {
        drivers.push(PRIOR_ART_DENSITY);
    }
    if indicators.claims_independent <= 1 {
        drivers.push(NARROW_CLAIMS);
    }
    if risk_level == RiskLevel::High {
        drivers.push(INVALIDITY_EXPOSURE);
    }
    with_fallback(drivers, NO_CRITICAL_RISKS)
}
