//! Heuristic strength and risk profile derived from bibliographic indicators.

mod policy;
mod rules;

pub use policy::{RiskLevel, ValueProxy};

use crate::form::lenient_count;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw counts pulled from a patent's bibliographic record. Absent counts are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BibliographicIndicators {
    #[serde(deserialize_with = "lenient_count")]
    pub citations_forward: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub citations_backward: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub claims_independent: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub claims_dependent: u32,
    #[serde(deserialize_with = "lenient_count")]
    pub family_size: u32,
}

/// Clamped sub-scores feeding the strength blend, kept for transparent audits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub citation_power: f64,
    pub claim_robustness: f64,
    pub family_coverage: f64,
    pub novelty: f64,
    pub legal_risk: f64,
}

/// Composite profile written back onto patent records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub strength_score: u8,
    pub confidence: u8,
    pub risk_level: RiskLevel,
    pub value_proxy: ValueProxy,
    pub drivers_positive: Vec<String>,
    pub drivers_negative: Vec<String>,
    pub components: ScoreComponents,
}

/// Score a patent from its bibliographic indicators. Never fails; every bounded
/// output stays within 0..=100 however large the counts get.
pub fn score_patent(indicators: &BibliographicIndicators) -> ScoreResult {
    let components = rules::sub_scores(indicators);
    let strength_score = rules::strength(&components);
    let confidence = rules::confidence(indicators);

    let risk_level = RiskLevel::from_legal_risk(components.legal_risk);
    let value_proxy = ValueProxy::from_strength(strength_score);

    ScoreResult {
        strength_score,
        confidence,
        risk_level,
        value_proxy,
        drivers_positive: policy::positive_drivers(indicators),
        drivers_negative: policy::negative_drivers(indicators, risk_level),
        components,
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for ValueProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error raised when a risk level label cannot be recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk level '{0}' (expected Low, Medium, or High)")]
pub struct UnknownRiskLevel(pub String);

impl FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(UnknownRiskLevel(value.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(
        forward: u32,
        backward: u32,
        independent: u32,
        dependent: u32,
        family: u32,
    ) -> BibliographicIndicators {
        BibliographicIndicators {
            citations_forward: forward,
            citations_backward: backward,
            claims_independent: independent,
            claims_dependent: dependent,
            family_size: family,
        }
    }

    #[test]
    fn strong_patent_scores_high_value_low_risk() {
        let result = score_patent(&indicators(18, 6, 4, 16, 7));

        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.strength_score, 76);
        assert_eq!(result.value_proxy, ValueProxy::High);
        assert_eq!(result.confidence, 100);
        assert_eq!(
            result.drivers_positive,
            vec![
                "Strong forward citations",
                "Wide jurisdictional coverage",
                "Robust independent claim set",
            ]
        );
        assert_eq!(result.drivers_negative, vec!["No critical risks detected"]);
        assert_eq!(result.components.legal_risk, 78.0);
    }

    #[test]
    fn empty_record_falls_back_to_balanced_signals() {
        let result = score_patent(&BibliographicIndicators::default());

        assert_eq!(result.drivers_positive, vec!["Balanced portfolio signals"]);
        assert_eq!(result.drivers_negative, vec!["Narrow claim breadth"]);
        assert_eq!(result.strength_score, 37);
        assert_eq!(result.confidence, 60);
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert_eq!(result.value_proxy, ValueProxy::Low);
    }

    #[test]
    fn dense_prior_art_raises_invalidity_exposure() {
        let result = score_patent(&indicators(0, 25, 1, 0, 1));

        assert_eq!(result.components.legal_risk, 34.0);
        assert_eq!(result.components.novelty, 0.0);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(
            result.drivers_negative,
            vec![
                "High prior art density",
                "Narrow claim breadth",
                "Elevated invalidity exposure",
            ]
        );
    }

    #[test]
    fn medium_risk_band_starts_below_seventy() {
        let result = score_patent(&indicators(6, 11, 2, 4, 3));
        assert_eq!(result.components.legal_risk, 68.0);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn parses_risk_level_labels() {
        assert_eq!("high".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!(" Medium ".parse::<RiskLevel>(), Ok(RiskLevel::Medium));
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn missing_fields_deserialize_as_zero() {
        let parsed: BibliographicIndicators =
            serde_json::from_str(r#"{ "citationsForward": 4, "familySize": "" }"#)
                .expect("parses");
        assert_eq!(parsed.citations_forward, 4);
        assert_eq!(parsed.family_size, 0);
        assert_eq!(parsed.claims_dependent, 0);
    }
}
