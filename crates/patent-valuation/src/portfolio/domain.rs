use chrono::{DateTime, Utc};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring::{BibliographicIndicators, RiskLevel, ScoreResult, ValueProxy};

/// Store-assigned identifier for a patent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatentId(pub u64);

/// Store-assigned identifier for a workstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkstreamId(pub u64);

/// Intake payload for a patent before it has been scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentDraft {
    /// Publication number, unique across the portfolio (e.g. `US-11223344-B2`).
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub tech_tag: String,
    #[serde(default)]
    pub workstream_id: Option<WorkstreamId>,
    #[serde(flatten)]
    pub indicators: BibliographicIndicators,
    #[serde(default)]
    pub legal_events: Vec<String>,
}

/// Stored patent with its latest score merged in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patent {
    pub id: PatentId,
    pub number: String,
    pub title: String,
    pub jurisdiction: String,
    pub assignee: String,
    pub tech_tag: String,
    pub workstream_id: Option<WorkstreamId>,
    #[serde(flatten)]
    pub indicators: BibliographicIndicators,
    #[serde(flatten)]
    pub score: ScoreResult,
    pub legal_events: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl Patent {
    /// Build an unsaved record; the repository assigns the final id on insert.
    pub(crate) fn from_draft(draft: PatentDraft, score: ScoreResult, now: DateTime<Utc>) -> Self {
        Self {
            id: PatentId(0),
            number: draft.number,
            title: draft.title,
            jurisdiction: draft.jurisdiction,
            assignee: draft.assignee,
            tech_tag: draft.tech_tag,
            workstream_id: draft.workstream_id,
            indicators: draft.indicators,
            score,
            legal_events: draft.legal_events,
            updated_at: now,
        }
    }

    /// Next step suggested by the latest score. High risk outranks strength.
    pub fn recommended_action(&self) -> &'static str {
        if self.score.risk_level == RiskLevel::High {
            "Prioritize mitigation and reassessment of claim scope."
        } else if self.score.strength_score > 75 {
            "Consider licensing strategy and portfolio expansion."
        } else {
            "Monitor and reinforce with additional filings."
        }
    }

    pub fn profile(&self) -> PatentProfile {
        PatentProfile {
            recommended_action: self.recommended_action(),
            claim_breadth: if self.indicators.claims_independent > 2 {
                ProfileRating::Broad
            } else {
                ProfileRating::Focused
            },
            network_strength: if self.indicators.citations_forward > 10 {
                ProfileRating::High
            } else {
                ProfileRating::Moderate
            },
            coverage: if self.indicators.family_size > 5 {
                ProfileRating::Expanded
            } else {
                ProfileRating::Focused
            },
        }
    }

    fn matches_search(&self, needle: &str) -> bool {
        self.number.to_lowercase().contains(needle) || self.title.to_lowercase().contains(needle)
    }
}

/// Qualitative labels shown next to a patent's raw indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfileRating {
    Broad,
    Focused,
    High,
    Moderate,
    Expanded,
}

impl fmt::Display for ProfileRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProfileRating::Broad => "Broad",
            ProfileRating::Focused => "Focused",
            ProfileRating::High => "High",
            ProfileRating::Moderate => "Moderate",
            ProfileRating::Expanded => "Expanded",
        };
        f.write_str(label)
    }
}

/// Recommended action plus claim, citation, and family ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatentProfile {
    pub recommended_action: &'static str,
    /// Broad above two independent claims.
    pub claim_breadth: ProfileRating,
    /// High above ten forward citations.
    pub network_strength: ProfileRating,
    /// Expanded above a family of five.
    pub coverage: ProfileRating,
}

/// Detail view: the stored record with its profile alongside.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatentDetail {
    #[serde(flatten)]
    pub patent: Patent,
    pub profile: PatentProfile,
}

impl From<Patent> for PatentDetail {
    fn from(patent: Patent) -> Self {
        let profile = patent.profile();
        Self { patent, profile }
    }
}

/// Grouping of patents under an active engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workstream {
    pub id: WorkstreamId,
    pub name: String,
    pub stage: String,
    /// Completion percentage, 0..=100.
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWorkstream {
    pub name: String,
    pub stage: String,
    #[serde(default)]
    pub progress: u8,
}

/// Narrative entry in the portfolio activity feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelligenceEntry {
    pub id: u64,
    pub title: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIntelligence {
    pub title: String,
    pub detail: String,
    pub timestamp: DateTime<Utc>,
}

/// Vault query: free-text match on number or title plus an optional risk bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VaultFilter {
    #[serde(default)]
    pub search: Option<String>,
    /// `None` (or `All` on the wire) keeps every risk level.
    #[serde(default, deserialize_with = "risk_filter")]
    pub risk: Option<RiskLevel>,
}

impl VaultFilter {
    pub fn matches(&self, patent: &Patent) -> bool {
        let search_hit = match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => patent.matches_search(&needle.to_lowercase()),
            _ => true,
        };
        let risk_hit = self
            .risk
            .map(|level| patent.score.risk_level == level)
            .unwrap_or(true);
        search_hit && risk_hit
    }
}

fn risk_filter<'de, D>(deserializer: D) -> Result<Option<RiskLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) if value.eq_ignore_ascii_case("all") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Headline figures for the command-center dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioMetrics {
    pub total: usize,
    pub avg_strength: u8,
    pub avg_confidence: u8,
    /// Patents currently in the High risk bucket.
    pub risk_alerts: usize,
    /// Patents currently in the High value bucket.
    pub high_value: usize,
}

impl PortfolioMetrics {
    pub fn from_patents(patents: &[Patent]) -> Self {
        let total = patents.len();
        let average = |sum: u64| -> u8 {
            if total == 0 {
                0
            } else {
                (sum as f64 / total as f64).round() as u8
            }
        };

        let strength_sum = patents
            .iter()
            .map(|patent| u64::from(patent.score.strength_score))
            .sum();
        let confidence_sum = patents
            .iter()
            .map(|patent| u64::from(patent.score.confidence))
            .sum();

        Self {
            total,
            avg_strength: average(strength_sum),
            avg_confidence: average(confidence_sum),
            risk_alerts: patents
                .iter()
                .filter(|patent| patent.score.risk_level == RiskLevel::High)
                .count(),
            high_value: patents
                .iter()
                .filter(|patent| patent.score.value_proxy == ValueProxy::High)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::score_patent;

    fn patent(indicators: BibliographicIndicators) -> Patent {
        let draft = PatentDraft {
            number: "US-42".to_string(),
            title: "Beam steering lattice".to_string(),
            jurisdiction: "US".to_string(),
            assignee: String::new(),
            tech_tag: "Photonics".to_string(),
            workstream_id: None,
            indicators,
            legal_events: Vec::new(),
        };
        Patent::from_draft(draft, score_patent(&indicators), Utc::now())
    }

    fn indicators(forward: u32, independent: u32, family: u32) -> BibliographicIndicators {
        BibliographicIndicators {
            citations_forward: forward,
            citations_backward: 4,
            claims_independent: independent,
            claims_dependent: 10,
            family_size: family,
        }
    }

    #[test]
    fn high_risk_outranks_strength_in_recommendation() {
        let mut record = patent(indicators(18, 4, 7));
        record.score.strength_score = 90;
        record.score.risk_level = RiskLevel::High;

        assert_eq!(
            record.recommended_action(),
            "Prioritize mitigation and reassessment of claim scope."
        );
    }

    #[test]
    fn licensing_needs_strength_strictly_above_75() {
        let mut record = patent(indicators(18, 4, 7));
        record.score.risk_level = RiskLevel::Low;

        record.score.strength_score = 76;
        assert_eq!(
            record.recommended_action(),
            "Consider licensing strategy and portfolio expansion."
        );

        record.score.strength_score = 75;
        assert_eq!(
            record.recommended_action(),
            "Monitor and reinforce with additional filings."
        );
    }

    #[test]
    fn profile_ratings_switch_strictly_above_thresholds() {
        let at_threshold = patent(indicators(10, 2, 5)).profile();
        assert_eq!(at_threshold.claim_breadth, ProfileRating::Focused);
        assert_eq!(at_threshold.network_strength, ProfileRating::Moderate);
        assert_eq!(at_threshold.coverage, ProfileRating::Focused);

        let above = patent(indicators(11, 3, 6)).profile();
        assert_eq!(above.claim_breadth, ProfileRating::Broad);
        assert_eq!(above.network_strength, ProfileRating::High);
        assert_eq!(above.coverage, ProfileRating::Expanded);
    }

    #[test]
    fn detail_serializes_profile_next_to_record() {
        let detail = PatentDetail::from(patent(indicators(11, 3, 6)));
        let json = serde_json::to_value(&detail).expect("serializes");

        assert_eq!(json["number"], "US-42");
        assert_eq!(json["profile"]["claimBreadth"], "Broad");
        assert_eq!(json["profile"]["coverage"], "Expanded");
        assert!(json["profile"]["recommendedAction"].is_string());
    }
}
