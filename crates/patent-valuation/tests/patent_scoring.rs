use patent_valuation::scoring::{score_patent, BibliographicIndicators, RiskLevel, ValueProxy};
use proptest::prelude::*;

#[test]
fn strong_record_scores_high_value_low_risk() {
    let result = score_patent(&BibliographicIndicators {
        citations_forward: 18,
        citations_backward: 6,
        claims_independent: 4,
        claims_dependent: 16,
        family_size: 7,
    });

    assert_eq!(result.risk_level, RiskLevel::Low);
    assert_eq!(result.value_proxy, ValueProxy::High);
    assert!(result.strength_score >= 75);
    assert_eq!(
        result.drivers_positive,
        vec![
            "Strong forward citations",
            "Wide jurisdictional coverage",
            "Robust independent claim set",
        ]
    );
}

#[test]
fn empty_record_falls_back_to_balanced_signals() {
    let result = score_patent(&BibliographicIndicators::default());

    assert_eq!(result.drivers_positive, vec!["Balanced portfolio signals"]);
    assert!(!result.drivers_negative.is_empty());
    assert!(result.strength_score <= 100);
}

#[test]
fn form_payload_with_text_counts_scores_like_numbers() {
    let typed: BibliographicIndicators = serde_json::from_str(
        r#"{"citationsForward":"18","citationsBackward":"6","claimsIndependent":"4","claimsDependent":"16","familySize":"7"}"#,
    )
    .expect("lenient payload");
    let numeric: BibliographicIndicators = serde_json::from_str(
        r#"{"citationsForward":18,"citationsBackward":6,"claimsIndependent":4,"claimsDependent":16,"familySize":7}"#,
    )
    .expect("numeric payload");

    assert_eq!(score_patent(&typed), score_patent(&numeric));
}

proptest! {
    #[test]
    fn bounded_outputs_stay_within_percent_range(
        citations_forward in any::<u32>(),
        citations_backward in any::<u32>(),
        claims_independent in any::<u32>(),
        claims_dependent in any::<u32>(),
        family_size in any::<u32>(),
    ) {
        let result = score_patent(&BibliographicIndicators {
            citations_forward,
            citations_backward,
            claims_independent,
            claims_dependent,
            family_size,
        });

        prop_assert!(result.strength_score <= 100);
        prop_assert!(result.confidence <= 100);
        let components = result.components;
        for value in [
            components.citation_power,
            components.claim_robustness,
            components.family_coverage,
            components.novelty,
            components.legal_risk,
        ] {
            prop_assert!((0.0..=100.0).contains(&value));
        }
        prop_assert!(!result.drivers_positive.is_empty());
        prop_assert!(!result.drivers_negative.is_empty());
    }
}
