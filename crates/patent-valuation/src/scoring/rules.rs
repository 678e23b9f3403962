use super::{BibliographicIndicators, ScoreComponents};

const CITATION_WEIGHT: f64 = 0.25;
const CLAIM_WEIGHT: f64 = 0.2;
const FAMILY_WEIGHT: f64 = 0.2;
const NOVELTY_WEIGHT: f64 = 0.2;
const LEGAL_WEIGHT: f64 = 0.15;

/// Forward citations below this count add legal risk.
const CITATION_SAFE_HARBOR: f64 = 6.0;

pub(crate) fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

pub(crate) fn sub_scores(indicators: &BibliographicIndicators) -> ScoreComponents {
    let forward = f64::from(indicators.citations_forward);
    let backward = f64::from(indicators.citations_backward);
    let independent = f64::from(indicators.claims_independent);
    let dependent = f64::from(indicators.claims_dependent);
    let family = f64::from(indicators.family_size);

    let citation_shortfall = (CITATION_SAFE_HARBOR - forward).max(0.0);

    ScoreComponents {
        citation_power: clamp_score(20.0 + forward * 4.0),
        claim_robustness: clamp_score(15.0 + independent * 10.0 + dependent * 2.0),
        family_coverage: clamp_score(10.0 + family * 8.0),
        novelty: clamp_score(70.0 - backward * 3.0),
        legal_risk: clamp_score(90.0 - backward * 2.0 - citation_shortfall),
    }
}

pub(crate) fn strength(components: &ScoreComponents) -> u8 {
    let blended = components.citation_power * CITATION_WEIGHT
        + components.claim_robustness * CLAIM_WEIGHT
        + components.family_coverage * FAMILY_WEIGHT
        + components.novelty * NOVELTY_WEIGHT
        + components.legal_risk * LEGAL_WEIGHT;

    clamp_score(blended.round()) as u8
}

pub(crate) fn confidence(indicators: &BibliographicIndicators) -> u8 {
    let forward = f64::from(indicators.citations_forward);
    let family = f64::from(indicators.family_size);

    clamp_score(60.0 + forward * 2.0 + family * 2.0) as u8
}
