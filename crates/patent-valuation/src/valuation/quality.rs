use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ValuationError;

/// Population statistics an indicator is normalized against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benchmark {
    pub mean: f64,
    pub std_dev: f64,
}

impl Benchmark {
    pub fn new(mean: f64, std_dev: f64) -> Self {
        Self { mean, std_dev }
    }

    /// A zero spread carries no signal, so the indicator scores as neutral.
    fn z_score(&self, value: f64) -> f64 {
        if self.std_dev != 0.0 {
            (value - self.mean) / self.std_dev
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedIndicator {
    pub raw_value: f64,
    pub z_score: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedQualityScore {
    /// `50 + 10 × total_weighted_score`, clamped to 0..=100.
    pub quality_score: f64,
    pub total_weighted_score: f64,
    pub normalized_scores: BTreeMap<String, NormalizedIndicator>,
}

/// Weighted z-score index: Q = Σ w_i · (x_i − μ_i) / σ_i, rescaled around 50.
///
/// Only keys present in `indicators` contribute. A key without a weight counts as
/// weight 0; a key without a benchmark is compared against itself and scores 0.
pub fn quality_score_weighted(
    indicators: &BTreeMap<String, f64>,
    benchmarks: &BTreeMap<String, Benchmark>,
    weights: &BTreeMap<String, f64>,
) -> WeightedQualityScore {
    let mut normalized_scores = BTreeMap::new();
    let mut total_weighted_score = 0.0;

    for (key, &value) in indicators {
        let benchmark = benchmarks
            .get(key)
            .copied()
            .unwrap_or_else(|| Benchmark::new(value, 1.0));
        let weight = weights.get(key).copied().unwrap_or(0.0);

        let z_score = benchmark.z_score(value);
        let weighted_score = weight * z_score;
        total_weighted_score += weighted_score;

        normalized_scores.insert(
            key.clone(),
            NormalizedIndicator {
                raw_value: value,
                z_score,
                weight,
                weighted_score,
            },
        );
    }

    WeightedQualityScore {
        quality_score: (50.0 + total_weighted_score * 10.0).clamp(0.0, 100.0),
        total_weighted_score,
        normalized_scores,
    }
}

/// Benchmarks for the standard indicator set used by the quality calculator.
pub fn reference_benchmarks() -> BTreeMap<String, Benchmark> {
    [
        ("citations", Benchmark::new(10.0, 5.0)),
        ("claims", Benchmark::new(3.0, 2.0)),
        ("familySize", Benchmark::new(5.0, 3.0)),
        ("age", Benchmark::new(7.0, 4.0)),
        ("jurisdictions", Benchmark::new(4.0, 2.0)),
    ]
    .into_iter()
    .map(|(key, benchmark)| (key.to_string(), benchmark))
    .collect()
}

/// Default weights for the standard indicator set; they sum to 1.
pub fn reference_weights() -> BTreeMap<String, f64> {
    [
        ("citations", 0.3),
        ("claims", 0.2),
        ("familySize", 0.2),
        ("age", 0.15),
        ("jurisdictions", 0.15),
    ]
    .into_iter()
    .map(|(key, weight)| (key.to_string(), weight))
    .collect()
}

/// Blend weights for the market, technology, and assignee impact scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            alpha: 0.4,
            beta: 0.4,
            gamma: 0.2,
        }
    }
}

impl QualityWeights {
    fn normalized(&self) -> Result<Self, ValuationError> {
        let total = self.alpha + self.beta + self.gamma;
        if total == 0.0 || !total.is_finite() {
            return Err(ValuationError::invalid(
                "alpha + beta + gamma",
                format!("weights must sum to a non-zero finite value (got {total})"),
            ));
        }
        Ok(Self {
            alpha: self.alpha / total,
            beta: self.beta / total,
            gamma: self.gamma / total,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactComponent {
    pub value: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiImpactScore {
    /// Unclamped: the range follows the impact inputs.
    pub quality_score: f64,
    pub normalized_weights: QualityWeights,
    pub components: BTreeMap<String, ImpactComponent>,
}

/// Q = α·M + β·T + γ·A with the weights rescaled to sum to 1.
pub fn quality_score_multi_impact(
    market_impact: f64,
    technology_impact: f64,
    assignee_impact: f64,
    weights: &QualityWeights,
) -> Result<MultiImpactScore, ValuationError> {
    let normalized_weights = weights.normalized()?;

    let parts = [
        ("market", market_impact, normalized_weights.alpha),
        ("technology", technology_impact, normalized_weights.beta),
        ("assignee", assignee_impact, normalized_weights.gamma),
    ];

    let mut quality_score = 0.0;
    let mut components = BTreeMap::new();
    for (name, value, weight) in parts {
        let contribution = weight * value;
        quality_score += contribution;
        components.insert(
            name.to_string(),
            ImpactComponent {
                value,
                contribution,
            },
        );
    }

    Ok(MultiImpactScore {
        quality_score,
        normalized_weights,
        components,
    })
}
