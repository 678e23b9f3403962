use crate::infra::InMemoryPortfolioRepository;
use clap::{Args, Subcommand};
use patent_valuation::config::AppConfig;
use patent_valuation::error::AppError;
use patent_valuation::portfolio::{
    PatentCsvImporter, PortfolioService, PortfolioServiceError, RepositoryError, VaultFilter,
};
use patent_valuation::scoring::{score_patent, BibliographicIndicators};
use patent_valuation::telemetry;
use patent_valuation::valuation::{
    cost_approach, dcf, market_approach, quality_score_multi_impact, quality_score_weighted,
    real_options, reference_benchmarks, reference_weights, rnpv, DepreciationInputs,
    MarketAdjustments, OptionParameters, QualityWeights, Scenario,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::warn;

// Starting values of the calculator forms.
const FORM_CASH_FLOWS: [f64; 5] = [200.0; 5];
const FORM_PROBABILITIES: [f64; 5] = [0.9, 0.85, 0.8, 0.75, 0.7];
const FORM_DISCOUNT_RATE: f64 = 0.15;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Forward citations received
    #[arg(long, default_value_t = 0)]
    pub(crate) forward: u32,
    /// Backward citations (prior art cited)
    #[arg(long, default_value_t = 0)]
    pub(crate) backward: u32,
    /// Independent claims
    #[arg(long, default_value_t = 0)]
    pub(crate) independent: u32,
    /// Dependent claims
    #[arg(long, default_value_t = 0)]
    pub(crate) dependent: u32,
    /// Family members across jurisdictions
    #[arg(long, default_value_t = 0)]
    pub(crate) family: u32,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ValueCommand {
    /// Discounted cash flow
    Dcf(DcfArgs),
    /// Risk-adjusted NPV with per-year success probabilities
    Rnpv(RnpvArgs),
    /// Black-Scholes real option
    RealOptions(RealOptionsArgs),
    /// Reproduction cost less depreciation
    Cost(CostArgs),
    /// Comparable transaction with adjustment multipliers
    Market(MarketArgs),
    /// Weighted z-score index against reference benchmarks
    QualityWeighted(WeightedQualityArgs),
    /// Weighted blend of market, technology, and assignee impact
    QualityMultiImpact(MultiImpactArgs),
}

impl ValueCommand {
    /// Every model once, seeded with the form defaults.
    pub(crate) fn with_form_defaults() -> Vec<(&'static str, ValueCommand)> {
        vec![
            ("DCF", ValueCommand::Dcf(DcfArgs::default())),
            ("rNPV", ValueCommand::Rnpv(RnpvArgs::default())),
            (
                "Real options",
                ValueCommand::RealOptions(RealOptionsArgs::default()),
            ),
            ("Cost approach", ValueCommand::Cost(CostArgs::default())),
            ("Market approach", ValueCommand::Market(MarketArgs::default())),
            (
                "Quality score (weighted)",
                ValueCommand::QualityWeighted(WeightedQualityArgs::default()),
            ),
            (
                "Quality score (multi-impact)",
                ValueCommand::QualityMultiImpact(MultiImpactArgs::default()),
            ),
        ]
    }
}

#[derive(Args, Debug)]
pub(crate) struct DcfArgs {
    /// Yearly cash flows, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = FORM_CASH_FLOWS
    )]
    pub(crate) cash_flows: Vec<f64>,
    #[arg(long, allow_negative_numbers = true, default_value_t = FORM_DISCOUNT_RATE)]
    pub(crate) discount_rate: f64,
}

impl Default for DcfArgs {
    fn default() -> Self {
        Self {
            cash_flows: FORM_CASH_FLOWS.to_vec(),
            discount_rate: FORM_DISCOUNT_RATE,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct RnpvArgs {
    /// Yearly cash flows, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = FORM_CASH_FLOWS
    )]
    pub(crate) cash_flows: Vec<f64>,
    /// Success probability per year; a year without one is weighted at 0
    #[arg(long, value_delimiter = ',', default_values_t = FORM_PROBABILITIES)]
    pub(crate) probabilities: Vec<f64>,
    #[arg(long, allow_negative_numbers = true, default_value_t = FORM_DISCOUNT_RATE)]
    pub(crate) discount_rate: f64,
}

impl Default for RnpvArgs {
    fn default() -> Self {
        Self {
            cash_flows: FORM_CASH_FLOWS.to_vec(),
            probabilities: FORM_PROBABILITIES.to_vec(),
            discount_rate: FORM_DISCOUNT_RATE,
        }
    }
}

impl RnpvArgs {
    fn scenarios(&self) -> Vec<Scenario> {
        self.cash_flows
            .iter()
            .enumerate()
            .map(|(index, &cash_flow)| {
                let probability = self.probabilities.get(index).copied().unwrap_or(0.0);
                Scenario::new(cash_flow, probability)
            })
            .collect()
    }
}

#[derive(Args, Debug)]
pub(crate) struct RealOptionsArgs {
    /// Present value of expected cash flows (S)
    #[arg(long, default_value_t = 1000.0)]
    pub(crate) underlying: f64,
    /// Development or launch cost (K)
    #[arg(long, default_value_t = 800.0)]
    pub(crate) exercise_cost: f64,
    /// Years to expiry (T)
    #[arg(long, default_value_t = 3.0)]
    pub(crate) years: f64,
    /// Risk-free rate (r)
    #[arg(long, allow_negative_numbers = true, default_value_t = 0.05)]
    pub(crate) rate: f64,
    /// Volatility (sigma)
    #[arg(long, default_value_t = 0.3)]
    pub(crate) volatility: f64,
}

impl Default for RealOptionsArgs {
    fn default() -> Self {
        Self {
            underlying: 1000.0,
            exercise_cost: 800.0,
            years: 3.0,
            rate: 0.05,
            volatility: 0.3,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct CostArgs {
    #[arg(long, default_value_t = 500.0)]
    pub(crate) reproduction_cost: f64,
    #[arg(long, default_value_t = 50.0)]
    pub(crate) physical: f64,
    #[arg(long, default_value_t = 30.0)]
    pub(crate) functional: f64,
    #[arg(long, default_value_t = 20.0)]
    pub(crate) economic: f64,
}

impl Default for CostArgs {
    fn default() -> Self {
        Self {
            reproduction_cost: 500.0,
            physical: 50.0,
            functional: 30.0,
            economic: 20.0,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct MarketArgs {
    #[arg(long, default_value_t = 600.0)]
    pub(crate) comparable_price: f64,
    #[arg(long, default_value_t = 1.0)]
    pub(crate) territory: f64,
    #[arg(long, default_value_t = 0.9)]
    pub(crate) life: f64,
    #[arg(long, default_value_t = 1.1)]
    pub(crate) technology: f64,
    #[arg(long, default_value_t = 1.0)]
    pub(crate) revenue: f64,
}

impl Default for MarketArgs {
    fn default() -> Self {
        Self {
            comparable_price: 600.0,
            territory: 1.0,
            life: 0.9,
            technology: 1.1,
            revenue: 1.0,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct WeightedQualityArgs {
    #[arg(long, default_value_t = 8.0)]
    pub(crate) citations: f64,
    #[arg(long, default_value_t = 2.0)]
    pub(crate) claims: f64,
    #[arg(long, default_value_t = 4.0)]
    pub(crate) family_size: f64,
    /// Years since filing
    #[arg(long, default_value_t = 5.0)]
    pub(crate) age: f64,
    #[arg(long, default_value_t = 3.0)]
    pub(crate) jurisdictions: f64,
}

impl Default for WeightedQualityArgs {
    fn default() -> Self {
        Self {
            citations: 8.0,
            claims: 2.0,
            family_size: 4.0,
            age: 5.0,
            jurisdictions: 3.0,
        }
    }
}

impl WeightedQualityArgs {
    fn indicators(&self) -> BTreeMap<String, f64> {
        [
            ("citations", self.citations),
            ("claims", self.claims),
            ("familySize", self.family_size),
            ("age", self.age),
            ("jurisdictions", self.jurisdictions),
        ]
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
    }
}

#[derive(Args, Debug)]
pub(crate) struct MultiImpactArgs {
    #[arg(long, default_value_t = 75.0)]
    pub(crate) market: f64,
    #[arg(long, default_value_t = 80.0)]
    pub(crate) technology: f64,
    #[arg(long, default_value_t = 70.0)]
    pub(crate) assignee: f64,
    #[arg(long, default_value_t = 0.4)]
    pub(crate) alpha: f64,
    #[arg(long, default_value_t = 0.4)]
    pub(crate) beta: f64,
    #[arg(long, default_value_t = 0.2)]
    pub(crate) gamma: f64,
}

impl Default for MultiImpactArgs {
    fn default() -> Self {
        let weights = QualityWeights::default();
        Self {
            market: 75.0,
            technology: 80.0,
            assignee: 70.0,
            alpha: weights.alpha,
            beta: weights.beta,
            gamma: weights.gamma,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export with one patent per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let indicators = BibliographicIndicators {
        citations_forward: args.forward,
        citations_backward: args.backward,
        claims_independent: args.independent,
        claims_dependent: args.dependent,
        family_size: args.family,
    };
    print_json(&score_patent(&indicators))
}

pub(crate) fn run_value(command: ValueCommand) -> Result<(), AppError> {
    let result = evaluate(&command)?;
    print_json(&result)
}

pub(crate) fn evaluate(command: &ValueCommand) -> Result<Value, AppError> {
    let value = match command {
        ValueCommand::Dcf(args) => to_json(&dcf(&args.cash_flows, args.discount_rate)?)?,
        ValueCommand::Rnpv(args) => to_json(&rnpv(&args.scenarios(), args.discount_rate)?)?,
        ValueCommand::RealOptions(args) => to_json(&real_options(&OptionParameters {
            underlying_value: args.underlying,
            exercise_cost: args.exercise_cost,
            years_to_expiry: args.years,
            risk_free_rate: args.rate,
            volatility: args.volatility,
        })?)?,
        ValueCommand::Cost(args) => to_json(&cost_approach(&DepreciationInputs {
            reproduction_cost: args.reproduction_cost,
            physical: args.physical,
            functional: args.functional,
            economic: args.economic,
        }))?,
        ValueCommand::Market(args) => to_json(&market_approach(
            args.comparable_price,
            &MarketAdjustments {
                territory: args.territory,
                life: args.life,
                technology: args.technology,
                revenue: args.revenue,
            },
        ))?,
        ValueCommand::QualityWeighted(args) => to_json(&quality_score_weighted(
            &args.indicators(),
            &reference_benchmarks(),
            &reference_weights(),
        ))?,
        ValueCommand::QualityMultiImpact(args) => to_json(&quality_score_multi_impact(
            args.market,
            args.technology,
            args.assignee,
            &QualityWeights {
                alpha: args.alpha,
                beta: args.beta,
                gamma: args.gamma,
            },
        )?)?,
    };
    Ok(value)
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    let drafts = PatentCsvImporter::from_path(&args.csv)?;
    let service = PortfolioService::new(Arc::new(InMemoryPortfolioRepository::default()));

    for draft in drafts {
        let number = draft.number.clone();
        match service.register(draft) {
            Ok(_) => {}
            Err(PortfolioServiceError::Repository(RepositoryError::Conflict)) => {
                warn!(patent = %number, "duplicate patent number in export; keeping first row");
            }
            Err(other) => return Err(other.into()),
        }
    }

    let vault = service.vault(&VaultFilter::default())?;
    let metrics = service.metrics()?;
    print_json(&json!({ "vault": vault, "metrics": metrics }))
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, AppError> {
    Ok(serde_json::to_value(value)?)
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
