use crate::commands::{evaluate, ValueCommand};
use crate::infra::{sample_portfolio, InMemoryPortfolioRepository};
use clap::Args;
use patent_valuation::error::AppError;
use patent_valuation::portfolio::{PortfolioService, VaultFilter};
use patent_valuation::scoring::BibliographicIndicators;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the valuation model walkthrough.
    #[arg(long)]
    pub(crate) skip_models: bool,
    /// Print each model result as full JSON instead of a one-line summary.
    #[arg(long)]
    pub(crate) verbose: bool,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        skip_models,
        verbose,
    } = args;

    println!("Patent portfolio demo");
    let service = PortfolioService::new(Arc::new(InMemoryPortfolioRepository::default()));
    service.seed(sample_portfolio())?;

    let metrics = service.metrics()?;
    println!(
        "- {} patents | avg strength {} | avg confidence {}% | {} risk alerts | {} high value",
        metrics.total,
        metrics.avg_strength,
        metrics.avg_confidence,
        metrics.risk_alerts,
        metrics.high_value
    );

    println!("\nVault (strongest first)");
    let vault = service.vault(&VaultFilter::default())?;
    for patent in &vault {
        println!(
            "  - {} {} | strength {} | {} risk | {} value",
            patent.number,
            patent.title,
            patent.score.strength_score,
            patent.score.risk_level,
            patent.score.value_proxy
        );
        println!("    + {}", patent.score.drivers_positive.join(", "));
        println!("    - {}", patent.score.drivers_negative.join(", "));
        let profile = patent.profile();
        println!(
            "    claims {} | network {} | coverage {}",
            profile.claim_breadth, profile.network_strength, profile.coverage
        );
        println!("    > {}", profile.recommended_action);
    }

    println!("\nWorkstreams");
    for workstream in service.workstreams()? {
        println!(
            "  - {} ({}) {}% complete",
            workstream.name, workstream.stage, workstream.progress
        );
    }

    if let Some(weakest) = vault.last() {
        let revised = BibliographicIndicators {
            citations_forward: weakest.indicators.citations_forward + 6,
            family_size: weakest.indicators.family_size + 2,
            ..weakest.indicators
        };
        let updated = service.rescore(weakest.id, revised)?;
        println!(
            "\nRescored {} after new citations: strength {} -> {}",
            updated.number, weakest.score.strength_score, updated.score.strength_score
        );
    }

    println!("\nIntelligence feed");
    for entry in service.intelligence(5)? {
        println!("  - {}: {}", entry.title, entry.detail);
    }

    if skip_models {
        return Ok(());
    }

    println!("\nValuation models (form defaults)");
    for (label, command) in ValueCommand::with_form_defaults() {
        let result = evaluate(&command)?;
        if verbose {
            println!("{label}:");
            crate::commands::print_json(&result)?;
        } else {
            println!("  - {label}: {}", headline(&result));
        }
    }

    Ok(())
}

/// First headline figure a model reports.
fn headline(result: &serde_json::Value) -> String {
    const KEYS: [&str; 5] = [
        "presentValue",
        "riskAdjustedValue",
        "optionValue",
        "adjustedValue",
        "qualityScore",
    ];

    KEYS.iter()
        .find_map(|key| {
            result
                .get(*key)
                .and_then(serde_json::Value::as_f64)
                .map(|value| format!("{key} = {value:.2}"))
        })
        .unwrap_or_else(|| result.to_string())
}
