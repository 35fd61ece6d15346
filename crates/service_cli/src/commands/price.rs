//! Price command implementation
//!
//! Simulates GBM paths for the configured market, evaluates the note on them
//! and prints the headline statistics.

use pricer_kof::mc::generate;
use pricer_kof::note::{AggregateStatistics, ExitQuota, PayoffEngine};
use serde::Serialize;
use tracing::info;

use super::OutputFormat;
use crate::config::KofConfig;
use crate::Result;

/// Statistics of one run together with the inputs that produced them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingReport {
    /// Seed used, `None` for entropy seeding
    pub seed: Option<u64>,
    pub n_paths: usize,
    pub n_steps: usize,
    /// Observations scanned per path after clamping to the path length
    pub observations: usize,
    pub quota: ExitQuota,
    pub statistics: AggregateStatistics,
    pub early_exit_percent: f64,
    /// Half-width of the 95% confidence interval around the mean
    pub confidence_95: f64,
}

/// Price the configured note
pub fn price(config: &KofConfig) -> Result<PricingReport> {
    let params = config.simulation_parameters()?;
    let terms = config.contract_terms()?;
    let quota = ExitQuota::from(config.contract.quota);

    info!(
        n_paths = params.n_paths(),
        n_steps = params.n_steps(),
        seed_fixed = params.seed_fixed(),
        ?quota,
        "Starting pricing"
    );

    let matrix = generate(&params)?;
    let engine = PayoffEngine::with_quota(&matrix, &terms, quota)?;
    let statistics = engine.statistics().clone();

    Ok(PricingReport {
        seed: params.seed_fixed().then_some(params.seed()),
        n_paths: params.n_paths(),
        n_steps: params.n_steps(),
        observations: engine.observations(),
        quota,
        early_exit_percent: statistics.early_exit_percent(),
        confidence_95: statistics.confidence_95(),
        statistics,
    })
}

/// Run the price command
pub fn run(config: &KofConfig, format: OutputFormat) -> Result<()> {
    let report = price(config)?;

    match format {
        OutputFormat::Table => print!("{}", render_table(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    info!("Pricing complete");
    Ok(())
}

/// Render a report as a two-column table
pub fn render_table(report: &PricingReport) -> String {
    let stats = &report.statistics;
    let seed = report
        .seed
        .map_or_else(|| "entropy".to_string(), |s| s.to_string());

    let rows = [
        ("Paths", report.n_paths.to_string()),
        ("Steps", report.n_steps.to_string()),
        ("Observations", report.observations.to_string()),
        ("Seed", seed),
        ("Quota", format!("{:?}", report.quota).to_lowercase()),
        ("Value", format!("{:.4}", stats.mean)),
        ("Standard error", format!("{:.4}", stats.standard_error)),
        ("95% half-width", format!("{:.4}", report.confidence_95)),
        (
            "Early exits",
            format!("{} / {}", stats.early_exit_count, stats.n_paths),
        ),
        (
            "Early-exit probability",
            format!("{:.2}%", report.early_exit_percent),
        ),
        ("5% quantile", format!("{:.4}", stats.tail_quantile)),
    ];

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("┌{}┬{}┐", "─".repeat(26), "─".repeat(22)));
    for (label, value) in &rows {
        lines.push(format!("│ {:<24} │ {:>20} │", label, value));
    }
    lines.push(format!("└{}┴{}┘", "─".repeat(26), "─".repeat(22)));
    lines.join("\n") + "\n"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuotaPolicy;
    use crate::CliError;
    use pricer_kof::PricingError;

    fn small_config(num_paths: usize) -> KofConfig {
        let mut config = KofConfig::default();
        config.simulation.num_paths = num_paths;
        config
    }

    #[test]
    fn test_price_reference_note() {
        let report = price(&small_config(500)).unwrap();

        assert_eq!(report.seed, Some(123457));
        assert_eq!(report.n_paths, 500);
        assert_eq!(report.n_steps, 240);
        // 241 prices at 20 days per observation support 11 of the 12 requested
        assert_eq!(report.observations, 11);
        assert_eq!(report.quota, ExitQuota::Sequential);
        assert_eq!(report.statistics.n_paths, 500);
        assert_eq!(
            report.early_exit_percent,
            100.0 * report.statistics.early_exit_probability
        );
    }

    #[test]
    fn test_price_is_reproducible() {
        let config = small_config(300);
        assert_eq!(price(&config).unwrap(), price(&config).unwrap());
    }

    #[test]
    fn test_entropy_run_reports_no_seed() {
        let mut config = small_config(50);
        config.simulation.seed_fixed = false;
        assert_eq!(price(&config).unwrap().seed, None);
    }

    #[test]
    fn test_flat_market_knocks_out_every_path() {
        let mut config = KofConfig::default();
        config.market.spot = 1.0;
        config.market.volatility = 0.0;
        config.market.quote_rate = 0.0;
        config.market.base_rate = 0.0;
        config.simulation.num_paths = 10;
        config.simulation.steps = Some(12);
        config.contract.strike = 1.0;
        config.contract.notional = 100.0;
        config.contract.upfront_premium = 0.0;
        config.contract.month_day = 1;
        config.contract.target_count = 10;
        config.contract.target = 0.0;

        let report = price(&config).unwrap();

        assert_eq!(report.quota, ExitQuota::Sequential);
        assert_eq!(report.statistics.mean, 0.0);
        assert_eq!(report.statistics.early_exit_count, 10);
        assert_eq!(report.statistics.early_exit_probability, 1.0);
        assert_eq!(report.observations, 12);
    }

    #[test]
    fn test_disabled_quota_is_reported() {
        let mut config = small_config(100);
        config.contract.quota = QuotaPolicy::Disabled;
        assert_eq!(price(&config).unwrap().quota, ExitQuota::Disabled);
    }

    #[test]
    fn test_single_path_fails() {
        let err = price(&small_config(1)).unwrap_err();
        assert!(matches!(
            err,
            CliError::Pricing(PricingError::DegenerateStatistics { n_samples: 1 })
        ));
    }

    #[test]
    fn test_invalid_terms_fail() {
        let mut config = small_config(100);
        config.contract.month_day = 0;
        config.simulation.steps = Some(240);
        assert!(matches!(
            price(&config).unwrap_err(),
            CliError::Pricing(PricingError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_table_rendering() {
        let report = price(&small_config(200)).unwrap();
        let table = render_table(&report);

        assert!(table.contains("Value"));
        assert!(table.contains("123457"));
        assert!(table.contains("sequential"));
        assert!(table.contains(&format!("{:.2}%", report.early_exit_percent)));
        assert_eq!(table.lines().count(), 13);
    }

    #[test]
    fn test_json_report() {
        let report = price(&small_config(200)).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();

        assert_eq!(json["seed"], 123457);
        assert_eq!(json["quota"], "sequential");
        assert_eq!(json["observations"], 11);
        assert_eq!(json["statistics"]["n_paths"], 200);
        assert!(json["statistics"]["tail_quantile"].is_number());
    }
}
