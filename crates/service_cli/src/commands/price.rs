//! Price command implementation
//!
//! Values the configured contract with a single lattice engine.

use std::path::Path;

use pricer_lattice::tree::{BinomialEngine, Generation, PricingResult, TreeMethod};
use tracing::info;

use crate::config::ScenarioConfig;
use crate::report::{render_result, write_output, OutputFormat};
use crate::Result;

/// Prices the configured scenario with one engine.
///
/// The result carries the sensitivity columns its delta and gamma were
/// read from.
pub fn evaluate(
    config: &ScenarioConfig,
    method: TreeMethod,
    generation: Generation,
) -> Result<PricingResult> {
    config.validate()?;

    let market = config.market()?;
    let contract = config.contract()?;
    let engine = BinomialEngine::new(method, config.engine.steps)
        .with_generation(generation)
        .with_diagnostics(true);

    info!(
        method = method.name(),
        generation = generation.name(),
        steps = config.engine.steps,
        "Pricing single engine"
    );
    Ok(engine.calculate(&market, &contract)?)
}

/// Run the price command
pub fn run(
    config: &ScenarioConfig,
    method: TreeMethod,
    generation: Generation,
    output: Option<&Path>,
) -> Result<()> {
    let result = evaluate(config, method, generation)?;

    let text = match config.output.format {
        OutputFormat::Table => render_result(&result),
        OutputFormat::Json => serde_json::to_string_pretty(&result)? + "\n",
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(["label", "steps", "price", "delta", "gamma", "theta"])?;
            writer.write_record([
                result.label(),
                result.steps.to_string(),
                result.price.to_string(),
                result.delta.to_string(),
                result.gamma.to_string(),
                result.theta.to_string(),
            ])?;
            let bytes = writer.into_inner().map_err(|e| e.into_error())?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };

    write_output(&text, output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_core::types::PricingError;
    use crate::CliError;

    #[test]
    fn test_evaluate_reference_call() {
        let mut config = ScenarioConfig::default();
        config.engine.steps = 300;

        let result = evaluate(&config, TreeMethod::Joshi4, Generation::Enhanced).unwrap();
        assert_eq!(result.label(), "Joshi4_2");
        assert_eq!(result.steps, 301);
        assert_relative_eq!(result.price, 4.7076072, epsilon = 1e-6);
        assert!(result.nodes.is_some());
    }

    #[test]
    fn test_shallow_baseline_reports_configuration_error() {
        let mut config = ScenarioConfig::default();
        config.engine.steps = 1;

        let err = evaluate(&config, TreeMethod::CoxRossRubinstein, Generation::Baseline).unwrap_err();
        assert!(matches!(err, CliError::Pricing(PricingError::Configuration(_))));
    }

    #[test]
    fn test_csv_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("price.csv");

        let mut config = ScenarioConfig::default();
        config.output.format = OutputFormat::Csv;
        run(&config, TreeMethod::Tian, Generation::Baseline, Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "label,steps,price,delta,gamma,theta");
        assert!(lines[1].starts_with("Tian,100,"));
    }
}
