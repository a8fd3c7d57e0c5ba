//! Compare command implementation
//!
//! Runs every configured engine against the Black-Scholes benchmark and
//! emits a report.

use std::path::Path;

use tracing::info;

use crate::comparison::run_comparison;
use crate::config::ScenarioConfig;
use crate::report::{render, write_output};
use crate::Result;

/// Run the compare command
///
/// The report is written before engine failures are turned into an error,
/// so a partial run still shows every engine that succeeded.
pub fn run(config: &ScenarioConfig, output: Option<&Path>) -> Result<()> {
    config.validate()?;

    let comparison = run_comparison(config)?;
    let text = render(&comparison, config.output.format)?;
    write_output(&text, output)?;

    if let Some(path) = output {
        info!(path = %path.display(), format = %config.output.format, "Report written");
    }

    comparison.ensure_complete()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;
    use crate::CliError;
    use pricer_lattice::tree::TreeMethod;

    #[test]
    fn test_writes_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let mut config = ScenarioConfig::default();
        config.engine.steps = 30;
        config.output.format = OutputFormat::Json;
        run(&config, Some(&path)).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 14);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_pricing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        let mut config = ScenarioConfig::default();
        config.engine.steps = 0;
        assert!(matches!(run(&config, Some(&path)), Err(CliError::Config(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_partial_run_writes_report_then_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");

        let mut config = ScenarioConfig::default();
        config.engine.steps = 1;
        config.engine.methods = vec![TreeMethod::Trigeorgis];
        config.output.format = OutputFormat::Csv;

        let result = run(&config, Some(&path));
        assert!(matches!(
            result,
            Err(CliError::MethodsFailed { failed: 1, total: 2 })
        ));

        let csv = std::fs::read_to_string(&path).unwrap();
        assert!(csv.contains("Trigeorgis_2,1,"));
    }
}
