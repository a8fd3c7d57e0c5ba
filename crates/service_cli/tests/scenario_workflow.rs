//! End-to-end tests: scenario file -> overrides -> comparison -> report.

use std::collections::HashMap;
use std::io::Write;

use approx::assert_relative_eq;
use pricer_lattice::tree::{Generation, TreeMethod};
use service_cli::commands;
use service_cli::comparison::{run_comparison, BENCHMARK_LABEL};
use service_cli::config::{ConfigError, ScenarioConfig};
use service_cli::report::{render, OutputFormat};
use service_cli::CliError;

const PUT_SCENARIO: &str = r#"
[contract]
option_type = "put"
strike = 100.0
settlement_date = "2023-06-30"
maturity_date = "2024-06-30"
day_count = "ACT/365F"

[market]
evaluation_date = "2023-06-30"
spot = 100.0
rate = 0.05
dividend_yield = 0.02
volatility = 0.2

[engine]
steps = 200
methods = ["crr", "lr", "j4"]
"#;

fn write_scenario(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_scenario_comparison() {
    let file = write_scenario(PUT_SCENARIO);
    let config = ScenarioConfig::load(file.path()).unwrap();
    config.validate().unwrap();

    let comparison = run_comparison(&config).unwrap();
    assert!(comparison.is_complete());
    assert_eq!(comparison.total(), 6);
    assert!(comparison.benchmark.delta < 0.0);

    // 2024 is a leap year: 366 days on ACT/365F
    assert_relative_eq!(comparison.scenario.expiry, 366.0 / 365.0, epsilon = 1e-15);

    for row in &comparison.rows {
        assert!(row.price_diff.abs() < 2e-2, "{}: {}", row.label, row.price_diff);
        assert!(row.delta_diff.abs() < 1e-3, "{}", row.label);
    }
    let lr = comparison.row("LeisenReimer").unwrap();
    let lr_2 = comparison.row("LeisenReimer_2").unwrap();
    assert_eq!(lr.steps, Some(201));
    assert_relative_eq!(lr.price, lr_2.price, max_relative = 1e-10);
    assert!(comparison.row(BENCHMARK_LABEL).is_some());
}

#[test]
fn test_environment_overrides_file() {
    let file = write_scenario(PUT_SCENARIO);
    let env: HashMap<&str, &str> = [
        ("TREECMP_STEPS", "41"),
        ("TREECMP_METHODS", "tian"),
        ("TREECMP_GENERATIONS", "enhanced"),
        ("TREECMP_FORMAT", "csv"),
    ]
    .into_iter()
    .collect();

    let config = ScenarioConfig::load(file.path())
        .unwrap()
        .with_overrides_from(|key| env.get(key).map(|v| v.to_string()))
        .unwrap();

    assert_eq!(config.engine.steps, 41);
    assert_eq!(config.engine.methods, vec![TreeMethod::Tian]);
    assert_eq!(config.engine.generations, vec![Generation::Enhanced]);
    assert_eq!(config.contract.strike, 100.0);

    let comparison = run_comparison(&config).unwrap();
    let csv = render(&comparison, config.output.format).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[2].starts_with("Tian_2,41,"));
}

#[test]
fn test_malformed_file_is_a_parse_error() {
    let file = write_scenario("[engine]\nsteps = \"many\"\n");
    assert!(matches!(
        ScenarioConfig::load(file.path()),
        Err(ConfigError::Parse(_))
    ));

    let file = write_scenario("[engine]\nmethods = [\"binomial\"]\n");
    assert!(matches!(
        ScenarioConfig::load(file.path()),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_compare_command_writes_every_format() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = ScenarioConfig::default();
    config.engine.steps = 20;
    config.engine.parallel = true;

    for format in [OutputFormat::Table, OutputFormat::Json, OutputFormat::Csv] {
        config.output.format = format;
        let path = dir.path().join(format!("report.{}", format.extension()));
        commands::compare::run(&config, Some(&path)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Joshi4_2"), "{format}");
    }
}

#[test]
fn test_single_step_run_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.txt");

    let mut config = ScenarioConfig::default();
    config.engine.steps = 1;

    let err = commands::compare::run(&config, Some(&path)).unwrap_err();
    match err {
        CliError::MethodsFailed { failed, total } => {
            assert_eq!(total, 14);
            assert!(failed > 0 && failed < total);
        }
        other => panic!("Expected MethodsFailed, got {other:?}"),
    }

    let table = std::fs::read_to_string(&path).unwrap();
    assert!(table.contains("FAILED CoxRossRubinstein"));
    assert!(table.contains("CoxRossRubinstein_2"));
}
