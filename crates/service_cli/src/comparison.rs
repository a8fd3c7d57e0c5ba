//! Lattice-versus-benchmark comparison runs.
//!
//! A run prices the configured contract with the closed-form
//! Black-Scholes-Merton model, then with every configured
//! (method, generation) engine, and records each engine's Greeks, their
//! differences from the benchmark and the wall-clock time spent.

use std::time::Instant;

use pricer_core::types::{Date, DayCountConvention, PricingError};
use pricer_lattice::analytical::{AnalyticGreeks, BlackScholes};
use pricer_lattice::instruments::OptionType;
use pricer_lattice::tree::{BinomialEngine, PricingResult};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ScenarioConfig;
use crate::{CliError, Result};

/// Label of the analytic benchmark row.
pub const BENCHMARK_LABEL: &str = "BlackScholes";

/// Resolved inputs of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioSummary {
    /// Call or put
    pub option_type: OptionType,
    /// Strike price
    pub strike: f64,
    /// Settlement date
    pub settlement_date: Date,
    /// Maturity date
    pub maturity_date: Date,
    /// Day count used for the expiry
    pub day_count: DayCountConvention,
    /// Year fraction from settlement to maturity
    pub expiry: f64,
    /// Valuation date
    pub evaluation_date: Date,
    /// Spot price
    pub spot: f64,
    /// Risk-free rate
    pub rate: f64,
    /// Dividend yield
    pub dividend_yield: f64,
    /// Volatility
    pub volatility: f64,
    /// Requested steps
    pub steps: usize,
}

/// One line of a comparison report.
///
/// Differences are `engine - benchmark`; they are zero on the benchmark row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// Engine label, e.g. `Tian_2`
    pub label: String,
    /// Effective steps; empty for the benchmark
    pub steps: Option<usize>,
    /// Option value
    pub price: f64,
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// ∂V/∂t
    pub theta: f64,
    /// Price difference from the benchmark
    pub price_diff: f64,
    /// Delta difference from the benchmark
    pub delta_diff: f64,
    /// Gamma difference from the benchmark
    pub gamma_diff: f64,
    /// Wall-clock time in milliseconds
    pub elapsed_ms: f64,
}

impl ComparisonRow {
    fn benchmark(greeks: &AnalyticGreeks, elapsed_ms: f64) -> Self {
        Self {
            label: BENCHMARK_LABEL.to_string(),
            steps: None,
            price: greeks.price,
            delta: greeks.delta,
            gamma: greeks.gamma,
            theta: greeks.theta,
            price_diff: 0.0,
            delta_diff: 0.0,
            gamma_diff: 0.0,
            elapsed_ms,
        }
    }

    fn from_result(result: &PricingResult, benchmark: &AnalyticGreeks, elapsed_ms: f64) -> Self {
        Self {
            label: result.label(),
            steps: Some(result.steps),
            price: result.price,
            delta: result.delta,
            gamma: result.gamma,
            theta: result.theta,
            price_diff: result.price - benchmark.price,
            delta_diff: result.delta - benchmark.delta,
            gamma_diff: result.gamma - benchmark.gamma,
            elapsed_ms,
        }
    }
}

/// An engine that could not produce a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRow {
    /// Engine label
    pub label: String,
    /// Error kind, e.g. `configuration`
    pub kind: String,
    /// Error message
    pub message: String,
}

impl FailedRow {
    fn new(engine: &BinomialEngine, error: &PricingError) -> Self {
        Self {
            label: engine_label(engine),
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Outcome of a comparison run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Resolved inputs
    pub scenario: ScenarioSummary,
    /// Analytic benchmark row
    pub benchmark: ComparisonRow,
    /// Successful engine rows, in configured order
    pub rows: Vec<ComparisonRow>,
    /// Failed engines, in configured order
    pub failures: Vec<FailedRow>,
}

impl Comparison {
    /// Number of engines attempted.
    pub fn total(&self) -> usize {
        self.rows.len() + self.failures.len()
    }

    /// Whether every engine produced a row.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turns engine failures into an error, after the report was emitted.
    ///
    /// # Errors
    /// `MethodsFailed` if any engine failed.
    pub fn ensure_complete(&self) -> Result<()> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(CliError::MethodsFailed {
                failed: self.failures.len(),
                total: self.total(),
            })
        }
    }

    /// Row with the given label, benchmark included.
    pub fn row(&self, label: &str) -> Option<&ComparisonRow> {
        std::iter::once(&self.benchmark)
            .chain(self.rows.iter())
            .find(|row| row.label == label)
    }
}

/// Report label of an engine, e.g. `CoxRossRubinstein_2`.
pub fn engine_label(engine: &BinomialEngine) -> String {
    format!("{}{}", engine.method().label(), engine.generation().suffix())
}

/// Runs the benchmark and every configured engine.
///
/// Engine failures are collected, not propagated, so that the report can
/// still show every engine that succeeded.
///
/// # Errors
/// `Pricing` if the market or contract cannot be built or the benchmark
/// is rejected.
pub fn run_comparison(config: &ScenarioConfig) -> Result<Comparison> {
    let market = config.market()?;
    let contract = config.contract()?;
    let engines = config.engines();

    info!(
        engines = engines.len(),
        steps = config.engine.steps,
        parallel = config.engine.parallel,
        "Starting comparison run"
    );

    let start = Instant::now();
    let benchmark = BlackScholes::from_market(&market)?.evaluate(&contract);
    let benchmark_ms = elapsed_ms(start);

    let evaluate = |engine: &BinomialEngine| {
        let start = Instant::now();
        let outcome = engine.calculate(&market, &contract);
        (*engine, outcome, elapsed_ms(start))
    };

    // collect() on an indexed parallel iterator preserves order
    let outcomes: Vec<_> = if config.engine.parallel {
        engines.par_iter().map(evaluate).collect()
    } else {
        engines.iter().map(evaluate).collect()
    };

    let mut rows = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (engine, outcome, ms) in outcomes {
        match outcome {
            Ok(result) => rows.push(ComparisonRow::from_result(&result, &benchmark, ms)),
            Err(e) => {
                warn!(engine = %engine_label(&engine), error = %e, "Engine failed");
                failures.push(FailedRow::new(&engine, &e));
            }
        }
    }

    info!(
        succeeded = rows.len(),
        failed = failures.len(),
        "Comparison run complete"
    );

    Ok(Comparison {
        scenario: summarize(config, contract.expiry()),
        benchmark: ComparisonRow::benchmark(&benchmark, benchmark_ms),
        rows,
        failures,
    })
}

fn summarize(config: &ScenarioConfig, expiry: f64) -> ScenarioSummary {
    let c = &config.contract;
    let m = &config.market;
    ScenarioSummary {
        option_type: c.option_type,
        strike: c.strike,
        settlement_date: c.settlement_date,
        maturity_date: c.maturity_date,
        day_count: c.day_count,
        expiry,
        evaluation_date: m.evaluation_date,
        spot: m.spot,
        rate: m.rate,
        dividend_yield: m.dividend_yield,
        volatility: m.volatility,
        steps: config.engine.steps,
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1e3
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_lattice::tree::{Generation, TreeMethod};

    fn config(steps: usize) -> ScenarioConfig {
        let mut config = ScenarioConfig::default();
        config.engine.steps = steps;
        config
    }

    #[test]
    fn test_reference_run() {
        let comparison = run_comparison(&config(300)).unwrap();

        assert!(comparison.is_complete());
        assert!(comparison.ensure_complete().is_ok());
        assert_eq!(comparison.total(), 14);
        assert_relative_eq!(comparison.benchmark.price, 4.7076072, epsilon = 1e-7);
        assert_eq!(comparison.benchmark.steps, None);

        for row in &comparison.rows {
            assert_relative_eq!(row.price_diff, row.price - comparison.benchmark.price);
            assert!(row.delta_diff.abs() < 1e-3, "{}", row.label);
            assert!(row.gamma_diff.abs() < 1e-4, "{}", row.label);
            assert!(row.elapsed_ms >= 0.0);
        }
        assert_eq!(comparison.rows[0].label, "JarrowRudd");
        assert_eq!(comparison.rows[1].label, "JarrowRudd_2");
        assert_eq!(comparison.row("Joshi4_2").unwrap().steps, Some(301));
    }

    #[test]
    fn test_parallel_run_matches_sequential() {
        let sequential = run_comparison(&config(60)).unwrap();
        let mut parallel_config = config(60);
        parallel_config.engine.parallel = true;
        let parallel = run_comparison(&parallel_config).unwrap();

        let labels = |c: &Comparison| c.rows.iter().map(|r| r.label.clone()).collect::<Vec<_>>();
        assert_eq!(labels(&sequential), labels(&parallel));
        for (s, p) in sequential.rows.iter().zip(&parallel.rows) {
            assert_eq!(s.price, p.price);
            assert_eq!(s.delta, p.delta);
            assert_eq!(s.gamma, p.gamma);
        }
    }

    #[test]
    fn test_single_step_baseline_fails_but_run_continues() {
        let mut config = config(1);
        config.engine.methods = vec![TreeMethod::CoxRossRubinstein];

        let comparison = run_comparison(&config).unwrap();
        assert_eq!(comparison.rows.len(), 1);
        assert_eq!(comparison.rows[0].label, "CoxRossRubinstein_2");
        assert_eq!(comparison.failures.len(), 1);
        assert_eq!(comparison.failures[0].label, "CoxRossRubinstein");
        assert_eq!(comparison.failures[0].kind, "configuration");

        assert!(matches!(
            comparison.ensure_complete(),
            Err(CliError::MethodsFailed { failed: 1, total: 2 })
        ));
    }

    #[test]
    fn test_invalid_market_is_an_error() {
        let mut config = config(50);
        config.market.spot = -1.0;
        assert!(matches!(run_comparison(&config), Err(CliError::Pricing(_))));
    }

    #[test]
    fn test_engine_label() {
        let engine = BinomialEngine::new(TreeMethod::AdditiveEqp, 10).with_generation(Generation::Enhanced);
        assert_eq!(engine_label(&engine), "AdditiveEQP_2");
    }
}
