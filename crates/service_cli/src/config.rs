//! Scenario configuration management.
//!
//! Loads the `treecmp.toml` scenario (contract, market, engine and output
//! sections), applies `TREECMP_*` environment overrides and validates the
//! result before any lattice is built. Every field has a default, so an
//! empty file (or no file at all) describes the reference scenario: a
//! one-year call struck at 120 on a spot of 100.

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use pricer_core::types::{Date, DayCountConvention, MarketSnapshot, PricingError};
use pricer_lattice::instruments::{ContractSpec, OptionType};
use pricer_lattice::tree::{BinomialEngine, Generation, TreeMethod};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::OutputFormat;

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "treecmp.toml";

/// Prefix of the environment variables that override file values.
pub const ENV_PREFIX: &str = "TREECMP_";

/// Largest accepted step count; lattices hold O(N²) nodes.
pub const MAX_STEPS: usize = 10_000;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Option contract section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContractSection {
    /// Call or put
    pub option_type: OptionType,
    /// Strike price
    pub strike: f64,
    /// Date the option starts accruing time value
    pub settlement_date: Date,
    /// Exercise date
    pub maturity_date: Date,
    /// Convention converting settlement -> maturity into a year fraction
    pub day_count: DayCountConvention,
}

impl Default for ContractSection {
    fn default() -> Self {
        Self {
            option_type: OptionType::Call,
            strike: 120.0,
            settlement_date: reference_date(2019, 2, 28),
            maturity_date: reference_date(2020, 2, 26),
            day_count: DayCountConvention::Actual365Fixed,
        }
    }
}

/// Market data section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarketSection {
    /// Valuation date
    pub evaluation_date: Date,
    /// Spot price of the underlying
    pub spot: f64,
    /// Continuously compounded risk-free rate
    pub rate: f64,
    /// Continuous dividend yield
    pub dividend_yield: f64,
    /// Black volatility
    pub volatility: f64,
}

impl Default for MarketSection {
    fn default() -> Self {
        Self {
            evaluation_date: reference_date(2019, 2, 26),
            spot: 100.0,
            rate: 0.04,
            dividend_yield: 0.0,
            volatility: 0.25,
        }
    }
}

/// Engine selection section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSection {
    /// Requested number of time steps
    pub steps: usize,
    /// Tree parametrizations to run, in report order
    pub methods: Vec<TreeMethod>,
    /// Generations to run for every method
    pub generations: Vec<Generation>,
    /// Fan engines out across the rayon pool
    pub parallel: bool,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            steps: 100,
            methods: TreeMethod::ALL.to_vec(),
            generations: Generation::ALL.to_vec(),
            parallel: false,
        }
    }
}

/// Report output section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    /// Report format
    pub format: OutputFormat,
    /// Default tracing level when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            log_level: "warn".to_string(),
        }
    }
}

/// Full `treecmp` scenario.
///
/// # Examples
/// ```
/// use service_cli::config::ScenarioConfig;
///
/// let config: ScenarioConfig = toml::from_str(
///     r#"
///     [engine]
///     steps = 301
///     methods = ["leisen-reimer", "joshi4"]
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.engine.steps, 301);
/// assert_eq!(config.engines().len(), 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Option contract
    pub contract: ContractSection,
    /// Market data
    pub market: MarketSection,
    /// Engine selection
    pub engine: EngineSection,
    /// Report output
    pub output: OutputSection,
}

impl ScenarioConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Parse` if it is not a valid scenario.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from `path`, falling back to the defaults when the
    /// file does not exist. A file that exists but fails to parse is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `TREECMP_*` environment variable overrides.
    pub fn with_env_override(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Keys are the upper-case field names with the `TREECMP_` prefix, e.g.
    /// `TREECMP_STEPS` or `TREECMP_DIVIDEND_YIELD`. List-valued keys
    /// (`TREECMP_METHODS`, `TREECMP_GENERATIONS`) take comma-separated names.
    ///
    /// # Errors
    /// `Environment` if a present value does not parse.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            let key = format!("{ENV_PREFIX}{name}");
            lookup(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = get("OPTION_TYPE") {
            self.contract.option_type = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("STRIKE") {
            self.contract.strike = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("SETTLEMENT_DATE") {
            self.contract.settlement_date = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("MATURITY_DATE") {
            self.contract.maturity_date = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("DAY_COUNT") {
            self.contract.day_count = parse_override(&key, &value)?;
        }

        if let Some((key, value)) = get("EVALUATION_DATE") {
            self.market.evaluation_date = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("SPOT") {
            self.market.spot = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("RATE") {
            self.market.rate = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("DIVIDEND_YIELD") {
            self.market.dividend_yield = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("VOLATILITY") {
            self.market.volatility = parse_override(&key, &value)?;
        }

        if let Some((key, value)) = get("STEPS") {
            self.engine.steps = parse_override(&key, &value)?;
        }
        if let Some((key, value)) = get("METHODS") {
            self.engine.methods = parse_list(&key, &value)?;
        }
        if let Some((key, value)) = get("GENERATIONS") {
            self.engine.generations = parse_list(&key, &value)?;
        }
        if let Some((key, value)) = get("PARALLEL") {
            self.engine.parallel = parse_override(&key, &value.to_lowercase())?;
        }

        if let Some((key, value)) = get("FORMAT") {
            self.output.format = parse_override(&key, &value)?;
        }
        if let Some((_, value)) = get("LOG_LEVEL") {
            self.output.log_level = value;
        }

        Ok(self)
    }

    /// Validate the configuration, collecting every problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let contract = &self.contract;
        let market = &self.market;

        if !(contract.strike.is_finite() && contract.strike > 0.0) {
            errors.push(format!("strike must be positive, got {}", contract.strike));
        }
        if contract.maturity_date <= contract.settlement_date {
            errors.push(format!(
                "maturity_date {} must be after settlement_date {}",
                contract.maturity_date, contract.settlement_date
            ));
        }
        if contract.settlement_date < market.evaluation_date {
            errors.push(format!(
                "settlement_date {} precedes evaluation_date {}",
                contract.settlement_date, market.evaluation_date
            ));
        }

        if !(market.spot.is_finite() && market.spot > 0.0) {
            errors.push(format!("spot must be positive, got {}", market.spot));
        }
        if !market.rate.is_finite() {
            errors.push(format!("rate must be finite, got {}", market.rate));
        }
        if !market.dividend_yield.is_finite() {
            errors.push(format!(
                "dividend_yield must be finite, got {}",
                market.dividend_yield
            ));
        }
        if !(market.volatility.is_finite() && market.volatility > 0.0) {
            errors.push(format!(
                "volatility must be positive, got {}",
                market.volatility
            ));
        }

        if self.engine.steps == 0 {
            errors.push("steps must be at least 1".to_string());
        }
        if self.engine.steps > MAX_STEPS {
            errors.push(format!(
                "steps {} exceeds maximum allowed ({MAX_STEPS})",
                self.engine.steps
            ));
        }
        if self.engine.methods.is_empty() {
            errors.push("methods cannot be empty".to_string());
        }
        if self.engine.generations.is_empty() {
            errors.push("generations cannot be empty".to_string());
        }

        if !VALID_LOG_LEVELS.contains(&self.output.log_level.to_lowercase().as_str()) {
            errors.push(format!(
                "Invalid log_level '{}'. Valid values: {:?}",
                self.output.log_level, VALID_LOG_LEVELS
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Market snapshot stamped with the evaluation date.
    pub fn market(&self) -> Result<MarketSnapshot, PricingError> {
        let m = &self.market;
        Ok(MarketSnapshot::new(m.spot, m.rate, m.dividend_yield, m.volatility)?
            .with_valuation_date(m.evaluation_date))
    }

    /// Contract whose expiry is the settlement -> maturity year fraction.
    pub fn contract(&self) -> Result<ContractSpec, PricingError> {
        let c = &self.contract;
        ContractSpec::from_dates(
            c.option_type,
            c.strike,
            c.settlement_date,
            c.maturity_date,
            c.day_count,
        )
    }

    /// Engines to run, method-major: every generation of the first method,
    /// then every generation of the next.
    pub fn engines(&self) -> Vec<BinomialEngine> {
        self.engine
            .methods
            .iter()
            .flat_map(|&method| {
                self.engine
                    .generations
                    .iter()
                    .map(move |&generation| {
                        BinomialEngine::new(method, self.engine.steps).with_generation(generation)
                    })
            })
            .collect()
    }
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error in config file
    #[error("Parse error: {0}")]
    Parse(String),

    /// Unparseable environment override
    #[error("Invalid value '{value}' for {key}: {message}")]
    Environment {
        /// Variable name
        key: String,
        /// Raw value
        value: String,
        /// Parser message
        message: String,
    },

    /// Validation error
    #[error("Validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

fn parse_override<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Environment {
        key: key.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn parse_list<T>(key: &str, value: &str) -> Result<Vec<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| parse_override(key, item))
        .collect()
}

// Constant calendar dates; out-of-range inputs are impossible here.
fn reference_date(year: i32, month: u32, day: u32) -> Date {
    Date::from_ymd(year, month, day).unwrap_or_else(|_| unreachable!("valid calendar date"))
}
