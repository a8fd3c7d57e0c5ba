//! Check command implementation
//!
//! Validates the resolved configuration and prints the scenario it
//! describes.

use std::fmt::Write as _;

use tracing::info;

use crate::config::ScenarioConfig;
use crate::{CliError, Result};

/// Resolved scenario as TOML, followed by the derived expiry and the
/// engines that a `compare` run would execute.
pub fn describe(config: &ScenarioConfig) -> Result<String> {
    config.validate()?;
    let contract = config.contract()?;
    config.market()?;

    let mut out = toml::to_string_pretty(config)
        .map_err(|e| CliError::invalid_argument(format!("cannot serialise configuration: {e}")))?;

    let labels: Vec<String> = config
        .engines()
        .iter()
        .map(crate::comparison::engine_label)
        .collect();

    // Writing to a String cannot fail
    let _ = writeln!(out);
    let _ = writeln!(out, "# expiry = {:.10}", contract.expiry());
    let _ = writeln!(out, "# engines = {}", labels.join(", "));
    Ok(out)
}

/// Run the check command
pub fn run(config: &ScenarioConfig) -> Result<()> {
    let text = describe(config)?;
    print!("{text}");
    info!("Configuration OK");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_round_trips_through_toml() {
        let config = ScenarioConfig::default();
        let text = describe(&config).unwrap();

        let parsed: ScenarioConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
        assert!(text.contains("# expiry = 0.9945205479"));
        assert!(text.contains("JarrowRudd, JarrowRudd_2, CoxRossRubinstein"));
    }

    #[test]
    fn test_describe_rejects_invalid_config() {
        let mut config = ScenarioConfig::default();
        config.market.volatility = -0.2;
        assert!(matches!(describe(&config), Err(CliError::Config(_))));
    }
}
