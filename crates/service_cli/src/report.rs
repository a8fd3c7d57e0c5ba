//! Report rendering for comparison runs.
//!
//! Three formats are supported:
//! - `table`: boxed text table preceded by the scenario, for terminals
//! - `json`: pretty-printed document with a generation timestamp
//! - `csv`: one header line and one line per successful row

use std::fmt::{self, Write as _};
use std::io::{Error as IoError, ErrorKind};
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use pricer_lattice::tree::PricingResult;
use serde::{Deserialize, Serialize};

use crate::comparison::{Comparison, ComparisonRow};
use crate::{CliError, Result};

/// Report output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Boxed text table
    #[default]
    Table,
    /// JSON document
    Json,
    /// Comma-separated values
    Csv,
}

impl OutputFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Table => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }

    /// Lower-case name
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "table" | "txt" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(CliError::invalid_argument(format!(
                "Unknown format: {other}. Supported: table, json, csv"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    comparison: &'a Comparison,
}

/// Renders a comparison in the requested format.
pub fn render(comparison: &Comparison, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(comparison)),
        OutputFormat::Json => render_json(comparison, Utc::now()),
        OutputFormat::Csv => render_csv(comparison),
    }
}

/// JSON document stamped with `generated_at`.
pub fn render_json(comparison: &Comparison, generated_at: DateTime<Utc>) -> Result<String> {
    let report = JsonReport {
        generated_at,
        comparison,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// CSV with the benchmark as the first data line. Failed engines are not
/// part of the CSV body.
pub fn render_csv(comparison: &Comparison) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.serialize(&comparison.benchmark)?;
    for row in &comparison.rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| CliError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| CliError::Io(IoError::new(ErrorKind::InvalidData, e)))
}

const LABEL_WIDTH: usize = 22;
const STEPS_WIDTH: usize = 6;
const VALUE_WIDTH: usize = 12;
const VALUE_COLUMNS: [&str; 8] = [
    "Price", "Delta", "Gamma", "Theta", "Price diff", "Delta diff", "Gamma diff", "Time (ms)",
];

/// Boxed text table preceded by the scenario block.
pub fn render_table(comparison: &Comparison) -> String {
    let mut out = String::new();
    let s = &comparison.scenario;

    // Writing to a String cannot fail
    let _ = writeln!(out, "Option type      : European {}", s.option_type);
    let _ = writeln!(out, "Settlement date  : {}", s.settlement_date);
    let _ = writeln!(out, "Maturity date    : {}", s.maturity_date);
    let _ = writeln!(out, "Expiry ({:<8}): {:.6}", s.day_count.name(), s.expiry);
    let _ = writeln!(out, "Strike           : {}", s.strike);
    let _ = writeln!(out, "Underlying price : {}", s.spot);
    let _ = writeln!(out, "Risk-free rate   : {}", s.rate);
    let _ = writeln!(out, "Dividend yield   : {}", s.dividend_yield);
    let _ = writeln!(out, "Volatility       : {}", s.volatility);
    let _ = writeln!(out, "Time steps       : {}", s.steps);
    out.push('\n');

    let widths: Vec<usize> = [LABEL_WIDTH, STEPS_WIDTH]
        .into_iter()
        .chain(VALUE_COLUMNS.iter().map(|_| VALUE_WIDTH))
        .collect();

    out.push_str(&rule(&widths, '┌', '┬', '┐'));
    let mut header = format!("│ {:<LABEL_WIDTH$} │ {:>STEPS_WIDTH$} │", "Engine", "Steps");
    for name in VALUE_COLUMNS {
        let _ = write!(header, " {name:>VALUE_WIDTH$} │");
    }
    out.push_str(&header);
    out.push('\n');
    out.push_str(&rule(&widths, '├', '┼', '┤'));

    out.push_str(&table_row(&comparison.benchmark));
    for row in &comparison.rows {
        out.push_str(&table_row(row));
    }
    out.push_str(&rule(&widths, '└', '┴', '┘'));

    if !comparison.failures.is_empty() {
        out.push('\n');
        for failure in &comparison.failures {
            let _ = writeln!(out, "FAILED {}: {}", failure.label, failure.message);
        }
    }

    out
}

/// Key/value block for a single engine valuation.
pub fn render_result(result: &PricingResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Engine : {}", result.label());
    let _ = writeln!(out, "Steps  : {}", result.steps);
    let _ = writeln!(out, "Price  : {:.10}", result.price);
    let _ = writeln!(out, "Delta  : {:.10}", result.delta);
    let _ = writeln!(out, "Gamma  : {:.10}", result.gamma);
    let _ = writeln!(out, "Theta  : {:.10}", result.theta);
    out
}

/// Writes rendered text to `path`, or stdout when `path` is `None`.
pub fn write_output(text: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, text)?,
        None => print!("{text}"),
    }
    Ok(())
}

fn rule(widths: &[usize], left: char, mid: char, right: char) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{left}{}{right}\n", segments.join(&mid.to_string()))
}

fn table_row(row: &ComparisonRow) -> String {
    let steps = row.steps.map(|n| n.to_string()).unwrap_or_default();
    let mut line = format!("│ {:<LABEL_WIDTH$} │ {steps:>STEPS_WIDTH$} │", row.label);
    let values = [
        row.price,
        row.delta,
        row.gamma,
        row.theta,
        row.price_diff,
        row.delta_diff,
        row.gamma_diff,
    ];
    for value in values {
        let _ = write!(line, " {value:>VALUE_WIDTH$.7} │");
    }
    let _ = write!(line, " {:>VALUE_WIDTH$.3} │", row.elapsed_ms);
    line.push('\n');
    line
}
