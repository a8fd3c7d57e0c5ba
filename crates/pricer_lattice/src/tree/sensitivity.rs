//! Sensitivity extraction from rolled-back lattice columns.
//!
//! Two generations of engine read price, delta and gamma off the lattice:
//!
//! | | price | delta | gamma |
//! |---|---|---|---|
//! | `Baseline` | V(0,0) | two-point slope over column 1 | central second difference over column 2 |
//! | `Enhanced` | V(2,1) | three-point slope over column 2 | central second difference over column 2 |
//!
//! The enhanced lattice carries two synthetic steps before valuation time
//! (see [`Lattice::with_refinement`]), so column 2 is centred on the spot
//! and its middle value is the baseline root value.

use pricer_core::types::PricingError;
use std::fmt;
use std::str::FromStr;

use super::induction::ValueColumn;
use super::lattice::Lattice;
use super::parametrization::TreeParameters;
use super::result::{NodeColumn, SensitivityNodes};

/// Engine generation.
///
/// # Examples
/// ```
/// use pricer_lattice::tree::Generation;
///
/// assert_eq!("enhanced".parse::<Generation>().unwrap(), Generation::Enhanced);
/// assert_eq!(Generation::Enhanced.suffix(), "_2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Generation {
    /// Greeks from columns 1 and 2 of the lattice as built
    #[default]
    Baseline,
    /// Greeks from a refined column centred on the spot
    Enhanced,
}

impl Generation {
    /// Both generations, baseline first.
    pub const ALL: [Generation; 2] = [Generation::Baseline, Generation::Enhanced];

    /// Number of shallow columns the induction must retain.
    pub const RETAINED_COLUMNS: usize = 3;

    /// Lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Generation::Baseline => "baseline",
            Generation::Enhanced => "enhanced",
        }
    }

    /// Suffix appended to method labels in reports.
    pub fn suffix(&self) -> &'static str {
        match self {
            Generation::Baseline => "",
            Generation::Enhanced => "_2",
        }
    }

    /// Builds the lattice this generation reads from.
    pub fn build_lattice(&self, spot: f64, params: &TreeParameters) -> Lattice {
        match self {
            Generation::Baseline => Lattice::build(spot, params),
            Generation::Enhanced => Lattice::with_refinement(spot, params),
        }
    }

    /// Option value at valuation time.
    ///
    /// # Errors
    /// `Configuration` if the required column was not retained.
    pub fn price(&self, columns: &[ValueColumn]) -> Result<f64, PricingError> {
        match self {
            Generation::Baseline => Ok(value_column(columns, 0, "price")?.value(0)),
            Generation::Enhanced => Ok(value_column(columns, 2, "price")?.value(1)),
        }
    }

    /// First derivative with respect to the spot.
    ///
    /// # Errors
    /// - `Configuration` if the lattice has too few columns
    /// - `NumericDegenerate` if adjacent levels coincide
    pub fn delta(&self, lattice: &Lattice, columns: &[ValueColumn]) -> Result<f64, PricingError> {
        match self {
            Generation::Baseline => {
                let column = value_column(columns, 1, "delta")?;
                two_point_delta(lattice.column(1), column.values())
            }
            Generation::Enhanced => {
                let column = value_column(columns, 2, "delta")?;
                three_point_delta(lattice.column(2), column.values())
            }
        }
    }

    /// Second derivative with respect to the spot.
    ///
    /// # Errors
    /// - `Configuration` if the lattice has too few columns
    /// - `NumericDegenerate` if adjacent levels coincide
    pub fn gamma(&self, lattice: &Lattice, columns: &[ValueColumn]) -> Result<f64, PricingError> {
        let column = value_column(columns, 2, "gamma")?;
        central_gamma(lattice.column(2), column.values())
    }

    /// Collects the columns delta and gamma are read from.
    ///
    /// # Errors
    /// `Configuration` if either column was not retained.
    pub fn nodes(
        &self,
        lattice: &Lattice,
        columns: &[ValueColumn],
    ) -> Result<SensitivityNodes, PricingError> {
        let delta_step = match self {
            Generation::Baseline => 1,
            Generation::Enhanced => 2,
        };
        let node_column = |step: usize, quantity: &str| -> Result<NodeColumn, PricingError> {
            let column = value_column(columns, step, quantity)?;
            Ok(NodeColumn {
                step,
                levels: lattice.column(step).to_vec(),
                values: column.values().to_vec(),
            })
        };

        Ok(SensitivityNodes {
            delta: node_column(delta_step, "delta")?,
            gamma: node_column(2, "gamma")?,
        })
    }
}

impl FromStr for Generation {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" | "base" | "1" => Ok(Generation::Baseline),
            "enhanced" | "enh" | "2" | "_2" => Ok(Generation::Enhanced),
            _ => Err(PricingError::invalid_parameter(format!(
                "Unknown generation: {s}"
            ))),
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn value_column<'a>(
    columns: &'a [ValueColumn],
    step: usize,
    quantity: &str,
) -> Result<&'a ValueColumn, PricingError> {
    columns
        .get(step)
        .filter(|column| column.step() == step)
        .ok_or_else(|| {
            PricingError::configuration(format!(
                "lattice has {} shallow columns, {quantity} needs column {step}",
                columns.len()
            ))
        })
}

fn spacing(lower: f64, upper: f64) -> Result<f64, PricingError> {
    let h = upper - lower;
    if h > 0.0 && h.is_finite() {
        Ok(h)
    } else {
        Err(PricingError::numeric_degenerate(format!(
            "level spacing {h} between {lower} and {upper}"
        )))
    }
}

/// Slope between the two nodes of a two-node column.
///
/// # Errors
/// `NumericDegenerate` if the two levels coincide.
pub fn two_point_delta(levels: &[f64], values: &[f64]) -> Result<f64, PricingError> {
    let h = spacing(levels[0], levels[1])?;
    Ok((values[1] - values[0]) / h)
}

/// Non-uniform three-point first derivative at the middle node.
///
/// With h₁ = S₁ - S₀ and h₂ = S₂ - S₁:
///
/// Δ = -h₂/(h₁(h₁+h₂))·V₀ + (h₂-h₁)/(h₁h₂)·V₁ + h₁/(h₂(h₁+h₂))·V₂
///
/// # Errors
/// `NumericDegenerate` if adjacent levels coincide.
pub fn three_point_delta(levels: &[f64], values: &[f64]) -> Result<f64, PricingError> {
    let h1 = spacing(levels[0], levels[1])?;
    let h2 = spacing(levels[1], levels[2])?;
    Ok(-h2 / (h1 * (h1 + h2)) * values[0]
        + (h2 - h1) / (h1 * h2) * values[1]
        + h1 / (h2 * (h1 + h2)) * values[2])
}

/// Central second difference over a three-node column.
///
/// Γ = (Δᵤ - Δ_d) / ((S₂ - S₀) / 2), with one-sided slopes Δᵤ and Δ_d.
///
/// # Errors
/// `NumericDegenerate` if adjacent levels coincide.
pub fn central_gamma(levels: &[f64], values: &[f64]) -> Result<f64, PricingError> {
    let h1 = spacing(levels[0], levels[1])?;
    let h2 = spacing(levels[1], levels[2])?;
    let delta_up = (values[2] - values[1]) / h2;
    let delta_down = (values[1] - values[0]) / h1;
    Ok((delta_up - delta_down) / (0.5 * (levels[2] - levels[0])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ==========================================================
    // Finite differences
    // ==========================================================

    #[test]
    fn test_three_point_delta_exact_on_quadratics() {
        let f = |x: f64| 3.0 * x * x - 2.0 * x + 1.0;
        let levels = [90.0, 100.0, 112.0];
        let values = levels.map(f);
        let delta = three_point_delta(&levels, &values).unwrap();
        assert_relative_eq!(delta, 6.0 * 100.0 - 2.0, max_relative = 1e-12);
    }

    #[test]
    fn test_central_gamma_exact_on_quadratics() {
        let f = |x: f64| 0.5 * x * x + x;
        let levels = [80.0, 100.0, 125.0];
        let values = levels.map(f);
        assert_relative_eq!(central_gamma(&levels, &values).unwrap(), 1.0, max_relative = 1e-12);
    }

    #[test]
    fn test_two_point_delta() {
        assert_eq!(two_point_delta(&[90.0, 110.0], &[1.0, 11.0]).unwrap(), 0.5);
    }

    #[test]
    fn test_zero_spacing_is_degenerate() {
        assert!(matches!(
            two_point_delta(&[100.0, 100.0], &[1.0, 2.0]),
            Err(PricingError::NumericDegenerate(_))
        ));
        assert!(matches!(
            central_gamma(&[90.0, 100.0, 100.0], &[1.0, 2.0, 3.0]),
            Err(PricingError::NumericDegenerate(_))
        ));
    }

    // ==========================================================
    // Column lookup
    // ==========================================================

    #[test]
    fn test_missing_column_is_configuration_error() {
        let err = Generation::Baseline.price(&[]).unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    // ==========================================================
    // Parsing
    // ==========================================================

    #[test]
    fn test_generation_names() {
        for generation in Generation::ALL {
            assert_eq!(generation.name().parse::<Generation>().unwrap(), generation);
        }
        assert_eq!("_2".parse::<Generation>().unwrap(), Generation::Enhanced);
        assert!("third".parse::<Generation>().is_err());
        assert_eq!(Generation::Baseline.suffix(), "");
        assert_eq!(Generation::default(), Generation::Baseline);
    }
}
