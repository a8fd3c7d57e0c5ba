//! Pricing results produced by the lattice engines.

use super::parametrization::TreeMethod;
use super::sensitivity::Generation;

/// Levels and option values of one column used for a sensitivity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeColumn {
    /// Column index in the lattice
    pub step: usize,
    /// Underlying levels, lowest first
    pub levels: Vec<f64>,
    /// Option values at those levels
    pub values: Vec<f64>,
}

/// Columns the delta and gamma of a result were read from.
///
/// Baseline engines read delta from column 1 and gamma from column 2;
/// enhanced engines read both from the valuation-time column.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensitivityNodes {
    /// Column used for delta
    pub delta: NodeColumn,
    /// Column used for gamma
    pub gamma: NodeColumn,
}

/// Price and Greeks from one lattice engine.
///
/// `theta` follows from the Black-Scholes PDE,
/// θ = rV - (r - q)·S·Δ - σ²S²Γ/2.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PricingResult {
    /// Tree parametrization
    pub method: TreeMethod,
    /// Engine generation
    pub generation: Generation,
    /// Effective number of real time steps
    pub steps: usize,
    /// Option value
    pub price: f64,
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// ∂V/∂t
    pub theta: f64,
    /// Sensitivity columns, when diagnostics were requested
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub nodes: Option<SensitivityNodes>,
}

impl PricingResult {
    /// Report label, e.g. `CoxRossRubinstein` or `CoxRossRubinstein_2`.
    pub fn label(&self) -> String {
        format!("{}{}", self.method.label(), self.generation.suffix())
    }
}
