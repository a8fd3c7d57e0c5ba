//! Backward induction over a lattice.
//!
//! One routine serves both engine generations: terminal payoffs are
//! discounted back column by column in a single reused buffer, and only
//! the shallowest columns are kept for sensitivity extraction.

use tracing::trace;

use super::lattice::Lattice;
use super::parametrization::TreeParameters;
use crate::instruments::ContractSpec;

/// Discounted option values of one lattice column.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueColumn {
    step: usize,
    values: Vec<f64>,
}

impl ValueColumn {
    /// Column index in the lattice.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Option values, lowest underlying level first.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Option value at node `j`.
    ///
    /// # Panics
    /// Panics if `j` is outside the column.
    #[inline]
    pub fn value(&self, j: usize) -> f64 {
        self.values[j]
    }
}

/// Rolls terminal payoffs back to column 0.
///
/// # Arguments
/// * `lattice` - Underlying levels
/// * `params` - Up probability and per-step discount
/// * `contract` - Payoff at the terminal column
/// * `keep` - Number of shallowest columns to retain
///
/// # Returns
/// The retained columns, shallowest first. At most `lattice.columns()`
/// columns are returned, so a short lattice yields fewer than `keep`.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketSnapshot;
/// use pricer_lattice::instruments::{ContractSpec, OptionType};
/// use pricer_lattice::tree::{roll_back, Lattice, TreeMethod};
///
/// let market = MarketSnapshot::new(100.0, 0.04, 0.0, 0.25).unwrap();
/// let contract = ContractSpec::new(OptionType::Call, 120.0, 1.0).unwrap();
/// let params = TreeMethod::CoxRossRubinstein.parametrize(&market, &contract, 1).unwrap();
/// let lattice = Lattice::build(100.0, &params);
///
/// let columns = roll_back(&lattice, &params, &contract, 3);
/// assert_eq!(columns.len(), 2);
/// assert_eq!(columns[0].step(), 0);
/// assert_eq!(columns[1].values().len(), 2);
/// ```
pub fn roll_back(
    lattice: &Lattice,
    params: &TreeParameters,
    contract: &ContractSpec,
    keep: usize,
) -> Vec<ValueColumn> {
    let last = lattice.steps();
    let keep = keep.min(lattice.columns());
    let p = params.probability_up();
    let q = params.probability_down();
    let disc = params.discount_per_step();

    let mut values: Vec<f64> = lattice
        .terminal()
        .iter()
        .map(|&level| contract.payoff(level))
        .collect();

    let mut retained = Vec::with_capacity(keep);
    if last < keep {
        retained.push(ValueColumn {
            step: last,
            values: values.clone(),
        });
    }

    for i in (0..last).rev() {
        for j in 0..=i {
            values[j] = disc * (p * values[j + 1] + q * values[j]);
        }
        values.truncate(i + 1);

        if i < keep {
            retained.push(ValueColumn {
                step: i,
                values: values.clone(),
            });
        }
    }
    retained.reverse();

    trace!(
        method = params.method().name(),
        columns = lattice.columns(),
        retained = retained.len(),
        "Backward induction complete"
    );

    retained
}
