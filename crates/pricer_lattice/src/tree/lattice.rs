//! Triangular lattice of underlying levels.
//!
//! Levels are stored in one flat arena: column `i` holds `i + 1` nodes and
//! starts at offset `i(i+1)/2`. Node `(i, j)` carries
//!
//! S · u^(j - k) · d^(i - j - k)
//!
//! where `k` is the number of synthetic refinement step pairs. With `k = 1`
//! the lattice gains two leading columns and column 2 is centred on the
//! spot (`S·d/u, S, S·u/d`). Every level is computed with integer powers,
//! so the part of a refined lattice below its origin reproduces the plain
//! lattice bit for bit.

use super::parametrization::TreeParameters;

/// Flat triangular arena of underlying levels.
///
/// Built once per pricing call and read-only afterwards.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketSnapshot;
/// use pricer_lattice::instruments::{ContractSpec, OptionType};
/// use pricer_lattice::tree::{Lattice, TreeMethod};
///
/// let market = MarketSnapshot::new(100.0, 0.04, 0.0, 0.25).unwrap();
/// let contract = ContractSpec::new(OptionType::Call, 120.0, 1.0).unwrap();
/// let params = TreeMethod::CoxRossRubinstein.parametrize(&market, &contract, 4).unwrap();
///
/// let lattice = Lattice::build(100.0, &params);
/// assert_eq!(lattice.columns(), 5);
/// assert_eq!(lattice.level(0, 0), 100.0);
///
/// let refined = Lattice::with_refinement(100.0, &params);
/// assert_eq!(refined.columns(), 7);
/// assert_eq!(refined.origin(), 2);
/// assert_eq!(refined.level(2, 1), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    levels: Vec<f64>,
    columns: usize,
    refinement: usize,
}

impl Lattice {
    /// Builds the plain lattice rooted at `spot`.
    pub fn build(spot: f64, params: &TreeParameters) -> Self {
        Self::assemble(spot, params, 0)
    }

    /// Builds the lattice with two synthetic leading steps.
    ///
    /// The valuation-time column is column 2 and its middle node sits at
    /// `spot`.
    pub fn with_refinement(spot: f64, params: &TreeParameters) -> Self {
        Self::assemble(spot, params, 1)
    }

    fn assemble(spot: f64, params: &TreeParameters, refinement: usize) -> Self {
        let columns = params.steps() + 2 * refinement + 1;
        let (up, down) = (params.up(), params.down());
        let k = refinement as i32;

        let mut levels = Vec::with_capacity(columns * (columns + 1) / 2);
        for i in 0..columns {
            for j in 0..=i {
                let ups = j as i32 - k;
                let downs = (i - j) as i32 - k;
                levels.push(spot * up.powi(ups) * down.powi(downs));
            }
        }

        Self {
            levels,
            columns,
            refinement,
        }
    }

    #[inline]
    fn offset(i: usize) -> usize {
        i * (i + 1) / 2
    }

    /// Number of columns (time slices), including synthetic ones.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of steps from the first to the last column.
    #[inline]
    pub fn steps(&self) -> usize {
        self.columns - 1
    }

    /// Number of synthetic refinement step pairs (0 or 1).
    #[inline]
    pub fn refinement(&self) -> usize {
        self.refinement
    }

    /// Column that sits at valuation time.
    #[inline]
    pub fn origin(&self) -> usize {
        2 * self.refinement
    }

    /// Underlying level at node `(i, j)`.
    ///
    /// # Panics
    /// Panics if `i >= columns()` or `j > i`.
    #[inline]
    pub fn level(&self, i: usize, j: usize) -> f64 {
        assert!(j <= i, "node index {j} outside column {i}");
        self.levels[Self::offset(i) + j]
    }

    /// All levels of column `i`, lowest first.
    ///
    /// # Panics
    /// Panics if `i >= columns()`.
    #[inline]
    pub fn column(&self, i: usize) -> &[f64] {
        let start = Self::offset(i);
        &self.levels[start..start + i + 1]
    }

    /// Levels at maturity.
    #[inline]
    pub fn terminal(&self) -> &[f64] {
        self.column(self.columns - 1)
    }
}
