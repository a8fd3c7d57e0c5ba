//! Binomial engine facade.
//!
//! A [`BinomialEngine`] combines a parametrization, a step count and a
//! generation. Every call parametrizes the tree, builds its own lattice,
//! rolls it back and reads the requested quantities, so engines are plain
//! `Copy` values that can be shared freely between threads.

use pricer_core::types::{MarketSnapshot, PricingError};
use tracing::debug;

use super::induction::{roll_back, ValueColumn};
use super::lattice::Lattice;
use super::parametrization::{TreeMethod, TreeParameters};
use super::result::PricingResult;
use super::sensitivity::Generation;
use crate::instruments::ContractSpec;

/// Lattice pricing engine for European vanilla options.
///
/// # Examples
/// ```
/// use pricer_core::types::MarketSnapshot;
/// use pricer_lattice::instruments::{ContractSpec, OptionType};
/// use pricer_lattice::tree::{BinomialEngine, TreeMethod};
///
/// let market = MarketSnapshot::new(100.0, 0.04, 0.0, 0.25).unwrap();
/// let contract = ContractSpec::new(OptionType::Call, 120.0, 363.0 / 365.0).unwrap();
///
/// let result = BinomialEngine::enhanced(TreeMethod::Joshi4, 300)
///     .calculate(&market, &contract)
///     .unwrap();
/// assert!((result.price - 4.7076072).abs() < 1e-5);
/// assert_eq!(result.label(), "Joshi4_2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinomialEngine {
    method: TreeMethod,
    steps: usize,
    generation: Generation,
    diagnostics: bool,
}

impl BinomialEngine {
    /// Creates a baseline engine.
    pub fn new(method: TreeMethod, steps: usize) -> Self {
        Self {
            method,
            steps,
            generation: Generation::Baseline,
            diagnostics: false,
        }
    }

    /// Creates an enhanced engine.
    pub fn enhanced(method: TreeMethod, steps: usize) -> Self {
        Self::new(method, steps).with_generation(Generation::Enhanced)
    }

    /// Sets the generation.
    pub fn with_generation(mut self, generation: Generation) -> Self {
        self.generation = generation;
        self
    }

    /// Attaches the sensitivity columns to results from [`calculate`](Self::calculate).
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Tree parametrization.
    #[inline]
    pub fn method(&self) -> TreeMethod {
        self.method
    }

    /// Requested number of steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Engine generation.
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether results carry their sensitivity columns.
    #[inline]
    pub fn diagnostics(&self) -> bool {
        self.diagnostics
    }

    /// Tree factors this engine would use.
    ///
    /// # Errors
    /// Propagates parametrization failures.
    pub fn parameters(
        &self,
        market: &MarketSnapshot,
        contract: &ContractSpec,
    ) -> Result<TreeParameters, PricingError> {
        self.method.parametrize(market, contract, self.steps)
    }

    fn roll(
        &self,
        market: &MarketSnapshot,
        contract: &ContractSpec,
    ) -> Result<(TreeParameters, Lattice, Vec<ValueColumn>), PricingError> {
        let params = self.parameters(market, contract)?;
        let lattice = self.generation.build_lattice(market.spot(), &params);
        let columns = roll_back(&lattice, &params, contract, Generation::RETAINED_COLUMNS);
        Ok((params, lattice, columns))
    }

    /// Net present value.
    ///
    /// # Errors
    /// Propagates parametrization failures.
    pub fn npv(&self, market: &MarketSnapshot, contract: &ContractSpec) -> Result<f64, PricingError> {
        let (_, _, columns) = self.roll(market, contract)?;
        self.generation.price(&columns)
    }

    /// Delta read from the lattice.
    ///
    /// # Errors
    /// Propagates parametrization failures; `Configuration` if the lattice
    /// is too shallow.
    pub fn delta(&self, market: &MarketSnapshot, contract: &ContractSpec) -> Result<f64, PricingError> {
        let (_, lattice, columns) = self.roll(market, contract)?;
        self.generation.delta(&lattice, &columns)
    }

    /// Gamma read from the lattice.
    ///
    /// # Errors
    /// Propagates parametrization failures; `Configuration` if the lattice
    /// is too shallow (a baseline engine needs at least two steps).
    /// Joshi4 builds at least three steps, so its baseline gamma succeeds
    /// even when one step is requested.
    pub fn gamma(&self, market: &MarketSnapshot, contract: &ContractSpec) -> Result<f64, PricingError> {
        let (_, lattice, columns) = self.roll(market, contract)?;
        self.generation.gamma(&lattice, &columns)
    }

    /// Price, delta, gamma and theta from a single rollback.
    ///
    /// All-or-nothing: any failing quantity fails the whole call.
    ///
    /// # Errors
    /// Same as [`npv`](Self::npv), [`delta`](Self::delta) and [`gamma`](Self::gamma).
    pub fn calculate(
        &self,
        market: &MarketSnapshot,
        contract: &ContractSpec,
    ) -> Result<PricingResult, PricingError> {
        let (params, lattice, columns) = self.roll(market, contract)?;

        let price = self.generation.price(&columns)?;
        let delta = self.generation.delta(&lattice, &columns)?;
        let gamma = self.generation.gamma(&lattice, &columns)?;
        let theta = pde_theta(market, price, delta, gamma);
        let nodes = if self.diagnostics {
            Some(self.generation.nodes(&lattice, &columns)?)
        } else {
            None
        };

        debug!(
            method = self.method.name(),
            generation = self.generation.name(),
            steps = params.steps(),
            price,
            delta,
            gamma,
            "Lattice valuation complete"
        );

        Ok(PricingResult {
            method: self.method,
            generation: self.generation,
            steps: params.steps(),
            price,
            delta,
            gamma,
            theta,
            nodes,
        })
    }
}

/// θ = rV - (r - q)·S·Δ - σ²S²Γ/2
fn pde_theta(market: &MarketSnapshot, price: f64, delta: f64, gamma: f64) -> f64 {
    let spot = market.spot();
    let sigma = market.volatility();
    market.rate() * price - market.carry() * spot * delta - 0.5 * sigma * sigma * spot * spot * gamma
}
