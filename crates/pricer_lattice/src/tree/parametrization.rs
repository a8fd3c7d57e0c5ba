//! Binomial tree parametrizations.
//!
//! Each [`TreeMethod`] maps the market, the contract and a step count to
//! the per-step factors of a recombining binomial tree: up and down
//! multipliers, the risk-neutral up probability and the per-step discount.
//!
//! ## Common quantities
//!
//! - dt = T / n
//! - μ = (r - q - σ²/2)·dt (log drift per step)
//! - v = σ²·dt (log variance per step)
//!
//! Leisen-Reimer and Joshi4 are strike-dependent and require an odd step
//! count; an even request is rounded up. The discount per step always uses
//! the effective step count.

use pricer_core::types::{MarketSnapshot, PricingError};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::instruments::ContractSpec;

/// Closed set of supported tree parametrizations.
///
/// # Variants
/// - `JarrowRudd`: equal probabilities, drift in the factors
/// - `CoxRossRubinstein`: symmetric log factors, drift in the probability
/// - `AdditiveEqp`: equal probabilities, additive log spacing around the drift
/// - `Trigeorgis`: symmetric log factors matching the log variance
/// - `Tian`: matches the first three moments of the lognormal
/// - `LeisenReimer`: Peizer-Pratt inversion centred on the strike
/// - `Joshi4`: fourth-order refinement of Leisen-Reimer
///
/// # Examples
/// ```
/// use pricer_lattice::tree::TreeMethod;
///
/// let method: TreeMethod = "crr".parse().unwrap();
/// assert_eq!(method, TreeMethod::CoxRossRubinstein);
/// assert_eq!(TreeMethod::LeisenReimer.effective_steps(300), 301);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TreeMethod {
    /// Jarrow-Rudd (1983)
    #[cfg_attr(feature = "serde", serde(alias = "jr"))]
    JarrowRudd,
    /// Cox-Ross-Rubinstein (1979)
    #[cfg_attr(feature = "serde", serde(alias = "crr"))]
    CoxRossRubinstein,
    /// Additive equal-probability tree
    #[cfg_attr(feature = "serde", serde(alias = "eqp"))]
    AdditiveEqp,
    /// Trigeorgis (1991)
    Trigeorgis,
    /// Tian (1993)
    Tian,
    /// Leisen-Reimer (1996)
    #[cfg_attr(feature = "serde", serde(alias = "lr"))]
    LeisenReimer,
    /// Joshi (2008) fourth-order tree
    #[cfg_attr(feature = "serde", serde(alias = "j4"))]
    Joshi4,
}

impl TreeMethod {
    /// Every method, in reporting order.
    pub const ALL: [TreeMethod; 7] = [
        TreeMethod::JarrowRudd,
        TreeMethod::CoxRossRubinstein,
        TreeMethod::AdditiveEqp,
        TreeMethod::Trigeorgis,
        TreeMethod::Tian,
        TreeMethod::LeisenReimer,
        TreeMethod::Joshi4,
    ];

    /// Kebab-case identifier used in configuration files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            TreeMethod::JarrowRudd => "jarrow-rudd",
            TreeMethod::CoxRossRubinstein => "cox-ross-rubinstein",
            TreeMethod::AdditiveEqp => "additive-eqp",
            TreeMethod::Trigeorgis => "trigeorgis",
            TreeMethod::Tian => "tian",
            TreeMethod::LeisenReimer => "leisen-reimer",
            TreeMethod::Joshi4 => "joshi4",
        }
    }

    /// Display label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            TreeMethod::JarrowRudd => "JarrowRudd",
            TreeMethod::CoxRossRubinstein => "CoxRossRubinstein",
            TreeMethod::AdditiveEqp => "AdditiveEQP",
            TreeMethod::Trigeorgis => "Trigeorgis",
            TreeMethod::Tian => "Tian",
            TreeMethod::LeisenReimer => "LeisenReimer",
            TreeMethod::Joshi4 => "Joshi4",
        }
    }

    /// Step count the method actually builds for a requested count.
    ///
    /// Leisen-Reimer and Joshi4 need an odd count, so an even request is
    /// rounded up. Joshi4 also needs at least three steps.
    pub fn effective_steps(&self, steps: usize) -> usize {
        match self {
            TreeMethod::LeisenReimer => steps | 1,
            TreeMethod::Joshi4 => (steps | 1).max(3),
            _ => steps,
        }
    }

    /// Computes the tree factors for a market, a contract and a step count.
    ///
    /// # Arguments
    /// * `market` - Spot, rate, dividend yield and volatility
    /// * `contract` - Strike (strike-dependent methods) and expiry
    /// * `steps` - Requested number of time steps
    ///
    /// # Errors
    /// - `InvalidParameter` if the expiry or volatility is not positive, the
    ///   step count is zero, or the up probability falls outside (0, 1)
    /// - `NumericDegenerate` if a factor is not finite or up <= down
    /// - `Configuration` if the factors do not straddle 1
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::MarketSnapshot;
    /// use pricer_lattice::instruments::{ContractSpec, OptionType};
    /// use pricer_lattice::tree::TreeMethod;
    ///
    /// let market = MarketSnapshot::new(100.0, 0.04, 0.0, 0.25).unwrap();
    /// let contract = ContractSpec::new(OptionType::Call, 120.0, 1.0).unwrap();
    ///
    /// let params = TreeMethod::CoxRossRubinstein
    ///     .parametrize(&market, &contract, 100)
    ///     .unwrap();
    /// assert!((params.up() * params.down() - 1.0).abs() < 1e-12);
    /// ```
    pub fn parametrize(
        &self,
        market: &MarketSnapshot,
        contract: &ContractSpec,
        steps: usize,
    ) -> Result<TreeParameters, PricingError> {
        let expiry = contract.expiry();
        let sigma = market.volatility();

        if !(expiry > 0.0) {
            return Err(PricingError::invalid_parameter(format!(
                "time to maturity must be positive, got {expiry}"
            )));
        }
        if !(sigma > 0.0) {
            return Err(PricingError::invalid_parameter(format!(
                "volatility must be positive, got {sigma}"
            )));
        }
        if steps < 1 {
            return Err(PricingError::invalid_parameter(
                "step count must be at least 1",
            ));
        }

        let n = self.effective_steps(steps);
        let dt = expiry / n as f64;
        let drift = (market.carry() - 0.5 * sigma * sigma) * dt;
        let variance = sigma * sigma * dt;

        let (up, down, probability_up) = match self {
            TreeMethod::JarrowRudd => {
                let dx = variance.sqrt();
                ((drift + dx).exp(), (drift - dx).exp(), 0.5)
            }
            TreeMethod::CoxRossRubinstein => {
                let dx = variance.sqrt();
                (dx.exp(), (-dx).exp(), 0.5 + 0.5 * drift / dx)
            }
            TreeMethod::AdditiveEqp => {
                let dx = -0.5 * drift + 0.5 * (4.0 * variance - 3.0 * drift * drift).sqrt();
                ((drift + dx).exp(), (drift - dx).exp(), 0.5)
            }
            TreeMethod::Trigeorgis => {
                let dx = (variance + drift * drift).sqrt();
                (dx.exp(), (-dx).exp(), 0.5 + 0.5 * drift / dx)
            }
            TreeMethod::Tian => {
                let q = variance.exp();
                let r = drift.exp() * q.sqrt();
                let root = (q * q + 2.0 * q - 3.0).sqrt();
                let up = 0.5 * r * q * (q + 1.0 + root);
                let down = 0.5 * r * q * (q + 1.0 - root);
                (up, down, (r - down) / (up - down))
            }
            TreeMethod::LeisenReimer | TreeMethod::Joshi4 => {
                let total_vol = sigma * expiry.sqrt();
                let forward_growth = (drift + 0.5 * variance).exp();
                let d2 = ((market.spot() / contract.strike()).ln() + drift * n as f64) / total_vol;

                let inversion = |z: f64| match self {
                    TreeMethod::Joshi4 => joshi4_up_probability((n as f64 - 1.0) / 2.0, z),
                    _ => peizer_pratt_inversion(z, n),
                };
                let p = inversion(d2);
                let p_dash = inversion(d2 + total_vol);

                let up = forward_growth * p_dash / p;
                let down = (forward_growth - p * up) / (1.0 - p);
                (up, down, p)
            }
        };

        let params = TreeParameters::new(
            *self,
            n,
            dt,
            up,
            down,
            probability_up,
            (-market.rate() * dt).exp(),
        )?;

        debug!(
            method = self.name(),
            steps = n,
            dt,
            up,
            down,
            probability_up,
            "Tree parametrized"
        );

        Ok(params)
    }
}

impl FromStr for TreeMethod {
    type Err = PricingError;

    /// Parses a method name (case-insensitive, separators ignored).
    ///
    /// Accepts the kebab-case names, the report labels and the short
    /// aliases "jr", "crr", "eqp", "lr", "j4".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "jarrowrudd" | "jr" => Ok(TreeMethod::JarrowRudd),
            "coxrossrubinstein" | "crr" => Ok(TreeMethod::CoxRossRubinstein),
            "additiveeqp" | "eqp" => Ok(TreeMethod::AdditiveEqp),
            "trigeorgis" => Ok(TreeMethod::Trigeorgis),
            "tian" => Ok(TreeMethod::Tian),
            "leisenreimer" | "lr" => Ok(TreeMethod::LeisenReimer),
            "joshi4" | "joshi" | "j4" => Ok(TreeMethod::Joshi4),
            _ => Err(PricingError::invalid_parameter(format!(
                "Unknown tree method: {s}"
            ))),
        }
    }
}

impl fmt::Display for TreeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-step factors of a recombining binomial tree.
///
/// Invariants, checked at construction:
/// - all values finite
/// - 0 < probability_up < 1
/// - down < 1 < up
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeParameters {
    method: TreeMethod,
    steps: usize,
    dt: f64,
    up: f64,
    down: f64,
    probability_up: f64,
    discount_per_step: f64,
}

impl TreeParameters {
    /// Creates validated tree parameters.
    ///
    /// # Errors
    /// - `InvalidParameter` if `steps` is zero or the probability is outside (0, 1)
    /// - `NumericDegenerate` if any value is not finite or `up <= down`
    /// - `Configuration` if `down < 1 < up` does not hold
    pub fn new(
        method: TreeMethod,
        steps: usize,
        dt: f64,
        up: f64,
        down: f64,
        probability_up: f64,
        discount_per_step: f64,
    ) -> Result<Self, PricingError> {
        if steps < 1 {
            return Err(PricingError::invalid_parameter(
                "step count must be at least 1",
            ));
        }
        if ![dt, up, down, probability_up, discount_per_step]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(PricingError::numeric_degenerate(format!(
                "{} produced non-finite factors (up={up}, down={down}, p={probability_up})",
                method.label()
            )));
        }
        if !(probability_up > 0.0 && probability_up < 1.0) {
            return Err(PricingError::invalid_parameter(format!(
                "{} up probability {probability_up} outside (0, 1)",
                method.label()
            )));
        }
        if up <= down {
            return Err(PricingError::numeric_degenerate(format!(
                "{} up factor {up} not above down factor {down}",
                method.label()
            )));
        }
        if !(down < 1.0 && 1.0 < up) {
            return Err(PricingError::configuration(format!(
                "{} factors do not straddle 1 (up={up}, down={down})",
                method.label()
            )));
        }

        Ok(Self {
            method,
            steps,
            dt,
            up,
            down,
            probability_up,
            discount_per_step,
        })
    }

    /// Method that produced these factors.
    #[inline]
    pub fn method(&self) -> TreeMethod {
        self.method
    }

    /// Effective number of time steps.
    #[inline]
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Step length in years.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Up multiplier.
    #[inline]
    pub fn up(&self) -> f64 {
        self.up
    }

    /// Down multiplier.
    #[inline]
    pub fn down(&self) -> f64 {
        self.down
    }

    /// Risk-neutral probability of an up move.
    #[inline]
    pub fn probability_up(&self) -> f64 {
        self.probability_up
    }

    /// Risk-neutral probability of a down move.
    #[inline]
    pub fn probability_down(&self) -> f64 {
        1.0 - self.probability_up
    }

    /// One-step discount factor exp(-r·dt).
    #[inline]
    pub fn discount_per_step(&self) -> f64 {
        self.discount_per_step
    }
}

/// Peizer-Pratt method 2 inversion of a normal quantile for an odd `n`.
fn peizer_pratt_inversion(z: f64, n: usize) -> f64 {
    let nf = n as f64;
    let r = z / (nf + 1.0 / 3.0 + 0.1 / (nf + 1.0));
    let ex = (-r * r * (nf + 1.0 / 6.0)).exp();
    0.5 + z.signum() * 0.5 * (1.0 - ex).sqrt()
}

/// Joshi's fourth-order up probability, expanded in powers of 1/√k.
fn joshi4_up_probability(k: f64, dj: f64) -> f64 {
    let alpha = dj / 8.0_f64.sqrt();
    let alpha2 = alpha * alpha;
    let alpha3 = alpha * alpha2;
    let alpha5 = alpha3 * alpha2;
    let alpha7 = alpha5 * alpha2;

    let beta = -0.375 * alpha - alpha3;
    let gamma = (5.0 / 6.0) * alpha5 + (13.0 / 12.0) * alpha3 + (25.0 / 128.0) * alpha;
    let delta = -0.1025 * alpha - 0.9285 * alpha3 - 1.43 * alpha5 - 0.5 * alpha7;

    let root_k = k.sqrt();
    0.5 + alpha / root_k
        + beta / (k * root_k)
        + gamma / (k * k * root_k)
        + delta / (k * k * k * root_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruments::OptionType;
    use approx::assert_relative_eq;

    const EXPIRY: f64 = 363.0 / 365.0;

    fn market() -> MarketSnapshot {
        MarketSnapshot::new(100.0, 0.04, 0.0, 0.25).unwrap()
    }

    fn call() -> ContractSpec {
        ContractSpec::new(OptionType::Call, 120.0, EXPIRY).unwrap()
    }

    // ==========================================================
    // Invariants
    // ==========================================================

    #[test]
    fn test_all_methods_valid_on_reference_scenario() {
        for method in TreeMethod::ALL {
            for steps in [1, 2, 50, 51, 300, 301] {
                let p = method.parametrize(&market(), &call(), steps).unwrap();
                assert!(p.probability_up() > 0.0 && p.probability_up() < 1.0);
                assert!(p.down() < 1.0 && 1.0 < p.up(), "{method} at {steps}");
                assert_relative_eq!(p.dt() * p.steps() as f64, EXPIRY, epsilon = 1e-14);
                assert_relative_eq!(
                    p.discount_per_step(),
                    (-0.04 * p.dt()).exp(),
                    epsilon = 1e-15
                );
            }
        }
    }

    #[test]
    fn test_effective_steps() {
        assert_eq!(TreeMethod::CoxRossRubinstein.effective_steps(300), 300);
        assert_eq!(TreeMethod::LeisenReimer.effective_steps(300), 301);
        assert_eq!(TreeMethod::LeisenReimer.effective_steps(301), 301);
        assert_eq!(TreeMethod::LeisenReimer.effective_steps(1), 1);
        assert_eq!(TreeMethod::Joshi4.effective_steps(1), 3);
        assert_eq!(TreeMethod::Joshi4.effective_steps(2), 3);
        assert_eq!(TreeMethod::Joshi4.effective_steps(4), 5);
    }

    // ==========================================================
    // Closed forms
    // ==========================================================

    #[test]
    fn test_crr_single_step_factors() {
        let p = TreeMethod::CoxRossRubinstein
            .parametrize(&market(), &call(), 1)
            .unwrap();
        let dx = 0.25 * EXPIRY.sqrt();
        assert_relative_eq!(p.up(), dx.exp(), epsilon = 1e-15);
        assert_relative_eq!(p.down(), 1.0 / p.up(), epsilon = 1e-15);
        assert_relative_eq!(p.probability_up(), 0.517452, epsilon = 1e-6);
    }

    #[test]
    fn test_jarrow_rudd_equal_probabilities() {
        let p = TreeMethod::JarrowRudd.parametrize(&market(), &call(), 100).unwrap();
        assert_eq!(p.probability_up(), 0.5);
        let dt = EXPIRY / 100.0;
        let drift = (0.04 - 0.5 * 0.0625) * dt;
        assert_relative_eq!((p.up() * p.down()).ln(), 2.0 * drift, epsilon = 1e-14);
    }

    #[test]
    fn test_additive_eqp_log_spacing() {
        let p = TreeMethod::AdditiveEqp.parametrize(&market(), &call(), 100).unwrap();
        let dt = EXPIRY / 100.0;
        let drift = (0.04 - 0.5 * 0.0625) * dt;
        let variance = 0.0625 * dt;
        let (xu, xd) = (p.up().ln(), p.down().ln());
        let dx = -0.5 * drift + 0.5 * (4.0 * variance - 3.0 * drift * drift).sqrt();

        assert_eq!(p.probability_up(), 0.5);
        assert_relative_eq!(0.5 * (xu + xd), drift, epsilon = 1e-14);
        assert_relative_eq!(0.5 * (xu - xd), dx, epsilon = 1e-14);
    }

    #[test]
    fn test_trigeorgis_matches_first_two_log_moments() {
        let p = TreeMethod::Trigeorgis.parametrize(&market(), &call(), 100).unwrap();
        let dt = EXPIRY / 100.0;
        let drift = (0.04 - 0.5 * 0.0625) * dt;
        let dx = p.up().ln();
        let mean = p.probability_up() * dx - p.probability_down() * dx;
        assert_relative_eq!(mean, drift, epsilon = 1e-15);
        assert_relative_eq!(dx * dx, 0.0625 * dt + drift * drift, epsilon = 1e-15);
    }

    #[test]
    fn test_martingale_exact_methods_match_forward() {
        for method in [TreeMethod::Tian, TreeMethod::LeisenReimer, TreeMethod::Joshi4] {
            let p = method.parametrize(&market(), &call(), 101).unwrap();
            let growth = p.probability_up() * p.up() + p.probability_down() * p.down();
            assert_relative_eq!(growth, (0.04 * p.dt()).exp(), epsilon = 1e-14);
        }
    }

    #[test]
    fn test_peizer_pratt_symmetry() {
        for z in [0.3, 1.2, 2.5] {
            let sum = peizer_pratt_inversion(z, 101) + peizer_pratt_inversion(-z, 101);
            assert_relative_eq!(sum, 1.0, epsilon = 1e-15);
        }
        assert_eq!(peizer_pratt_inversion(0.0, 101), 0.5);
    }

    #[test]
    fn test_joshi4_close_to_peizer_pratt() {
        let n = 301;
        let k = (n as f64 - 1.0) / 2.0;
        for z in [-1.0, -0.3, 0.4, 1.1] {
            let diff = joshi4_up_probability(k, z) - peizer_pratt_inversion(z, n);
            assert!(diff.abs() < 1e-3, "z={z} diff={diff}");
        }
    }

    // ==========================================================
    // Failure modes
    // ==========================================================

    #[test]
    fn test_invalid_inputs() {
        let expired = ContractSpec::new(OptionType::Call, 120.0, 0.0).unwrap();
        let flat = MarketSnapshot::new(100.0, 0.04, 0.0, 0.0).unwrap();
        for method in TreeMethod::ALL {
            assert!(matches!(
                method.parametrize(&market(), &expired, 10),
                Err(PricingError::InvalidParameter(_))
            ));
            assert!(matches!(
                method.parametrize(&flat, &call(), 10),
                Err(PricingError::InvalidParameter(_))
            ));
            assert!(matches!(
                method.parametrize(&market(), &call(), 0),
                Err(PricingError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn test_drift_dominated_tree_failures() {
        let m = MarketSnapshot::new(100.0, 0.5, 0.0, 0.05).unwrap();
        let c = ContractSpec::new(OptionType::Call, 100.0, 1.0).unwrap();

        // Probability far above 1
        assert!(matches!(
            TreeMethod::CoxRossRubinstein.parametrize(&m, &c, 1),
            Err(PricingError::InvalidParameter(_))
        ));
        // Both factors above 1
        assert!(matches!(
            TreeMethod::JarrowRudd.parametrize(&m, &c, 1),
            Err(PricingError::Configuration(_))
        ));
        // Symmetric factors keep the probability inside (0, 1)
        assert!(TreeMethod::Trigeorgis.parametrize(&m, &c, 1).is_ok());
    }

    #[test]
    fn test_tree_parameters_validation_order() {
        let m = TreeMethod::CoxRossRubinstein;
        assert!(matches!(
            TreeParameters::new(m, 10, 0.1, f64::NAN, 0.9, 0.5, 0.99),
            Err(PricingError::NumericDegenerate(_))
        ));
        assert!(matches!(
            TreeParameters::new(m, 10, 0.1, 1.1, 0.9, 1.0, 0.99),
            Err(PricingError::InvalidParameter(_))
        ));
        assert!(matches!(
            TreeParameters::new(m, 10, 0.1, 1.0, 1.0, 0.5, 0.99),
            Err(PricingError::NumericDegenerate(_))
        ));
        assert!(matches!(
            TreeParameters::new(m, 10, 0.1, 1.2, 1.05, 0.5, 0.99),
            Err(PricingError::Configuration(_))
        ));
        assert!(matches!(
            TreeParameters::new(m, 0, 0.1, 1.1, 0.9, 0.5, 0.99),
            Err(PricingError::InvalidParameter(_))
        ));
    }

    // ==========================================================
    // Parsing
    // ==========================================================

    #[test]
    fn test_from_str_accepts_names_labels_and_aliases() {
        for method in TreeMethod::ALL {
            assert_eq!(method.name().parse::<TreeMethod>().unwrap(), method);
            assert_eq!(method.label().parse::<TreeMethod>().unwrap(), method);
            assert_eq!(method.to_string().parse::<TreeMethod>().unwrap(), method);
        }
        assert_eq!("LR".parse::<TreeMethod>().unwrap(), TreeMethod::LeisenReimer);
        assert_eq!("j4".parse::<TreeMethod>().unwrap(), TreeMethod::Joshi4);
        assert!("trinomial".parse::<TreeMethod>().is_err());
    }
}
