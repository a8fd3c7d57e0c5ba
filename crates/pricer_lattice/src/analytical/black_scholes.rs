//! Black-Scholes-Merton pricing model for European options.
//!
//! This module provides the closed-form benchmark every lattice engine is
//! measured against: prices and analytical Greeks for calls and puts on an
//! underlying paying a continuous dividend yield.
//!
//! ## Mathematical Formulas
//!
//! **Call Price**: C = S·e^(-qT)·N(d₁) - K·e^(-rT)·N(d₂)
//! **Put Price**: P = K·e^(-rT)·N(-d₂) - S·e^(-qT)·N(-d₁)
//!
//! Where:
//! - d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
//! - d₂ = d₁ - σ√T

use pricer_core::types::{MarketSnapshot, PricingError};

use super::distributions::{norm_cdf, norm_pdf};
use crate::instruments::{ContractSpec, OptionType};

/// Expiries at or below this are treated as already expired.
const EXPIRY_EPSILON: f64 = 1e-10;

/// Price and analytical Greeks of one contract.
///
/// `theta` is the derivative with respect to calendar time (∂V/∂t), so it
/// is usually negative for long positions.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalyticGreeks {
    /// Option value
    pub price: f64,
    /// ∂V/∂S
    pub delta: f64,
    /// ∂²V/∂S²
    pub gamma: f64,
    /// ∂V/∂σ
    pub vega: f64,
    /// ∂V/∂t
    pub theta: f64,
    /// ∂V/∂r
    pub rho: f64,
}

/// Black-Scholes-Merton model for European option pricing.
///
/// Provides closed-form pricing and Greeks calculations for European
/// options under lognormal dynamics with a continuous dividend yield.
///
/// # Examples
/// ```
/// use pricer_lattice::analytical::BlackScholes;
///
/// let bs = BlackScholes::new(100.0, 0.05, 0.0, 0.2).unwrap();
/// let call_price = bs.price_call(100.0, 1.0);
/// let put_price = bs.price_put(100.0, 1.0);
///
/// // Put-call parity: C - P = S - K*exp(-rT)
/// let parity = call_price - put_price - (100.0 - 100.0 * (-0.05_f64).exp());
/// assert!(parity.abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholes {
    /// Spot price (S)
    spot: f64,
    /// Risk-free interest rate (r)
    rate: f64,
    /// Continuous dividend yield (q)
    dividend_yield: f64,
    /// Volatility (σ)
    volatility: f64,
}

impl BlackScholes {
    /// Creates a new Black-Scholes-Merton model.
    ///
    /// # Arguments
    /// * `spot` - Current spot price (must be positive)
    /// * `rate` - Risk-free interest rate (annualised, continuously compounded)
    /// * `dividend_yield` - Continuous dividend yield
    /// * `volatility` - Volatility (must be positive)
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if spot <= 0, volatility <= 0 or
    /// any input is not finite.
    ///
    /// # Examples
    /// ```
    /// use pricer_lattice::analytical::BlackScholes;
    ///
    /// assert!(BlackScholes::new(100.0, 0.05, 0.0, 0.2).is_ok());
    /// assert!(BlackScholes::new(-100.0, 0.05, 0.0, 0.2).is_err());
    /// assert!(BlackScholes::new(100.0, 0.05, 0.0, 0.0).is_err());
    /// ```
    pub fn new(
        spot: f64,
        rate: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> Result<Self, PricingError> {
        if !spot.is_finite() || spot <= 0.0 {
            return Err(PricingError::invalid_parameter(format!(
                "spot must be positive, got {spot}"
            )));
        }
        if !volatility.is_finite() || volatility <= 0.0 {
            return Err(PricingError::invalid_parameter(format!(
                "volatility must be positive, got {volatility}"
            )));
        }
        if !rate.is_finite() || !dividend_yield.is_finite() {
            return Err(PricingError::invalid_parameter(
                "rate and dividend yield must be finite",
            ));
        }

        Ok(Self {
            spot,
            rate,
            dividend_yield,
            volatility,
        })
    }

    /// Creates the model from a market snapshot.
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if the snapshot's volatility is not
    /// positive.
    pub fn from_market(market: &MarketSnapshot) -> Result<Self, PricingError> {
        Self::new(
            market.spot(),
            market.rate(),
            market.dividend_yield(),
            market.volatility(),
        )
    }

    /// Returns the spot price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Returns the risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Returns the volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Computes the d1 term of the Black-Scholes formula.
    ///
    /// d₁ = (ln(S/K) + (r - q + σ²/2)T) / (σ√T)
    ///
    /// # Arguments
    /// * `strike` - Strike price (K)
    /// * `expiry` - Time to expiration in years (T)
    ///
    /// # Returns
    /// The d1 term. Returns ±100 for expired in/out-of-the-money contracts.
    #[inline]
    pub fn d1(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return if self.spot > strike {
                100.0
            } else if self.spot < strike {
                -100.0
            } else {
                0.0
            };
        }

        let vol_sqrt_t = self.volatility * expiry.sqrt();
        let log_moneyness = (self.spot / strike).ln();
        let drift = (self.rate - self.dividend_yield + 0.5 * self.volatility * self.volatility)
            * expiry;

        (log_moneyness + drift) / vol_sqrt_t
    }

    /// Computes the d2 term of the Black-Scholes formula.
    ///
    /// d₂ = d₁ - σ√T
    #[inline]
    pub fn d2(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return self.d1(strike, expiry);
        }
        self.d1(strike, expiry) - self.volatility * expiry.sqrt()
    }

    /// Computes the option price.
    ///
    /// Expired contracts return their intrinsic value.
    ///
    /// # Arguments
    /// * `strike` - Strike price (K)
    /// * `expiry` - Time to expiration in years (T)
    /// * `option_type` - Call or put
    pub fn price(&self, strike: f64, expiry: f64, option_type: OptionType) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return option_type.payoff(self.spot, strike);
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        let forward_discount = (-self.dividend_yield * expiry).exp();

        match option_type {
            OptionType::Call => {
                self.spot * forward_discount * norm_cdf(d1) - strike * discount * norm_cdf(d2)
            }
            OptionType::Put => {
                strike * discount * norm_cdf(-d2) - self.spot * forward_discount * norm_cdf(-d1)
            }
        }
    }

    /// Computes European call option price.
    ///
    /// # Examples
    /// ```
    /// use pricer_lattice::analytical::BlackScholes;
    ///
    /// let bs = BlackScholes::new(100.0, 0.04, 0.0, 0.25).unwrap();
    /// let price = bs.price_call(120.0, 363.0 / 365.0);
    /// assert!((price - 4.7076072).abs() < 1e-6);
    /// ```
    #[inline]
    pub fn price_call(&self, strike: f64, expiry: f64) -> f64 {
        self.price(strike, expiry, OptionType::Call)
    }

    /// Computes European put option price.
    #[inline]
    pub fn price_put(&self, strike: f64, expiry: f64) -> f64 {
        self.price(strike, expiry, OptionType::Put)
    }

    /// Computes Delta (∂V/∂S).
    ///
    /// - Call Delta = e^(-qT)·N(d₁)
    /// - Put Delta = e^(-qT)·(N(d₁) - 1)
    pub fn delta(&self, strike: f64, expiry: f64, option_type: OptionType) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return match option_type {
                OptionType::Call if self.spot > strike => 1.0,
                OptionType::Put if self.spot < strike => -1.0,
                _ => 0.0,
            };
        }

        let forward_discount = (-self.dividend_yield * expiry).exp();
        let n_d1 = norm_cdf(self.d1(strike, expiry));

        match option_type {
            OptionType::Call => forward_discount * n_d1,
            OptionType::Put => forward_discount * (n_d1 - 1.0),
        }
    }

    /// Computes Gamma (∂²V/∂S²).
    ///
    /// Gamma = e^(-qT)·φ(d₁) / (S·σ·√T), identical for calls and puts.
    pub fn gamma(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        let forward_discount = (-self.dividend_yield * expiry).exp();
        forward_discount * norm_pdf(d1) / (self.spot * self.volatility * expiry.sqrt())
    }

    /// Computes Vega (∂V/∂σ).
    ///
    /// Vega = S·e^(-qT)·√T·φ(d₁), identical for calls and puts.
    pub fn vega(&self, strike: f64, expiry: f64) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        let forward_discount = (-self.dividend_yield * expiry).exp();
        self.spot * forward_discount * expiry.sqrt() * norm_pdf(d1)
    }

    /// Computes Theta (∂V/∂t).
    ///
    /// - Call Theta = -S·e^(-qT)·σ·φ(d₁)/(2√T) - r·K·e^(-rT)·N(d₂) + q·S·e^(-qT)·N(d₁)
    /// - Put Theta = -S·e^(-qT)·σ·φ(d₁)/(2√T) + r·K·e^(-rT)·N(-d₂) - q·S·e^(-qT)·N(-d₁)
    ///
    /// This is the rate of change with respect to calendar time, which is
    /// typically negative (time decay).
    pub fn theta(&self, strike: f64, expiry: f64, option_type: OptionType) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d1 = self.d1(strike, expiry);
        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();
        let forward = self.spot * (-self.dividend_yield * expiry).exp();

        let decay = -(forward * self.volatility * norm_pdf(d1)) / (2.0 * expiry.sqrt());

        match option_type {
            OptionType::Call => {
                decay - self.rate * strike * discount * norm_cdf(d2)
                    + self.dividend_yield * forward * norm_cdf(d1)
            }
            OptionType::Put => {
                decay + self.rate * strike * discount * norm_cdf(-d2)
                    - self.dividend_yield * forward * norm_cdf(-d1)
            }
        }
    }

    /// Computes Rho (∂V/∂r).
    ///
    /// - Call Rho = K·T·e^(-rT)·N(d₂)
    /// - Put Rho = -K·T·e^(-rT)·N(-d₂)
    pub fn rho(&self, strike: f64, expiry: f64, option_type: OptionType) -> f64 {
        if expiry <= EXPIRY_EPSILON {
            return 0.0;
        }

        let d2 = self.d2(strike, expiry);
        let discount = (-self.rate * expiry).exp();

        match option_type {
            OptionType::Call => strike * expiry * discount * norm_cdf(d2),
            OptionType::Put => -strike * expiry * discount * norm_cdf(-d2),
        }
    }

    /// Prices a contract and computes all analytical Greeks.
    ///
    /// # Examples
    /// ```
    /// use pricer_lattice::analytical::BlackScholes;
    /// use pricer_lattice::instruments::{ContractSpec, OptionType};
    ///
    /// let bs = BlackScholes::new(100.0, 0.04, 0.0, 0.25).unwrap();
    /// let contract = ContractSpec::new(OptionType::Call, 120.0, 363.0 / 365.0).unwrap();
    /// let greeks = bs.evaluate(&contract);
    /// assert!((greeks.delta - 0.3274107).abs() < 1e-6);
    /// ```
    pub fn evaluate(&self, contract: &ContractSpec) -> AnalyticGreeks {
        let strike = contract.strike();
        let expiry = contract.expiry();
        let option_type = contract.option_type();

        AnalyticGreeks {
            price: self.price(strike, expiry, option_type),
            delta: self.delta(strike, expiry, option_type),
            gamma: self.gamma(strike, expiry),
            vega: self.vega(strike, expiry),
            theta: self.theta(strike, expiry, option_type),
            rho: self.rho(strike, expiry, option_type),
        }
    }
}
