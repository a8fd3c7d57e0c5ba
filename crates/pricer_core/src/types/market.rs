//! Market snapshot for single-underlying option pricing.
//!
//! A [`MarketSnapshot`] bundles the four Black-Scholes-Merton inputs that
//! every pricing engine in the workspace shares: spot, continuously
//! compounded risk-free rate, continuous dividend yield and volatility.
//! Snapshots are immutable `Copy` values and can be shared freely between
//! threads.

use super::error::PricingError;
use super::time::Date;

/// Immutable flat-curve market inputs.
///
/// Construction validates that spot is strictly positive and that every
/// field is finite. Volatility positivity is checked by the consumers
/// (tree parametrization and the analytical benchmark) so that a zero-vol
/// snapshot can still be described and reported.
///
/// # Examples
///
/// ```
/// use pricer_core::types::MarketSnapshot;
///
/// let market = MarketSnapshot::new(100.0, 0.04, 0.0, 0.25).unwrap();
/// assert_eq!(market.rate(), 0.04);
/// assert!(MarketSnapshot::new(-1.0, 0.04, 0.0, 0.25).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketSnapshot {
    spot: f64,
    rate: f64,
    dividend_yield: f64,
    volatility: f64,
    valuation_date: Option<Date>,
}

impl MarketSnapshot {
    /// Creates a validated market snapshot.
    ///
    /// # Arguments
    ///
    /// * `spot` - Underlying price (S > 0)
    /// * `rate` - Continuously compounded risk-free rate
    /// * `dividend_yield` - Continuous dividend yield
    /// * `volatility` - Annualised volatility
    ///
    /// # Errors
    ///
    /// `PricingError::InvalidParameter` if spot is not strictly positive or
    /// any input is NaN or infinite.
    pub fn new(
        spot: f64,
        rate: f64,
        dividend_yield: f64,
        volatility: f64,
    ) -> Result<Self, PricingError> {
        for (name, value) in [
            ("spot", spot),
            ("rate", rate),
            ("dividend_yield", dividend_yield),
            ("volatility", volatility),
        ] {
            if !value.is_finite() {
                return Err(PricingError::invalid_parameter(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }
        if spot <= 0.0 {
            return Err(PricingError::invalid_parameter(format!(
                "spot must be positive, got {spot}"
            )));
        }

        Ok(Self {
            spot,
            rate,
            dividend_yield,
            volatility,
            valuation_date: None,
        })
    }

    /// Attaches the date the snapshot was observed on.
    pub fn with_valuation_date(mut self, date: Date) -> Self {
        self.valuation_date = Some(date);
        self
    }

    /// Underlying price.
    #[inline]
    pub fn spot(&self) -> f64 {
        self.spot
    }

    /// Risk-free rate.
    #[inline]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Continuous dividend yield.
    #[inline]
    pub fn dividend_yield(&self) -> f64 {
        self.dividend_yield
    }

    /// Annualised volatility.
    #[inline]
    pub fn volatility(&self) -> f64 {
        self.volatility
    }

    /// Valuation date, if one was attached.
    #[inline]
    pub fn valuation_date(&self) -> Option<Date> {
        self.valuation_date
    }

    /// Cost of carry `r - q`.
    #[inline]
    pub fn carry(&self) -> f64 {
        self.rate - self.dividend_yield
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_valid() {
        let m = MarketSnapshot::new(100.0, 0.04, 0.01, 0.25).unwrap();
        assert_eq!(m.spot(), 100.0);
        assert_eq!(m.rate(), 0.04);
        assert_eq!(m.dividend_yield(), 0.01);
        assert_eq!(m.volatility(), 0.25);
        assert!(m.valuation_date().is_none());
        assert!((m.carry() - 0.03).abs() < 1e-15);
    }

    #[test]
    fn test_non_positive_spot_rejected() {
        assert!(matches!(
            MarketSnapshot::new(0.0, 0.04, 0.0, 0.25),
            Err(PricingError::InvalidParameter(_))
        ));
        assert!(MarketSnapshot::new(-5.0, 0.04, 0.0, 0.25).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(MarketSnapshot::new(f64::NAN, 0.04, 0.0, 0.25).is_err());
        assert!(MarketSnapshot::new(100.0, f64::INFINITY, 0.0, 0.25).is_err());
        assert!(MarketSnapshot::new(100.0, 0.04, f64::NAN, 0.25).is_err());
        assert!(MarketSnapshot::new(100.0, 0.04, 0.0, f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_zero_volatility_is_describable() {
        // Consumers reject it, the snapshot itself does not
        assert!(MarketSnapshot::new(100.0, 0.04, 0.0, 0.0).is_ok());
    }
}
