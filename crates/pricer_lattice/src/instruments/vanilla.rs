//! European vanilla contract specification.

use pricer_core::types::{Date, DayCountConvention, PricingError};

use super::payoff::OptionType;

/// Immutable description of one European vanilla option.
///
/// Construction validates that the strike is strictly positive and finite
/// and that the expiry is finite. A non-positive expiry is accepted here
/// and rejected by the pricing operations that need a positive horizon.
///
/// # Examples
/// ```
/// use pricer_lattice::instruments::{ContractSpec, OptionType};
///
/// let contract = ContractSpec::new(OptionType::Call, 120.0, 1.0).unwrap();
/// assert_eq!(contract.strike(), 120.0);
/// assert_eq!(contract.payoff(130.0), 10.0);
///
/// assert!(ContractSpec::new(OptionType::Call, 0.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractSpec {
    option_type: OptionType,
    strike: f64,
    expiry: f64,
}

impl ContractSpec {
    /// Creates a validated contract.
    ///
    /// # Arguments
    /// * `option_type` - Call or put
    /// * `strike` - Strike price (must be positive)
    /// * `expiry` - Time to maturity in years
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if the strike is not positive or
    /// either value is not finite.
    pub fn new(option_type: OptionType, strike: f64, expiry: f64) -> Result<Self, PricingError> {
        if !strike.is_finite() || strike <= 0.0 {
            return Err(PricingError::invalid_parameter(format!(
                "strike must be positive and finite, got {strike}"
            )));
        }
        if !expiry.is_finite() {
            return Err(PricingError::invalid_parameter(format!(
                "expiry must be finite, got {expiry}"
            )));
        }
        Ok(Self {
            option_type,
            strike,
            expiry,
        })
    }

    /// Creates a contract whose expiry is the year fraction between two dates.
    ///
    /// # Arguments
    /// * `option_type` - Call or put
    /// * `strike` - Strike price (must be positive)
    /// * `start` - Reference date the horizon is measured from
    /// * `maturity` - Exercise date
    /// * `day_count` - Convention converting the period to years
    ///
    /// # Errors
    /// `PricingError::InvalidParameter` if the maturity precedes the
    /// reference date or the strike is invalid.
    ///
    /// # Examples
    /// ```
    /// use pricer_core::types::{Date, DayCountConvention};
    /// use pricer_lattice::instruments::{ContractSpec, OptionType};
    ///
    /// let contract = ContractSpec::from_dates(
    ///     OptionType::Call,
    ///     120.0,
    ///     Date::from_ymd(2019, 2, 28).unwrap(),
    ///     Date::from_ymd(2020, 2, 26).unwrap(),
    ///     DayCountConvention::Actual365Fixed,
    /// )
    /// .unwrap();
    /// assert!((contract.expiry() - 363.0 / 365.0).abs() < 1e-15);
    /// ```
    pub fn from_dates(
        option_type: OptionType,
        strike: f64,
        start: Date,
        maturity: Date,
        day_count: DayCountConvention,
    ) -> Result<Self, PricingError> {
        let expiry = day_count
            .year_fraction(start, maturity)
            .map_err(|e| PricingError::invalid_parameter(e.to_string()))?;
        Self::new(option_type, strike, expiry)
    }

    /// Option type.
    #[inline]
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// Strike price.
    #[inline]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Time to maturity in years.
    #[inline]
    pub fn expiry(&self) -> f64 {
        self.expiry
    }

    /// Terminal payoff at the given underlying level.
    #[inline]
    pub fn payoff(&self, spot: f64) -> f64 {
        self.option_type.payoff(spot, self.strike)
    }

    /// Returns the same contract with the opposite option type.
    pub fn flipped(&self) -> Self {
        let option_type = match self.option_type {
            OptionType::Call => OptionType::Put,
            OptionType::Put => OptionType::Call,
        };
        Self {
            option_type,
            ..*self
        }
    }
}
