//! Integration tests for module exports.
//!
//! Verify that all public modules and types are correctly exported
//! and accessible via absolute paths.

/// Test that error types are accessible via absolute path.
#[test]
fn test_error_module_exports() {
    use pricer_core::types::error::DateError;
    use pricer_core::types::error::PricingError;

    let err = PricingError::numeric_degenerate("collapsed factors");
    assert_eq!(err.kind(), "numeric_degenerate");

    let err = DateError::ParseError("bad".to_string());
    assert!(err.to_string().contains("bad"));
}

/// Test that time types are accessible via absolute path.
#[test]
fn test_time_module_exports() {
    use pricer_core::types::time::Date;
    use pricer_core::types::time::DayCountConvention;

    let start = Date::from_ymd(2019, 2, 28).unwrap();
    let end = Date::from_ymd(2020, 2, 26).unwrap();
    let yf = DayCountConvention::default().year_fraction(start, end).unwrap();
    assert!((yf - 363.0 / 365.0).abs() < 1e-15);
}

/// Test that market types are accessible via absolute path.
#[test]
fn test_market_module_exports() {
    use pricer_core::types::market::MarketSnapshot;

    let market = MarketSnapshot::new(100.0, 0.04, 0.0, 0.25).unwrap();
    assert_eq!(market.volatility(), 0.25);
}

/// Test that the module-level re-exports resolve to the same types.
#[test]
fn test_types_reexports() {
    use pricer_core::types::{Date, DateError, DayCountConvention, MarketSnapshot, PricingError};

    let _: Result<Date, DateError> = Date::parse("2019-02-26");
    let _: Result<MarketSnapshot, PricingError> = MarketSnapshot::new(1.0, 0.0, 0.0, 0.1);
    assert_eq!(DayCountConvention::Thirty360.name(), "30/360");
}

#[cfg(feature = "serde")]
#[test]
fn test_serde_roundtrip_of_day_count() {
    use pricer_core::types::DayCountConvention;

    let json = serde_json::to_string(&DayCountConvention::Actual360).unwrap();
    assert_eq!(json, "\"ACT/360\"");
}
