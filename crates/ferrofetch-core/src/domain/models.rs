use serde::{Deserialize, Serialize};
use time::Date;

use crate::{MarketDateTime, Symbol, ValidationError};

/// Canonical query for daily or intraday price bars of one instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuery {
    pub symbol: Symbol,
    pub start_date: Date,
    /// Defaults to the current date when left unset.
    #[serde(default)]
    pub end_date: Option<Date>,
}

impl PriceQuery {
    pub fn new(symbol: Symbol, start_date: Date, end_date: Option<Date>) -> Self {
        Self {
            symbol,
            start_date,
            end_date,
        }
    }
}

/// Canonical OHLCV bar shared by stock and crypto price fetchers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: MarketDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Canonical query for a major index's price history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MajorIndicesHistoricalQuery {
    pub symbol: Symbol,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub end_date: Option<Date>,
}

impl MajorIndicesHistoricalQuery {
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_range(mut self, start_date: Option<Date>, end_date: Option<Date>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }
}

/// Canonical index bar. Index volume is not reported by every vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MajorIndexBar {
    pub date: MarketDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

pub(crate) fn validate_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    Ok(())
}

pub(crate) fn validate_non_negative(
    field: &'static str,
    value: f64,
) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

pub(crate) fn validate_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value <= 0.0 {
        return Err(ValidationError::NonPositiveValue { field });
    }
    Ok(())
}

pub(crate) fn validate_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), ValidationError> {
    validate_finite(field, value)?;
    if value < min || value > max {
        return Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        });
    }
    Ok(())
}

pub(crate) fn validate_optional_finite(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |value| validate_finite(field, value))
}

pub(crate) fn validate_optional_non_negative(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |value| validate_non_negative(field, value))
}

pub(crate) fn validate_optional_positive(
    field: &'static str,
    value: Option<f64>,
) -> Result<(), ValidationError> {
    value.map_or(Ok(()), |value| validate_positive(field, value))
}
