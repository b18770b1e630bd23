//! # Domain Models
//!
//! Canonical, vendor-agnostic request and record types.
//!
//! Every fetcher consumes one of the `*Query` types below and produces the
//! matching record type, whichever vendor served the data.
//!
//! | Query | Record | Data kind |
//! |-------|--------|-----------|
//! | [`PriceQuery`] | [`PriceBar`] | stock and crypto prices |
//! | [`MajorIndicesHistoricalQuery`] | [`MajorIndexBar`] | index history |
//! | [`ShareStatisticsQuery`] | [`ShareStatistics`] | float statistics |
//! | [`EarningsCallTranscriptQuery`] | [`EarningsCallTranscript`] | transcripts |
//! | [`AnalystEstimatesQuery`] | [`AnalystEstimate`] | consensus estimates |
//! | [`IncomeStatementQuery`] | [`IncomeStatement`] | reported income statements |
//!
//! Shared value types: [`Symbol`] (validated uppercase ticker) and
//! [`MarketDateTime`] (the one date-time representation every vendor format
//! normalizes to).

mod fundamentals;
mod models;
mod symbol;
mod timestamp;

pub use fundamentals::{
    AnalystEstimate, AnalystEstimatesQuery, EarningsCallTranscript, EarningsCallTranscriptQuery,
    EstimateRange, IncomeStatement, IncomeStatementQuery, ReportPeriod, ShareStatistics,
    ShareStatisticsQuery,
};
pub use models::{MajorIndexBar, MajorIndicesHistoricalQuery, PriceBar, PriceQuery};
pub(crate) use models::{
    validate_finite, validate_non_negative, validate_optional_finite,
    validate_optional_non_negative, validate_optional_positive, validate_positive,
    validate_range,
};
pub use symbol::Symbol;
pub use timestamp::MarketDateTime;
