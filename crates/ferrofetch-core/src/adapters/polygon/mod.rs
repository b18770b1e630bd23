//! Polygon.io aggregates adapters.
//!
//! Stocks and crypto share one endpoint and one bar shape; only the ticker
//! prefix differs.

mod crypto_price;
mod stock_price;

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Date, OffsetDateTime};

use crate::access::{JsonApi, Transport};
use crate::decode::{decode_many, Record};
use crate::domain::{validate_non_negative, validate_optional_positive, validate_positive};
use crate::error::PayloadShape;
use crate::query::{iso_date, QueryField, QueryParams, UrlBuilder};
use crate::{Credentials, FetchError, MarketDateTime, PriceBar, ProviderId, Symbol, ValidationError};

pub use crypto_price::PolygonCryptoPriceFetcher;
pub use stock_price::PolygonStockPriceFetcher;

pub const POLYGON_BASE_URL: &str = "https://api.polygon.io";

const CREDENTIAL_PARAM: &str = "apiKey";
const ERROR_MARKER: &str = "error";
const DEFAULT_LIMIT: u32 = 49_999;

/// Path segments; everything else goes in the query string.
const PATH_FIELDS: [&str; 5] = ["symbol", "start_date", "end_date", "timespan", "multiplier"];

/// Shared Polygon configuration: transport, base URL and error conventions.
#[derive(Debug, Clone)]
pub struct PolygonClient {
    api: JsonApi,
    urls: UrlBuilder,
}

impl PolygonClient {
    pub fn new(transport: Transport) -> Self {
        Self {
            api: JsonApi::new(ProviderId::Polygon, transport, ERROR_MARKER),
            urls: UrlBuilder::new(POLYGON_BASE_URL, CREDENTIAL_PARAM),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.urls = UrlBuilder::new(base_url, CREDENTIAL_PARAM);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.api = self.api.with_timeout_ms(timeout_ms);
        self
    }

    fn aggregates(
        &self,
        query: &PolygonPriceQuery,
        ticker_prefix: &str,
        credentials: &Credentials,
    ) -> Result<Vec<PolygonAggregateBar>, FetchError> {
        let api_key = credentials.require(ProviderId::Polygon.credential_key())?;
        let endpoint = format!(
            "aggs/ticker/{}/range/{}/{}/{}/{}",
            query.symbol.qualified(ticker_prefix),
            query.multiplier,
            query.timespan.as_str(),
            iso_date(query.start_date),
            iso_date(query.end_date),
        );
        let url = self.urls.build(2, &endpoint, api_key, Some(query), &PATH_FIELDS);

        let payload = self.api.get_json(&url)?;
        if let Value::Array(_) = payload {
            return Err(FetchError::ShapeMismatch {
                expected: PayloadShape::Mapping,
                found: PayloadShape::Sequence,
            });
        }

        let bars = decode_many::<PolygonAggregateBar>(payload, Some("results"))?;
        if bars.is_empty() {
            return Err(FetchError::NoResults);
        }
        Ok(bars)
    }
}

impl Default for PolygonClient {
    fn default() -> Self {
        Self::new(Transport::default())
    }
}

/// Aggregate bar width.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    Minute,
    Hour,
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timespan {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Polygon aggregates request. Extra parameters may set any field that the
/// canonical [`crate::PriceQuery`] leaves open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolygonPriceQuery {
    pub symbol: Symbol,
    pub start_date: Date,
    #[serde(default = "today")]
    pub end_date: Date,
    #[serde(default)]
    pub timespan: Timespan,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default = "default_limit")]
    pub limit: NonZeroU32,
    #[serde(default = "default_adjusted")]
    pub adjusted: bool,
    #[serde(default = "default_multiplier")]
    pub multiplier: NonZeroU32,
}

impl PolygonPriceQuery {
    fn checked(self) -> Result<Self, FetchError> {
        if self.start_date > self.end_date {
            return Err(FetchError::invalid_query(format!(
                "start_date {} is after end_date {}",
                iso_date(self.start_date),
                iso_date(self.end_date)
            )));
        }
        Ok(self)
    }
}

impl QueryParams for PolygonPriceQuery {
    fn query_fields(&self) -> Vec<QueryField> {
        vec![
            QueryField::new("symbol", Some(self.symbol.to_string())),
            QueryField::new("start_date", Some(iso_date(self.start_date))),
            QueryField::new("end_date", Some(iso_date(self.end_date))),
            QueryField::new("timespan", Some(self.timespan.as_str().to_owned())),
            QueryField::new("multiplier", Some(self.multiplier.to_string())),
            QueryField::new("adjusted", Some(self.adjusted.to_string())),
            QueryField::new("sort", Some(self.sort.as_str().to_owned())),
            QueryField::new("limit", Some(self.limit.to_string())),
        ]
    }
}

fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

fn default_limit() -> NonZeroU32 {
    NonZeroU32::new(DEFAULT_LIMIT).unwrap_or(NonZeroU32::MAX)
}

fn default_multiplier() -> NonZeroU32 {
    NonZeroU32::MIN
}

fn default_adjusted() -> bool {
    true
}

/// One row of Polygon's `results` array.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PolygonAggregateBar {
    #[serde(rename = "t", deserialize_with = "MarketDateTime::deserialize_unix_millis")]
    pub date: MarketDateTime,
    #[serde(rename = "o")]
    pub open: f64,
    #[serde(rename = "h")]
    pub high: f64,
    #[serde(rename = "l")]
    pub low: f64,
    #[serde(rename = "c")]
    pub close: f64,
    #[serde(rename = "v", alias = "volume")]
    pub volume: f64,
    /// Number of trades in the window.
    #[serde(rename = "n", default)]
    pub transactions: Option<u64>,
    #[serde(rename = "vw", default)]
    pub vwap: Option<f64>,
}

impl Record for PolygonAggregateBar {
    const NAME: &'static str = "polygon aggregate bar";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_positive("open", self.open)?;
        validate_positive("high", self.high)?;
        validate_positive("low", self.low)?;
        validate_positive("close", self.close)?;
        validate_non_negative("volume", self.volume)?;
        validate_optional_positive("vwap", self.vwap)?;
        if self.transactions == Some(0) {
            return Err(ValidationError::NonPositiveValue {
                field: "transactions",
            });
        }
        Ok(())
    }
}

impl From<PolygonAggregateBar> for PriceBar {
    fn from(bar: PolygonAggregateBar) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
        }
    }
}
