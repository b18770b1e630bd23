use serde::{Deserialize, Serialize};
use time::Date;

use super::FmpClient;
use crate::decode::{decode_many, Record};
use crate::domain::{
    validate_optional_finite, validate_optional_non_negative, validate_optional_positive,
    validate_positive,
};
use crate::fetcher::{merge_query, ExtraParams, Fetcher};
use crate::query::{iso_date, QueryField, QueryParams};
use crate::{
    Credentials, DataKind, FetchError, MajorIndexBar, MajorIndicesHistoricalQuery,
    MarketDateTime, ProviderId, Symbol, ValidationError,
};

/// URL-encoded `^`, FMP's index namespace.
const INDEX_PREFIX: &str = "%5E";
const PATH_FIELDS: [&str; 2] = ["symbol", "interval"];

/// Bar granularity; `1day` uses the full-history endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FmpInterval {
    #[serde(rename = "1min")]
    OneMinute,
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "1hour")]
    OneHour,
    #[serde(rename = "4hour")]
    FourHours,
    #[default]
    #[serde(rename = "1day")]
    OneDay,
}

impl FmpInterval {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinutes => "5min",
            Self::FifteenMinutes => "15min",
            Self::ThirtyMinutes => "30min",
            Self::OneHour => "1hour",
            Self::FourHours => "4hour",
            Self::OneDay => "1day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmpMajorIndicesQuery {
    pub symbol: Symbol,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub end_date: Option<Date>,
    /// Number of most recent rows to return.
    #[serde(default)]
    pub timeseries: Option<u32>,
    #[serde(default)]
    pub interval: FmpInterval,
}

impl FmpMajorIndicesQuery {
    fn endpoint(&self) -> String {
        let ticker = self.symbol.qualified(INDEX_PREFIX);
        match self.interval {
            FmpInterval::OneDay => format!("historical-price-full/index/{ticker}"),
            interval => format!("historical-chart/{}/{ticker}", interval.as_str()),
        }
    }
}

impl QueryParams for FmpMajorIndicesQuery {
    fn query_fields(&self) -> Vec<QueryField> {
        vec![
            QueryField::new("symbol", Some(self.symbol.to_string())),
            QueryField::renamed("start_date", "from", self.start_date.map(iso_date)),
            QueryField::renamed("end_date", "to", self.end_date.map(iso_date)),
            QueryField::new("timeseries", self.timeseries.map(|rows| rows.to_string())),
            QueryField::new("interval", Some(self.interval.as_str().to_owned())),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpMajorIndexBar {
    pub date: MarketDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub adj_close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub unadjusted_volume: Option<f64>,
    #[serde(default)]
    pub change: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub vwap: Option<f64>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub change_over_time: Option<f64>,
}

impl Record for FmpMajorIndexBar {
    const NAME: &'static str = "fmp major index bar";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_positive("open", self.open)?;
        validate_positive("high", self.high)?;
        validate_positive("low", self.low)?;
        validate_positive("close", self.close)?;
        validate_optional_positive("adj_close", self.adj_close)?;
        validate_optional_non_negative("volume", self.volume)?;
        validate_optional_non_negative("unadjusted_volume", self.unadjusted_volume)?;
        validate_optional_finite("change", self.change)?;
        validate_optional_finite("change_percent", self.change_percent)?;
        validate_optional_positive("vwap", self.vwap)?;
        validate_optional_finite("change_over_time", self.change_over_time)
    }
}

impl From<FmpMajorIndexBar> for MajorIndexBar {
    fn from(bar: FmpMajorIndexBar) -> Self {
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

/// Historical levels of a major index such as `^GSPC`.
#[derive(Debug, Clone, Default)]
pub struct FmpMajorIndicesHistoricalFetcher {
    client: FmpClient,
}

impl FmpMajorIndicesHistoricalFetcher {
    pub fn new(client: FmpClient) -> Self {
        Self { client }
    }
}

impl Fetcher for FmpMajorIndicesHistoricalFetcher {
    type Query = MajorIndicesHistoricalQuery;
    type Data = MajorIndexBar;
    type ProviderQuery = FmpMajorIndicesQuery;
    type ProviderData = FmpMajorIndexBar;

    const PROVIDER: ProviderId = ProviderId::Fmp;
    const KIND: DataKind = DataKind::MajorIndicesHistorical;

    fn transform_query(
        query: &MajorIndicesHistoricalQuery,
        extra: Option<&ExtraParams>,
    ) -> Result<FmpMajorIndicesQuery, FetchError> {
        let vendor: FmpMajorIndicesQuery = merge_query(query, extra)?;
        if let (Some(start), Some(end)) = (vendor.start_date, vendor.end_date) {
            if start > end {
                return Err(FetchError::invalid_query(format!(
                    "start_date {} is after end_date {}",
                    iso_date(start),
                    iso_date(end)
                )));
            }
        }
        Ok(vendor)
    }

    fn extract_data(
        &self,
        query: &FmpMajorIndicesQuery,
        credentials: &Credentials,
    ) -> Result<Vec<FmpMajorIndexBar>, FetchError> {
        // Daily history nests rows under `historical`; intraday returns a bare list.
        let payload = self
            .client
            .get_json(3, &query.endpoint(), query, &PATH_FIELDS, credentials)?;
        let bars = decode_many::<FmpMajorIndexBar>(payload, Some("historical"))?;
        if bars.is_empty() {
            return Err(FetchError::NoResults);
        }
        Ok(bars)
    }

    fn transform_data(data: Vec<FmpMajorIndexBar>) -> Vec<MajorIndexBar> {
        data.into_iter().map(MajorIndexBar::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use time::macros::date;

    use super::*;
    use crate::access::Transport;
    use crate::http_client::testing::RecordingHttpClient;

    fn fetcher(client: Arc<RecordingHttpClient>) -> FmpMajorIndicesHistoricalFetcher {
        FmpMajorIndicesHistoricalFetcher::new(
            FmpClient::new(Transport::new(client)).with_base_url("https://fmp.test/api"),
        )
    }

    fn credentials() -> Credentials {
        Credentials::new().with("fmp_api_key", "fk")
    }

    fn query() -> MajorIndicesHistoricalQuery {
        MajorIndicesHistoricalQuery::new(Symbol::parse("gspc").expect("valid symbol"))
            .with_range(Some(date!(2023 - 01 - 03)), Some(date!(2023 - 01 - 05)))
    }

    #[test]
    fn daily_history_reads_historical_rows() {
        let client = Arc::new(RecordingHttpClient::json(
            200,
            json!({
                "symbol": "^GSPC",
                "historical": [{
                    "date": "2023-01-05", "open": 3839.74, "high": 3839.74, "low": 3802.42,
                    "close": 3808.1, "adjClose": 3808.1, "volume": 3_968_470_000.0,
                    "unadjustedVolume": 3_968_470_000.0, "change": -31.64,
                    "changePercent": -0.824, "vwap": 3816.75, "label": "January 05, 23",
                    "changeOverTime": -0.00824
                }]
            }),
        ));

        let bars = fetcher(client.clone())
            .fetch_data(&query(), None, &credentials())
            .expect("fetch should succeed");

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].date.format(), "2023-01-05 00:00:00");
        assert_eq!(bars[0].volume, Some(3_968_470_000.0));
        assert_eq!(
            client.recorded_requests()[0].url,
            "https://fmp.test/api/v3/historical-price-full/index/%5EGSPC\
             ?from=2023-01-03&to=2023-01-05&apikey=fk"
        );
    }

    #[test]
    fn intraday_interval_switches_endpoint_and_reads_bare_list() {
        let client = Arc::new(RecordingHttpClient::json(
            200,
            json!([{
                "date": "2023-01-05 15:59:00", "open": 3808.9, "low": 3807.5,
                "high": 3809.2, "close": 3808.1, "volume": 0.0
            }]),
        ));
        let extra = json!({ "interval": "5min", "timeseries": 10 });

        let bars = fetcher(client.clone())
            .fetch_data(&query(), extra.as_object(), &credentials())
            .expect("fetch should succeed");

        assert_eq!(bars[0].date.format(), "2023-01-05 15:59:00");
        assert_eq!(
            client.recorded_requests()[0].url,
            "https://fmp.test/api/v3/historical-chart/5min/%5EGSPC\
             ?from=2023-01-03&to=2023-01-05&timeseries=10&apikey=fk"
        );
    }

    #[test]
    fn empty_historical_is_no_results() {
        let client = Arc::new(RecordingHttpClient::json(
            200,
            json!({ "symbol": "^GSPC", "historical": [] }),
        ));
        let err = fetcher(client)
            .fetch_data(&query(), None, &credentials())
            .expect_err("must fail");
        assert!(matches!(err, FetchError::NoResults));
    }

    #[test]
    fn unknown_interval_literal_is_invalid() {
        let extra = json!({ "interval": "2day" });
        let err = FmpMajorIndicesHistoricalFetcher::transform_query(&query(), extra.as_object())
            .expect_err("must fail");
        assert_eq!(err.code(), "fetch.invalid_query");
    }
}
