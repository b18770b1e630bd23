use serde::{Deserialize, Serialize};

use super::FmpClient;
use crate::decode::{decode_many, Record};
use crate::domain::{validate_non_negative, validate_range};
use crate::fetcher::{merge_query, ExtraParams, Fetcher};
use crate::query::{QueryField, QueryParams};
use crate::{
    Credentials, DataKind, FetchError, MarketDateTime, ProviderId, ShareStatistics,
    ShareStatisticsQuery, Symbol, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmpShareStatisticsQuery {
    pub symbol: Symbol,
}

impl QueryParams for FmpShareStatisticsQuery {
    fn query_fields(&self) -> Vec<QueryField> {
        vec![QueryField::new("symbol", Some(self.symbol.to_string()))]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpShareStatistics {
    pub symbol: Symbol,
    pub date: MarketDateTime,
    pub free_float: f64,
    pub float_shares: f64,
    pub outstanding_shares: f64,
    #[serde(default)]
    pub source: Option<String>,
}

impl Record for FmpShareStatistics {
    const NAME: &'static str = "fmp share statistics";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_range("free_float", self.free_float, 0.0, 100.0)?;
        validate_non_negative("float_shares", self.float_shares)?;
        validate_non_negative("outstanding_shares", self.outstanding_shares)
    }
}

impl From<FmpShareStatistics> for ShareStatistics {
    fn from(row: FmpShareStatistics) -> Self {
        Self {
            symbol: row.symbol,
            date: row.date,
            free_float: row.free_float,
            float_shares: row.float_shares,
            outstanding_shares: row.outstanding_shares,
            source: row.source,
        }
    }
}

/// Float and outstanding-share counts from FMP's `shares_float` endpoint.
#[derive(Debug, Clone, Default)]
pub struct FmpShareStatisticsFetcher {
    client: FmpClient,
}

impl FmpShareStatisticsFetcher {
    pub fn new(client: FmpClient) -> Self {
        Self { client }
    }
}

impl Fetcher for FmpShareStatisticsFetcher {
    type Query = ShareStatisticsQuery;
    type Data = ShareStatistics;
    type ProviderQuery = FmpShareStatisticsQuery;
    type ProviderData = FmpShareStatistics;

    const PROVIDER: ProviderId = ProviderId::Fmp;
    const KIND: DataKind = DataKind::ShareStatistics;

    fn transform_query(
        query: &ShareStatisticsQuery,
        extra: Option<&ExtraParams>,
    ) -> Result<FmpShareStatisticsQuery, FetchError> {
        merge_query(query, extra)
    }

    fn extract_data(
        &self,
        query: &FmpShareStatisticsQuery,
        credentials: &Credentials,
    ) -> Result<Vec<FmpShareStatistics>, FetchError> {
        let payload = self
            .client
            .get_json(4, "shares_float", query, &[], credentials)?;
        decode_many(payload, None)
    }

    fn transform_data(data: Vec<FmpShareStatistics>) -> Vec<ShareStatistics> {
        data.into_iter().map(ShareStatistics::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::access::Transport;
    use crate::http_client::testing::RecordingHttpClient;
    use crate::FetchErrorKind;

    fn fetcher(client: Arc<RecordingHttpClient>) -> FmpShareStatisticsFetcher {
        FmpShareStatisticsFetcher::new(
            FmpClient::new(Transport::new(client)).with_base_url("https://fmp.test/api"),
        )
    }

    fn query() -> ShareStatisticsQuery {
        ShareStatisticsQuery {
            symbol: Symbol::parse("aapl").expect("valid symbol"),
        }
    }

    #[test]
    fn maps_camel_case_fields() {
        let client = Arc::new(RecordingHttpClient::json(
            200,
            json!([{
                "symbol": "AAPL", "date": "2023-08-30 18:03:04", "freeFloat": 99.89,
                "floatShares": 15_617_709_264.0, "outstandingShares": 15_634_199_999.0,
                "source": "https://www.sec.gov/Archives/edgar/data/320193/000032019323000077/0000320193-23-000077-index.htm"
            }]),
        ));

        let rows = fetcher(client.clone())
            .fetch_data(&query(), None, &Credentials::new().with("fmp_api_key", "fk"))
            .expect("fetch should succeed");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].free_float, 99.89);
        assert_eq!(rows[0].date.format(), "2023-08-30 18:03:04");
        assert_eq!(
            client.recorded_requests()[0].url,
            "https://fmp.test/api/v4/shares_float?symbol=AAPL&apikey=fk"
        );
    }

    #[test]
    fn free_float_above_one_hundred_fails_validation() {
        let client = Arc::new(RecordingHttpClient::json(
            200,
            json!([{
                "symbol": "AAPL", "date": "2023-08-30 18:03:04", "freeFloat": 140.0,
                "floatShares": 1.0, "outstandingShares": 1.0
            }]),
        ));

        let err = fetcher(client)
            .fetch_data(&query(), None, &Credentials::new().with("fmp_api_key", "fk"))
            .expect_err("must fail");
        assert_eq!(err.kind(), FetchErrorKind::SchemaValidation);
        assert!(err.to_string().contains("free_float"));
    }
}
