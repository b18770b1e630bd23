//! Financial Modeling Prep adapters.

mod analyst_estimates;
mod earnings_call_transcript;
mod income_statement;
mod major_indices_historical;
mod share_statistics;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access::{JsonApi, Transport};
use crate::query::{QueryParams, UrlBuilder};
use crate::{Credentials, FetchError, ProviderId};

pub use analyst_estimates::{
    FmpAnalystEstimate, FmpAnalystEstimatesFetcher, FmpAnalystEstimatesQuery,
};
pub use earnings_call_transcript::{
    FmpEarningsCallTranscript, FmpEarningsCallTranscriptFetcher, FmpEarningsCallTranscriptQuery,
};
pub use income_statement::{
    FmpIncomeStatement, FmpIncomeStatementFetcher, FmpIncomeStatementQuery,
};
pub use major_indices_historical::{
    FmpInterval, FmpMajorIndexBar, FmpMajorIndicesHistoricalFetcher, FmpMajorIndicesQuery,
};
pub use share_statistics::{
    FmpShareStatistics, FmpShareStatisticsFetcher, FmpShareStatisticsQuery,
};

pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api";

const CREDENTIAL_PARAM: &str = "apikey";
const ERROR_MARKER: &str = "Error Message";

/// FMP spells the quarterly period `quarter`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FmpPeriod {
    #[default]
    Annual,
    #[serde(alias = "quarterly")]
    Quarter,
}

impl FmpPeriod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Annual => "annual",
            Self::Quarter => "quarter",
        }
    }
}

/// Shared FMP configuration: transport, base URL and error conventions.
#[derive(Debug, Clone)]
pub struct FmpClient {
    api: JsonApi,
    urls: UrlBuilder,
}

impl FmpClient {
    pub fn new(transport: Transport) -> Self {
        Self {
            api: JsonApi::new(ProviderId::Fmp, transport, ERROR_MARKER),
            urls: UrlBuilder::new(FMP_BASE_URL, CREDENTIAL_PARAM),
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

    fn get_json(
        &self,
        version: u8,
        endpoint: &str,
        query: &dyn QueryParams,
        exclude: &[&str],
        credentials: &Credentials,
    ) -> Result<Value, FetchError> {
        let api_key = credentials.require(ProviderId::Fmp.credential_key())?;
        let url = self
            .urls
            .build(version, endpoint, api_key, Some(query), exclude);
        self.api.get_json(&url)
    }
}

impl Default for FmpClient {
    fn default() -> Self {
        Self::new(Transport::default())
    }
}
