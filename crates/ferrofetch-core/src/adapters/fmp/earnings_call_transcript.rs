use serde::{Deserialize, Serialize};

use super::FmpClient;
use crate::decode::{decode_many, Record};
use crate::domain::validate_range;
use crate::fetcher::{merge_query, ExtraParams, Fetcher};
use crate::query::{QueryField, QueryParams};
use crate::{
    Credentials, DataKind, EarningsCallTranscript, EarningsCallTranscriptQuery, FetchError,
    MarketDateTime, ProviderId, Symbol, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmpEarningsCallTranscriptQuery {
    pub symbol: Symbol,
    pub year: i32,
}

impl QueryParams for FmpEarningsCallTranscriptQuery {
    fn query_fields(&self) -> Vec<QueryField> {
        vec![
            QueryField::new("symbol", Some(self.symbol.to_string())),
            QueryField::new("year", Some(self.year.to_string())),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FmpEarningsCallTranscript {
    pub symbol: Symbol,
    pub quarter: u8,
    pub year: i32,
    pub date: MarketDateTime,
    pub content: String,
}

impl Record for FmpEarningsCallTranscript {
    const NAME: &'static str = "fmp earnings call transcript";

    fn validate(&self) -> Result<(), ValidationError> {
        validate_range("quarter", f64::from(self.quarter), 1.0, 4.0)
    }
}

impl From<FmpEarningsCallTranscript> for EarningsCallTranscript {
    fn from(row: FmpEarningsCallTranscript) -> Self {
        Self {
            symbol: row.symbol,
            quarter: row.quarter,
            year: row.year,
            date: row.date,
            content: row.content,
        }
    }
}

/// Every earnings call transcript a company published in one year.
#[derive(Debug, Clone, Default)]
pub struct FmpEarningsCallTranscriptFetcher {
    client: FmpClient,
}

impl FmpEarningsCallTranscriptFetcher {
    pub fn new(client: FmpClient) -> Self {
        Self { client }
    }
}

impl Fetcher for FmpEarningsCallTranscriptFetcher {
    type Query = EarningsCallTranscriptQuery;
    type Data = EarningsCallTranscript;
    type ProviderQuery = FmpEarningsCallTranscriptQuery;
    type ProviderData = FmpEarningsCallTranscript;

    const PROVIDER: ProviderId = ProviderId::Fmp;
    const KIND: DataKind = DataKind::EarningsCallTranscript;

    fn transform_query(
        query: &EarningsCallTranscriptQuery,
        extra: Option<&ExtraParams>,
    ) -> Result<FmpEarningsCallTranscriptQuery, FetchError> {
        merge_query(query, extra)
    }

    fn extract_data(
        &self,
        query: &FmpEarningsCallTranscriptQuery,
        credentials: &Credentials,
    ) -> Result<Vec<FmpEarningsCallTranscript>, FetchError> {
        let endpoint = format!("batch_earning_call_transcript/{}", query.symbol);
        let payload = self
            .client
            .get_json(4, &endpoint, query, &["symbol"], credentials)?;
        decode_many(payload, None)
    }

    fn transform_data(data: Vec<FmpEarningsCallTranscript>) -> Vec<EarningsCallTranscript> {
        data.into_iter().map(EarningsCallTranscript::from).collect()
    }
}
