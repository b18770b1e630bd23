use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::access::Transport;
use crate::adapters::{
    FmpAnalystEstimatesFetcher, FmpClient, FmpEarningsCallTranscriptFetcher,
    FmpIncomeStatementFetcher, FmpMajorIndicesHistoricalFetcher, FmpShareStatisticsFetcher, PolygonClient,
    PolygonCryptoPriceFetcher, PolygonStockPriceFetcher,
};
use crate::fetcher::DynFetcher;
use crate::{Credentials, DataKind, FetchError, ProviderId};

/// Fetchers addressable by `(provider, kind)`.
pub struct Registry {
    fetchers: BTreeMap<(ProviderId, DataKind), Arc<dyn DynFetcher>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_transport(Transport::default())
    }
}

impl Registry {
    pub fn new(fetchers: Vec<Arc<dyn DynFetcher>>) -> Self {
        let fetchers = fetchers
            .into_iter()
            .map(|fetcher| ((fetcher.provider(), fetcher.kind()), fetcher))
            .collect();
        Self { fetchers }
    }

    /// Every built-in fetcher sharing one transport.
    pub fn with_transport(transport: Transport) -> Self {
        Self::with_clients(
            PolygonClient::new(transport.clone()),
            FmpClient::new(transport),
        )
    }

    pub fn with_clients(polygon: PolygonClient, fmp: FmpClient) -> Self {
        Self::new(vec![
            Arc::new(PolygonStockPriceFetcher::new(polygon.clone())),
            Arc::new(PolygonCryptoPriceFetcher::new(polygon)),
            Arc::new(FmpMajorIndicesHistoricalFetcher::new(fmp.clone())),
            Arc::new(FmpShareStatisticsFetcher::new(fmp.clone())),
            Arc::new(FmpEarningsCallTranscriptFetcher::new(fmp.clone())),
            Arc::new(FmpAnalystEstimatesFetcher::new(fmp.clone())),
            Arc::new(FmpIncomeStatementFetcher::new(fmp)),
        ])
    }

    /// Register or replace the fetcher for its `(provider, kind)` pair.
    pub fn include(mut self, fetcher: Arc<dyn DynFetcher>) -> Self {
        self.fetchers
            .insert((fetcher.provider(), fetcher.kind()), fetcher);
        self
    }

    pub fn get(&self, provider: ProviderId, kind: DataKind) -> Result<&dyn DynFetcher, FetchError> {
        self.fetchers
            .get(&(provider, kind))
            .map(|fetcher| fetcher.as_ref())
            .ok_or(FetchError::UnsupportedKind { provider, kind })
    }

    /// Registered pairs in provider, then kind order.
    pub fn entries(&self) -> impl Iterator<Item = (ProviderId, DataKind)> + '_ {
        self.fetchers.keys().copied()
    }

    pub fn fetch(
        &self,
        provider: ProviderId,
        kind: DataKind,
        params: &Value,
        credentials: &Credentials,
    ) -> Result<Vec<Value>, FetchError> {
        self.get(provider, kind)?.fetch_json(params, credentials)
    }
}
