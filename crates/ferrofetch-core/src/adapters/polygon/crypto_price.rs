use super::{PolygonAggregateBar, PolygonClient, PolygonPriceQuery};
use crate::fetcher::{merge_query, ExtraParams, Fetcher};
use crate::{Credentials, DataKind, FetchError, PriceBar, PriceQuery, ProviderId};

/// Polygon's crypto tickers live under the `X:` namespace (`X:BTCUSD`).
const CRYPTO_PREFIX: &str = "X:";

#[derive(Debug, Clone, Default)]
pub struct PolygonCryptoPriceFetcher {
    client: PolygonClient,
}

impl PolygonCryptoPriceFetcher {
    pub fn new(client: PolygonClient) -> Self {
        Self { client }
    }
}

impl Fetcher for PolygonCryptoPriceFetcher {
    type Query = PriceQuery;
    type Data = PriceBar;
    type ProviderQuery = PolygonPriceQuery;
    type ProviderData = PolygonAggregateBar;

    const PROVIDER: ProviderId = ProviderId::Polygon;
    const KIND: DataKind = DataKind::CryptoPrice;

    fn transform_query(
        query: &PriceQuery,
        extra: Option<&ExtraParams>,
    ) -> Result<PolygonPriceQuery, FetchError> {
        merge_query::<_, PolygonPriceQuery>(query, extra)?.checked()
    }

    fn extract_data(
        &self,
        query: &PolygonPriceQuery,
        credentials: &Credentials,
    ) -> Result<Vec<PolygonAggregateBar>, FetchError> {
        self.client.aggregates(query, CRYPTO_PREFIX, credentials)
    }

    fn transform_data(data: Vec<PolygonAggregateBar>) -> Vec<PriceBar> {
        data.into_iter().map(PriceBar::from).collect()
    }
}
