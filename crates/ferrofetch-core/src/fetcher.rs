use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, debug_span};

use crate::decode::Record;
use crate::query::QueryParams;
use crate::{Credentials, DataKind, FetchError, ProviderId};

/// Vendor-only parameters merged into a vendor query on top of the canonical one.
pub type ExtraParams = Map<String, Value>;

/// Three-stage pipeline binding one vendor endpoint to one canonical schema.
///
/// `transform_query` and `transform_data` are pure; only `extract_data`
/// performs I/O. Implementations hold immutable configuration and a shared
/// transport, so one instance serves any number of threads.
pub trait Fetcher: Send + Sync {
    type Query: Serialize + DeserializeOwned;
    type Data: Serialize;
    type ProviderQuery: DeserializeOwned + QueryParams;
    type ProviderData: Record;

    const PROVIDER: ProviderId;
    const KIND: DataKind;

    /// Fill vendor defaults and merge `extra`. Unknown keys or bad literals
    /// fail with [`FetchError::InvalidQuery`].
    fn transform_query(
        query: &Self::Query,
        extra: Option<&ExtraParams>,
    ) -> Result<Self::ProviderQuery, FetchError>;

    fn extract_data(
        &self,
        query: &Self::ProviderQuery,
        credentials: &Credentials,
    ) -> Result<Vec<Self::ProviderData>, FetchError>;

    fn transform_data(data: Vec<Self::ProviderData>) -> Vec<Self::Data>;

    /// Run all three stages in order; the first failure wins.
    fn fetch_data(
        &self,
        query: &Self::Query,
        extra: Option<&ExtraParams>,
        credentials: &Credentials,
    ) -> Result<Vec<Self::Data>, FetchError> {
        let span = debug_span!(
            "fetch",
            provider = Self::PROVIDER.as_str(),
            kind = Self::KIND.as_str()
        );
        let _entered = span.enter();

        let provider_query = Self::transform_query(query, extra)?;
        let provider_data = self.extract_data(&provider_query, credentials)?;
        let data = Self::transform_data(provider_data);
        debug!(records = data.len(), "fetch completed");
        Ok(data)
    }
}

/// Build a vendor query from the canonical query's fields plus `extra`.
///
/// Unset canonical fields are dropped so vendor defaults apply. An extra key
/// may fill an unset canonical field but never contradict a set one.
pub fn merge_query<C, V>(canonical: &C, extra: Option<&ExtraParams>) -> Result<V, FetchError>
where
    C: Serialize,
    V: DeserializeOwned,
{
    let mut fields = match serde_json::to_value(canonical) {
        Ok(Value::Object(fields)) => fields,
        Ok(_) => return Err(FetchError::invalid_query("query must serialize to a mapping")),
        Err(error) => return Err(FetchError::invalid_query(error.to_string())),
    };
    fields.retain(|_, value| !value.is_null());

    for (key, value) in extra.into_iter().flatten() {
        match fields.get(key) {
            Some(existing) if existing != value => {
                return Err(FetchError::invalid_query(format!(
                    "parameter '{key}' conflicts with the query value {existing}"
                )));
            }
            _ => {
                fields.insert(key.clone(), value.clone());
            }
        }
    }

    serde_json::from_value(Value::Object(fields))
        .map_err(|error| FetchError::invalid_query(error.to_string()))
}

/// Object-safe view over any [`Fetcher`], speaking JSON at both ends.
pub trait DynFetcher: Send + Sync {
    fn provider(&self) -> ProviderId;
    fn kind(&self) -> DataKind;

    /// `params` holds the canonical query fields plus any vendor extras.
    fn fetch_json(&self, params: &Value, credentials: &Credentials)
        -> Result<Vec<Value>, FetchError>;
}

impl<F: Fetcher> DynFetcher for F {
    fn provider(&self) -> ProviderId {
        F::PROVIDER
    }

    fn kind(&self) -> DataKind {
        F::KIND
    }

    fn fetch_json(
        &self,
        params: &Value,
        credentials: &Credentials,
    ) -> Result<Vec<Value>, FetchError> {
        let Value::Object(params) = params else {
            return Err(FetchError::invalid_query("parameters must be a JSON object"));
        };

        let query: F::Query = serde_json::from_value(Value::Object(params.clone()))
            .map_err(|error| FetchError::invalid_query(error.to_string()))?;
        let canonical_keys = match serde_json::to_value(&query) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        };
        let extra: ExtraParams = params
            .iter()
            .filter(|(key, _)| !canonical_keys.contains_key(key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let extra = (!extra.is_empty()).then_some(extra);

        self.fetch_data(&query, extra.as_ref(), credentials)?
            .iter()
            .map(|record| {
                serde_json::to_value(record)
                    .map_err(|error| FetchError::schema_validation("canonical", error.to_string()))
            })
            .collect()
    }
}
