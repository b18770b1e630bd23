use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

use secrecy::{ExposeSecret, SecretString};

use crate::{FetchError, ProviderId};

/// Environment variables consulted by [`Credentials::from_env`], in priority order.
const ENV_KEYS: [(ProviderId, [&str; 2]); 2] = [
    (
        ProviderId::Polygon,
        ["FERROFETCH_POLYGON_API_KEY", "POLYGON_API_KEY"],
    ),
    (ProviderId::Fmp, ["FERROFETCH_FMP_API_KEY", "FMP_API_KEY"]),
];

/// Named API secrets handed to fetchers at extraction time.
///
/// Keys follow the `<provider>_api_key` convention (see
/// [`ProviderId::credential_key`]). Values never appear in `Debug` output.
#[derive(Default)]
pub struct Credentials {
    secrets: BTreeMap<String, SecretString>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value: String = value.into();
        self.secrets.insert(key.into(), SecretString::from(value));
    }

    pub fn get(&self, key: &str) -> Option<&SecretString> {
        self.secrets.get(key)
    }

    /// Resolve a key, treating an empty value the same as an absent one.
    pub fn require(&self, key: &str) -> Result<&str, FetchError> {
        self.secrets
            .get(key)
            .map(|secret| secret.expose_secret())
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| FetchError::MissingCredential {
                key: key.to_owned(),
            })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.require(key).is_ok()
    }

    /// Load provider keys from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut credentials = Self::new();
        for (provider, names) in ENV_KEYS {
            let value = names
                .iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.trim().is_empty());
            if let Some(value) = value {
                credentials.insert(provider.credential_key(), value);
            }
        }
        credentials
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.secrets.keys().collect::<Vec<_>>())
            .finish()
    }
}
