use ferrofetch_core::{Credentials, DataKind, ProviderId, Registry};
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Serialize)]
struct ProviderStatus {
    id: ProviderId,
    credential_key: &'static str,
    configured: bool,
    kinds: Vec<DataKind>,
}

pub fn run(registry: &Registry, credentials: &Credentials) -> Result<Value, CliError> {
    let providers = ProviderId::ALL
        .into_iter()
        .map(|id| ProviderStatus {
            id,
            credential_key: id.credential_key(),
            configured: credentials.contains(id.credential_key()),
            kinds: registry
                .entries()
                .filter(|(provider, _)| *provider == id)
                .map(|(_, kind)| kind)
                .collect(),
        })
        .collect::<Vec<_>>();

    Ok(serde_json::to_value(providers)?)
}
