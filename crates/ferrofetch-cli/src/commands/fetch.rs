use ferrofetch_core::{Credentials, Registry, Symbol};
use serde_json::{Map, Value};
use tracing::debug;

use crate::cli::FetchArgs;
use crate::error::CliError;

pub fn run(
    args: &FetchArgs,
    registry: &Registry,
    credentials: &Credentials,
) -> Result<Vec<Value>, CliError> {
    let params = build_params(args)?;
    debug!(provider = %args.provider, kind = %args.kind, "running fetch command");
    Ok(registry.fetch(args.provider, args.kind, &params, credentials)?)
}

/// Canonical fields from the flags, then `--param` extras in order given.
fn build_params(args: &FetchArgs) -> Result<Value, CliError> {
    let mut params = Map::new();
    if let Some(symbol) = &args.symbol {
        let symbol = Symbol::parse(symbol)?;
        params.insert(String::from("symbol"), Value::String(symbol.into()));
    }
    if let Some(start_date) = &args.start_date {
        params.insert(String::from("start_date"), Value::String(start_date.clone()));
    }
    if let Some(end_date) = &args.end_date {
        params.insert(String::from("end_date"), Value::String(end_date.clone()));
    }

    for raw in &args.params {
        let (key, value) = parse_param(raw)?;
        params.insert(key, value);
    }

    Ok(Value::Object(params))
}

fn parse_param(raw: &str) -> Result<(String, Value), CliError> {
    let (key, value) = raw
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .ok_or_else(|| CliError::InvalidParam(raw.to_owned()))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.trim().to_owned(), value))
}
