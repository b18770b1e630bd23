use ferrofetch_core::{DataKind, ProviderId};
use serde::Serialize;
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::CliError;

/// Standard response envelope for every `ferrofetch` output.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    pub meta: EnvelopeMeta,
    pub data: Value,
}

/// Metadata attached to every envelope.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    pub generated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<ProviderId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<DataKind>,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_count: Option<usize>,
}

impl EnvelopeMeta {
    pub fn new(latency_ms: u64) -> Result<Self, CliError> {
        Ok(Self {
            request_id: Uuid::new_v4().to_string(),
            generated_at: OffsetDateTime::now_utc().format(&Rfc3339)?,
            provider: None,
            kind: None,
            latency_ms,
            record_count: None,
        })
    }

    pub fn for_fetch(mut self, provider: ProviderId, kind: DataKind, record_count: usize) -> Self {
        self.provider = Some(provider);
        self.kind = Some(kind);
        self.record_count = Some(record_count);
        self
    }
}

pub fn render(envelope: &Envelope, pretty: bool) -> Result<(), CliError> {
    let payload = if pretty {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string(envelope)?
    };
    println!("{payload}");
    Ok(())
}
