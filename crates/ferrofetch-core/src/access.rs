use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, DEFAULT_TIMEOUT_MS,
};
use crate::query::redact;
use crate::{FetchError, ProviderId};

const UNKNOWN_ERROR: &str = "unknown error";

/// Shared HTTP transport: a verifying client plus an optional relaxed
/// fallback used only after a TLS failure.
#[derive(Clone)]
pub struct Transport {
    primary: Arc<dyn HttpClient>,
    fallback: Option<Arc<dyn HttpClient>>,
    timeout_ms: u64,
}

impl Transport {
    /// Transport without a TLS fallback.
    pub fn new(primary: Arc<dyn HttpClient>) -> Self {
        Self {
            primary,
            fallback: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn HttpClient>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub const fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn send(&self, provider: ProviderId, url: &str) -> Result<HttpResponse, FetchError> {
        let request = HttpRequest::get(url)
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        match self.primary.execute(request.clone()).map_err(|error| scrub(error, url)) {
            Ok(response) => Ok(response),
            Err(error) if error.is_tls() => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        provider = %provider,
                        url = redact(url),
                        error = %error,
                        "tls verification failed; retrying with relaxed transport"
                    );
                    fallback.execute(request).map_err(|error| FetchError::Transport {
                        provider,
                        source: scrub(error, url),
                    })
                }
                None => Err(FetchError::Transport {
                    provider,
                    source: error,
                }),
            },
            Err(source) => Err(FetchError::Transport { provider, source }),
        }
    }
}

/// Drops the query string and the trailing credential value from a
/// transport message, whatever client produced it.
fn scrub(error: HttpError, url: &str) -> HttpError {
    let Some((_, query)) = url.split_once('?') else {
        return error;
    };
    let credential = query
        .rsplit('&')
        .next()
        .and_then(|pair| pair.split_once('='))
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty());

    let mut message = error.message().to_owned();
    if !query.is_empty() {
        message = message.replace(query, "[redacted]");
    }
    if let Some(credential) = credential {
        message = message.replace(credential, "[redacted]");
    }
    HttpError::new(error.kind(), message)
}

impl Default for Transport {
    fn default() -> Self {
        let transport = Self::new(Arc::new(ReqwestHttpClient::new()));
        match ReqwestHttpClient::relaxed() {
            Ok(relaxed) => transport.with_fallback(Arc::new(relaxed)),
            Err(error) => {
                warn!(error = %error, "relaxed transport unavailable; tls fallback disabled");
                transport
            }
        }
    }
}

impl Debug for Transport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("fallback", &self.fallback.is_some())
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// GET-and-classify helper bound to one vendor's conventions.
#[derive(Debug, Clone)]
pub struct JsonApi {
    provider: ProviderId,
    transport: Transport,
    error_marker: &'static str,
}

impl JsonApi {
    /// `error_marker` is the top-level field a vendor uses to report errors
    /// inside an otherwise successful response.
    pub fn new(provider: ProviderId, transport: Transport, error_marker: &'static str) -> Self {
        Self {
            provider,
            transport,
            error_marker,
        }
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.transport = self.transport.with_timeout_ms(timeout_ms);
        self
    }

    pub const fn provider(&self) -> ProviderId {
        self.provider
    }

    pub fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        debug!(provider = %self.provider, url = redact(url), "issuing vendor request");
        let response = self.transport.send(self.provider, url)?;
        debug!(
            provider = %self.provider,
            status = response.status,
            bytes = response.body.len(),
            "vendor response received"
        );
        classify_response(self.provider, self.error_marker, &response)
    }
}

/// Map a raw response onto a JSON payload or the first failure that applies.
pub fn classify_response(
    provider: ProviderId,
    error_marker: &str,
    response: &HttpResponse,
) -> Result<Value, FetchError> {
    if response.status == 404 {
        return Err(FetchError::EndpointNotFound { provider });
    }

    if response.status != 200 {
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|body| body.get("message").map(message_text))
            .unwrap_or_else(|| UNKNOWN_ERROR.to_owned());
        return Err(FetchError::vendor_request(provider, message));
    }

    let payload: Value =
        serde_json::from_str(&response.body).map_err(|error| FetchError::Transport {
            provider,
            source: HttpError::body(format!("response body is not valid JSON: {error}")),
        })?;

    if let Some(marker) = payload.get(error_marker) {
        return Err(FetchError::vendor_request(provider, message_text(marker)));
    }

    if is_empty(&payload) {
        return Err(FetchError::NoResults);
    }

    Ok(payload)
}

fn message_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => UNKNOWN_ERROR.to_owned(),
        other => other.to_string(),
    }
}

/// Zero elements, not "falsy": `0` and `false` are still results.
pub(crate) fn is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        _ => false,
    }
}
