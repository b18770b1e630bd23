use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Default request timeout applied by the access helper.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// HTTP request envelope used by adapter transport calls.
///
/// Only GET is modeled; every vendor endpoint is query-string authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: BTreeMap::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// HTTP response envelope returned by an adapter transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }
}

/// Transport failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpErrorKind {
    /// Secure-connection handshake or certificate verification failed.
    Tls,
    Timeout,
    Connect,
    Body,
    Other,
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    kind: HttpErrorKind,
    message: String,
}

impl HttpError {
    pub fn new(kind: HttpErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn tls(message: impl Into<String>) -> Self {
        Self::new(HttpErrorKind::Tls, message)
    }

    pub fn body(message: impl Into<String>) -> Self {
        Self::new(HttpErrorKind::Body, message)
    }

    pub const fn kind(&self) -> HttpErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn is_tls(&self) -> bool {
        matches!(self.kind, HttpErrorKind::Tls)
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Blocking transport contract shared by every vendor adapter.
pub trait HttpClient: Send + Sync {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Production HTTP client using `reqwest`'s blocking API.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::blocking::Client>,
}

impl ReqwestHttpClient {
    /// Client with full certificate verification.
    pub fn new() -> Self {
        Self::with_client(
            reqwest::blocking::Client::builder()
                .user_agent(user_agent())
                .build()
                .unwrap_or_else(|_| reqwest::blocking::Client::new()),
        )
    }

    /// Client that accepts invalid certificates; only used as the TLS fallback path.
    ///
    /// Fails rather than handing back a verifying client, since a fallback
    /// that verifies would only repeat the failed request.
    pub fn relaxed() -> Result<Self, HttpError> {
        reqwest::blocking::Client::builder()
            .user_agent(user_agent())
            .danger_accept_invalid_certs(true)
            .build()
            .map(Self::with_client)
            .map_err(|error| {
                HttpError::new(
                    HttpErrorKind::Other,
                    format!("failed to build relaxed client: {}", error.without_url()),
                )
            })
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut builder = self
            .client
            .get(&request.url)
            .timeout(Duration::from_millis(request.timeout_ms));

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        // reqwest renders the full URL, credential included, unless stripped.
        let response = builder.send().map_err(|error| {
            let error = error.without_url();
            HttpError::new(classify(&error), format!("request failed: {error}"))
        })?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|error| {
            HttpError::body(format!("failed to read response body: {}", error.without_url()))
        })?;

        Ok(HttpResponse { status, body })
    }
}

fn user_agent() -> String {
    format!("ferrofetch/{}", env!("CARGO_PKG_VERSION"))
}

fn classify(error: &reqwest::Error) -> HttpErrorKind {
    if error.is_timeout() {
        HttpErrorKind::Timeout
    } else if is_tls_failure(error.source()) {
        // TLS failures also report `is_connect`, so check them first.
        HttpErrorKind::Tls
    } else if error.is_connect() {
        HttpErrorKind::Connect
    } else {
        HttpErrorKind::Other
    }
}

/// Inspects only the causes below the reqwest error, whose own text can
/// carry the request path.
fn is_tls_failure(source: Option<&(dyn StdError + 'static)>) -> bool {
    let mut current = source;
    while let Some(error) = current {
        let text = error.to_string().to_ascii_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        current = error.source();
    }
    false
}
