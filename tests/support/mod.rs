//! Shared fixtures for the behavior suites.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ferrofetch_core::{
    Credentials, FmpClient, HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse,
    PolygonClient, Registry, Transport,
};
use serde_json::Value;

/// In-memory transport that replays canned responses and records requests.
#[derive(Debug, Default)]
pub struct ScriptedHttpClient {
    responses: Mutex<VecDeque<Result<HttpResponse, HttpError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedHttpClient {
    pub fn replying(responses: impl IntoIterator<Item = Result<HttpResponse, HttpError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn json(status: u16, body: Value) -> Arc<Self> {
        Self::replying([Ok(HttpResponse::new(status, body.to_string()))])
    }

    pub fn raw(status: u16, body: &str) -> Arc<Self> {
        Self::replying([Ok(HttpResponse::new(status, body))])
    }

    pub fn failing(error: HttpError) -> Arc<Self> {
        Self::replying([Err(error)])
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("request log lock").clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|request| request.url).collect()
    }
}

impl HttpClient for ScriptedHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requests.lock().expect("request log lock").push(request);
        self.responses
            .lock()
            .expect("response queue lock")
            .pop_front()
            .unwrap_or_else(|| Err(HttpError::new(HttpErrorKind::Other, "no scripted response")))
    }
}

/// Fails every request the way reqwest renders errors: with the full URL.
#[derive(Debug)]
pub struct UrlEchoingHttpClient {
    kind: HttpErrorKind,
}

impl UrlEchoingHttpClient {
    pub fn failing(kind: HttpErrorKind) -> Arc<Self> {
        Arc::new(Self { kind })
    }
}

impl HttpClient for UrlEchoingHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        Err(HttpError::new(
            self.kind,
            format!("error sending request for url ({})", request.url),
        ))
    }
}

pub const POLYGON_TEST_URL: &str = "https://polygon.test";
pub const FMP_TEST_URL: &str = "https://fmp.test/api";

pub fn polygon_client(http: Arc<ScriptedHttpClient>) -> PolygonClient {
    PolygonClient::new(Transport::new(http)).with_base_url(POLYGON_TEST_URL)
}

pub fn fmp_client(http: Arc<ScriptedHttpClient>) -> FmpClient {
    FmpClient::new(Transport::new(http)).with_base_url(FMP_TEST_URL)
}

pub fn registry(http: Arc<ScriptedHttpClient>) -> Registry {
    Registry::with_clients(polygon_client(http.clone()), fmp_client(http))
}

pub fn credentials() -> Credentials {
    Credentials::new()
        .with("polygon_api_key", "polygon-test-key")
        .with("fmp_api_key", "fmp-test-key")
}
