use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::http_client::HttpError;
use crate::{DataKind, ProviderId};

/// Validation and contract errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid provider '{value}', expected one of polygon, fmp")]
    InvalidProvider { value: String },
    #[error(
        "invalid data kind '{value}', expected one of stock_price, crypto_price, \
         major_indices_historical, share_statistics, earnings_call_transcript, analyst_estimates"
    )]
    InvalidDataKind { value: String },

    #[error("date must be YYYY-MM-DD or YYYY-MM-DD HH:MM:SS: '{value}'")]
    InvalidDateTime { value: String },
    #[error("epoch timestamp {millis}ms is out of range")]
    TimestampOutOfRange { millis: i64 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },
    #[error("field '{field}' must be positive")]
    NonPositiveValue { field: &'static str },
    #[error("field '{field}' must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

/// Shape of a decoded JSON payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Mapping,
    Sequence,
    Scalar,
}

impl PayloadShape {
    pub fn of(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(_) => Self::Mapping,
            serde_json::Value::Array(_) => Self::Sequence,
            _ => Self::Scalar,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::Scalar => "scalar",
        }
    }
}

impl Display for PayloadShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fetch-pipeline error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    EndpointNotFound,
    VendorRequest,
    NoResults,
    ShapeMismatch,
    SchemaValidation,
    Transport,
    InvalidQuery,
    MissingCredential,
    UnsupportedKind,
}

/// Typed failure surfaced by every fetch stage.
///
/// Stages fail fast on the first error; none of these are retried internally.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{provider} endpoint doesn't exist")]
    EndpointNotFound { provider: ProviderId },

    #[error("error in {provider} request: {message}")]
    VendorRequest {
        provider: ProviderId,
        message: String,
    },

    #[error("no results found; try adjusting the query parameters")]
    NoResults,

    #[error("expected {expected}, got {found}")]
    ShapeMismatch {
        expected: PayloadShape,
        found: PayloadShape,
    },

    #[error("invalid {record} record: {message}")]
    SchemaValidation {
        record: &'static str,
        message: String,
    },

    #[error("{provider} transport error: {source}")]
    Transport {
        provider: ProviderId,
        #[source]
        source: HttpError,
    },

    #[error("invalid query: {message}")]
    InvalidQuery { message: String },

    #[error("missing credential '{key}'")]
    MissingCredential { key: String },

    #[error("provider '{provider}' has no fetcher for '{kind}'")]
    UnsupportedKind { provider: ProviderId, kind: DataKind },
}

impl FetchError {
    pub fn vendor_request(provider: ProviderId, message: impl Into<String>) -> Self {
        Self::VendorRequest {
            provider,
            message: message.into(),
        }
    }

    pub fn schema_validation(record: &'static str, message: impl Into<String>) -> Self {
        Self::SchemaValidation {
            record,
            message: message.into(),
        }
    }

    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::EndpointNotFound { .. } => FetchErrorKind::EndpointNotFound,
            Self::VendorRequest { .. } => FetchErrorKind::VendorRequest,
            Self::NoResults => FetchErrorKind::NoResults,
            Self::ShapeMismatch { .. } => FetchErrorKind::ShapeMismatch,
            Self::SchemaValidation { .. } => FetchErrorKind::SchemaValidation,
            Self::Transport { .. } => FetchErrorKind::Transport,
            Self::InvalidQuery { .. } => FetchErrorKind::InvalidQuery,
            Self::MissingCredential { .. } => FetchErrorKind::MissingCredential,
            Self::UnsupportedKind { .. } => FetchErrorKind::UnsupportedKind,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self.kind() {
            FetchErrorKind::EndpointNotFound => "fetch.endpoint_not_found",
            FetchErrorKind::VendorRequest => "fetch.vendor_request",
            FetchErrorKind::NoResults => "fetch.no_results",
            FetchErrorKind::ShapeMismatch => "fetch.shape_mismatch",
            FetchErrorKind::SchemaValidation => "fetch.schema_validation",
            FetchErrorKind::Transport => "fetch.transport",
            FetchErrorKind::InvalidQuery => "fetch.invalid_query",
            FetchErrorKind::MissingCredential => "fetch.missing_credential",
            FetchErrorKind::UnsupportedKind => "fetch.unsupported_kind",
        }
    }
}
