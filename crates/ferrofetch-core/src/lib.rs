//! # Ferrofetch Core
//!
//! Vendor fetchers that turn market-data REST responses into canonical records.
//!
//! ## Overview
//!
//! Every vendor endpoint is wrapped by a [`Fetcher`] that runs three stages:
//!
//! 1. `transform_query` merges a canonical query with vendor-only extras
//! 2. `extract_data` builds the URL, performs one GET and decodes the rows
//! 3. `transform_data` maps vendor rows onto the canonical schema
//!
//! Shared helpers keep the request/response contract uniform across vendors:
//! [`UrlBuilder`] for deterministic URLs, [`JsonApi`] for response
//! classification and [`decode_many`]/[`decode_one`] for strict row decoding.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`access`] | GET-and-classify helper with TLS fallback |
//! | [`adapters`] | Polygon and FMP fetchers |
//! | [`credentials`] | Per-call API secrets |
//! | [`decode`] | Raw JSON to validated vendor records |
//! | [`domain`] | Canonical queries and records |
//! | [`error`] | Core error types |
//! | [`fetcher`] | Fetcher pipeline trait and its type-erased form |
//! | [`http_client`] | Blocking HTTP client abstraction |
//! | [`query`] | Query-string metadata and URL assembly |
//! | [`registry`] | Fetchers keyed by provider and data kind |
//! | [`source`] | Provider and data-kind identifiers |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ferrofetch_core::{Credentials, Fetcher, PolygonStockPriceFetcher, PriceQuery, Symbol};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = PolygonStockPriceFetcher::default();
//!     let query = PriceQuery::new(
//!         Symbol::parse("AAPL")?,
//!         time::macros::date!(2023 - 01 - 03),
//!         None,
//!     );
//!
//!     let bars = fetcher.fetch_data(&query, None, &Credentials::from_env())?;
//!     for bar in bars {
//!         println!("{} close={:.2}", bar.date, bar.close);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every stage returns [`FetchError`]; the first failure ends the fetch and
//! nothing is retried apart from the single TLS fallback:
//!
//! ```rust
//! use ferrofetch_core::{FetchError, FetchErrorKind};
//!
//! fn handle_error(error: FetchError) {
//!     match error.kind() {
//!         FetchErrorKind::NoResults => {
//!             // Widen the date range
//!         }
//!         FetchErrorKind::MissingCredential => {
//!             // Ask for an API key
//!         }
//!         _ => eprintln!("{}: {error}", error.code()),
//!     }
//! }
//! ```
//!
//! ## Security
//!
//! - API keys are held as `SecretString` and passed per call
//! - Logged URLs never include the query string, so keys stay out of logs

pub mod access;
pub mod adapters;
pub mod credentials;
pub mod decode;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod http_client;
pub mod query;
pub mod registry;
pub mod source;

// Re-export commonly used types at crate root for convenience

// Access helper
pub use access::{classify_response, JsonApi, Transport};

// Adapter implementations
pub use adapters::{
    FmpAnalystEstimatesFetcher, FmpClient, FmpEarningsCallTranscriptFetcher,
    FmpIncomeStatementFetcher, FmpMajorIndicesHistoricalFetcher, FmpShareStatisticsFetcher,
    PolygonClient,
    PolygonCryptoPriceFetcher, PolygonStockPriceFetcher,
};

// Credentials
pub use credentials::Credentials;

// Decoder
pub use decode::{decode_many, decode_one, Record};

// Domain models
pub use domain::{
    AnalystEstimate, AnalystEstimatesQuery, EarningsCallTranscript, EarningsCallTranscriptQuery,
    EstimateRange, IncomeStatement, IncomeStatementQuery, MajorIndexBar,
    MajorIndicesHistoricalQuery, MarketDateTime, PriceBar, PriceQuery, ReportPeriod,
    ShareStatistics, ShareStatisticsQuery, Symbol,
};

// Error types
pub use error::{FetchError, FetchErrorKind, PayloadShape, ValidationError};

// Fetcher pipeline
pub use fetcher::{merge_query, DynFetcher, ExtraParams, Fetcher};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpErrorKind, HttpRequest, HttpResponse, ReqwestHttpClient,
    DEFAULT_TIMEOUT_MS,
};

// URL assembly
pub use query::{QueryField, QueryParams, UrlBuilder};

// Registry
pub use registry::Registry;

// Source identifiers
pub use source::{DataKind, ProviderId};
