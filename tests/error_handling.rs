//! Behavior-driven tests for error handling at the transport boundary
//!
//! These tests verify HOW failures surface to the caller: which typed error
//! arrives, what it says, and that nothing partial leaks through.

mod support;

use std::sync::Arc;

use ferrofetch_core::{
    EarningsCallTranscriptQuery, FetchError, FetchErrorKind, Fetcher, FmpClient,
    FmpEarningsCallTranscriptFetcher, HttpError, HttpErrorKind, HttpResponse, PayloadShape,
    PolygonClient, PolygonCryptoPriceFetcher, PolygonStockPriceFetcher, PriceQuery,
    ReqwestHttpClient, Symbol, Transport,
};
use serde_json::json;
use support::{
    credentials, fmp_client, polygon_client, ScriptedHttpClient, UrlEchoingHttpClient,
    FMP_TEST_URL, POLYGON_TEST_URL,
};
use time::macros::date;

fn btc_query() -> PriceQuery {
    PriceQuery::new(
        Symbol::parse("BTCUSD").expect("valid symbol"),
        date!(2023 - 01 - 03),
        Some(date!(2023 - 01 - 04)),
    )
}

fn transcript_query() -> EarningsCallTranscriptQuery {
    EarningsCallTranscriptQuery {
        symbol: Symbol::parse("MSFT").expect("valid symbol"),
        year: 2022,
    }
}

// =============================================================================
// Error Handling: Transport Failures
// =============================================================================

#[test]
fn when_tls_verification_fails_request_is_retried_once_relaxed() {
    // Given: A primary transport with a broken certificate chain and a working fallback
    let primary = ScriptedHttpClient::failing(HttpError::tls("invalid peer certificate: UnknownIssuer"));
    let fallback = ScriptedHttpClient::json(
        200,
        json!({ "results": [{ "t": 1_672_704_000_000_i64, "o": 1.0, "h": 1.0, "l": 1.0, "c": 1.0, "v": 2.0 }] }),
    );
    let client = PolygonClient::new(Transport::new(primary.clone()).with_fallback(fallback.clone()))
        .with_base_url(POLYGON_TEST_URL);
    let fetcher = PolygonCryptoPriceFetcher::new(client);

    // When: A crypto fetch runs
    let bars = fetcher
        .fetch_data(&btc_query(), None, &credentials())
        .expect("fallback should recover");

    // Then: Each transport saw the same request exactly once
    assert_eq!(bars.len(), 1);
    assert_eq!(primary.urls(), fallback.urls());
    assert_eq!(primary.requests().len(), 1);
}

#[test]
fn when_fallback_also_fails_user_gets_transport_error() {
    // Given: Both transports fail
    let primary = ScriptedHttpClient::failing(HttpError::tls("certificate expired"));
    let fallback =
        ScriptedHttpClient::failing(HttpError::new(HttpErrorKind::Connect, "connection refused"));
    let client = PolygonClient::new(Transport::new(primary).with_fallback(fallback))
        .with_base_url(POLYGON_TEST_URL);

    // When: A fetch runs
    let error = PolygonCryptoPriceFetcher::new(client)
        .fetch_data(&btc_query(), None, &credentials())
        .expect_err("should fail");

    // Then: The fallback's error is reported
    match error {
        FetchError::Transport { source, .. } => assert_eq!(source.kind(), HttpErrorKind::Connect),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn when_timeout_occurs_no_fallback_is_attempted() {
    // Given: A timeout on the primary transport
    let primary = ScriptedHttpClient::failing(HttpError::new(HttpErrorKind::Timeout, "timed out"));
    let fallback = Arc::new(ScriptedHttpClient::default());
    let client = PolygonClient::new(Transport::new(primary).with_fallback(fallback.clone()))
        .with_base_url(POLYGON_TEST_URL);

    // When: A fetch runs
    let error = PolygonCryptoPriceFetcher::new(client)
        .fetch_data(&btc_query(), None, &credentials())
        .expect_err("should fail");

    // Then: It is a transport failure and the fallback stayed idle
    assert_eq!(error.kind(), FetchErrorKind::Transport);
    assert!(fallback.requests().is_empty());
}

// =============================================================================
// Error Handling: Vendor Responses
// =============================================================================

#[test]
fn when_vendor_rejects_request_message_field_is_surfaced() {
    // Given: A 403 with a JSON message
    let http = ScriptedHttpClient::json(
        403,
        json!({ "status": "NOT_AUTHORIZED", "message": "You are not entitled to this data." }),
    );

    // When: A fetch runs
    let error = PolygonCryptoPriceFetcher::new(polygon_client(http))
        .fetch_data(&btc_query(), None, &credentials())
        .expect_err("should fail");

    // Then: The vendor message is carried verbatim
    assert_eq!(
        error.to_string(),
        "error in polygon request: You are not entitled to this data."
    );
}

#[test]
fn when_error_body_is_not_json_message_defaults_to_unknown() {
    // Given: A 502 with an HTML body
    let http = ScriptedHttpClient::replying([Ok(HttpResponse::new(502, "<html>Bad Gateway</html>"))]);

    // When: A fetch runs
    let error = FmpEarningsCallTranscriptFetcher::new(fmp_client(http))
        .fetch_data(&transcript_query(), None, &credentials())
        .expect_err("should fail");

    // Then: A generic message is used
    assert!(error.to_string().ends_with("unknown error"));
}

#[test]
fn when_polygon_reports_error_field_user_sees_it() {
    // Given: Polygon's in-body error marker
    let http = ScriptedHttpClient::json(200, json!({ "status": "ERROR", "error": "Unknown API Key" }));

    // When: A fetch runs
    let error = PolygonCryptoPriceFetcher::new(polygon_client(http))
        .fetch_data(&btc_query(), None, &credentials())
        .expect_err("should fail");

    // Then: The marker text is surfaced
    assert_eq!(error.kind(), FetchErrorKind::VendorRequest);
    assert!(error.to_string().contains("Unknown API Key"));
}

// =============================================================================
// Error Handling: Payload Shape and Schema
// =============================================================================

#[test]
fn when_list_endpoint_returns_mapping_user_gets_shape_mismatch() {
    // Given: A mapping where a list of transcripts is expected
    let http = ScriptedHttpClient::json(
        200,
        json!({ "symbol": "MSFT", "quarter": 4, "year": 2022, "date": "2022-07-26 17:00:00", "content": "..." }),
    );

    // When: A fetch runs
    let error = FmpEarningsCallTranscriptFetcher::new(fmp_client(http))
        .fetch_data(&transcript_query(), None, &credentials())
        .expect_err("should fail");

    // Then: Both shapes are named and no record is built
    assert!(matches!(
        error,
        FetchError::ShapeMismatch {
            expected: PayloadShape::Sequence,
            found: PayloadShape::Mapping
        }
    ));
}

#[test]
fn when_one_row_is_invalid_whole_fetch_fails() {
    // Given: One good row and one with an unparseable date
    let http = ScriptedHttpClient::json(
        200,
        json!([
            { "symbol": "MSFT", "quarter": 4, "year": 2022, "date": "2022-07-26 17:00:00", "content": "ok" },
            { "symbol": "MSFT", "quarter": 3, "year": 2022, "date": "26/04/2022", "content": "bad" }
        ]),
    );

    // When: A fetch runs
    let error = FmpEarningsCallTranscriptFetcher::new(fmp_client(http))
        .fetch_data(&transcript_query(), None, &credentials())
        .expect_err("should fail");

    // Then: A schema error points at the bad row
    assert_eq!(error.kind(), FetchErrorKind::SchemaValidation);
    assert!(error.to_string().contains("row 1"));
}

// =============================================================================
// Error Handling: Credential Hygiene
// =============================================================================

#[test]
fn when_transport_error_quotes_the_url_api_key_is_scrubbed() {
    // Given: A transport whose error text embeds the full keyed URL
    let client = PolygonClient::new(Transport::new(UrlEchoingHttpClient::failing(
        HttpErrorKind::Connect,
    )))
    .with_base_url(POLYGON_TEST_URL);

    // When: A fetch fails
    let error = PolygonCryptoPriceFetcher::new(client)
        .fetch_data(&btc_query(), None, &credentials())
        .expect_err("should fail");

    // Then: The path survives for diagnosis but the key does not
    let rendered = error.to_string();
    assert!(!rendered.contains("polygon-test-key"), "{rendered}");
    assert!(rendered.contains("/v2/aggs/ticker/X:BTCUSD/range/"), "{rendered}");
}

#[test]
fn when_tls_fallback_also_fails_neither_message_carries_the_key() {
    // Given: TLS failure then a connect failure, both quoting the URL
    let client = FmpClient::new(
        Transport::new(UrlEchoingHttpClient::failing(HttpErrorKind::Tls))
            .with_fallback(UrlEchoingHttpClient::failing(HttpErrorKind::Connect)),
    )
    .with_base_url(FMP_TEST_URL);

    // When: A fetch fails on both paths
    let error = FmpEarningsCallTranscriptFetcher::new(client)
        .fetch_data(&transcript_query(), None, &credentials())
        .expect_err("should fail");

    // Then: The reported error is clean
    assert_eq!(error.kind(), FetchErrorKind::Transport);
    assert!(!error.to_string().contains("fmp-test-key"));
    assert!(!format!("{error:?}").contains("fmp-test-key"));
}

#[test]
fn when_real_connection_is_refused_for_tls_ticker_no_fallback_runs() {
    // Given: A real client pointed at a closed loopback port, and a ticker spelled TLS
    let fallback = Arc::new(ScriptedHttpClient::default());
    let client = PolygonClient::new(
        Transport::new(Arc::new(ReqwestHttpClient::new()))
            .with_fallback(fallback.clone())
            .with_timeout_ms(2_000),
    )
    .with_base_url("http://127.0.0.1:1");
    let query = PriceQuery::new(
        Symbol::parse("TLS").expect("valid symbol"),
        date!(2023 - 01 - 03),
        Some(date!(2023 - 01 - 04)),
    );

    // When: A stock fetch runs
    let error = PolygonStockPriceFetcher::new(client)
        .fetch_data(&query, None, &credentials())
        .expect_err("nothing listens on port 1");

    // Then: It is a plain transport failure, never retried, with no key in sight
    match &error {
        FetchError::Transport { source, .. } => assert_ne!(source.kind(), HttpErrorKind::Tls),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(fallback.requests().is_empty());
    assert!(!error.to_string().contains("polygon-test-key"));
}
