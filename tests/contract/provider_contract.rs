//! Contract tests every registered (provider, kind) pair must satisfy.

#[path = "../support/mod.rs"]
mod support;

use ferrofetch_core::{Credentials, DataKind, FetchError, ProviderId};
use serde_json::{json, Value};
use support::{credentials, registry, ScriptedHttpClient};

struct ContractCase {
    provider: ProviderId,
    kind: DataKind,
    params: Value,
    fixture: Value,
    expected_fields: &'static [&'static str],
    url_fragment: &'static str,
}

fn price_fixture() -> Value {
    json!({
        "status": "OK",
        "results": [{ "t": 1_672_876_800_000_i64, "o": 1.0, "h": 2.0, "l": 0.5, "c": 1.5, "v": 10.0 }]
    })
}

fn contract_cases() -> Vec<ContractCase> {
    vec![
        ContractCase {
            provider: ProviderId::Polygon,
            kind: DataKind::StockPrice,
            params: json!({ "symbol": "AAPL", "start_date": "2023-01-03", "end_date": "2023-01-06" }),
            fixture: price_fixture(),
            expected_fields: &["date", "open", "high", "low", "close", "volume"],
            url_fragment: "/v2/aggs/ticker/AAPL/range/1/day/",
        },
        ContractCase {
            provider: ProviderId::Polygon,
            kind: DataKind::CryptoPrice,
            params: json!({ "symbol": "BTCUSD", "start_date": "2023-01-03", "end_date": "2023-01-06" }),
            fixture: price_fixture(),
            expected_fields: &["date", "open", "high", "low", "close", "volume"],
            url_fragment: "/v2/aggs/ticker/X:BTCUSD/range/1/day/",
        },
        ContractCase {
            provider: ProviderId::Fmp,
            kind: DataKind::MajorIndicesHistorical,
            params: json!({ "symbol": "DJI" }),
            fixture: json!({
                "symbol": "^DJI",
                "historical": [{ "date": "2023-01-05", "open": 33_136.4, "high": 33_198.6, "low": 32_812.3, "close": 32_930.1 }]
            }),
            expected_fields: &["date", "open", "high", "low", "close", "volume"],
            url_fragment: "/v3/historical-price-full/index/%5EDJI",
        },
        ContractCase {
            provider: ProviderId::Fmp,
            kind: DataKind::ShareStatistics,
            params: json!({ "symbol": "AAPL" }),
            fixture: json!([{
                "symbol": "AAPL", "date": "2023-08-30 18:03:04", "freeFloat": 99.89,
                "floatShares": 15_617_709_264.0, "outstandingShares": 15_634_199_999.0
            }]),
            expected_fields: &["symbol", "date", "free_float", "float_shares", "outstanding_shares", "source"],
            url_fragment: "/v4/shares_float?symbol=AAPL&",
        },
        ContractCase {
            provider: ProviderId::Fmp,
            kind: DataKind::EarningsCallTranscript,
            params: json!({ "symbol": "MSFT", "year": 2022 }),
            fixture: json!([{
                "symbol": "MSFT", "quarter": 4, "year": 2022,
                "date": "2022-07-26 17:00:00", "content": "Operator: Greetings."
            }]),
            expected_fields: &["symbol", "quarter", "year", "date", "content"],
            url_fragment: "/v4/batch_earning_call_transcript/MSFT?year=2022&",
        },
        ContractCase {
            provider: ProviderId::Fmp,
            kind: DataKind::AnalystEstimates,
            params: json!({ "symbol": "AAPL", "period": "quarterly" }),
            fixture: json!([{ "symbol": "AAPL", "date": "2024-09-28", "estimatedEpsAvg": 1.6 }]),
            expected_fields: &[
                "symbol", "date", "revenue", "ebitda", "ebit", "net_income", "sga_expense", "eps",
                "revenue_analysts", "eps_analysts",
            ],
            url_fragment: "/v3/analyst-estimates/AAPL?period=quarter&",
        },
        ContractCase {
            provider: ProviderId::Fmp,
            kind: DataKind::IncomeStatement,
            params: json!({ "symbol": "AAPL", "period": "annual", "limit": 1 }),
            fixture: json!([{
                "date": "2023-09-30", "symbol": "AAPL", "reportedCurrency": "USD",
                "fillingDate": "2023-11-03", "revenue": 383_285_000_000.0, "epsdiluted": 6.13
            }]),
            expected_fields: &[
                "symbol", "date", "cik", "period", "currency", "filing_date", "accepted_date",
                "revenue", "cost_of_revenue", "gross_profit", "research_and_development_expenses",
                "general_and_administrative_expenses", "selling_and_marketing_expenses",
                "selling_general_and_administrative_expenses", "other_expenses",
                "operating_expenses", "depreciation_and_amortization", "ebitda",
                "operating_income", "interest_income", "interest_expense",
                "total_other_income_expenses_net", "income_before_tax", "income_tax_expense",
                "net_income", "eps", "eps_diluted", "weighted_average_shares_outstanding",
                "weighted_average_shares_outstanding_dil",
            ],
            url_fragment: "/v3/income-statement/AAPL?period=annual&limit=1&",
        },
    ]
}

#[test]
fn contract_cases_cover_every_registered_pair() {
    let registered: Vec<_> = registry(ScriptedHttpClient::replying([])).entries().collect();
    let covered: Vec<_> = contract_cases()
        .iter()
        .map(|case| (case.provider, case.kind))
        .collect();
    assert_eq!(registered, covered);
}

#[test]
fn every_pair_returns_canonical_records_with_stable_fields() {
    for case in contract_cases() {
        let http = ScriptedHttpClient::json(200, case.fixture.clone());
        let records = registry(http.clone())
            .fetch(case.provider, case.kind, &case.params, &credentials())
            .unwrap_or_else(|error| panic!("{}/{} failed: {error}", case.provider, case.kind));

        assert_eq!(records.len(), 1, "{}/{}", case.provider, case.kind);
        let object = records[0].as_object().expect("record should be an object");
        let mut fields: Vec<_> = object.keys().map(String::as_str).collect();
        let mut expected = case.expected_fields.to_vec();
        fields.sort_unstable();
        expected.sort_unstable();
        assert_eq!(fields, expected, "{}/{}", case.provider, case.kind);

        let urls = http.urls();
        assert_eq!(urls.len(), 1);
        assert!(
            urls[0].contains(case.url_fragment),
            "{}/{} url {}",
            case.provider,
            case.kind,
            urls[0]
        );
    }
}

#[test]
fn every_pair_requires_its_provider_credential() {
    for case in contract_cases() {
        let http = ScriptedHttpClient::json(200, case.fixture.clone());
        let error = registry(http.clone())
            .fetch(case.provider, case.kind, &case.params, &Credentials::new())
            .expect_err("missing credential should fail");

        match error {
            FetchError::MissingCredential { key } => {
                assert_eq!(key, case.provider.credential_key());
            }
            other => panic!("{}/{} unexpected error: {other}", case.provider, case.kind),
        }
        assert!(http.requests().is_empty());
    }
}

#[test]
fn every_pair_reports_no_results_for_empty_payloads() {
    for case in contract_cases() {
        let http = ScriptedHttpClient::json(200, json!([]));
        let error = registry(http)
            .fetch(case.provider, case.kind, &case.params, &credentials())
            .expect_err("empty payload should fail");
        assert!(
            matches!(error, FetchError::NoResults),
            "{}/{} returned {error}",
            case.provider,
            case.kind
        );
    }
}

#[test]
fn every_pair_rejects_unknown_extra_parameters() {
    for case in contract_cases() {
        let mut params = case.params.clone();
        params["definitely_not_a_field"] = json!(true);

        let error = registry(ScriptedHttpClient::replying([]))
            .fetch(case.provider, case.kind, &params, &credentials())
            .expect_err("unknown parameter should fail");
        assert_eq!(error.code(), "fetch.invalid_query", "{}/{}", case.provider, case.kind);
    }
}
