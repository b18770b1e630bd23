use serde::{Deserialize, Deserializer, Serialize};

use super::{FmpClient, FmpPeriod};
use crate::decode::{decode_many, Record};
use crate::domain::validate_optional_finite;
use crate::fetcher::{merge_query, ExtraParams, Fetcher};
use crate::query::{QueryField, QueryParams};
use crate::{
    Credentials, DataKind, FetchError, IncomeStatement, IncomeStatementQuery, MarketDateTime,
    ProviderId, Symbol, ValidationError,
};

const MAX_CIK_DIGITS: usize = 10;

/// Either `symbol` or `cik` must be set; the symbol wins when both are.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmpIncomeStatementQuery {
    #[serde(default)]
    pub symbol: Option<Symbol>,
    /// SEC Central Index Key, used when no symbol is given.
    #[serde(default, deserialize_with = "text_or_number")]
    pub cik: Option<String>,
    #[serde(default)]
    pub period: FmpPeriod,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl FmpIncomeStatementQuery {
    fn checked(self) -> Result<Self, FetchError> {
        if let Some(cik) = &self.cik {
            if cik.is_empty()
                || cik.len() > MAX_CIK_DIGITS
                || !cik.bytes().all(|byte| byte.is_ascii_digit())
            {
                return Err(FetchError::invalid_query(format!(
                    "cik must be 1 to {MAX_CIK_DIGITS} digits, got '{cik}'"
                )));
            }
        }
        if self.symbol.is_none() && self.cik.is_none() {
            return Err(FetchError::invalid_query("symbol or cik must be provided"));
        }
        Ok(self)
    }

    /// Path segment identifying the company.
    fn company(&self) -> &str {
        match (&self.symbol, &self.cik) {
            (Some(symbol), _) => symbol.as_str(),
            (None, Some(cik)) => cik,
            (None, None) => "",
        }
    }
}

/// CIKs arrive as strings or, from loosely typed callers, as bare numbers.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cik {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Cik>::deserialize(deserializer)?.map(|cik| match cik {
        Cik::Text(text) => text,
        Cik::Number(number) => number.to_string(),
    }))
}

impl QueryParams for FmpIncomeStatementQuery {
    fn query_fields(&self) -> Vec<QueryField> {
        vec![
            QueryField::new("symbol", self.symbol.as_ref().map(ToString::to_string)),
            QueryField::new("cik", self.cik.clone()),
            QueryField::new("period", Some(self.period.as_str().to_owned())),
            QueryField::new("limit", self.limit.map(|limit| limit.to_string())),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpIncomeStatement {
    pub symbol: Symbol,
    pub date: MarketDateTime,
    #[serde(default)]
    pub cik: Option<String>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default, rename = "reportedCurrency")]
    pub currency: Option<String>,
    #[serde(default, rename = "fillingDate")]
    pub filing_date: Option<MarketDateTime>,
    #[serde(default)]
    pub accepted_date: Option<MarketDateTime>,
    #[serde(default)]
    pub revenue: Option<f64>,
    #[serde(default)]
    pub cost_of_revenue: Option<f64>,
    #[serde(default)]
    pub gross_profit: Option<f64>,
    #[serde(default)]
    pub research_and_development_expenses: Option<f64>,
    #[serde(default)]
    pub general_and_administrative_expenses: Option<f64>,
    #[serde(default)]
    pub selling_and_marketing_expenses: Option<f64>,
    #[serde(default)]
    pub selling_general_and_administrative_expenses: Option<f64>,
    #[serde(default)]
    pub other_expenses: Option<f64>,
    #[serde(default)]
    pub operating_expenses: Option<f64>,
    #[serde(default)]
    pub depreciation_and_amortization: Option<f64>,
    #[serde(default)]
    pub ebitda: Option<f64>,
    #[serde(default)]
    pub operating_income: Option<f64>,
    #[serde(default)]
    pub interest_income: Option<f64>,
    #[serde(default)]
    pub interest_expense: Option<f64>,
    #[serde(default)]
    pub total_other_income_expenses_net: Option<f64>,
    #[serde(default)]
    pub income_before_tax: Option<f64>,
    #[serde(default)]
    pub income_tax_expense: Option<f64>,
    #[serde(default)]
    pub net_income: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default, rename = "epsdiluted")]
    pub eps_diluted: Option<f64>,
    #[serde(default, rename = "weightedAverageShsOut")]
    pub weighted_average_shares_outstanding: Option<f64>,
    #[serde(default, rename = "weightedAverageShsOutDil")]
    pub weighted_average_shares_outstanding_dil: Option<f64>,
}

impl Record for FmpIncomeStatement {
    const NAME: &'static str = "fmp income statement";

    fn validate(&self) -> Result<(), ValidationError> {
        [
            ("revenue", self.revenue),
            ("cost_of_revenue", self.cost_of_revenue),
            ("gross_profit", self.gross_profit),
            ("operating_expenses", self.operating_expenses),
            ("ebitda", self.ebitda),
            ("operating_income", self.operating_income),
            ("income_before_tax", self.income_before_tax),
            ("net_income", self.net_income),
            ("eps", self.eps),
            ("eps_diluted", self.eps_diluted),
        ]
        .into_iter()
        .try_for_each(|(field, value)| validate_optional_finite(field, value))
    }
}

impl From<FmpIncomeStatement> for IncomeStatement {
    fn from(row: FmpIncomeStatement) -> Self {
        Self {
            symbol: row.symbol,
            date: row.date,
            cik: row.cik,
            period: row.period,
            currency: row.currency,
            filing_date: row.filing_date,
            accepted_date: row.accepted_date,
            revenue: row.revenue,
            cost_of_revenue: row.cost_of_revenue,
            gross_profit: row.gross_profit,
            research_and_development_expenses: row.research_and_development_expenses,
            general_and_administrative_expenses: row.general_and_administrative_expenses,
            selling_and_marketing_expenses: row.selling_and_marketing_expenses,
            selling_general_and_administrative_expenses: row
                .selling_general_and_administrative_expenses,
            other_expenses: row.other_expenses,
            operating_expenses: row.operating_expenses,
            depreciation_and_amortization: row.depreciation_and_amortization,
            ebitda: row.ebitda,
            operating_income: row.operating_income,
            interest_income: row.interest_income,
            interest_expense: row.interest_expense,
            total_other_income_expenses_net: row.total_other_income_expenses_net,
            income_before_tax: row.income_before_tax,
            income_tax_expense: row.income_tax_expense,
            net_income: row.net_income,
            eps: row.eps,
            eps_diluted: row.eps_diluted,
            weighted_average_shares_outstanding: row.weighted_average_shares_outstanding,
            weighted_average_shares_outstanding_dil: row.weighted_average_shares_outstanding_dil,
        }
    }
}

/// Reported income statements by ticker or CIK.
#[derive(Debug, Clone, Default)]
pub struct FmpIncomeStatementFetcher {
    client: FmpClient,
}

impl FmpIncomeStatementFetcher {
    pub fn new(client: FmpClient) -> Self {
        Self { client }
    }
}

impl Fetcher for FmpIncomeStatementFetcher {
    type Query = IncomeStatementQuery;
    type Data = IncomeStatement;
    type ProviderQuery = FmpIncomeStatementQuery;
    type ProviderData = FmpIncomeStatement;

    const PROVIDER: ProviderId = ProviderId::Fmp;
    const KIND: DataKind = DataKind::IncomeStatement;

    fn transform_query(
        query: &IncomeStatementQuery,
        extra: Option<&ExtraParams>,
    ) -> Result<FmpIncomeStatementQuery, FetchError> {
        merge_query::<_, FmpIncomeStatementQuery>(query, extra)?.checked()
    }

    fn extract_data(
        &self,
        query: &FmpIncomeStatementQuery,
        credentials: &Credentials,
    ) -> Result<Vec<FmpIncomeStatement>, FetchError> {
        let endpoint = format!("income-statement/{}", query.company());
        let payload =
            self.client
                .get_json(3, &endpoint, query, &["symbol", "cik"], credentials)?;
        decode_many(payload, None)
    }

    fn transform_data(data: Vec<FmpIncomeStatement>) -> Vec<IncomeStatement> {
        data.into_iter().map(IncomeStatement::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::access::Transport;
    use crate::http_client::testing::RecordingHttpClient;
    use crate::{FetchErrorKind, ReportPeriod};

    fn fetcher(client: Arc<RecordingHttpClient>) -> FmpIncomeStatementFetcher {
        FmpIncomeStatementFetcher::new(
            FmpClient::new(Transport::new(client)).with_base_url("https://fmp.test/api"),
        )
    }

    fn query(symbol: Option<&str>) -> IncomeStatementQuery {
        IncomeStatementQuery {
            symbol: symbol.map(|symbol| Symbol::parse(symbol).expect("valid symbol")),
            period: ReportPeriod::Quarterly,
            limit: Some(4),
        }
    }

    fn credentials() -> Credentials {
        Credentials::new().with("fmp_api_key", "fk")
    }

    #[test]
    fn maps_vendor_aliases_onto_canonical_names() {
        let client = Arc::new(RecordingHttpClient::json(
            200,
            json!([{
                "date": "2023-09-30", "symbol": "AAPL", "reportedCurrency": "USD",
                "cik": "0000320193", "fillingDate": "2023-11-03",
                "acceptedDate": "2023-11-02 18:08:27", "calendarYear": "2023", "period": "Q4",
                "revenue": 89_498_000_000.0, "costOfRevenue": 46_099_000_000.0,
                "grossProfit": 43_399_000_000.0, "grossProfitRatio": 0.4849,
                "sellingGeneralAndAdministrativeExpenses": 6_151_000_000.0,
                "netIncome": 22_956_000_000.0, "eps": 1.47, "epsdiluted": 1.46,
                "weightedAverageShsOut": 15_599_434_000.0,
                "weightedAverageShsOutDil": 15_672_400_000.0,
                "link": "https://www.sec.gov/", "finalLink": "https://www.sec.gov/"
            }]),
        ));

        let rows = fetcher(client.clone())
            .fetch_data(&query(Some("aapl")), None, &credentials())
            .expect("fetch should succeed");

        let row = &rows[0];
        assert_eq!(row.currency.as_deref(), Some("USD"));
        assert_eq!(row.period.as_deref(), Some("Q4"));
        assert_eq!(
            row.filing_date.map(MarketDateTime::format).as_deref(),
            Some("2023-11-03 00:00:00")
        );
        assert_eq!(row.eps_diluted, Some(1.46));
        assert_eq!(row.weighted_average_shares_outstanding_dil, Some(15_672_400_000.0));
        assert_eq!(row.research_and_development_expenses, None);
        assert_eq!(
            client.recorded_requests()[0].url,
            "https://fmp.test/api/v3/income-statement/AAPL?period=quarter&limit=4&apikey=fk"
        );
    }

    #[test]
    fn cik_addresses_the_company_when_symbol_is_absent() {
        let client = Arc::new(RecordingHttpClient::json(
            200,
            json!([{ "date": "2023-09-30", "symbol": "AAPL", "cik": "0000320193" }]),
        ));
        let extra = json!({ "cik": "0000320193" });

        let rows = fetcher(client.clone())
            .fetch_data(&query(None), extra.as_object(), &credentials())
            .expect("fetch should succeed");

        assert_eq!(rows[0].cik.as_deref(), Some("0000320193"));
        assert_eq!(
            client.recorded_requests()[0].url,
            "https://fmp.test/api/v3/income-statement/0000320193?period=quarter&limit=4&apikey=fk"
        );
    }

    #[test]
    fn symbol_or_cik_is_required() {
        let err = FmpIncomeStatementFetcher::transform_query(&query(None), None)
            .expect_err("must fail");
        assert_eq!(err.kind(), FetchErrorKind::InvalidQuery);
        assert!(err.to_string().contains("symbol or cik"));
    }

    #[test]
    fn malformed_cik_is_rejected_before_any_request() {
        let client = Arc::new(RecordingHttpClient::default());
        let extra = json!({ "cik": "32/0193" });

        let err = fetcher(client.clone())
            .fetch_data(&query(None), extra.as_object(), &credentials())
            .expect_err("must fail");

        assert_eq!(err.kind(), FetchErrorKind::InvalidQuery);
        assert!(client.recorded_requests().is_empty());
    }

    #[test]
    fn numeric_cik_is_accepted() {
        let extra = json!({ "cik": 320_193 });
        let vendor = FmpIncomeStatementFetcher::transform_query(&query(None), extra.as_object())
            .expect("must transform");
        assert_eq!(vendor.cik.as_deref(), Some("320193"));
    }
}
