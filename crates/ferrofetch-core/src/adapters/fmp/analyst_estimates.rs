use serde::{Deserialize, Serialize};

use super::{FmpClient, FmpPeriod};
use crate::decode::{decode_many, Record};
use crate::domain::validate_optional_finite;
use crate::fetcher::{merge_query, ExtraParams, Fetcher};
use crate::query::{QueryField, QueryParams};
use crate::{
    AnalystEstimate, AnalystEstimatesQuery, Credentials, DataKind, EstimateRange, FetchError,
    MarketDateTime, ProviderId, Symbol, ValidationError,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FmpAnalystEstimatesQuery {
    pub symbol: Symbol,
    #[serde(default)]
    pub period: FmpPeriod,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl QueryParams for FmpAnalystEstimatesQuery {
    fn query_fields(&self) -> Vec<QueryField> {
        vec![
            QueryField::new("symbol", Some(self.symbol.to_string())),
            QueryField::new("period", Some(self.period.as_str().to_owned())),
            QueryField::new("limit", self.limit.map(|limit| limit.to_string())),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FmpAnalystEstimate {
    pub symbol: Symbol,
    pub date: MarketDateTime,
    #[serde(default)]
    pub estimated_revenue_low: Option<f64>,
    #[serde(default)]
    pub estimated_revenue_high: Option<f64>,
    #[serde(default)]
    pub estimated_revenue_avg: Option<f64>,
    #[serde(default)]
    pub estimated_ebitda_low: Option<f64>,
    #[serde(default)]
    pub estimated_ebitda_high: Option<f64>,
    #[serde(default)]
    pub estimated_ebitda_avg: Option<f64>,
    #[serde(default)]
    pub estimated_ebit_low: Option<f64>,
    #[serde(default)]
    pub estimated_ebit_high: Option<f64>,
    #[serde(default)]
    pub estimated_ebit_avg: Option<f64>,
    #[serde(default)]
    pub estimated_net_income_low: Option<f64>,
    #[serde(default)]
    pub estimated_net_income_high: Option<f64>,
    #[serde(default)]
    pub estimated_net_income_avg: Option<f64>,
    #[serde(default)]
    pub estimated_sga_expense_low: Option<f64>,
    #[serde(default)]
    pub estimated_sga_expense_high: Option<f64>,
    #[serde(default)]
    pub estimated_sga_expense_avg: Option<f64>,
    #[serde(default)]
    pub estimated_eps_low: Option<f64>,
    #[serde(default)]
    pub estimated_eps_high: Option<f64>,
    #[serde(default)]
    pub estimated_eps_avg: Option<f64>,
    #[serde(default)]
    pub number_analyst_estimated_revenue: Option<u32>,
    #[serde(default)]
    pub number_analysts_estimated_eps: Option<u32>,
}

impl FmpAnalystEstimate {
    fn ranges(&self) -> [(&'static str, Option<f64>); 18] {
        [
            ("estimated_revenue_low", self.estimated_revenue_low),
            ("estimated_revenue_high", self.estimated_revenue_high),
            ("estimated_revenue_avg", self.estimated_revenue_avg),
            ("estimated_ebitda_low", self.estimated_ebitda_low),
            ("estimated_ebitda_high", self.estimated_ebitda_high),
            ("estimated_ebitda_avg", self.estimated_ebitda_avg),
            ("estimated_ebit_low", self.estimated_ebit_low),
            ("estimated_ebit_high", self.estimated_ebit_high),
            ("estimated_ebit_avg", self.estimated_ebit_avg),
            ("estimated_net_income_low", self.estimated_net_income_low),
            ("estimated_net_income_high", self.estimated_net_income_high),
            ("estimated_net_income_avg", self.estimated_net_income_avg),
            ("estimated_sga_expense_low", self.estimated_sga_expense_low),
            ("estimated_sga_expense_high", self.estimated_sga_expense_high),
            ("estimated_sga_expense_avg", self.estimated_sga_expense_avg),
            ("estimated_eps_low", self.estimated_eps_low),
            ("estimated_eps_high", self.estimated_eps_high),
            ("estimated_eps_avg", self.estimated_eps_avg),
        ]
    }
}

impl Record for FmpAnalystEstimate {
    const NAME: &'static str = "fmp analyst estimate";

    fn validate(&self) -> Result<(), ValidationError> {
        self.ranges()
            .into_iter()
            .try_for_each(|(field, value)| validate_optional_finite(field, value))
    }
}

impl From<FmpAnalystEstimate> for AnalystEstimate {
    fn from(row: FmpAnalystEstimate) -> Self {
        Self {
            symbol: row.symbol,
            date: row.date,
            revenue: EstimateRange {
                low: row.estimated_revenue_low,
                high: row.estimated_revenue_high,
                avg: row.estimated_revenue_avg,
            },
            ebitda: EstimateRange {
                low: row.estimated_ebitda_low,
                high: row.estimated_ebitda_high,
                avg: row.estimated_ebitda_avg,
            },
            ebit: EstimateRange {
                low: row.estimated_ebit_low,
                high: row.estimated_ebit_high,
                avg: row.estimated_ebit_avg,
            },
            net_income: EstimateRange {
                low: row.estimated_net_income_low,
                high: row.estimated_net_income_high,
                avg: row.estimated_net_income_avg,
            },
            sga_expense: EstimateRange {
                low: row.estimated_sga_expense_low,
                high: row.estimated_sga_expense_high,
                avg: row.estimated_sga_expense_avg,
            },
            eps: EstimateRange {
                low: row.estimated_eps_low,
                high: row.estimated_eps_high,
                avg: row.estimated_eps_avg,
            },
            revenue_analysts: row.number_analyst_estimated_revenue,
            eps_analysts: row.number_analysts_estimated_eps,
        }
    }
}

/// Consensus analyst estimates, annual or quarterly.
#[derive(Debug, Clone, Default)]
pub struct FmpAnalystEstimatesFetcher {
    client: FmpClient,
}

impl FmpAnalystEstimatesFetcher {
    pub fn new(client: FmpClient) -> Self {
        Self { client }
    }
}

impl Fetcher for FmpAnalystEstimatesFetcher {
    type Query = AnalystEstimatesQuery;
    type Data = AnalystEstimate;
    type ProviderQuery = FmpAnalystEstimatesQuery;
    type ProviderData = FmpAnalystEstimate;

    const PROVIDER: ProviderId = ProviderId::Fmp;
    const KIND: DataKind = DataKind::AnalystEstimates;

    fn transform_query(
        query: &AnalystEstimatesQuery,
        extra: Option<&ExtraParams>,
    ) -> Result<FmpAnalystEstimatesQuery, FetchError> {
        merge_query(query, extra)
    }

    fn extract_data(
        &self,
        query: &FmpAnalystEstimatesQuery,
        credentials: &Credentials,
    ) -> Result<Vec<FmpAnalystEstimate>, FetchError> {
        let endpoint = format!("analyst-estimates/{}", query.symbol);
        let payload = self
            .client
            .get_json(3, &endpoint, query, &["symbol"], credentials)?;
        decode_many(payload, None)
    }

    fn transform_data(data: Vec<FmpAnalystEstimate>) -> Vec<AnalystEstimate> {
        data.into_iter().map(AnalystEstimate::from).collect()
    }
}
