use serde::{Deserialize, Serialize};

use crate::{MarketDateTime, Symbol};

/// Canonical query for float and outstanding-share statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareStatisticsQuery {
    pub symbol: Symbol,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareStatistics {
    pub symbol: Symbol,
    pub date: MarketDateTime,
    /// Percentage of outstanding shares available to trade.
    pub free_float: f64,
    pub float_shares: f64,
    pub outstanding_shares: f64,
    pub source: Option<String>,
}

/// Canonical query for a company's earnings call transcripts of one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarningsCallTranscriptQuery {
    pub symbol: Symbol,
    pub year: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsCallTranscript {
    pub symbol: Symbol,
    pub quarter: u8,
    pub year: i32,
    pub date: MarketDateTime,
    pub content: String,
}

/// Reporting period of estimates and financial statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    #[default]
    Annual,
    #[serde(alias = "quarter")]
    Quarterly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalystEstimatesQuery {
    pub symbol: Symbol,
    #[serde(default)]
    pub period: ReportPeriod,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Low/high/average spread of one estimated metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimateRange {
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalystEstimate {
    pub symbol: Symbol,
    pub date: MarketDateTime,
    pub revenue: EstimateRange,
    pub ebitda: EstimateRange,
    pub ebit: EstimateRange,
    pub net_income: EstimateRange,
    pub sga_expense: EstimateRange,
    pub eps: EstimateRange,
    pub revenue_analysts: Option<u32>,
    pub eps_analysts: Option<u32>,
}

/// Canonical query for reported income statements.
///
/// `symbol` may be left unset when a vendor accepts another company
/// identifier instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeStatementQuery {
    #[serde(default)]
    pub symbol: Option<Symbol>,
    #[serde(default)]
    pub period: ReportPeriod,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// One reported income statement. Monetary values are in `currency`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub symbol: Symbol,
    pub date: MarketDateTime,
    pub cik: Option<String>,
    /// Vendor period label, e.g. `FY` or `Q3`.
    pub period: Option<String>,
    pub currency: Option<String>,
    pub filing_date: Option<MarketDateTime>,
    pub accepted_date: Option<MarketDateTime>,
    pub revenue: Option<f64>,
    pub cost_of_revenue: Option<f64>,
    pub gross_profit: Option<f64>,
    pub research_and_development_expenses: Option<f64>,
    pub general_and_administrative_expenses: Option<f64>,
    pub selling_and_marketing_expenses: Option<f64>,
    pub selling_general_and_administrative_expenses: Option<f64>,
    pub other_expenses: Option<f64>,
    pub operating_expenses: Option<f64>,
    pub depreciation_and_amortization: Option<f64>,
    pub ebitda: Option<f64>,
    pub operating_income: Option<f64>,
    pub interest_income: Option<f64>,
    pub interest_expense: Option<f64>,
    pub total_other_income_expenses_net: Option<f64>,
    pub income_before_tax: Option<f64>,
    pub income_tax_expense: Option<f64>,
    pub net_income: Option<f64>,
    pub eps: Option<f64>,
    pub eps_diluted: Option<f64>,
    pub weighted_average_shares_outstanding: Option<f64>,
    pub weighted_average_shares_outstanding_dil: Option<f64>,
}
