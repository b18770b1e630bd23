mod fmp;
mod polygon;

pub use fmp::{
    FmpAnalystEstimate, FmpAnalystEstimatesFetcher, FmpAnalystEstimatesQuery, FmpClient,
    FmpEarningsCallTranscript, FmpEarningsCallTranscriptFetcher, FmpEarningsCallTranscriptQuery,
    FmpIncomeStatement, FmpIncomeStatementFetcher, FmpIncomeStatementQuery, FmpInterval, FmpMajorIndexBar, FmpMajorIndicesHistoricalFetcher, FmpMajorIndicesQuery,
    FmpPeriod, FmpShareStatistics, FmpShareStatisticsFetcher, FmpShareStatisticsQuery,
    FMP_BASE_URL,
};
pub use polygon::{
    PolygonAggregateBar, PolygonClient, PolygonCryptoPriceFetcher, PolygonPriceQuery,
    PolygonStockPriceFetcher, SortOrder, Timespan, POLYGON_BASE_URL,
};
