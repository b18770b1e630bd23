use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Canonical provider identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Polygon,
    Fmp,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::Polygon, Self::Fmp];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Polygon => "polygon",
            Self::Fmp => "fmp",
        }
    }

    /// Name of the entry in [`Credentials`](crate::Credentials) holding this provider's API key.
    pub const fn credential_key(self) -> &'static str {
        match self {
            Self::Polygon => "polygon_api_key",
            Self::Fmp => "fmp_api_key",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "polygon" => Ok(Self::Polygon),
            "fmp" => Ok(Self::Fmp),
            other => Err(ValidationError::InvalidProvider {
                value: other.to_owned(),
            }),
        }
    }
}

/// Canonical data kinds a fetcher can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataKind {
    StockPrice,
    CryptoPrice,
    MajorIndicesHistorical,
    ShareStatistics,
    EarningsCallTranscript,
    AnalystEstimates,
    IncomeStatement,
}

impl DataKind {
    pub const ALL: [Self; 7] = [
        Self::StockPrice,
        Self::CryptoPrice,
        Self::MajorIndicesHistorical,
        Self::ShareStatistics,
        Self::EarningsCallTranscript,
        Self::AnalystEstimates,
        Self::IncomeStatement,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StockPrice => "stock_price",
            Self::CryptoPrice => "crypto_price",
            Self::MajorIndicesHistorical => "major_indices_historical",
            Self::ShareStatistics => "share_statistics",
            Self::EarningsCallTranscript => "earnings_call_transcript",
            Self::AnalystEstimates => "analyst_estimates",
            Self::IncomeStatement => "income_statement",
        }
    }
}

impl Display for DataKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or(ValidationError::InvalidDataKind { value: normalized })
    }
}
