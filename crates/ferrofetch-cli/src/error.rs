use ferrofetch_core::{FetchError, FetchErrorKind};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ferrofetch_core::ValidationError),

    #[error("{code}: {0}", code = .0.code())]
    Fetch(#[from] FetchError),

    #[error("invalid --param '{0}', expected key=value")]
    InvalidParam(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Time(#[from] time::error::Format),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) | Self::InvalidParam(_) => 2,
            Self::Fetch(error) => match error.kind() {
                FetchErrorKind::InvalidQuery
                | FetchErrorKind::MissingCredential
                | FetchErrorKind::UnsupportedKind => 2,
                FetchErrorKind::NoResults => 4,
                _ => 10,
            },
            Self::Serialization(_) | Self::Time(_) | Self::Io(_) => 10,
        }
    }
}
