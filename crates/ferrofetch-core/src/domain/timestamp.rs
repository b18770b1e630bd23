use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

use crate::ValidationError;

/// Vendor date-time normalized to a single structured value.
///
/// Vendors report either a bare date (`2023-01-05`), a wall-clock timestamp
/// (`2023-01-05 15:30:00`) or epoch milliseconds; all of them land here. A
/// bare date is midnight of that day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MarketDateTime(PrimitiveDateTime);

impl MarketDateTime {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let invalid = || ValidationError::InvalidDateTime {
            value: input.to_owned(),
        };

        if trimmed.len() < 12 {
            let date = Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
                .map_err(|_| invalid())?;
            return Ok(Self::from_date(date));
        }

        PrimitiveDateTime::parse(
            trimmed,
            format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        )
        .map(Self)
        .map_err(|_| invalid())
    }

    pub fn from_date(date: Date) -> Self {
        Self(PrimitiveDateTime::new(date, Time::MIDNIGHT))
    }

    /// Interpret epoch milliseconds as UTC wall-clock time.
    pub fn from_unix_millis(millis: i64) -> Result<Self, ValidationError> {
        let nanos = i128::from(millis) * 1_000_000;
        let instant = OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .map_err(|_| ValidationError::TimestampOutOfRange { millis })?;
        Ok(Self(PrimitiveDateTime::new(instant.date(), instant.time())))
    }

    pub fn date(self) -> Date {
        self.0.date()
    }

    pub fn into_inner(self) -> PrimitiveDateTime {
        self.0
    }

    pub fn format(self) -> String {
        let date = self.0.date();
        let time = self.0.time();
        format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            date.year(),
            u8::from(date.month()),
            date.day(),
            time.hour(),
            time.minute(),
            time.second()
        )
    }

    /// Serde adapter for vendors that send epoch milliseconds.
    pub fn deserialize_unix_millis<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = i64::deserialize(deserializer)?;
        Self::from_unix_millis(millis).map_err(D::Error::custom)
    }
}

impl Display for MarketDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

impl Serialize for MarketDateTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for MarketDateTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}
