use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::icon::IconAsset;

/// Format used for the observation time, e.g. `Tue, 14 Nov 2023 23:13:20`.
pub const OBSERVATION_TIME_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// A city name that is safe to send to the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryInput(String);

impl QueryInput {
    /// Trim the raw input. Returns `None` for empty or whitespace-only text.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueryInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Current conditions for one city, derived from a single successful lookup.
///
/// Values keep the provider's metric units: hectopascals for pressure and
/// metres per second for wind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Whole degrees Celsius, rounded towards negative infinity.
    pub temperature: i64,
    pub pressure: i64,
    pub humidity: u8,
    pub visibility_km: f64,
    pub city_name: String,
    pub country_code: String,
    pub wind_speed: f64,
    pub local_observation_time: String,
    pub icon: IconAsset,
}

/// What the widget is showing. Exactly one is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "data", rename_all = "lowercase")]
pub enum UiState {
    Loading,
    Error(String),
    Ready(WeatherSnapshot),
}

impl UiState {
    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            UiState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// Wall-clock time at the observed location.
///
/// `observed_at` is a unix timestamp and `utc_offset` the location's offset in
/// seconds. The offset is applied once; the viewer's own timezone never is.
pub fn local_observation_time(observed_at: i64, utc_offset: i32) -> Option<String> {
    let offset = FixedOffset::east_opt(utc_offset)?;
    let utc = DateTime::<Utc>::from_timestamp(observed_at, 0)?;

    Some(utc.with_timezone(&offset).format(OBSERVATION_TIME_FORMAT).to_string())
}
