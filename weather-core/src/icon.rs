//! Mapping from OpenWeather condition codes to the bundled icon set.

use serde::{Deserialize, Serialize};

/// Condition icons shipped with the widget. Serialized as their lowercase name.
///
/// Day and night codes share one asset; there is no separate night set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IconAsset {
    #[default]
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
}

impl IconAsset {
    /// Terminal stand-in for the image.
    pub fn glyph(&self) -> &'static str {
        match self {
            IconAsset::Clear => "☀",
            IconAsset::Cloud => "☁",
            IconAsset::Drizzle => "🌦",
            IconAsset::Rain => "🌧",
            IconAsset::Snow => "❄",
        }
    }
}

/// Resolve a provider icon code such as `"10d"` to a bundled asset.
///
/// Codes outside the table (mist `50d`, anything malformed) fall back to
/// [`IconAsset::Clear`] without complaint.
pub fn resolve_icon(code: &str) -> IconAsset {
    match code {
        "01d" | "01n" => IconAsset::Clear,
        "02d" | "02n" | "03d" | "03n" | "04d" | "04n" => IconAsset::Cloud,
        "09d" | "09n" => IconAsset::Drizzle,
        "10d" | "10n" | "11d" | "11n" => IconAsset::Rain,
        "13d" | "13n" => IconAsset::Snow,
        _ => IconAsset::default(),
    }
}

/// Fixed icons for the four secondary metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricIcon {
    Humidity,
    Wind,
    Pressure,
    Visibility,
}

impl MetricIcon {
    pub const fn all() -> &'static [MetricIcon] {
        &[MetricIcon::Humidity, MetricIcon::Wind, MetricIcon::Pressure, MetricIcon::Visibility]
    }

    pub fn label(&self) -> &'static str {
        match self {
            MetricIcon::Humidity => "Humidity",
            MetricIcon::Wind => "Wind",
            MetricIcon::Pressure => "Pressure",
            MetricIcon::Visibility => "Visibility",
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            MetricIcon::Humidity => "💧",
            MetricIcon::Wind => "🌬",
            MetricIcon::Pressure => "⏲",
            MetricIcon::Visibility => "👁",
        }
    }
}
