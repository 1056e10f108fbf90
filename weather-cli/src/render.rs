//! Text views for the three widget states.

use weather_core::{MetricIcon, UiState, WeatherSnapshot};

pub const PROMPT_PLACEHOLDER: &str = "Enter City Name...";
pub const LOADING_TEXT: &str = "Please wait...";

const SPINNER_GLYPH: &str = "⏳";
const ERROR_GLYPH: &str = "☹";

pub fn render(state: &UiState) -> String {
    match state {
        UiState::Loading => format!("{SPINNER_GLYPH} {LOADING_TEXT}"),
        UiState::Error(message) => format!("{ERROR_GLYPH}\n{message}"),
        UiState::Ready(snapshot) => render_snapshot(snapshot),
    }
}

/// Values are printed as stored; only unit labels are added.
fn render_snapshot(snapshot: &WeatherSnapshot) -> String {
    let mut lines = vec![
        format!("{}  {}°C", snapshot.icon.glyph(), snapshot.temperature),
        format!("{}, {}", snapshot.city_name, snapshot.country_code),
        snapshot.local_observation_time.clone(),
        String::new(),
    ];
    lines.extend(MetricIcon::all().iter().map(|&metric| metric_row(metric, snapshot)));

    lines.join("\n")
}

fn metric_row(metric: MetricIcon, snapshot: &WeatherSnapshot) -> String {
    // `{:?}` prints floats in full and keeps a trailing `.0` on whole numbers.
    let value = match metric {
        MetricIcon::Humidity => format!("{}%", snapshot.humidity),
        MetricIcon::Wind => format!("{:?} m/s", snapshot.wind_speed),
        MetricIcon::Pressure => format!("{} hPa", snapshot.pressure),
        MetricIcon::Visibility => format!("{:?} km", snapshot.visibility_km),
    };

    format!("{} {:<10} {value}", metric.glyph(), metric.label())
}
