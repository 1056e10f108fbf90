use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::FetchError,
    icon::resolve_icon,
    model::{QueryInput, WeatherSnapshot, local_observation_time},
};

use super::WeatherProvider;

const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Talk to `base_url` instead of the public host, e.g. a key-holding proxy.
    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}{CURRENT_WEATHER_PATH}", self.base_url)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &QueryInput) -> Result<WeatherSnapshot, FetchError> {
        debug!(city = %city, "requesting current weather");

        let res = self
            .http
            .get(self.endpoint())
            .query(&[
                ("q", city.as_str()),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        debug!(%status, bytes = body.len(), "OpenWeather responded");

        // The body's `cod` decides the outcome; the HTTP status only matters
        // when the body can't tell us anything.
        match snapshot_from_body(&body) {
            Err(FetchError::Malformed(reason)) if !status.is_success() => {
                Err(FetchError::Malformed(format!(
                    "status {status}: {reason}; body: {}",
                    truncate_body(&body)
                )))
            }
            outcome => outcome,
        }
    }
}

/// Interpret a `/data/2.5/weather` response body.
pub fn snapshot_from_body(body: &str) -> Result<WeatherSnapshot, FetchError> {
    let envelope: OwEnvelope = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("unreadable response: {e}")))?;

    let code = envelope
        .cod
        .as_code()
        .ok_or_else(|| FetchError::Malformed(format!("non-numeric cod {:?}", envelope.cod)))?;

    if code != 200 {
        return Err(FetchError::NotFound {
            code,
            message: envelope.message.unwrap_or_default(),
        });
    }

    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Malformed(format!("incomplete weather payload: {e}")))?;

    parsed.into_snapshot()
}

/// OpenWeather sends `200` as a number on success but `"404"` as a string on errors.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwCod {
    Number(i64),
    Text(String),
}

impl OwCod {
    fn as_code(&self) -> Option<i64> {
        match self {
            OwCod::Number(code) => Some(*code),
            OwCod::Text(text) => text.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    cod: OwCod,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    pressure: i64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    timezone: i32,
    visibility: u32,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

impl OwCurrentResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, FetchError> {
        let icon = self
            .weather
            .first()
            .map(|w| resolve_icon(&w.icon))
            .ok_or_else(|| FetchError::Malformed("response contained no weather conditions".into()))?;

        let local_observation_time = local_observation_time(self.dt, self.timezone).ok_or_else(
            || FetchError::Malformed(format!("invalid observation time {} / offset {}", self.dt, self.timezone)),
        )?;

        Ok(WeatherSnapshot {
            temperature: self.main.temp.floor() as i64,
            pressure: self.main.pressure,
            humidity: self.main.humidity,
            visibility_km: f64::from(self.visibility) / 1000.0,
            city_name: self.name,
            country_code: self.sys.country,
            wind_speed: self.wind.speed,
            local_observation_time,
            icon,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = (0..=MAX).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icon::IconAsset;
    use serde_json::json;

    fn lagos_body() -> serde_json::Value {
        json!({
            "cod": 200,
            "main": { "temp": 21.9, "pressure": 1012, "humidity": 55 },
            "weather": [{ "icon": "10d" }],
            "visibility": 8000,
            "dt": 1_700_000_000,
            "timezone": 3600,
            "name": "Lagos",
            "sys": { "country": "NG" },
            "wind": { "speed": 3.4 }
        })
    }

    #[test]
    fn success_body_becomes_snapshot() {
        let snapshot = snapshot_from_body(&lagos_body().to_string()).expect("valid body");

        assert_eq!(snapshot.temperature, 21);
        assert_eq!(snapshot.icon, IconAsset::Rain);
        assert_eq!(snapshot.visibility_km, 8.0);
        assert_eq!(snapshot.humidity, 55);
        assert_eq!(snapshot.pressure, 1012);
        assert_eq!(snapshot.wind_speed, 3.4);
        assert_eq!(snapshot.city_name, "Lagos");
        assert_eq!(snapshot.country_code, "NG");
        assert_eq!(snapshot.local_observation_time, "Tue, 14 Nov 2023 23:13:20");
    }

    #[test]
    fn temperature_is_floored_not_truncated() {
        let mut body = lagos_body();
        body["main"]["temp"] = json!(-0.4);
        assert_eq!(snapshot_from_body(&body.to_string()).unwrap().temperature, -1);

        body["main"]["temp"] = json!(-3.0);
        assert_eq!(snapshot_from_body(&body.to_string()).unwrap().temperature, -3);
    }

    #[test]
    fn unknown_icon_code_falls_back_silently() {
        let mut body = lagos_body();
        body["weather"][0]["icon"] = json!("50n");
        assert_eq!(snapshot_from_body(&body.to_string()).unwrap().icon, IconAsset::Clear);
    }

    #[test]
    fn any_other_cod_is_not_found() {
        for body in [
            json!({ "cod": 404, "message": "city not found" }),
            json!({ "cod": "404", "message": "city not found" }),
            json!({ "cod": "400", "message": "Nothing to geocode" }),
            json!({ "cod": 401 }),
        ] {
            let err = snapshot_from_body(&body.to_string()).unwrap_err();
            assert!(matches!(err, FetchError::NotFound { .. }), "{body}: {err:?}");
        }
    }

    #[test]
    fn string_cod_200_is_success() {
        let mut body = lagos_body();
        body["cod"] = json!("200");
        assert!(snapshot_from_body(&body.to_string()).is_ok());
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = snapshot_from_body("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn missing_fields_on_success_are_malformed() {
        let mut body = lagos_body();
        body.as_object_mut().unwrap().remove("main");
        assert!(matches!(
            snapshot_from_body(&body.to_string()).unwrap_err(),
            FetchError::Malformed(_)
        ));

        let mut body = lagos_body();
        body["weather"] = json!([]);
        assert!(matches!(
            snapshot_from_body(&body.to_string()).unwrap_err(),
            FetchError::Malformed(_)
        ));
    }

    #[test]
    fn non_numeric_cod_is_malformed() {
        let err = snapshot_from_body(r#"{"cod":"oops"}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert!(truncated.len() <= 203);
    }
}
