use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::{
    error::QueryError,
    model::{CityQuery, ConditionDescriptor, CurrentConditions, ForecastEntry},
};

use super::WeatherProvider;

const CURRENT_ENDPOINT: &str = "weather";
const FORECAST_ENDPOINT: &str = "forecast";

/// OpenWeatherMap 2.5 data API. Temperatures are requested in Kelvin.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &CityQuery,
    ) -> Result<T, QueryError> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "standard"),
            ])
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        debug!(endpoint, %status, bytes = body.len(), "OpenWeather responded");

        if status == StatusCode::NOT_FOUND {
            return Err(QueryError::NotFound(city.to_string()));
        }

        if !status.is_success() {
            return Err(QueryError::UpstreamUnavailable(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            QueryError::MalformedResponse(format!("Failed to parse OpenWeather {endpoint} JSON: {e}"))
        })
    }

    fn transport_error(&self, endpoint: &str, err: reqwest::Error) -> QueryError {
        // The URL carries the API key in its query string.
        let err = err.without_url();
        warn!(endpoint, error = %err, "OpenWeather request failed");

        if err.is_timeout() {
            QueryError::UpstreamUnavailable(format!(
                "OpenWeather {endpoint} request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else {
            QueryError::UpstreamUnavailable(format!("Failed to reach OpenWeather ({endpoint}): {err}"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    #[serde(default)]
    icon: String,
}

impl From<OwWeather> for ConditionDescriptor {
    fn from(w: OwWeather) -> Self {
        ConditionDescriptor {
            main: w.main,
            description: w.description,
            icon: w.icon,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    feels_like: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    #[serde(default)]
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    #[serde(default)]
    all: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwCoord {
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    dt: Option<i64>,
    weather: Option<Vec<OwWeather>>,
    main: Option<OwMain>,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    clouds: OwClouds,
    #[serde(default)]
    sys: OwSys,
    #[serde(default)]
    coord: OwCoord,
    visibility: Option<u32>,
    #[serde(default)]
    timezone: i32,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = QueryError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let conditions: Vec<ConditionDescriptor> = parsed
            .weather
            .filter(|w| !w.is_empty())
            .ok_or_else(|| missing("weather"))?
            .into_iter()
            .map(ConditionDescriptor::from)
            .collect();
        let main = parsed.main.ok_or_else(|| missing("main"))?;
        let observed_at = parsed.dt.ok_or_else(|| missing("dt"))?;

        Ok(CurrentConditions {
            name: parsed.name,
            country: parsed.sys.country.unwrap_or_default(),
            conditions,
            temp_k: main.temp,
            temp_min_k: main.temp_min,
            temp_max_k: main.temp_max,
            feels_like_k: main.feels_like,
            humidity_pct: main.humidity,
            wind_speed_mps: parsed.wind.speed,
            pressure_hpa: main.pressure,
            visibility_m: parsed.visibility,
            cloudiness_pct: parsed.clouds.all,
            sunrise: parsed.sys.sunrise,
            sunset: parsed.sys.sunset,
            observed_at,
            latitude: parsed.coord.lat,
            longitude: parsed.coord.lon,
            utc_offset_secs: parsed.timezone,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = QueryError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let condition = entry
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| missing("list[].weather"))?;

        Ok(ForecastEntry {
            dt: entry.dt,
            dt_txt: entry.dt_txt,
            temp_min_k: entry.main.temp_min,
            temp_max_k: entry.main.temp_max,
            condition: condition.into(),
        })
    }
}

fn missing(field: &str) -> QueryError {
    QueryError::MalformedResponse(format!("response is missing `{field}`"))
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self, city), fields(city = %city))]
    async fn current_conditions(&self, city: &CityQuery) -> Result<CurrentConditions, QueryError> {
        let parsed: OwCurrentResponse = self.get_json(CURRENT_ENDPOINT, city).await?;
        CurrentConditions::try_from(parsed)
    }

    #[instrument(skip(self, city), fields(city = %city))]
    async fn forecast(&self, city: &CityQuery) -> Result<Vec<ForecastEntry>, QueryError> {
        let parsed: OwForecastResponse = self.get_json(FORECAST_ENDPOINT, city).await?;
        parsed.list.into_iter().map(ForecastEntry::try_from).collect()
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_json() -> serde_json::Value {
        json!({
            "coord": { "lon": 2.3488, "lat": 48.8534 },
            "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
            "main": {
                "temp": 300.0, "feels_like": 299.0, "temp_min": 298.15,
                "temp_max": 301.15, "pressure": 1012, "humidity": 40
            },
            "visibility": 10000,
            "wind": { "speed": 3.6, "deg": 250 },
            "clouds": { "all": 0 },
            "dt": 1_704_110_445,
            "sys": { "country": "FR", "sunrise": 1_704_088_800, "sunset": 1_704_133_800 },
            "timezone": 3600,
            "name": "Paris",
            "cod": 200
        })
    }

    fn parse_current(value: serde_json::Value) -> Result<CurrentConditions, QueryError> {
        let parsed: OwCurrentResponse = serde_json::from_value(value).unwrap();
        CurrentConditions::try_from(parsed)
    }

    #[test]
    fn maps_full_current_payload() {
        let current = parse_current(current_json()).unwrap();

        assert_eq!(current.name, "Paris");
        assert_eq!(current.country, "FR");
        assert_eq!(current.conditions[0].main, "Clear");
        assert_eq!(current.temp_k, 300.0);
        assert_eq!(current.pressure_hpa, 1012.0);
        assert_eq!(current.visibility_m, Some(10000));
        assert_eq!(current.utc_offset_secs, 3600);
    }

    #[test]
    fn rejects_payload_without_main_or_weather() {
        for field in ["main", "weather"] {
            let mut value = current_json();
            value.as_object_mut().unwrap().remove(field);

            let err = parse_current(value).unwrap_err();
            assert!(matches!(err, QueryError::MalformedResponse(ref m) if m.contains(field)));
        }
    }

    #[test]
    fn rejects_empty_weather_list() {
        let mut value = current_json();
        value["weather"] = json!([]);
        assert!(matches!(parse_current(value), Err(QueryError::MalformedResponse(_))));
    }

    #[test]
    fn optional_sections_default_when_absent() {
        let mut value = current_json();
        for field in ["wind", "clouds", "sys", "coord", "visibility", "timezone"] {
            value.as_object_mut().unwrap().remove(field);
        }

        let current = parse_current(value).unwrap();
        assert_eq!(current.country, "");
        assert_eq!(current.sunrise, None);
        assert_eq!(current.visibility_m, None);
        assert_eq!(current.wind_speed_mps, 0.0);
        assert_eq!(current.utc_offset_secs, 0);
    }

    #[test]
    fn forecast_entry_requires_a_descriptor() {
        let entry: OwForecastEntry = serde_json::from_value(json!({
            "dt": 1_704_110_400,
            "dt_txt": "2024-01-01 12:00:00",
            "main": { "temp_min": 280.0, "temp_max": 290.0 },
            "weather": []
        }))
        .unwrap();

        assert!(matches!(ForecastEntry::try_from(entry), Err(QueryError::MalformedResponse(_))));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(300);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
        assert_eq!(truncated.chars().count(), 203);
    }
}
