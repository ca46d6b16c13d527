use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QueryError;

/// A validated, trimmed city name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CityQuery(String);

impl CityQuery {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::InvalidInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for CityQuery {
    type Error = QueryError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl fmt::Display for CityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coarse weather group as reported by the upstream `main` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionCategory {
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Thunderstorm,
    Snow,
    Mist,
    Fog,
    Other(String),
}

impl ConditionCategory {
    pub fn from_main(main: &str) -> Self {
        match main {
            "Clear" => ConditionCategory::Clear,
            "Clouds" => ConditionCategory::Clouds,
            "Rain" => ConditionCategory::Rain,
            "Drizzle" => ConditionCategory::Drizzle,
            "Thunderstorm" => ConditionCategory::Thunderstorm,
            "Snow" => ConditionCategory::Snow,
            "Mist" => ConditionCategory::Mist,
            "Fog" => ConditionCategory::Fog,
            other => ConditionCategory::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ConditionCategory::Clear => "Clear",
            ConditionCategory::Clouds => "Clouds",
            ConditionCategory::Rain => "Rain",
            ConditionCategory::Drizzle => "Drizzle",
            ConditionCategory::Thunderstorm => "Thunderstorm",
            ConditionCategory::Snow => "Snow",
            ConditionCategory::Mist => "Mist",
            ConditionCategory::Fog => "Fog",
            ConditionCategory::Other(main) => main,
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionDescriptor {
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Current conditions as received from upstream. Temperatures are in Kelvin.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub name: String,
    pub country: String,
    /// Never empty; the provider rejects payloads without descriptors.
    pub conditions: Vec<ConditionDescriptor>,
    pub temp_k: f64,
    pub temp_min_k: f64,
    pub temp_max_k: f64,
    pub feels_like_k: f64,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub pressure_hpa: f64,
    pub visibility_m: Option<u32>,
    pub cloudiness_pct: u8,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub observed_at: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Shift from UTC in seconds for the city.
    pub utc_offset_secs: i32,
}

/// One sample of the multi-day forecast feed. Temperatures are in Kelvin.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub dt: i64,
    /// Feed-local timestamp text, e.g. `2024-01-01 12:00:00`.
    pub dt_txt: String,
    pub temp_min_k: f64,
    pub temp_max_k: f64,
    pub condition: ConditionDescriptor,
}

/// Display-ready condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionView {
    pub category: ConditionCategory,
    pub description: String,
    pub icon_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentView {
    pub location: String,
    pub condition: ConditionView,
    /// Celsius, one decimal place.
    pub temperature_c: String,
    pub temp_min_c: String,
    pub temp_max_c: String,
    pub feels_like_c: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub visibility: Option<String>,
    pub cloudiness: String,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub updated_at: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecastView {
    pub timestamp: i64,
    /// `Today` for the first entry, otherwise short weekday and day of month.
    pub label: String,
    /// Celsius, no decimals.
    pub max_c: String,
    pub min_c: String,
    pub condition: ConditionView,
}

/// Normalized output of a successful query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherViewModel {
    pub current: CurrentView,
    pub daily: Vec<DailyForecastView>,
}
