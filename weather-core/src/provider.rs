use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    Config,
    error::QueryError,
    model::{CityQuery, CurrentConditions, ForecastEntry},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Upstream source of raw weather data.
///
/// Implementations classify their own failures into [`QueryError`]; the
/// query service decides how a failure at each stage is reported.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions. Payloads without condition descriptors or core
    /// measurements must be rejected as [`QueryError::MalformedResponse`].
    async fn current_conditions(&self, city: &CityQuery) -> Result<CurrentConditions, QueryError>;

    /// Every sample of the multi-day forecast, in feed order.
    async fn forecast(&self, city: &CityQuery) -> Result<Vec<ForecastEntry>, QueryError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeatherProvider::new(
        api_key.to_owned(),
        config.base_url.clone(),
        config.timeout(),
    )?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let cfg = Config { api_key: Some("KEY".into()), ..Config::default() };
        assert!(provider_from_config(&cfg).is_ok());
    }
}
