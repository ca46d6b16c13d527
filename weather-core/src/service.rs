use tracing::{debug, info, instrument, warn};

use crate::{
    Config,
    error::QueryError,
    model::{CityQuery, WeatherViewModel},
    normalize,
    provider::{WeatherProvider, provider_from_config},
};

/// Fetches current conditions and forecast for a city and normalizes them
/// into a [`WeatherViewModel`].
///
/// Stateless between calls: every [`query`](Self::query) is independent.
#[derive(Debug)]
pub struct WeatherQueryService {
    provider: Box<dyn WeatherProvider>,
    icon_base_url: String,
}

impl WeatherQueryService {
    pub fn new(provider: Box<dyn WeatherProvider>, icon_base_url: impl Into<String>) -> Self {
        Self {
            provider,
            icon_base_url: icon_base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = provider_from_config(config)?;
        Ok(Self::new(provider, config.icon_base_url.clone()))
    }

    /// All-or-nothing: a forecast failure after current conditions succeeded
    /// fails the whole query with [`QueryError::ForecastUnavailable`].
    #[instrument(skip(self))]
    pub async fn query(&self, city: &str) -> Result<WeatherViewModel, QueryError> {
        let city = CityQuery::parse(city)?;

        let current = self
            .provider
            .current_conditions(&city)
            .await
            .inspect_err(|e| warn!(error = %e, "current conditions lookup failed"))?;
        debug!(location = %current.name, "current conditions received");

        let forecast = self.provider.forecast(&city).await.map_err(|e| {
            warn!(error = %e, "forecast lookup failed");
            match e {
                QueryError::ForecastUnavailable(detail) => QueryError::ForecastUnavailable(detail),
                other => QueryError::ForecastUnavailable(other.to_string()),
            }
        })?;
        debug!(samples = forecast.len(), "forecast received");

        let view_model = normalize::build_view_model(&current, forecast, &self.icon_base_url)
            .ok_or_else(|| {
                QueryError::MalformedResponse("response is missing `weather`".to_string())
            })?;

        info!(
            location = %view_model.current.location,
            days = view_model.daily.len(),
            "weather query succeeded"
        );
        Ok(view_model)
    }
}
