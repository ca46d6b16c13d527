use thiserror::Error;

/// Why a weather query did not produce a view model.
///
/// Every variant is terminal for the query that produced it; the service never
/// retries internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// City name was empty after trimming. No request was sent.
    #[error("City name must not be empty")]
    InvalidInput,

    /// Upstream reported that the city does not exist.
    #[error("City not found: {0}")]
    NotFound(String),

    /// Connectivity failure, timeout, or an unexpected HTTP status.
    #[error("Weather service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Upstream answered with success but the payload is unusable.
    #[error("Invalid weather data received: {0}")]
    MalformedResponse(String),

    /// Current conditions were fetched, but the forecast could not be.
    #[error("Forecast not available: {0}")]
    ForecastUnavailable(String),
}

impl QueryError {
    /// Whether re-issuing the same query later could reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            QueryError::UpstreamUnavailable(_) | QueryError::ForecastUnavailable(_)
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::InvalidInput => "invalid_input",
            QueryError::NotFound(_) => "not_found",
            QueryError::UpstreamUnavailable(_) => "upstream_unavailable",
            QueryError::MalformedResponse(_) => "malformed_response",
            QueryError::ForecastUnavailable(_) => "forecast_unavailable",
        }
    }
}
