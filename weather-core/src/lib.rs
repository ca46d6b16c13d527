//! Core library for the city weather widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the upstream weather provider (OpenWeatherMap)
//! - Normalization of raw responses into a display-ready view model
//! - `WeatherQueryService`, the fetch-and-normalize entry point
//! - `WeatherSession`, which keeps superseded queries from clobbering newer results
//!
//! It is used by `weather-cli`, but can also back any other presentation layer.

pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod service;
pub mod session;

pub use config::Config;
pub use error::QueryError;
pub use model::{
    CityQuery, ConditionCategory, ConditionView, CurrentView, DailyForecastView, WeatherViewModel,
};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use service::WeatherQueryService;
pub use session::{QueryState, QueryTicket, WeatherSession};
